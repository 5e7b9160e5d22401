//! Upload records: which model version was created for a modelable entity and run
//!
//! A record is written once an upload has been validated. Records are keyed by modelable entity,
//! run and model type, so re-uploading the same run replaces the stored model version.

pub mod model_type;
pub mod update;
pub mod load;
