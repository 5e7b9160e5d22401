//! Upload model results with the external save_results_epi program
//!
//! Builds a save request from command line arguments, hands it to a [request::ResultsSaver] and,
//! for split models, validates what came back before recording the upload.

/// Save requests and the trait implemented by anything that can upload them
pub mod request;
/// Run the external save_results_epi program as a child process
pub mod command;
/// Split and PAF upload workers
pub mod worker;
