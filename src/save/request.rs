use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::table::UploadTable;

/// Split models are saved as one HDF5 file per location
pub static SPLIT_FILE_PATTERN: &str = "{location_id}.h5";
/// PAF draws are saved as one CSV file per location
pub static PAF_FILE_PATTERN: &str = "{location_id}.csv";
/// PAFs are uploaded to GBD round 5
pub static PAF_GBD_ROUND_ID: i64 = 5;

/// Everything the external upload needs to save a directory of model results
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SaveRequest {
    pub modelable_entity_id: i64,
    pub description: String,
    pub input_dir: PathBuf,
    pub input_file_pattern: String,
    pub measure_id: Vec<i64>,
    pub year_id: Vec<i64>,
    pub gbd_round_id: Option<i64>,
    pub mark_best: bool,
}

impl SaveRequest {
    pub fn split(me_id: i64, description: &str, input_dir: PathBuf, measure_id: Vec<i64>) -> SaveRequest {
        SaveRequest {
            modelable_entity_id: me_id,
            description: description.to_string(),
            input_dir,
            input_file_pattern: SPLIT_FILE_PATTERN.to_string(),
            measure_id,
            year_id: Vec::new(),
            gbd_round_id: None,
            mark_best: true,
        }
    }

    pub fn paf(me_id: i64, description: &str, input_dir: PathBuf, measure_id: i64, year_id: Vec<i64>) -> SaveRequest {
        SaveRequest {
            modelable_entity_id: me_id,
            description: description.to_string(),
            input_dir,
            input_file_pattern: PAF_FILE_PATTERN.to_string(),
            measure_id: vec![measure_id],
            year_id,
            gbd_round_id: Some(PAF_GBD_ROUND_ID),
            mark_best: true,
        }
    }
}

/// Uploads a directory of model results and reports what was created
pub trait ResultsSaver {
    fn save(&self, request: &SaveRequest) -> Result<UploadTable>;
}
