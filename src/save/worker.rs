use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use log::{info, warn};
use rusqlite::Connection;

use crate::db::upload::model_type::ModelType;
use crate::db::upload::update::update_upload_record;
use crate::save::request::{ResultsSaver, SaveRequest};
use crate::table::UploadTable;
use crate::{PafArgs, SplitArgs, WorkingDirectory};

/// Upload a request, turning any failure into an empty result table
///
/// Callers decide what an empty table means, so the underlying error is only logged.
pub fn save_worker(saver: &dyn ResultsSaver, request: &SaveRequest) -> UploadTable {
    info!("saving {}...", request.description);
    match saver.save(request) {
        Ok(table) => table,
        Err(err) => {
            warn!("Upload of {} failed: {err:#}", request.modelable_entity_id);
            UploadTable::empty()
        }
    }
}

/// Where the result table of a successful split upload is kept
pub fn marker_path(wd: &WorkingDirectory, me_id: i64) -> PathBuf {
    wd.path.join("split").join(me_id.to_string()).join("upload.csv")
}

/// Upload a split model, then record and preserve the result if the upload is valid
///
/// Returns false if the upload failed or returned an unexpected table. The marker file and upload
/// record are only written for valid uploads.
pub fn run_split(saver: &dyn ResultsSaver, conn: &Connection, wd: &WorkingDirectory, args: &SplitArgs) -> Result<bool> {
    let marker = marker_path(wd, args.meid);
    info!("Working on {} ({}) in {}", args.meid, args.desc, args.indir.display());

    if marker.exists() {
        warn!("Upload marker {} already exists and will be replaced", marker.display());
        fs::remove_file(&marker).with_context(|| format!("Deleting {}", marker.display()))?;
    }

    let request = SaveRequest::split(args.meid, &args.desc, args.indir.clone(), args.meas_id.clone());
    let table = save_worker(saver, &request);

    match table.model_version_id() {
        Ok(model_version_id) => {
            info!("Uploaded {} as model version {model_version_id}", args.meid);
            update_upload_record(conn, args.meid, args.cnf_run_id, model_version_id,
                                 ModelType::SplitCustomEpi, &request)?;
            table.write_csv(&marker)?;
            Ok(true)
        }
        Err(err) => {
            warn!("Error during split upload of {}: {err}", args.meid);
            Ok(false)
        }
    }
}

/// Upload PAFs for a modelable entity, propagating any upload failure
pub fn run_paf(saver: &dyn ResultsSaver, args: &PafArgs) -> Result<UploadTable> {
    let request = SaveRequest::paf(args.me_id, &args.description, args.input_dir.clone(),
                                   args.measure_id, args.year_id.clone().unwrap_or_default().0);
    info!("saving {}...", request.description);
    let table = saver.save(&request)
        .with_context(|| format!("Saving PAFs for {}", args.me_id))?;
    info!("Uploaded {} result row(s) for {}", table.len(), args.me_id);
    Ok(table)
}
