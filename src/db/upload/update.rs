use anyhow::{Context, Result};
use chrono::Utc;
use log::info;
use rusqlite::{params, Connection, Transaction, TransactionBehavior};

use crate::db::upload::model_type::ModelType;
use crate::save::request::SaveRequest;

/// Record a validated upload, replacing any earlier record for the same entity, run and model type
///
/// The save request is stored as JSON alongside the new model version id. A missing run id is
/// stored as NULL and `IS` is used for matching so NULL run ids replace each other. The write lock
/// is taken up front so concurrent workers can't both insert a record for the same key.
pub fn update_upload_record(conn: &Connection, me_id: i64, run_id: Option<i64>, model_version_id: i64,
                            model_type: ModelType, request: &SaveRequest) -> Result<()> {
    let json = serde_json::to_string(request)?;
    let model_type = model_type.to_string();
    let uploaded_at = Utc::now().to_rfc3339();

    info!("Updating upload record for {me_id} (run {run_id:?}) with model version {model_version_id}");
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    let updated = tx.execute(
        "UPDATE upload SET model_version_id = ?1, request = ?2, uploaded_at = ?3 \
         WHERE modelable_entity_id = ?4 AND run_id IS ?5 AND model_type = ?6",
        params![model_version_id, json, uploaded_at, me_id, run_id, model_type],
    ).context("Update upload record")?;

    if updated == 0 {
        tx.execute(
            "INSERT INTO upload (modelable_entity_id, run_id, model_version_id, model_type, request, uploaded_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![me_id, run_id, model_version_id, model_type, json, uploaded_at],
        ).context("Insert upload record")?;
    }

    tx.commit()?;
    Ok(())
}
