use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use crate::db::upload::model_type::ModelType;
use crate::save::request::SaveRequest;

/// A stored upload record
#[derive(Debug)]
pub struct UploadRecord {
    pub modelable_entity_id: i64,
    pub run_id: Option<i64>,
    pub model_version_id: i64,
    pub model_type: String,
    pub request: SaveRequest,
    pub uploaded_at: String,
}

pub fn get_upload_record(conn: &Connection, me_id: i64, run_id: Option<i64>, model_type: ModelType)
                         -> Result<Option<UploadRecord>> {
    let mut stmt = conn.prepare(
        "SELECT modelable_entity_id, run_id, model_version_id, model_type, request, uploaded_at FROM upload \
         WHERE modelable_entity_id = ?1 AND run_id IS ?2 AND model_type = ?3")?;

    let row: Option<(i64, Option<i64>, i64, String, String, String)> = stmt
        .query_row(params![me_id, run_id, model_type.to_string()], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?, row.get(5)?))
        })
        .optional()?;

    match row {
        Some((modelable_entity_id, run_id, model_version_id, model_type, json, uploaded_at)) => {
            let request: SaveRequest = serde_json::from_str(&json)
                .context("Deserialising stored save request")?;
            Ok(Some(UploadRecord { modelable_entity_id, run_id, model_version_id, model_type, request, uploaded_at }))
        }
        None => Ok(None)
    }
}
