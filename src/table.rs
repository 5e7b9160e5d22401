//! Result tables returned by the external upload
//!
//! The upload reports what it created as a small CSV table. On success the table has at least one
//! row and a `model_version_id` column identifying the newly created model version.

use std::fmt;
use std::fs;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use log::info;

/// Column holding the id of the model version created by an upload
pub static MODEL_VERSION_ID: &str = "model_version_id";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UploadTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Reasons an upload result table doesn't describe a successful upload
#[derive(Debug, PartialEq, Eq)]
pub enum ValidationError {
    Empty,
    MissingColumn(String),
    InvalidVersionId(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ValidationError::Empty => write!(f, "upload returned no rows"),
            ValidationError::MissingColumn(col) => write!(f, "upload result has no {col} column"),
            ValidationError::InvalidVersionId(value) => write!(f, "{value:?} is not a valid model version id")
        }
    }
}

impl std::error::Error for ValidationError {}

impl UploadTable {
    pub fn empty() -> UploadTable {
        UploadTable::default()
    }

    /// Parse a CSV table with a header row
    pub fn from_reader<R: Read>(reader: R) -> Result<UploadTable> {
        let mut rdr = csv::Reader::from_reader(reader);
        let columns: Vec<String> = rdr.headers()?.iter().map(String::from).collect();

        let mut rows: Vec<Vec<String>> = Vec::new();
        for record in rdr.records() {
            let record = record.context("Reading upload result row")?;
            rows.push(record.iter().map(String::from).collect());
        }

        Ok(UploadTable { columns, rows })
    }

    /// Write the table as CSV (header row, no index column), creating parent directories
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Creating directory {}", parent.display()))?;
        }
        info!("Writing upload result to {}", path.display());

        let mut wtr = csv::Writer::from_path(path)
            .with_context(|| format!("Opening {}", path.display()))?;
        wtr.write_record(&self.columns)?;
        for row in &self.rows {
            wtr.write_record(row)?;
        }
        wtr.flush()?;

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx).map(String::as_str)
    }

    /// Check the table describes a successful upload and return the new model version id
    pub fn model_version_id(&self) -> Result<i64, ValidationError> {
        if self.is_empty() {
            return Err(ValidationError::Empty);
        }
        if !self.has_column(MODEL_VERSION_ID) {
            return Err(ValidationError::MissingColumn(MODEL_VERSION_ID.to_string()));
        }
        let value = self.get(0, MODEL_VERSION_ID).unwrap_or_default();
        parse_version_id(value.trim())
            .ok_or_else(|| ValidationError::InvalidVersionId(value.to_string()))
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|col| col == name)
    }
}

/// Integer ids may come back float typed (`412345.0`) when the upload's table upcasts the column
fn parse_version_id(value: &str) -> Option<i64> {
    if let Ok(id) = value.parse::<i64>() {
        return Some(id);
    }
    let float = value.parse::<f64>().ok()?;
    let in_range = float >= i64::MIN as f64 && float < i64::MAX as f64;
    match float.is_finite() && float.fract() == 0.0 && in_range {
        true => Some(float as i64),
        false => None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn success_csv() -> &'static str {
        "model_version_id,modelable_entity_id,description\n412345,1234,split of 5678\n"
    }

    #[test]
    fn reads_header_and_rows() {
        let table = UploadTable::from_reader(success_csv().as_bytes()).unwrap();
        assert_eq!(table.columns, vec!["model_version_id", "modelable_entity_id", "description"]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(0, "description"), Some("split of 5678"));
        assert_eq!(table.get(1, "description"), None);
        assert_eq!(table.get(0, "location_id"), None);
    }

    #[test]
    fn empty_input_is_an_empty_table() {
        let table = UploadTable::from_reader("".as_bytes()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table, UploadTable::empty());
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let result = UploadTable::from_reader("a,b\n1,2,3\n".as_bytes());
        assert!(result.is_err());
    }

    #[test]
    fn version_id_from_first_row() {
        let table = UploadTable::from_reader(success_csv().as_bytes()).unwrap();
        assert_eq!(table.model_version_id(), Ok(412345));
    }

    #[test]
    fn header_only_table_is_empty() {
        let table = UploadTable::from_reader("model_version_id\n".as_bytes()).unwrap();
        assert!(table.has_column(MODEL_VERSION_ID));
        assert_eq!(table.model_version_id(), Err(ValidationError::Empty));
    }

    #[test]
    fn missing_version_column() {
        let table = UploadTable::from_reader("status\nok\n".as_bytes()).unwrap();
        assert_eq!(table.model_version_id(),
                   Err(ValidationError::MissingColumn(MODEL_VERSION_ID.to_string())));
    }

    #[test]
    fn non_numeric_version_id() {
        let table = UploadTable::from_reader("model_version_id\nNaN\n".as_bytes()).unwrap();
        assert_eq!(table.model_version_id(),
                   Err(ValidationError::InvalidVersionId("NaN".to_string())));
    }

    #[test]
    fn float_typed_version_id() {
        let table = UploadTable::from_reader("model_version_id,status\n412345.0,ok\n".as_bytes()).unwrap();
        assert_eq!(table.model_version_id(), Ok(412345));
    }

    #[test]
    fn fractional_version_id() {
        let table = UploadTable::from_reader("model_version_id\n412345.5\n".as_bytes()).unwrap();
        assert_eq!(table.model_version_id(),
                   Err(ValidationError::InvalidVersionId("412345.5".to_string())));

        let table = UploadTable::from_reader("model_version_id\ninf\n".as_bytes()).unwrap();
        assert!(table.model_version_id().is_err());
    }

    #[test]
    fn writes_csv_without_index() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("split").join("1234").join("upload.csv");
        let table = UploadTable::from_reader(success_csv().as_bytes()).unwrap();

        table.write_csv(&path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), success_csv());
    }
}
