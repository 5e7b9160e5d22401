use std::time::Duration;

use log::info;
use rusqlite::Connection;

use crate::WorkingDirectory;

/// Name of the bookkeeping database inside the working directory
static DB_NAME: &str = "epi_save.db";

/// Split workers run side by side and share one database, so wait for locks rather than failing
static BUSY_TIMEOUT: Duration = Duration::from_secs(60);

static SCHEMA: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/db/schema.sql"));

pub fn open_db(wd: &WorkingDirectory) -> rusqlite::Result<Connection> {
    let path = &wd.path.join(DB_NAME);
    if !path.exists() { info!("Creating new database {}", path.display()) }
    let conn = Connection::open(path)?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    conn.execute_batch(SCHEMA)?;
    Ok(conn)
}

#[cfg(test)]
pub fn open_in_memory() -> rusqlite::Result<Connection> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch(SCHEMA)?;
    Ok(conn)
}
