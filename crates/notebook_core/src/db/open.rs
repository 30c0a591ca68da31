//! Connection bootstrap for the key-value database.
//!
//! # Invariants
//! - Returned connections have the `kv_store` table in place and are
//!   stamped with `KV_LAYOUT_VERSION`.
//! - Every open attempt emits one `db_open` start event and one ok/error event.

use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Layout stamp written to `PRAGMA user_version`.
pub const KV_LAYOUT_VERSION: u32 = 1;

const CREATE_KV_TABLE: &str = "
CREATE TABLE IF NOT EXISTS kv_store (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL,
    updated_at INTEGER NOT NULL DEFAULT (strftime('%s','now') * 1000)
);";

/// Opens (or creates) the database file at `path`.
///
/// # Side effects
/// - Creates the file and the `kv_store` table when missing.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_with("file", || Connection::open(path))
}

/// Opens a throwaway in-memory database with the same setup as `open_db`.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_with("memory", Connection::open_in_memory)
}

fn open_with(
    mode: &'static str,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let result = connect()
        .map_err(|err| ("db_open_failed", DbError::from(err)))
        .and_then(|conn| {
            bootstrap_connection(&conn)
                .map(|()| conn)
                .map_err(|err| ("db_bootstrap_failed", err))
        });

    match result {
        Ok(conn) => {
            info!(
                "event=db_open module=db status=ok mode={mode} duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err((error_code, err)) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code={error_code} error={err}",
                started_at.elapsed().as_millis()
            );
            Err(err)
        }
    }
}

fn bootstrap_connection(conn: &Connection) -> DbResult<()> {
    conn.busy_timeout(BUSY_TIMEOUT)?;

    let found: u32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    if found > KV_LAYOUT_VERSION {
        return Err(DbError::NewerFile {
            found,
            supported: KV_LAYOUT_VERSION,
        });
    }

    conn.execute_batch(CREATE_KV_TABLE)?;
    if found < KV_LAYOUT_VERSION {
        conn.pragma_update(None, "user_version", KV_LAYOUT_VERSION)?;
        info!("event=db_bootstrap module=db status=ok layout={KV_LAYOUT_VERSION}");
    }
    Ok(())
}
