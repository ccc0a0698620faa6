//! Database Connection and Setup
//!
//! Manages the SQLite connection, migrations, and the explicit schema
//! repair policy. Migrations are additive (`CREATE TABLE IF NOT EXISTS`
//! plus guarded `ALTER TABLE`); anything they cannot repair is schema
//! drift, handled per `SchemaRepair`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{info, warn};
use rusqlite::Connection;
use tokio::sync::Mutex;

use crate::domain::{DomainError, DomainResult};

/// Policy for stored schemas that additive migrations cannot repair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemaRepair {
    /// Refuse to start with a remediation message; user data is never
    /// destroyed automatically (default)
    #[default]
    BlockStartup,
    /// Back up the database file beside itself, then drop and recreate the
    /// drifted tables
    ResetOnDrift,
}

/// Shared database handle
#[derive(Clone)]
pub struct DbState {
    conn: Arc<Mutex<Connection>>,
    path: PathBuf,
}

impl DbState {
    pub fn connection(&self) -> Arc<Mutex<Connection>> {
        Arc::clone(&self.conn)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Open (or create) the database and bring the schema up to date
pub async fn init_db(db_path: &Path, repair: SchemaRepair) -> DomainResult<DbState> {
    let conn = Connection::open(db_path)
        .map_err(|e| DomainError::Internal(format!("Failed to open db: {}", e)))?;

    run_migrations(&conn)?;

    let drifted = schema_drift(&conn);
    if !drifted.is_empty() {
        match repair {
            SchemaRepair::BlockStartup => {
                return Err(DomainError::Internal(format!(
                    "Schema drift detected ({}); refusing to start. Repair the file manually, \
                     or opt into SchemaRepair::ResetOnDrift to rebuild the affected tables \
                     (a backup copy is written first).",
                    drifted.join(", ")
                )));
            }
            SchemaRepair::ResetOnDrift => {
                warn!(
                    "schema drift detected ({}), rebuilding affected tables",
                    drifted.join(", ")
                );
                backup_file(db_path)?;
                drop_tables(&conn, &drifted)?;
                run_migrations(&conn)?;
            }
        }
    }

    info!("database ready at {}", db_path.display());
    Ok(DbState {
        conn: Arc::new(Mutex::new(conn)),
        path: db_path.to_path_buf(),
    })
}

/// Check if a column exists in a table
fn column_exists(conn: &Connection, table: &str, column: &str) -> bool {
    let query = format!("PRAGMA table_info({})", table);
    let Ok(mut stmt) = conn.prepare(&query) else {
        return false;
    };
    let Ok(mut rows) = stmt.query([]) else {
        return false;
    };
    while let Ok(Some(row)) = rows.next() {
        if let Ok(name) = row.get::<_, String>(1) {
            if name == column {
                return true;
            }
        }
    }
    false
}

/// Run database migrations
fn run_migrations(conn: &Connection) -> DomainResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS trackers (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            kind TEXT NOT NULL DEFAULT 'counter',
            config TEXT NOT NULL DEFAULT '{}',
            color TEXT NOT NULL DEFAULT '',
            icon TEXT NOT NULL DEFAULT '',
            is_favorite INTEGER NOT NULL DEFAULT 0,
            is_custom INTEGER NOT NULL DEFAULT 0,
            position INTEGER NOT NULL DEFAULT 0
        )",
        [],
    )
    .map_err(|e| DomainError::Internal(e.to_string()))?;

    // Added after the first release: archive instead of delete
    if !column_exists(conn, "trackers", "archived") {
        conn.execute(
            "ALTER TABLE trackers ADD COLUMN archived INTEGER NOT NULL DEFAULT 0",
            [],
        )
        .map_err(|e| DomainError::Internal(format!("Failed to add archived: {}", e)))?;
    }

    conn.execute(
        "CREATE TABLE IF NOT EXISTS entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            tracker_id INTEGER NOT NULL,
            value REAL,
            note TEXT,
            metadata TEXT,
            timestamp INTEGER NOT NULL,
            date_str TEXT NOT NULL
        )",
        [],
    )
    .map_err(|e| DomainError::Internal(e.to_string()))?;

    // Indexes for tracker scoping and day-bucketed aggregation
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_entries_tracker ON entries(tracker_id)",
        [],
    )
    .map_err(|e| DomainError::Internal(e.to_string()))?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_entries_date ON entries(date_str)",
        [],
    )
    .map_err(|e| DomainError::Internal(e.to_string()))?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS layouts (
            page TEXT PRIMARY KEY,
            grid_columns INTEGER NOT NULL,
            widgets TEXT NOT NULL,
            updated_at INTEGER NOT NULL
        )",
        [],
    )
    .map_err(|e| DomainError::Internal(e.to_string()))?;

    Ok(())
}

/// Columns every release of the app expects to find
const REQUIRED_COLUMNS: &[(&str, &[&str])] = &[
    (
        "trackers",
        &[
            "id",
            "name",
            "kind",
            "config",
            "color",
            "icon",
            "is_favorite",
            "is_custom",
            "position",
            "archived",
        ],
    ),
    (
        "entries",
        &[
            "id",
            "tracker_id",
            "value",
            "note",
            "metadata",
            "timestamp",
            "date_str",
        ],
    ),
    ("layouts", &["page", "grid_columns", "widgets", "updated_at"]),
];

/// `table.column` names missing after migrations ran; empty means healthy
fn schema_drift(conn: &Connection) -> Vec<String> {
    let mut missing = Vec::new();
    for (table, columns) in REQUIRED_COLUMNS {
        for column in *columns {
            if !column_exists(conn, table, column) {
                missing.push(format!("{}.{}", table, column));
            }
        }
    }
    missing
}

fn backup_file(db_path: &Path) -> DomainResult<()> {
    if !db_path.is_file() {
        // nothing on disk to preserve (e.g. :memory:)
        return Ok(());
    }
    let backup = db_path.with_extension("drift.bak");
    std::fs::copy(db_path, &backup)
        .map_err(|e| DomainError::Internal(format!("Failed to back up db: {}", e)))?;
    info!("schema repair backup written to {}", backup.display());
    Ok(())
}

fn drop_tables(conn: &Connection, drifted: &[String]) -> DomainResult<()> {
    let mut tables: Vec<&str> = drifted.iter().filter_map(|m| m.split('.').next()).collect();
    tables.dedup();
    for table in tables {
        conn.execute(&format!("DROP TABLE IF EXISTS {}", table), [])
            .map_err(|e| DomainError::Internal(e.to_string()))?;
    }
    Ok(())
}
