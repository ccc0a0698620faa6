//! Entry Repository - Core CRUD Operations
//!
//! SQLite-backed implementation for Entry CRUD plus the tracker- and
//! day-scoped queries the stats engines feed on. The `date_str` day key is
//! enforced at insert time and never recomputed on read.

use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use tokio::sync::Mutex;

use super::traits::Repository;
use crate::domain::{date_str_from_timestamp, DomainError, DomainResult, Entry};

const ENTRY_COLUMNS: &str = "id, tracker_id, value, note, metadata, timestamp, date_str";

/// SQLite implementation of the Entry repository
pub struct EntryRepository {
    pub(super) conn: Arc<Mutex<Connection>>,
}

impl EntryRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Entries of one tracker, newest first, optionally capped
    pub async fn list_by_tracker(
        &self,
        tracker_id: u32,
        limit: Option<u32>,
    ) -> DomainResult<Vec<Entry>> {
        let conn = self.conn.lock().await;
        let query = match limit {
            Some(n) => format!(
                "SELECT {} FROM entries WHERE tracker_id = ? ORDER BY timestamp DESC, id DESC LIMIT {}",
                ENTRY_COLUMNS, n
            ),
            None => format!(
                "SELECT {} FROM entries WHERE tracker_id = ? ORDER BY timestamp DESC, id DESC",
                ENTRY_COLUMNS
            ),
        };
        let mut stmt = conn
            .prepare(&query)
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        let rows = stmt
            .query_map(params![tracker_id], row_to_entry)
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        collect_entries(rows)
    }

    /// Entries between two `YYYY-MM-DD` day keys, inclusive on both ends
    pub async fn list_by_date_range(&self, start: &str, end: &str) -> DomainResult<Vec<Entry>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM entries WHERE date_str >= ? AND date_str <= ? ORDER BY date_str, id",
                ENTRY_COLUMNS
            ))
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        let rows = stmt
            .query_map(params![start, end], row_to_entry)
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        collect_entries(rows)
    }
}

#[async_trait]
impl Repository<Entry> for EntryRepository {
    async fn create(&self, entity: &Entry) -> DomainResult<Entry> {
        let conn = self.conn.lock().await;
        // date_str is fixed from the timestamp here, at write time
        let date_str = if entity.date_str.is_empty() {
            date_str_from_timestamp(entity.timestamp)
        } else {
            entity.date_str.clone()
        };
        conn.execute(
            "INSERT INTO entries (tracker_id, value, note, metadata, timestamp, date_str)
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                entity.tracker_id,
                entity.value,
                entity.note,
                entity.metadata,
                entity.timestamp,
                date_str
            ],
        )
        .map_err(|e| DomainError::Internal(e.to_string()))?;

        let mut created = entity.clone();
        created.id = conn.last_insert_rowid() as u32;
        created.date_str = date_str;
        Ok(created)
    }

    async fn find_by_id(&self, id: u32) -> DomainResult<Option<Entry>> {
        let conn = self.conn.lock().await;
        conn.query_row(
            &format!("SELECT {} FROM entries WHERE id = ?", ENTRY_COLUMNS),
            params![id],
            row_to_entry,
        )
        .optional()
        .map_err(|e| DomainError::Internal(e.to_string()))
    }

    async fn list(&self) -> DomainResult<Vec<Entry>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM entries ORDER BY timestamp DESC, id DESC",
                ENTRY_COLUMNS
            ))
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        let rows = stmt
            .query_map([], row_to_entry)
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        collect_entries(rows)
    }

    async fn update(&self, entity: &Entry) -> DomainResult<Entry> {
        let conn = self.conn.lock().await;
        let changed = conn
            .execute(
                "UPDATE entries SET value = ?, note = ?, metadata = ? WHERE id = ?",
                params![entity.value, entity.note, entity.metadata, entity.id],
            )
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("Entry {}", entity.id)));
        }
        Ok(entity.clone())
    }

    async fn delete(&self, id: u32) -> DomainResult<()> {
        let conn = self.conn.lock().await;
        conn.execute("DELETE FROM entries WHERE id = ?", params![id])
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        Ok(())
    }
}

/// Convert a database row to Entry
fn row_to_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<Entry> {
    Ok(Entry {
        id: row.get(0)?,
        tracker_id: row.get(1)?,
        value: row.get(2)?,
        note: row.get(3)?,
        metadata: row.get(4)?,
        timestamp: row.get(5)?,
        date_str: row.get(6)?,
    })
}

fn collect_entries(
    rows: impl Iterator<Item = rusqlite::Result<Entry>>,
) -> DomainResult<Vec<Entry>> {
    let mut entries = Vec::new();
    for row in rows {
        entries.push(row.map_err(|e| DomainError::Internal(e.to_string()))?);
    }
    Ok(entries)
}
