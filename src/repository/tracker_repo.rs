//! Tracker Repository - Core CRUD Operations
//!
//! SQLite-backed implementation for Tracker CRUD and search.
//! Sortable-list order management lives in tracker_positioning.

use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use tokio::sync::Mutex;

use super::traits::{Repository, SearchableRepository};
use crate::domain::{DomainError, DomainResult, Tracker, TrackerKind};

const TRACKER_COLUMNS: &str =
    "id, name, kind, config, color, icon, is_favorite, is_custom, position, archived";

/// SQLite implementation of the Tracker repository
pub struct TrackerRepository {
    pub(super) conn: Arc<Mutex<Connection>>,
}

impl TrackerRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Non-archived trackers in sortable-list order
    pub async fn list_active(&self) -> DomainResult<Vec<Tracker>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM trackers WHERE archived = 0 ORDER BY position, id",
                TRACKER_COLUMNS
            ))
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        let rows = stmt
            .query_map([], row_to_tracker)
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        collect_trackers(rows)
    }
}

#[async_trait]
impl Repository<Tracker> for TrackerRepository {
    async fn create(&self, entity: &Tracker) -> DomainResult<Tracker> {
        let conn = self.conn.lock().await;
        let config = serde_json::to_string(&entity.config)
            .map_err(|e| DomainError::InvalidInput(e.to_string()))?;
        conn.execute(
            "INSERT INTO trackers (name, kind, config, color, icon, is_favorite, is_custom, position, archived)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                entity.name,
                entity.kind.as_str(),
                config,
                entity.color,
                entity.icon,
                entity.is_favorite,
                entity.is_custom,
                entity.position,
                entity.archived
            ],
        )
        .map_err(|e| DomainError::Internal(e.to_string()))?;

        let mut created = entity.clone();
        created.id = conn.last_insert_rowid() as u32;
        Ok(created)
    }

    async fn find_by_id(&self, id: u32) -> DomainResult<Option<Tracker>> {
        let conn = self.conn.lock().await;
        conn.query_row(
            &format!("SELECT {} FROM trackers WHERE id = ?", TRACKER_COLUMNS),
            params![id],
            row_to_tracker,
        )
        .optional()
        .map_err(|e| DomainError::Internal(e.to_string()))
    }

    async fn list(&self) -> DomainResult<Vec<Tracker>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM trackers ORDER BY position, id",
                TRACKER_COLUMNS
            ))
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        let rows = stmt
            .query_map([], row_to_tracker)
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        collect_trackers(rows)
    }

    async fn update(&self, entity: &Tracker) -> DomainResult<Tracker> {
        let conn = self.conn.lock().await;
        let config = serde_json::to_string(&entity.config)
            .map_err(|e| DomainError::InvalidInput(e.to_string()))?;
        let changed = conn
            .execute(
                "UPDATE trackers SET name = ?, kind = ?, config = ?, color = ?, icon = ?,
                 is_favorite = ?, is_custom = ?, position = ?, archived = ? WHERE id = ?",
                params![
                    entity.name,
                    entity.kind.as_str(),
                    config,
                    entity.color,
                    entity.icon,
                    entity.is_favorite,
                    entity.is_custom,
                    entity.position,
                    entity.archived,
                    entity.id
                ],
            )
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("Tracker {}", entity.id)));
        }
        Ok(entity.clone())
    }

    async fn delete(&self, id: u32) -> DomainResult<()> {
        let conn = self.conn.lock().await;
        // Manual cascade: a tracker's entries go with it
        conn.execute("DELETE FROM entries WHERE tracker_id = ?", params![id])
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        conn.execute("DELETE FROM trackers WHERE id = ?", params![id])
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl SearchableRepository<Tracker> for TrackerRepository {
    async fn search(&self, query: &str) -> DomainResult<Vec<Tracker>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM trackers WHERE name LIKE ? ORDER BY position, id",
                TRACKER_COLUMNS
            ))
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        let pattern = format!("%{}%", query);
        let rows = stmt
            .query_map(params![pattern], row_to_tracker)
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        collect_trackers(rows)
    }
}

/// Convert a database row to Tracker
fn row_to_tracker(row: &rusqlite::Row<'_>) -> rusqlite::Result<Tracker> {
    let kind: String = row.get(2)?;
    let config: String = row.get(3)?;
    Ok(Tracker {
        id: row.get(0)?,
        name: row.get(1)?,
        kind: TrackerKind::from_str(&kind),
        config: serde_json::from_str(&config).unwrap_or_default(),
        color: row.get(4)?,
        icon: row.get(5)?,
        is_favorite: row.get(6)?,
        is_custom: row.get(7)?,
        position: row.get(8)?,
        archived: row.get(9)?,
    })
}

fn collect_trackers(
    rows: impl Iterator<Item = rusqlite::Result<Tracker>>,
) -> DomainResult<Vec<Tracker>> {
    let mut trackers = Vec::new();
    for row in rows {
        trackers.push(row.map_err(|e| DomainError::Internal(e.to_string()))?);
    }
    Ok(trackers)
}
