//! Tracker Positioning Operations
//!
//! Sortable-list order management for the tracker list page: position is a
//! plain index, not geometry.

use async_trait::async_trait;
use rusqlite::params;

use crate::domain::{DomainError, DomainResult};

/// Trait for tracker positioning operations
#[async_trait]
pub trait TrackerPositioningOperations {
    /// Next free position at the end of the list (used in create)
    async fn next_position(&self) -> DomainResult<i32>;

    /// Reindex all trackers to be sequential (0, 1, 2, ...)
    async fn reindex(&self) -> DomainResult<()>;

    /// Move a tracker to a new list index, shifting its neighbors
    async fn move_to(&self, id: u32, position: i32) -> DomainResult<()>;
}

#[async_trait]
impl TrackerPositioningOperations for super::tracker_repo::TrackerRepository {
    async fn next_position(&self) -> DomainResult<i32> {
        let conn = self.conn.lock().await;
        conn.query_row(
            "SELECT COALESCE(MAX(position), -1) + 1 FROM trackers",
            [],
            |row| row.get(0),
        )
        .map_err(|e| DomainError::Internal(e.to_string()))
    }

    async fn reindex(&self) -> DomainResult<()> {
        let conn = self.conn.lock().await;
        let ids = ordered_ids(&conn)?;
        write_positions(&conn, &ids)
    }

    async fn move_to(&self, id: u32, position: i32) -> DomainResult<()> {
        let conn = self.conn.lock().await;
        let mut ids = ordered_ids(&conn)?;
        let Some(from) = ids.iter().position(|&other| other == id) else {
            return Err(DomainError::NotFound(format!("Tracker {}", id)));
        };
        ids.remove(from);
        let to = position.clamp(0, ids.len() as i32) as usize;
        ids.insert(to, id);
        write_positions(&conn, &ids)
    }
}

fn ordered_ids(conn: &rusqlite::Connection) -> DomainResult<Vec<u32>> {
    let mut stmt = conn
        .prepare("SELECT id FROM trackers ORDER BY position, id")
        .map_err(|e| DomainError::Internal(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| row.get::<_, u32>(0))
        .map_err(|e| DomainError::Internal(e.to_string()))?;

    let mut ids = Vec::new();
    for row in rows {
        ids.push(row.map_err(|e| DomainError::Internal(e.to_string()))?);
    }
    Ok(ids)
}

fn write_positions(conn: &rusqlite::Connection, ids: &[u32]) -> DomainResult<()> {
    for (new_pos, id) in ids.iter().enumerate() {
        conn.execute(
            "UPDATE trackers SET position = ? WHERE id = ?",
            params![new_pos as i32, *id],
        )
        .map_err(|e| DomainError::Internal(e.to_string()))?;
    }
    Ok(())
}
