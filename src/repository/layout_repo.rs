//! Layout Repository
//!
//! Persists each page's widget layout as a single row. The full widget
//! array is the unit of persistence: one JSON column, no field-level
//! writes.

use std::sync::Arc;

use grid_dragdrop::GridLayout;
use rusqlite::{params, Connection, OptionalExtension};
use tokio::sync::Mutex;

use crate::domain::{DomainError, DomainResult};

/// SQLite implementation of the layout store
pub struct LayoutRepository {
    pub(super) conn: Arc<Mutex<Connection>>,
}

impl LayoutRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// `None` means "never saved", distinct from a saved empty layout
    pub async fn load(&self, page: &str) -> DomainResult<Option<GridLayout>> {
        let conn = self.conn.lock().await;
        let row = conn
            .query_row(
                "SELECT grid_columns, widgets, updated_at FROM layouts WHERE page = ?",
                params![page],
                |row| {
                    Ok((
                        row.get::<_, i32>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, i64>(2)?,
                    ))
                },
            )
            .optional()
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        match row {
            Some((grid_columns, widgets_json, updated_at)) => {
                let widgets = serde_json::from_str(&widgets_json)
                    .map_err(|e| DomainError::Internal(format!("Corrupt layout: {}", e)))?;
                Ok(Some(GridLayout {
                    widgets,
                    grid_columns,
                    updated_at,
                }))
            }
            None => Ok(None),
        }
    }

    /// Upsert the full widget array, stamping `updated_at`
    pub async fn save(&self, page: &str, layout: &GridLayout) -> DomainResult<GridLayout> {
        let conn = self.conn.lock().await;
        let widgets_json = serde_json::to_string(&layout.widgets)
            .map_err(|e| DomainError::InvalidInput(e.to_string()))?;
        let updated_at = chrono::Utc::now().timestamp_millis();
        conn.execute(
            "INSERT OR REPLACE INTO layouts (page, grid_columns, widgets, updated_at)
             VALUES (?, ?, ?, ?)",
            params![page, layout.grid_columns, widgets_json, updated_at],
        )
        .map_err(|e| DomainError::Internal(e.to_string()))?;

        Ok(GridLayout {
            widgets: layout.widgets.clone(),
            grid_columns: layout.grid_columns,
            updated_at,
        })
    }
}
