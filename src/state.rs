//! Application State
//!
//! Explicit, injectable state shared across the UI shell: repositories,
//! the correlation session, and the ambient UI state. No module-level
//! singletons, so the engines stay unit-testable without bootstrapping a
//! shell.

use chrono::NaiveDate;
use grid_dragdrop::{default_layout, reconcile, GridLayout, GridSpec, Widget};
use log::debug;
use tokio::sync::Mutex;

use crate::domain::DomainResult;
use crate::insights::{self, CorrelationConfig, CorrelationResult, ImpactSession};
use crate::repository::{DbState, EntryRepository, LayoutRepository, TrackerRepository};

/// Dialogs the shell can have open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialog {
    NewTracker,
    EditTracker,
    NewEntry,
    Impact,
}

/// Ambient UI state, passed to components instead of living in a global
#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub active_tracker_id: Option<u32>,
    pub selected_date: Option<NaiveDate>,
    pub open_dialog: Option<Dialog>,
}

/// Application state shared across the UI shell
pub struct AppState {
    pub db: DbState,
    pub trackers: TrackerRepository,
    pub entries: EntryRepository,
    pub layouts: LayoutRepository,
    pub impact: ImpactSession,
    pub correlation: CorrelationConfig,
    pub ui: Mutex<UiState>,
}

impl AppState {
    pub fn new(db: DbState) -> Self {
        Self {
            trackers: TrackerRepository::new(db.connection()),
            entries: EntryRepository::new(db.connection()),
            layouts: LayoutRepository::new(db.connection()),
            impact: ImpactSession::new(),
            correlation: CorrelationConfig::default(),
            ui: Mutex::new(UiState::default()),
            db,
        }
    }

    /// The dashboard layout for a page: the saved layout reconciled with
    /// the live tracker set, or the generated default when nothing was
    /// ever saved (a saved empty layout stays empty)
    pub async fn dashboard_layout(&self, page: &str, spec: GridSpec) -> DomainResult<GridLayout> {
        let live: Vec<String> = self
            .trackers
            .list_active()
            .await?
            .iter()
            .map(|t| t.id.to_string())
            .collect();
        match self.layouts.load(page).await? {
            Some(saved) => Ok(reconcile(spec, &saved, &live)),
            None => Ok(default_layout(spec, &live)),
        }
    }

    /// Persist a committed drag as the full widget array
    pub async fn commit_layout(
        &self,
        page: &str,
        spec: GridSpec,
        widgets: Vec<Widget>,
    ) -> DomainResult<GridLayout> {
        self.layouts
            .save(page, &GridLayout::new(widgets, spec.cols))
            .await
    }

    /// Impact calculation with cancellation-by-supersession: when a newer
    /// request begins before this one finishes, the stale result is
    /// dropped as `Ok(None)`, never surfaced as an error.
    pub async fn calculate_impact(
        &self,
        source_tracker_id: u32,
        target_tracker_id: u32,
        offset_days: i64,
    ) -> DomainResult<Option<CorrelationResult>> {
        let token = self.impact.begin();

        let source = self.entries.list_by_tracker(source_tracker_id, None).await?;
        if !token.is_current() {
            debug!("impact request superseded mid-fetch, dropping");
            return Ok(None);
        }
        let target = self.entries.list_by_tracker(target_tracker_id, None).await?;

        let result = insights::calculate_impact(
            source_tracker_id,
            target_tracker_id,
            &source,
            &target,
            offset_days,
            &self.correlation,
        );
        if !token.is_current() {
            debug!("impact request superseded, dropping result");
            return Ok(None);
        }
        Ok(Some(result))
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;

    use super::*;
    use crate::domain::{Entry, Tracker, TrackerKind};
    use crate::repository::{init_db, Repository, SchemaRepair};

    async fn setup_state() -> Arc<AppState> {
        let db = init_db(Path::new(":memory:"), SchemaRepair::BlockStartup)
            .await
            .expect("Failed to init test DB");
        Arc::new(AppState::new(db))
    }

    #[tokio::test]
    async fn test_dashboard_layout_defaults_then_reconciles() {
        let state = setup_state().await;
        let spec = GridSpec::DASHBOARD;

        let water = state
            .trackers
            .create(&Tracker::new(0, "Water".to_string(), TrackerKind::Counter))
            .await
            .unwrap();

        // nothing saved yet: generated default
        let layout = state.dashboard_layout("dashboard", spec).await.unwrap();
        assert_eq!(layout.widgets.len(), 1);
        assert_eq!(layout.widgets[0].id, water.id.to_string());

        state
            .commit_layout("dashboard", spec, layout.widgets.clone())
            .await
            .unwrap();

        // a tracker added after the save gets appended on load
        state
            .trackers
            .create(&Tracker::new(0, "Sleep".to_string(), TrackerKind::Rating))
            .await
            .unwrap();
        let merged = state.dashboard_layout("dashboard", spec).await.unwrap();
        assert_eq!(merged.widgets.len(), 2);
    }

    #[tokio::test]
    async fn test_commit_layout_round_trips() {
        let state = setup_state().await;
        let spec = GridSpec::DASHBOARD;
        let tracker = state
            .trackers
            .create(&Tracker::new(0, "Water".to_string(), TrackerKind::Counter))
            .await
            .unwrap();

        let mut layout = state.dashboard_layout("dashboard", spec).await.unwrap();
        layout.widgets[0].position = grid_dragdrop::GridPosition { x: 4, y: 3 };
        state
            .commit_layout("dashboard", spec, layout.widgets.clone())
            .await
            .unwrap();

        let reloaded = state.dashboard_layout("dashboard", spec).await.unwrap();
        let widget = reloaded
            .widgets
            .iter()
            .find(|w| w.id == tracker.id.to_string())
            .unwrap();
        assert_eq!(widget.position, grid_dragdrop::GridPosition { x: 4, y: 3 });
    }

    #[tokio::test]
    async fn test_impact_result_returned_when_not_superseded() {
        let state = setup_state().await;
        for day in ["2024-01-01", "2024-01-02"] {
            let mut e = Entry::new(0, 1, Some(1.0), 0);
            e.date_str = day.to_string();
            state.entries.create(&e).await.unwrap();
            let mut t = Entry::new(0, 2, Some(2.0), 0);
            t.date_str = day.to_string();
            state.entries.create(&t).await.unwrap();
        }

        let result = state.calculate_impact(1, 2, 0).await.unwrap();
        assert!(result.is_some());
        assert_eq!(result.unwrap().triggered_days, 2);
    }

    #[tokio::test]
    async fn test_superseded_impact_result_is_dropped() {
        let state = setup_state().await;

        // hold the connection so the first request parks on the fetch
        let conn = state.db.connection();
        let guard = conn.lock().await;

        let first = {
            let state = Arc::clone(&state);
            tokio::spawn(async move { state.calculate_impact(1, 2, 0).await })
        };
        // let the first request begin and park
        tokio::task::yield_now().await;

        // a newer request supersedes it
        state.impact.begin();
        drop(guard);

        let result = first.await.expect("task").expect("not an error");
        assert!(result.is_none());

        // the next request is current again and completes
        let fresh = state.calculate_impact(1, 2, 0).await.unwrap();
        assert!(fresh.is_some());
    }
}
