//! Widget Layout Model
//!
//! Placed widgets, the persisted layout, default generation, and
//! reconciliation of a saved layout against the live tracker set.

use serde::{Deserialize, Serialize};

use crate::grid::{GridPosition, GridRect, GridSpec, WidgetSize};

/// A placed, sized rectangle on the dashboard grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    /// Stable identifier, unique within a layout
    pub id: String,
    pub size: WidgetSize,
    pub position: GridPosition,
    /// Hidden widgets are excluded from collision/placement logic but
    /// retained in the stored layout so they can be restored later
    pub visible: bool,
}

impl Widget {
    pub fn new(id: impl Into<String>, size: WidgetSize, position: GridPosition) -> Self {
        Self {
            id: id.into(),
            size,
            position,
            visible: true,
        }
    }

    pub fn rect(&self) -> GridRect {
        GridRect::new(self.position, self.size)
    }
}

/// Preset footprints cycled through when widgets get a default size
pub const DEFAULT_SIZE_CYCLE: [WidgetSize; 3] = [
    WidgetSize { width: 2, height: 2 },
    WidgetSize { width: 2, height: 1 },
    WidgetSize { width: 1, height: 1 },
];

/// The persisted dashboard layout. The widget array is the unit of
/// persistence; order carries no meaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridLayout {
    pub widgets: Vec<Widget>,
    pub grid_columns: i32,
    /// Epoch millis, stamped by the store on save
    pub updated_at: i64,
}

impl GridLayout {
    pub fn new(widgets: Vec<Widget>, grid_columns: i32) -> Self {
        Self {
            widgets,
            grid_columns,
            updated_at: 0,
        }
    }
}

/// Deterministic default layout: each id takes the next footprint from
/// `DEFAULT_SIZE_CYCLE` and the first free row-major slot.
pub fn default_layout(spec: GridSpec, widget_ids: &[String]) -> GridLayout {
    let mut widgets: Vec<Widget> = Vec::with_capacity(widget_ids.len());
    for (i, id) in widget_ids.iter().enumerate() {
        widgets.push(place_next(spec, &widgets, id, i));
    }
    GridLayout::new(widgets, spec.cols)
}

/// Merge a saved layout with the live tracker set: widgets whose tracker is
/// gone are dropped, trackers without a widget are appended at the next free
/// slot with the default size-cycle. Hidden widgets for live trackers
/// survive untouched.
pub fn reconcile(spec: GridSpec, saved: &GridLayout, live_ids: &[String]) -> GridLayout {
    let mut widgets: Vec<Widget> = saved
        .widgets
        .iter()
        .filter(|w| live_ids.contains(&w.id))
        .cloned()
        .collect();

    for (i, id) in live_ids.iter().enumerate() {
        if widgets.iter().any(|w| &w.id == id) {
            continue;
        }
        widgets.push(place_next(spec, &widgets, id, i));
    }

    GridLayout {
        widgets,
        grid_columns: spec.cols,
        updated_at: saved.updated_at,
    }
}

fn place_next(spec: GridSpec, placed: &[Widget], id: &str, cycle_index: usize) -> Widget {
    let size = DEFAULT_SIZE_CYCLE[cycle_index % DEFAULT_SIZE_CYCLE.len()];
    match spec.first_available_position(placed, size, &[]) {
        Some(position) => Widget::new(id, size, position),
        // grid full: keep the tracker in the layout, hidden
        None => Widget {
            id: id.to_string(),
            size,
            position: GridPosition { x: 0, y: 0 },
            visible: false,
        },
    }
}
