//! Drag Interaction Controller
//!
//! Per-frame driver of a pointer gesture: maps pointer deltas to grid
//! coordinates, asks the layout engine for preview feedback, and commits or
//! reverts on release. Uses a movement threshold to distinguish click from
//! drag.

use serde::{Deserialize, Serialize};

use crate::engine::LayoutEngine;
use crate::grid::{GridPosition, GridRect, GridSpec};
use crate::layout::Widget;

/// Movement threshold in pixels to start dragging
pub const DRAG_THRESHOLD_PX: i32 = 5;

/// Cell edge bounds in pixels
pub const MIN_CELL_SIZE_PX: i32 = 40;
pub const MAX_CELL_SIZE_PX: i32 = 80;

/// Cell edge length for the available container size, recomputed whenever
/// the container resizes.
pub fn compute_cell_size(avail_w: f64, avail_h: f64, spec: GridSpec, gap: i32) -> i32 {
    let w = (avail_w - ((spec.cols - 1) * gap) as f64) / spec.cols as f64;
    let h = (avail_h - ((spec.rows - 1) * gap) as f64) / spec.rows as f64;
    (w.min(h).floor() as i32).clamp(MIN_CELL_SIZE_PX, MAX_CELL_SIZE_PX)
}

/// Live preview state during a pointer gesture. Discarded on drop/cancel,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragState {
    pub active_widget_id: String,
    pub preview_position: GridPosition,
    pub is_valid_drop: bool,
    pub will_displace: bool,
}

/// Pointer press that has not yet moved past the threshold
#[derive(Debug, Clone)]
struct PendingDrag {
    widget_id: String,
    start_x: i32,
    start_y: i32,
}

/// Outcome of releasing the pointer
#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    /// No drag was active; the press was a plain click
    Click,
    /// The layout changed; the returned widget set should be persisted
    Committed(Vec<Widget>),
    /// Invalid drop; the layout is unchanged
    Reverted,
}

/// Stateful gesture controller over an owned widget snapshot.
///
/// Gesture lifecycle: `on_pointer_down` records a pending press,
/// `on_pointer_move` activates the drag past `DRAG_THRESHOLD_PX` and updates
/// the preview each frame, `on_pointer_up` commits or reverts, `cancel`
/// always reverts.
pub struct DragController {
    engine: LayoutEngine,
    cell_size: i32,
    gap: i32,
    widgets: Vec<Widget>,
    pending: Option<PendingDrag>,
    drag: Option<DragState>,
}

impl DragController {
    pub fn new(spec: GridSpec, cell_size: i32, gap: i32, widgets: Vec<Widget>) -> Self {
        Self {
            engine: LayoutEngine::new(spec),
            cell_size,
            gap,
            widgets,
            pending: None,
            drag: None,
        }
    }

    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    pub fn drag_state(&self) -> Option<&DragState> {
        self.drag.as_ref()
    }

    /// Replace the snapshot after an external reload. Ignored mid-gesture.
    pub fn set_widgets(&mut self, widgets: Vec<Widget>) {
        if self.pending.is_none() && self.drag.is_none() {
            self.widgets = widgets;
        }
    }

    /// Container resized
    pub fn set_cell_size(&mut self, cell_size: i32) {
        self.cell_size = cell_size;
    }

    /// Record a pending press on a visible widget
    pub fn on_pointer_down(&mut self, widget_id: &str, x: i32, y: i32) {
        if self.drag.is_some() {
            return;
        }
        if !self.widgets.iter().any(|w| w.id == widget_id && w.visible) {
            return;
        }
        self.pending = Some(PendingDrag {
            widget_id: widget_id.to_string(),
            start_x: x,
            start_y: y,
        });
    }

    /// Recompute the preview from the current pointer position. Returns the
    /// updated state once the gesture is past the threshold.
    pub fn on_pointer_move(&mut self, x: i32, y: i32) -> Option<&DragState> {
        let pending = self.pending.clone()?;
        if self.drag.is_none() {
            let dx = (x - pending.start_x).abs();
            let dy = (y - pending.start_y).abs();
            if dx <= DRAG_THRESHOLD_PX && dy <= DRAG_THRESHOLD_PX {
                return None;
            }
        }

        let widget = self
            .widgets
            .iter()
            .find(|w| w.id == pending.widget_id)?
            .clone();
        let preview = self.preview_position(&widget, &pending, x, y);
        let rect = GridRect::new(preview, widget.size);

        let (is_valid_drop, will_displace) = if self
            .engine
            .spec
            .is_valid_position(&self.widgets, &rect, Some(&widget.id))
        {
            (true, false)
        } else if self
            .engine
            .relocate_widgets(&self.widgets, &widget.id, preview)
            .is_some()
        {
            (true, true)
        } else {
            (false, false)
        };

        self.drag = Some(DragState {
            active_widget_id: widget.id,
            preview_position: preview,
            is_valid_drop,
            will_displace,
        });
        self.drag.as_ref()
    }

    /// Release the pointer: commit a valid drop, revert otherwise. A press
    /// that never passed the threshold falls through as a click.
    pub fn on_pointer_up(&mut self) -> DropOutcome {
        self.pending = None;
        let Some(drag) = self.drag.take() else {
            return DropOutcome::Click;
        };
        if !drag.is_valid_drop {
            return DropOutcome::Reverted;
        }
        match self.engine.relocate_widgets(
            &self.widgets,
            &drag.active_widget_id,
            drag.preview_position,
        ) {
            Some(updated) => {
                self.widgets = updated.clone();
                DropOutcome::Committed(updated)
            }
            None => DropOutcome::Reverted,
        }
    }

    /// Abort the gesture without committing, regardless of validity
    pub fn cancel(&mut self) {
        self.pending = None;
        self.drag = None;
    }

    /// Original pixel position plus cumulative delta, snapped to the nearest
    /// cell and clamped so the full rect stays in bounds
    fn preview_position(
        &self,
        widget: &Widget,
        pending: &PendingDrag,
        x: i32,
        y: i32,
    ) -> GridPosition {
        let step = self.cell_size + self.gap;
        let px = widget.position.x * step + (x - pending.start_x);
        let py = widget.position.y * step + (y - pending.start_y);
        let gx = (px as f64 / step as f64).round() as i32;
        let gy = (py as f64 / step as f64).round() as i32;
        GridPosition {
            x: gx.clamp(0, (self.engine.spec.cols - widget.size.width).max(0)),
            y: gy.clamp(0, (self.engine.spec.rows - widget.size.height).max(0)),
        }
    }
}
