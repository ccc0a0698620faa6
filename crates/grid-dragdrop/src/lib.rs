//! Grid DragDrop
//!
//! Reusable grid layout engine and drag interaction controller for
//! dashboard widgets. Parameterized by grid dimensions and cell metrics so
//! every dashboard page is a configuration, not a reimplementation.
//! Pure in-memory state; callers own persistence.

pub mod drag;
pub mod engine;
pub mod grid;
pub mod layout;

pub use drag::{
    compute_cell_size, DragController, DragState, DropOutcome, DRAG_THRESHOLD_PX,
    MAX_CELL_SIZE_PX, MIN_CELL_SIZE_PX,
};
pub use engine::LayoutEngine;
pub use grid::{find_overlapping, GridPosition, GridRect, GridSpec, WidgetSize};
pub use layout::{default_layout, reconcile, GridLayout, Widget, DEFAULT_SIZE_CYCLE};
