//! Habit Board Backend
//!
//! Layered architecture:
//! - domain: Core entities and business rules
//! - repository: Data access abstractions and implementations
//! - stats: Streak and aggregate computations
//! - insights: Correlation engine with cancellation-by-supersession
//! - state: Injectable application state for the UI shell
//!
//! Grid geometry, the layout engine, and the drag interaction controller
//! live in the `grid-dragdrop` workspace crate.

pub mod domain;
pub mod insights;
pub mod repository;
pub mod state;
pub mod stats;

pub use state::{AppState, Dialog, UiState};
