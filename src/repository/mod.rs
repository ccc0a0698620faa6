//! Repository Layer
//!
//! Data access abstractions and SQLite implementations.

mod db;
mod entry_repo;
mod layout_repo;
mod tracker_positioning;
mod tracker_repo;
mod traits;


pub use db::{init_db, DbState, SchemaRepair};
pub use entry_repo::EntryRepository;
pub use layout_repo::LayoutRepository;
pub use tracker_positioning::TrackerPositioningOperations;
pub use tracker_repo::TrackerRepository;
pub use traits::{Repository, SearchableRepository};
