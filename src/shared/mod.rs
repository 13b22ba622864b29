//! Geteilte Typen: Laufzeit-Optionen und View-Snapshot.

pub mod options;
pub mod view_snapshot;

pub use options::PlannerOptions;
pub use view_snapshot::{SuggestionRow, ViewSnapshot};
