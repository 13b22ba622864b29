//! Application-Layer: Controller, State, Events und Editier-Engines.

pub mod command_log;
pub mod controller;
pub mod events;
pub mod handlers;
mod intent_mapping;
/// Application State und Session-Verwaltung
///
/// Dieses Modul hält die Tagged Union der Editier-Modi und den
/// Generation-Zähler für die Request-Invalidierung.
pub mod state;
pub mod tools;

pub use command_log::CommandLog;
pub use controller::{AppController, Collaborators};
pub use events::{AppCommand, AppIntent};
pub use state::{AppState, EditSession, UiFeedback};
