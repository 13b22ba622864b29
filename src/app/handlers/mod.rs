//! Feature-Handler: führen Commands auf dem AppState aus und verbuchen
//! alle Map-Effekte über die `SessionResources` der aktiven Session.

pub mod line_tool;
pub mod reposition;
pub mod selection;
pub mod session;
pub mod suggestion;
