//! Fehler-Taxonomie der Editing-Engine.
//!
//! Vier Klassen mit unterschiedlicher Behandlung:
//! - `Validation`: lokal abgelehnte Transition, blockierender Hinweis, Draft bleibt erhalten.
//! - `Network`: pro Request isoliert, nicht-blockierende Notiz, Zustand bleibt für Retry erhalten.
//! - `StaleResponse`: Antwort nach Moduswechsel — wird am Generation-Check verworfen, nie angezeigt.
//! - `ResourceConflict`: Operation kollidiert mit noch laufenden Requests derselben Session.

/// Fehler der Editing-Engine.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EditError {
    /// Abgelehnte Zustandstransition (z.B. Commit ohne End-Anker).
    #[error("Validierung fehlgeschlagen: {0}")]
    Validation(String),

    /// Fehlgeschlagener Aufruf eines externen Kollaborateurs.
    #[error("Netzwerkfehler: {0}")]
    Network(String),

    /// Antwort mit veralteter Session-Generation.
    #[error("Veraltete Antwort: Generation {got}, aktiv ist {expected}")]
    StaleResponse {
        /// Aktive Session-Generation
        expected: u64,
        /// Generation der eingetroffenen Antwort
        got: u64,
    },

    /// Operation kollidiert mit noch offenen Requests der aktiven Session.
    #[error("Ressourcen-Konflikt: {0}")]
    ResourceConflict(String),
}

impl EditError {
    /// Gibt `true` zurück wenn der Fehler als blockierender Hinweis angezeigt werden soll.
    pub fn is_blocking(&self) -> bool {
        matches!(self, EditError::Validation(_) | EditError::ResourceConflict(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocking_split_follows_error_class() {
        assert!(EditError::Validation("zu kurz".into()).is_blocking());
        assert!(EditError::ResourceConflict("Request offen".into()).is_blocking());
        assert!(!EditError::Network("Timeout".into()).is_blocking());
        assert!(!EditError::StaleResponse { expected: 2, got: 1 }.is_blocking());
    }
}
