//! Session-Lebenszyklus: Abbruch und symmetrischer Ressourcen-Teardown.

use crate::app::{AppState, EditSession};
use crate::map::MapSurface;

/// Bricht die aktive Session ab und gibt alle Map-Ressourcen frei.
///
/// Commit-Pfade laufen nach erfolgreicher Persistenz über dieselbe
/// Funktion — Teardown ist für Commit und Abbruch identisch. Im
/// Idle-Zustand ist der Aufruf ein No-op.
pub fn cancel_active(state: &mut AppState, surface: &mut dyn MapSurface) {
    let session = std::mem::take(&mut state.session);
    let label = session.mode_label();

    let resources = match session {
        EditSession::Idle => None,
        EditSession::SelectingPolygon(s) => Some(s.resources),
        EditSession::DrawingLine(s) => Some(s.resources),
        EditSession::SuggestingPaths(s) => Some(s.resources),
        EditSession::Repositioning(s) => Some(s.resources),
    };

    if let Some(mut resources) = resources {
        resources.release_all(surface);
        log::info!(
            "Session beendet: {} (Generation {})",
            label,
            resources.generation()
        );
        // Laufende Requests der beendeten Session fallen ab jetzt am
        // Generation-Check durch.
        state.next_generation();
    }
}
