//! Reiner Lese-Schnitt über den AppState für Statuszeile und Panels.
//!
//! Der Snapshot ist ein reines Datenobjekt ohne Referenzen in den State —
//! der Host darf ihn über den nächsten Dispatch hinaus behalten.

use crate::app::tools::RepositionTarget;
use crate::app::{AppState, EditSession};

/// Fortschritts-Zeile eines Vorschlags-Pfads.
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionRow {
    /// Kandidaten-Index
    pub candidate_index: usize,
    /// Gesamtdistanz in Metern
    pub total_m: f64,
    /// Reveal-Fortschritt in [0, 1]
    pub reveal_progress: f64,
    /// Ob dieser Pfad ausgewählt ist
    pub selected: bool,
}

/// Momentaufnahme des App-Zustands für die Anzeige.
#[derive(Debug, Clone, Default)]
pub struct ViewSnapshot {
    /// Modus-Label der aktiven Session
    pub mode: String,
    /// Einzeilige Statusbeschreibung
    pub status_text: String,
    /// Vertex-Anzahl des Linien-Drafts (0 außerhalb des Zeichnen-Modus)
    pub line_vertex_count: usize,
    /// Abgeleitete Linien-Länge in Metern
    pub line_length_m: f64,
    /// Ob der aktuelle Linien-Draft committbar ist
    pub line_can_commit: bool,
    /// Selektions-Zählung pro Gruppe (Source-ID, Anzahl)
    pub selection_groups: Vec<(String, usize)>,
    /// Vorschlags-Pfade mit Fortschritt
    pub suggestions: Vec<SuggestionRow>,
    /// Verschiebungs-Distanz des Reposition-Drafts in Metern
    pub reposition_displacement_m: Option<f64>,
    /// Blockierender Hinweis
    pub alert: Option<String>,
    /// Nicht-blockierende Notizen
    pub notices: Vec<String>,
}

/// Baut den Snapshot aus dem aktuellen AppState.
pub fn build(state: &AppState) -> ViewSnapshot {
    let mut snapshot = ViewSnapshot {
        mode: state.session.mode_label().to_string(),
        alert: state.feedback.alert.clone(),
        notices: state.feedback.notices.clone(),
        ..ViewSnapshot::default()
    };

    match &state.session {
        EditSession::Idle => {
            snapshot.status_text = "Bereit".to_string();
        }
        EditSession::SelectingPolygon(poly) => {
            snapshot.selection_groups = poly.selection.group_counts();
            snapshot.status_text = if poly.closed {
                format!("{} Features selektiert", poly.selection.total_count())
            } else {
                format!("Ring offen: {} Eckpunkte", poly.ring.len())
            };
        }
        EditSession::DrawingLine(line) => {
            snapshot.line_vertex_count = line.engine.draft.vertices.len();
            snapshot.line_length_m = line.engine.total_length_m();
            snapshot.line_can_commit = line
                .engine
                .validate_commit(state.options.endpoint_tolerance_m)
                .is_ok();
            snapshot.status_text = format!(
                "{}: {} Punkte, {:.1} m",
                line.engine.draft.kind.label(),
                snapshot.line_vertex_count,
                snapshot.line_length_m
            );
        }
        EditSession::SuggestingPaths(suggest) => {
            snapshot.suggestions = suggest
                .paths
                .iter()
                .map(|path| SuggestionRow {
                    candidate_index: path.candidate_index,
                    total_m: path.total_m,
                    reveal_progress: path.reveal.progress_at(state.now_ms),
                    selected: suggest.selected == Some(path.candidate_index),
                })
                .collect();
            snapshot.status_text = if suggest.awaiting_candidates {
                "Suche Kandidaten …".to_string()
            } else {
                format!(
                    "{} Pfade, {} offen, {} fehlgeschlagen",
                    suggest.paths.len(),
                    suggest.pending_routes,
                    suggest.failures.len()
                )
            };
        }
        EditSession::Repositioning(repo) => {
            let displacement = repo.draft.displacement_m();
            snapshot.reposition_displacement_m = Some(displacement);
            snapshot.status_text = match &repo.draft.target {
                RepositionTarget::Existing { feature_id, .. } => {
                    format!("Feature {} verschieben: {:.1} m", feature_id, displacement)
                }
                RepositionTarget::New => format!(
                    "Neuen Punkt ({}) platzieren",
                    repo.draft.network_type.label()
                ),
            };
        }
    }

    snapshot
}
