//! Mapping von UI-Intents auf mutierende App-Commands.

use super::{AppCommand, AppIntent, AppState, EditSession};

/// Übersetzt einen `AppIntent` in eine Sequenz ausführbarer `AppCommand`s.
pub fn map_intent_to_commands(state: &AppState, intent: AppIntent) -> Vec<AppCommand> {
    match intent {
        // Klick-Dispatch: die Bedeutung eines Kartenklicks hängt am Modus
        AppIntent::MapClicked { world_pos } => match &state.session {
            EditSession::SelectingPolygon(poly) if !poly.closed => {
                vec![AppCommand::AddPolygonVertex { world_pos }]
            }
            EditSession::SelectingPolygon(_) => Vec::new(),
            EditSession::DrawingLine(_) => vec![AppCommand::LineClick { world_pos }],
            EditSession::Repositioning(_) => {
                vec![AppCommand::MoveRepositionDraft { world_pos }]
            }
            // Pfad-Auswahl läuft über PathClicked, nicht über rohe Klicks
            EditSession::SuggestingPaths(_) => Vec::new(),
            EditSession::Idle => Vec::new(),
        },

        AppIntent::PolygonModeRequested => vec![AppCommand::EnterPolygonMode],
        AppIntent::PolygonClosed => vec![AppCommand::ClosePolygon],
        AppIntent::PolygonDeleteRequested => vec![AppCommand::ResetPolygonRing],

        AppIntent::LineStartRequested { kind, world_pos } => {
            vec![AppCommand::StartLine { kind, world_pos }]
        }
        AppIntent::LineResumeRequested { kind, feature_id } => {
            vec![AppCommand::ResumeLine { kind, feature_id }]
        }
        AppIntent::LineUndoRequested => vec![AppCommand::UndoLineVertex],
        AppIntent::LineCommitRequested => vec![AppCommand::CommitLine],

        AppIntent::SuggestRequested { source_feature_id } => {
            vec![AppCommand::RequestSuggestions { source_feature_id }]
        }
        AppIntent::PathClicked { candidate_index } => {
            vec![AppCommand::SelectSuggestedPath { candidate_index }]
        }
        AppIntent::SuggestCommitRequested => vec![AppCommand::CommitSelectedPath],

        AppIntent::RepositionRequested {
            feature_id,
            origin_layer,
        } => vec![AppCommand::StartReposition {
            feature_id,
            origin_layer,
        }],
        AppIntent::NewPointRequested {
            network_type,
            world_pos,
        } => vec![AppCommand::StartNewPoint {
            network_type,
            world_pos,
        }],
        AppIntent::RepositionCommitRequested => vec![AppCommand::CommitReposition],

        AppIntent::CancelRequested => vec![AppCommand::CancelSession],
        AppIntent::AlertDismissed => vec![AppCommand::DismissAlert],
        AppIntent::AnimationTick { now_ms } => vec![AppCommand::Tick { now_ms }],
    }
}
