//! Application Controller für zentrale Event-Verarbeitung.

use super::{AppCommand, AppIntent, AppState};
use crate::error::EditError;
use crate::map::MapSurface;
use crate::services::{DirectionsProvider, PersistenceClient, ProximityService, ServiceEvent};

/// Externe Kollaborateure der Engine, pro Aufruf hereingereicht.
///
/// Die Engine besitzt weder die Surface noch die Services — sie bleiben
/// beim Host und werden nur für die Dauer eines Dispatches ausgeliehen.
pub struct Collaborators<'a> {
    /// Karten-Oberfläche (Overlays, Sichtbarkeit, Hit-Tests)
    pub surface: &'a mut dyn MapSurface,
    /// Nachbarschafts-Suche (asynchron, antwortet per ServiceEvent)
    pub proximity: &'a dyn ProximityService,
    /// Externer Router (asynchron, antwortet per ServiceEvent)
    pub directions: &'a dyn DirectionsProvider,
    /// Persistenz-Backend (synchron)
    pub persistence: &'a dyn PersistenceClient,
}

/// Orchestriert UI-Events und Service-Antworten auf den AppState.
#[derive(Default)]
pub struct AppController;

impl AppController {
    /// Erstellt einen neuen Controller.
    pub fn new() -> Self {
        Self
    }

    /// Verarbeitet einen Intent über Intent->Command Mapping.
    pub fn handle_intent(
        &mut self,
        state: &mut AppState,
        collab: &mut Collaborators<'_>,
        intent: AppIntent,
    ) -> anyhow::Result<()> {
        let commands = super::intent_mapping::map_intent_to_commands(state, intent);
        for command in commands {
            self.handle_command(state, collab, command)?;
        }

        Ok(())
    }

    /// Führt mutierende Commands auf dem AppState aus.
    /// Dispatcht an Feature-Handler in `handlers/`.
    pub fn handle_command(
        &mut self,
        state: &mut AppState,
        collab: &mut Collaborators<'_>,
        command: AppCommand,
    ) -> anyhow::Result<()> {
        state.command_log.record(&command);
        use super::handlers;

        match command {
            // === Polygon-Selektion ===
            AppCommand::EnterPolygonMode => handlers::selection::enter_mode(state, collab),
            AppCommand::AddPolygonVertex { world_pos } => {
                handlers::selection::add_vertex(state, collab, world_pos)
            }
            AppCommand::ClosePolygon => handlers::selection::close_ring(state, collab),
            AppCommand::ResetPolygonRing => handlers::selection::reset_ring(state, collab),

            // === Linien-Zeichnen ===
            AppCommand::StartLine { kind, world_pos } => {
                handlers::line_tool::start(state, collab, kind, world_pos)
            }
            AppCommand::ResumeLine { kind, feature_id } => {
                handlers::line_tool::resume(state, collab, kind, feature_id)
            }
            AppCommand::LineClick { world_pos } => {
                handlers::line_tool::click(state, collab, world_pos)
            }
            AppCommand::UndoLineVertex => handlers::line_tool::undo_vertex(state, collab),
            AppCommand::CommitLine => handlers::line_tool::commit(state, collab),

            // === Routen-Vorschläge ===
            AppCommand::RequestSuggestions { source_feature_id } => {
                handlers::suggestion::request(state, collab, source_feature_id)
            }
            AppCommand::SelectSuggestedPath { candidate_index } => {
                handlers::suggestion::select_path(state, collab, candidate_index)
            }
            AppCommand::CommitSelectedPath => handlers::suggestion::commit(state, collab),

            // === Verschieben ===
            AppCommand::StartReposition {
                feature_id,
                origin_layer,
            } => handlers::reposition::start(state, collab, feature_id, origin_layer),
            AppCommand::StartNewPoint {
                network_type,
                world_pos,
            } => handlers::reposition::start_new(state, collab, network_type, world_pos),
            AppCommand::MoveRepositionDraft { world_pos } => {
                handlers::reposition::move_draft(state, collab, world_pos)
            }
            AppCommand::CommitReposition => handlers::reposition::commit(state, collab),

            // === Session & Takt ===
            AppCommand::CancelSession => handlers::session::cancel_active(state, collab.surface),
            AppCommand::DismissAlert => state.feedback.dismiss_alert(),
            AppCommand::Tick { now_ms } => handlers::suggestion::tick(state, collab, now_ms),
        }

        Ok(())
    }

    /// Verarbeitet eine asynchron eingetroffene Service-Antwort.
    ///
    /// Antworten mit fremder Generation werden kommentarlos verworfen —
    /// das ist der einzige Cancellation-Mechanismus für laufende Requests.
    pub fn handle_service_event(
        &mut self,
        state: &mut AppState,
        collab: &mut Collaborators<'_>,
        event: ServiceEvent,
    ) {
        let active = state.session.generation();

        match event {
            ServiceEvent::NearbyResolved { generation, result } => {
                if active != Some(generation) {
                    let stale = EditError::StaleResponse {
                        expected: active.unwrap_or_default(),
                        got: generation,
                    };
                    log::debug!("Nachbarschafts-Antwort verworfen: {}", stale);
                    return;
                }
                super::handlers::suggestion::on_nearby_resolved(state, collab, result);
            }
            ServiceEvent::RouteResolved {
                generation,
                candidate_index,
                result,
            } => {
                if active != Some(generation) {
                    let stale = EditError::StaleResponse {
                        expected: active.unwrap_or_default(),
                        got: generation,
                    };
                    log::debug!("Routen-Antwort für Kandidat {} verworfen: {}", candidate_index, stale);
                    return;
                }
                super::handlers::suggestion::on_route_resolved(
                    state,
                    collab,
                    candidate_index,
                    result,
                );
            }
        }
    }
}
