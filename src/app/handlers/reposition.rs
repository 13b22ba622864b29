//! Handler für das Verschieben von Punkt-Features und das Platzieren
//! neuer Punkte.

use glam::DVec2;

use super::session;
use crate::app::state::RepositionState;
use crate::app::tools::{RepositionDraft, RepositionPayload};
use crate::app::{AppState, Collaborators, EditSession};
use crate::core::NetworkType;
use crate::map::{OverlayGeometry, OverlayStyle, SessionResources};

/// Startet eine Verschiebe-Session: Origin-Layer ausblenden, Marker zeigen.
///
/// Der Origin-Layer kommt vom Aufrufer; ohne Angabe gilt die Source
/// des Features.
pub fn start(
    state: &mut AppState,
    collab: &mut Collaborators<'_>,
    feature_id: u64,
    origin_layer: Option<String>,
) {
    session::cancel_active(state, collab.surface);

    let Some(feature) = collab.surface.feature_by_id(feature_id) else {
        state
            .feedback
            .alert(format!("Feature {} nicht gefunden", feature_id));
        return;
    };
    let draft = match RepositionDraft::begin(&feature, origin_layer) {
        Ok(draft) => draft,
        Err(e) => {
            state.feedback.report(&e);
            return;
        }
    };

    let generation = install_session(state, collab, draft);
    log::info!(
        "Verschieben gestartet: Feature {} (Generation {})",
        feature_id,
        generation
    );
}

/// Startet die Platzierung eines neuen Punkts an der Klick-Position.
pub fn start_new(
    state: &mut AppState,
    collab: &mut Collaborators<'_>,
    network_type: NetworkType,
    world_pos: DVec2,
) {
    session::cancel_active(state, collab.surface);

    let draft = RepositionDraft::begin_new(network_type, world_pos);
    let generation = install_session(state, collab, draft);
    log::info!(
        "Neuer Punkt ({}) platziert, Feinjustierung läuft (Generation {})",
        network_type.label(),
        generation
    );
}

fn install_session(
    state: &mut AppState,
    collab: &mut Collaborators<'_>,
    draft: RepositionDraft,
) -> u64 {
    let generation = state.next_generation();
    let mut resources = SessionResources::new(generation);
    if let Some(layer) = draft.origin_layer() {
        resources.hide_layer(collab.surface, layer);
    }
    let marker_id = resources.add_overlay(
        collab.surface,
        "reposition-marker",
        OverlayGeometry::Point(draft.draft),
        OverlayStyle::solid(state.options.reposition_marker_color),
    );

    state.session = EditSession::Repositioning(RepositionState {
        resources,
        draft,
        marker_overlay: Some(marker_id),
    });
    generation
}

/// Setzt die Draft-Koordinate auf den Klickpunkt und zieht den Marker nach.
pub fn move_draft(state: &mut AppState, collab: &mut Collaborators<'_>, world_pos: DVec2) {
    let EditSession::Repositioning(repo) = &mut state.session else {
        return;
    };

    repo.draft.move_to(world_pos);
    if let Some(id) = &repo.marker_overlay {
        collab
            .surface
            .update_overlay(id, OverlayGeometry::Point(world_pos));
    }
    log::debug!(
        "Draft verschoben: {:.1} m gegenüber Original",
        repo.draft.displacement_m()
    );
}

/// Speichert die Draft-Koordinate und räumt die Session ab.
///
/// Anders als beim Linien-Commit wird auch bei Persistenz-Fehlern
/// abgeräumt: der Fehler wird geloggt und als Notiz gezeigt, aber
/// Repositionierung kennt keinen Retry. Nur Validierungsfehler
/// (unbewegtes Feature) lassen die Session stehen.
pub fn commit(state: &mut AppState, collab: &mut Collaborators<'_>) {
    let EditSession::Repositioning(repo) = &mut state.session else {
        return;
    };

    let payload = match repo.draft.payload() {
        Ok(payload) => payload,
        Err(e) => {
            state.feedback.report(&e);
            return;
        }
    };

    let result = match &payload {
        RepositionPayload::Update(update) => collab.persistence.update_coordinate(update),
        RepositionPayload::Create(create) => collab.persistence.create_point(create),
    };

    match result {
        Ok(()) => match &payload {
            RepositionPayload::Update(update) => {
                log::info!(
                    "Feature {} verschoben nach [{:.6}, {:.6}]",
                    update.id,
                    update.coordinate[0],
                    update.coordinate[1]
                );
                state
                    .feedback
                    .notice(format!("Feature {} verschoben", update.id));
            }
            RepositionPayload::Create(create) => {
                log::info!(
                    "Neuer Punkt ({}) angelegt bei [{:.6}, {:.6}]",
                    create.point_type,
                    create.coordinate[0],
                    create.coordinate[1]
                );
                state
                    .feedback
                    .notice(format!("Punkt ({}) angelegt", create.point_type));
            }
        },
        Err(e) => {
            log::warn!("Reposition-Commit fehlgeschlagen: {}", e);
            state.feedback.report(&e);
        }
    }

    session::cancel_active(state, collab.surface);
}
