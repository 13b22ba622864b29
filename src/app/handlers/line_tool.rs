//! Handler für das Linien-Zeichnen.

use glam::DVec2;

use super::session;
use crate::app::state::LineDrawState;
use crate::app::tools::LineDraw;
use crate::app::{AppState, Collaborators, EditSession};
use crate::core::{FeatureGeometry, LineKind};
use crate::map::{MapSurface, OverlayGeometry, OverlayStyle, SessionResources};

/// Startet das Zeichnen an einem Anker-Feature unter dem Klickpunkt.
pub fn start(
    state: &mut AppState,
    collab: &mut Collaborators<'_>,
    kind: LineKind,
    world_pos: DVec2,
) {
    session::cancel_active(state, collab.surface);

    let picked = collab
        .surface
        .features_at(world_pos, state.options.pick_radius_m)
        .into_iter()
        .find(|f| f.is_anchor_for(kind.allowed_anchors()));
    let Some(anchor_feature) = picked else {
        state.feedback.alert(format!(
            "Kein zulässiger Anker für {} unter dem Klickpunkt",
            kind.label()
        ));
        return;
    };

    let rendered = collab.surface.rendered_features();
    let engine = match LineDraw::begin(kind, &anchor_feature, &rendered) {
        Ok(engine) => engine,
        Err(e) => {
            state.feedback.report(&e);
            return;
        }
    };

    let generation = state.next_generation();
    let mut line_state = LineDrawState {
        resources: SessionResources::new(generation),
        engine,
        draft_overlay: None,
    };
    refresh_draft_overlay(&mut line_state, collab.surface);
    state.session = EditSession::DrawingLine(line_state);
    log::info!(
        "Linie zeichnen gestartet: {} an Feature {} (Generation {})",
        kind.label(),
        anchor_feature.id,
        generation
    );
}

/// Übernimmt eine bestehende Linie in den Zeichnen-Zustand (Verlängern).
pub fn resume(
    state: &mut AppState,
    collab: &mut Collaborators<'_>,
    kind: LineKind,
    feature_id: u64,
) {
    session::cancel_active(state, collab.surface);

    let Some(feature) = collab.surface.feature_by_id(feature_id) else {
        state
            .feedback
            .alert(format!("Feature {} nicht gefunden", feature_id));
        return;
    };
    let vertices = match &feature.geometry {
        FeatureGeometry::Line(v) => v.clone(),
        _ => {
            state.feedback.alert(format!(
                "Feature {} ist keine Linie und kann nicht fortgesetzt werden",
                feature_id
            ));
            return;
        }
    };

    let rendered = collab.surface.rendered_features();
    let engine = match LineDraw::resume(kind, vertices, &rendered) {
        Ok(engine) => engine,
        Err(e) => {
            state.feedback.report(&e);
            return;
        }
    };

    let generation = state.next_generation();
    let mut line_state = LineDrawState {
        resources: SessionResources::new(generation),
        engine,
        draft_overlay: None,
    };
    // Die Original-Linie wird während der Bearbeitung ausgeblendet
    line_state
        .resources
        .hide_layer(collab.surface, &feature.source);
    refresh_draft_overlay(&mut line_state, collab.surface);
    state.session = EditSession::DrawingLine(line_state);
    log::info!(
        "Linie {} fortgesetzt als {} (Generation {})",
        feature_id,
        kind.label(),
        generation
    );
}

/// Verarbeitet einen Kartenklick: Anker verbinden, snappen oder freier Vertex.
pub fn click(state: &mut AppState, collab: &mut Collaborators<'_>, world_pos: DVec2) {
    let pick_radius_m = state.options.pick_radius_m;
    let snap_tolerance_m = state.options.snap_tolerance_m;
    let EditSession::DrawingLine(line) = &mut state.session else {
        return;
    };

    let allowed = line.engine.draft.kind.allowed_anchors();
    let direct_hit = collab
        .surface
        .features_at(world_pos, pick_radius_m)
        .into_iter()
        .find(|f| f.is_anchor_for(allowed));

    let outcome = line
        .engine
        .click_at(world_pos, direct_hit.as_ref(), snap_tolerance_m);
    log::debug!("Linien-Klick: {:?}", outcome);
    refresh_draft_overlay(line, collab.surface);
}

/// Entfernt den letzten Vertex (Start-Vertex bleibt immer erhalten).
pub fn undo_vertex(state: &mut AppState, collab: &mut Collaborators<'_>) {
    let EditSession::DrawingLine(line) = &mut state.session else {
        return;
    };
    if line.engine.undo_last_vertex() {
        refresh_draft_overlay(line, collab.surface);
    }
}

/// Validiert und speichert den Draft.
///
/// Validierungsfehler blockieren mit Hinweis, Netzwerkfehler landen als
/// Notiz — in beiden Fällen bleibt der Draft für Korrektur bzw. Retry
/// vollständig erhalten.
pub fn commit(state: &mut AppState, collab: &mut Collaborators<'_>) {
    let endpoint_tolerance_m = state.options.endpoint_tolerance_m;
    let EditSession::DrawingLine(line) = &mut state.session else {
        return;
    };

    let payload = match line.engine.commit_payload(endpoint_tolerance_m) {
        Ok(payload) => payload,
        Err(e) => {
            state.feedback.report(&e);
            return;
        }
    };

    match collab.persistence.create_route(&payload) {
        Ok(()) => {
            let length_m = line.engine.total_length_m();
            log::info!(
                "Linie gespeichert: {} → {} ({:.1} m)",
                payload.start_id,
                payload.end_id,
                length_m
            );
            state
                .feedback
                .notice(format!("Linie gespeichert ({:.1} m)", length_m));
            session::cancel_active(state, collab.surface);
        }
        Err(e) => {
            log::warn!("Linie speichern fehlgeschlagen: {}", e);
            state.feedback.report(&e);
        }
    }
}

/// Synchronisiert das Draft-Overlay mit der aktuellen Vertex-Liste.
fn refresh_draft_overlay(line: &mut LineDrawState, surface: &mut dyn MapSurface) {
    let vertices = line.engine.draft.vertices.clone();
    let geometry = if vertices.len() == 1 {
        OverlayGeometry::Point(vertices[0])
    } else {
        OverlayGeometry::Line(vertices)
    };

    match &line.draft_overlay {
        Some(id) => surface.update_overlay(id, geometry),
        None => {
            let style = OverlayStyle::draft(line.engine.draft.kind.color());
            let id = line
                .resources
                .add_overlay(surface, "line-draft", geometry, style);
            line.draft_overlay = Some(id);
        }
    }
}
