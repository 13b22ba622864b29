//! Handler für Routen-Vorschläge: Nachbarschafts-Suche, parallele
//! Routen-Anfragen und zeitgesteuerte Reveal-Animation.

use super::session;
use crate::app::state::SuggestionState;
use crate::app::tools::{extend_route, path_color, revealed_prefix, RevealState, SuggestedPath};
use crate::app::{AppState, Collaborators, EditSession};
use crate::map::{OverlayGeometry, OverlayStyle, SessionResources};
use crate::services::{Candidate, RouteResponse, RoutingProfile};

/// Startet eine Vorschlags-Session: Nachbarschafts-Suche um das Quell-Feature.
pub fn request(state: &mut AppState, collab: &mut Collaborators<'_>, source_feature_id: u64) {
    session::cancel_active(state, collab.surface);

    let Some(feature) = collab.surface.feature_by_id(source_feature_id) else {
        state
            .feedback
            .alert(format!("Feature {} nicht gefunden", source_feature_id));
        return;
    };
    let Some(source) = feature.point_coordinate() else {
        state.feedback.alert(format!(
            "Feature {} hat keine Punkt-Geometrie, Vorschläge brauchen einen Startpunkt",
            source_feature_id
        ));
        return;
    };

    let generation = state.next_generation();
    collab
        .proximity
        .find_nearby(generation, source, state.options.candidate_limit);

    state.session = EditSession::SuggestingPaths(SuggestionState {
        resources: SessionResources::new(generation),
        source_feature_id,
        source_type_label: feature.network_type.label().to_string(),
        source,
        awaiting_candidates: true,
        reveal_base_ms: 0,
        candidates: Vec::new(),
        pending_routes: 0,
        paths: Vec::new(),
        failures: Vec::new(),
        selected: None,
    });
    log::info!(
        "Routen-Vorschläge angefordert für Feature {} (Generation {})",
        source_feature_id,
        generation
    );
}

/// Nachbarschafts-Suche beantwortet: pro Kandidat eine Routen-Anfrage.
///
/// Der Generation-Check ist bereits im Controller gelaufen.
pub fn on_nearby_resolved(
    state: &mut AppState,
    collab: &mut Collaborators<'_>,
    result: Result<Vec<Candidate>, String>,
) {
    let now_ms = state.now_ms;
    let EditSession::SuggestingPaths(suggest) = &mut state.session else {
        return;
    };
    suggest.awaiting_candidates = false;
    suggest.reveal_base_ms = now_ms;

    let candidates = match result {
        Ok(candidates) => candidates,
        Err(e) => {
            // Ohne Kandidaten gibt es nichts zu zeigen: Session beenden
            log::warn!("Nachbarschafts-Suche fehlgeschlagen: {}", e);
            state
                .feedback
                .notice(format!("Nachbarschafts-Suche fehlgeschlagen: {}", e));
            session::cancel_active(state, collab.surface);
            return;
        }
    };

    if candidates.is_empty() {
        state.feedback.notice("Keine Kandidaten in der Nähe");
        session::cancel_active(state, collab.surface);
        return;
    }

    let generation = suggest.resources.generation();
    let source = suggest.source;
    log::info!("{} Kandidaten erhalten, starte Routen-Anfragen", candidates.len());

    for (index, candidate) in candidates.iter().enumerate() {
        collab.directions.route(
            generation,
            index,
            source,
            candidate.coordinate,
            RoutingProfile::Walking,
        );
    }
    suggest.pending_routes = candidates.len();
    suggest.candidates = candidates;
}

/// Routen-Anfrage eines Kandidaten beantwortet.
///
/// Fehler bleiben pro Kandidat isoliert — fertige und noch laufende
/// Pfade anderer Kandidaten sind nicht betroffen.
pub fn on_route_resolved(
    state: &mut AppState,
    collab: &mut Collaborators<'_>,
    candidate_index: usize,
    result: Result<RouteResponse, String>,
) {
    let now_ms = state.now_ms;
    let reveal_duration_ms = state.options.reveal_duration_ms;
    let stagger_ms = state.options.suggestion_stagger_ms;
    let EditSession::SuggestingPaths(suggest) = &mut state.session else {
        return;
    };
    suggest.pending_routes = suggest.pending_routes.saturating_sub(1);

    let Some(candidate) = suggest.candidates.get(candidate_index).copied() else {
        log::warn!("Routen-Antwort für unbekannten Kandidaten {}", candidate_index);
        return;
    };

    let route = match result {
        Ok(route) => route,
        Err(e) => {
            log::warn!("Route für Kandidat {} fehlgeschlagen: {}", candidate_index, e);
            suggest.failures.push((candidate_index, e.clone()));
            state
                .feedback
                .notice(format!("Kandidat {}: {}", candidate_index + 1, e));
            return;
        }
    };

    let (vertices, manual_extension_m) =
        extend_route(suggest.source, candidate.coordinate, &route);
    // Staffelung über die gemeinsame Zeitbasis, nicht über die
    // Eintreffzeit: Kandidat i beginnt immer vor Kandidat i+1
    let reveal = RevealState {
        start_ms: suggest.reveal_base_ms + candidate_index as u64 * stagger_ms,
        duration_ms: reveal_duration_ms,
    };
    let color = path_color(candidate_index);

    // Initial nur die bereits sichtbare Spitze rendern; Tick schreibt fort
    let visible = revealed_prefix(&vertices, reveal.progress_at(now_ms));
    let geometry = if visible.len() < 2 {
        OverlayGeometry::Point(vertices[0])
    } else {
        OverlayGeometry::Line(visible)
    };
    let overlay_id = suggest.resources.add_overlay(
        collab.surface,
        &format!("suggestion-{}", candidate_index),
        geometry,
        OverlayStyle::solid(color),
    );

    let total_m = route.distance_m + manual_extension_m;
    log::info!(
        "Pfad {} geroutet: {:.1} m ({:.1} m manuell verlängert)",
        candidate_index,
        total_m,
        manual_extension_m
    );
    suggest.paths.push(SuggestedPath {
        candidate_index,
        candidate,
        vertices,
        routed_m: route.distance_m,
        manual_extension_m,
        total_m,
        color,
        overlay_id,
        reveal,
    });
}

/// Markiert einen fertigen Pfad als ausgewählt.
pub fn select_path(state: &mut AppState, _collab: &mut Collaborators<'_>, candidate_index: usize) {
    let EditSession::SuggestingPaths(suggest) = &mut state.session else {
        return;
    };

    if suggest.path_by_index(candidate_index).is_none() {
        state.feedback.alert(format!(
            "Kandidat {} ist (noch) nicht verfügbar",
            candidate_index + 1
        ));
        return;
    }
    suggest.selected = Some(candidate_index);
    log::debug!("Pfad {} ausgewählt", candidate_index);
}

/// Speichert den ausgewählten Pfad als Linie und beendet die Session.
pub fn commit(state: &mut AppState, collab: &mut Collaborators<'_>) {
    let EditSession::SuggestingPaths(suggest) = &mut state.session else {
        return;
    };

    if suggest.awaiting_candidates {
        state.feedback.report(&crate::error::EditError::ResourceConflict(
            "Nachbarschafts-Suche läuft noch".to_string(),
        ));
        return;
    }
    let Some(index) = suggest.selected else {
        state.feedback.alert("Kein Pfad ausgewählt");
        return;
    };
    let Some(path) = suggest.path_by_index(index) else {
        state.feedback.alert(format!("Kandidat {} ist nicht verfügbar", index + 1));
        return;
    };

    let payload = crate::services::CreateRoutePayload {
        start_id: suggest.source_feature_id,
        start_type: suggest.source_type_label.clone(),
        end_id: path.candidate.feature_id,
        end_type: path.candidate.network_type.label().to_string(),
        line_kind: crate::core::LineKind::DropCable.label().to_string(),
        vertices: path.vertices.iter().map(|v| [v.x, v.y]).collect(),
    };

    match collab.persistence.create_route(&payload) {
        Ok(()) => {
            log::info!(
                "Vorschlags-Pfad {} gespeichert: {} → {}",
                index,
                payload.start_id,
                payload.end_id
            );
            state
                .feedback
                .notice(format!("Pfad {} gespeichert", index + 1));
            session::cancel_active(state, collab.surface);
        }
        Err(e) => {
            // Session bleibt bestehen, Auswahl und Pfade für Retry erhalten
            log::warn!("Pfad speichern fehlgeschlagen: {}", e);
            state.feedback.report(&e);
        }
    }
}

/// Engine-Takt: rückt die Uhr vor und schreibt alle Reveal-Overlays fort.
pub fn tick(state: &mut AppState, collab: &mut Collaborators<'_>, now_ms: u64) {
    state.now_ms = now_ms;

    let EditSession::SuggestingPaths(suggest) = &mut state.session else {
        return;
    };

    for path in &suggest.paths {
        let progress = path.reveal.progress_at(now_ms);
        if progress <= 0.0 {
            continue;
        }
        let visible = revealed_prefix(&path.vertices, progress);
        if visible.len() >= 2 {
            collab
                .surface
                .update_overlay(&path.overlay_id, OverlayGeometry::Line(visible));
        }
    }
}
