//! Handler für die Polygon-Selektion.

use glam::DVec2;

use super::session;
use crate::app::state::PolygonSelectState;
use crate::app::tools::{classify, PolygonSelection};
use crate::app::{AppState, Collaborators, EditSession};
use crate::core::geo;
use crate::map::{OverlayGeometry, OverlayStyle, SessionResources};

/// Betritt den Polygon-Selektionsmodus. Eine aktive Session wird vorher
/// abgebrochen (Modus-Exklusivität).
pub fn enter_mode(state: &mut AppState, collab: &mut Collaborators<'_>) {
    session::cancel_active(state, collab.surface);

    let generation = state.next_generation();
    state.session = EditSession::SelectingPolygon(PolygonSelectState {
        resources: SessionResources::new(generation),
        ring: Vec::new(),
        closed: false,
        selection: PolygonSelection::default(),
        ring_overlay: None,
    });
    log::info!("Polygon-Selektion gestartet (Generation {})", generation);
}

/// Hängt einen Ring-Vertex an und aktualisiert das Ring-Overlay.
pub fn add_vertex(state: &mut AppState, collab: &mut Collaborators<'_>, world_pos: DVec2) {
    let fill_color = state.options.polygon_fill_color;
    let EditSession::SelectingPolygon(poly) = &mut state.session else {
        return;
    };
    if poly.closed {
        return;
    }

    poly.ring.push(world_pos);

    if poly.ring.len() < 2 {
        return;
    }
    let geometry = OverlayGeometry::Line(poly.ring.clone());
    match &poly.ring_overlay {
        Some(id) => collab.surface.update_overlay(id, geometry),
        None => {
            let id = poly.resources.add_overlay(
                collab.surface,
                "polygon-ring",
                geometry,
                OverlayStyle::draft(fill_color),
            );
            poly.ring_overlay = Some(id);
        }
    }
}

/// Schließt den Ring und klassifiziert den vollen Feature-Snapshot.
///
/// Ein degenerierter Ring (< 3 distinkte Vertices) blockiert mit Hinweis;
/// der Ring bleibt offen und korrigierbar.
pub fn close_ring(state: &mut AppState, collab: &mut Collaborators<'_>) {
    let options = state.options.clone();
    let EditSession::SelectingPolygon(poly) = &mut state.session else {
        return;
    };
    if poly.closed {
        return;
    }

    let ring = geo::normalize_ring(&poly.ring);
    if !geo::ring_is_valid(&ring) {
        state
            .feedback
            .alert("Polygon braucht mindestens drei Eckpunkte");
        return;
    }

    let features = collab.surface.rendered_features();
    let selection = classify(&ring, &features, &options);

    log::info!(
        "Polygon geschlossen: {} Features in {} Gruppen",
        selection.total_count(),
        selection.groups.len()
    );
    state.feedback.notice(format!(
        "{} Features selektiert",
        selection.total_count()
    ));

    let geometry = OverlayGeometry::Polygon(ring.clone());
    match &poly.ring_overlay {
        Some(id) => collab.surface.update_overlay(id, geometry),
        None => {
            let id = poly.resources.add_overlay(
                collab.surface,
                "polygon-ring",
                geometry,
                OverlayStyle::solid(options.polygon_fill_color),
            );
            poly.ring_overlay = Some(id);
        }
    }

    poly.ring = ring;
    poly.selection = selection;
    poly.closed = true;
}

/// Verwirft Ring und Selektion, der Modus bleibt aktiv (Neuzeichnen).
pub fn reset_ring(state: &mut AppState, collab: &mut Collaborators<'_>) {
    let EditSession::SelectingPolygon(poly) = &mut state.session else {
        return;
    };

    if let Some(id) = poly.ring_overlay.take() {
        poly.resources.remove_overlay(collab.surface, &id);
    }
    poly.ring.clear();
    poly.selection = PolygonSelection::default();
    poly.closed = false;
    log::debug!("Polygon-Ring verworfen, Modus bleibt aktiv");
}
