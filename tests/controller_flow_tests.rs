//! Integrationstests über den vollen Intent→Command→Handler-Fluss,
//! mit In-Memory-Surface und Mock-Kollaborateuren.

use ftth_map_editor::services::mock::{MockDirections, MockPersistence, MockProximity};
use ftth_map_editor::shared::view_snapshot;
use ftth_map_editor::{
    service_channel, AppController, AppIntent, AppState, Candidate, Collaborators, EditSession,
    Feature, LineKind, MemorySurface, NetworkType, RouteResponse, ServiceEvent,
};
use glam::DVec2;

struct Harness {
    surface: MemorySurface,
    proximity: MockProximity,
    directions: MockDirections,
    persistence: MockPersistence,
    rx: std::sync::mpsc::Receiver<ServiceEvent>,
    state: AppState,
    controller: AppController,
}

impl Harness {
    fn new() -> Self {
        let (tx, rx) = service_channel();
        Self {
            surface: MemorySurface::with_features(seed_features()),
            proximity: MockProximity::new(tx.clone()),
            directions: MockDirections::new(tx),
            persistence: MockPersistence::new(),
            rx,
            state: AppState::new(),
            controller: AppController::new(),
        }
    }

    fn dispatch(&mut self, intent: AppIntent) {
        let mut collab = Collaborators {
            surface: &mut self.surface,
            proximity: &self.proximity,
            directions: &self.directions,
            persistence: &self.persistence,
        };
        self.controller
            .handle_intent(&mut self.state, &mut collab, intent)
            .expect("Intent-Dispatch darf nicht fehlschlagen");
    }

    fn pump_events(&mut self) {
        while let Ok(event) = self.rx.try_recv() {
            self.feed(event);
        }
    }

    /// Stellt ein einzelnes Service-Event zu (für gezielte Reihenfolgen).
    fn feed(&mut self, event: ServiceEvent) {
        let mut collab = Collaborators {
            surface: &mut self.surface,
            proximity: &self.proximity,
            directions: &self.directions,
            persistence: &self.persistence,
        };
        self.controller
            .handle_service_event(&mut self.state, &mut collab, event);
    }

    fn click(&mut self, x: f64, y: f64) {
        self.dispatch(AppIntent::MapClicked {
            world_pos: DVec2::new(x, y),
        });
    }

    fn draw_square_ring(&mut self) {
        self.dispatch(AppIntent::PolygonModeRequested);
        for pos in [
            (106.7995, -6.2005),
            (106.8015, -6.2005),
            (106.8015, -6.1995),
            (106.7995, -6.1995),
        ] {
            self.click(pos.0, pos.1);
        }
        self.dispatch(AppIntent::PolygonClosed);
    }
}

fn seed_features() -> Vec<Feature> {
    vec![
        Feature::point(1, "fat-layer", NetworkType::Fat, DVec2::new(106.8000, -6.2000)),
        Feature::point(
            2,
            "tc-layer",
            NetworkType::TerminalClosure,
            DVec2::new(106.8010, -6.2000),
        ),
        Feature::point(
            3,
            "tc-layer",
            NetworkType::TerminalClosure,
            DVec2::new(106.8020, -6.2000),
        ),
        Feature::point(4, "odc-layer", NetworkType::Odc, DVec2::new(106.8005, -6.1998)),
        Feature::line(
            5,
            "feeder-layer",
            NetworkType::FeederLine,
            vec![DVec2::new(106.7990, -6.2010), DVec2::new(106.8030, -6.2010)],
        ),
    ]
}

fn candidate(feature_id: u64, x: f64, y: f64) -> Candidate {
    Candidate {
        feature_id,
        network_type: NetworkType::TerminalClosure,
        coordinate: DVec2::new(x, y),
    }
}

// ── Polygon-Selektion ───────────────────────────────────────────────

#[test]
fn test_polygon_flow_classifies_and_cancels_cleanly() {
    let mut h = Harness::new();
    h.draw_square_ring();

    let EditSession::SelectingPolygon(poly) = &h.state.session else {
        panic!("Polygon-Session erwartet");
    };
    assert!(poly.closed);
    // FAT 1, TC 2 und ODC 4 liegen im Ring; TC 3 und die Feeder-Linie nicht
    assert_eq!(poly.selection.total_count(), 3);
    assert_eq!(h.surface.overlay_count(), 1);

    h.dispatch(AppIntent::CancelRequested);
    assert!(h.state.session.is_idle());
    assert_eq!(h.surface.overlay_count(), 0);
}

#[test]
fn test_polygon_reset_allows_redraw_in_same_session() {
    let mut h = Harness::new();
    h.draw_square_ring();
    h.dispatch(AppIntent::PolygonDeleteRequested);

    let EditSession::SelectingPolygon(poly) = &h.state.session else {
        panic!("Polygon-Session erwartet");
    };
    assert!(!poly.closed);
    assert!(poly.selection.is_empty());
    assert_eq!(h.surface.overlay_count(), 0);

    // Zweiter Ring in derselben Session
    for pos in [
        (106.8016, -6.2002),
        (106.8024, -6.2002),
        (106.8024, -6.1998),
        (106.8016, -6.1998),
    ] {
        h.click(pos.0, pos.1);
    }
    h.dispatch(AppIntent::PolygonClosed);

    let EditSession::SelectingPolygon(poly) = &h.state.session else {
        panic!("Polygon-Session erwartet");
    };
    // Nur TC 3 liegt im zweiten Ring
    assert_eq!(poly.selection.total_count(), 1);
}

#[test]
fn test_degenerate_ring_blocks_with_alert_and_stays_open() {
    let mut h = Harness::new();
    h.dispatch(AppIntent::PolygonModeRequested);
    h.click(106.8000, -6.2000);
    h.click(106.8010, -6.2000);
    h.dispatch(AppIntent::PolygonClosed);

    assert!(h.state.feedback.alert.is_some());
    let EditSession::SelectingPolygon(poly) = &h.state.session else {
        panic!("Polygon-Session erwartet");
    };
    assert!(!poly.closed);
}

// ── Modus-Exklusivität ──────────────────────────────────────────────

#[test]
fn test_entering_new_mode_tears_down_previous_session() {
    let mut h = Harness::new();
    h.draw_square_ring();
    assert_eq!(h.surface.overlay_count(), 1);

    h.dispatch(AppIntent::LineStartRequested {
        kind: LineKind::DropCable,
        world_pos: DVec2::new(106.8000, -6.2000),
    });

    assert!(matches!(h.state.session, EditSession::DrawingLine(_)));
    // Polygon-Overlay ist weg, nur das Linien-Draft-Overlay lebt
    assert_eq!(h.surface.overlay_count(), 1);
    let ids = h.surface.overlay_ids();
    assert!(ids[0].contains("line-draft"), "Unerwartetes Overlay: {}", ids[0]);
}

// ── Linien-Zeichnen ─────────────────────────────────────────────────

#[test]
fn test_line_flow_with_snap_and_commit() {
    let mut h = Harness::new();
    h.dispatch(AppIntent::LineStartRequested {
        kind: LineKind::DropCable,
        world_pos: DVec2::new(106.8000, -6.2000),
    });

    // Freier Vertex, dann Klick ~8m neben TC 2: außerhalb des
    // Pick-Radius (5m), innerhalb der Snap-Toleranz (11m)
    h.click(106.8005, -6.2002);
    h.click(106.8010, -6.20007);

    let EditSession::DrawingLine(line) = &h.state.session else {
        panic!("Linien-Session erwartet");
    };
    let draft = &line.engine.draft;
    assert_eq!(draft.end_anchor.expect("End-Anker gesetzt").feature_id, 2);
    // Der gesnappte Vertex liegt exakt auf der Anker-Koordinate
    assert_eq!(*draft.vertices.last().unwrap(), DVec2::new(106.8010, -6.2000));

    h.dispatch(AppIntent::LineCommitRequested);

    assert!(h.state.session.is_idle());
    assert_eq!(h.surface.overlay_count(), 0);
    let routes = h.persistence.created_routes();
    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].start_id, 1);
    assert_eq!(routes[0].end_id, 2);
    assert_eq!(routes[0].line_kind, "DROP_CABLE");
    assert_eq!(routes[0].vertices.len(), 3);
}

#[test]
fn test_line_commit_network_failure_keeps_draft_for_retry() {
    let mut h = Harness::new();
    h.dispatch(AppIntent::LineStartRequested {
        kind: LineKind::DropCable,
        world_pos: DVec2::new(106.8000, -6.2000),
    });
    h.click(106.8010, -6.2000);

    h.persistence.fail_next_call();
    h.dispatch(AppIntent::LineCommitRequested);

    // Netzfehler: Session und Draft bleiben erhalten, Notiz statt Alert
    assert!(matches!(h.state.session, EditSession::DrawingLine(_)));
    assert!(h.state.feedback.alert.is_none());
    assert!(!h.state.feedback.notices.is_empty());
    assert!(h.persistence.created_routes().is_empty());

    h.dispatch(AppIntent::LineCommitRequested);
    assert!(h.state.session.is_idle());
    assert_eq!(h.persistence.created_routes().len(), 1);
}

#[test]
fn test_line_commit_without_end_anchor_blocks_with_alert() {
    let mut h = Harness::new();
    h.dispatch(AppIntent::LineStartRequested {
        kind: LineKind::DropCable,
        world_pos: DVec2::new(106.8000, -6.2000),
    });
    h.click(106.8005, -6.2002);

    h.dispatch(AppIntent::LineCommitRequested);

    assert!(h.state.feedback.alert.is_some());
    assert!(matches!(h.state.session, EditSession::DrawingLine(_)));
    assert!(h.persistence.created_routes().is_empty());
}

#[test]
fn test_line_start_rejects_non_anchor_feature() {
    let mut h = Harness::new();
    // ODC 4 ist für DropCable kein zulässiger Anker
    h.dispatch(AppIntent::LineStartRequested {
        kind: LineKind::DropCable,
        world_pos: DVec2::new(106.8005, -6.1998),
    });

    assert!(h.state.session.is_idle());
    assert!(h.state.feedback.alert.is_some());
    assert_eq!(h.surface.overlay_count(), 0);
}

#[test]
fn test_line_undo_keeps_start_vertex() {
    let mut h = Harness::new();
    h.dispatch(AppIntent::LineStartRequested {
        kind: LineKind::DropCable,
        world_pos: DVec2::new(106.8000, -6.2000),
    });
    h.click(106.8005, -6.2002);

    h.dispatch(AppIntent::LineUndoRequested);
    h.dispatch(AppIntent::LineUndoRequested);
    h.dispatch(AppIntent::LineUndoRequested);

    let EditSession::DrawingLine(line) = &h.state.session else {
        panic!("Linien-Session erwartet");
    };
    assert_eq!(line.engine.draft.vertices.len(), 1);
    assert!(line.engine.draft.start_anchor.is_some());
}

// ── Routen-Vorschläge ───────────────────────────────────────────────

#[test]
fn test_suggestion_happy_path_with_reveal_and_commit() {
    let mut h = Harness::new();
    h.dispatch(AppIntent::SuggestRequested {
        source_feature_id: 1,
    });
    assert_eq!(h.proximity.pending_count(), 1);

    h.proximity.resolve_next(vec![
        candidate(2, 106.8010, -6.2000),
        candidate(3, 106.8020, -6.2000),
    ]);
    h.pump_events();
    assert_eq!(h.directions.pending_count(), 2);

    h.directions.resolve_next_direct();
    h.directions.resolve_next_direct();
    h.pump_events();

    let EditSession::SuggestingPaths(suggest) = &h.state.session else {
        panic!("Vorschlags-Session erwartet");
    };
    assert_eq!(suggest.paths.len(), 2);
    assert_eq!(suggest.pending_routes, 0);
    assert_eq!(h.surface.overlay_count(), 2);

    // Reveal ist zeitgesteuert und gestaffelt: Pfad 0 startet sofort,
    // Pfad 1 erst nach dem Stagger-Delay
    h.dispatch(AppIntent::AnimationTick { now_ms: 200 });
    let snapshot = view_snapshot::build(&h.state);
    let row0 = snapshot.suggestions.iter().find(|r| r.candidate_index == 0).unwrap();
    let row1 = snapshot.suggestions.iter().find(|r| r.candidate_index == 1).unwrap();
    assert!(row0.reveal_progress > 0.0);
    assert!(row1.reveal_progress == 0.0);

    h.dispatch(AppIntent::AnimationTick { now_ms: 5000 });
    let snapshot = view_snapshot::build(&h.state);
    assert!(snapshot.suggestions.iter().all(|r| r.reveal_progress >= 1.0));

    h.dispatch(AppIntent::PathClicked { candidate_index: 1 });
    h.dispatch(AppIntent::SuggestCommitRequested);

    assert!(h.state.session.is_idle());
    assert_eq!(h.surface.overlay_count(), 0);
    let routes = h.persistence.created_routes();
    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].start_id, 1);
    assert_eq!(routes[0].start_type, "FAT");
    assert_eq!(routes[0].end_id, 3);
}

#[test]
fn test_reveal_order_follows_candidate_index_not_arrival_order() {
    let mut h = Harness::new();
    h.dispatch(AppIntent::SuggestRequested {
        source_feature_id: 1,
    });
    h.proximity.resolve_next(vec![
        candidate(2, 106.8010, -6.2000),
        candidate(3, 106.8020, -6.2000),
    ]);
    h.pump_events();
    let generation = h.state.session.generation().expect("Session aktiv");

    // Kandidat 1 antwortet zuerst, Kandidat 0 erst 400ms später
    h.feed(ServiceEvent::RouteResolved {
        generation,
        candidate_index: 1,
        result: Ok(RouteResponse {
            vertices: vec![DVec2::new(106.8000, -6.2000), DVec2::new(106.8020, -6.2000)],
            distance_m: 220.0,
            duration_s: 160.0,
        }),
    });
    h.dispatch(AppIntent::AnimationTick { now_ms: 400 });
    h.feed(ServiceEvent::RouteResolved {
        generation,
        candidate_index: 0,
        result: Ok(RouteResponse {
            vertices: vec![DVec2::new(106.8000, -6.2000), DVec2::new(106.8010, -6.2000)],
            distance_m: 110.0,
            duration_s: 80.0,
        }),
    });

    // Staffelung hängt am Kandidaten-Index, nicht an der Eintreffzeit
    let EditSession::SuggestingPaths(suggest) = &h.state.session else {
        panic!("Vorschlags-Session erwartet");
    };
    let start0 = suggest.path_by_index(0).expect("Pfad 0").reveal.start_ms;
    let start1 = suggest.path_by_index(1).expect("Pfad 1").reveal.start_ms;
    assert!(
        start0 < start1,
        "Pfad 0 muss vor Pfad 1 starten (start0={start0}, start1={start1})"
    );

    h.dispatch(AppIntent::AnimationTick { now_ms: 500 });
    let snapshot = view_snapshot::build(&h.state);
    let row0 = snapshot.suggestions.iter().find(|r| r.candidate_index == 0).unwrap();
    let row1 = snapshot.suggestions.iter().find(|r| r.candidate_index == 1).unwrap();
    assert!(row0.reveal_progress > row1.reveal_progress);
}

#[test]
fn test_cancel_before_response_drops_stale_candidates() {
    let mut h = Harness::new();
    h.dispatch(AppIntent::SuggestRequested {
        source_feature_id: 1,
    });
    h.dispatch(AppIntent::CancelRequested);
    assert!(h.state.session.is_idle());

    // Die Antwort trifft erst nach dem Abbruch ein
    h.proximity.resolve_next(vec![candidate(2, 106.8010, -6.2000)]);
    h.pump_events();

    // Kommentarlos verworfen: kein Zustand, keine Overlays, keine Routen-Anfragen
    assert!(h.state.session.is_idle());
    assert_eq!(h.surface.overlay_count(), 0);
    assert_eq!(h.directions.pending_count(), 0);
    assert!(h.state.feedback.alert.is_none());
}

#[test]
fn test_stale_route_response_from_previous_session_is_dropped() {
    let mut h = Harness::new();
    h.dispatch(AppIntent::SuggestRequested {
        source_feature_id: 1,
    });
    h.proximity.resolve_next(vec![candidate(2, 106.8010, -6.2000)]);
    h.pump_events();
    assert_eq!(h.directions.pending_count(), 1);

    // Neue Session startet, bevor die alte Route geantwortet hat
    h.dispatch(AppIntent::SuggestRequested {
        source_feature_id: 4,
    });
    h.directions.resolve_next_direct();
    h.pump_events();

    let EditSession::SuggestingPaths(suggest) = &h.state.session else {
        panic!("Vorschlags-Session erwartet");
    };
    // Die verspätete Route der alten Generation hat keinen Pfad erzeugt
    assert!(suggest.paths.is_empty());
    assert_eq!(h.surface.overlay_count(), 0);
}

#[test]
fn test_route_failure_is_isolated_per_candidate() {
    let mut h = Harness::new();
    h.dispatch(AppIntent::SuggestRequested {
        source_feature_id: 1,
    });
    h.proximity.resolve_next(vec![
        candidate(2, 106.8010, -6.2000),
        candidate(3, 106.8020, -6.2000),
        candidate(4, 106.8005, -6.1990),
    ]);
    h.pump_events();

    // Kandidat 0 und 2 routen, Kandidat 1 scheitert
    h.directions.resolve_next_direct();
    h.directions.fail_next("Router überlastet");
    h.directions.resolve_next_direct();
    h.pump_events();

    let EditSession::SuggestingPaths(suggest) = &h.state.session else {
        panic!("Vorschlags-Session erwartet");
    };
    assert_eq!(suggest.paths.len(), 2);
    assert_eq!(suggest.failures.len(), 1);
    assert_eq!(suggest.failures[0].0, 1);
    assert_eq!(h.surface.overlay_count(), 2);
    // Fehler ist nicht-blockierend
    assert!(h.state.feedback.alert.is_none());
}

#[test]
fn test_suggestion_commit_while_awaiting_candidates_is_conflict() {
    let mut h = Harness::new();
    h.dispatch(AppIntent::SuggestRequested {
        source_feature_id: 1,
    });

    h.dispatch(AppIntent::SuggestCommitRequested);

    assert!(h
        .state
        .feedback
        .alert
        .as_deref()
        .unwrap_or_default()
        .contains("Ressourcen-Konflikt"));
    assert!(matches!(h.state.session, EditSession::SuggestingPaths(_)));
}

#[test]
fn test_proximity_failure_ends_session_with_notice() {
    let mut h = Harness::new();
    h.dispatch(AppIntent::SuggestRequested {
        source_feature_id: 1,
    });
    h.proximity.fail_next("Gateway-Timeout");
    h.pump_events();

    assert!(h.state.session.is_idle());
    assert_eq!(h.surface.overlay_count(), 0);
    assert!(h
        .state
        .feedback
        .notices
        .iter()
        .any(|n| n.contains("Gateway-Timeout")));
}

// ── Verschieben ─────────────────────────────────────────────────────

#[test]
fn test_reposition_commit_restores_layer_and_persists() {
    let mut h = Harness::new();
    h.dispatch(AppIntent::RepositionRequested { feature_id: 3, origin_layer: None });

    // Origin-Layer ist ausgeblendet, Marker-Overlay lebt
    assert!(!h.surface.is_visible("tc-layer"));
    assert_eq!(h.surface.overlay_count(), 1);

    h.click(106.8021, -6.2001);
    h.dispatch(AppIntent::RepositionCommitRequested);

    assert!(h.state.session.is_idle());
    assert!(h.surface.is_visible("tc-layer"));
    assert_eq!(h.surface.overlay_count(), 0);
    let updates = h.persistence.updated_coordinates();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].id, 3);
    assert_eq!(updates[0].coordinate, [106.8021, -6.2001]);
}

#[test]
fn test_reposition_hides_explicitly_supplied_origin_layer() {
    let mut h = Harness::new();
    h.dispatch(AppIntent::RepositionRequested {
        feature_id: 3,
        origin_layer: Some("tc-cluster".to_string()),
    });

    // Der Aufrufer bestimmt den auszublendenden Layer, nicht die Feature-Source
    assert!(!h.surface.is_visible("tc-cluster"));
    assert!(h.surface.is_visible("tc-layer"));

    h.dispatch(AppIntent::CancelRequested);
    assert!(h.surface.is_visible("tc-cluster"));
}

#[test]
fn test_reposition_cancel_restores_layer_without_persisting() {
    let mut h = Harness::new();
    h.dispatch(AppIntent::RepositionRequested { feature_id: 3, origin_layer: None });
    h.click(106.8021, -6.2001);

    h.dispatch(AppIntent::CancelRequested);

    assert!(h.state.session.is_idle());
    assert!(h.surface.is_visible("tc-layer"));
    assert_eq!(h.surface.overlay_count(), 0);
    assert!(h.persistence.updated_coordinates().is_empty());
}

#[test]
fn test_reposition_commit_tears_down_even_on_persistence_failure() {
    let mut h = Harness::new();
    h.dispatch(AppIntent::RepositionRequested { feature_id: 3, origin_layer: None });
    h.click(106.8021, -6.2001);

    h.persistence.fail_next_call();
    h.dispatch(AppIntent::RepositionCommitRequested);

    // Kein Retry beim Verschieben: trotz Fehler wird abgeräumt
    assert!(h.state.session.is_idle());
    assert!(h.surface.is_visible("tc-layer"));
    assert_eq!(h.surface.overlay_count(), 0);
    assert!(h.persistence.updated_coordinates().is_empty());
    assert!(!h.state.feedback.notices.is_empty());
}

#[test]
fn test_new_point_variant_commits_without_hiding_layers() {
    let mut h = Harness::new();
    h.dispatch(AppIntent::NewPointRequested {
        network_type: NetworkType::HandHole,
        world_pos: DVec2::new(106.8030, -6.2005),
    });

    // Kein Origin-Layer betroffen, nur der Marker lebt
    assert!(h.surface.is_visible("tc-layer"));
    assert_eq!(h.surface.overlay_count(), 1);

    h.click(106.8031, -6.2004);
    h.dispatch(AppIntent::RepositionCommitRequested);

    assert!(h.state.session.is_idle());
    assert_eq!(h.surface.overlay_count(), 0);
    let points = h.persistence.created_points();
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].point_type, "HH");
    assert_eq!(points[0].coordinate, [106.8031, -6.2004]);
}

#[test]
fn test_reposition_commit_without_movement_blocks() {
    let mut h = Harness::new();
    h.dispatch(AppIntent::RepositionRequested { feature_id: 3, origin_layer: None });

    h.dispatch(AppIntent::RepositionCommitRequested);

    assert!(h.state.feedback.alert.is_some());
    assert!(matches!(h.state.session, EditSession::Repositioning(_)));
    assert!(h.persistence.updated_coordinates().is_empty());
}
