//! FTTH Map Editor Demo.
//!
//! Skriptete Editier-Session gegen die In-Memory-Surface und die
//! Mock-Kollaborateure: Polygon-Selektion, Linie zeichnen, Routen-Vorschläge
//! (inklusive Abbruch vor Antwort) und Feature-Verschieben.

use ftth_map_editor::services::mock::{MockDirections, MockPersistence, MockProximity};
use ftth_map_editor::shared::view_snapshot;
use ftth_map_editor::{
    service_channel, AppController, AppIntent, AppState, Candidate, Collaborators, Feature,
    LineKind, MemorySurface, NetworkType, PlannerOptions, ServiceEvent,
};
use glam::DVec2;

struct Demo {
    surface: MemorySurface,
    proximity: MockProximity,
    directions: MockDirections,
    persistence: MockPersistence,
    rx: std::sync::mpsc::Receiver<ServiceEvent>,
    state: AppState,
    controller: AppController,
}

fn main() -> anyhow::Result<()> {
    // Logger initialisieren
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("FTTH Map Editor v{} startet...", env!("CARGO_PKG_VERSION"));

    // Optionen aus TOML laden (oder Standardwerte)
    let config_path = PlannerOptions::config_path();
    let options = PlannerOptions::load_from_file(&config_path);

    let (tx, rx) = service_channel();
    let mut demo = Demo {
        surface: MemorySurface::with_features(seed_features()),
        proximity: MockProximity::new(tx.clone()),
        directions: MockDirections::new(tx),
        persistence: MockPersistence::new(),
        rx,
        state: AppState::with_options(options),
        controller: AppController::new(),
    };

    demo.polygon_selection()?;
    demo.line_drawing()?;
    demo.suggestion_cancel_race()?;
    demo.suggestion_commit()?;
    demo.reposition()?;
    demo.new_point()?;

    log::info!(
        "Demo fertig: {} Routen angelegt, {} Koordinaten aktualisiert, {} Punkte neu, {} Overlays übrig",
        demo.persistence.created_routes().len(),
        demo.persistence.updated_coordinates().len(),
        demo.persistence.created_points().len(),
        demo.surface.overlay_count()
    );
    log::info!(
        "Angelegte Routen als JSON:\n{}",
        serde_json::to_string_pretty(&demo.persistence.created_routes())?
    );

    Ok(())
}

impl Demo {
    fn dispatch(&mut self, intent: AppIntent) -> anyhow::Result<()> {
        let mut collab = Collaborators {
            surface: &mut self.surface,
            proximity: &self.proximity,
            directions: &self.directions,
            persistence: &self.persistence,
        };
        self.controller
            .handle_intent(&mut self.state, &mut collab, intent)
    }

    /// Pumpt alle aufgelaufenen Service-Antworten in den Controller.
    fn pump_events(&mut self) {
        while let Ok(event) = self.rx.try_recv() {
            let mut collab = Collaborators {
                surface: &mut self.surface,
                proximity: &self.proximity,
                directions: &self.directions,
                persistence: &self.persistence,
            };
            self.controller
                .handle_service_event(&mut self.state, &mut collab, event);
        }
    }

    fn print_status(&self) {
        let snapshot = view_snapshot::build(&self.state);
        log::info!("[{}] {}", snapshot.mode, snapshot.status_text);
        for notice in &snapshot.notices {
            log::info!("  Notiz: {}", notice);
        }
    }

    fn polygon_selection(&mut self) -> anyhow::Result<()> {
        self.dispatch(AppIntent::PolygonModeRequested)?;
        for pos in [
            DVec2::new(106.7995, -6.2005),
            DVec2::new(106.8015, -6.2005),
            DVec2::new(106.8015, -6.1995),
            DVec2::new(106.7995, -6.1995),
        ] {
            self.dispatch(AppIntent::MapClicked { world_pos: pos })?;
        }
        self.dispatch(AppIntent::PolygonClosed)?;
        self.print_status();
        self.dispatch(AppIntent::CancelRequested)
    }

    /// Linie FAT → TC: erster Commit scheitert am Netz, Retry geht durch.
    fn line_drawing(&mut self) -> anyhow::Result<()> {
        self.dispatch(AppIntent::LineStartRequested {
            kind: LineKind::DropCable,
            world_pos: DVec2::new(106.8000, -6.2000),
        })?;
        self.dispatch(AppIntent::MapClicked {
            world_pos: DVec2::new(106.8005, -6.2002),
        })?;
        self.dispatch(AppIntent::MapClicked {
            world_pos: DVec2::new(106.8010, -6.2000),
        })?;

        self.persistence.fail_next_call();
        self.dispatch(AppIntent::LineCommitRequested)?;
        self.print_status();
        // Draft ist erhalten geblieben, zweiter Versuch geht durch
        self.dispatch(AppIntent::LineCommitRequested)
    }

    /// Abbruch vor Antwort: die verspätete Antwort fällt am
    /// Generation-Check durch und hinterlässt keine Overlays.
    fn suggestion_cancel_race(&mut self) -> anyhow::Result<()> {
        self.dispatch(AppIntent::SuggestRequested {
            source_feature_id: 1,
        })?;
        self.dispatch(AppIntent::CancelRequested)?;

        self.proximity.resolve_next(vec![candidate(2)]);
        self.pump_events();
        log::info!(
            "Overlays nach Abbruch-Rennen: {}",
            self.surface.overlay_count()
        );
        Ok(())
    }

    fn suggestion_commit(&mut self) -> anyhow::Result<()> {
        self.dispatch(AppIntent::SuggestRequested {
            source_feature_id: 1,
        })?;
        self.proximity.resolve_next(vec![candidate(2), candidate(3)]);
        self.pump_events();
        self.directions.resolve_next_direct();
        self.directions.resolve_next_direct();
        self.pump_events();

        for now_ms in [400, 800, 1200, 1600, 2000] {
            self.dispatch(AppIntent::AnimationTick { now_ms })?;
        }
        self.print_status();

        self.dispatch(AppIntent::PathClicked { candidate_index: 0 })?;
        self.dispatch(AppIntent::SuggestCommitRequested)
    }

    fn reposition(&mut self) -> anyhow::Result<()> {
        self.dispatch(AppIntent::RepositionRequested { feature_id: 3, origin_layer: None })?;
        self.dispatch(AppIntent::MapClicked {
            world_pos: DVec2::new(106.8021, -6.2001),
        })?;
        self.print_status();
        self.dispatch(AppIntent::RepositionCommitRequested)
    }

    /// Neuen Handhole-Punkt platzieren und nachjustieren.
    fn new_point(&mut self) -> anyhow::Result<()> {
        self.dispatch(AppIntent::NewPointRequested {
            network_type: NetworkType::HandHole,
            world_pos: DVec2::new(106.8012, -6.2003),
        })?;
        self.dispatch(AppIntent::MapClicked {
            world_pos: DVec2::new(106.8013, -6.2003),
        })?;
        self.print_status();
        self.dispatch(AppIntent::RepositionCommitRequested)
    }
}

fn candidate(feature_id: u64) -> Candidate {
    let coordinate = match feature_id {
        2 => DVec2::new(106.8010, -6.2000),
        _ => DVec2::new(106.8020, -6.2000),
    };
    Candidate {
        feature_id,
        network_type: NetworkType::TerminalClosure,
        coordinate,
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
