//! Application State — zentrale Datenhaltung.
//!
//! `EditSession` ist eine Tagged Union: genau ein Modus ist aktiv, und
//! jede Variante besitzt ihre Map-Ressourcen exklusiv. Ein Moduswechsel
//! geht immer über den Cancel-Pfad der alten Session.

use glam::DVec2;

use super::tools::{LineDraw, PolygonSelection, RepositionDraft, SuggestedPath};
use super::CommandLog;
use crate::error::EditError;
use crate::map::SessionResources;
use crate::services::Candidate;
use crate::shared::PlannerOptions;

/// Zustand der Polygon-Selektion.
pub struct PolygonSelectState {
    /// Besessene Map-Ressourcen dieser Session
    pub resources: SessionResources,
    /// Bisher gesetzte Ring-Vertices (offen bis zum Schließen)
    pub ring: Vec<DVec2>,
    /// Ob der Ring geschlossen und klassifiziert wurde
    pub closed: bool,
    /// Klassifikations-Ergebnis (leer solange der Ring offen ist)
    pub selection: PolygonSelection,
    /// Overlay-ID des Ring-Entwurfs
    pub ring_overlay: Option<String>,
}

/// Zustand des Linien-Zeichnens.
pub struct LineDrawState {
    /// Besessene Map-Ressourcen dieser Session
    pub resources: SessionResources,
    /// Zeichnen-Engine mit Draft und Anker-Index
    pub engine: LineDraw,
    /// Overlay-ID der Entwurfs-Linie
    pub draft_overlay: Option<String>,
}

/// Zustand der Routen-Vorschläge.
pub struct SuggestionState {
    /// Besessene Map-Ressourcen dieser Session
    pub resources: SessionResources,
    /// Quell-Feature (Start aller Kandidaten-Pfade)
    pub source_feature_id: u64,
    /// Typ-Label des Quell-Features (für den Commit-Payload)
    pub source_type_label: String,
    /// Quell-Koordinate
    pub source: DVec2,
    /// Nachbarschafts-Suche läuft noch
    pub awaiting_candidates: bool,
    /// Gemeinsame Zeitbasis der Reveal-Staffelung (Engine-Uhr beim
    /// Eintreffen der Kandidaten) — Render-Reihenfolge hängt damit am
    /// Kandidaten-Index, nicht an der Antwort-Reihenfolge der Routen
    pub reveal_base_ms: u64,
    /// Kandidaten der Nachbarschafts-Suche (Index = Kandidaten-Index)
    pub candidates: Vec<Candidate>,
    /// Anzahl noch offener Routen-Anfragen
    pub pending_routes: usize,
    /// Fertig geroutete Pfade (Reihenfolge: Eintreff-Reihenfolge)
    pub paths: Vec<SuggestedPath>,
    /// Pro-Kandidat-Fehler (Index, Fehlertext) — andere Pfade unberührt
    pub failures: Vec<(usize, String)>,
    /// Vom User gewählter Kandidaten-Index
    pub selected: Option<usize>,
}

impl SuggestionState {
    /// Sucht einen fertigen Pfad per Kandidaten-Index.
    pub fn path_by_index(&self, candidate_index: usize) -> Option<&SuggestedPath> {
        self.paths.iter().find(|p| p.candidate_index == candidate_index)
    }

    /// Gibt `true` zurück solange Antworten ausstehen.
    pub fn has_pending_requests(&self) -> bool {
        self.awaiting_candidates || self.pending_routes > 0
    }
}

/// Zustand der Feature-Verschiebung.
pub struct RepositionState {
    /// Besessene Map-Ressourcen dieser Session
    pub resources: SessionResources,
    /// Verschiebe-Entwurf
    pub draft: RepositionDraft,
    /// Overlay-ID des Draft-Markers
    pub marker_overlay: Option<String>,
}

/// Aktiver Editier-Modus. Genau eine Variante zur Zeit.
#[derive(Default)]
pub enum EditSession {
    /// Kein Editier-Modus aktiv
    #[default]
    Idle,
    /// Polygon-Selektion läuft
    SelectingPolygon(PolygonSelectState),
    /// Linien-Zeichnen läuft
    DrawingLine(LineDrawState),
    /// Routen-Vorschläge laufen
    SuggestingPaths(SuggestionState),
    /// Feature-Verschiebung läuft
    Repositioning(RepositionState),
}

impl EditSession {
    /// Kurzes Modus-Label für Statusanzeige und Logs.
    pub fn mode_label(&self) -> &'static str {
        match self {
            EditSession::Idle => "Idle",
            EditSession::SelectingPolygon(_) => "Polygon-Selektion",
            EditSession::DrawingLine(_) => "Linie zeichnen",
            EditSession::SuggestingPaths(_) => "Routen-Vorschläge",
            EditSession::Repositioning(_) => "Verschieben",
        }
    }

    /// Gibt `true` zurück wenn kein Modus aktiv ist.
    pub fn is_idle(&self) -> bool {
        matches!(self, EditSession::Idle)
    }

    /// Generation der aktiven Session (None im Idle-Zustand).
    pub fn generation(&self) -> Option<u64> {
        match self {
            EditSession::Idle => None,
            EditSession::SelectingPolygon(s) => Some(s.resources.generation()),
            EditSession::DrawingLine(s) => Some(s.resources.generation()),
            EditSession::SuggestingPaths(s) => Some(s.resources.generation()),
            EditSession::Repositioning(s) => Some(s.resources.generation()),
        }
    }
}

/// Nicht-modale UI-Rückmeldungen aus der Engine.
#[derive(Debug, Clone, Default)]
pub struct UiFeedback {
    /// Blockierender Hinweis (Validation/ResourceConflict)
    pub alert: Option<String>,
    /// Nicht-blockierende Notizen (Netzwerk-Fehler, Erfolgsmeldungen)
    pub notices: Vec<String>,
}

impl UiFeedback {
    /// Setzt den blockierenden Hinweis.
    pub fn alert(&mut self, text: impl Into<String>) {
        self.alert = Some(text.into());
    }

    /// Hängt eine nicht-blockierende Notiz an.
    pub fn notice(&mut self, text: impl Into<String>) {
        self.notices.push(text.into());
    }

    /// Leitet einen Engine-Fehler in den passenden Kanal:
    /// blockierende Klassen als Hinweis, alle anderen als Notiz.
    pub fn report(&mut self, error: &EditError) {
        if error.is_blocking() {
            self.alert(error.to_string());
        } else {
            self.notice(error.to_string());
        }
    }

    /// Räumt den blockierenden Hinweis weg (User hat bestätigt).
    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }
}

/// Hauptzustand der Anwendung.
pub struct AppState {
    /// Aktive Editier-Session (Tagged Union)
    pub session: EditSession,
    /// Monoton steigender Generation-Zähler über alle Sessions
    pub generation: u64,
    /// Engine-Uhr in Millisekunden (aus `AnimationTick`)
    pub now_ms: u64,
    /// Laufzeit-Optionen (Toleranzen, Limits, Farben)
    pub options: PlannerOptions,
    /// UI-Rückmeldungen
    pub feedback: UiFeedback,
    /// Verlauf ausgeführter Commands
    pub command_log: CommandLog,
}

impl AppState {
    /// Erstellt einen neuen, leeren App-State im Idle-Zustand.
    pub fn new() -> Self {
        Self::with_options(PlannerOptions::default())
    }

    /// Erstellt einen App-State mit gegebenen Optionen.
    pub fn with_options(options: PlannerOptions) -> Self {
        Self {
            session: EditSession::Idle,
            generation: 0,
            now_ms: 0,
            options,
            feedback: UiFeedback::default(),
            command_log: CommandLog::new(),
        }
    }

    /// Rückt den Generation-Zähler vor und gibt die neue Generation zurück.
    ///
    /// Jede neue Session zieht eine frische Generation; alte Service-Antworten
    /// fallen damit am Generation-Check durch.
    pub fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
