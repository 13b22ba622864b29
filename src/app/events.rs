//! AppIntent- und AppCommand-Enums für den Intent/Command-Datenfluss.

use glam::DVec2;

use crate::core::{LineKind, NetworkType};

/// App-Intent und App-Command Events.
/// Intents sind Eingaben aus UI/System ohne direkte Mutationslogik.
#[derive(Debug, Clone)]
pub enum AppIntent {
    /// Klick auf die Karte — Bedeutung hängt vom aktiven Modus ab
    MapClicked { world_pos: DVec2 },

    /// Polygon-Selektionsmodus starten
    PolygonModeRequested,
    /// Ring schließen und klassifizieren (Doppelklick)
    PolygonClosed,
    /// Gezeichneten Ring verwerfen, im Modus bleiben
    PolygonDeleteRequested,

    /// Linien-Zeichnen an einem Anker-Feature starten
    LineStartRequested { kind: LineKind, world_pos: DVec2 },
    /// Bestehende Linie in den Zeichnen-Zustand übernehmen
    LineResumeRequested { kind: LineKind, feature_id: u64 },
    /// Letzten Vertex entfernen
    LineUndoRequested,
    /// Linie validieren und speichern
    LineCommitRequested,

    /// Routen-Vorschläge für ein Quell-Feature anfordern
    SuggestRequested { source_feature_id: u64 },
    /// Vorgeschlagenen Pfad auswählen
    PathClicked { candidate_index: usize },
    /// Ausgewählten Pfad als Linie speichern
    SuggestCommitRequested,

    /// Verschiebe-Modus für ein Punkt-Feature starten. Der Aufrufer
    /// nennt den Origin-Layer explizit; `None` fällt auf die Source
    /// des Features zurück
    RepositionRequested {
        feature_id: u64,
        origin_layer: Option<String>,
    },
    /// Neuen Punkt platzieren (Reposition-Variante)
    NewPointRequested {
        network_type: NetworkType,
        world_pos: DVec2,
    },
    /// Draft-Koordinate speichern
    RepositionCommitRequested,

    /// Aktive Session abbrechen (Esc)
    CancelRequested,
    /// Blockierenden Hinweis bestätigen
    AlertDismissed,
    /// Animations-Takt (Engine-Uhr in ms)
    AnimationTick { now_ms: u64 },
}

/// Mutierende Commands. Entstehen ausschließlich aus dem Intent-Mapping.
#[derive(Debug, Clone)]
pub enum AppCommand {
    // === Polygon-Selektion ===
    /// Polygon-Modus betreten (bricht eine aktive Session ab)
    EnterPolygonMode,
    /// Ring-Vertex anhängen
    AddPolygonVertex { world_pos: DVec2 },
    /// Ring schließen und Feature-Snapshot klassifizieren
    ClosePolygon,
    /// Ring und Selektion verwerfen, Modus bleibt aktiv
    ResetPolygonRing,

    // === Linien-Zeichnen ===
    /// Zeichnen an einem Anker-Feature starten
    StartLine { kind: LineKind, world_pos: DVec2 },
    /// Bestehende Linie fortsetzen
    ResumeLine { kind: LineKind, feature_id: u64 },
    /// Klick während des Zeichnens verarbeiten
    LineClick { world_pos: DVec2 },
    /// Letzten Vertex entfernen
    UndoLineVertex,
    /// Linie committen
    CommitLine,

    // === Routen-Vorschläge ===
    /// Nachbarschafts-Suche starten
    RequestSuggestions { source_feature_id: u64 },
    /// Pfad auswählen
    SelectSuggestedPath { candidate_index: usize },
    /// Ausgewählten Pfad committen
    CommitSelectedPath,

    // === Verschieben ===
    /// Verschiebe-Session starten (Origin-Layer vom Aufrufer benannt)
    StartReposition {
        feature_id: u64,
        origin_layer: Option<String>,
    },
    /// Platzierungs-Session für einen neuen Punkt starten
    StartNewPoint {
        network_type: NetworkType,
        world_pos: DVec2,
    },
    /// Draft-Koordinate setzen
    MoveRepositionDraft { world_pos: DVec2 },
    /// Verschiebung committen
    CommitReposition,

    // === Session & Takt ===
    /// Aktive Session abbrechen und Ressourcen freigeben
    CancelSession,
    /// Blockierenden Hinweis wegräumen
    DismissAlert,
    /// Engine-Uhr vorrücken, Reveal-Animationen aktualisieren
    Tick { now_ms: u64 },
}
