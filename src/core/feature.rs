//! Feature-Modell: unveränderliche Snapshots der auf der Karte gerenderten Objekte.
//!
//! Die Editing-Engine besitzt Features nie selbst — sie referenziert sie
//! per ID/Koordinate. Die Validierung der Payloads passiert einmal an der
//! Map-Surface-Grenze, nicht ad hoc an jeder Aufrufstelle.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Netz-Equipment-Typ eines Features (opaque Tags für die Engine).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NetworkType {
    /// Fiber Access Terminal
    Fat,
    /// Optical Distribution Cabinet
    Odc,
    /// Optical Line Terminal
    Olt,
    /// Hand-Hole (Zugangsschacht)
    HandHole,
    /// Terminal Closure
    TerminalClosure,
    /// Metro-Kabelstrecke
    MetroLine,
    /// Drop-Kabelstrecke
    DropCableLine,
    /// Verteilstrecke
    DistributionLine,
    /// Feeder-Strecke
    FeederLine,
}

impl NetworkType {
    /// Anzeigename / Persistence-Label des Typs.
    pub fn label(&self) -> &'static str {
        match self {
            NetworkType::Fat => "FAT",
            NetworkType::Odc => "ODC",
            NetworkType::Olt => "OLT",
            NetworkType::HandHole => "HH",
            NetworkType::TerminalClosure => "TC",
            NetworkType::MetroLine => "METRO",
            NetworkType::DropCableLine => "DROP",
            NetworkType::DistributionLine => "DISTRIBUTION",
            NetworkType::FeederLine => "FEEDER",
        }
    }
}

/// Geometrie eines Features. Koordinaten in Grad (x = Länge, y = Breite).
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureGeometry {
    /// Einzelner Punkt (Equipment-Node)
    Point(DVec2),
    /// Offener Linienzug (Kabelstrecke)
    Line(Vec<DVec2>),
    /// Mehrere Linienzüge unter einer ID
    MultiLine(Vec<Vec<DVec2>>),
    /// Geschlossener Ring (erster Vertex == letzter implizit)
    Polygon(Vec<DVec2>),
    /// Mehrere Ringe unter einer ID
    MultiPolygon(Vec<Vec<DVec2>>),
}

/// Unveränderlicher Feature-Snapshot von der Map Surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// Eindeutige Feature-ID
    pub id: u64,
    /// Backing-Source-ID (Provenienz-/Kategorie-Schlüssel)
    pub source: String,
    /// Equipment-Typ
    pub network_type: NetworkType,
    /// Geometrie
    pub geometry: FeatureGeometry,
    /// Optionale Ketten-ID: gruppiert Punkte eines logischen Kabelsegments
    pub chain_id: Option<u64>,
}

impl Feature {
    /// Erstellt ein Punkt-Feature.
    pub fn point(id: u64, source: &str, network_type: NetworkType, coordinate: DVec2) -> Self {
        Self {
            id,
            source: source.to_string(),
            network_type,
            geometry: FeatureGeometry::Point(coordinate),
            chain_id: None,
        }
    }

    /// Erstellt ein Linien-Feature.
    pub fn line(id: u64, source: &str, network_type: NetworkType, vertices: Vec<DVec2>) -> Self {
        Self {
            id,
            source: source.to_string(),
            network_type,
            geometry: FeatureGeometry::Line(vertices),
            chain_id: None,
        }
    }

    /// Gibt die Punkt-Koordinate zurück, falls das Feature ein Punkt ist.
    pub fn point_coordinate(&self) -> Option<DVec2> {
        match &self.geometry {
            FeatureGeometry::Point(p) => Some(*p),
            _ => None,
        }
    }

    /// Gibt `true` zurück wenn das Feature als Anker für den gegebenen
    /// Leitungstyp dienen darf (Punkt-Geometrie + erlaubter Equipment-Typ).
    pub fn is_anchor_for(&self, allowed: &[NetworkType]) -> bool {
        matches!(self.geometry, FeatureGeometry::Point(_)) && allowed.contains(&self.network_type)
    }
}
