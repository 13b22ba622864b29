//! Polygon-Selektion: klassifiziert gerenderte Features gegen einen
//! gezeichneten Ring.
//!
//! Die Klassifikation läuft immer über den vollen Feature-Snapshot und
//! wird bei jeder Ring-Änderung komplett neu berechnet — nie inkrementell
//! gepatcht.

use glam::DVec2;
use indexmap::IndexMap;

use crate::core::{geo, Feature, FeatureGeometry};
use crate::shared::PlannerOptions;

/// Ergebnis einer Polygon-Klassifikation: Features gruppiert nach Source-ID.
#[derive(Debug, Clone, Default)]
pub struct PolygonSelection {
    /// Der geschlossene Ring, gegen den klassifiziert wurde
    pub ring: Vec<DVec2>,
    /// Selektierte Features, gruppiert nach Source-ID (deterministische Reihenfolge)
    pub groups: IndexMap<String, Vec<Feature>>,
}

impl PolygonSelection {
    /// Anzahl selektierter Features über alle Gruppen.
    pub fn total_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Per-Gruppen-Zählung in Gruppen-Reihenfolge.
    pub fn group_counts(&self) -> Vec<(String, usize)> {
        self.groups
            .iter()
            .map(|(source, features)| (source.clone(), features.len()))
            .collect()
    }

    /// Flache Sicht über alle selektierten Features.
    pub fn features(&self) -> impl Iterator<Item = &Feature> {
        self.groups.values().flatten()
    }

    /// Gibt `true` zurück wenn nichts selektiert ist.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Geometrie-spezifisches Inklusions-Prädikat eines Features gegen den Ring.
pub fn feature_matches_ring(feature: &Feature, ring: &[DVec2]) -> bool {
    match &feature.geometry {
        FeatureGeometry::Point(p) => geo::point_in_ring(*p, ring),
        FeatureGeometry::Line(line) => {
            geo::line_crosses_ring(line, ring) || geo::line_within_ring(line, ring)
        }
        FeatureGeometry::MultiLine(lines) => lines
            .iter()
            .any(|line| geo::line_crosses_ring(line, ring) || geo::line_within_ring(line, ring)),
        FeatureGeometry::Polygon(polygon) => {
            geo::polygon_within_ring(polygon, ring) || geo::polygon_overlaps_ring(polygon, ring)
        }
        FeatureGeometry::MultiPolygon(polygons) => polygons.iter().any(|polygon| {
            geo::polygon_within_ring(polygon, ring) || geo::polygon_overlaps_ring(polygon, ring)
        }),
    }
}

/// Klassifiziert den Feature-Snapshot gegen den Ring.
///
/// Basis-Layer (Deny-Liste) werden vor der Gruppierung ausgeschlossen.
/// Ein Ring mit weniger als 3 distinkten Vertices ergibt eine leere
/// Selektion — kein Fehler.
pub fn classify(ring: &[DVec2], features: &[Feature], options: &PlannerOptions) -> PolygonSelection {
    if !geo::ring_is_valid(ring) {
        return PolygonSelection {
            ring: ring.to_vec(),
            groups: IndexMap::new(),
        };
    }

    let mut groups: IndexMap<String, Vec<Feature>> = IndexMap::new();

    for feature in features {
        if options.is_base_layer(&feature.source) {
            continue;
        }
        if feature_matches_ring(feature, ring) {
            groups
                .entry(feature.source.clone())
                .or_default()
                .push(feature.clone());
        }
    }

    PolygonSelection {
        ring: ring.to_vec(),
        groups,
    }
}
