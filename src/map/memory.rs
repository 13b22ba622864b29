//! In-Memory-Map-Surface für Tests und den Demo-Betrieb.
//!
//! Zeichnet alle Overlay- und Sichtbarkeits-Mutationen auf, damit
//! Tests symmetrischen Teardown nachweisen können.

use glam::DVec2;
use indexmap::IndexMap;
use std::collections::HashMap;

use crate::core::{geo, Feature, FeatureGeometry};

use super::{MapSurface, OverlayGeometry, OverlayStyle};

/// Map Surface, die Overlays und Sichtbarkeit im Speicher hält.
#[derive(Default)]
pub struct MemorySurface {
    features: Vec<Feature>,
    overlays: IndexMap<String, (OverlayGeometry, OverlayStyle)>,
    visibility: HashMap<String, bool>,
}

impl MemorySurface {
    /// Erstellt eine leere Surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Erstellt eine Surface mit gerenderten Features.
    pub fn with_features(features: Vec<Feature>) -> Self {
        Self {
            features,
            overlays: IndexMap::new(),
            visibility: HashMap::new(),
        }
    }

    /// Ersetzt den Feature-Snapshot (voller Daten-Refresh).
    pub fn set_features(&mut self, features: Vec<Feature>) {
        self.features = features;
    }

    /// Anzahl aktuell gehaltener Overlays.
    pub fn overlay_count(&self) -> usize {
        self.overlays.len()
    }

    /// Gibt `true` zurück wenn ein Overlay mit der ID existiert.
    pub fn has_overlay(&self, id: &str) -> bool {
        self.overlays.contains_key(id)
    }

    /// Geometrie eines Overlays (für Animations-Assertions).
    pub fn overlay_geometry(&self, id: &str) -> Option<&OverlayGeometry> {
        self.overlays.get(id).map(|(g, _)| g)
    }

    /// Alle Overlay-IDs in Einfüge-Reihenfolge.
    pub fn overlay_ids(&self) -> Vec<String> {
        self.overlays.keys().cloned().collect()
    }

    /// Sichtbarkeit eines Layers (Default: sichtbar).
    pub fn is_visible(&self, layer_id: &str) -> bool {
        self.visibility.get(layer_id).copied().unwrap_or(true)
    }
}

impl MapSurface for MemorySurface {
    fn add_overlay(&mut self, id: &str, geometry: OverlayGeometry, style: OverlayStyle) {
        self.overlays.insert(id.to_string(), (geometry, style));
    }

    fn update_overlay(&mut self, id: &str, geometry: OverlayGeometry) {
        if let Some(entry) = self.overlays.get_mut(id) {
            entry.0 = geometry;
        }
    }

    fn remove_overlay(&mut self, id: &str) {
        self.overlays.shift_remove(id);
    }

    fn set_visibility(&mut self, layer_id: &str, visible: bool) {
        self.visibility.insert(layer_id.to_string(), visible);
    }

    fn features_at(&self, point: DVec2, radius_m: f64) -> Vec<Feature> {
        self.features
            .iter()
            .filter(|f| match &f.geometry {
                FeatureGeometry::Point(p) => geo::haversine_m(*p, point) <= radius_m,
                FeatureGeometry::Line(vertices) => vertices
                    .iter()
                    .any(|&v| geo::haversine_m(v, point) <= radius_m),
                _ => false,
            })
            .cloned()
            .collect()
    }

    fn rendered_features(&self) -> Vec<Feature> {
        self.features.clone()
    }
}
