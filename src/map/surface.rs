//! Map-Surface-Schnittstelle (externer Kollaborateur).
//!
//! Die Engine kennt die Render-Fläche nur über diesen Trait: Overlays
//! anlegen/aktualisieren/entfernen, Layer-Sichtbarkeit schalten und
//! gerenderte Features abfragen. Tile-Rendering, Kamera und
//! Event-Dispatch liegen außerhalb.

use glam::DVec2;

use crate::core::Feature;

use super::{OverlayGeometry, OverlayStyle};

/// Schnittstelle zur Render-Fläche.
pub trait MapSurface {
    /// Legt ein Overlay unter eindeutiger ID an.
    fn add_overlay(&mut self, id: &str, geometry: OverlayGeometry, style: OverlayStyle);

    /// Aktualisiert die Geometrie eines bestehenden Overlays.
    fn update_overlay(&mut self, id: &str, geometry: OverlayGeometry);

    /// Entfernt ein Overlay. Unbekannte IDs werden ignoriert.
    fn remove_overlay(&mut self, id: &str);

    /// Schaltet die Sichtbarkeit eines Layers.
    fn set_visibility(&mut self, layer_id: &str, visible: bool);

    /// Gibt die Features zurück, die im Pick-Radius um die Koordinate rendern.
    fn features_at(&self, point: DVec2, radius_m: f64) -> Vec<Feature>;

    /// Snapshot aller aktuell gerenderten Features.
    fn rendered_features(&self) -> Vec<Feature>;

    /// Sucht ein gerendertes Feature per ID.
    fn feature_by_id(&self, id: u64) -> Option<Feature> {
        self.rendered_features().into_iter().find(|f| f.id == id)
    }
}
