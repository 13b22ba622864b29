//! Overlay-Typen für die Map-Surface-Schnittstelle.

use glam::DVec2;

/// Geometrie eines Overlays (temporäre Editier-Darstellung).
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayGeometry {
    /// Einzelner Marker
    Point(DVec2),
    /// Linienzug
    Line(Vec<DVec2>),
    /// Geschlossener Ring
    Polygon(Vec<DVec2>),
}

/// Darstellungs-Stil eines Overlays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayStyle {
    /// Farbe (RGBA)
    pub color: [f32; 4],
    /// Linienstärke in Pixeln
    pub width_px: f32,
    /// Gestrichelte Darstellung (Drafts)
    pub dashed: bool,
}

impl OverlayStyle {
    /// Stil für Draft-Linien (gestrichelt).
    pub fn draft(color: [f32; 4]) -> Self {
        Self {
            color,
            width_px: 3.0,
            dashed: true,
        }
    }

    /// Stil für feste Overlays (Vorschlagspfade, Marker).
    pub fn solid(color: [f32; 4]) -> Self {
        Self {
            color,
            width_px: 4.0,
            dashed: false,
        }
    }
}
