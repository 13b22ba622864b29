//! Leitungstypen für das Linien-Zeichnen mit erlaubten Anker-Mengen.

use super::NetworkType;

/// Zeichenbarer Leitungstyp. Bestimmt Farbe, Label und welche
/// Equipment-Typen als Start-/End-Anker zulässig sind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Drop-Kabel: FAT → Terminal Closure
    DropCable,
    /// Metro-Strecke zwischen OLT/ODC über Hand-Holes
    Metro,
    /// Verteilstrecke ODC → FAT
    Distribution,
    /// Feeder-Strecke OLT → ODC
    Feeder,
}

impl LineKind {
    /// Persistence-Label des Leitungstyps.
    pub fn label(&self) -> &'static str {
        match self {
            LineKind::DropCable => "DROP_CABLE",
            LineKind::Metro => "METRO",
            LineKind::Distribution => "DISTRIBUTION",
            LineKind::Feeder => "FEEDER",
        }
    }

    /// Equipment-Typen, an denen eine Linie dieses Typs anfangen/enden darf.
    pub fn allowed_anchors(&self) -> &'static [NetworkType] {
        match self {
            LineKind::DropCable => &[NetworkType::Fat, NetworkType::TerminalClosure],
            LineKind::Metro => &[NetworkType::Olt, NetworkType::Odc, NetworkType::HandHole],
            LineKind::Distribution => &[NetworkType::Odc, NetworkType::Fat],
            LineKind::Feeder => &[NetworkType::Olt, NetworkType::Odc],
        }
    }

    /// Darstellung des Drafts im Viewport (RGBA).
    pub fn color(&self) -> [f32; 4] {
        match self {
            LineKind::DropCable => [0.2, 0.8, 0.4, 1.0],
            LineKind::Metro => [0.9, 0.3, 0.2, 1.0],
            LineKind::Distribution => [0.2, 0.6, 1.0, 1.0],
            LineKind::Feeder => [0.9, 0.7, 0.1, 1.0],
        }
    }
}
