//! Linien-Zeichnen-Zustandsmaschine mit Anker-Pflicht und Snapping.
//!
//! Eine Linie beginnt an einem erlaubten Anker-Feature, sammelt freie
//! Vertices und endet an einem zweiten Anker. Freie Klicks innerhalb der
//! Snap-Toleranz rasten auf Anker ein, auch wenn der Hit-Test der Surface
//! nicht getroffen hat (Render- vs. Cursor-Präzision). Die Pfadlänge ist
//! ein abgeleiteter Wert und wird nie separat gespeichert.

use std::collections::HashMap;

use glam::DVec2;

use crate::core::{geo, AnchorIndex, Feature, LineKind, NetworkType};
use crate::error::EditError;
use crate::services::CreateRoutePayload;

/// Referenz auf ein Anker-Feature (per ID, Typ und Koordinate).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorRef {
    /// Feature-ID des Ankers
    pub feature_id: u64,
    /// Equipment-Typ
    pub network_type: NetworkType,
    /// Koordinate (Grad)
    pub coordinate: DVec2,
}

impl AnchorRef {
    /// Baut eine Anker-Referenz aus einem Punkt-Feature.
    pub fn from_feature(feature: &Feature) -> Option<Self> {
        feature.point_coordinate().map(|coordinate| Self {
            feature_id: feature.id,
            network_type: feature.network_type,
            coordinate,
        })
    }
}

/// Ergebnis eines Klicks während des Zeichnens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClickOutcome {
    /// Klick traf einen erlaubten Anker direkt
    ConnectedAnchor(AnchorRef),
    /// Klick lag innerhalb der Snap-Toleranz eines Ankers
    SnappedToAnchor(AnchorRef),
    /// Freier Vertex wurde angehängt
    FreeVertex(DVec2),
}

/// Der veränderliche Linien-Entwurf.
#[derive(Debug, Clone)]
pub struct LineDraft {
    /// Leitungstyp (bestimmt Farbe, Label, erlaubte Anker)
    pub kind: LineKind,
    /// Geordnete Vertex-Liste; `vertices[0]` entspricht dem Start-Anker
    pub vertices: Vec<DVec2>,
    /// Start-Anker (None nur im Continuation-Modus ohne auflösbaren Start)
    pub start_anchor: Option<AnchorRef>,
    /// End-Anker (gesetzt sobald ein Anker verbunden wurde)
    pub end_anchor: Option<AnchorRef>,
}

/// Zeichnen-Engine: Draft plus Anker-Index für Snapping.
pub struct LineDraw {
    /// Aktueller Entwurf
    pub draft: LineDraft,
    anchors: AnchorIndex,
    anchor_types: HashMap<u64, NetworkType>,
}

impl LineDraw {
    /// Startet einen neuen Draft an einem Anker-Feature.
    ///
    /// Gültig nur mit Punkt-Geometrie und erlaubtem Equipment-Typ für
    /// den Leitungstyp.
    pub fn begin(
        kind: LineKind,
        anchor_feature: &Feature,
        rendered_features: &[Feature],
    ) -> Result<Self, EditError> {
        if !anchor_feature.is_anchor_for(kind.allowed_anchors()) {
            return Err(EditError::Validation(format!(
                "Feature {} ({}) ist kein zulässiger Anker für {}",
                anchor_feature.id,
                anchor_feature.network_type.label(),
                kind.label()
            )));
        }
        let anchor = AnchorRef::from_feature(anchor_feature)
            .expect("is_anchor_for garantiert Punkt-Geometrie");

        let mut engine = Self::with_anchor_set(kind, rendered_features);
        engine.draft = LineDraft {
            kind,
            vertices: vec![anchor.coordinate],
            start_anchor: Some(anchor),
            end_anchor: None,
        };
        Ok(engine)
    }

    /// Continuation-Modus: übernimmt die Vertex-Sequenz einer bestehenden
    /// Linie in den Zeichnen-Zustand (Verlängern/Nachbearbeiten).
    ///
    /// Der Start-Anker wird über den ersten Vertex aufgelöst, falls dort
    /// ein erlaubter Anker liegt.
    pub fn resume(
        kind: LineKind,
        existing_vertices: Vec<DVec2>,
        rendered_features: &[Feature],
    ) -> Result<Self, EditError> {
        if existing_vertices.is_empty() {
            return Err(EditError::Validation(
                "Bestehende Linie ohne Vertices kann nicht fortgesetzt werden".to_string(),
            ));
        }

        let mut engine = Self::with_anchor_set(kind, rendered_features);
        let start_anchor = engine.anchor_at(existing_vertices[0], 1.0);
        engine.draft = LineDraft {
            kind,
            vertices: existing_vertices,
            start_anchor,
            end_anchor: None,
        };
        Ok(engine)
    }

    fn with_anchor_set(kind: LineKind, rendered_features: &[Feature]) -> Self {
        let allowed: Vec<&Feature> = rendered_features
            .iter()
            .filter(|f| f.is_anchor_for(kind.allowed_anchors()))
            .collect();
        let anchor_types = allowed
            .iter()
            .map(|f| (f.id, f.network_type))
            .collect::<HashMap<_, _>>();
        let anchors = AnchorIndex::from_features(allowed.into_iter());

        Self {
            draft: LineDraft {
                kind,
                vertices: Vec::new(),
                start_anchor: None,
                end_anchor: None,
            },
            anchors,
            anchor_types,
        }
    }

    /// Löst den Anker an einer Koordinate auf (exakter Treffer innerhalb `tolerance_m`).
    fn anchor_at(&self, point: DVec2, tolerance_m: f64) -> Option<AnchorRef> {
        let hit = self.anchors.nearest_within(point, tolerance_m)?;
        let network_type = *self.anchor_types.get(&hit.feature_id)?;
        Some(AnchorRef {
            feature_id: hit.feature_id,
            network_type,
            coordinate: hit.coordinate,
        })
    }

    /// Verarbeitet einen Klick: direkter Anker-Treffer → verbinden,
    /// Snap-Treffer innerhalb der Toleranz → verbinden, sonst freier Vertex.
    pub fn click_at(
        &mut self,
        point: DVec2,
        direct_hit: Option<&Feature>,
        snap_tolerance_m: f64,
    ) -> ClickOutcome {
        if let Some(feature) = direct_hit {
            if feature.is_anchor_for(self.draft.kind.allowed_anchors()) {
                if let Some(anchor) = AnchorRef::from_feature(feature) {
                    self.connect_to(anchor);
                    return ClickOutcome::ConnectedAnchor(anchor);
                }
            }
        }

        if let Some(anchor) = self.anchor_at(point, snap_tolerance_m) {
            self.connect_to(anchor);
            return ClickOutcome::SnappedToAnchor(anchor);
        }

        // Freier Vertex: ein bereits gesetzter End-Anker wird wieder gelöst,
        // das Zeichnen geht weiter.
        self.draft.vertices.push(point);
        self.draft.end_anchor = None;
        ClickOutcome::FreeVertex(point)
    }

    /// Verbindet den Draft mit einem Anker (setzt den End-Anker).
    pub fn connect_to(&mut self, anchor: AnchorRef) {
        self.draft.vertices.push(anchor.coordinate);
        self.draft.end_anchor = Some(anchor);
    }

    /// Entfernt den letzten Vertex. Der Start-Vertex bleibt immer erhalten.
    /// Gibt `true` zurück wenn ein Vertex entfernt wurde.
    pub fn undo_last_vertex(&mut self) -> bool {
        if self.draft.vertices.len() <= 1 {
            return false;
        }
        self.draft.vertices.pop();
        self.draft.end_anchor = None;
        true
    }

    /// Abgeleitete Gesamtlänge des Drafts in Metern (Großkreis-Summe).
    pub fn total_length_m(&self) -> f64 {
        geo::path_length_m(&self.draft.vertices)
    }

    /// Prüft alle Commit-Bedingungen, ohne zu committen.
    pub fn validate_commit(&self, endpoint_tolerance_m: f64) -> Result<(), EditError> {
        let draft = &self.draft;
        if draft.vertices.len() < 2 {
            return Err(EditError::Validation(
                "Linie braucht mindestens zwei Punkte".to_string(),
            ));
        }
        let Some(start) = draft.start_anchor else {
            return Err(EditError::Validation(
                "Startpunkt muss an einem Anker liegen".to_string(),
            ));
        };
        let Some(end) = draft.end_anchor else {
            return Err(EditError::Validation(
                "Letzter Punkt muss mit einem Anker verbunden sein".to_string(),
            ));
        };

        let first = draft.vertices[0];
        let last = *draft
            .vertices
            .last()
            .expect("vertices.len() >= 2 wurde geprüft");

        if geo::haversine_m(first, start.coordinate) > endpoint_tolerance_m {
            return Err(EditError::Validation(
                "Erster Vertex weicht vom Start-Anker ab".to_string(),
            ));
        }
        if geo::haversine_m(last, end.coordinate) > endpoint_tolerance_m {
            return Err(EditError::Validation(
                "Letzter Vertex weicht vom End-Anker ab".to_string(),
            ));
        }

        Ok(())
    }

    /// Baut den Persistence-Payload für den Commit.
    pub fn commit_payload(
        &self,
        endpoint_tolerance_m: f64,
    ) -> Result<CreateRoutePayload, EditError> {
        self.validate_commit(endpoint_tolerance_m)?;
        let start = self.draft.start_anchor.expect("validate_commit geprüft");
        let end = self.draft.end_anchor.expect("validate_commit geprüft");

        Ok(CreateRoutePayload {
            start_id: start.feature_id,
            start_type: start.network_type.label().to_string(),
            end_id: end.feature_id,
            end_type: end.network_type.label().to_string(),
            line_kind: self.draft.kind.label().to_string(),
            vertices: self.draft.vertices.iter().map(|v| [v.x, v.y]).collect(),
        })
    }
}
