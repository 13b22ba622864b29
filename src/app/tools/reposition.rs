//! Reposition-Engine: verschiebt ein Punkt-Feature oder platziert einen
//! neuen Punkt.
//!
//! Während der Bearbeitung wird ein Draft-Marker als Overlay gezeigt;
//! beim Verschieben eines bestehenden Features ist dessen Origin-Layer
//! ausgeblendet. Commit und Abbruch räumen über denselben Pfad auf
//! (Marker weg, Layer wieder sichtbar) — auch bei Persistenz-Fehlern
//! wird abgeräumt, Repositionierung kennt keinen Retry.

use glam::DVec2;

use crate::core::{geo, Feature, NetworkType};
use crate::error::EditError;
use crate::services::{CreatePointPayload, UpdateCoordinatePayload};

/// Ziel der Reposition-Session.
#[derive(Debug, Clone)]
pub enum RepositionTarget {
    /// Bestehendes Punkt-Feature wird verschoben
    Existing {
        /// Feature-ID des verschobenen Features
        feature_id: u64,
        /// Vom Aufrufer benannter Origin-Layer (während der Session ausgeblendet)
        origin_layer: String,
    },
    /// Neuer Punkt wird platziert; nach dem Commit bleibt er bis zum
    /// nächsten vollen Daten-Refresh nur als persistierter Datensatz
    New,
}

/// Commit-Payload der Reposition-Engine.
#[derive(Debug, Clone)]
pub enum RepositionPayload {
    /// Koordinaten-Update eines bestehenden Features
    Update(UpdateCoordinatePayload),
    /// Anlage eines neuen Punkts
    Create(CreatePointPayload),
}

/// Der veränderliche Verschiebe- bzw. Platzierungs-Entwurf.
#[derive(Debug, Clone)]
pub struct RepositionDraft {
    /// Ziel (bestehendes Feature oder neuer Punkt)
    pub target: RepositionTarget,
    /// Equipment-Typ des Punkts
    pub network_type: NetworkType,
    /// Ursprüngliche Koordinate (bei neuen Punkten: erste Platzierung)
    pub original: DVec2,
    /// Aktuelle Draft-Koordinate
    pub draft: DVec2,
}

impl RepositionDraft {
    /// Startet eine Verschiebung für ein bestehendes Punkt-Feature.
    ///
    /// Der auszublendende Origin-Layer wird vom Aufrufer benannt;
    /// `None` fällt auf die Source des Features zurück.
    pub fn begin(feature: &Feature, origin_layer: Option<String>) -> Result<Self, EditError> {
        let original = feature.point_coordinate().ok_or_else(|| {
            EditError::Validation(format!(
                "Feature {} hat keine Punkt-Geometrie und kann nicht verschoben werden",
                feature.id
            ))
        })?;

        Ok(Self {
            target: RepositionTarget::Existing {
                feature_id: feature.id,
                origin_layer: origin_layer.unwrap_or_else(|| feature.source.clone()),
            },
            network_type: feature.network_type,
            original,
            draft: original,
        })
    }

    /// Startet die Platzierung eines neuen Punkts.
    pub fn begin_new(network_type: NetworkType, coordinate: DVec2) -> Self {
        Self {
            target: RepositionTarget::New,
            network_type,
            original: coordinate,
            draft: coordinate,
        }
    }

    /// Setzt die Draft-Koordinate auf die Klick-Position.
    pub fn move_to(&mut self, target: DVec2) {
        self.draft = target;
    }

    /// Verschiebungs-Distanz gegenüber der Original-Koordinate (Meter).
    pub fn displacement_m(&self) -> f64 {
        geo::haversine_m(self.original, self.draft)
    }

    /// Gibt `true` zurück wenn die Draft-Koordinate vom Original abweicht.
    pub fn has_moved(&self) -> bool {
        self.draft != self.original
    }

    /// Origin-Layer des Ziels (None bei neuen Punkten).
    pub fn origin_layer(&self) -> Option<&str> {
        match &self.target {
            RepositionTarget::Existing { origin_layer, .. } => Some(origin_layer),
            RepositionTarget::New => None,
        }
    }

    /// Baut den Persistence-Payload für den Commit.
    ///
    /// Ein unbewegtes bestehendes Feature hat nichts zu speichern;
    /// ein neuer Punkt ist immer committbar.
    pub fn payload(&self) -> Result<RepositionPayload, EditError> {
        match &self.target {
            RepositionTarget::Existing { feature_id, .. } => {
                if !self.has_moved() {
                    return Err(EditError::Validation(
                        "Feature wurde nicht bewegt, nichts zu speichern".to_string(),
                    ));
                }
                Ok(RepositionPayload::Update(UpdateCoordinatePayload {
                    id: *feature_id,
                    coordinate: [self.draft.x, self.draft.y],
                }))
            }
            RepositionTarget::New => Ok(RepositionPayload::Create(CreatePointPayload {
                point_type: self.network_type.label().to_string(),
                coordinate: [self.draft.x, self.draft.y],
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn fat_feature() -> Feature {
        Feature::point(7, "fat-layer", NetworkType::Fat, DVec2::new(106.8, -6.2))
    }

    #[test]
    fn test_begin_requires_point_geometry() {
        let line = Feature::line(
            8,
            "metro-layer",
            NetworkType::MetroLine,
            vec![DVec2::ZERO, DVec2::ONE],
        );
        assert!(matches!(
            RepositionDraft::begin(&line, None),
            Err(EditError::Validation(_))
        ));
    }

    #[test]
    fn test_begin_prefers_supplied_origin_layer() {
        let draft = RepositionDraft::begin(&fat_feature(), Some("cluster-7".to_string()))
            .expect("Punkt-Feature");
        assert_eq!(draft.origin_layer(), Some("cluster-7"));

        let fallback = RepositionDraft::begin(&fat_feature(), None).expect("Punkt-Feature");
        assert_eq!(fallback.origin_layer(), Some("fat-layer"));
    }

    #[test]
    fn test_move_updates_draft_and_keeps_original() {
        let mut draft = RepositionDraft::begin(&fat_feature(), None).expect("Punkt-Feature");
        assert!(!draft.has_moved());
        assert_relative_eq!(draft.displacement_m(), 0.0);
        assert_eq!(draft.origin_layer(), Some("fat-layer"));

        let target = DVec2::new(106.8001, -6.2);
        draft.move_to(target);

        assert!(draft.has_moved());
        assert_eq!(draft.draft, target);
        assert_eq!(draft.original, DVec2::new(106.8, -6.2));
        // ~11m pro 0.0001° Länge am Äquator (hier leicht verkürzt durch cos(lat))
        assert!(draft.displacement_m() > 10.0 && draft.displacement_m() < 12.0);
    }

    #[test]
    fn test_payload_rejected_without_movement() {
        let draft = RepositionDraft::begin(&fat_feature(), None).expect("Punkt-Feature");
        assert!(matches!(draft.payload(), Err(EditError::Validation(_))));
    }

    #[test]
    fn test_payload_carries_draft_coordinate() {
        let mut draft = RepositionDraft::begin(&fat_feature(), None).expect("Punkt-Feature");
        draft.move_to(DVec2::new(106.8002, -6.2001));

        let payload = draft.payload().expect("Payload gültig");
        match payload {
            RepositionPayload::Update(update) => {
                assert_eq!(update.id, 7);
                assert_eq!(update.coordinate, [106.8002, -6.2001]);
            }
            other => panic!("Update-Payload erwartet, bekam {other:?}"),
        }
    }

    #[test]
    fn test_new_point_commits_without_movement() {
        let draft = RepositionDraft::begin_new(
            NetworkType::HandHole,
            DVec2::new(106.81, -6.21),
        );
        assert!(draft.origin_layer().is_none());

        let payload = draft.payload().expect("Neuer Punkt immer committbar");
        match payload {
            RepositionPayload::Create(create) => {
                assert_eq!(create.point_type, "HH");
                assert_eq!(create.coordinate, [106.81, -6.21]);
            }
            other => panic!("Create-Payload erwartet, bekam {other:?}"),
        }
    }
}
