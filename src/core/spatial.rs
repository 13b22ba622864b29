//! Spatial-Index (KD-Tree) für Anker-Snapping.
//!
//! Der Baum arbeitet im Grad-Raum als Vorfilter; die exakte Distanz wird
//! anschließend per Haversine in Metern nachgeprüft. Der Grad-Vorfilter
//! ist bewusst großzügig (Längengrad-Kompression zum Pol hin).

use std::collections::HashMap;

use glam::DVec2;
use kiddo::{KdTree, SquaredEuclidean};

use crate::core::{geo, Feature};

/// Meter pro Breitengrad (Näherung für den Vorfilter-Radius).
const METERS_PER_DEGREE: f64 = 111_320.0;

/// Ergebnis einer Snap-Abfrage gegen den Anker-Index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorHit {
    /// ID des gefundenen Anker-Features
    pub feature_id: u64,
    /// Großkreis-Distanz zum Suchpunkt in Metern
    pub distance_m: f64,
    /// Koordinate des Ankers
    pub coordinate: DVec2,
}

/// Read-only Spatial-Index über Punkt-Features.
#[derive(Debug, Clone)]
pub struct AnchorIndex {
    tree: KdTree<f64, 2>,
    feature_ids: Vec<u64>,
    positions: HashMap<u64, DVec2>,
}

impl AnchorIndex {
    /// Erstellt einen leeren Index.
    pub fn empty() -> Self {
        Self {
            tree: (&Vec::<[f64; 2]>::new()).into(),
            feature_ids: Vec::new(),
            positions: HashMap::new(),
        }
    }

    /// Baut einen Index aus allen Punkt-Features der übergebenen Menge.
    /// Nicht-Punkt-Geometrien werden übersprungen.
    pub fn from_features<'a, I>(features: I) -> Self
    where
        I: IntoIterator<Item = &'a Feature>,
    {
        let mut entries: Vec<(u64, DVec2)> = features
            .into_iter()
            .filter_map(|f| f.point_coordinate().map(|p| (f.id, p)))
            .collect();
        entries.sort_unstable_by_key(|(id, _)| *id);

        let coords: Vec<[f64; 2]> = entries.iter().map(|(_, p)| [p.x, p.y]).collect();
        let tree: KdTree<f64, 2> = (&coords).into();

        let feature_ids: Vec<u64> = entries.iter().map(|(id, _)| *id).collect();
        let positions: HashMap<u64, DVec2> = entries.into_iter().collect();

        Self {
            tree,
            feature_ids,
            positions,
        }
    }

    /// Gibt die Anzahl indexierter Anker zurück.
    pub fn len(&self) -> usize {
        self.feature_ids.len()
    }

    /// Gibt `true` zurück wenn keine Anker im Index liegen.
    pub fn is_empty(&self) -> bool {
        self.feature_ids.is_empty()
    }

    /// Findet den nächsten Anker innerhalb der Toleranz (Meter).
    ///
    /// KD-Tree-Vorfilter im Grad-Raum mit doppeltem Suchradius,
    /// exakte Prüfung per Haversine.
    pub fn nearest_within(&self, query: DVec2, tolerance_m: f64) -> Option<AnchorHit> {
        if self.is_empty() || tolerance_m <= 0.0 {
            return None;
        }

        let prefilter_deg = tolerance_m / METERS_PER_DEGREE * 2.0;
        let mut best: Option<AnchorHit> = None;

        for entry in self
            .tree
            .within::<SquaredEuclidean>(&[query.x, query.y], prefilter_deg * prefilter_deg)
        {
            let Some(feature_id) = self.feature_ids.get(entry.item as usize).copied() else {
                continue;
            };
            let Some(coordinate) = self.positions.get(&feature_id).copied() else {
                continue;
            };

            let distance_m = geo::haversine_m(query, coordinate);
            if distance_m > tolerance_m {
                continue;
            }

            let closer = best
                .as_ref()
                .map_or(true, |current| distance_m < current.distance_m);
            if closer {
                best = Some(AnchorHit {
                    feature_id,
                    distance_m,
                    coordinate,
                });
            }
        }

        best
    }
}
