//! Proximity-Service: findet Anker-Kandidaten in der Nähe einer Koordinate.

use glam::DVec2;

use crate::core::NetworkType;

/// Anker-Kandidat aus der Nachbarschafts-Suche.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Feature-ID des Kandidaten
    pub feature_id: u64,
    /// Equipment-Typ
    pub network_type: NetworkType,
    /// Koordinate (Grad)
    pub coordinate: DVec2,
}

/// Externe Nachbarschafts-Suche. Die Antwort kommt asynchron als
/// `ServiceEvent::NearbyResolved` mit derselben Generation zurück.
pub trait ProximityService {
    /// Fordert bis zu `limit` Kandidaten um `source` an.
    fn find_nearby(&self, generation: u64, source: DVec2, limit: usize);
}
