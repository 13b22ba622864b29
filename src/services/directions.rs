//! Directions-Provider: externes Routing zwischen zwei Koordinaten.

use glam::DVec2;

/// Routing-Profil der Anfrage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingProfile {
    /// Fußweg (Standard für Kabeltrassen entlang von Gehwegen)
    Walking,
    /// Fahrweg
    Driving,
}

/// Antwort des externen Routers.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteResponse {
    /// Routen-Vertices (Grad). Endpunkte können von den angefragten
    /// Koordinaten abweichen — der Router snappt auf sein Straßennetz.
    pub vertices: Vec<glam::DVec2>,
    /// Gerouteter Distanzwert in Metern
    pub distance_m: f64,
    /// Geschätzte Dauer in Sekunden
    pub duration_s: f64,
}

/// Externer Directions-Provider. Die Antwort kommt asynchron als
/// `ServiceEvent::RouteResolved` mit Generation und Kandidaten-Index zurück.
pub trait DirectionsProvider {
    /// Fordert eine Route von `from` nach `to` an.
    fn route(
        &self,
        generation: u64,
        candidate_index: usize,
        from: DVec2,
        to: DVec2,
        profile: RoutingProfile,
    );
}
