//! Externe Service-Kollaborateure: Proximity, Directions, Persistence.
//!
//! Asynchrone Antworten laufen als `ServiceEvent` über einen
//! `std::sync::mpsc`-Kanal zurück in den Controller. Jedes Event trägt
//! die Session-Generation, unter der der Request gestellt wurde —
//! der Controller verwirft Events mit fremder Generation kommentarlos.

mod directions;
/// Mock-Implementierungen mit verzögerter Zustellung (Tests, Demo).
pub mod mock;
mod persistence;
mod proximity;

pub use directions::{DirectionsProvider, RouteResponse, RoutingProfile};
pub use persistence::{
    CreatePointPayload, CreateRoutePayload, PersistenceClient, UpdateCoordinatePayload,
};
pub use proximity::{Candidate, ProximityService};

/// Asynchron eintreffende Service-Antwort, getaggt mit der Request-Generation.
#[derive(Debug, Clone)]
pub enum ServiceEvent {
    /// Antwort der Nachbarschafts-Suche.
    NearbyResolved {
        /// Generation zum Request-Zeitpunkt
        generation: u64,
        /// Kandidaten oder Fehlertext
        result: Result<Vec<Candidate>, String>,
    },
    /// Antwort einer Routen-Anfrage für einen Kandidaten.
    RouteResolved {
        /// Generation zum Request-Zeitpunkt
        generation: u64,
        /// Index des Kandidaten (bestimmt Farbe und Stagger-Reihenfolge)
        candidate_index: usize,
        /// Route oder Fehlertext
        result: Result<RouteResponse, String>,
    },
}

/// Sende-Ende des Service-Kanals (wird an die Provider-Implementierungen gereicht).
pub type ServiceSender = std::sync::mpsc::Sender<ServiceEvent>;

/// Empfangs-Ende des Service-Kanals (wird vom Event-Loop gepumpt).
pub type ServiceReceiver = std::sync::mpsc::Receiver<ServiceEvent>;

/// Erstellt ein frisches Kanal-Paar.
pub fn service_channel() -> (ServiceSender, ServiceReceiver) {
    std::sync::mpsc::channel()
}
