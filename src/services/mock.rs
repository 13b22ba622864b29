//! Mock-Kollaborateure mit verzögerter Zustellung.
//!
//! Requests werden nur aufgezeichnet; Tests und Demo entscheiden explizit,
//! wann (und ob) eine Antwort über den Service-Kanal zugestellt wird.
//! Damit lassen sich Race-Szenarien wie "Cancel vor Antwort" deterministisch
//! nachstellen.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use glam::DVec2;

use crate::core::geo;
use crate::error::EditError;

use super::{
    Candidate, CreatePointPayload, CreateRoutePayload, DirectionsProvider, PersistenceClient,
    ProximityService, RouteResponse, RoutingProfile, ServiceEvent, ServiceSender,
    UpdateCoordinatePayload,
};

/// Aufgezeichnete Nachbarschafts-Anfrage.
#[derive(Debug, Clone)]
pub struct PendingNearby {
    /// Generation zum Request-Zeitpunkt
    pub generation: u64,
    /// Quell-Koordinate
    pub source: DVec2,
    /// Kandidaten-Limit
    pub limit: usize,
}

/// Proximity-Mock mit manueller Zustellung.
pub struct MockProximity {
    tx: ServiceSender,
    pending: RefCell<VecDeque<PendingNearby>>,
}

impl MockProximity {
    /// Erstellt den Mock mit Sende-Ende des Service-Kanals.
    pub fn new(tx: ServiceSender) -> Self {
        Self {
            tx,
            pending: RefCell::new(VecDeque::new()),
        }
    }

    /// Anzahl unbeantworteter Anfragen.
    pub fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Beantwortet die älteste Anfrage mit Kandidaten (auf das Limit gekürzt).
    /// Gibt `false` zurück wenn keine Anfrage offen ist.
    pub fn resolve_next(&self, mut candidates: Vec<Candidate>) -> bool {
        let Some(request) = self.pending.borrow_mut().pop_front() else {
            return false;
        };
        candidates.truncate(request.limit);
        let _ = self.tx.send(ServiceEvent::NearbyResolved {
            generation: request.generation,
            result: Ok(candidates),
        });
        true
    }

    /// Lässt die älteste Anfrage fehlschlagen.
    pub fn fail_next(&self, message: &str) -> bool {
        let Some(request) = self.pending.borrow_mut().pop_front() else {
            return false;
        };
        let _ = self.tx.send(ServiceEvent::NearbyResolved {
            generation: request.generation,
            result: Err(message.to_string()),
        });
        true
    }
}

impl ProximityService for MockProximity {
    fn find_nearby(&self, generation: u64, source: DVec2, limit: usize) {
        self.pending.borrow_mut().push_back(PendingNearby {
            generation,
            source,
            limit,
        });
    }
}

/// Aufgezeichnete Routen-Anfrage.
#[derive(Debug, Clone)]
pub struct PendingRoute {
    /// Generation zum Request-Zeitpunkt
    pub generation: u64,
    /// Kandidaten-Index
    pub candidate_index: usize,
    /// Start-Koordinate
    pub from: DVec2,
    /// Ziel-Koordinate
    pub to: DVec2,
    /// Routing-Profil
    pub profile: RoutingProfile,
}

/// Directions-Mock mit manueller Zustellung.
pub struct MockDirections {
    tx: ServiceSender,
    pending: RefCell<VecDeque<PendingRoute>>,
}

impl MockDirections {
    /// Erstellt den Mock mit Sende-Ende des Service-Kanals.
    pub fn new(tx: ServiceSender) -> Self {
        Self {
            tx,
            pending: RefCell::new(VecDeque::new()),
        }
    }

    /// Anzahl unbeantworteter Anfragen.
    pub fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Beantwortet die älteste Anfrage mit einer expliziten Route.
    pub fn resolve_next_with(&self, route: RouteResponse) -> bool {
        let Some(request) = self.pending.borrow_mut().pop_front() else {
            return false;
        };
        let _ = self.tx.send(ServiceEvent::RouteResolved {
            generation: request.generation,
            candidate_index: request.candidate_index,
            result: Ok(route),
        });
        true
    }

    /// Beantwortet die älteste Anfrage mit einer geraden Zwei-Punkt-Route
    /// zwischen den angefragten Koordinaten.
    pub fn resolve_next_direct(&self) -> bool {
        let request = {
            let pending = self.pending.borrow();
            match pending.front() {
                Some(r) => r.clone(),
                None => return false,
            }
        };
        let distance_m = geo::haversine_m(request.from, request.to);
        self.resolve_next_with(RouteResponse {
            vertices: vec![request.from, request.to],
            distance_m,
            duration_s: distance_m / 1.4,
        })
    }

    /// Lässt die älteste Anfrage fehlschlagen.
    pub fn fail_next(&self, message: &str) -> bool {
        let Some(request) = self.pending.borrow_mut().pop_front() else {
            return false;
        };
        let _ = self.tx.send(ServiceEvent::RouteResolved {
            generation: request.generation,
            candidate_index: request.candidate_index,
            result: Err(message.to_string()),
        });
        true
    }
}

impl DirectionsProvider for MockDirections {
    fn route(
        &self,
        generation: u64,
        candidate_index: usize,
        from: DVec2,
        to: DVec2,
        profile: RoutingProfile,
    ) {
        self.pending.borrow_mut().push_back(PendingRoute {
            generation,
            candidate_index,
            from,
            to,
            profile,
        });
    }
}

/// Persistence-Mock: zeichnet Payloads auf, kann gezielt fehlschlagen.
#[derive(Default)]
pub struct MockPersistence {
    fail_next: Cell<bool>,
    created_routes: RefCell<Vec<CreateRoutePayload>>,
    updated_coordinates: RefCell<Vec<UpdateCoordinatePayload>>,
    created_points: RefCell<Vec<CreatePointPayload>>,
}

impl MockPersistence {
    /// Erstellt einen leeren Persistence-Mock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lässt den nächsten Aufruf fehlschlagen.
    pub fn fail_next_call(&self) {
        self.fail_next.set(true);
    }

    /// Aufgezeichnete Route-Payloads.
    pub fn created_routes(&self) -> Vec<CreateRoutePayload> {
        self.created_routes.borrow().clone()
    }

    /// Aufgezeichnete Koordinaten-Updates.
    pub fn updated_coordinates(&self) -> Vec<UpdateCoordinatePayload> {
        self.updated_coordinates.borrow().clone()
    }

    /// Aufgezeichnete Punkt-Anlagen.
    pub fn created_points(&self) -> Vec<CreatePointPayload> {
        self.created_points.borrow().clone()
    }

    fn maybe_fail(&self, operation: &str) -> Result<(), EditError> {
        if self.fail_next.replace(false) {
            return Err(EditError::Network(format!(
                "{operation}: Verbindung abgelehnt (Mock)"
            )));
        }
        Ok(())
    }
}

impl PersistenceClient for MockPersistence {
    fn create_route(&self, payload: &CreateRoutePayload) -> Result<(), EditError> {
        self.maybe_fail("create_route")?;
        self.created_routes.borrow_mut().push(payload.clone());
        Ok(())
    }

    fn update_coordinate(&self, payload: &UpdateCoordinatePayload) -> Result<(), EditError> {
        self.maybe_fail("update_coordinate")?;
        self.updated_coordinates.borrow_mut().push(payload.clone());
        Ok(())
    }

    fn create_point(&self, payload: &CreatePointPayload) -> Result<(), EditError> {
        self.maybe_fail("create_point")?;
        self.created_points.borrow_mut().push(payload.clone());
        Ok(())
    }
}
