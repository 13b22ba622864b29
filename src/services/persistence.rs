//! Persistence-Kollaborateur: speichert committete Routen und Koordinaten.
//!
//! Synchrone Result-Schnittstelle: bei Fehlern bleibt der Engine-Zustand
//! für einen Retry erhalten (Commit verwirft den Draft nicht).

use serde::Serialize;

use crate::error::EditError;

/// Payload für das Anlegen einer Route.
#[derive(Debug, Clone, Serialize)]
pub struct CreateRoutePayload {
    /// Feature-ID des Start-Ankers
    pub start_id: u64,
    /// Equipment-Typ-Label des Start-Ankers
    pub start_type: String,
    /// Feature-ID des End-Ankers
    pub end_id: u64,
    /// Equipment-Typ-Label des End-Ankers
    pub end_type: String,
    /// Leitungstyp-Label
    pub line_kind: String,
    /// Geordnete Vertex-Liste als [Länge, Breite]
    pub vertices: Vec<[f64; 2]>,
}

/// Payload für das Verschieben eines Nodes.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateCoordinatePayload {
    /// Feature-ID
    pub id: u64,
    /// Neue Koordinate als [Länge, Breite]
    pub coordinate: [f64; 2],
}

/// Payload für das Anlegen eines neuen Punkts.
#[derive(Debug, Clone, Serialize)]
pub struct CreatePointPayload {
    /// Equipment-Typ-Label
    pub point_type: String,
    /// Koordinate als [Länge, Breite]
    pub coordinate: [f64; 2],
}

/// Externer Persistence-Kollaborateur.
pub trait PersistenceClient {
    /// Legt eine neue Route an.
    fn create_route(&self, payload: &CreateRoutePayload) -> Result<(), EditError>;

    /// Aktualisiert die Koordinate eines bestehenden Features.
    fn update_coordinate(&self, payload: &UpdateCoordinatePayload) -> Result<(), EditError>;

    /// Legt einen neuen Punkt an.
    fn create_point(&self, payload: &CreatePointPayload) -> Result<(), EditError>;
}
