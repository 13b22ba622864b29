//! FTTH Map Editor Library.
//! Core-Funktionalität als Library exportiert für Tests und Wiederverwendung.

pub mod app;
pub mod core;
pub mod error;
pub mod map;
pub mod services;
pub mod shared;

pub use app::{AppCommand, AppController, AppIntent, AppState, Collaborators, EditSession};
pub use core::{AnchorHit, AnchorIndex, Feature, FeatureGeometry, LineKind, NetworkType};
pub use error::EditError;
pub use map::{MapSurface, MemorySurface, OverlayGeometry, OverlayStyle, SessionResources};
pub use services::{
    service_channel, Candidate, DirectionsProvider, PersistenceClient, ProximityService,
    RouteResponse, RoutingProfile, ServiceEvent,
};
pub use shared::{PlannerOptions, ViewSnapshot};
