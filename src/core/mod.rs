//! Core-Domänenmodell: Features, Leitungstypen, Geometrie, Spatial-Index.

mod feature;
/// Geometrie-Primitiven (Punkt-in-Polygon, Ring-Prädikate, Haversine).
pub mod geo;
mod line_kind;
mod spatial;

pub use feature::{Feature, FeatureGeometry, NetworkType};
pub use line_kind::LineKind;
pub use spatial::{AnchorHit, AnchorIndex};
