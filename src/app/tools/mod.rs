//! Editier-Engines: pro Modus eine zustandsbehaftete Engine, die reine
//! Daten produziert. Overlay- und Service-Effekte liegen in den Handlern.

pub mod line_draw;
pub mod polygon_select;
pub mod reposition;
pub mod suggest;

pub use line_draw::{AnchorRef, ClickOutcome, LineDraft, LineDraw};
pub use polygon_select::{classify, feature_matches_ring, PolygonSelection};
pub use reposition::{RepositionDraft, RepositionPayload, RepositionTarget};
pub use suggest::{
    extend_route, path_color, revealed_prefix, RevealState, SuggestedPath,
};
