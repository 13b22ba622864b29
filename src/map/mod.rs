//! Map-Surface-Grenze: Overlay-Typen, Surface-Trait, Ressourcen-Registry.

mod memory;
mod overlay;
mod registry;
mod surface;

pub use memory::MemorySurface;
pub use overlay::{OverlayGeometry, OverlayStyle};
pub use registry::SessionResources;
pub use surface::MapSurface;
