//! Registry der von einer Editier-Session besessenen Map-Ressourcen.
//!
//! Jede Session besitzt ihre Overlays und versteckten Layer exklusiv.
//! Ressourcen-Schlüssel tragen die Session-Generation, damit wiederholte
//! Start/Cancel-Zyklen nie auf denselben IDs kollidieren. `release_all`
//! ist der einzige Teardown-Pfad — Commit und Cancel laufen beide darüber.

use crate::map::{MapSurface, OverlayGeometry, OverlayStyle};

/// Besitz-Registry für Overlays und ausgeblendete Layer einer Session.
#[derive(Debug, Default)]
pub struct SessionResources {
    generation: u64,
    overlays: Vec<String>,
    hidden_layers: Vec<String>,
}

impl SessionResources {
    /// Erstellt eine leere Registry für die gegebene Session-Generation.
    pub fn new(generation: u64) -> Self {
        Self {
            generation,
            overlays: Vec::new(),
            hidden_layers: Vec::new(),
        }
    }

    /// Generation, unter der diese Session läuft.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Bildet einen generationsgebundenen Overlay-Schlüssel.
    pub fn overlay_key(&self, tag: &str) -> String {
        format!("edit/{}/g{}", tag, self.generation)
    }

    /// Legt ein Overlay an und übernimmt den Besitz.
    pub fn add_overlay(
        &mut self,
        surface: &mut dyn MapSurface,
        tag: &str,
        geometry: OverlayGeometry,
        style: OverlayStyle,
    ) -> String {
        let id = self.overlay_key(tag);
        surface.add_overlay(&id, geometry, style);
        self.overlays.push(id.clone());
        id
    }

    /// Entfernt ein einzelnes besessenes Overlay vorzeitig.
    pub fn remove_overlay(&mut self, surface: &mut dyn MapSurface, id: &str) {
        if let Some(index) = self.overlays.iter().position(|o| o == id) {
            self.overlays.swap_remove(index);
            surface.remove_overlay(id);
        }
    }

    /// Blendet einen Layer aus und merkt ihn für die Wiederherstellung.
    pub fn hide_layer(&mut self, surface: &mut dyn MapSurface, layer_id: &str) {
        surface.set_visibility(layer_id, false);
        self.hidden_layers.push(layer_id.to_string());
    }

    /// Anzahl der aktuell besessenen Overlays.
    pub fn overlay_count(&self) -> usize {
        self.overlays.len()
    }

    /// Gibt alle Ressourcen frei: Overlays entfernen, Layer wieder einblenden.
    ///
    /// Idempotent — darf auf Commit- und Cancel-Pfad gleichermaßen laufen.
    pub fn release_all(&mut self, surface: &mut dyn MapSurface) {
        for id in self.overlays.drain(..) {
            surface.remove_overlay(&id);
        }
        for layer in self.hidden_layers.drain(..) {
            surface.set_visibility(&layer, true);
        }
    }
}
