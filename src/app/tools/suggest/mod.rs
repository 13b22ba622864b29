//! Routen-Vorschlags-Engine: Kandidaten-Pfade mit Reveal-Animation.
//!
//! Pro Kandidat läuft eine unabhängige Routen-Anfrage; Antworten werden
//! über die Session-Generation gegen veraltete Sessions abgeschirmt.
//! Die Reveal-Animation ist zeitgesteuert (nicht Vertex-Anzahl-gesteuert),
//! damit die Geschwindigkeit unabhängig von der Vertex-Dichte ist.

use glam::DVec2;

use crate::core::geo;
use crate::services::{Candidate, RouteResponse};

/// Endpunkte gelten als identisch unterhalb dieser Distanz (Meter).
const ENDPOINT_MERGE_M: f64 = 0.001;

/// Zeitplan der Reveal-Animation eines Pfads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealState {
    /// Startzeitpunkt (Engine-Uhr, ms) inklusive Stagger-Delay
    pub start_ms: u64,
    /// Dauer der Animation in ms
    pub duration_ms: u64,
}

impl RevealState {
    /// Fortschritt in [0, 1] zum Zeitpunkt `now_ms`.
    pub fn progress_at(&self, now_ms: u64) -> f64 {
        if now_ms <= self.start_ms {
            return 0.0;
        }
        if self.duration_ms == 0 {
            return 1.0;
        }
        let elapsed = (now_ms - self.start_ms) as f64;
        (elapsed / self.duration_ms as f64).min(1.0)
    }

    /// Gibt `true` zurück wenn die Animation abgeschlossen ist.
    pub fn is_done(&self, now_ms: u64) -> bool {
        self.progress_at(now_ms) >= 1.0
    }
}

/// Ein vorgeschlagener Kandidaten-Pfad.
#[derive(Debug, Clone)]
pub struct SuggestedPath {
    /// Kandidaten-Index (bestimmt Farbe und Stagger-Reihenfolge)
    pub candidate_index: usize,
    /// Ziel-Kandidat
    pub candidate: Candidate,
    /// Vollständige Vertex-Liste inkl. exakter Endpunkte
    pub vertices: Vec<DVec2>,
    /// Gerouteter Distanzwert des externen Routers (Meter)
    pub routed_m: f64,
    /// Manuelle Verlängerung: Distanz vom letzten Router-Vertex zur
    /// exakten Kandidaten-Koordinate (Meter)
    pub manual_extension_m: f64,
    /// Gesamtdistanz = geroutete + manuelle Verlängerung (Meter)
    pub total_m: f64,
    /// Unterscheidungsfarbe (RGBA)
    pub color: [f32; 4],
    /// Overlay-ID des gerenderten Pfads
    pub overlay_id: String,
    /// Animations-Zeitplan
    pub reveal: RevealState,
}

/// Verlängert eine Router-Antwort auf die exakten Endpunkte.
///
/// Externe Router snappen auf ihr Straßennetz und liefern Endpunkte, die
/// nur "nahe bei" den angefragten Koordinaten liegen. Quelle und Kandidat
/// werden deshalb als gerade Segmente vor- bzw. angehängt. Zurück kommt
/// die erweiterte Vertex-Liste und die manuelle Verlängerungs-Distanz
/// (Router-Ende → exakter Kandidat).
pub fn extend_route(
    source: DVec2,
    candidate: DVec2,
    route: &RouteResponse,
) -> (Vec<DVec2>, f64) {
    let mut vertices = Vec::with_capacity(route.vertices.len() + 2);

    let needs_prefix = route
        .vertices
        .first()
        .map_or(true, |&first| geo::haversine_m(first, source) > ENDPOINT_MERGE_M);
    if needs_prefix {
        vertices.push(source);
    }
    vertices.extend_from_slice(&route.vertices);

    let manual_extension_m = route
        .vertices
        .last()
        .map_or_else(|| geo::haversine_m(source, candidate), |&last| {
            geo::haversine_m(last, candidate)
        });
    let needs_suffix = manual_extension_m > ENDPOINT_MERGE_M;
    if needs_suffix || vertices.is_empty() {
        vertices.push(candidate);
    }

    (vertices, manual_extension_m)
}

/// Erzeugt eine Unterscheidungsfarbe pro Kandidaten-Index
/// (Goldener-Winkel-Rotation im Farbton).
pub fn path_color(index: usize) -> [f32; 4] {
    let hue = (index as f32 * 137.508) % 360.0;
    hsv_to_rgba(hue, 0.85, 0.95)
}

fn hsv_to_rgba(h: f32, s: f32, v: f32) -> [f32; 4] {
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;
    let (r, g, b) = match (h / 60.0) as u32 % 6 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    [r + m, g + m, b + m, 1.0]
}

/// Berechnet das sichtbare Präfix eines Pfads für den Fortschritt.
///
/// Distanz-parametrisiert: der Fortschritt schneidet bei
/// `progress × Gesamtlänge` ab und interpoliert die Spitze im letzten
/// angeschnittenen Segment.
pub fn revealed_prefix(vertices: &[DVec2], progress: f64) -> Vec<DVec2> {
    if vertices.len() < 2 || progress >= 1.0 {
        return vertices.to_vec();
    }
    if progress <= 0.0 {
        return vertices.first().map(|&v| vec![v]).unwrap_or_default();
    }

    let total = geo::path_length_m(vertices);
    if total <= 0.0 {
        return vertices.to_vec();
    }
    let target = total * progress;

    let mut result = vec![vertices[0]];
    let mut accumulated = 0.0;

    for pair in vertices.windows(2) {
        let segment = geo::haversine_m(pair[0], pair[1]);
        if accumulated + segment >= target {
            let remaining = target - accumulated;
            let fraction = if segment > 0.0 { remaining / segment } else { 1.0 };
            result.push(pair[0].lerp(pair[1], fraction));
            return result;
        }
        accumulated += segment;
        result.push(pair[1]);
    }

    result
}
