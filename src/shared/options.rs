//! Zentrale Konfiguration der Editing-Engine.
//!
//! `PlannerOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten. Alle
//! Toleranzen sind in Metern dokumentiert — nicht in rohen Grad-Deltas.

use serde::{Deserialize, Serialize};

// ── Snapping ────────────────────────────────────────────────────────

/// Snap-Toleranz in Metern: Klick innerhalb dieser Distanz rastet auf
/// einen Anker ein, auch wenn der Hit-Test der Surface nicht getroffen hat.
pub const SNAP_TOLERANCE_M: f64 = 11.0;
/// Numerische Toleranz für den Endpunkt-Abgleich beim Commit (Meter).
pub const ENDPOINT_TOLERANCE_M: f64 = 0.01;
/// Pick-Radius für Feature-Hit-Tests in Metern.
pub const PICK_RADIUS_M: f64 = 5.0;

// ── Routen-Vorschläge ───────────────────────────────────────────────

/// Maximale Anzahl Kandidaten pro Vorschlags-Runde (K).
pub const CANDIDATE_LIMIT: usize = 5;
/// Dauer der Reveal-Animation pro Pfad in Millisekunden.
pub const REVEAL_DURATION_MS: u64 = 1200;
/// Verzögerung zwischen den Animations-Starts aufeinanderfolgender
/// Kandidaten (`index × Delay`) in Millisekunden.
pub const SUGGESTION_STAGGER_MS: u64 = 350;

// ── Darstellung ─────────────────────────────────────────────────────

/// Füllfarbe des Selektions-Polygons (RGBA).
pub const POLYGON_FILL_COLOR: [f32; 4] = [0.2, 0.5, 1.0, 0.25];
/// Farbe des Reposition-Markers (RGBA).
pub const REPOSITION_MARKER_COLOR: [f32; 4] = [1.0, 0.4, 0.1, 1.0];

/// Basis-Layer, deren Features nie selektierbar sind.
fn default_base_layer_deny() -> Vec<String> {
    ["base", "tiles", "satellite", "street-base", "labels", "hillshade"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Alle zur Laufzeit änderbaren Planner-Optionen.
/// Wird als `ftth_map_editor.toml` neben der Binary gespeichert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerOptions {
    // ── Snapping ────────────────────────────────────────────────
    /// Snap-Toleranz in Metern
    pub snap_tolerance_m: f64,
    /// Endpunkt-Toleranz beim Commit in Metern
    pub endpoint_tolerance_m: f64,
    /// Pick-Radius für Hit-Tests in Metern
    pub pick_radius_m: f64,

    // ── Routen-Vorschläge ───────────────────────────────────────
    /// Kandidaten-Limit pro Vorschlags-Runde
    pub candidate_limit: usize,
    /// Reveal-Dauer pro Pfad in Millisekunden
    pub reveal_duration_ms: u64,
    /// Stagger-Delay zwischen Kandidaten in Millisekunden
    pub suggestion_stagger_ms: u64,

    // ── Darstellung ─────────────────────────────────────────────
    /// Füllfarbe des Selektions-Polygons
    pub polygon_fill_color: [f32; 4],
    /// Farbe des Reposition-Markers
    pub reposition_marker_color: [f32; 4],

    // ── Selektion ───────────────────────────────────────────────
    /// Source-IDs, deren Features von der Selektion ausgeschlossen sind
    #[serde(default = "default_base_layer_deny")]
    pub base_layer_deny: Vec<String>,
}

impl Default for PlannerOptions {
    fn default() -> Self {
        Self {
            snap_tolerance_m: SNAP_TOLERANCE_M,
            endpoint_tolerance_m: ENDPOINT_TOLERANCE_M,
            pick_radius_m: PICK_RADIUS_M,

            candidate_limit: CANDIDATE_LIMIT,
            reveal_duration_ms: REVEAL_DURATION_MS,
            suggestion_stagger_ms: SUGGESTION_STAGGER_MS,

            polygon_fill_color: POLYGON_FILL_COLOR,
            reposition_marker_color: REPOSITION_MARKER_COLOR,

            base_layer_deny: default_base_layer_deny(),
        }
    }
}

impl PlannerOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> std::path::PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("ftth_map_editor"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("ftth_map_editor.toml")
    }

    /// Gibt `true` zurück wenn die Source-ID zur Basis-Layer-Deny-Liste gehört.
    pub fn is_base_layer(&self, source: &str) -> bool {
        self.base_layer_deny.iter().any(|s| s == source)
    }
}
