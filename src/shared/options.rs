//! Zentrale Konfiguration des Geo-Draw-Editors.
//!
//! `EditorOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use crate::core::SimplifyOptions;
use serde::{Deserialize, Serialize};

// ── Zeichnen ────────────────────────────────────────────────────────

/// Mindestabstand (Pixel) zwischen zwei Freihand-Punkten.
pub const MIN_PX_DISTANCE_BETWEEN_POINTS: f64 = 10.0;
/// Zoom, wenn der Host keinen Viewport liefert.
pub const DEFAULT_ZOOM: f64 = 14.0;

// ── Gesten ──────────────────────────────────────────────────────────

/// Zeigerweg (Pixel), ab dem ein Pointer-Down als Drag statt Klick gilt.
pub const DRAG_THRESHOLD_PX: f64 = 3.0;
/// Pick-Toleranz (Pixel) für Zwischen-Handles im Modify-Modus.
pub const INTERMEDIATE_HANDLE_TOLERANCE_PX: f64 = 12.0;
/// Trefferradius (Pixel) für Handles und Linien beim Picking.
pub const PICK_RADIUS_PX: f64 = 8.0;

// ── Vereinfachung ───────────────────────────────────────────────────

/// Maximale Eckenzahl bei automatischer Polygon-Vereinfachung.
pub const SIMPLIFY_MAX_VERTICES: usize = 50;

// ── Laufzeit-Optionen (serialisierbar) ─────────────────────────────

/// Alle zur Laufzeit änderbaren Editor-Optionen.
/// Wird als `geo_draw_editor.toml` neben der Binary gespeichert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorOptions {
    // ── Zeichnen ────────────────────────────────────────────────
    /// Mindestabstand zwischen Freihand-Punkten in Pixeln
    pub min_px_distance_between_points: f64,
    /// Zoom-Fallback ohne Viewport
    pub default_zoom: f64,

    // ── Gesten ──────────────────────────────────────────────────
    /// Drag-Schwelle in Pixeln
    pub drag_threshold_px: f64,
    /// Pick-Toleranz für Zwischen-Handles in Pixeln
    pub intermediate_handle_tolerance_px: f64,
    /// Trefferradius beim Picking in Pixeln
    #[serde(default = "default_pick_radius_px")]
    pub pick_radius_px: f64,

    // ── Commit-Verhalten ────────────────────────────────────────
    /// Neu hinzugefügte Polygone vereinfachen
    #[serde(default)]
    pub simplify_on_add: bool,
    /// Maximale Eckenzahl beim Vereinfachen
    #[serde(default = "default_simplify_max_vertices")]
    pub simplify_max_vertices: usize,
    /// Kollineare (flache) Polygone ablehnen
    #[serde(default = "default_reject_collinear_polygons")]
    pub reject_collinear_polygons: bool,
    /// Obergrenze der Feature-Anzahl (None = unbegrenzt)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_features: Option<usize>,

    // ── Vereinfachung ───────────────────────────────────────────
    /// Parameter der Douglas-Peucker-Vereinfachung
    #[serde(default)]
    pub simplify: SimplifyOptions,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            min_px_distance_between_points: MIN_PX_DISTANCE_BETWEEN_POINTS,
            default_zoom: DEFAULT_ZOOM,

            drag_threshold_px: DRAG_THRESHOLD_PX,
            intermediate_handle_tolerance_px: INTERMEDIATE_HANDLE_TOLERANCE_PX,
            pick_radius_px: PICK_RADIUS_PX,

            simplify_on_add: false,
            simplify_max_vertices: SIMPLIFY_MAX_VERTICES,
            reject_collinear_polygons: true,
            max_features: None,

            simplify: SimplifyOptions::default(),
        }
    }
}

fn default_pick_radius_px() -> f64 {
    PICK_RADIUS_PX
}

fn default_simplify_max_vertices() -> usize {
    SIMPLIFY_MAX_VERTICES
}

fn default_reject_collinear_polygons() -> bool {
    true
}

impl EditorOptions {
    /// Lädt Optionen aus einer TOML-Datei. Fehlt die Datei oder ist sie
    /// fehlerhaft, werden Standardwerte verwendet.
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

    /// Speichert die Optionen als TOML.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Standard-Pfad der Optionen-Datei (neben der Binary).
    pub fn config_path() -> std::path::PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("geo-draw-replay"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("geo_draw_editor.toml")
    }
}
