//! Viewport-Zustand der Karte (vom Host geliefert, hier nur gelesen).

use super::geo_math;
use super::geometry::Position;
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Kartenausschnitt im Web-Mercator-Sinne.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Breite in Pixeln
    pub width: f64,
    /// Höhe in Pixeln
    pub height: f64,
    /// Längengrad des Mittelpunkts
    pub longitude: f64,
    /// Breitengrad des Mittelpunkts
    pub latitude: f64,
    /// Zoomstufe (0 = ganze Welt)
    pub zoom: f64,
    /// Kartendrehung in Grad
    #[serde(default)]
    pub bearing: f64,
    /// Neigung in Grad
    #[serde(default)]
    pub pitch: f64,
}

impl Viewport {
    /// Erstellt einen ungedrehten Viewport.
    pub fn new(width: f64, height: f64, center: Position, zoom: f64) -> Self {
        Self {
            width,
            height,
            longitude: center.x,
            latitude: center.y,
            zoom,
            bearing: 0.0,
            pitch: 0.0,
        }
    }

    /// Mittelpunkt als Position.
    pub fn center(&self) -> Position {
        DVec2::new(self.longitude, self.latitude)
    }

    /// Projiziert eine Position in Bildschirm-Pixel (Web-Mercator, ohne Drehung).
    pub fn project(&self, position: Position) -> DVec2 {
        let scale = world_scale(self.zoom);
        let offset = DVec2::new(self.width, self.height) * 0.5;
        (mercator(position) - mercator(self.center())) * scale + offset
    }

    /// Umkehrung von [`Viewport::project`].
    pub fn unproject(&self, screen: DVec2) -> Position {
        let scale = world_scale(self.zoom);
        let offset = DVec2::new(self.width, self.height) * 0.5;
        inverse_mercator((screen - offset) / scale + mercator(self.center()))
    }

    /// Pixel-Abstand zweier Positionen bei aktuellem Zoom.
    pub fn pixel_distance(&self, p1: Position, p2: Position) -> f64 {
        geo_math::pixel_distance(p1, p2, self.zoom)
    }
}

/// Kantenlänge der Welt in Pixeln bei `zoom` (512er Kacheln).
fn world_scale(zoom: f64) -> f64 {
    512.0 * 2f64.powf(zoom)
}

/// Web-Mercator in Einheiten der Weltbreite (0..1), y nach unten.
fn mercator(position: Position) -> DVec2 {
    let lat = position.y.to_radians();
    DVec2::new(
        (position.x + 180.0) / 360.0,
        (1.0 - (std::f64::consts::FRAC_PI_4 + lat / 2.0).tan().ln() / std::f64::consts::PI) / 2.0,
    )
}

fn inverse_mercator(world: DVec2) -> Position {
    let lng = world.x * 360.0 - 180.0;
    let n = std::f64::consts::PI * (1.0 - 2.0 * world.y);
    let lat = n.sinh().atan().to_degrees();
    DVec2::new(lng, lat)
}

/// Zoom des Viewports oder `fallback`, wenn keiner bekannt ist.
///
/// Ein Zoom von 0 gilt als "unbekannt".
pub fn zoom_or(viewport: Option<&Viewport>, fallback: f64) -> f64 {
    viewport
        .map(|v| v.zoom)
        .filter(|&zoom| zoom != 0.0)
        .unwrap_or(fallback)
}
