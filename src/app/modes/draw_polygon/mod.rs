//! Polygon-Modus: Punkte per Klick oder Freihand (gedrückter Zeiger) setzen,
//! Klick auf den ersten Punkt schließt das Polygon.

mod lifecycle;
#[cfg(test)]
mod tests;

use super::common::{
    add_feature_action, closed_ring, current_zoom, min_pixel_distance, polygon_feature,
};
use super::ModeProps;
use crate::app::events::{picked_edit_handle, Pick};
use crate::app::guides::tentative_feature;
use crate::core::geo_math::pixel_distance;
use crate::core::{Feature, FeatureId, Geometry, Position, RenderType};

/// Mindestanzahl Vertices vor dem Schließen des Rings.
const MIN_POLYGON_VERTICES: usize = 3;

/// Polygon im Aufbau.
#[derive(Debug, Clone)]
struct TentativePolygon {
    /// ID bleibt bis zum Commit stabil
    id: FeatureId,
    /// Gesetzte Vertices (offen, ohne Schluss-Punkt)
    vertices: Vec<Position>,
}

/// Polygon-Zeichenmodus (Klick + Freihand).
#[derive(Debug, Clone, Default)]
pub struct DrawPolygonMode {
    tentative: Option<TentativePolygon>,
    /// Freihand-Ring wurde gerade per Drag-Ende geschlossen
    free_draw_closed: bool,
    /// Seit dem letzten Commit wurde freihand gezeichnet
    did_free_draw: bool,
}

impl DrawPolygonMode {
    /// Erstellt den Modus ohne Tentative-Geometrie.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gesetzte Vertices der Tentative-Geometrie.
    pub fn vertices(&self) -> &[Position] {
        self.tentative
            .as_ref()
            .map(|t| t.vertices.as_slice())
            .unwrap_or_default()
    }

    /// Tentative-Guide mit der ID des Polygons im Aufbau.
    fn tentative_guide(&self, geometry: Geometry) -> Feature {
        let mut feature = tentative_feature(geometry, RenderType::Polygon);
        feature.id = self.tentative.as_ref().map(|t| t.id.clone());
        feature
    }

    /// Gemeinsamer Pfad für Klicks und Freihand-Bewegungen.
    ///
    /// `pointer_down` ist während eines Freihand-Drags gesetzt; dann gilt die
    /// Pixel-Sperre und ein Treffer auf Handle 0 schließt den Ring nicht.
    fn place_vertex(
        &mut self,
        map_coords: Position,
        picks: &[Pick],
        pointer_down: bool,
        props: &mut ModeProps<'_>,
    ) {
        if pointer_down {
            self.did_free_draw = true;
        }
        let is_from_drawing = pointer_down && !self.free_draw_closed;

        let Some(tentative) = self.tentative.as_mut() else {
            let id = FeatureId::new();
            log::debug!("Polygon {} begonnen", id);
            self.tentative = Some(TentativePolygon {
                id,
                vertices: vec![map_coords],
            });
            self.free_draw_closed = false;
            return;
        };

        if !is_from_drawing && clicked_first_handle(picks) {
            self.close_ring(props);
        } else {
            let gate_passed = if is_from_drawing {
                let last = tentative.vertices.last().copied().unwrap_or(map_coords);
                pixel_distance(last, map_coords, current_zoom(props)) >= min_pixel_distance(props)
            } else {
                true
            };
            if gate_passed {
                tentative.vertices.push(map_coords);
            }
        }

        self.free_draw_closed = false;
    }

    /// Schließt den Ring und meldet `ADD_FEATURE`.
    ///
    /// Mit weniger als drei Vertices bleibt die Tentative-Geometrie erhalten.
    /// Gibt `true` zurück, wenn ein Polygon gemeldet wurde.
    fn close_ring(&mut self, props: &mut ModeProps<'_>) -> bool {
        let Some(tentative) = self.tentative.as_ref() else {
            return false;
        };
        if tentative.vertices.len() < MIN_POLYGON_VERTICES {
            log::debug!(
                "Polygon {} hat erst {} Punkte, Schließen ignoriert",
                tentative.id,
                tentative.vertices.len()
            );
            return false;
        }
        let Some(tentative) = self.tentative.take() else {
            return false;
        };
        let ring = closed_ring(&tentative.vertices);
        log::debug!("Polygon {} geschlossen ({} Positionen)", tentative.id, ring.len());
        let action = add_feature_action(props.data, polygon_feature(tentative.id, ring));
        props.callbacks.on_edit(action);
        true
    }
}

/// Wurde das erste Handle der Tentative-Geometrie angeklickt?
fn clicked_first_handle(picks: &[Pick]) -> bool {
    picked_edit_handle(picks)
        .is_some_and(|handle| handle.is_tentative() && handle.handle_index() == Some(0))
}
