//! 90°-Polygon-Modus: jeder neue Punkt wird rechtwinklig zur letzten Kante
//! projiziert; beim Schließen wird eine passende rechtwinklige Ecke gesucht.

mod geometry;
mod lifecycle;

pub use geometry::{finalized_coordinates, intermediate_point};

use super::common::{add_feature_action, polygon_feature};
use super::ModeProps;
use crate::app::events::{picked_edit_handle, Pick};
use crate::core::geo_math::points_parallel_to_line;
use crate::core::{FeatureId, Geometry, Position};

/// Rechtwinkliger Polygon-Zeichenmodus.
#[derive(Debug, Clone, Default)]
pub struct Draw90DegreePolygonMode {
    /// Geklickte Positionen (der letzte Klick wird auf die Projektion gezogen)
    click_sequence: Vec<Position>,
    /// Vorschau-Geometrie (LineString bis 2 Klicks, danach Polygon)
    tentative: Option<Geometry>,
    /// ID des Polygons im Aufbau
    tentative_id: Option<FeatureId>,
}

impl Draw90DegreePolygonMode {
    /// Erstellt den Modus ohne Klick-Folge.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bisherige Klick-Folge.
    pub fn click_sequence(&self) -> &[Position] {
        &self.click_sequence
    }

    /// Aktuelle Vorschau-Geometrie.
    pub fn tentative_geometry(&self) -> Option<&Geometry> {
        self.tentative.as_ref()
    }

    /// Position `index` der Vorschau (LineString direkt, Polygon im Außenring).
    fn tentative_position(&self, index: usize) -> Option<Position> {
        match self.tentative.as_ref()? {
            Geometry::LineString(line) => line.get(index).copied(),
            Geometry::Polygon(rings) => rings.first()?.get(index).copied(),
            Geometry::Point(_) => None,
        }
    }

    /// Baut die Vorschau für die Zeigerposition neu.
    ///
    /// Der letzte Klick rastet auf die zuletzt angezeigte (projizierte)
    /// Position ein, danach wird der nächste Punkt senkrecht zur letzten
    /// Kante projiziert.
    fn update_tentative(&mut self, map_coords: Position) {
        let n = self.click_sequence.len();
        if n == 0 {
            return;
        }
        if let Some(snapped) = self.tentative_position(n - 1) {
            self.click_sequence[n - 1] = snapped;
        }

        let p3 = if n == 1 {
            map_coords
        } else {
            let [p3, _] = points_parallel_to_line(
                self.click_sequence[n - 2],
                self.click_sequence[n - 1],
                map_coords,
            );
            p3
        };

        let mut coordinates = self.click_sequence.clone();
        coordinates.push(p3);
        self.tentative = Some(if n < 3 {
            Geometry::LineString(coordinates)
        } else {
            coordinates.push(self.click_sequence[0]);
            Geometry::polygon(coordinates)
        });
        self.tentative_id.get_or_insert_with(FeatureId::new);
    }

    /// Prüft ob der Klick das Polygon abschließt (erstes oder letztes Handle
    /// der Tentative-Geometrie) und meldet ggf. `ADD_FEATURE`.
    fn try_finalize(&mut self, picks: &[Pick], props: &mut ModeProps<'_>) {
        let Some(Geometry::Polygon(rings)) = self.tentative.as_ref() else {
            return;
        };
        let Some(ring) = rings.first() else {
            return;
        };
        let Some(handle) = picked_edit_handle(picks) else {
            return;
        };
        let last_click_index = ring.len().checked_sub(3);
        let clicked_end = handle.is_tentative()
            && handle
                .position_indexes
                .get(1)
                .is_some_and(|&i| i == 0 || Some(i) == last_click_index);
        if !clicked_end {
            return;
        }

        let finalized = finalized_coordinates(ring);
        let id = self.tentative_id.take().unwrap_or_default();
        log::debug!("90°-Polygon {} abgeschlossen ({} Positionen)", id, finalized.len());
        self.click_sequence.clear();
        self.tentative = None;

        let action = add_feature_action(props.data, polygon_feature(id, finalized));
        props.callbacks.on_edit(action);
    }
}
