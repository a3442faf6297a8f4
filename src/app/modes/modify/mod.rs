//! Modify-Modus: Vertices selektierter Features verschieben, einfügen und
//! entfernen.
//!
//! - Drag auf ein Handle verschiebt die Position (Vorschau in den Guides)
//! - Klick auf ein Zwischen-Handle fügt eine Position ein
//! - Alt-Klick auf ein Handle entfernt die Position

mod lifecycle;

use super::common::current_zoom;
use super::ModeProps;
use crate::app::edit_action::{EditAction, EditContext, EditType};
use crate::core::geo_math::{closest_point_on_segment, pixel_distance, update_rectangle_position};
use crate::core::{EditError, FeatureCollection, Geometry, Position, RenderType};

/// Einfüge-Kandidat auf einem Segment (Zwischen-Handle).
#[derive(Debug, Clone, PartialEq)]
struct IntermediatePoint {
    feature_index: usize,
    /// Einfüge-Pfad: die neue Position landet an dieser Stelle
    position_indexes: Vec<usize>,
    position: Position,
}

/// Laufendes Verschieben eines Handles.
#[derive(Debug, Clone)]
struct DragState {
    feature_index: usize,
    position_indexes: Vec<usize>,
    /// Geometrie mit verschobener Position
    preview: Geometry,
}

/// Vertex-Bearbeitungsmodus.
#[derive(Debug, Clone, Default)]
pub struct ModifyMode {
    intermediate: Option<IntermediatePoint>,
    drag: Option<DragState>,
}

impl ModifyMode {
    /// Erstellt den Modus ohne laufenden Drag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wird gerade ein Handle gezogen?
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Sucht den nächsten Segmentpunkt der Selektion innerhalb der Toleranz.
    fn find_intermediate(
        &self,
        cursor: Position,
        props: &ModeProps<'_>,
    ) -> Option<IntermediatePoint> {
        let zoom = current_zoom(props);
        let tolerance = props.options.intermediate_handle_tolerance_px;
        let mut best: Option<(f64, IntermediatePoint)> = None;

        for &feature_index in props.selected_indexes {
            let Some(feature) = props.data.get(feature_index) else {
                continue;
            };
            for (path, a, b) in segments(&feature.geometry) {
                let Some(q) = closest_point_on_segment(a, b, cursor) else {
                    continue;
                };
                let distance = pixel_distance(q, cursor, zoom);
                if distance > tolerance || best.as_ref().is_some_and(|(d, _)| *d <= distance) {
                    continue;
                }
                best = Some((
                    distance,
                    IntermediatePoint {
                        feature_index,
                        position_indexes: path,
                        position: q,
                    },
                ));
            }
        }
        best.map(|(_, point)| point)
    }
}

/// Alle Segmente einer Geometrie mit dem Einfüge-Pfad hinter ihrem Start.
///
/// LineString-Segment `i` → `[i + 1]`, Polygon-Ring `r` Segment `i` → `[r, i + 1]`.
fn segments(geometry: &Geometry) -> Vec<(Vec<usize>, Position, Position)> {
    match geometry {
        Geometry::Point(_) => Vec::new(),
        Geometry::LineString(line) => line
            .windows(2)
            .enumerate()
            .map(|(i, w)| (vec![i + 1], w[0], w[1]))
            .collect(),
        Geometry::Polygon(rings) => rings
            .iter()
            .enumerate()
            .flat_map(|(r, ring)| {
                ring.windows(2)
                    .enumerate()
                    .map(move |(i, w)| (vec![r, i + 1], w[0], w[1]))
            })
            .collect(),
    }
}

/// Collection mit verschobener Position.
///
/// Rechtecke bleiben Rechtecke: die Nachbarecken werden mitgezogen.
fn moved_data(
    data: &FeatureCollection,
    feature_index: usize,
    position_indexes: &[usize],
    position: Position,
) -> Result<FeatureCollection, EditError> {
    let feature = data
        .get(feature_index)
        .ok_or(EditError::FeatureIndexOutOfRange {
            index: feature_index,
            len: data.len(),
        })?;

    if feature.properties.render_type == Some(RenderType::Rectangle) {
        let rectangle = position_indexes
            .last()
            .and_then(|&i| update_rectangle_position(&feature.geometry, i, position));
        if let Some(geometry) = rectangle {
            return data.with_replaced_geometry(feature_index, geometry);
        }
    }
    data.with_replaced_position(feature_index, position_indexes, position)
}

/// Action mit Kontext für eine einzelne Position.
fn position_action(
    updated_data: FeatureCollection,
    edit_type: EditType,
    feature_index: usize,
    position_indexes: Vec<usize>,
    position: Option<Position>,
) -> EditAction {
    EditAction {
        updated_data,
        edit_type,
        edit_context: Some(EditContext {
            feature_indexes: vec![feature_index],
            position_indexes: Some(position_indexes),
            position,
        }),
    }
}
