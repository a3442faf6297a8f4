//! Gemeinsame Hilfsfunktionen für Edit-Modi.

use super::ModeProps;
use crate::app::edit_action::{EditAction, EditContext, EditType};
use crate::core::viewport::zoom_or;
use crate::core::{
    Feature, FeatureCollection, FeatureId, FeatureProperties, Geometry, Position, RenderType,
};

/// Schlüssel in `mode_config` für den Freihand-Mindestabstand (Pixel).
pub const MIN_PIXEL_DISTANCE_KEY: &str = "minPixelDistance";

/// Zoom für Pixel-Umrechnungen: Viewport-Zoom oder Options-Fallback.
pub(crate) fn current_zoom(props: &ModeProps<'_>) -> f64 {
    zoom_or(props.viewport, props.options.default_zoom)
}

/// Mindestabstand zwischen Freihand-Punkten; `mode_config` überschreibt die Optionen.
pub(crate) fn min_pixel_distance(props: &ModeProps<'_>) -> f64 {
    props
        .mode_config
        .get(MIN_PIXEL_DISTANCE_KEY)
        .and_then(serde_json::Value::as_f64)
        .unwrap_or(props.options.min_px_distance_between_points)
}

/// Schließt eine Vertex-Liste zum Ring (erster Punkt wird angehängt).
pub(crate) fn closed_ring(vertices: &[Position]) -> Vec<Position> {
    let mut ring = vertices.to_vec();
    if let Some(&first) = vertices.first() {
        ring.push(first);
    }
    ring
}

/// Persistierbares Polygon-Feature mit vorgegebener ID.
pub(crate) fn polygon_feature(id: FeatureId, ring: Vec<Position>) -> Feature {
    Feature {
        id: Some(id),
        properties: FeatureProperties::with_render_type(RenderType::Polygon),
        geometry: Geometry::polygon(ring),
    }
}

/// `ADD_FEATURE`-Action: Feature ans Ende der Collection anhängen.
pub(crate) fn add_feature_action(data: &FeatureCollection, feature: Feature) -> EditAction {
    let new_index = data.len();
    EditAction {
        updated_data: data.with_added(feature),
        edit_type: EditType::AddFeature,
        edit_context: Some(EditContext::features(vec![new_index])),
    }
}
