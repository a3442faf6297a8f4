//! Guide-Features: ephemere Vorschau-Geometrie (Tentative + Edit-Handles).
//!
//! Guides werden bei jedem Aufruf aus dem Modus-Zustand neu abgeleitet und
//! nie in die persistierte Collection übernommen.

use super::events::{EditHandlePick, Pick};
use crate::core::{
    EditHandleType, Feature, FeatureProperties, Geometry, GuideType, Position, RenderType,
    TENTATIVE_FEATURE_INDEX,
};
use serde::{Deserialize, Serialize};

/// Liste der Vorschau-Features eines Modus.
///
/// Serialisiert wie eine GeoJSON-FeatureCollection, damit der Renderer sie
/// als weitere Ebene zeichnen kann.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "FeatureCollection")]
pub struct GuideFeatureCollection {
    /// Tentative-Geometrie und Handles
    pub features: Vec<Feature>,
}

impl GuideFeatureCollection {
    /// Leere Guide-Liste.
    pub fn new() -> Self {
        Self::default()
    }

    /// Anzahl Guides.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Keine Guides vorhanden?
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Die Tentative-Geometrie, falls vorhanden.
    pub fn tentative(&self) -> Option<&Feature> {
        self.features
            .iter()
            .find(|f| f.properties.guide_type == Some(GuideType::Tentative))
    }

    /// Alle Edit-Handles mit ihrem Guide-Index (ohne Cursor-Handle).
    pub fn edit_handles(&self) -> impl Iterator<Item = (usize, &Feature)> {
        self.features
            .iter()
            .enumerate()
            .filter(|(_, f)| f.properties.guide_type == Some(GuideType::EditHandle))
    }

    /// Baut einen Pick für den Guide an `guide_index`, sofern er ein Edit-Handle ist.
    pub fn edit_handle_pick(&self, guide_index: usize) -> Option<Pick> {
        let feature = self.features.get(guide_index)?;
        let props = &feature.properties;
        if props.guide_type != Some(GuideType::EditHandle) {
            return None;
        }
        let feature_index = match props.feature_index {
            Some(TENTATIVE_FEATURE_INDEX) | None => None,
            Some(i) => Some(usize::try_from(i).ok()?),
        };
        let handle = EditHandlePick {
            handle_type: props.edit_handle_type.unwrap_or(EditHandleType::Existing),
            feature_index,
            position_indexes: props.position_indexes.clone().unwrap_or_default(),
        };
        Some(Pick::edit_handle(handle, Some(guide_index)))
    }
}

/// Properties eines Edit-Handles.
fn handle_properties(
    handle_type: EditHandleType,
    feature_index: Option<usize>,
    position_indexes: Vec<usize>,
) -> FeatureProperties {
    let feature_index = feature_index
        .and_then(|i| i64::try_from(i).ok())
        .unwrap_or(TENTATIVE_FEATURE_INDEX);
    FeatureProperties {
        guide_type: Some(GuideType::EditHandle),
        edit_handle_type: Some(handle_type),
        feature_index: Some(feature_index),
        position_indexes: Some(position_indexes),
        ..FeatureProperties::default()
    }
}

/// Ein einzelnes Edit-Handle als Punkt-Feature.
pub fn edit_handle(
    position: Position,
    handle_type: EditHandleType,
    feature_index: Option<usize>,
    position_indexes: Vec<usize>,
) -> Feature {
    Feature::guide(
        Geometry::Point(position),
        handle_properties(handle_type, feature_index, position_indexes),
    )
}

/// Edit-Handles für alle Positionen einer Geometrie.
///
/// Point → `[]`, LineString → `[i]`, Polygon → `[ring, i]` ohne den
/// Schluss-Punkt jedes Rings. `feature_index = None` markiert Handles der
/// Tentative-Geometrie.
pub fn edit_handles_for_geometry(
    geometry: &Geometry,
    feature_index: Option<usize>,
    handle_type: EditHandleType,
) -> Vec<Feature> {
    match geometry {
        Geometry::Point(p) => vec![edit_handle(*p, handle_type, feature_index, Vec::new())],
        Geometry::LineString(line) => line
            .iter()
            .enumerate()
            .map(|(i, &p)| edit_handle(p, handle_type, feature_index, vec![i]))
            .collect(),
        Geometry::Polygon(rings) => rings
            .iter()
            .enumerate()
            .flat_map(|(r, ring)| {
                let open = ring.len().saturating_sub(1);
                ring.iter()
                    .take(open)
                    .enumerate()
                    .map(move |(i, &p)| edit_handle(p, handle_type, feature_index, vec![r, i]))
            })
            .collect(),
    }
}

/// Handle an der Zeigerposition (Cursor-Handle der Freihand-Vorschau).
pub fn cursor_edit_handle(position: Position, handle_index: usize) -> Feature {
    Feature::guide(
        Geometry::Point(position),
        FeatureProperties {
            render_type: Some(RenderType::Polygon),
            guide_type: Some(GuideType::CursorEditHandle),
            position_indexes: Some(vec![handle_index]),
            ..FeatureProperties::default()
        },
    )
}

/// Tentative-Vorschau mit gegebener Geometrie.
pub fn tentative_feature(geometry: Geometry, render_type: RenderType) -> Feature {
    Feature::guide(geometry, FeatureProperties::tentative(render_type))
}
