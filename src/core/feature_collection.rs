//! Unveränderliche Feature-Collection mit Copy-on-Write-Semantik.
//!
//! Jede Operation gibt eine neue Collection zurück; das Original bleibt
//! unangetastet. Features werden per `Arc` geteilt, so dass ein Update nur
//! das betroffene Feature neu alloziert (analog zum Arc-Snapshot der Historie).

use super::error::EditError;
use super::feature::Feature;
use super::geometry::{
    Geometry, GeometryType, Position, MIN_LINE_POSITIONS, MIN_RING_POSITIONS,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Geordnete Feature-Liste; die Position eines Features ist sein "Feature-Index".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "FeatureCollection")]
pub struct FeatureCollection {
    features: Vec<Arc<Feature>>,
}

impl FeatureCollection {
    /// Erstellt eine leere Collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Erstellt eine Collection aus einer Feature-Liste.
    pub fn from_features(features: impl IntoIterator<Item = Feature>) -> Self {
        Self {
            features: features.into_iter().map(Arc::new).collect(),
        }
    }

    /// Liest eine GeoJSON-FeatureCollection.
    pub fn from_geojson_str(json: &str) -> Result<Self, EditError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Schreibt die Collection als GeoJSON.
    pub fn to_geojson_string(&self) -> Result<String, EditError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Anzahl Features.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Ist die Collection leer?
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Feature am Index.
    pub fn get(&self, index: usize) -> Option<&Feature> {
        self.features.get(index).map(Arc::as_ref)
    }

    /// Iteriert über alle Features in Index-Reihenfolge.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Feature> + ExactSizeIterator {
        self.features.iter().map(Arc::as_ref)
    }

    /// Teilmenge in der Reihenfolge von `indexes` (ungültige Indizes werden übersprungen).
    pub fn subset(&self, indexes: &[usize]) -> Self {
        Self {
            features: indexes
                .iter()
                .filter_map(|&i| self.features.get(i).cloned())
                .collect(),
        }
    }

    /// Neue Collection mit angehängtem Feature.
    pub fn with_added(&self, feature: Feature) -> Self {
        let mut features = self.features.clone();
        features.push(Arc::new(feature));
        Self { features }
    }

    /// Neue Collection ohne die Features an `indexes`.
    ///
    /// Ungültige Indizes werden ignoriert; die Reihenfolge der übrigen bleibt erhalten.
    pub fn with_removed(&self, indexes: &[usize]) -> Self {
        Self {
            features: self
                .features
                .iter()
                .enumerate()
                .filter(|(i, _)| !indexes.contains(i))
                .map(|(_, f)| Arc::clone(f))
                .collect(),
        }
    }

    /// Neue Collection, in der die Geometrie eines Features ersetzt ist.
    pub fn with_replaced_geometry(
        &self,
        index: usize,
        geometry: Geometry,
    ) -> Result<Self, EditError> {
        self.with_edited_geometry(index, |_| Ok(geometry))
    }

    /// Ersetzt eine einzelne Position.
    ///
    /// Bei Polygon-Ringen wird der Schluss-Punkt mitgeführt, wenn die erste
    /// oder letzte Position betroffen ist.
    pub fn with_replaced_position(
        &self,
        index: usize,
        position_indexes: &[usize],
        position: Position,
    ) -> Result<Self, EditError> {
        self.with_edited_geometry(index, |geometry| {
            let mut geometry = geometry.clone();
            let invalid = position_error(position_indexes, &geometry);
            match (&mut geometry, position_indexes) {
                (Geometry::Point(p), []) => *p = position,
                (Geometry::LineString(line), [i]) if *i < line.len() => line[*i] = position,
                (Geometry::Polygon(rings), [r, i])
                    if rings.get(*r).is_some_and(|ring| *i < ring.len()) =>
                {
                    let ring = &mut rings[*r];
                    let last = ring.len() - 1;
                    if *i == 0 || *i == last {
                        ring[0] = position;
                        ring[last] = position;
                    } else {
                        ring[*i] = position;
                    }
                }
                _ => return Err(invalid),
            }
            Ok(geometry)
        })
    }

    /// Fügt eine Position vor `position_indexes` ein.
    pub fn with_added_position(
        &self,
        index: usize,
        position_indexes: &[usize],
        position: Position,
    ) -> Result<Self, EditError> {
        self.with_edited_geometry(index, |geometry| {
            let mut geometry = geometry.clone();
            let invalid = position_error(position_indexes, &geometry);
            match (&mut geometry, position_indexes) {
                (Geometry::Point(_), _) => {
                    return Err(EditError::UnsupportedGeometry(GeometryType::Point))
                }
                (Geometry::LineString(line), [i]) if *i <= line.len() => line.insert(*i, position),
                (Geometry::Polygon(rings), [r, i])
                    if rings.get(*r).is_some_and(|ring| *i < ring.len()) =>
                {
                    let ring = &mut rings[*r];
                    ring.insert(*i, position);
                    if *i == 0 {
                        let last = ring.len() - 1;
                        ring[last] = position;
                    }
                }
                _ => return Err(invalid),
            }
            Ok(geometry)
        })
    }

    /// Entfernt eine Position.
    ///
    /// Schlägt fehl, wenn die Geometrie danach ihre Mindestgröße unterschreiten würde.
    pub fn with_removed_position(
        &self,
        index: usize,
        position_indexes: &[usize],
    ) -> Result<Self, EditError> {
        self.with_edited_geometry(index, |geometry| {
            let mut geometry = geometry.clone();
            let invalid = position_error(position_indexes, &geometry);
            match (&mut geometry, position_indexes) {
                (Geometry::Point(_), _) => {
                    return Err(EditError::UnsupportedGeometry(GeometryType::Point))
                }
                (Geometry::LineString(line), [i]) if *i < line.len() => {
                    if line.len() <= MIN_LINE_POSITIONS {
                        return Err(EditError::TooFewPositions {
                            geometry_type: GeometryType::LineString,
                            min: MIN_LINE_POSITIONS,
                        });
                    }
                    line.remove(*i);
                }
                (Geometry::Polygon(rings), [r, i])
                    if rings.get(*r).is_some_and(|ring| *i < ring.len()) =>
                {
                    let ring = &mut rings[*r];
                    if ring.len() <= MIN_RING_POSITIONS {
                        return Err(EditError::TooFewPositions {
                            geometry_type: GeometryType::Polygon,
                            min: MIN_RING_POSITIONS,
                        });
                    }
                    let last = ring.len() - 1;
                    if *i == 0 || *i == last {
                        // Schluss-Punkt folgt dem neuen Start
                        ring.remove(last);
                        ring.remove(0);
                        let first = ring[0];
                        ring.push(first);
                    } else {
                        ring.remove(*i);
                    }
                }
                _ => return Err(invalid),
            }
            Ok(geometry)
        })
    }

    /// Gemeinsamer Rahmen aller Geometrie-Updates: Index prüfen, nur das
    /// betroffene Feature neu allozieren.
    fn with_edited_geometry(
        &self,
        index: usize,
        edit: impl FnOnce(&Geometry) -> Result<Geometry, EditError>,
    ) -> Result<Self, EditError> {
        let feature = self
            .features
            .get(index)
            .ok_or(EditError::FeatureIndexOutOfRange {
                index,
                len: self.features.len(),
            })?;
        let geometry = edit(&feature.geometry)?;

        let mut features = self.features.clone();
        features[index] = Arc::new(Feature {
            geometry,
            ..Feature::clone(feature)
        });
        Ok(Self { features })
    }
}

fn position_error(position_indexes: &[usize], geometry: &Geometry) -> EditError {
    EditError::PositionIndexOutOfRange {
        position_indexes: position_indexes.to_vec(),
        geometry_type: geometry.geometry_type(),
    }
}
