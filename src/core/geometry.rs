//! GeoJSON-kompatible Geometrie-Typen: Point, LineString, Polygon.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Geographische Position: `x` = Längengrad, `y` = Breitengrad.
///
/// Serialisiert als `[lng, lat]` (glam-Serde-Feature).
pub type Position = DVec2;

/// Mindestanzahl Positionen eines geschlossenen Polygon-Rings (3 + Schluss-Punkt).
pub const MIN_RING_POSITIONS: usize = 4;
/// Mindestanzahl Positionen eines LineStrings.
pub const MIN_LINE_POSITIONS: usize = 2;

/// Geometrie eines Features.
///
/// Entspricht dem GeoJSON-Layout `{"type": "...", "coordinates": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    /// Einzelner Punkt
    Point(Position),
    /// Offener Linienzug
    LineString(Vec<Position>),
    /// Polygon aus Ringen; Ring 0 ist die Außenkontur
    Polygon(Vec<Vec<Position>>),
}

/// GeoJSON-Typname einer Geometrie (ohne Koordinaten).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeometryType {
    /// Punkt
    Point,
    /// Linienzug
    LineString,
    /// Polygon
    Polygon,
}

impl Geometry {
    /// Gibt den GeoJSON-Typ zurück.
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Geometry::Point(_) => GeometryType::Point,
            Geometry::LineString(_) => GeometryType::LineString,
            Geometry::Polygon(_) => GeometryType::Polygon,
        }
    }

    /// Baut ein Polygon mit genau einem Ring.
    pub fn polygon(ring: Vec<Position>) -> Self {
        Geometry::Polygon(vec![ring])
    }

    /// Liefert die "Haupt-Koordinaten" der Geometrie.
    ///
    /// Point → `[p]`, LineString → alle Positionen, Polygon → Außenring.
    /// `None` wenn keine Koordinaten vorhanden sind (leerer Linienzug, Polygon ohne Ring).
    pub fn coordinates(&self) -> Option<Vec<Position>> {
        match self {
            Geometry::Point(p) => Some(vec![*p]),
            Geometry::LineString(line) if !line.is_empty() => Some(line.clone()),
            Geometry::Polygon(rings) => rings.first().filter(|r| !r.is_empty()).cloned(),
            Geometry::LineString(_) => None,
        }
    }

    /// Wendet `f` auf jede Position an und gibt die neue Geometrie zurück.
    pub fn map_positions(&self, mut f: impl FnMut(Position) -> Position) -> Self {
        match self {
            Geometry::Point(p) => Geometry::Point(f(*p)),
            Geometry::LineString(line) => {
                Geometry::LineString(line.iter().map(|&p| f(p)).collect())
            }
            Geometry::Polygon(rings) => Geometry::Polygon(
                rings
                    .iter()
                    .map(|ring| ring.iter().map(|&p| f(p)).collect())
                    .collect(),
            ),
        }
    }

    /// Liest die Position an `position_indexes` (Point: `[]`, Line: `[i]`, Polygon: `[ring, i]`).
    pub fn position_at(&self, position_indexes: &[usize]) -> Option<Position> {
        match (self, position_indexes) {
            (Geometry::Point(p), []) => Some(*p),
            (Geometry::LineString(line), [i]) => line.get(*i).copied(),
            (Geometry::Polygon(rings), [r, i]) => rings.get(*r)?.get(*i).copied(),
            _ => None,
        }
    }

    /// Gesamtzahl aller Positionen.
    pub fn position_count(&self) -> usize {
        match self {
            Geometry::Point(_) => 1,
            Geometry::LineString(line) => line.len(),
            Geometry::Polygon(rings) => rings.iter().map(Vec::len).sum(),
        }
    }
}

/// Prüft ob ein Ring geschlossen ist (erster == letzter Punkt, mind. 4 Positionen).
pub fn is_closed_ring(ring: &[Position]) -> bool {
    ring.len() >= MIN_RING_POSITIONS && ring.first() == ring.last()
}
