//! Core-Domänentypen: Geometrien, Features, Feature-Collection, Geo-Mathematik.

pub mod error;
pub mod feature;
pub mod feature_collection;
/// Geometrie-Hilfsfunktionen (Distanz, Kurs, Projektion, Schnittpunkte)
///
/// Alle Funktionen sind rein und arbeiten auf `[lng, lat]`-Positionen.
pub mod geo_math;
pub mod geometry;
pub mod simplify;
pub mod viewport;

pub use error::EditError;
pub use feature::{
    EditHandleType, Feature, FeatureId, FeatureProperties, GuideType, RenderType,
    TENTATIVE_FEATURE_INDEX,
};
pub use feature_collection::FeatureCollection;
pub use geometry::{is_closed_ring, Geometry, GeometryType, Position};
pub use simplify::{douglas_peucker, simplify_path, simplify_polygon, SimplifyOptions};
pub use viewport::Viewport;
