//! Fehler-Typen der Core-Operationen.

use super::geometry::GeometryType;

/// Fehler bei Operationen auf der Feature-Collection oder beim GeoJSON-Import.
///
/// Modi behandeln diese Fehler "fail-soft": Die Interaktion wird verworfen
/// und ein `log::warn!` geschrieben, es gibt keine Benutzer-Fehlermeldung.
#[derive(Debug, thiserror::Error)]
pub enum EditError {
    /// Feature-Index liegt außerhalb der Collection
    #[error("Feature-Index {index} außerhalb der Collection (Länge {len})")]
    FeatureIndexOutOfRange {
        /// Angefragter Index
        index: usize,
        /// Anzahl Features
        len: usize,
    },
    /// Positions-Pfad passt nicht zur Geometrie
    #[error("Ungültiger Positions-Pfad {position_indexes:?} für {geometry_type:?}")]
    PositionIndexOutOfRange {
        /// Angefragter Pfad
        position_indexes: Vec<usize>,
        /// Typ der Ziel-Geometrie
        geometry_type: GeometryType,
    },
    /// Operation ist für diesen Geometrie-Typ nicht definiert
    #[error("Operation für {0:?} nicht unterstützt")]
    UnsupportedGeometry(GeometryType),
    /// Nach der Operation hätte die Geometrie zu wenige Positionen
    #[error("{geometry_type:?} bräuchte mindestens {min} Positionen")]
    TooFewPositions {
        /// Typ der Ziel-Geometrie
        geometry_type: GeometryType,
        /// Mindestanzahl
        min: usize,
    },
    /// GeoJSON konnte nicht gelesen/geschrieben werden
    #[error("GeoJSON-Fehler: {0}")]
    Json(#[from] serde_json::Error),
}
