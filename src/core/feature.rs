//! Feature-Typ mit Properties (Render-Typ, Guide-Typ, Edit-Handle-Felder).

use super::geometry::{Geometry, Position};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Feature-Index für Edit-Handles der Tentative-Geometrie (nicht persistiert).
pub const TENTATIVE_FEATURE_INDEX: i64 = -1;

/// Feature-ID.
///
/// Neu gezeichnete Features bekommen eine UUID v4; importierte Features
/// behalten ihre GeoJSON-ID (beliebiger String oder Zahl).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureId {
    /// Vom Editor vergebene ID
    Uuid(Uuid),
    /// Importierte String-ID
    Text(String),
    /// Importierte numerische ID
    Number(serde_json::Number),
}

impl FeatureId {
    /// Erzeugt eine neue zufällige ID (UUID v4).
    pub fn new() -> Self {
        FeatureId::Uuid(Uuid::new_v4())
    }
}

impl Default for FeatureId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for FeatureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeatureId::Uuid(id) => id.fmt(f),
            FeatureId::Text(id) => f.write_str(id),
            FeatureId::Number(id) => id.fmt(f),
        }
    }
}

/// Wie der Renderer ein Feature darstellt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderType {
    /// Punkt-Marker
    Point,
    /// Linienzug
    LineString,
    /// Freies Polygon
    Polygon,
    /// Achsenparalleles Rechteck (Ecken bleiben beim Verschieben rechtwinklig)
    Rectangle,
}

/// Kennzeichnet ephemere Vorschau-Features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GuideType {
    /// Geometrie im Aufbau
    Tentative,
    /// Anfass-Punkt über einem Kontrollpunkt
    EditHandle,
    /// Handle an der aktuellen Zeigerposition
    CursorEditHandle,
}

/// Art eines Edit-Handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EditHandleType {
    /// Existierende Position der Geometrie
    Existing,
    /// Einfüge-Position auf einem Segment
    Intermediate,
}

/// Properties eines Features.
///
/// Bekannte Schlüssel sind typisiert, alle weiteren landen in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureProperties {
    /// Darstellungsart
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub render_type: Option<RenderType>,
    /// Guide-Kennzeichnung (nur Vorschau-Features)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guide_type: Option<GuideType>,
    /// Handle-Art (nur Edit-Handles)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit_handle_type: Option<EditHandleType>,
    /// Index des zugehörigen Features, `-1` für die Tentative-Geometrie
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_index: Option<i64>,
    /// Positions-Pfad innerhalb der Geometrie
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_indexes: Option<Vec<usize>>,
    /// Freie Zusatz-Properties
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl FeatureProperties {
    /// Properties eines persistierten Features mit Render-Typ.
    pub fn with_render_type(render_type: RenderType) -> Self {
        Self {
            render_type: Some(render_type),
            ..Self::default()
        }
    }

    /// Properties einer Tentative-Geometrie.
    pub fn tentative(render_type: RenderType) -> Self {
        Self {
            render_type: Some(render_type),
            guide_type: Some(GuideType::Tentative),
            ..Self::default()
        }
    }
}

/// GeoJSON-Feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "Feature")]
pub struct Feature {
    /// Eindeutige ID; bleibt vom Tentative-Zustand bis zum Commit stabil
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<FeatureId>,
    /// Properties (`null` und fehlend ergeben leere Properties)
    #[serde(default, deserialize_with = "nullable_properties")]
    pub properties: FeatureProperties,
    /// Geometrie
    pub geometry: Geometry,
}

/// GeoJSON erlaubt `"properties": null`.
fn nullable_properties<'de, D>(deserializer: D) -> Result<FeatureProperties, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<FeatureProperties>::deserialize(deserializer)?.unwrap_or_default())
}

impl Feature {
    /// Erstellt ein Feature mit frischer ID.
    pub fn new(geometry: Geometry, properties: FeatureProperties) -> Self {
        Self {
            id: Some(FeatureId::new()),
            properties,
            geometry,
        }
    }

    /// Erstellt ein Vorschau-Feature ohne ID.
    pub fn guide(geometry: Geometry, properties: FeatureProperties) -> Self {
        Self {
            id: None,
            properties,
            geometry,
        }
    }

    /// Koordinaten-Ring bzw. -Liste des Features.
    ///
    /// Polygon → Außenring, sonst alle Positionen. `None` wenn die Geometrie
    /// keine Koordinaten trägt; Aufrufer überspringen dann z.B. die Guide-Erzeugung.
    pub fn coordinates(&self) -> Option<Vec<Position>> {
        self.geometry.coordinates()
    }

    /// Ist das Feature ein Guide (Tentative oder Handle)?
    pub fn is_guide(&self) -> bool {
        self.properties.guide_type.is_some()
    }
}
