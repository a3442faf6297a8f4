//! Edit-Actions: Änderungsvorschläge der Modi an den Host.
//!
//! Ein Modus mutiert nie die persistierten Daten. Er baut die neue
//! Collection (`updated_data`) und überlässt dem Host die Übernahme.

use crate::core::{FeatureCollection, Position};
use serde::{Deserialize, Serialize};

/// Art der Änderung.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EditType {
    /// Neues Feature angehängt
    #[serde(rename = "ADD_FEATURE")]
    AddFeature,
    /// Position in eine Geometrie eingefügt
    #[serde(rename = "ADD_POSITION")]
    AddPosition,
    /// Position aus einer Geometrie entfernt
    #[serde(rename = "REMOVE_POSITION")]
    RemovePosition,
    /// Verschieben einer Position abgeschlossen
    #[serde(rename = "FINISH_MOVE_POSITION")]
    FinishMovePosition,
    /// Verschieben der Selektion läuft (Live-Vorschau)
    #[serde(rename = "translating")]
    Translating,
    /// Verschieben der Selektion abgeschlossen
    #[serde(rename = "translated")]
    Translated,
}

impl EditType {
    /// Name wie im Austauschformat.
    pub fn as_str(&self) -> &'static str {
        match self {
            EditType::AddFeature => "ADD_FEATURE",
            EditType::AddPosition => "ADD_POSITION",
            EditType::RemovePosition => "REMOVE_POSITION",
            EditType::FinishMovePosition => "FINISH_MOVE_POSITION",
            EditType::Translating => "translating",
            EditType::Translated => "translated",
        }
    }

    /// Ist die Änderung nur eine Zwischenstufe einer laufenden Geste?
    pub fn is_intermediate(&self) -> bool {
        matches!(self, EditType::Translating)
    }
}

impl std::fmt::Display for EditType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Betroffene Features und Positionen einer Änderung.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditContext {
    /// Betroffene Feature-Indizes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub feature_indexes: Vec<usize>,
    /// Positions-Pfad innerhalb der Geometrie
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_indexes: Option<Vec<usize>>,
    /// Betroffene Position
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl EditContext {
    /// Kontext mit nur Feature-Indizes.
    pub fn features(feature_indexes: Vec<usize>) -> Self {
        Self {
            feature_indexes,
            ..Self::default()
        }
    }
}

/// Vorgeschlagene Änderung.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditAction {
    /// Neue Collection nach der Änderung
    pub updated_data: FeatureCollection,
    /// Art der Änderung
    pub edit_type: EditType,
    /// Betroffene Features/Positionen
    #[serde(default)]
    pub edit_context: Option<EditContext>,
}

/// Cursor-Form, die der Modus dem Host vorschlägt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cursor {
    /// Verschieben
    Move,
    /// Fadenkreuz-Zelle (90°-Zeichnen)
    Cell,
    /// Zeiger (Handle anklickbar)
    Pointer,
}

impl Cursor {
    /// CSS-Name des Cursors.
    pub fn as_css(&self) -> &'static str {
        match self {
            Cursor::Move => "move",
            Cursor::Cell => "cell",
            Cursor::Pointer => "pointer",
        }
    }
}
