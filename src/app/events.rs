//! Zeiger- und Drag-Events, die der Host an den aktiven Modus weiterreicht.
//!
//! Alle Koordinaten liegen doppelt vor: `screen_coords` in Pixeln,
//! `map_coords` als `[lng, lat]`.

use crate::core::{EditHandleType, Position};
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Gedrückte Modifier-Tasten.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    /// Shift
    pub shift: bool,
    /// Ctrl
    pub ctrl: bool,
    /// Alt / Option
    pub alt: bool,
    /// Meta / Cmd
    pub meta: bool,
}

/// Ursprüngliches Host-Event (auf die Modifier reduziert).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceEvent {
    /// Modifier zum Zeitpunkt des Events
    pub modifiers: Modifiers,
}

/// Edit-Handle unter dem Zeiger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditHandlePick {
    /// Art des Handles
    pub handle_type: EditHandleType,
    /// Feature-Index, `None` für Handles der Tentative-Geometrie
    #[serde(default)]
    pub feature_index: Option<usize>,
    /// Positions-Pfad innerhalb der Geometrie
    #[serde(default)]
    pub position_indexes: Vec<usize>,
}

impl EditHandlePick {
    /// Index des Handles innerhalb seines Rings bzw. Linienzugs.
    pub fn handle_index(&self) -> Option<usize> {
        self.position_indexes.last().copied()
    }

    /// Gehört das Handle zur Tentative-Geometrie?
    pub fn is_tentative(&self) -> bool {
        self.feature_index.is_none()
    }
}

/// Was unter dem Zeiger liegt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PickedObject {
    /// Nichts Verwertbares (auch für fehlerhafte Picks)
    #[default]
    None,
    /// Ein persistiertes Feature; der Index steht in [`Pick::index`]
    Feature,
    /// Ein Edit-Handle aus den Guides
    EditHandle(EditHandlePick),
}

/// Ein Treffer des Host-Hit-Tests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pick {
    /// Getroffenes Objekt
    #[serde(default)]
    pub object: PickedObject,
    /// Feature-Index (bei Features) bzw. Guide-Index (bei Handles)
    #[serde(default)]
    pub index: Option<usize>,
    /// Stammt der Treffer aus den Guides?
    #[serde(default)]
    pub is_guide: bool,
}

impl Pick {
    /// Treffer auf ein persistiertes Feature.
    pub fn feature(index: usize) -> Self {
        Self {
            object: PickedObject::Feature,
            index: Some(index),
            is_guide: false,
        }
    }

    /// Treffer auf ein Edit-Handle.
    pub fn edit_handle(handle: EditHandlePick, guide_index: Option<usize>) -> Self {
        Self {
            object: PickedObject::EditHandle(handle),
            index: guide_index,
            is_guide: true,
        }
    }

    /// Index des getroffenen persistierten Features.
    pub fn feature_index(&self) -> Option<usize> {
        match self.object {
            PickedObject::Feature => self.index,
            _ => None,
        }
    }
}

/// Erstes Edit-Handle in den Picks.
pub fn picked_edit_handle(picks: &[Pick]) -> Option<&EditHandlePick> {
    picks.iter().find_map(|pick| match &pick.object {
        PickedObject::EditHandle(handle) if pick.is_guide => Some(handle),
        _ => None,
    })
}

/// Klick (Pointer-Down und -Up ohne nennenswerte Bewegung).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickEvent {
    /// Treffer unter dem Zeiger (vorderster zuerst)
    #[serde(default)]
    pub picks: Vec<Pick>,
    /// Bildschirm-Position in Pixeln
    #[serde(default)]
    pub screen_coords: DVec2,
    /// Karten-Position `[lng, lat]`
    pub map_coords: Position,
    /// Modifier
    #[serde(default)]
    pub source_event: SourceEvent,
}

/// Zeiger-Bewegung, mit oder ohne gedrückte Taste.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerMoveEvent {
    /// Treffer unter dem Zeiger
    #[serde(default)]
    pub picks: Vec<Pick>,
    /// Bildschirm-Position in Pixeln
    #[serde(default)]
    pub screen_coords: DVec2,
    /// Karten-Position `[lng, lat]`
    pub map_coords: Position,
    /// Modifier
    #[serde(default)]
    pub source_event: SourceEvent,
    /// Läuft gerade ein Drag?
    #[serde(default)]
    pub is_dragging: bool,
    /// Treffer beim Pointer-Down
    #[serde(default)]
    pub pointer_down_picks: Option<Vec<Pick>>,
    /// Bildschirm-Position beim Pointer-Down
    #[serde(default)]
    pub pointer_down_screen_coords: Option<DVec2>,
    /// Karten-Position beim Pointer-Down
    #[serde(default)]
    pub pointer_down_map_coords: Option<Position>,
}

impl PointerMoveEvent {
    /// Bewegung ohne gedrückte Taste.
    pub fn hover(map_coords: Position) -> Self {
        Self {
            picks: Vec::new(),
            screen_coords: DVec2::splat(-1.0),
            map_coords,
            source_event: SourceEvent::default(),
            is_dragging: false,
            pointer_down_picks: None,
            pointer_down_screen_coords: None,
            pointer_down_map_coords: None,
        }
    }
}

/// Pointer-Down gefolgt von Bewegung über die Drag-Schwelle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartDraggingEvent {
    /// Treffer unter dem Zeiger
    #[serde(default)]
    pub picks: Vec<Pick>,
    /// Bildschirm-Position in Pixeln
    #[serde(default)]
    pub screen_coords: DVec2,
    /// Karten-Position `[lng, lat]`
    pub map_coords: Position,
    /// Modifier
    #[serde(default)]
    pub source_event: SourceEvent,
    /// Treffer beim Pointer-Down
    #[serde(default)]
    pub pointer_down_picks: Option<Vec<Pick>>,
    /// Bildschirm-Position beim Pointer-Down
    #[serde(default)]
    pub pointer_down_screen_coords: DVec2,
    /// Karten-Position beim Pointer-Down
    pub pointer_down_map_coords: Position,
}

/// Pointer-Up nach einem Drag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopDraggingEvent {
    /// Treffer unter dem Zeiger
    #[serde(default)]
    pub picks: Vec<Pick>,
    /// Bildschirm-Position in Pixeln
    #[serde(default)]
    pub screen_coords: DVec2,
    /// Karten-Position `[lng, lat]`
    pub map_coords: Position,
    /// Modifier
    #[serde(default)]
    pub source_event: SourceEvent,
    /// Treffer beim Pointer-Down
    #[serde(default)]
    pub pointer_down_picks: Option<Vec<Pick>>,
    /// Bildschirm-Position beim Pointer-Down
    #[serde(default)]
    pub pointer_down_screen_coords: DVec2,
    /// Karten-Position beim Pointer-Down
    pub pointer_down_map_coords: Position,
}
