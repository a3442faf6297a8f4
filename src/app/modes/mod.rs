//! Trait-basiertes Edit-Modus-System.
//!
//! Jeder Modus implementiert den `EditMode`-Trait und wird beim
//! `ModeManager` registriert. Modi erzeugen reine Daten (`EditAction`),
//! die Übernahme in die persistierte Collection entscheidet der Host.

/// Gemeinsame Hilfsfunktionen für Modi.
pub mod common;
/// 90°-Polygon-Modus: jede neue Kante steht rechtwinklig zur vorherigen.
pub mod draw_90degree_polygon;
/// Polygon-Modus mit Klick- und Freihand-Eingabe.
pub mod draw_polygon;
/// EditMode-Trait: Schnittstelle für alle Modi.
mod edit_mode;
/// Vertex-Bearbeitung selektierter Features.
pub mod modify;
/// Verschieben der Selektion per Drag.
pub mod translate;
/// Nur-Lesen-Modus ohne jede Reaktion.
pub mod view;

pub use draw_90degree_polygon::Draw90DegreePolygonMode;
pub use draw_polygon::DrawPolygonMode;
pub use edit_mode::EditMode;
pub use modify::ModifyMode;
pub use translate::TranslateMode;
pub use view::ViewMode;

use super::edit_action::{Cursor, EditAction};
use super::events::PointerMoveEvent;
use crate::core::{FeatureCollection, Viewport};
use crate::shared::EditorOptions;
use serde::{Deserialize, Serialize};

// ── Typen ────────────────────────────────────────────────────────

/// Kennung der registrierten Modi.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModeKind {
    /// Nur lesen
    #[serde(rename = "view")]
    View,
    /// Polygon zeichnen (Klick/Freihand)
    #[serde(rename = "draw-polygon")]
    DrawPolygon,
    /// Rechtwinkliges Polygon zeichnen
    #[serde(rename = "draw-90degree-polygon")]
    Draw90DegreePolygon,
    /// Selektion verschieben
    #[serde(rename = "translate")]
    Translate,
    /// Vertices bearbeiten
    #[serde(rename = "modify")]
    Modify,
}

/// Rückkanal eines Modus zum Host.
pub trait ModeCallbacks {
    /// Vorgeschlagene Änderung melden.
    fn on_edit(&mut self, action: EditAction);

    /// Cursor-Form vorschlagen (`None` = Host-Default).
    fn on_update_cursor(&mut self, cursor: Option<Cursor>);

    /// Weiterreichen des Events an die Karte unterbinden (kein Karten-Pan).
    fn stop_propagation(&mut self) {}
}

/// Sammelt alle Rückmeldungen eines Events für die spätere Auswertung.
#[derive(Debug, Clone, Default)]
pub struct RecordingCallbacks {
    /// Gemeldete Änderungen in Reihenfolge
    pub actions: Vec<EditAction>,
    /// Cursor-Vorschläge in Reihenfolge
    pub cursor_updates: Vec<Option<Cursor>>,
    /// Wurde `stop_propagation` aufgerufen?
    pub propagation_stopped: bool,
}

impl ModeCallbacks for RecordingCallbacks {
    fn on_edit(&mut self, action: EditAction) {
        self.actions.push(action);
    }

    fn on_update_cursor(&mut self, cursor: Option<Cursor>) {
        self.cursor_updates.push(cursor);
    }

    fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }
}

/// Alles, was ein Modus pro Event vom Host liest.
pub struct ModeProps<'a> {
    /// Persistierte Collection (nur lesen)
    pub data: &'a FeatureCollection,
    /// Freie Modus-Konfiguration (JSON)
    pub mode_config: &'a serde_json::Value,
    /// Selektierte Feature-Indizes
    pub selected_indexes: &'a [usize],
    /// Aktueller Cursor des Hosts
    pub cursor: Option<Cursor>,
    /// Letzte Zeiger-Bewegung
    pub last_pointer_move_event: Option<&'a PointerMoveEvent>,
    /// Aktueller Viewport
    pub viewport: Option<&'a Viewport>,
    /// Ist der Zeiger gedrückt?
    pub is_pointer_down: bool,
    /// Editor-Optionen
    pub options: &'a EditorOptions,
    /// Rückkanal
    pub callbacks: &'a mut dyn ModeCallbacks,
}

// ── ModeManager ──────────────────────────────────────────────────

/// Verwaltet registrierte Modi und den aktiven Modus.
pub struct ModeManager {
    modes: Vec<Box<dyn EditMode>>,
    active_index: usize,
}

impl Default for ModeManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ModeManager {
    /// Erstellt einen ModeManager mit allen Standard-Modi; aktiv ist `View`.
    pub fn new() -> Self {
        let mut manager = Self {
            modes: Vec::new(),
            active_index: 0,
        };
        manager.register(Box::new(ViewMode::new()));
        manager.register(Box::new(DrawPolygonMode::new()));
        manager.register(Box::new(Draw90DegreePolygonMode::new()));
        manager.register(Box::new(TranslateMode::new()));
        manager.register(Box::new(ModifyMode::new()));
        manager
    }

    /// Registriert einen Modus. Ein bereits registrierter Modus gleicher Art
    /// wird ersetzt.
    pub fn register(&mut self, mode: Box<dyn EditMode>) {
        let kind = mode.kind();
        match self.modes.iter().position(|m| m.kind() == kind) {
            Some(i) => self.modes[i] = mode,
            None => self.modes.push(mode),
        }
    }

    /// Name und Art aller registrierten Modi.
    pub fn mode_names(&self) -> Vec<(ModeKind, &str)> {
        self.modes.iter().map(|m| (m.kind(), m.name())).collect()
    }

    /// Aktiviert einen Modus. Der bisherige Modus verliert seinen
    /// Interaktions-Zustand. Gibt `false` zurück, wenn die Art nicht
    /// registriert ist.
    pub fn set_active(&mut self, kind: ModeKind) -> bool {
        let Some(index) = self.modes.iter().position(|m| m.kind() == kind) else {
            log::warn!("Modus {:?} ist nicht registriert", kind);
            return false;
        };
        if index != self.active_index {
            self.modes[self.active_index].reset();
            log::debug!(
                "Moduswechsel: {} → {}",
                self.modes[self.active_index].name(),
                self.modes[index].name()
            );
        }
        self.active_index = index;
        true
    }

    /// Art des aktiven Modus.
    pub fn active_kind(&self) -> ModeKind {
        self.active().kind()
    }

    /// Referenz auf den aktiven Modus.
    pub fn active(&self) -> &dyn EditMode {
        self.modes[self.active_index].as_ref()
    }

    /// Mutable Referenz auf den aktiven Modus.
    pub fn active_mut(&mut self) -> &mut dyn EditMode {
        self.modes[self.active_index].as_mut()
    }

    /// Verwirft den Interaktions-Zustand des aktiven Modus.
    pub fn reset_active(&mut self) {
        self.active_mut().reset();
    }
}
