//! Protokoll übernommener Edit-Actions (Grundlage für Undo/Redo-Erweiterungen).

use super::edit_action::{EditAction, EditContext, EditType};
use serde::Serialize;

/// Eintrag im Action-Log: was wurde übernommen, nicht die Daten selbst.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRecord {
    /// Art der Änderung
    pub edit_type: EditType,
    /// Betroffene Features/Positionen
    pub edit_context: Option<EditContext>,
    /// Anzahl Features nach der Änderung
    pub feature_count: usize,
}

impl ActionRecord {
    /// Erstellt einen Eintrag aus einer übernommenen Action.
    pub fn from_action(action: &EditAction) -> Self {
        Self {
            edit_type: action.edit_type,
            edit_context: action.edit_context.clone(),
            feature_count: action.updated_data.len(),
        }
    }
}

/// Speichert übernommene Actions in Reihenfolge.
#[derive(Debug, Default)]
pub struct ActionLog {
    entries: Vec<ActionRecord>,
}

impl ActionLog {
    const MAX_ENTRIES: usize = 1000;
}

impl ActionLog {
    /// Erstellt ein leeres Action-Log.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Fügt eine übernommene Action hinzu.
    /// Begrenzt auf MAX_ENTRIES, ältere Einträge werden verworfen.
    pub fn record(&mut self, action: &EditAction) {
        if self.entries.len() >= Self::MAX_ENTRIES {
            self.entries.drain(..Self::MAX_ENTRIES / 2);
        }
        self.entries.push(ActionRecord::from_action(action));
    }

    /// Gibt die Anzahl der geloggten Actions zurück.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Gibt `true` zurück, wenn keine Actions vorhanden sind.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Liefert eine read-only Sicht auf alle Einträge.
    pub fn entries(&self) -> &[ActionRecord] {
        &self.entries
    }

    /// Letzter Eintrag.
    pub fn last(&self) -> Option<&ActionRecord> {
        self.entries.last()
    }

    /// Einträge ohne Zwischenstufen (`translating`).
    pub fn committed(&self) -> impl Iterator<Item = &ActionRecord> {
        self.entries
            .iter()
            .filter(|entry| !entry.edit_type.is_intermediate())
    }
}
