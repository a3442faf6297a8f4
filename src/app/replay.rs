//! Replay-Skripte: Event-Folgen als JSON, abgespielt gegen eine [`EditorSession`].
//!
//! Beispiel:
//! ```json
//! {
//!   "steps": [
//!     { "type": "setMode", "mode": "draw-polygon" },
//!     { "type": "tap", "at": [0.0, 0.0] },
//!     { "type": "tap", "at": [0.0, 0.01] },
//!     { "type": "tap", "at": [0.01, 0.01] },
//!     { "type": "tap", "at": [0.0, 0.0] }
//!   ]
//! }
//! ```

use super::events::{ClickEvent, Modifiers};
use super::modes::ModeKind;
use super::session::EditorSession;
use crate::core::{FeatureCollection, Position, Viewport};
use crate::shared::EditorOptions;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Ein Schritt im Replay-Skript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ReplayStep {
    /// Modus wechseln
    SetMode {
        /// Ziel-Modus
        mode: ModeKind,
        /// Freie Modus-Konfiguration
        #[serde(default)]
        config: serde_json::Value,
    },
    /// Viewport setzen
    SetViewport {
        /// Neuer Viewport
        viewport: Viewport,
    },
    /// Selektion ersetzen
    Select {
        /// Feature-Indizes
        indexes: Vec<usize>,
    },
    /// Selektion aufheben
    ClearSelection,
    /// Modifier für folgende Gesten setzen
    SetModifiers {
        /// Gedrückte Tasten
        modifiers: Modifiers,
    },
    /// Zeiger drücken
    PointerDown {
        /// Karten-Position
        at: Position,
    },
    /// Zeiger bewegen
    PointerMove {
        /// Karten-Position
        at: Position,
    },
    /// Zeiger loslassen
    PointerUp {
        /// Karten-Position
        at: Position,
    },
    /// Bewegen und klicken an einer Position
    Tap {
        /// Karten-Position
        at: Position,
    },
    /// Drücken am ersten Punkt, über alle Punkte ziehen, am letzten loslassen
    Drag {
        /// Zeiger-Pfad
        path: Vec<Position>,
    },
    /// Vorgefertigtes Klick-Event direkt an den Modus
    Click(ClickEvent),
    /// Laufende Interaktion verwerfen
    Cancel,
}

/// Komplettes Replay-Skript.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplayScript {
    /// Optionen; fehlen sie, gelten die Optionen des Aufrufers
    #[serde(default)]
    pub options: Option<EditorOptions>,
    /// Start-Daten
    #[serde(default)]
    pub data: Option<FeatureCollection>,
    /// Schritte in Reihenfolge
    #[serde(default)]
    pub steps: Vec<ReplayStep>,
}

impl ReplayScript {
    /// Liest ein Skript aus einem JSON-String.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Replay-Skript ist kein gültiges JSON")
    }
}

/// Lädt ein Replay-Skript aus einer Datei.
pub fn load_script(path: &Path) -> Result<ReplayScript> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Replay-Skript nicht lesbar: {}", path.display()))?;
    let script = ReplayScript::from_json_str(&content)
        .with_context(|| format!("Fehler in Replay-Skript {}", path.display()))?;
    log::info!(
        "Replay-Skript geladen: {} ({} Schritte)",
        path.display(),
        script.steps.len()
    );
    Ok(script)
}

/// Spielt ein Skript ab und gibt die Session im Endzustand zurück.
pub fn run_script(script: ReplayScript, default_options: EditorOptions) -> EditorSession {
    let mut session = EditorSession::new(script.options.unwrap_or(default_options));
    if let Some(data) = script.data {
        session.set_data(data);
    }
    for (index, step) in script.steps.into_iter().enumerate() {
        log::debug!("Schritt {}: {:?}", index, step);
        apply_step(&mut session, step);
    }
    session
}

/// Führt einen einzelnen Schritt aus.
pub fn apply_step(session: &mut EditorSession, step: ReplayStep) {
    match step {
        ReplayStep::SetMode { mode, config } => {
            session.set_mode(mode, config);
        }
        ReplayStep::SetViewport { viewport } => session.set_viewport(viewport),
        ReplayStep::Select { indexes } => session.select(indexes),
        ReplayStep::ClearSelection => session.clear_selection(),
        ReplayStep::SetModifiers { modifiers } => session.set_modifiers(modifiers),
        ReplayStep::PointerDown { at } => session.pointer_down(at),
        ReplayStep::PointerMove { at } => session.pointer_move_to(at),
        ReplayStep::PointerUp { at } => session.pointer_up(at),
        ReplayStep::Tap { at } => {
            session.pointer_move_to(at);
            session.tap(at);
        }
        ReplayStep::Drag { path } => {
            let (Some(&first), Some(&last)) = (path.first(), path.last()) else {
                log::warn!("Drag ohne Pfad übersprungen");
                return;
            };
            session.pointer_move_to(first);
            session.pointer_down(first);
            for &at in &path[1..] {
                session.pointer_move_to(at);
            }
            session.pointer_up(last);
        }
        ReplayStep::Click(event) => session.click(event),
        ReplayStep::Cancel => session.cancel_interaction(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::edit_action::EditType;

    #[test]
    fn steps_parse_from_json() {
        let json = r#"{
            "steps": [
                { "type": "setMode", "mode": "draw-90degree-polygon" },
                { "type": "select", "indexes": [0, 2] },
                { "type": "tap", "at": [8.5, 47.3] },
                { "type": "drag", "path": [[0.0, 0.0], [0.1, 0.1]] },
                { "type": "click", "mapCoords": [1.0, 2.0] },
                { "type": "cancel" }
            ]
        }"#;
        let script = ReplayScript::from_json_str(json).expect("gültiges Skript");
        assert_eq!(script.steps.len(), 6);
        assert_eq!(
            script.steps[0],
            ReplayStep::SetMode {
                mode: ModeKind::Draw90DegreePolygon,
                config: serde_json::Value::Null,
            }
        );
        assert!(matches!(&script.steps[4], ReplayStep::Click(e) if e.map_coords.y == 2.0));
        assert!(script.options.is_none());
    }

    #[test]
    fn unknown_step_type_is_an_error() {
        let json = r#"{ "steps": [ { "type": "explode" } ] }"#;
        assert!(ReplayScript::from_json_str(json).is_err());
    }

    #[test]
    fn run_script_draws_polygon_with_taps() {
        let json = r#"{
            "steps": [
                { "type": "setMode", "mode": "draw-polygon" },
                { "type": "tap", "at": [0.0, 0.0] },
                { "type": "tap", "at": [0.0, 0.01] },
                { "type": "tap", "at": [0.01, 0.01] },
                { "type": "tap", "at": [0.0, 0.0] }
            ]
        }"#;
        let script = ReplayScript::from_json_str(json).expect("gültiges Skript");
        let session = run_script(script, EditorOptions::default());
        assert_eq!(session.data().len(), 1);
        assert_eq!(
            session.action_log().last().map(|e| e.edit_type),
            Some(EditType::AddFeature)
        );
    }

    #[test]
    fn load_script_reports_missing_file() {
        let path = std::env::temp_dir().join("geo_draw_replay_gibt_es_nicht.json");
        let err = load_script(&path).expect_err("Datei fehlt");
        assert!(format!("{:#}", err).contains("nicht lesbar"));
    }
}
