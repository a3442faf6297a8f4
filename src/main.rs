//! Geo-Draw-Replay.
//!
//! Spielt ein JSON-Skript aus Zeiger-Events gegen eine Editor-Sitzung ab und
//! gibt die resultierende FeatureCollection als GeoJSON aus.
//!
//! Aufruf: `geo-draw-replay <skript.json> [--options <datei.toml>] [--output <datei.geojson>]`

use anyhow::{bail, Context};
use geo_draw_editor::app::replay;
use geo_draw_editor::EditorOptions;
use std::path::PathBuf;

/// Kommandozeilen-Argumente.
struct Args {
    script: PathBuf,
    options: Option<PathBuf>,
    output: Option<PathBuf>,
}

impl Args {
    fn parse(mut args: impl Iterator<Item = String>) -> anyhow::Result<Self> {
        let mut script = None;
        let mut options = None;
        let mut output = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--options" => {
                    options = Some(PathBuf::from(
                        args.next().context("--options erwartet einen Pfad")?,
                    ))
                }
                "--output" => {
                    output = Some(PathBuf::from(
                        args.next().context("--output erwartet einen Pfad")?,
                    ))
                }
                flag if flag.starts_with("--") => bail!("Unbekannte Option: {}", flag),
                path => script = Some(PathBuf::from(path)),
            }
        }

        let Some(script) = script else {
            bail!("Aufruf: geo-draw-replay <skript.json> [--options <datei.toml>] [--output <datei.geojson>]");
        };
        Ok(Self {
            script,
            options,
            output,
        })
    }
}

fn main() -> anyhow::Result<()> {
    // Logger initialisieren
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("Geo-Draw-Replay v{} startet...", env!("CARGO_PKG_VERSION"));

    let args = Args::parse(std::env::args().skip(1))?;
    let options_path = args.options.unwrap_or_else(EditorOptions::config_path);
    let options = EditorOptions::load_from_file(&options_path);

    let script = replay::load_script(&args.script)?;
    let session = replay::run_script(script, options);

    log::info!(
        "{} Action(s) übernommen, {} abgelehnt",
        session.action_log().len(),
        session.rejected().len()
    );

    let geojson = session
        .data()
        .to_geojson_string()
        .context("GeoJSON-Ausgabe fehlgeschlagen")?;
    match args.output {
        Some(path) => {
            std::fs::write(&path, geojson)
                .with_context(|| format!("Ausgabe nicht schreibbar: {}", path.display()))?;
            log::info!("GeoJSON geschrieben nach: {}", path.display());
        }
        None => println!("{}", geojson),
    }
    Ok(())
}
