//! Simfile JSON to FNF charts
//!
//! Reads a simfile already split into tagged fields (the JSON form of `sm2fnf::simfile::Simfile`),
//! converts it and writes `<song>-easy.json`, `<song>.json` and `<song>-hard.json`.
//!
//! ```text
//! cargo run --example convert_json -- bossy.json bossy --out assets/data/bossy --offset -0.02
//! ```

use std::path::PathBuf;

use clap::Parser;
use sm2fnf::prelude::*;

/// Configuration parameters
#[derive(Parser, Debug)]
#[command(name = "convert_json")]
#[command(about = "Converts a simfile (as JSON) into FNF song charts", long_about = None)]
struct Config {
    /// Simfile JSON path
    #[arg(value_name = "FILE")]
    simfile_path: PathBuf,

    /// Song folder name in the game, such as `dad-battle`
    #[arg(value_name = "SONG")]
    song: String,

    /// Output directory
    #[arg(short, long, default_value = ".", value_name = "DIR")]
    out: PathBuf,

    /// Steps type of the charts to use
    #[arg(long, default_value = "dance-single")]
    steps_type: String,

    /// Manual offset (seconds)
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    offset: f64,

    /// Scroll speed
    #[arg(long, default_value_t = 2.0)]
    speed: f64,

    /// Charts of the easy tier, as `OPPONENT:PLAYER`
    #[arg(long, value_parser = parse_pair)]
    easy: Option<SidePair>,

    /// Charts of the normal tier, as `OPPONENT:PLAYER`
    #[arg(long, value_parser = parse_pair)]
    normal: Option<SidePair>,

    /// Charts of the hard tier, as `OPPONENT:PLAYER`
    #[arg(long, value_parser = parse_pair)]
    hard: Option<SidePair>,
}

fn parse_pair(arg: &str) -> Result<SidePair, String> {
    let (opponent, player) = arg
        .split_once(':')
        .ok_or_else(|| format!("expected `OPPONENT:PLAYER`, got `{arg}`"))?;
    Ok(SidePair {
        opponent: opponent.parse()?,
        player: player.parse()?,
    })
}

fn main() -> Result<(), String> {
    env_logger::init();
    let config = Config::parse();

    let text = std::fs::read_to_string(&config.simfile_path)
        .map_err(|e| format!("{}: {e}", config.simfile_path.display()))?;
    let simfile: Simfile = serde_json::from_str(&text).map_err(|e| e.to_string())?;

    let catalog = ChartCatalog::probe(&simfile, &config.steps_type);
    for slot in catalog.available() {
        let query = ChartQuery::new()
            .steps_type(&config.steps_type)
            .difficulty(slot);
        let (Some(bundle), Ok(raw)) = (catalog.get(slot), find_chart(&simfile, &query)) else {
            continue;
        };
        #[cfg(feature = "diagnostics")]
        emit_note_warnings(slot.as_str(), &raw.notes, bundle.warnings());
        #[cfg(not(feature = "diagnostics"))]
        let _ = (bundle, raw);
    }
    if let Some(name) = catalog.song_name() {
        println!("Loaded {name}: {:?}", catalog.available());
    }

    let mut assignments = TierAssignments::defaults(&catalog.available())
        .ok_or_else(|| format!("no {} charts found", config.steps_type))?;
    for (tier, pair) in [
        (OutputTier::Easy, config.easy),
        (OutputTier::Normal, config.normal),
        (OutputTier::Hard, config.hard),
    ] {
        if let Some(pair) = pair {
            assignments = assignments.with(tier, pair);
        }
    }

    let request = ConversionRequest::new(
        config.song,
        assignments,
        ConvertConfig::default()
            .with_manual_offset(config.offset)
            .with_speed(config.speed),
    );
    let charts = request.run(&catalog).map_err(|e| e.to_string())?;

    std::fs::create_dir_all(&config.out).map_err(|e| e.to_string())?;
    for (tier, chart) in charts {
        let path = config.out.join(tier.chart_file_name(&request.song));
        let json = serde_json::to_string(&chart).map_err(|e| e.to_string())?;
        std::fs::write(&path, json).map_err(|e| format!("{}: {e}", path.display()))?;
        println!("{tier}: {} sections -> {}", chart.sections, path.display());
    }
    Ok(())
}
