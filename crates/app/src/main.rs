//! Headless scenario runner.
//!
//! ```text
//! quakecity <scenario.json> [--ticks N] [--load PATH] [--save PATH]
//! ```
//!
//! Loads the scenario, optionally restores an earthquake save block, runs the
//! simulation for N fixed ticks (default one scenario year), optionally writes
//! the earthquake block back out, and prints a JSON summary on stdout. Logs go
//! to stderr.

use std::path::PathBuf;
use std::process::ExitCode;

use bevy::log::LogPlugin;
use bevy::prelude::*;
use clap::Parser;

use simulation::buildings::Building;
use simulation::config::DAYS_PER_YEAR;
use simulation::earthquake::{EarthquakeSettings, EarthquakeState};
use simulation::effects::DustClouds;
use simulation::notifications::{NotificationKind, NotificationLog};
use simulation::save_buffer::{WordReader, WordWriter};
use simulation::scenario::{load_scenario, ScenarioConfig};
use simulation::sound_effects::{SfxEvent, SfxTally};
use simulation::time_of_day::GameClock;

/// One simulated minute per tick.
const TICKS_PER_DAY: u64 = 24 * 60;
const DEFAULT_TICKS: u64 = TICKS_PER_DAY * DAYS_PER_YEAR as u64;

#[derive(Parser, Debug)]
#[command(name = "quakecity", about = "Run a scenario headless and report the earthquake", long_about = None)]
struct RunArgs {
    /// Scenario JSON file.
    scenario: PathBuf,
    /// Fixed ticks to simulate. Defaults to one scenario year.
    #[arg(long, default_value_t = DEFAULT_TICKS)]
    ticks: u64,
    /// Earthquake save block to restore after loading the scenario.
    #[arg(long)]
    load: Option<PathBuf>,
    /// Where to write the earthquake save block after the run.
    #[arg(long)]
    save: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = RunArgs::parse();

    match run(&args) {
        Ok(summary) => {
            println!("{summary}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("quakecity: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &RunArgs) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let config = ScenarioConfig::from_path(&args.scenario)?;

    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(LogPlugin::default());
    app.add_plugins(simulation::SimulationPlugin);

    // Initial update so Startup systems execute and resources initialize.
    app.update();

    load_scenario(app.world_mut(), &config)?;

    if let Some(path) = &args.load {
        let bytes = std::fs::read(path)?;
        let mut state = EarthquakeState::default();
        state.deserialize(&mut WordReader::new(&bytes))?;
        info!("Restored earthquake state from {}", path.display());
        app.world_mut().insert_resource(state);
    }

    for _ in 0..args.ticks {
        app.world_mut().run_schedule(FixedUpdate);
    }

    if let Some(path) = &args.save {
        let mut writer = WordWriter::new();
        app.world().resource::<EarthquakeState>().serialize(&mut writer);
        std::fs::write(path, writer.as_bytes())?;
        info!("Wrote earthquake state to {}", path.display());
    }

    Ok(summarize(app.world_mut(), &config, args.ticks))
}

fn summarize(world: &mut World, config: &ScenarioConfig, ticks: u64) -> serde_json::Value {
    let buildings = world.query::<&Building>().iter(world).count();

    let settings = world.resource::<EarthquakeSettings>();
    let state = world.resource::<EarthquakeState>();
    let clock = world.resource::<GameClock>();
    let fronts: Vec<[i32; 2]> = state.fronts.iter().map(|f| [f.x, f.y]).collect();

    serde_json::json!({
        "scenario": config.name,
        "ticks": ticks,
        "date": clock.formatted(),
        "earthquake": {
            "severity": settings.severity.name(),
            "enabled": settings.is_enabled(),
            "trigger": { "year": state.trigger_year, "month": state.trigger_month },
            "phase": state.phase.code(),
            "elapsed": state.elapsed_duration,
            "target": state.target_duration,
            "fronts": fronts,
        },
        "buildings_remaining": buildings,
        "explosions": world.resource::<SfxTally>().count(SfxEvent::Explosion),
        "dust_clouds": world.resource::<DustClouds>().total_spawned,
        "earthquake_messages": world
            .resource::<NotificationLog>()
            .count_of(NotificationKind::Earthquake),
    })
}
