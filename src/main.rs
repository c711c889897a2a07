//! Headless demo runner: load configs, tick the simulation, report.

use std::path::PathBuf;

use bevy::prelude::*;
use clap::Parser;

use lastlight::arena::ArenaConfig;
use lastlight::character::enemy::catalog::EnemyCatalog;
use lastlight::character::health::Health;
use lastlight::character::player::spawn_player;
use lastlight::config::load_ron;
use lastlight::frame::FrameCount;
use lastlight::logs::setup_logging;
use lastlight::rng::{SimRng, DEFAULT_SEED};
use lastlight::waves::{WaveConfig, WaveState};
use lastlight::CombatSimPlugin;

#[derive(Parser)]
struct Opt {
    /// Wave list, RON
    #[clap(long)]
    waves: Option<PathBuf>,
    /// Enemy catalog, RON
    #[clap(long)]
    enemies: Option<PathBuf>,
    /// Arena geometry, RON
    #[clap(long)]
    arena: Option<PathBuf>,
    #[clap(short, long, default_value_t = DEFAULT_SEED)]
    seed: u64,
    /// Ticks to simulate at 60 per second
    #[clap(short, long, default_value_t = 3600)]
    ticks: u32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let opt = Opt::parse();
    setup_logging()?;

    let mut app = App::new();
    app.add_plugins(CombatSimPlugin);
    app.insert_resource(SimRng::seeded(opt.seed));
    if let Some(path) = &opt.waves {
        app.insert_resource(load_ron::<WaveConfig>(path)?);
    }
    if let Some(path) = &opt.enemies {
        app.insert_resource(load_ron::<EnemyCatalog>(path)?);
    }
    if let Some(path) = &opt.arena {
        let (obstacles, areas) = load_ron::<ArenaConfig>(path)?.into_resources();
        app.insert_resource(obstacles);
        app.insert_resource(areas);
    }

    let world = app.world_mut();
    let mut commands = world.commands();
    let player = spawn_player(&mut commands, Vec2::ZERO, 100.0);
    world.flush();

    for _ in 0..opt.ticks {
        app.update();
    }

    let world = app.world();
    let frame = world.resource::<FrameCount>();
    let state = world.resource::<WaveState>();
    info!(
        "run finished at {}: wave {}, {} enemies active, phase {:?}",
        *frame,
        state.current_wave_number(),
        state.active_enemy_count(),
        state.phase
    );
    match world.get_entity(player).ok().and_then(|e| e.get::<Health>()) {
        Some(health) => info!(
            "player at {:.0}/{:.0} hp",
            health.current(),
            health.max()
        ),
        None => info!("player did not survive"),
    }
    Ok(())
}
