//! Headless runner: load a level, play a replay through it, report the result.
//!
//! Usage: `gr_sim [level.json] [replay.json] [config.json] [animations.json]`
//!
//! Any file that does not exist falls back to the built-in equivalent; a file
//! that exists but fails validation aborts the run.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use gr_sim::clips::ClipLibrary;
use gr_sim::config::{load_config_from_path, SimConfig};
use gr_sim::level::{load_level_from_path, LevelGrid};
use gr_sim::render;
use gr_sim::replay::{self, load_replay_from_path, ReplayFrame, ReplaySequence};
use gr_sim::world::World;

const LEVEL_PATH: &str = "assets/levels/demo.json";
const REPLAY_PATH: &str = "assets/replays/demo.json";
const CONFIG_PATH: &str = "assets/config/sim.json";
const ANIMATION_PATH: &str = "assets/animations/gunner.json";

fn load_or_builtin<T>(
    path: &Path,
    what: &str,
    load: impl FnOnce(&Path) -> Result<T, String>,
    builtin: impl FnOnce() -> T,
) -> Result<T, String> {
    if !path.exists() {
        log::warn!("No {what} at {}, using built-in {what}", path.display());
        return Ok(builtin());
    }
    let value = load(path)?;
    log::info!("Loaded {what} from {}", path.display());
    Ok(value)
}

/// Idle, run right, jump, then run back left while firing.
fn builtin_replay() -> ReplaySequence {
    let frame = |right: bool, left: bool, jump: bool, fire: bool, repeat: u32| ReplayFrame {
        left,
        right,
        jump,
        fire,
        debug: false,
        repeat,
    };
    ReplaySequence {
        frame_dt: 1.0 / 60.0,
        frames: vec![
            frame(false, false, false, false, 30),
            frame(true, false, false, false, 90),
            frame(true, false, true, false, 30),
            frame(false, true, false, true, 120),
            frame(false, false, false, false, 60),
        ],
    }
}

fn run(args: &[String]) -> Result<(), String> {
    let arg_path = |i: usize, default: &str| PathBuf::from(args.get(i).map_or(default, String::as_str));

    let config = load_or_builtin(
        &arg_path(3, CONFIG_PATH),
        "config",
        load_config_from_path,
        SimConfig::default,
    )?;
    let clips = load_or_builtin(
        &arg_path(4, ANIMATION_PATH),
        "animation clips",
        ClipLibrary::load_file,
        ClipLibrary::builtin,
    )?;
    let level = load_or_builtin(
        &arg_path(1, LEVEL_PATH),
        "level",
        load_level_from_path,
        LevelGrid::demo,
    )?;
    let recording = load_or_builtin(
        &arg_path(2, REPLAY_PATH),
        "replay",
        load_replay_from_path,
        builtin_replay,
    )?;

    let mut world = World::from_level(&level, config, clips)?;
    let tuning = world.config();
    log::info!(
        "Tuning: tile={} viewport={}x{} gravity={} accel={} max_speed={} jump={} cooldown={}s seed={:#x}",
        tuning.tile_size,
        tuning.viewport_width,
        tuning.viewport_height,
        tuning.gravity,
        tuning.player.acceleration,
        tuning.player.max_speed_x,
        tuning.player.jump_impulse,
        tuning.weapon.cooldown,
        tuning.rng_seed
    );
    let stats = replay::play(&mut world, &recording);

    let player = world.player();
    log::info!(
        "Player after {} ticks: pos=({:.2}, {:.2}) vel=({:.2}, {:.2}) state={:?} grounded={}",
        world.tick_count(),
        player.position.x,
        player.position.y,
        player.velocity.x,
        player.velocity.y,
        player.player().state,
        player.grounded
    );
    log::info!(
        "Bullets: {} live of {} slots; {} sprites to draw; viewport x={:.2}; {:.3}s simulated",
        world.bullets.active_count(),
        world.bullets.len(),
        render::sprite_instances(&world).len(),
        world.viewport.x,
        stats.sim_time
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
