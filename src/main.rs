//! Roid Rage headless runner
//!
//! Drives the world at a steady frame rate with a scripted pilot and the
//! wave director, logging the HUD once per second. Rendering, audio and
//! windowing live outside this crate.
//!
//! Usage: `roid-rage [config.json] [seed]`

use std::process::ExitCode;

use roid_rage::director::Director;
use roid_rage::hud::{FpsCounter, HudState};
use roid_rage::world::{Actions, Status};
use roid_rage::{GameConfig, SimResult, World};

/// Render frame time of the headless loop
const FRAME_DT: f32 = 1.0 / 60.0;
/// Give up after this many seconds
const MAX_RUN_SECS: f32 = 120.0;

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Roid Rage (headless) starting...");

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => match GameConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{}", e);
                return ExitCode::FAILURE;
            }
        },
        None => GameConfig::default(),
    };
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(12345);

    match run(config, seed) {
        Ok(hud) => {
            println!(
                "Bye! credits={} hitpoints={:.0}",
                hud.credits, hud.hitpoints
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Simulation failed: {}", e);
            println!("Oops!");
            ExitCode::FAILURE
        }
    }
}

fn run(config: GameConfig, seed: u64) -> SimResult<HudState> {
    let mut world = World::new(config)?;
    let mut director = Director::new(seed);
    let mut fps = FpsCounter::new();
    let mut hud = HudState::default();

    log::info!("Running with seed {}", seed);
    world.set_action(Actions::SHOOT);

    let mut elapsed = 0.0;
    while elapsed < MAX_RUN_SECS {
        elapsed += FRAME_DT;
        steer_pilot(&mut world, elapsed);

        director.update(&mut world, FRAME_DT)?;
        let status = world.update(FRAME_DT)?;

        let published = fps.frame(FRAME_DT);
        hud.update(&world, &fps, 0);
        if published {
            log::info!(
                "fps={} wave={} credits={} hp={:.0} enemies={} asteroids={} shots={}",
                hud.fps,
                director.wave(),
                hud.credits,
                hud.hitpoints,
                world.enemy_count(),
                world.asteroid_count(),
                world.projectile_count()
            );
        }

        if status == Status::GameOver {
            break;
        }
    }
    Ok(hud)
}

/// Sweep left and right across the screen, switching every two seconds
fn steer_pilot(world: &mut World, elapsed: f32) {
    let going_left = (elapsed / 2.0) as u32 % 2 == 0;
    if going_left {
        world.clear_action(Actions::MOVE_RIGHT);
        world.set_action(Actions::MOVE_LEFT);
    } else {
        world.clear_action(Actions::MOVE_LEFT);
        world.set_action(Actions::MOVE_RIGHT);
    }
}
