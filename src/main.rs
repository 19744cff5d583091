//! Nightfall headless runner
//!
//! Usage: `nightfall [level.json atlas.json [frames]]`
//!
//! Without arguments it plays the built-in arena. Input is scripted, so two
//! runs over the same assets produce the same log. Set `NIGHTFALL_TUNING` to a
//! JSON file to override balance values.

#[cfg(not(target_arch = "wasm32"))]
use nightfall::consts::SIM_DT;
#[cfg(not(target_arch = "wasm32"))]
use nightfall::sim::{AnimationLibrary, TickInput, World, tick};
#[cfg(not(target_arch = "wasm32"))]
use nightfall::{LevelData, LoadError, Tuning, demo};

#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_FRAMES: u64 = 600;

/// Walk right, hop now and then, swing in bursts, guard once in a while
#[cfg(not(target_arch = "wasm32"))]
fn scripted_input(frame: u64) -> TickInput {
    TickInput {
        move_right: frame % 180 < 120,
        move_left: frame % 180 >= 150,
        jump: frame % 240 == 60,
        attack: frame % 40 < 2,
        dash: frame % 300 == 200,
        block: frame % 200 == 100,
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn load_world(args: &[String]) -> Result<(World, u64), LoadError> {
    let tuning = match std::env::var("NIGHTFALL_TUNING") {
        Ok(path) => Tuning::load(path)?,
        Err(_) => Tuning::default(),
    };
    match args {
        [level, atlas, rest @ ..] => {
            let level = LevelData::load(level)?;
            let animations = AnimationLibrary::load(atlas)?;
            let frames = match rest.first() {
                Some(arg) => arg.parse().unwrap_or_else(|_| {
                    log::warn!("Ignoring frame count '{}'", arg);
                    DEFAULT_FRAMES
                }),
                None => DEFAULT_FRAMES,
            };
            Ok((World::from_level(&level, animations, tuning)?, frames))
        }
        _ => {
            log::info!("No assets given, using the demo arena");
            let world = World::from_level(&demo::demo_level(), demo::demo_animations(), tuning)?;
            Ok((world, DEFAULT_FRAMES))
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Nightfall (native) starting...");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (mut world, frames) = match load_world(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            log::error!("Failed to load: {e}");
            std::process::exit(1);
        }
    };

    for _ in 0..frames {
        let input = scripted_input(world.frame);
        tick(&mut world, &input, SIM_DT);

        if world.frame % 60 == 0 {
            if let (Some(player), Some(bar)) = (world.player(), world.player_health()) {
                log::info!(
                    "t={:.1}s player {:?} at ({:.0}, {:.0}) health {:.0}/{:.0}",
                    world.time,
                    player.state,
                    player.body.position.x,
                    player.body.position.y,
                    bar.current,
                    bar.max
                );
            }
        }
    }

    let alive_enemies = world.creatures.iter().filter(|c| c.is_enemy() && c.is_alive()).count();
    log::info!(
        "Finished {} frames: {} enemies alive, {} sprites on screen",
        world.frame,
        alive_enemies,
        world.draw_requests().len()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The simulation is driven by the host page on the web; nothing to run here
}
