//! Fixed timestep simulation tick
//!
//! One frame runs these passes in order, each over the whole collection:
//! 1. Animation clocks advance
//! 2. State machines pick clips and intended deltas; bodies integrate
//! 3. Platforms carry their passengers
//! 4. Collision resolution (landing, ceilings, smash)
//! 5. Combat
//! 6. Perception for the next frame
//! 7. End-of-frame compaction and pending spawns

use super::collision::resolve_collisions;
use super::combat::{resolve_combat, sweep_attack_ids};
use super::fsm::{self, FrameContext};
use super::perception::update_perception;
use super::physics::{carry_passengers, integrate};
use super::state::World;

/// Input intents for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    pub jump: bool,
    pub attack: bool,
    pub dash: bool,
    pub block: bool,
}

impl TickInput {
    /// -1, 0 or 1; opposite directions cancel
    pub fn horizontal(&self) -> f32 {
        match (self.move_left, self.move_right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

fn advance_animations(world: &mut World, dt: f32) {
    for creature in &mut world.creatures {
        let frames = world.animations.frame_count(&creature.animation.clip_name);
        creature.animation.update(dt, frames, &mut world.instance_ids);
    }
}

/// Run every creature's state machine and move it
fn step_creatures(world: &mut World, input: &TickInput, dt: f32) {
    let player_position = world.player().map(|p| p.body.position);
    let creatures = &mut world.creatures;
    let ids = &mut world.instance_ids;
    let ctx = FrameContext {
        dt,
        time: world.time,
        input,
        player_position,
        animations: &world.animations,
        tuning: &world.tuning,
    };

    for creature in creatures.iter_mut() {
        let delta = fsm::step(creature, &ctx, ids);
        if creature.is_dynamic() {
            integrate(creature, delta, dt, &ctx.tuning.physics);
        } else {
            creature.body.position += delta;
        }
    }
}

/// Advance the world by one fixed timestep
pub fn tick(world: &mut World, input: &TickInput, dt: f32) {
    advance_animations(world, dt);
    step_creatures(world, input, dt);
    carry_passengers(&mut world.creatures);
    resolve_collisions(world);
    resolve_combat(world);
    update_perception(world);
    sweep_attack_ids(world);

    world.time += dt;
    world.frame += 1;
    world.end_frame();
}
