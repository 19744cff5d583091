//! Per-archetype behavior state machines
//!
//! Each step plays the clip for the current state, reads intents or AI flags
//! to pick the next state, and returns the position delta the creature wants
//! to make this frame. Velocity-driven motion is handled by `physics`.

mod enemy;
mod kinematic;
mod player;

use glam::Vec2;

use super::animation::{AnimationLibrary, InstanceIds};
use super::creature::{Creature, CreatureKind};
use super::tick::TickInput;
use crate::Tuning;

/// Read-only inputs shared by every creature's step
pub struct FrameContext<'a> {
    pub dt: f32,
    /// Simulation time at the start of the frame
    pub time: f32,
    pub input: &'a TickInput,
    /// Feet position of the player, if one is alive or dead in the world
    pub player_position: Option<Vec2>,
    pub animations: &'a AnimationLibrary,
    pub tuning: &'a Tuning,
}

/// How a state's clip plays
#[derive(Debug, Clone, Copy)]
pub(crate) struct ClipSpec {
    pub action: &'static str,
    pub frame_duration: f32,
    pub repeat: bool,
}

impl ClipSpec {
    pub const fn looping(action: &'static str, frame_duration: f32) -> Self {
        Self {
            action,
            frame_duration,
            repeat: true,
        }
    }

    pub const fn once(action: &'static str, frame_duration: f32) -> Self {
        Self {
            action,
            frame_duration,
            repeat: false,
        }
    }
}

pub(crate) fn play(creature: &mut Creature, clip: ClipSpec, ids: &mut InstanceIds) {
    creature.play(clip.action, clip.frame_duration, clip.repeat, ids);
}

/// Advance one creature's state machine and return its intended delta
pub fn step(creature: &mut Creature, ctx: &FrameContext, ids: &mut InstanceIds) -> Vec2 {
    match creature.kind {
        CreatureKind::Player(_) => player::step(creature, ctx, ids),
        CreatureKind::FlyingEnemy(_) => enemy::step_flying(creature, ctx, ids),
        CreatureKind::GroundedEnemy(_) => enemy::step_grounded(creature, ctx, ids),
        CreatureKind::Platform(_) => kinematic::step_platform(creature, ctx, ids),
        CreatureKind::EphemeralEffect => kinematic::step_effect(creature, ids),
        CreatureKind::RigidObstacle { .. } => Vec2::ZERO,
    }
}
