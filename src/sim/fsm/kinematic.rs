//! Script-driven movers: platforms and one-shot effects
//!
//! Neither reacts to input, AI, gravity or collisions.

use glam::Vec2;

use super::{ClipSpec, FrameContext, play};
use crate::sim::animation::InstanceIds;
use crate::sim::creature::{Creature, CreatureState};

const PLATFORM_IDLE: ClipSpec = ClipSpec::looping("idle", 0.15);
const EFFECT: ClipSpec = ClipSpec::once("", 0.05);

/// Travel toward the current target; bounce when it is reached
pub(super) fn step_platform(creature: &mut Creature, ctx: &FrameContext, ids: &mut InstanceIds) -> Vec2 {
    play(creature, PLATFORM_IDLE, ids);

    let position = creature.body.position;
    let id = creature.id;
    let Some(platform) = creature.platform_mut() else {
        return Vec2::ZERO;
    };

    let to_target = platform.target() - position;
    let max_step = platform.speed.abs() * ctx.dt;
    let delta = if to_target.length() <= max_step {
        platform.speed = -platform.speed;
        log::trace!("Platform #{} reversed at {:?}", id.0, position + to_target);
        to_target
    } else {
        to_target.normalize_or_zero() * max_step
    };

    platform.last_delta = delta;
    delta
}

pub(super) fn step_effect(creature: &mut Creature, ids: &mut InstanceIds) -> Vec2 {
    play(creature, EFFECT, ids);
    if creature.animation.is_finished() {
        creature.enter(CreatureState::Delete);
    }
    Vec2::ZERO
}
