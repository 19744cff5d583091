//! Enemy state machines
//!
//! Enemies act on perception flags computed at the end of the previous frame.
//! Bats fly until something knocks them sideways, then fall under gravity
//! until they can hover again. Wolves and golems share one grounded machine
//! and differ only in tuning.

use glam::Vec2;

use super::{ClipSpec, FrameContext, play};
use crate::consts::*;
use crate::is_negligible;
use crate::sim::animation::InstanceIds;
use crate::sim::creature::{Creature, CreatureState, Perception};

const IDLE: ClipSpec = ClipSpec::looping("idle", 0.12);
const RUN: ClipSpec = ClipSpec::looping("run", 0.1);
const FLY: ClipSpec = ClipSpec::looping("fly", 0.08);
const FALL: ClipSpec = ClipSpec::once("fall", 0.1);
const ATTACK: ClipSpec = ClipSpec::looping("attack", 0.1);
const DEATH: ClipSpec = ClipSpec::once("death", 0.12);

fn perception(creature: &Creature) -> Perception {
    creature.perception().copied().unwrap_or_default()
}

/// Step of at most `max_step` from `from` toward `to`
fn approach(from: Vec2, to: Vec2, max_step: f32) -> Vec2 {
    let offset = to - from;
    if offset.length() <= max_step {
        offset
    } else {
        offset.normalize_or_zero() * max_step
    }
}

/// Leave an attack only early in the swing
fn attack_can_cancel(creature: &Creature) -> bool {
    creature.animation.progress < ATTACK_CANCEL_MAX_PROGRESS
}

pub(super) fn step_flying(creature: &mut Creature, ctx: &FrameContext, ids: &mut InstanceIds) -> Vec2 {
    let alive = creature.is_alive();
    creature.body.is_flying = alive && is_negligible(creature.body.velocity.x);
    if creature.state != CreatureState::Death && !creature.body.is_flying {
        creature.enter(CreatureState::Falling);
    }

    let sight = perception(creature);
    let mut delta = Vec2::ZERO;

    let next = match creature.state {
        CreatureState::Falling => {
            play(creature, FALL, ids);
            if !alive {
                (creature.animation.is_finished() && creature.body.is_grounded).then_some(CreatureState::Death)
            } else if creature.body.is_flying {
                Some(CreatureState::Idle)
            } else {
                None
            }
        }
        CreatureState::Idle => {
            play(creature, IDLE, ids);
            if sight.can_attack_player {
                Some(CreatureState::Attack0)
            } else if sight.can_see_player {
                Some(CreatureState::Moving)
            } else {
                None
            }
        }
        CreatureState::Moving => {
            play(creature, FLY, ids);
            if let Some(target) = ctx.player_position {
                delta = approach(creature.body.position, target, creature.stats.move_speed * ctx.dt);
            }
            if sight.can_attack_player {
                Some(CreatureState::Attack0)
            } else if !sight.can_see_player {
                Some(CreatureState::Idle)
            } else {
                None
            }
        }
        CreatureState::Attack0 => {
            play(creature, ATTACK, ids);
            if !sight.can_see_player {
                Some(CreatureState::Idle)
            } else if !sight.can_attack_player && attack_can_cancel(creature) {
                Some(CreatureState::Moving)
            } else {
                None
            }
        }
        CreatureState::Death => {
            play(creature, DEATH, ids);
            None
        }
        CreatureState::Delete => None,
        _ => Some(CreatureState::Idle),
    };

    if let Some(next) = next {
        creature.enter(next);
    }
    delta
}

pub(super) fn step_grounded(creature: &mut Creature, ctx: &FrameContext, ids: &mut InstanceIds) -> Vec2 {
    if !creature.is_alive() {
        creature.enter(CreatureState::Death);
    }

    let sight = perception(creature);
    let mut delta = Vec2::ZERO;

    let next = match creature.state {
        CreatureState::Idle => {
            play(creature, IDLE, ids);
            if sight.can_attack_player {
                Some(CreatureState::Attack0)
            } else if sight.can_see_player {
                Some(CreatureState::Moving)
            } else {
                None
            }
        }
        CreatureState::Moving => {
            play(creature, RUN, ids);
            if let Some(target) = ctx.player_position {
                let target = Vec2::new(target.x, creature.body.position.y);
                delta = approach(creature.body.position, target, creature.stats.move_speed * ctx.dt);
            }
            if sight.can_attack_player {
                Some(CreatureState::Attack0)
            } else if !sight.can_see_player {
                Some(CreatureState::Idle)
            } else {
                None
            }
        }
        CreatureState::Attack0 => {
            play(creature, ATTACK, ids);
            (!sight.can_attack_player && attack_can_cancel(creature)).then_some(CreatureState::Moving)
        }
        CreatureState::Death => {
            play(creature, DEATH, ids);
            None
        }
        CreatureState::Delete => None,
        _ => Some(CreatureState::Idle),
    };

    if let Some(next) = next {
        creature.enter(next);
    }
    delta
}
