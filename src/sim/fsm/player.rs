//! Player state machine
//!
//! Attacks chain through a buffered-input rule: an attack pressed while a
//! one-shot clip plays is remembered with the clip progress at the time of the
//! press, and only honored when the clip ends if it came late enough.

use glam::Vec2;

use super::{ClipSpec, FrameContext, play};
use crate::consts::*;
use crate::sim::animation::InstanceIds;
use crate::sim::creature::{Creature, CreatureKind, CreatureState, InputBuffer};

const IDLE: ClipSpec = ClipSpec::looping("idle", 0.12);
const RUN: ClipSpec = ClipSpec::looping("run", 0.08);
const JUMP: ClipSpec = ClipSpec::once("jump", 0.1);
const FALL: ClipSpec = ClipSpec::looping("fall", 0.1);
const LANDING: ClipSpec = ClipSpec::once("landing", 0.08);
const ROLL: ClipSpec = ClipSpec::once("roll", 0.06);
const ATTACK_0: ClipSpec = ClipSpec::once("attack_0", 0.07);
const ATTACK_1: ClipSpec = ClipSpec::once("attack_1", 0.07);
const ATTACK_2: ClipSpec = ClipSpec::once("attack_2", 0.08);
const BLOCK: ClipSpec = ClipSpec::once("block", 0.08);
const DEATH: ClipSpec = ClipSpec::once("death", 0.12);

fn buffer(creature: &Creature) -> InputBuffer {
    match &creature.kind {
        CreatureKind::Player(buffer) => *buffer,
        _ => InputBuffer::default(),
    }
}

fn buffer_mut(creature: &mut Creature) -> Option<&mut InputBuffer> {
    match &mut creature.kind {
        CreatureKind::Player(buffer) => Some(buffer),
        _ => None,
    }
}

/// Remember an attack press at the current clip progress
fn buffer_attack(creature: &mut Creature, pressed: bool) {
    if !pressed {
        return;
    }
    let progress = creature.animation.progress;
    if let Some(buffer) = buffer_mut(creature) {
        buffer.attack_at_progress = Some(progress);
    }
}

fn buffered_attack_after(creature: &Creature, min_progress: f32) -> bool {
    buffer(creature)
        .attack_at_progress
        .is_some_and(|progress| progress >= min_progress)
}

/// Where a finished move lands when nothing is chained
fn settle(creature: &Creature) -> CreatureState {
    if creature.body.is_grounded {
        CreatureState::Idle
    } else {
        CreatureState::Falling
    }
}

/// Transitions shared by Idle and Moving
fn grounded_transition(creature: &mut Creature, ctx: &FrameContext, direction: f32) -> Option<CreatureState> {
    let input = ctx.input;
    let grounded = creature.body.is_grounded;

    if !grounded && creature.body.velocity.y > MOTION_EPSILON {
        return Some(CreatureState::Falling);
    }
    if input.jump && grounded {
        creature.body.velocity.y = -creature.stats.jump_speed;
        return Some(CreatureState::Jumping);
    }
    if input.attack {
        return Some(CreatureState::Attack0);
    }
    if input.block && grounded {
        return Some(CreatureState::Blocking);
    }
    if creature.state == CreatureState::Moving && input.dash && grounded && direction != 0.0 {
        return Some(CreatureState::Dashing);
    }
    match creature.state {
        CreatureState::Idle if direction != 0.0 && grounded => Some(CreatureState::Moving),
        CreatureState::Moving if direction == 0.0 => Some(CreatureState::Idle),
        _ => None,
    }
}

/// Touchdown after a fall: roll recovery, hard landing, or carry on
fn land(creature: &mut Creature, ctx: &FrameContext, direction: f32) -> CreatureState {
    let fallen_since_dash = buffer(creature)
        .dash_from_height
        .map(|height| creature.body.position.y - height);
    if fallen_since_dash.is_some_and(|fallen| fallen < SAFE_DASHING_HEIGHT) {
        return CreatureState::Dashing;
    }

    let speed = creature.body.landed_at_speed;
    if speed > LANDING_MIN_SPEED {
        let damage = LANDING_DAMAGE_FACTOR * (speed - LANDING_MIN_SPEED);
        creature.apply_damage(damage, ctx.time);
        log::debug!("Hard landing at {:.0}: {:.0} damage", speed, damage);
        return CreatureState::Landing;
    }

    if direction != 0.0 {
        CreatureState::Moving
    } else {
        CreatureState::Idle
    }
}

pub(super) fn step(creature: &mut Creature, ctx: &FrameContext, ids: &mut InstanceIds) -> Vec2 {
    if !creature.is_alive() {
        creature.enter(CreatureState::Death);
    }

    let input = ctx.input;
    let direction = input.horizontal();
    let walk = direction * creature.stats.move_speed * ctx.dt;
    let mut delta = Vec2::ZERO;

    let next = match creature.state {
        CreatureState::Idle => {
            play(creature, IDLE, ids);
            grounded_transition(creature, ctx, direction)
        }
        CreatureState::Moving => {
            play(creature, RUN, ids);
            delta.x = walk;
            grounded_transition(creature, ctx, direction)
        }
        CreatureState::Jumping => {
            play(creature, JUMP, ids);
            delta.x = walk;
            if input.attack {
                Some(CreatureState::Attack0)
            } else if creature.body.is_grounded && creature.body.velocity.y >= 0.0 {
                // Bumped a ceiling or landed on a ledge before the apex
                Some(land(creature, ctx, direction))
            } else if creature.body.velocity.y > 0.0 {
                Some(CreatureState::Falling)
            } else {
                None
            }
        }
        CreatureState::Falling => {
            play(creature, FALL, ids);
            delta.x = walk;
            if input.dash {
                let height = creature.body.position.y;
                if let Some(buffer) = buffer_mut(creature) {
                    buffer.dash_from_height = Some(height);
                }
            }
            if creature.body.is_grounded {
                Some(land(creature, ctx, direction))
            } else if input.attack {
                Some(CreatureState::Attack0)
            } else {
                None
            }
        }
        CreatureState::Landing => {
            play(creature, LANDING, ids);
            creature.animation.is_finished().then_some(CreatureState::Idle)
        }
        CreatureState::Dashing => {
            play(creature, ROLL, ids);
            delta.x = creature.body.facing_sign() * DASH_SPEED * ctx.dt;
            buffer_attack(creature, input.attack);
            if creature.animation.is_finished() {
                if buffered_attack_after(creature, ATTACK_0_AFTER_DASH_MIN_PROGRESS) {
                    Some(CreatureState::Attack0)
                } else {
                    Some(settle(creature))
                }
            } else {
                None
            }
        }
        CreatureState::Attack0 | CreatureState::Attack1 | CreatureState::Attack2 => {
            let (clip, chain) = match creature.state {
                CreatureState::Attack0 => (
                    ATTACK_0,
                    Some((CreatureState::Attack1, ATTACK_1_AFTER_ATTACK_0_MIN_PROGRESS)),
                ),
                CreatureState::Attack1 => (
                    ATTACK_1,
                    Some((CreatureState::Attack2, ATTACK_2_AFTER_ATTACK_1_MIN_PROGRESS)),
                ),
                _ => (ATTACK_2, None),
            };
            play(creature, clip, ids);
            buffer_attack(creature, input.attack);
            if creature.animation.is_finished() {
                match chain {
                    Some((next, min_progress)) if buffered_attack_after(creature, min_progress) => Some(next),
                    _ => Some(settle(creature)),
                }
            } else {
                None
            }
        }
        CreatureState::Blocking => {
            play(creature, BLOCK, ids);
            creature.animation.is_finished().then_some(CreatureState::Idle)
        }
        CreatureState::Death => {
            play(creature, DEATH, ids);
            None
        }
        CreatureState::Delete => None,
    };

    if let Some(next) = next {
        creature.enter(next);
    }
    delta
}
