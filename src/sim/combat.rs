//! Hit registration
//!
//! Runs after collision resolution over every ordered (attacker, target) pair.
//! A swing is identified by the instance id of the attacker's clip, and each
//! target records the ids that already hit it, so one swing lands at most once
//! per target while every loop of a repeating attack gets a fresh chance.

use glam::Vec2;

use super::animation::{Collider, MaskKind};
use super::creature::Creature;
use super::state::World;

/// Clip spawned where a block deflects an attack
pub const PARRY_EFFECT_CLIP: &str = "fx_parry";

/// Hitboxes of one creature for the combat pass
#[derive(Debug, Clone, Copy)]
struct Hitboxes {
    rigid: Collider,
    attack: Collider,
    block: Collider,
}

impl Hitboxes {
    fn sample(creature: &Creature, world: &World) -> Self {
        Self {
            rigid: creature.collider(MaskKind::Rigid, &world.animations),
            attack: creature.collider(MaskKind::Attack, &world.animations),
            block: creature.collider(MaskKind::Block, &world.animations),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Outcome {
    /// Deflected by the target's block at this point
    Blocked { at: Vec2 },
    Hit,
}

/// Decide what an attack does to a target, without mutating anything
fn judge(attacker: &Creature, target: &Creature, attack: Collider, target_boxes: &Hitboxes) -> Option<Outcome> {
    if attacker.id == target.id {
        return None;
    }
    let vitals = target.vitals.as_ref()?;
    if !vitals.is_alive() {
        return None;
    }
    if !attacker.is_player() && !target.is_player() {
        return None;
    }
    if vitals.has_consumed(attack.id) {
        return None;
    }

    let block = target_boxes.block;
    if block.is_present() && block.rect.overlaps(&attack.rect) {
        return Some(Outcome::Blocked {
            at: block.rect.center(),
        });
    }
    if attack.rect.overlaps(&target_boxes.rigid.rect) {
        return Some(Outcome::Hit);
    }
    None
}

fn mark_consumed(creature: &mut Creature, attack_id: u64, time: f32) {
    if let Some(vitals) = creature.vitals.as_mut() {
        vitals.consume(attack_id, time);
    }
}

/// Apply every attack overlapping a target this frame
pub fn resolve_combat(world: &mut World) {
    let boxes: Vec<Hitboxes> = {
        let snapshot: &World = world;
        snapshot.creatures.iter().map(|c| Hitboxes::sample(c, snapshot)).collect()
    };
    let time = world.time;
    let physics = world.tuning.physics;

    for a in 0..world.creatures.len() {
        let attack = boxes[a].attack;
        if !attack.is_present() {
            continue;
        }

        for t in 0..world.creatures.len() {
            if a == t || !boxes[t].rigid.is_present() {
                continue;
            }
            let Some(outcome) = judge(&world.creatures[a], &world.creatures[t], attack, &boxes[t]) else {
                continue;
            };

            match outcome {
                Outcome::Blocked { at } => {
                    let (damage, facing) = {
                        let defender = &world.creatures[t];
                        (defender.stats.damage, defender.body.facing_sign())
                    };
                    log::debug!(
                        "#{} blocked attack {} from #{}",
                        world.creatures[t].id.0,
                        attack.id,
                        world.creatures[a].id.0
                    );

                    mark_consumed(&mut world.creatures[t], attack.id, time);
                    let attacker = &mut world.creatures[a];
                    mark_consumed(attacker, attack.id, time);
                    if attacker.is_alive() {
                        attacker.apply_damage(damage, time);
                        attacker.knock_back(facing, &physics);
                    }

                    let id = world.next_creature_id();
                    world.queue_spawn(Creature::effect(id, PARRY_EFFECT_CLIP, at));
                }
                Outcome::Hit => {
                    let (damage, facing) = {
                        let attacker = &world.creatures[a];
                        (attacker.stats.damage, attacker.body.facing_sign())
                    };
                    let target = &mut world.creatures[t];
                    mark_consumed(target, attack.id, time);
                    target.apply_damage(damage, time);
                    target.knock_back(facing, &physics);
                }
            }
        }
    }
}

/// Forget consumed attack ids on creatures that have been left alone long enough
pub fn sweep_attack_ids(world: &mut World) {
    let time = world.time;
    let delay = world.tuning.attack_ids_clear_delay;
    for vitals in world.creatures.iter_mut().filter_map(|c| c.vitals.as_mut()) {
        vitals.sweep_attack_ids(time, delay);
    }
}
