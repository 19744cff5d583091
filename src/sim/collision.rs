//! Penetration resolution between creature bodies
//!
//! One pass per frame. Each dynamic creature gathers the MTV against every
//! other rigid body it overlaps, keeping the most negative and most positive
//! push per axis. Opposing pushes on one axis mean it is being crushed.

use glam::Vec2;

use super::animation::{Collider, MaskKind};
use super::creature::{Creature, CreatureId, CreatureKind};
use super::state::World;
use crate::consts::SMASH_EPSILON;

/// Extremes of all MTVs collected for one creature this frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Contact {
    /// Most negative push per axis (0 if none)
    pub min: Vec2,
    /// Most positive push per axis (0 if none)
    pub max: Vec2,
}

impl Contact {
    pub fn add(&mut self, mtv: Vec2) {
        self.min = self.min.min(mtv);
        self.max = self.max.max(mtv);
    }

    pub fn smashed_x(&self) -> bool {
        self.min.x < -SMASH_EPSILON && self.max.x > SMASH_EPSILON
    }

    pub fn smashed_y(&self) -> bool {
        self.min.y < -SMASH_EPSILON && self.max.y > SMASH_EPSILON
    }

    /// Combined correction for the frame
    pub fn resolve(&self) -> Resolution {
        let smashed_x = self.smashed_x();
        let smashed_y = self.smashed_y();

        let dominant = |min: f32, max: f32| if max > -min { max } else { min };
        let x = if smashed_x { 0.0 } else { dominant(self.min.x, self.max.x) };
        // Crushed vertically: stay on the floor
        let y = if smashed_y { self.min.y } else { dominant(self.min.y, self.max.y) };

        Resolution {
            correction: Vec2::new(x, y),
            smashed: smashed_x || smashed_y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub correction: Vec2,
    /// Crushed between two surfaces on some axis
    pub smashed: bool,
}

/// Push `creature` out by `resolution` and update its contact flags
pub fn apply_resolution(creature: &mut Creature, resolution: Resolution, time: f32) {
    let correction = resolution.correction;
    let body = &mut creature.body;
    body.position += correction;

    if correction.y < 0.0 && body.velocity.y > 0.0 {
        body.landed_at_speed = body.velocity.y;
        body.velocity = Vec2::ZERO;
        body.is_grounded = true;
    } else if correction.y > 0.0 && body.velocity.y < 0.0 {
        body.velocity.y = 0.0;
        body.is_grounded = false;
    } else {
        body.is_grounded = false;
    }

    if resolution.smashed {
        if let Some(health) = creature.health().filter(|h| *h > 0.0) {
            log::debug!("{} #{} smashed", creature.family, creature.id.0);
            creature.apply_damage(health, time);
        }
    }
}

/// Resolve every dynamic creature against all other rigid bodies
///
/// Also refreshes platform passenger sets: a creature pushed up by a platform
/// rides it; anything else gets off.
pub fn resolve_collisions(world: &mut World) {
    let time = world.time;
    let animations = &world.animations;
    let creatures = &mut world.creatures;

    let mut rigid: Vec<Collider> = creatures
        .iter()
        .map(|c| c.collider(MaskKind::Rigid, animations))
        .collect();
    let mut rides: Vec<(usize, CreatureId, bool)> = Vec::new();

    for i in 0..creatures.len() {
        if !creatures[i].is_dynamic() || !rigid[i].is_present() {
            continue;
        }

        let mut contact = Contact::default();
        for (j, other) in rigid.iter().enumerate() {
            if i == j || !other.is_present() {
                continue;
            }
            let mtv = rigid[i].rect.mtv(&other.rect);
            if matches!(creatures[j].kind, CreatureKind::Platform(_)) {
                rides.push((j, creatures[i].id, mtv.y < 0.0));
            }
            if mtv != Vec2::ZERO {
                contact.add(mtv);
            }
        }

        let resolution = contact.resolve();
        apply_resolution(&mut creatures[i], resolution, time);
        rigid[i].rect = rigid[i].rect.translated(resolution.correction);
    }

    for (index, rider, riding) in rides {
        if let Some(platform) = creatures[index].platform_mut() {
            if riding {
                platform.passengers.insert(rider);
            } else {
                platform.passengers.remove(&rider);
            }
        }
    }
}
