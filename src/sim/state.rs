//! World state: the live creature collection and the counters it owns
//!
//! The collection is only resized at end of frame; spawns made during a frame
//! wait in `pending` so index-based passes never see it change under them.

use std::collections::BTreeSet;

use glam::Vec2;

use super::animation::{AnimationLibrary, InstanceIds};
use super::creature::{Creature, CreatureId, CreatureKind, CreatureState, Platform};
use super::rect::Rect;
use crate::level::{LevelData, Light, SpawnKind};
use crate::{LoadError, Tuning};

/// A render-only light placed by the level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedLight {
    pub position: Vec2,
    pub light: Light,
}

#[derive(Debug, Clone)]
pub struct World {
    /// Live creatures, in spawn order
    pub creatures: Vec<Creature>,
    /// Spawned this frame, merged by [`World::end_frame`]
    pub pending: Vec<Creature>,
    pub lights: Vec<PlacedLight>,
    pub animations: AnimationLibrary,
    pub tuning: Tuning,
    pub instance_ids: InstanceIds,
    /// Simulation seconds elapsed
    pub time: f32,
    pub frame: u64,
    next_id: u32,
}

impl World {
    pub fn new(animations: AnimationLibrary, tuning: Tuning) -> Self {
        Self {
            creatures: Vec::new(),
            pending: Vec::new(),
            lights: Vec::new(),
            animations,
            tuning,
            instance_ids: InstanceIds::new(),
            time: 0.0,
            frame: 0,
            next_id: 1,
        }
    }

    /// Instantiate every spawn point of a validated level
    pub fn from_level(level: &LevelData, animations: AnimationLibrary, tuning: Tuning) -> Result<Self, LoadError> {
        level.validate()?;

        let mut world = Self::new(animations, tuning);
        for rect in &level.rigid {
            world.add_obstacle(*rect);
        }

        for spawn in &level.spawns {
            let position = spawn.position;
            match spawn.kind {
                SpawnKind::Player => {
                    world.add_player(position);
                }
                SpawnKind::Bat => {
                    world.add_bat(position);
                }
                SpawnKind::Wolf => {
                    world.add_wolf(position);
                }
                SpawnKind::Golem => {
                    world.add_golem(position);
                }
                SpawnKind::Platform => {
                    // validate() guarantees a destination
                    let end = spawn.properties.destination.unwrap_or(position);
                    world.add_platform(position, end, spawn.properties.tag.as_deref(), spawn.properties.light);
                }
                SpawnKind::Light => match spawn.properties.light {
                    Some(light) => world.lights.push(PlacedLight { position, light }),
                    None => log::warn!("Light spawn at {:?} has no light parameters", position),
                },
            }
        }

        for creature in &world.creatures {
            let idle = creature.clip_name("idle");
            if !creature.family.is_empty() && !world.animations.contains(&idle) {
                log::warn!("No clip '{}' in animation library", idle);
            }
        }

        log::info!(
            "World built: {} creatures, {} lights",
            world.creatures.len(),
            world.lights.len()
        );
        Ok(world)
    }

    pub fn next_creature_id(&mut self) -> CreatureId {
        let id = CreatureId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Insert directly into the live collection (load time only)
    pub fn spawn(&mut self, creature: Creature) -> CreatureId {
        let id = creature.id;
        self.creatures.push(creature);
        id
    }

    /// Defer a spawn to the end of the current frame
    pub fn queue_spawn(&mut self, creature: Creature) -> CreatureId {
        let id = creature.id;
        self.pending.push(creature);
        id
    }

    pub fn add_obstacle(&mut self, rect: Rect) -> CreatureId {
        let id = self.next_creature_id();
        let collider_id = self.instance_ids.allocate();
        self.spawn(Creature::obstacle(id, rect, collider_id))
    }

    pub fn add_player(&mut self, position: Vec2) -> CreatureId {
        let id = self.next_creature_id();
        let stats = self.tuning.player;
        self.spawn(Creature::player(id, position, stats))
    }

    pub fn add_bat(&mut self, position: Vec2) -> CreatureId {
        let id = self.next_creature_id();
        let stats = self.tuning.bat;
        self.spawn(Creature::flying_enemy(id, "bat", position, stats))
    }

    pub fn add_wolf(&mut self, position: Vec2) -> CreatureId {
        let id = self.next_creature_id();
        let stats = self.tuning.wolf;
        self.spawn(Creature::grounded_enemy(id, "wolf", position, stats))
    }

    pub fn add_golem(&mut self, position: Vec2) -> CreatureId {
        let id = self.next_creature_id();
        let stats = self.tuning.golem;
        self.spawn(Creature::grounded_enemy(id, "golem", position, stats))
    }

    pub fn add_platform(&mut self, start: Vec2, end: Vec2, tag: Option<&str>, light: Option<Light>) -> CreatureId {
        let id = self.next_creature_id();
        let family = match tag {
            Some(tag) => format!("platform_{tag}"),
            None => "platform".to_string(),
        };
        let platform = Platform::new(start, end, self.tuning.platform_speed, light);
        self.spawn(Creature::platform(id, &family, platform))
    }

    pub fn index_of(&self, id: CreatureId) -> Option<usize> {
        self.creatures.iter().position(|c| c.id == id)
    }

    pub fn get(&self, id: CreatureId) -> Option<&Creature> {
        self.creatures.iter().find(|c| c.id == id)
    }

    pub fn get_mut(&mut self, id: CreatureId) -> Option<&mut Creature> {
        self.creatures.iter_mut().find(|c| c.id == id)
    }

    pub fn player_index(&self) -> Option<usize> {
        self.creatures.iter().position(Creature::is_player)
    }

    pub fn player(&self) -> Option<&Creature> {
        self.creatures.iter().find(|c| c.is_player())
    }

    /// Drop deleted creatures, then merge this frame's spawns
    pub fn end_frame(&mut self) {
        self.creatures.retain(|c| c.state != CreatureState::Delete);
        self.creatures.append(&mut self.pending);

        // Passenger handles may now point at nothing
        let alive: BTreeSet<CreatureId> = self.creatures.iter().map(|c| c.id).collect();
        for creature in &mut self.creatures {
            if let CreatureKind::Platform(platform) = &mut creature.kind {
                platform.passengers.retain(|id| alive.contains(id));
            }
        }
    }
}
