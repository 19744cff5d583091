//! Creature entities
//!
//! Every simulated thing is a [`Creature`]: a shared base (body, animation,
//! vitals) plus a [`CreatureKind`] payload for archetype-specific data.

use std::collections::BTreeSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::animation::{AnimationClock, AnimationLibrary, Collider, InstanceIds, MaskKind, Pivot};
use super::rect::Rect;
use crate::level::Light;
use crate::tuning::{CreatureTuning, PhysicsTuning};

/// Stable handle to a creature; survives compaction of the live collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CreatureId(pub u32);

/// Behavior state (superset across archetypes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CreatureState {
    #[default]
    Idle,
    Moving,
    Jumping,
    Falling,
    Landing,
    Dashing,
    Blocking,
    Attack0,
    Attack1,
    Attack2,
    /// Terminal; never left
    Death,
    /// Marked for removal at end of frame
    Delete,
}

/// Physical state shared by all archetypes
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Facing left
    pub facing_flipped: bool,
    pub is_grounded: bool,
    /// Gravity does not apply
    pub is_flying: bool,
    /// Downward speed at the last touchdown; valid for the frame after it happened
    pub landed_at_speed: f32,
    pub pivot: Pivot,
}

impl Body {
    pub fn at(position: Vec2, pivot: Pivot) -> Self {
        Self {
            position,
            pivot,
            ..Default::default()
        }
    }

    pub fn facing_sign(&self) -> f32 {
        if self.facing_flipped { -1.0 } else { 1.0 }
    }
}

/// Health and hit bookkeeping (absent for obstacles and effects)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vitals {
    pub health: f32,
    pub max_health: f32,
    /// Simulation time of the last damage taken
    pub last_damage_time: f32,
    /// Simulation time an attack id was last recorded
    pub last_consume_time: f32,
    /// Attack instance ids that already hit this creature
    pub applied_attack_ids: BTreeSet<u64>,
}

impl Vitals {
    pub fn new(max_health: f32) -> Self {
        Self {
            health: max_health,
            max_health,
            last_damage_time: f32::NEG_INFINITY,
            last_consume_time: f32::NEG_INFINITY,
            applied_attack_ids: BTreeSet::new(),
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Subtract health; dead creatures are never touched again
    ///
    /// Returns true if the damage was applied.
    pub fn apply_damage(&mut self, amount: f32, time: f32) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.health -= amount;
        self.last_damage_time = time;
        true
    }

    pub fn has_consumed(&self, attack_id: u64) -> bool {
        self.applied_attack_ids.contains(&attack_id)
    }

    pub fn consume(&mut self, attack_id: u64, time: f32) {
        self.applied_attack_ids.insert(attack_id);
        self.last_consume_time = time;
    }

    /// Forget consumed attack ids once `delay` seconds pass with no hit and no parry
    pub fn sweep_attack_ids(&mut self, time: f32, delay: f32) {
        let quiet_since = self.last_damage_time.max(self.last_consume_time);
        if !self.applied_attack_ids.is_empty() && time - quiet_since > delay {
            self.applied_attack_ids.clear();
        }
    }
}

/// AI flags recomputed at the end of every frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Perception {
    pub can_see_player: bool,
    pub can_attack_player: bool,
}

/// Player intents remembered across frames within one state
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputBuffer {
    /// Clip progress at the latest attack press in the current state
    pub attack_at_progress: Option<f32>,
    /// Height (y) at the latest dash press while falling
    pub dash_from_height: Option<f32>,
}

/// Ping-pong mover between two points
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub start: Vec2,
    pub end: Vec2,
    /// Positive heads for `end`, negative for `start`
    pub speed: f32,
    /// Creatures riding this frame; handles only, never ownership
    pub passengers: BTreeSet<CreatureId>,
    /// Movement applied this frame, propagated to passengers
    pub last_delta: Vec2,
    /// Render-only
    pub light: Option<Light>,
}

impl Platform {
    pub fn new(start: Vec2, end: Vec2, speed: f32, light: Option<Light>) -> Self {
        Self {
            start,
            end,
            speed,
            passengers: BTreeSet::new(),
            last_delta: Vec2::ZERO,
            light,
        }
    }

    pub fn target(&self) -> Vec2 {
        if self.speed >= 0.0 { self.end } else { self.start }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CreatureKind {
    /// Static level geometry; its collider id is fixed at spawn
    RigidObstacle { rect: Rect, collider_id: u64 },
    Platform(Platform),
    Player(InputBuffer),
    FlyingEnemy(Perception),
    GroundedEnemy(Perception),
    /// One-shot visual such as a parry spark
    EphemeralEffect,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Creature {
    pub id: CreatureId,
    pub kind: CreatureKind,
    pub body: Body,
    pub state: CreatureState,
    pub animation: AnimationClock,
    /// Clip family prefix, e.g. `"wolf"` -> `"wolf_run"`
    pub family: String,
    pub stats: CreatureTuning,
    pub vitals: Option<Vitals>,
}

impl Creature {
    fn base(id: CreatureId, kind: CreatureKind, family: &str, body: Body) -> Self {
        Self {
            id,
            kind,
            body,
            state: CreatureState::Idle,
            animation: AnimationClock::default(),
            family: family.to_string(),
            stats: CreatureTuning::default(),
            vitals: None,
        }
    }

    fn with_stats(mut self, stats: CreatureTuning) -> Self {
        self.vitals = Some(Vitals::new(stats.max_health));
        self.stats = stats;
        self
    }

    pub fn obstacle(id: CreatureId, rect: Rect, collider_id: u64) -> Self {
        let body = Body::at(rect.center(), Pivot::Center);
        Self::base(id, CreatureKind::RigidObstacle { rect, collider_id }, "", body)
    }

    pub fn player(id: CreatureId, position: Vec2, stats: CreatureTuning) -> Self {
        let body = Body::at(position, Pivot::BottomCenter);
        Self::base(id, CreatureKind::Player(InputBuffer::default()), "player", body).with_stats(stats)
    }

    pub fn flying_enemy(id: CreatureId, family: &str, position: Vec2, stats: CreatureTuning) -> Self {
        let mut body = Body::at(position, Pivot::BottomCenter);
        body.is_flying = true;
        Self::base(id, CreatureKind::FlyingEnemy(Perception::default()), family, body).with_stats(stats)
    }

    pub fn grounded_enemy(id: CreatureId, family: &str, position: Vec2, stats: CreatureTuning) -> Self {
        let body = Body::at(position, Pivot::BottomCenter);
        Self::base(id, CreatureKind::GroundedEnemy(Perception::default()), family, body).with_stats(stats)
    }

    pub fn platform(id: CreatureId, family: &str, platform: Platform) -> Self {
        let mut body = Body::at(platform.start, Pivot::TopCenter);
        body.is_flying = true;
        Self::base(id, CreatureKind::Platform(platform), family, body)
    }

    /// `clip` is the full clip name; effects have no family
    pub fn effect(id: CreatureId, clip: &str, position: Vec2) -> Self {
        let mut body = Body::at(position, Pivot::Center);
        body.is_flying = true;
        Self::base(id, CreatureKind::EphemeralEffect, clip, body)
    }

    pub fn is_player(&self) -> bool {
        matches!(self.kind, CreatureKind::Player(_))
    }

    pub fn is_enemy(&self) -> bool {
        matches!(self.kind, CreatureKind::FlyingEnemy(_) | CreatureKind::GroundedEnemy(_))
    }

    /// Moved by gravity and pushed out of other bodies
    pub fn is_dynamic(&self) -> bool {
        self.is_player() || self.is_enemy()
    }

    pub fn health(&self) -> Option<f32> {
        self.vitals.as_ref().map(|v| v.health)
    }

    /// Creatures without vitals never die
    pub fn is_alive(&self) -> bool {
        self.vitals.as_ref().is_none_or(Vitals::is_alive)
    }

    pub fn perception(&self) -> Option<&Perception> {
        match &self.kind {
            CreatureKind::FlyingEnemy(p) | CreatureKind::GroundedEnemy(p) => Some(p),
            _ => None,
        }
    }

    pub fn perception_mut(&mut self) -> Option<&mut Perception> {
        match &mut self.kind {
            CreatureKind::FlyingEnemy(p) | CreatureKind::GroundedEnemy(p) => Some(p),
            _ => None,
        }
    }

    pub fn platform_mut(&mut self) -> Option<&mut Platform> {
        match &mut self.kind {
            CreatureKind::Platform(p) => Some(p),
            _ => None,
        }
    }

    /// Switch state, dropping any intents buffered for the previous one
    pub fn enter(&mut self, state: CreatureState) {
        if self.state == state {
            return;
        }
        self.state = state;
        if let CreatureKind::Player(buffer) = &mut self.kind {
            *buffer = InputBuffer::default();
        }
    }

    /// Full clip name for an action of this creature's family
    pub fn clip_name(&self, action: &str) -> String {
        if action.is_empty() {
            self.family.clone()
        } else {
            format!("{}_{}", self.family, action)
        }
    }

    pub fn play(&mut self, action: &str, frame_duration: f32, is_repeat: bool, ids: &mut InstanceIds) {
        let clip = self.clip_name(action);
        self.animation.play(&clip, frame_duration, is_repeat, ids);
    }

    /// World-space hitbox of `kind` this frame
    pub fn collider(&self, kind: MaskKind, animations: &AnimationLibrary) -> Collider {
        match &self.kind {
            CreatureKind::RigidObstacle { rect, collider_id } => {
                if kind == MaskKind::Rigid && rect.is_solid() {
                    Collider::new(*rect, *collider_id)
                } else {
                    Collider::NONE
                }
            }
            CreatureKind::EphemeralEffect => Collider::NONE,
            _ => animations.collider(
                &self.animation,
                kind,
                self.body.position,
                self.body.pivot,
                self.body.facing_flipped,
            ),
        }
    }

    pub fn apply_damage(&mut self, amount: f32, time: f32) {
        let Some(vitals) = self.vitals.as_mut() else {
            return;
        };
        if vitals.apply_damage(amount, time) && !vitals.is_alive() {
            log::debug!("{} #{} died", self.family, self.id.0);
        }
    }

    /// Knock away along `direction` (sign of x) with a small upward pop
    pub fn knock_back(&mut self, direction: f32, physics: &PhysicsTuning) {
        self.body.velocity = Vec2::new(
            direction.signum() * physics.knockback_speed,
            -physics.knockback_lift,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;

    #[test]
    fn test_dead_creature_takes_no_more_damage() {
        let mut vitals = Vitals::new(10.0);
        assert!(vitals.apply_damage(15.0, 1.0));
        assert_eq!(vitals.health, -5.0);
        assert!(!vitals.apply_damage(5.0, 2.0));
        assert_eq!(vitals.health, -5.0);
        assert_eq!(vitals.last_damage_time, 1.0);
    }

    #[test]
    fn test_attack_id_sweep_waits_for_quiet_period() {
        let mut vitals = Vitals::new(10.0);
        vitals.apply_damage(1.0, 1.0);
        vitals.consume(7, 1.0);
        vitals.sweep_attack_ids(3.0, 5.0);
        assert!(vitals.has_consumed(7));
        vitals.sweep_attack_ids(6.5, 5.0);
        assert!(!vitals.has_consumed(7));
    }

    #[test]
    fn test_parried_ids_survive_sweep_without_damage() {
        // Never hurt, only parried
        let mut vitals = Vitals::new(10.0);
        vitals.consume(3, 2.0);
        vitals.sweep_attack_ids(2.0, 5.0);
        assert!(vitals.has_consumed(3));
        vitals.sweep_attack_ids(7.5, 5.0);
        assert!(!vitals.has_consumed(3));
    }

    #[test]
    fn test_enter_clears_player_buffer() {
        let tuning = Tuning::default();
        let mut player = Creature::player(CreatureId(1), Vec2::ZERO, tuning.player);
        if let CreatureKind::Player(buffer) = &mut player.kind {
            buffer.attack_at_progress = Some(0.7);
        }
        player.enter(CreatureState::Attack0);
        match &player.kind {
            CreatureKind::Player(buffer) => assert_eq!(buffer.attack_at_progress, None),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_obstacle_collider_is_fixed() {
        let library = AnimationLibrary::default();
        let rect = Rect::new(0.0, 100.0, 200.0, 20.0);
        let obstacle = Creature::obstacle(CreatureId(3), rect, 42);
        let rigid = obstacle.collider(MaskKind::Rigid, &library);
        assert_eq!(rigid, Collider::new(rect, 42));
        assert!(!obstacle.collider(MaskKind::Attack, &library).is_present());
        assert!(obstacle.is_alive());
        assert_eq!(obstacle.health(), None);
    }

    #[test]
    fn test_platform_targets_follow_speed_sign() {
        let mut platform = Platform::new(Vec2::ZERO, Vec2::new(100.0, 0.0), 50.0, None);
        assert_eq!(platform.target(), Vec2::new(100.0, 0.0));
        platform.speed = -50.0;
        assert_eq!(platform.target(), Vec2::ZERO);
    }
}
