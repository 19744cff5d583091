//! Per-creature motion integration
//!
//! Velocity (gravity, friction, knockback) and intended deltas (walking,
//! dashing, AI steps) both move a creature, but never on the same axis in the
//! same frame: a live velocity on an axis suppresses the intended delta there.

use glam::Vec2;

use super::creature::{Creature, CreatureId, CreatureKind};
use crate::tuning::PhysicsTuning;
use crate::{decay_toward_zero, is_negligible};

/// Advance a dynamic creature by its velocity and intended delta
pub fn integrate(creature: &mut Creature, mut delta: Vec2, dt: f32, physics: &PhysicsTuning) {
    let body = &mut creature.body;
    let friction = physics.friction * dt;

    // Touchdown speed is a one-frame signal, already consumed by the state step
    body.landed_at_speed = 0.0;

    if body.is_flying {
        body.velocity.y = decay_toward_zero(body.velocity.y, friction);
    } else {
        body.velocity.y += physics.gravity * dt;
    }
    body.velocity.x = decay_toward_zero(body.velocity.x, friction);

    if !is_negligible(body.velocity.x) {
        delta.x = 0.0;
    }
    if !is_negligible(body.velocity.y) {
        delta.y = 0.0;
    }

    if !is_negligible(delta.x) {
        body.facing_flipped = delta.x < 0.0;
    }

    body.position += delta + body.velocity * dt;
}

/// Move every platform's passengers by the platform's own delta this frame
pub fn carry_passengers(creatures: &mut [Creature]) {
    let rides: Vec<(Vec2, Vec<CreatureId>)> = creatures
        .iter()
        .filter_map(|c| match &c.kind {
            CreatureKind::Platform(p) if !p.passengers.is_empty() => {
                Some((p.last_delta, p.passengers.iter().copied().collect()))
            }
            _ => None,
        })
        .collect();

    for (delta, passengers) in rides {
        for id in passengers {
            if let Some(rider) = creatures.iter_mut().find(|c| c.id == id) {
                rider.body.position += delta;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;
    use crate::consts::SIM_DT;
    use crate::sim::creature::Platform;

    fn wolf() -> Creature {
        Creature::grounded_enemy(CreatureId(1), "wolf", Vec2::ZERO, Tuning::default().wolf)
    }

    #[test]
    fn test_gravity_accumulates_unless_flying() {
        let physics = PhysicsTuning::default();
        let mut walker = wolf();
        integrate(&mut walker, Vec2::ZERO, SIM_DT, &physics);
        assert!((walker.body.velocity.y - physics.gravity * SIM_DT).abs() < 1e-4);
        assert!(walker.body.position.y > 0.0);

        let mut bat = Creature::flying_enemy(CreatureId(2), "bat", Vec2::ZERO, Tuning::default().bat);
        integrate(&mut bat, Vec2::ZERO, SIM_DT, &physics);
        assert_eq!(bat.body.velocity, Vec2::ZERO);
        assert_eq!(bat.body.position, Vec2::ZERO);
    }

    #[test]
    fn test_friction_stops_at_zero() {
        let physics = PhysicsTuning::default();
        let mut walker = wolf();
        walker.body.velocity.x = 5.0;
        integrate(&mut walker, Vec2::ZERO, SIM_DT, &physics);
        assert_eq!(walker.body.velocity.x, 0.0);

        walker.body.velocity.x = -100.0;
        integrate(&mut walker, Vec2::ZERO, SIM_DT, &physics);
        assert!((walker.body.velocity.x - (-100.0 + physics.friction * SIM_DT)).abs() < 1e-3);
    }

    #[test]
    fn test_velocity_suppresses_intent_and_facing() {
        let physics = PhysicsTuning::default();
        let mut walker = wolf();
        walker.body.velocity.x = 150.0;
        integrate(&mut walker, Vec2::new(-3.0, 0.0), SIM_DT, &physics);
        // Knocked right; the leftward step is dropped and facing is untouched
        assert!(walker.body.position.x > 0.0);
        assert!(!walker.body.facing_flipped);

        let mut walker = wolf();
        integrate(&mut walker, Vec2::new(-3.0, 0.0), SIM_DT, &physics);
        assert!((walker.body.position.x + 3.0).abs() < 1e-5);
        assert!(walker.body.facing_flipped);
    }

    #[test]
    fn test_landed_speed_lasts_one_frame() {
        let physics = PhysicsTuning::default();
        let mut walker = wolf();
        walker.body.landed_at_speed = 300.0;
        integrate(&mut walker, Vec2::ZERO, SIM_DT, &physics);
        assert_eq!(walker.body.landed_at_speed, 0.0);
    }

    #[test]
    fn test_passengers_follow_platform() {
        let tuning = Tuning::default();
        let mut platform = Platform::new(Vec2::ZERO, Vec2::new(100.0, 0.0), 50.0, None);
        platform.passengers.insert(CreatureId(1));
        platform.last_delta = Vec2::new(2.5, -1.0);

        let mut creatures = vec![
            Creature::player(CreatureId(1), Vec2::new(10.0, 0.0), tuning.player),
            Creature::platform(CreatureId(2), "platform", platform),
            Creature::grounded_enemy(CreatureId(3), "wolf", Vec2::new(50.0, 0.0), tuning.wolf),
        ];
        carry_passengers(&mut creatures);
        assert_eq!(creatures[0].body.position, Vec2::new(12.5, -1.0));
        assert_eq!(creatures[2].body.position, Vec2::new(50.0, 0.0));
    }
}
