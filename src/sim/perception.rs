//! Enemy line-of-sight and reach
//!
//! Runs last in the frame so the flags reflect final positions; the state
//! machines read them on the next frame.

use glam::Vec2;

use super::animation::{Collider, MaskKind};
use super::creature::{Creature, Perception};
use super::rect::Rect;
use super::state::World;
use crate::angle_between_points;
use crate::consts::{EYE_OFFSET, VIEW_ANGLE_LIMIT};

/// What `viewer` can perceive of a player standing at `player`
///
/// `blockers` are the rigid rects that can occlude the line of sight.
pub fn perceive(viewer: &Creature, player: Vec2, blockers: &[Rect]) -> Perception {
    let eye = viewer.body.position - Vec2::new(0.0, EYE_OFFSET);
    let target = player - Vec2::new(0.0, EYE_OFFSET);

    if viewer.stats.restrict_vertical_view && angle_between_points(eye, target) > VIEW_ANGLE_LIMIT {
        return Perception::default();
    }

    let distance = eye.distance(target);
    if distance > viewer.stats.view_distance {
        return Perception::default();
    }

    if blockers.iter().any(|rect| rect.intersects_segment(eye, target)) {
        return Perception::default();
    }

    Perception {
        can_see_player: true,
        can_attack_player: distance < viewer.stats.attack_range,
    }
}

/// Recompute every enemy's perception flags against the player
pub fn update_perception(world: &mut World) {
    let player = world.player_index().map(|i| {
        let player = &world.creatures[i];
        (i, player.body.position, player.is_alive())
    });
    let rigid: Vec<Collider> = world
        .creatures
        .iter()
        .map(|c| c.collider(MaskKind::Rigid, &world.animations))
        .collect();

    for i in 0..world.creatures.len() {
        let creature = &world.creatures[i];
        if creature.perception().is_none() {
            continue;
        }

        let flags = match player {
            Some((p, position, true)) if creature.is_alive() => {
                let blockers: Vec<Rect> = rigid
                    .iter()
                    .enumerate()
                    .filter(|&(j, collider)| j != i && j != p && collider.is_present())
                    .map(|(_, collider)| collider.rect)
                    .collect();
                perceive(creature, position, &blockers)
            }
            _ => Perception::default(),
        };

        if let Some(perception) = world.creatures[i].perception_mut() {
            *perception = flags;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;
    use crate::sim::animation::AnimationLibrary;
    use crate::sim::creature::CreatureId;

    fn wolf(position: Vec2) -> Creature {
        Creature::grounded_enemy(CreatureId(2), "wolf", position, Tuning::default().wolf)
    }

    #[test]
    fn test_view_distance_and_attack_range() {
        let viewer = wolf(Vec2::new(0.0, 100.0));
        assert_eq!(viewer.stats.view_distance, 200.0);

        let far = perceive(&viewer, Vec2::new(250.0, 100.0), &[]);
        assert!(!far.can_see_player);

        let near = perceive(&viewer, Vec2::new(150.0, 100.0), &[]);
        assert!(near.can_see_player);
        assert!(!near.can_attack_player);

        let close = perceive(&viewer, Vec2::new(viewer.stats.attack_range - 1.0, 100.0), &[]);
        assert!(close.can_see_player && close.can_attack_player);
    }

    #[test]
    fn test_wall_blocks_sight() {
        let viewer = wolf(Vec2::new(0.0, 100.0));
        let wall = Rect::new(50.0, 0.0, 10.0, 100.0);
        let blocked = perceive(&viewer, Vec2::new(100.0, 100.0), &[wall]);
        assert_eq!(blocked, Perception::default());

        // Floor under both feet does not block, thanks to the eye offset
        let floor = Rect::new(-50.0, 100.0, 300.0, 20.0);
        assert!(perceive(&viewer, Vec2::new(100.0, 100.0), &[floor]).can_see_player);
    }

    #[test]
    fn test_vertical_view_restriction() {
        let player = Vec2::new(50.0, 0.0);
        let wolf = wolf(Vec2::new(0.0, 100.0));
        assert!(wolf.stats.restrict_vertical_view);
        assert!(!perceive(&wolf, player, &[]).can_see_player);

        let bat = Creature::flying_enemy(CreatureId(3), "bat", Vec2::new(0.0, 100.0), Tuning::default().bat);
        assert!(!bat.stats.restrict_vertical_view);
        assert!(perceive(&bat, player, &[]).can_see_player);
    }

    #[test]
    fn test_world_update_clears_flags_when_player_dies() {
        let mut world = World::new(AnimationLibrary::default(), Tuning::default());
        let player = world.add_player(Vec2::new(100.0, 100.0));
        let wolf = world.add_wolf(Vec2::new(0.0, 100.0));

        update_perception(&mut world);
        assert!(world.get(wolf).unwrap().perception().unwrap().can_see_player);
        assert!(world.get(player).unwrap().perception().is_none());

        world.get_mut(player).unwrap().apply_damage(1000.0, 0.0);
        update_perception(&mut world);
        assert_eq!(*world.get(wolf).unwrap().perception().unwrap(), Perception::default());
    }

    #[test]
    fn test_dead_enemy_perceives_nothing() {
        let mut world = World::new(AnimationLibrary::default(), Tuning::default());
        world.add_player(Vec2::new(10.0, 100.0));
        let wolf = world.add_wolf(Vec2::new(0.0, 100.0));
        world.get_mut(wolf).unwrap().apply_damage(1000.0, 0.0);
        update_perception(&mut world);
        assert_eq!(*world.get(wolf).unwrap().perception().unwrap(), Perception::default());
    }
}
