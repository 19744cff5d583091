//! Read-only snapshot for the presentation layer
//!
//! The renderer never touches simulation state directly; it asks for draw
//! requests and the health bar once per frame.

use glam::Vec2;

use super::creature::{CreatureId, CreatureKind};
use super::state::World;
use crate::consts::HIT_FLASH_DURATION;

/// One sprite to draw this frame
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRequest {
    pub creature: CreatureId,
    pub clip: String,
    /// Sampled frame; `None` when the clip has no frames
    pub frame: Option<usize>,
    pub position: Vec2,
    pub flipped: bool,
    /// Took damage within the flash window
    pub hit_flash: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthBar {
    pub current: f32,
    pub max: f32,
}

impl HealthBar {
    /// Fill ratio clamped to 0..1
    pub fn fraction(&self) -> f32 {
        if self.max <= 0.0 {
            return 0.0;
        }
        (self.current / self.max).clamp(0.0, 1.0)
    }
}

impl World {
    /// Sprites for every creature that plays a clip, in collection order
    pub fn draw_requests(&self) -> Vec<DrawRequest> {
        self.creatures
            .iter()
            .filter(|c| !matches!(c.kind, CreatureKind::RigidObstacle { .. }))
            .filter(|c| !c.animation.clip_name.is_empty())
            .map(|c| {
                let frames = self.animations.frame_count(&c.animation.clip_name);
                let hit_flash = c
                    .vitals
                    .as_ref()
                    .is_some_and(|v| self.time - v.last_damage_time < HIT_FLASH_DURATION);
                DrawRequest {
                    creature: c.id,
                    clip: c.animation.clip_name.clone(),
                    frame: c.animation.frame_index(frames),
                    position: c.body.position,
                    flipped: c.body.facing_flipped,
                    hit_flash,
                }
            })
            .collect()
    }

    pub fn player_health(&self) -> Option<HealthBar> {
        let vitals = self.player()?.vitals.as_ref()?;
        Some(HealthBar {
            current: vitals.health.max(0.0),
            max: vitals.max_health,
        })
    }
}
