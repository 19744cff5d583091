//! Data-driven game balance
//!
//! Defaults reproduce the shipped configuration. A JSON document can override
//! any subset of fields; missing fields keep their default.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::LoadError;

/// Per-archetype creature balance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreatureTuning {
    pub max_health: f32,
    /// Damage dealt per landed attack
    pub damage: f32,
    /// Distance under which a visible player can be attacked
    pub attack_range: f32,
    /// Horizontal speed (pixels/s)
    pub move_speed: f32,
    /// Initial upward speed of a jump (pixels/s)
    pub jump_speed: f32,
    /// Sight is lost beyond this distance
    pub view_distance: f32,
    /// Ignore players too far above or below the horizontal
    pub restrict_vertical_view: bool,
}

impl Default for CreatureTuning {
    fn default() -> Self {
        Self {
            max_health: 50.0,
            damage: 10.0,
            attack_range: 32.0,
            move_speed: 80.0,
            jump_speed: 0.0,
            view_distance: 200.0,
            restrict_vertical_view: true,
        }
    }
}

/// World physics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    /// Downward acceleration (pixels/s²)
    pub gravity: f32,
    /// Velocity decay toward zero (pixels/s²)
    pub friction: f32,
    /// Horizontal speed imparted by a hit
    pub knockback_speed: f32,
    /// Upward pop imparted by a hit
    pub knockback_lift: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            gravity: 1000.0,
            friction: 1200.0,
            knockback_speed: 180.0,
            knockback_lift: 160.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub physics: PhysicsTuning,
    pub player: CreatureTuning,
    pub bat: CreatureTuning,
    pub wolf: CreatureTuning,
    pub golem: CreatureTuning,
    /// Platform travel speed (pixels/s)
    pub platform_speed: f32,
    /// Seconds without damage after which consumed attack ids are forgotten
    pub attack_ids_clear_delay: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            physics: PhysicsTuning::default(),
            player: CreatureTuning {
                max_health: 100.0,
                damage: 25.0,
                attack_range: 0.0,
                move_speed: 120.0,
                jump_speed: 420.0,
                view_distance: 0.0,
                restrict_vertical_view: false,
            },
            bat: CreatureTuning {
                max_health: 30.0,
                damage: 10.0,
                attack_range: 24.0,
                move_speed: 60.0,
                jump_speed: 0.0,
                view_distance: 200.0,
                restrict_vertical_view: false,
            },
            wolf: CreatureTuning {
                max_health: 60.0,
                damage: 15.0,
                attack_range: 40.0,
                move_speed: 110.0,
                jump_speed: 0.0,
                view_distance: 200.0,
                restrict_vertical_view: true,
            },
            golem: CreatureTuning {
                max_health: 150.0,
                damage: 35.0,
                attack_range: 48.0,
                move_speed: 45.0,
                jump_speed: 0.0,
                view_distance: 200.0,
                restrict_vertical_view: true,
            },
            platform_speed: 50.0,
            attack_ids_clear_delay: 5.0,
        }
    }
}

impl Tuning {
    /// Overlay a JSON document on the defaults
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let tuning = serde_json::from_str(json)?;
        Ok(tuning)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "physics": { "gravity": 500.0 }, "platform_speed": 80.0 }"#).unwrap();
        assert_eq!(tuning.physics.gravity, 500.0);
        assert_eq!(tuning.physics.friction, PhysicsTuning::default().friction);
        assert_eq!(tuning.platform_speed, 80.0);
        assert_eq!(tuning.wolf, Tuning::default().wolf);
        assert_eq!(tuning.player, Tuning::default().player);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(matches!(
            Tuning::from_json("{ physics: "),
            Err(LoadError::Json(_))
        ));
    }
}
