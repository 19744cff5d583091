//! Nightfall - gameplay simulation core for a 2D action-platformer
//!
//! Core modules:
//! - `sim`: Deterministic per-frame simulation (state machines, physics, combat, perception)
//! - `level`: Level data produced by the tile-map loader
//! - `tuning`: Data-driven creature and physics balance
//! - `demo`: Built-in arena used by the headless runner

pub mod demo;
pub mod error;
pub mod level;
pub mod sim;
pub mod tuning;

pub use error::LoadError;
pub use level::{LevelData, SpawnKind, SpawnPoint};
pub use tuning::{CreatureTuning, PhysicsTuning, Tuning};

use glam::Vec2;

/// Simulation constants that are structural rather than balance knobs
pub mod consts {
    /// Fixed simulation timestep used by the runner (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Velocities/deltas below this magnitude count as zero
    pub const MOTION_EPSILON: f32 = 1e-3;
    /// Opposing MTVs on one axis beyond this magnitude mean the creature is crushed
    pub const SMASH_EPSILON: f32 = 0.5;

    /// Falling faster than this on touchdown hurts
    pub const LANDING_MIN_SPEED: f32 = 260.0;
    /// Health lost per unit of landing speed above the minimum
    pub const LANDING_DAMAGE_FACTOR: f32 = 1.0;
    /// A dash pressed less than this far above the ground turns the landing into a roll
    pub const SAFE_DASHING_HEIGHT: f32 = 40.0;
    /// Forward speed of the dash roll (pixels/s)
    pub const DASH_SPEED: f32 = 220.0;

    /// Buffered attack must arrive at or after this roll progress to chain into Attack0
    pub const ATTACK_0_AFTER_DASH_MIN_PROGRESS: f32 = 0.5;
    /// Buffered attack thresholds for combo stages
    pub const ATTACK_1_AFTER_ATTACK_0_MIN_PROGRESS: f32 = 0.5;
    pub const ATTACK_2_AFTER_ATTACK_1_MIN_PROGRESS: f32 = 0.5;
    /// Enemies only abandon an attack before this much of the clip has played
    pub const ATTACK_CANCEL_MAX_PROGRESS: f32 = 0.3;

    /// Sight lines start and end this far above the feet
    pub const EYE_OFFSET: f32 = 8.0;
    /// Max deviation from horizontal (degrees) for creatures with restricted vertical view
    pub const VIEW_ANGLE_LIMIT: f32 = 30.0;

    /// How long after a hit the renderer flashes the creature (seconds)
    pub const HIT_FLASH_DURATION: f32 = 0.15;
    /// Default seconds per animation frame
    pub const FRAME_DURATION: f32 = 0.1;
}

/// True when a value is small enough to be treated as zero
#[inline]
pub fn is_negligible(value: f32) -> bool {
    value.abs() < consts::MOTION_EPSILON
}

/// Angle (degrees) of the line `a -> b` measured from horizontal, folded into [0, 90]
#[inline]
pub fn angle_between_points(a: Vec2, b: Vec2) -> f32 {
    let d = b - a;
    let angle = d.y.atan2(d.x).to_degrees().abs();
    if angle > 90.0 { 180.0 - angle } else { angle }
}

/// Move `value` toward zero by `amount` without crossing it
#[inline]
pub fn decay_toward_zero(value: f32, amount: f32) -> f32 {
    if value > 0.0 {
        (value - amount).max(0.0)
    } else {
        (value + amount).min(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_angle_between_points_folds_to_acute() {
        let origin = Vec2::ZERO;
        assert!(angle_between_points(origin, Vec2::new(10.0, 0.0)).abs() < 0.001);
        assert!(angle_between_points(origin, Vec2::new(-10.0, 0.0)).abs() < 0.001);
        assert!((angle_between_points(origin, Vec2::new(-10.0, -10.0)) - 45.0).abs() < 0.001);
        assert!((angle_between_points(origin, Vec2::new(0.0, 5.0)) - 90.0).abs() < 0.001);
    }

    #[test]
    fn test_decay_toward_zero_clamps() {
        assert_eq!(decay_toward_zero(5.0, 2.0), 3.0);
        assert_eq!(decay_toward_zero(1.0, 2.0), 0.0);
        assert_eq!(decay_toward_zero(-1.0, 2.0), 0.0);
        assert_eq!(decay_toward_zero(-5.0, 2.0), -3.0);
    }
}
