//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Stable iteration order (collection order, never hash order)
//! - No rendering, audio or input-device dependencies
//! - Instance ids come from a counter owned by the world, never a global

pub mod animation;
pub mod collision;
pub mod combat;
pub mod creature;
pub mod fsm;
pub mod perception;
pub mod physics;
pub mod rect;
pub mod state;
pub mod tick;
pub mod view;

pub use animation::{
    AnimationClock, AnimationLibrary, ClipData, Collider, FrameData, InstanceIds, MaskKind, Pivot,
};
pub use collision::{Contact, Resolution, resolve_collisions};
pub use combat::{PARRY_EFFECT_CLIP, resolve_combat};
pub use creature::{Body, Creature, CreatureId, CreatureKind, CreatureState, Platform, Vitals};
pub use perception::update_perception;
pub use rect::Rect;
pub use state::{PlacedLight, World};
pub use tick::{TickInput, tick};
pub use view::{DrawRequest, HealthBar};
