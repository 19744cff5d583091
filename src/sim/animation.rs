//! Animation clock and sprite-atlas metadata
//!
//! The clock tracks which clip is playing and how far along it is. Every time a
//! new clip starts, or a repeating clip wraps, it takes a fresh instance id from
//! [`InstanceIds`]. Hitboxes sampled from the clip carry that id, which is what
//! lets combat count each swing once per target.

use std::collections::HashMap;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::LoadError;

/// Monotonic source of animation instance ids (0 is reserved for "none")
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceIds {
    next: u64,
}

impl Default for InstanceIds {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl InstanceIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Restart numbering (tests and level reloads)
    pub fn reset(&mut self) {
        self.next = 1;
    }
}

/// Playback state of one creature's current clip
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnimationClock {
    /// Empty means nothing is playing
    pub clip_name: String,
    /// Seconds per frame
    pub frame_duration: f32,
    pub is_repeat: bool,
    /// 0..1; non-repeating clips park at exactly 1.0 when done
    pub progress: f32,
    pub instance_id: u64,
}

impl AnimationClock {
    /// Start `clip_name`, or just refresh timing if it is already playing
    pub fn play(&mut self, clip_name: &str, frame_duration: f32, is_repeat: bool, ids: &mut InstanceIds) {
        if self.clip_name != clip_name {
            self.clip_name.clear();
            self.clip_name.push_str(clip_name);
            self.progress = 0.0;
            self.instance_id = ids.allocate();
        }
        self.frame_duration = frame_duration;
        self.is_repeat = is_repeat;
    }

    /// Advance by `dt` seconds through a clip of `frame_count` frames
    pub fn update(&mut self, dt: f32, frame_count: usize, ids: &mut InstanceIds) {
        if self.clip_name.is_empty() || self.is_finished() {
            return;
        }

        let duration = frame_count as f32 * self.frame_duration;
        if duration <= 0.0 {
            // Nothing to play through; one-shots end immediately
            if !self.is_repeat {
                self.progress = 1.0;
            }
            return;
        }

        self.progress += dt / duration;
        if self.is_repeat {
            if self.progress >= 1.0 {
                self.progress -= self.progress.floor();
                self.instance_id = ids.allocate();
            }
        } else if self.progress >= 1.0 {
            self.progress = 1.0;
        }
    }

    pub fn is_finished(&self) -> bool {
        !self.is_repeat && self.progress == 1.0
    }

    /// Frame to sample, `None` for clips with no frames
    pub fn frame_index(&self, frame_count: usize) -> Option<usize> {
        if frame_count == 0 {
            return None;
        }
        let index = (self.progress * (frame_count - 1) as f32).round() as usize;
        Some(index.min(frame_count - 1))
    }
}

/// Named hitbox masks recognized on animation frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaskKind {
    Rigid,
    Attack,
    Block,
}

impl MaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaskKind::Rigid => "rigid",
            MaskKind::Attack => "attack",
            MaskKind::Block => "block",
        }
    }
}

/// A world-space hitbox tagged with the animation instance that produced it
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Collider {
    pub rect: Rect,
    /// 0 = no hitbox this frame
    pub id: u64,
}

impl Collider {
    pub const NONE: Collider = Collider {
        rect: Rect::new(0.0, 0.0, 0.0, 0.0),
        id: 0,
    };

    pub fn new(rect: Rect, id: u64) -> Self {
        Self { rect, id }
    }

    /// Present and solid; anything else is skipped by collision and combat
    #[inline]
    pub fn is_present(&self) -> bool {
        self.id != 0 && self.rect.is_solid()
    }
}

/// Where a creature's position sits on its sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Pivot {
    #[default]
    BottomCenter,
    TopCenter,
    LeftCenter,
    RightCenter,
    Center,
}

impl Pivot {
    /// Top-left corner of a sprite of `size` anchored at `position`
    pub fn origin(self, position: Vec2, size: Vec2) -> Vec2 {
        match self {
            Pivot::BottomCenter => Vec2::new(position.x - 0.5 * size.x, position.y - size.y),
            Pivot::TopCenter => Vec2::new(position.x - 0.5 * size.x, position.y),
            Pivot::LeftCenter => Vec2::new(position.x, position.y - 0.5 * size.y),
            Pivot::RightCenter => Vec2::new(position.x - size.x, position.y - 0.5 * size.y),
            Pivot::Center => position - 0.5 * size,
        }
    }
}

/// One sampled frame: sprite size plus sprite-local masks
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrameData {
    pub size: Vec2,
    #[serde(default)]
    pub masks: HashMap<String, Rect>,
}

impl FrameData {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            masks: HashMap::new(),
        }
    }

    pub fn with_mask(mut self, kind: MaskKind, rect: Rect) -> Self {
        self.masks.insert(kind.as_str().to_string(), rect);
        self
    }

    /// Mask mapped to world space; mirrored inside the sprite when flipped
    pub fn world_mask(&self, kind: MaskKind, position: Vec2, pivot: Pivot, flipped: bool) -> Option<Rect> {
        let mask = self.masks.get(kind.as_str())?;
        let origin = pivot.origin(position, self.size);
        let x = if flipped {
            origin.x + self.size.x - mask.x - mask.width
        } else {
            origin.x + mask.x
        };
        Some(Rect::new(x, origin.y + mask.y, mask.width, mask.height))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClipData {
    pub frames: Vec<FrameData>,
}

/// Clip metadata keyed by clip name, as produced by the atlas loader
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnimationLibrary {
    #[serde(default)]
    pub clips: HashMap<String, ClipData>,
}

impl AnimationLibrary {
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let library: Self = serde_json::from_str(json)?;
        Ok(library)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
        let library = Self::from_json(&json)?;
        log::info!("Loaded {} animation clips from {}", library.clips.len(), path.display());
        Ok(library)
    }

    pub fn insert(&mut self, name: impl Into<String>, clip: ClipData) {
        self.clips.insert(name.into(), clip);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.clips.contains_key(name)
    }

    /// Frame count of a clip; unknown clips have none
    pub fn frame_count(&self, name: &str) -> usize {
        self.clips.get(name).map_or(0, |clip| clip.frames.len())
    }

    /// Frame the clock currently shows, if any
    pub fn current_frame(&self, clock: &AnimationClock) -> Option<&FrameData> {
        let clip = self.clips.get(&clock.clip_name)?;
        let index = clock.frame_index(clip.frames.len())?;
        clip.frames.get(index)
    }

    /// World-space hitbox of `kind` on the clock's current frame
    pub fn collider(
        &self,
        clock: &AnimationClock,
        kind: MaskKind,
        position: Vec2,
        pivot: Pivot,
        flipped: bool,
    ) -> Collider {
        self.current_frame(clock)
            .and_then(|frame| frame.world_mask(kind, position, pivot, flipped))
            .map_or(Collider::NONE, |rect| Collider::new(rect, clock.instance_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_play_same_clip_is_idempotent() {
        let mut ids = InstanceIds::new();
        let mut clock = AnimationClock::default();
        clock.play("player_run", 0.1, true, &mut ids);
        let first = clock.instance_id;
        clock.update(0.05, 4, &mut ids);
        let progress = clock.progress;

        clock.play("player_run", 0.2, false, &mut ids);
        assert_eq!(clock.instance_id, first);
        assert_eq!(clock.progress, progress);
        assert_eq!(clock.frame_duration, 0.2);
        assert!(!clock.is_repeat);

        clock.play("player_idle", 0.1, true, &mut ids);
        assert_ne!(clock.instance_id, first);
        assert_eq!(clock.progress, 0.0);
    }

    #[test]
    fn test_repeating_clip_wraps_with_new_id() {
        let mut ids = InstanceIds::new();
        let mut clock = AnimationClock::default();
        clock.play("bat_attack", 0.1, true, &mut ids);
        let first = clock.instance_id;

        // 4 frames * 0.1s = 0.4s per loop
        clock.update(0.3, 4, &mut ids);
        assert_eq!(clock.instance_id, first);
        clock.update(0.2, 4, &mut ids);
        assert_ne!(clock.instance_id, first);
        assert!((clock.progress - 0.25).abs() < 1e-5);
        assert!(!clock.is_finished());
    }

    #[test]
    fn test_one_shot_parks_at_end() {
        let mut ids = InstanceIds::new();
        let mut clock = AnimationClock::default();
        clock.play("player_attack_0", 0.1, false, &mut ids);
        let id = clock.instance_id;

        clock.update(10.0, 3, &mut ids);
        assert_eq!(clock.progress, 1.0);
        assert!(clock.is_finished());
        clock.update(10.0, 3, &mut ids);
        assert_eq!(clock.progress, 1.0);
        assert_eq!(clock.instance_id, id);
    }

    #[test]
    fn test_zero_frame_clip_produces_nothing() {
        let mut ids = InstanceIds::new();
        let library = AnimationLibrary::default();
        let mut clock = AnimationClock::default();
        clock.play("fx_missing", 0.1, false, &mut ids);
        clock.update(0.016, library.frame_count("fx_missing"), &mut ids);

        assert!(clock.is_finished());
        assert_eq!(clock.frame_index(0), None);
        let collider = library.collider(&clock, MaskKind::Rigid, Vec2::ZERO, Pivot::Center, false);
        assert!(!collider.is_present());
    }

    #[test]
    fn test_frame_index_rounds() {
        let clock = AnimationClock {
            progress: 0.5,
            ..Default::default()
        };
        assert_eq!(clock.frame_index(4), Some(2));
        assert_eq!(clock.frame_index(1), Some(0));
    }

    #[test]
    fn test_world_mask_bottom_center_and_flip() {
        let frame = FrameData::new(Vec2::new(32.0, 32.0))
            .with_mask(MaskKind::Attack, Rect::new(20.0, 8.0, 10.0, 6.0));
        let position = Vec2::new(100.0, 200.0);

        let right = frame
            .world_mask(MaskKind::Attack, position, Pivot::BottomCenter, false)
            .unwrap();
        assert_eq!(right, Rect::new(104.0, 176.0, 10.0, 6.0));

        let left = frame
            .world_mask(MaskKind::Attack, position, Pivot::BottomCenter, true)
            .unwrap();
        assert_eq!(left, Rect::new(86.0, 176.0, 10.0, 6.0));

        assert!(frame.world_mask(MaskKind::Block, position, Pivot::BottomCenter, false).is_none());
    }

    #[test]
    fn test_pivot_origins() {
        let size = Vec2::new(10.0, 20.0);
        let p = Vec2::new(50.0, 50.0);
        assert_eq!(Pivot::BottomCenter.origin(p, size), Vec2::new(45.0, 30.0));
        assert_eq!(Pivot::TopCenter.origin(p, size), Vec2::new(45.0, 50.0));
        assert_eq!(Pivot::LeftCenter.origin(p, size), Vec2::new(50.0, 40.0));
        assert_eq!(Pivot::RightCenter.origin(p, size), Vec2::new(40.0, 40.0));
        assert_eq!(Pivot::Center.origin(p, size), Vec2::new(45.0, 40.0));
    }

    #[test]
    fn test_library_from_json() {
        let json = r#"{
            "clips": {
                "wolf_idle": { "frames": [
                    { "size": [32.0, 24.0], "masks": { "rigid": { "x": 8.0, "y": 4.0, "width": 16.0, "height": 20.0 } } },
                    { "size": [32.0, 24.0] }
                ] }
            }
        }"#;
        let library = AnimationLibrary::from_json(json).unwrap();
        assert_eq!(library.frame_count("wolf_idle"), 2);
        assert_eq!(library.frame_count("wolf_run"), 0);

        let mut ids = InstanceIds::new();
        let mut clock = AnimationClock::default();
        clock.play("wolf_idle", 0.1, true, &mut ids);
        let rigid = library.collider(&clock, MaskKind::Rigid, Vec2::new(0.0, 24.0), Pivot::BottomCenter, false);
        assert!(rigid.is_present());
        assert_eq!(rigid.id, clock.instance_id);
        assert_eq!(rigid.rect, Rect::new(-8.0, 4.0, 16.0, 20.0));
    }

    proptest! {
        #[test]
        fn prop_one_shot_never_passes_end(steps in proptest::collection::vec(0.0f32..0.5, 1..40)) {
            let mut ids = InstanceIds::new();
            let mut clock = AnimationClock::default();
            clock.play("golem_attack", 0.1, false, &mut ids);
            let id = clock.instance_id;
            for dt in steps {
                clock.update(dt, 5, &mut ids);
                prop_assert!(clock.progress >= 0.0 && clock.progress <= 1.0);
                prop_assert_eq!(clock.instance_id, id);
            }
        }

        #[test]
        fn prop_repeat_progress_stays_below_one(steps in proptest::collection::vec(0.0f32..2.0, 1..40)) {
            let mut ids = InstanceIds::new();
            let mut clock = AnimationClock::default();
            clock.play("bat_fly", 0.1, true, &mut ids);
            for dt in steps {
                clock.update(dt, 3, &mut ids);
                prop_assert!(clock.progress >= 0.0 && clock.progress < 1.0);
                prop_assert!(!clock.is_finished());
            }
        }
    }
}
