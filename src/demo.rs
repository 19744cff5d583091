//! Built-in arena
//!
//! A small level and a matching hitbox atlas, so the runner and the pipeline
//! tests work without any asset files on disk.

use glam::Vec2;

use crate::level::{LevelData, Light, SpawnKind, SpawnPoint};
use crate::sim::{AnimationLibrary, ClipData, FrameData, MaskKind, Rect};

/// Sprite sizes per family (width, height)
const PLAYER_SIZE: Vec2 = Vec2::new(32.0, 32.0);
const BAT_SIZE: Vec2 = Vec2::new(24.0, 16.0);
const WOLF_SIZE: Vec2 = Vec2::new(40.0, 24.0);
const GOLEM_SIZE: Vec2 = Vec2::new(48.0, 48.0);
const PLATFORM_SIZE: Vec2 = Vec2::new(48.0, 8.0);
const PARRY_SIZE: Vec2 = Vec2::new(16.0, 16.0);

pub const FLOOR_Y: f32 = 200.0;

/// Floor, two walls, a ferry platform and one of each enemy
pub fn demo_level() -> LevelData {
    let rigid = vec![
        Rect::new(0.0, FLOOR_Y, 640.0, 40.0),
        Rect::new(-20.0, 0.0, 20.0, FLOOR_Y),
        Rect::new(640.0, 0.0, 20.0, FLOOR_Y),
    ];
    let lantern = Light {
        color: [1.0, 0.8, 0.5],
        radius: 120.0,
        intensity: 1.0,
    };

    let mut light = SpawnPoint::new(SpawnKind::Light, Vec2::new(320.0, 40.0));
    light.properties.light = Some(lantern);

    let spawns = vec![
        SpawnPoint::new(SpawnKind::Player, Vec2::new(60.0, FLOOR_Y)),
        SpawnPoint::new(SpawnKind::Wolf, Vec2::new(220.0, FLOOR_Y)),
        SpawnPoint::new(SpawnKind::Bat, Vec2::new(300.0, 120.0)),
        SpawnPoint::new(SpawnKind::Golem, Vec2::new(520.0, FLOOR_Y)),
        SpawnPoint::new(SpawnKind::Platform, Vec2::new(380.0, 150.0)).with_destination(Vec2::new(460.0, 110.0)),
        light,
    ];

    LevelData { rigid, spawns }
}

/// Feet-to-head body box centered in a sprite of `size`
fn body(size: Vec2) -> Rect {
    let width = size.x * 0.5;
    Rect::new(0.25 * size.x, 0.0, width, size.y)
}

/// Reach box in front of the body (unflipped sprites face right)
fn reach(size: Vec2) -> Rect {
    Rect::new(0.6 * size.x, 0.25 * size.y, 0.6 * size.x, 0.4 * size.y)
}

fn guard(size: Vec2) -> Rect {
    Rect::new(0.7 * size.x, 0.0, 0.3 * size.x, size.y)
}

/// `count` frames that all carry a rigid body box
fn clip(size: Vec2, count: usize) -> ClipData {
    ClipData {
        frames: (0..count)
            .map(|_| FrameData::new(size).with_mask(MaskKind::Rigid, body(size)))
            .collect(),
    }
}

/// Wind-up, `active` striking frames, then recovery
fn attack_clip(size: Vec2, active: usize) -> ClipData {
    let mut clip = clip(size, active + 2);
    for frame in &mut clip.frames[1..=active] {
        *frame = frame.clone().with_mask(MaskKind::Attack, reach(size));
    }
    clip
}

fn block_clip(size: Vec2) -> ClipData {
    let mut clip = clip(size, 3);
    for frame in &mut clip.frames {
        *frame = frame.clone().with_mask(MaskKind::Block, guard(size));
    }
    clip
}

/// Hitbox metadata for every clip the built-in creatures play
pub fn demo_animations() -> AnimationLibrary {
    let mut library = AnimationLibrary::default();

    for (name, count) in [
        ("idle", 4),
        ("run", 6),
        ("jump", 2),
        ("fall", 2),
        ("landing", 3),
        ("roll", 6),
        ("death", 5),
    ] {
        library.insert(format!("player_{name}"), clip(PLAYER_SIZE, count));
    }
    library.insert("player_attack_0", attack_clip(PLAYER_SIZE, 2));
    library.insert("player_attack_1", attack_clip(PLAYER_SIZE, 2));
    library.insert("player_attack_2", attack_clip(PLAYER_SIZE, 3));
    library.insert("player_block", block_clip(PLAYER_SIZE));

    for (family, size) in [("bat", BAT_SIZE), ("wolf", WOLF_SIZE), ("golem", GOLEM_SIZE)] {
        for (name, count) in [("idle", 4), ("run", 6), ("fly", 4), ("fall", 2), ("death", 4)] {
            library.insert(format!("{family}_{name}"), clip(size, count));
        }
        library.insert(format!("{family}_attack"), attack_clip(size, 2));
    }

    library.insert(
        "platform_idle",
        ClipData {
            frames: vec![FrameData::new(PLATFORM_SIZE).with_mask(MaskKind::Rigid, Rect::new(0.0, 0.0, 48.0, 8.0))],
        },
    );
    library.insert(
        "fx_parry",
        ClipData {
            frames: vec![FrameData::new(PARRY_SIZE); 4],
        },
    );

    library
}
