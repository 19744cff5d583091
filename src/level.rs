//! Level data handed over by the tile-map loader
//!
//! Static rigid rectangles plus typed spawn points. Parsing the tile map
//! itself happens elsewhere; this is the JSON shape it exports.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::LoadError;
use crate::sim::Rect;

/// Archetype tag of a spawn point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpawnKind {
    Player,
    Bat,
    Wolf,
    Golem,
    Platform,
    Light,
}

/// Light emission parameters (render-only)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Light {
    /// RGB, 0..1
    pub color: [f32; 3],
    pub radius: f32,
    #[serde(default = "default_intensity")]
    pub intensity: f32,
}

fn default_intensity() -> f32 {
    1.0
}

/// Archetype-specific extras
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnProperties {
    /// Platform travel end point
    pub destination: Option<Vec2>,
    /// Selects a platform's clip family
    pub tag: Option<String>,
    pub light: Option<Light>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    pub kind: SpawnKind,
    pub position: Vec2,
    #[serde(default)]
    pub properties: SpawnProperties,
}

impl SpawnPoint {
    pub fn new(kind: SpawnKind, position: Vec2) -> Self {
        Self {
            kind,
            position,
            properties: SpawnProperties::default(),
        }
    }

    pub fn with_destination(mut self, destination: Vec2) -> Self {
        self.properties.destination = Some(destination);
        self
    }

    pub fn with_tag(mut self, tag: &str) -> Self {
        self.properties.tag = Some(tag.to_string());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    #[serde(default)]
    pub rigid: Vec<Rect>,
    #[serde(default)]
    pub spawns: Vec<SpawnPoint>,
}

impl LevelData {
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let level: Self = serde_json::from_str(json)?;
        level.validate()?;
        Ok(level)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
        let level = Self::from_json(&json)?;
        log::info!(
            "Loaded level {}: {} rigid rects, {} spawns",
            path.display(),
            level.rigid.len(),
            level.spawns.len()
        );
        Ok(level)
    }

    /// Exactly one player; every platform knows where it is going
    pub fn validate(&self) -> Result<(), LoadError> {
        let players = self
            .spawns
            .iter()
            .filter(|s| s.kind == SpawnKind::Player)
            .count();
        match players {
            0 => return Err(LoadError::MissingPlayer),
            1 => {}
            n => return Err(LoadError::DuplicatePlayer(n)),
        }

        if let Some(index) = self
            .spawns
            .iter()
            .position(|s| s.kind == SpawnKind::Platform && s.properties.destination.is_none())
        {
            return Err(LoadError::MissingDestination { index });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level_json() {
        let json = r#"{
            "rigid": [ { "x": 0.0, "y": 200.0, "width": 640.0, "height": 32.0 } ],
            "spawns": [
                { "kind": "player", "position": [32.0, 200.0] },
                { "kind": "platform", "position": [100.0, 150.0],
                  "properties": { "destination": [200.0, 150.0], "tag": "stone" } },
                { "kind": "light", "position": [50.0, 50.0],
                  "properties": { "light": { "color": [1.0, 0.8, 0.5], "radius": 96.0 } } }
            ]
        }"#;
        let level = LevelData::from_json(json).unwrap();
        assert_eq!(level.rigid.len(), 1);
        assert_eq!(level.spawns[1].properties.destination, Some(Vec2::new(200.0, 150.0)));
        assert_eq!(level.spawns[1].properties.tag.as_deref(), Some("stone"));
        let light = level.spawns[2].properties.light.unwrap();
        assert_eq!(light.intensity, 1.0);
    }

    #[test]
    fn test_validate_player_count() {
        let mut level = LevelData::default();
        assert!(matches!(level.validate(), Err(LoadError::MissingPlayer)));

        level.spawns.push(SpawnPoint::new(SpawnKind::Player, Vec2::ZERO));
        assert!(level.validate().is_ok());

        level.spawns.push(SpawnPoint::new(SpawnKind::Player, Vec2::ONE));
        assert!(matches!(level.validate(), Err(LoadError::DuplicatePlayer(2))));
    }

    #[test]
    fn test_validate_platform_destination() {
        let level = LevelData {
            rigid: Vec::new(),
            spawns: vec![
                SpawnPoint::new(SpawnKind::Player, Vec2::ZERO),
                SpawnPoint::new(SpawnKind::Platform, Vec2::ONE),
            ],
        };
        assert!(matches!(
            level.validate(),
            Err(LoadError::MissingDestination { index: 1 })
        ));
    }
}
