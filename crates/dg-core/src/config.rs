//! Generator configuration
//!
//! A plain serde value object. It is validated once before a generation
//! pass starts; nothing in the pipeline re-checks it.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::geom::Size;

/// Everything a generation pass needs besides the scene it builds into
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Grid width in cells
    pub width: i32,
    /// Grid height in cells
    pub height: i32,
    /// Number of room placement attempts
    pub room_count: u32,
    /// Inclusive minimum room extent
    pub room_min_size: Size,
    /// Inclusive maximum room extent
    pub room_max_size: Size,
    /// Probability that a non-tree triangulation edge becomes a hallway
    pub loop_edge_chance: f64,
    /// Minimum enemies in every room except the player's
    pub min_enemies_per_room: u32,
    /// Number of enemy archetypes to choose from
    pub enemy_archetypes: u32,
    /// Exclusive upper bound on floor prop attempts per room
    pub max_floor_props_per_room: u32,
    /// Probability that a placed wall segment carries a prop
    pub wall_prop_chance: f64,
    pub floor_variants: u32,
    pub wall_variants: u32,
    pub prop_variants: u32,
    /// Roof cells beyond the grid on every side
    pub roof_extension: u32,
    /// Retry budget per requested entity
    pub spawn_attempts_per_entity: u32,
    /// The first enemy placed on this floor is the boss
    pub boss_floor: bool,
    /// Seed for the run's random source
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            room_count: DEFAULT_ROOM_COUNT,
            room_min_size: Size::new(DEFAULT_ROOM_MIN, DEFAULT_ROOM_MIN),
            room_max_size: Size::new(DEFAULT_ROOM_MAX, DEFAULT_ROOM_MAX),
            loop_edge_chance: DEFAULT_LOOP_EDGE_CHANCE,
            min_enemies_per_room: DEFAULT_MIN_ENEMIES,
            enemy_archetypes: DEFAULT_ENEMY_ARCHETYPES,
            max_floor_props_per_room: DEFAULT_MAX_FLOOR_PROPS,
            wall_prop_chance: DEFAULT_WALL_PROP_CHANCE,
            floor_variants: DEFAULT_FLOOR_VARIANTS,
            wall_variants: DEFAULT_WALL_VARIANTS,
            prop_variants: DEFAULT_PROP_VARIANTS,
            roof_extension: DEFAULT_ROOF_EXTENSION,
            spawn_attempts_per_entity: DEFAULT_SPAWN_ATTEMPTS,
            boss_floor: false,
            seed: 0,
        }
    }
}

impl GeneratorConfig {
    /// Grid extent as a `Size`
    pub fn grid_size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Builder-style seed override
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Check every constraint the pipeline relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(ConfigError::EmptyGrid {
                width: self.width,
                height: self.height,
            });
        }
        if self.width > MAX_GRID_EXTENT || self.height > MAX_GRID_EXTENT {
            return Err(ConfigError::GridTooLarge {
                width: self.width,
                height: self.height,
                max: MAX_GRID_EXTENT,
            });
        }
        if self.roof_extension > MAX_ROOF_EXTENSION {
            return Err(ConfigError::RoofExtensionTooLarge {
                value: self.roof_extension,
                max: MAX_ROOF_EXTENSION,
            });
        }

        let axes = [
            ("width", self.room_min_size.width, self.room_max_size.width, self.width),
            ("height", self.room_min_size.height, self.room_max_size.height, self.height),
        ];
        for (axis, min, max, extent) in axes {
            if min < 1 {
                return Err(ConfigError::ZeroRoomSize { axis, value: min });
            }
            if min > max {
                return Err(ConfigError::InvertedRoomSize { axis, min, max });
            }
            // A room must end strictly before the far edge of the grid
            if min >= extent {
                return Err(ConfigError::RoomLargerThanGrid { axis, min, extent });
            }
        }

        for (name, value) in [
            ("loop_edge_chance", self.loop_edge_chance),
            ("wall_prop_chance", self.wall_prop_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidProbability { name, value });
            }
        }

        for (name, value) in [
            ("spawn_attempts_per_entity", self.spawn_attempts_per_entity),
            ("enemy_archetypes", self.enemy_archetypes),
            ("floor_variants", self.floor_variants),
            ("wall_variants", self.wall_variants),
            ("prop_variants", self.prop_variants),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidBudget { name });
            }
        }

        Ok(())
    }

    /// Parse a JSON configuration; missing fields take their defaults
    pub fn from_json(contents: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load and validate a JSON configuration file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        let config = Self::from_json(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(GeneratorConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_empty_grid() {
        let config = GeneratorConfig {
            width: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyGrid { width: 0, .. })
        ));
    }

    #[test]
    fn test_rejects_inverted_sizes() {
        let config = GeneratorConfig {
            room_min_size: Size::new(6, 3),
            room_max_size: Size::new(3, 6),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvertedRoomSize {
                axis: "width",
                min: 6,
                max: 3
            })
        );
    }

    #[test]
    fn test_rejects_room_that_cannot_fit() {
        let config = GeneratorConfig {
            width: 5,
            height: 20,
            room_min_size: Size::new(5, 3),
            room_max_size: Size::new(6, 6),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::RoomLargerThanGrid { axis: "width", .. })
        ));
    }

    #[test]
    fn test_rejects_bad_probability() {
        let config = GeneratorConfig {
            loop_edge_chance: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidProbability {
                name: "loop_edge_chance",
                ..
            })
        ));

        let nan = GeneratorConfig {
            wall_prop_chance: f64::NAN,
            ..Default::default()
        };
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_budget() {
        let config = GeneratorConfig {
            spawn_attempts_per_entity: 0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidBudget {
                name: "spawn_attempts_per_entity"
            })
        );
    }

    #[test]
    fn test_rejects_oversized_extents() {
        let roof = GeneratorConfig {
            roof_extension: u32::MAX,
            ..Default::default()
        };
        assert_eq!(
            roof.validate(),
            Err(ConfigError::RoofExtensionTooLarge {
                value: u32::MAX,
                max: MAX_ROOF_EXTENSION
            })
        );

        let edge = GeneratorConfig {
            roof_extension: MAX_ROOF_EXTENSION,
            ..Default::default()
        };
        assert!(edge.validate().is_ok());

        let grid = GeneratorConfig {
            height: i32::MAX,
            ..Default::default()
        };
        assert!(matches!(
            grid.validate(),
            Err(ConfigError::GridTooLarge { .. })
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = GeneratorConfig::from_json(r#"{ "width": 20, "seed": 42 }"#).unwrap();
        assert_eq!(config.width, 20);
        assert_eq!(config.seed, 42);
        assert_eq!(config.height, DEFAULT_HEIGHT);
        assert_eq!(config.loop_edge_chance, DEFAULT_LOOP_EDGE_CHANCE);
    }

    #[test]
    fn test_json_round_trip() {
        let config = GeneratorConfig {
            boss_floor: true,
            ..Default::default()
        }
        .with_seed(7);
        let json = config.to_json().unwrap();
        assert_eq!(GeneratorConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            GeneratorConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
