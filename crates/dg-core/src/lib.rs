//! dg-core: seeded dungeon layout generation
//!
//! Places non-overlapping rooms on a grid, connects them through a Delaunay
//! triangulation reduced to a minimum spanning tree plus random loop edges,
//! carves the connections with A*, then derives floor/wall/roof geometry and
//! spawns the player, enemies, props and an exit door into a `Scene`.
//!
//! A fixed seed and configuration always produce the same dungeon.

pub mod config;
pub mod consts;
pub mod dungeon;
pub mod error;
pub mod geom;
pub mod geometry;
pub mod generator;
pub mod rng;
pub mod scene;
pub mod spawn;
pub mod validate;

pub use config::GeneratorConfig;
pub use error::{ConfigError, GenerationError};
pub use generator::{generate, DungeonGenerator, GenerationResult, GenerationState, GenerationStats};
pub use rng::DungeonRng;
pub use scene::{Scene, SceneLedger};
