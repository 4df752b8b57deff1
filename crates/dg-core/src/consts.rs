//! Generator constants
//!
//! Defaults for `GeneratorConfig` and the fixed tuning values of the
//! hallway cost model and spawn queries.

/// Default grid dimensions
pub const DEFAULT_WIDTH: i32 = 40;
pub const DEFAULT_HEIGHT: i32 = 40;

/// Default number of room placement attempts
pub const DEFAULT_ROOM_COUNT: u32 = 12;

/// Default inclusive room extent limits
pub const DEFAULT_ROOM_MIN: i32 = 3;
pub const DEFAULT_ROOM_MAX: i32 = 8;

/// Chance that a triangulation edge outside the MST is kept as a loop
pub const DEFAULT_LOOP_EDGE_CHANCE: f64 = 0.125;

/// Empty cells kept between any two rooms
pub const ROOM_BUFFER: i32 = 1;

/// A* terrain penalties. Only the ordering Room > None > Hallway matters.
pub const ROOM_PENALTY: f64 = 10.0;
pub const EMPTY_PENALTY: f64 = 5.0;
pub const HALLWAY_PENALTY: f64 = 1.0;

/// Roof cells placed past the grid edge on every side
pub const DEFAULT_ROOF_EXTENSION: u32 = 10;
pub const MAX_ROOF_EXTENSION: u32 = 256;

/// Largest accepted grid width or height
pub const MAX_GRID_EXTENT: i32 = 1 << 14;

/// Tile variant counts
pub const DEFAULT_FLOOR_VARIANTS: u32 = 4;
pub const DEFAULT_WALL_VARIANTS: u32 = 2;
pub const DEFAULT_PROP_VARIANTS: u32 = 4;
pub const DEFAULT_ENEMY_ARCHETYPES: u32 = 3;

/// One wall segment in three carries a prop
pub const DEFAULT_WALL_PROP_CHANCE: f64 = 1.0 / 3.0;

/// Spawn defaults
pub const DEFAULT_MIN_ENEMIES: u32 = 1;
pub const DEFAULT_MAX_FLOOR_PROPS: u32 = 10;
pub const DEFAULT_SPAWN_ATTEMPTS: u32 = 16;

/// Radius of the occupancy check around an entity spawn point
pub const OCCUPANT_RADIUS: f64 = 0.1;

/// Radius of the floor/wall checks made by the exit door search
pub const DOOR_CLEARANCE_RADIUS: f64 = 0.2;

/// Number of roof tile variants addressed by the neighbor lookup
pub const ROOF_VARIANTS: usize = 20;
