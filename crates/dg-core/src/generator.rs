//! Generation pass
//!
//! Sequences the pipeline: place rooms, triangulate their centers, reduce the
//! triangulation to a spanning tree plus loops, carve hallways, derive
//! geometry, then spawn entities. One seeded RNG is created per pass and
//! threaded through every step. A pass always runs to `Done`; starvation and
//! unreachable hallways degrade the result instead of failing it.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::config::GeneratorConfig;
use crate::dungeon::{
    carve_hallways, place_rooms, CarveReport, CellType, ConnectivityGraph, Delaunay, Edge,
    Grid2D, Room, Vertex,
};
use crate::error::GenerationError;
use crate::geom::Point;
use crate::geometry::{derive_geometry, GeometrySummary};
use crate::rng::DungeonRng;
use crate::scene::{EntityKind, Scene};
use crate::spawn::{
    spawn_enemies, spawn_exit_door, spawn_floor_props, spawn_player, SpawnedEntity,
};

/// Pipeline stages, in the only order they may run
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
    EnumIter,
)]
pub enum GenerationState {
    Init,
    RoomsPlaced,
    Triangulated,
    GraphBuilt,
    HallwaysCarved,
    GeometryDerived,
    EntitiesSpawned,
    Done,
}

impl GenerationState {
    /// The stage after this one
    pub const fn next(self) -> Option<GenerationState> {
        match self {
            GenerationState::Init => Some(GenerationState::RoomsPlaced),
            GenerationState::RoomsPlaced => Some(GenerationState::Triangulated),
            GenerationState::Triangulated => Some(GenerationState::GraphBuilt),
            GenerationState::GraphBuilt => Some(GenerationState::HallwaysCarved),
            GenerationState::HallwaysCarved => Some(GenerationState::GeometryDerived),
            GenerationState::GeometryDerived => Some(GenerationState::EntitiesSpawned),
            GenerationState::EntitiesSpawned => Some(GenerationState::Done),
            GenerationState::Done => None,
        }
    }
}

/// Counters describing how a pass went
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationStats {
    pub rooms_requested: u32,
    pub rooms_placed: usize,
    pub triangulation_edges: usize,
    pub tree_edges: usize,
    pub loop_edges: usize,
    pub hallways_carved: usize,
    pub hallways_skipped: usize,
    pub hallway_cells: usize,
    pub enemies_requested: u32,
    pub enemy_shortfall: u32,
    pub props_placed: usize,
    pub props_dropped: u32,
    pub exit_door_placed: bool,
}

/// Everything a finished pass hands downstream
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResult {
    pub seed: u64,
    pub state: GenerationState,
    pub grid: Grid2D<CellType>,
    pub rooms: Vec<Room>,
    /// Candidate connections from the triangulation
    pub triangulation: Vec<Edge>,
    pub graph: ConnectivityGraph,
    pub hallways: CarveReport,
    pub geometry: GeometrySummary,
    pub player: Option<SpawnedEntity>,
    pub enemies: Vec<SpawnedEntity>,
    pub props: Vec<SpawnedEntity>,
    pub exit_door: Option<SpawnedEntity>,
    pub stats: GenerationStats,
}

impl GenerationResult {
    /// Room the player starts in
    pub fn player_room(&self) -> Option<&Room> {
        self.player.and_then(|p| self.rooms.get(p.room))
    }

    /// Top row first; rooms `.`, hallways `#`, player `@`, enemies `e`,
    /// boss `B`, props `*`, exit door `+` (drawn on the cell below it)
    pub fn render_ascii(&self) -> String {
        let mut rows: Vec<Vec<char>> = Vec::new();
        let (min, max) = (self.grid.min(), self.grid.max());
        for y in (min.y..=max.y).rev() {
            rows.push(
                (min.x..=max.x)
                    .map(|x| self.grid.get(Point::new(x, y)).symbol())
                    .collect(),
            );
        }

        let mut mark = |cell: Point, ch: char| {
            if cell.x < min.x || cell.x > max.x || cell.y < min.y || cell.y > max.y {
                return;
            }
            let row = (max.y - cell.y) as usize;
            let col = (cell.x - min.x) as usize;
            rows[row][col] = ch;
        };

        for prop in &self.props {
            mark(prop.position.to_cell(), '*');
        }
        for enemy in &self.enemies {
            let ch = if enemy.kind == EntityKind::Boss { 'B' } else { 'e' };
            mark(enemy.position.to_cell(), ch);
        }
        if let Some(door) = self.exit_door {
            // door sits on the top edge of its cell
            let cell = door.position.to_cell();
            mark(Point::new(cell.x, cell.y - 1), '+');
        }
        if let Some(player) = self.player {
            mark(player.position.to_cell(), '@');
        }

        let mut out = String::new();
        for row in rows {
            out.extend(row);
            out.push('\n');
        }
        out
    }
}

/// Owns the working state of one pass
pub struct DungeonGenerator<'a, S: Scene + ?Sized> {
    config: &'a GeneratorConfig,
    scene: &'a mut S,
    rng: DungeonRng,
    state: GenerationState,
    grid: Grid2D<CellType>,
    rooms: Vec<Room>,
    triangulation: Vec<Edge>,
    graph: ConnectivityGraph,
    hallways: CarveReport,
    geometry: GeometrySummary,
    stats: GenerationStats,
}

impl<'a, S: Scene + ?Sized> DungeonGenerator<'a, S> {
    /// Validate `config` and prepare a pass that builds into `scene`
    pub fn new(config: &'a GeneratorConfig, scene: &'a mut S) -> Result<Self, GenerationError> {
        config.validate()?;
        Ok(Self {
            config,
            scene,
            rng: DungeonRng::new(config.seed),
            state: GenerationState::Init,
            grid: Grid2D::new(config.grid_size(), Point::default()),
            rooms: Vec::new(),
            triangulation: Vec::new(),
            graph: ConnectivityGraph::default(),
            hallways: CarveReport::default(),
            geometry: GeometrySummary::default(),
            stats: GenerationStats {
                rooms_requested: config.room_count,
                ..GenerationStats::default()
            },
        })
    }

    pub fn state(&self) -> GenerationState {
        self.state
    }

    fn advance(&mut self) {
        if let Some(next) = self.state.next() {
            log::debug!("generation: {} -> {}", self.state, next);
            self.state = next;
        }
    }

    fn place_rooms(&mut self) {
        self.rooms = place_rooms(self.config, &mut self.grid, &mut self.rng);
        self.stats.rooms_placed = self.rooms.len();
        self.advance();
    }

    fn triangulate(&mut self) {
        let vertices = self
            .rooms
            .iter()
            .enumerate()
            .map(|(idx, room)| Vertex::new(idx, room.center()))
            .collect();
        self.triangulation = Delaunay::triangulate(vertices).into_edges();
        self.stats.triangulation_edges = self.triangulation.len();
        self.advance();
    }

    fn build_graph(&mut self) {
        self.graph = ConnectivityGraph::build(
            &self.triangulation,
            self.config.loop_edge_chance,
            &mut self.rng,
        );
        self.stats.tree_edges = self.graph.tree.len();
        self.stats.loop_edges = self.graph.loops.len();
        self.advance();
    }

    fn carve(&mut self) {
        self.hallways = carve_hallways(&mut self.grid, &self.rooms, &self.graph);
        self.stats.hallways_carved = self.hallways.hallways.len();
        self.stats.hallways_skipped = self.hallways.skipped.len();
        self.stats.hallway_cells = self.grid.count(|c| *c == CellType::Hallway);
        self.advance();
    }

    fn derive_geometry(&mut self) {
        self.geometry = derive_geometry(&self.grid, self.config, &mut self.rng, &mut *self.scene);
        self.advance();
    }

    /// Player first; the exit door goes outside the player's room
    fn spawn(&mut self) -> SpawnOutcome {
        let player = spawn_player(&self.rooms, &mut self.rng, &mut *self.scene);
        let player_room = player.map(|p| p.room);
        let exit_door = if self.rooms.is_empty() {
            None
        } else {
            spawn_exit_door(&self.rooms, player_room, &mut self.rng, &mut *self.scene)
        };
        let enemies = spawn_enemies(
            &self.rooms,
            player_room,
            self.config,
            &mut self.rng,
            &mut *self.scene,
        );
        let props = spawn_floor_props(&self.rooms, self.config, &mut self.rng, &mut *self.scene);

        self.stats.enemies_requested = enemies.requested;
        self.stats.enemy_shortfall = enemies.shortfall;
        self.stats.props_placed = props.props.len();
        self.stats.props_dropped = props.dropped;
        self.stats.exit_door_placed = exit_door.is_some();
        self.advance();

        SpawnOutcome {
            player,
            exit_door,
            enemies: enemies.enemies,
            props: props.props,
        }
    }

    /// Run every stage and hand back the finished dungeon
    pub fn run(mut self) -> GenerationResult {
        self.place_rooms();
        self.triangulate();
        self.build_graph();
        self.carve();
        self.derive_geometry();
        let spawned = self.spawn();
        self.advance();

        let stats = self.stats;
        log::info!(
            "seed {}: {}/{} rooms, {} hallways ({} skipped), {} enemies, door {}",
            self.config.seed,
            stats.rooms_placed,
            stats.rooms_requested,
            stats.hallways_carved,
            stats.hallways_skipped,
            spawned.enemies.len(),
            if stats.exit_door_placed { "placed" } else { "missing" }
        );

        GenerationResult {
            seed: self.config.seed,
            state: self.state,
            grid: self.grid,
            rooms: self.rooms,
            triangulation: self.triangulation,
            graph: self.graph,
            hallways: self.hallways,
            geometry: self.geometry,
            player: spawned.player,
            enemies: spawned.enemies,
            props: spawned.props,
            exit_door: spawned.exit_door,
            stats,
        }
    }
}

struct SpawnOutcome {
    player: Option<SpawnedEntity>,
    exit_door: Option<SpawnedEntity>,
    enemies: Vec<SpawnedEntity>,
    props: Vec<SpawnedEntity>,
}

/// Validate `config` and run one full pass into `scene`
pub fn generate<S: Scene + ?Sized>(
    config: &GeneratorConfig,
    scene: &mut S,
) -> Result<GenerationResult, GenerationError> {
    Ok(DungeonGenerator::new(config, scene)?.run())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::geom::Size;
    use crate::scene::SceneLedger;
    use strum::IntoEnumIterator;

    #[test]
    fn test_states_chain_in_order() {
        let states: Vec<_> = GenerationState::iter().collect();
        for pair in states.windows(2) {
            assert_eq!(pair[0].next(), Some(pair[1]));
            assert!(pair[0] < pair[1]);
        }
        assert_eq!(GenerationState::Done.next(), None);
        assert_eq!(GenerationState::HallwaysCarved.to_string(), "HallwaysCarved");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = GeneratorConfig {
            room_min_size: Size::new(6, 6),
            room_max_size: Size::new(3, 3),
            ..GeneratorConfig::default()
        };
        let mut scene = SceneLedger::new();
        let err = generate(&config, &mut scene).unwrap_err();
        assert!(matches!(
            err,
            GenerationError::Config(ConfigError::InvertedRoomSize { .. })
        ));
        assert!(scene.is_empty());
    }

    #[test]
    fn test_new_starts_in_init() {
        let config = GeneratorConfig::default();
        let mut scene = SceneLedger::new();
        let generator = DungeonGenerator::new(&config, &mut scene).unwrap();
        assert_eq!(generator.state(), GenerationState::Init);
    }

    #[test]
    fn test_run_reaches_done() {
        let config = GeneratorConfig::default().with_seed(17);
        let mut scene = SceneLedger::new();
        let result = generate(&config, &mut scene).unwrap();
        assert_eq!(result.state, GenerationState::Done);
        assert_eq!(result.stats.rooms_placed, result.rooms.len());
        assert_eq!(
            result.stats.tree_edges + result.stats.loop_edges,
            result.graph.len()
        );
        assert_eq!(
            result.stats.hallways_carved + result.stats.hallways_skipped,
            result.graph.len()
        );
    }

    #[test]
    fn test_zero_rooms_degrades() {
        let config = GeneratorConfig {
            room_count: 0,
            ..GeneratorConfig::default()
        };
        let mut scene = SceneLedger::new();
        let result = generate(&config, &mut scene).unwrap();
        assert_eq!(result.state, GenerationState::Done);
        assert!(result.rooms.is_empty());
        assert!(result.player.is_none());
        assert!(result.exit_door.is_none());
        assert_eq!(result.stats.hallway_cells, 0);
        // roofs still cover the whole extended grid
        assert!(result.geometry.roofs > 0);
    }

    #[test]
    fn test_render_ascii_dimensions() {
        let config = GeneratorConfig {
            width: 20,
            height: 12,
            room_count: 4,
            room_min_size: Size::new(3, 3),
            room_max_size: Size::new(5, 5),
            ..GeneratorConfig::default()
        };
        let mut scene = SceneLedger::new();
        let result = generate(&config, &mut scene).unwrap();
        let text = result.render_ascii();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 12);
        assert!(lines.iter().all(|l| l.chars().count() == 20));
        if result.player.is_some() {
            assert_eq!(text.matches('@').count(), 1);
        }
    }
}
