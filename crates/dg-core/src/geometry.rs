//! Floor, wall and roof geometry derived from the carved grid
//!
//! Every Room/Hallway cell gets a floor tile. A floor cell gets a wall on each
//! side whose neighbor is not floor. Every non-floor cell in the grid grown by
//! `roof_extension` gets a roof tile whose variant is picked from the 4-bit
//! mask of its floor neighbors.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::config::GeneratorConfig;
use crate::consts::{MAX_ROOF_EXTENSION, ROOF_VARIANTS};
use crate::dungeon::{CellType, Grid2D};
use crate::geom::{Point, Sides, Vec2};
use crate::rng::DungeonRng;
use crate::scene::TileBuilder;

/// Distance a wall prop sits in front of its wall
const WALL_PROP_INSET: f64 = 0.01;

bitflags! {
    /// Diagonal neighbors, used when no cardinal neighbor is floor
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Corners: u8 {
        const TOP_LEFT = 0x01;
        const TOP_RIGHT = 0x02;
        const BOTTOM_LEFT = 0x04;
        const BOTTOM_RIGHT = 0x08;
    }
}

impl Corners {
    const EACH: [(Corners, Sides); 4] = [
        (Corners::TOP_LEFT, Sides::TOP.union(Sides::LEFT)),
        (Corners::TOP_RIGHT, Sides::TOP.union(Sides::RIGHT)),
        (Corners::BOTTOM_LEFT, Sides::BOTTOM.union(Sides::LEFT)),
        (Corners::BOTTOM_RIGHT, Sides::BOTTOM.union(Sides::RIGHT)),
    ];
}

/// Roof sprite index, `0..ROOF_VARIANTS`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RoofVariant(pub u8);

/// Cardinal floor masks in roof-index order; the position + 1 is the index
const ROOF_BY_SIDES: [Sides; 15] = [
    Sides::TOP,
    Sides::BOTTOM,
    Sides::LEFT,
    Sides::RIGHT,
    Sides::TOP.union(Sides::LEFT),
    Sides::TOP.union(Sides::RIGHT),
    Sides::BOTTOM.union(Sides::LEFT),
    Sides::BOTTOM.union(Sides::RIGHT),
    Sides::TOP.union(Sides::BOTTOM),
    Sides::LEFT.union(Sides::RIGHT),
    Sides::TOP.union(Sides::LEFT).union(Sides::RIGHT),
    Sides::BOTTOM.union(Sides::LEFT).union(Sides::RIGHT),
    Sides::TOP.union(Sides::BOTTOM).union(Sides::LEFT),
    Sides::TOP.union(Sides::BOTTOM).union(Sides::RIGHT),
    Sides::all(),
];

/// Corner masks for indices 16..=19
const ROOF_BY_CORNER: [Corners; 4] = [
    Corners::TOP_LEFT,
    Corners::TOP_RIGHT,
    Corners::BOTTOM_LEFT,
    Corners::BOTTOM_RIGHT,
];

impl RoofVariant {
    pub const PLAIN: RoofVariant = RoofVariant(0);

    /// Pick the roof sprite for a cell with the given floor neighbors
    ///
    /// A cardinal mask wins; with no cardinal floor, exactly one diagonal
    /// floor selects a corner piece. Anything else is a plain roof.
    pub fn from_neighbors(sides: Sides, corners: Corners) -> Self {
        if !sides.is_empty() {
            return ROOF_BY_SIDES
                .iter()
                .position(|mask| *mask == sides)
                .map_or(Self::PLAIN, |idx| RoofVariant(idx as u8 + 1));
        }
        ROOF_BY_CORNER
            .iter()
            .position(|mask| *mask == corners)
            .map_or(Self::PLAIN, |idx| {
                RoofVariant((ROOF_BY_SIDES.len() + 1 + idx) as u8)
            })
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Floor under a Room or Hallway cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorTile {
    pub cell: Point,
    pub kind: CellType,
    pub variant: u32,
    /// Random rotation on the ground
    pub quarter_turns: u8,
}

impl FloorTile {
    pub fn position(&self) -> Vec2 {
        self.cell.cell_center()
    }
}

/// Wall on one side of a floor cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WallSegment {
    /// Floor cell the wall encloses
    pub cell: Point,
    pub side: Sides,
    pub variant: u32,
    /// Prop variant hung on the wall, if any
    pub prop: Option<u32>,
}

impl WallSegment {
    pub fn position(&self) -> Vec2 {
        self.side.wall_position(self.cell)
    }

    /// Just in front of the wall, on the floor side
    pub fn prop_position(&self) -> Vec2 {
        let (dx, dy) = self.side.delta();
        let wall = self.position();
        Vec2::new(
            wall.x - dx as f64 * WALL_PROP_INSET,
            wall.y - dy as f64 * WALL_PROP_INSET,
        )
    }

    pub fn quarter_turns(&self) -> u8 {
        self.side.quarter_turns()
    }
}

/// Roof over a non-floor cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoofTile {
    pub cell: Point,
    pub variant: RoofVariant,
}

impl RoofTile {
    pub fn position(&self) -> Vec2 {
        self.cell.cell_center()
    }
}

/// Counts of everything handed to the tile builder
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GeometrySummary {
    pub floors: usize,
    pub walls: usize,
    pub wall_props: usize,
    pub roofs: usize,
    /// Roof tiles per variant index
    pub roof_variants: [usize; ROOF_VARIANTS],
}

fn is_floor(grid: &Grid2D<CellType>, p: Point) -> bool {
    grid.try_get(p).is_some_and(CellType::is_floor)
}

/// Sides of `cell` whose neighbor is floor
pub fn floor_sides(grid: &Grid2D<CellType>, cell: Point) -> Sides {
    Sides::EACH
        .into_iter()
        .filter(|side| is_floor(grid, cell.step(*side)))
        .fold(Sides::empty(), |acc, side| acc | side)
}

/// Diagonal neighbors of `cell` that are floor
pub fn floor_corners(grid: &Grid2D<CellType>, cell: Point) -> Corners {
    Corners::EACH
        .into_iter()
        .filter(|(_, sides)| {
            let (dx, dy) = sides.delta();
            is_floor(grid, Point::new(cell.x + dx, cell.y + dy))
        })
        .fold(Corners::empty(), |acc, (corner, _)| acc | corner)
}

/// Sides of a floor cell that need a wall
pub fn wall_sides(grid: &Grid2D<CellType>, cell: Point) -> Sides {
    floor_sides(grid, cell).complement()
}

/// Emit floors and walls for every floor cell, then roofs over the extended
/// grid
pub fn derive_geometry<B: TileBuilder + ?Sized>(
    grid: &Grid2D<CellType>,
    config: &GeneratorConfig,
    rng: &mut DungeonRng,
    builder: &mut B,
) -> GeometrySummary {
    let mut summary = GeometrySummary::default();

    for (cell, kind) in grid.iter() {
        if !kind.is_floor() {
            continue;
        }
        let tile = FloorTile {
            cell,
            kind: *kind,
            variant: rng.rn2(config.floor_variants),
            quarter_turns: rng.rn2(4) as u8,
        };
        builder.build_floor(&tile);
        summary.floors += 1;

        let open = wall_sides(grid, cell);
        for side in Sides::EACH {
            if !open.contains(side) {
                continue;
            }
            let variant = rng.rn2(config.wall_variants);
            let prop = rng
                .chance(config.wall_prop_chance)
                .then(|| rng.rn2(config.prop_variants));
            let wall = WallSegment {
                cell,
                side,
                variant,
                prop,
            };
            builder.build_wall(&wall);
            summary.walls += 1;
            summary.wall_props += usize::from(prop.is_some());
        }
    }

    let ext = config.roof_extension.min(MAX_ROOF_EXTENSION) as i32;
    let (min, max) = (grid.min(), grid.max());
    for y in (min.y - ext)..=(max.y + ext) {
        for x in (min.x - ext)..=(max.x + ext) {
            let cell = Point::new(x, y);
            if is_floor(grid, cell) {
                continue;
            }
            let variant =
                RoofVariant::from_neighbors(floor_sides(grid, cell), floor_corners(grid, cell));
            builder.build_roof(&RoofTile { cell, variant });
            summary.roofs += 1;
            summary.roof_variants[variant.index()] += 1;
        }
    }

    log::debug!(
        "geometry: {} floors, {} walls ({} props), {} roofs",
        summary.floors,
        summary.walls,
        summary.wall_props,
        summary.roofs
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Size;
    use crate::scene::{OccupantTag, SceneLedger};

    fn grid_with(cells: &[(i32, i32, CellType)]) -> Grid2D<CellType> {
        let mut grid = Grid2D::new(Size::new(5, 5), Point::default());
        for &(x, y, kind) in cells {
            grid.set(Point::new(x, y), kind);
        }
        grid
    }

    #[test]
    fn test_roof_lookup_cardinal() {
        let none = Corners::empty();
        assert_eq!(RoofVariant::from_neighbors(Sides::TOP, none), RoofVariant(1));
        assert_eq!(RoofVariant::from_neighbors(Sides::RIGHT, none), RoofVariant(4));
        assert_eq!(
            RoofVariant::from_neighbors(Sides::BOTTOM | Sides::RIGHT, none),
            RoofVariant(8)
        );
        assert_eq!(
            RoofVariant::from_neighbors(Sides::LEFT | Sides::RIGHT, none),
            RoofVariant(10)
        );
        assert_eq!(
            RoofVariant::from_neighbors(Sides::TOP | Sides::BOTTOM | Sides::RIGHT, none),
            RoofVariant(14)
        );
        assert_eq!(RoofVariant::from_neighbors(Sides::all(), none), RoofVariant(15));
    }

    #[test]
    fn test_roof_lookup_corners() {
        let sides = Sides::empty();
        assert_eq!(RoofVariant::from_neighbors(sides, Corners::TOP_LEFT), RoofVariant(16));
        assert_eq!(
            RoofVariant::from_neighbors(sides, Corners::BOTTOM_RIGHT),
            RoofVariant(19)
        );
        assert_eq!(
            RoofVariant::from_neighbors(sides, Corners::TOP_LEFT | Corners::BOTTOM_RIGHT),
            RoofVariant::PLAIN
        );
        assert_eq!(RoofVariant::from_neighbors(sides, Corners::empty()), RoofVariant::PLAIN);
        // a cardinal neighbor hides the corners
        assert_eq!(
            RoofVariant::from_neighbors(Sides::TOP, Corners::TOP_LEFT),
            RoofVariant(1)
        );
    }

    #[test]
    fn test_wall_sides_isolated_and_corridor() {
        let grid = grid_with(&[
            (1, 1, CellType::Hallway),
            (2, 1, CellType::Hallway),
            (3, 1, CellType::Hallway),
        ]);
        assert_eq!(wall_sides(&grid, Point::new(2, 1)), Sides::TOP | Sides::BOTTOM);
        assert_eq!(
            wall_sides(&grid, Point::new(1, 1)),
            Sides::TOP | Sides::BOTTOM | Sides::LEFT
        );
    }

    #[test]
    fn test_grid_edge_gets_wall() {
        let grid = grid_with(&[(0, 0, CellType::Room)]);
        assert_eq!(wall_sides(&grid, Point::new(0, 0)), Sides::all());
    }

    #[test]
    fn test_wall_prop_in_front_of_wall() {
        let wall = WallSegment {
            cell: Point::new(2, 2),
            side: Sides::RIGHT,
            variant: 0,
            prop: Some(0),
        };
        assert_eq!(wall.position(), Vec2::new(3.0, 2.5));
        assert!(wall.prop_position().x < 3.0);
        assert_eq!(wall.quarter_turns(), 1);
    }

    #[test]
    fn test_derive_counts() {
        let grid = grid_with(&[
            (1, 1, CellType::Room),
            (2, 1, CellType::Room),
            (1, 2, CellType::Room),
            (2, 2, CellType::Room),
        ]);
        let config = GeneratorConfig {
            roof_extension: 1,
            wall_prop_chance: 1.0,
            ..GeneratorConfig::default()
        };
        let mut ledger = SceneLedger::new();
        let mut rng = DungeonRng::new(5);
        let summary = derive_geometry(&grid, &config, &mut rng, &mut ledger);

        assert_eq!(summary.floors, 4);
        assert_eq!(summary.walls, 8);
        assert_eq!(summary.wall_props, 8);
        // 7x7 extended area minus the 4 floor cells
        assert_eq!(summary.roofs, 45);
        assert_eq!(summary.roof_variants.iter().sum::<usize>(), 45);
        assert_eq!(ledger.count_tag(OccupantTag::Floor), 4);
        assert_eq!(ledger.count_tag(OccupantTag::Wall), 8);
        assert_eq!(ledger.count_tag(OccupantTag::Roof), 45);

        // cell left of the square sees floor on its right only
        assert_eq!(
            RoofVariant::from_neighbors(
                floor_sides(&grid, Point::new(0, 1)),
                floor_corners(&grid, Point::new(0, 1))
            ),
            RoofVariant(4)
        );
        // diagonal below-left of the square
        assert_eq!(
            RoofVariant::from_neighbors(
                floor_sides(&grid, Point::new(0, 0)),
                floor_corners(&grid, Point::new(0, 0))
            ),
            RoofVariant(17)
        );
    }

    #[test]
    fn test_no_props_when_chance_zero() {
        let grid = grid_with(&[(2, 2, CellType::Hallway)]);
        let config = GeneratorConfig {
            roof_extension: 0,
            wall_prop_chance: 0.0,
            ..GeneratorConfig::default()
        };
        let mut ledger = SceneLedger::new();
        let summary = derive_geometry(&grid, &config, &mut DungeonRng::new(1), &mut ledger);
        assert_eq!(summary.walls, 4);
        assert_eq!(summary.wall_props, 0);
        assert_eq!(summary.roofs, 24);
    }
}
