//! In-memory scene
//!
//! Records every committed floor, wall, wall prop, roof and entity with its
//! position, layer and tag. Queries are a linear scan, which is fine at
//! dungeon scale.

use serde::{Deserialize, Serialize};

use super::{
    EntityFactory, EntityKind, Layers, Occupant, OccupantTag, SceneHandle, SpatialQuery,
    TileBuilder,
};
use crate::geom::Vec2;
use crate::geometry::{FloorTile, RoofTile, WallSegment};

/// Scene that keeps a flat list of occupants
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneLedger {
    occupants: Vec<Occupant>,
    next_handle: u64,
}

impl SceneLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn commit(&mut self, position: Vec2, layer: Layers, tag: OccupantTag) -> SceneHandle {
        let handle = SceneHandle(self.next_handle);
        self.next_handle += 1;
        self.occupants.push(Occupant {
            handle,
            position,
            layer,
            tag,
        });
        handle
    }

    /// Every live occupant in commit order
    pub fn occupants(&self) -> &[Occupant] {
        &self.occupants
    }

    pub fn get(&self, handle: SceneHandle) -> Option<&Occupant> {
        self.occupants.iter().find(|o| o.handle == handle)
    }

    /// Number of live occupants carrying `tag`
    pub fn count_tag(&self, tag: OccupantTag) -> usize {
        self.occupants.iter().filter(|o| o.tag == tag).count()
    }

    /// Live entities with their positions
    pub fn entities(&self) -> impl Iterator<Item = (EntityKind, Vec2)> + '_ {
        self.occupants.iter().filter_map(|o| match o.tag {
            OccupantTag::Entity(kind) => Some((kind, o.position)),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.occupants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occupants.is_empty()
    }
}

impl SpatialQuery for SceneLedger {
    fn query_occupants(&self, point: Vec2, radius: f64, layers: Layers) -> Vec<Occupant> {
        let radius_sq = radius * radius;
        self.occupants
            .iter()
            .filter(|o| layers.intersects(o.layer) && o.position.distance_squared(point) <= radius_sq)
            .copied()
            .collect()
    }
}

impl TileBuilder for SceneLedger {
    fn build_floor(&mut self, tile: &FloorTile) {
        self.commit(tile.position(), Layers::FLOOR, OccupantTag::Floor);
    }

    fn build_wall(&mut self, wall: &WallSegment) {
        self.commit(wall.position(), Layers::ENVIRONMENT, OccupantTag::Wall);
        if wall.prop.is_some() {
            self.commit(wall.prop_position(), Layers::ENVIRONMENT, OccupantTag::WallProp);
        }
    }

    fn build_roof(&mut self, roof: &RoofTile) {
        self.commit(roof.position(), Layers::ROOF, OccupantTag::Roof);
    }

    fn remove_walls(&mut self, position: Vec2, radius: f64) -> usize {
        let radius_sq = radius * radius;
        let before = self.occupants.len();
        self.occupants.retain(|o| {
            o.layer != Layers::ENVIRONMENT || o.position.distance_squared(position) > radius_sq
        });
        before - self.occupants.len()
    }
}

impl EntityFactory for SceneLedger {
    fn spawn_entity(
        &mut self,
        kind: EntityKind,
        position: Vec2,
        _quarter_turns: u8,
    ) -> SceneHandle {
        self.commit(position, kind.layer(), OccupantTag::Entity(kind))
    }
}
