//! World collaborators
//!
//! The generator never owns visual tiles or live entities. It reports
//! geometry to a `TileBuilder`, creates entities through an `EntityFactory`,
//! and asks a `SpatialQuery` what has already been committed near a point.
//! `Scene` is the union of the three; `SceneLedger` is an in-memory scene.

mod ledger;

pub use ledger::SceneLedger;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::geom::Vec2;
use crate::geometry::{FloorTile, RoofTile, WallSegment};

bitflags! {
    /// Collision layers occupants are committed on
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Layers: u8 {
        const FLOOR = 0x01;
        /// Walls and the props hung on them
        const ENVIRONMENT = 0x02;
        const ROOF = 0x04;
        /// Loose floor props
        const PROP = 0x08;
        /// Player, enemies and doors
        const ENTITY = 0x10;
    }
}

impl Serialize for Layers {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Layers {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u8::deserialize(deserializer)?;
        Ok(Layers::from_bits_truncate(bits))
    }
}

/// Opaque handle to something committed to the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SceneHandle(pub u64);

/// Entity categories the generator can request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum EntityKind {
    Player,
    #[strum(to_string = "Enemy({archetype})")]
    Enemy { archetype: u32 },
    Boss,
    #[strum(to_string = "FloorProp({variant})")]
    FloorProp { variant: u32 },
    ExitDoor,
}

impl EntityKind {
    /// Enemies and bosses
    pub const fn is_hostile(&self) -> bool {
        matches!(self, EntityKind::Enemy { .. } | EntityKind::Boss)
    }

    /// Layer this kind is committed on
    pub const fn layer(&self) -> Layers {
        match self {
            EntityKind::FloorProp { .. } => Layers::PROP,
            _ => Layers::ENTITY,
        }
    }
}

/// What an occupant is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OccupantTag {
    Floor,
    Wall,
    WallProp,
    Roof,
    Entity(EntityKind),
}

/// Result row of a spatial query
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Occupant {
    pub handle: SceneHandle,
    pub position: Vec2,
    pub layer: Layers,
    pub tag: OccupantTag,
}

/// Read-only view of committed world state
pub trait SpatialQuery {
    /// Occupants on any of `layers` within `radius` of `point`
    fn query_occupants(&self, point: Vec2, radius: f64, layers: Layers) -> Vec<Occupant>;

    /// Whether anything on `layers` lies within `radius` of `point`
    fn any_occupant(&self, point: Vec2, radius: f64, layers: Layers) -> bool {
        !self.query_occupants(point, radius, layers).is_empty()
    }
}

/// Receives derived geometry
pub trait TileBuilder {
    fn build_floor(&mut self, tile: &FloorTile);

    /// Build a wall segment, and its prop if it carries one
    fn build_wall(&mut self, wall: &WallSegment);

    fn build_roof(&mut self, roof: &RoofTile);

    /// Remove walls (and their props) within `radius` of `position`,
    /// returning how many occupants were removed
    fn remove_walls(&mut self, position: Vec2, radius: f64) -> usize;
}

/// Creates live entities
pub trait EntityFactory {
    /// Create `kind` at `position` facing `quarter_turns` * 90 degrees
    fn spawn_entity(&mut self, kind: EntityKind, position: Vec2, quarter_turns: u8)
    -> SceneHandle;
}

/// Everything a generation pass builds into
pub trait Scene: SpatialQuery + TileBuilder + EntityFactory {}

impl<T: SpatialQuery + TileBuilder + EntityFactory> Scene for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_layers() {
        assert_eq!(EntityKind::Player.layer(), Layers::ENTITY);
        assert_eq!(EntityKind::FloorProp { variant: 2 }.layer(), Layers::PROP);
        assert!(EntityKind::Boss.is_hostile());
        assert!(!EntityKind::ExitDoor.is_hostile());
    }

    #[test]
    fn test_entity_display() {
        assert_eq!(EntityKind::Enemy { archetype: 2 }.to_string(), "Enemy(2)");
        assert_eq!(EntityKind::ExitDoor.to_string(), "ExitDoor");
    }

    #[test]
    fn test_layers_serde_as_bits() {
        let layers = Layers::FLOOR | Layers::ENTITY;
        let json = serde_json::to_string(&layers).unwrap();
        assert_eq!(json, "17");
        let back: Layers = serde_json::from_str(&json).unwrap();
        assert_eq!(back, layers);
    }
}
