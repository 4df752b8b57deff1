//! Entity spawning: player, enemies, floor props and the exit door
//!
//! All candidate searches are bounded. Running out of attempts leaves the
//! dungeon with fewer entities (or no door) and logs a warning.

use serde::{Deserialize, Serialize};

use crate::config::GeneratorConfig;
use crate::consts::{DOOR_CLEARANCE_RADIUS, OCCUPANT_RADIUS};
use crate::dungeon::Room;
use crate::geom::{Point, Sides, Vec2};
use crate::rng::DungeonRng;
use crate::scene::{
    EntityFactory, EntityKind, Layers, OccupantTag, Scene, SceneHandle, SpatialQuery, TileBuilder,
};

/// An entity the generator created
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnedEntity {
    pub handle: SceneHandle,
    pub kind: EntityKind,
    pub position: Vec2,
    /// Index of the room it was placed in
    pub room: usize,
}

/// Enemies placed plus how many requested ones could not be placed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawns {
    pub enemies: Vec<SpawnedEntity>,
    pub requested: u32,
    pub shortfall: u32,
}

/// Floor props placed plus how many attempts were dropped
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropSpawns {
    pub props: Vec<SpawnedEntity>,
    pub attempts: u32,
    pub dropped: u32,
}

/// Is there a hostile occupant on `cell`
fn enemy_at<Q: SpatialQuery + ?Sized>(scene: &Q, cell: Point) -> bool {
    scene
        .query_occupants(cell.cell_center(), OCCUPANT_RADIUS, Layers::ENTITY)
        .iter()
        .any(|o| matches!(o.tag, OccupantTag::Entity(kind) if kind.is_hostile()))
}

/// Put the player at the center of a random room
///
/// Returns `None` only when there are no rooms.
pub fn spawn_player<S: Scene + ?Sized>(
    rooms: &[Room],
    rng: &mut DungeonRng,
    scene: &mut S,
) -> Option<SpawnedEntity> {
    if rooms.is_empty() {
        log::warn!("no rooms, player not spawned");
        return None;
    }
    let room = rng.rn2(rooms.len() as u32) as usize;
    let position = rooms[room].center();
    let handle = scene.spawn_entity(EntityKind::Player, position, 0);
    Some(SpawnedEntity {
        handle,
        kind: EntityKind::Player,
        position,
        room,
    })
}

/// Number of enemies a room asks for
pub fn enemy_count(room: &Room, min_enemies: u32, rng: &mut DungeonRng) -> u32 {
    let min = min_enemies as i32;
    let cap = (room.size.width.min(room.size.height) - 2).max(min);
    rng.range(min, cap) as u32
}

/// Fill every room except `player_room` with enemies
///
/// On a boss floor the first enemy placed is the boss.
pub fn spawn_enemies<S: Scene + ?Sized>(
    rooms: &[Room],
    player_room: Option<usize>,
    config: &GeneratorConfig,
    rng: &mut DungeonRng,
    scene: &mut S,
) -> EnemySpawns {
    let mut result = EnemySpawns::default();
    let mut boss_pending = config.boss_floor;

    for (idx, room) in rooms.iter().enumerate() {
        if Some(idx) == player_room {
            continue;
        }
        let wanted = enemy_count(room, config.min_enemies_per_room, rng);
        let budget = wanted.saturating_mul(config.spawn_attempts_per_entity);
        result.requested += wanted;

        let mut placed = 0;
        let mut attempts = 0;
        while placed < wanted && attempts < budget {
            attempts += 1;
            let cell = room.random_cell(rng);
            if enemy_at(scene, cell) {
                continue;
            }

            let kind = if boss_pending {
                boss_pending = false;
                EntityKind::Boss
            } else {
                EntityKind::Enemy {
                    archetype: rng.rn2(config.enemy_archetypes),
                }
            };
            let position = cell.cell_center();
            let handle = scene.spawn_entity(kind, position, 0);
            result.enemies.push(SpawnedEntity {
                handle,
                kind,
                position,
                room: idx,
            });
            placed += 1;
        }

        if placed < wanted {
            log::warn!(
                "room {} got {} of {} enemies after {} attempts",
                idx,
                placed,
                wanted,
                attempts
            );
            result.shortfall += wanted - placed;
        }
    }
    result
}

/// Scatter decorative props on room floors
///
/// Each room draws a number of attempts; an attempt landing on a cell already
/// used in that room or on an enemy is dropped.
pub fn spawn_floor_props<S: Scene + ?Sized>(
    rooms: &[Room],
    config: &GeneratorConfig,
    rng: &mut DungeonRng,
    scene: &mut S,
) -> PropSpawns {
    let mut result = PropSpawns::default();

    for (idx, room) in rooms.iter().enumerate() {
        let attempts = rng.rn2(config.max_floor_props_per_room);
        result.attempts += attempts;
        let mut used: Vec<Point> = Vec::new();

        for _ in 0..attempts {
            let cell = room.random_cell(rng);
            if used.contains(&cell) || enemy_at(scene, cell) {
                result.dropped += 1;
                continue;
            }
            let kind = EntityKind::FloorProp {
                variant: rng.rn2(config.prop_variants),
            };
            let position = cell.cell_center();
            let handle = scene.spawn_entity(kind, position, 0);
            result.props.push(SpawnedEntity {
                handle,
                kind,
                position,
                room: idx,
            });
            used.push(cell);
        }
    }
    result
}

/// Top-wall segment of `room` at column `x`, if a door may replace it
///
/// The cell above must hold no floor and a wall must still stand there.
fn door_site<S: Scene + ?Sized>(scene: &S, room: &Room, x: i32) -> Option<Vec2> {
    let cell = Point::new(x, room.top_row());
    let outside = cell.step(Sides::TOP).cell_center();
    if scene.any_occupant(outside, DOOR_CLEARANCE_RADIUS, Layers::FLOOR) {
        return None;
    }
    let position = Sides::TOP.wall_position(cell);
    scene
        .any_occupant(position, DOOR_CLEARANCE_RADIUS, Layers::ENVIRONMENT)
        .then_some(position)
}

/// Replace one top wall segment with the exit door
///
/// `exclude` (the player's room) is skipped unless it is the only room.
/// Rooms and segments are drawn without replacement, so the search ends
/// once every candidate has been tried.
pub fn spawn_exit_door<S: Scene + ?Sized>(
    rooms: &[Room],
    exclude: Option<usize>,
    rng: &mut DungeonRng,
    scene: &mut S,
) -> Option<SpawnedEntity> {
    let mut candidates: Vec<usize> = (0..rooms.len()).filter(|idx| Some(*idx) != exclude).collect();
    if candidates.is_empty() {
        candidates = (0..rooms.len()).collect();
    }

    while !candidates.is_empty() {
        let pick = rng.rn2(candidates.len() as u32) as usize;
        let idx = candidates.swap_remove(pick);
        let room = &rooms[idx];

        let mut columns: Vec<i32> = (room.x_min() + 1..room.x_max()).collect();
        while !columns.is_empty() {
            let pick = rng.rn2(columns.len() as u32) as usize;
            let x = columns.swap_remove(pick);
            let Some(position) = door_site(scene, room, x) else {
                continue;
            };

            let removed = scene.remove_walls(position, DOOR_CLEARANCE_RADIUS);
            log::debug!("exit door in room {} at {:?}, removed {}", idx, position, removed);
            let kind = EntityKind::ExitDoor;
            let handle = scene.spawn_entity(kind, position, Sides::TOP.quarter_turns());
            return Some(SpawnedEntity {
                handle,
                kind,
                position,
                room: idx,
            });
        }
    }

    log::warn!("no room has a free top wall, exit door not placed");
    None
}
