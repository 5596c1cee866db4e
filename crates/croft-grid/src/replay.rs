//! Idempotent load-path setters. Saved state is replayed through these
//! without going through the interactive placement machine.

use croft_buildings::BuildingKind;

use crate::coords::GridPos;
use crate::direction::Direction;
use crate::entity::{DoorState, EdgeRecord, Entity, EntityStore, FloorRecord};
use crate::grid::GridMap;

/// Ensure a floor exists at `pos`. Returns false only for out-of-range
/// positions or non-floor kinds; an already-present floor is a no-op true.
pub fn set_floor_data(
    grid: &mut GridMap,
    entities: &mut EntityStore,
    pos: GridPos,
    kind: BuildingKind,
) -> bool {
    if kind != BuildingKind::Floor || !grid.is_valid_position(pos) {
        return false;
    }
    if grid.is_cell_occupied(pos) {
        return grid.floor_at(pos).is_some();
    }
    let id = entities.insert(Entity::Floor(FloorRecord { pos, size: (1, 1) }));
    grid.mark_footprint(pos, (1, 1), true);
    grid.set_floor(pos, Some(id));
    true
}

/// Ensure a wall/door of `kind` fills the slot at `(pos, d)`. A slot already
/// holding the same kind is left untouched; a different kind is replaced.
pub fn set_wall_data(
    grid: &mut GridMap,
    entities: &mut EntityStore,
    pos: GridPos,
    d: Direction,
    kind: BuildingKind,
) -> bool {
    if !kind.attaches_to_edge() {
        return false;
    }
    if grid.floor_at(pos).is_none() {
        return false;
    }
    if let Some(existing) = grid.slot_at(pos, d) {
        if existing.kind == kind {
            return true;
        }
        grid.clear_wall(pos, d);
        entities.remove(existing.entity);
    }
    let edge = EdgeRecord {
        pos,
        direction: d,
        floors: [grid.floor_at(pos), grid.adjacent_floor(pos, d)],
    };
    let entity = match kind {
        BuildingKind::Door => Entity::Door {
            edge,
            state: DoorState::default(),
        },
        _ => Entity::Wall(edge),
    };
    let id = entities.insert(entity);
    grid.set_wall(pos, d, id, kind);
    true
}
