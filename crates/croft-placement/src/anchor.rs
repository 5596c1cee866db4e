//! Anchor selection for starting and continuing a placement flow.

use croft_buildings::{BuildingKind, BuildingRegistry};
use croft_geom::Vec3;
use croft_grid::{Direction, EntityStore, GridMap, GridPos};
use croft_mesh_cpu::{edge_offset, edge_yaw};

use crate::controller::Preview;

/// Build the preview transient for a floor anchored at `cell`.
pub fn floor_preview(grid: &GridMap, cell: GridPos) -> Preview {
    Preview {
        kind: BuildingKind::Floor,
        cell,
        direction: None,
        world_pos: grid.cell_center(cell),
        yaw_deg: 0.0,
    }
}

/// Build the preview transient for a wall/door on one boundary of `cell`.
pub fn edge_preview(grid: &GridMap, kind: BuildingKind, cell: GridPos, d: Direction) -> Preview {
    Preview {
        kind,
        cell,
        direction: Some(d),
        world_pos: grid.cell_center(cell) + edge_offset(d, grid.cell_size() * 0.5),
        yaw_deg: edge_yaw(d),
    }
}

fn footprint_of(registry: &BuildingRegistry, kind: BuildingKind) -> (i32, i32) {
    registry.settings(kind).map_or((1, 1), |s| s.footprint)
}

/// First free legal direction on a floor cell, if any.
pub fn free_direction(grid: &GridMap, cell: GridPos) -> Option<Direction> {
    Direction::ALL
        .into_iter()
        .find(|d| grid.wall_placement_allowed(cell, *d))
}

/// Cells at Chebyshev radius `r` around `center`, clipped to the grid.
fn ring(grid: &GridMap, center: GridPos, r: i32) -> Vec<GridPos> {
    let mut out = Vec::new();
    if r == 0 {
        if grid.is_valid_position(center) {
            out.push(center);
        }
        return out;
    }
    for dx in -r..=r {
        for dy in [-r, r] {
            let p = center.offset(dx, dy);
            if grid.is_valid_position(p) {
                out.push(p);
            }
        }
    }
    for dy in (-r + 1)..r {
        for dx in [-r, r] {
            let p = center.offset(dx, dy);
            if grid.is_valid_position(p) {
                out.push(p);
            }
        }
    }
    out
}

/// Closest placeable floor cell to the player, searching outward ring by
/// ring from the player's own cell.
pub fn initial_floor_anchor(
    registry: &BuildingRegistry,
    grid: &GridMap,
    player: Vec3,
) -> Option<Preview> {
    let size = footprint_of(registry, BuildingKind::Floor);
    let center = grid.clamp_to_bounds(grid.world_to_grid(player));
    let max_r = grid.width().max(grid.height());
    for r in 0..=max_r {
        let mut hits: Vec<GridPos> = ring(grid, center, r)
            .into_iter()
            .filter(|p| grid.can_place_footprint(*p, size))
            .collect();
        if hits.is_empty() {
            continue;
        }
        hits.sort_by(|a, b| {
            let da = grid.cell_center(*a).distance_sq(player);
            let db = grid.cell_center(*b).distance_sq(player);
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        });
        return Some(floor_preview(grid, hits[0]));
    }
    None
}

/// Nearest floor with at least one free legal direction for a wall/door.
pub fn initial_edge_anchor(
    kind: BuildingKind,
    grid: &GridMap,
    entities: &EntityStore,
    player: Vec3,
) -> Option<Preview> {
    let mut best: Option<(f32, GridPos, Direction)> = None;
    for (_, entity) in entities.iter() {
        if entity.kind() != BuildingKind::Floor {
            continue;
        }
        let cell = entity.grid_pos();
        let Some(d) = free_direction(grid, cell) else {
            continue;
        };
        let dist = grid.cell_center(cell).distance_sq(player);
        if best.is_none_or(|(b, _, _)| dist < b) {
            best = Some((dist, cell, d));
        }
    }
    best.map(|(_, cell, d)| edge_preview(grid, kind, cell, d))
}

/// Follow-up anchor after a committed floor: the closest unoccupied
/// 8-neighbor of the placed cell, ties broken by distance to the player,
/// skipping candidates boxed in with no free neighbor of their own.
pub fn next_floor_anchor(
    registry: &BuildingRegistry,
    grid: &GridMap,
    placed: GridPos,
    player: Vec3,
) -> Option<Preview> {
    let size = footprint_of(registry, BuildingKind::Floor);
    let mut candidates: Vec<GridPos> = placed
        .neighbors8()
        .into_iter()
        .filter(|p| grid.can_place_footprint(*p, size))
        .filter(|p| {
            p.neighbors8()
                .into_iter()
                .any(|n| grid.is_valid_position(n) && !grid.is_cell_occupied(n))
        })
        .collect();
    candidates.sort_by(|a, b| {
        let key_a = (a.distance_sq(placed), grid.cell_center(*a).distance_sq(player));
        let key_b = (b.distance_sq(placed), grid.cell_center(*b).distance_sq(player));
        key_a
            .0
            .cmp(&key_b.0)
            .then(key_a.1.partial_cmp(&key_b.1).unwrap_or(std::cmp::Ordering::Equal))
    });
    candidates.first().map(|p| floor_preview(grid, *p))
}

/// Follow-up anchor after a committed wall/door: the nearest floor that
/// still has a free legal direction, the just-extended cell included.
pub fn next_edge_anchor(
    kind: BuildingKind,
    grid: &GridMap,
    entities: &EntityStore,
    placed: GridPos,
    player: Vec3,
) -> Option<Preview> {
    let mut best: Option<(i64, f32, GridPos, Direction)> = None;
    for (_, entity) in entities.iter() {
        if entity.kind() != BuildingKind::Floor {
            continue;
        }
        let cell = entity.grid_pos();
        let Some(d) = free_direction(grid, cell) else {
            continue;
        };
        let key = (cell.distance_sq(placed), grid.cell_center(cell).distance_sq(player));
        let better = match best {
            None => true,
            Some((bd, bp, _, _)) => key.0 < bd || (key.0 == bd && key.1 < bp),
        };
        if better {
            best = Some((key.0, key.1, cell, d));
        }
    }
    best.map(|(_, _, cell, d)| edge_preview(grid, kind, cell, d))
}

#[cfg(test)]
mod tests {
    use super::*;
    use croft_grid::replay::set_floor_data;

    fn grid() -> GridMap {
        GridMap::new(10, 10, 1.0, Vec3::ZERO)
    }

    fn registry() -> BuildingRegistry {
        BuildingRegistry::from_toml_strs(
            "[materials]\ntimber = [150, 110, 70, 255]\n",
            r#"
            [[buildings]]
            kind = "floor"
            material = "timber"
            extent = [1.0, 0.1, 1.0]

            [[buildings]]
            kind = "wall"
            material = "timber"
            extent = [0.1, 2.0, 1.0]
            "#,
        )
        .unwrap()
    }

    #[test]
    fn initial_floor_anchor_is_the_player_cell_when_free() {
        let reg = registry();
        let g = grid();
        let a = initial_floor_anchor(&reg, &g, Vec3::new(4.5, 0.0, 4.5)).unwrap();
        assert_eq!(a.cell, GridPos::new(4, 4));
        assert_eq!(a.direction, None);
    }

    #[test]
    fn initial_floor_anchor_walks_outward_over_occupied_cells() {
        let reg = registry();
        let mut g = grid();
        let mut entities = EntityStore::new();
        set_floor_data(&mut g, &mut entities, GridPos::new(4, 4), BuildingKind::Floor);
        let a = initial_floor_anchor(&reg, &g, Vec3::new(4.5, 0.0, 4.5)).unwrap();
        assert_ne!(a.cell, GridPos::new(4, 4));
        assert!(a.cell.distance_sq(GridPos::new(4, 4)) <= 2);
    }

    #[test]
    fn edge_anchor_needs_an_existing_floor() {
        let g = grid();
        let entities = EntityStore::new();
        assert!(initial_edge_anchor(BuildingKind::Wall, &g, &entities, Vec3::ZERO).is_none());
    }

    #[test]
    fn next_floor_anchor_prefers_the_player_side() {
        let reg = registry();
        let mut g = grid();
        let mut entities = EntityStore::new();
        let placed = GridPos::new(5, 5);
        set_floor_data(&mut g, &mut entities, placed, BuildingKind::Floor);
        // Player stands west of the placed cell; the west neighbor wins the
        // tie among the four cardinal candidates.
        let a = next_floor_anchor(&reg, &g, placed, Vec3::new(2.0, 0.0, 5.5)).unwrap();
        assert_eq!(a.cell, GridPos::new(4, 5));
    }
}
