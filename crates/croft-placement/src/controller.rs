use croft_buildings::{BuildingKind, BuildingRegistry};
use croft_geom::Vec3;
use croft_grid::{
    Direction, DoorState, EdgeRecord, Entity, EntityStore, FloorRecord, GridMap, GridPos,
};
use croft_mesh_cpu::BatchStore;

use crate::anchor;
use crate::ui::ConfirmUi;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlacementState {
    Idle,
    Previewing(BuildingKind),
    Dragging(BuildingKind),
}

/// Transient ghost object shown while a placement is in flight. It is never
/// written into the grid; cancel discards it without a trace.
#[derive(Clone, Copy, Debug)]
pub struct Preview {
    pub kind: BuildingKind,
    pub cell: GridPos,
    /// Boundary the piece attaches to; `None` for whole-cell kinds.
    pub direction: Option<Direction>,
    pub world_pos: Vec3,
    pub yaw_deg: f32,
}

/// Owns the currently selected building kind and the preview transient, and
/// turns pointer input into validated grid commits.
pub struct PlacementController {
    state: PlacementState,
    preview: Option<Preview>,
    edit_mode: bool,
    player_pos: Vec3,
}

impl Default for PlacementController {
    fn default() -> Self {
        Self {
            state: PlacementState::Idle,
            preview: None,
            edit_mode: false,
            player_pos: Vec3::ZERO,
        }
    }
}

impl PlacementController {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn state(&self) -> PlacementState {
        self.state
    }

    #[inline]
    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    #[inline]
    pub fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    /// Last known player position, used for anchor tie-breaking.
    pub fn set_player_pos(&mut self, p: Vec3) {
        self.player_pos = p;
    }

    /// Toggling edit mode tears down any placement in flight; clicks then
    /// delete instead of placing.
    pub fn set_edit_mode(&mut self, on: bool, ui: &mut dyn ConfirmUi) {
        if on && self.state != PlacementState::Idle {
            self.cancel(ui);
        }
        self.edit_mode = on;
    }

    /// Idle -> Previewing. Picks the initial anchor: the closest placeable
    /// cell for floors, the nearest floor with a free direction for edge
    /// kinds. Returns false when no anchor exists or placement is blocked.
    pub fn start_placing(
        &mut self,
        kind: BuildingKind,
        registry: &BuildingRegistry,
        grid: &GridMap,
        entities: &EntityStore,
    ) -> bool {
        if self.edit_mode || self.state != PlacementState::Idle || kind.is_none() {
            return false;
        }
        if registry.settings(kind).is_none() {
            log::error!("start_placing for unregistered building kind {:?}", kind);
            return false;
        }
        let preview = if kind.attaches_to_edge() {
            anchor::initial_edge_anchor(kind, grid, entities, self.player_pos)
        } else {
            anchor::initial_floor_anchor(registry, grid, self.player_pos)
        };
        let Some(preview) = preview else {
            return false;
        };
        self.preview = Some(preview);
        self.state = PlacementState::Previewing(kind);
        true
    }

    /// Previewing -> Dragging: interactive repositioning begins and the
    /// confirm affordance goes away until the pointer is released.
    pub fn pointer_down(&mut self, ui: &mut dyn ConfirmUi) {
        if let PlacementState::Previewing(kind) = self.state {
            self.state = PlacementState::Dragging(kind);
            ui.hide();
        }
    }

    /// Dragging -> Previewing: the candidate is parked and the confirm
    /// affordance appears at it.
    pub fn pointer_up(&mut self, ui: &mut dyn ConfirmUi) {
        if let PlacementState::Dragging(kind) = self.state {
            self.state = PlacementState::Previewing(kind);
            if let Some(p) = &self.preview {
                ui.show(p.world_pos);
            }
        }
    }

    /// Per-frame drag update from the input ray's ground hit. The preview
    /// only moves onto positions that would commit; otherwise it keeps its
    /// last valid spot.
    pub fn pointer_move(&mut self, registry: &BuildingRegistry, grid: &GridMap, hit: Vec3) {
        let PlacementState::Dragging(kind) = self.state else {
            return;
        };
        let cell = grid.world_to_grid(hit);
        if !grid.is_valid_position(cell) {
            return;
        }
        if kind.attaches_to_edge() {
            if grid.floor_at(cell).is_none() {
                return;
            }
            let d = grid.hit_direction(cell, hit);
            if !grid.wall_placement_allowed(cell, d) {
                return;
            }
            self.preview = Some(anchor::edge_preview(grid, kind, cell, d));
        } else {
            let moved = self.preview.as_ref().is_none_or(|p| p.cell != cell);
            if !moved {
                return;
            }
            let size = registry.settings(kind).map_or((1, 1), |s| s.footprint);
            if !grid.can_place_footprint(cell, size) {
                return;
            }
            self.preview = Some(anchor::floor_preview(grid, cell));
        }
    }

    /// Previewing -> commit. On success the flow re-enters Previewing at the
    /// next anchor (or winds down through cancel when none exists). On a
    /// validation failure the preview stays put and the caller may adjust
    /// and confirm again; with no active preview this is a plain no-op.
    pub fn confirm(
        &mut self,
        registry: &BuildingRegistry,
        grid: &mut GridMap,
        entities: &mut EntityStore,
        batches: &mut BatchStore,
        ui: &mut dyn ConfirmUi,
    ) -> bool {
        if self.edit_mode || !matches!(self.state, PlacementState::Previewing(_)) {
            return false;
        }
        let Some(preview) = self.preview else {
            return false;
        };
        if !grid.is_valid_position(preview.cell) {
            return false;
        }
        let committed = match preview.kind {
            BuildingKind::Floor => commit_floor(registry, grid, entities, batches, preview.cell),
            BuildingKind::Wall | BuildingKind::Door => {
                commit_edge(preview.kind, grid, entities, batches, &preview)
            }
            BuildingKind::None => false,
        };
        if !committed {
            return false;
        }
        // Multi-step flow: immediately offer the next spot for the same kind.
        let next = if preview.kind.attaches_to_edge() {
            anchor::next_edge_anchor(preview.kind, grid, entities, preview.cell, self.player_pos)
        } else {
            anchor::next_floor_anchor(registry, grid, preview.cell, self.player_pos)
        };
        match next {
            Some(p) => {
                ui.show(p.world_pos);
                self.preview = Some(p);
                self.state = PlacementState::Previewing(preview.kind);
            }
            None => self.cancel(ui),
        }
        true
    }

    /// Any active state -> Idle. Discards the preview without touching the
    /// grid and notifies collaborators the flow is over.
    pub fn cancel(&mut self, ui: &mut dyn ConfirmUi) {
        if self.state == PlacementState::Idle && self.preview.is_none() {
            return;
        }
        self.preview = None;
        self.state = PlacementState::Idle;
        ui.hide();
        ui.done();
    }

    /// Edit-mode click: a hit on a placed building deletes it. The slot
    /// nearest the hit point wins over the floor underneath it.
    pub fn delete_at(
        &mut self,
        grid: &mut GridMap,
        entities: &mut EntityStore,
        batches: &mut BatchStore,
        hit: Vec3,
    ) -> bool {
        if !self.edit_mode {
            return false;
        }
        let cell = grid.world_to_grid(hit);
        if !grid.is_valid_position(cell) {
            return false;
        }
        let d = grid.hit_direction(cell, hit);
        if grid.is_direction_covered(cell, d) {
            delete_edge(grid, entities, batches, cell, d)
        } else {
            delete_floor(grid, entities, batches, cell)
        }
    }
}

fn commit_floor(
    registry: &BuildingRegistry,
    grid: &mut GridMap,
    entities: &mut EntityStore,
    batches: &mut BatchStore,
    cell: GridPos,
) -> bool {
    let Some(settings) = registry.settings(BuildingKind::Floor) else {
        log::error!("no settings registered for floors");
        return false;
    };
    let size = settings.footprint;
    if !grid.can_place_footprint(cell, size) {
        return false;
    }
    let id = entities.insert(Entity::Floor(FloorRecord { pos: cell, size }));
    grid.mark_footprint(cell, size, true);
    for p in GridMap::footprint_cells(cell, size) {
        grid.set_floor(p, Some(id));
    }
    // The anchor cell stands in for the whole footprint in the batch.
    batches.add_tracked(BuildingKind::Floor, cell);
    true
}

fn commit_edge(
    kind: BuildingKind,
    grid: &mut GridMap,
    entities: &mut EntityStore,
    batches: &mut BatchStore,
    preview: &Preview,
) -> bool {
    let Some(d) = preview.direction else {
        return false;
    };
    let cell = preview.cell;
    if grid.floor_at(cell).is_none() {
        return false;
    }
    if !grid.wall_placement_allowed(cell, d) {
        return false;
    }
    let edge = EdgeRecord {
        pos: cell,
        direction: d,
        floors: [grid.floor_at(cell), grid.adjacent_floor(cell, d)],
    };
    let entity = match kind {
        BuildingKind::Door => Entity::Door {
            edge,
            state: DoorState::default(),
        },
        _ => Entity::Wall(edge),
    };
    let id = entities.insert(entity);
    grid.set_wall(cell, d, id, kind);
    batches.add_tracked(kind, cell);
    true
}

/// Delete a single wall/door: always succeeds when the slot is filled.
pub fn delete_edge(
    grid: &mut GridMap,
    entities: &mut EntityStore,
    batches: &mut BatchStore,
    cell: GridPos,
    d: Direction,
) -> bool {
    let Some(entry) = grid.clear_wall(cell, d) else {
        return false;
    };
    entities.remove(entry.entity);
    let still_present = grid
        .cell(cell)
        .is_some_and(|c| c.slots().any(|(_, e)| e.kind == entry.kind));
    if still_present {
        batches.mark_dirty(entry.kind);
    } else {
        batches.remove_tracked(entry.kind, cell);
    }
    true
}

/// Delete a floor, refused while any wall slot across its footprint is
/// still filled (deleting anyway would corrupt wall back-references).
pub fn delete_floor(
    grid: &mut GridMap,
    entities: &mut EntityStore,
    batches: &mut BatchStore,
    cell: GridPos,
) -> bool {
    let Some(floor_id) = grid.floor_at(cell) else {
        return false;
    };
    let Some(Entity::Floor(rec)) = entities.get(floor_id) else {
        return false;
    };
    let (origin, size) = (rec.pos, rec.size);
    for p in GridMap::footprint_cells(origin, size) {
        if grid.cell(p).is_some_and(|c| c.has_walls()) {
            log::warn!(
                "refusing to delete floor at ({}, {}): wall slots still attached",
                origin.x,
                origin.y
            );
            return false;
        }
    }
    for p in GridMap::footprint_cells(origin, size) {
        grid.set_floor(p, None);
    }
    grid.mark_footprint(origin, size, false);
    entities.remove(floor_id);
    batches.remove_tracked(BuildingKind::Floor, origin);
    true
}
