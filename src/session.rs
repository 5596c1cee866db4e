use std::error::Error;
use std::path::Path;

use serde::Deserialize;

use croft_buildings::{BuildingKind, BuildingRegistry};
use croft_geom::Vec3;
use croft_grid::{Entity, EntityStore, GridMap, GridStats};
use croft_mesh_cpu::{BatchStats, BatchStore, CombinedMesh, MeshBank};
use croft_placement::{ConfirmUi, NullConfirmUi, PlacementController, PlacementState};

/// Grid sizing fixed at world load. Loaded from `grid.toml`; the sandbox
/// binary lets flags override it.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct GridConfig {
    pub width: i32,
    pub height: i32,
    pub cell_size: f32,
    pub origin: [f32; 3],
}

#[derive(Deserialize)]
struct GridConfigFile {
    grid: GridConfig,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 32,
            height: 32,
            cell_size: 1.0,
            origin: [0.0, 0.0, 0.0],
        }
    }
}

impl GridConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = std::fs::read_to_string(path)?;
        let f: GridConfigFile = toml::from_str(&s)?;
        Ok(f.grid)
    }
}

/// One loaded world's building state, wired together explicitly: the grid,
/// the entity records, the placement controller, and the batch engine all
/// live here and nowhere else. Collaborators get references, not globals.
pub struct BuildSession {
    pub tick: u64,
    pub registry: BuildingRegistry,
    pub bank: MeshBank,
    pub grid: GridMap,
    pub entities: EntityStore,
    pub placement: PlacementController,
    pub batches: BatchStore,
    ui: Box<dyn ConfirmUi>,
}

impl BuildSession {
    pub fn new(
        registry: BuildingRegistry,
        config: GridConfig,
        ui: Box<dyn ConfirmUi>,
    ) -> Result<Self, Box<dyn Error>> {
        let bank = MeshBank::from_registry(&registry)?;
        let batches = BatchStore::new(&registry);
        let grid = GridMap::new(
            config.width,
            config.height,
            config.cell_size,
            Vec3::new(config.origin[0], config.origin[1], config.origin[2]),
        );
        Ok(Self {
            tick: 0,
            registry,
            bank,
            grid,
            entities: EntityStore::new(),
            placement: PlacementController::new(),
            batches,
            ui,
        })
    }

    pub fn headless(registry: BuildingRegistry, config: GridConfig) -> Result<Self, Box<dyn Error>> {
        Self::new(registry, config, Box::new(NullConfirmUi))
    }

    // --- input boundary ---

    pub fn set_player_pos(&mut self, p: Vec3) {
        self.placement.set_player_pos(p);
    }

    pub fn start_placing(&mut self, kind: BuildingKind) -> bool {
        self.placement
            .start_placing(kind, &self.registry, &self.grid, &self.entities)
    }

    pub fn pointer_down(&mut self) {
        self.placement.pointer_down(self.ui.as_mut());
    }

    pub fn pointer_move(&mut self, hit: Vec3) {
        self.placement.pointer_move(&self.registry, &self.grid, hit);
    }

    pub fn pointer_up(&mut self) {
        self.placement.pointer_up(self.ui.as_mut());
    }

    pub fn confirm(&mut self) -> bool {
        self.placement.confirm(
            &self.registry,
            &mut self.grid,
            &mut self.entities,
            &mut self.batches,
            self.ui.as_mut(),
        )
    }

    pub fn cancel(&mut self) {
        self.placement.cancel(self.ui.as_mut());
    }

    pub fn set_edit_mode(&mut self, on: bool) {
        self.placement.set_edit_mode(on, self.ui.as_mut());
    }

    pub fn delete_at(&mut self, hit: Vec3) -> bool {
        self.placement
            .delete_at(&mut self.grid, &mut self.entities, &mut self.batches, hit)
    }

    /// Use a door under the given world hit. The toggle is queued against
    /// the transition window; requests landing mid-transition are dropped.
    pub fn interact_door(&mut self, hit: Vec3) -> bool {
        let cell = self.grid.world_to_grid(hit);
        if !self.grid.is_valid_position(cell) {
            return false;
        }
        let d = self.grid.hit_direction(cell, hit);
        let Some(slot) = self.grid.slot_at(cell, d) else {
            return false;
        };
        if slot.kind != BuildingKind::Door {
            return false;
        }
        let transition = self.registry.door_transition_ticks;
        let now = self.tick;
        match self.entities.get_mut(slot.entity) {
            Some(Entity::Door { state, .. }) => state.request_toggle(now, transition),
            _ => false,
        }
    }

    // --- tick driver ---

    /// One simulation tick: doors settle first, then the dirty set flushes
    /// into at most one rebuild per kind. Commits made after this call land
    /// in the next tick's rebuild.
    pub fn step(&mut self) -> Vec<BuildingKind> {
        self.tick += 1;
        let now = self.tick;
        let mut door_settled = false;
        for (_, state) in self.entities.doors_mut() {
            if state.advance(now) {
                door_settled = true;
            }
        }
        if door_settled {
            // Collider enablement changed; the door batch republishes.
            self.batches.mark_dirty(BuildingKind::Door);
        }
        self.batches.flush_dirty(&self.grid, &self.bank)
    }

    // --- render boundary ---

    pub fn combined(&self, kind: BuildingKind) -> Option<&CombinedMesh> {
        self.batches.combined(kind)
    }

    pub fn placement_state(&self) -> PlacementState {
        self.placement.state()
    }

    pub fn grid_stats(&self) -> GridStats {
        self.grid.stats()
    }

    pub fn batch_stats(&self) -> BatchStats {
        self.batches.stats()
    }
}
