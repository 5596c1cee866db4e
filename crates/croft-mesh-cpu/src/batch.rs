use croft_buildings::{BuildingKind, BuildingRegistry, MaterialId};
use croft_geom::{Aabb, Transform, Vec3};
use croft_grid::{Direction, GridMap, GridPos};
use hashbrown::{HashMap, HashSet};

use crate::bank::MeshBank;
use crate::mesh_build::MeshBuild;

/// Triangle set handed to the physics side, regenerated from the combined
/// geometry on every rebuild.
#[derive(Clone, Default)]
pub struct CollisionProxy {
    pub positions: Vec<f32>,
    pub indices: Vec<u32>,
}

impl CollisionProxy {
    fn from_build(build: &MeshBuild) -> Self {
        Self {
            positions: build.pos.clone(),
            indices: build.idx.clone(),
        }
    }
}

/// One kind's merged render artifact: a single mesh, its material, bounds,
/// and the matching collision proxy.
pub struct CombinedMesh {
    pub kind: BuildingKind,
    pub material: MaterialId,
    pub build: MeshBuild,
    pub bbox: Aabb,
    pub collider: CollisionProxy,
}

struct KindBatch {
    tracked: HashSet<GridPos>,
    combined: Option<CombinedMesh>,
    use_combined: bool,
    preserve_originals: bool,
    edge_aligned: bool,
    combined_visible: bool,
}

#[derive(Default, Debug, Clone, Copy)]
pub struct BatchStats {
    pub kinds: usize,
    pub tracked_positions: usize,
    pub vertices: usize,
    pub triangles: usize,
}

/// Per-kind geometry rebuild engine. Edits mark kinds dirty; one flush per
/// tick folds any number of edits into at most one rebuild per kind.
pub struct BatchStore {
    batches: HashMap<BuildingKind, KindBatch>,
    dirty: HashSet<BuildingKind>,
}

/// Yaw of an edge-aligned piece: top/bottom boundaries run along X, so the
/// Z-long source turns a quarter; left/right boundaries keep it as-is.
#[inline]
pub fn edge_yaw(d: Direction) -> f32 {
    match d {
        Direction::Top | Direction::Bottom => 90.0,
        Direction::Right | Direction::Left => 0.0,
    }
}

/// Half-cell offset from a cell center to the midpoint of one boundary.
#[inline]
pub fn edge_offset(d: Direction, half_cell: f32) -> Vec3 {
    match d {
        Direction::Top => Vec3::new(0.0, 0.0, half_cell),
        Direction::Bottom => Vec3::new(0.0, 0.0, -half_cell),
        Direction::Right => Vec3::new(half_cell, 0.0, 0.0),
        Direction::Left => Vec3::new(-half_cell, 0.0, 0.0),
    }
}

fn bbox_of(build: &MeshBuild) -> Aabb {
    let mut points = build.pos.chunks_exact(3).map(|v| Vec3::new(v[0], v[1], v[2]));
    let Some(first) = points.next() else {
        return Aabb::default();
    };
    let mut bb = Aabb::at_point(first);
    for p in points {
        bb.expand_point(p);
    }
    bb
}

impl BatchStore {
    /// Register every kind the registry knows up front. Nothing registers
    /// lazily later; unknown kinds fail loudly at the call site.
    pub fn new(registry: &BuildingRegistry) -> Self {
        let mut batches = HashMap::new();
        for kind in registry.registered_kinds() {
            if let Some(s) = registry.settings(kind) {
                batches.insert(
                    kind,
                    KindBatch {
                        tracked: HashSet::new(),
                        combined: None,
                        use_combined: s.use_combined,
                        preserve_originals: s.preserve_originals,
                        edge_aligned: s.edge_aligned,
                        combined_visible: s.use_combined,
                    },
                );
            }
        }
        Self {
            batches,
            dirty: HashSet::new(),
        }
    }

    /// Queue a kind for rebuild on the next flush. Idempotent and O(1);
    /// nothing is rebuilt immediately.
    pub fn mark_dirty(&mut self, kind: BuildingKind) {
        if !self.batches.contains_key(&kind) {
            log::error!("mark_dirty for unregistered building kind {:?}", kind);
            return;
        }
        self.dirty.insert(kind);
    }

    pub fn add_tracked(&mut self, kind: BuildingKind, pos: GridPos) {
        let Some(batch) = self.batches.get_mut(&kind) else {
            log::error!("add_tracked for unregistered building kind {:?}", kind);
            return;
        };
        batch.tracked.insert(pos);
        self.dirty.insert(kind);
    }

    pub fn remove_tracked(&mut self, kind: BuildingKind, pos: GridPos) {
        let Some(batch) = self.batches.get_mut(&kind) else {
            log::error!("remove_tracked for unregistered building kind {:?}", kind);
            return;
        };
        batch.tracked.remove(&pos);
        self.dirty.insert(kind);
    }

    pub fn tracked_len(&self, kind: BuildingKind) -> usize {
        self.batches.get(&kind).map_or(0, |b| b.tracked.len())
    }

    pub fn is_dirty(&self, kind: BuildingKind) -> bool {
        self.dirty.contains(&kind)
    }

    /// Disabling hides the combined output (individual pieces come back only
    /// when the kind preserves its originals); enabling schedules a rebuild.
    pub fn set_use_combined(&mut self, kind: BuildingKind, enabled: bool) {
        let Some(batch) = self.batches.get_mut(&kind) else {
            log::error!("set_use_combined for unregistered building kind {:?}", kind);
            return;
        };
        batch.use_combined = enabled;
        batch.combined_visible = enabled;
        if enabled {
            self.dirty.insert(kind);
        }
    }

    /// True when the kind currently renders as loose per-piece objects.
    pub fn individuals_visible(&self, kind: BuildingKind) -> bool {
        self.batches
            .get(&kind)
            .is_some_and(|b| !b.use_combined && b.preserve_originals)
    }

    pub fn combined(&self, kind: BuildingKind) -> Option<&CombinedMesh> {
        let batch = self.batches.get(&kind)?;
        if !batch.combined_visible {
            return None;
        }
        batch.combined.as_ref()
    }

    /// Once-per-tick drain: rebuild every dirty kind that combines, drop the
    /// rest, then clear the whole dirty set unconditionally. Returns the
    /// kinds whose combined output changed.
    pub fn flush_dirty(&mut self, grid: &GridMap, bank: &MeshBank) -> Vec<BuildingKind> {
        let mut updated = Vec::new();
        // Fixed kind order keeps rebuild sequence deterministic.
        for kind in BuildingKind::PLACEABLE {
            if !self.dirty.contains(&kind) {
                continue;
            }
            let combines = self.batches.get(&kind).is_some_and(|b| b.use_combined);
            if combines && self.rebuild(kind, grid, bank) {
                updated.push(kind);
            }
        }
        self.dirty.clear();
        updated
    }

    /// Rebuild one kind's combined geometry from its tracked positions.
    /// Returns true when the combined output changed.
    pub fn rebuild(&mut self, kind: BuildingKind, grid: &GridMap, bank: &MeshBank) -> bool {
        let Some(batch) = self.batches.get_mut(&kind) else {
            log::error!("rebuild for unregistered building kind {:?}", kind);
            return false;
        };
        if batch.tracked.is_empty() {
            return batch.combined.take().is_some();
        }
        let Some(source) = bank.source(kind) else {
            // Keeping the stale combined output beats replacing it with
            // nothing mid-session.
            log::error!("no source mesh/material for {:?}; rebuild aborted", kind);
            return false;
        };

        let mut positions: Vec<GridPos> = batch.tracked.iter().copied().collect();
        positions.sort_by_key(|p| (p.y, p.x));

        let mut build = match batch.combined.take() {
            Some(prev) => {
                let mut b = prev.build;
                b.clear_keep_capacity();
                b
            }
            None => MeshBuild::default(),
        };
        let half_cell = grid.cell_size() * 0.5;
        for pos in positions {
            if batch.edge_aligned {
                // One entry per covered direction of this kind; a single
                // floor cell can contribute up to four.
                let Some(cell) = grid.cell(pos) else {
                    continue;
                };
                for (d, slot) in cell.slots() {
                    if slot.kind != kind {
                        continue;
                    }
                    let root = Transform::new(
                        grid.cell_center(pos) + edge_offset(d, half_cell),
                        edge_yaw(d),
                    );
                    build.append_transformed(&source.mesh, &root.then(source.child_offset), source.rgba);
                }
            } else {
                let root = Transform::from_pos(grid.cell_center(pos));
                build.append_transformed(&source.mesh, &root.then(source.child_offset), source.rgba);
            }
        }
        if build.is_empty() {
            return batch.combined.take().is_some();
        }
        let bbox = bbox_of(&build);
        let collider = CollisionProxy::from_build(&build);
        batch.combined = Some(CombinedMesh {
            kind,
            material: source.material,
            build,
            bbox,
            collider,
        });
        true
    }

    pub fn stats(&self) -> BatchStats {
        let mut stats = BatchStats {
            kinds: self.batches.len(),
            ..BatchStats::default()
        };
        for batch in self.batches.values() {
            stats.tracked_positions += batch.tracked.len();
            if let Some(c) = &batch.combined {
                stats.vertices += c.build.vertex_count();
                stats.triangles += c.build.triangle_count();
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MATERIALS: &str = r#"
        [materials]
        timber = [150, 110, 70, 255]
        plaster = [220, 215, 200, 255]
    "#;

    const BUILDINGS: &str = r#"
        [[buildings]]
        kind = "floor"
        material = "timber"
        extent = [1.0, 0.1, 1.0]

        [[buildings]]
        kind = "wall"
        material = "plaster"
        extent = [0.1, 2.0, 1.0]

        [[buildings]]
        kind = "door"
        material = "timber"
        extent = [0.1, 1.9, 0.9]
    "#;

    fn fixture() -> (BuildingRegistry, MeshBank, GridMap, BatchStore) {
        let reg = BuildingRegistry::from_toml_strs(MATERIALS, BUILDINGS).unwrap();
        let bank = MeshBank::from_registry(&reg).unwrap();
        let grid = GridMap::new(10, 10, 1.0, Vec3::ZERO);
        let store = BatchStore::new(&reg);
        (reg, bank, grid, store)
    }

    fn occupy(grid: &mut GridMap, pos: GridPos, id: u32) {
        grid.mark_footprint(pos, (1, 1), true);
        grid.set_floor(pos, Some(id));
    }

    #[test]
    fn many_marks_one_rebuild_per_tick() {
        let (_reg, bank, mut grid, mut store) = fixture();
        for i in 0..5 {
            let p = GridPos::new(2 + i, 2);
            occupy(&mut grid, p, i as u32 + 1);
            store.add_tracked(BuildingKind::Floor, p);
            store.mark_dirty(BuildingKind::Floor);
        }
        let updated = store.flush_dirty(&grid, &bank);
        assert_eq!(updated, vec![BuildingKind::Floor]);
        // 5 instances of the 24-vertex box in a single combined mesh.
        let combined = store.combined(BuildingKind::Floor).unwrap();
        assert_eq!(combined.build.vertex_count(), 5 * 24);
        assert_eq!(combined.collider.indices.len(), combined.build.idx.len());
        // Nothing left dirty afterward.
        assert!(store.flush_dirty(&grid, &bank).is_empty());
    }

    #[test]
    fn wall_mode_emits_one_entry_per_covered_direction() {
        let (_reg, bank, mut grid, mut store) = fixture();
        let p = GridPos::new(4, 4);
        occupy(&mut grid, p, 1);
        grid.set_wall(p, Direction::Top, 2, BuildingKind::Wall);
        grid.set_wall(p, Direction::Right, 3, BuildingKind::Wall);
        grid.set_wall(p, Direction::Left, 4, BuildingKind::Door);
        store.add_tracked(BuildingKind::Wall, p);
        store.add_tracked(BuildingKind::Door, p);
        store.flush_dirty(&grid, &bank);

        // The door slot does not leak into the wall batch.
        let walls = store.combined(BuildingKind::Wall).unwrap();
        assert_eq!(walls.build.vertex_count(), 2 * 24);
        let doors = store.combined(BuildingKind::Door).unwrap();
        assert_eq!(doors.build.vertex_count(), 24);

        // Top edge: the Z-long source turns 90 degrees to run along X.
        let center = grid.cell_center(p);
        let bb = walls.bbox;
        assert!(bb.max.z - center.z > 0.4, "top wall reaches the +z boundary");
        assert!(bb.max.x - center.x > 0.4, "right wall reaches the +x boundary");
    }

    #[test]
    fn empty_tracked_set_clears_combined() {
        let (_reg, bank, mut grid, mut store) = fixture();
        let p = GridPos::new(1, 1);
        occupy(&mut grid, p, 1);
        store.add_tracked(BuildingKind::Floor, p);
        store.flush_dirty(&grid, &bank);
        assert!(store.combined(BuildingKind::Floor).is_some());

        store.remove_tracked(BuildingKind::Floor, p);
        let updated = store.flush_dirty(&grid, &bank);
        assert_eq!(updated, vec![BuildingKind::Floor]);
        assert!(store.combined(BuildingKind::Floor).is_none());
    }

    #[test]
    fn missing_source_keeps_stale_geometry() {
        let (_reg, bank, mut grid, mut store) = fixture();
        let p = GridPos::new(1, 1);
        occupy(&mut grid, p, 1);
        store.add_tracked(BuildingKind::Floor, p);
        store.flush_dirty(&grid, &bank);
        let before = store.combined(BuildingKind::Floor).unwrap().build.vertex_count();

        // Second edit, but the bank has lost its sources.
        let q = GridPos::new(2, 1);
        occupy(&mut grid, q, 2);
        store.add_tracked(BuildingKind::Floor, q);
        let updated = store.flush_dirty(&grid, &MeshBank::new());
        assert!(updated.is_empty());
        let after = store.combined(BuildingKind::Floor).unwrap().build.vertex_count();
        assert_eq!(before, after);
    }

    #[test]
    fn disabled_combining_drops_dirty_without_rebuild() {
        let (_reg, bank, mut grid, mut store) = fixture();
        let p = GridPos::new(1, 1);
        occupy(&mut grid, p, 1);
        store.add_tracked(BuildingKind::Floor, p);
        store.set_use_combined(BuildingKind::Floor, false);
        let updated = store.flush_dirty(&grid, &bank);
        assert!(updated.is_empty());
        assert!(store.combined(BuildingKind::Floor).is_none());
        assert!(!store.is_dirty(BuildingKind::Floor));

        // Re-enabling schedules the rebuild again.
        store.set_use_combined(BuildingKind::Floor, true);
        let updated = store.flush_dirty(&grid, &bank);
        assert_eq!(updated, vec![BuildingKind::Floor]);
        assert!(store.combined(BuildingKind::Floor).is_some());
    }
}
