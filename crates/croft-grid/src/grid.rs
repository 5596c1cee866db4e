use croft_buildings::BuildingKind;
use croft_geom::Vec3;

use crate::cell::{Cell, SlotEntry};
use crate::chunk::{CHUNK_SIZE, Chunk, ChunkCoord};
use crate::coords::GridPos;
use crate::direction::Direction;
use crate::entity::EntityId;

#[derive(Default, Debug, Clone, Copy)]
pub struct GridStats {
    pub chunks: usize,
    pub occupied_cells: usize,
    pub wall_slots: usize,
}

/// One occupied cell as seen by the persistence walk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellWalkEntry {
    pub local: (i32, i32),
    pub floor: EntityId,
    pub slots: Vec<(u8, EntityId, BuildingKind)>,
}

/// The world occupancy grid. Dimensions, cell size, and world origin are
/// fixed at construction; every chunk is pre-allocated up front and lives
/// as long as the grid.
pub struct GridMap {
    width: i32,
    height: i32,
    cell_size: f32,
    origin: Vec3,
    chunks_x: i32,
    chunks_y: i32,
    chunks: Vec<Chunk>,
}

impl GridMap {
    pub fn new(width: i32, height: i32, cell_size: f32, origin: Vec3) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let chunks_x = (width + CHUNK_SIZE - 1) / CHUNK_SIZE;
        let chunks_y = (height + CHUNK_SIZE - 1) / CHUNK_SIZE;
        let mut chunks = Vec::with_capacity((chunks_x * chunks_y) as usize);
        for cy in 0..chunks_y {
            for cx in 0..chunks_x {
                chunks.push(Chunk::new(ChunkCoord::new(cx, cy)));
            }
        }
        Self {
            width,
            height,
            cell_size,
            origin,
            chunks_x,
            chunks_y,
            chunks,
        }
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    // --- cell addressing ---

    #[inline]
    pub fn is_valid_position(&self, pos: GridPos) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    #[inline]
    fn locate(&self, pos: GridPos) -> Option<(usize, i32, i32)> {
        if !self.is_valid_position(pos) {
            return None;
        }
        let cx = pos.x.div_euclid(CHUNK_SIZE);
        let cy = pos.y.div_euclid(CHUNK_SIZE);
        let lx = pos.x.rem_euclid(CHUNK_SIZE);
        let ly = pos.y.rem_euclid(CHUNK_SIZE);
        Some(((cy * self.chunks_x + cx) as usize, lx, ly))
    }

    pub fn cell(&self, pos: GridPos) -> Option<&Cell> {
        let (ci, lx, ly) = self.locate(pos)?;
        Some(self.chunks[ci].get_local(lx, ly))
    }

    pub fn cell_mut(&mut self, pos: GridPos) -> Option<&mut Cell> {
        let (ci, lx, ly) = self.locate(pos)?;
        Some(self.chunks[ci].get_local_mut(lx, ly))
    }

    // --- occupancy ---

    #[inline]
    pub fn is_cell_occupied(&self, pos: GridPos) -> bool {
        self.cell(pos).is_some_and(|c| c.occupied)
    }

    pub fn footprint_cells(origin: GridPos, size: (i32, i32)) -> impl Iterator<Item = GridPos> {
        (0..size.1.max(0)).flat_map(move |dy| (0..size.0.max(0)).map(move |dx| origin.offset(dx, dy)))
    }

    /// True iff every covered cell is in range and unoccupied.
    pub fn can_place_footprint(&self, origin: GridPos, size: (i32, i32)) -> bool {
        if size.0 < 1 || size.1 < 1 {
            return false;
        }
        Self::footprint_cells(origin, size)
            .all(|p| self.is_valid_position(p) && !self.is_cell_occupied(p))
    }

    pub fn mark_footprint(&mut self, origin: GridPos, size: (i32, i32), occupied: bool) {
        for p in Self::footprint_cells(origin, size) {
            if let Some(cell) = self.cell_mut(p) {
                cell.occupied = occupied;
            }
        }
    }

    // --- floors ---

    pub fn set_floor(&mut self, pos: GridPos, floor: Option<EntityId>) {
        if let Some(cell) = self.cell_mut(pos) {
            cell.floor = floor;
        }
    }

    #[inline]
    pub fn floor_at(&self, pos: GridPos) -> Option<EntityId> {
        self.cell(pos).and_then(|c| c.floor)
    }

    /// Floor of the neighbor cell across the boundary, if that cell is in
    /// range and occupied.
    pub fn adjacent_floor(&self, pos: GridPos, d: Direction) -> Option<EntityId> {
        let n = pos.toward(d);
        self.cell(n).filter(|c| c.occupied).and_then(|c| c.floor)
    }

    // --- wall slots ---

    /// Write a wall/door slot. Silent no-op when the cell has no floor:
    /// callers are expected to have validated with `wall_placement_allowed`.
    pub fn set_wall(&mut self, pos: GridPos, d: Direction, entity: EntityId, kind: BuildingKind) {
        if let Some(cell) = self.cell_mut(pos) {
            if cell.occupied {
                cell.set_slot(d, SlotEntry { entity, kind });
            }
        }
    }

    pub fn clear_wall(&mut self, pos: GridPos, d: Direction) -> Option<SlotEntry> {
        self.cell_mut(pos).and_then(|c| c.clear_slot(d))
    }

    #[inline]
    pub fn is_direction_covered(&self, pos: GridPos, d: Direction) -> bool {
        self.cell(pos).is_some_and(|c| c.is_covered(d))
    }

    pub fn slot_at(&self, pos: GridPos, d: Direction) -> Option<SlotEntry> {
        self.cell(pos).and_then(|c| c.slot(d).copied())
    }

    /// A wall may go on `(pos, d)` only when the cell holds a floor, its own
    /// slot is free, and the adjacent floor (if any) has no wall on the
    /// opposite side of the same boundary. Two colliding walls must never
    /// describe one boundary.
    pub fn wall_placement_allowed(&self, pos: GridPos, d: Direction) -> bool {
        if !self.is_cell_occupied(pos) {
            return false;
        }
        if self.is_direction_covered(pos, d) {
            return false;
        }
        let n = pos.toward(d);
        if self.is_cell_occupied(n) && self.is_direction_covered(n, d.opposite()) {
            return false;
        }
        true
    }

    // --- world <-> grid ---

    /// Cell containing a world-space point.
    pub fn world_to_grid(&self, p: Vec3) -> GridPos {
        GridPos::new(
            ((p.x - self.origin.x) / self.cell_size).floor() as i32,
            ((p.z - self.origin.z) / self.cell_size).floor() as i32,
        )
    }

    pub fn cell_center(&self, pos: GridPos) -> Vec3 {
        Vec3::new(
            self.origin.x + (pos.x as f32 + 0.5) * self.cell_size,
            self.origin.y,
            self.origin.z + (pos.y as f32 + 0.5) * self.cell_size,
        )
    }

    /// Classify which boundary of `pos` a world hit point selects: the angle
    /// around the cell center is bucketed into four 90-degree sectors, each
    /// a +/-45-degree window around its cardinal axis.
    pub fn hit_direction(&self, pos: GridPos, hit: Vec3) -> Direction {
        let center = self.cell_center(pos);
        let dx = hit.x - center.x;
        let dz = hit.z - center.z;
        if dz.abs() >= dx.abs() {
            if dz >= 0.0 { Direction::Top } else { Direction::Bottom }
        } else if dx >= 0.0 {
            Direction::Right
        } else {
            Direction::Left
        }
    }

    /// Nearest in-range cell to a world point.
    pub fn clamp_to_bounds(&self, pos: GridPos) -> GridPos {
        GridPos::new(
            pos.x.clamp(0, self.width - 1),
            pos.y.clamp(0, self.height - 1),
        )
    }

    // --- chunk walks ---

    pub fn chunk_coords(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.chunks.iter().map(|c| c.coord)
    }

    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        if coord.cx < 0 || coord.cx >= self.chunks_x || coord.cy < 0 || coord.cy >= self.chunks_y {
            return None;
        }
        Some(&self.chunks[(coord.cy * self.chunks_x + coord.cx) as usize])
    }

    /// Persistence walk: every occupied cell of a chunk with its floor and
    /// non-empty wall slots, in flat index order.
    pub fn walk_chunk(&self, coord: ChunkCoord) -> Vec<CellWalkEntry> {
        let Some(chunk) = self.chunk(coord) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for ((lx, ly), cell) in chunk.iter_cells() {
            let Some(floor) = cell.floor else {
                continue;
            };
            let slots = cell
                .slots()
                .map(|(d, e)| (d.index() as u8, e.entity, e.kind))
                .collect();
            out.push(CellWalkEntry {
                local: (lx, ly),
                floor,
                slots,
            });
        }
        out
    }

    /// Grid coordinates of a chunk-local cell.
    pub fn chunk_local_to_grid(coord: ChunkCoord, local: (i32, i32)) -> GridPos {
        GridPos::new(
            coord.cx * CHUNK_SIZE + local.0,
            coord.cy * CHUNK_SIZE + local.1,
        )
    }

    pub fn stats(&self) -> GridStats {
        let mut stats = GridStats {
            chunks: self.chunks.len(),
            ..GridStats::default()
        };
        for chunk in &self.chunks {
            for (_, cell) in chunk.iter_cells() {
                if cell.occupied {
                    stats.occupied_cells += 1;
                }
                stats.wall_slots += cell.slots().count();
            }
        }
        stats
    }
}
