//! Chunked occupancy grid: cells, directional wall slots, entity records.
#![forbid(unsafe_code)]

pub mod cell;
pub mod chunk;
pub mod coords;
pub mod direction;
pub mod entity;
pub mod grid;
pub mod replay;

pub use cell::{Cell, SlotEntry};
pub use chunk::{CHUNK_SIZE, Chunk, ChunkCoord};
pub use coords::GridPos;
pub use direction::{Direction, DirectionMask};
pub use entity::{DoorState, EdgeRecord, Entity, EntityId, EntityStore, FloorRecord};
pub use grid::{CellWalkEntry, GridMap, GridStats};
