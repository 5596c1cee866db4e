//! CPU-side combined geometry: mesh building, per-kind batching, rebuilds.
#![forbid(unsafe_code)]

pub mod bank;
pub mod batch;
pub mod mesh_build;
pub mod primitives;

pub use bank::{MeshBank, MeshSource};
pub use batch::{BatchStats, BatchStore, CollisionProxy, CombinedMesh, edge_offset, edge_yaw};
pub use mesh_build::MeshBuild;
