//! Building kinds, materials, and the per-kind settings registry.
#![forbid(unsafe_code)]

pub mod config;
pub mod material;
pub mod registry;
pub mod types;

pub use material::MaterialCatalog;
pub use registry::{BuildingRegistry, BuildingSettings};
pub use types::{BuildingKind, MaterialId};
