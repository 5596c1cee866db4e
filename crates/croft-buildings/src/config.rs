use serde::Deserialize;

/// Top-level shape of `buildings.toml`.
#[derive(Deserialize)]
pub struct BuildingsConfig {
    pub buildings: Vec<BuildingDef>,
    pub doors: Option<DoorConfig>,
}

#[derive(Deserialize)]
pub struct BuildingDef {
    pub kind: String,
    pub material: String,
    /// Local-space extent of the generated source box, in world units.
    pub extent: [f32; 3],
    /// Pivot correction from the source asset's child mesh to its root.
    pub child_offset: Option<ChildOffsetDef>,
    /// Cells covered by one placement; floors may exceed 1x1.
    pub footprint: Option<[i32; 2]>,
    pub use_combined: Option<bool>,
    pub preserve_originals: Option<bool>,
    /// Edge-aligned kinds occupy one direction slot of a floor cell.
    pub edge_aligned: Option<bool>,
}

#[derive(Deserialize, Clone, Copy)]
pub struct ChildOffsetDef {
    pub pos: [f32; 3],
    pub yaw_deg: Option<f32>,
}

#[derive(Deserialize, Clone, Copy)]
pub struct DoorConfig {
    /// Ticks a door spends in its open/close transition window.
    pub transition_ticks: Option<u64>,
}
