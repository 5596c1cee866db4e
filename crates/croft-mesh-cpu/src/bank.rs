use std::error::Error;

use croft_buildings::{BuildingKind, BuildingRegistry, MaterialId};
use croft_geom::{Transform, Vec3};

use crate::mesh_build::MeshBuild;
use crate::primitives::box_mesh;

/// Source geometry for one building kind: the mesh itself, the pivot
/// correction from the asset's child mesh to its root, and the resolved
/// material. Every entry is created up front at load time.
#[derive(Clone)]
pub struct MeshSource {
    pub mesh: MeshBuild,
    pub child_offset: Transform,
    pub material: MaterialId,
    pub rgba: [u8; 4],
}

#[derive(Default, Clone)]
pub struct MeshBank {
    sources: Vec<Option<MeshSource>>,
}

#[inline]
fn kind_slot(kind: BuildingKind) -> usize {
    match kind {
        BuildingKind::None => 0,
        BuildingKind::Floor => 1,
        BuildingKind::Wall => 2,
        BuildingKind::Door => 3,
    }
}

impl MeshBank {
    pub fn new() -> Self {
        Self {
            sources: vec![None; 4],
        }
    }

    /// Generate a box source per registered kind from its configured extent.
    /// A kind whose material cannot be resolved is a load-time error.
    pub fn from_registry(registry: &BuildingRegistry) -> Result<Self, Box<dyn Error>> {
        let mut bank = Self::new();
        for kind in registry.registered_kinds() {
            let settings = registry
                .settings(kind)
                .ok_or_else(|| format!("no settings for registered kind {:?}", kind))?;
            let material = registry
                .materials
                .get(settings.material)
                .ok_or_else(|| format!("kind {:?} resolves to a missing material", kind))?;
            let (off_pos, off_yaw) = settings.child_offset;
            bank.insert(
                kind,
                MeshSource {
                    mesh: box_mesh(settings.extent),
                    child_offset: Transform::new(
                        Vec3::new(off_pos[0], off_pos[1], off_pos[2]),
                        off_yaw,
                    ),
                    material: settings.material,
                    rgba: material.rgba,
                },
            );
        }
        Ok(bank)
    }

    pub fn insert(&mut self, kind: BuildingKind, source: MeshSource) {
        self.sources[kind_slot(kind)] = Some(source);
    }

    #[inline]
    pub fn source(&self, kind: BuildingKind) -> Option<&MeshSource> {
        self.sources.get(kind_slot(kind)).and_then(|s| s.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MATERIALS: &str = r#"
        [materials]
        timber = [150, 110, 70, 255]
    "#;

    const BUILDINGS: &str = r#"
        [[buildings]]
        kind = "floor"
        material = "timber"
        extent = [1.0, 0.1, 1.0]

        [[buildings]]
        kind = "wall"
        material = "timber"
        extent = [1.0, 2.0, 0.1]
        child_offset = { pos = [0.0, 0.0, 0.05], yaw_deg = 0.0 }
    "#;

    #[test]
    fn bank_covers_registered_kinds_only() {
        let reg = BuildingRegistry::from_toml_strs(MATERIALS, BUILDINGS).unwrap();
        let bank = MeshBank::from_registry(&reg).unwrap();
        assert!(bank.source(BuildingKind::Floor).is_some());
        let wall = bank.source(BuildingKind::Wall).unwrap();
        assert_eq!(wall.mesh.vertex_count(), 24);
        assert!((wall.child_offset.pos.z - 0.05).abs() < 1e-6);
        assert!(bank.source(BuildingKind::Door).is_none());
        assert!(bank.source(BuildingKind::None).is_none());
    }
}
