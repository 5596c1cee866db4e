use std::error::Error;
use std::fs;
use std::path::Path;

use super::config::BuildingsConfig;
use super::material::MaterialCatalog;
use super::types::{BuildingKind, MaterialId};

pub const DEFAULT_DOOR_TRANSITION_TICKS: u64 = 12;

/// Compiled per-kind settings. Everything the placement and rebuild paths
/// need is resolved up front; nothing is registered lazily at runtime.
#[derive(Clone, Debug)]
pub struct BuildingSettings {
    pub kind: BuildingKind,
    pub material: MaterialId,
    pub extent: [f32; 3],
    pub child_offset: ([f32; 3], f32),
    pub footprint: (i32, i32),
    pub use_combined: bool,
    pub preserve_originals: bool,
    pub edge_aligned: bool,
}

#[derive(Default, Clone, Debug)]
pub struct BuildingRegistry {
    pub materials: MaterialCatalog,
    settings: Vec<Option<BuildingSettings>>,
    pub door_transition_ticks: u64,
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

impl BuildingRegistry {
    /// Look up settings for a kind. `None` means the kind was never
    /// registered; callers treat that as a configuration error and log it
    /// rather than inventing defaults.
    #[inline]
    pub fn settings(&self, kind: BuildingKind) -> Option<&BuildingSettings> {
        self.settings.get(kind_slot(kind)).and_then(|s| s.as_ref())
    }

    pub fn registered_kinds(&self) -> impl Iterator<Item = BuildingKind> + '_ {
        self.settings
            .iter()
            .filter_map(|s| s.as_ref().map(|s| s.kind))
    }

    pub fn load_from_paths(
        materials_path: impl AsRef<Path>,
        buildings_path: impl AsRef<Path>,
    ) -> Result<Self, Box<dyn Error>> {
        let materials = MaterialCatalog::from_path(materials_path)?;
        let toml_str = fs::read_to_string(buildings_path)?;
        let cfg: BuildingsConfig = toml::from_str(&toml_str)?;
        Self::from_configs(materials, cfg)
    }

    pub fn from_toml_strs(
        materials_toml: &str,
        buildings_toml: &str,
    ) -> Result<Self, Box<dyn Error>> {
        let materials = MaterialCatalog::from_toml_str(materials_toml)?;
        let cfg: BuildingsConfig = toml::from_str(buildings_toml)?;
        Self::from_configs(materials, cfg)
    }

    pub fn from_configs(
        materials: MaterialCatalog,
        cfg: BuildingsConfig,
    ) -> Result<Self, Box<dyn Error>> {
        let mut reg = BuildingRegistry {
            materials,
            settings: vec![None; 4],
            door_transition_ticks: cfg
                .doors
                .and_then(|d| d.transition_ticks)
                .unwrap_or(DEFAULT_DOOR_TRANSITION_TICKS),
        };
        for def in cfg.buildings.into_iter() {
            let kind = BuildingKind::from_name(&def.kind)
                .ok_or_else(|| format!("unknown building kind in config: {:?}", def.kind))?;
            if kind.is_none() {
                return Err("the \"none\" sentinel cannot be configured as a building".into());
            }
            let material = reg
                .materials
                .get_id(&def.material)
                .ok_or_else(|| format!("building {:?} references unknown material {:?}", def.kind, def.material))?;
            let footprint = def.footprint.unwrap_or([1, 1]);
            if footprint[0] < 1 || footprint[1] < 1 {
                return Err(format!("building {:?} has a degenerate footprint", def.kind).into());
            }
            let child_offset = def
                .child_offset
                .map(|c| (c.pos, c.yaw_deg.unwrap_or(0.0)))
                .unwrap_or(([0.0, 0.0, 0.0], 0.0));
            let slot = kind_slot(kind);
            if reg.settings[slot].is_some() {
                return Err(format!("building kind {:?} configured twice", def.kind).into());
            }
            reg.settings[slot] = Some(BuildingSettings {
                kind,
                material,
                extent: def.extent,
                child_offset,
                footprint: (footprint[0], footprint[1]),
                use_combined: def.use_combined.unwrap_or(true),
                preserve_originals: def.preserve_originals.unwrap_or(false),
                edge_aligned: def.edge_aligned.unwrap_or(kind.attaches_to_edge()),
            });
        }
        Ok(reg)
    }
}
