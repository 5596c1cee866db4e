use serde::{Deserialize, Serialize};

/// Placeable building category. `None` is the empty sentinel used by slots
/// and previews; it never has registry settings.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingKind {
    #[default]
    None,
    Floor,
    Wall,
    Door,
}

impl BuildingKind {
    /// Kinds that can actually be placed, in registry order.
    pub const PLACEABLE: [BuildingKind; 3] =
        [BuildingKind::Floor, BuildingKind::Wall, BuildingKind::Door];

    #[inline]
    pub fn is_none(self) -> bool {
        matches!(self, BuildingKind::None)
    }

    /// Wall and door pieces attach to a floor edge rather than a whole cell.
    #[inline]
    pub fn attaches_to_edge(self) -> bool {
        matches!(self, BuildingKind::Wall | BuildingKind::Door)
    }

    pub fn name(self) -> &'static str {
        match self {
            BuildingKind::None => "none",
            BuildingKind::Floor => "floor",
            BuildingKind::Wall => "wall",
            BuildingKind::Door => "door",
        }
    }

    pub fn from_name(s: &str) -> Option<BuildingKind> {
        match s {
            "none" => Some(BuildingKind::None),
            "floor" => Some(BuildingKind::Floor),
            "wall" => Some(BuildingKind::Wall),
            "door" => Some(BuildingKind::Door),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct MaterialId(pub u16);
