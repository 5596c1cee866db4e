use croft_buildings::BuildingKind;

use crate::direction::{Direction, DirectionMask};
use crate::entity::EntityId;

/// One occupied wall/door slot on a floor cell boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotEntry {
    pub entity: EntityId,
    pub kind: BuildingKind,
}

/// One grid cell: floor occupancy plus the fixed four-slot wall table.
/// A slot may only be filled while the cell is occupied.
#[derive(Clone, Debug, Default)]
pub struct Cell {
    pub occupied: bool,
    pub floor: Option<EntityId>,
    walls: [Option<SlotEntry>; 4],
}

impl Cell {
    #[inline]
    pub fn slot(&self, d: Direction) -> Option<&SlotEntry> {
        self.walls[d.index()].as_ref()
    }

    #[inline]
    pub fn is_covered(&self, d: Direction) -> bool {
        self.walls[d.index()].is_some()
    }

    /// Write a slot unconditionally; grid-level validation happens first.
    #[inline]
    pub fn set_slot(&mut self, d: Direction, entry: SlotEntry) {
        self.walls[d.index()] = Some(entry);
    }

    /// Empty a slot, returning what was there.
    #[inline]
    pub fn clear_slot(&mut self, d: Direction) -> Option<SlotEntry> {
        self.walls[d.index()].take()
    }

    pub fn covered_mask(&self) -> DirectionMask {
        let mut m = DirectionMask::EMPTY;
        for d in Direction::ALL {
            if self.is_covered(d) {
                m.insert(d);
            }
        }
        m
    }

    #[inline]
    pub fn has_walls(&self) -> bool {
        self.walls.iter().any(|w| w.is_some())
    }

    /// A floor may be destroyed only once all four slots are empty.
    #[inline]
    pub fn destroyable(&self) -> bool {
        !self.has_walls()
    }

    pub fn slots(&self) -> impl Iterator<Item = (Direction, &SlotEntry)> {
        Direction::ALL
            .into_iter()
            .filter_map(|d| self.walls[d.index()].as_ref().map(|e| (d, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn destroyable_tracks_slot_state() {
        let mut cell = Cell {
            occupied: true,
            ..Cell::default()
        };
        assert!(cell.destroyable());
        cell.set_slot(
            Direction::Top,
            SlotEntry {
                entity: 1,
                kind: BuildingKind::Wall,
            },
        );
        assert!(!cell.destroyable());
        assert!(cell.is_covered(Direction::Top));
        assert!(!cell.is_covered(Direction::Bottom));
        let prev = cell.clear_slot(Direction::Top);
        assert_eq!(prev.map(|e| e.entity), Some(1));
        assert!(cell.destroyable());
    }

    #[test]
    fn covered_mask_mirrors_slots() {
        let mut cell = Cell::default();
        cell.set_slot(
            Direction::Left,
            SlotEntry {
                entity: 7,
                kind: BuildingKind::Door,
            },
        );
        let m = cell.covered_mask();
        assert!(m.contains(Direction::Left));
        assert_eq!(m.iter().count(), 1);
    }
}
