use serde::{Deserialize, Serialize};

/// Cardinal attachment direction of a wall or door slot on a floor cell.
/// `Top` points toward +y in grid space.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Top,
    Right,
    Bottom,
    Left,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Top,
        Direction::Right,
        Direction::Bottom,
        Direction::Left,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Direction::Top => 0,
            Direction::Right => 1,
            Direction::Bottom => 2,
            Direction::Left => 3,
        }
    }

    #[inline]
    pub const fn from_index(i: usize) -> Option<Direction> {
        match i {
            0 => Some(Direction::Top),
            1 => Some(Direction::Right),
            2 => Some(Direction::Bottom),
            3 => Some(Direction::Left),
            _ => None,
        }
    }

    /// Involution pairing each direction with the one seen from the
    /// neighboring cell across the shared boundary.
    #[inline]
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Top => Direction::Bottom,
            Direction::Bottom => Direction::Top,
            Direction::Right => Direction::Left,
            Direction::Left => Direction::Right,
        }
    }

    /// Grid offset to the neighbor cell on the other side of this boundary.
    #[inline]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::Top => (0, 1),
            Direction::Right => (1, 0),
            Direction::Bottom => (0, -1),
            Direction::Left => (-1, 0),
        }
    }
}

/// Set of directions packed into the low nibble of a byte. The empty and
/// full masks stand in for the "no direction" / "all directions" sentinels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DirectionMask(pub u8);

impl DirectionMask {
    pub const EMPTY: DirectionMask = DirectionMask(0);
    pub const ALL: DirectionMask = DirectionMask(0b1111);

    #[inline]
    pub const fn single(d: Direction) -> DirectionMask {
        DirectionMask(1 << d.index())
    }

    #[inline]
    pub const fn contains(self, d: Direction) -> bool {
        self.0 & (1 << d.index()) != 0
    }

    #[inline]
    pub fn insert(&mut self, d: Direction) {
        self.0 |= 1 << d.index();
    }

    #[inline]
    pub fn remove(&mut self, d: Direction) {
        self.0 &= !(1 << d.index());
    }

    #[inline]
    pub const fn union(self, other: DirectionMask) -> DirectionMask {
        DirectionMask(self.0 | other.0)
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_all(self) -> bool {
        self.0 & 0b1111 == 0b1111
    }

    pub fn iter(self) -> impl Iterator<Item = Direction> {
        Direction::ALL.into_iter().filter(move |d| self.contains(*d))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_is_an_involution() {
        for d in Direction::ALL {
            assert_eq!(d.opposite().opposite(), d);
        }
        assert_eq!(Direction::Top.opposite(), Direction::Bottom);
        assert_eq!(Direction::Right.opposite(), Direction::Left);
    }

    #[test]
    fn indices_are_a_bijection() {
        for d in Direction::ALL {
            assert_eq!(Direction::from_index(d.index()), Some(d));
        }
        assert_eq!(Direction::from_index(4), None);
    }

    #[test]
    fn opposite_offsets_cancel() {
        for d in Direction::ALL {
            let (dx, dy) = d.offset();
            let (ox, oy) = d.opposite().offset();
            assert_eq!((dx + ox, dy + oy), (0, 0));
        }
    }

    #[test]
    fn mask_sentinels() {
        let mut m = DirectionMask::EMPTY;
        assert!(m.is_empty());
        for d in Direction::ALL {
            m.insert(d);
        }
        assert_eq!(m, DirectionMask::ALL);
        assert!(m.is_all());
        m.remove(Direction::Left);
        assert!(!m.is_all());
        assert!(m.contains(Direction::Top));
        assert!(!m.contains(Direction::Left));
        assert_eq!(m.iter().count(), 3);
    }
}
