use serde::{Deserialize, Serialize};

use crate::direction::Direction;

/// Integer cell coordinates, unique within the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Neighbor cell across the boundary in the given direction.
    #[inline]
    pub fn toward(self, d: Direction) -> Self {
        let (dx, dy) = d.offset();
        self.offset(dx, dy)
    }

    #[inline]
    pub fn distance_sq(self, other: GridPos) -> i64 {
        let dx = i64::from(self.x - other.x);
        let dy = i64::from(self.y - other.y);
        dx * dx + dy * dy
    }

    /// The eight surrounding cells, used for follow-up placement anchors.
    pub fn neighbors8(self) -> [GridPos; 8] {
        [
            self.offset(-1, -1),
            self.offset(0, -1),
            self.offset(1, -1),
            self.offset(-1, 0),
            self.offset(1, 0),
            self.offset(-1, 1),
            self.offset(0, 1),
            self.offset(1, 1),
        ]
    }
}

impl From<(i32, i32)> for GridPos {
    fn from(value: (i32, i32)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl From<GridPos> for (i32, i32) {
    fn from(value: GridPos) -> Self {
        (value.x, value.y)
    }
}
