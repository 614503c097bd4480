//! Grid Coordinates and Directions
//!
//! Integer board coordinates and the four move directions.
//! Every directional algorithm is written once against `Direction::delta`.

use std::fmt;
use serde::{Serialize, Deserialize};

/// A slot coordinate on the board.
///
/// `x` is the column (0 = left edge), `y` is the row (0 = top edge).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Coord {
    /// Column
    pub x: u8,
    /// Row
    pub y: u8,
}

impl Coord {
    /// Create a new coordinate.
    #[inline]
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Check if this coordinate lies on a `size` × `size` board.
    #[inline]
    pub fn in_bounds(self, size: u8) -> bool {
        self.x < size && self.y < size
    }

    /// Row-major slot index on a `size` × `size` board.
    #[inline]
    pub fn index(self, size: u8) -> usize {
        self.y as usize * size as usize + self.x as usize
    }

    /// Inverse of [`Coord::index`].
    #[inline]
    pub fn from_index(index: usize, size: u8) -> Self {
        let size = size as usize;
        Self::new((index % size) as u8, (index / size) as u8)
    }

    /// The neighbouring coordinate one slot in `direction`.
    ///
    /// Returns `None` when the step would leave the board.
    #[inline]
    pub fn step(self, direction: Direction, size: u8) -> Option<Self> {
        let (dx, dy) = direction.delta();
        let x = self.x as i16 + dx as i16;
        let y = self.y as i16 + dy as i16;
        if x < 0 || y < 0 || x >= size as i16 || y >= size as i16 {
            None
        } else {
            Some(Self::new(x as u8, y as u8))
        }
    }

    /// Check whether `other` is exactly one step away in `direction`.
    pub fn is_adjacent(self, other: Self, direction: Direction) -> bool {
        let (dx, dy) = direction.delta();
        other.x as i16 - self.x as i16 == dx as i16 && other.y as i16 - self.y as i16 == dy as i16
    }
}

impl fmt::Debug for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the four move directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    /// Towards row 0
    Up = 0,
    /// Towards the last row
    Down = 1,
    /// Towards column 0
    Left = 2,
    /// Towards the last column
    Right = 3,
}

impl Direction {
    /// All directions in wire order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit step `(dx, dy)` for this direction.
    #[inline]
    pub const fn delta(self) -> (i8, i8) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// The reverse direction.
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// True for `Left`/`Right`.
    #[inline]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// Lowercase name, as accepted by the input parser.
    pub const fn name(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Coordinates of one line, ordered from the edge `self` points at
    /// back towards the opposite edge.
    ///
    /// `lane` selects the row (horizontal moves) or column (vertical moves).
    pub fn line(self, lane: u8, size: u8) -> impl Iterator<Item = Coord> {
        (0..size).map(move |i| {
            let far = size - 1 - i;
            match self {
                Direction::Right => Coord::new(far, lane),
                Direction::Left => Coord::new(i, lane),
                Direction::Down => Coord::new(lane, far),
                Direction::Up => Coord::new(lane, i),
            }
        })
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_roundtrip_corners() {
        let size = 4;
        assert_eq!(Coord::new(0, 0).index(size), 0);
        assert_eq!(Coord::new(3, 0).index(size), 3);
        assert_eq!(Coord::new(0, 1).index(size), 4);
        assert_eq!(Coord::from_index(15, size), Coord::new(3, 3));
    }

    #[test]
    fn test_step_respects_edges() {
        assert_eq!(Coord::new(0, 0).step(Direction::Left, 4), None);
        assert_eq!(Coord::new(0, 0).step(Direction::Up, 4), None);
        assert_eq!(Coord::new(3, 3).step(Direction::Right, 4), None);
        assert_eq!(Coord::new(3, 3).step(Direction::Down, 4), None);
        assert_eq!(Coord::new(1, 1).step(Direction::Right, 4), Some(Coord::new(2, 1)));
        assert_eq!(Coord::new(1, 1).step(Direction::Up, 4), Some(Coord::new(1, 0)));
    }

    #[test]
    fn test_opposite_is_involution() {
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
            assert_ne!(dir.opposite(), dir);
        }
    }

    #[test]
    fn test_line_starts_at_target_edge() {
        let right: Vec<_> = Direction::Right.line(2, 4).collect();
        assert_eq!(right.first(), Some(&Coord::new(3, 2)));
        assert_eq!(right.last(), Some(&Coord::new(0, 2)));

        let up: Vec<_> = Direction::Up.line(1, 4).collect();
        assert_eq!(up.first(), Some(&Coord::new(1, 0)));
        assert_eq!(up.last(), Some(&Coord::new(1, 3)));
    }

    #[test]
    fn test_adjacency_check() {
        let a = Coord::new(1, 1);
        assert!(a.is_adjacent(Coord::new(2, 1), Direction::Right));
        assert!(!a.is_adjacent(Coord::new(3, 1), Direction::Right));
        assert!(a.is_adjacent(Coord::new(1, 0), Direction::Up));
    }
}
