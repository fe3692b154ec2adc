use bitflags::bitflags;

use crate::maze::Direction;

bitflags! {
    /// Per-cell state of a bitmask maze. The four direction bits record which walls were
    /// carved open from this cell; a cell with no bits at all has not been visited yet.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct CellFlags: u8 {
        const UP = 1;
        const RIGHT = 2;
        const DOWN = 4;
        const LEFT = 8;
        /// Reached during carving with nowhere left to go.
        const DEAD = 16;
        /// Excluded from generation altogether.
        const MASKED = 32;
    }
}

impl CellFlags {
    pub const OPENINGS: CellFlags = CellFlags::UP
        .union(CellFlags::RIGHT)
        .union(CellFlags::DOWN)
        .union(CellFlags::LEFT);

    pub fn opening(direction: Direction) -> CellFlags {
        match direction {
            Direction::Up => CellFlags::UP,
            Direction::Right => CellFlags::RIGHT,
            Direction::Down => CellFlags::DOWN,
            Direction::Left => CellFlags::LEFT,
        }
    }

    pub fn is_masked(self) -> bool {
        self.contains(CellFlags::MASKED)
    }

    pub fn is_dead(self) -> bool {
        self.contains(CellFlags::DEAD)
    }

    /// Never visited by a carve and not masked either.
    pub fn is_untouched(self) -> bool {
        self.is_empty()
    }

    /// Directions carved open from this cell.
    pub fn openings(self) -> impl Iterator<Item = Direction> {
        Direction::ALL
            .into_iter()
            .filter(move |&d| self.contains(CellFlags::opening(d)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_values() {
        assert_eq!(CellFlags::UP.bits(), 1);
        assert_eq!(CellFlags::RIGHT.bits(), 2);
        assert_eq!(CellFlags::DOWN.bits(), 4);
        assert_eq!(CellFlags::LEFT.bits(), 8);
        assert_eq!(CellFlags::DEAD.bits(), 16);
        assert_eq!(CellFlags::MASKED.bits(), 32);
        assert_eq!(CellFlags::OPENINGS.bits(), 15);
    }

    #[test]
    fn test_openings_are_or_combinable() {
        let flags = CellFlags::opening(Direction::Up) | CellFlags::opening(Direction::Left);
        assert_eq!(
            flags.openings().collect::<Vec<_>>(),
            vec![Direction::Up, Direction::Left]
        );
        assert!(!flags.is_untouched());
        assert!(CellFlags::default().is_untouched());
        assert!((CellFlags::DEAD | CellFlags::RIGHT).is_dead());
    }
}
