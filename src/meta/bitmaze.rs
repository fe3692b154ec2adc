use std::collections::{HashSet, VecDeque};

use rand::Rng;

use super::flags::CellFlags;
use crate::error::{MazeError, Result};
use crate::maze::{Coord, Direction, Maze};

/// A maze where every cell is a room and walls live between rooms, recorded as
/// [`CellFlags`] direction bits on the cell they were carved from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitMaze {
    cells: Box<[CellFlags]>,
    width: u16,
    height: u16,
}

impl BitMaze {
    pub fn new(width: u16, height: u16) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(MazeError::InvalidSector { width, height });
        }
        Ok(BitMaze {
            cells: vec![CellFlags::empty(); width as usize * height as usize].into_boxed_slice(),
            width,
            height,
        })
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn cells(&self) -> &[CellFlags] {
        &self.cells
    }

    pub fn is_in_bounds(&self, coord: Coord) -> bool {
        coord.0 < self.width && coord.1 < self.height
    }

    fn ravel_index(&self, coord: Coord) -> usize {
        coord.1 as usize * self.width as usize + coord.0 as usize
    }

    /// ORs `flags` into the cell.
    pub fn insert(&mut self, coord: Coord, flags: CellFlags) {
        let idx = self.ravel_index(coord);
        self.cells[idx] |= flags;
    }

    pub(crate) fn replace(&mut self, coord: Coord, flags: CellFlags) {
        let idx = self.ravel_index(coord);
        self.cells[idx] = flags;
    }

    pub fn neighbor(&self, coord: Coord, direction: Direction) -> Option<Coord> {
        let (dx, dy) = direction.delta();
        let x = coord.0.checked_add_signed(dx as i16)?;
        let y = coord.1.checked_add_signed(dy as i16)?;
        self.is_in_bounds((x, y)).then_some((x, y))
    }

    /// Whether the wall between `coord` and its neighbour in `direction` is open. Either
    /// side's bit counts, but masked cells are never passable.
    pub fn is_open(&self, coord: Coord, direction: Direction) -> bool {
        let Some(next) = self.neighbor(coord, direction) else {
            return false;
        };
        let (here, there) = (self[coord], self[next]);
        if here.is_masked() || there.is_masked() {
            return false;
        }
        here.contains(CellFlags::opening(direction))
            || there.contains(CellFlags::opening(direction.opposite()))
    }

    /// Carves the whole grid from a uniformly random cell.
    pub fn carve(&mut self, rng: &mut impl Rng) {
        let start = (
            rng.random_range(0..self.width),
            rng.random_range(0..self.height),
        );
        self.carve_from(start, rng);
    }

    /// Marks every `true` entry of `mask` as excluded, then carves from a random unmasked
    /// cell. Returns `Ok(false)` without carving when every cell is masked.
    pub fn carve_masked(&mut self, mask: &[bool], rng: &mut impl Rng) -> Result<bool> {
        if mask.len() != self.cells.len() {
            return Err(MazeError::InvalidMask {
                expected: self.cells.len(),
                actual: mask.len(),
            });
        }

        let mut unmasked = Vec::new();
        for (idx, &masked) in mask.iter().enumerate() {
            if masked {
                self.cells[idx] = CellFlags::MASKED;
            } else {
                unmasked.push(idx);
            }
        }
        if unmasked.is_empty() {
            tracing::warn!(
                "[meta] all {} cells of a {}x{} grid are masked, nothing to carve",
                mask.len(),
                self.width,
                self.height
            );
            return Ok(false);
        }

        let idx = unmasked[rng.random_range(0..unmasked.len())];
        let start = (
            (idx % self.width as usize) as u16,
            (idx / self.width as usize) as u16,
        );
        self.carve_from(start, rng);
        Ok(true)
    }

    /// Randomized depth-first carve with an explicit stack. Each step picks uniformly among
    /// untouched neighbours.
    ///
    /// A cell is flagged `DEAD` when it runs out of options on arrival, or right after a step
    /// taken with a choice of two or more. A cell whose last step was forced is not flagged.
    fn carve_from(&mut self, start: Coord, rng: &mut impl Rng) {
        // Each frame remembers how many options its previous step had
        let mut stack: Vec<(Coord, Option<usize>)> = vec![(start, None)];
        while let Some(frame) = stack.last_mut() {
            let (current, last_options) = *frame;
            let options = Direction::ALL
                .into_iter()
                .filter_map(|d| self.neighbor(current, d).map(|n| (d, n)))
                .filter(|&(_, n)| self[n].is_untouched())
                .collect::<Vec<_>>();

            if options.is_empty() {
                if last_options.is_none_or(|n| n >= 2) {
                    self.insert(current, CellFlags::DEAD);
                }
                stack.pop();
                continue;
            }

            frame.1 = Some(options.len());
            let (direction, next) = options[rng.random_range(0..options.len())];
            self.insert(current, CellFlags::opening(direction));
            stack.push((next, None));
        }
    }

    /// Breadth-first reachability through open walls. Masked cells connect to nothing.
    pub fn connected(&self, from: Coord, to: Coord) -> bool {
        if !self.is_in_bounds(from) || !self.is_in_bounds(to) {
            return false;
        }
        if self[from].is_masked() || self[to].is_masked() {
            return false;
        }

        let mut queue = VecDeque::from([from]);
        let mut visited = HashSet::from([from]);
        while let Some(current) = queue.pop_front() {
            if current == to {
                return true;
            }
            let open = Direction::ALL
                .into_iter()
                .filter(|&d| self.is_open(current, d))
                .filter_map(|d| self.neighbor(current, d));
            for next in open {
                if visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        false
    }

    /// Expands into a wall/path lattice of `(2w + 1) x (2h + 1)` cells: room `(x, y)` lands on
    /// `(2x + 1, 2y + 1)` and every open wall on the connector between two rooms. Masked and
    /// never-visited rooms stay solid.
    pub fn to_maze(&self) -> Result<Maze> {
        let lattice_side = |side: u16| side.checked_mul(2).and_then(|s| s.checked_add(1));
        let (Some(width), Some(height)) = (lattice_side(self.width), lattice_side(self.height))
        else {
            return Err(MazeError::TooLarge {
                width: self.width as u32 * 2 + 1,
                height: self.height as u32 * 2 + 1,
                max: u16::MAX,
            });
        };
        let mut maze = Maze::new(width, height)?;
        for y in 0..self.height {
            for x in 0..self.width {
                let flags = self[(x, y)];
                if flags.is_masked() || flags.is_untouched() {
                    continue;
                }
                let room = (x * 2 + 1, y * 2 + 1);
                maze.open(room);
                if self.is_open((x, y), Direction::Right) {
                    maze.open((room.0 + 1, room.1));
                }
                if self.is_open((x, y), Direction::Down) {
                    maze.open((room.0, room.1 + 1));
                }
            }
        }
        Ok(maze)
    }
}

impl std::ops::Index<Coord> for BitMaze {
    type Output = CellFlags;

    fn index(&self, index: Coord) -> &Self::Output {
        &self.cells[self.ravel_index(index)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::get_rng;
    use crate::solvers::is_fully_connected;

    fn all_cells(maze: &BitMaze) -> Vec<Coord> {
        (0..maze.height())
            .flat_map(|y| (0..maze.width()).map(move |x| (x, y)))
            .collect()
    }

    #[test]
    fn test_carve_visits_every_cell() {
        let mut maze = BitMaze::new(12, 9).unwrap();
        maze.carve(&mut get_rng(Some(6)));
        assert!(maze.cells().iter().all(|c| !c.is_untouched()));
        for cell in all_cells(&maze) {
            assert!(maze.connected((0, 0), cell));
        }
    }

    #[test]
    fn test_carve_is_a_tree() {
        let mut maze = BitMaze::new(10, 10).unwrap();
        maze.carve(&mut get_rng(Some(21)));
        let edges: usize = maze.cells().iter().map(|c| c.openings().count()).sum();
        assert_eq!(edges, 10 * 10 - 1);
    }

    #[test]
    fn test_dead_ends_are_flagged() {
        let mut branch_deaths = 0;
        for seed in 0..10 {
            let mut maze = BitMaze::new(8, 8).unwrap();
            maze.carve(&mut get_rng(Some(seed)));
            for cell in maze.cells() {
                // Every leaf of the carve tree ran out of options on arrival
                if cell.openings().count() == 0 {
                    assert!(cell.is_dead());
                } else if cell.is_dead() {
                    branch_deaths += 1;
                }
            }
        }
        // Cells that had a choice and later ran dry are flagged too
        assert!(branch_deaths > 0);
    }

    #[test]
    fn test_forced_step_is_not_dead() {
        // A 1x3 corridor from its left end: every step is forced
        let mut maze = BitMaze::new(3, 1).unwrap();
        maze.carve_from((0, 0), &mut get_rng(Some(0)));
        assert_eq!(maze[(0, 0)], CellFlags::RIGHT);
        assert_eq!(maze[(1, 0)], CellFlags::RIGHT);
        assert_eq!(maze[(2, 0)], CellFlags::DEAD);

        // From the middle the second side is a forced step after the first choice
        let mut maze = BitMaze::new(3, 1).unwrap();
        maze.carve_from((1, 0), &mut get_rng(Some(0)));
        assert!(!maze[(1, 0)].is_dead());
        assert_eq!(maze[(1, 0)].openings().count(), 2);
    }

    #[test]
    fn test_branch_that_runs_dry_is_dead() {
        // Whichever way the 2x2 loop is walked, the corner it started from had two
        // options and finds none left afterwards
        for seed in 0..4 {
            let mut maze = BitMaze::new(2, 2).unwrap();
            maze.carve_from((0, 0), &mut get_rng(Some(seed)));
            let corner = maze[(0, 0)];
            assert!(corner.is_dead());
            assert_eq!(corner.openings().count(), 1);
            assert!(maze[(0, 1)].is_dead() || maze[(1, 0)].is_dead());
        }
    }

    #[test]
    fn test_oversized_lattice_is_rejected() {
        let maze = BitMaze::new(40_000, 1).unwrap();
        assert_eq!(
            maze.to_maze(),
            Err(MazeError::TooLarge {
                width: 80_001,
                height: 3,
                max: u16::MAX
            })
        );
        // 32767 rooms expand to exactly 65535 cells
        let maze = BitMaze::new(32_767, 2).unwrap();
        assert_eq!(maze.to_maze().map(|m| m.width()), Ok(65_535));
    }

    #[test]
    fn test_masked_cells_are_skipped() {
        let mut maze = BitMaze::new(5, 5).unwrap();
        // Mask the middle column except its top cell
        let mask = (0..25)
            .map(|i| i % 5 == 2 && i / 5 > 0)
            .collect::<Vec<_>>();
        assert_eq!(maze.carve_masked(&mask, &mut get_rng(Some(13))), Ok(true));

        for cell in all_cells(&maze) {
            let masked = mask[cell.1 as usize * 5 + cell.0 as usize];
            assert_eq!(maze[cell] == CellFlags::MASKED, masked);
            assert_eq!(maze.connected((0, 0), cell), !masked);
        }
    }

    #[test]
    fn test_fully_masked_reports_false() {
        let mut maze = BitMaze::new(3, 3).unwrap();
        assert_eq!(maze.carve_masked(&[true; 9], &mut get_rng(Some(0))), Ok(false));
        assert!(maze.cells().iter().all(|c| c.is_masked()));
        assert_eq!(
            maze.carve_masked(&[true; 4], &mut get_rng(Some(0))),
            Err(MazeError::InvalidMask {
                expected: 9,
                actual: 4
            })
        );
    }

    #[test]
    fn test_to_maze_keeps_connectivity() {
        let mut bits = BitMaze::new(6, 4).unwrap();
        bits.carve(&mut get_rng(Some(31)));
        let maze = bits.to_maze().unwrap();
        assert_eq!((maze.width(), maze.height()), (13, 9));
        assert!(is_fully_connected(&maze));
        assert!(maze.canonical_cells().all(|c| maze.is_path(c)));
        // Tree of 24 rooms: 24 room cells + 23 connectors
        assert_eq!(maze.path_count(), 24 + 23);
    }

    #[test]
    fn test_single_cell() {
        let mut maze = BitMaze::new(1, 1).unwrap();
        maze.carve(&mut get_rng(Some(1)));
        assert_eq!(maze[(0, 0)], CellFlags::DEAD);
        assert!(maze.connected((0, 0), (0, 0)));
        assert!(BitMaze::new(0, 3).is_err());
    }
}
