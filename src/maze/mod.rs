pub mod cell;
pub mod grid;

use std::sync::mpsc::Sender;

pub use cell::{GridCell, PathType, WallType};
pub use grid::GridEvent;
use grid::Grid;

use crate::error::{MazeError, Result};

/// Cell coordinate as `(x, y)`, 0-indexed from the top-left corner.
pub type Coord = (u16, u16);

/// The four cardinal directions, in the order the carving and hunting scans use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// A rectangular wall/path lattice.
///
/// Cells at odd `(x, y)` are the canonical nodes of the carving graph, cells with exactly
/// one even coordinate are the connectors between them. Both dimensions are odd and at
/// least [`Maze::MIN_SIDE`], and the outermost ring of cells always stays a wall.
#[derive(Debug, Clone, PartialEq)]
pub struct Maze {
    grid: Grid,
}

impl Maze {
    pub const MIN_SIDE: u16 = 5;

    /// Creates a maze where every cell is a wall.
    pub fn new(width: u16, height: u16) -> Result<Self> {
        Maze::build(width, height, None)
    }

    /// Same as [`Maze::new`], but every cell change is also published to `sender`.
    pub fn with_observer(width: u16, height: u16, sender: Sender<GridEvent>) -> Result<Self> {
        Maze::build(width, height, Some(sender))
    }

    fn build(width: u16, height: u16, sender: Option<Sender<GridEvent>>) -> Result<Self> {
        Maze::validate_dimensions(width, height)?;
        Ok(Maze {
            grid: Grid::new(width, height, GridCell::WALL, sender),
        })
    }

    /// Even or undersized dimensions break the node/connector alternation and are rejected.
    pub fn validate_dimensions(width: u16, height: u16) -> Result<()> {
        let valid = |side: u16| side >= Maze::MIN_SIDE && side % 2 == 1;
        if valid(width) && valid(height) {
            Ok(())
        } else {
            Err(MazeError::InvalidDimensions {
                width,
                height,
                min: Maze::MIN_SIDE,
            })
        }
    }

    pub fn width(&self) -> u16 {
        self.grid.width()
    }

    pub fn height(&self) -> u16 {
        self.grid.height()
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[GridCell] {
        self.grid.data()
    }

    /// Stops publishing events and hands the sender back.
    pub fn detach_observer(&mut self) -> Option<Sender<GridEvent>> {
        self.grid.detach()
    }

    pub fn is_in_bounds(&self, coord: Coord) -> bool {
        coord.0 < self.width() && coord.1 < self.height()
    }

    pub fn is_border(&self, coord: Coord) -> bool {
        self.is_in_bounds(coord) && self.grid.is_boundary(coord.0, coord.1)
    }

    /// Inside the bounds and off the border ring.
    pub fn is_interior(&self, coord: Coord) -> bool {
        self.is_in_bounds(coord) && !self.grid.is_boundary(coord.0, coord.1)
    }

    pub fn is_canonical(coord: Coord) -> bool {
        coord.0 % 2 == 1 && coord.1 % 2 == 1
    }

    /// Out-of-bounds coordinates are never paths.
    pub fn is_path(&self, coord: Coord) -> bool {
        self.is_in_bounds(coord) && self.grid[coord].is_path()
    }

    /// Out-of-bounds coordinates count as walls.
    pub fn is_wall(&self, coord: Coord) -> bool {
        !self.is_path(coord)
    }

    /// Writes a cell. Opening a border cell is refused.
    pub fn set(&mut self, coord: Coord, cell: GridCell) -> Result<()> {
        self.check_bounds(coord)?;
        if cell.is_path() && self.is_border(coord) {
            return Err(MazeError::BorderCell { coord });
        }
        self.grid.set(coord, cell);
        Ok(())
    }

    pub fn set_path(&mut self, coord: Coord) -> Result<()> {
        self.set(coord, GridCell::EMPTY)
    }

    pub fn set_wall(&mut self, coord: Coord) -> Result<()> {
        self.set(coord, GridCell::WALL)
    }

    /// Opens the connector between two canonical cells two steps apart.
    pub fn set_path_between(&mut self, from: Coord, to: Coord) -> Result<()> {
        let connector = self.connector(from, to)?;
        self.set_path(connector)
    }

    /// Closes the connector between two canonical cells two steps apart.
    pub fn set_wall_between(&mut self, from: Coord, to: Coord) -> Result<()> {
        let connector = self.connector(from, to)?;
        self.set_wall(connector)
    }

    /// The cell lying halfway between two cells that are two steps apart on one axis.
    pub fn connector(&self, from: Coord, to: Coord) -> Result<Coord> {
        self.check_bounds(from)?;
        self.check_bounds(to)?;
        let dx = from.0.abs_diff(to.0);
        let dy = from.1.abs_diff(to.1);
        match (dx, dy) {
            (2, 0) | (0, 2) => Ok((from.0.min(to.0) + dx / 2, from.1.min(to.1) + dy / 2)),
            _ => Err(MazeError::NotAdjacent { from, to }),
        }
    }

    /// Opens an interior cell without the public bounds checks. Generators only call
    /// this with coordinates they already validated.
    pub(crate) fn open(&mut self, coord: Coord) {
        debug_assert!(self.is_interior(coord), "carving {coord:?} breaks the border");
        self.grid.set(coord, GridCell::EMPTY);
    }

    pub(crate) fn mark(&mut self, coord: Coord, cell: GridCell) {
        self.grid.set(coord, cell);
    }

    /// The cell `distance` steps away in `direction`, if it is still inside the grid.
    pub fn step(&self, coord: Coord, direction: Direction, distance: u16) -> Option<Coord> {
        let (dx, dy) = direction.delta();
        let x = coord.0 as i32 + dx * distance as i32;
        let y = coord.1 as i32 + dy * distance as i32;
        if x < 0 || y < 0 {
            return None;
        }
        let next = (x as u16, y as u16);
        self.is_in_bounds(next).then_some(next)
    }

    /// In-bounds orthogonal neighbours, in [`Direction::ALL`] order.
    pub fn neighbors(&self, coord: Coord) -> impl Iterator<Item = Coord> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |dir| self.step(coord, dir, 1))
    }

    /// Canonical (odd, odd) cells in row-major order.
    pub fn canonical_cells(&self) -> impl Iterator<Item = Coord> + use<> {
        let (width, height) = (self.width(), self.height());
        (1..height - 1)
            .step_by(2)
            .flat_map(move |y| (1..width - 1).step_by(2).map(move |x| (x, y)))
    }

    pub fn path_count(&self) -> usize {
        self.cells().iter().filter(|c| c.is_path()).count()
    }

    /// Renders the maze with two ASCII characters per cell.
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity(
            (self.width() as usize * GridCell::CELL_WIDTH as usize + 1) * self.height() as usize,
        );
        for y in 0..self.height() {
            for x in 0..self.width() {
                out.push_str(self.grid[(x, y)].ascii());
            }
            out.push('\n');
        }
        out
    }

    fn check_bounds(&self, coord: Coord) -> Result<()> {
        if self.is_in_bounds(coord) {
            Ok(())
        } else {
            Err(MazeError::OutOfBounds {
                coord,
                width: self.width(),
                height: self.height(),
            })
        }
    }
}

impl std::fmt::Display for Maze {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for y in 0..self.height() {
            for x in 0..self.width() {
                write!(f, "{}", self.grid[(x, y)])?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl std::ops::Index<Coord> for Maze {
    type Output = GridCell;

    fn index(&self, index: Coord) -> &Self::Output {
        &self.grid[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_maze_is_all_walls() {
        let maze = Maze::new(7, 5).unwrap();
        assert_eq!(maze.width(), 7);
        assert_eq!(maze.height(), 5);
        assert!(maze.cells().iter().all(|c| *c == GridCell::WALL));
    }

    #[test]
    fn test_rejects_even_or_small_dimensions() {
        assert!(matches!(
            Maze::new(6, 7),
            Err(MazeError::InvalidDimensions { width: 6, .. })
        ));
        assert!(Maze::new(7, 8).is_err());
        assert!(Maze::new(3, 3).is_err());
        assert!(Maze::new(5, 5).is_ok());
    }

    #[test]
    fn test_border_cannot_be_opened() {
        let mut maze = Maze::new(5, 5).unwrap();
        assert_eq!(
            maze.set_path((0, 2)),
            Err(MazeError::BorderCell { coord: (0, 2) })
        );
        assert!(maze.set_wall((0, 2)).is_ok());
        assert!(maze.set_path((2, 2)).is_ok());
        assert!(maze.is_path((2, 2)));
    }

    #[test]
    fn test_out_of_bounds() {
        let mut maze = Maze::new(5, 5).unwrap();
        assert!(!maze.is_in_bounds((5, 5)));
        assert!(!maze.is_in_bounds((0, 5)));
        assert!(maze.is_in_bounds((4, 4)));
        assert!(maze.is_wall((9, 9)));
        assert!(matches!(
            maze.set_path((5, 1)),
            Err(MazeError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_connector_between_canonical_cells() {
        let mut maze = Maze::new(7, 7).unwrap();
        assert_eq!(maze.connector((1, 1), (3, 1)), Ok((2, 1)));
        assert_eq!(maze.connector((1, 3), (1, 1)), Ok((1, 2)));
        assert!(matches!(
            maze.connector((1, 1), (3, 3)),
            Err(MazeError::NotAdjacent { .. })
        ));

        maze.set_path_between((3, 3), (3, 5)).unwrap();
        assert!(maze.is_path((3, 4)));
        maze.set_wall_between((3, 5), (3, 3)).unwrap();
        assert!(maze.is_wall((3, 4)));
    }

    #[test]
    fn test_canonical_cells_row_major() {
        let maze = Maze::new(7, 5).unwrap();
        let cells = maze.canonical_cells().collect::<Vec<_>>();
        assert_eq!(cells, vec![(1, 1), (3, 1), (5, 1), (1, 3), (3, 3), (5, 3)]);
    }

    #[test]
    fn test_neighbors_stay_in_bounds() {
        let maze = Maze::new(5, 5).unwrap();
        let corner = maze.neighbors((0, 0)).collect::<Vec<_>>();
        assert_eq!(corner, vec![(0, 1), (1, 0)]);
        let centre = maze.neighbors((2, 2)).collect::<Vec<_>>();
        assert_eq!(centre, vec![(2, 1), (2, 3), (1, 2), (3, 2)]);
    }

    #[test]
    fn test_ascii_rendering() {
        let mut maze = Maze::new(5, 5).unwrap();
        maze.set_path((1, 1)).unwrap();
        let ascii = maze.to_ascii();
        let second_row = ascii.lines().nth(1).unwrap();
        assert_eq!(second_row, "##  ######");
    }
}
