use std::str::FromStr;

use rand::{Rng, SeedableRng, rngs::StdRng};

mod hunt_and_kill;
mod openings;
mod origin_shift;
mod parallel;

pub use hunt_and_kill::hunt_and_kill;
pub use openings::{Opening, OpeningParams, add_random_openings};
pub use origin_shift::origin_shift;
pub use parallel::parallel_hunt_and_kill;

use crate::error::{MazeError, Result};
use crate::maze::{Coord, Direction, Maze};

/// Get a random number generator, optionally seeded for reproducibility.
pub fn get_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Generator {
    HuntAndKill,
    OriginShift,
    /// Hunt-and-kill split over several threads sharing one locked grid.
    Parallel { workers: usize },
}

impl std::fmt::Display for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Generator::HuntAndKill => write!(f, "Hunt and Kill"),
            Generator::OriginShift => write!(f, "Origin Shifting"),
            Generator::Parallel { workers } => {
                write!(f, "Parallel Hunt and Kill ({workers} workers)")
            }
        }
    }
}

impl FromStr for Generator {
    type Err = MazeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "hunt-and-kill" | "hunt" | "hak" => Ok(Generator::HuntAndKill),
            "origin-shift" | "origin" | "shift" => Ok(Generator::OriginShift),
            "parallel" => Ok(Generator::Parallel {
                workers: std::thread::available_parallelism().map_or(2, |n| n.get()),
            }),
            _ => Err(MazeError::UnknownGenerator(s.to_string())),
        }
    }
}

/// Inputs the origin-shifting carve needs. Hunt-and-kill only uses the RNG.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarveParams {
    pub start: Coord,
    pub end: Coord,
    /// Random canonical cells seeded into the frontier besides `start` and `end`.
    pub extra_origins: u32,
    /// Percent chance of pushing the current cell back after each carve.
    pub loop_chance: u32,
}

impl CarveParams {
    /// Start at the top-left canonical cell, end at the bottom-right one.
    pub fn corners(maze: &Maze) -> Self {
        CarveParams {
            start: (1, 1),
            end: (maze.width() - 2, maze.height() - 2),
            extra_origins: 0,
            loop_chance: 0,
        }
    }
}

/// Carves `maze` in place. The maze is expected to be all walls.
pub fn generate_maze(
    maze: &mut Maze,
    generator: Generator,
    params: &CarveParams,
    rng: &mut StdRng,
) -> Result<()> {
    tracing::debug!(
        "[generate] {} on {}x{}",
        generator,
        maze.width(),
        maze.height()
    );
    match generator {
        Generator::HuntAndKill => hunt_and_kill(maze, rng),
        Generator::OriginShift => origin_shift(maze, params, rng)?,
        Generator::Parallel { workers } => parallel_hunt_and_kill(maze, workers, rng),
    }
    Ok(())
}

/// Shuffles in place by swapping every slot with a uniformly random slot.
///
/// This is not a uniform permutation, and callers rely on that exact distribution.
pub(crate) fn shuffle_directions(dirs: &mut [Direction; 4], rng: &mut impl Rng) {
    for i in 0..dirs.len() {
        let j = rng.random_range(0..dirs.len());
        dirs.swap(i, j);
    }
}

/// A carve target must sit strictly inside the border and still be solid.
pub(crate) fn is_unvisited(maze: &Maze, coord: Coord) -> bool {
    maze.is_interior(coord) && maze.is_wall(coord)
}

/// The cell two steps away in `dir`, if it can be carved into.
pub(crate) fn carve_target(maze: &Maze, from: Coord, dir: Direction) -> Option<Coord> {
    maze.step(from, dir, 2).filter(|&c| is_unvisited(maze, c))
}

/// Opens the connector and the target cell two steps away.
pub(crate) fn carve_towards(maze: &mut Maze, from: Coord, to: Coord) {
    let connector = ((from.0 + to.0) / 2, (from.1 + to.1) / 2);
    maze.open(connector);
    maze.open(to);
}

/// Uniformly random canonical cell.
pub(crate) fn random_canonical(maze: &Maze, rng: &mut impl Rng) -> Coord {
    let x = rng.random_range(0..(maze.width() - 1) / 2) * 2 + 1;
    let y = rng.random_range(0..(maze.height() - 1) / 2) * 2 + 1;
    (x, y)
}

/// Row-major scan for a carved canonical cell that still has a carvable neighbour.
pub(crate) fn hunt(maze: &Maze) -> Option<Coord> {
    maze.canonical_cells().find(|&cell| {
        maze.is_path(cell)
            && Direction::ALL
                .into_iter()
                .any(|dir| carve_target(maze, cell, dir).is_some())
    })
}
