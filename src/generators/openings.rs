use rand::Rng;

use crate::maze::{Coord, Maze};

/// How aggressively extra openings are punched into a finished maze.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpeningParams {
    /// 0 disables the pass; each interior wall is tried with `density * 2` percent chance.
    pub density: u32,
    /// Minimum number of orthogonal path neighbours a wall needs before it is opened.
    pub threshold: usize,
}

/// A wall that was turned into a path, with the path neighbours it had at that moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opening {
    pub coord: Coord,
    pub neighbours: usize,
}

/// Opens random interior walls that already touch enough paths, adding loops without
/// creating isolated holes. Cells are visited row by row, so earlier openings count as
/// neighbours for later ones.
pub fn add_random_openings(
    maze: &mut Maze,
    params: OpeningParams,
    rng: &mut impl Rng,
) -> Vec<Opening> {
    let mut opened = Vec::new();
    if params.density == 0 {
        return opened;
    }

    for y in 1..maze.height() - 1 {
        for x in 1..maze.width() - 1 {
            if maze.is_path((x, y)) || rng.random_range(0..100) >= params.density * 2 {
                continue;
            }
            let neighbours = maze.neighbors((x, y)).filter(|&c| maze.is_path(c)).count();
            if neighbours >= params.threshold {
                maze.open((x, y));
                opened.push(Opening {
                    coord: (x, y),
                    neighbours,
                });
            }
        }
    }

    tracing::debug!(
        "[openings] opened {} walls (density {}, threshold {})",
        opened.len(),
        params.density,
        params.threshold
    );
    opened
}
