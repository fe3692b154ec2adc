use rand::Rng;

use super::bfs::reachable_from;
use crate::error::{MazeError, Result};
use crate::maze::{Coord, Direction, Maze};

/// Carves a straight Manhattan route from `start` to `end`, x axis first, opening every
/// cell on the way including both endpoints. Ignores existing structure, so it is only a
/// last-resort repair. Returns how many cells were opened.
pub fn force_connect(maze: &mut Maze, start: Coord, end: Coord) -> Result<usize> {
    for coord in [start, end] {
        if !maze.is_in_bounds(coord) {
            return Err(MazeError::OutOfBounds {
                coord,
                width: maze.width(),
                height: maze.height(),
            });
        }
        if maze.is_border(coord) {
            return Err(MazeError::BorderCell { coord });
        }
    }

    // Both endpoints are interior, so every cell of their bounding box is too
    let mut opened = 0;
    let (mut x, mut y) = start;
    loop {
        if maze.is_wall((x, y)) {
            maze.open((x, y));
            opened += 1;
        }
        if (x, y) == end {
            break;
        }
        if x < end.0 {
            x += 1;
        } else if x > end.0 {
            x -= 1;
        } else if y < end.1 {
            y += 1;
        } else {
            y -= 1;
        }
    }

    tracing::debug!(
        "[repair] carved {:?} -> {:?}, opened {} cells",
        start,
        end,
        opened
    );
    Ok(opened)
}

/// Joins every path region to the one containing `anchor`.
///
/// Each round opens one random wall that separates the anchor's region from another region,
/// until every path cell is reachable. Returns how many walls were opened.
pub fn connect_regions(maze: &mut Maze, anchor: Coord, rng: &mut impl Rng) -> usize {
    if !maze.is_path(anchor) {
        return 0;
    }

    let mut joined = 0;
    loop {
        let reached = reachable_from(maze, anchor);
        if reached.len() == maze.path_count() {
            return joined;
        }

        let bridges = bridge_walls(maze, |c| reached.contains(&c));
        if bridges.is_empty() {
            // Regions that no single wall separates: fall back to a straight carve
            let stray = (0..maze.height())
                .flat_map(|y| (0..maze.width()).map(move |x| (x, y)))
                .find(|c| maze.is_path(*c) && !reached.contains(c));
            match stray.map(|cell| force_connect(maze, anchor, cell)) {
                Some(Ok(_)) => {}
                _ => {
                    tracing::warn!("[repair] could not join stray region to {:?}", anchor);
                    return joined;
                }
            }
        } else {
            let wall = bridges[rng.random_range(0..bridges.len())];
            maze.open(wall);
        }
        joined += 1;
    }
}

/// Interior walls with a reached path on one side and an unreached path directly opposite.
fn bridge_walls(maze: &Maze, reached: impl Fn(Coord) -> bool) -> Vec<Coord> {
    let mut bridges = Vec::new();
    for y in 1..maze.height() - 1 {
        for x in 1..maze.width() - 1 {
            if maze.is_path((x, y)) {
                continue;
            }
            let crosses = [Direction::Up, Direction::Left].into_iter().any(|dir| {
                let a = maze.step((x, y), dir, 1);
                let b = maze.step((x, y), dir.opposite(), 1);
                match (a, b) {
                    (Some(a), Some(b)) if maze.is_path(a) && maze.is_path(b) => {
                        reached(a) != reached(b)
                    }
                    _ => false,
                }
            });
            if crosses {
                bridges.push((x, y));
            }
        }
    }
    bridges
}
