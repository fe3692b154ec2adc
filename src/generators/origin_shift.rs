use rand::Rng;

use crate::error::{MazeError, Result};
use crate::generators::{CarveParams, carve_towards, random_canonical, shuffle_directions};
use crate::maze::{Coord, Direction, Maze};
use crate::solvers::connect_regions;

/// Multi-origin carve with occasional revisits.
///
/// The frontier starts with `start`, up to `extra_origins` random canonical cells and `end`.
/// Each round removes a random frontier entry and carves into every unvisited neighbour,
/// sometimes pushing the current cell back so it can branch again later. Every origin grows
/// its own tree; the trees are joined afterwards so the result is a single region.
pub fn origin_shift(maze: &mut Maze, params: &CarveParams, rng: &mut impl Rng) -> Result<()> {
    for origin in [params.start, params.end] {
        if !Maze::is_canonical(origin) || !maze.is_interior(origin) {
            return Err(MazeError::NotCanonical { coord: origin });
        }
    }

    let width = maze.width() as usize;
    let mut visited = vec![false; width * maze.height() as usize];
    let index = |(x, y): Coord| y as usize * width + x as usize;

    let mut frontier: Vec<Coord> = Vec::new();
    seed_origin(maze, params.start, &mut visited, &mut frontier);
    for _ in 0..params.extra_origins {
        let origin = random_canonical(maze, rng);
        seed_origin(maze, origin, &mut visited, &mut frontier);
    }
    seed_origin(maze, params.end, &mut visited, &mut frontier);
    let origins = frontier.len();

    let mut revisits = 0usize;
    while !frontier.is_empty() {
        let current = frontier.swap_remove(rng.random_range(0..frontier.len()));

        let mut dirs = Direction::ALL;
        shuffle_directions(&mut dirs, rng);

        for dir in dirs {
            let Some(next) = maze.step(current, dir, 2) else {
                continue;
            };
            if !maze.is_interior(next) || visited[index(next)] {
                continue;
            }
            carve_towards(maze, current, next);
            visited[index(next)] = true;
            frontier.push(next);

            if rng.random_range(0..100) < params.loop_chance {
                frontier.push(current);
                revisits += 1;
            }
        }
    }

    let joined = connect_regions(maze, params.start, rng);
    tracing::debug!(
        "[origin-shift] {} origins, {} revisits, {} regions joined",
        origins,
        revisits,
        joined
    );
    Ok(())
}

/// Opens `cell` and queues it, unless an earlier origin already claimed it.
fn seed_origin(maze: &mut Maze, cell: Coord, visited: &mut [bool], frontier: &mut Vec<Coord>) {
    let idx = cell.1 as usize * maze.width() as usize + cell.0 as usize;
    if !visited[idx] {
        visited[idx] = true;
        maze.open(cell);
        frontier.push(cell);
    }
}
