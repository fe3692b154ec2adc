use rand::Rng;

use crate::generators::{carve_target, carve_towards, hunt, random_canonical, shuffle_directions};
use crate::maze::{Direction, GridCell, Maze};

/// Hunt-and-kill: a randomized walk that, whenever it dead-ends, scans the grid row by row
/// for a carved cell it can continue from. Produces a perfect maze over every canonical cell.
pub fn hunt_and_kill(maze: &mut Maze, rng: &mut impl Rng) {
    let mut current = random_canonical(maze, rng);
    maze.open(current);

    // The order is reshuffled in place every step, never reset.
    let mut dirs = Direction::ALL;
    let mut hunts = 0usize;

    loop {
        shuffle_directions(&mut dirs, rng);
        // First valid direction in shuffled order wins
        let next = dirs
            .iter()
            .find_map(|&dir| carve_target(maze, current, dir));

        match next {
            Some(target) => {
                maze.mark(target, GridCell::MARK);
                carve_towards(maze, current, target);
                current = target;
            }
            None => match hunt(maze) {
                Some(cell) => {
                    hunts += 1;
                    current = cell;
                }
                // Nothing left to reach: the maze is complete
                None => break,
            },
        }
    }

    tracing::debug!("[hunt-and-kill] complete after {} hunts", hunts);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::get_rng;
    use crate::generators::tests::border_intact;
    use crate::solvers::{is_fully_connected, path_exists};

    #[test]
    fn test_every_canonical_cell_is_carved() {
        let mut maze = Maze::new(21, 15).unwrap();
        hunt_and_kill(&mut maze, &mut get_rng(Some(7)));
        assert!(maze.canonical_cells().all(|c| maze.is_path(c)));
        assert!(border_intact(&maze));
        assert!(is_fully_connected(&maze));
    }

    #[test]
    fn test_perfect_maze_has_no_loops() {
        let mut maze = Maze::new(17, 17).unwrap();
        hunt_and_kill(&mut maze, &mut get_rng(Some(1)));
        // A spanning tree over n canonical cells opens exactly n - 1 connectors
        let nodes = maze.canonical_cells().count();
        assert_eq!(maze.path_count(), nodes + nodes - 1);
    }

    #[test]
    fn test_seven_by_seven_seed_42_terminates_connected() {
        let mut maze = Maze::new(7, 7).unwrap();
        hunt_and_kill(&mut maze, &mut get_rng(Some(42)));
        assert!(path_exists(&maze, (1, 1), (5, 5)));
    }

    #[test]
    fn test_same_seed_same_maze() {
        let mut a = Maze::new(25, 25).unwrap();
        let mut b = Maze::new(25, 25).unwrap();
        hunt_and_kill(&mut a, &mut get_rng(Some(2024)));
        hunt_and_kill(&mut b, &mut get_rng(Some(2024)));
        assert_eq!(a, b);
    }

    #[test]
    fn test_no_mark_left_behind() {
        let mut maze = Maze::new(11, 11).unwrap();
        hunt_and_kill(&mut maze, &mut get_rng(Some(5)));
        assert!(maze.cells().iter().all(|c| *c != GridCell::MARK));
    }
}
