use std::sync::{Mutex, PoisonError};

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::generators::{carve_target, carve_towards, hunt, random_canonical, shuffle_directions};
use crate::maze::{Coord, Direction, Maze};

struct Shared<'a> {
    maze: &'a mut Maze,
    /// Canonical cells not yet carved. Only touched under the same lock as the maze.
    remaining: usize,
}

/// Hunt-and-kill with several walkers carving into one grid.
///
/// Every check-then-carve happens under a single lock, so no two workers can claim the same
/// cell. Workers stop once no canonical cell is left to carve. Only a single worker gives
/// reproducible output for a given seed.
pub fn parallel_hunt_and_kill(maze: &mut Maze, workers: usize, rng: &mut impl Rng) {
    let workers = workers.max(1);
    let seeds = (0..workers).map(|_| rng.random::<u64>()).collect::<Vec<_>>();

    let origin = random_canonical(maze, rng);
    maze.open(origin);
    let remaining = maze.canonical_cells().count() - 1;

    let shared = Mutex::new(Shared { maze, remaining });

    std::thread::scope(|scope| {
        for (id, seed) in seeds.into_iter().enumerate() {
            let shared = &shared;
            scope.spawn(move || {
                let carved = run_worker(shared, StdRng::seed_from_u64(seed));
                tracing::debug!("[parallel] worker {} carved {} cells", id, carved);
            });
        }
    });

    let shared = shared.into_inner().unwrap_or_else(PoisonError::into_inner);
    debug_assert_eq!(shared.remaining, 0);
}

fn run_worker(shared: &Mutex<Shared<'_>>, mut rng: StdRng) -> usize {
    let mut dirs = Direction::ALL;
    let mut current: Option<Coord> = None;
    let mut carved = 0;

    loop {
        let mut guard = shared.lock().unwrap_or_else(PoisonError::into_inner);
        let Shared { maze, remaining } = &mut *guard;
        if *remaining == 0 {
            return carved;
        }

        let position = match current.or_else(|| hunt(maze)) {
            Some(cell) => cell,
            None => return carved,
        };

        shuffle_directions(&mut dirs, &mut rng);
        let next = dirs
            .iter()
            .find_map(|&dir| carve_target(maze, position, dir));

        current = match next {
            Some(target) => {
                carve_towards(maze, position, target);
                *remaining -= 1;
                carved += 1;
                Some(target)
            }
            // Dead end: hunt on the next round, after other workers had a turn
            None => None,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::tests::border_intact;
    use crate::generators::{get_rng, hunt_and_kill};
    use crate::maze::GridEvent;
    use crate::solvers::is_fully_connected;

    #[test]
    fn test_workers_cover_every_cell() {
        for workers in [1, 2, 4, 8] {
            let mut maze = Maze::new(31, 21).unwrap();
            parallel_hunt_and_kill(&mut maze, workers, &mut get_rng(Some(workers as u64)));
            assert!(maze.canonical_cells().all(|c| maze.is_path(c)));
            assert!(is_fully_connected(&maze));
            assert!(border_intact(&maze));
        }
    }

    #[test]
    fn test_result_is_a_tree() {
        let mut maze = Maze::new(21, 21).unwrap();
        parallel_hunt_and_kill(&mut maze, 4, &mut get_rng(Some(9)));
        let nodes = maze.canonical_cells().count();
        assert_eq!(maze.path_count(), 2 * nodes - 1);
    }

    #[test]
    fn test_single_worker_is_deterministic() {
        let mut a = Maze::new(15, 15).unwrap();
        let mut b = Maze::new(15, 15).unwrap();
        parallel_hunt_and_kill(&mut a, 1, &mut get_rng(Some(3)));
        parallel_hunt_and_kill(&mut b, 1, &mut get_rng(Some(3)));
        assert_eq!(a, b);

        let mut serial = Maze::new(15, 15).unwrap();
        hunt_and_kill(&mut serial, &mut get_rng(Some(3)));
        assert_eq!(serial.path_count(), a.path_count());
    }

    #[test]
    fn test_observer_sees_every_carve() {
        let (tx, rx) = std::sync::mpsc::channel();
        let mut maze = Maze::with_observer(11, 11, tx).unwrap();
        parallel_hunt_and_kill(&mut maze, 3, &mut get_rng(Some(12)));
        drop(maze);

        let opened = rx
            .iter()
            .filter(|e| matches!(e, GridEvent::Update { new, .. } if new.is_path()))
            .count();
        assert_eq!(opened, 2 * 25 - 1);
    }
}
