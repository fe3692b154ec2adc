use std::collections::{HashSet, VecDeque};
use std::rc::Rc;

use super::TrackedCell;
use crate::maze::{Coord, Maze};

/// Breadth-first search over path cells with single-step orthogonal moves.
/// Returns the first route found from `start` to `goal`, which is a shortest one.
pub fn shortest_path(maze: &Maze, start: Coord, goal: Coord) -> Option<Vec<Coord>> {
    if !maze.is_path(start) || !maze.is_path(goal) {
        return None;
    }

    let mut queue = VecDeque::new();
    queue.push_back(Rc::new(TrackedCell {
        coord: start,
        parent: None,
    }));
    let mut visited = HashSet::new();
    visited.insert(start);

    while let Some(current) = queue.pop_front() {
        if current.coord == goal {
            return Some(current.route());
        }
        for next in maze.neighbors(current.coord) {
            if maze.is_path(next) && visited.insert(next) {
                queue.push_back(Rc::new(TrackedCell {
                    coord: next,
                    parent: Some(Rc::clone(&current)),
                }));
            }
        }
    }

    None
}

/// Every path cell reachable from `start`, including `start` itself.
/// Empty when `start` is not a path.
pub fn reachable_from(maze: &Maze, start: Coord) -> HashSet<Coord> {
    let mut visited = HashSet::new();
    if !maze.is_path(start) {
        return visited;
    }

    let mut queue = VecDeque::from([start]);
    visited.insert(start);
    while let Some(current) = queue.pop_front() {
        for next in maze.neighbors(current) {
            if maze.is_path(next) && visited.insert(next) {
                queue.push_back(next);
            }
        }
    }
    visited
}

/// Whether `start` and `end` are joined by path cells. Walls and out-of-bounds
/// endpoints are never connected.
pub fn path_exists(maze: &Maze, start: Coord, end: Coord) -> bool {
    if !maze.is_path(start) || !maze.is_path(end) {
        return false;
    }
    if start == end {
        return true;
    }

    let mut queue = VecDeque::from([start]);
    let mut visited = HashSet::from([start]);
    while let Some(current) = queue.pop_front() {
        for next in maze.neighbors(current) {
            if next == end {
                return true;
            }
            if maze.is_path(next) && visited.insert(next) {
                queue.push_back(next);
            }
        }
    }
    false
}

/// Whether all path cells form a single region. A maze without paths counts as connected.
pub fn is_fully_connected(maze: &Maze) -> bool {
    let first = (0..maze.height())
        .flat_map(|y| (0..maze.width()).map(move |x| (x, y)))
        .find(|&c| maze.is_path(c));
    match first {
        Some(cell) => reachable_from(maze, cell).len() == maze.path_count(),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 7x7 maze with a corridor along row 1 and down column 5, plus a lone cell at (1, 5).
    fn corridor() -> Maze {
        let mut maze = Maze::new(7, 7).unwrap();
        for x in 1..=5 {
            maze.set_path((x, 1)).unwrap();
        }
        for y in 2..=5 {
            maze.set_path((5, y)).unwrap();
        }
        maze.set_path((1, 5)).unwrap();
        maze
    }

    #[test]
    fn test_path_exists() {
        let maze = corridor();
        assert!(path_exists(&maze, (1, 1), (5, 5)));
        assert!(path_exists(&maze, (5, 5), (1, 1)));
        assert!(path_exists(&maze, (1, 5), (1, 5)));
        assert!(!path_exists(&maze, (1, 1), (1, 5)));
        // Walls and out-of-bounds endpoints
        assert!(!path_exists(&maze, (1, 1), (3, 3)));
        assert!(!path_exists(&maze, (1, 1), (40, 1)));
    }

    #[test]
    fn test_shortest_path_follows_corridor() {
        let maze = corridor();
        let route = shortest_path(&maze, (1, 1), (5, 3)).unwrap();
        assert_eq!(
            route,
            vec![(1, 1), (2, 1), (3, 1), (4, 1), (5, 1), (5, 2), (5, 3)]
        );
        assert_eq!(shortest_path(&maze, (1, 1), (1, 5)), None);
    }

    #[test]
    fn test_shortest_path_prefers_loop_shortcut() {
        let mut maze = corridor();
        for y in 2..=4 {
            maze.set_path((1, y)).unwrap();
        }
        // Now (1, 5) is reachable straight down column 1
        let route = shortest_path(&maze, (1, 1), (1, 5)).unwrap();
        assert_eq!(route.len(), 5);
    }

    #[test]
    fn test_reachable_and_fully_connected() {
        let mut maze = corridor();
        assert_eq!(reachable_from(&maze, (1, 1)).len(), 9);
        assert!(reachable_from(&maze, (0, 0)).is_empty());
        assert!(!is_fully_connected(&maze));

        maze.set_wall((1, 5)).unwrap();
        assert!(is_fully_connected(&maze));
        assert!(is_fully_connected(&Maze::new(5, 5).unwrap()));
    }
}
