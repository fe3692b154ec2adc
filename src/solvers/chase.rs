use crate::maze::{Coord, Direction, Maze};

/// Greedy pursuit: the orthogonal path neighbour of `from` closest to `target` in straight-line
/// distance. Ties go to the first direction in Up, Right, Down, Left order. `None` when boxed in.
pub fn chase_step(maze: &Maze, from: Coord, target: Coord) -> Option<Coord> {
    let distance = |c: Coord| {
        let dx = c.0 as i64 - target.0 as i64;
        let dy = c.1 as i64 - target.1 as i64;
        dx * dx + dy * dy
    };

    let mut best: Option<Coord> = None;
    for dir in [Direction::Up, Direction::Right, Direction::Down, Direction::Left] {
        let Some(next) = maze.step(from, dir, 1).filter(|&c| maze.is_path(c)) else {
            continue;
        };
        if best.is_none_or(|b| distance(next) < distance(b)) {
            best = Some(next);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moves_toward_target() {
        let mut maze = Maze::new(7, 7).unwrap();
        for x in 1..=5 {
            maze.set_path((x, 3)).unwrap();
        }
        maze.set_path((3, 2)).unwrap();
        assert_eq!(chase_step(&maze, (3, 3), (5, 3)), Some((4, 3)));
        assert_eq!(chase_step(&maze, (3, 3), (1, 3)), Some((2, 3)));
        assert_eq!(chase_step(&maze, (3, 3), (3, 1)), Some((3, 2)));
    }

    #[test]
    fn test_greedy_can_get_stuck() {
        let mut maze = Maze::new(7, 7).unwrap();
        maze.set_path((1, 1)).unwrap();
        assert_eq!(chase_step(&maze, (1, 1), (5, 5)), None);
        // Greedy picks the closer cell even when it is a dead end
        maze.set_path((2, 1)).unwrap();
        maze.set_path((1, 2)).unwrap();
        assert_eq!(chase_step(&maze, (1, 1), (5, 1)), Some((2, 1)));
    }

    #[test]
    fn test_tie_prefers_up_then_right() {
        let mut maze = Maze::new(7, 7).unwrap();
        for cell in [(3, 2), (4, 3), (3, 4), (2, 3)] {
            maze.set_path(cell).unwrap();
        }
        assert_eq!(chase_step(&maze, (3, 3), (3, 3)), Some((3, 2)));
        assert_eq!(chase_step(&maze, (3, 3), (5, 1)), Some((3, 2)));
    }
}
