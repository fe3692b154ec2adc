use std::rc::Rc;

mod bfs;
mod chase;
mod repair;

pub use bfs::{is_fully_connected, path_exists, reachable_from, shortest_path};
pub use chase::chase_step;
pub use repair::{connect_regions, force_connect};

use crate::maze::Coord;

/// A BFS node that remembers how it was reached.
struct TrackedCell {
    /// Coordinates of the cell in the maze
    coord: Coord,
    /// The cell this one was reached from
    parent: Option<Rc<TrackedCell>>,
}

impl TrackedCell {
    /// Walks the parent chain back to the root and returns it root-first.
    fn route(self: &Rc<Self>) -> Vec<Coord> {
        let mut route = vec![self.coord];
        let mut child = Rc::clone(self);
        while let Some(parent) = child.parent.clone() {
            route.push(parent.coord);
            child = parent;
        }
        route.reverse();
        route
    }
}
