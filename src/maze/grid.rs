use std::sync::mpsc::Sender;

use super::cell::GridCell;

/// State changes published to an observer while a grid is being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridEvent {
    /// The grid was created with every cell set to `cell`.
    Initial { cell: GridCell, width: u16, height: u16 },
    /// A single cell changed.
    Update {
        coord: (u16, u16),
        old: GridCell,
        new: GridCell,
    },
}

pub struct Grid {
    data: Box<[GridCell]>,
    width: u16,
    height: u16,
    sender: Option<Sender<GridEvent>>,
}

impl Grid {
    pub fn new(width: u16, height: u16, cell: GridCell, sender: Option<Sender<GridEvent>>) -> Self {
        let data = vec![cell; width as usize * height as usize].into_boxed_slice();
        if let Some(s) = &sender {
            let _ = s.send(GridEvent::Initial {
                cell,
                width,
                height,
            });
        }
        Grid {
            data,
            width,
            height,
            sender,
        }
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn data(&self) -> &[GridCell] {
        &self.data
    }

    pub fn is_boundary(&self, x: u16, y: u16) -> bool {
        x == 0 || y == 0 || x == self.width - 1 || y == self.height - 1
    }

    fn ravel_index(&self, x: u16, y: u16) -> usize {
        // Overflow-safe since width and height are u16 (assuming usize is at least 32 bits)
        y as usize * self.width as usize + x as usize
    }

    /// Detaches the observer. Later writes are silent.
    pub fn detach(&mut self) -> Option<Sender<GridEvent>> {
        self.sender.take()
    }

    pub fn set(&mut self, coord: (u16, u16), cell: GridCell) {
        let idx = self.ravel_index(coord.0, coord.1);
        let old = self.data[idx];
        if old != cell {
            self.data[idx] = cell;
            if let Some(sender) = &self.sender {
                // A dropped receiver only means nobody is watching anymore.
                let _ = sender.send(GridEvent::Update {
                    coord,
                    old,
                    new: cell,
                });
            }
        }
    }
}

impl Clone for Grid {
    /// Clones the cells only; the copy has no observer.
    fn clone(&self) -> Self {
        Grid {
            data: self.data.clone(),
            width: self.width,
            height: self.height,
            sender: None,
        }
    }
}

impl PartialEq for Grid {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height && self.data == other.data
    }
}

impl std::fmt::Debug for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Grid")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("observed", &self.sender.is_some())
            .finish()
    }
}

impl std::ops::Index<(u16, u16)> for Grid {
    type Output = GridCell;

    fn index(&self, index: (u16, u16)) -> &Self::Output {
        &self.data[self.ravel_index(index.0, index.1)]
    }
}
