//! Mazes made of mazes.
//!
//! A coarse layout grid says which neighbouring sectors must be joined. Every sector is
//! carved on its own as a [`BitMaze`], optionally constrained by a mask, and joined sectors
//! get one random opening on their shared edge.

mod bitmaze;
mod flags;

pub use bitmaze::BitMaze;
pub use flags::CellFlags;

use rand::Rng;

use crate::error::{MazeError, Result};
use crate::maze::{Coord, Direction};

/// Layout, sector size and optional mask of a meta-maze.
#[derive(Debug, Clone, PartialEq)]
pub struct MetaMaze {
    meta_width: u16,
    meta_height: u16,
    /// Direction bits per sector saying which neighbours it connects to.
    layout: Vec<CellFlags>,
    sector_width: u16,
    sector_height: u16,
    /// One entry per cell of the full grid, `true` meaning excluded.
    mask: Option<Vec<bool>>,
}

/// What [`MetaMaze::build`] produced.
#[derive(Debug, Clone)]
pub struct MetaReport {
    pub maze: BitMaze,
    /// Sectors left uncarved because every cell in them is masked, as `(column, row)`.
    pub skipped: Vec<Coord>,
    /// Unmasked cells the carve never reached, because the mask cuts their sector apart.
    /// Full-grid coordinates.
    pub unreached: Vec<Coord>,
    /// Required joins with no unmasked cell pair on the shared edge: sector and direction.
    pub unstitched: Vec<(Coord, Direction)>,
}

impl MetaMaze {
    pub fn new(
        meta_width: u16,
        meta_height: u16,
        layout: Vec<CellFlags>,
        sector_width: u16,
        sector_height: u16,
    ) -> Result<Self> {
        if meta_width == 0 || meta_height == 0 {
            return Err(MazeError::InvalidSector {
                width: meta_width,
                height: meta_height,
            });
        }
        if sector_width == 0 || sector_height == 0 {
            return Err(MazeError::InvalidSector {
                width: sector_width,
                height: sector_height,
            });
        }
        let too_large = || MazeError::TooLarge {
            width: meta_width as u32 * sector_width as u32,
            height: meta_height as u32 * sector_height as u32,
            max: u16::MAX,
        };
        meta_width.checked_mul(sector_width).ok_or_else(too_large)?;
        meta_height.checked_mul(sector_height).ok_or_else(too_large)?;

        let expected = meta_width as usize * meta_height as usize;
        if layout.len() != expected {
            return Err(MazeError::InvalidMetaLayout {
                expected,
                actual: layout.len(),
            });
        }
        Ok(MetaMaze {
            meta_width,
            meta_height,
            layout,
            sector_width,
            sector_height,
            mask: None,
        })
    }

    /// A layout that joins every sector into one spanning tree.
    pub fn random_layout(
        meta_width: u16,
        meta_height: u16,
        rng: &mut impl Rng,
    ) -> Result<Vec<CellFlags>> {
        let mut meta = BitMaze::new(meta_width, meta_height)?;
        meta.carve(rng);
        Ok(meta
            .cells()
            .iter()
            .map(|&flags| flags & CellFlags::OPENINGS)
            .collect())
    }

    /// Excludes cells of the full grid from generation. The mask is row-major over
    /// `(meta_width * sector_width) x (meta_height * sector_height)` cells.
    pub fn with_mask(mut self, mask: Vec<bool>) -> Result<Self> {
        let (width, height) = self.full_size();
        let expected = width as usize * height as usize;
        if mask.len() != expected {
            return Err(MazeError::InvalidMask {
                expected,
                actual: mask.len(),
            });
        }
        self.mask = Some(mask);
        Ok(self)
    }

    /// Masks every cell of one sector, given as `(column, row)` on the meta grid.
    pub fn mask_sector(mut self, sector: Coord) -> Result<Self> {
        if sector.0 >= self.meta_width || sector.1 >= self.meta_height {
            return Err(MazeError::OutOfBounds {
                coord: sector,
                width: self.meta_width,
                height: self.meta_height,
            });
        }
        let (width, height) = self.full_size();
        let (sw, sh) = (self.sector_width, self.sector_height);
        let mask = self
            .mask
            .get_or_insert_with(|| vec![false; width as usize * height as usize]);
        for y in sector.1 * sh..(sector.1 + 1) * sh {
            for x in sector.0 * sw..(sector.0 + 1) * sw {
                mask[y as usize * width as usize + x as usize] = true;
            }
        }
        Ok(self)
    }

    /// Size of the assembled maze in cells. Fits in `u16`, checked by [`MetaMaze::new`].
    pub fn full_size(&self) -> (u16, u16) {
        (
            self.meta_width * self.sector_width,
            self.meta_height * self.sector_height,
        )
    }

    /// Carves each sector independently, then opens one wall per required join.
    pub fn build(&self, rng: &mut impl Rng) -> Result<MetaReport> {
        let (width, height) = self.full_size();
        let mut maze = BitMaze::new(width, height)?;
        let mut skipped = Vec::new();
        let mut unreached = Vec::new();

        for i in 0..self.meta_width {
            for j in 0..self.meta_height {
                let sector_mask = self.sector_mask((i, j));
                let mut sector = BitMaze::new(self.sector_width, self.sector_height)?;
                if !sector.carve_masked(&sector_mask, rng)? {
                    tracing::warn!("[meta] skipping sector ({}, {})", i, j);
                    skipped.push((i, j));
                }
                let stranded = self.paste(&mut maze, &sector, (i, j));
                if !stranded.is_empty() {
                    tracing::warn!(
                        "[meta] sector ({}, {}) is split by its mask, {} cells left uncarved",
                        i,
                        j,
                        stranded.len()
                    );
                    unreached.extend(stranded);
                }
            }
        }

        let mut unstitched = Vec::new();
        for i in 0..self.meta_width {
            for j in 0..self.meta_height {
                for direction in [Direction::Right, Direction::Down] {
                    if !self.requires_join((i, j), direction) {
                        continue;
                    }
                    if !self.stitch(&mut maze, (i, j), direction, rng) {
                        tracing::warn!(
                            "[meta] no unmasked edge between sector ({}, {}) and its {:?} neighbour",
                            i,
                            j,
                            direction
                        );
                        unstitched.push(((i, j), direction));
                    }
                }
            }
        }

        tracing::debug!(
            "[meta] built {}x{} from {}x{} sectors, {} skipped, {} unstitched",
            width,
            height,
            self.meta_width,
            self.meta_height,
            skipped.len(),
            unstitched.len()
        );
        Ok(MetaReport {
            maze,
            skipped,
            unreached,
            unstitched,
        })
    }

    fn layout_at(&self, sector: Coord) -> CellFlags {
        self.layout[sector.1 as usize * self.meta_width as usize + sector.0 as usize]
    }

    /// The neighbouring sector, if it exists on the meta grid.
    fn sector_neighbor(&self, sector: Coord, direction: Direction) -> Option<Coord> {
        let (dx, dy) = direction.delta();
        let x = sector.0.checked_add_signed(dx as i16)?;
        let y = sector.1.checked_add_signed(dy as i16)?;
        (x < self.meta_width && y < self.meta_height).then_some((x, y))
    }

    /// Either side of the shared edge asking for the join is enough.
    fn requires_join(&self, sector: Coord, direction: Direction) -> bool {
        let Some(other) = self.sector_neighbor(sector, direction) else {
            return false;
        };
        self.layout_at(sector).contains(CellFlags::opening(direction))
            || self
                .layout_at(other)
                .contains(CellFlags::opening(direction.opposite()))
    }

    fn sector_mask(&self, sector: Coord) -> Vec<bool> {
        let (sw, sh) = (self.sector_width as usize, self.sector_height as usize);
        let Some(mask) = &self.mask else {
            return vec![false; sw * sh];
        };
        let width = self.meta_width as usize * sw;
        let (ox, oy) = (sector.0 as usize * sw, sector.1 as usize * sh);
        (0..sh)
            .flat_map(|y| (0..sw).map(move |x| (x, y)))
            .map(|(x, y)| mask[(oy + y) * width + ox + x])
            .collect()
    }

    /// Copies a carved sector into place and returns the full-grid coordinates of its
    /// untouched cells.
    fn paste(&self, maze: &mut BitMaze, sector: &BitMaze, at: Coord) -> Vec<Coord> {
        let (ox, oy) = (at.0 * self.sector_width, at.1 * self.sector_height);
        let mut untouched = Vec::new();
        for y in 0..sector.height() {
            for x in 0..sector.width() {
                let flags = sector[(x, y)];
                if flags.is_untouched() {
                    untouched.push((ox + x, oy + y));
                }
                maze.replace((ox + x, oy + y), flags);
            }
        }
        untouched
    }

    /// Opens one random wall on the edge between `sector` and its neighbour in `direction`,
    /// choosing only among positions where both sides are carved. `direction` is `Right` or
    /// `Down`.
    fn stitch(
        &self,
        maze: &mut BitMaze,
        sector: Coord,
        direction: Direction,
        rng: &mut impl Rng,
    ) -> bool {
        let (sw, sh) = (self.sector_width, self.sector_height);
        let edge: Vec<Coord> = match direction {
            Direction::Right => {
                let x = sector.0 * sw + sw - 1;
                (0..sh).map(|y| (x, sector.1 * sh + y)).collect()
            }
            Direction::Down => {
                let y = sector.1 * sh + sh - 1;
                (0..sw).map(|x| (sector.0 * sw + x, y)).collect()
            }
            Direction::Up | Direction::Left => unreachable!("edges are stitched right and down"),
        };

        let usable = |cell: Coord| {
            let flags = maze[cell];
            !flags.is_masked() && !flags.is_untouched()
        };
        let candidates = edge
            .into_iter()
            .filter_map(|cell| maze.neighbor(cell, direction).map(|across| (cell, across)))
            .filter(|&(cell, across)| usable(cell) && usable(across))
            .collect::<Vec<_>>();
        if candidates.is_empty() {
            return false;
        }

        let (cell, across) = candidates[rng.random_range(0..candidates.len())];
        maze.insert(cell, CellFlags::opening(direction));
        maze.insert(across, CellFlags::opening(direction.opposite()));
        true
    }
}
