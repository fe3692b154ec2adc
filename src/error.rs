use thiserror::Error;

use crate::maze::Coord;

/// Errors raised while configuring or querying a maze.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MazeError {
    #[error("maze dimensions must be odd and at least {min}x{min}, got {width}x{height}")]
    InvalidDimensions { width: u16, height: u16, min: u16 },

    #[error("coordinate {coord:?} is outside the {width}x{height} grid")]
    OutOfBounds { coord: Coord, width: u16, height: u16 },

    #[error("cells {from:?} and {to:?} are not two steps apart on one axis")]
    NotAdjacent { from: Coord, to: Coord },

    #[error("border cell {coord:?} must stay a wall")]
    BorderCell { coord: Coord },

    #[error("carve origin {coord:?} is not an interior cell at odd coordinates")]
    NotCanonical { coord: Coord },

    #[error("meta layout has {actual} entries, expected {expected}")]
    InvalidMetaLayout { expected: usize, actual: usize },

    #[error("mask has {actual} entries, expected {expected}")]
    InvalidMask { expected: usize, actual: usize },

    #[error("sector size must be at least 1x1, got {width}x{height}")]
    InvalidSector { width: u16, height: u16 },

    #[error("a {width}x{height} grid exceeds {max} cells per side")]
    TooLarge { width: u32, height: u32, max: u16 },

    #[error("unknown difficulty '{0}'")]
    UnknownDifficulty(String),

    #[error("unknown generator '{0}'")]
    UnknownGenerator(String),
}

pub type Result<T> = std::result::Result<T, MazeError>;
