pub mod difficulty;
pub mod engine;
pub mod error;
pub mod generators;
pub mod maze;
pub mod meta;
pub mod solvers;

pub use difficulty::{Difficulty, Progress};
pub use engine::{GeneratedMaze, GenerationConfig, MazeEngine};
pub use error::{MazeError, Result};
pub use maze::{Coord, Maze};
