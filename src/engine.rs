//! One call from a difficulty level to a finished, verified maze.

use std::sync::mpsc::Sender;

use rand::Rng;

use crate::difficulty::{Difficulty, EnemyProfile, Progress};
use crate::error::Result;
use crate::generators::{
    CarveParams, Generator, Opening, OpeningParams, add_random_openings, generate_maze, get_rng,
};
use crate::maze::{Coord, GridCell, GridEvent, Maze};
use crate::solvers::{force_connect, path_exists};

/// Everything a single generation request needs.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub difficulty: Difficulty,
    /// Fixed seed for reproducible mazes. `None` draws one from the OS.
    pub seed: Option<u64>,
    pub progress: Progress,
    pub generator: Generator,
    /// Overrides the difficulty's size. Must be odd and at least 5 on each side.
    pub dimensions: Option<(u16, u16)>,
    /// Receives every cell change while the maze is built.
    pub observer: Option<Sender<GridEvent>>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        GenerationConfig {
            difficulty: Difficulty::default(),
            seed: None,
            progress: Progress::default(),
            generator: Generator::OriginShift,
            dimensions: None,
            observer: None,
        }
    }
}

impl GenerationConfig {
    pub fn new(difficulty: Difficulty) -> Self {
        GenerationConfig {
            difficulty,
            ..Default::default()
        }
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn progress(mut self, progress: Progress) -> Self {
        self.progress = progress;
        self
    }

    pub fn generator(mut self, generator: Generator) -> Self {
        self.generator = generator;
        self
    }

    pub fn dimensions(mut self, width: u16, height: u16) -> Self {
        self.dimensions = Some((width, height));
        self
    }

    pub fn observer(mut self, sender: Sender<GridEvent>) -> Self {
        self.observer = Some(sender);
        self
    }
}

/// A finished maze with its markers. `start` and `end` are always joined by paths.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedMaze {
    pub maze: Maze,
    pub start: Coord,
    pub end: Coord,
    /// Where the adversary appears, when the difficulty has one.
    pub enemy_spawn: Option<Coord>,
    pub enemy: Option<EnemyProfile>,
    /// The seed that reproduces this maze.
    pub seed: u64,
    /// Extra openings punched after carving, in the order they were made.
    pub openings: Vec<Opening>,
    /// Walls opened by the straight-line repair. Zero when the carve already joined start and end.
    pub repaired: usize,
}

/// Runs difficulty lookup, carving, extra openings and connectivity repair, and keeps
/// track of session progress between mazes.
#[derive(Debug, Clone, Default)]
pub struct MazeEngine {
    config: GenerationConfig,
}

impl MazeEngine {
    pub fn new(config: GenerationConfig) -> Self {
        MazeEngine { config }
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Counts one more completed maze. Later mazes get fewer loops and a faster adversary.
    pub fn complete_level(&mut self) {
        self.config.progress.completed += 1;
    }

    pub fn generate(&self) -> Result<GeneratedMaze> {
        generate(&self.config)
    }
}

/// Builds one maze from `config`.
pub fn generate(config: &GenerationConfig) -> Result<GeneratedMaze> {
    let profile = config.difficulty.profile();
    let (width, height) = config
        .dimensions
        .unwrap_or((profile.width, profile.height));
    let mut maze = match &config.observer {
        Some(sender) => Maze::with_observer(width, height, sender.clone())?,
        None => Maze::new(width, height)?,
    };

    let seed = config.seed.unwrap_or_else(|| rand::rng().random());
    let mut rng = get_rng(Some(seed));

    let mut params = CarveParams::corners(&maze);
    params.extra_origins = config.progress.extra_origins(profile.base_origins);
    params.loop_chance = config.progress.loop_chance();
    generate_maze(&mut maze, config.generator, &params, &mut rng)?;

    let openings = add_random_openings(
        &mut maze,
        OpeningParams {
            density: profile.opening_density,
            threshold: profile.opening_threshold,
        },
        &mut rng,
    );

    let (start, end) = (params.start, params.end);
    let repaired = if path_exists(&maze, start, end) {
        0
    } else {
        tracing::warn!(
            "[verify] {:?} cannot reach {:?}, carving a direct route",
            start,
            end
        );
        force_connect(&mut maze, start, end)?
    };

    let enemy = profile.enemy.map(|e| e.after(config.progress));
    let enemy_spawn = enemy.map(|_| {
        if config.difficulty.spawns_enemy_far() {
            far_spawn(&maze, start).unwrap_or_else(|| central_spawn(&maze, start, end))
        } else {
            central_spawn(&maze, start, end)
        }
    });

    maze.mark(start, GridCell::START);
    maze.mark(end, GridCell::GOAL);
    if let Some(spawn) = enemy_spawn {
        maze.mark(spawn, GridCell::ENEMY);
    }
    maze.detach_observer();

    tracing::info!(
        "[generate] {} {}x{} seed={} completed={} openings={} repaired={} enemy={:?}",
        config.difficulty,
        width,
        height,
        seed,
        config.progress.completed,
        openings.len(),
        repaired,
        enemy_spawn
    );

    Ok(GeneratedMaze {
        maze,
        start,
        end,
        enemy_spawn,
        enemy,
        seed,
        openings,
        repaired,
    })
}

/// Scans backwards from `(width - 3, height - 3)`, row by row, for the first path cell further
/// than half the width from `start` in Manhattan distance.
fn far_spawn(maze: &Maze, start: Coord) -> Option<Coord> {
    let min_distance = maze.width() / 2;
    (1..=maze.height() - 3)
        .rev()
        .flat_map(|y| (1..=maze.width() - 3).rev().map(move |x| (x, y)))
        .find(|&c| {
            maze.is_path(c) && c.0.abs_diff(start.0) + c.1.abs_diff(start.1) > min_distance
        })
}

/// The canonical cell nearest the middle of the maze that is neither start nor end.
fn central_spawn(maze: &Maze, start: Coord, end: Coord) -> Coord {
    let centre = (maze.width() / 2, maze.height() / 2);
    maze.canonical_cells()
        .filter(|&c| c != start && c != end && maze.is_path(c))
        .min_by_key(|&c| c.0.abs_diff(centre.0) + c.1.abs_diff(centre.1))
        .unwrap_or(centre)
}
