use std::io::Write;

use clap::{Parser, ValueEnum};
use crossterm::{
    style::{Color, Stylize},
    terminal,
};
use labyrinth::{
    Difficulty, GenerationConfig, MazeEngine, Progress,
    generators::{Generator, get_rng},
    maze::{GridCell, Maze},
    meta::MetaMaze,
};
use tracing::level_filters::LevelFilter;
use unicode_truncate::UnicodeTruncateStr;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Quiet,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Quiet => LevelFilter::OFF,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "labyrinth")]
#[command(version)]
#[command(about = "Generate connected mazes in the terminal", long_about = None)]
struct Args {
    /// very-easy, easy, medium, hard or expert
    #[arg(short, long, default_value = "medium")]
    difficulty: Difficulty,
    #[arg(short, long)]
    seed: Option<u64>,
    /// Overrides the difficulty's width. Odd, at least 5.
    #[arg(long)]
    width: Option<u16>,
    /// Overrides the difficulty's height. Odd, at least 5.
    #[arg(long)]
    height: Option<u16>,
    /// hunt-and-kill or origin-shift
    #[arg(short, long, default_value = "origin-shift")]
    generator: Generator,
    /// Mazes already completed this session
    #[arg(short, long, default_value = "0")]
    completed: u32,
    /// Run hunt-and-kill on this many threads
    #[arg(short, long)]
    workers: Option<usize>,
    /// Compose a meta-maze of WxH sectors instead
    #[arg(long, value_parser = parse_size)]
    meta: Option<(u16, u16)>,
    /// Cells per meta-maze sector
    #[arg(long, value_parser = parse_size, default_value = "5x5")]
    sector: (u16, u16),
    /// Leave the sector at CxR out of the meta-maze. Repeatable.
    #[arg(long, value_parser = parse_size)]
    mask_sector: Vec<(u16, u16)>,
    #[arg(long)]
    no_color: bool,
    #[arg(long, value_enum, default_value = "info")]
    log_level: LogLevel,
}

fn parse_size(s: &str) -> Result<(u16, u16), String> {
    let (w, h) = s
        .split_once(['x', 'X', ','])
        .ok_or_else(|| format!("expected WxH, got '{s}'"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<u16>()
            .map_err(|e| format!("invalid size '{v}': {e}"))
    };
    Ok((parse(w)?, parse(h)?))
}

fn main() -> std::io::Result<()> {
    let args = Args::parse();

    let file_appender = tracing_appender::rolling::never("logs", "labyrinth.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_max_level(LevelFilter::from(args.log_level))
        .init();

    let result = match args.meta {
        Some(meta) => run_meta(&args, meta),
        None => run_single(&args),
    };
    match result {
        Ok((header, maze)) => print_maze(&header, &maze, args.no_color),
        Err(e) => {
            tracing::error!("[main] {}", e);
            eprintln!("{}", format!("error: {e}").with(Color::Red));
            drop(guard);
            std::process::exit(1);
        }
    }
}

fn run_single(args: &Args) -> labyrinth::Result<(String, Maze)> {
    let mut config = GenerationConfig::new(args.difficulty)
        .progress(Progress::new(args.completed))
        .generator(match args.workers {
            Some(workers) => Generator::Parallel { workers },
            None => args.generator,
        });
    if let Some(seed) = args.seed {
        config = config.seed(seed);
    }
    if args.width.is_some() || args.height.is_some() {
        let profile = args.difficulty.profile();
        config = config.dimensions(
            args.width.unwrap_or(profile.width),
            args.height.unwrap_or(profile.height),
        );
    }

    let generated = MazeEngine::new(config.clone()).generate()?;
    let mut header = format!(
        "{} | {} | {}x{} | seed {}",
        args.difficulty,
        config.generator,
        generated.maze.width(),
        generated.maze.height(),
        generated.seed
    );
    if let Some(enemy) = generated.enemy {
        header.push_str(&format!(" | enemy every {:?}", enemy.step_interval));
    }
    if generated.repaired > 0 {
        header.push_str(&format!(" | repaired {} cells", generated.repaired));
    }
    Ok((header, generated.maze))
}

fn run_meta(
    args: &Args,
    (meta_width, meta_height): (u16, u16),
) -> labyrinth::Result<(String, Maze)> {
    let mut rng = get_rng(args.seed);
    let layout = MetaMaze::random_layout(meta_width, meta_height, &mut rng)?;
    let (sector_width, sector_height) = args.sector;
    let mut meta = MetaMaze::new(meta_width, meta_height, layout, sector_width, sector_height)?;
    for &sector in &args.mask_sector {
        meta = meta.mask_sector(sector)?;
    }

    let report = meta.build(&mut rng)?;
    let maze = report.maze.to_maze()?;
    let header = format!(
        "meta {}x{} of {}x{} sectors | skipped {:?} | unreached {} | unstitched {}",
        meta_width,
        meta_height,
        sector_width,
        sector_height,
        report.skipped,
        report.unreached.len(),
        report.unstitched.len()
    );
    Ok((header, maze))
}

fn print_maze(header: &str, maze: &Maze, no_color: bool) -> std::io::Result<()> {
    let mut stdout = std::io::stdout().lock();
    let term_width = terminal::size().map(|(w, _)| w as usize).ok();

    let header = match term_width {
        Some(width) => header.unicode_truncate(width).0,
        None => header,
    };
    let needed = maze.width() as usize * GridCell::CELL_WIDTH as usize;
    if term_width.is_some_and(|width| width < needed) {
        tracing::warn!("[main] maze needs {} columns, terminal is narrower", needed);
    }

    if no_color {
        writeln!(stdout, "{header}")?;
        write!(stdout, "{}", maze.to_ascii())?;
    } else {
        writeln!(stdout, "{}", header.with(Color::Blue).bold())?;
        write!(stdout, "{maze}")?;
    }
    stdout.flush()
}
