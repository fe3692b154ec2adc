use crossterm::style::{Color, Stylize};

use std::fmt;

/// A single cell of the maze lattice, either walkable or solid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridCell {
    Path(PathType),
    Wall(WallType),
}

impl GridCell {
    pub const EMPTY: GridCell = GridCell::Path(PathType::Empty);
    pub const WALL: GridCell = GridCell::Wall(WallType::Wall);
    pub const MARK: GridCell = GridCell::Wall(WallType::Mark);
    pub const START: GridCell = GridCell::Path(PathType::Start);
    pub const GOAL: GridCell = GridCell::Path(PathType::Goal);
    pub const ENEMY: GridCell = GridCell::Path(PathType::Enemy);
    /// The width of each cell when rendered, in character widths.
    pub const CELL_WIDTH: u16 = 2;

    pub fn is_path(&self) -> bool {
        matches!(self, GridCell::Path(_))
    }

    pub fn is_wall(&self) -> bool {
        matches!(self, GridCell::Wall(_))
    }

    /// Plain ASCII glyph pair, for output that cannot carry colors.
    pub fn ascii(&self) -> &'static str {
        match self {
            GridCell::Path(PathType::Empty) => "  ",
            GridCell::Path(PathType::Start) => "S ",
            GridCell::Path(PathType::Goal) => "G ",
            GridCell::Path(PathType::Enemy) => "E ",
            GridCell::Wall(WallType::Wall) => "##",
            GridCell::Wall(WallType::Mark) => "++",
        }
    }
}

/// Walkable cell kinds. Everything except `Empty` is a marker placed by the caller.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathType {
    #[default]
    Empty,
    /// Where the player begins.
    Start,
    /// The exit the player is heading for.
    Goal,
    /// Spawn point of the chasing adversary.
    Enemy,
}

/// Solid cell kinds.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallType {
    #[default]
    Wall,
    /// A wall that a generator has queued as a frontier. Only observers care.
    Mark,
}

impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let styled_symbol = match self {
            GridCell::Path(path) => match path {
                PathType::Empty => "  ".with(Color::Reset),
                PathType::Start => "🟩".with(Color::Green),
                PathType::Goal => "🟥".with(Color::Red),
                PathType::Enemy => "👻".with(Color::Cyan),
            },
            GridCell::Wall(wall) => match wall {
                WallType::Wall => "⬜".with(Color::White),
                WallType::Mark => "🟪".with(Color::Magenta),
            },
        };

        #[cfg(debug_assertions)]
        {
            use unicode_width::UnicodeWidthStr;
            assert_eq!(
                styled_symbol.content().width(),
                GridCell::CELL_WIDTH as usize,
                "Each cell must occupy exactly two character widths."
            );
        }

        write!(f, "{}", styled_symbol)
    }
}
