use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::DraughtsError;

/// The two sides of the board. South starts on the bottom rows and moves
/// towards row 0, North starts on the top rows and moves towards the last row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Side {
    South,
    North,
}

impl Side {
    pub fn opposite(&self) -> Self {
        match self {
            Side::South => Side::North,
            Side::North => Side::South,
        }
    }

    /// Row delta of a forward move.
    pub fn direction(&self) -> isize {
        match self {
            Side::South => -1,
            Side::North => 1,
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Side::South => 0,
            Side::North => 1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::South => write!(f, "South"),
            Side::North => write!(f, "North"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceColor {
    White,
    Red,
}

impl PieceColor {
    pub fn opposite(&self) -> Self {
        match self {
            PieceColor::White => PieceColor::Red,
            PieceColor::Red => PieceColor::White,
        }
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            PieceColor::White => (255, 255, 255),
            PieceColor::Red => (255, 0, 0),
        }
    }
}

impl FromStr for PieceColor {
    type Err = DraughtsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "white" => Ok(PieceColor::White),
            "red" => Ok(PieceColor::Red),
            other => Err(DraughtsError::InvalidConfig(format!("unknown colour '{}'", other))),
        }
    }
}

impl fmt::Display for PieceColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PieceColor::White => write!(f, "White"),
            PieceColor::Red => write!(f, "Red"),
        }
    }
}

/// Stable identity of a piece for the lifetime of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(pub usize);

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub id: PieceId,
    pub side: Side,
    pub king: bool,
    pub field: Field,
}

impl Piece {
    pub fn to_char(&self) -> char {
        match (self.side, self.king) {
            (Side::South, false) => 's',
            (Side::South, true) => 'S',
            (Side::North, false) => 'n',
            (Side::North, true) => 'N',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Occupied(PieceId),
    Empty,
}

/// What the rendering side needs to know about a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellView {
    Empty,
    Piece { side: Side, king: bool },
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Hash)]
pub struct Field {
    pub row: u8,
    pub col: u8,
}

impl Field {
    pub fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    pub fn is_dark(&self) -> bool {
        (self.row + self.col) % 2 == 1
    }

    /// The field shifted by the given deltas, if it stays on a `rows` x `cols` grid.
    pub(crate) fn offset(&self, d_row: isize, d_col: isize, rows: u8, cols: u8) -> Option<Field> {
        let row = self.row as isize + d_row;
        let col = self.col as isize + d_col;
        if (0..rows as isize).contains(&row) && (0..cols as isize).contains(&col) {
            Some(Field::new(row as u8, col as u8))
        } else {
            None
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Destination field mapped to the ordered list of pieces captured on the way.
/// An empty list is a plain step.
pub type Candidates = BTreeMap<Field, Vec<PieceId>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    InProgress,
    Won(Side),
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameResult::InProgress => write!(f, "in progress"),
            GameResult::Won(side) => write!(f, "{} wins", side),
        }
    }
}

/// One complete turn: the moving piece, every landing field in order and the
/// pieces captured along the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub piece: PieceId,
    pub from: Field,
    pub path: Vec<Field>,
    pub captured: Vec<PieceId>,
}

impl Turn {
    pub fn destination(&self) -> Field {
        *self.path.last().unwrap_or(&self.from)
    }
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let separator = if self.captured.is_empty() { "-" } else { "x" };
        write!(f, "{},{}", self.from.row, self.from.col)?;
        for field in &self.path {
            write!(f, "{}{},{}", separator, field.row, field.col)?;
        }
        Ok(())
    }
}
