use std::fmt;
use std::str::FromStr;

use super::{DraughtsError, PieceColor, Side};

pub const MIN_BOARD_SIZE: u8 = 8;
pub const MAX_BOARD_SIZE: u8 = 12;

/// The board sizes offered when starting a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoardSize {
    #[default]
    Eight,
    Ten,
    Twelve,
}

impl BoardSize {
    pub fn dimensions(&self) -> (u8, u8) {
        match self {
            BoardSize::Eight => (8, 8),
            BoardSize::Ten => (10, 10),
            BoardSize::Twelve => (12, 12),
        }
    }
}

impl FromStr for BoardSize {
    type Err = DraughtsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "8x8" | "8" => Ok(BoardSize::Eight),
            "10x10" | "10" => Ok(BoardSize::Ten),
            "12x12" | "12" => Ok(BoardSize::Twelve),
            other => Err(DraughtsError::InvalidConfig(format!(
                "unknown board size '{}', expected 8x8, 10x10 or 12x12",
                other
            ))),
        }
    }
}

impl fmt::Display for BoardSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (rows, cols) = self.dimensions();
        write!(f, "{}x{}", rows, cols)
    }
}

/// Settings fixed for the duration of one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardConfig {
    pub rows: u8,
    pub cols: u8,
    pub south_color: PieceColor,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self::from_size(BoardSize::default())
    }
}

impl BoardConfig {
    pub fn from_size(size: BoardSize) -> Self {
        let (rows, cols) = size.dimensions();
        Self {
            rows,
            cols,
            south_color: PieceColor::White,
        }
    }

    pub fn with_south_color(mut self, color: PieceColor) -> Self {
        self.south_color = color;
        self
    }

    pub fn validate(&self) -> Result<(), DraughtsError> {
        if self.rows != self.cols {
            return Err(DraughtsError::InvalidConfig(format!(
                "board must be square, got {}x{}",
                self.rows, self.cols
            )));
        }
        if self.rows % 2 != 0 {
            return Err(DraughtsError::InvalidConfig(format!("board size {} is odd", self.rows)));
        }
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&self.rows) {
            return Err(DraughtsError::InvalidConfig(format!(
                "board size {} outside {}..={}",
                self.rows, MIN_BOARD_SIZE, MAX_BOARD_SIZE
            )));
        }
        Ok(())
    }

    pub fn color_of(&self, side: Side) -> PieceColor {
        match side {
            Side::South => self.south_color,
            Side::North => self.south_color.opposite(),
        }
    }

    /// White always opens the game.
    pub fn first_to_move(&self) -> Side {
        if self.south_color == PieceColor::White {
            Side::South
        } else {
            Side::North
        }
    }

    /// Pieces each side starts with.
    pub fn pieces_per_side(&self) -> u32 {
        (self.cols as u32 / 2) * (self.rows as u32 / 2 - 1)
    }
}
