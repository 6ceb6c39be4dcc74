use thiserror::Error;

use super::{Field, PieceId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DraughtsError {
    #[error("Field ({row}, {col}) is outside the {rows}x{cols} board")]
    OutOfBounds { row: usize, col: usize, rows: u8, cols: u8 },
    #[error("Illegal move from {from} to {to}")]
    IllegalMove { from: Field, to: Field },
    #[error("Cannot place a piece on {0}")]
    InvalidPlacement(Field),
    #[error("Piece {0} is not on the board")]
    UnknownPiece(PieceId),
    #[error("Invalid board configuration: {0}")]
    InvalidConfig(String),
    #[error("Invalid position notation: {0}")]
    InvalidNotation(String),
    #[error("No piece selected")]
    NothingSelected,
    #[error("Turn is not complete yet")]
    TurnInProgress,
    #[error("Game already over")]
    GameOver,
    #[error("Not your turn")]
    NotYourTurn,
}
