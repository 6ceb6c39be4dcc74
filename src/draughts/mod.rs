pub mod config;
pub mod error;
pub mod game;
pub mod model;
pub mod notation;
pub mod perft;

mod move_generation;
mod position;
#[cfg(test)]
mod test_utils;

pub use config::{BoardConfig, BoardSize};
pub use error::DraughtsError;
pub use game::{Game, TurnState};
pub use model::{Candidates, Cell, CellView, Field, GameResult, Piece, PieceColor, PieceId, Side, Turn};
pub use position::Position;

#[cfg(test)]
mod tests {
    use super::notation::{from_notation, to_notation};
    use super::*;

    #[test]
    fn test_counters_follow_the_board() {
        let mut position = Position::new(BoardConfig::default()).unwrap();
        let mut side = Side::South;
        for _ in 0..60 {
            let turns = position.generate_turns(side).unwrap();
            if turns.is_empty() {
                break;
            }
            position.play_turn(&turns[turns.len() - 1]).unwrap();
            side = side.opposite();
            for s in [Side::South, Side::North] {
                assert_eq!(position.pieces(s).count() as u32, position.remaining(s));
            }
            let (reparsed, reparsed_side) = from_notation(&to_notation(&position, side), PieceColor::White).unwrap();
            assert_eq!(reparsed_side, side);
            assert_eq!(to_notation(&reparsed, side), to_notation(&position, side));
        }
    }
}
