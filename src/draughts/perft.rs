use super::{DraughtsError, Position, Side};

/// Counts the complete turns reachable in `depth` plies.
pub fn perft(position: &Position, side: Side, depth: u8) -> Result<u64, DraughtsError> {
    if depth == 0 {
        return Ok(1);
    }

    let mut node_count = 0u64;
    for turn in position.generate_turns(side)? {
        let mut new_position = position.clone();
        new_position.play_turn(&turn)?;
        node_count += perft(&new_position, side.opposite(), depth - 1)?;
    }
    Ok(node_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draughts::notation::{from_notation, INITIAL_POSITION};
    use crate::draughts::PieceColor;

    #[test]
    fn test_perft() {
        let (position, side) = from_notation(INITIAL_POSITION, PieceColor::White).unwrap();
        assert_eq!(perft(&position, side, 1).unwrap(), 7);
        assert_eq!(perft(&position, side, 2).unwrap(), 49);
        assert_eq!(perft(&position, side, 3).unwrap(), 302);
        assert_eq!(perft(&position, side, 4).unwrap(), 1469);
    }

    #[test]
    fn test_perft_forced_capture() {
        // South has to take on (4, 3) even though it has other pieces to move
        let (position, side) = from_notation("8/8/8/8/3n4/2s5/8/s7 s", PieceColor::White).unwrap();
        assert_eq!(perft(&position, side, 1).unwrap(), 1);
    }

    #[test]
    fn test_perft_finished_game() {
        let (position, side) = from_notation("8/8/8/8/8/2s5/8/8 n", PieceColor::White).unwrap();
        assert_eq!(perft(&position, side, 1).unwrap(), 0);
        assert_eq!(perft(&position, side, 0).unwrap(), 1);
    }
}
