use super::{BoardConfig, DraughtsError, Field, PieceColor, Position, Side};

/// The 8x8 start position, South to move.
pub const INITIAL_POSITION: &str = "1n1n1n1n/n1n1n1n1/1n1n1n1n/8/8/s1s1s1s1/1s1s1s1s/s1s1s1s1 s";

/// Parses a position line like `INITIAL_POSITION`.
///
/// Ranks run from row 0 (North's back row) to the last row and are separated
/// by `/`. Within a rank `n`/`N` is a North man/king, `s`/`S` a South
/// man/king and a number skips that many empty cells. The rank part is
/// followed by the side to move, `s` or `n`.
pub fn from_notation(notation: &str, south_color: PieceColor) -> Result<(Position, Side), DraughtsError> {
    let parts: Vec<&str> = notation.split_whitespace().collect();
    if parts.len() != 2 {
        return Err(DraughtsError::InvalidNotation(String::from(
            "expected ranks and side to move separated by a space",
        )));
    }

    let ranks: Vec<&str> = parts[0].split('/').collect();
    let rows = ranks.len();
    let cols = rank_width(ranks[0])?;
    if rows > u8::MAX as usize || cols > u8::MAX as usize {
        return Err(DraughtsError::InvalidNotation(format!("board of {}x{} is too large", rows, cols)));
    }
    let config = BoardConfig {
        rows: rows as u8,
        cols: cols as u8,
        south_color,
    };
    config
        .validate()
        .map_err(|e| DraughtsError::InvalidNotation(e.to_string()))?;

    let mut position = Position::empty(config)?;
    for (row, rank) in ranks.iter().enumerate() {
        if rank_width(rank)? != cols {
            return Err(DraughtsError::InvalidNotation(format!(
                "rank {} has {} cells, expected {}",
                row,
                rank_width(rank)?,
                cols
            )));
        }
        let mut col = 0;
        let mut skip = 0;
        for c in rank.chars() {
            if let Some(digit) = c.to_digit(10) {
                skip = skip * 10 + digit as usize;
                continue;
            }
            col += skip;
            skip = 0;
            let (side, king) = match c {
                's' => (Side::South, false),
                'S' => (Side::South, true),
                'n' => (Side::North, false),
                'N' => (Side::North, true),
                _ => return Err(DraughtsError::InvalidNotation(format!("invalid piece character '{}'", c))),
            };
            position
                .place(Field::new(row as u8, col as u8), side, king)
                .map_err(|e| DraughtsError::InvalidNotation(e.to_string()))?;
            col += 1;
        }
    }

    let side = match parts[1] {
        "s" => Side::South,
        "n" => Side::North,
        other => {
            return Err(DraughtsError::InvalidNotation(format!("invalid side to move '{}'", other)));
        }
    };
    Ok((position, side))
}

fn rank_width(rank: &str) -> Result<usize, DraughtsError> {
    let mut width = 0;
    let mut skip = 0;
    for c in rank.chars() {
        match c.to_digit(10) {
            Some(digit) => skip = skip * 10 + digit as usize,
            None => {
                width += skip + 1;
                skip = 0;
            }
        }
    }
    width += skip;
    if width == 0 {
        return Err(DraughtsError::InvalidNotation(String::from("empty rank")));
    }
    Ok(width)
}

/// Writes a position in the format read by `from_notation`.
pub fn to_notation(position: &Position, side_to_move: Side) -> String {
    let mut ranks = Vec::with_capacity(position.rows() as usize);
    for row in 0..position.rows() {
        let mut rank = String::new();
        let mut empty = 0;
        for col in 0..position.cols() {
            match position.piece_at(Field::new(row, col)) {
                Ok(Some(piece)) => {
                    if empty > 0 {
                        rank.push_str(&empty.to_string());
                        empty = 0;
                    }
                    rank.push(piece.to_char());
                }
                _ => empty += 1,
            }
        }
        if empty > 0 {
            rank.push_str(&empty.to_string());
        }
        ranks.push(rank);
    }
    let side = match side_to_move {
        Side::South => 's',
        Side::North => 'n',
    };
    format!("{} {}", ranks.join("/"), side)
}
