use crate::draughts::{Candidates, Field, Position};

pub mod console;

/// Draws the board as text with ANSI colours taken from the board's piece
/// colours. Candidate destinations in `highlights` are marked with `*`,
/// kings are upper-case.
pub fn render_board(position: &Position, highlights: Option<&Candidates>) -> String {
    render(position, highlights, true)
}

fn render(position: &Position, highlights: Option<&Candidates>, colored: bool) -> String {
    let cols = position.cols() as usize;
    let mut board_representation = String::from("     ");
    for col in 0..cols {
        board_representation.push_str(&format!("{:<4}", col));
    }
    board_representation.push('\n');
    board_representation.push_str(&border('┌', '┬', '┐', cols));

    for row in 0..position.rows() {
        board_representation.push_str(&format!("{:>2} │", row));
        for col in 0..position.cols() {
            let field = Field::new(row, col);
            let cell = match position.piece_at(field) {
                Ok(Some(piece)) if colored => {
                    let (r, g, b) = position.config().color_of(piece.side).rgb();
                    format!("\x1b[38;2;{};{};{}m{}\x1b[0m", r, g, b, piece.to_char())
                }
                Ok(Some(piece)) => piece.to_char().to_string(),
                _ if highlights.is_some_and(|h| h.contains_key(&field)) => String::from("*"),
                _ if field.is_dark() => String::from("."),
                _ => String::from(" "),
            };
            board_representation.push_str(&format!(" {} │", cell));
        }
        board_representation.push('\n');
        if row + 1 < position.rows() {
            board_representation.push_str(&border('├', '┼', '┤', cols));
        }
    }
    board_representation.push_str(&border('└', '┴', '┘', cols));
    board_representation
}

fn border(left: char, middle: char, right: char, cols: usize) -> String {
    let inner = vec!["───"; cols].join(&middle.to_string());
    format!("   {}{}{}\n", left, inner, right)
}
