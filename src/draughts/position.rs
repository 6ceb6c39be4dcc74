use log::debug;

use super::Cell::{Empty, Occupied};
use super::{BoardConfig, Cell, CellView, DraughtsError, Field, GameResult, Piece, PieceId, Side, Turn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    config: BoardConfig,
    cells: Vec<Vec<Cell>>,
    /// Indexed by `PieceId`. A captured piece leaves a `None` behind so ids stay stable.
    pieces: Vec<Option<Piece>>,
    remaining: [u32; 2],
}

impl Position {
    /// Creates the starting position for the given configuration.
    pub fn new(config: BoardConfig) -> Result<Self, DraughtsError> {
        let mut position = Self::empty(config)?;
        position.setup();
        Ok(position)
    }

    /// Creates a board without any pieces on it.
    pub fn empty(config: BoardConfig) -> Result<Self, DraughtsError> {
        config.validate()?;
        Ok(Self {
            config,
            cells: vec![vec![Empty; config.cols as usize]; config.rows as usize],
            pieces: Vec::new(),
            remaining: [0; 2],
        })
    }

    /// Throws away the current game and sets up a fresh one, possibly with a new configuration.
    pub fn reset(&mut self, config: BoardConfig) -> Result<(), DraughtsError> {
        *self = Self::new(config)?;
        Ok(())
    }

    fn setup(&mut self) {
        let rows = self.config.rows;
        for row in 0..rows {
            for col in 0..self.config.cols {
                let field = Field::new(row, col);
                if !field.is_dark() {
                    continue;
                }
                let side = if row < rows / 2 - 1 {
                    Side::North
                } else if row > rows / 2 {
                    Side::South
                } else {
                    continue;
                };
                self.put(field, side, false);
            }
        }
    }

    /// Puts a new piece on an empty dark field.
    pub fn place(&mut self, field: Field, side: Side, king: bool) -> Result<PieceId, DraughtsError> {
        let field = self.field(field.row as usize, field.col as usize)?;
        if !field.is_dark() || self.cell_at(field) != Empty {
            return Err(DraughtsError::InvalidPlacement(field));
        }
        Ok(self.put(field, side, king))
    }

    fn put(&mut self, field: Field, side: Side, king: bool) -> PieceId {
        let id = PieceId(self.pieces.len());
        self.pieces.push(Some(Piece { id, side, king, field }));
        self.cells[field.row as usize][field.col as usize] = Occupied(id);
        self.remaining[side.index()] += 1;
        id
    }
}

impl Position {
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn rows(&self) -> u8 {
        self.config.rows
    }

    pub fn cols(&self) -> u8 {
        self.config.cols
    }

    /// Checks a raw coordinate against the board bounds.
    pub fn field(&self, row: usize, col: usize) -> Result<Field, DraughtsError> {
        if row >= self.rows() as usize || col >= self.cols() as usize {
            return Err(DraughtsError::OutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            });
        }
        Ok(Field::new(row as u8, col as u8))
    }

    pub fn cell(&self, field: Field) -> Result<Cell, DraughtsError> {
        let field = self.field(field.row as usize, field.col as usize)?;
        Ok(self.cell_at(field))
    }

    /// Caller guarantees the field is on the board.
    pub(crate) fn cell_at(&self, field: Field) -> Cell {
        self.cells[field.row as usize][field.col as usize]
    }

    pub fn cell_view(&self, field: Field) -> Result<CellView, DraughtsError> {
        Ok(match self.cell(field)? {
            Empty => CellView::Empty,
            Occupied(id) => {
                let piece = self.piece(id)?;
                CellView::Piece {
                    side: piece.side,
                    king: piece.king,
                }
            }
        })
    }

    pub fn piece(&self, id: PieceId) -> Result<&Piece, DraughtsError> {
        self.pieces
            .get(id.0)
            .and_then(|p| p.as_ref())
            .ok_or(DraughtsError::UnknownPiece(id))
    }

    pub fn piece_at(&self, field: Field) -> Result<Option<&Piece>, DraughtsError> {
        match self.cell(field)? {
            Empty => Ok(None),
            Occupied(id) => self.piece(id).map(Some),
        }
    }

    /// Pieces of one side in row-major board order.
    pub fn pieces<'a>(&'a self, side: Side) -> impl Iterator<Item = &'a Piece> {
        self.cells.iter().flatten().filter_map(move |cell| match cell {
            Occupied(id) => self.pieces[id.0].as_ref().filter(|p| p.side == side),
            Empty => None,
        })
    }

    pub fn remaining(&self, side: Side) -> u32 {
        self.remaining[side.index()]
    }
}

impl Position {
    /// Moves a piece to one of its currently legal destinations, crowning it
    /// when it lands on the first or last row. Captured pieces stay on the
    /// board until `remove_captured` is called.
    pub fn apply_move(&mut self, id: PieceId, destination: Field) -> Result<(), DraughtsError> {
        let from = self.piece(id)?.field;
        let destination = self.field(destination.row as usize, destination.col as usize)?;
        if !self.get_valid_moves(id)?.contains_key(&destination) {
            return Err(DraughtsError::IllegalMove { from, to: destination });
        }

        self.cells[from.row as usize][from.col as usize] = Empty;
        self.cells[destination.row as usize][destination.col as usize] = Occupied(id);

        let last_row = self.rows() - 1;
        if let Some(piece) = self.pieces[id.0].as_mut() {
            piece.field = destination;
            debug!("{} {} moved {} -> {}", piece.side, id, from, destination);
            if !piece.king && (destination.row == 0 || destination.row == last_row) {
                piece.king = true;
                debug!("{} {} crowned on {}", piece.side, id, destination);
            }
        }
        Ok(())
    }

    /// Takes the given pieces off the board and updates the counts of their owners.
    /// Nothing is removed if any id is unknown or listed twice.
    pub fn remove_captured(&mut self, captured: &[PieceId]) -> Result<(), DraughtsError> {
        let mut pieces: Vec<Piece> = Vec::with_capacity(captured.len());
        for &id in captured {
            let piece = *self.piece(id)?;
            if pieces.iter().any(|p| p.id == id) {
                return Err(DraughtsError::UnknownPiece(id));
            }
            pieces.push(piece);
        }

        for piece in pieces {
            let id = piece.id;
            self.cells[piece.field.row as usize][piece.field.col as usize] = Empty;
            self.pieces[id.0] = None;
            self.remaining[piece.side.index()] -= 1;
            debug!(
                "{} {} captured on {}, {} left",
                piece.side,
                id,
                piece.field,
                self.remaining(piece.side)
            );
        }
        Ok(())
    }

    /// A side wins as soon as the other side has no pieces left.
    pub fn winner(&self) -> GameResult {
        if self.remaining(Side::South) == 0 {
            GameResult::Won(Side::North)
        } else if self.remaining(Side::North) == 0 {
            GameResult::Won(Side::South)
        } else {
            GameResult::InProgress
        }
    }

    /// Replays a whole turn hop by hop, removing each captured piece right after its hop.
    pub fn play_turn(&mut self, turn: &Turn) -> Result<(), DraughtsError> {
        for (i, &landing) in turn.path.iter().enumerate() {
            self.apply_move(turn.piece, landing)?;
            if let Some(&captured) = turn.captured.get(i) {
                self.remove_captured(&[captured])?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draughts::BoardSize;

    #[test]
    fn test_initial_piece_counts() {
        for size in [BoardSize::Eight, BoardSize::Ten, BoardSize::Twelve] {
            let config = BoardConfig::from_size(size);
            let position = Position::new(config).unwrap();
            let (rows, cols) = size.dimensions();
            let expected = (cols as u32 / 2) * (rows as u32 / 2 - 1);
            assert_eq!(config.pieces_per_side(), expected);
            assert_eq!(position.remaining(Side::South), expected);
            assert_eq!(position.remaining(Side::North), expected);
            assert_eq!(position.pieces(Side::South).count() as u32, expected);
            assert_eq!(position.pieces(Side::North).count() as u32, expected);
            assert!(2 * expected <= rows as u32 * cols as u32);
        }
    }

    #[test]
    fn test_pieces_only_on_dark_fields() {
        let position = Position::new(BoardConfig::from_size(BoardSize::Ten)).unwrap();
        for side in [Side::South, Side::North] {
            for piece in position.pieces(side) {
                assert!(piece.field.is_dark(), "{:?} on a light field", piece);
                assert!(!piece.king);
            }
        }
        // the two middle rows start empty
        for col in 0..10 {
            assert_eq!(position.cell(Field::new(4, col)).unwrap(), Cell::Empty);
            assert_eq!(position.cell(Field::new(5, col)).unwrap(), Cell::Empty);
        }
    }

    #[test]
    fn test_out_of_bounds() {
        let position = Position::new(BoardConfig::default()).unwrap();
        assert_eq!(
            position.cell(Field::new(8, 0)),
            Err(DraughtsError::OutOfBounds { row: 8, col: 0, rows: 8, cols: 8 })
        );
        assert!(position.field(0, 8).is_err());
        assert!(position.piece_at(Field::new(3, 12)).is_err());
        assert!(position.field(7, 7).is_ok());
    }

    #[test]
    fn test_cell_view() {
        let mut position = Position::empty(BoardConfig::default()).unwrap();
        position.place(Field::new(3, 2), Side::North, true).unwrap();
        assert_eq!(
            position.cell_view(Field::new(3, 2)).unwrap(),
            CellView::Piece { side: Side::North, king: true }
        );
        assert_eq!(position.cell_view(Field::new(3, 4)).unwrap(), CellView::Empty);
    }

    #[test]
    fn test_place_rejects_light_and_occupied_fields() {
        let mut position = Position::empty(BoardConfig::default()).unwrap();
        assert_eq!(
            position.place(Field::new(0, 0), Side::South, false),
            Err(DraughtsError::InvalidPlacement(Field::new(0, 0)))
        );
        position.place(Field::new(0, 1), Side::South, false).unwrap();
        assert!(position.place(Field::new(0, 1), Side::North, false).is_err());
        assert_eq!(position.remaining(Side::South), 1);
        assert_eq!(position.remaining(Side::North), 0);
    }

    #[test]
    fn test_apply_move_and_promotion() {
        let mut position = Position::empty(BoardConfig::default()).unwrap();
        let id = position.place(Field::new(1, 2), Side::South, false).unwrap();
        position.apply_move(id, Field::new(0, 1)).unwrap();
        assert_eq!(position.cell(Field::new(1, 2)).unwrap(), Cell::Empty);
        assert_eq!(position.cell(Field::new(0, 1)).unwrap(), Cell::Occupied(id));
        assert!(position.piece(id).unwrap().king);

        // stays a king after moving away from the last row
        position.apply_move(id, Field::new(1, 0)).unwrap();
        assert!(position.piece(id).unwrap().king);
        assert_eq!(position.piece(id).unwrap().field, Field::new(1, 0));
    }

    #[test]
    fn test_apply_move_rejects_illegal_destination() {
        let mut position = Position::new(BoardConfig::default()).unwrap();
        let id = match position.cell(Field::new(5, 2)).unwrap() {
            Cell::Occupied(id) => id,
            Cell::Empty => panic!("expected a piece on (5, 2)"),
        };
        // backwards for a man
        assert_eq!(
            position.apply_move(id, Field::new(6, 1)),
            Err(DraughtsError::IllegalMove { from: Field::new(5, 2), to: Field::new(6, 1) })
        );
        // two fields without a piece in between
        assert!(position.apply_move(id, Field::new(3, 4)).is_err());
        assert!(position.apply_move(id, Field::new(9, 9)).is_err());
        assert_eq!(position.piece(id).unwrap().field, Field::new(5, 2));
    }

    #[test]
    fn test_remove_captured_and_winner() {
        let mut position = Position::empty(BoardConfig::default()).unwrap();
        let south = position.place(Field::new(5, 2), Side::South, false).unwrap();
        let north = position.place(Field::new(4, 3), Side::North, false).unwrap();
        assert_eq!(position.winner(), GameResult::InProgress);

        position.remove_captured(&[north]).unwrap();
        assert_eq!(position.remaining(Side::North), 0);
        assert_eq!(position.cell(Field::new(4, 3)).unwrap(), Cell::Empty);
        assert_eq!(position.winner(), GameResult::Won(Side::South));
        assert_eq!(position.remaining(Side::South), 1);

        // a piece can only be removed once
        assert_eq!(position.remove_captured(&[north]), Err(DraughtsError::UnknownPiece(north)));
        assert!(position.piece(south).is_ok());
    }

    #[test]
    fn test_failed_removal_leaves_board_untouched() {
        let mut position = Position::empty(BoardConfig::default()).unwrap();
        let first = position.place(Field::new(2, 1), Side::North, false).unwrap();
        let second = position.place(Field::new(2, 3), Side::North, false).unwrap();
        let before = position.clone();

        assert_eq!(
            position.remove_captured(&[first, second, first]),
            Err(DraughtsError::UnknownPiece(first))
        );
        assert_eq!(
            position.remove_captured(&[second, PieceId(99)]),
            Err(DraughtsError::UnknownPiece(PieceId(99)))
        );
        assert_eq!(position, before);
        assert_eq!(position.remaining(Side::North), 2);
    }

    #[test]
    fn test_winner_north() {
        let mut position = Position::empty(BoardConfig::default()).unwrap();
        let south = position.place(Field::new(5, 2), Side::South, false).unwrap();
        position.place(Field::new(2, 3), Side::North, false).unwrap();
        position.remove_captured(&[south]).unwrap();
        assert_eq!(position.winner(), GameResult::Won(Side::North));
    }

    #[test]
    fn test_reset() {
        let mut position = Position::empty(BoardConfig::default()).unwrap();
        position.reset(BoardConfig::from_size(BoardSize::Twelve)).unwrap();
        assert_eq!(position.rows(), 12);
        assert_eq!(position.remaining(Side::North), 30);
    }
}
