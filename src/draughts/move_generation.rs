use log::trace;

use super::Cell::{Empty, Occupied};
use super::{Candidates, DraughtsError, Field, Piece, PieceId, Position, Side, Turn};

/// Up-left, up-right, down-left, down-right.
const DIAGONALS: [(isize, isize); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

const STEP: isize = 1;
const CAPTURE: isize = 2;

impl Position {
    /// Collects every destination the piece can reach in one turn segment,
    /// mapped to the pieces it jumps on the way.
    ///
    /// With `chain_captures` the capture search continues from every landing
    /// field, so a destination can carry several captured pieces. When two
    /// chains reach the same landing field the longer one is kept; on equal
    /// length the chain found first (in `DIAGONALS` order) wins.
    pub fn generate_moves(
        &self,
        id: PieceId,
        include_steps: bool,
        include_captures: bool,
        chain_captures: bool,
    ) -> Result<Candidates, DraughtsError> {
        let piece = self.piece(id)?;
        let mut candidates = Candidates::new();

        if include_steps {
            for landing in self.explore_steps(piece) {
                merge_branch(&mut candidates, landing, Vec::new());
            }
        }
        if include_captures {
            for (landing, captured) in self.explore_captures(piece, piece.field, &[], chain_captures) {
                merge_branch(&mut candidates, landing, captured);
            }
        }
        Ok(candidates)
    }

    /// Moves that don't jump anything.
    pub fn get_valid_steps(&self, id: PieceId) -> Result<Candidates, DraughtsError> {
        self.generate_moves(id, true, false, false)
    }

    /// Single jumps over an opponent piece.
    pub fn get_valid_captures(&self, id: PieceId) -> Result<Candidates, DraughtsError> {
        self.generate_moves(id, false, true, false)
    }

    pub fn get_valid_moves(&self, id: PieceId) -> Result<Candidates, DraughtsError> {
        self.generate_moves(id, true, true, false)
    }

    /// Steps plus every field reachable through a chain of captures.
    pub fn get_capture_chains(&self, id: PieceId) -> Result<Candidates, DraughtsError> {
        self.generate_moves(id, true, true, true)
    }

    fn explore_steps(&self, piece: &Piece) -> Vec<Field> {
        DIAGONALS
            .iter()
            .filter_map(|&(d_row, d_col)| self.target(piece, piece.field, d_row, d_col, STEP))
            .collect()
    }

    /// Pure capture search from `from`. `path` holds the pieces already jumped
    /// in this chain; none of them may be jumped again.
    fn explore_captures(
        &self,
        piece: &Piece,
        from: Field,
        path: &[PieceId],
        chain: bool,
    ) -> Vec<(Field, Vec<PieceId>)> {
        let mut branches = Vec::new();

        for &(d_row, d_col) in DIAGONALS.iter() {
            let landing = match self.target(piece, from, d_row, d_col, CAPTURE) {
                Some(landing) => landing,
                None => continue,
            };
            let jumped = match self.jumped_opponent(piece, from, d_row, d_col) {
                Some(jumped) => jumped,
                None => continue,
            };
            if path.contains(&jumped) {
                continue;
            }

            let mut captured = path.to_vec();
            captured.push(jumped);
            trace!("{} can jump {} landing on {} ({} captured)", piece.id, jumped, landing, captured.len());

            if chain {
                let continuations = self.explore_captures(piece, landing, &captured, true);
                branches.push((landing, captured));
                branches.extend(continuations);
            } else {
                branches.push((landing, captured));
            }
        }
        branches
    }

    /// The empty field `distance` cells along a diagonal, if the piece may move that way.
    fn target(&self, piece: &Piece, from: Field, d_row: isize, d_col: isize, distance: isize) -> Option<Field> {
        if !piece.king && d_row != piece.side.direction() {
            return None;
        }
        let landing = from.offset(d_row * distance, d_col * distance, self.rows(), self.cols())?;
        match self.cell_at(landing) {
            Empty => Some(landing),
            Occupied(_) => None,
        }
    }

    fn jumped_opponent(&self, piece: &Piece, from: Field, d_row: isize, d_col: isize) -> Option<PieceId> {
        let between = from.offset(d_row, d_col, self.rows(), self.cols())?;
        match self.cell_at(between) {
            Occupied(id) => self.piece(id).ok().filter(|p| p.side != piece.side).map(|p| p.id),
            Empty => None,
        }
    }

    /// Whether any piece of `side` can jump right now.
    pub fn side_has_capture(&self, side: Side) -> bool {
        self.pieces(side)
            .any(|piece| !self.explore_captures(piece, piece.field, &[], false).is_empty())
    }

    /// Pieces the side to move may pick up: only capturing pieces when a capture exists.
    pub fn movable_pieces(&self, side: Side) -> Vec<PieceId> {
        let must_capture = self.side_has_capture(side);
        self.pieces(side)
            .filter(|piece| {
                if must_capture {
                    !self.explore_captures(piece, piece.field, &[], false).is_empty()
                } else {
                    !self.explore_steps(piece).is_empty()
                }
            })
            .map(|piece| piece.id)
            .collect()
    }

    /// Every complete turn for `side`. Capturing is mandatory and a chain has
    /// to go on for as long as the moving piece can keep jumping.
    pub fn generate_turns(&self, side: Side) -> Result<Vec<Turn>, DraughtsError> {
        let mut turns = Vec::new();
        let must_capture = self.side_has_capture(side);

        for id in self.movable_pieces(side) {
            let from = self.piece(id)?.field;
            if must_capture {
                let start = Turn {
                    piece: id,
                    from,
                    path: Vec::new(),
                    captured: Vec::new(),
                };
                self.continue_chain(start, &mut turns)?;
            } else {
                for landing in self.get_valid_steps(id)?.into_keys() {
                    turns.push(Turn {
                        piece: id,
                        from,
                        path: vec![landing],
                        captured: Vec::new(),
                    });
                }
            }
        }
        Ok(turns)
    }

    fn continue_chain(&self, turn: Turn, turns: &mut Vec<Turn>) -> Result<(), DraughtsError> {
        let captures = self.get_valid_captures(turn.piece)?;
        if captures.is_empty() {
            if !turn.path.is_empty() {
                turns.push(turn);
            }
            return Ok(());
        }
        for (landing, captured) in captures {
            let mut next = self.clone();
            next.apply_move(turn.piece, landing)?;
            next.remove_captured(&captured)?;

            let mut extended = turn.clone();
            extended.path.push(landing);
            extended.captured.extend(captured);
            next.continue_chain(extended, turns)?;
        }
        Ok(())
    }
}

/// Keeps the longest capture list per landing field.
fn merge_branch(candidates: &mut Candidates, landing: Field, captured: Vec<PieceId>) {
    match candidates.get(&landing) {
        Some(existing) if existing.len() >= captured.len() => {}
        _ => {
            candidates.insert(landing, captured);
        }
    }
}
