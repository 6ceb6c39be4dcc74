use log::{debug, info};

use super::{BoardConfig, Candidates, DraughtsError, Field, GameResult, PieceId, Position, Side};
use crate::engines::Engine;

/// Where the side to move is within its turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnState {
    NoSelection,
    PieceSelected { piece: PieceId, candidates: Candidates },
    /// The piece has captured and must keep jumping with `candidates`.
    ChainInProgress { piece: PieceId, candidates: Candidates },
    TurnComplete,
}

#[derive(Debug, Clone)]
pub struct Game {
    position: Position,
    side_to_move: Side,
    state: TurnState,
    turn_number: u32,
}

impl Game {
    pub fn new(config: BoardConfig) -> Result<Self, DraughtsError> {
        let position = Position::new(config)?;
        Ok(Self::from_position(position, config.first_to_move()))
    }

    pub fn from_position(position: Position, side_to_move: Side) -> Self {
        Self {
            position,
            side_to_move,
            state: TurnState::NoSelection,
            turn_number: 0,
        }
    }

    pub fn reset(&mut self, config: BoardConfig) -> Result<(), DraughtsError> {
        *self = Self::new(config)?;
        Ok(())
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn side_to_move(&self) -> Side {
        self.side_to_move
    }

    pub fn state(&self) -> &TurnState {
        &self.state
    }

    /// Number of completed turns.
    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    pub fn selected(&self) -> Option<PieceId> {
        match &self.state {
            TurnState::PieceSelected { piece, .. } | TurnState::ChainInProgress { piece, .. } => Some(*piece),
            _ => None,
        }
    }

    /// Destinations to highlight for the selected piece.
    pub fn candidates(&self) -> Option<&Candidates> {
        match &self.state {
            TurnState::PieceSelected { candidates, .. } | TurnState::ChainInProgress { candidates, .. } => {
                Some(candidates)
            }
            _ => None,
        }
    }

    /// The board's verdict, or a loss for a side to move that has nothing left to play.
    pub fn result(&self) -> GameResult {
        let result = self.position.winner();
        if result == GameResult::InProgress
            && self.state == TurnState::NoSelection
            && self.position.movable_pieces(self.side_to_move).is_empty()
        {
            return GameResult::Won(self.side_to_move.opposite());
        }
        result
    }

    fn ensure_in_progress(&self) -> Result<(), DraughtsError> {
        match self.result() {
            GameResult::InProgress => Ok(()),
            GameResult::Won(_) => Err(DraughtsError::GameOver),
        }
    }

    /// Picks up a piece of the side to move. Returns `false` when the field
    /// holds nothing selectable: an empty field, an opponent piece, a piece
    /// that cannot move, or a non-capturing piece while a capture is available.
    /// A running chain can't be abandoned for another piece.
    pub fn select_piece(&mut self, field: Field) -> Result<bool, DraughtsError> {
        self.ensure_in_progress()?;
        let piece = match self.position.piece_at(field)? {
            Some(piece) => *piece,
            None => return Ok(false),
        };
        match self.state {
            TurnState::NoSelection | TurnState::PieceSelected { .. } => {}
            TurnState::ChainInProgress { .. } | TurnState::TurnComplete => return Ok(false),
        }
        if piece.side != self.side_to_move || !self.position.movable_pieces(self.side_to_move).contains(&piece.id) {
            return Ok(false);
        }

        let candidates = if self.position.side_has_capture(self.side_to_move) {
            self.position.get_valid_captures(piece.id)?
        } else {
            self.position.get_valid_moves(piece.id)?
        };
        debug!("{} selected {} on {}", self.side_to_move, piece.id, field);
        self.state = TurnState::PieceSelected {
            piece: piece.id,
            candidates,
        };
        Ok(true)
    }

    /// Moves the selected piece to one of its candidate destinations and
    /// removes the piece it jumped, if any.
    pub fn select_move(&mut self, destination: Field) -> Result<(), DraughtsError> {
        self.ensure_in_progress()?;
        let (piece, captured) = match &self.state {
            TurnState::PieceSelected { piece, candidates } | TurnState::ChainInProgress { piece, candidates } => {
                match candidates.get(&destination) {
                    Some(captured) => (*piece, captured.clone()),
                    None => {
                        return Err(DraughtsError::IllegalMove {
                            from: self.position.piece(*piece)?.field,
                            to: destination,
                        })
                    }
                }
            }
            _ => return Err(DraughtsError::NothingSelected),
        };

        self.position.apply_move(piece, destination)?;
        self.position.remove_captured(&captured)?;

        self.state = TurnState::TurnComplete;
        if !captured.is_empty() && self.position.winner() == GameResult::InProgress {
            let further = self.position.get_valid_captures(piece)?;
            if !further.is_empty() {
                self.state = TurnState::ChainInProgress {
                    piece,
                    candidates: further,
                };
            }
        }
        Ok(())
    }

    /// Hands the move to the other side once the current turn is complete.
    pub fn end_turn(&mut self) -> Result<(), DraughtsError> {
        if self.state != TurnState::TurnComplete {
            return Err(DraughtsError::TurnInProgress);
        }
        self.side_to_move = self.side_to_move.opposite();
        self.state = TurnState::NoSelection;
        self.turn_number += 1;

        match self.result() {
            GameResult::InProgress => debug!("turn {}: {} to move", self.turn_number, self.side_to_move),
            result => info!("{} after {} turns", result, self.turn_number),
        }
        Ok(())
    }

    /// A click on the board: selects, moves or reselects depending on the
    /// current state and finishes the turn once it is complete.
    pub fn click(&mut self, field: Field) -> Result<(), DraughtsError> {
        match &self.state {
            TurnState::NoSelection => {
                self.select_piece(field)?;
            }
            TurnState::PieceSelected { candidates, .. } => {
                if candidates.contains_key(&field) {
                    self.select_move(field)?;
                } else if !self.select_piece(field)? {
                    self.state = TurnState::NoSelection;
                }
            }
            TurnState::ChainInProgress { candidates, .. } => {
                if candidates.contains_key(&field) {
                    self.select_move(field)?;
                }
            }
            TurnState::TurnComplete => {}
        }
        if self.state == TurnState::TurnComplete {
            self.end_turn()?;
        }
        Ok(())
    }

    /// Lets an engine play the whole turn of the side to move.
    pub fn play_engine_turn<E: Engine + ?Sized>(
        &mut self,
        engine: &mut E,
        on_step: &mut dyn FnMut(&Position),
    ) -> Result<(), DraughtsError> {
        self.ensure_in_progress()?;
        if engine.side() != self.side_to_move {
            return Err(DraughtsError::NotYourTurn);
        }
        if self.state != TurnState::NoSelection {
            return Err(DraughtsError::TurnInProgress);
        }
        engine.play_turn(&mut self.position, on_step)?;
        self.state = TurnState::TurnComplete;
        self.end_turn()
    }
}
