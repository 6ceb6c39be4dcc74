use std::thread;
use std::time::Duration;

use log::{debug, info};
use rand::Rng;

use crate::draughts::{Candidates, DraughtsError, Field, PieceId, Position, Side};
use crate::engines::Engine;

/// What the engine decided to play: a piece, its final landing field and
/// the pieces it jumps on the way, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedMove {
    pub piece: PieceId,
    pub landing: Field,
    pub captured: Vec<PieceId>,
}

/// Always plays a longest available capture chain. Ties between pieces and
/// between landings are broken with `rng`.
pub struct LongestCaptureEngine<R: Rng> {
    side: Side,
    rng: R,
    delay: Duration,
}

impl<R: Rng> LongestCaptureEngine<R> {
    pub fn new(side: Side, rng: R, delay: Duration) -> Self {
        Self { side, rng, delay }
    }

    /// Pieces reaching the longest capture chain together with their chain
    /// candidates. A length of zero means no piece can capture.
    pub fn longest_chains(&self, position: &Position) -> Result<(usize, Vec<(PieceId, Candidates)>), DraughtsError> {
        let mut longest = 0;
        let mut best: Vec<(PieceId, Candidates)> = Vec::new();
        for piece in position.pieces(self.side) {
            let chains = position.get_capture_chains(piece.id)?;
            let length = match chains.values().map(Vec::len).max() {
                Some(length) => length,
                None => continue,
            };
            if length > longest {
                longest = length;
                best.clear();
            }
            if length == longest {
                best.push((piece.id, chains));
            }
        }
        Ok((longest, best))
    }

    /// Picks the move to play.
    ///
    /// # Panics
    ///
    /// Panics if no piece of the engine's side can move. Callers check the
    /// game result before asking the engine.
    pub fn choose(&mut self, position: &Position) -> Result<PlannedMove, DraughtsError> {
        let (longest, best) = self.longest_chains(position)?;
        assert!(!best.is_empty(), "{} has no piece that can move", self.side);

        let (piece, chains) = &best[self.rng.gen_range(0..best.len())];
        Ok(self.pick_landing(*piece, chains, longest))
    }

    fn pick_landing(&mut self, piece: PieceId, chains: &Candidates, longest: usize) -> PlannedMove {
        let landings: Vec<(&Field, &Vec<PieceId>)> =
            chains.iter().filter(|(_, captured)| captured.len() == longest).collect();
        let (landing, captured) = landings[self.rng.gen_range(0..landings.len())];
        PlannedMove {
            piece,
            landing: *landing,
            captured: captured.clone(),
        }
    }

    /// The next chain for a piece that has just captured, if it can still jump.
    fn continuation(&mut self, position: &Position, piece: PieceId) -> Result<Option<PlannedMove>, DraughtsError> {
        let chains = position.get_capture_chains(piece)?;
        match chains.values().map(Vec::len).max() {
            Some(longest) if longest > 0 => Ok(Some(self.pick_landing(piece, &chains, longest))),
            _ => Ok(None),
        }
    }

    fn execute(
        &mut self,
        position: &mut Position,
        plan: &PlannedMove,
        on_step: &mut dyn FnMut(&Position),
    ) -> Result<(), DraughtsError> {
        if plan.captured.is_empty() {
            thread::sleep(self.delay);
            position.apply_move(plan.piece, plan.landing)?;
            on_step(position);
            return Ok(());
        }

        self.replay(position, plan, on_step)?;
        // crowning or a freed landing can open jumps the plan didn't see
        while let Some(next) = self.continuation(position, plan.piece)? {
            debug!("{} keeps jumping towards {}", plan.piece, next.landing);
            self.replay(position, &next, on_step)?;
        }
        Ok(())
    }

    /// Plays a capture chain hop by hop, each hop lands behind the next planned victim.
    fn replay(
        &self,
        position: &mut Position,
        plan: &PlannedMove,
        on_step: &mut dyn FnMut(&Position),
    ) -> Result<(), DraughtsError> {
        for &jumped in &plan.captured {
            thread::sleep(self.delay);
            let captures = position.get_valid_captures(plan.piece)?;
            let hop = captures
                .iter()
                .find(|(_, captured)| captured.as_slice() == [jumped])
                .map(|(field, _)| *field);
            let hop = match hop {
                Some(hop) => hop,
                None => {
                    return Err(DraughtsError::IllegalMove {
                        from: position.piece(plan.piece)?.field,
                        to: plan.landing,
                    })
                }
            };
            debug!("{} jumps {} landing on {}", plan.piece, jumped, hop);
            position.apply_move(plan.piece, hop)?;
            position.remove_captured(&[jumped])?;
            on_step(position);
        }
        Ok(())
    }
}

impl<R: Rng> Engine for LongestCaptureEngine<R> {
    fn name(&self) -> &str {
        "longest-capture"
    }

    fn side(&self) -> Side {
        self.side
    }

    fn play_turn(&mut self, position: &mut Position, on_step: &mut dyn FnMut(&Position)) -> Result<(), DraughtsError> {
        let plan = self.choose(position)?;
        let from = position.piece(plan.piece)?.field;
        info!(
            "{} plays {} from {} to {} capturing {}",
            self.side,
            plan.piece,
            from,
            plan.landing,
            plan.captured.len()
        );
        self.execute(position, &plan, on_step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draughts::notation::{from_notation, INITIAL_POSITION};
    use crate::draughts::PieceColor;
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    fn position(notation: &str) -> Position {
        from_notation(notation, PieceColor::White).unwrap().0
    }

    fn id_at(position: &Position, row: u8, col: u8) -> PieceId {
        position.piece_at(Field::new(row, col)).unwrap().unwrap().id
    }

    fn first_choice() -> StepRng {
        StepRng::new(0, 0)
    }

    #[test]
    fn test_unique_longest_chain_is_always_chosen() {
        // (7, 0) can take twice, (5, 6) only once
        let position = position("8/8/8/8/3n1n2/6s1/1n6/s7 s");
        let expected = PlannedMove {
            piece: id_at(&position, 7, 0),
            landing: Field::new(3, 4),
            captured: vec![id_at(&position, 6, 1), id_at(&position, 4, 3)],
        };
        for seed in 0..32 {
            let mut engine = LongestCaptureEngine::new(Side::South, Pcg64::seed_from_u64(seed), Duration::ZERO);
            assert_eq!(engine.choose(&position).unwrap(), expected);
        }
    }

    #[test]
    fn test_chain_is_played_hop_by_hop() {
        let mut position = position("8/8/8/8/3n1n2/6s1/1n6/s7 s");
        let mover = id_at(&position, 7, 0);
        let mut engine = LongestCaptureEngine::new(Side::South, first_choice(), Duration::ZERO);
        let mut hops = Vec::new();
        engine
            .play_turn(&mut position, &mut |p| hops.push(p.piece(mover).unwrap().field))
            .unwrap();

        assert_eq!(hops, vec![Field::new(5, 2), Field::new(3, 4)]);
        assert_eq!(position.remaining(Side::North), 1);
        assert!(position.piece_at(Field::new(6, 1)).unwrap().is_none());
        assert!(position.piece_at(Field::new(4, 3)).unwrap().is_none());
    }

    #[test]
    fn test_ties_are_broken_by_the_rng() {
        // (5, 0) and (5, 6) each have one capture
        let position = position("8/8/8/8/1n3n2/s5s1/8/8 s");
        let mut engine = LongestCaptureEngine::new(Side::South, first_choice(), Duration::ZERO);
        let plan = engine.choose(&position).unwrap();
        assert_eq!(plan.piece, id_at(&position, 5, 0));
        assert_eq!(plan.landing, Field::new(3, 2));

        let chosen: Vec<PieceId> = (0..64)
            .map(|seed| {
                let mut engine = LongestCaptureEngine::new(Side::South, Pcg64::seed_from_u64(seed), Duration::ZERO);
                engine.choose(&position).unwrap().piece
            })
            .collect();
        assert!(chosen.contains(&id_at(&position, 5, 0)));
        assert!(chosen.contains(&id_at(&position, 5, 6)));
    }

    #[test]
    fn test_ties_between_landings_of_one_piece() {
        // the king can take twice towards (0, 3) or towards (0, 7)
        let position = position("8/2n3n1/8/2n1n3/3S4/8/8/8 s");
        let king = id_at(&position, 4, 3);
        let mut engine = LongestCaptureEngine::new(Side::South, first_choice(), Duration::ZERO);
        let plan = engine.choose(&position).unwrap();
        assert_eq!(plan.piece, king);
        assert_eq!(plan.landing, Field::new(0, 3));
        assert_eq!(plan.captured, vec![id_at(&position, 3, 2), id_at(&position, 1, 2)]);

        let landings: Vec<Field> = (0..64)
            .map(|seed| {
                let mut engine = LongestCaptureEngine::new(Side::South, Pcg64::seed_from_u64(seed), Duration::ZERO);
                let plan = engine.choose(&position).unwrap();
                assert_eq!(plan.captured.len(), 2);
                plan.landing
            })
            .collect();
        assert!(landings.contains(&Field::new(0, 3)));
        assert!(landings.contains(&Field::new(0, 7)));
    }

    #[test]
    fn test_chain_goes_on_after_crowning() {
        // the man is crowned on (0, 3) and must take (1, 2) backwards as a king
        let mut position = position("8/2n1n3/5s2/8/8/8/8/8 s");
        let mover = id_at(&position, 2, 5);
        let mut engine = LongestCaptureEngine::new(Side::South, Pcg64::seed_from_u64(1), Duration::ZERO);
        let mut hops = Vec::new();
        engine
            .play_turn(&mut position, &mut |p| hops.push(p.piece(mover).unwrap().field))
            .unwrap();

        assert_eq!(hops, vec![Field::new(0, 3), Field::new(2, 1)]);
        assert_eq!(position.remaining(Side::North), 0);
        assert!(position.piece(mover).unwrap().king);
    }

    #[test]
    fn test_same_seed_same_choice() {
        let (position, _) = from_notation(INITIAL_POSITION, PieceColor::White).unwrap();
        let mut a = LongestCaptureEngine::new(Side::South, Pcg64::seed_from_u64(42), Duration::ZERO);
        let mut b = LongestCaptureEngine::new(Side::South, Pcg64::seed_from_u64(42), Duration::ZERO);
        for _ in 0..8 {
            assert_eq!(a.choose(&position).unwrap(), b.choose(&position).unwrap());
        }
    }

    #[test]
    fn test_plain_step_without_captures() {
        let mut position = Position::new(Default::default()).unwrap();
        let mut engine = LongestCaptureEngine::new(Side::South, first_choice(), Duration::ZERO);
        let plan = engine.choose(&position).unwrap();
        assert_eq!(plan.piece, id_at(&position, 5, 0));
        assert_eq!(plan.landing, Field::new(4, 1));
        assert!(plan.captured.is_empty());

        let mut steps = 0;
        engine.play_turn(&mut position, &mut |_| steps += 1).unwrap();
        assert_eq!(steps, 1);
        assert_eq!(position.remaining(Side::North), 12);
        assert!(position.piece_at(Field::new(5, 0)).unwrap().is_none());
    }

    #[test]
    #[should_panic(expected = "has no piece that can move")]
    fn test_no_candidates_panics() {
        let position = position("8/8/8/8/3n4/8/8/8 s");
        let mut engine = LongestCaptureEngine::new(Side::South, first_choice(), Duration::ZERO);
        let _ = engine.choose(&position);
    }
}
