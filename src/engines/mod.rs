use crate::draughts::{DraughtsError, Position, Side};

mod longest_capture;
pub use longest_capture::{LongestCaptureEngine, PlannedMove};

pub trait Engine {
    fn name(&self) -> &str;
    fn side(&self) -> Side;
    /// Plays one complete turn for `side()` on `position`, calling `on_step`
    /// after every hop so a caller can redraw between them.
    fn play_turn(&mut self, position: &mut Position, on_step: &mut dyn FnMut(&Position)) -> Result<(), DraughtsError>;
}
