pub mod draughts;
pub mod engines;
pub mod ui;
