/// Chess domain types.
pub mod chess;
/// Round arbitration and match lifecycle.
pub mod game;
