use crate::chess::Color;
use derive_more::Display;

/// A participant in a [`Series`][`crate::game::Series`].
///
/// The rules engine only ever consults a player's [`Color`]; the name,
/// hearts and score exist for match bookkeeping and display.
#[derive(Debug, Display, Clone, Eq, PartialEq, Hash)]
#[display("{name} ({color})")]
pub struct Player {
    name: String,
    color: Color,
    hearts: u8,
    score: u8,
}

impl Player {
    /// A new player of a [`Color`] with a full set of hearts.
    pub fn new(name: String, color: Color, hearts: u8) -> Self {
        Player {
            name,
            color,
            hearts,
            score: 0,
        }
    }

    /// This player's name.
    #[inline(always)]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The [`Color`] this player moves.
    #[inline(always)]
    pub fn color(&self) -> Color {
        self.color
    }

    /// How many hearts this player has left.
    #[inline(always)]
    pub fn hearts(&self) -> u8 {
        self.hearts
    }

    /// How many rounds this player has won.
    #[inline(always)]
    pub fn score(&self) -> u8 {
        self.score
    }

    /// Whether this player has run out of hearts.
    #[inline(always)]
    pub fn is_eliminated(&self) -> bool {
        self.hearts == 0
    }

    /// Deducts one heart, saturating at zero.
    pub fn lose_heart(&mut self) {
        self.hearts = self.hearts.saturating_sub(1);
    }

    /// Credits a round win.
    pub fn win_round(&mut self) {
        self.score += 1;
    }
}
