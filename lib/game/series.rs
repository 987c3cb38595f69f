use crate::chess::{Color, Outcome};
use crate::game::Player;
use tracing::instrument;

/// A best-of series of rounds with hearts elimination.
///
/// The first player to reach the goal of round wins takes the match. Every
/// checkmate also costs the losing side a heart, and a player with no
/// hearts left forfeits the match outright. Stalemates change nothing.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Series {
    players: [Player; 2],
    goal: u8,
}

impl Series {
    /// Starts a series between two named players.
    pub fn new(white: String, black: String, goal: u8, hearts: u8) -> Self {
        Series {
            players: [
                Player::new(white, Color::White, hearts),
                Player::new(black, Color::Black, hearts),
            ],
            goal,
        }
    }

    /// The [`Player`] moving a [`Color`].
    #[inline(always)]
    pub fn player(&self, side: Color) -> &Player {
        &self.players[side as usize]
    }

    /// How many round wins take the match.
    #[inline(always)]
    pub fn goal(&self) -> u8 {
        self.goal
    }

    /// Applies the result of a finished round.
    ///
    /// A checkmate credits the winner and costs the loser a heart; a loser
    /// left without hearts forfeits, which hands the winner the remaining
    /// round wins. A stalemate leaves both players as they were.
    #[instrument(level = "debug", skip(self))]
    pub fn record(&mut self, outcome: Outcome) {
        let Some(winner) = outcome.winner() else {
            return;
        };

        self.players[winner as usize].win_round();
        self.players[(!winner) as usize].lose_heart();

        if self.players[(!winner) as usize].is_eliminated() {
            while self.players[winner as usize].score() < self.goal {
                self.players[winner as usize].win_round();
            }
        }
    }

    /// The winner of the series, if it is decided.
    pub fn champion(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.score() >= self.goal)
    }

    /// Whether the series is decided.
    pub fn is_over(&self) -> bool {
        self.champion().is_some()
    }
}
