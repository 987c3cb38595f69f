use anyhow::Error as Anyhow;
use clap::Parser;

static RULES: &str = "\
--- Help & Rules ---
Standard chess rules apply, with two exceptions: there is no castling and
no en passant. A round ends with checkmate or stalemate.

- Enter moves in coordinate notation (e.g. e2e4).
- For pawn promotion, append q, r, b, or n (e.g. a7a8q).
- Type 'exit' at any move prompt to abandon the match.

Both players start the match with a number of hearts. Losing a round by
checkmate costs a heart; a stalemate costs neither player anything. The
match goes to whoever first wins the configured number of rounds, or to
the last player with hearts remaining.
--------------------";

/// Prints the rules of the game.
#[derive(Debug, Default, Parser)]
pub struct Rules {}

impl Rules {
    pub fn execute(self) -> Result<(), Anyhow> {
        println!("{}", RULES);
        Ok(())
    }
}
