use crate::io::Console;
use anyhow::Error as Anyhow;
use clap::Parser;
use lib::chess::{Board, Color, File, Move, Outcome, Rank, Square};
use lib::game::{Round, Series};
use std::io::{stdin, stdout, Read, Write};
use tracing::{info, instrument, warn};

/// A match of chess between two players with hearts.
#[derive(Debug, Parser)]
pub struct Play {
    /// Name of the player with the white pieces.
    #[clap(short, long)]
    white: Option<String>,

    /// Name of the player with the black pieces.
    #[clap(short, long)]
    black: Option<String>,

    /// How many round wins take the match.
    #[clap(long, default_value_t = 2)]
    wins: u8,

    /// How many hearts each player starts with.
    #[clap(long, default_value_t = 3)]
    hearts: u8,
}

impl Default for Play {
    fn default() -> Self {
        Play {
            white: None,
            black: None,
            wins: 2,
            hearts: 3,
        }
    }
}

impl Play {
    #[instrument(level = "trace", skip(self), err)]
    pub fn execute(self) -> Result<(), Anyhow> {
        self.run(&mut Console::new(stdout(), stdin()))
    }

    fn run<W: Write, R: Read>(self, console: &mut Console<W, R>) -> Result<(), Anyhow> {
        let white = match self.white {
            Some(name) => name,
            None => console.ask("Enter name for the white player:")?,
        };

        let black = match self.black {
            Some(name) => name,
            None => console.ask("Enter name for the black player:")?,
        };

        let mut series = Series::new(white, black, self.wins, self.hearts);
        console.send(format!(
            "Win {} rounds to win the match. Each player has {} hearts.",
            series.goal(),
            self.hearts
        ))?;

        let mut number = 1;
        let abandoned = loop {
            if series.is_over() {
                break false;
            }

            console.send(format!("--- Round {} ---", number))?;
            console.send(stats(&series))?;

            let Some(outcome) = round(console, &series)? else {
                break true;
            };

            info!(round = number, %outcome);

            match outcome.winner() {
                Some(side) => console.send(format!(
                    ">>> Round over! {} wins the round. <<<",
                    series.player(side)
                ))?,

                None => {
                    console.send(">>> Round over! Stalemate, no hearts are lost. <<<")?
                }
            }

            let loser = outcome.winner().map(|side| !side);
            series.record(outcome);

            if let Some(side) = loser {
                let loser = series.player(side);
                console.send(format!("{} loses a heart ({} left).", loser, loser.hearts()))?;

                if loser.is_eliminated() {
                    console.send(format!(
                        "{} has run out of hearts and forfeits the match.",
                        loser
                    ))?;
                }
            }

            number += 1;
        };

        if abandoned {
            console.send("Match abandoned.")?;
        } else if let Some(champion) = series.champion() {
            info!(%champion);
            console.send(stats(&series))?;
            console.send(format!(
                ">>> Match over! Congratulations {}, you won the match! <<<",
                champion
            ))?;
        }

        Ok(())
    }
}

/// Plays a single round, or `None` if the players abandoned the match.
fn round<W: Write, R: Read>(
    console: &mut Console<W, R>,
    series: &Series,
) -> Result<Option<Outcome>, Anyhow> {
    let mut round = Round::default();
    console.send(draw(round.board(), false))?;

    loop {
        if round.is_check() {
            console.send(format!("{}'s king is in check!", series.player(round.turn())))?;
        }

        let line = console.ask(format!(
            "{}, enter your move (e.g. e2e4 or a7a8q):",
            series.player(round.turn())
        ))?;

        let line = line.trim();
        if line == "exit" || line == "quit" {
            return Ok(None);
        }

        let m: Move = match line.parse() {
            Ok(m) => m,
            Err(e) => {
                console.send(format!("{}, try again.", e))?;
                continue;
            }
        };

        match round.play(m) {
            Err(e) => {
                warn!(%m, %e);
                console.send(format!("{}, try again.", e))?;
            }

            Ok(played) => {
                if let Some(p) = played.capture {
                    console.send(format!(
                        "{} {} captured on `{}`.",
                        p.color(),
                        p.role().name(),
                        m.whither()
                    ))?;
                }

                match round.outcome() {
                    Some(outcome) => {
                        console.send(draw(round.board(), false))?;
                        return Ok(Some(outcome));
                    }

                    None => console.send(draw(round.board(), round.turn() == Color::Black))?,
                }
            }
        }
    }
}

fn stats(series: &Series) -> String {
    let mut out = String::from("--- Player Stats ---\n");

    for side in Color::iter() {
        let p = series.player(side);
        out.push_str(&format!(
            "{}: hearts={}, score={}\n",
            p,
            p.hearts(),
            p.score()
        ));
    }

    out.push_str("--------------------");
    out
}

/// Renders the board with rank and file labels, optionally from the black
/// player's perspective.
fn draw(board: &Board, flip: bool) -> String {
    let mut files: Vec<File> = File::iter().collect();
    let mut ranks: Vec<Rank> = Rank::iter().rev().collect();

    if flip {
        files.reverse();
        ranks.reverse();
    }

    let mut labels = String::from(" ");
    for f in &files {
        labels.push(' ');
        labels.push_str(&f.to_string());
    }

    let mut out = String::new();
    out.push_str(&labels);
    out.push('\n');

    for &r in &ranks {
        out.push_str(&r.to_string());
        for &f in &files {
            out.push(' ');
            match board[Square::new(f, r)] {
                Some(p) => out.push_str(&p.to_string()),
                None => out.push('.'),
            }
        }
        out.push(' ');
        out.push_str(&r.to_string());
        out.push('\n');
    }

    out.push_str(&labels);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::io::Write as _;
    use std::str;

    fn scripted(lines: &[&str]) -> VecDeque<u8> {
        let mut input = VecDeque::new();
        for line in lines {
            writeln!(&mut input, "{}", line).unwrap();
        }
        input
    }

    #[test]
    fn the_starting_board_draws_from_the_white_perspective() {
        let board = Board::default();
        let out = draw(&board, false);
        assert!(out.starts_with("  a b c d e f g h\n8 r n b q k b n r 8\n"));
        assert!(out.contains("\n1 R N B Q K B N R 1\n"));
    }

    #[test]
    fn flipping_the_board_draws_from_the_black_perspective() {
        let board = Board::default();
        let out = draw(&board, true);
        assert!(out.starts_with("  h g f e d c b a\n1 R N B Q K B N R 1\n"));
        assert!(out.contains("\n8 r n b q k b n r 8\n"));
    }

    #[test]
    fn a_scripted_match_runs_to_completion() {
        let mut input = scripted(&["f2f3", "e7e5", "g2g4", "d8h4"]);
        let mut output = Vec::new();

        let play = Play {
            white: Some("alice".to_string()),
            black: Some("bob".to_string()),
            wins: 1,
            hearts: 3,
        };

        play.run(&mut Console::new(&mut output, &mut input)).unwrap();

        let out = str::from_utf8(&output).unwrap();
        assert!(out.contains("bob (black) wins the round"));
        assert!(out.contains("alice (white) loses a heart (2 left)."));
        assert!(out.contains("Congratulations bob (black), you won the match!"));
    }

    #[test]
    fn rejected_moves_prompt_a_retry() {
        let mut input = scripted(&["e2e5", "exit"]);
        let mut output = Vec::new();

        let play = Play {
            white: Some("alice".to_string()),
            black: Some("bob".to_string()),
            ..Play::default()
        };

        play.run(&mut Console::new(&mut output, &mut input)).unwrap();

        let out = str::from_utf8(&output).unwrap();
        assert!(out.contains("cannot move to"));
        assert!(out.contains("Match abandoned."));
    }

    #[test]
    fn abandoning_the_match_is_graceful() {
        let mut input = scripted(&["exit"]);
        let mut output = Vec::new();

        let play = Play {
            white: Some("alice".to_string()),
            black: Some("bob".to_string()),
            ..Play::default()
        };

        play.run(&mut Console::new(&mut output, &mut input)).unwrap();
        assert!(str::from_utf8(&output).unwrap().contains("Match abandoned."));
    }
}
