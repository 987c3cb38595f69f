use crate::chess::{Board, Color, Rank, Role, Square};
use arrayvec::ArrayVec;
use derive_more::{Display, Error};
use std::{fmt, str::FromStr};

/// A chess piece: a [`Role`] of a certain [`Color`].
///
/// Pieces are plain values owned by the [`Board`] slot they occupy; moving a
/// piece moves the value between slots.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub struct Piece {
    color: Color,
    role: Role,
    moved: bool,
}

impl Piece {
    /// Constructs a [`Piece`] that has not moved yet.
    #[inline(always)]
    pub fn new(color: Color, role: Role) -> Self {
        Piece {
            color,
            role,
            moved: false,
        }
    }

    /// This piece's [`Color`].
    #[inline(always)]
    pub fn color(&self) -> Color {
        self.color
    }

    /// This piece's [`Role`].
    #[inline(always)]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Whether this piece has moved since the board was set up.
    #[inline(always)]
    pub fn has_moved(&self) -> bool {
        self.moved
    }

    #[inline(always)]
    pub(crate) fn mark_moved(&mut self) {
        self.moved = true;
    }

    /// The rank direction this piece's pawns advance in.
    #[inline(always)]
    fn heading(&self) -> i8 {
        match self.color {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// Whether this piece can move from `whence` to `whither` by its own
    /// movement pattern.
    ///
    /// Covers geometry and occupancy only; whether the move leaves the
    /// mover's own king in check is arbitrated one layer up, where the move
    /// is simulated on a scratch copy of the board.
    pub fn is_valid_move(&self, whence: Square, whither: Square, board: &Board) -> bool {
        if whence == whither || board.color_on(whither) == Some(self.color) {
            return false;
        }

        let df = whither.file() - whence.file();
        let dr = whither.rank() - whence.rank();

        match self.role {
            Role::Pawn => self.is_valid_pawn_move(whence, whither, board),
            Role::Knight => matches!((df.abs(), dr.abs()), (1, 2) | (2, 1)),
            Role::Bishop => df.abs() == dr.abs() && board.is_path_clear(whence, whither),
            Role::Rook => (df == 0 || dr == 0) && board.is_path_clear(whence, whither),
            Role::Queen => {
                (df.abs() == dr.abs() || df == 0 || dr == 0)
                    && board.is_path_clear(whence, whither)
            }
            Role::King => df.abs() <= 1 && dr.abs() <= 1,
        }
    }

    fn is_valid_pawn_move(&self, whence: Square, whither: Square, board: &Board) -> bool {
        let df = whither.file() - whence.file();
        let dr = whither.rank() - whence.rank();

        let home = match self.color {
            Color::White => Rank::Second,
            Color::Black => Rank::Seventh,
        };

        if df == 0 && dr == self.heading() {
            board[whither].is_none()
        } else if df == 0 && dr == 2 * self.heading() && whence.rank() == home && !self.moved {
            board[whither].is_none() && board.is_path_clear(whence, whither)
        } else if df.abs() == 1 && dr == self.heading() {
            board.color_on(whither) == Some(!self.color)
        } else {
            false
        }
    }

    /// Whether this piece on `whence` threatens `whither`.
    ///
    /// The threat pattern matches [`Self::is_valid_move`] for every role but
    /// the pawn, which threatens its two forward diagonals even when they
    /// are empty.
    pub fn attacks(&self, whence: Square, whither: Square, board: &Board) -> bool {
        match self.role {
            Role::Pawn => {
                let df = whither.file() - whence.file();
                let dr = whither.rank() - whence.rank();
                df.abs() == 1 && dr == self.heading()
            }

            _ => self.is_valid_move(whence, whither, board),
        }
    }

    /// Every square this piece on `whence` can structurally move to.
    pub fn possible_moves(&self, whence: Square, board: &Board) -> ArrayVec<Square, 64> {
        Square::iter()
            .filter(|&whither| self.is_valid_move(whence, whither, board))
            .collect()
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = self.role.to_string();
        match self.color {
            Color::White => f.write_str(&symbol.to_ascii_uppercase()),
            Color::Black => f.write_str(&symbol),
        }
    }
}

/// The reason why parsing [`Piece`] failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
#[display("failed to parse piece")]
pub struct ParsePieceError;

impl FromStr for Piece {
    type Err = ParsePieceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let role = s.to_ascii_lowercase().parse().or(Err(ParsePieceError))?;
        match s.chars().next() {
            Some(c) if c.is_ascii_uppercase() => Ok(Piece::new(Color::White, role)),
            Some(_) => Ok(Piece::new(Color::Black, role)),
            None => Err(ParsePieceError),
        }
    }
}
