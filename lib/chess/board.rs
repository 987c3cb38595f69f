use crate::chess::{Color, File, Piece, Rank, Role, Square};
use arrayvec::ArrayString;
use derive_more::{Display, Error};
use std::fmt::{self, Write};
use std::{ops::Index, str::FromStr};

/// The chess board: 64 piece slots and the cached king locations.
///
/// Every [`Piece`] is owned by the slot holding it, so copying the board
/// yields a fully independent position that can be mutated speculatively
/// without aliasing the original.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Board {
    squares: [Option<Piece>; 64],
    kings: [Option<Square>; 2],
}

impl Default for Board {
    /// The standard starting position.
    fn default() -> Self {
        use Role::*;
        let mut board = Board::empty();
        let back = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];

        for (f, role) in File::iter().zip(back) {
            board.set_piece(Square::new(f, Rank::First), Piece::new(Color::White, role));
            board.set_piece(Square::new(f, Rank::Second), Piece::new(Color::White, Pawn));
            board.set_piece(Square::new(f, Rank::Seventh), Piece::new(Color::Black, Pawn));
            board.set_piece(Square::new(f, Rank::Eighth), Piece::new(Color::Black, role));
        }

        board
    }
}

impl Board {
    /// A board with no pieces on it.
    pub fn empty() -> Self {
        Board {
            squares: [None; 64],
            kings: [None; 2],
        }
    }

    /// The [`Piece`] on the given [`Square`], if any.
    #[inline(always)]
    pub fn piece_on(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.get() as usize]
    }

    /// The [`Color`] of the piece on the given [`Square`], if any.
    #[inline(always)]
    pub fn color_on(&self, sq: Square) -> Option<Color> {
        self.piece_on(sq).map(|p| p.color())
    }

    /// The [`Role`] of the piece on the given [`Square`], if any.
    #[inline(always)]
    pub fn role_on(&self, sq: Square) -> Option<Role> {
        self.piece_on(sq).map(|p| p.role())
    }

    /// An iterator over all pieces on the board.
    #[inline(always)]
    pub fn iter(&self) -> impl Iterator<Item = (Piece, Square)> + '_ {
        Square::iter().filter_map(|sq| Some((self.piece_on(sq)?, sq)))
    }

    /// Places a piece on a square, returning the displaced occupant.
    ///
    /// The king location cache is maintained in the same operation.
    pub fn set_piece(&mut self, sq: Square, piece: Piece) -> Option<Piece> {
        let displaced = self.squares[sq.get() as usize].replace(piece);

        if let Some(p) = displaced {
            if p.role() == Role::King {
                self.kings[p.color() as usize] = None;
            }
        }

        if piece.role() == Role::King {
            self.kings[piece.color() as usize] = Some(sq);
        }

        displaced
    }

    /// Removes and returns the piece on a square, if any.
    pub fn remove_piece(&mut self, sq: Square) -> Option<Piece> {
        let removed = self.squares[sq.get() as usize].take();

        if let Some(p) = removed {
            if p.role() == Role::King {
                self.kings[p.color() as usize] = None;
            }
        }

        removed
    }

    /// Relocates the piece on `whence` to `whither`, returning the occupant
    /// displaced from `whither`.
    ///
    /// This is the mechanical move primitive shared by committed moves and
    /// speculative simulation; it performs no legality checking whatsoever
    /// and callers are expected to have validated the move beforehand.
    pub fn move_piece(&mut self, whence: Square, whither: Square) -> Option<Piece> {
        match self.remove_piece(whence) {
            None => None,
            Some(mut piece) => {
                piece.mark_moved();
                self.set_piece(whither, piece)
            }
        }
    }

    /// Whether every square strictly between `whence` and `whither` is empty.
    ///
    /// Only straight or diagonal lines have squares strictly in between;
    /// the path is vacuously clear for any other delta.
    pub fn is_path_clear(&self, whence: Square, whither: Square) -> bool {
        let df = whither.file() - whence.file();
        let dr = whither.rank() - whence.rank();

        if (df != 0 && dr != 0 && df.abs() != dr.abs()) || (df == 0 && dr == 0) {
            return true;
        }

        let mut sq = whence;
        loop {
            sq = match sq.offset(df.signum(), dr.signum()) {
                Some(sq) => sq,
                None => return true,
            };

            if sq == whither {
                return true;
            } else if self.piece_on(sq).is_some() {
                return false;
            }
        }
    }

    /// The [`Square`] occupied by the king of a [`Color`].
    ///
    /// There is exactly one king of each color on any position reachable
    /// from the starting layout; a board without one is corrupted and this
    /// function panics.
    pub fn king(&self, side: Color) -> Square {
        match self.kings[side as usize] {
            Some(sq) => sq,
            None => panic!("expected a {side} king on the board"),
        }
    }

    /// Whether any piece of `side` threatens `sq`.
    pub fn is_attacked(&self, sq: Square, side: Color) -> bool {
        self.iter()
            .any(|(p, whence)| p.color() == side && p.attacks(whence, sq, self))
    }

    /// Whether the king of `side` is in check.
    pub fn is_check(&self, side: Color) -> bool {
        self.is_attacked(self.king(side), !side)
    }

    /// Replaces the pawn on `sq` by a piece of `role` and the same color.
    ///
    /// Fails without touching the board unless `sq` holds a pawn on its
    /// promotion rank and `role` is one a pawn can promote to.
    pub fn promote(&mut self, sq: Square, role: Role) -> bool {
        use Role::*;

        let Some(pawn) = self.piece_on(sq) else {
            return false;
        };

        if pawn.role() != Pawn || !matches!(role, Knight | Bishop | Rook | Queen) {
            return false;
        } else if sq.rank() != Rank::promotion(pawn.color()) {
            return false;
        }

        self.set_piece(sq, Piece::new(pawn.color(), role));
        true
    }
}

/// Retrieves the [`Piece`] at a given [`Square`], if any.
impl Index<Square> for Board {
    type Output = Option<Piece>;

    #[inline(always)]
    fn index(&self, sq: Square) -> &Self::Output {
        &self.squares[sq.get() as usize]
    }
}

/// Prints the board as the piece placement field of a [FEN] string.
///
/// [FEN]: https://www.chessprogramming.org/Forsyth-Edwards_Notation
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut skip = 0;
        for sq in Square::iter().map(|sq| sq.flip()) {
            let mut buffer = ArrayString::<2>::new();

            match self[sq] {
                None => skip += 1,
                Some(p) => write!(buffer, "{}", p)?,
            }

            if sq.file() == File::H && sq.rank() != Rank::First {
                buffer.push('/');
            }

            if !buffer.is_empty() && skip > 0 {
                write!(f, "{}", skip)?;
                skip = 0;
            }

            f.write_str(&buffer)?;
        }

        if skip > 0 {
            write!(f, "{}", skip)?;
        }

        Ok(())
    }
}

/// The reason why parsing the board failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
pub enum ParseBoardError {
    #[display("failed to parse piece placement")]
    InvalidPlacement,
    #[display("expected exactly one king per side")]
    InvalidKings,
}

/// Parses the board from the piece placement field of a [FEN] string.
///
/// [FEN]: https://www.chessprogramming.org/Forsyth-Edwards_Notation
impl FromStr for Board {
    type Err = ParseBoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use ParseBoardError::*;

        let ranks: Vec<_> = s.split('/').rev().collect();
        let ranks @ [_1, _2, _3, _4, _5, _6, _7, _8] = &ranks[..] else {
            return Err(InvalidPlacement);
        };

        let mut board = Board::empty();
        for (rank, segment) in ranks.iter().enumerate() {
            let mut file = 0i8;
            for c in segment.chars() {
                let mut buffer = [0; 4];

                if file >= 8 {
                    return Err(InvalidPlacement);
                } else if let Some(skip) = c.to_digit(10) {
                    file += skip as i8;
                } else if let Ok(p) = Piece::from_str(c.encode_utf8(&mut buffer)) {
                    let sq = Square::try_new(file, rank as i8).ok_or(InvalidPlacement)?;
                    board.set_piece(sq, p);
                    file += 1;
                } else {
                    return Err(InvalidPlacement);
                }
            }
        }

        for side in Color::iter() {
            let kings = board
                .iter()
                .filter(|(p, _)| p.color() == side && p.role() == Role::King)
                .count();

            if kings != 1 {
                return Err(InvalidKings);
            }
        }

        Ok(board)
    }
}
