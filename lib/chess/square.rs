use crate::chess::{File, ParseFileError, ParseRankError, Rank};
use derive_more::{Display, Error, From};
use std::{fmt, str::FromStr};

/// A square on the chess board.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[repr(i8)]
#[rustfmt::skip]
pub enum Square {
    A1, B1, C1, D1, E1, F1, G1, H1,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A8, B8, C8, D8, E8, F8, G8, H8,
}

#[rustfmt::skip]
const ALL: [Square; 64] = [
    Square::A1, Square::B1, Square::C1, Square::D1, Square::E1, Square::F1, Square::G1, Square::H1,
    Square::A2, Square::B2, Square::C2, Square::D2, Square::E2, Square::F2, Square::G2, Square::H2,
    Square::A3, Square::B3, Square::C3, Square::D3, Square::E3, Square::F3, Square::G3, Square::H3,
    Square::A4, Square::B4, Square::C4, Square::D4, Square::E4, Square::F4, Square::G4, Square::H4,
    Square::A5, Square::B5, Square::C5, Square::D5, Square::E5, Square::F5, Square::G5, Square::H5,
    Square::A6, Square::B6, Square::C6, Square::D6, Square::E6, Square::F6, Square::G6, Square::H6,
    Square::A7, Square::B7, Square::C7, Square::D7, Square::E7, Square::F7, Square::G7, Square::H7,
    Square::A8, Square::B8, Square::C8, Square::D8, Square::E8, Square::F8, Square::G8, Square::H8,
];

impl Square {
    /// Constructs [`Square`] from a pair of [`File`] and [`Rank`].
    #[inline(always)]
    pub fn new(f: File, r: Rank) -> Self {
        ALL[(r.get() * 8 + f.get()) as usize]
    }

    /// Constructs [`Square`] from file and rank indices, if within the board.
    #[inline(always)]
    pub fn try_new(file: i8, rank: i8) -> Option<Self> {
        Some(Square::new(File::try_new(file)?, Rank::try_new(rank)?))
    }

    /// An iterator over all squares, from a1 to h8.
    #[inline(always)]
    pub fn iter() -> impl DoubleEndedIterator<Item = Self> + ExactSizeIterator {
        ALL.into_iter()
    }

    /// This square's index, from 0 for a1 to 63 for h8.
    #[inline(always)]
    pub fn get(self) -> i8 {
        self as i8
    }

    /// This square's [`File`].
    #[inline(always)]
    pub fn file(self) -> File {
        File::ALL[(self.get() & 0b111) as usize]
    }

    /// This square's [`Rank`].
    #[inline(always)]
    pub fn rank(self) -> Rank {
        Rank::ALL[(self.get() >> 3) as usize]
    }

    /// The square offset by a number of files and ranks, if within the board.
    #[inline(always)]
    pub fn offset(self, files: i8, ranks: i8) -> Option<Self> {
        Square::try_new(self.file().get() + files, self.rank().get() + ranks)
    }

    /// This square from the opponent's perspective.
    #[inline(always)]
    pub fn flip(self) -> Self {
        Square::new(self.file(), self.rank().flip())
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.file(), f)?;
        fmt::Display::fmt(&self.rank(), f)?;
        Ok(())
    }
}

/// The reason why parsing [`Square`] failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error, From)]
pub enum ParseSquareError {
    #[display("failed to parse square")]
    InvalidFile(ParseFileError),
    #[display("failed to parse square")]
    InvalidRank(ParseRankError),
}

impl FromStr for Square {
    type Err = ParseSquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let i = s.char_indices().nth(1).map_or_else(|| s.len(), |(i, _)| i);
        Ok(Square::new(s[..i].parse()?, s[i..].parse()?))
    }
}
