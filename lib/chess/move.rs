use crate::chess::{ParsePromotionError, ParseSquareError, Promotion, Square};
use derive_more::{Display, Error, From};
use std::str::FromStr;

/// A chess move in [pure coordinate notation].
///
/// [pure coordinate notation]: https://www.chessprogramming.org/Algebraic_Chess_Notation#Pure_coordinate_notation
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[cfg_attr(test, filter(#self.0 != #self.1))]
#[display("{_0}{_1}{_2}")]
pub struct Move(pub Square, pub Square, pub Promotion);

impl Move {
    /// The source [`Square`].
    #[inline(always)]
    pub fn whence(&self) -> Square {
        self.0
    }

    /// The destination [`Square`].
    #[inline(always)]
    pub fn whither(&self) -> Square {
        self.1
    }

    /// The [`Promotion`] specifier.
    #[inline(always)]
    pub fn promotion(&self) -> Promotion {
        self.2
    }
}

/// The reason why parsing [`Move`] failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error, From)]
pub enum ParseMoveError {
    #[display("failed to parse move")]
    InvalidSquare(ParseSquareError),
    #[display("failed to parse move")]
    InvalidPromotion(ParsePromotionError),
}

impl FromStr for Move {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let whence = s.get(..2).unwrap_or_default().parse::<Square>()?;
        let whither = s.get(2..4).unwrap_or_default().parse::<Square>()?;
        let promotion = s.get(4..).unwrap_or_default().parse::<Promotion>()?;
        Ok(Move(whence, whither, promotion))
    }
}
