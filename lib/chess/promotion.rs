use crate::chess::Role;
use derive_more::{Display, Error};
use std::str::FromStr;

/// A promotion specifier.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub enum Promotion {
    #[display("")]
    None,
    #[display("n")]
    Knight,
    #[display("b")]
    Bishop,
    #[display("r")]
    Rook,
    #[display("q")]
    Queen,
}

impl From<Promotion> for Option<Role> {
    fn from(p: Promotion) -> Self {
        match p {
            Promotion::None => None,
            Promotion::Knight => Some(Role::Knight),
            Promotion::Bishop => Some(Role::Bishop),
            Promotion::Rook => Some(Role::Rook),
            Promotion::Queen => Some(Role::Queen),
        }
    }
}

/// The reason why parsing [`Promotion`] failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
#[display("failed to parse promotion, expected one of `n`, `b`, `r`, `q`")]
pub struct ParsePromotionError;

impl FromStr for Promotion {
    type Err = ParsePromotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(Promotion::None),
            "n" => Ok(Promotion::Knight),
            "b" => Ok(Promotion::Bishop),
            "r" => Ok(Promotion::Rook),
            "q" => Ok(Promotion::Queen),
            _ => Err(ParsePromotionError),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_strategy::proptest;

    #[proptest]
    fn promotion_is_never_to_pawn_or_king(p: Promotion) {
        assert_ne!(Option::<Role>::from(p), Some(Role::Pawn));
        assert_ne!(Option::<Role>::from(p), Some(Role::King));
    }

    #[proptest]
    fn parsing_printed_promotion_is_an_identity(p: Promotion) {
        assert_eq!(p.to_string().parse(), Ok(p));
    }

    #[proptest]
    fn parsing_promotion_fails_if_not_one_of_nbrq(
        #[filter(!['n', 'b', 'r', 'q'].contains(&#c))] c: char,
    ) {
        assert_eq!(c.to_string().parse::<Promotion>(), Err(ParsePromotionError));
    }
}
