use crate::chess::{Board, Color, Move, Outcome, Piece, Promotion, Rank, Role, Square};
use derive_more::{Display, Error};
use proptest::prelude::*;
use proptest::sample::{Selector, SelectorStrategy};
use proptest::strategy::Map;
use std::ops::Range;
use tracing::instrument;

/// The reason why a proposed [`Move`] was not accepted.
///
/// Every rejection is recoverable: the round is left untouched and the
/// caller may submit a corrected move.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
pub enum RejectedMove {
    #[display("the round is already over")]
    RoundOver,

    #[display("there is no piece on `{_0}`")]
    NoPiece(#[error(not(source))] Square),

    #[display("the piece on `{_0}` belongs to the opponent")]
    WrongSide(#[error(not(source))] Square),

    #[display("the king cannot be captured")]
    KingCapture,

    #[display("the piece on `{_0}` cannot move to `{_1}`")]
    IllegalPattern(Square, Square),

    #[display("moving the piece on `{_0}` would leave the king in check")]
    SelfCheck(#[error(not(source))] Square),

    #[display("a promotion piece must be chosen to move to `{_0}`")]
    MissingPromotion(#[error(not(source))] Square),
}

/// The record of an accepted [`Move`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Played {
    /// The piece captured by the move, if any.
    pub capture: Option<Piece>,
}

/// A single round of chess.
///
/// Arbitrates proposed moves against the piece movement rules and the
/// no-self-check rule, and classifies the position after every committed
/// move. Once the round leaves the ongoing state it stays terminal.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Round {
    board: Board,
    turn: Color,
    outcome: Option<Outcome>,
}

impl Default for Round {
    /// A round from the standard starting position, white to move.
    fn default() -> Self {
        Round {
            board: Board::default(),
            turn: Color::White,
            outcome: None,
        }
    }
}

impl Round {
    /// Resumes a round from an arbitrary position with `turn` to move.
    ///
    /// The position is classified right away: if the side to move has no
    /// legal moves the round is terminal from the start.
    pub fn resume(board: Board, turn: Color) -> Self {
        let mut round = Round {
            board,
            turn,
            outcome: None,
        };

        if !round.has_any_legal_move(turn) {
            round.outcome = Some(if board.is_check(turn) {
                Outcome::Checkmate(!turn)
            } else {
                Outcome::Stalemate
            });
        }

        round
    }

    /// The current board.
    #[inline(always)]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The side to move.
    #[inline(always)]
    pub fn turn(&self) -> Color {
        self.turn
    }

    /// The [`Outcome`] of the round, if it is over.
    #[inline(always)]
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Whether the round is over.
    #[inline(always)]
    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Whether the side to move is currently in check.
    pub fn is_check(&self) -> bool {
        self.board.is_check(self.turn)
    }

    /// Vets moving the piece on `whence` to `whither` for `side`.
    ///
    /// This is the one place deciding full legality: the piece's own
    /// movement pattern, the rule that kings are never capture targets, and
    /// the rule that no move may leave the mover's own king in check, the
    /// latter probed by simulating the move on a scratch copy of the board.
    fn vet(&self, side: Color, whence: Square, whither: Square) -> Result<Piece, RejectedMove> {
        use RejectedMove::*;

        let piece = self.board.piece_on(whence).ok_or(NoPiece(whence))?;

        if piece.color() != side {
            return Err(WrongSide(whence));
        } else if self.board.role_on(whither) == Some(Role::King) {
            return Err(KingCapture);
        } else if !piece.is_valid_move(whence, whither, &self.board) {
            return Err(IllegalPattern(whence, whither));
        }

        let mut scratch = self.board;
        scratch.move_piece(whence, whither);
        if scratch.is_check(side) {
            return Err(SelfCheck(whence));
        }

        Ok(piece)
    }

    fn has_any_legal_move(&self, side: Color) -> bool {
        self.board
            .iter()
            .filter(|(p, _)| p.color() == side)
            .any(|(p, whence)| {
                p.possible_moves(whence, &self.board)
                    .into_iter()
                    .any(|whither| self.vet(side, whence, whither).is_ok())
            })
    }

    /// The legal [`Move`]s available to the side to move.
    ///
    /// Moves onto a pawn's promotion rank are expanded into one entry per
    /// promotion piece.
    pub fn moves(&self) -> Vec<Move> {
        let mut moves = Vec::new();

        if self.is_over() {
            return moves;
        }

        for (piece, whence) in self.board.iter() {
            if piece.color() != self.turn {
                continue;
            }

            for whither in piece.possible_moves(whence, &self.board) {
                if self.vet(self.turn, whence, whither).is_err() {
                    continue;
                }

                if piece.role() == Role::Pawn && whither.rank() == Rank::promotion(self.turn) {
                    for p in [
                        Promotion::Knight,
                        Promotion::Bishop,
                        Promotion::Rook,
                        Promotion::Queen,
                    ] {
                        moves.push(Move(whence, whither, p));
                    }
                } else {
                    moves.push(Move(whence, whither, Promotion::None));
                }
            }
        }

        moves
    }

    /// Validates and applies a [`Move`] for the side to move.
    ///
    /// On success the move is committed, the position is reclassified and
    /// the captured piece, if any, is reported. On failure the round is
    /// left untouched and the reason is reported.
    #[instrument(level = "debug", skip(self), err)]
    pub fn play(&mut self, m: Move) -> Result<Played, RejectedMove> {
        let Move(whence, whither, promotion) = m;

        if self.is_over() {
            return Err(RejectedMove::RoundOver);
        }

        let piece = self.vet(self.turn, whence, whither)?;

        let promoting =
            piece.role() == Role::Pawn && whither.rank() == Rank::promotion(self.turn);

        let role = Option::<Role>::from(promotion);
        if promoting && role.is_none() {
            return Err(RejectedMove::MissingPromotion(whither));
        }

        let capture = self.board.move_piece(whence, whither);
        if promoting {
            if let Some(role) = role {
                let promoted = self.board.promote(whither, role);
                debug_assert!(promoted, "vetted promotions always apply");
            }
        }

        let opponent = !self.turn;
        if !self.has_any_legal_move(opponent) {
            self.outcome = Some(if self.board.is_check(opponent) {
                Outcome::Checkmate(self.turn)
            } else {
                Outcome::Stalemate
            });
        } else {
            self.turn = opponent;
        }

        Ok(Played { capture })
    }
}

impl Arbitrary for Round {
    type Parameters = ();
    type Strategy = Map<(Range<usize>, SelectorStrategy), fn((usize, Selector)) -> Round>;

    /// Rounds are generated by playing random legal moves from the standard
    /// starting position, so every generated round is reachable.
    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (0..48usize, any::<Selector>()).prop_map(|(moves, selector)| {
            let mut round = Round::default();

            for _ in 0..moves {
                match selector.try_select(round.moves()) {
                    None => break,
                    Some(m) => {
                        if round.play(m).is_err() {
                            break;
                        }
                    }
                }
            }

            round
        })
    }
}

impl Arbitrary for Board {
    type Parameters = ();
    type Strategy = Map<<Round as Arbitrary>::Strategy, fn(Round) -> Board>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        any::<Round>().prop_map(|r| *r.board())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::sample::Selector;
    use test_strategy::proptest;

    #[test]
    fn the_standard_position_has_twenty_openings() {
        let round = Round::default();
        assert_eq!(round.moves().len(), 20);
        assert_eq!(round.turn(), Color::White);
        assert!(!round.is_check());
        assert_eq!(round.outcome(), None);
    }

    #[proptest]
    fn enumerated_moves_are_playable(#[filter(!#r.is_over())] r: Round, selector: Selector) {
        let m = selector.select(r.moves());
        let mut next = r.clone();
        assert_eq!(next.play(m).err(), None);
    }

    #[proptest]
    fn rejected_moves_leave_the_round_unchanged(r: Round, m: Move) {
        let mut next = r.clone();
        if next.play(m).is_err() {
            assert_eq!(next, r);
        }
    }

    #[proptest]
    fn accepted_moves_pass_the_turn_or_end_the_round(
        #[filter(!#r.is_over())] r: Round,
        selector: Selector,
    ) {
        let m = selector.select(r.moves());
        let mut next = r.clone();
        next.play(m)?;
        assert!(next.is_over() || next.turn() == !r.turn());
    }

    #[proptest]
    fn committed_moves_never_leave_the_mover_in_check(
        #[filter(!#r.is_over())] r: Round,
        selector: Selector,
    ) {
        let side = r.turn();
        let m = selector.select(r.moves());
        let mut next = r.clone();
        next.play(m)?;
        assert!(!next.board().is_check(side));
    }

    #[proptest]
    fn both_kings_always_survive(r: Round) {
        assert_eq!(r.board().role_on(r.board().king(Color::White)), Some(Role::King));
        assert_eq!(r.board().role_on(r.board().king(Color::Black)), Some(Role::King));
    }

    #[proptest]
    fn legal_moves_never_target_a_king(r: Round) {
        for m in r.moves() {
            assert_ne!(r.board().role_on(m.whither()), Some(Role::King));
        }
    }

    #[proptest]
    fn the_round_is_over_exactly_when_no_moves_remain(r: Round) {
        assert_eq!(r.is_over(), r.moves().is_empty());
    }

    #[proptest]
    fn checkmate_is_by_the_side_that_moved_last(r: Round) {
        if let Some(Outcome::Checkmate(c)) = r.outcome() {
            assert_eq!(c, r.turn());
            assert!(r.board().is_check(!c));
        }
    }

    #[test]
    fn moving_out_of_turn_is_rejected() {
        let mut round = Round::default();
        assert_eq!(
            round.play("e7e5".parse().unwrap()),
            Err(RejectedMove::WrongSide(Square::E7))
        );
        assert_eq!(
            round.play("e3e4".parse().unwrap()),
            Err(RejectedMove::NoPiece(Square::E3))
        );
    }

    #[test]
    fn moves_against_the_pattern_are_rejected() {
        let mut round = Round::default();
        assert_eq!(
            round.play("e2d3".parse().unwrap()),
            Err(RejectedMove::IllegalPattern(Square::E2, Square::D3))
        );
        assert_eq!(
            round.play("b1b3".parse().unwrap()),
            Err(RejectedMove::IllegalPattern(Square::B1, Square::B3))
        );
    }

    #[test]
    fn unshielding_the_king_is_rejected() {
        let board = "k2r4/8/8/8/2p5/8/3N4/3K4".parse().unwrap();
        let mut round = Round::resume(board, Color::White);

        assert_eq!(
            round.play("d2c4".parse().unwrap()),
            Err(RejectedMove::SelfCheck(Square::D2))
        );

        assert_eq!(round.play("d1e1".parse().unwrap()).err(), None);
    }

    #[test]
    fn resuming_a_stalemated_position_ends_the_round_in_a_draw() {
        let board = "k7/2Q5/1K6/8/8/8/8/8".parse().unwrap();
        let round = Round::resume(board, Color::Black);
        assert_eq!(round.outcome(), Some(Outcome::Stalemate));
        assert!(round.moves().is_empty());
    }

    #[test]
    fn resuming_a_checkmated_position_ends_the_round_at_once() {
        let board = "k6R/8/1K6/8/8/8/8/8".parse().unwrap();
        let round = Round::resume(board, Color::Black);
        assert_eq!(round.outcome(), Some(Outcome::Checkmate(Color::White)));
    }

    #[test]
    fn playing_after_the_round_is_over_is_rejected() {
        let board = "k6R/8/1K6/8/8/8/8/8".parse().unwrap();
        let mut round = Round::resume(board, Color::Black);
        assert_eq!(
            round.play("a8a7".parse().unwrap()),
            Err(RejectedMove::RoundOver)
        );
    }

    #[test]
    fn capturing_a_king_is_rejected() {
        let board = "k7/8/8/8/8/8/8/K6q".parse().unwrap();
        let mut round = Round::resume(board, Color::Black);
        assert_eq!(
            round.play("h1a1".parse().unwrap()),
            Err(RejectedMove::KingCapture)
        );
    }
}
