use lib::chess::{Color, Move, Outcome, Role, Square};
use lib::game::{RejectedMove, Round};

fn play_all(round: &mut Round, moves: &[&str]) {
    for m in moves {
        let m: Move = m.parse().unwrap();
        assert_eq!(round.play(m).err(), None, "expected `{}` to be accepted", m);
    }
}

#[test]
fn the_fools_mate_ends_in_checkmate_for_black() {
    let mut round = Round::default();
    play_all(&mut round, &["f2f3", "e7e5", "g2g4", "d8h4"]);

    assert_eq!(round.outcome(), Some(Outcome::Checkmate(Color::Black)));
    assert_eq!(round.moves(), vec![]);
    assert!(round.board().is_check(Color::White));
}

#[test]
fn the_scholars_mate_ends_in_checkmate_for_white() {
    let mut round = Round::default();
    play_all(
        &mut round,
        &["e2e4", "e7e5", "d1h5", "b8c6", "f1c4", "g8f6", "h5f7"],
    );

    assert_eq!(round.outcome(), Some(Outcome::Checkmate(Color::White)));
    assert!(round.board().is_check(Color::Black));
}

#[test]
fn stalemate_is_a_draw_not_a_checkmate() {
    let board = "k7/8/1K6/2Q5/8/8/8/8".parse().unwrap();
    let mut round = Round::resume(board, Color::White);

    play_all(&mut round, &["c5c7"]);
    assert_eq!(round.outcome(), Some(Outcome::Stalemate));
}

#[test]
fn promotion_requires_an_explicit_piece() {
    let board = "4k3/P7/8/8/8/8/8/4K3".parse().unwrap();
    let mut round = Round::resume(board, Color::White);

    assert_eq!(
        round.play("a7a8".parse().unwrap()),
        Err(RejectedMove::MissingPromotion(Square::A8))
    );

    play_all(&mut round, &["a7a8q"]);
    assert_eq!(round.board().role_on(Square::A8), Some(Role::Queen));
    assert_eq!(round.board().color_on(Square::A8), Some(Color::White));
    assert_eq!(round.turn(), Color::Black);
}

#[test]
fn capturing_the_kings_last_shield_is_rejected() {
    let board = "k2r4/8/8/8/2p5/8/3N4/3K4".parse().unwrap();
    let mut round = Round::resume(board, Color::White);

    assert_eq!(
        round.play("d2c4".parse().unwrap()),
        Err(RejectedMove::SelfCheck(Square::D2))
    );
}

#[test]
fn check_must_be_answered() {
    let mut round = Round::default();
    play_all(&mut round, &["e2e4", "f7f6", "d1h5"]);

    assert!(round.is_check());
    assert_eq!(round.turn(), Color::Black);

    // moves that ignore the check are rejected
    assert_eq!(
        round.play("a7a6".parse().unwrap()),
        Err(RejectedMove::SelfCheck(Square::A7))
    );

    play_all(&mut round, &["g7g6"]);
    assert!(!round.board().is_check(Color::Black));
}

#[test]
fn kings_survive_every_line_of_play() {
    let mut round = Round::default();
    play_all(
        &mut round,
        &["e2e4", "e7e5", "g1f3", "b8c6", "f1b5", "g8f6", "e1f1", "f8c5"],
    );

    assert_eq!(round.board().role_on(round.board().king(Color::White)), Some(Role::King));
    assert_eq!(round.board().role_on(round.board().king(Color::Black)), Some(Role::King));

    for m in round.moves() {
        assert_ne!(round.board().role_on(m.whither()), Some(Role::King));
    }
}
