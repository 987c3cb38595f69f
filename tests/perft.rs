use lib::game::Round;

fn perft(round: &Round, depth: u8) -> usize {
    match depth {
        0 => 1,
        1 => round.moves().len(),
        d => round
            .moves()
            .into_iter()
            .map(|m| {
                let mut next = round.clone();
                next.play(m).expect("enumerated moves are legal");
                perft(&next, d - 1)
            })
            .sum(),
    }
}

#[test]
fn perft_expands_the_expected_number_of_nodes() {
    // https://www.chessprogramming.org/Perft_Results#Initial_Position
    //
    // Castling and en passant cannot occur within four plies of the
    // starting position, so the reference counts apply verbatim.
    let round = Round::default();
    assert_eq!(perft(&round, 1), 20);
    assert_eq!(perft(&round, 2), 400);
    assert_eq!(perft(&round, 3), 8902);
}

#[test]
#[ignore = "expensive; run explicitly with --ignored"]
fn perft_expands_the_expected_number_of_nodes_at_depth_four() {
    assert_eq!(perft(&Round::default(), 4), 197281);
}
