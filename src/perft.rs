// Copyright 2017-2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Move path enumeration. Counting the leaves of the legal move tree and comparing against published counts is the
//! standard way of finding move generation bugs.

use crate::{core::*, Board};

/// Counts the leaf nodes of the legal move tree of the given depth, `side` moving first.
pub fn perft(board: &Board, side: Color, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = board.legal_moves(side);
    if depth == 1 {
        return moves.len() as u64;
    }

    moves
        .into_iter()
        .map(|mov| {
            let mut next = board.clone();
            let made = next.make_move(mov);
            debug_assert!(made, "legal move {:?} was rejected", mov);
            perft(&next, side.toggle(), depth - 1)
        })
        .sum()
}

/// Splits a perft count by the first move, which narrows a wrong total down to the subtree responsible for it.
pub fn divide(board: &Board, side: Color, depth: u32) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }

    board
        .legal_moves(side)
        .into_iter()
        .map(|mov| {
            let mut next = board.clone();
            next.make_move(mov);
            (mov, perft(&next, side.toggle(), depth - 1))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{divide, perft};
    use crate::{core::*, fen, Board};

    fn count(fen: &str, depth: u32) -> u64 {
        let (board, side) = fen::parse(fen).unwrap();
        perft(&board, side, depth)
    }

    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    const ENDGAME: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";

    #[test]
    fn depth_zero() {
        assert_eq!(1, perft(&Board::new(), Color::White, 0));
    }

    #[test]
    fn start_position() {
        assert_eq!(20, count(fen::START_POSITION, 1));
        assert_eq!(400, count(fen::START_POSITION, 2));
        assert_eq!(8902, count(fen::START_POSITION, 3));
    }

    #[test]
    fn kiwipete() {
        assert_eq!(48, count(KIWIPETE, 1));
        assert_eq!(2039, count(KIWIPETE, 2));
    }

    #[test]
    fn rook_and_pawn_endgame() {
        assert_eq!(14, count(ENDGAME, 1));
        assert_eq!(191, count(ENDGAME, 2));
        assert_eq!(2812, count(ENDGAME, 3));
    }

    #[test]
    fn divide_sums_to_perft() {
        let board = Board::new();
        let split = divide(&board, Color::White, 2);
        assert_eq!(20, split.len());
        assert!(split.iter().all(|&(_, nodes)| nodes == 20));
        assert_eq!(400, split.iter().map(|&(_, nodes)| nodes).sum::<u64>());
    }
}
