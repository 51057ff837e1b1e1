// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use checkmate::core::{self, Color, Move};
use checkmate::{fen, movegen, perft, Board};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/Pp2P3/2N2Q1p/1PPBBPPP/R3K2R b KQkq a3 0 1";

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("quiet-move-clonemake", |b| {
        let (board, _) = fen::parse("4k3/8/4b3/8/2B5/8/8/4K3 w - - 0 1").unwrap();
        let mov = Move::quiet(core::C4, core::D5);
        b.iter(|| {
            let mut board = black_box(&board).clone();
            let mov = black_box(mov);
            board.make_move(mov);
        });
    });

    c.bench_function("pawn-candidates", |b| {
        let (board, _) = fen::parse(KIWIPETE).unwrap();
        let pawn = board.piece_at(core::B4).unwrap();
        b.iter(|| {
            let mut moves = Vec::new();
            movegen::generate_pawn_moves(black_box(&board), core::B4, pawn, &mut moves);
        });
    });

    c.bench_function("start-legal-moves", |b| {
        let board = Board::new();
        b.iter(|| black_box(&board).legal_moves(Color::White));
    });

    c.bench_function("kiwipete-legal-moves", |b| {
        let (board, side) = fen::parse(KIWIPETE).unwrap();
        b.iter(|| black_box(&board).legal_moves(side));
    });

    c.bench_function("kiwipete-is-in-check", |b| {
        let (board, side) = fen::parse(KIWIPETE).unwrap();
        b.iter(|| black_box(&board).is_in_check(side));
    });

    c.bench_function("start-perft-2", |b| {
        let board = Board::new();
        b.iter(|| perft::perft(black_box(&board), Color::White, 2));
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
