// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Attack geometry for every piece kind. Leaper attacks (knight, king, pawn) are looked up in tables built on first
//! use; slider attacks are ray-cast against an occupancy set, stopping at (and including) the first occupied square.
use std::sync::LazyLock;

use crate::core::*;

pub const ROOK_DIRECTIONS: [Direction; 4] = [
    Direction::North,
    Direction::East,
    Direction::South,
    Direction::West,
];

pub const BISHOP_DIRECTIONS: [Direction; 4] = [
    Direction::NorthEast,
    Direction::SouthEast,
    Direction::SouthWest,
    Direction::NorthWest,
];

const KNIGHT_OFFSETS: [(i32, i32); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

const KING_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

struct LeaperTable {
    table: [SquareSet; 64],
}

impl LeaperTable {
    fn new(offsets: &[(i32, i32)]) -> LeaperTable {
        let mut lt = LeaperTable {
            table: [SquareSet::empty(); 64],
        };

        for sq in squares() {
            lt.table[sq.index()] = offsets
                .iter()
                .filter_map(|&(dr, dc)| sq.offset(dr, dc))
                .collect();
        }

        lt
    }

    fn attacks(&self, sq: Square) -> SquareSet {
        self.table[sq.index()]
    }
}

struct PawnTable {
    table: [[SquareSet; 2]; 64],
}

impl PawnTable {
    fn new() -> PawnTable {
        let mut pt = PawnTable {
            table: [[SquareSet::empty(); 2]; 64],
        };

        for sq in squares() {
            for color in colors() {
                let (dr, _) = color.forward().as_offset();
                pt.table[sq.index()][color as usize] = [-1, 1]
                    .iter()
                    .filter_map(|&dc| sq.offset(dr, dc))
                    .collect();
            }
        }

        pt
    }

    fn attacks(&self, sq: Square, color: Color) -> SquareSet {
        self.table[sq.index()][color as usize]
    }
}

static KING_TABLE: LazyLock<LeaperTable> = LazyLock::new(|| LeaperTable::new(&KING_OFFSETS));
static KNIGHT_TABLE: LazyLock<LeaperTable> = LazyLock::new(|| LeaperTable::new(&KNIGHT_OFFSETS));
static PAWN_TABLE: LazyLock<PawnTable> = LazyLock::new(PawnTable::new);

/// Casts a ray from `sq` in each direction until the board edge or the first occupied square, which is included.
pub fn ray_attacks(sq: Square, directions: &[Direction], occupancy: SquareSet) -> SquareSet {
    let mut attacks = SquareSet::empty();
    for &dir in directions {
        let mut cursor = sq;
        while let Some(next) = cursor.towards(dir) {
            attacks.insert(next);
            if occupancy.contains(next) {
                break;
            }

            cursor = next;
        }
    }

    attacks
}

/// The squares a pawn of the given color attacks diagonally, whether or not anything stands on them.
pub fn pawn_attacks(sq: Square, color: Color) -> SquareSet {
    PAWN_TABLE.attacks(sq, color)
}

pub fn knight_attacks(sq: Square) -> SquareSet {
    KNIGHT_TABLE.attacks(sq)
}

pub fn king_attacks(sq: Square) -> SquareSet {
    KING_TABLE.attacks(sq)
}

pub fn bishop_attacks(sq: Square, occupancy: SquareSet) -> SquareSet {
    ray_attacks(sq, &BISHOP_DIRECTIONS, occupancy)
}

pub fn rook_attacks(sq: Square, occupancy: SquareSet) -> SquareSet {
    ray_attacks(sq, &ROOK_DIRECTIONS, occupancy)
}

pub fn queen_attacks(sq: Square, occupancy: SquareSet) -> SquareSet {
    bishop_attacks(sq, occupancy) | rook_attacks(sq, occupancy)
}

pub fn attacks(kind: PieceKind, color: Color, sq: Square, occupancy: SquareSet) -> SquareSet {
    match kind {
        PieceKind::Pawn => pawn_attacks(sq, color),
        PieceKind::Knight => knight_attacks(sq),
        PieceKind::Bishop => bishop_attacks(sq, occupancy),
        PieceKind::Rook => rook_attacks(sq, occupancy),
        PieceKind::Queen => queen_attacks(sq, occupancy),
        PieceKind::King => king_attacks(sq),
    }
}
