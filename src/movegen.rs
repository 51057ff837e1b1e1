// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Candidate move generation, one routine per piece kind.
//!
//! A candidate move is one the piece's geometry allows on the current board. Generation does not consider whether
//! the move leaves the mover's own king in check; the board filters candidates down to legal moves.
use crate::core::{attacks, *};
use crate::Board;

/// Appends the candidate moves of the piece standing on `origin` to `moves`. Does nothing if `origin` is empty.
pub fn generate_moves(board: &Board, origin: Square, moves: &mut Vec<Move>) {
    let piece = match board.piece_at(origin) {
        Some(piece) => piece,
        None => return,
    };

    generate_non_castling_moves(board, origin, moves);
    if piece.kind == PieceKind::King {
        generate_castling_moves(board, origin, piece, moves);
    }
}

/// Appends every candidate move of the piece on `origin` except castles. Attack detection is built on these, since
/// castling itself asks whether squares are attacked.
pub fn generate_non_castling_moves(board: &Board, origin: Square, moves: &mut Vec<Move>) {
    let piece = match board.piece_at(origin) {
        Some(piece) => piece,
        None => return,
    };

    match piece.kind {
        PieceKind::Pawn => generate_pawn_moves(board, origin, piece, moves),
        _ => generate_moves_for_kind(board, origin, piece, moves),
    }
}

/// Returns the candidate moves of the piece standing on `origin`.
pub fn candidate_moves(board: &Board, origin: Square) -> Vec<Move> {
    let mut moves = Vec::new();
    generate_moves(board, origin, &mut moves);
    moves
}

pub fn generate_pawn_moves(board: &Board, origin: Square, pawn: Piece, moves: &mut Vec<Move>) {
    let us = pawn.color;
    if let Some(single) = origin.towards(us.forward()) {
        if board.piece_at(single).is_none() {
            push_pawn_move(origin, single, us, moves);

            // Double pushes need both squares empty, and only an unmoved pawn may make one.
            if !pawn.has_moved() {
                if let Some(double) = single.towards(us.forward()) {
                    if board.piece_at(double).is_none() {
                        moves.push(Move::quiet(origin, double));
                    }
                }
            }
        }
    }

    for target in attacks::pawn_attacks(origin, us) {
        match board.piece_at(target) {
            Some(victim) if victim.color != us => push_pawn_move(origin, target, us, moves),
            Some(_) => {}
            None => {
                if board.can_en_passant(origin, target) {
                    moves.push(Move::en_passant(origin, target));
                }
            }
        }
    }
}

fn push_pawn_move(origin: Square, target: Square, us: Color, moves: &mut Vec<Move>) {
    if target.row() == us.promotion_row() {
        for kind in PieceKind::PROMOTIONS {
            moves.push(Move::promotion(origin, target, kind));
        }
    } else {
        moves.push(Move::quiet(origin, target));
    }
}

/// Generates the moves of a knight, bishop, rook, queen or king: every attacked square not holding a piece of
/// the mover's own color.
pub fn generate_moves_for_kind(board: &Board, origin: Square, piece: Piece, moves: &mut Vec<Move>) {
    debug_assert!(
        piece.kind != PieceKind::Pawn,
        "pawns have their own movegen routine"
    );

    let own_pieces = board.pieces(piece.color);
    let targets = attacks::attacks(piece.kind, piece.color, origin, board.occupancy());
    for target in targets & !own_pieces {
        moves.push(Move::quiet(origin, target));
    }
}

/// Generates castles for an unmoved king on its home square.
///
/// A castle requires the king not to be in check, an unmoved rook of the same color in the corner, every square
/// between king and rook to be empty, and every square the king crosses or lands on to be unattacked.
pub fn generate_castling_moves(board: &Board, origin: Square, king: Piece, moves: &mut Vec<Move>) {
    let us = king.color;
    if king.has_moved() || origin.row() != us.home_row() || origin.col() != 4 {
        return;
    }

    if board.is_in_check(us) {
        return;
    }

    // Kingside: rook on the h-file, f and g empty, king crosses f and lands on g.
    if let Some(mov) = castle(board, origin, us, 3, &[1, 2], &[1, 2]) {
        moves.push(mov);
    }

    // Queenside: rook on the a-file, b, c and d empty, king crosses d and lands on c.
    if let Some(mov) = castle(board, origin, us, -4, &[-1, -2, -3], &[-1, -2]) {
        moves.push(mov);
    }
}

fn castle(
    board: &Board,
    origin: Square,
    us: Color,
    rook_offset: i32,
    empty_offsets: &[i32],
    king_path: &[i32],
) -> Option<Move> {
    let rook = board.piece_at(origin.offset(0, rook_offset)?)?;
    if rook.kind != PieceKind::Rook || rook.color != us || rook.has_moved() {
        return None;
    }

    for &dc in empty_offsets {
        if board.piece_at(origin.offset(0, dc)?).is_some() {
            return None;
        }
    }

    for &dc in king_path {
        if board.is_square_attacked(origin.offset(0, dc)?, us.toggle()) {
            return None;
        }
    }

    let destination = origin.offset(0, *king_path.last()?)?;
    Some(Move::castle(origin, destination))
}
