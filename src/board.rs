// Copyright 2017-2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::fmt;

use thiserror::Error;

use crate::{core::*, movegen};

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("square {0} is already occupied")]
    Occupied(Square),
}

/// A chess board: which piece stands on each square, plus the state that the rules need beyond piece placement.
///
/// The board knows nothing about whose turn it is; that belongs to the [`Game`](crate::Game) driving it. It does
/// know how to generate, validate and execute moves for either color.
#[derive(Clone, Debug)]
pub struct Board {
    /// Piece storage, indexed by [`Square::index`]. At most one piece per square.
    squares: [Option<Piece>; 64],
    /// Every move executed on this board, in order.
    history: Vec<Move>,
    /// Every piece captured on this board, in order of capture.
    captured: Vec<Piece>,
    /// The square skipped by a pawn double push on the previous ply, if there was one.
    en_passant_target: Option<Square>,
    /// Plies since the last pawn move or capture, for the 50-move rule.
    half_move_clock: u16,
    /// Number of the current full move, starting at 1 and incremented after each Black move.
    full_move_number: u16,
}

impl Board {
    /// Creates a board set up in the standard starting position.
    pub fn new() -> Board {
        let mut board = Board::empty();
        for (col, &kind) in BACK_RANK.iter().enumerate() {
            let col = col as u8;
            for color in colors() {
                board.squares[Square::of(color.home_row(), col).index()] = Some(Piece::new(color, kind));
                board.squares[Square::of(color.pawn_row(), col).index()] =
                    Some(Piece::new(color, PieceKind::Pawn));
            }
        }

        board
    }

    /// Creates a board with no pieces on it.
    pub fn empty() -> Board {
        Board {
            squares: [None; 64],
            history: Vec::new(),
            captured: Vec::new(),
            en_passant_target: None,
            half_move_clock: 0,
            full_move_number: 1,
        }
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.squares[square.index()]
    }

    /// Places a piece on an empty square.
    pub fn add_piece(&mut self, square: Square, piece: Piece) -> Result<(), PlacementError> {
        let slot = &mut self.squares[square.index()];
        if slot.is_some() {
            return Err(PlacementError::Occupied(square));
        }

        *slot = Some(piece);
        Ok(())
    }

    /// Removes and returns the piece on the given square, if any.
    pub fn remove_piece(&mut self, square: Square) -> Option<Piece> {
        self.squares[square.index()].take()
    }

    /// All squares holding a piece of the given color.
    pub fn pieces(&self, color: Color) -> SquareSet {
        squares()
            .filter(|&sq| matches!(self.piece_at(sq), Some(piece) if piece.color == color))
            .collect()
    }

    /// All occupied squares.
    pub fn occupancy(&self) -> SquareSet {
        squares()
            .filter(|&sq| self.piece_at(sq).is_some())
            .collect()
    }

    pub fn king(&self, color: Color) -> Option<Square> {
        squares().find(|&sq| {
            matches!(self.piece_at(sq), Some(piece) if piece.color == color && piece.kind == PieceKind::King)
        })
    }

    pub fn move_history(&self) -> &[Move] {
        &self.history
    }

    pub fn captured_pieces(&self) -> &[Piece] {
        &self.captured
    }

    pub fn en_passant_target(&self) -> Option<Square> {
        self.en_passant_target
    }

    pub fn half_move_clock(&self) -> u16 {
        self.half_move_clock
    }

    pub fn full_move_number(&self) -> u16 {
        self.full_move_number
    }

    pub(crate) fn set_en_passant_target(&mut self, target: Option<Square>) {
        self.en_passant_target = target;
    }

    pub(crate) fn set_clocks(&mut self, half_move_clock: u16, full_move_number: u16) {
        self.half_move_clock = half_move_clock;
        self.full_move_number = full_move_number;
    }
}

//
// Attack detection.
//
// A square is attacked by a color if it is the destination of a candidate move of some piece of that color. Castles
// are left out: castling asks whether squares are attacked, and a castle never captures. A pawn therefore attacks
// the squares it could push to and its diagonals only when they hold an enemy piece or the en-passant target.
//

impl Board {
    /// The destinations of the non-castling candidate moves of the piece on `square`, or the empty set if there is
    /// none.
    pub fn attacks_from(&self, square: Square) -> SquareSet {
        let mut moves = Vec::new();
        movegen::generate_non_castling_moves(self, square, &mut moves);
        moves.into_iter().map(|mov| mov.destination()).collect()
    }

    /// Every square attacked by at least one piece of the given color.
    pub fn attacked_squares(&self, by: Color) -> SquareSet {
        let mut attacked = SquareSet::empty();
        for from in self.pieces(by) {
            attacked |= self.attacks_from(from);
        }

        attacked
    }

    pub fn is_square_attacked(&self, square: Square, by: Color) -> bool {
        self.pieces(by)
            .into_iter()
            .any(|from| self.attacks_from(from).contains(square))
    }

    /// Whether the king of the given color is attacked. A board without that king is never in check.
    pub fn is_in_check(&self, color: Color) -> bool {
        match self.king(color) {
            Some(king) => self.is_square_attacked(king, color.toggle()),
            None => false,
        }
    }

    /// Whether the pawn on `from` may capture en passant onto `to`: `to` must be the current en-passant target, one
    /// file over and one row ahead of the pawn, with an enemy pawn beside the capturing pawn on `to`'s file.
    pub fn can_en_passant(&self, from: Square, to: Square) -> bool {
        if self.en_passant_target != Some(to) {
            return false;
        }

        let pawn = match self.piece_at(from) {
            Some(piece) if piece.kind == PieceKind::Pawn => piece,
            _ => return false,
        };

        let (forward, _) = pawn.color.forward().as_offset();
        if (from.col() as i32 - to.col() as i32).abs() != 1
            || to.row() as i32 != from.row() as i32 + forward
        {
            return false;
        }

        matches!(
            self.piece_at(Square::of(from.row(), to.col())),
            Some(victim) if victim.kind == PieceKind::Pawn && victim.color != pawn.color
        )
    }
}

//
// Move legality and execution.
//

impl Board {
    /// Makes a move on the board if it is legal, returning whether it was made.
    ///
    /// A move is legal if there is a piece on its source square, the piece's candidate move generator produces
    /// exactly this move, and making it does not leave the mover's own king in check. An illegal move leaves the
    /// board untouched.
    pub fn make_move(&mut self, mov: Move) -> bool {
        let _span = tracing::debug_span!("make_move", mov = %mov).entered();
        let piece = match self.piece_at(mov.source()) {
            Some(piece) => piece,
            None => {
                tracing::debug!("rejected: no piece at source square");
                return false;
            }
        };

        if !movegen::candidate_moves(self, mov.source()).contains(&mov) {
            tracing::debug!("rejected: not a candidate move for {}", piece.code());
            return false;
        }

        if self.leaves_king_in_check(mov, piece.color) {
            tracing::debug!("rejected: leaves the {} king in check", piece.color);
            return false;
        }

        self.execute_move(mov);
        true
    }

    /// Legality test for any move, without making it.
    pub fn is_legal(&self, mov: Move) -> bool {
        match self.piece_at(mov.source()) {
            Some(piece) => {
                movegen::candidate_moves(self, mov.source()).contains(&mov)
                    && !self.leaves_king_in_check(mov, piece.color)
            }
            None => false,
        }
    }

    /// All legal moves for the piece on `square`, or none if the square is empty.
    pub fn legal_moves_from(&self, square: Square) -> Vec<Move> {
        let color = match self.piece_at(square) {
            Some(piece) => piece.color,
            None => return Vec::new(),
        };

        let mut moves = movegen::candidate_moves(self, square);
        moves.retain(|&mov| !self.leaves_king_in_check(mov, color));
        moves
    }

    /// All legal moves for the given color, ordered by source square (a8 first) and then by generation order.
    pub fn legal_moves(&self, color: Color) -> Vec<Move> {
        let mut moves = Vec::new();
        for square in self.pieces(color) {
            movegen::generate_moves(self, square, &mut moves);
        }

        moves.retain(|&mov| !self.leaves_king_in_check(mov, color));
        moves
    }

    pub fn is_checkmate(&self, color: Color) -> bool {
        self.is_in_check(color) && self.legal_moves(color).is_empty()
    }

    pub fn is_stalemate(&self, color: Color) -> bool {
        !self.is_in_check(color) && self.legal_moves(color).is_empty()
    }

    /// Plays the move out on a copy of the piece placement and reports whether `color`'s king ends up attacked.
    /// The copy leaves history and captures behind, since neither affects attacks.
    fn leaves_king_in_check(&self, mov: Move, color: Color) -> bool {
        let mut scratch = Board {
            squares: self.squares,
            history: Vec::new(),
            captured: Vec::new(),
            en_passant_target: self.en_passant_target,
            half_move_clock: self.half_move_clock,
            full_move_number: self.full_move_number,
        };

        scratch.execute_move(mov);
        scratch.is_in_check(color)
    }

    /// Executes a move that is already known to be a candidate move, updating all bookkeeping.
    fn execute_move(&mut self, mov: Move) {
        let source = mov.source();
        let destination = mov.destination();
        let moving_piece = self
            .piece_at(source)
            .expect("invalid move: no piece at source square");

        let captured = if mov.is_castle() {
            self.execute_castle(mov);
            None
        } else if mov.is_en_passant() {
            // The captured pawn sits beside the capturing pawn, not on the destination square.
            let victim_square = Square::of(source.row(), destination.col());
            let victim = self
                .remove_piece(victim_square)
                .expect("invalid move: en passant without a pawn to capture");
            self.relocate(source, destination, moving_piece.moved());
            Some(victim)
        } else if let Some(kind) = mov.promotion_piece() {
            let promoted = Piece::new(moving_piece.color, kind).moved();
            self.relocate(source, destination, promoted)
        } else {
            self.relocate(source, destination, moving_piece.moved())
        };

        if let Some(victim) = captured {
            self.captured.push(victim);
        }

        self.history.push(mov);

        // The en-passant target only ever lives for one ply.
        self.en_passant_target = None;
        if moving_piece.kind == PieceKind::Pawn
            && (source.row() as i32 - destination.row() as i32).abs() == 2
        {
            let skipped = Square::of((source.row() + destination.row()) / 2, source.col());
            self.en_passant_target = Some(skipped);
        }

        if moving_piece.kind == PieceKind::Pawn || captured.is_some() {
            self.half_move_clock = 0;
        } else {
            self.half_move_clock = self.half_move_clock.saturating_add(1);
        }

        if moving_piece.color == Color::Black {
            self.full_move_number = self.full_move_number.saturating_add(1);
        }

        tracing::trace!(
            mov = %mov,
            captured = ?captured.map(|piece| piece.code()),
            half_move_clock = self.half_move_clock,
            "executed move"
        );
    }

    /// Moves the king and its rook together. The rook lands on the square the king crossed.
    fn execute_castle(&mut self, mov: Move) {
        let row = mov.source().row();
        let (rook_from, rook_to) = if mov.is_kingside_castle() {
            (Square::of(row, 7), Square::of(row, 5))
        } else {
            (Square::of(row, 0), Square::of(row, 3))
        };

        let king = self
            .remove_piece(mov.source())
            .expect("invalid move: castle without king");
        let rook = self
            .remove_piece(rook_from)
            .expect("invalid move: castle without rook");
        self.relocate_into_empty(mov.destination(), king.moved());
        self.relocate_into_empty(rook_to, rook.moved());
    }

    /// Moves `piece` (the new occupant) from `from` to `to`, returning whatever stood on `to`.
    fn relocate(&mut self, from: Square, to: Square, piece: Piece) -> Option<Piece> {
        self.squares[from.index()] = None;
        self.squares[to.index()].replace(piece)
    }

    fn relocate_into_empty(&mut self, to: Square, piece: Piece) {
        self.add_piece(to, piece)
            .expect("invalid move: castle destination occupied");
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

const FILE_LABELS: &str = "   a  b  c  d  e  f  g  h";
const SEPARATOR: &str = "  +--+--+--+--+--+--+--+--+";

/// Renders the board as a text grid, White at the bottom, each piece as a color letter and a kind letter.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", FILE_LABELS)?;
        writeln!(f, "{}", SEPARATOR)?;
        for row in 0..8u8 {
            let rank = 8 - row;
            write!(f, "{} |", rank)?;
            for col in 0..8u8 {
                match self.piece_at(Square::of(row, col)) {
                    Some(piece) => write!(f, "{}|", piece.code())?,
                    None => write!(f, "  |")?,
                }
            }

            writeln!(f, " {}", rank)?;
            writeln!(f, "{}", SEPARATOR)?;
        }

        writeln!(f, "{}", FILE_LABELS)
    }
}
