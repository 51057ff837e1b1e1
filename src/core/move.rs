// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::core::*;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};

/// A move, as understood by the board.
///
/// A move names its source and destination squares and carries the flags needed to execute the special rules:
/// an optional promotion piece, whether it is a castle, and whether it is an en-passant capture. It does not
/// record the moving or captured piece; those are read off of the board when the move is made.
///
/// Equality covers every field, so promotions to different pieces on the same squares are different moves, and a
/// king move from e1 to g1 is not the same move as the castle from e1 to g1.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    source: Square,
    destination: Square,
    promotion: Option<PieceKind>,
    castling: bool,
    en_passant: bool,
}

impl Move {
    pub fn new(
        source: Square,
        destination: Square,
        promotion: Option<PieceKind>,
        castling: bool,
        en_passant: bool,
    ) -> Move {
        Move {
            source,
            destination,
            promotion,
            castling,
            en_passant,
        }
    }

    /// Constructs a plain move from the source square to the destination square. Captures are plain moves too;
    /// whether anything is captured depends on the board.
    pub fn quiet(source: Square, destination: Square) -> Move {
        Move::new(source, destination, None, false, false)
    }

    /// Constructs a pawn move onto the last rank, promoting to the given piece kind.
    pub fn promotion(source: Square, destination: Square, promoted: PieceKind) -> Move {
        Move::new(source, destination, Some(promoted), false, false)
    }

    /// Constructs a castle, encoded as the king's source and destination squares.
    pub fn castle(source: Square, destination: Square) -> Move {
        Move::new(source, destination, None, true, false)
    }

    /// Constructs an en-passant capture onto the en-passant target square.
    pub fn en_passant(source: Square, destination: Square) -> Move {
        Move::new(source, destination, None, false, true)
    }

    /// Returns the source square of this move.
    pub fn source(self) -> Square {
        self.source
    }

    /// Returns the destination square of this move.
    pub fn destination(self) -> Square {
        self.destination
    }

    /// If this move is a promotion, returns the piece kind that the pawn is being promoted to.
    pub fn promotion_piece(self) -> Option<PieceKind> {
        self.promotion
    }

    pub fn is_promotion(self) -> bool {
        self.promotion.is_some()
    }

    pub fn is_castle(self) -> bool {
        self.castling
    }

    /// Returns whether or not this move is a castle towards the h-file.
    pub fn is_kingside_castle(self) -> bool {
        self.castling && self.destination.col() > self.source.col()
    }

    pub fn is_en_passant(self) -> bool {
        self.en_passant
    }

    /// Returns a coordinate-notation representation of this move, e.g. `e2e4` or `e7e8q`.
    pub fn as_uci(self) -> String {
        let mut buf = String::new();
        write!(&mut buf, "{}{}", self.source, self.destination).unwrap();
        if let Some(kind) = self.promotion {
            write!(&mut buf, "{}", kind).unwrap();
        }

        buf
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{}", self.as_uci())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{}", self.as_uci())?;
        if self.castling {
            write!(f, " (castle)")?;
        }
        if self.en_passant {
            write!(f, " (en passant)")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Move;
    use crate::core::*;

    #[test]
    fn quiet() {
        let quiet = Move::quiet(A4, A5);
        assert_eq!(A4, quiet.source());
        assert_eq!(A5, quiet.destination());
        assert!(!quiet.is_promotion());
        assert!(!quiet.is_castle());
        assert!(!quiet.is_en_passant());
    }

    #[test]
    fn en_passant() {
        let ep = Move::en_passant(E5, D6);
        assert!(ep.is_en_passant());
        assert!(!ep.is_castle());
        assert_ne!(ep, Move::quiet(E5, D6));
    }

    #[test]
    fn promotions_are_distinct() {
        let queen = Move::promotion(A7, A8, PieceKind::Queen);
        let knight = Move::promotion(A7, A8, PieceKind::Knight);
        assert_ne!(queen, knight);
        assert_eq!(Some(PieceKind::Knight), knight.promotion_piece());
        assert_ne!(queen, Move::quiet(A7, A8));
    }

    #[test]
    fn castle_sides() {
        assert!(Move::castle(E1, G1).is_kingside_castle());
        assert!(!Move::castle(E8, C8).is_kingside_castle());
        assert!(!Move::quiet(E1, G1).is_kingside_castle());
    }

    #[test]
    fn uci_smoke() {
        assert_eq!("a1a2", Move::quiet(A1, A2).as_uci());
        assert_eq!("e1g1", Move::castle(E1, G1).to_string());
    }

    #[test]
    fn uci_promote() {
        let mv = Move::promotion(A7, A8, PieceKind::Queen);
        assert_eq!("a7a8q", mv.as_uci());
        assert_eq!("a7a8q", format!("{:?}", mv));
        assert_eq!("e5d6 (en passant)", format!("{:?}", Move::en_passant(E5, D6)));
    }

    #[test]
    fn moves_hash_by_value() {
        use std::collections::HashSet;

        let set: HashSet<Move> = [
            Move::quiet(E2, E4),
            Move::quiet(E2, E4),
            Move::promotion(B7, B8, PieceKind::Rook),
            Move::promotion(B7, B8, PieceKind::Bishop),
        ]
        .into_iter()
        .collect();
        assert_eq!(3, set.len());
    }
}
