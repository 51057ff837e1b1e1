// Copyright 2017-2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::{convert::TryFrom, fmt, str::FromStr};

use bitflags::bitflags;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SquareError {
    #[error("square out of range: ({row}, {col})")]
    OutOfRange { row: i32, col: i32 },
    #[error("invalid algebraic notation: {0:?}")]
    InvalidNotation(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PieceParseError {
    #[error("invalid char: {0}")]
    InvalidChar(char),
}

/// A square on the chessboard, addressed by row and column.
///
/// Row 0 is the eighth rank (Black's back rank) and row 7 is the first rank; column 0 is the a-file. Squares are
/// only constructed through validated paths, so a `Square` in hand is always on the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Square {
    pub(in crate::core) row: u8,
    pub(in crate::core) col: u8,
}

impl Square {
    /// Creates a square from a row and column, both of which must lie in `0..8`.
    pub fn new(row: i32, col: i32) -> Result<Square, SquareError> {
        if !(0..8).contains(&row) || !(0..8).contains(&col) {
            return Err(SquareError::OutOfRange { row, col });
        }

        Ok(Square {
            row: row as u8,
            col: col as u8,
        })
    }

    /// Parses a square from algebraic notation, e.g. `e4`. The text must be exactly two characters: a file letter
    /// `a`-`h` followed by a rank digit `1`-`8`.
    pub fn from_algebraic(text: &str) -> Result<Square, SquareError> {
        let invalid = || SquareError::InvalidNotation(text.to_string());
        let mut chars = text.chars();
        let (file, rank) = match (chars.next(), chars.next(), chars.next()) {
            (Some(file), Some(rank), None) => (file, rank),
            _ => return Err(invalid()),
        };

        if !('a'..='h').contains(&file) || !('1'..='8').contains(&rank) {
            return Err(invalid());
        }

        let col = file as i32 - 'a' as i32;
        let row = 8 - (rank as i32 - '0' as i32);
        Square::new(row, col)
    }

    pub fn to_algebraic(self) -> String {
        self.to_string()
    }

    pub const fn row(self) -> u8 {
        self.row
    }

    pub const fn col(self) -> u8 {
        self.col
    }

    /// Index of this square in row-major order, a8 = 0 and h1 = 63.
    pub const fn index(self) -> usize {
        self.row as usize * 8 + self.col as usize
    }

    /// Creates a square from coordinates already known to be on the board.
    pub(crate) fn of(row: u8, col: u8) -> Square {
        debug_assert!(row < 8 && col < 8, "square out of range: ({}, {})", row, col);
        Square { row, col }
    }

    pub(in crate::core) const fn from_index(index: u8) -> Square {
        Square {
            row: index / 8,
            col: index % 8,
        }
    }

    /// Returns the square `dr` rows and `dc` columns away, or `None` if that falls off of the board.
    pub fn offset(self, dr: i32, dc: i32) -> Option<Square> {
        Square::new(self.row as i32 + dr, self.col as i32 + dc).ok()
    }

    /// Returns the adjacent square in the given direction, or `None` at the board edge.
    pub fn towards(self, dir: Direction) -> Option<Square> {
        let (dr, dc) = dir.as_offset();
        self.offset(dr, dc)
    }
}

impl FromStr for Square {
    type Err = SquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Square::from_algebraic(s)
    }
}

impl TryFrom<String> for Square {
    type Error = SquareError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Square::from_algebraic(&value)
    }
}

impl From<Square> for String {
    fn from(square: Square) -> String {
        square.to_string()
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = (b'a' + self.col) as char;
        let rank = 8 - self.row;
        write!(f, "{}{}", file, rank)
    }
}

pub const A1: Square = Square { row: 7, col: 0 };
pub const B1: Square = Square { row: 7, col: 1 };
pub const C1: Square = Square { row: 7, col: 2 };
pub const D1: Square = Square { row: 7, col: 3 };
pub const E1: Square = Square { row: 7, col: 4 };
pub const F1: Square = Square { row: 7, col: 5 };
pub const G1: Square = Square { row: 7, col: 6 };
pub const H1: Square = Square { row: 7, col: 7 };
pub const A2: Square = Square { row: 6, col: 0 };
pub const B2: Square = Square { row: 6, col: 1 };
pub const C2: Square = Square { row: 6, col: 2 };
pub const D2: Square = Square { row: 6, col: 3 };
pub const E2: Square = Square { row: 6, col: 4 };
pub const F2: Square = Square { row: 6, col: 5 };
pub const G2: Square = Square { row: 6, col: 6 };
pub const H2: Square = Square { row: 6, col: 7 };
pub const A3: Square = Square { row: 5, col: 0 };
pub const B3: Square = Square { row: 5, col: 1 };
pub const C3: Square = Square { row: 5, col: 2 };
pub const D3: Square = Square { row: 5, col: 3 };
pub const E3: Square = Square { row: 5, col: 4 };
pub const F3: Square = Square { row: 5, col: 5 };
pub const G3: Square = Square { row: 5, col: 6 };
pub const H3: Square = Square { row: 5, col: 7 };
pub const A4: Square = Square { row: 4, col: 0 };
pub const B4: Square = Square { row: 4, col: 1 };
pub const C4: Square = Square { row: 4, col: 2 };
pub const D4: Square = Square { row: 4, col: 3 };
pub const E4: Square = Square { row: 4, col: 4 };
pub const F4: Square = Square { row: 4, col: 5 };
pub const G4: Square = Square { row: 4, col: 6 };
pub const H4: Square = Square { row: 4, col: 7 };
pub const A5: Square = Square { row: 3, col: 0 };
pub const B5: Square = Square { row: 3, col: 1 };
pub const C5: Square = Square { row: 3, col: 2 };
pub const D5: Square = Square { row: 3, col: 3 };
pub const E5: Square = Square { row: 3, col: 4 };
pub const F5: Square = Square { row: 3, col: 5 };
pub const G5: Square = Square { row: 3, col: 6 };
pub const H5: Square = Square { row: 3, col: 7 };
pub const A6: Square = Square { row: 2, col: 0 };
pub const B6: Square = Square { row: 2, col: 1 };
pub const C6: Square = Square { row: 2, col: 2 };
pub const D6: Square = Square { row: 2, col: 3 };
pub const E6: Square = Square { row: 2, col: 4 };
pub const F6: Square = Square { row: 2, col: 5 };
pub const G6: Square = Square { row: 2, col: 6 };
pub const H6: Square = Square { row: 2, col: 7 };
pub const A7: Square = Square { row: 1, col: 0 };
pub const B7: Square = Square { row: 1, col: 1 };
pub const C7: Square = Square { row: 1, col: 2 };
pub const D7: Square = Square { row: 1, col: 3 };
pub const E7: Square = Square { row: 1, col: 4 };
pub const F7: Square = Square { row: 1, col: 5 };
pub const G7: Square = Square { row: 1, col: 6 };
pub const H7: Square = Square { row: 1, col: 7 };
pub const A8: Square = Square { row: 0, col: 0 };
pub const B8: Square = Square { row: 0, col: 1 };
pub const C8: Square = Square { row: 0, col: 2 };
pub const D8: Square = Square { row: 0, col: 3 };
pub const E8: Square = Square { row: 0, col: 4 };
pub const F8: Square = Square { row: 0, col: 5 };
pub const G8: Square = Square { row: 0, col: 6 };
pub const H8: Square = Square { row: 0, col: 7 };

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum Color {
    #[display(fmt = "White")]
    White,
    #[display(fmt = "Black")]
    Black,
}

impl Color {
    pub fn toggle(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// The direction this color's pawns advance in.
    pub fn forward(self) -> Direction {
        match self {
            Color::White => Direction::North,
            Color::Black => Direction::South,
        }
    }

    /// The row holding this color's king and rooks at the start of the game.
    pub fn home_row(self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }

    /// The row this color's pawns start the game on.
    pub fn pawn_row(self) -> u8 {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }

    /// The row on which this color's pawns promote.
    pub fn promotion_row(self) -> u8 {
        self.toggle().home_row()
    }
}

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// The kinds a pawn may promote to, in the order promotions are generated.
    pub const PROMOTIONS: [PieceKind; 4] = [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ];

    /// Parses a promotion letter (`Q`, `R`, `B`, `N`, either case).
    pub fn from_promotion_char(c: char) -> Option<PieceKind> {
        match c.to_ascii_uppercase() {
            'Q' => Some(PieceKind::Queen),
            'R' => Some(PieceKind::Rook),
            'B' => Some(PieceKind::Bishop),
            'N' => Some(PieceKind::Knight),
            _ => None,
        }
    }

    /// The upper-case letter naming this kind.
    pub fn letter(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter().to_ascii_lowercase())
    }
}

/// A piece on the board. Its square is implied by where the board stores it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
    has_moved: bool,
}

impl Piece {
    pub const fn new(color: Color, kind: PieceKind) -> Piece {
        Piece {
            color,
            kind,
            has_moved: false,
        }
    }

    /// Whether this piece has ever moved. Pawn double steps and castling depend on it.
    pub const fn has_moved(&self) -> bool {
        self.has_moved
    }

    /// Marks this piece as moved. There is deliberately no way to clear the flag again.
    pub fn mark_moved(&mut self) {
        self.has_moved = true;
    }

    /// Returns a copy of this piece, marked as moved.
    pub fn moved(mut self) -> Piece {
        self.mark_moved();
        self
    }

    /// Two-character code used by the text board, e.g. `WP` or `BK`.
    pub fn code(&self) -> String {
        let color = match self.color {
            Color::White => 'W',
            Color::Black => 'B',
        };

        format!("{}{}", color, self.kind.letter())
    }
}

impl TryFrom<char> for Piece {
    type Error = PieceParseError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        let kind = match value.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return Err(PieceParseError::InvalidChar(value)),
        };

        let color = if value.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };

        Ok(Piece::new(color, kind))
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self.color {
            Color::White => self.kind.letter(),
            Color::Black => self.kind.letter().to_ascii_lowercase(),
        };

        write!(f, "{}", c)
    }
}

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    /// Row and column deltas for one step in this direction. North points at the eighth rank, i.e. row 0.
    pub const fn as_offset(self) -> (i32, i32) {
        match self {
            Direction::North => (-1, 0),
            Direction::NorthEast => (-1, 1),
            Direction::East => (0, 1),
            Direction::SouthEast => (1, 1),
            Direction::South => (1, 0),
            Direction::SouthWest => (1, -1),
            Direction::West => (0, -1),
            Direction::NorthWest => (-1, -1),
        }
    }
}

bitflags! {
    pub struct CastleStatus: u8 {
        const NONE = 0;
        const WHITE_KINGSIDE = 0b0000_0001;
        const WHITE_QUEENSIDE = 0b0000_0010;
        const WHITE = Self::WHITE_KINGSIDE.bits | Self::WHITE_QUEENSIDE.bits;
        const BLACK_KINGSIDE = 0b0000_0100;
        const BLACK_QUEENSIDE = 0b0000_1000;
        const BLACK = Self::BLACK_KINGSIDE.bits | Self::BLACK_QUEENSIDE.bits;
    }
}

impl CastleStatus {
    pub fn kingside(color: Color) -> CastleStatus {
        match color {
            Color::White => CastleStatus::WHITE_KINGSIDE,
            Color::Black => CastleStatus::BLACK_KINGSIDE,
        }
    }

    pub fn queenside(color: Color) -> CastleStatus {
        match color {
            Color::White => CastleStatus::WHITE_QUEENSIDE,
            Color::Black => CastleStatus::BLACK_QUEENSIDE,
        }
    }
}

/// Iterator over all 64 squares in row-major order, starting at a8.
pub struct AllSquares(u8);

impl Iterator for AllSquares {
    type Item = Square;

    fn next(&mut self) -> Option<Self::Item> {
        if self.0 >= 64 {
            None
        } else {
            let next = self.0;
            self.0 += 1;
            Some(Square::from_index(next))
        }
    }
}

pub fn squares() -> AllSquares {
    AllSquares(0)
}

pub fn colors() -> ::std::array::IntoIter<Color, 2> {
    [Color::White, Color::Black].into_iter()
}
