// Copyright 2017-2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Forsyth-Edwards Notation, the standard one-line encoding of a chess position.
//!
//! FEN records castle rights rather than which pieces have moved. Decoding recovers `has_moved` from the rights
//! and from piece placement; encoding goes the other way and derives the rights from unmoved kings and rooks.

use std::{fmt::Write, iter::Peekable, str::Chars};

use thiserror::Error;

use crate::{core::*, Board};

/// Possible errors that can arise when parsing a FEN string into a `Board`.
#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum FenParseError {
    #[error("unexpected char: {0}")]
    UnexpectedChar(char),
    #[error("unexpected EOF while reading")]
    UnexpectedEnd,
    #[error("invalid digit")]
    InvalidDigit,
    #[error("file does not sum to 8")]
    FileDoesNotSumToEight,
    #[error("board does not have 8 ranks")]
    WrongRankCount,
    #[error("unknown piece: {0}")]
    UnknownPiece(char),
    #[error("invalid side to move")]
    InvalidSideToMove,
    #[error("invalid castle")]
    InvalidCastle,
    #[error("invalid en-passant")]
    InvalidEnPassant,
    #[error("empty halfmove")]
    EmptyHalfmove,
    #[error("invalid halfmove")]
    InvalidHalfmove,
    #[error("empty fullmove")]
    EmptyFullmove,
    #[error("invalid fullmove")]
    InvalidFullmove,
    #[error("expected exactly one {0} king")]
    KingCount(Color),
    #[error("{0} is in check but it is not their move")]
    OpponentInCheck(Color),
}

/// FEN of the standard starting position.
pub const START_POSITION: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

type Stream<'a> = Peekable<Chars<'a>>;

fn eat(iter: &mut Stream<'_>, expected: char) -> Result<(), FenParseError> {
    match iter.next() {
        Some(c) if c == expected => Ok(()),
        Some(c) => Err(FenParseError::UnexpectedChar(c)),
        None => Err(FenParseError::UnexpectedEnd),
    }
}

fn advance(iter: &mut Stream<'_>) {
    let _ = iter.next();
}

fn peek(iter: &mut Stream<'_>) -> Result<char, FenParseError> {
    iter.peek().copied().ok_or(FenParseError::UnexpectedEnd)
}

fn eat_side_to_move(iter: &mut Stream<'_>) -> Result<Color, FenParseError> {
    let side = match peek(iter)? {
        'w' => Color::White,
        'b' => Color::Black,
        _ => return Err(FenParseError::InvalidSideToMove),
    };

    advance(iter);
    Ok(side)
}

fn eat_castle_status(iter: &mut Stream<'_>) -> Result<CastleStatus, FenParseError> {
    if peek(iter)? == '-' {
        advance(iter);
        return Ok(CastleStatus::NONE);
    }

    let mut status = CastleStatus::NONE;
    for _ in 0..4 {
        match peek(iter)? {
            'K' => status |= CastleStatus::WHITE_KINGSIDE,
            'k' => status |= CastleStatus::BLACK_KINGSIDE,
            'Q' => status |= CastleStatus::WHITE_QUEENSIDE,
            'q' => status |= CastleStatus::BLACK_QUEENSIDE,
            ' ' => break,
            _ => return Err(FenParseError::InvalidCastle),
        }

        advance(iter);
    }

    Ok(status)
}

fn eat_en_passant(iter: &mut Stream<'_>) -> Result<Option<Square>, FenParseError> {
    if peek(iter)? == '-' {
        advance(iter);
        return Ok(None);
    }

    let mut buf = String::new();
    while let Some(&c) = iter.peek() {
        if c == ' ' {
            break;
        }

        buf.push(c);
        advance(iter);
    }

    Square::from_algebraic(&buf)
        .map(Some)
        .map_err(|_| FenParseError::InvalidEnPassant)
}

fn eat_number(iter: &mut Stream<'_>) -> Result<String, FenParseError> {
    let mut buf = String::new();
    loop {
        let c = peek(iter)?;
        if !c.is_ascii_digit() {
            break;
        }

        buf.push(c);
        advance(iter);
    }

    Ok(buf)
}

fn eat_halfmove(iter: &mut Stream<'_>) -> Result<u16, FenParseError> {
    let buf = eat_number(iter)?;
    if buf.is_empty() {
        return Err(FenParseError::EmptyHalfmove);
    }

    buf.parse::<u16>()
        .map_err(|_| FenParseError::InvalidHalfmove)
}

fn eat_fullmove(iter: &mut Stream<'_>) -> Result<u16, FenParseError> {
    let mut buf = String::new();
    for ch in iter {
        if !ch.is_ascii_digit() {
            break;
        }

        buf.push(ch);
    }

    if buf.is_empty() {
        return Err(FenParseError::EmptyFullmove);
    }

    buf.parse::<u16>()
        .map_err(|_| FenParseError::InvalidFullmove)
}

/// Reads the piece placement field, rank 8 first.
fn eat_placement(iter: &mut Stream<'_>) -> Result<Vec<(Square, Piece)>, FenParseError> {
    let mut pieces = Vec::new();
    for row in 0..8u8 {
        let mut col = 0;
        while col <= 7 {
            let c = peek(iter)?;
            // digits 1 through 8 indicate empty squares.
            if c.is_ascii_digit() {
                if !('1'..='8').contains(&c) {
                    return Err(FenParseError::InvalidDigit);
                }

                col += c as u8 - b'0';
                if col > 8 {
                    return Err(FenParseError::FileDoesNotSumToEight);
                }

                advance(iter);
                continue;
            }

            if c == '/' {
                return Err(FenParseError::FileDoesNotSumToEight);
            }

            // if it's not a digit, it represents a piece.
            let piece = Piece::try_from(c).map_err(|_| FenParseError::UnknownPiece(c))?;
            pieces.push((Square::of(row, col), piece));
            advance(iter);
            col += 1;
        }

        let next = peek(iter)?;
        match (row, next) {
            (7, '/') | (0..=6, ' ') => return Err(FenParseError::WrongRankCount),
            (0..=6, _) => eat(iter, '/')?,
            _ => {}
        }
    }

    Ok(pieces)
}

/// Whether a piece found on `square` by the decoder should count as having moved.
fn infer_has_moved(square: Square, piece: Piece, castle: CastleStatus) -> bool {
    let home = piece.color.home_row();
    match piece.kind {
        PieceKind::Pawn => square.row() != piece.color.pawn_row(),
        PieceKind::King => {
            let rights = CastleStatus::kingside(piece.color) | CastleStatus::queenside(piece.color);
            square != Square::of(home, 4) || !castle.intersects(rights)
        }
        PieceKind::Rook => {
            let kingside_corner =
                square == Square::of(home, 7) && castle.contains(CastleStatus::kingside(piece.color));
            let queenside_corner =
                square == Square::of(home, 0) && castle.contains(CastleStatus::queenside(piece.color));
            !(kingside_corner || queenside_corner)
        }
        _ => false,
    }
}

/// Parses a FEN string into a board and the color to move.
pub fn parse(fen: impl AsRef<str>) -> Result<(Board, Color), FenParseError> {
    let iter = &mut fen.as_ref().chars().peekable();
    let placement = eat_placement(iter)?;
    eat(iter, ' ')?;
    let side_to_move = eat_side_to_move(iter)?;
    eat(iter, ' ')?;
    let castle = eat_castle_status(iter)?;
    eat(iter, ' ')?;
    let en_passant = eat_en_passant(iter)?;
    eat(iter, ' ')?;
    let halfmove = eat_halfmove(iter)?;
    eat(iter, ' ')?;
    let fullmove = eat_fullmove(iter)?;

    let mut board = Board::empty();
    for (square, piece) in placement {
        let piece = if infer_has_moved(square, piece, castle) {
            piece.moved()
        } else {
            piece
        };

        board
            .add_piece(square, piece)
            .expect("FEN double-add piece?");
    }

    for color in colors() {
        let kings = board
            .pieces(color)
            .into_iter()
            .filter(|&sq| matches!(board.piece_at(sq), Some(piece) if piece.kind == PieceKind::King))
            .count();
        if kings != 1 {
            return Err(FenParseError::KingCount(color));
        }
    }

    if board.is_in_check(side_to_move.toggle()) {
        return Err(FenParseError::OpponentInCheck(side_to_move.toggle()));
    }

    if let Some(target) = en_passant {
        validate_en_passant(&board, side_to_move, target)?;
    }

    board.set_en_passant_target(en_passant);
    board.set_clocks(halfmove, fullmove);
    tracing::trace!(fen = fen.as_ref(), "parsed position");
    Ok((board, side_to_move))
}

/// The target must sit on the square a pawn of the side that just moved skipped over, with that pawn in front of it.
fn validate_en_passant(board: &Board, side_to_move: Color, target: Square) -> Result<(), FenParseError> {
    let pusher = side_to_move.toggle();
    let expected_row = match pusher {
        Color::White => 5,
        Color::Black => 2,
    };

    if target.row() != expected_row {
        return Err(FenParseError::InvalidEnPassant);
    }

    match target.towards(pusher.forward()).and_then(|sq| board.piece_at(sq)) {
        Some(piece) if piece.kind == PieceKind::Pawn && piece.color == pusher => Ok(()),
        _ => Err(FenParseError::InvalidEnPassant),
    }
}

fn is_unmoved(board: &Board, square: Square, color: Color, kind: PieceKind) -> bool {
    matches!(
        board.piece_at(square),
        Some(piece) if piece.color == color && piece.kind == kind && !piece.has_moved()
    )
}

/// The castle rights implied by the board: an unmoved king on its home square with an unmoved rook in the corner.
pub fn castle_status(board: &Board) -> CastleStatus {
    let mut status = CastleStatus::NONE;
    for color in colors() {
        let home = color.home_row();
        if !is_unmoved(board, Square::of(home, 4), color, PieceKind::King) {
            continue;
        }

        if is_unmoved(board, Square::of(home, 7), color, PieceKind::Rook) {
            status |= CastleStatus::kingside(color);
        }

        if is_unmoved(board, Square::of(home, 0), color, PieceKind::Rook) {
            status |= CastleStatus::queenside(color);
        }
    }

    status
}

/// Encodes a board and the color to move as FEN.
pub fn format(board: &Board, side_to_move: Color) -> String {
    let mut buf = String::new();
    for row in 0..8u8 {
        let mut empty_squares = 0;
        for col in 0..8u8 {
            if let Some(piece) = board.piece_at(Square::of(row, col)) {
                if empty_squares != 0 {
                    write!(&mut buf, "{}", empty_squares).unwrap();
                }
                write!(&mut buf, "{}", piece).unwrap();
                empty_squares = 0;
            } else {
                empty_squares += 1;
            }
        }

        if empty_squares != 0 {
            write!(&mut buf, "{}", empty_squares).unwrap();
        }

        if row != 7 {
            buf.push('/');
        }
    }

    buf.push(' ');
    match side_to_move {
        Color::White => buf.push('w'),
        Color::Black => buf.push('b'),
    }

    buf.push(' ');
    let castle = castle_status(board);
    if castle.is_empty() {
        buf.push('-');
    }
    for (flag, c) in [
        (CastleStatus::WHITE_KINGSIDE, 'K'),
        (CastleStatus::WHITE_QUEENSIDE, 'Q'),
        (CastleStatus::BLACK_KINGSIDE, 'k'),
        (CastleStatus::BLACK_QUEENSIDE, 'q'),
    ] {
        if castle.contains(flag) {
            buf.push(c);
        }
    }

    buf.push(' ');
    if let Some(ep_square) = board.en_passant_target() {
        write!(&mut buf, "{}", ep_square).unwrap();
    } else {
        buf.push('-');
    }

    write!(
        &mut buf,
        " {} {}",
        board.half_move_clock(),
        board.full_move_number()
    )
    .unwrap();
    buf
}

#[cfg(test)]
mod tests {
    mod parse {
        use crate::{
            core::*,
            fen::{self, FenParseError},
        };

        #[test]
        fn fen_smoke() {
            let (board, side) = fen::parse("4k3/8/8/8/8/8/8/4K3 w - - 0 0").unwrap();

            // white's turn to move.
            assert_eq!(Color::White, side);

            // no castling.
            assert!(fen::castle_status(&board).is_empty());

            // no en passant.
            assert!(board.en_passant_target().is_none());

            // both clocks are zero.
            assert_eq!(0, board.half_move_clock());
            assert_eq!(0, board.full_move_number());
        }

        #[test]
        fn starting_position() {
            let (board, side) = fen::parse(fen::START_POSITION).unwrap();
            assert_eq!(Color::White, side);

            let check_square = |square: &'static str, kind: PieceKind, color: Color| {
                let square = Square::from_algebraic(square).unwrap();
                let piece = board.piece_at(square).unwrap();
                assert_eq!(kind, piece.kind);
                assert_eq!(color, piece.color);
                assert!(!piece.has_moved());
            };

            check_square("a1", PieceKind::Rook, Color::White);
            check_square("b1", PieceKind::Knight, Color::White);
            check_square("c1", PieceKind::Bishop, Color::White);
            check_square("d1", PieceKind::Queen, Color::White);
            check_square("e1", PieceKind::King, Color::White);
            check_square("h2", PieceKind::Pawn, Color::White);
            check_square("d8", PieceKind::Queen, Color::Black);
            check_square("e8", PieceKind::King, Color::Black);
            check_square("g8", PieceKind::Knight, Color::Black);
            check_square("a7", PieceKind::Pawn, Color::Black);

            let vacant = SquareSet::all().row(2)
                | SquareSet::all().row(3)
                | SquareSet::all().row(4)
                | SquareSet::all().row(5);
            for square in vacant {
                assert!(board.piece_at(square).is_none());
            }

            assert_eq!(CastleStatus::WHITE | CastleStatus::BLACK, fen::castle_status(&board));
        }

        #[test]
        fn moved_pieces_inferred() {
            let (board, _) = fen::parse("r3k2r/8/8/8/4P3/8/P7/R3K1R1 w Kq - 0 1").unwrap();

            // pawns off their starting row have moved.
            assert!(board.piece_at(E4).unwrap().has_moved());
            assert!(!board.piece_at(A2).unwrap().has_moved());

            // White keeps the kingside right, but there is no rook on h1 to go with it.
            assert!(!board.piece_at(E1).unwrap().has_moved());
            assert!(board.piece_at(A1).unwrap().has_moved());
            assert!(board.piece_at(G1).unwrap().has_moved());

            // Black only has the queenside right.
            assert!(!board.piece_at(E8).unwrap().has_moved());
            assert!(!board.piece_at(A8).unwrap().has_moved());
            assert!(board.piece_at(H8).unwrap().has_moved());
        }

        #[test]
        fn king_without_rights_has_moved() {
            let (board, _) = fen::parse("r3k2r/8/8/8/8/8/8/R3K2R w kq - 0 1").unwrap();
            assert!(board.piece_at(E1).unwrap().has_moved());
            assert!(!board.piece_at(E8).unwrap().has_moved());
        }

        #[test]
        fn en_passant_target() {
            let (board, side) = fen::parse("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
            assert_eq!(Color::White, side);
            assert_eq!(Some(D6), board.en_passant_target());
        }

        #[test]
        fn empty() {
            let err = fen::parse("").unwrap_err();
            assert_eq!(FenParseError::UnexpectedEnd, err);
        }

        #[test]
        fn unknown_piece() {
            let err = fen::parse("z7/8/8/8/8/8/8/8 w - - 0 0").unwrap_err();
            assert_eq!(FenParseError::UnknownPiece('z'), err);
        }

        #[test]
        fn invalid_digit() {
            let err = fen::parse("9/8/8/8/8/8/8/8 w - - 0 0").unwrap_err();
            assert_eq!(FenParseError::InvalidDigit, err);
        }

        #[test]
        fn not_sum_to_8() {
            let err = fen::parse("pppp5/8/8/8/8/8/8/8 w - - 0 0").unwrap_err();
            assert_eq!(FenParseError::FileDoesNotSumToEight, err);

            let err = fen::parse("7/8/8/8/8/8/8/8 w - - 0 0").unwrap_err();
            assert_eq!(FenParseError::FileDoesNotSumToEight, err);
        }

        #[test]
        fn wrong_rank_count() {
            let err = fen::parse("8/8/8/8/8/8/8 w - - 0 0").unwrap_err();
            assert_eq!(FenParseError::WrongRankCount, err);

            let err = fen::parse("8/8/8/8/8/8/8/8/8 w - - 0 0").unwrap_err();
            assert_eq!(FenParseError::WrongRankCount, err);
        }

        #[test]
        fn bad_side_to_move() {
            let err = fen::parse("8/8/8/8/8/8/8/8 c - - 0 0").unwrap_err();
            assert_eq!(FenParseError::InvalidSideToMove, err);
        }

        #[test]
        fn bad_castle_status() {
            let err = fen::parse("8/8/8/8/8/8/8/8 w a - 0 0").unwrap_err();
            assert_eq!(FenParseError::InvalidCastle, err);
        }

        #[test]
        fn bad_en_passant() {
            let err = fen::parse("8/8/8/8/8/8/8/8 w - 88 0 0").unwrap_err();
            assert_eq!(FenParseError::InvalidEnPassant, err);
        }

        #[test]
        fn en_passant_without_pawn() {
            let err = fen::parse("4k3/8/8/8/8/8/8/4K3 w - d6 0 1").unwrap_err();
            assert_eq!(FenParseError::InvalidEnPassant, err);
        }

        #[test]
        fn en_passant_wrong_rank() {
            // d3 would be the target of a White double push, but it is White to move.
            let err = fen::parse("4k3/8/8/8/3P4/8/8/4K3 w - d3 0 1").unwrap_err();
            assert_eq!(FenParseError::InvalidEnPassant, err);
        }

        #[test]
        fn empty_halfmove() {
            let err = fen::parse("8/8/8/8/8/8/8/8 w - - q 0").unwrap_err();
            assert_eq!(FenParseError::EmptyHalfmove, err);
        }

        #[test]
        fn invalid_halfmove() {
            let err = fen::parse("8/8/8/8/8/8/8/8 w - - 4294967296 0").unwrap_err();
            assert_eq!(FenParseError::InvalidHalfmove, err);
        }

        #[test]
        fn empty_fullmove() {
            let err = fen::parse("8/8/8/8/8/8/8/8 w - - 0 q").unwrap_err();
            assert_eq!(FenParseError::EmptyFullmove, err);
        }

        #[test]
        fn fullmove_early_end() {
            let err = fen::parse("8/8/8/8/8/8/8/8 w - - 0").unwrap_err();
            assert_eq!(FenParseError::UnexpectedEnd, err);
        }

        #[test]
        fn invalid_fullmove() {
            let err = fen::parse("8/8/8/8/8/8/8/8 w - - 0 4294967296").unwrap_err();
            assert_eq!(FenParseError::InvalidFullmove, err);
        }

        #[test]
        fn missing_king() {
            let err = fen::parse("8/8/8/8/8/8/8/4K3 w - - 0 1").unwrap_err();
            assert_eq!(FenParseError::KingCount(Color::Black), err);
        }

        #[test]
        fn too_many_kings() {
            let err = fen::parse("4k3/8/8/8/8/8/8/3KK3 w - - 0 1").unwrap_err();
            assert_eq!(FenParseError::KingCount(Color::White), err);
        }

        #[test]
        fn side_not_to_move_in_check() {
            let err = fen::parse("4k3/8/8/8/8/8/8/4K2r b - - 0 1").unwrap_err();
            assert_eq!(FenParseError::OpponentInCheck(Color::White), err);

            assert!(fen::parse("4k3/8/8/8/8/8/8/4K2r w - - 0 1").is_ok());
        }
    }

    mod format {
        use crate::{core::*, fen, Board};

        #[test]
        fn start_position_roundtrip() {
            let (board, side) = fen::parse(fen::START_POSITION).unwrap();
            assert_eq!(fen::START_POSITION, fen::format(&board, side));
            assert_eq!(fen::START_POSITION, fen::format(&Board::new(), Color::White));
        }

        #[test]
        fn roundtrip_positions() {
            for text in [
                "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
                "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
                "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1",
                "r3k3/8/8/8/8/8/8/4K2R b Kq - 12 40",
            ] {
                let (board, side) = fen::parse(text).unwrap();
                assert_eq!(text, fen::format(&board, side));
            }
        }

        #[test]
        fn rights_follow_moves() {
            let mut board = Board::new();
            assert!(board.make_move(Move::quiet(E2, E4)));
            assert_eq!(
                "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
                fen::format(&board, Color::Black)
            );

            assert!(board.make_move(Move::quiet(G8, F6)));
            assert!(board.make_move(Move::quiet(E1, E2)));
            assert_eq!(
                "rnbqkb1r/pppppppp/5n2/8/4P3/8/PPPPKPPP/RNBQ1BNR b kq - 2 2",
                fen::format(&board, Color::Black)
            );
        }
    }
}
