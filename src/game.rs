// Copyright 2017-2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A game of chess: a board, whose turn it is, and how the game stands.

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::{
    core::*,
    fen::{self, FenParseError},
    movegen, Board,
};

/// The state of a game, derived from the board after every move.
///
/// Checkmate, stalemate and draw are terminal: once a game reaches one of them, no further moves are accepted.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum GameState {
    #[display(fmt = "ongoing")]
    Ongoing,
    #[display(fmt = "check")]
    Check,
    #[display(fmt = "checkmate")]
    Checkmate,
    #[display(fmt = "stalemate")]
    Stalemate,
    #[display(fmt = "draw")]
    Draw,
}

impl GameState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            GameState::Checkmate | GameState::Stalemate | GameState::Draw
        )
    }
}

/// Number of plies without a pawn move or capture after which the game is drawn.
const DRAW_HALF_MOVES: u16 = 100;

#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    current_player: Color,
    state: GameState,
}

impl Game {
    /// A new game from the standard starting position, White to move.
    pub fn new() -> Game {
        Game {
            board: Board::new(),
            current_player: Color::White,
            state: GameState::Ongoing,
        }
    }

    /// A game picking up from the given position. Its state is derived from the position right away, so a game
    /// loaded from a mated position is already over.
    pub fn from_fen(text: &str) -> Result<Game, FenParseError> {
        let (board, current_player) = fen::parse(text)?;
        let mut game = Game {
            board,
            current_player,
            state: GameState::Ongoing,
        };

        game.state = game.derive_state();
        Ok(game)
    }

    pub fn as_fen(&self) -> String {
        fen::format(&self.board, self.current_player)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.board.piece_at(square)
    }

    pub fn current_player(&self) -> Color {
        self.current_player
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_over(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn move_history(&self) -> &[Move] {
        self.board.move_history()
    }

    /// All legal moves for the side to move. Empty once the game is over.
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.is_over() {
            return Vec::new();
        }

        self.board.legal_moves(self.current_player)
    }

    /// Legal moves of the piece on `square`, if that piece belongs to the side to move.
    pub fn legal_moves_from(&self, square: Square) -> Vec<Move> {
        match self.board.piece_at(square) {
            Some(piece) if piece.color == self.current_player && !self.is_over() => {
                self.board.legal_moves_from(square)
            }
            _ => Vec::new(),
        }
    }

    /// Makes a move for the side to move, returning whether it was accepted.
    ///
    /// The move is rejected if the game is over, if the piece on its source square belongs to the other side, or if
    /// the board finds it illegal.
    pub fn make_move(&mut self, mov: Move) -> bool {
        if self.is_over() {
            tracing::debug!(mov = %mov, state = %self.state, "rejected: game is over");
            return false;
        }

        match self.board.piece_at(mov.source()) {
            Some(piece) if piece.color != self.current_player => {
                tracing::debug!(mov = %mov, "rejected: not {}'s piece", self.current_player);
                return false;
            }
            _ => {}
        }

        if !self.board.make_move(mov) {
            return false;
        }

        self.current_player = self.current_player.toggle();
        let state = self.derive_state();
        if state != self.state {
            tracing::info!(from = %self.state, to = %state, "game state changed");
        }

        self.state = state;
        true
    }

    /// Makes a move given as two squares in algebraic notation and an optional promotion letter (`Q`, `R`, `B` or
    /// `N`, either case).
    ///
    /// Castles and en-passant captures need no marking: `e1 g1` castles if castling is available there, and a pawn
    /// capturing onto the en-passant target captures en passant. Malformed squares and unknown promotion letters are
    /// rejected like any illegal move.
    pub fn make_move_from_algebraic(
        &mut self,
        from: &str,
        to: &str,
        promotion: Option<&str>,
    ) -> bool {
        let (source, destination) = match (Square::from_algebraic(from), Square::from_algebraic(to)) {
            (Ok(source), Ok(destination)) => (source, destination),
            (Err(err), _) | (_, Err(err)) => {
                tracing::debug!("rejected: {}", err);
                return false;
            }
        };

        let promotion = match promotion.map(str::trim) {
            None | Some("") => None,
            Some(letter) => match parse_promotion(letter) {
                Some(kind) => Some(kind),
                None => {
                    tracing::debug!("rejected: unknown promotion piece {:?}", letter);
                    return false;
                }
            },
        };

        let mov = movegen::candidate_moves(&self.board, source)
            .into_iter()
            .find(|mov| mov.destination() == destination && mov.promotion_piece() == promotion)
            .unwrap_or_else(|| Move::new(source, destination, promotion, false, false));
        self.make_move(mov)
    }

    /// A one-line summary of the game for display, e.g. "White's turn." or "Checkmate! Black wins!".
    pub fn status_text(&self) -> String {
        match self.state {
            GameState::Checkmate => format!("Checkmate! {} wins!", self.current_player.toggle()),
            GameState::Stalemate => "Stalemate! The game is a draw.".to_owned(),
            GameState::Draw => "Draw by the fifty-move rule.".to_owned(),
            GameState::Check => format!("{} is in check!", self.current_player),
            GameState::Ongoing => format!("{}'s turn.", self.current_player),
        }
    }

    /// Game state as seen by the side to move. Mate and stalemate outrank the move-count draw, which outranks check.
    fn derive_state(&self) -> GameState {
        let player = self.current_player;
        let in_check = self.board.is_in_check(player);
        let no_moves = self.board.legal_moves(player).is_empty();
        if no_moves && in_check {
            GameState::Checkmate
        } else if no_moves {
            GameState::Stalemate
        } else if self.board.half_move_clock() >= DRAW_HALF_MOVES {
            GameState::Draw
        } else if in_check {
            GameState::Check
        } else {
            GameState::Ongoing
        }
    }
}

fn parse_promotion(letter: &str) -> Option<PieceKind> {
    let mut chars = letter.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => PieceKind::from_promotion_char(c),
        _ => None,
    }
}

impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}
