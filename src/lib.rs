// Copyright 2017-2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! `checkmate`, a chess rules engine.
//!
//! `checkmate` knows the rules of chess and nothing about playing it well. It represents positions, generates and
//! validates moves (castling, en passant and promotion included), executes them, and tells checkmate, stalemate and
//! the fifty-move draw apart. Choosing moves is the caller's business; the [`Game`] type is the entry point for
//! driving a game one move at a time.

pub mod board;
pub mod cli;
pub mod core;
pub mod fen;
pub mod game;
pub mod log;
pub mod movegen;
pub mod perft;

pub use board::Board;
pub use game::{Game, GameState};
