// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use checkmate::{
    core::{Color, Move},
    Game, GameState,
};
use serde::Serialize;
use structopt::StructOpt;

/// List the legal moves of the side to move.
#[derive(Debug, StructOpt)]
struct Options {
    /// FEN representation of the position to analyze.
    #[structopt(name = "FEN")]
    fen: String,

    /// Print a JSON object describing the position instead of one move per line.
    #[structopt(long)]
    json: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    fen: &'a str,
    side_to_move: Color,
    state: GameState,
    moves: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    checkmate::log::init()?;
    let ops = Options::from_args();
    let game = Game::from_fen(&ops.fen)?;
    let moves: Vec<Move> = game.legal_moves();
    if ops.json {
        let report = Report {
            fen: &ops.fen,
            side_to_move: game.current_player(),
            state: game.state(),
            moves: moves.iter().map(|mov| mov.as_uci()).collect(),
        };

        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for mov in moves {
            println!("{}", mov.as_uci());
        }
    }

    Ok(())
}
