// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::io;

use checkmate::{cli, Game};
use structopt::StructOpt;

/// Play a game of chess in the terminal. Type `help` for the list of commands.
#[derive(Debug, StructOpt)]
struct Options {
    /// FEN of the position to start from, instead of the standard starting position.
    #[structopt(long)]
    fen: Option<String>,

    /// Don't print the board after every move.
    #[structopt(long)]
    no_board: bool,
}

fn main() -> anyhow::Result<()> {
    checkmate::log::init()?;
    let ops = Options::from_args();
    let mut game = match ops.fen {
        Some(ref fen) => Game::from_fen(fen)?,
        None => Game::new(),
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    cli::run(stdin.lock(), stdout.lock(), &mut game, !ops.no_board)?;
    Ok(())
}
