// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::time::Instant;

use checkmate::{fen, perft};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
struct Options {
    /// The depth to search to.
    #[structopt(short, long)]
    depth: u32,

    /// FEN representation of the position to analyze.
    #[structopt(name = "FEN")]
    fen: String,

    /// If set, print the node count under each first move as well as the total.
    #[structopt(long)]
    divide: bool,
}

fn main() -> anyhow::Result<()> {
    checkmate::log::init()?;
    let ops = Options::from_args();
    let (board, side) = fen::parse(&ops.fen)?;
    let start = Instant::now();
    let count = if ops.divide {
        let split = perft::divide(&board, side, ops.depth);
        for (mov, nodes) in &split {
            println!("{}: {}", mov.as_uci(), nodes);
        }

        split.iter().map(|&(_, nodes)| nodes).sum()
    } else {
        perft::perft(&board, side, ops.depth)
    };

    println!("{}", count);
    tracing::info!(elapsed_ms = start.elapsed().as_millis() as u64, "perft finished");
    Ok(())
}
