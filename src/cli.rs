// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A line-oriented text front end for playing a game, one command per line.
//!
//! Moves are entered as two squares and an optional promotion letter (`e2 e4`, `e7 e8 q`) or in compact coordinate
//! form (`e2e4`, `e7e8q`). Type `help` for the other commands.

use std::io::{self, BufRead, Write};

use crate::{core::*, Game};

const HELP: &str = "\
commands:
  <from> <to> [promo]   make a move, e.g. `e2 e4` or `e7 e8 q`
  <from><to>[promo]     make a move, e.g. `e2e4` or `e7e8q`
  moves [square]        list legal moves, for one square or the side to move
  board                 print the board
  fen                   print the position as FEN
  history               print the moves played so far
  new                   start a new game
  load <FEN>            start from the given position
  help                  print this message
  quit                  leave";

/// Reads commands from `input` until it runs dry or a `quit` arrives, writing responses to `output`.
pub fn run(
    input: impl BufRead,
    mut output: impl Write,
    game: &mut Game,
    show_board: bool,
) -> io::Result<()> {
    print_position(&mut output, game, show_board)?;
    for maybe_line in input.lines() {
        let line = maybe_line?;
        let components: Vec<_> = line.split_whitespace().collect();
        let (&command, arguments) = components.split_first().unwrap_or((&"", &[]));
        match (command, arguments) {
            ("", []) => {}
            ("quit", []) | ("exit", []) => break,
            ("help", []) => writeln!(output, "{}", HELP)?,
            ("board", []) => write!(output, "{}", game.board())?,
            ("fen", []) => writeln!(output, "{}", game.as_fen())?,
            ("history", []) => handle_history(&mut output, game)?,
            ("moves", []) => print_moves(&mut output, &game.legal_moves())?,
            ("moves", [square]) => match Square::from_algebraic(square) {
                Ok(square) => print_moves(&mut output, &game.legal_moves_from(square))?,
                Err(err) => writeln!(output, "invalid square: {}", err)?,
            },
            ("new", []) => {
                *game = Game::new();
                print_position(&mut output, game, show_board)?;
            }
            ("load", fen) if !fen.is_empty() => match Game::from_fen(&fen.join(" ")) {
                Ok(loaded) => {
                    *game = loaded;
                    print_position(&mut output, game, show_board)?;
                }
                Err(err) => writeln!(output, "invalid position: {}", err)?,
            },
            (from, [to]) => handle_move(&mut output, game, show_board, &line, from, to, None)?,
            (from, [to, promotion]) => {
                handle_move(&mut output, game, show_board, &line, from, to, Some(*promotion))?
            }
            (compact, []) if is_compact_move(compact) => {
                let (from, rest) = compact.split_at(2);
                let (to, promotion) = rest.split_at(2);
                let promotion = if promotion.is_empty() {
                    None
                } else {
                    Some(promotion)
                };

                handle_move(&mut output, game, show_board, &line, from, to, promotion)?
            }
            _ => writeln!(output, "unrecognized command: {} (try `help`)", line.trim())?,
        }
    }

    Ok(())
}

fn is_compact_move(text: &str) -> bool {
    text.is_ascii() && (text.len() == 4 || text.len() == 5)
}

fn handle_move(
    output: &mut impl Write,
    game: &mut Game,
    show_board: bool,
    line: &str,
    from: &str,
    to: &str,
    promotion: Option<&str>,
) -> io::Result<()> {
    if game.make_move_from_algebraic(from, to, promotion) {
        print_position(output, game, show_board)
    } else if game.is_over() {
        writeln!(output, "illegal move: {} (the game is over)", line.trim())
    } else {
        writeln!(output, "illegal move: {}", line.trim())
    }
}

fn handle_history(output: &mut impl Write, game: &Game) -> io::Result<()> {
    let history = game.move_history();
    if history.is_empty() {
        return writeln!(output, "no moves yet");
    }

    let moves: Vec<_> = history.iter().map(|mov| mov.as_uci()).collect();
    writeln!(output, "{}", moves.join(" "))
}

fn print_moves(output: &mut impl Write, moves: &[Move]) -> io::Result<()> {
    if moves.is_empty() {
        return writeln!(output, "no legal moves");
    }

    let moves: Vec<_> = moves.iter().map(|mov| mov.as_uci()).collect();
    writeln!(output, "{}", moves.join(" "))
}

fn print_position(output: &mut impl Write, game: &Game, show_board: bool) -> io::Result<()> {
    if show_board {
        write!(output, "{}", game.board())?;
    }

    writeln!(output, "{}", game.status_text())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::run;
    use crate::{Game, GameState};

    fn session(game: &mut Game, input: &str, show_board: bool) -> String {
        let mut output = Vec::new();
        run(Cursor::new(input), &mut output, game, show_board).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn plays_moves() {
        let mut game = Game::new();
        let output = session(&mut game, "e2 e4\ne7e5\nfen\nhistory\n", false);
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(
            vec![
                "White's turn.",
                "Black's turn.",
                "White's turn.",
                "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2",
                "e2e4 e7e5",
            ],
            lines
        );
    }

    #[test]
    fn rejects_illegal_moves() {
        let mut game = Game::new();
        let output = session(&mut game, "e2 e5\ne7 e5\ne2e9\n", false);
        assert!(output.contains("illegal move: e2 e5"));
        assert!(output.contains("illegal move: e7 e5"));
        assert!(output.contains("illegal move: e2e9"));
        assert!(game.move_history().is_empty());
    }

    #[test]
    fn compact_promotion() {
        let mut game = Game::from_fen("k7/4P3/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let output = session(&mut game, "e7e8n\n", false);
        assert!(output.ends_with("Black's turn.\n"));
        assert_eq!("k3N3/8/8/8/8/8/8/4K3 b - - 0 1", game.as_fen());
    }

    #[test]
    fn lists_moves() {
        let mut game = Game::new();
        let output = session(&mut game, "moves g1\nmoves e4\nmoves z9\n", false);
        let lines: Vec<_> = output.lines().collect();
        assert_eq!("g1f3 g1h3", lines[1]);
        assert_eq!("no legal moves", lines[2]);
        assert!(lines[3].starts_with("invalid square"));
    }

    #[test]
    fn load_and_quit() {
        let mut game = Game::new();
        let output = session(
            &mut game,
            "load rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3\nquit\ne2e4\n",
            false,
        );
        assert!(output.ends_with("Checkmate! Black wins!\n"));
        assert_eq!(GameState::Checkmate, game.state());

        let output = session(&mut game, "load 8/8 w\n", false);
        assert!(output.contains("invalid position"));
    }

    #[test]
    fn shows_board() {
        let mut game = Game::new();
        let output = session(&mut game, "new\n", true);
        assert!(output.starts_with("   a  b  c  d  e  f  g  h\n"));
        assert!(output.contains("1 |WR|WN|WB|WQ|WK|WB|WN|WR| 1"));
        assert!(output.ends_with("White's turn.\n"));
    }

    #[test]
    fn unrecognized() {
        let mut game = Game::new();
        let output = session(&mut game, "what is this move\n", false);
        assert!(output.contains("unrecognized command: what is this move"));
    }
}
