mod bench;
mod board;
mod color;
mod graph;
mod history;
mod solver;
mod state;
mod util;

use docopt::Docopt;
use rayon::prelude::*;
use serde::Deserialize;
use term_painter::{Color as Term, ToStyle};

use crate::board::Board;
use crate::solver::solve_board;

// USAGE-string used by docopt
const USAGE: &str = "
Deluge: an exact (provably move-optimal) solver for flood-it puzzles.

Usage:
  deluge [options] [<puzzle>...]
  deluge (-h | --help)
  deluge --version

Arguments:
  puzzle                Puzzle files to solve, one board per file: one
                        row per line, one character per cell. Several
                        files are solved in parallel.

Options:
  -h --help             Show this screen.
  --version             Show version.
  --size=<size>         Side length of generated boards [default: 10].
  --board=<initial>     Initial board algorithm: 'random' or
                        'seed-<id>' [default: random].
  --bench=<count>       Solve <count> generated boards and report
                        timings. Use a deterministic initial board
                        algorithm, like 'seed-0', to make runs
                        comparable.
";

#[derive(Debug, Deserialize)]
struct Args {
    arg_puzzle: Vec<String>,
    flag_version: bool,
    flag_size: u8,
    flag_board: String,
    flag_bench: Option<usize>,
}

fn main() {
    env_logger::init();

    // read and parse CLI-args, exit if any error occured
    let args: Args = Docopt::new(USAGE)
        .and_then(|d| d.deserialize())
        .unwrap_or_else(|e| e.exit());

    if args.flag_version {
        println!("deluge {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    let res = if !args.arg_puzzle.is_empty() {
        solve_files(&args.arg_puzzle)
    } else if let Some(count) = args.flag_bench {
        bench::run(&args.flag_board, args.flag_size, count)
    } else {
        play_standard_mode(&args.flag_board, args.flag_size)
    };

    if res.is_err() {
        std::process::exit(1);
    }
}

/// Builds the initial board from the algorithm name: 'random', 'seed'
/// (which uses `default_seed`) or 'seed-<id>'.
fn gen_board(init_algo: &str, size: u8, default_seed: u64) -> Result<Board, ()> {
    if init_algo == "random" {
        return Ok(Board::random(size, size));
    }
    if init_algo == "seed" {
        return Ok(Board::seeded(size, size, default_seed));
    }
    if let Some(id) = init_algo.strip_prefix("seed-") {
        if let Ok(id) = id.parse() {
            return Ok(Board::seeded(size, size, id));
        }
    }
    println!("Initial board algorithm '{}' doesn't exist!", init_algo);
    Err(())
}

fn play_standard_mode(init_algo: &str, size: u8) -> Result<(), ()> {
    println!("~~~~~~ Playing a standard game ~~~~~~");

    let mut board = gen_board(init_algo, size, 0)?;
    println!("{}", board);

    let solution = match solve_board(&board) {
        Ok(solution) => solution,
        Err(err) => {
            println!("{}: {}", Term::BrightRed.paint("Error"), err);
            return Err(());
        }
    };

    // the first element is the root's initial color, not a move
    for &color in &solution[1..] {
        println!("Flooding with {} {}", board.label(color), color);
        board.flood(color);
        println!("{}", board);
    }

    println!(
        "Solved in {} moves.",
        Term::BrightYellow.paint(solution.len() - 1)
    );
    Ok(())
}

fn solve_files(paths: &[String]) -> Result<(), ()> {
    let mut boards = Vec::with_capacity(paths.len());
    for path in paths {
        match Board::load(path) {
            Ok(board) => boards.push(board),
            Err(err) => {
                println!("{}: {}: {}", Term::BrightRed.paint("Error"), path, err);
                return Err(());
            }
        }
    }

    let results: Vec<_> = boards.par_iter().map(solve_board).collect();

    let mut failed = false;
    for (path, (board, result)) in paths.iter().zip(boards.iter().zip(results)) {
        match result {
            Ok(solution) if solution.len() == 1 => {
                println!("{}: already flooded", path);
            }
            Ok(solution) => {
                let moves: Vec<String> = solution[1..]
                    .iter()
                    .map(|&c| board.label(c).to_string())
                    .collect();
                println!(
                    "{}: {} ({} moves)",
                    path,
                    moves.join(" "),
                    solution.len() - 1
                );
            }
            Err(err) => {
                println!("{}: {}: {}", Term::BrightRed.paint("Error"), path, err);
                failed = true;
            }
        }
    }
    if failed {
        Err(())
    } else {
        Ok(())
    }
}
