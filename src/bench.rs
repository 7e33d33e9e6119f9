//! Benchmark mode.
//!
//! Solves a batch of generated boards in parallel and reports timing
//! and move statistics, plus the boards that took the most and the
//! least time.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use pbr::ProgressBar;
use rayon::prelude::*;
use term_painter::{Color, ToStyle};

use crate::board::Board;
use crate::gen_board;
use crate::solver::solve_board;

pub fn run(init_algo: &str, size: u8, count: usize) -> Result<(), ()> {
    println!("Benchmarking {} boards of size {}", count, size);
    if count == 0 {
        return Ok(());
    }

    let mut boards = Vec::with_capacity(count);
    for i in 0..count {
        boards.push(gen_board(init_algo, size, i as u64)?);
    }

    let progress = Mutex::new(ProgressBar::new(count as u64));
    let results: Vec<Result<(Duration, usize), ()>> = boards
        .par_iter()
        .map(|board| {
            let start = Instant::now();
            let res = solve_board(board);
            let elapsed = start.elapsed();
            progress.lock().unwrap().inc();
            match res {
                Ok(solution) => Ok((elapsed, solution.len() - 1)),
                Err(err) => {
                    println!("{}: {}", Color::BrightRed.paint("Error"), err);
                    Err(())
                }
            }
        })
        .collect();
    progress.lock().unwrap().finish_print("");

    let mut elapsed_total = Duration::new(0, 0);
    let mut num_moves = 0;
    let mut slowest: Option<(Duration, usize, &Board)> = None;
    let mut fastest: Option<(Duration, usize, &Board)> = None;

    for (board, result) in boards.iter().zip(&results) {
        let &(time, moves) = match result {
            Ok(r) => r,
            Err(()) => return Err(()),
        };
        elapsed_total += time;
        num_moves += moves;
        if slowest.map_or(true, |(t, ..)| time > t) {
            slowest = Some((time, moves, board));
        }
        if fastest.map_or(true, |(t, ..)| time < t) {
            fastest = Some((time, moves, board));
        }
    }

    println!(
        "\n{}",
        Color::BrightWhite.bold().paint("----- Benchmark done ------------")
    );
    println!(
        "+++ Time elapsed: {} (avg: {})",
        Color::BrightYellow.paint(format_duration(elapsed_total)),
        Color::BrightBlue.paint(format_duration(elapsed_total / count as u32)),
    );
    println!(
        "+++ Number of moves: {} ({} on average)",
        Color::BrightYellow.paint(num_moves),
        Color::BrightBlue.paint(num_moves as f64 / count as f64),
    );

    if let Some((time, moves, board)) = slowest {
        println!(
            "Board that took the most time ({}, solved with {} moves):\n{}",
            Color::BrightBlue.paint(format_duration(time)),
            Color::BrightBlue.paint(moves),
            board,
        );
    }
    if let Some((time, moves, board)) = fastest {
        println!(
            "Board that took the least time ({}, solved with {} moves):\n{}",
            Color::BrightBlue.paint(format_duration(time)),
            Color::BrightBlue.paint(moves),
            board,
        );
    }

    Ok(())
}

fn format_duration(dur: Duration) -> String {
    let mins = dur.as_secs() / 60;
    let secs = dur.as_secs_f64() - (mins * 60) as f64;
    format!("{}m{:.3}s", mins, secs)
}
