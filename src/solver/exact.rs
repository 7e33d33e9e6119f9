//! Exact solver.
//!
//! Always finds a solution with as few moves as possible: A* over
//! flood states of the reduced region graph. The valuation is an
//! admissible and consistent lower bound, so the first finished state
//! popped off the frontier is optimal; the redundancy pruning in
//! `State::apply` only ever drops moves another ordering covers.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::debug;

use super::{Solution, SolveError};
use crate::board::Board;
use crate::color::Color;
use crate::graph::Graph;
use crate::history::History;
use crate::state::State;

/// Frontier entry. `BinaryHeap` is a max-heap, so "greater" means
/// lower valuation, and on equal valuation the deeper state wins --
/// it is closer to a goal.
struct Open(State);

impl PartialEq for Open {
    fn eq(&self, other: &Open) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Open {}

impl PartialOrd for Open {
    fn partial_cmp(&self, other: &Open) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Open {
    fn cmp(&self, other: &Open) -> Ordering {
        other
            .0
            .valuation()
            .cmp(&self.0.valuation())
            .then_with(|| self.0.depth().cmp(&other.0.depth()))
    }
}

/// Searches a reduced graph for a shortest flooding sequence. The
/// first element of the result is the root's color before any move.
pub fn best_sequence(graph: &Graph) -> Result<Solution, SolveError> {
    let mut history = History::new();
    let mut frontier = BinaryHeap::new();
    frontier.push(Open(State::initial(graph, &mut history)));

    let mut expanded = 0u64;
    while let Some(Open(state)) = frontier.pop() {
        if state.done(graph) {
            debug!(
                "found a {}-move solution after expanding {} states ({} left queued)",
                state.depth() - 1,
                expanded,
                frontier.len()
            );
            return Ok(state.moves().to_vec(&history));
        }

        expanded += 1;
        for tag in 0..graph.num_colors() {
            let color = Color::new(tag as u8);
            if color == state.last_color() {
                continue;
            }
            let mut successor = state.clone();
            if successor.apply(graph, &mut history, color) {
                frontier.push(Open(successor));
            }
        }
    }
    Err(SolveError::Disconnected)
}

/// Board-level facade: build the raw cell graph, reduce it, search,
/// and translate the dense solver colors back into the board's own.
pub fn solve_board(board: &Board) -> Result<Solution, SolveError> {
    let (mut graph, palette) = board.to_graph();
    graph.reduce()?;
    let solution = best_sequence(&graph)?;
    Ok(solution
        .into_iter()
        .map(|c| palette[c.tag as usize])
        .collect())
}
