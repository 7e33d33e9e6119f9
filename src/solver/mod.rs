//! The exact solver and its public error type.

use thiserror::Error;

use crate::color::Color;
use crate::graph::GraphError;

mod exact;

pub use self::exact::{best_sequence, solve_board};

/// A full answer: the root's initial color followed by the chosen
/// moves, so `len() - 1` is the number of moves.
pub type Solution = Vec<Color>;

#[derive(Debug, Error)]
pub enum SolveError {
    /// The frontier ran dry: some node can never be reached from the
    /// root.
    #[error("graph is not connected")]
    Disconnected,
    #[error(transparent)]
    Graph(#[from] GraphError),
}
