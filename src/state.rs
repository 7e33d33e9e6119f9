//! Search states.
//!
//! A state is one node of the game tree: the set of graph nodes the
//! flooded region owns, the moves that got it there and the cached
//! valuation the frontier is ordered by. States are cloned for every
//! candidate move; the history handle keeps that cheap.

use std::mem;

use bit_set::BitSet;
use smallvec::SmallVec;

use crate::color::Color;
use crate::graph::Graph;
use crate::history::{History, Moves};

#[derive(Clone)]
pub struct State {
    filled: BitSet,
    moves: Moves,
    valuation: u32,
}

impl State {
    /// The state before any move: only the root is filled and the
    /// history holds the root's color as its first element.
    pub fn initial(graph: &Graph, history: &mut History) -> State {
        debug_assert!(graph.is_reduced(), "search needs a reduced graph");
        let mut filled = BitSet::with_capacity(graph.len());
        filled.insert(graph.root());
        let mut state = State {
            filled,
            moves: Moves::empty().push(history, graph.color(graph.root())),
            valuation: 0,
        };
        state.valuation = state.compute_valuation(graph);
        state
    }

    pub fn moves(&self) -> Moves {
        self.moves
    }

    /// Length of the move history (including the initial color).
    pub fn depth(&self) -> usize {
        self.moves.len()
    }

    pub fn last_color(&self) -> Color {
        self.moves.last()
    }

    /// Cached `depth + h`; the A* priority.
    pub fn valuation(&self) -> u32 {
        self.valuation
    }

    pub fn done(&self, graph: &Graph) -> bool {
        self.filled.len() == graph.len()
    }

    pub fn is_filled(&self, node: usize) -> bool {
        self.filled.contains(node)
    }

    /// Plays `next`: absorbs every unfilled node of that color that
    /// touches the region. Returns false when the move is redundant
    /// and the caller should drop this clone:
    ///
    /// - it absorbs nothing, or
    /// - `next < last` and every absorbed node was already reachable
    ///   before the previous move. Swapping the two moves reaches at
    ///   least as much, so only the ascending order of the commuting
    ///   pair survives.
    pub fn apply(&mut self, graph: &Graph, history: &mut History, next: Color) -> bool {
        let last = self.moves.last();
        debug_assert_ne!(next, last, "repeated the current color");
        self.moves = self.moves.push(history, next);

        let mut absorbed: SmallVec<[u32; 16]> = SmallVec::new();
        for v in 0..graph.len() {
            if graph.color(v) == next
                && !self.filled.contains(v)
                && graph
                    .neighbors(v)
                    .iter()
                    .any(|&u| self.filled.contains(u as usize))
            {
                absorbed.push(v as u32);
            }
        }

        let useful = if next > last {
            !absorbed.is_empty()
        } else {
            absorbed.iter().any(|&v| {
                graph.neighbors(v as usize).iter().all(|&u| {
                    !self.filled.contains(u as usize) || graph.color(u as usize) == last
                })
            })
        };

        if useful {
            for &v in &absorbed {
                self.filled.insert(v as usize);
            }
            self.valuation = self.compute_valuation(graph);
        }
        useful
    }

    /// Lower bound on the final sequence length: moves made plus a
    /// layered traversal outward from the region. A layer whose
    /// expansion exhausted some colors charges one move per exhausted
    /// color and advances only their nodes; any other layer charges a
    /// single color-blind move and advances everything. Revealing the
    /// region itself is free, so finished states come out at exactly
    /// their depth.
    fn compute_valuation(&self, graph: &Graph) -> u32 {
        let mut visited = self.filled.clone();
        let mut remaining: Vec<u32> = graph.color_counts().to_vec();
        let mut current: Vec<u32> = Vec::new();
        for v in self.filled.iter() {
            remaining[graph.color(v).tag as usize] -= 1;
            current.push(v as u32);
        }

        let mut next = Vec::new();
        let mut exposed = 0u32;
        for &v in &current {
            expand(graph, v, &mut visited, &mut next, &mut remaining, &mut exposed);
        }
        mem::swap(&mut current, &mut next);
        next.clear();

        let mut h = 0u32;
        let mut snapshot = Vec::new();
        while !current.is_empty() {
            if exposed > 0 {
                h += exposed;
                exposed = 0;
                snapshot.clear();
                snapshot.extend_from_slice(&remaining);
                for &v in &current {
                    if snapshot[graph.color(v as usize).tag as usize] == 0 {
                        expand(graph, v, &mut visited, &mut next, &mut remaining, &mut exposed);
                    } else {
                        next.push(v);
                    }
                }
            } else {
                h += 1;
                for &v in &current {
                    expand(graph, v, &mut visited, &mut next, &mut remaining, &mut exposed);
                }
            }
            mem::swap(&mut current, &mut next);
            next.clear();
        }

        self.moves.len() as u32 + h
    }
}

/// Visits every unseen neighbor of `v`, queueing it for the next layer
/// and bumping `exposed` whenever a color runs out of unseen nodes.
fn expand(
    graph: &Graph,
    v: u32,
    visited: &mut BitSet,
    next: &mut Vec<u32>,
    remaining: &mut [u32],
    exposed: &mut u32,
) {
    for &u in graph.neighbors(v as usize) {
        if !visited.contains(u as usize) {
            visited.insert(u as usize);
            next.push(u);
            let count = &mut remaining[graph.color(u as usize).tag as usize];
            *count -= 1;
            if *count == 0 {
                *exposed += 1;
            }
        }
    }
}
