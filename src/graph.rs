//! The colored region graph the solver runs on.
//!
//! A board turns into one node per cell; `reduce` then collapses every
//! same-color island into a single node, which is the representation
//! the search wants: flooding a color merges the root region with all
//! adjacent nodes of that color.

use std::mem;

use log::debug;
use thiserror::Error;

use crate::color::Color;
use crate::util::UnionFind;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    /// Reduction would remove the last node of a color. Well-formed
    /// input (gap-free color indices) can never trigger this.
    #[error("reduction would remove color {0} entirely")]
    ColorVanished(u8),
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Node {
    color: Color,
    neighbors: Vec<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Graph {
    nodes: Vec<Node>,
    root: u32,
    color_counts: Vec<u32>,
}

impl Graph {
    /// `n` nodes, all of color 0, no edges, root at node 0.
    pub fn new(n: usize) -> Graph {
        Graph {
            nodes: vec![
                Node {
                    color: Color::new(0),
                    neighbors: Vec::new(),
                };
                n
            ],
            root: 0,
            color_counts: vec![n as u32],
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> usize {
        self.root as usize
    }

    pub fn color(&self, i: usize) -> Color {
        self.nodes[i].color
    }

    /// Sorted, duplicate-free, never contains `i` itself.
    pub fn neighbors(&self, i: usize) -> &[u32] {
        &self.nodes[i].neighbors
    }

    /// Entry `c` is the number of nodes of color `c`. The length is
    /// one more than the largest color ever assigned.
    pub fn color_counts(&self) -> &[u32] {
        &self.color_counts
    }

    pub fn num_colors(&self) -> usize {
        self.color_counts.len()
    }

    pub fn set_root(&mut self, i: usize) {
        debug_assert!(i < self.nodes.len());
        self.root = i as u32;
    }

    pub fn set_color(&mut self, i: usize, color: Color) {
        let old = self.nodes[i].color;
        if color.tag as usize >= self.color_counts.len() {
            self.color_counts.resize(color.tag as usize + 1, 0);
        }
        self.color_counts[old.tag as usize] -= 1;
        self.color_counts[color.tag as usize] += 1;
        self.nodes[i].color = color;
    }

    /// Inserts the undirected edge `(a, b)`. Duplicates are ignored
    /// and both neighbor lists stay sorted.
    pub fn add_edge(&mut self, a: usize, b: usize) {
        debug_assert_ne!(a, b, "self loop");
        self.insert_arc(a, b as u32);
        self.insert_arc(b, a as u32);
    }

    fn insert_arc(&mut self, from: usize, to: u32) {
        let neighbors = &mut self.nodes[from].neighbors;
        if let Err(pos) = neighbors.binary_search(&to) {
            neighbors.insert(pos, to);
        }
    }

    /// True if no edge joins two nodes of the same color.
    pub fn is_reduced(&self) -> bool {
        self.nodes.iter().all(|node| {
            node.neighbors
                .iter()
                .all(|&u| self.nodes[u as usize].color != node.color)
        })
    }

    /// Collapses every class of same-color adjacent nodes into one
    /// node. Representatives keep their relative order, the root
    /// follows its class, and neighbor lists are remapped, sorted and
    /// deduplicated. Idempotent.
    pub fn reduce(&mut self) -> Result<(), GraphError> {
        let n = self.nodes.len();
        let mut classes = UnionFind::new(n);
        for i in 0..n {
            for &j in &self.nodes[i].neighbors {
                if self.nodes[j as usize].color == self.nodes[i].color {
                    classes.merge(i as u32, j);
                }
            }
        }

        // find(i) <= i, so every representative is renumbered before
        // its members show up. Members surrender their node count and
        // neighbor list to the representative.
        let mut new_index = vec![0u32; n];
        let mut kept = 0u32;
        for i in 0..n {
            let rep = classes.find(i as u32) as usize;
            if rep == i {
                new_index[i] = kept;
                kept += 1;
            } else {
                new_index[i] = new_index[rep];
                self.color_counts[self.nodes[i].color.tag as usize] -= 1;
                let moved = mem::take(&mut self.nodes[i].neighbors);
                self.nodes[rep].neighbors.extend_from_slice(&moved);
            }
        }
        self.root = new_index[classes.find(self.root) as usize];

        let mut reduced = Vec::with_capacity(kept as usize);
        for i in 0..n {
            if classes.find(i as u32) as usize != i {
                continue;
            }
            let mut neighbors = mem::take(&mut self.nodes[i].neighbors);
            for u in neighbors.iter_mut() {
                *u = new_index[classes.find(*u) as usize];
            }
            let me = new_index[i];
            neighbors.retain(|&u| u != me);
            neighbors.sort_unstable();
            neighbors.dedup();
            reduced.push(Node {
                color: self.nodes[i].color,
                neighbors,
            });
        }
        debug!("reduced {} nodes to {}", n, reduced.len());
        self.nodes = reduced;

        if let Some(tag) = self.color_counts.iter().position(|&c| c == 0) {
            return Err(GraphError::ColorVanished(tag as u8));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(colors: &[u8], edges: &[(usize, usize)]) -> Graph {
        let mut graph = Graph::new(colors.len());
        for (i, &c) in colors.iter().enumerate() {
            graph.set_color(i, Color::new(c));
        }
        for &(a, b) in edges {
            graph.add_edge(a, b);
        }
        graph
    }

    #[test]
    fn builder_keeps_neighbors_sorted_and_unique() {
        let mut graph = Graph::new(4);
        graph.add_edge(2, 0);
        graph.add_edge(2, 3);
        graph.add_edge(2, 1);
        graph.add_edge(2, 3);

        assert_eq!(graph.neighbors(2), &[0, 1, 3]);
        assert_eq!(graph.neighbors(0), &[2]);
        assert_eq!(graph.neighbors(3), &[2]);
    }

    #[test]
    fn set_color_tracks_counts() {
        let mut graph = Graph::new(3);
        assert_eq!(graph.color_counts(), &[3]);

        graph.set_color(0, Color::new(2));
        assert_eq!(graph.color_counts(), &[2, 0, 1]);
        assert_eq!(graph.num_colors(), 3);

        graph.set_color(1, Color::new(1));
        assert_eq!(graph.color_counts(), &[1, 1, 1]);
    }

    #[test]
    fn reduce_collapses_same_color_chains() {
        // 0-0-1-1 chain collapses to 0-1
        let mut graph = build(&[0, 0, 1, 1], &[(0, 1), (1, 2), (2, 3)]);
        graph.reduce().unwrap();

        assert_eq!(graph.len(), 2);
        assert_eq!(graph.color(0), Color::new(0));
        assert_eq!(graph.color(1), Color::new(1));
        assert_eq!(graph.neighbors(0), &[1]);
        assert_eq!(graph.neighbors(1), &[0]);
        assert_eq!(graph.color_counts(), &[1, 1]);
        assert!(graph.is_reduced());
    }

    #[test]
    fn reduce_remaps_root_into_its_class() {
        let mut graph = build(&[0, 0, 1, 1], &[(0, 1), (1, 2), (2, 3)]);
        graph.set_root(3);
        graph.reduce().unwrap();
        assert_eq!(graph.root(), 1);

        let mut graph = build(&[0, 0, 1, 1], &[(0, 1), (1, 2), (2, 3)]);
        graph.set_root(1);
        graph.reduce().unwrap();
        assert_eq!(graph.root(), 0);
    }

    #[test]
    fn reduce_merges_neighbor_lists() {
        // a same-color class in the middle of a star picks up every
        // outside neighbor exactly once, sorted
        let mut graph = build(
            &[1, 1, 0, 2, 0],
            &[(0, 1), (0, 2), (1, 2), (1, 3), (1, 4), (0, 4)],
        );
        graph.reduce().unwrap();

        assert_eq!(graph.len(), 4);
        assert_eq!(graph.color(0), Color::new(1));
        assert_eq!(graph.neighbors(0), &[1, 2, 3]);
        assert!(graph.is_reduced());
    }

    #[test]
    fn reduce_is_idempotent() {
        let mut graph = build(
            &[0, 0, 1, 2, 1, 0],
            &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (0, 5), (1, 4)],
        );
        graph.reduce().unwrap();
        let once = graph.clone();
        graph.reduce().unwrap();
        assert_eq!(graph, once);
    }

    #[test]
    fn reduce_preserves_every_color() {
        let mut graph = build(&[0, 1, 2, 1, 0], &[(0, 1), (1, 2), (2, 3), (3, 4)]);
        graph.reduce().unwrap();
        assert!(graph.color_counts().iter().all(|&c| c > 0));
        assert_eq!(graph.num_colors(), 3);
    }

    #[test]
    fn reduce_rejects_color_gaps() {
        // color 1 is never used, so its count is zero
        let mut graph = build(&[0, 2], &[(0, 1)]);
        assert_eq!(graph.reduce(), Err(GraphError::ColorVanished(1)));
    }
}
