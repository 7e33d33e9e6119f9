use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::ops;
use std::path::Path;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use thiserror::Error;

use crate::color::Color;
use crate::graph::Graph;

/// Colors used by the board generators (the classic palette).
pub const GEN_COLORS: u8 = 6;

const GEN_LABELS: &[u8] = b"123456";

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("board is empty")]
    Empty,
    #[error("row {0} does not match the width of the first row")]
    Ragged(usize),
    #[error("more than 256 distinct cell labels")]
    TooManyColors,
    #[error("board larger than 255x255")]
    TooLarge,
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// A rectangular grid of colored cells. The flood origin is the top
/// left corner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    width: u8,
    height: u8,
    cells: Vec<Color>,
    labels: Vec<char>,
}

impl Board {
    pub fn random(width: u8, height: u8) -> Board {
        Self::with_rng(width, height, &mut rand::thread_rng())
    }

    /// Same board for the same seed; benchmark runs stay comparable.
    pub fn seeded(width: u8, height: u8, seed: u64) -> Board {
        Self::with_rng(width, height, &mut Pcg64::seed_from_u64(seed))
    }

    fn with_rng<R: Rng>(width: u8, height: u8, rng: &mut R) -> Board {
        let cells = (0..width as usize * height as usize)
            .map(|_| Color::new(rng.gen_range(0..GEN_COLORS)))
            .collect();
        Board {
            width,
            height,
            cells,
            labels: GEN_LABELS.iter().map(|&b| b as char).collect(),
        }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Board, BoardError> {
        Self::parse(&fs::read_to_string(path)?)
    }

    /// One row per line, one cell per non-space character. Distinct
    /// characters become color indices in order of first appearance,
    /// so the cell colors are always gap-free.
    pub fn parse(input: &str) -> Result<Board, BoardError> {
        let mut labels = Vec::new();
        let mut index = HashMap::new();
        let mut cells = Vec::new();
        let mut width = 0usize;
        let mut height = 0usize;

        for (row, line) in input.lines().filter(|l| !l.trim().is_empty()).enumerate() {
            let mut row_len = 0usize;
            for c in line.chars().filter(|c| !c.is_whitespace()) {
                let tag = match index.get(&c) {
                    Some(&tag) => tag,
                    None => {
                        if labels.len() == 256 {
                            return Err(BoardError::TooManyColors);
                        }
                        let tag = labels.len() as u8;
                        labels.push(c);
                        index.insert(c, tag);
                        tag
                    }
                };
                cells.push(Color::new(tag));
                row_len += 1;
            }
            if row == 0 {
                width = row_len;
            } else if row_len != width {
                return Err(BoardError::Ragged(row));
            }
            height += 1;
        }

        if width == 0 || height == 0 {
            return Err(BoardError::Empty);
        }
        if width > u8::MAX as usize || height > u8::MAX as usize {
            return Err(BoardError::TooLarge);
        }
        Ok(Board {
            width: width as u8,
            height: height as u8,
            cells,
            labels,
        })
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// The character this color was read from (or '1'..'6' for
    /// generated boards).
    pub fn label(&self, color: Color) -> char {
        self.labels.get(color.tag as usize).copied().unwrap_or('?')
    }

    /// One move of the game: the whole origin region takes the new
    /// color.
    pub fn flood(&mut self, new: Color) {
        if new == self[(0, 0)] {
            return;
        }
        for (x, y) in self.region() {
            self[(x, y)] = new;
        }
    }

    pub fn is_flooded(&self) -> bool {
        self.cells.iter().all(|&c| c == self.cells[0])
    }

    /// Cells of the monochromatic region around the origin.
    fn region(&self) -> Vec<(u8, u8)> {
        let color = self[(0, 0)];
        let mut stack = vec![(0u8, 0u8)];
        let mut seen = vec![false; self.cells.len()];
        seen[0] = true;
        let mut region = Vec::new();

        while let Some((x, y)) = stack.pop() {
            region.push((x, y));

            let candidates = [
                (x.wrapping_sub(1), y, x > 0),
                (x + 1, y, x + 1 < self.width),
                (x, y.wrapping_sub(1), y > 0),
                (x, y + 1, y + 1 < self.height),
            ];
            for &(nx, ny, inside) in &candidates {
                if !inside {
                    continue;
                }
                let idx = ny as usize * self.width as usize + nx as usize;
                if !seen[idx] && self.cells[idx] == color {
                    seen[idx] = true;
                    stack.push((nx, ny));
                }
            }
        }
        region
    }

    /// Builds the raw graph: one node per cell, edges between grid
    /// neighbors, root at the origin. Cell colors are compacted to a
    /// gap-free range (generated boards may miss a color); the
    /// returned palette maps the dense colors back to the board's.
    pub fn to_graph(&self) -> (Graph, Vec<Color>) {
        let width = self.width as usize;
        let height = self.height as usize;
        let mut graph = Graph::new(width * height);
        let mut dense = HashMap::new();
        let mut palette = Vec::new();

        for (i, &cell) in self.cells.iter().enumerate() {
            let tag = *dense.entry(cell).or_insert_with(|| {
                palette.push(cell);
                (palette.len() - 1) as u8
            });
            graph.set_color(i, Color::new(tag));
        }
        for y in 0..height {
            for x in 0..width {
                let i = y * width + x;
                if x + 1 < width {
                    graph.add_edge(i, i + 1);
                }
                if y + 1 < height {
                    graph.add_edge(i, i + width);
                }
            }
        }
        graph.set_root(0);
        (graph, palette)
    }
}

impl ops::Index<(u8, u8)> for Board {
    type Output = Color;
    fn index(&self, (x, y): (u8, u8)) -> &Color {
        assert!(
            x < self.width && y < self.height,
            "({}, {}) outside a {}x{} board",
            x,
            y,
            self.width,
            self.height
        );
        &self.cells[y as usize * self.width as usize + x as usize]
    }
}

impl ops::IndexMut<(u8, u8)> for Board {
    fn index_mut(&mut self, (x, y): (u8, u8)) -> &mut Color {
        assert!(
            x < self.width && y < self.height,
            "({}, {}) outside a {}x{} board",
            x,
            y,
            self.width,
            self.height
        );
        &mut self.cells[y as usize * self.width as usize + x as usize]
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                self[(x, y)].fmt(f)?;
            }
            "\n".fmt(f)?;
        }
        Ok(())
    }
}
