//! Move histories with shared prefixes.
//!
//! The search clones a state for every candidate move and most clones
//! share almost their whole history, so storing a full move vector per
//! state would make the frontier quadratic. Histories therefore live
//! in an append-only trie: fixed-size blocks chained by
//! back-references. A [`Moves`] handle *is* the tail block of one
//! sequence -- a back-reference, a length and a small inline array --
//! so copying a state copies two machine words of history.

use std::mem;

use crate::color::Color;

/// Moves stored inline in a handle, sized so that a handle occupies
/// exactly two machine words.
pub const TAIL: usize =
    2 * mem::size_of::<usize>() - mem::size_of::<u32>() - mem::size_of::<u16>();

const NO_BLOCK: u32 = u32::MAX;

/// Arena holding the archived (full) blocks of all sequences produced
/// during one search. Archived blocks are immutable and addressed by
/// index, so growing the arena never invalidates a handle.
#[derive(Default)]
pub struct History {
    blocks: Vec<Moves>,
}

impl History {
    pub fn new() -> History {
        History::default()
    }

    fn archive(&mut self, block: Moves) -> u32 {
        assert!(self.blocks.len() < NO_BLOCK as usize);
        self.blocks.push(block);
        (self.blocks.len() - 1) as u32
    }
}

/// Handle to one immutable move sequence.
///
/// Appending returns a fresh handle; the old one stays valid and still
/// denotes the shorter sequence, which is what lets sibling states
/// diverge after sharing a prefix.
#[derive(Clone, Copy)]
pub struct Moves {
    prev: u32,
    len: u16,
    tail: [Color; TAIL],
}

impl Moves {
    /// The empty sequence.
    pub fn empty() -> Moves {
        Moves {
            prev: NO_BLOCK,
            len: 0,
            tail: [Color { tag: 0 }; TAIL],
        }
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// How many moves sit in this block's own tail; the rest live in
    /// archived parent blocks.
    fn tail_len(&self) -> usize {
        if self.len == 0 {
            0
        } else {
            (self.len as usize - 1) % TAIL + 1
        }
    }

    /// The most recent move.
    pub fn last(&self) -> Color {
        debug_assert!(self.len > 0, "last() on an empty history");
        self.tail[self.tail_len() - 1]
    }

    /// Returns a handle for `self` followed by `color`. When the tail
    /// is full it is archived in the arena and the new handle chains
    /// onto it.
    pub fn push(&self, history: &mut History, color: Color) -> Moves {
        debug_assert!(self.len < u16::MAX);
        let mut out = *self;
        let used = self.tail_len();
        if used == TAIL {
            out.prev = history.archive(*self);
            out.tail[0] = color;
        } else {
            out.tail[used] = color;
        }
        out.len += 1;
        out
    }

    /// Materializes the whole sequence, oldest move first.
    pub fn to_vec(&self, history: &History) -> Vec<Color> {
        let mut out = vec![Color { tag: 0 }; self.len as usize];
        let mut end = self.len as usize;
        let mut block = *self;
        loop {
            let used = block.tail_len();
            out[end - used..end].copy_from_slice(&block.tail[..used]);
            end -= used;
            if block.prev == NO_BLOCK {
                break;
            }
            block = history.blocks[block.prev as usize];
        }
        debug_assert_eq!(end, 0);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn colors(tags: &[u8]) -> Vec<Color> {
        tags.iter().map(|&t| Color::new(t)).collect()
    }

    #[test]
    fn empty_sequence() {
        let history = History::new();
        let moves = Moves::empty();
        assert_eq!(moves.len(), 0);
        assert!(moves.is_empty());
        assert!(moves.to_vec(&history).is_empty());
    }

    #[test]
    fn push_and_read_back() {
        let mut history = History::new();
        let mut moves = Moves::empty();
        let mut expected = Vec::new();

        // enough appends to cross several block boundaries
        for i in 0..(4 * TAIL as u8 + 3) {
            let color = Color::new(i % 5);
            moves = moves.push(&mut history, color);
            expected.push(color);

            assert_eq!(moves.len(), expected.len());
            assert_eq!(moves.last(), color);
        }
        assert_eq!(moves.to_vec(&history), expected);
    }

    #[test]
    fn siblings_are_independent() {
        let mut history = History::new();
        let mut base = Moves::empty();
        for i in 0..TAIL as u8 {
            base = base.push(&mut history, Color::new(i % 3));
        }
        let prefix = base.to_vec(&history);

        // both children append to a full tail and archive it
        let left = base.push(&mut history, Color::new(3));
        let right = base.push(&mut history, Color::new(4));

        let mut want_left = prefix.clone();
        want_left.push(Color::new(3));
        let mut want_right = prefix.clone();
        want_right.push(Color::new(4));

        assert_eq!(left.to_vec(&history), want_left);
        assert_eq!(right.to_vec(&history), want_right);
        assert_eq!(base.to_vec(&history), prefix);
    }

    #[test]
    fn handle_is_stable_under_descendant_pushes() {
        let mut history = History::new();
        let mut moves = Moves::empty();
        for &tag in &[2, 0, 1, 4, 3] {
            moves = moves.push(&mut history, Color::new(tag));
        }
        let snapshot = moves.to_vec(&history);
        assert_eq!(snapshot, colors(&[2, 0, 1, 4, 3]));

        let mut descendant = moves;
        for i in 0..3 * TAIL as u8 {
            descendant = descendant.push(&mut history, Color::new(i % 6));
        }
        assert_eq!(moves.to_vec(&history), snapshot);
        assert_eq!(moves.last(), Color::new(3));
    }

    #[test]
    fn handle_stays_two_words() {
        assert!(mem::size_of::<Moves>() <= 2 * mem::size_of::<usize>());
    }
}
