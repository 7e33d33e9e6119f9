use std::fmt;

use term_painter::{Attr, ToStyle};

/// A cell/node color. Colors are ordered; the move pruning in the
/// search relies on it.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Color {
    pub tag: u8,
}

impl Color {
    pub fn new(tag: u8) -> Color {
        Color { tag }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use term_painter::Color::*;

        Attr::Plain.bg(match self.tag {
            0 => Red,
            1 => Green,
            2 => Yellow,
            3 => Blue,
            4 => Magenta,
            5 => Cyan,
            _ => White,
        }).paint("  ").fmt(f)
    }
}
