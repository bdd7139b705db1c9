use rand::Rng;
use rand::rngs::SmallRng;

use crate::rgba::Rgba;

// keep hue channels off the pure 0/255 extremes
const INSET: u8 = 32;
const FULL: u8 = 255 - INSET;

/// The six glyph classes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PaletteColor {
    Red,
    Yellow,
    Green,
    Cyan,
    Blue,
    Magenta,
}

/// Selection order for `pick`. Deliberately not the declaration order above:
/// truncating to the first `num_colors` entries must yield the primaries
/// before the mixed hues.
const PICK_ORDER: [PaletteColor; 6] = [
    PaletteColor::Red,
    PaletteColor::Green,
    PaletteColor::Blue,
    PaletteColor::Yellow,
    PaletteColor::Cyan,
    PaletteColor::Magenta,
];

impl PaletteColor {
    /// Uniform draw from the first `num_colors` entries of the selection
    /// order, clamped to [1, 6].
    pub fn pick(rng: &mut SmallRng, num_colors: u32) -> Self {
        let n = num_colors.clamp(1, PICK_ORDER.len() as u32) as usize;
        PICK_ORDER[rng.random_range(0..n)]
    }

    /// Class name as written into annotation documents.
    pub fn label(&self) -> &'static str {
        match self {
            PaletteColor::Red => "Red",
            PaletteColor::Yellow => "Yellow",
            PaletteColor::Green => "Green",
            PaletteColor::Cyan => "Cyan",
            PaletteColor::Blue => "Blue",
            PaletteColor::Magenta => "Magenta",
        }
    }

    /// Baseline opaque color glyphs are recolored toward.
    pub fn rgba(&self) -> Rgba {
        let (r, g, b) = match self {
            PaletteColor::Red => (FULL, INSET, INSET),
            PaletteColor::Yellow => (FULL, FULL, INSET),
            PaletteColor::Green => (INSET, FULL, INSET),
            PaletteColor::Cyan => (INSET, FULL, FULL),
            PaletteColor::Blue => (INSET, INSET, FULL),
            PaletteColor::Magenta => (FULL, INSET, FULL),
        };
        Rgba::new(r, g, b, 255)
    }
}
