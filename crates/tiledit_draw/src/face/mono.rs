//! Built-in monospace face used by the headless renderer and tests.
//!
//! Glyphs are procedural: a box outline with a per-rune fill pattern, so
//! different runes produce different pixels without shipping a font.

use super::{Face, Mask, Metrics, RawGlyph};
use crate::geom::{Fixed, FixedPoint, FixedRect, Point, Rect};
use unicode_width::UnicodeWidthChar;

/// Cell-based monospace rasterizer. Masks are written into one scratch
/// buffer that every call overwrites.
#[derive(Debug, Clone)]
pub struct MonoFace {
    cell_width: i32,
    ascent: i32,
    descent: i32,
    scratch: Mask,
}

impl Default for MonoFace {
    fn default() -> Self {
        Self::new(6, 8, 2)
    }
}

impl MonoFace {
    pub fn new(cell_width: i32, ascent: i32, descent: i32) -> Self {
        Self {
            cell_width: cell_width.max(1),
            ascent: ascent.max(1),
            descent: descent.max(0),
            scratch: Mask::default(),
        }
    }

    fn columns(ru: char) -> i32 {
        UnicodeWidthChar::width(ru).unwrap_or(1) as i32
    }

    fn render(&mut self, ru: char, width: i32) {
        let height = self.ascent + self.descent;
        let (w, h) = (width as u32, height as u32);
        self.scratch.width = w;
        self.scratch.height = h;
        self.scratch.pix.clear();
        self.scratch.pix.resize((w * h) as usize, 0);
        if ru.is_whitespace() || width == 0 {
            return;
        }
        let seed = ru as u32;
        for y in 1..h.saturating_sub(1) {
            for x in 1..w.saturating_sub(1) {
                let border = x == 1 || y == 1 || x + 2 == w || y + 2 == h;
                let bit = (seed >> ((x + y * w) % 21)) & 1 == 1;
                if border || bit {
                    self.scratch.pix[(y * w + x) as usize] = 0xff;
                }
            }
        }
    }
}

impl Face for MonoFace {
    fn glyph(&mut self, dot: FixedPoint, ru: char) -> Option<RawGlyph<'_>> {
        let width = Self::columns(ru) * self.cell_width;
        self.render(ru, width);
        let origin = dot.floor();
        let dest = Rect::new(0, -self.ascent, width, self.descent).translate(origin);
        Some(RawGlyph {
            dest,
            mask: &self.scratch,
            mask_pt: Point::default(),
            advance: Fixed::from_int(width),
        })
    }

    fn glyph_advance(&mut self, ru: char) -> Option<Fixed> {
        Some(Fixed::from_int(Self::columns(ru) * self.cell_width))
    }

    fn glyph_bounds(&mut self, ru: char) -> Option<(FixedRect, Fixed)> {
        let adv = Fixed::from_int(Self::columns(ru) * self.cell_width);
        let bounds = FixedRect {
            min: FixedPoint::new(Fixed::ZERO, Fixed::from_int(-self.ascent)),
            max: FixedPoint::new(adv, Fixed::from_int(self.descent)),
        };
        Some((bounds, adv))
    }

    fn kern(&mut self, _a: char, _b: char) -> Fixed {
        Fixed::ZERO
    }

    fn metrics(&self) -> Metrics {
        Metrics {
            height: Fixed::from_int(self.ascent + self.descent),
            ascent: Fixed::from_int(self.ascent),
            descent: Fixed::from_int(self.descent),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_runes_take_two_cells() {
        let mut face = MonoFace::default();
        assert_eq!(face.glyph_advance('a'), Some(Fixed::from_int(6)));
        assert_eq!(face.glyph_advance('界'), Some(Fixed::from_int(12)));
        assert_eq!(face.glyph_advance('\u{301}'), Some(Fixed::ZERO));
    }

    #[test]
    fn glyph_dest_is_placed_at_dot() {
        let mut face = MonoFace::default();
        let dot = FixedPoint::new(Fixed::from_int(10), Fixed::from_int(8));
        let g = face.glyph(dot, 'x').expect("glyph");
        assert_eq!(g.dest, Rect::new(10, 0, 16, 10));
        assert!(g.mask.pix.iter().any(|&a| a > 0));
    }

    #[test]
    fn space_is_blank() {
        let mut face = MonoFace::default();
        let g = face.glyph(FixedPoint::default(), ' ').expect("glyph");
        assert!(g.mask.pix.iter().all(|&a| a == 0));
    }
}
