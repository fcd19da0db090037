//! Display stand-ins for control runes.

use super::{Glyph, GlyphSource, Metrics};
use crate::geom::{Fixed, FixedPoint, FixedRect};

/// Glyph shown for a carriage return.
pub const CR_STAND_IN: char = '\u{240D}';
/// Glyph shown for a NUL byte.
pub const NUL_STAND_IN: char = '\u{2400}';

/// Wraps a glyph source so control runes lay out sensibly: `'\t'` spans
/// `tab_width` spaces, `'\n'` is half a space, `'\r'` and NUL draw visible
/// stand-ins. Neither tab nor newline has a glyph.
#[derive(Debug, Clone)]
pub struct FaceRunes<G> {
    inner: G,
    tab_width: usize,
}

impl<G: GlyphSource> FaceRunes<G> {
    pub fn new(inner: G, tab_width: usize) -> Self {
        Self {
            inner,
            tab_width: tab_width.max(1),
        }
    }

    pub fn tab_width(&self) -> usize {
        self.tab_width
    }

    pub fn set_tab_width(&mut self, tab_width: usize) {
        self.tab_width = tab_width.max(1);
    }

    pub fn inner_mut(&mut self) -> &mut G {
        &mut self.inner
    }

    /// Advance of a space, falling back to half the line height.
    pub fn space_advance(&mut self) -> Fixed {
        self.inner
            .glyph_advance(' ')
            .unwrap_or(Fixed(self.inner.metrics().height.0 / 2))
    }

    /// Advance for a drawer rune; the end-of-content sentinel is zero.
    pub fn rune_advance(&mut self, ru: Option<char>) -> Fixed {
        ru.and_then(|ru| self.glyph_advance(ru)).unwrap_or(Fixed::ZERO)
    }

    fn stand_in(ru: char) -> char {
        match ru {
            '\r' => CR_STAND_IN,
            '\0' => NUL_STAND_IN,
            other => other,
        }
    }
}

impl<G: GlyphSource> GlyphSource for FaceRunes<G> {
    fn glyph(&mut self, dot: FixedPoint, ru: char) -> Option<Glyph> {
        match ru {
            '\t' | '\n' => None,
            _ => self.inner.glyph(dot, Self::stand_in(ru)),
        }
    }

    fn glyph_advance(&mut self, ru: char) -> Option<Fixed> {
        match ru {
            '\t' => Some(self.space_advance() * self.tab_width as i64),
            '\n' => Some(Fixed(self.space_advance().0 / 2)),
            _ => self.inner.glyph_advance(Self::stand_in(ru)),
        }
    }

    fn glyph_bounds(&mut self, ru: char) -> Option<(FixedRect, Fixed)> {
        match ru {
            '\t' | '\n' => {
                let adv = self.glyph_advance(ru)?;
                let bounds = FixedRect {
                    min: FixedPoint::default(),
                    max: FixedPoint::new(adv, Fixed::ZERO),
                };
                Some((bounds, adv))
            }
            _ => self.inner.glyph_bounds(Self::stand_in(ru)),
        }
    }

    fn kern(&mut self, a: char, b: char) -> Fixed {
        if a.is_control() || b.is_control() {
            return Fixed::ZERO;
        }
        self.inner.kern(a, b)
    }

    fn metrics(&self) -> Metrics {
        self.inner.metrics()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::face::{FaceCache, MonoFace};

    fn runes() -> FaceRunes<FaceCache<MonoFace>> {
        FaceRunes::new(FaceCache::new(MonoFace::default()), 8)
    }

    #[test]
    fn control_runes_get_layout_advances() {
        let mut f = runes();
        assert_eq!(f.glyph_advance('\t'), Some(Fixed::from_int(48)));
        assert_eq!(f.glyph_advance('\n'), Some(Fixed::from_int(3)));
        assert_eq!(f.glyph_advance('\r'), Some(Fixed::from_int(6)));
        assert_eq!(f.rune_advance(None), Fixed::ZERO);
    }

    #[test]
    fn tab_and_newline_have_no_glyph() {
        let mut f = runes();
        assert!(f.glyph(FixedPoint::default(), '\t').is_none());
        assert!(f.glyph(FixedPoint::default(), '\n').is_none());
        let cr = f.glyph(FixedPoint::default(), '\r').expect("stand-in");
        let standin = f
            .glyph(FixedPoint::default(), CR_STAND_IN)
            .expect("stand-in glyph");
        assert_eq!(*cr.mask, *standin.mask);
    }
}
