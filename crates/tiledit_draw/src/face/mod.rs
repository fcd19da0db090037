//! Font face abstractions and the caching layers above them.
//!
//! [`Face`] is the rasterizer port: it may reuse an internal buffer for the
//! masks it hands out, so it returns borrowed [`RawGlyph`]s. [`GlyphSource`]
//! is what the drawer consumes: owned [`Glyph`]s whose masks are stable
//! until the source is dropped.

pub mod cache;
pub mod mono;
pub mod runes;

pub use cache::{FaceCache, SharedFaceCache};
pub use mono::MonoFace;
pub use runes::FaceRunes;

use crate::geom::{Fixed, FixedPoint, FixedRect, Point, Rect};
use std::sync::Arc;

/// 8-bit alpha coverage mask.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Mask {
    pub width: u32,
    pub height: u32,
    pub pix: Vec<u8>,
}

impl Mask {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pix: vec![0; (width as usize) * (height as usize)],
        }
    }

    /// Coverage at `(x, y)`, zero outside the mask.
    pub fn alpha_at(&self, x: i32, y: i32) -> u8 {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return 0;
        }
        self.pix[(y as usize) * (self.width as usize) + x as usize]
    }
}

/// Vertical font metrics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Metrics {
    pub height: Fixed,
    pub ascent: Fixed,
    pub descent: Fixed,
}

/// Rasterizer output borrowing the face's mask buffer.
#[derive(Debug)]
pub struct RawGlyph<'a> {
    /// Destination rectangle, already positioned relative to the dot.
    pub dest: Rect,
    pub mask: &'a Mask,
    pub mask_pt: Point,
    pub advance: Fixed,
}

/// Owned glyph.
#[derive(Clone, Debug)]
pub struct Glyph {
    pub dest: Rect,
    pub mask: Arc<Mask>,
    pub mask_pt: Point,
    pub advance: Fixed,
}

/// A font rasterizer. Not reentrant.
pub trait Face {
    /// Rasterize `ru` with its baseline origin at `dot`.
    fn glyph(&mut self, dot: FixedPoint, ru: char) -> Option<RawGlyph<'_>>;
    fn glyph_advance(&mut self, ru: char) -> Option<Fixed>;
    fn glyph_bounds(&mut self, ru: char) -> Option<(FixedRect, Fixed)>;
    fn kern(&mut self, a: char, b: char) -> Fixed;
    fn metrics(&self) -> Metrics;
}

/// Glyph provider consumed by the drawer.
pub trait GlyphSource {
    fn glyph(&mut self, dot: FixedPoint, ru: char) -> Option<Glyph>;
    fn glyph_advance(&mut self, ru: char) -> Option<Fixed>;
    fn glyph_bounds(&mut self, ru: char) -> Option<(FixedRect, Fixed)>;
    fn kern(&mut self, a: char, b: char) -> Fixed;
    fn metrics(&self) -> Metrics;
}

impl<G: GlyphSource + ?Sized> GlyphSource for Box<G> {
    fn glyph(&mut self, dot: FixedPoint, ru: char) -> Option<Glyph> {
        (**self).glyph(dot, ru)
    }

    fn glyph_advance(&mut self, ru: char) -> Option<Fixed> {
        (**self).glyph_advance(ru)
    }

    fn glyph_bounds(&mut self, ru: char) -> Option<(FixedRect, Fixed)> {
        (**self).glyph_bounds(ru)
    }

    fn kern(&mut self, a: char, b: char) -> Fixed {
        (**self).kern(a, b)
    }

    fn metrics(&self) -> Metrics {
        (**self).metrics()
    }
}

/// Translation applied to a glyph cached at the origin.
pub(crate) fn dot_offset(dot: FixedPoint) -> Point {
    dot.floor()
}
