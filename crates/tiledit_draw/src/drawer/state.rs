//! Per-iteration scratch shared by the pipeline stages.

use super::chain::Chain;
use crate::canvas::{Canvas, Color};
use crate::face::GlyphSource;
use crate::geom::{Fixed, FixedPoint, Point, Rect};
use crate::options::Options;
use tiledit_core::{Reader, RwError};

/// Colors of the rune being processed.
#[derive(Clone, Copy, Debug)]
pub(crate) struct CurColors {
    pub fg: Color,
    pub bg: Option<Color>,
    /// Pending full-line background, consumed by the next background fill.
    pub line_bg: Option<Color>,
    pub start_fg: Color,
}

/// Results written by the sink stages.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Sinks {
    pub max_pen_x: Fixed,
    pub point: Option<Point>,
    pub index: Option<usize>,
    pub best_index: Option<usize>,
    pub annotation_hit: Option<(usize, usize)>,
}

pub(crate) struct State<'a> {
    pub reader: &'a dyn Reader,
    pub face: &'a mut dyn GlyphSource,
    pub opts: &'a Options,
    pub canvas: Option<&'a mut dyn Canvas>,
    /// Viewport; content coordinates start at its top-left corner.
    pub bounds: Rect,

    pub line_height: Fixed,
    pub ascent: Fixed,
    pub space_adv: Fixed,
    pub tab_adv: Fixed,
    pub start_x: Fixed,
    pub max_x: Fixed,

    pub ri: usize,
    pub start_ri: usize,
    /// `None` is the end-of-content sentinel (and the post-wrap marker
    /// while `extra_depth > 0`).
    pub ru: Option<char>,
    pub prev_ru: Option<char>,
    pub pen: FixedPoint,
    pub kern: Fixed,
    pub advance: Fixed,
    /// Non-zero while a stage-inserted rune travels down the chain.
    pub extra_depth: usize,

    pub stop: bool,
    pub err: Option<RwError>,

    pub is_line_start: bool,
    pub post_wrap: bool,
    pub wrapped: bool,
    pub colors: CurColors,
    /// `(entry, byte offset)` of the annotation rune being emitted.
    pub annotation: Option<(usize, usize)>,
    pub sinks: Sinks,
}

impl<'a> State<'a> {
    pub(crate) fn new(
        reader: &'a dyn Reader,
        face: &'a mut dyn GlyphSource,
        opts: &'a Options,
        bounds: Rect,
        start_fg: Color,
    ) -> Self {
        let metrics = face.metrics();
        let space_adv = face
            .glyph_advance(' ')
            .unwrap_or(Fixed(metrics.height.0 / 2));
        let tab_adv = space_adv * opts.tab_width.max(1) as i64;
        let start = reader.min();
        Self {
            reader,
            face,
            opts,
            canvas: None,
            bounds,
            line_height: metrics.height,
            ascent: metrics.ascent,
            space_adv,
            tab_adv,
            start_x: Fixed::ZERO,
            max_x: Fixed::from_int(bounds.dx()),
            ri: start,
            start_ri: start,
            ru: None,
            prev_ru: None,
            pen: FixedPoint::default(),
            kern: Fixed::ZERO,
            advance: Fixed::ZERO,
            extra_depth: 0,
            stop: false,
            err: None,
            is_line_start: true,
            post_wrap: false,
            wrapped: false,
            colors: CurColors {
                fg: start_fg,
                bg: None,
                line_bg: None,
                start_fg,
            },
            annotation: None,
            sinks: Sinks::default(),
        }
    }

    pub(crate) fn with_canvas(mut self, canvas: &'a mut dyn Canvas) -> Self {
        self.canvas = Some(canvas);
        self
    }

    /// Content runes are the ones read from the buffer, EOF included.
    pub(crate) fn is_content(&self) -> bool {
        self.extra_depth == 0
    }

    /// Advance that brings `x` to the next tab stop strictly after it.
    pub(crate) fn tab_advance_at(&self, x: Fixed) -> Fixed {
        let tab = self.tab_adv.0.max(1);
        let rel = (x - self.start_x).0;
        Fixed((rel + tab).div_euclid(tab) * tab - rel)
    }

    /// Advance of `ru` at the current pen.
    pub(crate) fn advance_for(&mut self, ru: Option<char>) -> Fixed {
        match ru {
            None => Fixed::ZERO,
            Some('\t') => self.tab_advance_at(self.pen.x),
            Some(c) => self.face.glyph_advance(c).unwrap_or(Fixed::ZERO),
        }
    }

    pub(crate) fn new_line(&mut self) {
        self.pen.x = self.start_x;
        self.pen.y += self.line_height;
    }

    /// Pen rectangle of the current rune in content pixels.
    pub(crate) fn pen_rect(&self) -> Rect {
        Rect {
            min: self.pen.floor(),
            max: Point::new(
                (self.pen.x + self.advance).floor(),
                (self.pen.y + self.line_height).floor(),
            ),
        }
    }

    /// Full-width band of the current visual line.
    pub(crate) fn line_rect(&self) -> Rect {
        Rect::new(
            self.start_x.floor(),
            self.pen.y.floor(),
            self.max_x.ceil(),
            (self.pen.y + self.line_height).floor(),
        )
    }

    /// Content pixels to canvas pixels.
    pub(crate) fn to_canvas(&self, r: Rect) -> Rect {
        r.translate(self.bounds.min)
    }

    /// Baseline origin of the current rune in canvas space.
    pub(crate) fn dot(&self) -> FixedPoint {
        FixedPoint::new(
            self.pen.x + Fixed::from_int(self.bounds.min.x),
            self.pen.y + self.ascent + Fixed::from_int(self.bounds.min.y),
        )
    }

    /// Push a synthetic rune through the downstream stages, then move the
    /// pen past it. `adv` overrides the face advance.
    pub(crate) fn insert_extra(&mut self, chain: &mut Chain<'_>, ru: Option<char>, adv: Option<Fixed>) {
        let saved = (self.ru, self.kern, self.advance);
        self.extra_depth += 1;
        self.ru = ru;
        self.kern = Fixed::ZERO;
        self.advance = match adv {
            Some(a) => a,
            None => self.advance_for(ru),
        };
        chain.next(self);
        self.pen.x += self.advance;
        self.extra_depth -= 1;
        (self.ru, self.kern, self.advance) = saved;
    }
}
