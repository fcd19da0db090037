//! Layout and painting of a text view.
//!
//! Every operation (measure, draw, point and index lookups) is a walk over
//! the content by a chain of stages, each of which may inspect, alter or
//! multiply the rune it is handed before passing it downstream. The
//! operations differ only in which stages take part, so the layout they
//! compute is the same by construction.

mod chain;
mod stages;
mod state;

use crate::canvas::{rgb, Canvas, Color};
use crate::error::DrawError;
use crate::face::{FaceRunes, GlyphSource};
use crate::geom::{Fixed, Point, Rect};
use crate::options::{ColorizeGroup, CursorOpt, Options};
use chain::{run, Stage};
use stages::*;
use state::{Sinks, State};
use tiledit_core::scan::line_start_index;
use tiledit_core::{Config, Reader};
use tracing::{debug, warn};

const QUERY_FG: Color = rgb(0, 0, 0);

/// Stages shared by every walk that needs positions.
fn layout_stages(opts: &Options) -> Vec<Box<dyn Stage>> {
    let mut stages: Vec<Box<dyn Stage>> = vec![Box::new(RuneReader), Box::new(Line)];
    if opts.line_wrap.on {
        stages.push(Box::new(LineWrap));
    }
    stages.push(Box::new(Indent::default()));
    stages
}

/// Walk from the line start `start` with `tail` appended to the layout.
fn walk_from(
    reader: &dyn Reader,
    face: &mut dyn GlyphSource,
    opts: &Options,
    bounds: Rect,
    start: usize,
    tail: Box<dyn Stage>,
) -> (Sinks, Option<tiledit_core::RwError>) {
    let mut stages = layout_stages(opts);
    stages.push(tail);
    let mut st = State::new(reader, face, opts, bounds, QUERY_FG);
    st.ri = start;
    st.start_ri = start;
    run(&mut st, &mut stages);
    (st.sinks, st.err)
}

/// Line start of the scroll offset and the height of the rows above the
/// offset's row within that line.
pub(crate) fn view_start(st: &mut State<'_>) -> (usize, Fixed) {
    let reader = st.reader;
    let offset = st.opts.rune_offset.offset.clamp(reader.min(), reader.max());
    let ls = match line_start_index(reader, offset) {
        Ok(ls) => ls,
        Err(err) => {
            st.err = Some(err);
            st.stop = true;
            return (offset, Fixed::ZERO);
        }
    };
    if ls == offset {
        return (ls, Fixed::ZERO);
    }
    let (sinks, err) = walk_from(
        reader,
        &mut *st.face,
        st.opts,
        st.bounds,
        ls,
        Box::new(PointOf { target: offset }),
    );
    if let Some(err) = err {
        st.err = Some(err);
        st.stop = true;
    }
    let y = sinks.point.map_or(0, |p| p.y);
    (ls, Fixed::from_int(y))
}

/// Lays out and paints one text view.
///
/// Layout-affecting changes (bounds, options, content) must be followed by
/// [`measure`](Self::measure) before the next [`draw`](Self::draw).
pub struct Drawer {
    face: FaceRunes<Box<dyn GlyphSource + Send>>,
    opts: Options,
    bounds: Rect,
    need_measure: bool,
}

impl std::fmt::Debug for Drawer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Drawer")
            .field("bounds", &self.bounds)
            .field("need_measure", &self.need_measure)
            .field("opts", &self.opts)
            .finish_non_exhaustive()
    }
}

impl Drawer {
    pub fn new<G>(face: G, opts: Options) -> Self
    where
        G: GlyphSource + Send + 'static,
    {
        let inner: Box<dyn GlyphSource + Send> = Box::new(face);
        Self {
            face: FaceRunes::new(inner, opts.tab_width),
            opts,
            bounds: Rect::default(),
            need_measure: true,
        }
    }

    pub fn with_config<G>(face: G, config: &Config) -> Self
    where
        G: GlyphSource + Send + 'static,
    {
        Self::new(face, Options::from_config(config))
    }

    pub fn options(&self) -> &Options {
        &self.opts
    }

    /// Replace the options; a layout change requires a new measure.
    pub fn set_options(&mut self, opts: Options) {
        if self.opts.layout_differs(&opts) {
            self.need_measure = true;
        }
        self.face.set_tab_width(opts.tab_width);
        self.opts = opts;
    }

    /// Direct access for paint-only fields (colors, cursor, highlights).
    pub fn options_mut(&mut self) -> &mut Options {
        &mut self.opts
    }

    pub fn set_cursor(&mut self, cursor: CursorOpt) {
        self.opts.cursor = cursor;
    }

    pub fn set_colorize_groups(&mut self, groups: Vec<ColorizeGroup>) {
        self.opts.colorize.groups = groups;
    }

    pub fn rune_offset(&self) -> usize {
        self.opts.rune_offset.offset
    }

    pub fn set_rune_offset(&mut self, offset: usize) {
        self.opts.rune_offset.offset = offset;
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        if bounds.dx() != self.bounds.dx() || bounds.dy() != self.bounds.dy() {
            self.need_measure = true;
        }
        self.bounds = bounds;
    }

    /// Call after the content was written to.
    pub fn content_changed(&mut self) {
        self.need_measure = true;
    }

    pub fn need_measure(&self) -> bool {
        self.need_measure
    }

    pub fn line_height(&self) -> i32 {
        self.face.metrics().height.ceil()
    }

    /// Content size in pixels. In scroll-offset mode the content is not
    /// walked and the size is `(1, content length)`.
    pub fn measure(&mut self, r: &dyn Reader) -> Result<Point, DrawError> {
        let size = if self.opts.rune_offset.on {
            Point::new(1, offset_extent(r.len()))
        } else {
            let mut stages = layout_stages(&self.opts);
            stages.push(Box::new(Measure));
            let mut st = State::new(r, &mut self.face, &self.opts, self.bounds, QUERY_FG);
            run(&mut st, &mut stages);
            if let Some(err) = st.err {
                return Err(err.into());
            }
            Point::new(
                st.sinks.max_pen_x.ceil(),
                (st.pen.y + st.line_height).ceil(),
            )
        };
        debug!(width = size.x, height = size.y, "measured content");
        self.need_measure = false;
        Ok(size)
    }

    /// Paint the view into `canvas` with `fg` as the default foreground.
    pub fn draw(&mut self, r: &dyn Reader, canvas: &mut dyn Canvas, fg: Color) -> Result<(), DrawError> {
        if self.need_measure {
            warn!("draw requested before measuring the new layout");
            return Err(DrawError::Measurement);
        }
        let mut stages: Vec<Box<dyn Stage>> = vec![
            Box::new(CurColorsReset),
            Box::new(RuneOffset),
            Box::new(RuneReader),
            Box::new(Colorize::default()),
            Box::new(Line),
        ];
        if self.opts.line_wrap.on {
            stages.push(Box::new(LineWrap));
        }
        stages.push(Box::new(Indent::default()));
        stages.push(Box::new(EarlyExit));
        if self.opts.annotations.on {
            stages.push(Box::new(Annotations::default()));
        }
        stages.push(Box::new(BgFill));
        stages.push(Box::new(DrawRune::default()));
        stages.push(Box::new(CursorPaint::default()));

        let mut st =
            State::new(r, &mut self.face, &self.opts, self.bounds, fg).with_canvas(canvas);
        run(&mut st, &mut stages);
        match st.err {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }

    /// Walk the view (honoring the scroll offset) with `tail` after layout.
    fn query(&mut self, r: &dyn Reader, tail: Vec<Box<dyn Stage>>) -> Result<Sinks, DrawError> {
        let mut stages: Vec<Box<dyn Stage>> = vec![Box::new(RuneOffset)];
        stages.extend(layout_stages(&self.opts));
        stages.extend(tail);
        let mut st = State::new(r, &mut self.face, &self.opts, self.bounds, QUERY_FG);
        run(&mut st, &mut stages);
        match st.err {
            Some(err) => Err(err.into()),
            None => Ok(st.sinks),
        }
    }

    /// Top-left pixel of the pen box of the rune at `i`, in view
    /// coordinates. Offsets past the end map to the end position.
    pub fn point_of(&mut self, r: &dyn Reader, i: usize) -> Result<Point, DrawError> {
        let sinks = self.query(r, vec![Box::new(PointOf { target: i })])?;
        Ok(sinks.point.unwrap_or_default())
    }

    /// Offset of the rune under `p`, in view coordinates.
    pub fn index_of(&mut self, r: &dyn Reader, p: Point) -> Result<usize, DrawError> {
        let sinks = self.query(r, vec![Box::new(IndexOf { target: p })])?;
        Ok(sinks.index.unwrap_or_else(|| r.max()))
    }

    /// `(entry, byte offset)` of the annotation rune under `p`.
    pub fn annotations_index_of(
        &mut self,
        r: &dyn Reader,
        p: Point,
    ) -> Result<Option<(usize, usize)>, DrawError> {
        if !self.opts.annotations.on {
            return Ok(None);
        }
        let sinks = self.query(
            r,
            vec![
                Box::new(Annotations::default()),
                Box::new(AnnotationsIndexOf { target: p }),
            ],
        )?;
        Ok(sinks.annotation_hit)
    }

    /// Offsets of the first visible rune and of the first rune past the
    /// view.
    pub fn visible_range(&mut self, r: &dyn Reader) -> Result<(usize, usize), DrawError> {
        let start = self.index_of(r, Point::new(0, 0))?;
        let end = self.index_of(r, Point::new(0, self.bounds.dy() + self.line_height() - 1))?;
        Ok((start, end.max(start)))
    }

    fn point_from(&mut self, r: &dyn Reader, start: usize, i: usize) -> Result<Point, DrawError> {
        let (sinks, err) = walk_from(
            r,
            &mut self.face,
            &self.opts,
            self.bounds,
            start,
            Box::new(PointOf { target: i }),
        );
        if let Some(err) = err {
            return Err(err.into());
        }
        Ok(sinks.point.unwrap_or_default())
    }

    fn index_from(&mut self, r: &dyn Reader, start: usize, p: Point) -> Result<usize, DrawError> {
        let (sinks, err) = walk_from(
            r,
            &mut self.face,
            &self.opts,
            self.bounds,
            start,
            Box::new(IndexOf { target: p }),
        );
        if let Some(err) = err {
            return Err(err.into());
        }
        Ok(sinks.index.unwrap_or_else(|| r.max()))
    }

    /// Start of the visual row `n` rows above the one holding `offset`.
    pub fn line_offset_up(&mut self, r: &dyn Reader, offset: usize, n: usize) -> Result<usize, DrawError> {
        let lh = self.line_height();
        let mut offset = offset.clamp(r.min(), r.max());
        for _ in 0..n {
            let ls = line_start_index(r, offset)?;
            if ls < offset {
                let y = self.point_from(r, ls, offset)?.y;
                if y > 0 {
                    offset = self.index_from(r, ls, Point::new(0, y - lh))?;
                    continue;
                }
            }
            if ls == r.min() {
                offset = ls;
                break;
            }
            let prev = line_start_index(r, ls - 1)?;
            let y = self.point_from(r, prev, ls - 1)?.y;
            offset = self.index_from(r, prev, Point::new(0, y))?;
        }
        Ok(offset)
    }

    /// Start of the visual row `n` rows below the one holding `offset`.
    pub fn line_offset_down(&mut self, r: &dyn Reader, offset: usize, n: usize) -> Result<usize, DrawError> {
        let offset = offset.clamp(r.min(), r.max());
        let ls = line_start_index(r, offset)?;
        let y = self.point_from(r, ls, offset)?.y;
        let target = y.saturating_add(self.line_height().saturating_mul(offset_extent(n)));
        self.index_from(r, ls, Point::new(0, target))
    }
}

/// Byte or row count as a pixel extent, saturating at `i32::MAX`.
fn offset_extent(len: usize) -> i32 {
    i32::try_from(len).unwrap_or(i32::MAX)
}
