use crate::canvas::Color;
use crate::drawer::chain::{Chain, Stage};
use crate::drawer::state::State;
use crate::face::Glyph;
use crate::geom::Rect;

/// Draws glyphs one rune late so a following background fill cannot
/// cover the tail of an overhanging glyph.
#[derive(Default)]
pub(crate) struct DrawRune {
    pending: Option<(Glyph, Color)>,
}

impl DrawRune {
    fn flush(&mut self, st: &mut State<'_>) {
        let Some((glyph, color)) = self.pending.take() else {
            return;
        };
        if let Some(canvas) = st.canvas.as_deref_mut() {
            canvas.draw_mask(glyph.dest, &glyph.mask, glyph.mask_pt, color);
        }
    }
}

impl Stage for DrawRune {
    fn iter(&mut self, st: &mut State<'_>, chain: &mut Chain<'_>) {
        self.flush(st);
        if let Some(ru) = st.ru {
            if st.canvas.is_some() {
                let dot = st.dot();
                if let Some(glyph) = st.face.glyph(dot, ru) {
                    self.pending = Some((glyph, st.colors.fg));
                }
            }
        }
        chain.next(st);
    }

    fn end(&mut self, st: &mut State<'_>) {
        self.flush(st);
    }
}

/// Vertical bar at the cursor offset, with square caps `added_width`
/// pixels wider on each side. Painted one rune late, like glyphs.
#[derive(Default)]
pub(crate) struct CursorPaint {
    pending: Option<(Rect, Color)>,
}

impl CursorPaint {
    fn flush(&mut self, st: &mut State<'_>) {
        let Some((bar, color)) = self.pending.take() else {
            return;
        };
        let aw = st.opts.cursor.added_width.max(0);
        let Some(canvas) = st.canvas.as_deref_mut() else {
            return;
        };
        canvas.fill(bar, color);
        if aw > 0 {
            let side = 1 + 2 * aw;
            let x0 = bar.min.x - aw;
            let x1 = bar.max.x + aw;
            canvas.fill(Rect::new(x0, bar.min.y, x1, bar.min.y + side), color);
            canvas.fill(Rect::new(x0, bar.max.y - side, x1, bar.max.y), color);
        }
    }
}

impl Stage for CursorPaint {
    fn iter(&mut self, st: &mut State<'_>, chain: &mut Chain<'_>) {
        self.flush(st);
        let cursor = &st.opts.cursor;
        if cursor.on && st.is_content() && st.ri == cursor.offset {
            let pen = st.pen_rect();
            let bar = Rect::new(pen.min.x, pen.min.y, pen.min.x + 1, pen.max.y);
            let color = cursor.fg.unwrap_or(st.colors.start_fg);
            self.pending = Some((st.to_canvas(bar), color));
        }
        chain.next(st);
    }

    fn end(&mut self, st: &mut State<'_>) {
        self.flush(st);
    }
}
