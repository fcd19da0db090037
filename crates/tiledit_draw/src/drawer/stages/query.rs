use crate::drawer::chain::{Chain, Stage};
use crate::drawer::state::State;
use crate::geom::Point;

/// Records the right-most pen extent.
pub(crate) struct Measure;

impl Stage for Measure {
    fn iter(&mut self, st: &mut State<'_>, chain: &mut Chain<'_>) {
        st.sinks.max_pen_x = st.sinks.max_pen_x.max(st.pen.x + st.advance);
        chain.next(st);
    }
}

/// Pen position of the first content rune at or after `target`.
pub(crate) struct PointOf {
    pub target: usize,
}

impl Stage for PointOf {
    fn iter(&mut self, st: &mut State<'_>, chain: &mut Chain<'_>) {
        if st.is_content() && st.ri >= self.target {
            st.sinks.point = Some(st.pen.floor());
            st.stop = true;
            return;
        }
        chain.next(st);
    }
}

/// Offset of the content rune whose pen box holds `target`.
///
/// A point right of a row's last rune resolves to that last rune (the
/// `'\n'` for terminated rows); a point above the first row resolves to
/// the first rune, and one below everything resolves to the end.
pub(crate) struct IndexOf {
    pub target: Point,
}

impl Stage for IndexOf {
    fn iter(&mut self, st: &mut State<'_>, chain: &mut Chain<'_>) {
        if st.is_content() {
            let pen = st.pen_rect();
            if self.target.y < pen.min.y {
                st.sinks.index = Some(st.sinks.best_index.unwrap_or(st.ri));
                st.stop = true;
                return;
            }
            if self.target.y < pen.max.y {
                st.sinks.best_index = Some(st.ri);
                if self.target.x < pen.max.x {
                    st.sinks.index = Some(st.ri);
                    st.stop = true;
                    return;
                }
            }
        }
        chain.next(st);
    }

    fn end(&mut self, st: &mut State<'_>) {
        if st.sinks.index.is_none() {
            st.sinks.index = Some(st.sinks.best_index.unwrap_or(st.ri));
        }
    }
}
