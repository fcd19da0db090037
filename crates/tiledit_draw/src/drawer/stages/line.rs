use crate::drawer::chain::{Chain, Stage};
use crate::drawer::state::State;
use crate::geom::Fixed;

/// Tracks content line starts and breaks the pen on `'\n'`.
pub(crate) struct Line;

impl Stage for Line {
    fn iter(&mut self, st: &mut State<'_>, chain: &mut Chain<'_>) {
        if st.is_content() {
            st.is_line_start = st.ri == st.start_ri || st.prev_ru == Some('\n');
        }
        chain.next(st);
        if st.is_content() && st.ru == Some('\n') {
            st.new_line();
            st.advance = Fixed::ZERO;
        }
    }
}

/// Soft-wraps runes that would cross the right edge.
///
/// A wrap pushes, in order: a fill rune painting the wrap background to the
/// edge, then (after the line break) the wrap indicator and a glyphless
/// post-wrap marker that lets [`Indent`] pad the continuation.
pub(crate) struct LineWrap;

impl LineWrap {
    fn wrap(&mut self, st: &mut State<'_>, chain: &mut Chain<'_>, ru: char) {
        let opts = st.opts;
        let wrap = &opts.line_wrap;
        let saved = st.colors;
        st.colors.fg = wrap.fg;
        st.colors.bg = Some(wrap.bg);

        let fill = (st.max_x - st.pen.x).max(Fixed::ZERO);
        st.insert_extra(chain, Some(' '), Some(fill));

        st.new_line();
        st.wrapped = true;
        st.insert_extra(chain, Some(wrap.indicator), None);

        st.post_wrap = true;
        st.insert_extra(chain, None, Some(Fixed::ZERO));
        st.post_wrap = false;

        st.colors = saved;
        if ru == '\t' {
            st.advance = st.tab_advance_at(st.pen.x);
        }
    }
}

impl Stage for LineWrap {
    fn iter(&mut self, st: &mut State<'_>, chain: &mut Chain<'_>) {
        if st.is_content() {
            if let Some(ru) = st.ru {
                if ru != '\n' && st.pen.x + st.advance > st.max_x && st.pen.x > st.start_x {
                    self.wrap(st, chain, ru);
                }
            }
        }
        chain.next(st);
    }
}

/// Remembers where a line's leading whitespace ends and indents wrapped
/// continuations to it, plus one tab.
#[derive(Default)]
pub(crate) struct Indent {
    not_starting_spaces: bool,
    indent_x: Fixed,
}

impl Stage for Indent {
    fn iter(&mut self, st: &mut State<'_>, chain: &mut Chain<'_>) {
        if st.is_content() {
            if st.is_line_start {
                self.not_starting_spaces = false;
                self.indent_x = st.start_x;
            }
            if !self.not_starting_spaces {
                match st.ru {
                    Some(' ') | Some('\t') => self.indent_x = st.pen.x + st.advance,
                    _ => self.not_starting_spaces = true,
                }
            }
        } else if st.post_wrap {
            // keep at least ten columns of the continuation visible
            let hi = (st.max_x - st.space_adv * 10).max(st.start_x);
            let target = (self.indent_x + st.tab_adv).min(hi).max(st.start_x);
            st.pen.x = st.pen.x.max(target);
        }
        chain.next(st);
    }
}
