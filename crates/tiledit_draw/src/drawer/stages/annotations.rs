use crate::drawer::chain::{Chain, Stage};
use crate::drawer::state::State;
use crate::geom::Point;

/// Emits queued annotation entries after the end of their line.
#[derive(Default)]
pub(crate) struct Annotations {
    next_entry: usize,
    queue: Vec<usize>,
}

impl Annotations {
    fn emit(&mut self, st: &mut State<'_>, chain: &mut Chain<'_>) {
        let opts = st.opts;
        let ann = &opts.annotations;
        let queue = std::mem::take(&mut self.queue);
        let saved = st.colors;
        let limit = st.max_x - st.space_adv * ann.right_margin_columns as i64;
        let min_x = st.start_x + st.space_adv * ann.min_columns as i64;

        st.colors.fg = ann.fg;
        st.colors.bg = ann.bg;
        st.insert_extra(chain, Some('\t'), None);
        while st.pen.x < min_x && st.pen.x + st.space_adv <= limit {
            st.insert_extra(chain, Some(' '), None);
        }

        'entries: for (k, &ei) in queue.iter().enumerate() {
            let Some(entry) = ann.entries.get(ei) else {
                continue;
            };
            if k > 0 {
                st.colors.fg = ann.fg;
                st.colors.bg = ann.bg;
                if st.pen.x + st.space_adv > limit {
                    break;
                }
                st.insert_extra(chain, Some(' '), None);
            }
            match &ann.selected {
                Some(sel) if sel.entry_index == ei => {
                    st.colors.fg = sel.fg;
                    st.colors.bg = Some(sel.bg);
                }
                _ => {
                    st.colors.fg = ann.fg;
                    st.colors.bg = ann.bg;
                }
            }
            let text = String::from_utf8_lossy(&entry.bytes);
            for (boff, ru) in text.char_indices() {
                let ru = if ru == '\n' || ru == '\t' { ' ' } else { ru };
                let adv = st.advance_for(Some(ru));
                if st.pen.x + adv > limit {
                    break 'entries;
                }
                st.annotation = Some((ei, boff));
                st.insert_extra(chain, Some(ru), Some(adv));
            }
        }

        st.annotation = None;
        st.colors = saved;
    }
}

impl Stage for Annotations {
    fn init(&mut self, st: &mut State<'_>) {
        self.next_entry = st
            .opts
            .annotations
            .entries
            .partition_point(|e| e.offset < st.start_ri);
        self.queue.clear();
    }

    fn iter(&mut self, st: &mut State<'_>, chain: &mut Chain<'_>) {
        if st.is_content() {
            let opts = st.opts;
            while let Some(entry) = opts.annotations.entries.get(self.next_entry) {
                if entry.offset > st.ri {
                    break;
                }
                self.queue.push(self.next_entry);
                self.next_entry += 1;
            }
            if matches!(st.ru, None | Some('\n')) && !self.queue.is_empty() {
                self.emit(st, chain);
            }
        }
        chain.next(st);
    }
}

/// Hit-tests annotation runes against `target`.
pub(crate) struct AnnotationsIndexOf {
    pub target: Point,
}

impl Stage for AnnotationsIndexOf {
    fn iter(&mut self, st: &mut State<'_>, chain: &mut Chain<'_>) {
        if st.sinks.annotation_hit.is_none() {
            if let Some(hit) = st.annotation {
                if st.pen_rect().contains(self.target) {
                    st.sinks.annotation_hit = Some(hit);
                    st.stop = true;
                }
            } else if st.is_content() && st.pen.floor().y > self.target.y {
                st.stop = true;
                return;
            }
        }
        chain.next(st);
    }
}
