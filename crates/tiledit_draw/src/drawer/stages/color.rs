use crate::drawer::chain::{Chain, Stage};
use crate::drawer::state::State;

/// Resets the rune colors before the colorize stage runs.
pub(crate) struct CurColorsReset;

impl Stage for CurColorsReset {
    fn iter(&mut self, st: &mut State<'_>, chain: &mut Chain<'_>) {
        st.colors.fg = st.colors.start_fg;
        st.colors.bg = None;
        chain.next(st);
    }
}

/// Applies the colorize groups. Each group keeps its own cursor into its
/// ops; groups later in the list overwrite earlier ones.
#[derive(Default)]
pub(crate) struct Colorize {
    next: Vec<usize>,
    current: Vec<Option<usize>>,
}

impl Stage for Colorize {
    fn init(&mut self, st: &mut State<'_>) {
        let n = st.opts.colorize.groups.len();
        self.next = vec![0; n];
        self.current = vec![None; n];
    }

    fn iter(&mut self, st: &mut State<'_>, chain: &mut Chain<'_>) {
        if st.is_content() && st.ru.is_some() {
            let opts = st.opts;
            for (g, group) in opts.colorize.groups.iter().enumerate() {
                if group.off {
                    continue;
                }
                while let Some(op) = group.ops.get(self.next[g]) {
                    if op.offset > st.ri {
                        break;
                    }
                    // line ops left behind by the scroll offset stay unpainted
                    if op.line && op.offset >= st.start_ri {
                        st.colors.line_bg = op.bg;
                    }
                    self.current[g] = Some(self.next[g]);
                    self.next[g] += 1;
                }
                let Some(op) = self.current[g].and_then(|k| group.ops.get(k)) else {
                    continue;
                };
                if let Some(fg) = op.fg {
                    st.colors.fg = fg;
                }
                if !op.line {
                    if let Some(bg) = op.bg {
                        st.colors.bg = Some(bg);
                    }
                }
                if let Some(proc_color) = op.proc_color {
                    let (fg, bg) = proc_color(st.colors.fg, st.colors.bg);
                    st.colors.fg = fg;
                    st.colors.bg = bg;
                }
            }
        }
        chain.next(st);
    }
}

/// Paints pending line and rune backgrounds.
pub(crate) struct BgFill;

impl Stage for BgFill {
    fn iter(&mut self, st: &mut State<'_>, chain: &mut Chain<'_>) {
        if st.ru.is_some() {
            if let Some(color) = st.colors.line_bg.take() {
                let r = st.to_canvas(st.line_rect());
                if let Some(canvas) = st.canvas.as_deref_mut() {
                    canvas.fill(r, color);
                }
            }
            if let Some(color) = st.colors.bg {
                let r = st.to_canvas(st.pen_rect());
                if let Some(canvas) = st.canvas.as_deref_mut() {
                    canvas.fill(r, color);
                }
            }
        }
        chain.next(st);
    }
}
