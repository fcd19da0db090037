//! Option record consumed by the drawer.

use crate::canvas::{rgb, Color};
use tiledit_core::constants::{
    DEFAULT_ANNOTATION_MIN_COLUMNS, DEFAULT_TAB_WIDTH, DEFAULT_WRAP_INDICATOR,
};
use tiledit_core::Config;

#[derive(Clone, Debug, PartialEq)]
pub struct LineWrapOpt {
    pub on: bool,
    pub fg: Color,
    pub bg: Color,
    /// Rune drawn at the start of every continuation row.
    pub indicator: char,
}

impl Default for LineWrapOpt {
    fn default() -> Self {
        Self {
            on: false,
            fg: rgb(0x80, 0x80, 0x80),
            bg: rgb(0xee, 0xee, 0xee),
            indicator: DEFAULT_WRAP_INDICATOR,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CursorOpt {
    pub on: bool,
    pub offset: usize,
    /// Falls back to the draw foreground.
    pub fg: Option<Color>,
    pub added_width: i32,
}

impl Default for CursorOpt {
    fn default() -> Self {
        Self {
            on: false,
            offset: 0,
            fg: None,
            added_width: 1,
        }
    }
}

/// Start drawing at the visual row containing `offset`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RuneOffsetOpt {
    pub on: bool,
    pub offset: usize,
}

/// Text shown after the line containing `offset`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Annotation {
    pub offset: usize,
    pub bytes: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SelectedAnnotation {
    pub entry_index: usize,
    pub fg: Color,
    pub bg: Color,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AnnotationsOpt {
    pub on: bool,
    pub fg: Color,
    pub bg: Option<Color>,
    pub selected: Option<SelectedAnnotation>,
    /// Ordered by offset.
    pub entries: Vec<Annotation>,
    pub min_columns: usize,
    pub right_margin_columns: usize,
}

impl Default for AnnotationsOpt {
    fn default() -> Self {
        Self {
            on: false,
            fg: rgb(0x60, 0x60, 0x60),
            bg: None,
            selected: None,
            entries: Vec::new(),
            min_columns: DEFAULT_ANNOTATION_MIN_COLUMNS,
            right_margin_columns: 1,
        }
    }
}

/// Recolors the current rune after the op's own colors are applied.
pub type ProcColor = fn(fg: Color, bg: Option<Color>) -> (Color, Option<Color>);

/// One color change, effective from `offset` until the group's next op.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColorizeOp {
    pub offset: usize,
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub proc_color: Option<ProcColor>,
    /// Paint `bg` across the whole visual line.
    pub line: bool,
}

impl ColorizeOp {
    /// Op that restores default colors.
    pub fn end(offset: usize) -> Self {
        Self {
            offset,
            ..Self::default()
        }
    }
}

/// Ops sorted by offset.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColorizeGroup {
    pub off: bool,
    pub ops: Vec<ColorizeOp>,
}

impl ColorizeGroup {
    pub fn new(ops: Vec<ColorizeOp>) -> Self {
        Self { off: false, ops }
    }

    /// Colors `[start, end)` and resets after.
    pub fn span(start: usize, end: usize, fg: Option<Color>, bg: Option<Color>) -> [ColorizeOp; 2] {
        [
            ColorizeOp {
                offset: start,
                fg,
                bg,
                ..ColorizeOp::default()
            },
            ColorizeOp::end(end),
        ]
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColorizeOpt {
    /// Later groups win where they overlap earlier ones.
    pub groups: Vec<ColorizeGroup>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HighlightColors {
    pub on: bool,
    pub fg: Option<Color>,
    pub bg: Option<Color>,
}

impl HighlightColors {
    fn with_bg(bg: Color) -> Self {
        Self {
            on: true,
            fg: None,
            bg: Some(bg),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CommentLineOpt {
    pub s: String,
    pub fg: Option<Color>,
    pub bg: Option<Color>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CommentBlockOpt {
    pub s: String,
    pub e: String,
    pub fg: Option<Color>,
    pub bg: Option<Color>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StringOpt {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SyntaxHighlightOpt {
    pub comment_line: Option<CommentLineOpt>,
    pub comment_block: Option<CommentBlockOpt>,
    pub string: Option<StringOpt>,
}

/// Everything the drawer reads besides the content and the face.
#[derive(Clone, Debug, PartialEq)]
pub struct Options {
    pub tab_width: usize,
    pub line_wrap: LineWrapOpt,
    pub cursor: CursorOpt,
    pub rune_offset: RuneOffsetOpt,
    pub annotations: AnnotationsOpt,
    pub colorize: ColorizeOpt,
    pub word_highlight: HighlightColors,
    pub parenthesis_highlight: HighlightColors,
    pub syntax_highlight: SyntaxHighlightOpt,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            tab_width: DEFAULT_TAB_WIDTH,
            line_wrap: LineWrapOpt::default(),
            cursor: CursorOpt::default(),
            rune_offset: RuneOffsetOpt::default(),
            annotations: AnnotationsOpt::default(),
            colorize: ColorizeOpt::default(),
            word_highlight: HighlightColors::with_bg(rgb(0xdd, 0xdd, 0xaa)),
            parenthesis_highlight: HighlightColors::with_bg(rgb(0xaa, 0xdd, 0xdd)),
            syntax_highlight: SyntaxHighlightOpt::default(),
        }
    }
}

impl Options {
    /// Defaults adjusted by configuration.
    pub fn from_config(config: &Config) -> Self {
        let mut opts = Self {
            tab_width: config.tab_width.max(1),
            ..Self::default()
        };
        opts.line_wrap.on = config.line_wrap;
        opts.line_wrap.indicator = config.wrap_indicator;
        opts.cursor.added_width = config.cursor_added_width;
        opts.annotations.min_columns = config.annotation_min_columns;
        opts.annotations.right_margin_columns = config.annotation_right_margin_columns;
        opts
    }

    /// True when switching from `self` to `other` can move glyphs.
    pub fn layout_differs(&self, other: &Options) -> bool {
        self.tab_width != other.tab_width
            || self.line_wrap.on != other.line_wrap.on
            || self.line_wrap.indicator != other.line_wrap.indicator
            || self.rune_offset.on != other.rune_offset.on
            || self.annotations.on != other.annotations.on
            || self.annotations.entries != other.annotations.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_flows_into_options() {
        let config = Config {
            tab_width: 4,
            line_wrap: false,
            ..Config::default()
        };
        let opts = Options::from_config(&config);
        assert_eq!(opts.tab_width, 4);
        assert!(!opts.line_wrap.on);
    }

    #[test]
    fn colors_do_not_affect_layout() {
        let a = Options::default();
        let mut b = a.clone();
        b.colorize.groups.push(ColorizeGroup::new(ColorizeGroup::span(0, 2, None, None).to_vec()));
        b.cursor.offset = 9;
        assert!(!a.layout_differs(&b));
        b.line_wrap.on = !a.line_wrap.on;
        assert!(a.layout_differs(&b));
    }
}
