use tiledit_core::CursorState;
use tiledit_draw::{rgb, ColorizeGroup, HighlightColors};

/// Colors used when the host does not pick its own.
pub fn default_selection_colors() -> HighlightColors {
    HighlightColors {
        on: true,
        fg: None,
        bg: Some(rgb(0xee, 0xee, 0x9e)),
    }
}

/// Colorize group painting the active selection.
pub fn selection_group(cursor: &CursorState, colors: &HighlightColors) -> ColorizeGroup {
    match cursor.selection() {
        Some((a, b)) if colors.on => {
            ColorizeGroup::new(ColorizeGroup::span(a, b, colors.fg, colors.bg).to_vec())
        }
        _ => ColorizeGroup::default(),
    }
}
