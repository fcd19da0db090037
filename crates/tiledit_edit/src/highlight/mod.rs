//! Colorize group builders: syntax, word, bracket and selection highlight.
//!
//! Each builder returns an independent [`ColorizeGroup`]; later groups win
//! where they overlap, so [`Highlighter::groups`] orders them syntax, word,
//! parenthesis, selection.

mod parenthesis;
mod selection;
mod syntax;
mod word;

pub use parenthesis::{matching_bracket, parenthesis_highlight_group};
pub use selection::{default_selection_colors, selection_group};
pub use syntax::syntax_highlight_group;
pub use word::{word_highlight_group, WordCache};

use crate::error::EditResult;
use tiledit_core::{Config, CursorState, Reader};
use tiledit_draw::{ColorizeGroup, Drawer, HighlightColors};
use tracing::debug;

/// Rebuilds the highlight groups for a view.
#[derive(Debug)]
pub struct Highlighter {
    words: WordCache,
    pub selection: HighlightColors,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self {
            words: WordCache::new(),
            selection: default_selection_colors(),
        }
    }
}

impl Highlighter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop cached state. Readers that report a content revision are
    /// tracked without this; other readers need it after every edit.
    pub fn content_changed(&mut self) {
        self.words.clear();
    }

    /// Groups for the visible part of `r`, using the drawer's options.
    pub fn groups(
        &mut self,
        drawer: &mut Drawer,
        r: &dyn Reader,
        cursor: &CursorState,
        config: &Config,
    ) -> EditResult<Vec<ColorizeGroup>> {
        let range = drawer.visible_range(r)?;
        let opts = drawer.options();
        let mut groups = Vec::with_capacity(4);

        let syntax = &opts.syntax_highlight;
        if syntax.comment_line.is_some() || syntax.comment_block.is_some() || syntax.string.is_some() {
            groups.push(syntax_highlight_group(r, range, config.syntax_window, syntax)?);
        }
        if opts.word_highlight.on {
            let word = self
                .words
                .word_at(r, cursor.index, config.word_highlight_lookup)?;
            if let Some(word) = word {
                groups.push(word_highlight_group(r, word, range, &opts.word_highlight)?);
            }
        }
        if opts.parenthesis_highlight.on {
            groups.push(parenthesis_highlight_group(
                r,
                cursor.index,
                config.parenthesis_window,
                &opts.parenthesis_highlight,
            )?);
        }
        groups.push(selection_group(cursor, &self.selection));
        debug!(groups = groups.len(), start = range.0, end = range.1, "highlight rebuilt");
        Ok(groups)
    }

    /// Rebuild and install the groups on the drawer.
    pub fn apply(
        &mut self,
        drawer: &mut Drawer,
        r: &dyn Reader,
        cursor: &CursorState,
        config: &Config,
    ) -> EditResult<()> {
        let groups = self.groups(drawer, r, cursor, config)?;
        drawer.set_colorize_groups(groups);
        Ok(())
    }
}
