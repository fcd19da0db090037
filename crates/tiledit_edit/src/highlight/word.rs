//! Highlight every isolated occurrence of the word under the cursor.

use crate::error::EditResult;
use tiledit_core::rw::LimitedReader;
use tiledit_core::scan::{word_at_index, word_isolated};
use tiledit_core::search::index;
use tiledit_core::{FindOpt, Reader, RwError};
use tiledit_draw::{ColorizeGroup, HighlightColors};

/// Word at the cursor, remembered while the cursor and the content
/// revision stay the same. Readers without a revision are looked up every
/// time.
#[derive(Debug, Default)]
pub struct WordCache {
    key: Option<(usize, u64)>,
    word: Option<Vec<u8>>,
}

impl WordCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the cached word.
    pub fn clear(&mut self) {
        self.key = None;
        self.word = None;
    }

    /// Word around `i`, looking at most `lookup` bytes to each side.
    pub fn word_at(&mut self, r: &dyn Reader, i: usize, lookup: usize) -> EditResult<Option<&[u8]>> {
        let key = r.content_revision().map(|rev| (i, rev));
        if key.is_none() || key != self.key {
            let lr = LimitedReader::around(r, i, lookup);
            self.word = match word_at_index(&lr, i) {
                Ok((word, _)) => Some(word),
                Err(RwError::NotFound(_)) => None,
                Err(err) => return Err(err.into()),
            };
            self.key = key;
        }
        Ok(self.word.as_deref())
    }
}

/// Colorize group marking `word` inside `[start, end)`, extended by the word
/// length on both sides so partially visible hits are found.
pub fn word_highlight_group(
    r: &dyn Reader,
    word: &[u8],
    (start, end): (usize, usize),
    colors: &HighlightColors,
) -> EditResult<ColorizeGroup> {
    let mut ops = Vec::new();
    if !colors.on || word.is_empty() {
        return Ok(ColorizeGroup::new(ops));
    }
    let min = start.saturating_sub(word.len()).max(r.min());
    let max = end.saturating_add(word.len()).min(r.max());
    let lr = LimitedReader::new(r, min, max);
    let mut i = min;
    while let Some((k, n)) = index(&lr, i, word, FindOpt::default())? {
        if word_isolated(r, k, n) {
            ops.extend(ColorizeGroup::span(k, k + n, colors.fg, colors.bg));
        }
        i = k + n;
    }
    Ok(ColorizeGroup::new(ops))
}
