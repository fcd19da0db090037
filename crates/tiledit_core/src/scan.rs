//! Rune scanners over a [`Reader`]: predicate walks, line bounds and words.
//!
//! The plain `*_index_fn` walkers report [`RwError::EndOfRange`] when the
//! reader runs out; the `expand_*` variants clamp to the range edge instead.

use crate::error::{RwError, RwResult};
use crate::rw::{LimitedReader, Reader};

/// Walk forward from `i` until `f(ru) == truth`.
///
/// Returns the offset and encoded size of the matching rune.
pub fn rune_index_fn<F>(r: &dyn Reader, mut i: usize, truth: bool, mut f: F) -> RwResult<(usize, usize)>
where
    F: FnMut(char) -> bool,
{
    loop {
        let (ru, size) = r.read_rune_at(i)?;
        if f(ru) == truth {
            return Ok((i, size));
        }
        i += size;
    }
}

/// Walk backward from `i` until `f(ru) == truth` for the rune ending at the
/// current position. Returns the start offset and size of that rune.
pub fn rune_last_index_fn<F>(
    r: &dyn Reader,
    mut i: usize,
    truth: bool,
    mut f: F,
) -> RwResult<(usize, usize)>
where
    F: FnMut(char) -> bool,
{
    loop {
        let (ru, size) = r.read_last_rune_at(i)?;
        i -= size;
        if f(ru) == truth {
            return Ok((i, size));
        }
    }
}

/// Like [`rune_index_fn`] but returns `max` when nothing matches.
pub fn expand_rune_index_fn<F>(r: &dyn Reader, i: usize, truth: bool, f: F) -> RwResult<usize>
where
    F: FnMut(char) -> bool,
{
    match rune_index_fn(r, i, truth, f) {
        Ok((k, _)) => Ok(k),
        Err(RwError::EndOfRange) => Ok(r.max()),
        Err(err) => Err(err),
    }
}

/// Like [`rune_last_index_fn`] but returns the offset just past the match,
/// or `min` when nothing matches.
pub fn expand_rune_last_index_fn<F>(r: &dyn Reader, i: usize, truth: bool, f: F) -> RwResult<usize>
where
    F: FnMut(char) -> bool,
{
    match rune_last_index_fn(r, i, truth, f) {
        Ok((k, size)) => Ok(k + size),
        Err(RwError::EndOfRange) => Ok(r.min()),
        Err(err) => Err(err),
    }
}

/// Offset just past the previous `'\n'`, or `min`.
pub fn line_start_index(r: &dyn Reader, i: usize) -> RwResult<usize> {
    expand_rune_last_index_fn(r, i, true, |ru| ru == '\n')
}

/// Offset just past the next `'\n'` and `true`, or `max` and `false`.
pub fn line_end_index(r: &dyn Reader, i: usize) -> RwResult<(usize, bool)> {
    match rune_index_fn(r, i, true, |ru| ru == '\n') {
        Ok((k, size)) => Ok((k + size, true)),
        Err(RwError::EndOfRange) => Ok((r.max(), false)),
        Err(err) => Err(err),
    }
}

/// Offset of the next `'\n'` at or after `i`, looking at most `max_dist` bytes.
pub fn newline_index(r: &dyn Reader, i: usize, max_dist: usize) -> RwResult<Option<usize>> {
    let lr = LimitedReader::new(r, i, i.saturating_add(max_dist));
    match rune_index_fn(&lr, i, true, |ru| ru == '\n') {
        Ok((k, _)) => Ok(Some(k)),
        Err(RwError::EndOfRange) => Ok(None),
        Err(err) => Err(err),
    }
}

/// Offset of the last `'\n'` before `i`, looking back at most `max_dist` bytes.
pub fn newline_last_index(r: &dyn Reader, i: usize, max_dist: usize) -> RwResult<Option<usize>> {
    let lr = LimitedReader::new(r, i.saturating_sub(max_dist), i);
    match rune_last_index_fn(&lr, i, true, |ru| ru == '\n') {
        Ok((k, _)) => Ok(Some(k)),
        Err(RwError::EndOfRange) => Ok(None),
        Err(err) => Err(err),
    }
}

/// Start of the line containing `a` and end (past the newline) of the line
/// containing `b`, with whether that newline exists.
pub fn lines_span(r: &dyn Reader, a: usize, b: usize) -> RwResult<(usize, usize, bool)> {
    let start = line_start_index(r, a)?;
    // an end exactly at a line start belongs to the previous line
    let b = if b > a && line_start_index(r, b)? == b { b - 1 } else { b };
    let (end, nl) = line_end_index(r, b)?;
    Ok((start, end, nl))
}

/// Letters, digits and underscore.
pub fn is_word_rune(ru: char) -> bool {
    ru.is_alphanumeric() || ru == '_'
}

/// Whitespace that does not end a line.
pub fn is_space_not_newline(ru: char) -> bool {
    ru != '\n' && ru.is_whitespace()
}

/// End of the leading whitespace of the line starting at `line_start`.
pub fn indent_end_index(r: &dyn Reader, line_start: usize) -> RwResult<usize> {
    expand_rune_index_fn(r, line_start, false, is_space_not_newline)
}

/// Word around `i`, with its start offset.
pub fn word_at_index(r: &dyn Reader, i: usize) -> RwResult<(Vec<u8>, usize)> {
    match r.read_rune_at(i) {
        Ok((ru, _)) if is_word_rune(ru) => {}
        Ok(_) | Err(RwError::EndOfRange) => return Err(RwError::NotFound("word")),
        Err(err) => return Err(err),
    }
    let start = expand_rune_last_index_fn(r, i, false, is_word_rune)?;
    let end = expand_rune_index_fn(r, i, false, is_word_rune)?;
    let bytes = r.read_n_copy(start, end - start)?;
    Ok((bytes, start))
}

/// True when neither rune adjacent to `[i, i+n)` is a word rune.
pub fn word_isolated(r: &dyn Reader, i: usize, n: usize) -> bool {
    if let Ok((ru, _)) = r.read_last_rune_at(i) {
        if is_word_rune(ru) {
            return false;
        }
    }
    if let Ok((ru, _)) = r.read_rune_at(i + n) {
        if is_word_rune(ru) {
            return false;
        }
    }
    true
}
