//! Comment and string highlight from a single forward scan.

use crate::error::EditResult;
use tiledit_core::rw::LimitedReader;
use tiledit_core::{Reader, RwError};
use tiledit_draw::options::SyntaxHighlightOpt;
use tiledit_draw::{ColorizeGroup, ColorizeOp};

/// Scan from `window` bytes before `start` up to `end` and color comments
/// and quoted strings. Spans still open at `end` run to the end of the
/// scanned range.
pub fn syntax_highlight_group(
    r: &dyn Reader,
    (start, end): (usize, usize),
    window: usize,
    opt: &SyntaxHighlightOpt,
) -> EditResult<ColorizeGroup> {
    let lr = LimitedReader::new(r, start.saturating_sub(window), end);
    let mut lo = lr.min();
    // skip a rune cut by the window start
    while lo < lr.max() && matches!(lr.read_rune_at(lo), Err(RwError::InvalidEncoding)) {
        lo += 1;
    }
    let bytes = lr.read_n_copy(lo, lr.max() - lo)?;
    let mut ops = Vec::new();
    for (a, b, kind) in scan(&bytes, opt) {
        let (fg, bg) = match kind {
            Span::LineComment => opt.comment_line.as_ref().map(|c| (c.fg, c.bg)),
            Span::BlockComment => opt.comment_block.as_ref().map(|c| (c.fg, c.bg)),
            Span::String => opt.string.as_ref().map(|s| (s.fg, s.bg)),
        }
        .unwrap_or_default();
        ops.push(ColorizeOp {
            offset: lo + a,
            fg,
            bg,
            ..ColorizeOp::default()
        });
        ops.push(ColorizeOp::end(lo + b));
    }
    Ok(ColorizeGroup::new(ops))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Span {
    LineComment,
    BlockComment,
    String,
}

fn find_from(hay: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    hay.get(from..)?
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|k| from + k)
}

/// Byte spans of comments and strings in `b`.
fn scan(b: &[u8], opt: &SyntaxHighlightOpt) -> Vec<(usize, usize, Span)> {
    let line = opt
        .comment_line
        .as_ref()
        .map(|c| c.s.as_bytes())
        .filter(|s| !s.is_empty());
    let block = opt
        .comment_block
        .as_ref()
        .map(|c| (c.s.as_bytes(), c.e.as_bytes()))
        .filter(|(s, e)| !s.is_empty() && !e.is_empty());
    let strings = opt.string.is_some();

    let mut out = Vec::new();
    let mut i = 0;
    while i < b.len() {
        if let Some(s) = line.filter(|s| b[i..].starts_with(s)) {
            let end = find_from(b, i + s.len(), b"\n").unwrap_or(b.len());
            out.push((i, end, Span::LineComment));
            i = end;
            continue;
        }
        if let Some((s, e)) = block.filter(|(s, _)| b[i..].starts_with(s)) {
            let end = find_from(b, i + s.len(), e).map_or(b.len(), |k| k + e.len());
            out.push((i, end, Span::BlockComment));
            i = end;
            continue;
        }
        if strings && matches!(b[i], b'"' | b'\'' | b'`') {
            let q = b[i];
            let mut k = i + 1;
            let end = loop {
                match b.get(k) {
                    None => break b.len(),
                    Some(b'\\') => k += 2,
                    Some(&c) if c == q => break k + 1,
                    Some(b'\n') if q != b'`' => break k,
                    Some(_) => k += 1,
                }
            };
            let end = end.min(b.len());
            out.push((i, end, Span::String));
            i = end;
            continue;
        }
        i += 1;
    }
    out
}
