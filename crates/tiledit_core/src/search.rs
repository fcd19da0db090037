//! Substring search over a [`Reader`], optionally folding case and
//! diacritics, processed in cancellable chunks.
//!
//! Matches are reported as `(offset, len)` in original buffer bytes. With
//! folding enabled the matched length can differ from the query length
//! (`"e"` matches the two-byte `"é"`).

use crate::cancel::CancelToken;
use crate::constants::DEFAULT_SEARCH_CHUNK_SIZE;
use crate::error::{RwError, RwResult};
use crate::rw::Reader;
use tracing::debug;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Folding options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FindOpt {
    pub ignore_case: bool,
    pub ignore_diacritics: bool,
}

impl FindOpt {
    pub fn folding(&self) -> bool {
        self.ignore_case || self.ignore_diacritics
    }
}

/// First match at or after `i`.
pub fn index(r: &dyn Reader, i: usize, sep: &[u8], opt: FindOpt) -> RwResult<Option<(usize, usize)>> {
    index_ctx(&CancelToken::new(), r, i, sep, opt, DEFAULT_SEARCH_CHUNK_SIZE)
}

/// Last match ending at or before `i`.
pub fn last_index(
    r: &dyn Reader,
    i: usize,
    sep: &[u8],
    opt: FindOpt,
) -> RwResult<Option<(usize, usize)>> {
    last_index_ctx(&CancelToken::new(), r, i, sep, opt, DEFAULT_SEARCH_CHUNK_SIZE)
}

fn overlap(sep: &[u8], opt: FindOpt) -> usize {
    if opt.folding() {
        sep.len().saturating_mul(4)
    } else {
        sep.len().saturating_sub(1)
    }
}

/// First offset `>= i` that starts a rune.
fn align(r: &dyn Reader, mut i: usize) -> usize {
    while i < r.max() && matches!(r.read_rune_at(i), Err(RwError::InvalidEncoding)) {
        i += 1;
    }
    i.min(r.max())
}

/// Chunked forward search. The token is checked before every chunk.
pub fn index_ctx(
    cancel: &CancelToken,
    r: &dyn Reader,
    i: usize,
    sep: &[u8],
    opt: FindOpt,
    chunk: usize,
) -> RwResult<Option<(usize, usize)>> {
    if i < r.min() || i > r.max() {
        return Err(RwError::OutOfRange);
    }
    if sep.is_empty() {
        return Ok(Some((i, 0)));
    }
    let chunk = chunk.max(1);
    let over = overlap(sep, opt);
    let mut start = i;
    while start < r.max() {
        if cancel.is_cancelled() {
            debug!(offset = start, "search cancelled");
            return Err(RwError::Cancelled);
        }
        let end = align(r, start.saturating_add(chunk).saturating_add(over).min(r.max()));
        let bytes = r.read_n_fast(start, end - start)?;
        if let Some((k, n)) = find_in(&bytes, sep, opt, false)? {
            return Ok(Some((start + k, n)));
        }
        if end >= r.max() {
            break;
        }
        start = align(r, start + chunk).max(start + 1);
    }
    Ok(None)
}

/// Chunked reverse search. The token is checked before every chunk.
pub fn last_index_ctx(
    cancel: &CancelToken,
    r: &dyn Reader,
    i: usize,
    sep: &[u8],
    opt: FindOpt,
    chunk: usize,
) -> RwResult<Option<(usize, usize)>> {
    if i < r.min() || i > r.max() {
        return Err(RwError::OutOfRange);
    }
    if sep.is_empty() {
        return Ok(Some((i, 0)));
    }
    let chunk = chunk.max(1);
    let over = overlap(sep, opt);
    let mut end = i;
    while end > r.min() {
        if cancel.is_cancelled() {
            debug!(offset = end, "search cancelled");
            return Err(RwError::Cancelled);
        }
        let start = align(r, end.saturating_sub(chunk.saturating_add(over)).max(r.min()));
        let bytes = r.read_n_fast(start, end - start)?;
        if let Some((k, n)) = find_in(&bytes, sep, opt, true)? {
            return Ok(Some((start + k, n)));
        }
        if start <= r.min() {
            break;
        }
        let next = align(r, start + over);
        if next >= end {
            break;
        }
        end = next;
    }
    Ok(None)
}

/// Search inside one chunk.
fn find_in(hay: &[u8], sep: &[u8], opt: FindOpt, reverse: bool) -> RwResult<Option<(usize, usize)>> {
    if !opt.folding() {
        let mut windows = hay.windows(sep.len());
        let pos = if reverse {
            windows.rposition(|w| w == sep)
        } else {
            windows.position(|w| w == sep)
        };
        return Ok(pos.map(|k| (k, sep.len())));
    }
    let hay = std::str::from_utf8(hay).map_err(|_| RwError::InvalidEncoding)?;
    let sep = std::str::from_utf8(sep).map_err(|_| RwError::InvalidEncoding)?;
    let folded = Folded::new(hay, opt);
    let needle = Folded::new(sep, opt).text;
    if needle.is_empty() {
        return Ok(None);
    }
    let pos = if reverse {
        folded.text.rfind(&needle)
    } else {
        folded.text.find(&needle)
    };
    Ok(pos.map(|k| {
        let start = folded.starts[k];
        let end = folded.ends[k + needle.len() - 1];
        (start, end - start)
    }))
}

/// Folded text plus, per folded byte, the original rune span it came from.
struct Folded {
    text: String,
    starts: Vec<usize>,
    ends: Vec<usize>,
}

impl Folded {
    fn new(s: &str, opt: FindOpt) -> Self {
        let mut out = Self {
            text: String::with_capacity(s.len()),
            starts: Vec::with_capacity(s.len()),
            ends: Vec::with_capacity(s.len()),
        };
        let mut scratch = String::new();
        for (o, ru) in s.char_indices() {
            scratch.clear();
            fold_rune(ru, opt, &mut scratch);
            out.text.push_str(&scratch);
            let end = o + ru.len_utf8();
            for _ in 0..scratch.len() {
                out.starts.push(o);
                out.ends.push(end);
            }
        }
        out
    }
}

/// Lowercase, decompose, strip marks and recompose a single rune.
pub fn fold_rune(ru: char, opt: FindOpt, out: &mut String) {
    if !opt.ignore_diacritics {
        if opt.ignore_case {
            out.extend(ru.to_lowercase());
        } else {
            out.push(ru);
        }
        return;
    }
    let lowered: String = if opt.ignore_case {
        ru.to_lowercase().collect()
    } else {
        ru.to_string()
    };
    out.extend(lowered.nfd().filter(|c| !is_combining_mark(*c)).nfc());
}

/// Fold a whole string the way searches do.
pub fn fold_str(s: &str, opt: FindOpt) -> String {
    let mut out = String::with_capacity(s.len());
    for ru in s.chars() {
        fold_rune(ru, opt, &mut out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rw::RopeBuffer;

    const FOLD: FindOpt = FindOpt {
        ignore_case: true,
        ignore_diacritics: true,
    };

    #[test]
    fn plain_search_both_directions() {
        let buf = RopeBuffer::new("abcabc");
        let opt = FindOpt::default();
        assert_eq!(index(&buf, 0, b"bc", opt), Ok(Some((1, 2))));
        assert_eq!(index(&buf, 2, b"bc", opt), Ok(Some((4, 2))));
        assert_eq!(index(&buf, 5, b"bc", opt), Ok(None));
        assert_eq!(last_index(&buf, 6, b"bc", opt), Ok(Some((4, 2))));
        assert_eq!(last_index(&buf, 5, b"bc", opt), Ok(Some((1, 2))));
        assert_eq!(last_index(&buf, 2, b"bc", opt), Ok(None));
    }

    #[test]
    fn folding_maps_back_to_original_offsets() {
        let buf = RopeBuffer::new("xx CAFÉ y");
        assert_eq!(index(&buf, 0, "cafe".as_bytes(), FOLD), Ok(Some((3, 5))));
        assert_eq!(index(&buf, 0, "café".as_bytes(), FindOpt::default()), Ok(None));
        let case_only = FindOpt {
            ignore_case: true,
            ignore_diacritics: false,
        };
        assert_eq!(index(&buf, 0, "cafe".as_bytes(), case_only), Ok(None));
        assert_eq!(index(&buf, 0, "café".as_bytes(), case_only), Ok(Some((3, 5))));
        assert_eq!(last_index(&buf, buf.len(), b"E", FOLD), Ok(Some((6, 2))));
    }

    #[test]
    fn matches_straddling_chunk_boundaries_are_found() {
        let text = format!("{}needle{}", "a".repeat(61), "b".repeat(70));
        let buf = RopeBuffer::new(&text);
        let cancel = CancelToken::new();
        for chunk in [8, 16, 63, 64] {
            assert_eq!(
                index_ctx(&cancel, &buf, 0, b"needle", FindOpt::default(), chunk),
                Ok(Some((61, 6))),
                "chunk {chunk}"
            );
            assert_eq!(
                last_index_ctx(&cancel, &buf, buf.len(), b"needle", FindOpt::default(), chunk),
                Ok(Some((61, 6))),
                "chunk {chunk}"
            );
            assert_eq!(
                index_ctx(&cancel, &buf, 0, b"NEEDLE", FOLD, chunk),
                Ok(Some((61, 6))),
                "chunk {chunk}"
            );
        }
    }

    #[test]
    fn multibyte_chunks_stay_aligned() {
        let text = format!("{}ü{}", "é".repeat(40), "é".repeat(40));
        let buf = RopeBuffer::new(&text);
        let cancel = CancelToken::new();
        assert_eq!(
            index_ctx(&cancel, &buf, 0, "U".as_bytes(), FOLD, 7),
            Ok(Some((80, 2)))
        );
    }

    #[test]
    fn cancelled_search_returns_error() {
        let buf = RopeBuffer::new("hello");
        let cancel = CancelToken::new();
        cancel.cancel();
        assert_eq!(
            index_ctx(&cancel, &buf, 0, b"o", FindOpt::default(), 2),
            Err(RwError::Cancelled)
        );
    }

    #[test]
    fn fold_str_strips_marks() {
        assert_eq!(fold_str("Ñandú", FOLD), "nandu");
        assert_eq!(fold_str("e\u{301}", FOLD), "e");
    }
}
