//! `<path>(:<line>(:<column>)?)?` references found in text.

use crate::constants::DEFAULT_NEWLINE_SCAN_MAX;
use crate::error::{RwError, RwResult};
use crate::rw::{LimitedReader, Reader};
use serde::{Deserialize, Serialize};
use url::Url;

/// A file reference parsed out of content. `offset`/`len` locate the
/// reference text in the scanned reader; `line` and `column` are 0 when
/// absent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilePos {
    pub filename: String,
    pub offset: usize,
    pub len: usize,
    pub line: u32,
    pub column: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ScanState {
    Normal,
    Escape,
    Quote(char),
}

const FILE_SCHEME: &str = "file://";

/// Parse a single file reference.
///
/// Backslash escapes one rune, single or double quotes group a path with
/// spaces, and a `file://` prefix is decoded as a URL.
pub fn parse_file_pos(s: &str) -> RwResult<FilePos> {
    let (is_url, body) = match s.strip_prefix(FILE_SCHEME) {
        Some(rest) => (true, rest),
        None => (false, s),
    };

    let mut stack = vec![ScanState::Normal];
    let mut path = String::new();
    let mut suffix = "";
    for (k, ru) in body.char_indices() {
        match stack.last().copied().unwrap_or(ScanState::Normal) {
            ScanState::Escape => {
                path.push(ru);
                stack.pop();
            }
            ScanState::Quote(q) if ru == q => {
                stack.pop();
            }
            ScanState::Quote(_) if ru == '\\' => stack.push(ScanState::Escape),
            ScanState::Quote(_) => path.push(ru),
            ScanState::Normal => match ru {
                '\\' => stack.push(ScanState::Escape),
                '"' | '\'' => stack.push(ScanState::Quote(ru)),
                ':' => {
                    suffix = &body[k..];
                    break;
                }
                c if c.is_whitespace() => break,
                c => path.push(c),
            },
        }
    }
    if path.is_empty() {
        return Err(RwError::NotFound("file position"));
    }

    let (line, rest) = parse_colon_number(suffix);
    let (column, _) = if line > 0 { parse_colon_number(rest) } else { (0, rest) };

    let filename = if is_url {
        Url::parse(&format!("{FILE_SCHEME}{path}"))
            .ok()
            .and_then(|u| u.to_file_path().ok())
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or(path)
    } else {
        path
    };

    Ok(FilePos {
        filename,
        offset: 0,
        len: s.len(),
        line,
        column,
    })
}

/// `":123..."` -> `(123, "...")`; anything else -> `(0, s)`.
fn parse_colon_number(s: &str) -> (u32, &str) {
    let Some(rest) = s.strip_prefix(':') else {
        return (0, s);
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    match rest[..digits].parse() {
        Ok(n) => (n, &rest[digits..]),
        Err(_) => (0, s),
    }
}

fn is_path_rune(ru: char) -> bool {
    !ru.is_whitespace()
        && !matches!(
            ru,
            '"' | '\'' | '`' | '(' | ')' | '[' | ']' | '{' | '}' | '<' | '>' | ',' | ';'
        )
}

/// Expand around `i` to the enclosing file reference and parse it.
pub fn file_pos_at(r: &dyn Reader, i: usize) -> RwResult<FilePos> {
    let lr = LimitedReader::around(r, i, DEFAULT_NEWLINE_SCAN_MAX);

    let mut start = i;
    loop {
        match lr.read_last_rune_at(start) {
            Ok((ru, n)) if is_path_rune(ru) => start -= n,
            Ok((ru, n)) if ru.is_whitespace() && ru != '\n' => match lr.read_last_rune_at(start - n) {
                Ok(('\\', m)) => start -= n + m,
                Ok(_) | Err(RwError::EndOfRange) => break,
                Err(err) => return Err(err),
            },
            Ok(_) | Err(RwError::EndOfRange) => break,
            Err(err) => return Err(err),
        }
    }

    let mut end = i;
    loop {
        match lr.read_rune_at(end) {
            Ok(('\\', n)) => match lr.read_rune_at(end + n) {
                Ok((_, m)) => end += n + m,
                Err(RwError::EndOfRange) => break,
                Err(err) => return Err(err),
            },
            Ok((ru, n)) if is_path_rune(ru) => end += n,
            Ok(_) | Err(RwError::EndOfRange) => break,
            Err(err) => return Err(err),
        }
    }

    if start == end {
        return Err(RwError::NotFound("file position"));
    }
    let bytes = lr.read_n_copy(start, end - start)?;
    let text = String::from_utf8(bytes).map_err(|_| RwError::InvalidEncoding)?;
    let mut fp = parse_file_pos(&text)?;
    fp.offset = start;
    fp.len = end - start;
    Ok(fp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rw::RopeBuffer;

    #[test]
    fn parses_line_and_column() {
        let fp = parse_file_pos("src/main.rs:12:5").expect("parse");
        assert_eq!(fp.filename, "src/main.rs");
        assert_eq!((fp.line, fp.column), (12, 5));
        let fp = parse_file_pos("notes.txt").expect("parse");
        assert_eq!((fp.line, fp.column), (0, 0));
        let fp = parse_file_pos("notes.txt:").expect("parse");
        assert_eq!(fp.line, 0);
    }

    #[test]
    fn handles_escapes_and_quotes() {
        let fp = parse_file_pos(r"my\ file.txt:3").expect("parse");
        assert_eq!(fp.filename, "my file.txt");
        assert_eq!(fp.line, 3);
        let fp = parse_file_pos("\"a b:c.txt\":7:1").expect("parse");
        assert_eq!(fp.filename, "a b:c.txt");
        assert_eq!((fp.line, fp.column), (7, 1));
    }

    #[cfg(unix)]
    #[test]
    fn decodes_file_urls() {
        let fp = parse_file_pos("file:///tmp/a%20b.txt:2").expect("parse");
        assert_eq!(fp.filename, "/tmp/a b.txt");
        assert_eq!(fp.line, 2);
    }

    #[test]
    fn empty_path_is_not_found() {
        assert_eq!(parse_file_pos(":12"), Err(RwError::NotFound("file position")));
    }

    #[test]
    fn file_pos_at_expands_around_offset() {
        let buf = RopeBuffer::new("open (src/lib.rs:10) now");
        let fp = file_pos_at(&buf, 9).expect("file pos");
        assert_eq!(fp.filename, "src/lib.rs");
        assert_eq!(fp.line, 10);
        assert_eq!((fp.offset, fp.len), (6, 13));
        assert_eq!(file_pos_at(&buf, 5), Err(RwError::NotFound("file position")));
    }

    #[test]
    fn file_pos_at_follows_escaped_spaces() {
        let buf = RopeBuffer::new(r"see a\ b.txt:4 ok");
        let fp = file_pos_at(&buf, 10).expect("file pos");
        assert_eq!(fp.filename, "a b.txt");
        assert_eq!(fp.offset, 4);
        assert_eq!(fp.line, 4);
    }
}
