//! Matching bracket highlight.

use crate::error::EditResult;
use tiledit_core::rw::LimitedReader;
use tiledit_core::{Reader, RwError};
use tiledit_draw::{ColorizeGroup, HighlightColors};

/// `(partner, is_open)` for bracket runes.
fn bracket(ru: char) -> Option<(char, bool)> {
    match ru {
        '(' => Some((')', true)),
        '[' => Some((']', true)),
        '{' => Some(('}', true)),
        ')' => Some(('(', false)),
        ']' => Some(('[', false)),
        '}' => Some(('{', false)),
        _ => None,
    }
}

/// Bracket at `i`, else the one just before it.
fn bracket_near(r: &dyn Reader, i: usize) -> EditResult<Option<usize>> {
    match r.read_rune_at(i) {
        Ok((ru, _)) if bracket(ru).is_some() => return Ok(Some(i)),
        Ok(_) | Err(RwError::EndOfRange) => {}
        Err(err) => return Err(err.into()),
    }
    match r.read_last_rune_at(i) {
        Ok((ru, size)) if bracket(ru).is_some() => Ok(Some(i - size)),
        Ok(_) | Err(RwError::EndOfRange) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Brackets in the window that sit outside quoted strings.
fn brackets_outside_quotes(r: &dyn Reader) -> EditResult<Vec<(usize, char)>> {
    let mut out = Vec::new();
    let mut quote: Option<char> = None;
    let mut escape = false;
    let mut p = r.min();
    loop {
        let (ru, size) = match r.read_rune_at(p) {
            Ok(v) => v,
            Err(RwError::EndOfRange) => break,
            // window edge cut a rune
            Err(RwError::InvalidEncoding) => {
                p += 1;
                continue;
            }
            Err(err) => return Err(err.into()),
        };
        match quote {
            Some(_) if escape => escape = false,
            Some(_) if ru == '\\' => escape = true,
            Some(q) if ru == q => quote = None,
            // single and double quoted strings end with the line
            Some(q) if ru == '\n' && q != '`' => quote = None,
            Some(_) => {}
            None => match ru {
                '"' | '\'' | '`' => quote = Some(ru),
                _ if bracket(ru).is_some() => out.push((p, ru)),
                _ => {}
            },
        }
        p += size;
    }
    Ok(out)
}

/// Offsets of the bracket near `i` and its partner, sorted. Only the
/// `window` bytes on each side of the bracket are examined.
pub fn matching_bracket(r: &dyn Reader, i: usize, window: usize) -> EditResult<Option<(usize, usize)>> {
    let Some(k) = bracket_near(r, i)? else {
        return Ok(None);
    };
    let lr = LimitedReader::around(r, k, window);
    let tokens = brackets_outside_quotes(&lr)?;
    let Ok(pos) = tokens.binary_search_by_key(&k, |(o, _)| *o) else {
        // inside a string
        return Ok(None);
    };
    let Some((_, open)) = bracket(tokens[pos].1) else {
        return Ok(None);
    };

    let mut stack = vec![tokens[pos].1];
    let rest: Box<dyn Iterator<Item = &(usize, char)>> = if open {
        Box::new(tokens[pos + 1..].iter())
    } else {
        Box::new(tokens[..pos].iter().rev())
    };
    for &(o, ru) in rest {
        let Some((partner, is_open)) = bracket(ru) else {
            continue;
        };
        if is_open == open {
            stack.push(ru);
            continue;
        }
        match stack.pop() {
            Some(top) if top == partner => {}
            _ => return Ok(None),
        }
        if stack.is_empty() {
            return Ok(Some((k.min(o), k.max(o))));
        }
    }
    Ok(None)
}

/// Colorize group marking both brackets of the pair around `i`.
pub fn parenthesis_highlight_group(
    r: &dyn Reader,
    i: usize,
    window: usize,
    colors: &HighlightColors,
) -> EditResult<ColorizeGroup> {
    let mut ops = Vec::new();
    if colors.on {
        if let Some((a, b)) = matching_bracket(r, i, window)? {
            ops.extend(ColorizeGroup::span(a, a + 1, colors.fg, colors.bg));
            ops.extend(ColorizeGroup::span(b, b + 1, colors.fg, colors.bg));
        }
    }
    Ok(ColorizeGroup::new(ops))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiledit_core::RopeBuffer;

    #[test]
    fn matches_forward_and_backward() {
        let buf = RopeBuffer::new(r#"f(a[1], ")")"#);
        assert_eq!(matching_bracket(&buf, 1, 5000), Ok(Some((1, 11))));
        assert_eq!(matching_bracket(&buf, 12, 5000), Ok(Some((1, 11))));
        assert_eq!(matching_bracket(&buf, 4, 5000), Ok(Some((3, 5))));
        assert_eq!(matching_bracket(&buf, 0, 5000), Ok(None));
        // the bracket inside the string has no partner
        assert_eq!(matching_bracket(&buf, 9, 5000), Ok(None));
    }

    #[test]
    fn nested_and_mismatched() {
        let buf = RopeBuffer::new("{[()]}(]");
        assert_eq!(matching_bracket(&buf, 0, 5000), Ok(Some((0, 5))));
        assert_eq!(matching_bracket(&buf, 2, 5000), Ok(Some((2, 3))));
        assert_eq!(matching_bracket(&buf, 6, 5000), Ok(None));
    }

    #[test]
    fn partner_outside_window_is_ignored() {
        let text = format!("({})", "x".repeat(20));
        let buf = RopeBuffer::new(&text);
        assert_eq!(matching_bracket(&buf, 0, 10), Ok(None));
        assert_eq!(matching_bracket(&buf, 0, 30), Ok(Some((0, 21))));
    }

    #[test]
    fn group_marks_both_brackets() {
        let buf = RopeBuffer::new("(x)");
        let colors = HighlightColors {
            on: true,
            fg: None,
            bg: Some(tiledit_draw::rgb(9, 9, 9)),
        };
        let group = parenthesis_highlight_group(&buf, 0, 5000, &colors).expect("group");
        let offsets: Vec<usize> = group.ops.iter().map(|op| op.offset).collect();
        assert_eq!(offsets, vec![0, 1, 2, 3]);
    }
}
