//! Line and block comment toggling.

use crate::commands::edit::line_starts;
use crate::ctx::{CommentSym, EditCtx};
use crate::error::{EditError, EditResult};
use tiledit_core::scan::{indent_end_index, line_end_index, lines_span};
use tiledit_core::{CursorState, RwError};

struct Line {
    start: usize,
    indent_end: usize,
    /// Offset of the `'\n'`, or the content end.
    end: usize,
}

fn lines(ctx: &EditCtx<'_>) -> EditResult<(usize, usize, Vec<Line>)> {
    let (a, b) = ctx.cursor.selection_or_cursor();
    let (start, end, _) = lines_span(ctx.reader(), a, b)?;
    let mut out = Vec::new();
    for ls in line_starts(ctx, start, end)? {
        let indent_end = indent_end_index(ctx.reader(), ls)?;
        let (le, nl) = line_end_index(ctx.reader(), ls)?;
        out.push(Line {
            start: ls,
            indent_end,
            end: if nl { le - 1 } else { le },
        });
    }
    Ok((start, end, out))
}

fn comment_sym(ctx: &EditCtx<'_>) -> EditResult<CommentSym> {
    ctx.fns
        .comment_line_sym()
        .ok_or(EditError::Unsupported("comment"))
}

/// Shift the cursor after a single-line edit at `at`, or re-span the
/// selection over the edited lines.
fn place_cursor(
    ctx: &mut EditCtx<'_>,
    before: CursorState,
    single: Option<usize>,
    span: (usize, usize),
    delta: isize,
) -> EditResult<()> {
    let shift = |i: usize, at: usize| {
        if i > at {
            i.saturating_add_signed(delta).max(at)
        } else {
            i
        }
    };
    match single {
        Some(at) => {
            ctx.cursor.set(CursorState {
                index: shift(before.index, at),
                anchor: shift(before.anchor, at),
                selection_on: before.selection_on,
            });
            Ok(())
        }
        None => ctx.select(span.0, span.1.saturating_add_signed(delta)),
    }
}

/// Comment out the selected lines. Blank lines are skipped; line comments
/// go at the smallest indentation among the affected lines.
pub fn comment(ctx: &mut EditCtx<'_>) -> EditResult<()> {
    let sym = comment_sym(ctx)?;
    let (start, end, lines) = lines(ctx)?;
    let lines: Vec<Line> = lines
        .into_iter()
        .filter(|l| l.indent_end < l.end)
        .collect();
    let Some(min_col) = lines.iter().map(|l| l.indent_end - l.start).min() else {
        return Ok(());
    };
    let before = ctx.cursor.state();
    let single = (lines.len() == 1).then(|| lines[0].start + min_col);
    ctx.group(|ctx| {
        let mut delta = 0isize;
        for line in lines.iter().rev() {
            let at = line.start + min_col;
            match &sym {
                CommentSym::Line(s) => {
                    ctx.insert(at, s.as_bytes())?;
                    delta += s.len() as isize;
                }
                CommentSym::Block(open, close) => {
                    ctx.insert(line.end, close.as_bytes())?;
                    ctx.insert(at, open.as_bytes())?;
                    delta += (open.len() + close.len()) as isize;
                }
            }
        }
        if let (Some(at), CommentSym::Block(open, _)) = (single, &sym) {
            // only the opening token sits before a cursor inside the line
            return place_cursor(ctx, before, Some(at), (start, end), open.len() as isize);
        }
        place_cursor(ctx, before, single, (start, end), delta)
    })
}

fn starts_with_at(ctx: &EditCtx<'_>, i: usize, s: &str, limit: usize) -> EditResult<bool> {
    if s.is_empty() || i + s.len() > limit {
        return Ok(false);
    }
    match ctx.read(i, s.len()) {
        Ok(bytes) => Ok(bytes == s.as_bytes()),
        Err(EditError::Rw(RwError::OutOfRange)) => Ok(false),
        Err(err) => Err(err),
    }
}

/// Remove comment tokens at the first non-blank rune of each line.
pub fn uncomment(ctx: &mut EditCtx<'_>) -> EditResult<()> {
    let sym = comment_sym(ctx)?;
    let (start, end, lines) = lines(ctx)?;
    let mut targets = Vec::new();
    for line in lines {
        let hit = match &sym {
            CommentSym::Line(s) => starts_with_at(ctx, line.indent_end, s, line.end)?,
            CommentSym::Block(open, close) => {
                starts_with_at(ctx, line.indent_end, open, line.end)?
                    && line.end >= line.indent_end + open.len() + close.len()
                    && starts_with_at(ctx, line.end - close.len(), close, line.end)?
            }
        };
        if hit {
            targets.push(line);
        }
    }
    if targets.is_empty() {
        return Ok(());
    }
    let before = ctx.cursor.state();
    let single = (targets.len() == 1).then(|| targets[0].indent_end);
    ctx.group(|ctx| {
        let mut delta = 0isize;
        for line in targets.iter().rev() {
            match &sym {
                CommentSym::Line(s) => {
                    ctx.delete(line.indent_end, s.len())?;
                    delta -= s.len() as isize;
                }
                CommentSym::Block(open, close) => {
                    ctx.delete(line.end - close.len(), close.len())?;
                    ctx.delete(line.indent_end, open.len())?;
                    delta -= (open.len() + close.len()) as isize;
                }
            }
        }
        if let (Some(at), CommentSym::Block(open, _)) = (single, &sym) {
            return place_cursor(ctx, before, Some(at), (start, end), -(open.len() as isize));
        }
        place_cursor(ctx, before, single, (start, end), delta)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::Fixture;

    #[test]
    fn line_comments_go_at_the_smallest_indent() {
        let mut fx = Fixture::new("  foo\n bar\n", 0);
        fx.host.comment = Some(CommentSym::Line("//".into()));
        fx.cursor.set_selection(0, 10);
        fx.run(comment).expect("comment");
        assert_eq!(fx.text(), " // foo\n //bar\n");
        assert_eq!(fx.cursor.selection(), Some((0, 15)));
        fx.run(uncomment).expect("uncomment");
        assert_eq!(fx.text(), "  foo\n bar\n");
    }

    #[test]
    fn blank_lines_are_left_alone() {
        let mut fx = Fixture::new("a\n\n  \nb", 0);
        fx.host.comment = Some(CommentSym::Line("#".into()));
        fx.cursor.set_selection(0, 7);
        fx.run(comment).expect("comment");
        assert_eq!(fx.text(), "#a\n\n  \n#b");
    }

    #[test]
    fn single_line_shifts_cursor_past_insertion() {
        let mut fx = Fixture::new("    x = 1", 6);
        fx.host.comment = Some(CommentSym::Line("# ".into()));
        fx.run(comment).expect("comment");
        assert_eq!(fx.text(), "    # x = 1");
        assert_eq!(fx.cursor.index(), 8);
        fx.cursor.set_index_selection_off(2);
        fx.run(uncomment).expect("uncomment");
        assert_eq!(fx.text(), "    x = 1");
        assert_eq!(fx.cursor.index(), 2);
    }

    #[test]
    fn block_comments_wrap_each_line() {
        let mut fx = Fixture::new("a\n b", 0);
        fx.host.comment = Some(CommentSym::Block("/*".into(), "*/".into()));
        fx.cursor.set_selection(0, 4);
        fx.run(comment).expect("comment");
        assert_eq!(fx.text(), "/*a*/\n/* b*/");
        fx.run(uncomment).expect("uncomment");
        assert_eq!(fx.text(), "a\n b");
    }

    #[test]
    fn missing_comment_symbol_is_unsupported() {
        let mut fx = Fixture::new("a", 0);
        assert_eq!(fx.run(comment), Err(EditError::Unsupported("comment")));
    }
}
