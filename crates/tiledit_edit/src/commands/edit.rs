//! Structural edits: rune and line insertion, deletion and movement.

use crate::ctx::EditCtx;
use crate::error::{EditError, EditResult};
use tiledit_core::scan::{indent_end_index, line_end_index, line_start_index, lines_span};
use tiledit_core::{CursorState, RwError};

pub fn backspace(ctx: &mut EditCtx<'_>) -> EditResult<()> {
    ctx.group(|ctx| {
        if ctx.delete_selection()? {
            return Ok(());
        }
        let i = ctx.cursor.index();
        let size = match ctx.reader().read_last_rune_at(i) {
            Ok((_, size)) => size,
            Err(RwError::EndOfRange) => return Ok(()),
            Err(err) => return Err(err.into()),
        };
        ctx.delete(i - size, size)?;
        ctx.cursor.set_index_selection_off(i - size);
        Ok(())
    })
}

pub fn delete(ctx: &mut EditCtx<'_>) -> EditResult<()> {
    ctx.group(|ctx| {
        if ctx.delete_selection()? {
            return Ok(());
        }
        let i = ctx.cursor.index();
        let size = match ctx.reader().read_rune_at(i) {
            Ok((_, size)) => size,
            Err(RwError::EndOfRange) => return Ok(()),
            Err(err) => return Err(err.into()),
        };
        ctx.delete(i, size)
    })
}

/// Replace the selection with `bytes` and move past them.
pub fn insert_string(ctx: &mut EditCtx<'_>, bytes: &[u8]) -> EditResult<()> {
    ctx.group(|ctx| {
        let replaced = ctx.delete_selection()?;
        let i = ctx.cursor.index();
        ctx.insert(i, bytes)?;
        ctx.cursor.set_index_selection_off(i + bytes.len());
        if !replaced && !bytes.contains(&b'\n') {
            ctx.history.mark_typing();
        }
        Ok(())
    })?;
    let i = ctx.cursor.index();
    ctx.fns.make_index_visible(ctx.rw.as_reader(), i);
    Ok(())
}

/// Enter: newline followed by the current line's indentation.
pub fn auto_indent(ctx: &mut EditCtx<'_>) -> EditResult<()> {
    ctx.group(|ctx| {
        ctx.delete_selection()?;
        let i = ctx.cursor.index();
        let ls = line_start_index(ctx.reader(), i)?;
        let ie = indent_end_index(ctx.reader(), ls)?.min(i);
        let mut bytes = vec![b'\n'];
        bytes.extend(ctx.read(ls, ie - ls)?);
        ctx.insert(i, &bytes)?;
        ctx.cursor.set_index_selection_off(i + bytes.len());
        Ok(())
    })?;
    let i = ctx.cursor.index();
    ctx.fns.make_index_visible(ctx.rw.as_reader(), i);
    Ok(())
}

/// Start offsets of the lines in `[start, end)`.
pub(crate) fn line_starts(ctx: &EditCtx<'_>, start: usize, end: usize) -> EditResult<Vec<usize>> {
    let mut out = Vec::new();
    let mut pos = start;
    loop {
        out.push(pos);
        let (le, nl) = line_end_index(ctx.reader(), pos)?;
        if !nl || le >= end {
            break;
        }
        pos = le;
    }
    Ok(out)
}

/// Line span of the selection when it covers more than one line.
fn multi_line_span(ctx: &EditCtx<'_>) -> EditResult<Option<(usize, usize)>> {
    let Some((a, b)) = ctx.cursor.selection() else {
        return Ok(None);
    };
    let (start, end, _) = lines_span(ctx.reader(), a, b)?;
    if line_starts(ctx, start, end)?.len() < 2 {
        return Ok(None);
    }
    Ok(Some((start, end)))
}

/// True when the line starting at `ls` has no content.
fn is_empty_line(ctx: &EditCtx<'_>, ls: usize) -> EditResult<bool> {
    match ctx.reader().read_rune_at(ls) {
        Ok((ru, _)) => Ok(ru == '\n'),
        Err(RwError::EndOfRange) => Ok(true),
        Err(err) => Err(err.into()),
    }
}

/// Indent the selected lines, or insert a tab.
pub fn tab_right(ctx: &mut EditCtx<'_>) -> EditResult<()> {
    let Some((start, end)) = multi_line_span(ctx)? else {
        return insert_string(ctx, b"\t");
    };
    ctx.group(|ctx| {
        let mut added = 0;
        for ls in line_starts(ctx, start, end)?.into_iter().rev() {
            if is_empty_line(ctx, ls)? {
                continue;
            }
            ctx.insert(ls, b"\t")?;
            added += 1;
        }
        ctx.select(start, end + added)
    })
}

/// Unindent the selected lines (or the cursor line) by one tab or up to
/// `tab_width` spaces.
pub fn tab_left(ctx: &mut EditCtx<'_>) -> EditResult<()> {
    let (a, b) = ctx.cursor.selection_or_cursor();
    let (start, end, _) = lines_span(ctx.reader(), a, b)?;
    let tab_width = ctx.config.tab_width.max(1);
    let had_selection = ctx.cursor.selection().is_some();
    ctx.group(|ctx| {
        let mut removed = 0;
        let mut cursor_shift = 0;
        for ls in line_starts(ctx, start, end)?.into_iter().rev() {
            let ie = indent_end_index(ctx.reader(), ls)?;
            let lead = ctx.read(ls, ie - ls)?;
            let n = if lead.first() == Some(&b'\t') {
                1
            } else {
                lead.iter().take(tab_width).take_while(|&&c| c == b' ').count()
            };
            if n == 0 {
                continue;
            }
            ctx.delete(ls, n)?;
            removed += n;
            cursor_shift = n;
        }
        if had_selection {
            ctx.select(start, end - removed)
        } else {
            let i = ctx.cursor.index();
            let i = i.saturating_sub(cursor_shift).max(start);
            ctx.cursor.set_index_selection_off(i);
            Ok(())
        }
    })
}

/// Copy the current lines below themselves and select the copy.
pub fn duplicate_lines(ctx: &mut EditCtx<'_>) -> EditResult<()> {
    let (a, b) = ctx.cursor.selection_or_cursor();
    let (start, end, nl) = lines_span(ctx.reader(), a, b)?;
    let block = ctx.read(start, end - start)?;
    ctx.group(|ctx| {
        if nl {
            ctx.insert(end, &block)?;
            ctx.select(end, end + block.len() - 1)
        } else {
            let mut bytes = Vec::with_capacity(block.len() + 1);
            bytes.push(b'\n');
            bytes.extend_from_slice(&block);
            ctx.insert(end, &bytes)?;
            ctx.select(end + 1, end + bytes.len())
        }
    })
}

/// Delete the current lines.
pub fn remove_lines(ctx: &mut EditCtx<'_>) -> EditResult<()> {
    let (a, b) = ctx.cursor.selection_or_cursor();
    let (start, end, nl) = lines_span(ctx.reader(), a, b)?;
    ctx.group(|ctx| {
        if !nl && start > ctx.rw.min() {
            // last line: take the newline before it too
            ctx.delete(start - 1, end - start + 1)?;
            let ls = line_start_index(ctx.reader(), start - 1)?;
            ctx.cursor.set_index_selection_off(ls);
        } else {
            ctx.delete(start, end - start)?;
            ctx.cursor.set_index_selection_off(start);
        }
        Ok(())
    })
}

fn shifted(state: CursorState, up: bool, by: usize) -> CursorState {
    let shift = |i: usize| if up { i - by } else { i + by };
    CursorState {
        index: shift(state.index),
        anchor: shift(state.anchor),
        selection_on: state.selection_on,
    }
}

/// Swap the current lines with the line above.
pub fn move_line_up(ctx: &mut EditCtx<'_>) -> EditResult<()> {
    let (a, b) = ctx.cursor.selection_or_cursor();
    let (start, end, nl) = lines_span(ctx.reader(), a, b)?;
    if start == ctx.rw.min() {
        return Ok(());
    }
    let prev = line_start_index(ctx.reader(), start - 1)?;
    let block = ctx.read(start, end - start)?;
    let above = ctx.read(prev, start - prev)?;
    let mut bytes = Vec::with_capacity(end - prev);
    bytes.extend_from_slice(&block);
    if nl {
        bytes.extend_from_slice(&above);
    } else {
        bytes.push(b'\n');
        bytes.extend_from_slice(&above[..above.len() - 1]);
    }
    let state = shifted(ctx.cursor.state(), true, start - prev);
    ctx.group(|ctx| {
        ctx.overwrite(prev, end - prev, &bytes)?;
        ctx.cursor.set(state);
        Ok(())
    })
}

/// Swap the current lines with the line below.
pub fn move_line_down(ctx: &mut EditCtx<'_>) -> EditResult<()> {
    let (a, b) = ctx.cursor.selection_or_cursor();
    let (start, end, nl) = lines_span(ctx.reader(), a, b)?;
    if !nl || end >= ctx.rw.max() {
        return Ok(());
    }
    let (next_end, next_nl) = line_end_index(ctx.reader(), end)?;
    let block = ctx.read(start, end - start)?;
    let below = ctx.read(end, next_end - end)?;
    let mut bytes = Vec::with_capacity(next_end - start);
    bytes.extend_from_slice(&below);
    let by = if next_nl {
        bytes.extend_from_slice(&block);
        below.len()
    } else {
        bytes.push(b'\n');
        bytes.extend_from_slice(&block[..block.len() - 1]);
        below.len() + 1
    };
    let state = shifted(ctx.cursor.state(), false, by);
    ctx.group(|ctx| {
        ctx.overwrite(start, next_end - start, &bytes)?;
        ctx.cursor.set(state);
        Ok(())
    })
}

pub fn undo(ctx: &mut EditCtx<'_>) -> EditResult<()> {
    if let Some(res) = ctx.fns.undo() {
        return res;
    }
    match ctx.history.undo(ctx.rw.as_writer())? {
        Some(state) => {
            ctx.cursor.set(state);
            ctx.clamp_cursor();
            Ok(())
        }
        None => Err(EditError::NothingToUndo),
    }
}

pub fn redo(ctx: &mut EditCtx<'_>) -> EditResult<()> {
    if let Some(res) = ctx.fns.redo() {
        return res;
    }
    match ctx.history.redo(ctx.rw.as_writer())? {
        Some(state) => {
            ctx.cursor.set(state);
            ctx.clamp_cursor();
            Ok(())
        }
        None => Err(EditError::NothingToRedo),
    }
}
