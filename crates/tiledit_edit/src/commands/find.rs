//! Find and replace.

use crate::ctx::EditCtx;
use crate::error::{EditError, EditResult};
use tiledit_core::search::{index_ctx, last_index_ctx};
use tiledit_core::{CursorState, FindOpt};
use tracing::debug;

/// Select the next hit of `query` after the cursor, wrapping at the
/// content edges. Reverse searches end before the current selection.
pub fn find(ctx: &mut EditCtx<'_>, query: &str, reverse: bool, opt: FindOpt) -> EditResult<()> {
    if query.is_empty() {
        return Ok(());
    }
    let sep = query.as_bytes();
    let chunk = ctx.config.search_chunk_size;
    let (min, max) = (ctx.rw.min(), ctx.rw.max());
    let hit = if reverse {
        let (a, _) = ctx.cursor.selection_or_cursor();
        match last_index_ctx(&ctx.cancel, ctx.reader(), a, sep, opt, chunk)? {
            Some(hit) => Some(hit),
            None => last_index_ctx(&ctx.cancel, ctx.reader(), max, sep, opt, chunk)?,
        }
    } else {
        let i = ctx.cursor.index();
        match index_ctx(&ctx.cancel, ctx.reader(), i, sep, opt, chunk)? {
            Some(hit) => Some(hit),
            None => index_ctx(&ctx.cancel, ctx.reader(), min, sep, opt, chunk)?,
        }
    };
    let Some((k, n)) = hit else {
        return Err(EditError::NotFound(query.to_string()));
    };
    debug!(offset = k, len = n, reverse, "find hit");
    ctx.select(k, k + n)?;
    ctx.fns.make_index_visible(ctx.rw.as_reader(), k + n);
    Ok(())
}

fn shift_past(i: usize, k: usize, old: usize, new: usize) -> usize {
    if i >= k + old {
        i - old + new
    } else if i > k {
        // inside a replaced span
        k + new
    } else {
        i
    }
}

/// Replace every `old` inside the selection, or the whole content when
/// nothing is selected, as one undo group. Returns the number of
/// replacements.
pub fn replace(ctx: &mut EditCtx<'_>, old: &str, new: &str) -> EditResult<usize> {
    if old.is_empty() {
        return Ok(0);
    }
    let (start, end) = ctx
        .cursor
        .selection()
        .unwrap_or((ctx.rw.min(), ctx.rw.max()));
    let chunk = ctx.config.search_chunk_size;
    let mut hits = Vec::new();
    let mut i = start;
    while let Some((k, n)) =
        index_ctx(&ctx.cancel, ctx.reader(), i, old.as_bytes(), FindOpt::default(), chunk)?
    {
        if k + n > end {
            break;
        }
        hits.push(k);
        i = k + n;
    }
    if hits.is_empty() {
        return Ok(0);
    }
    let before = ctx.cursor.state();
    ctx.group(|ctx| {
        let mut state = before;
        for &k in hits.iter().rev() {
            ctx.overwrite(k, old.len(), new.as_bytes())?;
            state = CursorState {
                index: shift_past(state.index, k, old.len(), new.len()),
                anchor: shift_past(state.anchor, k, old.len(), new.len()),
                ..state
            };
        }
        ctx.cursor.set(state);
        Ok(())
    })?;
    debug!(count = hits.len(), "replaced");
    Ok(hits.len())
}
