//! Cursor motion.

use crate::ctx::EditCtx;
use crate::error::EditResult;
use tiledit_core::scan::{
    expand_rune_index_fn, expand_rune_last_index_fn, indent_end_index, is_word_rune,
    line_end_index, line_start_index,
};
use tiledit_core::RwError;
use tiledit_draw::Point;

pub fn move_cursor_left(ctx: &mut EditCtx<'_>, select: bool) -> EditResult<()> {
    let i = ctx.cursor.index();
    match ctx.reader().read_last_rune_at(i) {
        Ok((_, size)) => ctx.move_to(select, i - size),
        Err(RwError::EndOfRange) => Ok(()),
        Err(err) => Err(err.into()),
    }
}

pub fn move_cursor_right(ctx: &mut EditCtx<'_>, select: bool) -> EditResult<()> {
    let i = ctx.cursor.index();
    match ctx.reader().read_rune_at(i) {
        Ok((_, size)) => ctx.move_to(select, i + size),
        Err(RwError::EndOfRange) => Ok(()),
        Err(err) => Err(err.into()),
    }
}

pub fn move_cursor_up(ctx: &mut EditCtx<'_>, select: bool) -> EditResult<()> {
    let lh = ctx.fns.line_height();
    let i = ctx.cursor.index();
    let mut p = ctx.fns.get_point(ctx.rw.as_reader(), i)?;
    if p.y - lh < 0 {
        ctx.fns.scroll_up(ctx.rw.as_reader(), true);
        p = ctx.fns.get_point(ctx.rw.as_reader(), i)?;
    }
    if p.y - lh < 0 {
        // already on the first row
        return ctx.move_to(select, ctx.rw.min());
    }
    let k = ctx.fns.get_index(ctx.rw.as_reader(), Point::new(p.x, p.y - lh))?;
    ctx.move_to(select, k)
}

pub fn move_cursor_down(ctx: &mut EditCtx<'_>, select: bool) -> EditResult<()> {
    let lh = ctx.fns.line_height();
    let i = ctx.cursor.index();
    let p = ctx.fns.get_point(ctx.rw.as_reader(), i)?;
    let k = ctx.fns.get_index(ctx.rw.as_reader(), Point::new(p.x, p.y + lh))?;
    if k < i {
        return Ok(());
    }
    ctx.move_to(select, k)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum RuneClass {
    Newline,
    Word,
    Space,
    Other,
}

fn rune_class(ru: char) -> RuneClass {
    if ru == '\n' {
        RuneClass::Newline
    } else if is_word_rune(ru) {
        RuneClass::Word
    } else if ru.is_whitespace() {
        RuneClass::Space
    } else {
        RuneClass::Other
    }
}

/// Next edge of a word, space run or newline after `i`.
pub fn jump_right_index(ctx: &EditCtx<'_>, i: usize) -> EditResult<Option<usize>> {
    let r = ctx.reader();
    let (first, size) = match r.read_rune_at(i) {
        Ok(v) => v,
        Err(RwError::EndOfRange) => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    let class = rune_class(first);
    if class == RuneClass::Newline {
        return Ok(Some(i + size));
    }
    let k = expand_rune_index_fn(r, i + size, true, |ru| rune_class(ru) != class)?;
    Ok(Some(k))
}

/// Previous edge of a word, space run or newline before `i`.
pub fn jump_left_index(ctx: &EditCtx<'_>, i: usize) -> EditResult<Option<usize>> {
    let r = ctx.reader();
    let (last, size) = match r.read_last_rune_at(i) {
        Ok(v) => v,
        Err(RwError::EndOfRange) => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    let class = rune_class(last);
    if class == RuneClass::Newline {
        return Ok(Some(i - size));
    }
    let k = expand_rune_last_index_fn(r, i - size, true, |ru| rune_class(ru) != class)?;
    Ok(Some(k))
}

pub fn move_cursor_jump_right(ctx: &mut EditCtx<'_>, select: bool) -> EditResult<()> {
    match jump_right_index(ctx, ctx.cursor.index())? {
        Some(k) => ctx.move_to(select, k),
        None => Ok(()),
    }
}

pub fn move_cursor_jump_left(ctx: &mut EditCtx<'_>, select: bool) -> EditResult<()> {
    match jump_left_index(ctx, ctx.cursor.index())? {
        Some(k) => ctx.move_to(select, k),
        None => Ok(()),
    }
}

/// First non-blank rune of the line; from there, the line start.
pub fn start_of_line(ctx: &mut EditCtx<'_>, select: bool) -> EditResult<()> {
    let i = ctx.cursor.index();
    let ls = line_start_index(ctx.reader(), i)?;
    let ie = indent_end_index(ctx.reader(), ls)?;
    let target = if i == ie { ls } else { ie };
    ctx.move_to(select, target)
}

/// Just before the line's `'\n'`.
pub fn end_of_line(ctx: &mut EditCtx<'_>, select: bool) -> EditResult<()> {
    let (le, nl) = line_end_index(ctx.reader(), ctx.cursor.index())?;
    let target = if nl { le - 1 } else { le };
    ctx.move_to(select, target)
}

pub fn page_up(ctx: &mut EditCtx<'_>, up: bool) -> EditResult<()> {
    ctx.fns.page_up(ctx.rw.as_reader(), up);
    Ok(())
}

pub fn scroll_up(ctx: &mut EditCtx<'_>, up: bool) -> EditResult<()> {
    ctx.fns.scroll_up(ctx.rw.as_reader(), up);
    Ok(())
}

/// Click at `p`: place the cursor, or extend the selection.
pub fn move_cursor_to_point(ctx: &mut EditCtx<'_>, p: Point, select: bool) -> EditResult<()> {
    let i = ctx.fns.get_index(ctx.rw.as_reader(), p)?;
    ctx.move_to(select, i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::Fixture;

    #[test]
    fn left_at_start_is_a_no_op() {
        let mut fx = Fixture::new("ab", 0);
        fx.run(|ctx| move_cursor_left(ctx, false)).expect("left");
        assert_eq!(fx.cursor.index(), 0);
        fx.run(|ctx| move_cursor_right(ctx, true)).expect("right");
        assert_eq!(fx.cursor.selection(), Some((0, 1)));
        assert_eq!(fx.host.primary.as_deref(), Some("a"));
    }

    #[test]
    fn steps_over_multibyte_runes() {
        let mut fx = Fixture::new("aé", 3);
        fx.run(|ctx| move_cursor_left(ctx, false)).expect("left");
        assert_eq!(fx.cursor.index(), 1);
        fx.run(|ctx| move_cursor_right(ctx, false)).expect("right");
        assert_eq!(fx.cursor.index(), 3);
    }

    #[test]
    fn jumps_stop_at_word_and_newline_edges() {
        let mut fx = Fixture::new("foo  bar\nbaz", 0);
        let mut stops = Vec::new();
        for _ in 0..5 {
            fx.run(|ctx| move_cursor_jump_right(ctx, false)).expect("jump");
            stops.push(fx.cursor.index());
        }
        assert_eq!(stops, vec![3, 5, 8, 9, 12]);
        fx.run(|ctx| move_cursor_jump_left(ctx, false)).expect("jump");
        assert_eq!(fx.cursor.index(), 9);
        fx.run(|ctx| move_cursor_jump_left(ctx, false)).expect("jump");
        assert_eq!(fx.cursor.index(), 8);
    }

    #[test]
    fn line_start_toggles_between_indent_and_column_zero() {
        let mut fx = Fixture::new("x\n  foo\n", 6);
        fx.run(|ctx| start_of_line(ctx, false)).expect("home");
        assert_eq!(fx.cursor.index(), 4);
        fx.run(|ctx| start_of_line(ctx, false)).expect("home");
        assert_eq!(fx.cursor.index(), 2);
        fx.run(|ctx| end_of_line(ctx, false)).expect("end");
        assert_eq!(fx.cursor.index(), 7);
    }

    #[test]
    fn vertical_motion_keeps_column() {
        let mut fx = Fixture::new("abcd\nef\nghij", 3);
        fx.run(|ctx| move_cursor_down(ctx, false)).expect("down");
        // row two is shorter: lands on its newline
        assert_eq!(fx.cursor.index(), 7);
        fx.run(|ctx| move_cursor_down(ctx, false)).expect("down");
        assert_eq!(fx.cursor.index(), 10);
        fx.run(|ctx| move_cursor_up(ctx, true)).expect("up");
        assert_eq!(fx.cursor.selection(), Some((7, 10)));
        fx.run(|ctx| move_cursor_up(ctx, false)).expect("up");
        fx.run(|ctx| move_cursor_up(ctx, false)).expect("up");
        assert_eq!(fx.cursor.index(), 0);
    }
}
