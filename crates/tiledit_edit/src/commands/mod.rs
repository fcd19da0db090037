//! Edit commands. Each takes an [`EditCtx`] and leaves the content, the
//! cursor and the undo log consistent with one user-visible action.

mod comment;
mod edit;
mod find;
mod motion;
mod select;

#[cfg(test)]
pub(crate) mod testing;

pub use comment::{comment, uncomment};
pub use edit::{
    auto_indent, backspace, delete, duplicate_lines, insert_string, move_line_down, move_line_up,
    redo, remove_lines, tab_left, tab_right, undo,
};
pub use find::{find, replace};
pub use motion::{
    end_of_line, jump_left_index, jump_right_index, move_cursor_down, move_cursor_jump_left,
    move_cursor_jump_right, move_cursor_left, move_cursor_right, move_cursor_to_point,
    move_cursor_up, page_up, scroll_up, start_of_line,
};
pub use select::{copy, cut, paste, select_all, select_line, select_word, PendingPaste};

use crate::ctx::{ClipboardChannel, EditCtx};
use crate::error::EditResult;
use tiledit_core::FindOpt;
use tiledit_draw::Point;

/// A command with its arguments, as produced by input dispatch.
#[derive(Clone, Debug, PartialEq)]
pub enum EditCommand {
    MoveLeft { select: bool },
    MoveRight { select: bool },
    MoveUp { select: bool },
    MoveDown { select: bool },
    JumpLeft { select: bool },
    JumpRight { select: bool },
    StartOfLine { select: bool },
    EndOfLine { select: bool },
    PageUp,
    PageDown,
    ScrollUp,
    ScrollDown,
    MoveToPoint { point: Point, select: bool },
    SelectWord,
    SelectLine,
    SelectAll,
    /// Double click.
    SelectWordAt(Point),
    /// Triple click.
    SelectLineAt(Point),
    Backspace,
    Delete,
    InsertString(String),
    AutoIndent,
    TabRight,
    TabLeft,
    Comment,
    Uncomment,
    MoveLineUp,
    MoveLineDown,
    DuplicateLines,
    RemoveLines,
    Copy,
    Cut,
    Paste(ClipboardChannel),
    /// Middle click: move to the point, then paste.
    PasteAt(Point, ClipboardChannel),
    Undo,
    Redo,
    Find {
        query: String,
        reverse: bool,
        opt: FindOpt,
    },
    Replace { old: String, new: String },
    FindShortcut,
    Save,
}

impl EditCommand {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::MoveLeft { .. } => "move_left",
            Self::MoveRight { .. } => "move_right",
            Self::MoveUp { .. } => "move_up",
            Self::MoveDown { .. } => "move_down",
            Self::JumpLeft { .. } => "jump_left",
            Self::JumpRight { .. } => "jump_right",
            Self::StartOfLine { .. } => "start_of_line",
            Self::EndOfLine { .. } => "end_of_line",
            Self::PageUp => "page_up",
            Self::PageDown => "page_down",
            Self::ScrollUp => "scroll_up",
            Self::ScrollDown => "scroll_down",
            Self::MoveToPoint { .. } => "move_to_point",
            Self::SelectWord | Self::SelectWordAt(_) => "select_word",
            Self::SelectLine | Self::SelectLineAt(_) => "select_line",
            Self::SelectAll => "select_all",
            Self::Backspace => "backspace",
            Self::Delete => "delete",
            Self::InsertString(_) => "insert_string",
            Self::AutoIndent => "auto_indent",
            Self::TabRight => "tab_right",
            Self::TabLeft => "tab_left",
            Self::Comment => "comment",
            Self::Uncomment => "uncomment",
            Self::MoveLineUp => "move_line_up",
            Self::MoveLineDown => "move_line_down",
            Self::DuplicateLines => "duplicate_lines",
            Self::RemoveLines => "remove_lines",
            Self::Copy => "copy",
            Self::Cut => "cut",
            Self::Paste(_) | Self::PasteAt(..) => "paste",
            Self::Undo => "undo",
            Self::Redo => "redo",
            Self::Find { .. } => "find",
            Self::Replace { .. } => "replace",
            Self::FindShortcut => "find_shortcut",
            Self::Save => "save",
        }
    }
}

/// Execute one command.
pub fn run(ctx: &mut EditCtx<'_>, cmd: &EditCommand) -> EditResult<()> {
    match cmd {
        EditCommand::MoveLeft { select } => move_cursor_left(ctx, *select),
        EditCommand::MoveRight { select } => move_cursor_right(ctx, *select),
        EditCommand::MoveUp { select } => move_cursor_up(ctx, *select),
        EditCommand::MoveDown { select } => move_cursor_down(ctx, *select),
        EditCommand::JumpLeft { select } => move_cursor_jump_left(ctx, *select),
        EditCommand::JumpRight { select } => move_cursor_jump_right(ctx, *select),
        EditCommand::StartOfLine { select } => start_of_line(ctx, *select),
        EditCommand::EndOfLine { select } => end_of_line(ctx, *select),
        EditCommand::PageUp => page_up(ctx, true),
        EditCommand::PageDown => page_up(ctx, false),
        EditCommand::ScrollUp => scroll_up(ctx, true),
        EditCommand::ScrollDown => scroll_up(ctx, false),
        EditCommand::MoveToPoint { point, select } => move_cursor_to_point(ctx, *point, *select),
        EditCommand::SelectWord => select_word(ctx),
        EditCommand::SelectLine => select_line(ctx),
        EditCommand::SelectAll => select_all(ctx),
        EditCommand::SelectWordAt(p) => {
            move_cursor_to_point(ctx, *p, false)?;
            select_word(ctx)
        }
        EditCommand::SelectLineAt(p) => {
            move_cursor_to_point(ctx, *p, false)?;
            select_line(ctx)
        }
        EditCommand::Backspace => backspace(ctx),
        EditCommand::Delete => delete(ctx),
        EditCommand::InsertString(s) => insert_string(ctx, s.as_bytes()),
        EditCommand::AutoIndent => auto_indent(ctx),
        EditCommand::TabRight => tab_right(ctx),
        EditCommand::TabLeft => tab_left(ctx),
        EditCommand::Comment => comment(ctx),
        EditCommand::Uncomment => uncomment(ctx),
        EditCommand::MoveLineUp => move_line_up(ctx),
        EditCommand::MoveLineDown => move_line_down(ctx),
        EditCommand::DuplicateLines => duplicate_lines(ctx),
        EditCommand::RemoveLines => remove_lines(ctx),
        EditCommand::Copy => copy(ctx),
        EditCommand::Cut => cut(ctx),
        EditCommand::Paste(channel) => paste(ctx, *channel),
        EditCommand::PasteAt(p, channel) => {
            move_cursor_to_point(ctx, *p, false)?;
            paste(ctx, *channel)
        }
        EditCommand::Undo => undo(ctx),
        EditCommand::Redo => redo(ctx),
        EditCommand::Find {
            query,
            reverse,
            opt,
        } => find(ctx, query, *reverse, *opt),
        EditCommand::Replace { old, new } => replace(ctx, old, new).map(|_| ()),
        EditCommand::FindShortcut => {
            ctx.fns.find_shortcut();
            Ok(())
        }
        EditCommand::Save => ctx.fns.save(),
    }
}
