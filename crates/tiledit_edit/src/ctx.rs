//! Everything an edit command touches: content, cursor, history and the
//! host callbacks.

use crate::commands::PendingPaste;
use crate::error::{EditError, EditResult};
use tiledit_core::{CancelToken, Config, Cursor, History, MailboxSender, ReadWriter, Reader};
use tiledit_draw::Point;

/// Clipboard channels. `Primary` mirrors the current selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClipboardChannel {
    Primary,
    Clipboard,
}

/// Comment tokens of the current file type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommentSym {
    Line(String),
    Block(String, String),
}

/// Callbacks implemented by the host shell.
///
/// Geometry queries take the reader so a host can answer them with its
/// drawer; view-changing callbacks default to doing nothing.
pub trait HostFns {
    fn get_point(&mut self, r: &dyn Reader, i: usize) -> EditResult<Point>;
    fn get_index(&mut self, r: &dyn Reader, p: Point) -> EditResult<usize>;
    fn line_height(&self) -> i32;

    fn comment_line_sym(&self) -> Option<CommentSym> {
        None
    }

    fn make_index_visible(&mut self, _r: &dyn Reader, _i: usize) {}
    fn page_up(&mut self, _r: &dyn Reader, _up: bool) {}
    fn scroll_up(&mut self, _r: &dyn Reader, _up: bool) {}

    fn set_clipboard(&mut self, channel: ClipboardChannel, text: String);

    /// Answer with the channel's text through `reply`. The reply may be
    /// sent before returning, later from the UI loop, or from another
    /// thread.
    fn get_clipboard(&mut self, channel: ClipboardChannel, reply: MailboxSender<String>);

    /// Keep a paste whose clipboard reply has not arrived yet. The host
    /// completes it from its UI loop with [`PendingPaste::poll`] or
    /// [`Dispatcher::poll_paste`](crate::input::Dispatcher::poll_paste).
    fn paste_pending(&mut self, pending: PendingPaste);

    /// Host-managed undo; `None` falls back to the built-in history.
    fn undo(&mut self) -> Option<EditResult<()>> {
        None
    }

    fn redo(&mut self) -> Option<EditResult<()>> {
        None
    }

    /// Surface a non-fatal error.
    fn error(&mut self, err: &EditError);

    fn find_shortcut(&mut self) {}

    fn save(&mut self) -> EditResult<()> {
        Err(EditError::Unsupported("save"))
    }
}

/// Borrowed state for one command.
pub struct EditCtx<'a> {
    pub rw: &'a mut dyn ReadWriter,
    pub cursor: &'a mut Cursor,
    pub history: &'a mut History,
    pub fns: &'a mut dyn HostFns,
    pub config: &'a Config,
    pub cancel: CancelToken,
}

impl<'a> EditCtx<'a> {
    pub fn new(
        rw: &'a mut dyn ReadWriter,
        cursor: &'a mut Cursor,
        history: &'a mut History,
        fns: &'a mut dyn HostFns,
        config: &'a Config,
    ) -> Self {
        Self {
            rw,
            cursor,
            history,
            fns,
            config,
            cancel: CancelToken::new(),
        }
    }

    pub fn reader(&self) -> &dyn Reader {
        self.rw.as_reader()
    }

    pub fn insert(&mut self, i: usize, bytes: &[u8]) -> EditResult<()> {
        let record = self.rw.insert(i, bytes)?;
        self.history.push(record);
        Ok(())
    }

    pub fn delete(&mut self, i: usize, n: usize) -> EditResult<()> {
        let record = self.rw.delete(i, n)?;
        self.history.push(record);
        Ok(())
    }

    pub fn overwrite(&mut self, i: usize, n: usize, bytes: &[u8]) -> EditResult<()> {
        let record = self.rw.overwrite(i, n, bytes)?;
        self.history.push(record);
        Ok(())
    }

    pub fn read(&self, i: usize, n: usize) -> EditResult<Vec<u8>> {
        Ok(self.rw.read_n_copy(i, n)?)
    }

    /// Run `f` as one undo group. The cursor before and after is stored
    /// with the group.
    pub fn group<T, F>(&mut self, f: F) -> EditResult<T>
    where
        F: FnOnce(&mut Self) -> EditResult<T>,
    {
        self.history.group_begin(self.cursor.state());
        let res = f(self);
        self.clamp_cursor();
        self.history.group_end(self.cursor.state());
        res
    }

    /// Delete the selection, leaving the cursor at its start.
    pub fn delete_selection(&mut self) -> EditResult<bool> {
        let Some((a, b)) = self.cursor.selection() else {
            if self.cursor.selection_on() {
                self.cursor.set_selection_off();
            }
            return Ok(false);
        };
        self.delete(a, b - a)?;
        self.cursor.set_index_selection_off(a);
        Ok(true)
    }

    pub fn clamp_cursor(&mut self) {
        let (min, max) = (self.rw.min(), self.rw.max());
        self.cursor.clamp(min, max);
    }

    /// Select `[anchor, index]` and mirror non-empty selections to the
    /// primary channel.
    pub fn select(&mut self, anchor: usize, index: usize) -> EditResult<()> {
        self.cursor.set_selection(anchor, index);
        self.publish_primary()
    }

    /// Move the cursor, extending the selection when `select` is set.
    pub fn move_to(&mut self, select: bool, index: usize) -> EditResult<()> {
        self.cursor.update_selection(select, index);
        if select {
            self.publish_primary()?;
        }
        let i = self.cursor.index();
        self.fns.make_index_visible(self.rw.as_reader(), i);
        Ok(())
    }

    fn publish_primary(&mut self) -> EditResult<()> {
        if let Some(text) = self.selection_text()? {
            self.fns.set_clipboard(ClipboardChannel::Primary, text);
        }
        Ok(())
    }

    /// Selected text, `None` when nothing is selected.
    pub fn selection_text(&self) -> EditResult<Option<String>> {
        let Some((a, b)) = self.cursor.selection() else {
            return Ok(None);
        };
        let bytes = self.read(a, b - a)?;
        Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
    }
}
