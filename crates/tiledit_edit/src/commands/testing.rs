//! Shared fixture for command tests: a rope buffer and a drawer-backed host.

use crate::commands::PendingPaste;
use crate::ctx::{ClipboardChannel, CommentSym, EditCtx, HostFns};
use crate::error::{EditError, EditResult};
use tiledit_core::{Config, Cursor, History, MailboxSender, Reader, RopeBuffer};
use tiledit_draw::{Drawer, FaceCache, MonoFace, Options, Point, Rect};

pub(crate) struct TestHost {
    pub drawer: Drawer,
    pub primary: Option<String>,
    pub clipboard: Option<String>,
    /// Hold clipboard requests without answering them.
    pub clipboard_silent: bool,
    pub pending: Vec<MailboxSender<String>>,
    pub pastes: Vec<PendingPaste>,
    pub errors: Vec<String>,
    pub comment: Option<CommentSym>,
}

impl TestHost {
    pub fn new() -> Self {
        let mut drawer = Drawer::new(FaceCache::new(MonoFace::default()), Options::default());
        drawer.set_bounds(Rect::new(0, 0, 400, 400));
        Self {
            drawer,
            primary: None,
            clipboard: None,
            clipboard_silent: false,
            pending: Vec::new(),
            pastes: Vec::new(),
            errors: Vec::new(),
            comment: None,
        }
    }
}

impl HostFns for TestHost {
    fn get_point(&mut self, r: &dyn Reader, i: usize) -> EditResult<Point> {
        Ok(self.drawer.point_of(r, i)?)
    }

    fn get_index(&mut self, r: &dyn Reader, p: Point) -> EditResult<usize> {
        Ok(self.drawer.index_of(r, p)?)
    }

    fn line_height(&self) -> i32 {
        self.drawer.line_height()
    }

    fn comment_line_sym(&self) -> Option<CommentSym> {
        self.comment.clone()
    }

    fn set_clipboard(&mut self, channel: ClipboardChannel, text: String) {
        match channel {
            ClipboardChannel::Primary => self.primary = Some(text),
            ClipboardChannel::Clipboard => self.clipboard = Some(text),
        }
    }

    fn get_clipboard(&mut self, channel: ClipboardChannel, reply: MailboxSender<String>) {
        if self.clipboard_silent {
            self.pending.push(reply);
            return;
        }
        let text = match channel {
            ClipboardChannel::Primary => self.primary.clone(),
            ClipboardChannel::Clipboard => self.clipboard.clone(),
        };
        reply.send(text.unwrap_or_default());
    }

    fn paste_pending(&mut self, pending: PendingPaste) {
        self.pastes.push(pending);
    }

    fn error(&mut self, err: &EditError) {
        self.errors.push(err.to_string());
    }
}

pub(crate) struct Fixture {
    pub buf: RopeBuffer,
    pub cursor: Cursor,
    pub history: History,
    pub host: TestHost,
    pub config: Config,
}

impl Fixture {
    pub fn new(text: &str, cursor: usize) -> Self {
        let config = Config::default();
        Self {
            buf: RopeBuffer::new(text),
            cursor: Cursor::new(cursor),
            history: History::new(&config),
            host: TestHost::new(),
            config,
        }
    }

    pub fn run<F>(&mut self, f: F) -> EditResult<()>
    where
        F: FnOnce(&mut EditCtx<'_>) -> EditResult<()>,
    {
        let mut ctx = EditCtx::new(
            &mut self.buf,
            &mut self.cursor,
            &mut self.history,
            &mut self.host,
            &self.config,
        );
        let res = f(&mut ctx);
        self.host.drawer.content_changed();
        res
    }

    pub fn text(&self) -> String {
        self.buf.to_string()
    }
}
