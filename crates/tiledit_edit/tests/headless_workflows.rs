//! Headless editing workflows: input events and commands run against a
//! rope buffer, with a real drawer answering geometry queries.

use image::RgbaImage;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use tiledit_core::{Config, Cursor, FindOpt, History, MailboxSender, Reader, RopeBuffer};
use tiledit_draw::{rgb, Canvas, Drawer, FaceCache, MonoFace, Point, Rect};
use tiledit_edit::highlight::Highlighter;
use tiledit_edit::{
    ClipboardChannel, CommentSym, Dispatcher, EditCommand, EditCtx, EditError, EditResult,
    HostFns, InputEvent, Key, Modifiers, MouseButton, PendingPaste,
};

struct View {
    drawer: Drawer,
    clipboard: Arc<Mutex<String>>,
    /// `None` queues replies for the UI loop; `Some` answers from a thread.
    clipboard_delay: Option<Duration>,
    queued_replies: Vec<(MailboxSender<String>, String)>,
    pastes: Vec<PendingPaste>,
    primary: Option<String>,
    errors: Vec<String>,
    comment: Option<CommentSym>,
}

impl HostFns for View {
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
            ClipboardChannel::Clipboard => {
                *self.clipboard.lock().expect("clipboard lock") = text;
            }
        }
    }

    fn get_clipboard(&mut self, channel: ClipboardChannel, reply: MailboxSender<String>) {
        let text = match channel {
            ClipboardChannel::Primary => self.primary.clone().unwrap_or_default(),
            ClipboardChannel::Clipboard => self.clipboard.lock().expect("clipboard lock").clone(),
        };
        match self.clipboard_delay {
            None => self.queued_replies.push((reply, text)),
            Some(delay) => {
                thread::spawn(move || {
                    thread::sleep(delay);
                    reply.send(text);
                });
            }
        }
    }

    fn paste_pending(&mut self, pending: PendingPaste) {
        self.pastes.push(pending);
    }

    fn error(&mut self, err: &EditError) {
        self.errors.push(err.to_string());
    }
}

struct Editor {
    buf: RopeBuffer,
    cursor: Cursor,
    history: History,
    view: View,
    config: Config,
    dispatcher: Dispatcher,
}

impl Editor {
    fn new(text: &str, cursor: usize) -> Self {
        let config = Config {
            line_wrap: false,
            ..Config::default()
        };
        let mut drawer = Drawer::with_config(FaceCache::new(MonoFace::default()), &config);
        drawer.set_bounds(Rect::new(0, 0, 300, 100));
        Self {
            buf: RopeBuffer::new(text),
            cursor: Cursor::new(cursor),
            history: History::new(&config),
            view: View {
                drawer,
                clipboard: Arc::new(Mutex::new(String::new())),
                clipboard_delay: None,
                queued_replies: Vec::new(),
                pastes: Vec::new(),
                primary: None,
                errors: Vec::new(),
                comment: None,
            },
            config,
            dispatcher: Dispatcher::default(),
        }
    }

    fn with_ctx<T>(&mut self, f: impl FnOnce(&mut EditCtx<'_>, &Dispatcher) -> T) -> T {
        let mut ctx = EditCtx::new(
            &mut self.buf,
            &mut self.cursor,
            &mut self.history,
            &mut self.view,
            &self.config,
        );
        let out = f(&mut ctx, &self.dispatcher);
        self.view.drawer.content_changed();
        out
    }

    fn press(&mut self, ev: InputEvent) -> bool {
        self.with_ctx(|ctx, d| d.handle_event(ctx, &ev))
    }

    fn run(&mut self, cmd: EditCommand) -> EditResult<()> {
        self.with_ctx(|ctx, _| tiledit_edit::run(ctx, &cmd))
    }

    fn text(&self) -> String {
        self.buf.to_string()
    }

    /// One UI loop turn: send queued clipboard replies, then advance
    /// waiting pastes.
    fn pump(&mut self) {
        for (reply, text) in self.view.queued_replies.drain(..) {
            reply.send(text);
        }
        for pending in std::mem::take(&mut self.view.pastes) {
            if let Some(rest) = self.with_ctx(|ctx, d| d.poll_paste(ctx, pending)) {
                self.view.pastes.push(rest);
            }
        }
    }
}

fn key(key: Key, mods: Modifiers) -> InputEvent {
    InputEvent::key(key, mods)
}

#[test]
fn backspace_removes_multibyte_rune() {
    let mut ed = Editor::new("aé", 3);
    assert!(ed.press(key(Key::Backspace, Modifiers::empty())));
    assert_eq!(ed.text(), "a");
    assert_eq!(ed.cursor.index(), 1);
}

#[test]
fn duplicate_last_line_then_undo() {
    let mut ed = Editor::new("abc", 0);
    ed.run(EditCommand::DuplicateLines).expect("duplicate");
    assert_eq!(ed.text(), "abc\nabc");
    assert_eq!(ed.cursor.selection(), Some((4, 7)));
    assert!(ed.press(key(Key::Char('z'), Modifiers::CTRL)));
    assert_eq!(ed.text(), "abc");
    assert_eq!(ed.cursor.index(), 0);
    assert!(ed.press(key(Key::Char('Z'), Modifiers::CTRL | Modifiers::SHIFT)));
    assert_eq!(ed.text(), "abc\nabc");
}

#[test]
fn comment_selection_at_smallest_indent() {
    let mut ed = Editor::new("  foo\n bar\n", 0);
    ed.view.comment = Some(CommentSym::Line("//".into()));
    ed.cursor.set_selection(0, 10);
    assert!(ed.press(key(Key::Char('d'), Modifiers::CTRL)));
    assert_eq!(ed.text(), " // foo\n //bar\n");
    assert!(ed.press(key(Key::Char('d'), Modifiers::CTRL | Modifiers::SHIFT)));
    assert_eq!(ed.text(), "  foo\n bar\n");
    assert!(ed.view.errors.is_empty());
}

#[test]
fn find_wraps_around() {
    let mut ed = Editor::new("0123456789abc", 10);
    ed.run(EditCommand::Find {
        query: "1".into(),
        reverse: false,
        opt: FindOpt::default(),
    })
    .expect("find");
    assert_eq!(ed.cursor.selection(), Some((1, 2)));
    assert_eq!(ed.cursor.index(), 2);
}

#[test]
fn clicks_and_arrows_use_drawer_geometry() {
    let mut ed = Editor::new("abcd\nef\nghij", 3);
    ed.press(key(Key::Down, Modifiers::empty()));
    assert_eq!(ed.cursor.index(), 7);
    ed.press(key(Key::Down, Modifiers::SHIFT));
    assert_eq!(ed.cursor.selection(), Some((7, 10)));

    ed.press(InputEvent::click(MouseButton::Left, Point::new(13, 10), Modifiers::empty(), 1));
    assert_eq!(ed.cursor.state(), tiledit_core::CursorState::at(7));
    ed.press(InputEvent::click(MouseButton::Left, Point::new(0, 0), Modifiers::SHIFT, 1));
    assert_eq!(ed.cursor.selection(), Some((0, 7)));
    assert_eq!(ed.view.primary.as_deref(), Some("abcd\nef"));

    ed.press(InputEvent::click(MouseButton::Left, Point::new(20, 20), Modifiers::empty(), 2));
    assert_eq!(ed.cursor.selection(), Some((8, 12)));
}

#[test]
fn paste_completes_on_the_next_ui_turn() {
    let mut ed = Editor::new("one two", 0);
    ed.cursor.set_selection(3, 7);
    ed.press(key(Key::Char('x'), Modifiers::CTRL));
    assert_eq!(ed.text(), "one");
    ed.press(key(Key::Home, Modifiers::empty()));
    ed.press(key(Key::Char('v'), Modifiers::CTRL));
    // the reply is still queued for the UI loop
    assert_eq!(ed.text(), "one");
    assert_eq!(ed.view.pastes.len(), 1);

    ed.pump();
    assert_eq!(ed.text(), " twoone");
    assert_eq!(ed.cursor.index(), 4);
    assert!(ed.view.pastes.is_empty());
    assert!(ed.view.errors.is_empty());
}

#[test]
fn paste_waits_for_background_clipboard() {
    let mut ed = Editor::new("abc", 3);
    ed.view.clipboard_delay = Some(Duration::from_millis(5));
    *ed.view.clipboard.lock().expect("lock") = "def".into();
    ed.press(key(Key::Char('v'), Modifiers::CTRL));
    for _ in 0..200 {
        ed.pump();
        if ed.view.pastes.is_empty() {
            break;
        }
        thread::sleep(Duration::from_millis(5));
    }
    assert_eq!(ed.text(), "abcdef");
    assert_eq!(ed.cursor.index(), 6);
    assert!(ed.view.errors.is_empty());
}

#[test]
fn slow_clipboard_times_out_without_editing() {
    let mut ed = Editor::new("abc", 1);
    ed.config.clipboard_timeout_ms = 20;
    ed.view.clipboard_delay = Some(Duration::from_millis(500));
    *ed.view.clipboard.lock().expect("lock") = "late".into();
    ed.press(key(Key::Char('v'), Modifiers::CTRL));
    thread::sleep(Duration::from_millis(40));
    ed.pump();
    assert_eq!(ed.text(), "abc");
    assert_eq!(ed.cursor.index(), 1);
    assert!(ed.view.pastes.is_empty());
    assert_eq!(ed.view.errors.len(), 1);
    assert!(ed.view.errors[0].contains("timed out"));
}

#[test]
fn selection_paints_through_colorize() {
    let mut ed = Editor::new("hello world", 0);
    ed.press(key(Key::Char('a'), Modifiers::CTRL));
    ed.cursor.set_selection(6, 11);
    let mut hl = Highlighter::new();
    let bg = rgb(10, 20, 30);
    hl.selection.bg = Some(bg);
    let state = ed.cursor.state();
    let drawer = &mut ed.view.drawer;
    drawer.measure(&ed.buf).expect("measure");
    hl.apply(drawer, &ed.buf, &state, &ed.config).expect("highlight");
    let mut img = RgbaImage::new(120, 20);
    assert_eq!(Canvas::bounds(&img), Rect::new(0, 0, 120, 20));
    drawer.draw(&ed.buf, &mut img, rgb(0, 0, 0)).expect("draw");
    assert_eq!(*img.get_pixel(36, 0), bg);
    assert_eq!(*img.get_pixel(60, 0), bg);
    assert_ne!(*img.get_pixel(30, 0), bg);
}
