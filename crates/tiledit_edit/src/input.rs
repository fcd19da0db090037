//! Input events and the table that maps them to edit commands.

use crate::commands::{run, EditCommand, PendingPaste};
use crate::ctx::{ClipboardChannel, EditCtx};
use crate::error::EditError;
use bitflags::bitflags;
use std::collections::HashMap;
use std::fmt;
use tiledit_draw::Point;
use tracing::{debug, warn};

bitflags! {
    /// Modifier keys held during an event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0000_0001;
        const CTRL = 0b0000_0010;
        const ALT = 0b0000_0100;
        const META = 0b0000_1000;
        const CAPS_LOCK = 0b0001_0000;
        const NUM_LOCK = 0b0010_0000;
    }
}

impl Modifiers {
    /// Lock keys never take part in binding lookups.
    pub fn without_locks(self) -> Self {
        self - (Self::CAPS_LOCK | Self::NUM_LOCK)
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.contains(Self::CTRL) {
            parts.push("Ctrl");
        }
        if self.contains(Self::ALT) {
            parts.push("Alt");
        }
        if self.contains(Self::SHIFT) {
            parts.push("Shift");
        }
        if self.contains(Self::META) {
            parts.push("Meta");
        }
        if parts.is_empty() {
            write!(f, "None")
        } else {
            write!(f, "{}", parts.join("+"))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Tab,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    WheelUp,
    WheelDown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Key {
        key: Key,
        mods: Modifiers,
    },
    /// `clicks` counts rapid repeats: 2 for a double click, 3 for a triple.
    MouseDown {
        button: MouseButton,
        point: Point,
        mods: Modifiers,
        clicks: u8,
    },
    MouseDrag {
        button: MouseButton,
        point: Point,
        mods: Modifiers,
    },
}

impl InputEvent {
    pub fn key(key: Key, mods: Modifiers) -> Self {
        Self::Key { key, mods }
    }

    pub fn click(button: MouseButton, point: Point, mods: Modifiers, clicks: u8) -> Self {
        Self::MouseDown {
            button,
            point,
            mods,
            clicks,
        }
    }

    pub fn mods(&self) -> Modifiers {
        match self {
            Self::Key { mods, .. } | Self::MouseDown { mods, .. } | Self::MouseDrag { mods, .. } => {
                *mods
            }
        }
    }

    pub fn point(&self) -> Option<Point> {
        match self {
            Self::Key { .. } => None,
            Self::MouseDown { point, .. } | Self::MouseDrag { point, .. } => Some(*point),
        }
    }

    fn shift(&self) -> bool {
        self.mods().contains(Modifiers::SHIFT)
    }
}

/// Event kind a binding is keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// Letters are stored lowercase.
    Key(Key),
    /// Any printable rune without a command modifier.
    Text,
    Click(MouseButton, u8),
    Drag(MouseButton),
}

impl Trigger {
    fn of(ev: &InputEvent) -> Self {
        match ev {
            InputEvent::Key {
                key: Key::Char(c), ..
            } => Trigger::Key(Key::Char(c.to_ascii_lowercase())),
            InputEvent::Key { key, .. } => Trigger::Key(*key),
            InputEvent::MouseDown {
                button: button @ (MouseButton::WheelUp | MouseButton::WheelDown),
                ..
            } => Trigger::Click(*button, 1),
            InputEvent::MouseDown { button, clicks, .. } => Trigger::Click(*button, (*clicks).clamp(1, 3)),
            InputEvent::MouseDrag { button, .. } => Trigger::Drag(*button),
        }
    }
}

/// Builds the command for a matched event; `None` declines it.
pub type Binding = fn(&InputEvent) -> Option<EditCommand>;

/// Table from `(trigger, modifiers)` to a command builder.
#[derive(Clone)]
pub struct Dispatcher {
    table: HashMap<(Trigger, Modifiers), Binding>,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("bindings", &self.table.len())
            .finish()
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        let mut d = Self::empty();
        d.bind_defaults();
        d
    }
}

const NONE: Modifiers = Modifiers::empty();
const SHIFT: Modifiers = Modifiers::SHIFT;
const CTRL: Modifiers = Modifiers::CTRL;
const CTRL_SHIFT: Modifiers = Modifiers::CTRL.union(Modifiers::SHIFT);

impl Dispatcher {
    pub fn empty() -> Self {
        Self {
            table: HashMap::new(),
        }
    }

    pub fn bind(&mut self, trigger: Trigger, mods: Modifiers, f: Binding) {
        self.table.insert((trigger, mods.without_locks()), f);
    }

    pub fn unbind(&mut self, trigger: Trigger, mods: Modifiers) -> Option<Binding> {
        self.table.remove(&(trigger, mods.without_locks()))
    }

    fn bind_both(&mut self, trigger: Trigger, mods: Modifiers, f: Binding) {
        self.bind(trigger, mods, f);
        self.bind(trigger, mods | SHIFT, f);
    }

    fn bind_defaults(&mut self) {
        use EditCommand as C;

        self.bind_both(Trigger::Key(Key::Left), NONE, |ev| Some(C::MoveLeft { select: ev.shift() }));
        self.bind_both(Trigger::Key(Key::Right), NONE, |ev| Some(C::MoveRight { select: ev.shift() }));
        self.bind_both(Trigger::Key(Key::Up), NONE, |ev| Some(C::MoveUp { select: ev.shift() }));
        self.bind_both(Trigger::Key(Key::Down), NONE, |ev| Some(C::MoveDown { select: ev.shift() }));
        self.bind_both(Trigger::Key(Key::Left), CTRL, |ev| Some(C::JumpLeft { select: ev.shift() }));
        self.bind_both(Trigger::Key(Key::Right), CTRL, |ev| Some(C::JumpRight { select: ev.shift() }));
        self.bind_both(Trigger::Key(Key::Home), NONE, |ev| Some(C::StartOfLine { select: ev.shift() }));
        self.bind_both(Trigger::Key(Key::End), NONE, |ev| Some(C::EndOfLine { select: ev.shift() }));
        self.bind(Trigger::Key(Key::PageUp), NONE, |_| Some(C::PageUp));
        self.bind(Trigger::Key(Key::PageDown), NONE, |_| Some(C::PageDown));

        self.bind_both(Trigger::Key(Key::Backspace), NONE, |_| Some(C::Backspace));
        self.bind(Trigger::Key(Key::Delete), NONE, |_| Some(C::Delete));
        self.bind_both(Trigger::Key(Key::Enter), NONE, |_| Some(C::AutoIndent));
        self.bind(Trigger::Key(Key::Tab), NONE, |_| Some(C::TabRight));
        self.bind(Trigger::Key(Key::Tab), SHIFT, |_| Some(C::TabLeft));
        self.bind(Trigger::Key(Key::Up), Modifiers::ALT, |_| Some(C::MoveLineUp));
        self.bind(Trigger::Key(Key::Down), Modifiers::ALT, |_| Some(C::MoveLineDown));
        self.bind(Trigger::Key(Key::Down), CTRL | Modifiers::ALT, |_| Some(C::DuplicateLines));
        self.bind_both(Trigger::Text, NONE, |ev| match ev {
            InputEvent::Key {
                key: Key::Char(c), ..
            } if !c.is_control() => Some(C::InsertString(c.to_string())),
            _ => None,
        });

        let ctrl_char = |c: char| Trigger::Key(Key::Char(c));
        self.bind(ctrl_char('a'), CTRL, |_| Some(C::SelectAll));
        self.bind(ctrl_char('c'), CTRL, |_| Some(C::Copy));
        self.bind(ctrl_char('x'), CTRL, |_| Some(C::Cut));
        self.bind(ctrl_char('v'), CTRL, |_| Some(C::Paste(ClipboardChannel::Clipboard)));
        self.bind(ctrl_char('z'), CTRL, |_| Some(C::Undo));
        self.bind(ctrl_char('d'), CTRL, |_| Some(C::Comment));
        self.bind(ctrl_char('k'), CTRL, |_| Some(C::RemoveLines));
        self.bind(ctrl_char('f'), CTRL, |_| Some(C::FindShortcut));
        self.bind(ctrl_char('s'), CTRL, |_| Some(C::Save));
        self.bind(ctrl_char('z'), CTRL_SHIFT, |_| Some(C::Redo));
        self.bind(ctrl_char('d'), CTRL_SHIFT, |_| Some(C::Uncomment));

        self.bind_both(Trigger::Click(MouseButton::Left, 1), NONE, |ev| {
            Some(C::MoveToPoint {
                point: ev.point()?,
                select: ev.shift(),
            })
        });
        self.bind(Trigger::Click(MouseButton::Left, 2), NONE, |ev| {
            Some(C::SelectWordAt(ev.point()?))
        });
        self.bind(Trigger::Click(MouseButton::Left, 3), NONE, |ev| {
            Some(C::SelectLineAt(ev.point()?))
        });
        self.bind(Trigger::Drag(MouseButton::Left), NONE, |ev| {
            Some(C::MoveToPoint {
                point: ev.point()?,
                select: true,
            })
        });
        self.bind(Trigger::Click(MouseButton::Middle, 1), NONE, |ev| {
            Some(C::PasteAt(ev.point()?, ClipboardChannel::Primary))
        });
        self.bind(Trigger::Click(MouseButton::WheelUp, 1), NONE, |_| Some(C::ScrollUp));
        self.bind(Trigger::Click(MouseButton::WheelDown, 1), NONE, |_| Some(C::ScrollDown));
    }

    /// Command bound to `ev`, if any.
    pub fn command_for(&self, ev: &InputEvent) -> Option<EditCommand> {
        let mods = ev.mods().without_locks();
        let trigger = Trigger::of(ev);
        if let Some(f) = self.table.get(&(trigger, mods)) {
            return f(ev);
        }
        match ev {
            InputEvent::Key {
                key: Key::Char(_), ..
            } => self.table.get(&(Trigger::Text, mods)).and_then(|f| f(ev)),
            _ => None,
        }
    }

    /// Run the command bound to `ev`. Failures go to the host unless they
    /// are silent. Returns whether a binding matched.
    pub fn handle_event(&self, ctx: &mut EditCtx<'_>, ev: &InputEvent) -> bool {
        let Some(cmd) = self.command_for(ev) else {
            return false;
        };
        debug!(command = cmd.name(), mods = %ev.mods().without_locks(), "dispatch");
        if let Err(err) = run(ctx, &cmd) {
            report(ctx, cmd.name(), &err);
        }
        true
    }

    /// Advance a paste waiting on its clipboard reply, from the UI loop.
    /// Returns it while still waiting; failures go to the host.
    pub fn poll_paste(&self, ctx: &mut EditCtx<'_>, pending: PendingPaste) -> Option<PendingPaste> {
        match pending.poll(ctx) {
            Ok(rest) => rest,
            Err(err) => {
                report(ctx, "paste", &err);
                None
            }
        }
    }
}

fn report(ctx: &mut EditCtx<'_>, command: &'static str, err: &EditError) {
    if !err.is_silent() {
        warn!(command, error = %err, "command failed");
        ctx.fns.error(err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::Fixture;
    use crate::ctx::CommentSym;

    fn key(c: char, mods: Modifiers) -> InputEvent {
        InputEvent::key(Key::Char(c), mods)
    }

    #[test]
    fn lock_keys_are_ignored() {
        let d = Dispatcher::default();
        let caps = Modifiers::CTRL | Modifiers::CAPS_LOCK | Modifiers::NUM_LOCK;
        assert_eq!(d.command_for(&key('z', caps)), Some(EditCommand::Undo));
        assert_eq!(d.command_for(&key('Z', CTRL_SHIFT)), Some(EditCommand::Redo));
        assert_eq!(d.command_for(&key('D', CTRL_SHIFT)), Some(EditCommand::Uncomment));
    }

    #[test]
    fn printable_keys_insert_text() {
        let d = Dispatcher::default();
        assert_eq!(
            d.command_for(&key('Q', SHIFT | Modifiers::CAPS_LOCK)),
            Some(EditCommand::InsertString("Q".into()))
        );
        assert_eq!(d.command_for(&key('q', CTRL)), None);
        assert_eq!(d.command_for(&key('\u{7}', NONE)), None);
        assert_eq!(
            d.command_for(&InputEvent::key(Key::Left, SHIFT)),
            Some(EditCommand::MoveLeft { select: true })
        );
    }

    #[test]
    fn mouse_bindings() {
        let d = Dispatcher::default();
        let p = Point::new(12, 5);
        assert_eq!(
            d.command_for(&InputEvent::click(MouseButton::Left, p, SHIFT, 1)),
            Some(EditCommand::MoveToPoint { point: p, select: true })
        );
        assert_eq!(
            d.command_for(&InputEvent::click(MouseButton::Left, p, NONE, 2)),
            Some(EditCommand::SelectWordAt(p))
        );
        assert_eq!(
            d.command_for(&InputEvent::click(MouseButton::Left, p, NONE, 7)),
            Some(EditCommand::SelectLineAt(p))
        );
        assert_eq!(
            d.command_for(&InputEvent::click(MouseButton::Middle, p, NONE, 1)),
            Some(EditCommand::PasteAt(p, ClipboardChannel::Primary))
        );
        assert_eq!(
            d.command_for(&InputEvent::click(MouseButton::WheelDown, p, NONE, 2)),
            Some(EditCommand::ScrollDown)
        );
    }

    #[test]
    fn custom_bindings_replace_defaults() {
        let mut d = Dispatcher::default();
        d.bind(Trigger::Key(Key::Char('d')), CTRL, |_| Some(EditCommand::DuplicateLines));
        assert_eq!(d.command_for(&key('d', CTRL)), Some(EditCommand::DuplicateLines));
        assert!(d.unbind(Trigger::Key(Key::Char('d')), CTRL).is_some());
        assert_eq!(d.command_for(&key('d', CTRL)), None);
    }

    #[test]
    fn handle_event_routes_errors_to_host() {
        let d = Dispatcher::default();
        let mut fx = Fixture::new("ab", 0);
        fx.run(|ctx| {
            assert!(d.handle_event(ctx, &key('a', CTRL)));
            // nothing to undo stays quiet
            assert!(d.handle_event(ctx, &key('z', CTRL)));
            // no comment symbol for this host
            assert!(d.handle_event(ctx, &key('d', CTRL)));
            assert!(!d.handle_event(ctx, &key('q', CTRL)));
            Ok(())
        })
        .expect("run");
        assert_eq!(fx.cursor.selection(), Some((0, 2)));
        assert_eq!(fx.host.errors.len(), 1);
    }

    #[test]
    fn deferred_paste_completes_through_poll_paste() {
        let d = Dispatcher::default();
        let mut fx = Fixture::new("ab", 1);
        fx.host.clipboard_silent = true;
        fx.run(|ctx| {
            assert!(d.handle_event(ctx, &key('v', CTRL)));
            Ok(())
        })
        .expect("run");
        assert_eq!(fx.text(), "ab");

        let reply = fx.host.pending.pop().expect("clipboard request");
        assert!(reply.send("Q".to_string()));
        let pending = fx.host.pastes.pop().expect("pending paste");
        let mut rest = None;
        fx.run(|ctx| {
            rest = d.poll_paste(ctx, pending);
            Ok(())
        })
        .expect("run");
        assert!(rest.is_none());
        assert_eq!(fx.text(), "aQb");
        assert!(fx.host.errors.is_empty());
    }

    #[test]
    fn expired_paste_is_reported_once() {
        let d = Dispatcher::default();
        let mut fx = Fixture::new("ab", 1);
        fx.host.clipboard_silent = true;
        fx.config.clipboard_timeout_ms = 0;
        fx.run(|ctx| {
            d.handle_event(ctx, &key('v', CTRL));
            Ok(())
        })
        .expect("run");
        assert_eq!(fx.text(), "ab");
        assert!(fx.host.pastes.is_empty());
        assert_eq!(fx.host.errors.len(), 1);
        assert!(fx.host.errors[0].contains("timed out"));
    }

    #[test]
    fn typing_through_the_dispatcher() {
        let d = Dispatcher::default();
        let mut fx = Fixture::new("x", 1);
        fx.host.comment = Some(CommentSym::Line("#".into()));
        fx.run(|ctx| {
            for c in "yz".chars() {
                d.handle_event(ctx, &key(c, NONE));
            }
            d.handle_event(ctx, &key('d', CTRL));
            d.handle_event(ctx, &InputEvent::key(Key::Enter, NONE));
            Ok(())
        })
        .expect("run");
        assert_eq!(fx.text(), "#xyz\n");
        assert_eq!(fx.cursor.index(), 5);
        assert!(fx.host.errors.is_empty());
    }
}
