//! Invertible write records and the grouped undo/redo log built from them.

use crate::config::Config;
use crate::cursor::CursorState;
use crate::error::RwResult;
use crate::rw::Writer;
use std::time::{Duration, Instant};

/// Which way a record is replayed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Undo,
    Redo,
}

/// Everything needed to revert (or replay) one buffer write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UndoRecord {
    /// `bytes` were inserted at `i`.
    Inserted { i: usize, bytes: Vec<u8> },
    /// `bytes` were removed from `i`.
    Deleted { i: usize, bytes: Vec<u8> },
    /// `old` at `i` was replaced by `new`.
    Overwritten { i: usize, old: Vec<u8>, new: Vec<u8> },
}

impl UndoRecord {
    /// Replay the record against a writer.
    pub fn apply(&self, w: &mut dyn Writer, dir: Direction) -> RwResult<()> {
        match (self, dir) {
            (Self::Inserted { i, bytes }, Direction::Undo)
            | (Self::Deleted { i, bytes }, Direction::Redo) => {
                w.delete(*i, bytes.len())?;
            }
            (Self::Inserted { i, bytes }, Direction::Redo)
            | (Self::Deleted { i, bytes }, Direction::Undo) => {
                w.insert(*i, bytes)?;
            }
            (Self::Overwritten { i, old, new }, Direction::Undo) => {
                w.overwrite(*i, new.len(), old)?;
            }
            (Self::Overwritten { i, old, new }, Direction::Redo) => {
                w.overwrite(*i, old.len(), new)?;
            }
        }
        Ok(())
    }

    /// Offset where a cursor naturally lands after replaying the record.
    pub fn cursor_after(&self, dir: Direction) -> usize {
        match (self, dir) {
            (Self::Inserted { i, bytes }, Direction::Redo)
            | (Self::Deleted { i, bytes }, Direction::Undo) => i + bytes.len(),
            (Self::Overwritten { i, old, .. }, Direction::Undo) => i + old.len(),
            (Self::Overwritten { i, new, .. }, Direction::Redo) => i + new.len(),
            (Self::Inserted { i, .. }, Direction::Undo)
            | (Self::Deleted { i, .. }, Direction::Redo) => *i,
        }
    }

    /// Bytes retained by the record.
    pub fn byte_len(&self) -> usize {
        match self {
            Self::Inserted { bytes, .. } | Self::Deleted { bytes, .. } => bytes.len(),
            Self::Overwritten { old, new, .. } => old.len().saturating_add(new.len()),
        }
    }

    /// True when replaying the record cannot change the buffer.
    pub fn is_noop(&self) -> bool {
        match self {
            Self::Inserted { bytes, .. } | Self::Deleted { bytes, .. } => bytes.is_empty(),
            Self::Overwritten { old, new, .. } => old == new,
        }
    }
}

#[derive(Clone, Debug)]
struct Group {
    records: Vec<UndoRecord>,
    before: CursorState,
    after: CursorState,
    typing: bool,
    at: Instant,
}

impl Group {
    fn bytes(&self) -> usize {
        self.records.iter().map(UndoRecord::byte_len).sum()
    }
}

/// Bounded undo/redo log of record groups.
///
/// Every user-visible action is one group. Groups can nest; only the
/// outermost `group_end` commits. Records pushed outside a group become a
/// group of their own.
#[derive(Debug)]
pub struct History {
    undo: Vec<Group>,
    redo: Vec<Group>,
    open: Option<Group>,
    depth: usize,
    undo_bytes: usize,
    max_groups: usize,
    max_bytes: usize,
    coalesce_window: Duration,
}

impl Default for History {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl History {
    pub fn new(config: &Config) -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            open: None,
            depth: 0,
            undo_bytes: 0,
            max_groups: config.undo_max_groups.max(1),
            max_bytes: config.undo_max_bytes,
            coalesce_window: Duration::from_millis(config.undo_coalesce_ms),
        }
    }

    /// Start (or nest into) a group, remembering the cursor before it.
    pub fn group_begin(&mut self, before: CursorState) {
        if self.depth == 0 {
            self.open = Some(Group {
                records: Vec::new(),
                before,
                after: before,
                typing: false,
                at: Instant::now(),
            });
        }
        self.depth += 1;
    }

    /// Close a group; the outermost close commits it.
    pub fn group_end(&mut self, after: CursorState) {
        if self.depth == 0 {
            return;
        }
        self.depth -= 1;
        if self.depth > 0 {
            return;
        }
        if let Some(mut group) = self.open.take() {
            group.after = after;
            group.at = Instant::now();
            self.commit(group);
        }
    }

    /// Mark the open group as plain typing so it may merge with its neighbor.
    pub fn mark_typing(&mut self) {
        if let Some(group) = self.open.as_mut() {
            group.typing = true;
        }
    }

    /// Record a write.
    pub fn push(&mut self, record: UndoRecord) {
        if record.is_noop() {
            return;
        }
        match self.open.as_mut() {
            Some(group) => group.records.push(record),
            None => {
                let before = CursorState::at(record.cursor_after(Direction::Undo));
                let after = CursorState::at(record.cursor_after(Direction::Redo));
                self.commit(Group {
                    records: vec![record],
                    before,
                    after,
                    typing: false,
                    at: Instant::now(),
                });
            }
        }
    }

    fn commit(&mut self, group: Group) {
        if group.records.is_empty() {
            return;
        }
        self.redo.clear();
        if let Some(last) = self.undo.last_mut() {
            if Self::can_coalesce(last, &group, self.coalesce_window) {
                if let (
                    Some(UndoRecord::Inserted { bytes, .. }),
                    Some(UndoRecord::Inserted { bytes: more, .. }),
                ) = (last.records.last_mut(), group.records.first())
                {
                    bytes.extend_from_slice(more);
                    self.undo_bytes = self.undo_bytes.saturating_add(more.len());
                    last.after = group.after;
                    last.at = group.at;
                    self.trim_undo();
                    return;
                }
            }
        }
        self.undo_bytes = self.undo_bytes.saturating_add(group.bytes());
        self.undo.push(group);
        self.trim_undo();
    }

    fn can_coalesce(previous: &Group, next: &Group, window: Duration) -> bool {
        if !previous.typing || !next.typing {
            return false;
        }
        if next.at.saturating_duration_since(previous.at) > window {
            return false;
        }
        match (previous.records.as_slice(), next.records.as_slice()) {
            (
                [UndoRecord::Inserted { i: pi, bytes: pb }],
                [UndoRecord::Inserted { i: ni, .. }],
            ) => *ni == pi + pb.len() && !pb.ends_with(b"\n"),
            _ => false,
        }
    }

    fn trim_undo(&mut self) {
        while self.undo.len() > self.max_groups || self.undo_bytes > self.max_bytes {
            if self.undo.len() <= 1 {
                break;
            }
            let removed = self.undo.remove(0);
            self.undo_bytes = self.undo_bytes.saturating_sub(removed.bytes());
        }
    }

    /// Revert the latest group. Returns the cursor to restore, or `None`
    /// when there is nothing to undo.
    pub fn undo(&mut self, w: &mut dyn Writer) -> RwResult<Option<CursorState>> {
        let Some(group) = self.undo.pop() else {
            return Ok(None);
        };
        let applied = group
            .records
            .iter()
            .rev()
            .try_for_each(|rec| rec.apply(w, Direction::Undo));
        if let Err(err) = applied {
            self.undo.push(group);
            return Err(err);
        }
        self.undo_bytes = self.undo_bytes.saturating_sub(group.bytes());
        let cursor = group.before;
        self.redo.push(group);
        Ok(Some(cursor))
    }

    /// Replay the latest undone group.
    pub fn redo(&mut self, w: &mut dyn Writer) -> RwResult<Option<CursorState>> {
        let Some(group) = self.redo.pop() else {
            return Ok(None);
        };
        let applied = group
            .records
            .iter()
            .try_for_each(|rec| rec.apply(w, Direction::Redo));
        if let Err(err) = applied {
            self.redo.push(group);
            return Err(err);
        }
        self.undo_bytes = self.undo_bytes.saturating_add(group.bytes());
        let cursor = group.after;
        self.undo.push(group);
        self.trim_undo();
        Ok(Some(cursor))
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Number of committed undo groups.
    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
        self.open = None;
        self.depth = 0;
        self.undo_bytes = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rw::{Reader, RopeBuffer};

    fn text(buf: &RopeBuffer) -> String {
        buf.to_string()
    }

    #[test]
    fn records_revert_their_write() {
        let mut buf = RopeBuffer::new("hello world");
        let rec = buf.overwrite(0, 5, "bye".as_bytes()).expect("overwrite");
        assert_eq!(text(&buf), "bye world");
        rec.apply(&mut buf, Direction::Undo).expect("undo");
        assert_eq!(text(&buf), "hello world");
        rec.apply(&mut buf, Direction::Redo).expect("redo");
        assert_eq!(text(&buf), "bye world");
        rec.apply(&mut buf, Direction::Undo).expect("undo again");
        assert_eq!(text(&buf), "hello world");
    }

    #[test]
    fn delete_record_reinserts_bytes() {
        let mut buf = RopeBuffer::new("aé b");
        let rec = buf.delete(1, 2).expect("delete");
        assert_eq!(rec.cursor_after(Direction::Undo), 3);
        rec.apply(&mut buf, Direction::Undo).expect("undo");
        assert_eq!(text(&buf), "aé b");
        assert_eq!(buf.len(), 5);
    }

    #[test]
    fn group_undoes_as_one_action() {
        let mut buf = RopeBuffer::new("abc");
        let mut history = History::default();
        history.group_begin(CursorState::at(0));
        history.push(buf.insert(0, b"x").expect("insert"));
        history.group_begin(CursorState::at(1));
        history.push(buf.delete(3, 1).expect("delete"));
        history.group_end(CursorState::at(1));
        history.group_end(CursorState::at(3));
        assert_eq!(text(&buf), "xab");
        assert_eq!(history.undo_len(), 1);

        let cursor = history.undo(&mut buf).expect("undo");
        assert_eq!(cursor, Some(CursorState::at(0)));
        assert_eq!(text(&buf), "abc");
        let cursor = history.redo(&mut buf).expect("redo");
        assert_eq!(cursor, Some(CursorState::at(3)));
        assert_eq!(text(&buf), "xab");
        assert!(!history.can_redo());
    }

    #[test]
    fn empty_groups_are_dropped() {
        let mut history = History::default();
        history.group_begin(CursorState::at(0));
        history.group_end(CursorState::at(0));
        assert!(!history.can_undo());
    }

    #[test]
    fn adjacent_typing_coalesces() {
        let mut buf = RopeBuffer::new("");
        let mut history = History::default();
        for (n, ch) in ["h", "i"].into_iter().enumerate() {
            history.group_begin(CursorState::at(n));
            history.mark_typing();
            history.push(buf.insert(n, ch.as_bytes()).expect("insert"));
            history.group_end(CursorState::at(n + 1));
        }
        assert_eq!(history.undo_len(), 1);
        history.undo(&mut buf).expect("undo");
        assert_eq!(text(&buf), "");
    }

    #[test]
    fn non_adjacent_typing_stays_separate() {
        let mut buf = RopeBuffer::new("abc");
        let mut history = History::default();
        for i in [0usize, 3] {
            history.group_begin(CursorState::at(i));
            history.mark_typing();
            history.push(buf.insert(i, b"z").expect("insert"));
            history.group_end(CursorState::at(i + 1));
        }
        assert_eq!(history.undo_len(), 2);
    }

    #[test]
    fn new_push_clears_redo() {
        let mut buf = RopeBuffer::new("abc");
        let mut history = History::default();
        history.push(buf.insert(0, b"1").expect("insert"));
        history.undo(&mut buf).expect("undo");
        assert!(history.can_redo());
        history.push(buf.insert(0, b"2").expect("insert"));
        assert!(!history.can_redo());
        assert_eq!(history.undo(&mut buf).expect("undo"), Some(CursorState::at(0)));
        assert_eq!(history.undo(&mut buf).expect("empty"), None);
    }

    #[test]
    fn trims_oldest_groups() {
        let config = Config {
            undo_max_groups: 2,
            ..Config::default()
        };
        let mut buf = RopeBuffer::new("");
        let mut history = History::new(&config);
        for n in 0..4 {
            history.push(buf.insert(n, b"x").expect("insert"));
        }
        assert_eq!(history.undo_len(), 2);
    }
}
