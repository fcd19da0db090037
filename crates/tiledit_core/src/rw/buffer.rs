//! Rope-backed text storage addressed by byte offsets.

use super::event::{BufferEvent, ChangedEvent, EventKind, EventRegister, PreWriteEvent};
use super::{check_range, Reader, WriteKind, WriteOp, Writer};
use crate::constants::{SHRINK_CAPACITY_FACTOR, SHRINK_MIN_LEN};
use crate::error::{RwError, RwResult};
use crate::undo::UndoRecord;
use ropey::Rope;
use std::borrow::Cow;
use std::fmt;
use tracing::debug;

/// Rope-backed content buffer.
///
/// The rope keeps content valid UTF-8; writes that would split a rune or
/// insert malformed bytes are rejected with [`RwError::InvalidEncoding`].
#[derive(Default)]
pub struct RopeBuffer {
    rope: Rope,
    revision: u64,
    events: EventRegister,
}

impl fmt::Debug for RopeBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RopeBuffer")
            .field("len", &self.rope.len_bytes())
            .field("revision", &self.revision)
            .finish()
    }
}

impl fmt::Display for RopeBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.rope, f)
    }
}

impl RopeBuffer {
    /// Create a buffer from UTF-8 text.
    pub fn new(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            revision: 0,
            events: EventRegister::default(),
        }
    }

    /// Create a buffer from bytes, rejecting malformed UTF-8.
    pub fn from_bytes(bytes: &[u8]) -> RwResult<Self> {
        let text = std::str::from_utf8(bytes).map_err(|_| RwError::InvalidEncoding)?;
        Ok(Self::new(text))
    }

    /// Returns a borrowed rope handle.
    pub fn rope(&self) -> &Rope {
        &self.rope
    }

    /// Monotonic counter bumped by every applied write.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Content length in bytes.
    pub fn len_bytes(&self) -> usize {
        self.rope.len_bytes()
    }

    /// Subscriber registry for write notifications.
    pub fn events_mut(&mut self) -> &mut EventRegister {
        &mut self.events
    }

    /// Replace the whole content without emitting events or undo records.
    pub fn reset(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
        self.revision = self.revision.wrapping_add(1);
    }

    fn char_index(&self, byte: usize) -> RwResult<usize> {
        if byte > self.rope.len_bytes() {
            return Err(RwError::OutOfRange);
        }
        let ci = self.rope.byte_to_char(byte);
        if self.rope.char_to_byte(ci) != byte {
            return Err(RwError::InvalidEncoding);
        }
        Ok(ci)
    }

    fn write(&mut self, op: WriteOp, bytes: &[u8]) -> RwResult<UndoRecord> {
        check_range(0, self.rope.len_bytes(), op.offset, op.del_n)?;
        let text = std::str::from_utf8(bytes).map_err(|_| RwError::InvalidEncoding)?;
        let start = self.char_index(op.offset)?;
        let end = self.char_index(op.offset + op.del_n)?;
        if bytes.len() > isize::MAX as usize
            || self
                .rope
                .len_bytes()
                .checked_add(bytes.len())
                .map_or(true, |n| n > isize::MAX as usize)
        {
            return Err(RwError::FatalAlloc);
        }

        let old = self.read_n_copy(op.offset, op.del_n)?;
        let record = match op.kind {
            WriteKind::Insert => UndoRecord::Inserted {
                i: op.offset,
                bytes: bytes.to_vec(),
            },
            WriteKind::Delete => UndoRecord::Deleted {
                i: op.offset,
                bytes: old.clone(),
            },
            WriteKind::Overwrite => UndoRecord::Overwritten {
                i: op.offset,
                old: old.clone(),
                new: bytes.to_vec(),
            },
        };
        if op.del_n == 0 && bytes.is_empty() {
            return Ok(record);
        }

        if self.events.has_subscribers(EventKind::PreWrite) {
            let mut pre = PreWriteEvent {
                op,
                reply_err: None,
            };
            self.events.emit(&mut BufferEvent::PreWrite(&mut pre));
            if let Some(reason) = pre.reply_err {
                debug!(offset = op.offset, kind = ?op.kind, %reason, "buffer write vetoed");
                return Err(RwError::VetoedWrite(reason));
            }
        }

        if start < end {
            self.rope.remove(start..end);
        }
        if !text.is_empty() {
            self.rope.insert(start, text);
        }
        self.revision = self.revision.wrapping_add(1);
        self.maybe_shrink();

        self.events.emit(&mut BufferEvent::PostWrite(&op));
        let changed = ChangedEvent {
            op,
            changed: old.as_slice() != bytes,
        };
        self.events.emit(&mut BufferEvent::Changed(&changed));
        Ok(record)
    }

    fn maybe_shrink(&mut self) {
        let len = self.rope.len_bytes();
        if len > SHRINK_MIN_LEN && self.rope.capacity() > SHRINK_CAPACITY_FACTOR * len {
            let before = self.rope.capacity();
            self.rope.shrink_to_fit();
            debug!(len, before, after = self.rope.capacity(), "buffer storage shrunk");
        }
    }
}

impl Reader for RopeBuffer {
    fn min(&self) -> usize {
        0
    }

    fn content_revision(&self) -> Option<u64> {
        Some(self.revision)
    }

    fn max(&self) -> usize {
        self.rope.len_bytes()
    }

    fn read_rune_at(&self, i: usize) -> RwResult<(char, usize)> {
        let max = self.rope.len_bytes();
        if i > max {
            return Err(RwError::OutOfRange);
        }
        if i == max {
            return Err(RwError::EndOfRange);
        }
        let (chunk, chunk_start, _, _) = self.rope.chunk_at_byte(i);
        let local = i - chunk_start;
        if !chunk.is_char_boundary(local) {
            return Err(RwError::InvalidEncoding);
        }
        chunk[local..]
            .chars()
            .next()
            .map(|ru| (ru, ru.len_utf8()))
            .ok_or(RwError::EndOfRange)
    }

    fn read_last_rune_at(&self, i: usize) -> RwResult<(char, usize)> {
        if i > self.rope.len_bytes() {
            return Err(RwError::OutOfRange);
        }
        if i == 0 {
            return Err(RwError::EndOfRange);
        }
        let (chunk, chunk_start, _, _) = self.rope.chunk_at_byte(i - 1);
        let local = i - chunk_start;
        if !chunk.is_char_boundary(local) {
            return Err(RwError::InvalidEncoding);
        }
        chunk[..local]
            .chars()
            .next_back()
            .map(|ru| (ru, ru.len_utf8()))
            .ok_or(RwError::EndOfRange)
    }

    fn read_n_fast(&self, i: usize, n: usize) -> RwResult<Cow<'_, [u8]>> {
        check_range(0, self.rope.len_bytes(), i, n)?;
        if n == 0 {
            return Ok(Cow::Borrowed(&[]));
        }
        let (chunk, chunk_start, _, _) = self.rope.chunk_at_byte(i);
        let local = i - chunk_start;
        if local + n <= chunk.len() {
            return Ok(Cow::Borrowed(&chunk.as_bytes()[local..local + n]));
        }
        Ok(Cow::Owned(self.rope.bytes_at(i).take(n).collect()))
    }
}

impl Writer for RopeBuffer {
    fn insert(&mut self, i: usize, bytes: &[u8]) -> RwResult<UndoRecord> {
        let op = WriteOp {
            kind: WriteKind::Insert,
            offset: i,
            del_n: 0,
            ins_n: bytes.len(),
        };
        self.write(op, bytes)
    }

    fn delete(&mut self, i: usize, n: usize) -> RwResult<UndoRecord> {
        let op = WriteOp {
            kind: WriteKind::Delete,
            offset: i,
            del_n: n,
            ins_n: 0,
        };
        self.write(op, &[])
    }

    fn overwrite(&mut self, i: usize, n: usize, bytes: &[u8]) -> RwResult<UndoRecord> {
        let op = WriteOp {
            kind: WriteKind::Overwrite,
            offset: i,
            del_n: n,
            ins_n: bytes.len(),
        };
        self.write(op, bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rw::LimitedReader;
    use std::sync::{Arc, Mutex};

    #[test]
    fn reads_runes_in_both_directions() {
        let buf = RopeBuffer::new("aé");
        assert_eq!(buf.read_rune_at(0), Ok(('a', 1)));
        assert_eq!(buf.read_rune_at(1), Ok(('é', 2)));
        assert_eq!(buf.read_rune_at(2), Err(RwError::InvalidEncoding));
        assert_eq!(buf.read_rune_at(3), Err(RwError::EndOfRange));
        assert_eq!(buf.read_rune_at(4), Err(RwError::OutOfRange));
        assert_eq!(buf.read_last_rune_at(3), Ok(('é', 2)));
        assert_eq!(buf.read_last_rune_at(1), Ok(('a', 1)));
        assert_eq!(buf.read_last_rune_at(0), Err(RwError::EndOfRange));
    }

    #[test]
    fn writes_return_inverse_records() {
        let mut buf = RopeBuffer::new("hello");
        let rec = buf.insert(5, b" world").expect("insert");
        assert_eq!(
            rec,
            UndoRecord::Inserted {
                i: 5,
                bytes: b" world".to_vec()
            }
        );
        let rec = buf.delete(0, 1).expect("delete");
        assert_eq!(
            rec,
            UndoRecord::Deleted {
                i: 0,
                bytes: b"h".to_vec()
            }
        );
        let rec = buf.overwrite(0, 4, b"J").expect("overwrite");
        assert_eq!(
            rec,
            UndoRecord::Overwritten {
                i: 0,
                old: b"ello".to_vec(),
                new: b"J".to_vec()
            }
        );
        assert_eq!(buf.to_string(), "J world");
    }

    #[test]
    fn rejects_partial_rune_and_malformed_writes() {
        let mut buf = RopeBuffer::new("é");
        assert_eq!(buf.insert(1, b"x"), Err(RwError::InvalidEncoding));
        assert_eq!(buf.insert(0, &[0xff]), Err(RwError::InvalidEncoding));
        assert_eq!(buf.delete(0, 1), Err(RwError::InvalidEncoding));
        assert_eq!(buf.delete(1, 5), Err(RwError::OutOfRange));
        assert_eq!(buf.to_string(), "é");
    }

    #[test]
    fn read_n_fast_copies_across_chunks() {
        let text = "abcdefghij".repeat(500);
        let buf = RopeBuffer::new(&text);
        let got = buf.read_n_fast(10, 3000).expect("read");
        assert_eq!(&got[..], &text.as_bytes()[10..3010]);
        let got = buf.read_n_fast(0, 0).expect("empty read");
        assert!(got.is_empty());
    }

    #[test]
    fn pre_write_veto_skips_write() {
        let mut buf = RopeBuffer::new("abc");
        buf.events_mut().subscribe(EventKind::PreWrite, |ev| {
            if let BufferEvent::PreWrite(pre) = ev {
                pre.reply_err = Some("read only".to_string());
            }
        });
        let err = buf.insert(0, b"x").expect_err("vetoed");
        assert_eq!(err, RwError::VetoedWrite("read only".to_string()));
        assert_eq!(buf.to_string(), "abc");
        assert_eq!(buf.revision(), 0);
    }

    #[test]
    fn content_revision_is_visible_through_windows() {
        let mut buf = RopeBuffer::new("abc");
        assert_eq!(Reader::content_revision(&buf), Some(0));
        buf.insert(1, b"x").expect("insert");
        let lr = LimitedReader::new(&buf, 0, 2);
        assert_eq!(lr.content_revision(), Some(1));
    }

    #[test]
    fn changed_flag_is_false_for_identical_overwrite() {
        let flags = Arc::new(Mutex::new(Vec::new()));
        let mut buf = RopeBuffer::new("abc");
        let sink = flags.clone();
        buf.events_mut().subscribe(EventKind::Changed, move |ev| {
            if let BufferEvent::Changed(c) = ev {
                sink.lock().expect("lock").push(c.changed);
            }
        });
        buf.overwrite(0, 1, b"a").expect("same");
        buf.overwrite(0, 1, b"z").expect("differs");
        assert_eq!(*flags.lock().expect("lock"), vec![false, true]);
    }

    #[test]
    fn post_write_reports_offsets() {
        let ops = Arc::new(Mutex::new(Vec::new()));
        let mut buf = RopeBuffer::new("abc");
        let sink = ops.clone();
        buf.events_mut().subscribe(EventKind::PostWrite, move |ev| {
            if let BufferEvent::PostWrite(op) = ev {
                sink.lock().expect("lock").push(**op);
            }
        });
        buf.overwrite(1, 1, b"XY").expect("overwrite");
        let ops = ops.lock().expect("lock");
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].offset, 1);
        assert_eq!((ops[0].del_n, ops[0].ins_n), (1, 2));
    }

    #[test]
    fn large_deletes_keep_content_consistent() {
        let mut buf = RopeBuffer::new(&"x".repeat(64 * 1024));
        buf.delete(10, 60 * 1024).expect("delete");
        assert_eq!(buf.len_bytes(), 4 * 1024);
        assert!(buf.to_string().chars().all(|c| c == 'x'));
    }
}
