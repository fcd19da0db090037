//! Byte-addressed reader/writer abstractions.
//!
//! Offsets are byte indices into UTF-8 content. Every reader exposes a
//! `[min, max)` window; reads outside it fail with [`RwError::OutOfRange`]
//! and reads exactly at the edge report [`RwError::EndOfRange`].

pub mod buffer;
pub mod event;
pub mod limited;

pub use buffer::RopeBuffer;
pub use event::{BufferEvent, ChangedEvent, EventKind, EventRegister, PreWriteEvent, SubscriptionId};
pub use limited::LimitedReader;

use crate::error::{RwError, RwResult};
use crate::undo::UndoRecord;
use std::borrow::Cow;

/// Random-access reads over UTF-8 content.
pub trait Reader {
    /// First valid offset.
    fn min(&self) -> usize;

    /// One past the last valid offset.
    fn max(&self) -> usize;

    /// Decode the rune starting at `i`, returning it with its encoded size.
    fn read_rune_at(&self, i: usize) -> RwResult<(char, usize)>;

    /// Decode the rune ending at `i`.
    fn read_last_rune_at(&self, i: usize) -> RwResult<(char, usize)>;

    /// Borrow `n` bytes at `i` when storage is contiguous, copying otherwise.
    ///
    /// The result must not be held across mutations.
    fn read_n_fast(&self, i: usize, n: usize) -> RwResult<Cow<'_, [u8]>>;

    /// Owned copy of `n` bytes at `i`.
    fn read_n_copy(&self, i: usize, n: usize) -> RwResult<Vec<u8>> {
        self.read_n_fast(i, n).map(Cow::into_owned)
    }

    /// Length of the readable window.
    fn len(&self) -> usize {
        self.max() - self.min()
    }

    /// True when the readable window is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Counter that changes with every content change. `None` when the
    /// reader does not track one.
    fn content_revision(&self) -> Option<u64> {
        None
    }
}

/// Mutations that hand back the record needed to revert them.
pub trait Writer {
    fn insert(&mut self, i: usize, bytes: &[u8]) -> RwResult<UndoRecord>;
    fn delete(&mut self, i: usize, n: usize) -> RwResult<UndoRecord>;
    fn overwrite(&mut self, i: usize, n: usize, bytes: &[u8]) -> RwResult<UndoRecord>;
}

/// Combined read/write access, the shape edit commands operate on.
pub trait ReadWriter: Reader + Writer {
    /// Upcast helper for APIs that only need reads.
    fn as_reader(&self) -> &dyn Reader;

    /// Upcast helper for replaying undo records.
    fn as_writer(&mut self) -> &mut dyn Writer;
}

impl<T: Reader + Writer> ReadWriter for T {
    fn as_reader(&self) -> &dyn Reader {
        self
    }

    fn as_writer(&mut self) -> &mut dyn Writer {
        self
    }
}

/// Kind of a write operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WriteKind {
    Insert,
    Delete,
    Overwrite,
}

/// Description of a write, delivered to buffer subscribers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WriteOp {
    pub kind: WriteKind,
    pub offset: usize,
    pub del_n: usize,
    pub ins_n: usize,
}

/// Validate `[i, i+n)` against a reader window.
pub(crate) fn check_range(min: usize, max: usize, i: usize, n: usize) -> RwResult<()> {
    let end = i.checked_add(n).ok_or(RwError::OutOfRange)?;
    if i < min || end > max {
        return Err(RwError::OutOfRange);
    }
    Ok(())
}

/// Full readable content as bytes.
pub fn read_all(r: &dyn Reader) -> RwResult<Vec<u8>> {
    r.read_n_copy(r.min(), r.len())
}
