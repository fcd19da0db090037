use super::{check_range, Reader};
use crate::error::{RwError, RwResult};
use std::borrow::Cow;

/// Read-only window `[min, max)` over another reader.
///
/// Rune reads that fall outside the window report [`RwError::EndOfRange`]
/// so scanners stop at the window edge instead of failing.
#[derive(Clone, Copy)]
pub struct LimitedReader<'a> {
    inner: &'a dyn Reader,
    min: usize,
    max: usize,
}

impl<'a> LimitedReader<'a> {
    /// Window clamped to the inner reader's own range.
    pub fn new(inner: &'a dyn Reader, min: usize, max: usize) -> Self {
        let min = min.clamp(inner.min(), inner.max());
        let max = max.clamp(min, inner.max());
        Self { inner, min, max }
    }

    /// Window of `pad` bytes on each side of `i`.
    pub fn around(inner: &'a dyn Reader, i: usize, pad: usize) -> Self {
        Self::new(inner, i.saturating_sub(pad), i.saturating_add(pad))
    }
}

impl std::fmt::Debug for LimitedReader<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LimitedReader")
            .field("min", &self.min)
            .field("max", &self.max)
            .finish()
    }
}

impl Reader for LimitedReader<'_> {
    fn min(&self) -> usize {
        self.min
    }

    fn content_revision(&self) -> Option<u64> {
        self.inner.content_revision()
    }

    fn max(&self) -> usize {
        self.max
    }

    fn read_rune_at(&self, i: usize) -> RwResult<(char, usize)> {
        if i < self.min || i >= self.max {
            return Err(RwError::EndOfRange);
        }
        let (ru, size) = self.inner.read_rune_at(i)?;
        if i + size > self.max {
            return Err(RwError::EndOfRange);
        }
        Ok((ru, size))
    }

    fn read_last_rune_at(&self, i: usize) -> RwResult<(char, usize)> {
        if i <= self.min || i > self.max {
            return Err(RwError::EndOfRange);
        }
        let (ru, size) = self.inner.read_last_rune_at(i)?;
        if i - size < self.min {
            return Err(RwError::EndOfRange);
        }
        Ok((ru, size))
    }

    fn read_n_fast(&self, i: usize, n: usize) -> RwResult<Cow<'_, [u8]>> {
        check_range(self.min, self.max, i, n)?;
        self.inner.read_n_fast(i, n)
    }
}
