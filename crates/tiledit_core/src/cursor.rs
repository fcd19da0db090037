//! Cursor and selection model.

/// Plain cursor record: position, selection anchor and whether the
/// selection is active.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CursorState {
    pub index: usize,
    pub anchor: usize,
    pub selection_on: bool,
}

impl CursorState {
    /// Collapsed cursor at `i`.
    pub fn at(index: usize) -> Self {
        Self {
            index,
            anchor: index,
            selection_on: false,
        }
    }

    /// Active selection from `anchor` to `index`.
    pub fn selecting(anchor: usize, index: usize) -> Self {
        Self {
            index,
            anchor,
            selection_on: true,
        }
    }

    /// Sorted non-empty selection span.
    pub fn selection(&self) -> Option<(usize, usize)> {
        if !self.selection_on || self.index == self.anchor {
            return None;
        }
        Some((self.index.min(self.anchor), self.index.max(self.anchor)))
    }
}

type ChangeCallback = Box<dyn FnMut(&CursorState) + Send>;

/// Editable cursor that notifies subscribers on material changes.
#[derive(Default)]
pub struct Cursor {
    state: CursorState,
    on_change: Vec<ChangeCallback>,
}

impl std::fmt::Debug for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor")
            .field("state", &self.state)
            .field("subscribers", &self.on_change.len())
            .finish()
    }
}

impl Cursor {
    pub fn new(index: usize) -> Self {
        Self {
            state: CursorState::at(index),
            on_change: Vec::new(),
        }
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    pub fn index(&self) -> usize {
        self.state.index
    }

    pub fn anchor(&self) -> usize {
        self.state.anchor
    }

    pub fn selection_on(&self) -> bool {
        self.state.selection_on
    }

    /// Sorted selection span, `None` when off or empty.
    pub fn selection(&self) -> Option<(usize, usize)> {
        self.state.selection()
    }

    /// Selection span, or the collapsed cursor position.
    pub fn selection_or_cursor(&self) -> (usize, usize) {
        self.selection()
            .unwrap_or((self.state.index, self.state.index))
    }

    /// Register a callback fired after every material change.
    pub fn on_change<F>(&mut self, f: F)
    where
        F: FnMut(&CursorState) + Send + 'static,
    {
        self.on_change.push(Box::new(f));
    }

    /// Replace the whole state. No-op writes do not notify.
    pub fn set(&mut self, state: CursorState) {
        if state == self.state {
            return;
        }
        self.state = state;
        for cb in self.on_change.iter_mut() {
            cb(&self.state);
        }
    }

    /// Move the cursor, keeping the selection anchor.
    pub fn set_index(&mut self, index: usize) {
        self.set(CursorState {
            index,
            ..self.state
        });
    }

    /// Collapse to `index` with the selection off.
    pub fn set_index_selection_off(&mut self, index: usize) {
        self.set(CursorState::at(index));
    }

    /// Select `[anchor, index]`, cursor at `index`.
    pub fn set_selection(&mut self, anchor: usize, index: usize) {
        self.set(CursorState::selecting(anchor, index));
    }

    pub fn set_selection_off(&mut self) {
        self.set(CursorState {
            selection_on: false,
            anchor: self.state.index,
            ..self.state
        });
    }

    /// Move to `index`, extending the selection from the current position
    /// when `on` is set (shift-motion) and dropping it otherwise.
    pub fn update_selection(&mut self, on: bool, index: usize) {
        if on {
            let anchor = if self.state.selection_on {
                self.state.anchor
            } else {
                self.state.index
            };
            self.set_selection(anchor, index);
        } else {
            self.set_index_selection_off(index);
        }
    }

    /// Clamp both ends into `[min, max]`.
    pub fn clamp(&mut self, min: usize, max: usize) {
        self.set(CursorState {
            index: self.state.index.clamp(min, max),
            anchor: self.state.anchor.clamp(min, max),
            ..self.state
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn selection_is_sorted_and_non_empty() {
        let mut c = Cursor::new(5);
        assert_eq!(c.selection(), None);
        c.set_selection(5, 2);
        assert_eq!(c.selection(), Some((2, 5)));
        c.set_selection(3, 3);
        assert_eq!(c.selection(), None);
        assert_eq!(c.selection_or_cursor(), (3, 3));
    }

    #[test]
    fn update_selection_anchors_on_old_index() {
        let mut c = Cursor::new(4);
        c.update_selection(true, 6);
        assert_eq!(c.selection(), Some((4, 6)));
        c.update_selection(true, 1);
        assert_eq!(c.selection(), Some((1, 4)));
        c.update_selection(false, 9);
        assert_eq!(c.state(), CursorState::at(9));
    }

    #[test]
    fn on_change_skips_no_op_writes() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut c = Cursor::new(0);
        let sink = hits.clone();
        c.on_change(move |_| {
            sink.fetch_add(1, Ordering::SeqCst);
        });
        c.set_index(0);
        c.set_index(2);
        c.set_index(2);
        c.set_selection_off();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn clamp_keeps_cursor_inside_content() {
        let mut c = Cursor::new(0);
        c.set_selection(2, 10);
        c.clamp(0, 4);
        assert_eq!(c.selection(), Some((2, 4)));
    }
}
