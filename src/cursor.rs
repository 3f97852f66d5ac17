//! Position cursor over an ordered result list.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("no documents to navigate")]
    Empty,
    #[error("document #{requested} is out of range (1-{len})")]
    OutOfRange { requested: usize, len: usize },
}

/// Zero-based index into a result list of length `len`.
///
/// Whenever `len > 0`, `index < len` holds after every operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigationCursor {
    index: usize,
    len: usize,
}

impl NavigationCursor {
    pub fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    /// Rebind to a result list of `len` entries. The index survives when it
    /// is still in bounds.
    pub fn reset(&mut self, len: usize) {
        self.len = len;
        if len == 0 || self.index >= len {
            self.index = 0;
        }
    }

    pub fn previous(&mut self) {
        self.index = self.index.saturating_sub(1);
    }

    pub fn next(&mut self) {
        if self.len > 0 {
            self.index = (self.index + 1).min(self.len - 1);
        }
    }

    /// Jump to a 1-based position in `[1, len]`.
    pub fn jump_to(&mut self, position: usize) -> Result<(), NavigationError> {
        if self.len == 0 {
            return Err(NavigationError::Empty);
        }
        if position == 0 || position > self.len {
            return Err(NavigationError::OutOfRange {
                requested: position,
                len: self.len,
            });
        }
        self.index = position - 1;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current zero-based index, or `None` with nothing to show.
    pub fn current(&self) -> Option<usize> {
        (self.len > 0).then_some(self.index)
    }

    /// `(position, len)` with a 1-based position, for display.
    pub fn position(&self) -> Option<(usize, usize)> {
        self.current().map(|i| (i + 1, self.len))
    }

    pub fn at_start(&self) -> bool {
        self.index == 0
    }

    pub fn at_end(&self) -> bool {
        self.len == 0 || self.index + 1 == self.len
    }
}
