//! Circular, append-only buffer over fetched artworks.

use std::sync::Arc;

use crate::catalog::Artwork;

/// Ordered artworks plus the slideshow position within them.
///
/// Entries are never reordered or removed; only [`ArtworkBuffer::replace`]
/// swaps the whole sequence, and doing so bumps the generation.
#[derive(Debug, Clone, Default)]
pub struct ArtworkBuffer {
    items: Vec<Arc<Artwork>>,
    idx: usize,
    generation: u64,
}

impl ArtworkBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of items contained.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Current position; meaningless while empty.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.idx
    }

    /// Identity of the current sequence. Changes on every replacement.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Borrow the current item without moving.
    #[must_use]
    pub fn current(&self) -> Option<&Arc<Artwork>> {
        self.items.get(self.idx)
    }

    /// Move forward one item, wrapping at the end. Returns the new position.
    pub fn advance(&mut self) -> Option<usize> {
        if self.items.is_empty() {
            return None;
        }
        self.idx = (self.idx + 1) % self.items.len();
        Some(self.idx)
    }

    /// Move back one item, wrapping at the start. Returns the new position.
    pub fn retreat(&mut self) -> Option<usize> {
        if self.items.is_empty() {
            return None;
        }
        let len = self.items.len();
        self.idx = (self.idx + len - 1) % len;
        Some(self.idx)
    }

    /// Swap in a fresh sequence and rewind to the start.
    pub fn replace(&mut self, items: Vec<Artwork>) {
        self.items = items.into_iter().map(Arc::new).collect();
        self.idx = 0;
        self.generation += 1;
    }

    /// Append in order; the existing entries stay a prefix.
    pub fn extend(&mut self, items: Vec<Artwork>) {
        self.items.extend(items.into_iter().map(Arc::new));
    }

    /// Borrow the internal list (read-only).
    #[must_use]
    pub fn as_slice(&self) -> &[Arc<Artwork>] {
        &self.items
    }
}
