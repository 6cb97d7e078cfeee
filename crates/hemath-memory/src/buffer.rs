//! RAII handles over pool items.

use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::head::MemoryPoolHead;

/// Move-only owner of one pool item.
///
/// Dropping the buffer pushes the item back onto its head's free stack. An
/// unset buffer owns nothing and derefs to an empty slice.
pub struct OwnedBuffer<H: MemoryPoolHead> {
    slot: Option<(H, Box<[u64]>)>,
}

impl<H: MemoryPoolHead> OwnedBuffer<H> {
    /// Create a buffer that owns nothing.
    #[must_use]
    pub fn unset() -> Self {
        Self { slot: None }
    }

    /// Draw one item from `head`.
    #[must_use]
    pub fn from_head(head: H) -> Self {
        let item = head.get();
        Self {
            slot: Some((head, item)),
        }
    }

    /// Whether the buffer currently owns an item.
    pub fn is_set(&self) -> bool {
        self.slot.is_some()
    }

    /// The head the item belongs to, if any.
    pub fn head(&self) -> Option<&H> {
        self.slot.as_ref().map(|(head, _)| head)
    }

    /// Return the item to its head now and leave the buffer unset.
    pub fn release(&mut self) {
        if let Some((head, item)) = self.slot.take() {
            head.add(item);
        }
    }

    /// Release the current item, then take over the item of `other`.
    ///
    /// `other` is left unset.
    pub fn acquire(&mut self, other: &mut Self) {
        self.release();
        self.slot = other.slot.take();
    }

    /// Exchange items with `other` without touching either's data.
    pub fn swap_with(&mut self, other: &mut Self) {
        std::mem::swap(&mut self.slot, &mut other.slot);
    }

    /// The owned words, empty when unset.
    pub fn as_slice(&self) -> &[u64] {
        match &self.slot {
            Some((_, item)) => &item[..],
            None => &[],
        }
    }

    /// The owned words, empty when unset.
    pub fn as_mut_slice(&mut self) -> &mut [u64] {
        match &mut self.slot {
            Some((_, item)) => &mut item[..],
            None => &mut [],
        }
    }
}

impl<H: MemoryPoolHead> Default for OwnedBuffer<H> {
    fn default() -> Self {
        Self::unset()
    }
}

impl<H: MemoryPoolHead> Drop for OwnedBuffer<H> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<H: MemoryPoolHead> Deref for OwnedBuffer<H> {
    type Target = [u64];

    fn deref(&self) -> &[u64] {
        self.as_slice()
    }
}

impl<H: MemoryPoolHead> DerefMut for OwnedBuffer<H> {
    fn deref_mut(&mut self) -> &mut [u64] {
        self.as_mut_slice()
    }
}

impl<H: MemoryPoolHead> AsRef<[u64]> for OwnedBuffer<H> {
    fn as_ref(&self) -> &[u64] {
        self.as_slice()
    }
}

impl<H: MemoryPoolHead> AsMut<[u64]> for OwnedBuffer<H> {
    fn as_mut(&mut self) -> &mut [u64] {
        self.as_mut_slice()
    }
}

impl<H: MemoryPoolHead> fmt::Debug for OwnedBuffer<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OwnedBuffer")
            .field("set", &self.is_set())
            .field("words", &self.as_slice())
            .finish()
    }
}

/// Read-only words that are either borrowed from the caller or held in the pool.
pub enum BorrowedBuffer<'a, H: MemoryPoolHead> {
    /// A pool copy; returned to the pool on drop.
    Owned(OwnedBuffer<H>),
    /// The caller's own words; nothing is freed.
    Alias(&'a [u64]),
}

impl<H: MemoryPoolHead> BorrowedBuffer<'_, H> {
    /// Whether this buffer points at the caller's words.
    pub fn is_alias(&self) -> bool {
        matches!(self, Self::Alias(_))
    }
}

impl<H: MemoryPoolHead> Deref for BorrowedBuffer<'_, H> {
    type Target = [u64];

    fn deref(&self) -> &[u64] {
        match self {
            Self::Owned(buffer) => buffer,
            Self::Alias(words) => words,
        }
    }
}

impl<H: MemoryPoolHead> fmt::Debug for BorrowedBuffer<'_, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Owned(buffer) => f.debug_tuple("Owned").field(buffer).finish(),
            Self::Alias(words) => f.debug_tuple("Alias").field(words).finish(),
        }
    }
}
