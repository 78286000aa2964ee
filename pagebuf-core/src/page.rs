//! The page: one contiguous byte range with read/write cursors.
//!
//! A buffer is an ordered sequence of pages. Each page either owns a
//! growable allocation, borrows a caller-provided slab, or references
//! shared read-only bytes. Capability checks (`is_writable`,
//! `can_realloc`) are exhaustive matches over the storage variant, so a
//! new variant cannot silently skip them.

use std::fmt;

use bytes::Bytes;

use crate::error::{Error, Result};

/// Hook fired exactly once when a page's storage leaves buffer control.
///
/// Receives the page's backing slice. Must not touch any buffer.
pub(crate) type UnrefFn = Box<dyn FnOnce(&[u8]) + Send>;

/// Backing storage of a page.
pub(crate) enum Storage {
    /// Growable allocation owned by the buffer. Writable, reallocatable.
    Owned(Box<[u8]>),
    /// Caller-provided slab. Writable, but never grown or freed here.
    Unmanaged(&'static mut [u8]),
    /// Read-only bytes, refcounted or static, with an optional unref hook.
    Shared {
        bytes: Bytes,
        unref: Option<UnrefFn>,
    },
}

/// One contiguous byte range.
///
/// Live content is `storage[read_pos..write_pos]`; trailing free space is
/// `storage[write_pos..capacity]`. Invariant: `read_pos <= write_pos <=
/// capacity`.
pub(crate) struct Page {
    storage: Storage,
    read_pos: usize,
    write_pos: usize,
}

impl Page {
    /// Allocate an owned page with `cap` bytes of free space.
    ///
    /// # Errors
    ///
    /// `Error::OutOfMemory` if the reservation is refused.
    pub(crate) fn with_capacity(cap: usize) -> Result<Self> {
        let mut slab = Vec::new();
        slab.try_reserve_exact(cap)
            .map_err(|_| Error::OutOfMemory { requested: cap })?;
        slab.resize(cap, 0);
        Ok(Self {
            storage: Storage::Owned(slab.into_boxed_slice()),
            read_pos: 0,
            write_pos: 0,
        })
    }

    /// An owned page holding a copy of `src` as its content.
    pub(crate) fn owned_from_slice(src: &[u8]) -> Result<Self> {
        let mut page = Self::with_capacity(src.len())?;
        page.space_mut()[..src.len()].copy_from_slice(src);
        page.commit(src.len());
        Ok(page)
    }

    /// A zero-capacity owned page, used as a page break.
    pub(crate) fn empty_owned() -> Self {
        Self {
            storage: Storage::Owned(Box::default()),
            read_pos: 0,
            write_pos: 0,
        }
    }

    /// Take ownership of a full vector; the whole vector is live content.
    pub(crate) fn from_vec(src: Vec<u8>) -> Self {
        let len = src.len();
        Self {
            storage: Storage::Owned(src.into_boxed_slice()),
            read_pos: 0,
            write_pos: len,
        }
    }

    /// Wrap a caller-provided writable slab. Starts empty.
    pub(crate) fn unmanaged(slab: &'static mut [u8]) -> Self {
        Self {
            storage: Storage::Unmanaged(slab),
            read_pos: 0,
            write_pos: 0,
        }
    }

    /// Wrap shared read-only bytes; the whole range is live content.
    pub(crate) fn shared(bytes: Bytes) -> Self {
        let len = bytes.len();
        Self {
            storage: Storage::Shared { bytes, unref: None },
            read_pos: 0,
            write_pos: len,
        }
    }

    /// Wrap shared read-only bytes carrying an unref hook.
    pub(crate) fn shared_with_unref(bytes: Bytes, unref: UnrefFn) -> Self {
        let len = bytes.len();
        Self {
            storage: Storage::Shared {
                bytes,
                unref: Some(unref),
            },
            read_pos: 0,
            write_pos: len,
        }
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        match &self.storage {
            Storage::Owned(slab) => slab.len(),
            Storage::Unmanaged(slab) => slab.len(),
            Storage::Shared { bytes, .. } => bytes.len(),
        }
    }

    #[inline]
    pub(crate) fn content_len(&self) -> usize {
        self.write_pos - self.read_pos
    }

    /// Free space behind the write cursor. Zero for read-only pages.
    #[inline]
    pub(crate) fn space_len(&self) -> usize {
        if self.is_writable() {
            self.capacity() - self.write_pos
        } else {
            0
        }
    }

    /// Content may be written through `space_mut` and drained in place.
    #[inline]
    pub(crate) fn is_writable(&self) -> bool {
        match &self.storage {
            Storage::Owned(_) | Storage::Unmanaged(_) => true,
            Storage::Shared { .. } => false,
        }
    }

    /// Storage may be grown (and freed) by the buffer.
    #[inline]
    pub(crate) fn can_realloc(&self) -> bool {
        match &self.storage {
            Storage::Owned(_) => true,
            Storage::Unmanaged(_) | Storage::Shared { .. } => false,
        }
    }

    /// Live content, `[read_pos, write_pos)`.
    #[inline]
    pub(crate) fn content(&self) -> &[u8] {
        match &self.storage {
            Storage::Owned(slab) => &slab[self.read_pos..self.write_pos],
            Storage::Unmanaged(slab) => &slab[self.read_pos..self.write_pos],
            Storage::Shared { bytes, .. } => &bytes[self.read_pos..self.write_pos],
        }
    }

    /// Trailing free region, `[write_pos, capacity)`. Empty for read-only
    /// pages.
    pub(crate) fn space_mut(&mut self) -> &mut [u8] {
        let write_pos = self.write_pos;
        match &mut self.storage {
            Storage::Owned(slab) => &mut slab[write_pos..],
            Storage::Unmanaged(slab) => &mut slab[write_pos..],
            Storage::Shared { .. } => &mut [],
        }
    }

    /// Advance the write cursor over `n` freshly written bytes.
    pub(crate) fn commit(&mut self, n: usize) {
        debug_assert!(n <= self.space_len());
        self.write_pos += n;
    }

    /// Consume `n` bytes from the front of the content.
    pub(crate) fn advance_read(&mut self, n: usize) {
        debug_assert!(n <= self.content_len());
        self.read_pos += n;
    }

    /// Drop `n` bytes from the back of the content.
    pub(crate) fn retract_write(&mut self, n: usize) {
        debug_assert!(n <= self.content_len());
        self.write_pos -= n;
    }

    /// Reset both cursors, turning the page into fresh scratch space.
    pub(crate) fn reset(&mut self) {
        self.read_pos = 0;
        self.write_pos = 0;
    }

    /// Move live content to offset 0, reclaiming the drained prefix as
    /// trailing free space. Writable pages only.
    pub(crate) fn slide_to_front(&mut self) {
        debug_assert!(self.is_writable());
        let (read_pos, write_pos) = (self.read_pos, self.write_pos);
        match &mut self.storage {
            Storage::Owned(slab) => slab.copy_within(read_pos..write_pos, 0),
            Storage::Unmanaged(slab) => slab.copy_within(read_pos..write_pos, 0),
            Storage::Shared { .. } => {}
        }
        self.write_pos = write_pos - read_pos;
        self.read_pos = 0;
    }

    /// Reallocate to `new_cap` bytes, sliding content to offset 0.
    ///
    /// # Errors
    ///
    /// `Error::OutOfMemory` if the reservation is refused; the page is
    /// unchanged.
    pub(crate) fn grow(&mut self, new_cap: usize) -> Result<()> {
        debug_assert!(self.can_realloc());
        debug_assert!(new_cap >= self.content_len());
        let content_len = self.content_len();
        let mut slab = Vec::new();
        slab.try_reserve_exact(new_cap)
            .map_err(|_| Error::OutOfMemory { requested: new_cap })?;
        slab.resize(new_cap, 0);
        slab[..content_len].copy_from_slice(self.content());
        self.storage = Storage::Owned(slab.into_boxed_slice());
        self.read_pos = 0;
        self.write_pos = content_len;
        Ok(())
    }

    /// Cut a hole of `gap` bytes out of writable content at `off` (relative
    /// to the content start) by sliding the tail left.
    pub(crate) fn remove_middle(&mut self, off: usize, gap: usize) {
        debug_assert!(self.is_writable());
        debug_assert!(off + gap < self.content_len());
        let (read_pos, write_pos) = (self.read_pos, self.write_pos);
        match &mut self.storage {
            Storage::Owned(slab) => {
                slab.copy_within(read_pos + off + gap..write_pos, read_pos + off);
            }
            Storage::Unmanaged(slab) => {
                slab.copy_within(read_pos + off + gap..write_pos, read_pos + off);
            }
            Storage::Shared { .. } => {}
        }
        self.write_pos -= gap;
    }

    /// Cut a hole out of a shared page without copying: this page becomes
    /// the head (`head_len` content bytes), the returned page is the tail
    /// past the hole. The unref hook moves to the tail so it fires when the
    /// later half is released.
    pub(crate) fn split_shared(&mut self, head_len: usize, gap: usize) -> Self {
        debug_assert!(head_len + gap < self.content_len());
        let Storage::Shared { bytes, unref } = &mut self.storage else {
            unreachable!("split_shared on a writable page");
        };
        let tail = bytes.slice(self.read_pos + head_len + gap..self.write_pos);
        let hook = unref.take();
        self.write_pos = self.read_pos + head_len;
        let tail_len = tail.len();
        Self {
            storage: Storage::Shared {
                bytes: tail,
                unref: hook,
            },
            read_pos: 0,
            write_pos: tail_len,
        }
    }

    /// Steal the allocation of an owned page whose content starts at offset
    /// 0, leaving the page empty. The common single-page take fast path.
    pub(crate) fn try_take_vec(&mut self) -> Option<Vec<u8>> {
        if !self.can_realloc() || self.read_pos != 0 {
            return None;
        }
        let content_len = self.write_pos;
        let storage = std::mem::replace(&mut self.storage, Storage::Owned(Box::default()));
        self.write_pos = 0;
        let Storage::Owned(slab) = storage else {
            unreachable!("can_realloc implies owned storage");
        };
        let mut out = slab.into_vec();
        out.truncate(content_len);
        Some(out)
    }
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("content_len", &self.content_len())
            .field("capacity", &self.capacity())
            .field("writable", &self.is_writable())
            .finish_non_exhaustive()
    }
}

impl Drop for Page {
    fn drop(&mut self) {
        if let Storage::Shared { bytes, unref } = &mut self.storage {
            if let Some(hook) = unref.take() {
                hook(bytes.as_ref());
            }
        }
    }
}
