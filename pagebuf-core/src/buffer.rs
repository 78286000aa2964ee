//! The segmented buffer: an ordered sequence of pages behind one
//! content-length counter.
//!
//! Content arrives from heterogeneous sources without copying (owned
//! allocations, shared refcounted bytes, static literals, caller-provided
//! slabs), is appended and drained at the ends, and moves wholesale
//! between buffers as page descriptors rather than bytes.
//!
//! # Aliasing
//!
//! Every view handed out ([`peek`](Buffer::peek), [`peek_space`],
//! [`reserve_space`], [`make_contiguous`]) borrows the buffer, so the
//! borrow checker enforces the validity window: any mutating call ends it.
//!
//! [`peek_space`]: Buffer::peek_space
//! [`reserve_space`]: Buffer::reserve_space
//! [`make_contiguous`]: Buffer::make_contiguous

use std::fmt;
use std::io::IoSlice;

use bytes::{Buf, Bytes};
use smallvec::SmallVec;
use tracing::trace;

use crate::error::{Error, Result};
use crate::events::ChangeLog;
use crate::page::Page;

/// One page rides inline in the buffer; more spill to a heap array.
/// Keeps the common one-shot stringbuilder case allocation-free.
pub(crate) type PageVec = SmallVec<[Page; 1]>;

/// A segmented byte buffer.
///
/// ```
/// use pagebuf_core::Buffer;
///
/// let mut buf = Buffer::new();
/// buf.add(b"Hello, ").unwrap();
/// buf.add_readonly(b"World!").unwrap();
/// assert_eq!(buf.len(), 13);
/// assert_eq!(buf.take_string().unwrap(), "Hello, World!");
/// ```
#[derive(Default)]
pub struct Buffer {
    pub(crate) pages: PageVec,
    pub(crate) content_len: usize,
    pub(crate) changes: ChangeLog,
}

impl Buffer {
    /// An empty buffer. Allocates nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A buffer writing into a caller-provided slab as its initial page.
    ///
    /// The slab is never grown or freed; once it fills up, further appends
    /// allocate fresh pages behind it.
    #[must_use]
    pub fn with_unmanaged(slab: &'static mut [u8]) -> Self {
        let mut buf = Self::new();
        buf.pages.push(Page::unmanaged(slab));
        buf
    }

    /// Content length in bytes, across all pages.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.content_len
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content_len == 0
    }

    // --- ingest ---

    /// Copy `data` into the writable tail, growing as needed.
    ///
    /// # Errors
    ///
    /// `Error::OutOfMemory` if growth is refused; the buffer is unchanged.
    pub fn add(&mut self, data: &[u8]) -> Result<()> {
        if data.is_empty() {
            return Ok(());
        }
        self.ensure_space(data.len())?;
        let tail = self
            .pages
            .last_mut()
            .expect("ensure_space leaves a writable tail page");
        tail.space_mut()[..data.len()].copy_from_slice(data);
        self.commit_space(data.len());
        Ok(())
    }

    /// Append a single byte.
    ///
    /// # Errors
    ///
    /// `Error::OutOfMemory` if growth is refused.
    pub fn add_byte(&mut self, byte: u8) -> Result<()> {
        self.add(&[byte])
    }

    /// Append shared read-only bytes as their own page. Zero-copy: the
    /// refcount is bumped, nothing is moved.
    ///
    /// # Errors
    ///
    /// `Error::OutOfMemory` if the page table cannot grow.
    pub fn add_shared(&mut self, bytes: Bytes) -> Result<()> {
        if bytes.is_empty() {
            return Ok(());
        }
        let n = bytes.len();
        self.push_page(Page::shared(bytes))?;
        self.content_len += n;
        self.record_add(n);
        Ok(())
    }

    /// Append a static byte slice as a read-only page. Zero-copy.
    ///
    /// # Errors
    ///
    /// `Error::OutOfMemory` if the page table cannot grow.
    pub fn add_readonly(&mut self, data: &'static [u8]) -> Result<()> {
        self.add_shared(Bytes::from_static(data))
    }

    /// Append externally-owned read-only bytes carrying an unref hook.
    ///
    /// The hook fires exactly once, with `data`, when the page's storage
    /// leaves buffer control: on drain, on drop, or — after the page moved
    /// to another buffer via [`transfer_to`](Buffer::transfer_to) — from
    /// that buffer instead. It must not touch any buffer.
    ///
    /// # Errors
    ///
    /// `Error::OutOfMemory` if the page table cannot grow.
    pub fn add_reference(
        &mut self,
        data: &'static [u8],
        unref: impl FnOnce(&[u8]) + Send + 'static,
    ) -> Result<()> {
        let n = data.len();
        self.push_page(Page::shared_with_unref(
            Bytes::from_static(data),
            Box::new(unref),
        ))?;
        self.content_len += n;
        self.record_add(n);
        Ok(())
    }

    /// Append an empty page so that subsequent appends start fresh there
    /// instead of filling the current tail.
    ///
    /// # Errors
    ///
    /// `Error::OutOfMemory` if the page table cannot grow.
    pub fn add_pagebreak(&mut self) -> Result<()> {
        self.push_page(Page::empty_owned())
    }

    /// Move the entire content of `src` onto the end of `self` by splicing
    /// page descriptors. `src` is left empty.
    ///
    /// # Errors
    ///
    /// `Error::OutOfMemory` if the page table cannot grow; both buffers
    /// are unchanged.
    pub fn append_buffer(&mut self, src: &mut Buffer) -> Result<()> {
        src.transfer_to(self, usize::MAX).map(|_| ())
    }

    /// Move the first `n` content bytes (clamped) onto the end of `tgt`.
    ///
    /// Whole pages move as descriptors: no bytes are copied, no unref
    /// hooks fire, and hooks travel with their pages. A partial page at
    /// the cut is byte-copied onto a fresh page of `tgt`.
    ///
    /// Returns the number of bytes moved.
    ///
    /// # Errors
    ///
    /// `Error::OutOfMemory` if the partial-page copy or `tgt`'s page table
    /// growth is refused; both buffers are unchanged.
    pub fn transfer_to(&mut self, tgt: &mut Buffer, n: usize) -> Result<usize> {
        let n = n.min(self.content_len);
        if n == 0 {
            return Ok(0);
        }
        let end = self.pos_of(n);

        // All fallible work happens before either buffer is touched.
        let partial = if end.page_pos > 0 {
            Some(Page::owned_from_slice(
                &self.pages[end.page_idx].content()[..end.page_pos],
            )?)
        } else {
            None
        };
        tgt.pages
            .try_reserve(end.page_idx + usize::from(partial.is_some()))
            .map_err(|_| Error::OutOfMemory {
                requested: std::mem::size_of::<Page>() * (end.page_idx + 1),
            })?;

        for page in self.pages.drain(..end.page_idx) {
            tgt.pages.push(page);
        }
        if let Some(page) = partial {
            self.pages[0].advance_read(end.page_pos);
            tgt.pages.push(page);
        }
        if self.pages.len() <= 1 {
            self.pages.shrink_to_fit();
        }

        self.content_len -= n;
        tgt.content_len += n;
        trace!(moved = n, pages = end.page_idx, "transferred content");
        self.record_delete(n);
        tgt.record_add(n);
        self.debug_check();
        tgt.debug_check();
        Ok(n)
    }

    // --- inspect ---

    /// Copy content from the front into `dst` without draining.
    ///
    /// Returns the number of bytes copied, `min(dst.len(), self.len())`.
    pub fn copy_out(&self, dst: &mut [u8]) -> usize {
        self.copy_out_from(0, dst)
    }

    /// Copy content starting at `offset` into `dst` without draining.
    pub fn copy_out_from(&self, offset: usize, dst: &mut [u8]) -> usize {
        let mut filled = 0;
        for chunk in self.peek_range(offset..offset.saturating_add(dst.len())) {
            dst[filled..filled + chunk.len()].copy_from_slice(chunk);
            filled += chunk.len();
        }
        filled
    }

    // --- consume ---

    /// Copy content from the front into `dst` and drain what was copied.
    ///
    /// Returns the number of bytes removed, `min(dst.len(), self.len())`.
    pub fn remove(&mut self, dst: &mut [u8]) -> usize {
        let n = self.copy_out(dst);
        self.drain(n);
        n
    }

    /// Fill all of `dst` from the front and drain it, or fail leaving the
    /// buffer unchanged.
    ///
    /// # Errors
    ///
    /// `Error::Exhausted` if fewer than `dst.len()` bytes are available.
    pub fn remove_exact(&mut self, dst: &mut [u8]) -> Result<()> {
        if dst.len() > self.content_len {
            return Err(Error::Exhausted {
                needed: dst.len(),
                available: self.content_len,
            });
        }
        self.remove(dst);
        Ok(())
    }

    /// Drain the entire content into an owned vector.
    ///
    /// When the content already lives in a single owned page starting at
    /// its allocation front, the allocation is transferred instead of
    /// copied.
    pub fn take_vec(&mut self) -> Vec<u8> {
        let len = self.content_len;
        let fast = match self.pages.as_mut_slice() {
            [page] => page.try_take_vec(),
            _ => None,
        };
        match fast {
            Some(out) => {
                self.pages.clear();
                self.pages.shrink_to_fit();
                self.content_len = 0;
                self.record_delete(len);
                out
            }
            None => {
                let mut out = Vec::with_capacity(len);
                for chunk in self.peek_all() {
                    out.extend_from_slice(chunk);
                }
                self.clear();
                out
            }
        }
    }

    /// Drain the entire content into a `String`.
    ///
    /// # Errors
    ///
    /// `Error::Utf8` if the content is not valid UTF-8. The content is
    /// consumed either way.
    pub fn take_string(&mut self) -> Result<String> {
        Ok(String::from_utf8(self.take_vec())?)
    }

    // --- internals ---

    pub(crate) fn push_page(&mut self, page: Page) -> Result<()> {
        self.pages.try_reserve(1).map_err(|_| Error::OutOfMemory {
            requested: std::mem::size_of::<Page>(),
        })?;
        self.pages.push(page);
        Ok(())
    }

    /// Cached length must equal the walked per-page sum at every API
    /// boundary.
    pub(crate) fn debug_check(&self) {
        debug_assert_eq!(
            self.content_len,
            self.pages.iter().map(Page::content_len).sum::<usize>()
        );
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("content_len", &self.content_len)
            .field("pages", &self.pages.len())
            .field("space_len", &self.space_len())
            .finish_non_exhaustive()
    }
}

impl Buf for Buffer {
    #[inline]
    fn remaining(&self) -> usize {
        self.content_len
    }

    fn chunk(&self) -> &[u8] {
        self.pages
            .iter()
            .map(Page::content)
            .find(|content| !content.is_empty())
            .unwrap_or(&[])
    }

    fn advance(&mut self, cnt: usize) {
        assert!(
            cnt <= self.content_len,
            "advance past end of buffer: {cnt} > {}",
            self.content_len
        );
        self.drain(cnt);
    }

    fn chunks_vectored<'a>(&'a self, dst: &mut [IoSlice<'a>]) -> usize {
        self.peek_vectored(dst).min(dst.len())
    }
}

impl From<Vec<u8>> for Buffer {
    fn from(data: Vec<u8>) -> Self {
        let mut buf = Self::new();
        if !data.is_empty() {
            buf.content_len = data.len();
            buf.pages.push(Page::from_vec(data));
        }
        buf
    }
}

impl From<Bytes> for Buffer {
    fn from(bytes: Bytes) -> Self {
        let mut buf = Self::new();
        if !bytes.is_empty() {
            buf.content_len = bytes.len();
            buf.pages.push(Page::shared(bytes));
        }
        buf
    }
}

impl From<&'static [u8]> for Buffer {
    fn from(data: &'static [u8]) -> Self {
        Self::from(Bytes::from_static(data))
    }
}
