//! Contiguation: make a prefix of the content live in one page.

use tracing::trace;

use crate::buffer::Buffer;
use crate::error::Result;
use crate::page::Page;

impl Buffer {
    /// Make the first `min(n, len)` content bytes contiguous and borrow
    /// them.
    ///
    /// The returned slice always refers to the head of the content and
    /// stays valid until the next mutating call. When the prefix already
    /// lies in the first page this allocates nothing and the pointer is
    /// unchanged; otherwise the prefix is copied into a fresh page that
    /// replaces the pages it covered, without changing observable content
    /// or firing change events.
    ///
    /// # Errors
    ///
    /// `Error::OutOfMemory` if the fresh page cannot be allocated; the
    /// buffer is unchanged.
    pub fn make_contiguous(&mut self, n: usize) -> Result<&[u8]> {
        let n = n.min(self.content_len);
        if n > self.head_page_len() {
            self.coalesce_prefix(n)?;
        }
        Ok(self
            .pages
            .first()
            .map_or(&[] as &[u8], |page| &page.content()[..n]))
    }

    /// Make the entire content contiguous and borrow it.
    ///
    /// # Errors
    ///
    /// `Error::OutOfMemory` if the fresh page cannot be allocated.
    pub fn make_all_contiguous(&mut self) -> Result<&[u8]> {
        self.make_contiguous(usize::MAX)
    }

    fn coalesce_prefix(&mut self, n: usize) -> Result<()> {
        let mut page = Page::with_capacity(n)?;
        let space = page.space_mut();
        let mut filled = 0;
        for chunk in self.peek(n) {
            space[filled..filled + chunk.len()].copy_from_slice(chunk);
            filled += chunk.len();
        }
        debug_assert_eq!(filled, n);
        page.commit(n);

        trace!(n, "coalescing prefix into a fresh page");
        self.muted(move |buf| {
            buf.drain_impl(0..n, false);
            buf.pages.insert(0, page);
            buf.content_len += n;
        });
        self.debug_check();
        Ok(())
    }
}
