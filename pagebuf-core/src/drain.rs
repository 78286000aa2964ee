//! The drain engine: removing content from the front, middle, or whole
//! buffer.
//!
//! Pages wholly inside the drained range are released (firing unref
//! hooks) or, when a drain empties the buffer, one writable page — the
//! largest — is kept as scratch with its cursors reset. Partially
//! covered pages advance or retract their cursors in place; a hole
//! strictly inside a writable page slides the tail left, while a hole
//! inside a read-only page splits it into two pages without copying.

use std::ops::Range;

use tracing::trace;

use crate::buffer::Buffer;
use crate::page::Page;

impl Buffer {
    /// Drop the first `n` content bytes (clamped).
    ///
    /// Returns the number of bytes drained.
    pub fn drain(&mut self, n: usize) -> usize {
        self.drain_impl(0..n, true)
    }

    /// Drop a range of content. Ranges are clamped to the content length.
    ///
    /// Returns the number of bytes drained.
    pub fn drain_range(&mut self, range: Range<usize>) -> usize {
        self.drain_impl(range, true)
    }

    /// Drop the entire content, keeping at most one page as scratch.
    pub fn clear(&mut self) {
        self.drain_impl(0..usize::MAX, true);
    }

    pub(crate) fn drain_impl(&mut self, range: Range<usize>, recycle: bool) -> usize {
        let begin = range.start.min(self.content_len);
        let end = range.end.min(self.content_len);
        if begin >= end {
            return 0;
        }
        let drained = end - begin;
        let emptied = drained == self.content_len;

        let start = self.pos_of(begin);
        let mut idx = start.page_idx;
        let mut lead = start.page_pos;
        let mut remaining = drained;
        let mut scratch: Option<Page> = None;

        while remaining > 0 {
            let page_len = self.pages[idx].content_len();
            if page_len == 0 {
                // empty page inside the range: release it
                drop(self.pages.remove(idx));
                continue;
            }
            debug_assert!(lead < page_len);
            let take = (page_len - lead).min(remaining);
            if lead == 0 && take == page_len {
                // whole page consumed
                let page = self.pages.remove(idx);
                if recycle && emptied && page.is_writable() {
                    let larger = scratch
                        .as_ref()
                        .map_or(true, |kept| kept.capacity() < page.capacity());
                    if larger {
                        scratch = Some(page);
                    }
                }
            } else if lead == 0 {
                self.pages[idx].advance_read(take);
                idx += 1;
            } else if lead + take == page_len {
                self.pages[idx].retract_write(take);
                idx += 1;
            } else if self.pages[idx].is_writable() {
                self.pages[idx].remove_middle(lead, take);
                idx += 1;
            } else {
                let tail = self.pages[idx].split_shared(lead, take);
                idx += 1;
                self.pages.insert(idx, tail);
                idx += 1;
            }
            remaining -= take;
            lead = 0;
        }

        if let Some(mut page) = scratch {
            page.reset();
            trace!(capacity = page.capacity(), "recycled drained page");
            self.pages.push(page);
        }
        if self.pages.len() <= 1 {
            self.pages.shrink_to_fit();
        }

        self.content_len -= drained;
        self.record_delete(drained);
        self.debug_check();
        drained
    }
}
