//! Space management: reserve, commit, grow.
//!
//! The free space of a buffer is the trailing region of its last page.
//! Growth policy, in order: use existing free space; slide drained
//! prefix bytes out of the way; reallocate the tail page; append a fresh
//! page when the tail cannot be reallocated.

use tracing::trace;

use crate::buffer::Buffer;
use crate::error::Result;
use crate::page::Page;

/// Floor for fresh and grown page capacities.
const MIN_PAGE_CAP: usize = 1024;

fn grow_cap(content_len: usize, wanted: usize) -> usize {
    MIN_PAGE_CAP.max((content_len + wanted).next_power_of_two())
}

impl Buffer {
    /// Free bytes in the trailing page. Zero when the tail is read-only
    /// or the buffer has no pages.
    #[must_use]
    pub fn space_len(&self) -> usize {
        self.pages.last().map_or(0, Page::space_len)
    }

    /// Make the trailing page hold at least `n` bytes of free space.
    ///
    /// # Errors
    ///
    /// `Error::OutOfMemory` if the allocator refuses; the buffer is
    /// unchanged.
    pub fn ensure_space(&mut self, n: usize) -> Result<()> {
        if n == 0 || self.space_len() >= n {
            return Ok(());
        }
        let Some(tail) = self.pages.last_mut() else {
            return self.push_page(Page::with_capacity(grow_cap(0, n))?);
        };
        if tail.is_writable() && tail.capacity() - tail.content_len() >= n {
            tail.slide_to_front();
            return Ok(());
        }
        if tail.can_realloc() {
            let new_cap = grow_cap(tail.content_len(), n);
            trace!(new_cap, "growing tail page");
            return tail.grow(new_cap);
        }
        // read-only or unmanaged tail: start a fresh page behind it
        self.push_page(Page::with_capacity(grow_cap(0, n))?)
    }

    /// The trailing page's existing free region, possibly empty. No
    /// minimum is ensured.
    pub fn peek_space(&mut self) -> &mut [u8] {
        self.pages.last_mut().map_or(&mut [], Page::space_mut)
    }

    /// Ensure and borrow exactly `n` bytes of free space.
    ///
    /// Write into the slice, then account for the bytes actually written
    /// with [`commit_space`](Buffer::commit_space). The borrow keeps the
    /// buffer locked until then.
    ///
    /// # Errors
    ///
    /// `Error::OutOfMemory` if the allocator refuses.
    pub fn reserve_space(&mut self, n: usize) -> Result<&mut [u8]> {
        if n == 0 {
            return Ok(&mut []);
        }
        self.ensure_space(n)?;
        let space = self
            .pages
            .last_mut()
            .expect("ensure_space leaves a writable tail page")
            .space_mut();
        Ok(&mut space[..n])
    }

    /// Account for `n` bytes written into previously reserved space.
    ///
    /// # Panics
    ///
    /// Panics if `n` exceeds the trailing page's free space.
    pub fn commit_space(&mut self, n: usize) {
        if n == 0 {
            return;
        }
        let tail = self
            .pages
            .last_mut()
            .expect("commit_space without a reserved page");
        assert!(
            n <= tail.space_len(),
            "commit_space: {n} bytes exceeds the {} reserved",
            tail.space_len()
        );
        tail.commit(n);
        self.content_len += n;
        self.record_add(n);
        self.debug_check();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slide_reclaims_drained_prefix_instead_of_allocating() {
        let slab: &'static mut [u8] = Box::leak(vec![0u8; 16].into_boxed_slice());
        let mut buf = Buffer::with_unmanaged(slab);

        buf.add(b"1234567890").unwrap();
        assert_eq!((buf.len(), buf.space_len()), (10, 6));

        let mut out = [0u8; 5];
        assert_eq!(buf.remove(&mut out), 5);
        assert_eq!((buf.len(), buf.space_len()), (5, 6));
        assert_eq!(buf.peek_all().count(), 1);

        buf.add(b"1234567890").unwrap();
        assert_eq!((buf.len(), buf.space_len()), (15, 1));
        assert_eq!(buf.peek_all().count(), 1);
    }

    #[test]
    fn ensure_on_readonly_tail_appends_a_page() {
        let mut buf = Buffer::new();
        buf.add_readonly(b"Earth").unwrap();
        assert_eq!(buf.space_len(), 0);

        buf.ensure_space(10).unwrap();
        assert_eq!(buf.len(), 5);
        assert!(buf.space_len() >= 10);
    }

    #[test]
    fn ensure_is_idempotent_when_space_exists() {
        let slab: &'static mut [u8] = Box::leak(vec![0u8; 128].into_boxed_slice());
        let mut buf = Buffer::with_unmanaged(slab);
        for n in 0..128 {
            buf.ensure_space(n).unwrap();
            assert_eq!(buf.space_len(), 128);
            assert_eq!(buf.len(), 0);
        }
    }

    #[test]
    fn reserve_then_commit_partial() {
        let mut buf = Buffer::new();
        let space = buf.reserve_space(64).unwrap();
        assert_eq!(space.len(), 64);
        space[..3].copy_from_slice(b"abc");
        buf.commit_space(3);
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.peek_all().next(), Some(&b"abc"[..]));
    }

    #[test]
    fn grown_capacity_is_a_power_of_two_with_floor() {
        assert_eq!(grow_cap(0, 1), 1024);
        assert_eq!(grow_cap(0, 1024), 1024);
        assert_eq!(grow_cap(0, 1025), 2048);
        assert_eq!(grow_cap(5000, 3000), 8192);
    }

    #[test]
    #[should_panic(expected = "commit_space")]
    fn overcommit_is_a_contract_violation() {
        let mut buf = Buffer::new();
        let _ = buf.reserve_space(8).unwrap();
        buf.commit_space(64 * 1024);
    }
}
