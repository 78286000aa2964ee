//! Needle search across page boundaries.
//!
//! Within each page the first needle byte is located with `memchr`; a
//! candidate is then verified by walking forward across as many pages as
//! the needle spans. The earliest content position wins.

use std::ops::Range;

use memchr::memchr_iter;

use crate::buffer::Buffer;

impl Buffer {
    /// Find the first occurrence of `needle` in the content.
    ///
    /// Returns its content offset, or `None` when absent. An empty needle
    /// matches at offset 0.
    #[must_use]
    pub fn search(&self, needle: &[u8]) -> Option<usize> {
        self.search_range(0..usize::MAX, needle)
    }

    /// Find the first occurrence of `needle` inside a content range.
    ///
    /// The range is clamped to the content length. A match counts only if
    /// it lies entirely before the range end. An empty needle matches at
    /// the range start.
    #[must_use]
    pub fn search_range(&self, range: Range<usize>, needle: &[u8]) -> Option<usize> {
        let begin = range.start.min(self.content_len);
        let end = range.end.min(self.content_len).max(begin);
        if needle.is_empty() {
            return Some(begin);
        }
        if begin + needle.len() > end {
            return None;
        }

        let start = self.pos_of(begin);
        let mut idx = start.page_idx;
        let mut offset = start.page_pos;
        let mut base = begin;
        while idx < self.pages.len() && base < end {
            let window = &self.pages[idx].content()[offset..];
            for hit in memchr_iter(needle[0], window) {
                let candidate = base + hit;
                if candidate + needle.len() > end {
                    return None;
                }
                if self.matches_at(idx, offset + hit, needle) {
                    return Some(candidate);
                }
            }
            base += window.len();
            idx += 1;
            offset = 0;
        }
        None
    }

    /// Whether `needle` matches the content starting at `page_pos` inside
    /// page `page_idx`, extending across following pages as needed.
    fn matches_at(&self, page_idx: usize, page_pos: usize, needle: &[u8]) -> bool {
        let mut idx = page_idx;
        let mut offset = page_pos;
        let mut rest = needle;
        while !rest.is_empty() {
            let Some(page) = self.pages.get(idx) else {
                return false;
            };
            let avail = &page.content()[offset..];
            if avail.is_empty() {
                idx += 1;
                offset = 0;
                continue;
            }
            let take = avail.len().min(rest.len());
            if avail[..take] != rest[..take] {
                return false;
            }
            rest = &rest[take..];
            idx += 1;
            offset = 0;
        }
        true
    }
}
