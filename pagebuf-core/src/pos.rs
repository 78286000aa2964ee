//! Position resolution: content offset → (page, intra-page offset).
//!
//! This is the only place the mapping is computed; the peek view, the
//! drain engine, and search all consume it.

use crate::buffer::Buffer;
use crate::page::Page;

/// A resolved location inside a buffer's content.
///
/// `page_pos` is relative to the page's read cursor. The end sentinel has
/// `page_idx` equal to the page count and `page_pos == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BufPos {
    pub(crate) page_idx: usize,
    pub(crate) page_pos: usize,
    pub(crate) content_pos: usize,
}

impl Buffer {
    /// Resolve content offset `q`, clamped to the end sentinel.
    ///
    /// An offset landing exactly on a page boundary resolves to the start
    /// of the next non-empty page; empty pages are skipped, never resolved
    /// into.
    pub(crate) fn pos_of(&self, q: usize) -> BufPos {
        if q < self.content_len {
            let mut content_pos = 0;
            for (page_idx, page) in self.pages.iter().enumerate() {
                let page_len = page.content_len();
                if q < content_pos + page_len {
                    return BufPos {
                        page_idx,
                        page_pos: q - content_pos,
                        content_pos: q,
                    };
                }
                content_pos += page_len;
            }
        }
        BufPos {
            page_idx: self.pages.len(),
            page_pos: 0,
            content_pos: self.content_len,
        }
    }

    pub(crate) fn head_page_len(&self) -> usize {
        self.pages.first().map_or(0, Page::content_len)
    }
}
