//! # Pagebuf
//!
//! A segmented byte buffer for network code and string building.
//!
//! A [`Buffer`] keeps its storage fragmented into an ordered sequence of
//! pages, so content from heterogeneous sources — owned allocations,
//! refcounted [`bytes::Bytes`], static literals, caller-provided slabs —
//! is accumulated without copying, appended and drained at the ends
//! without shifting the middle, and moved wholesale between buffers as
//! page descriptors.
//!
//! ## Quick Start
//!
//! ### Building up and draining content
//!
//! ```rust
//! use pagebuf::Buffer;
//!
//! let mut buf = Buffer::new();
//! buf.add(b"GET ")?;
//! buf.add_readonly(b"/index.html")?;          // zero-copy: references the literal
//! buf.add_fmt(format_args!(" HTTP/1.{}", 1))?;
//!
//! assert_eq!(buf.len(), 24);
//! assert_eq!(buf.take_string()?, "GET /index.html HTTP/1.1");
//! # Ok::<(), pagebuf::Error>(())
//! ```
//!
//! ### Zero-copy framing
//!
//! ```rust
//! use pagebuf::Buffer;
//!
//! let mut incoming = Buffer::new();
//! incoming.add(b"PING\nPONG\n")?;
//!
//! // split one frame off into its own buffer, moving pages where possible
//! let cut = incoming.search(b"\n").unwrap() + 1;
//! let mut frame = Buffer::new();
//! incoming.transfer_to(&mut frame, cut)?;
//!
//! assert_eq!(frame.take_string()?, "PING\n");
//! assert_eq!(incoming.len(), 5);
//! # Ok::<(), pagebuf::Error>(())
//! ```
//!
//! ### Reserve / commit for readers
//!
//! ```rust
//! use pagebuf::Buffer;
//!
//! let mut buf = Buffer::new();
//! let space = buf.reserve_space(4096)?;
//! let n = fill_from_socket(space);            // e.g. read(2) into the slice
//! buf.commit_space(n);
//! # fn fill_from_socket(dst: &mut [u8]) -> usize { dst[..2].copy_from_slice(b"ok"); 2 }
//! # assert_eq!(buf.len(), 2);
//! # Ok::<(), pagebuf::Error>(())
//! ```
//!
//! ## Performance
//!
//! - **Zero-copy ingest**: read-only and refcounted content becomes a page
//!   descriptor, never a memcpy
//! - **Inline first page**: single-page buffers allocate no page table
//! - **Allocation reuse**: draining everything keeps the largest writable
//!   page as scratch for the next round
//!
//! ## Observability
//!
//! Register a change callback to watch content grow and shrink, and fold
//! batches into one event with [`Buffer::coalesced`]. Internal
//! housekeeping (contiguation, space management) never shows up there.

#![warn(missing_docs)]

pub use pagebuf_core::{Buffer, ChangeInfo, Error, Peek, Result};

// Re-export so downstream crates can name the payload types without
// depending on `bytes` themselves.
pub use bytes;

/// Commonly used items.
pub mod prelude {
    pub use crate::{Buffer, ChangeInfo, Error, Result};
    pub use bytes::{Buf, Bytes};
}
