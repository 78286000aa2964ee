//! Formatted and streamed writes into the buffer.
//!
//! `write!(buf, …)` works through the [`fmt::Write`] impl; `add_fmt`
//! additionally guarantees all-or-nothing semantics and a single change
//! event for the whole formatted string. The [`io::Write`] impl lets the
//! buffer stand in wherever a byte sink is expected.

use std::fmt;
use std::io;

use crate::buffer::Buffer;
use crate::error::{Error, Result};

struct FmtWriter<'a> {
    buf: &'a mut Buffer,
    err: Option<Error>,
}

impl fmt::Write for FmtWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.buf.add(s.as_bytes()).map_err(|e| {
            self.err = Some(e);
            fmt::Error
        })
    }
}

impl Buffer {
    /// Append formatted text, growing as needed.
    ///
    /// ```
    /// use pagebuf_core::Buffer;
    ///
    /// let mut buf = Buffer::new();
    /// buf.add_fmt(format_args!("{}, {}!", "Hello", "World")).unwrap();
    /// assert_eq!(buf.len(), 13);
    /// ```
    ///
    /// # Errors
    ///
    /// `Error::OutOfMemory` if growth is refused, `Error::Format` if a
    /// `Display` impl reports failure. On error nothing is appended.
    pub fn add_fmt(&mut self, args: fmt::Arguments<'_>) -> Result<()> {
        let before = self.content_len;
        let outcome = self.muted(|buf| {
            let mut writer = FmtWriter { buf, err: None };
            let fmt_result = fmt::Write::write_fmt(&mut writer, args);
            match (fmt_result, writer.err.take()) {
                (Ok(()), None) => Ok(()),
                (_, Some(err)) => Err(err),
                (Err(fmt::Error), None) => Err(Error::Format),
            }
        });
        match outcome {
            Ok(()) => {
                let added = self.content_len - before;
                self.record_add(added);
                Ok(())
            }
            Err(err) => {
                let end = self.content_len;
                self.muted(|buf| {
                    buf.drain_impl(before..end, false);
                });
                Err(err)
            }
        }
    }
}

impl fmt::Write for Buffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.add(s.as_bytes()).map_err(|_| fmt::Error)
    }
}

impl io::Write for Buffer {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.add(data)?;
        Ok(data.len())
    }

    fn write_vectored(&mut self, bufs: &[io::IoSlice<'_>]) -> io::Result<usize> {
        let mut written = 0;
        self.coalesced(|buf| {
            for chunk in bufs {
                buf.add(chunk)?;
                written += chunk.len();
            }
            Ok::<(), Error>(())
        })?;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
