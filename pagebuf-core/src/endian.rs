//! Network-order integer helpers: thin wrappers over add and remove.

use crate::buffer::Buffer;
use crate::error::Result;

impl Buffer {
    /// Append a single byte.
    ///
    /// # Errors
    ///
    /// `Error::OutOfMemory` if growth is refused.
    pub fn add_u8(&mut self, value: u8) -> Result<()> {
        self.add(&[value])
    }

    /// Append a `u16` in network byte order.
    ///
    /// # Errors
    ///
    /// `Error::OutOfMemory` if growth is refused.
    pub fn add_u16_be(&mut self, value: u16) -> Result<()> {
        self.add(&value.to_be_bytes())
    }

    /// Append a `u32` in network byte order.
    ///
    /// # Errors
    ///
    /// `Error::OutOfMemory` if growth is refused.
    pub fn add_u32_be(&mut self, value: u32) -> Result<()> {
        self.add(&value.to_be_bytes())
    }

    /// Append a `u64` in network byte order.
    ///
    /// # Errors
    ///
    /// `Error::OutOfMemory` if growth is refused.
    pub fn add_u64_be(&mut self, value: u64) -> Result<()> {
        self.add(&value.to_be_bytes())
    }

    /// Remove one byte from the front.
    ///
    /// # Errors
    ///
    /// `Error::Exhausted` if the buffer is empty; it is left unchanged.
    pub fn remove_u8(&mut self) -> Result<u8> {
        let mut raw = [0u8; 1];
        self.remove_exact(&mut raw)?;
        Ok(raw[0])
    }

    /// Remove a network-order `u16` from the front.
    ///
    /// # Errors
    ///
    /// `Error::Exhausted` if fewer than two bytes are available; the
    /// buffer is left unchanged.
    pub fn remove_u16_be(&mut self) -> Result<u16> {
        let mut raw = [0u8; 2];
        self.remove_exact(&mut raw)?;
        Ok(u16::from_be_bytes(raw))
    }

    /// Remove a network-order `u32` from the front.
    ///
    /// # Errors
    ///
    /// `Error::Exhausted` if fewer than four bytes are available; the
    /// buffer is left unchanged.
    pub fn remove_u32_be(&mut self) -> Result<u32> {
        let mut raw = [0u8; 4];
        self.remove_exact(&mut raw)?;
        Ok(u32::from_be_bytes(raw))
    }

    /// Remove a network-order `u64` from the front.
    ///
    /// # Errors
    ///
    /// `Error::Exhausted` if fewer than eight bytes are available; the
    /// buffer is left unchanged.
    pub fn remove_u64_be(&mut self) -> Result<u64> {
        let mut raw = [0u8; 8];
        self.remove_exact(&mut raw)?;
        Ok(u64::from_be_bytes(raw))
    }
}
