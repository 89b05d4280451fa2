//! Fixed-size byte-addressable memory with big-endian word layout.
//!
//! Word accesses must be four-byte aligned and fully in bounds; byte accesses
//! must be in bounds. Violations fault, never clamp. The backing store is
//! sized at construction and never grows.

use crate::fault::Fault;

/// Default memory size: 64 KiB, enough for the teaching programs.
pub const DEFAULT_MEMORY_BYTES: usize = 64 * 1024;

/// Byte-addressable store with aligned-word and raw-byte access.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Memory {
    bytes: Box<[u8]>,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new(DEFAULT_MEMORY_BYTES)
    }
}

impl Memory {
    /// Allocates a zeroed store of `size_bytes` bytes.
    #[must_use]
    pub fn new(size_bytes: usize) -> Self {
        Self {
            bytes: vec![0; size_bytes].into_boxed_slice(),
        }
    }

    /// Returns the configured size in bytes.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Checks alignment and bounds for a four-byte span starting at `addr`.
    fn word_index(&self, addr: u32) -> Result<usize, Fault> {
        if addr % 4 != 0 {
            return Err(Fault::MisalignedAccess { addr });
        }
        let start = addr as usize;
        let end = start.checked_add(4).filter(|end| *end <= self.size());
        match end {
            Some(_) => Ok(start),
            None => Err(Fault::OutOfBoundsAccess {
                addr,
                size: self.size(),
            }),
        }
    }

    /// Reads an aligned big-endian word.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::MisalignedAccess`] when `addr` is not a multiple of
    /// four, or [`Fault::OutOfBoundsAccess`] when the four-byte span crosses
    /// the configured size.
    pub fn read_word(&self, addr: u32) -> Result<u32, Fault> {
        let start = self.word_index(addr)?;
        let b = &self.bytes[start..start + 4];
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Writes an aligned big-endian word.
    ///
    /// # Errors
    ///
    /// Same fault conditions as [`Memory::read_word`].
    pub fn write_word(&mut self, addr: u32, value: u32) -> Result<(), Fault> {
        let start = self.word_index(addr)?;
        self.bytes[start..start + 4].copy_from_slice(&value.to_be_bytes());
        Ok(())
    }

    /// Reads a single byte.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::OutOfBoundsAccess`] when `addr` is outside the store.
    pub fn read_byte(&self, addr: u32) -> Result<u8, Fault> {
        self.bytes
            .get(addr as usize)
            .copied()
            .ok_or(Fault::OutOfBoundsAccess {
                addr,
                size: self.size(),
            })
    }

    /// Writes a single byte.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::OutOfBoundsAccess`] when `addr` is outside the store.
    pub fn write_byte(&mut self, addr: u32, value: u8) -> Result<(), Fault> {
        let size = self.size();
        match self.bytes.get_mut(addr as usize) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(Fault::OutOfBoundsAccess { addr, size }),
        }
    }
}
