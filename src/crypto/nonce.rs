//! The per-chunk nonce counter.
//!
//! Chunks are sealed under a 96-bit big-endian counter that starts at zero
//! and advances by one per frame, so the chunk index and the nonce coincide
//! numerically. Reordering or duplicating frames therefore fails
//! authentication without any per-frame sequence field.

use crate::crypto::NONCE_LEN;
use crate::error::{CofferError, Result};

/// A 96-bit big-endian counter used as the AEAD nonce for each chunk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NonceCounter([u8; NONCE_LEN]);

impl NonceCounter {
    /// Creates a counter at zero, the nonce of the first chunk.
    pub fn new() -> Self {
        Self([0; NONCE_LEN])
    }

    /// The current nonce value.
    pub fn as_bytes(&self) -> &[u8; NONCE_LEN] {
        &self.0
    }

    /// Adds one to the counter, carrying from the rightmost byte.
    ///
    /// # Errors
    ///
    /// Returns [`CofferError::NonceOverflow`] iff every byte was `0xFF` on
    /// entry, i.e. the 96-bit value would wrap.
    pub fn increment(&mut self) -> Result<()> {
        for byte in self.0.iter_mut().rev() {
            *byte = byte.wrapping_add(1);
            if *byte != 0 {
                return Ok(());
            }
        }
        Err(CofferError::NonceOverflow)
    }
}
