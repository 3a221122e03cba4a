//! Cryptographic building blocks: nonce sequencing, key derivation, and the
//! chunked streaming codec.

pub mod kdf;
pub mod nonce;
pub mod streaming;

/// ChaCha20-Poly1305 key length in bytes.
pub const KEY_LEN: usize = 32;

/// ChaCha20-Poly1305 nonce length in bytes (96 bits).
pub const NONCE_LEN: usize = 12;

/// Poly1305 authentication tag length in bytes.
pub const TAG_LEN: usize = 16;
