//! Error types for the coffer library.
//!
//! Every fallible operation in the crate returns [`CofferError`]. Header
//! parsing chains a field-specific cause under [`CofferError::Parsing`], so
//! callers can match on either the outer or the inner kind through
//! [`std::error::Error::source`].

use thiserror::Error;

/// Main error type for all container operations.
#[derive(Error, Debug)]
pub enum CofferError {
    /// I/O error from the upstream source or downstream sink.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// KDF identifier is not `argon2id`.
    #[error("unsupported argon2 type")]
    ArgonType,

    /// Argon2 version is not 19 (0x13).
    #[error("unsupported argon2 version")]
    ArgonVersion,

    /// Argon2 time cost is zero.
    #[error("invalid argon2 time parameter")]
    ArgonTime,

    /// Argon2 memory cost is zero.
    #[error("invalid argon2 memory parameter")]
    ArgonMemory,

    /// Argon2 parallelism is zero.
    #[error("invalid argon2 threads parameter")]
    ArgonThreads,

    /// Salt is empty, longer than 255 bytes, or not valid base64.
    #[error("invalid salt")]
    Salt,

    /// Declared salt size does not match the provided salt length.
    #[error("salt size does not match salt length")]
    SaltSize,

    /// Chunk size is zero or negative.
    #[error("invalid chunk size")]
    ChunkSize,

    /// Header is structurally malformed. Carries the violated field's error
    /// when the failure was a bad value rather than bad structure.
    #[error("malformed header")]
    Parsing(#[source] Option<Box<CofferError>>),

    /// Argon2 backend rejected the derivation parameters.
    #[error("argon2 error: {0}")]
    Argon2(String),

    /// The 96-bit chunk counter wrapped around.
    #[error("chunk counter overflowed")]
    NonceOverflow,

    /// A ciphertext frame failed AEAD authentication.
    #[error("chunk authentication failed")]
    Authentication,

    /// Write or close was called on a closed writer.
    #[error("operation on closed writer")]
    ClosedWriter,

    /// The decryptor consumed the terminal frame; no plaintext remains.
    #[error("end of stream")]
    EndOfStream,

    /// Password prompt failed or the inputs did not qualify.
    #[error("password error: {0}")]
    Password(String),
}

/// Type alias for results using [`CofferError`].
pub type Result<T> = std::result::Result<T, CofferError>;

// The streaming codec latches its first error and reports it on every later
// call, so the error must be reproducible. `std::io::Error` does not
// implement `Clone`; its copy keeps the kind and message.
impl Clone for CofferError {
    fn clone(&self) -> Self {
        match self {
            Self::Io(err) => Self::Io(std::io::Error::new(err.kind(), err.to_string())),
            Self::ArgonType => Self::ArgonType,
            Self::ArgonVersion => Self::ArgonVersion,
            Self::ArgonTime => Self::ArgonTime,
            Self::ArgonMemory => Self::ArgonMemory,
            Self::ArgonThreads => Self::ArgonThreads,
            Self::Salt => Self::Salt,
            Self::SaltSize => Self::SaltSize,
            Self::ChunkSize => Self::ChunkSize,
            Self::Parsing(cause) => Self::Parsing(cause.clone()),
            Self::Argon2(msg) => Self::Argon2(msg.clone()),
            Self::NonceOverflow => Self::NonceOverflow,
            Self::Authentication => Self::Authentication,
            Self::ClosedWriter => Self::ClosedWriter,
            Self::EndOfStream => Self::EndOfStream,
            Self::Password(msg) => Self::Password(msg.clone()),
        }
    }
}
