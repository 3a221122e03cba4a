//! coffer - password-based streaming encryption
//!
//! Encrypts and decrypts byte streams of any size under a password,
//! producing a self-describing container: one textual header line carrying
//! the Argon2id parameters, followed by ChaCha20-Poly1305 sealed chunks.
//!
//! # Features
//!
//! - **Streaming**: memory use is bounded by one chunk, regardless of input
//!   size
//! - **Authenticated**: every chunk carries its own Poly1305 tag; nonces are
//!   a monotonic counter, so truncation, reordering, and bit flips all fail
//!   authentication
//! - **Memory-hard KDF**: Argon2id with parameters stored in the header, so
//!   a reader knows the derivation cost before paying it
//!
//! # Example
//!
//! ```
//! use coffer::Params;
//!
//! // Cheap Argon2 costs keep the example fast; the defaults are much
//! // stronger.
//! let mut params = Params {
//!     argon_memory: 64,
//!     argon_threads: 1,
//!     ..Params::default()
//! };
//!
//! let mut sealed = Vec::new();
//! coffer::encrypt(b"correct horse", &b"attack at dawn"[..], &mut sealed, &mut params)?;
//!
//! let mut plain = Vec::new();
//! coffer::decrypt(b"correct horse", &mut sealed.as_slice(), &mut plain)?;
//! assert_eq!(plain, b"attack at dawn");
//! # Ok::<(), coffer::CofferError>(())
//! ```

pub mod crypto;
pub mod error;
pub mod params;
pub mod password;
pub mod storage;

pub use crypto::kdf::derive_key;
pub use crypto::nonce::NonceCounter;
pub use crypto::streaming::{ChunkedReader, ChunkedWriter};
pub use crypto::{KEY_LEN, NONCE_LEN, TAG_LEN};
pub use error::{CofferError, Result};
pub use params::Params;

use std::io::{BufRead, ErrorKind, Read, Write};

/// Copy buffer size for the one-shot helpers.
const COPY_BUF_LEN: usize = 32 * 1024;

/// Encrypts `src` into `dst` as a complete container.
///
/// Derives the key from `password` (installing a random salt into `params`
/// if it has none), writes the header line, then seals `src` chunk by chunk
/// and emits the terminal frame.
///
/// # Errors
///
/// Returns a parameter error for an invalid `params`, or any I/O or codec
/// error encountered while streaming.
pub fn encrypt<R: Read, W: Write>(
    password: &[u8],
    mut src: R,
    mut dst: W,
    params: &mut Params,
) -> Result<()> {
    let key = derive_key(password, params)?;

    let header = params.marshal_header()?;
    dst.write_all(&header)?;

    let mut writer = ChunkedWriter::new(&key, dst, params)?;
    let mut buf = vec![0u8; COPY_BUF_LEN];
    loop {
        let n = match src.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        };
        writer.write(&buf[..n])?;
    }
    writer.close()
}

/// Decrypts a complete container from `src` into `dst`.
///
/// Parses the header line to recover the derivation parameters, derives the
/// key from `password`, then opens and writes out every chunk.
///
/// # Errors
///
/// Returns a header error for a malformed container, and
/// [`CofferError::Authentication`] when the password is wrong or the
/// ciphertext was modified or truncated.
pub fn decrypt<R: BufRead, W: Write>(password: &[u8], mut src: R, mut dst: W) -> Result<()> {
    let mut params = Params::parse_header(&mut src)?;
    let key = derive_key(password, &mut params)?;

    let mut reader = ChunkedReader::new(&key, src, &params)?;
    let mut buf = vec![0u8; COPY_BUF_LEN];
    loop {
        match reader.read(&mut buf) {
            Ok(n) => dst.write_all(&buf[..n])?,
            Err(CofferError::EndOfStream) => return Ok(()),
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_params() -> Params {
        Params {
            argon_time: 1,
            argon_memory: 64,
            argon_threads: 1,
            chunk_size: 256,
            ..Params::default()
        }
    }

    #[test]
    fn test_encrypt_decrypt_round_trip() {
        let plaintext: Vec<u8> = (0..2000u32).map(|i| i as u8).collect();
        let mut params = test_params();

        let mut sealed = Vec::new();
        encrypt(b"password", plaintext.as_slice(), &mut sealed, &mut params).unwrap();

        let mut plain = Vec::new();
        decrypt(b"password", &mut sealed.as_slice(), &mut plain).unwrap();
        assert_eq!(plain, plaintext);
    }

    #[test]
    fn test_decrypt_wrong_password() {
        let mut params = test_params();
        let mut sealed = Vec::new();
        encrypt(b"password", &b"secret"[..], &mut sealed, &mut params).unwrap();

        let mut plain = Vec::new();
        let err = decrypt(b"wrong", &mut sealed.as_slice(), &mut plain).unwrap_err();
        assert!(matches!(err, CofferError::Authentication));
        assert!(plain.is_empty());
    }

    #[test]
    fn test_encrypt_installs_salt_used_in_header() {
        let mut params = test_params();
        let mut sealed = Vec::new();
        encrypt(b"password", &b""[..], &mut sealed, &mut params).unwrap();

        let salt = params.salt.as_ref().expect("salt installed");
        assert_eq!(salt.len(), usize::from(params.salt_size));

        let parsed = Params::parse_header(&mut sealed.as_slice()).unwrap();
        assert_eq!(parsed.salt.as_ref(), Some(salt));
    }

    #[test]
    fn test_decrypt_garbage_header() {
        let mut plain = Vec::new();
        let err = decrypt(b"password", &mut &b"not a container"[..], &mut plain).unwrap_err();
        assert!(matches!(err, CofferError::Parsing(_)));
    }
}
