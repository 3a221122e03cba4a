//! Argon2id key derivation.
//!
//! Argon2id (hybrid mode) resists both side-channel and GPU/ASIC attacks.
//! The default cost parameters follow the first recommended option of
//! RFC 9106; depending on the parameter set, derivation can take a
//! significant amount of time and memory.

use crate::crypto::KEY_LEN;
use crate::error::{CofferError, Result};
use crate::params::Params;
use argon2::{Algorithm, Argon2, Version};
use rand::rngs::OsRng;
use rand_core::TryRngCore;
use zeroize::Zeroizing;

/// Derives the 32-byte ChaCha20-Poly1305 key from `password` and `params`.
///
/// When `params` carries no salt, a cryptographically random salt of
/// `salt_size` bytes is generated and installed into `params`, so the caller
/// can marshal a header that matches the derived key.
///
/// # Errors
///
/// Returns a normalization error for an invalid parameter set, an I/O error
/// if the OS RNG fails, or [`CofferError::Argon2`] if the backend rejects
/// the cost parameters.
pub fn derive_key(password: &[u8], params: &mut Params) -> Result<Zeroizing<[u8; KEY_LEN]>> {
    params.check()?;

    let salt = match params.salt.take() {
        Some(salt) => salt,
        None => {
            let mut salt = vec![0u8; usize::from(params.salt_size)];
            OsRng
                .try_fill_bytes(&mut salt)
                .map_err(std::io::Error::other)?;
            salt
        }
    };

    let argon_params = argon2::Params::new(
        params.argon_memory,
        params.argon_time,
        u32::from(params.argon_threads),
        Some(KEY_LEN),
    )
    .map_err(|err| CofferError::Argon2(err.to_string()))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon_params);

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    argon2
        .hash_password_into(password, &salt, &mut *key)
        .map_err(|err| CofferError::Argon2(err.to_string()))?;

    params.salt = Some(salt);
    Ok(key)
}
