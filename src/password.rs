//! Terminal password acquisition.
//!
//! Prompts go through the controlling terminal rather than the standard
//! streams, so they keep working when stdin or stdout carries container
//! data.

use crate::error::{CofferError, Result};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

/// Prompts for an existing password, for decryption.
///
/// # Errors
///
/// Returns an I/O error if no terminal is available, or
/// [`CofferError::Password`] when the entry is empty.
pub fn prompt_password() -> Result<Zeroizing<String>> {
    let password = Zeroizing::new(rpassword::prompt_password("Password: ")?);
    if password.is_empty() {
        return Err(CofferError::Password(
            "password must not be empty".to_string(),
        ));
    }
    Ok(password)
}

/// Prompts for a new password, for encryption: asks twice and compares the
/// inputs in constant time.
///
/// # Errors
///
/// Returns [`CofferError::Password`] when the password is empty or the
/// confirmation does not match.
pub fn prompt_new_password() -> Result<Zeroizing<String>> {
    let password = Zeroizing::new(rpassword::prompt_password("Password: ")?);
    if password.is_empty() {
        return Err(CofferError::Password(
            "password must not be empty".to_string(),
        ));
    }

    let confirmation = Zeroizing::new(rpassword::prompt_password("Confirm password: ")?);
    if !bool::from(password.as_bytes().ct_eq(confirmation.as_bytes())) {
        return Err(CofferError::Password("passwords do not match".to_string()));
    }

    Ok(password)
}
