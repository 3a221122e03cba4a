//! Container parameters and the textual header codec.
//!
//! Every container starts with a single LF-terminated ASCII line that binds
//! the key-derivation parameters to the ciphertext:
//!
//! ```text
//! $argon2id$v=19$t=1,m=2097152,p=4$s=<base64 salt>$b=<chunk size>\n
//! ```
//!
//! The salt uses the standard base64 alphabet without padding. Reading the
//! header costs nothing, so a decryptor can discover the Argon2 cost before
//! committing memory and time to it.

use crate::error::{CofferError, Result};
use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine as _;
use std::io::BufRead;

/// KDF identifier accepted in headers.
pub const ARGON_TYPE: &str = "argon2id";

/// Argon2 version accepted in headers (0x13).
pub const ARGON_VERSION: u8 = 19;

/// Default salt length in bytes.
pub const DEFAULT_SALT_SIZE: u8 = 16;

/// Default Argon2 passes.
pub const DEFAULT_ARGON_TIME: u32 = 1;

/// Default Argon2 memory in KiB (2 GiB).
pub const DEFAULT_ARGON_MEMORY: u32 = 1 << 21;

/// Default Argon2 parallelism.
pub const DEFAULT_ARGON_THREADS: u8 = 4;

/// Default plaintext bytes per chunk (64 KiB).
pub const DEFAULT_CHUNK_SIZE: i64 = 64 << 10;

/// Maximum salt length in bytes, bounded by the u8 `salt_size` mirror.
pub const MAX_SALT_LEN: usize = u8::MAX as usize;

/// Parameters used to derive the symmetric key with Argon2id and to split
/// the plaintext into chunks that are sealed under distinct nonces.
///
/// The zero value ([`Params::default`]) is ready to use after a call to
/// [`Params::check`], which fills every zero field with its default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    /// Argon2 variant used to derive the key. Only `argon2id` is supported.
    pub argon_type: String,

    /// Argon2 version number. Only 19 (0x13) is supported.
    pub argon_version: u8,

    /// Length, in bytes, of the salt that will be generated when `salt`
    /// is absent.
    pub salt_size: u8,

    /// The Argon2 salt. Installed by key derivation when absent.
    pub salt: Option<Vec<u8>>,

    /// Number of Argon2 passes.
    pub argon_time: u32,

    /// Argon2 memory cost in KiB.
    pub argon_memory: u32,

    /// Argon2 parallelism.
    pub argon_threads: u8,

    /// Length, in bytes, of the plaintext chunks that are sealed under
    /// distinct nonces. Encoded signed in the header; must be positive.
    pub chunk_size: i64,
}

impl Params {
    /// Creates a parameter set with the default configuration.
    pub fn new() -> Self {
        let mut params = Self::default();
        // The zero value normalizes without error.
        let _ = params.check();
        params
    }

    /// Normalizes the parameter set: fills every zero field with its
    /// default and rejects non-zero fields that are out of range.
    ///
    /// # Errors
    ///
    /// Returns the field-specific error kind for the first invalid field.
    pub fn check(&mut self) -> Result<()> {
        if self.argon_type.is_empty() {
            self.argon_type = ARGON_TYPE.to_string();
        } else if self.argon_type != ARGON_TYPE {
            return Err(CofferError::ArgonType);
        }

        if self.argon_version == 0 {
            self.argon_version = ARGON_VERSION;
        } else if self.argon_version != ARGON_VERSION {
            return Err(CofferError::ArgonVersion);
        }

        match &self.salt {
            Some(salt) => {
                let len = u8::try_from(salt.len()).map_err(|_| CofferError::Salt)?;
                if len == 0 {
                    return Err(CofferError::Salt);
                }
                if self.salt_size != 0 && self.salt_size != len {
                    return Err(CofferError::SaltSize);
                }
                self.salt_size = len;
            }
            None => {
                if self.salt_size == 0 {
                    self.salt_size = DEFAULT_SALT_SIZE;
                }
            }
        }

        if self.argon_time == 0 {
            self.argon_time = DEFAULT_ARGON_TIME;
        }

        if self.argon_memory == 0 {
            self.argon_memory = DEFAULT_ARGON_MEMORY;
        }

        if self.argon_threads == 0 {
            self.argon_threads = DEFAULT_ARGON_THREADS;
        }

        if self.chunk_size == 0 {
            self.chunk_size = DEFAULT_CHUNK_SIZE;
        } else if self.chunk_size < 0 {
            return Err(CofferError::ChunkSize);
        }

        Ok(())
    }

    /// Verifies that the parameter set is already normalized, without
    /// mutating it. Codec constructors take parameters by shared reference
    /// and call this instead of [`Params::check`].
    pub(crate) fn validate(&self) -> Result<()> {
        if self.argon_type != ARGON_TYPE {
            return Err(CofferError::ArgonType);
        }
        if self.argon_version != ARGON_VERSION {
            return Err(CofferError::ArgonVersion);
        }
        match &self.salt {
            Some(salt) => {
                if salt.is_empty() || salt.len() > MAX_SALT_LEN {
                    return Err(CofferError::Salt);
                }
                if usize::from(self.salt_size) != salt.len() {
                    return Err(CofferError::SaltSize);
                }
            }
            None => {
                if self.salt_size == 0 {
                    return Err(CofferError::Salt);
                }
            }
        }
        if self.argon_time == 0 {
            return Err(CofferError::ArgonTime);
        }
        if self.argon_memory == 0 {
            return Err(CofferError::ArgonMemory);
        }
        if self.argon_threads == 0 {
            return Err(CofferError::ArgonThreads);
        }
        if self.chunk_size <= 0 {
            return Err(CofferError::ChunkSize);
        }
        Ok(())
    }

    /// Serializes the parameter set as a header line, normalizing it first.
    ///
    /// The salt field is empty when no salt has been installed yet; a sealed
    /// container always carries a non-empty salt.
    ///
    /// # Errors
    ///
    /// Propagates any normalization error.
    pub fn marshal_header(&mut self) -> Result<Vec<u8>> {
        self.check()?;

        let salt = match &self.salt {
            Some(salt) => STANDARD_NO_PAD.encode(salt),
            None => String::new(),
        };
        let header = format!(
            "${}$v={}$t={},m={},p={}$s={}$b={}\n",
            self.argon_type,
            self.argon_version,
            self.argon_time,
            self.argon_memory,
            self.argon_threads,
            salt,
            self.chunk_size,
        );

        Ok(header.into_bytes())
    }

    /// Parses the header line of a container, consuming exactly the bytes
    /// up to and including the first LF from `src`.
    ///
    /// # Errors
    ///
    /// Structural problems yield [`CofferError::Parsing`]; an out-of-range
    /// field value yields its field-specific kind, chained under `Parsing`
    /// when the syntactic step also failed.
    pub fn parse_header<R: BufRead>(src: &mut R) -> Result<Self> {
        let mut line = Vec::new();
        src.read_until(b'\n', &mut line)?;
        if line.pop() != Some(b'\n') {
            return Err(CofferError::Parsing(None));
        }
        let line = std::str::from_utf8(&line).map_err(|_| CofferError::Parsing(None))?;

        let fields: Vec<&str> = line.split('$').collect();
        if fields.len() != 6 || !fields[0].is_empty() {
            return Err(CofferError::Parsing(None));
        }

        let mut params = Params {
            argon_type: fields[1].to_string(),
            ..Params::default()
        };
        if params.argon_type.is_empty() {
            return Err(CofferError::ArgonType);
        }

        let version = field_value(fields[2], "v")?;
        let version: u8 = parse_unsigned(version)
            .ok_or_else(|| CofferError::Parsing(Some(Box::new(CofferError::ArgonVersion))))?;
        if version == 0 {
            return Err(CofferError::ArgonVersion);
        }
        params.argon_version = version;

        parse_argon_params(&mut params, fields[3])?;

        let salt = field_value(fields[4], "s")?;
        let salt = STANDARD_NO_PAD
            .decode(salt)
            .map_err(|_| CofferError::Parsing(Some(Box::new(CofferError::Salt))))?;
        if salt.is_empty() {
            return Err(CofferError::Salt);
        }
        params.salt = Some(salt);

        let chunk_size = field_value(fields[5], "b")?;
        let chunk_size: i64 = chunk_size
            .parse()
            .map_err(|_| CofferError::Parsing(Some(Box::new(CofferError::ChunkSize))))?;
        if chunk_size <= 0 {
            return Err(CofferError::ChunkSize);
        }
        params.chunk_size = chunk_size;

        params.check()?;
        Ok(params)
    }
}

/// Extracts the value of a `key=value` field, requiring exactly one `=`.
fn field_value<'a>(field: &'a str, key: &str) -> Result<&'a str> {
    let mut parts = field.split('=');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(k), Some(value), None) if k == key => Ok(value),
        _ => Err(CofferError::Parsing(None)),
    }
}

/// Parses a decimal unsigned integer without a sign character.
fn parse_unsigned<T: std::str::FromStr>(value: &str) -> Option<T> {
    if value.starts_with('+') {
        return None;
    }
    value.parse().ok()
}

/// Parses the `t=..,m=..,p=..` cost field.
fn parse_argon_params(params: &mut Params, field: &str) -> Result<()> {
    let parts: Vec<&str> = field.split(',').collect();
    if parts.len() != 3 {
        return Err(CofferError::Parsing(None));
    }

    let time = field_value(parts[0], "t")?;
    let time: u32 = parse_unsigned(time)
        .ok_or_else(|| CofferError::Parsing(Some(Box::new(CofferError::ArgonTime))))?;
    if time == 0 {
        return Err(CofferError::ArgonTime);
    }
    params.argon_time = time;

    let memory = field_value(parts[1], "m")?;
    let memory: u32 = parse_unsigned(memory)
        .ok_or_else(|| CofferError::Parsing(Some(Box::new(CofferError::ArgonMemory))))?;
    if memory == 0 {
        return Err(CofferError::ArgonMemory);
    }
    params.argon_memory = memory;

    let threads = field_value(parts[2], "p")?;
    let threads: u8 = parse_unsigned(threads)
        .ok_or_else(|| CofferError::Parsing(Some(Box::new(CofferError::ArgonThreads))))?;
    if threads == 0 {
        return Err(CofferError::ArgonThreads);
    }
    params.argon_threads = threads;

    Ok(())
}
