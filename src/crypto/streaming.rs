//! Chunked streaming encryption and decryption.
//!
//! The plaintext is split into fixed-size chunks, each sealed independently
//! with ChaCha20-Poly1305 under a 96-bit counter nonce. A sealed chunk (a
//! *frame*) is `chunk_size + 16` bytes; only the terminal frame may be
//! shorter. The encryptor always emits a terminal frame on close, even for
//! an empty buffer, so the decryptor can treat "frame shorter than
//! `chunk_size + 16`" as the end-of-stream marker without a length field.
//!
//! Memory stays bounded by one frame per codec instance regardless of the
//! plaintext size.

use crate::crypto::nonce::NonceCounter;
use crate::crypto::{KEY_LEN, TAG_LEN};
use crate::error::{CofferError, Result};
use crate::params::Params;
use chacha20poly1305::aead::{AeadInPlace, KeyInit};
use chacha20poly1305::{ChaCha20Poly1305, Nonce};
use std::io::{Read, Write};

/// Converts the validated chunk size to a buffer length.
fn chunk_len(params: &Params) -> Result<usize> {
    usize::try_from(params.chunk_size).map_err(|_| CofferError::ChunkSize)
}

/// Streaming encryptor: buffers plaintext into chunks and writes one sealed
/// frame per full chunk to the downstream sink.
///
/// [`ChunkedWriter::close`] must be called to emit the terminal frame; a
/// writer that is dropped without closing leaves the container truncated,
/// which decryption detects as an authentication failure.
pub struct ChunkedWriter<W: Write> {
    aead: ChaCha20Poly1305,
    chunk_size: usize,
    dst: W,
    nonce: NonceCounter,
    buff: Vec<u8>,
    err: Option<CofferError>,
}

impl<W: Write> ChunkedWriter<W> {
    /// Creates an encryptor over `dst` using a 256-bit key.
    ///
    /// # Errors
    ///
    /// Returns a parameter error if `params` is not normalized.
    pub fn new(key: &[u8; KEY_LEN], dst: W, params: &Params) -> Result<Self> {
        params.validate()?;
        let chunk_size = chunk_len(params)?;

        Ok(Self {
            aead: ChaCha20Poly1305::new(key.into()),
            chunk_size,
            dst,
            nonce: NonceCounter::new(),
            buff: Vec::with_capacity(chunk_size + TAG_LEN),
            err: None,
        })
    }

    /// Seals the buffered bytes in place and writes the frame downstream.
    fn flush_chunk(&mut self) -> Result<()> {
        let nonce = Nonce::from(*self.nonce.as_bytes());
        self.aead
            .encrypt_in_place(&nonce, b"", &mut self.buff)
            .map_err(|_| CofferError::Authentication)?;
        self.dst.write_all(&self.buff)?;
        self.buff.clear();
        self.nonce.increment()
    }

    /// Appends `buf` to the current chunk, sealing and writing a frame each
    /// time the chunk fills. Returns the number of bytes consumed, which is
    /// `buf.len()` on success.
    ///
    /// # Errors
    ///
    /// A sink error or nonce overflow is latched: this call and every later
    /// one return the same error.
    pub fn write(&mut self, mut buf: &[u8]) -> Result<usize> {
        if let Some(err) = &self.err {
            return Err(err.clone());
        }

        let total = buf.len();
        while !buf.is_empty() {
            let take = (self.chunk_size - self.buff.len()).min(buf.len());
            self.buff.extend_from_slice(&buf[..take]);
            buf = &buf[take..];
            if self.buff.len() == self.chunk_size {
                if let Err(err) = self.flush_chunk() {
                    self.err = Some(err.clone());
                    return Err(err);
                }
            }
        }
        Ok(total)
    }

    /// Seals and writes whatever remains in the buffer as the terminal
    /// frame, even when the buffer is empty.
    ///
    /// # Errors
    ///
    /// Returns [`CofferError::ClosedWriter`] if the writer was already
    /// closed, or the latched error from an earlier failure.
    pub fn close(&mut self) -> Result<()> {
        if let Some(err) = &self.err {
            return Err(err.clone());
        }

        match self.flush_chunk() {
            Ok(()) => {
                self.err = Some(CofferError::ClosedWriter);
                Ok(())
            }
            Err(err) => {
                self.err = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Consumes the writer, returning the downstream sink.
    pub fn into_inner(self) -> W {
        self.dst
    }
}

impl<W: Write> Write for ChunkedWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        ChunkedWriter::write(self, buf).map_err(std::io::Error::other)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.dst.flush()
    }
}

/// Streaming decryptor: reads sealed frames from the upstream source and
/// serves the authenticated plaintext.
pub struct ChunkedReader<R: Read> {
    aead: ChaCha20Poly1305,
    chunk_size: usize,
    src: R,
    nonce: NonceCounter,
    buff: Vec<u8>,
    pos: usize,
    last_chunk: bool,
    err: Option<CofferError>,
}

impl<R: Read> ChunkedReader<R> {
    /// Creates a decryptor over `src` using a 256-bit key.
    ///
    /// `src` must be positioned at the first frame, i.e. past the header.
    ///
    /// # Errors
    ///
    /// Returns a parameter error if `params` is not normalized.
    pub fn new(key: &[u8; KEY_LEN], src: R, params: &Params) -> Result<Self> {
        params.validate()?;
        let chunk_size = chunk_len(params)?;

        Ok(Self {
            aead: ChaCha20Poly1305::new(key.into()),
            chunk_size,
            src,
            nonce: NonceCounter::new(),
            buff: Vec::with_capacity(chunk_size + TAG_LEN),
            pos: 0,
            last_chunk: false,
            err: None,
        })
    }

    /// Reads and opens the next frame. Returns true if it was the terminal
    /// frame: every non-terminal frame is exactly `chunk_size + 16` bytes,
    /// so any shorter frame must be the last.
    fn read_chunk(&mut self) -> Result<bool> {
        self.buff.clear();
        self.pos = 0;

        let frame_len = (self.chunk_size + TAG_LEN) as u64;
        let n = (&mut self.src).take(frame_len).read_to_end(&mut self.buff)?;
        let last = (n as u64) < frame_len;

        let nonce = Nonce::from(*self.nonce.as_bytes());
        self.aead
            .decrypt_in_place(&nonce, b"", &mut self.buff)
            .map_err(|_| CofferError::Authentication)?;

        self.nonce.increment()?;
        Ok(last)
    }

    /// Copies up to `out.len()` bytes of plaintext into `out`, pulling and
    /// authenticating frames from the source as needed.
    ///
    /// # Errors
    ///
    /// Returns [`CofferError::EndOfStream`] once the terminal frame has been
    /// fully consumed; authentication failures, nonce overflow, and source
    /// errors are latched and repeated on every later call.
    pub fn read(&mut self, out: &mut [u8]) -> Result<usize> {
        if let Some(err) = &self.err {
            return Err(err.clone());
        }

        let mut total = 0;
        while total < out.len() {
            if self.pos == self.buff.len() {
                if self.last_chunk {
                    self.err = Some(CofferError::EndOfStream);
                    if total == 0 {
                        return Err(CofferError::EndOfStream);
                    }
                    return Ok(total);
                }

                match self.read_chunk() {
                    Ok(last) => self.last_chunk = last,
                    Err(err) => {
                        self.err = Some(err.clone());
                        return Err(err);
                    }
                }
            }

            let n = (self.buff.len() - self.pos).min(out.len() - total);
            out[total..total + n].copy_from_slice(&self.buff[self.pos..self.pos + n]);
            self.pos += n;
            total += n;
        }

        Ok(total)
    }

    /// Consumes the reader, returning the upstream source.
    pub fn into_inner(self) -> R {
        self.src
    }
}

impl<R: Read> Read for ChunkedReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match ChunkedReader::read(self, buf) {
            Ok(n) => Ok(n),
            Err(CofferError::EndOfStream) => Ok(0),
            Err(err) => Err(std::io::Error::other(err)),
        }
    }
}
