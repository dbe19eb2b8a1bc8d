//! Payload compression
//!
//! Archives store each payload as a raw DEFLATE stream (no zlib header or
//! checksum). The [`Codec`] trait lets readers and builders swap in another
//! implementation, most usefully [`Stored`] in tests.

use crate::error::CodecError;
use flate2::Compression;
use flate2::read::{DeflateDecoder, DeflateEncoder};
use std::io::Read;

/// Maximum allowed decompression size (1 GB)
///
/// Limits decompression output so a corrupt size field cannot trigger an
/// unbounded allocation.
pub const MAX_DECOMPRESSION_SIZE: usize = 1024 * 1024 * 1024;

/// Default DEFLATE level
pub const DEFAULT_LEVEL: u32 = 6;

/// Compression strategy used for entry payloads
pub trait Codec {
    /// Compress a whole payload
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CodecError>;

    /// Decompress a whole payload
    ///
    /// `expected_size` is the size recorded in the entry. Implementations use
    /// it as a capacity hint and must not fail just because the output length
    /// differs; callers compare lengths themselves.
    fn decompress(&self, data: &[u8], expected_size: usize) -> Result<Vec<u8>, CodecError>;
}

impl<C: Codec + ?Sized> Codec for &C {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        (**self).compress(data)
    }

    fn decompress(&self, data: &[u8], expected_size: usize) -> Result<Vec<u8>, CodecError> {
        (**self).decompress(data, expected_size)
    }
}

/// Raw DEFLATE codec
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deflate {
    level: u32,
}

impl Deflate {
    /// Create a codec with the given level (0-9, clamped)
    pub const fn new(level: u32) -> Self {
        let level = if level > 9 { 9 } else { level };
        Self { level }
    }

    /// Compression level in use
    pub const fn level(&self) -> u32 {
        self.level
    }
}

impl Default for Deflate {
    fn default() -> Self {
        Self::new(DEFAULT_LEVEL)
    }
}

impl Codec for Deflate {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        let mut encoder = DeflateEncoder::new(data, Compression::new(self.level));
        let mut compressed = Vec::new();
        encoder
            .read_to_end(&mut compressed)
            .map_err(|e| CodecError::Compression(format!("DEFLATE compression failed: {e}")))?;
        Ok(compressed)
    }

    fn decompress(&self, data: &[u8], expected_size: usize) -> Result<Vec<u8>, CodecError> {
        let mut decoder = DeflateDecoder::new(data);
        let mut decompressed = Vec::with_capacity(expected_size.min(MAX_DECOMPRESSION_SIZE));

        // Read in chunks to enforce size limit
        let mut buffer = [0u8; 8192];
        loop {
            let bytes_read = decoder.read(&mut buffer).map_err(|e| {
                CodecError::Decompression(format!("DEFLATE decompression failed: {e}"))
            })?;

            if bytes_read == 0 {
                break;
            }

            if decompressed.len() + bytes_read > MAX_DECOMPRESSION_SIZE {
                return Err(CodecError::LimitExceeded {
                    limit: MAX_DECOMPRESSION_SIZE,
                });
            }

            decompressed.extend_from_slice(&buffer[..bytes_read]);
        }

        Ok(decompressed)
    }
}

/// Store-only codec: payloads are kept as-is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stored;

impl Codec for Stored {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        Ok(data.to_vec())
    }

    fn decompress(&self, data: &[u8], _expected_size: usize) -> Result<Vec<u8>, CodecError> {
        Ok(data.to_vec())
    }
}
