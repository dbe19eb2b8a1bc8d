//! Error types for archive operations

use thiserror::Error;

/// Archive operation result type
pub type ArchiveResult<T> = Result<T, ArchiveError>;

/// Errors raised while reading or building archives
///
/// Most format problems are advisory in the default (lenient) mode and only
/// become errors when [`ArchiveOptions::strict`](crate::ArchiveOptions) is
/// set. Errors that remain in lenient mode are the ones a safe reader cannot
/// recover from, such as a table that points past the end of the buffer.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Buffer is too short to hold the structure being read
    #[error("truncated archive: need {needed} bytes, have {available}")]
    Truncated {
        /// Number of bytes required
        needed: u64,
        /// Number of bytes available
        available: u64,
    },

    /// Magic value did not match `wSar`
    #[error("invalid archive magic: expected 0x{expected:08X}, got 0x{actual:08X}")]
    InvalidMagic {
        /// Expected magic value
        expected: u32,
        /// Magic value found in the header
        actual: u32,
    },

    /// Archive was written by a newer format revision
    #[error("unsupported archive version: {0} (maximum supported is {max})", max = crate::header::SAR_VERSION)]
    UnsupportedVersion(u32),

    /// Entry table is not sorted by hash
    #[error("entry table not sorted: hash at index {index} is lower than its predecessor")]
    UnsortedEntries {
        /// Index of the first out-of-order entry
        index: usize,
    },

    /// Entry payload lies outside the archive buffer
    #[error("entry '{name}' out of bounds: {location} + {size} exceeds {archive_size}")]
    EntryOutOfBounds {
        /// Entry name
        name: String,
        /// Header-relative location of the payload
        location: u64,
        /// Compressed size of the payload
        size: u64,
        /// Size of the archive buffer
        archive_size: u64,
    },

    /// Name does not fit the 55-byte identity buffer
    #[error("name is {len} bytes, longer than the {max} byte limit")]
    NameTooLong {
        /// Length of the rejected name
        len: usize,
        /// Maximum stored name length
        max: usize,
    },

    /// Decompressed payload length differs from the recorded size
    #[error("size mismatch for '{name}': expected {expected} bytes, got {actual}")]
    SizeMismatch {
        /// Entry name
        name: String,
        /// Size recorded in the entry
        expected: u64,
        /// Size produced by the decoder
        actual: u64,
    },

    /// Value does not fit in the platform's address space
    #[error("{0} does not fit in memory on this platform")]
    TooLarge(&'static str),

    /// Compression or decompression failed
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// Binary read/write error
    #[error("binary format error: {0}")]
    BinRw(#[from] binrw::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ArchiveError {
    /// Check if this error describes a malformed archive rather than a
    /// rejected input or a codec problem
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Self::Truncated { .. }
                | Self::InvalidMagic { .. }
                | Self::UnsupportedVersion(_)
                | Self::UnsortedEntries { .. }
                | Self::EntryOutOfBounds { .. }
        )
    }
}

/// Errors produced by a [`Codec`](crate::Codec)
#[derive(Debug, Error)]
pub enum CodecError {
    /// Compressor failed
    #[error("compression failed: {0}")]
    Compression(String),

    /// Decompressor failed
    #[error("decompression failed: {0}")]
    Decompression(String),

    /// Output would exceed the decompression limit
    #[error("decompressed size exceeds limit of {limit} bytes")]
    LimitExceeded {
        /// Configured limit in bytes
        limit: usize,
    },
}
