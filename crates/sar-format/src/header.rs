//! Archive header (128 bytes, little-endian)

use crate::error::{ArchiveError, ArchiveResult};
use crate::identity::Identity;
use crate::offset::ArchiveOffset;
use binrw::{BinRead, BinWrite};
use std::io::Cursor;

/// Magic value `wSar` read as a little-endian u32
pub const SAR_MAGIC: u32 = 0x7753_6172;

/// Format revision written by this crate, and the highest one it reads
pub const SAR_VERSION: u32 = 101;

/// Size of an encoded header in bytes
pub const HEADER_SIZE: usize = 128;

/// Archive header
///
/// The optional description text immediately follows the header; the entry
/// table starts at `file_table_location`.
#[derive(Debug, Clone, PartialEq, Eq, Default, BinRead, BinWrite)]
#[brw(little)]
pub struct Header {
    /// Magic value, [`SAR_MAGIC`] for well-formed archives
    pub magic: u32,

    /// Format revision
    pub version: u32,

    /// Reserved, written as zero
    pub reserved: [u8; 24],

    /// Archive self-identification, unused by readers
    pub id: Identity,

    /// Total archive size in bytes
    pub archive_size: u64,

    /// Number of entries in the table
    pub file_count: u64,

    /// Start of the entry table
    #[br(map = |raw: u64| ArchiveOffset::new(raw))]
    #[bw(map = |offset: &ArchiveOffset| offset.get())]
    pub file_table_location: ArchiveOffset,

    /// Length of the description following the header
    pub description_length: u64,
}

impl Header {
    /// Parse a header from the start of `data`
    pub fn parse(data: &[u8]) -> ArchiveResult<Self> {
        if data.len() < HEADER_SIZE {
            return Err(ArchiveError::Truncated {
                needed: HEADER_SIZE as u64,
                available: data.len() as u64,
            });
        }
        Ok(Self::read(&mut Cursor::new(&data[..HEADER_SIZE]))?)
    }

    /// Encode the header into its 128-byte form
    pub fn to_bytes(&self) -> ArchiveResult<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::with_capacity(HEADER_SIZE));
        self.write(&mut cursor)?;
        Ok(cursor.into_inner())
    }

    /// Write this crate's magic and version over whatever is present
    pub fn stamp(&mut self) {
        self.magic = SAR_MAGIC;
        self.version = SAR_VERSION;
    }

    /// Check the magic value
    pub const fn has_valid_magic(&self) -> bool {
        self.magic == SAR_MAGIC
    }

    /// Check that the version is not newer than this reader understands
    pub const fn is_supported_version(&self) -> bool {
        self.version <= SAR_VERSION
    }

    /// Strict check of magic and version
    pub fn validate(&self) -> ArchiveResult<()> {
        if !self.has_valid_magic() {
            return Err(ArchiveError::InvalidMagic {
                expected: SAR_MAGIC,
                actual: self.magic,
            });
        }
        if !self.is_supported_version() {
            return Err(ArchiveError::UnsupportedVersion(self.version));
        }
        Ok(())
    }
}
