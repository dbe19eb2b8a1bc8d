//! Entry table records

use crate::identity::Identity;
use crate::offset::{ArchiveOffset, StagingOffset};
use binrw::{BinRead, BinWrite};

/// Size of an encoded entry in bytes
pub const ENTRY_SIZE: usize = 96;

/// One stored item in a finalized archive (96 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, BinRead, BinWrite)]
#[brw(little)]
pub struct Entry {
    /// Hash and name
    pub id: Identity,

    /// Reserved kind tag, written as zero
    pub kind: u32,

    /// Reserved per-entry format tag, written as zero
    pub version: u32,

    /// Payload size as stored
    pub compressed_size: u64,

    /// Payload size after decompression
    pub full_size: u64,

    /// Payload start, relative to the archive header
    #[br(map = |raw: u64| ArchiveOffset::new(raw))]
    #[bw(map = |offset: &ArchiveOffset| offset.get())]
    pub location: ArchiveOffset,
}

impl Entry {
    /// Name hash
    pub const fn hash(&self) -> u64 {
        self.id.hash
    }

    /// Offset one past the last payload byte, or `None` on overflow
    pub const fn end(&self) -> Option<u64> {
        self.location.get().checked_add(self.compressed_size)
    }
}

/// An entry held by a builder before finalize
///
/// Identical to [`Entry`] except that `location` is relative to the start of
/// the builder's data blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StagedEntry {
    /// Hash and name
    pub id: Identity,

    /// Reserved kind tag
    pub kind: u32,

    /// Reserved per-entry format tag
    pub version: u32,

    /// Payload size as stored
    pub compressed_size: u64,

    /// Payload size after decompression
    pub full_size: u64,

    /// Payload start within the data blob
    pub location: StagingOffset,
}

impl StagedEntry {
    /// Stage an entry with no payload yet
    pub(crate) const fn new(id: Identity, full_size: u64) -> Self {
        Self {
            id,
            kind: 0,
            version: 0,
            compressed_size: 0,
            full_size,
            location: StagingOffset::new(0),
        }
    }

    /// Stage a copy of an existing entry whose payload now lives at `location`
    pub(crate) const fn from_entry(entry: &Entry, location: StagingOffset) -> Self {
        Self {
            id: entry.id,
            kind: entry.kind,
            version: entry.version,
            compressed_size: entry.compressed_size,
            full_size: entry.full_size,
            location,
        }
    }

    /// Name hash
    pub const fn hash(&self) -> u64 {
        self.id.hash
    }

    /// Produce the final entry given where the data blob starts in the archive
    pub const fn relocate(&self, data_start: ArchiveOffset) -> Entry {
        Entry {
            id: self.id,
            kind: self.kind,
            version: self.version,
            compressed_size: self.compressed_size,
            full_size: self.full_size,
            location: self.location.relocate(data_start),
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use binrw::{BinReaderExt, BinWriterExt};
    use std::io::Cursor;

    #[test]
    fn test_encoded_layout() {
        let entry = Entry {
            id: Identity::new("b.bin"),
            kind: 0,
            version: 0,
            compressed_size: 9,
            full_size: 4,
            location: ArchiveOffset::new(0x1234),
        };

        let mut cursor = Cursor::new(Vec::new());
        cursor.write_le(&entry).unwrap();
        let bytes = cursor.into_inner();

        assert_eq!(bytes.len(), ENTRY_SIZE);
        assert_eq!(&bytes[72..80], &9u64.to_le_bytes());
        assert_eq!(&bytes[80..88], &4u64.to_le_bytes());
        assert_eq!(&bytes[88..96], &0x1234u64.to_le_bytes());

        let parsed: Entry = Cursor::new(&bytes).read_le().unwrap();
        assert_eq!(parsed, entry);
    }

    #[test]
    fn test_relocate_keeps_metadata() {
        let mut staged = StagedEntry::new(Identity::new("a.txt"), 5);
        staged.compressed_size = 7;
        staged.location = StagingOffset::new(20);

        let entry = staged.relocate(ArchiveOffset::new(300));
        assert_eq!(entry.id, staged.id);
        assert_eq!(entry.full_size, 5);
        assert_eq!(entry.compressed_size, 7);
        assert_eq!(entry.location, ArchiveOffset::new(320));
        assert_eq!(entry.end(), Some(327));
    }

    #[test]
    fn test_end_overflow() {
        let entry = Entry {
            compressed_size: 2,
            location: ArchiveOffset::new(u64::MAX),
            ..Entry::default()
        };
        assert_eq!(entry.end(), None);
    }
}
