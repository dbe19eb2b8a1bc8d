//! Staged archive builder
//!
//! An [`ArchiveBuilder`] holds three growable regions until finalize: the
//! header fields (plus description), the entry table, and a blob of
//! compressed payloads. Staged entries locate their payload with a
//! [`StagingOffset`] into that blob. [`ArchiveBuilder::finalize`] sorts the
//! table, lays the regions out back to back and relocates every entry so its
//! location is measured from the start of the header:
//!
//! ```text
//! [Header 128][description][pad to 8][Entry 96 × n][compressed payloads]
//! ^ offset 0                          ^ file_table_location
//! ```
//!
//! # Example
//!
//! ```rust
//! use sar_format::{Archive, ArchiveBuilder};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut builder = ArchiveBuilder::new();
//! builder.append("a.txt", b"hello")?;
//! builder.append("b.bin", &[0, 1, 2, 3])?;
//! let bytes = builder.finalize()?;
//!
//! let archive = Archive::open(&bytes)?;
//! assert_eq!(archive.lookup("a.txt").map(|e| e.full_size), Some(5));
//! assert_eq!(archive.read_entry_data("b.bin")?, Some(vec![0, 1, 2, 3]));
//! # Ok(())
//! # }
//! ```

use crate::codec::{Codec, Deflate};
use crate::entry::{ENTRY_SIZE, StagedEntry};
use crate::error::ArchiveResult;
use crate::header::{HEADER_SIZE, Header};
use crate::identity::{Identity, NAME_LEN};
use crate::offset::{ArchiveOffset, StagingOffset};
use crate::options::ArchiveOptions;
use crate::reader::Archive;
use binrw::BinWrite;
use std::io::{Cursor, Write};
use tracing::{debug, trace, warn};

/// Alignment of the entry table within a finalized archive
pub const TABLE_ALIGNMENT: usize = 8;

/// Builder for new archives, optionally seeded from an existing one
pub struct ArchiveBuilder<C = Deflate> {
    /// Header fields carried into the finalized archive
    header: Header,
    /// Description text written after the header
    description: Vec<u8>,
    /// Entry table, in append order until finalize
    entries: Vec<StagedEntry>,
    /// Compressed payloads, addressed by `StagingOffset`
    data: Vec<u8>,
    codec: C,
    options: ArchiveOptions,
}

impl ArchiveBuilder {
    /// Create an empty builder with lenient options and the DEFLATE codec
    pub fn new() -> Self {
        Self::with_options(ArchiveOptions::default())
    }

    /// Create an empty builder using the DEFLATE codec the options describe
    pub fn with_options(options: ArchiveOptions) -> Self {
        let codec = options.codec();
        Self::with_codec(codec, options)
    }

    /// Create a builder holding a copy of every entry in `existing`
    pub fn from_archive<D: Codec>(existing: &Archive<'_, D>) -> ArchiveResult<Self> {
        let options = existing.options().clone();
        let codec = options.codec();
        Self::from_archive_with(existing, codec, options)
    }
}

impl Default for ArchiveBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Codec> ArchiveBuilder<C> {
    /// Create an empty builder that compresses payloads with `codec`
    pub fn with_codec(codec: C, options: ArchiveOptions) -> Self {
        Self {
            header: Header::default(),
            description: Vec::new(),
            entries: Vec::new(),
            data: Vec::new(),
            codec,
            options,
        }
    }

    /// Create a builder seeded from an existing archive
    ///
    /// Header fields and the description are copied, with this crate's magic
    /// and version stamped over the source's. Every entry is copied along
    /// with its compressed bytes, which are not recompressed, and its
    /// location is rebased onto the new data blob.
    pub fn from_archive_with<D: Codec>(
        existing: &Archive<'_, D>,
        codec: C,
        options: ArchiveOptions,
    ) -> ArchiveResult<Self> {
        let mut builder = Self::with_codec(codec, options);

        builder.header = existing.header().clone();
        builder.header.stamp();
        builder.description = existing.description().to_vec();
        builder.header.description_length = builder.description.len() as u64;

        builder.entries.reserve(existing.len());
        for entry in existing.entries() {
            let payload = existing.compressed_data(&entry)?;
            let location = StagingOffset::new(builder.data.len() as u64);
            builder.data.extend_from_slice(payload);
            builder
                .entries
                .push(StagedEntry::from_entry(&entry, location));
        }
        builder.header.file_count = builder.entries.len() as u64;

        debug!(
            "Imported {} entries ({} compressed bytes) from existing archive",
            builder.entries.len(),
            builder.data.len()
        );
        Ok(builder)
    }

    /// Set the description written after the header
    pub fn set_description(&mut self, description: impl Into<Vec<u8>>) -> &mut Self {
        self.description = description.into();
        self.header.description_length = self.description.len() as u64;
        self
    }

    /// Set the archive's own identity in the header
    pub fn set_identity(&mut self, name: impl AsRef<[u8]>) -> &mut Self {
        self.header.id = Identity::new(name);
        self
    }

    /// Compress `data` and stage it as a new entry called `name`
    ///
    /// Names longer than [`NAME_LEN`] bytes are truncated and hashed in their
    /// truncated form. If compression fails the entry is still staged, with
    /// an empty payload. In strict mode both conditions are errors instead
    /// and nothing is staged.
    pub fn append(&mut self, name: impl AsRef<[u8]>, data: &[u8]) -> ArchiveResult<()> {
        let name = name.as_ref();
        let id = if self.options.strict {
            Identity::try_new(name)?
        } else {
            if name.len() > NAME_LEN {
                debug!(
                    "Truncating name '{}' to {} bytes",
                    String::from_utf8_lossy(name),
                    NAME_LEN
                );
            }
            Identity::new(name)
        };

        let mut entry = StagedEntry::new(id, data.len() as u64);
        match self.codec.compress(data) {
            Ok(compressed) => {
                entry.compressed_size = compressed.len() as u64;
                entry.location = StagingOffset::new(self.data.len() as u64);
                self.data.extend_from_slice(&compressed);
            }
            Err(e) => {
                if self.options.strict {
                    return Err(e.into());
                }
                warn!(
                    "Failed to compress '{}', storing an empty payload: {}",
                    id.name(),
                    e
                );
            }
        }

        trace!(
            "Staged '{}': {} -> {} bytes",
            id.name(),
            entry.full_size,
            entry.compressed_size
        );
        self.entries.push(entry);
        self.header.file_count += 1;
        Ok(())
    }

    /// Header fields as they stand
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Description as it stands
    pub fn description(&self) -> &[u8] {
        &self.description
    }

    /// Staged entries, in append order
    pub fn entries(&self) -> &[StagedEntry] {
        &self.entries
    }

    /// Number of staged entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing has been staged
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total size of staged compressed payloads
    pub fn staged_data_len(&self) -> usize {
        self.data.len()
    }

    /// Sort, lay out and relocate everything into one archive buffer
    ///
    /// Consumes the builder; the result is a valid input to
    /// [`Archive::open`].
    pub fn finalize(self) -> ArchiveResult<Vec<u8>> {
        let Self {
            mut header,
            description,
            mut entries,
            data,
            ..
        } = self;

        sort_by_hash(&mut entries);

        let description_end = HEADER_SIZE + description.len();
        let table_location = description_end.next_multiple_of(TABLE_ALIGNMENT);
        let data_start = table_location + entries.len() * ENTRY_SIZE;
        let archive_size = data_start + data.len();

        header.stamp();
        header.description_length = description.len() as u64;
        header.file_table_location = ArchiveOffset::new(table_location as u64);
        header.archive_size = archive_size as u64;
        debug_assert_eq!(header.file_count, entries.len() as u64);

        let mut cursor = Cursor::new(Vec::with_capacity(archive_size));
        header.write(&mut cursor)?;
        cursor.write_all(&description)?;
        cursor.write_all(&[0u8; TABLE_ALIGNMENT][..table_location - description_end])?;

        let data_start = ArchiveOffset::new(data_start as u64);
        for staged in &entries {
            staged.relocate(data_start).write(&mut cursor)?;
        }
        cursor.write_all(&data)?;

        let bytes = cursor.into_inner();
        debug!(
            "Finalized archive: {} entries, {} bytes (table at {}, data at {})",
            entries.len(),
            bytes.len(),
            header.file_table_location,
            data_start
        );
        Ok(bytes)
    }
}

/// Stable insertion sort by name hash
///
/// Entries with equal hashes keep their append order.
fn sort_by_hash(entries: &mut [StagedEntry]) {
    for i in 1..entries.len() {
        let current = entries[i];
        let mut j = i;
        while j > 0 && entries[j - 1].hash() > current.hash() {
            entries[j] = entries[j - 1];
            j -= 1;
        }
        entries[j] = current;
    }
}
