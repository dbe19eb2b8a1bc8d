//! Zero-copy archive reader
//!
//! [`Archive`] borrows a complete archive buffer (a loaded file, a memory
//! map, or the output of [`ArchiveBuilder::finalize`](crate::ArchiveBuilder::finalize))
//! and decodes header fields and entries from it on demand. Lookups binary
//! search the entry table, which finalize leaves sorted by name hash.

use crate::codec::{Codec, Deflate, MAX_DECOMPRESSION_SIZE};
use crate::entry::{ENTRY_SIZE, Entry};
use crate::error::{ArchiveError, ArchiveResult};
use crate::hash::hash_name;
use crate::header::{HEADER_SIZE, Header, SAR_MAGIC, SAR_VERSION};
use crate::options::ArchiveOptions;
use binrw::BinRead;
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::io::Cursor;
use tracing::{debug, warn};

/// Read-only view of an archive buffer
pub struct Archive<'a, C = Deflate> {
    /// Whole archive, header first
    data: &'a [u8],
    /// Decoded copy of the header
    header: Header,
    /// Description text following the header
    description: &'a [u8],
    /// Raw entry table, `file_count * ENTRY_SIZE` bytes
    table: &'a [u8],
    codec: C,
    options: ArchiveOptions,
}

impl<'a> Archive<'a> {
    /// Open an archive with lenient options and the DEFLATE codec
    ///
    /// A wrong magic value or a newer version is logged and ignored. Only
    /// layouts that would require reading outside `data` are rejected.
    pub fn open(data: &'a [u8]) -> ArchiveResult<Self> {
        Self::open_with(data, ArchiveOptions::default())
    }

    /// Open an archive with the given options and their DEFLATE codec
    pub fn open_with(data: &'a [u8], options: ArchiveOptions) -> ArchiveResult<Self> {
        let codec = options.codec();
        Self::with_codec(data, codec, options)
    }
}

impl<'a, C: Codec> Archive<'a, C> {
    /// Open an archive that decodes payloads with `codec`
    pub fn with_codec(data: &'a [u8], codec: C, options: ArchiveOptions) -> ArchiveResult<Self> {
        let header = Header::parse(data)?;

        if !header.has_valid_magic() {
            if options.strict {
                return Err(ArchiveError::InvalidMagic {
                    expected: SAR_MAGIC,
                    actual: header.magic,
                });
            }
            warn!(
                "Archive has wrong magic: expected 0x{:08X}, got 0x{:08X}",
                SAR_MAGIC, header.magic
            );
        }

        if !header.is_supported_version() {
            if options.strict {
                return Err(ArchiveError::UnsupportedVersion(header.version));
            }
            warn!(
                "Archive version {} is newer than supported version {}",
                header.version, SAR_VERSION
            );
        }

        let description = match description_slice(data, &header) {
            Some(description) => description,
            None if options.strict => {
                return Err(ArchiveError::Truncated {
                    needed: (HEADER_SIZE as u64).saturating_add(header.description_length),
                    available: data.len() as u64,
                });
            }
            None => {
                warn!(
                    "Archive description of {} bytes runs past end of buffer, ignoring it",
                    header.description_length
                );
                &[]
            }
        };

        let table = table_slice(data, &header)?;

        let archive = Self {
            data,
            header,
            description,
            table,
            codec,
            options,
        };

        if archive.options.strict {
            archive.validate()?;
        }

        debug!(
            "Opened archive: {} entries, {} bytes",
            archive.len(),
            archive.data.len()
        );
        Ok(archive)
    }

    /// Decoded header
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Raw description bytes
    pub fn description(&self) -> &'a [u8] {
        self.description
    }

    /// Description as text, replacing invalid UTF-8
    pub fn description_str(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(self.description)
    }

    /// The whole archive buffer
    pub fn as_bytes(&self) -> &'a [u8] {
        self.data
    }

    /// Options this archive was opened with
    pub fn options(&self) -> &ArchiveOptions {
        &self.options
    }

    /// Number of entries, as recorded in the header
    pub fn len(&self) -> usize {
        self.table.len() / ENTRY_SIZE
    }

    /// Check if the archive has no entries
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Entry at a table position
    pub fn entry(&self, index: usize) -> Option<Entry> {
        let start = index.checked_mul(ENTRY_SIZE)?;
        let raw = self.table.get(start..start.checked_add(ENTRY_SIZE)?)?;
        Entry::read(&mut Cursor::new(raw)).ok()
    }

    /// All entries in table order
    pub fn entries(&self) -> impl Iterator<Item = Entry> + '_ {
        (0..self.len()).filter_map(move |index| self.entry(index))
    }

    /// Name hash of the entry at `index`, read without decoding the entry
    fn hash_at(&self, index: usize) -> u64 {
        let start = index * ENTRY_SIZE;
        let mut raw = [0u8; 8];
        raw.copy_from_slice(&self.table[start..start + 8]);
        u64::from_le_bytes(raw)
    }

    /// Binary search the table for `hash`
    ///
    /// Assumes the table is sorted ascending, which finalize guarantees and
    /// this method does not check. When several entries share a hash, which
    /// one is returned is unspecified.
    pub fn index_of(&self, hash: u64) -> Option<usize> {
        if self.is_empty() {
            return None;
        }

        let mut min = 0;
        let mut max = self.len() - 1;
        while min <= max {
            let mid = min + (max - min) / 2;
            match self.hash_at(mid).cmp(&hash) {
                Ordering::Equal => return Some(mid),
                Ordering::Less => min = mid + 1,
                Ordering::Greater => {
                    if mid == 0 {
                        break;
                    }
                    max = mid - 1;
                }
            }
        }
        None
    }

    /// Find an entry by name
    ///
    /// The full name is hashed. Entries appended under a name longer than
    /// [`NAME_LEN`](crate::NAME_LEN) bytes were stored under the hash of the
    /// truncated name, so they are only found by that truncated name.
    pub fn lookup(&self, name: impl AsRef<[u8]>) -> Option<Entry> {
        self.index_of(hash_name(name.as_ref()))
            .and_then(|index| self.entry(index))
    }

    /// Check if an entry with this name exists
    pub fn contains(&self, name: impl AsRef<[u8]>) -> bool {
        self.index_of(hash_name(name.as_ref())).is_some()
    }

    /// Compressed payload bytes of an entry
    pub fn compressed_data(&self, entry: &Entry) -> ArchiveResult<&'a [u8]> {
        let out_of_bounds = || ArchiveError::EntryOutOfBounds {
            name: entry.id.name().into_owned(),
            location: entry.location.get(),
            size: entry.compressed_size,
            archive_size: self.data.len() as u64,
        };

        let start = entry.location.to_usize().ok_or_else(out_of_bounds)?;
        let len = usize::try_from(entry.compressed_size).map_err(|_| out_of_bounds())?;
        let end = start.checked_add(len).ok_or_else(out_of_bounds)?;
        self.data.get(start..end).ok_or_else(out_of_bounds)
    }

    /// Decompress the entry called `name`
    ///
    /// Returns `Ok(None)` when no entry has that name.
    pub fn read_entry_data(&self, name: impl AsRef<[u8]>) -> ArchiveResult<Option<Vec<u8>>> {
        let name = name.as_ref();
        let Some(entry) = self.lookup(name) else {
            debug!("Entry '{}' not found", String::from_utf8_lossy(name));
            return Ok(None);
        };
        self.read_entry(&entry).map(Some)
    }

    /// Decompress an entry into a new buffer
    pub fn read_entry(&self, entry: &Entry) -> ArchiveResult<Vec<u8>> {
        let mut output = Vec::new();
        self.read_entry_into(entry, &mut output)?;
        Ok(output)
    }

    /// Decompress an entry into caller-owned scratch memory
    ///
    /// `output` is cleared first and ends up `full_size` bytes long. In
    /// lenient mode a size discrepancy is logged and the output is cut or
    /// zero padded to `full_size`; a decoder failure is logged and leaves a
    /// zero-filled buffer. In strict mode both are errors.
    pub fn read_entry_into(&self, entry: &Entry, output: &mut Vec<u8>) -> ArchiveResult<()> {
        let payload = self.compressed_data(entry)?;
        let full_size = usize::try_from(entry.full_size)
            .ok()
            .filter(|&size| size <= MAX_DECOMPRESSION_SIZE)
            .ok_or(ArchiveError::TooLarge("entry size"))?;

        output.clear();
        match self.codec.decompress(payload, full_size) {
            Ok(decoded) => {
                if decoded.len() != full_size {
                    if self.options.strict {
                        return Err(ArchiveError::SizeMismatch {
                            name: entry.id.name().into_owned(),
                            expected: entry.full_size,
                            actual: decoded.len() as u64,
                        });
                    }
                    warn!(
                        "'{}' uncompressed size discrepancy: got {}, expected {}",
                        entry.id.name(),
                        decoded.len(),
                        full_size
                    );
                }
                output.extend_from_slice(&decoded);
            }
            Err(e) => {
                if self.options.strict {
                    return Err(e.into());
                }
                warn!("Failed to decompress '{}': {}", entry.id.name(), e);
            }
        }
        output.resize(full_size, 0);
        Ok(())
    }

    /// Check magic, version, table order and that every payload is in bounds
    pub fn validate(&self) -> ArchiveResult<()> {
        self.header.validate()?;

        let mut previous: Option<u64> = None;
        for (index, entry) in self.entries().enumerate() {
            if let Some(previous) = previous
                && entry.hash() < previous
            {
                return Err(ArchiveError::UnsortedEntries { index });
            }
            previous = Some(entry.hash());
            self.compressed_data(&entry)?;
        }
        Ok(())
    }
}

impl<C> fmt::Debug for Archive<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Archive")
            .field("header", &self.header)
            .field("size", &self.data.len())
            .field("entries", &(self.table.len() / ENTRY_SIZE))
            .finish_non_exhaustive()
    }
}

fn description_slice<'a>(data: &'a [u8], header: &Header) -> Option<&'a [u8]> {
    let len = usize::try_from(header.description_length).ok()?;
    data.get(HEADER_SIZE..HEADER_SIZE.checked_add(len)?)
}

fn table_slice<'a>(data: &'a [u8], header: &Header) -> ArchiveResult<&'a [u8]> {
    let truncated = || ArchiveError::Truncated {
        needed: header
            .file_count
            .saturating_mul(ENTRY_SIZE as u64)
            .saturating_add(header.file_table_location.get()),
        available: data.len() as u64,
    };

    let start = header.file_table_location.to_usize().ok_or_else(truncated)?;
    let count = usize::try_from(header.file_count).map_err(|_| truncated())?;
    let len = count.checked_mul(ENTRY_SIZE).ok_or_else(truncated)?;
    let end = start.checked_add(len).ok_or_else(truncated)?;
    data.get(start..end).ok_or_else(truncated)
}
