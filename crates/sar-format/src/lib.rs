//! Reader and builder for SAR content-addressed archives
//!
#![allow(clippy::cast_possible_truncation)] // Intentional for binary format parsing
#![allow(clippy::cast_lossless)] // Sometimes clearer than From
#![allow(clippy::uninlined_format_args)] // Backwards compatibility
#![allow(clippy::doc_markdown)] // Format terms don't need backticks
#![allow(clippy::module_name_repetitions)] // Clear naming is preferred
#![allow(clippy::missing_errors_doc)] // Error variants are documented on the enum
#![allow(clippy::return_self_not_must_use)] // Builder patterns
//! A SAR archive is a single immutable buffer: a 128-byte header, an optional
//! description, a table of 96-byte entries sorted by name hash, and the
//! DEFLATE-compressed payloads those entries point at. Lookups hash the name
//! and binary search the table in place, so no separate index is needed.
//!
//! # Components
//!
//! - [`hash`]: the 64-bit name hash that orders the table
//! - [`Header`], [`Entry`], [`Identity`]: the on-disk records
//! - [`Archive`]: zero-copy reader over a borrowed buffer
//! - [`ArchiveBuilder`]: staged builder that imports, appends and finalizes
//! - [`Codec`]: payload compression, [`Deflate`] by default
//!
//! # Lenient and strict
//!
//! By default both engines behave like the format's reference tooling: a
//! wrong magic, a newer version, an over-long name or a failed codec call is
//! logged with `tracing` and the operation carries on. Setting
//! [`ArchiveOptions::strict`] turns each of those into an [`ArchiveError`].
//! Reads that would fall outside the buffer are errors in both modes.
//!
//! # Example
//!
//! ```rust
//! use sar_format::{Archive, ArchiveBuilder};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut builder = ArchiveBuilder::new();
//! builder.set_description("demo");
//! builder.append("a.txt", b"hello")?;
//! let bytes = builder.finalize()?;
//!
//! let archive = Archive::open(&bytes)?;
//! assert_eq!(archive.description_str(), "demo");
//! assert_eq!(archive.read_entry_data("a.txt")?.as_deref(), Some(&b"hello"[..]));
//! assert!(archive.read_entry_data("missing")?.is_none());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod builder;
pub mod codec;
pub mod entry;
pub mod error;
pub mod hash;
pub mod header;
pub mod identity;
pub mod offset;
pub mod options;
pub mod reader;

pub use builder::{ArchiveBuilder, TABLE_ALIGNMENT};
pub use codec::{Codec, DEFAULT_LEVEL, Deflate, MAX_DECOMPRESSION_SIZE, Stored};
pub use entry::{ENTRY_SIZE, Entry, StagedEntry};
pub use error::{ArchiveError, ArchiveResult, CodecError};
pub use hash::{SarHasher, hash_buffer, hash_name};
pub use header::{HEADER_SIZE, Header, SAR_MAGIC, SAR_VERSION};
pub use identity::{IDENTITY_SIZE, Identity, NAME_LEN};
pub use offset::{ArchiveOffset, StagingOffset};
pub use options::ArchiveOptions;
pub use reader::Archive;
