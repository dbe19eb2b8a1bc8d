//! Print an archive's header and entry table

use super::map_archive;
use anyhow::{Context, Result};
use sar_format::{Archive, ArchiveOptions};
use std::io::Write;
use std::path::Path;
use tracing::warn;

/// Write a listing of `archive` to `out`
///
/// Layout problems found by [`Archive::validate`] are reported as warnings;
/// the table is printed regardless.
pub fn run(archive: &Path, options: &ArchiveOptions, out: &mut impl Write) -> Result<()> {
    let mmap = map_archive(archive)?;
    let reader = Archive::open_with(&mmap, options.clone())
        .with_context(|| format!("Failed to read archive {}", archive.display()))?;

    if let Err(e) = reader.validate() {
        warn!("{}: {}", archive.display(), e);
    }

    let header = reader.header();
    writeln!(out, "Archive:     {}", archive.display())?;
    writeln!(
        out,
        "Magic:       0x{:08X} (version {})",
        header.magic, header.version
    )?;
    if !header.id.is_empty() {
        writeln!(out, "Identity:    {}", header.id.name())?;
    }
    if !reader.description().is_empty() {
        writeln!(out, "Description: {}", reader.description_str())?;
    }
    writeln!(out, "Size:        {} bytes", header.archive_size)?;
    writeln!(out, "Entries:     {}", reader.len())?;
    writeln!(out)?;

    writeln!(
        out,
        "{:<16}  {:>12}  {:>12}  {:>12}  Name",
        "Hash", "Compressed", "Size", "Location"
    )?;
    for entry in reader.entries() {
        writeln!(
            out,
            "{:016x}  {:>12}  {:>12}  {:>12}  {}",
            entry.hash(),
            entry.compressed_size,
            entry.full_size,
            entry.location.get(),
            entry.id.name()
        )?;
    }
    Ok(())
}
