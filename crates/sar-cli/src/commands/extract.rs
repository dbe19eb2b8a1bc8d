//! Extract every entry of an archive into a directory

use super::map_archive;
use anyhow::{Context, Result};
use sar_format::{Archive, ArchiveOptions, Entry};
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, error, warn};

/// Outcome of an extraction
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExtractReport {
    /// Entries written to disk
    pub written: usize,
    /// Entries that could not be decoded or written
    pub skipped: usize,
}

/// Extract all entries of `archive` into `dir`
///
/// Failing to open or parse the archive is an error. Failures on individual
/// entries are logged and counted in [`ExtractReport::skipped`].
pub fn run(archive: &Path, dir: &Path, options: &ArchiveOptions) -> Result<ExtractReport> {
    let mmap = map_archive(archive)?;
    let reader = Archive::open_with(&mmap, options.clone())
        .with_context(|| format!("Failed to read archive {}", archive.display()))?;

    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory {}", dir.display()))?;

    let mut report = ExtractReport::default();
    let mut scratch = Vec::new();
    for entry in reader.entries() {
        let name = entry.id.name();
        let Some(target) = target_path(dir, &name) else {
            warn!("Skipping '{}': not a relative path", name);
            report.skipped += 1;
            continue;
        };

        if let Err(e) = extract_entry(&reader, &entry, &target, &mut scratch) {
            error!("Failed to extract '{}': {:#}", name, e);
            report.skipped += 1;
            continue;
        }
        debug!("Extracted '{}' ({} bytes)", name, scratch.len());
        report.written += 1;
    }
    Ok(report)
}

fn extract_entry(
    reader: &Archive<'_>,
    entry: &Entry,
    target: &Path,
    scratch: &mut Vec<u8>,
) -> Result<()> {
    reader.read_entry_into(entry, scratch)?;
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(target, scratch.as_slice())
        .with_context(|| format!("Failed to write {}", target.display()))?;
    Ok(())
}

/// Join an entry name onto `dir`, refusing names that would escape it
fn target_path(dir: &Path, name: &str) -> Option<PathBuf> {
    let relative = Path::new(name);
    let is_plain = relative
        .components()
        .all(|component| matches!(component, Component::Normal(_) | Component::CurDir));
    (is_plain && !name.is_empty()).then(|| dir.join(relative))
}
