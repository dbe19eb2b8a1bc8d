//! Create an archive, or extend an existing one, from files on disk

use super::map_archive;
use anyhow::{Context, Result};
use sar_format::{Archive, ArchiveBuilder, ArchiveOptions};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

/// Outcome of a create or add
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CreateReport {
    /// Files appended by this run
    pub added: usize,
    /// Inputs that could not be read
    pub skipped: usize,
    /// Entries in the written archive, imported ones included
    pub total: usize,
}

/// Build `archive` from `inputs`, importing its current contents if it exists
///
/// Directories are walked recursively, skipping directories whose name starts
/// with a dot. Every file is stored under its file name alone. Unreadable
/// inputs are logged and skipped; failing to import the existing archive or
/// to write the result is an error.
pub fn run(
    archive: &Path,
    inputs: &[impl AsRef<Path>],
    description: Option<&str>,
    options: &ArchiveOptions,
) -> Result<CreateReport> {
    let mut builder = if archive.exists() {
        let mmap = map_archive(archive)?;
        let existing = Archive::open_with(&mmap, options.clone())
            .with_context(|| format!("Failed to read archive {}", archive.display()))?;
        info!(
            "Adding to existing archive {} ({} entries)",
            archive.display(),
            existing.len()
        );
        ArchiveBuilder::from_archive_with(&existing, options.codec(), options.clone())
            .with_context(|| format!("Failed to import archive {}", archive.display()))?
    } else {
        ArchiveBuilder::with_options(options.clone())
    };

    if let Some(description) = description {
        builder.set_description(description);
    }

    let mut report = CreateReport::default();
    for input in inputs {
        add_path(&mut builder, input.as_ref(), &mut report)?;
    }

    report.total = builder.len();
    let bytes = builder.finalize()?;
    fs::write(archive, &bytes)
        .with_context(|| format!("Failed to write archive {}", archive.display()))?;
    Ok(report)
}

fn add_path(builder: &mut ArchiveBuilder, path: &Path, report: &mut CreateReport) -> Result<()> {
    if !path.is_dir() {
        return add_file(builder, path, report);
    }

    let walker = WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden_dir(entry));
    for entry in walker {
        match entry {
            Ok(entry) if entry.file_type().is_file() => {
                add_file(builder, entry.path(), report)?;
            }
            Ok(_) => {}
            Err(e) => {
                warn!("Skipping unreadable path under {}: {}", path.display(), e);
                report.skipped += 1;
            }
        }
    }
    Ok(())
}

fn add_file(builder: &mut ArchiveBuilder, path: &Path, report: &mut CreateReport) -> Result<()> {
    let Some(name) = path.file_name() else {
        warn!("Skipping {}: no file name", path.display());
        report.skipped += 1;
        return Ok(());
    };

    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) => {
            warn!("Skipping {}: {}", path.display(), e);
            report.skipped += 1;
            return Ok(());
        }
    };

    builder
        .append(name.as_encoded_bytes(), &data)
        .with_context(|| format!("Failed to add {}", path.display()))?;
    debug!("Added {} ({} bytes)", path.display(), data.len());
    report.added += 1;
    Ok(())
}

fn is_hidden_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir() && entry.file_name().as_encoded_bytes().starts_with(b".")
}
