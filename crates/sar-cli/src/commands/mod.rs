pub mod create;
pub mod extract;
pub mod list;

use crate::{ArchiveCommand, CliConfig};
use anyhow::{Context, Result};
use memmap2::{Mmap, MmapOptions};
use std::fs::File;
use std::path::Path;
use tracing::info;

/// Run one command against `archive`
pub fn handle(archive: &Path, cmd: ArchiveCommand, config: &CliConfig) -> Result<()> {
    match cmd {
        ArchiveCommand::Extract { dir } => {
            let report = extract::run(archive, &dir, &config.archive)?;
            info!(
                "Extracted {} entries to {} ({} skipped)",
                report.written,
                dir.display(),
                report.skipped
            );
        }
        ArchiveCommand::Create { files, description } => {
            let description = description.or_else(|| config.description.clone());
            let report = create::run(
                archive,
                files.as_slice(),
                description.as_deref(),
                &config.archive,
            )?;
            info!(
                "Wrote {} with {} entries ({} added, {} skipped)",
                archive.display(),
                report.total,
                report.added,
                report.skipped
            );
        }
        ArchiveCommand::List => {
            let stdout = std::io::stdout();
            list::run(archive, &config.archive, &mut stdout.lock())?;
        }
    }
    Ok(())
}

/// Map an archive file read-only
pub(crate) fn map_archive(path: &Path) -> Result<Mmap> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open archive {}", path.display()))?;

    #[allow(unsafe_code)]
    let mmap = unsafe {
        MmapOptions::new()
            .map(&file)
            .with_context(|| format!("Failed to mmap archive {}", path.display()))?
    };
    Ok(mmap)
}
