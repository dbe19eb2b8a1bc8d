//! Reader and builder options

use crate::codec::{DEFAULT_LEVEL, Deflate};
use serde::{Deserialize, Serialize};

/// Options shared by [`Archive`](crate::Archive) and
/// [`ArchiveBuilder`](crate::ArchiveBuilder)
///
/// The default is lenient: format mismatches, name truncation and codec
/// failures are logged and otherwise ignored. `strict` turns each of them
/// into an [`ArchiveError`](crate::ArchiveError).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveOptions {
    /// Fail instead of warning
    pub strict: bool,

    /// DEFLATE level (0-9) used by [`ArchiveOptions::codec`]
    pub compression_level: u32,
}

impl Default for ArchiveOptions {
    fn default() -> Self {
        Self {
            strict: false,
            compression_level: DEFAULT_LEVEL,
        }
    }
}

impl ArchiveOptions {
    /// Lenient options with the default compression level
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable strict mode
    #[must_use]
    pub const fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Set the DEFLATE level
    #[must_use]
    pub const fn with_compression_level(mut self, level: u32) -> Self {
        self.compression_level = level;
        self
    }

    /// DEFLATE codec configured with these options
    pub const fn codec(&self) -> Deflate {
        Deflate::new(self.compression_level)
    }
}
