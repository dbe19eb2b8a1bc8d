//! Typed byte offsets
//!
//! An entry's location is measured from two different bases during its
//! life. While staged in an [`ArchiveBuilder`](crate::ArchiveBuilder) it is
//! relative to the start of the builder's data blob; once finalized it is
//! relative to the start of the archive header. Keeping the two apart as
//! distinct types makes the single relocation step in finalize explicit.

use std::fmt;

/// Byte offset from the start of an archive's header
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ArchiveOffset(u64);

impl ArchiveOffset {
    /// Offset zero, the first byte of the header
    pub const ZERO: Self = Self(0);

    /// Wrap a raw header-relative offset
    pub const fn new(offset: u64) -> Self {
        Self(offset)
    }

    /// Raw offset value as stored on disk
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Offset as an index into an in-memory buffer, if it fits
    pub fn to_usize(self) -> Option<usize> {
        usize::try_from(self.0).ok()
    }
}

impl fmt::Display for ArchiveOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Byte offset from the start of a builder's data staging blob
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct StagingOffset(u64);

impl StagingOffset {
    /// Wrap a raw staging offset
    pub const fn new(offset: u64) -> Self {
        Self(offset)
    }

    /// Raw offset value
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Convert to a header-relative offset, given where the staging blob
    /// starts in the finalized archive
    pub const fn relocate(self, data_start: ArchiveOffset) -> ArchiveOffset {
        ArchiveOffset(data_start.0 + self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relocate_adds_data_start() {
        let staged = StagingOffset::new(40);
        assert_eq!(staged.relocate(ArchiveOffset::new(1000)), ArchiveOffset::new(1040));
        assert_eq!(StagingOffset::default().relocate(ArchiveOffset::ZERO), ArchiveOffset::ZERO);
    }

    #[test]
    fn test_display_is_hex() {
        assert_eq!(ArchiveOffset::new(255).to_string(), "0xff");
    }
}
