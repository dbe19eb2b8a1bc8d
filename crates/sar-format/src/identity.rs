//! Entry and archive identity: a name hash plus a fixed-size name buffer

use crate::error::{ArchiveError, ArchiveResult};
use crate::hash::hash_name;
use binrw::{BinRead, BinWrite};
use std::borrow::Cow;
use std::fmt;

/// Maximum number of name bytes stored in an identity
pub const NAME_LEN: usize = 55;

/// Size of an encoded identity in bytes (hash + name + terminator)
pub const IDENTITY_SIZE: usize = 8 + NAME_LEN + 1;

/// Hash and zero-padded name addressing an entry (64 bytes)
///
/// `hash` is always the hash of the stored (possibly truncated) name. It is
/// trusted as written; readers never recompute it.
#[derive(Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct Identity {
    /// Hash of `name` up to its first zero byte
    pub hash: u64,

    /// Name bytes, zero padded
    pub name: [u8; NAME_LEN],

    /// Always written as zero so the name is terminated even at full length
    #[bw(map = |_: &u8| 0u8)]
    terminator: u8,
}

impl Identity {
    /// Build an identity, truncating names longer than [`NAME_LEN`] bytes
    ///
    /// The hash is computed from the truncated name, so two names sharing
    /// their first 55 bytes collide.
    pub fn new(name: impl AsRef<[u8]>) -> Self {
        let name = name.as_ref();
        let len = name.len().min(NAME_LEN);

        let mut buffer = [0u8; NAME_LEN];
        buffer[..len].copy_from_slice(&name[..len]);

        Self {
            hash: hash_name(&buffer),
            name: buffer,
            terminator: 0,
        }
    }

    /// Build an identity, rejecting names that would be truncated
    pub fn try_new(name: impl AsRef<[u8]>) -> ArchiveResult<Self> {
        let name = name.as_ref();
        if name.len() > NAME_LEN {
            return Err(ArchiveError::NameTooLong {
                len: name.len(),
                max: NAME_LEN,
            });
        }
        Ok(Self::new(name))
    }

    /// Stored name bytes up to the first zero byte
    pub fn name_bytes(&self) -> &[u8] {
        let end = self
            .name
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(NAME_LEN);
        &self.name[..end]
    }

    /// Stored name as text, replacing invalid UTF-8
    pub fn name(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.name_bytes())
    }

    /// Check if no name is stored
    pub fn is_empty(&self) -> bool {
        self.name[0] == 0
    }
}

impl Default for Identity {
    /// All-zero identity, as found in a freshly zeroed header
    fn default() -> Self {
        Self {
            hash: 0,
            name: [0u8; NAME_LEN],
            terminator: 0,
        }
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("hash", &format_args!("{:016x}", self.hash))
            .field("name", &self.name())
            .finish()
    }
}
