//! 64-bit name fingerprint used for entry identity and table order
//!
//! This is an FNV-64 variant: the running hash is multiplied by the prime
//! *before* the byte is xored in. Canonical FNV-1a does the opposite. Every
//! archive written so far depends on this order, so it must not change.

use std::hash::Hasher;

/// FNV-64 offset basis
pub const FNV64_BASIS: u64 = 14_695_981_039_346_656_037;

/// FNV-64 prime
pub const FNV64_PRIME: u64 = 1_099_511_628_211;

#[inline]
const fn step(hash: u64, byte: u8) -> u64 {
    hash.wrapping_mul(FNV64_PRIME) ^ byte as u64
}

/// Hash a raw buffer, including any zero bytes it contains
///
/// # Examples
///
/// ```
/// use sar_format::hash::{hash_buffer, FNV64_BASIS};
///
/// assert_eq!(hash_buffer(b""), FNV64_BASIS);
/// assert_ne!(hash_buffer(b"ab"), hash_buffer(b"ba"));
/// ```
pub const fn hash_buffer(data: &[u8]) -> u64 {
    let mut hash = FNV64_BASIS;
    let mut i = 0;
    while i < data.len() {
        hash = step(hash, data[i]);
        i += 1;
    }
    hash
}

/// Hash a name, stopping at the first zero byte
///
/// Names stored in an [`Identity`](crate::Identity) are zero padded, so the
/// stored buffer and the original string hash to the same value.
pub const fn hash_name(name: &[u8]) -> u64 {
    let mut hash = FNV64_BASIS;
    let mut i = 0;
    while i < name.len() && name[i] != 0 {
        hash = step(hash, name[i]);
        i += 1;
    }
    hash
}

/// Streaming form of [`hash_buffer`]
///
/// `SarHasher::default().write(a); write(b)` yields `hash_buffer(a ++ b)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SarHasher {
    state: u64,
}

impl Default for SarHasher {
    fn default() -> Self {
        Self {
            state: FNV64_BASIS,
        }
    }
}

impl Hasher for SarHasher {
    fn finish(&self) -> u64 {
        self.state
    }

    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.state = step(self.state, byte);
        }
    }
}
