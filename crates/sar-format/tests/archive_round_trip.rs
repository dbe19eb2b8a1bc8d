#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
//! Integration tests for building and reading complete archives
//!
//! Covers the round-trip, ordering, lookup and layout properties every
//! finalized archive must satisfy, plus the lenient handling of damaged
//! headers.

use pretty_assertions::assert_eq;
use proptest::collection::{btree_map, vec};
use proptest::prelude::*;
use sar_format::{
    Archive, ArchiveBuilder, ArchiveError, ArchiveOptions, ENTRY_SIZE, HEADER_SIZE, NAME_LEN,
    SAR_MAGIC, SAR_VERSION, Stored, hash_name,
};
use std::collections::BTreeMap;

fn build(files: &BTreeMap<String, Vec<u8>>) -> Vec<u8> {
    let mut builder = ArchiveBuilder::new();
    for (name, data) in files {
        builder.append(name, data).unwrap();
    }
    builder.finalize().unwrap()
}

/// Names of 1 to 55 printable bytes, so none are truncated
///
/// `#` is left out so other generators can produce disjoint names.
fn name_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_./-]{1,55}"
}

fn files_strategy() -> impl Strategy<Value = BTreeMap<String, Vec<u8>>> {
    btree_map(name_strategy(), vec(any::<u8>(), 0..512), 0..24)
}

// --- Fixed scenarios ---

#[test]
fn two_file_scenario() {
    let mut builder = ArchiveBuilder::new();
    builder.append("a.txt", b"hello").unwrap();
    builder.append("b.bin", &[0, 1, 2, 3]).unwrap();
    let bytes = builder.finalize().unwrap();

    let archive = Archive::open(&bytes).unwrap();
    assert_eq!(archive.len(), 2);
    assert_eq!(archive.header().file_count, 2);
    assert_eq!(archive.header().archive_size, bytes.len() as u64);

    let a = archive.lookup("a.txt").unwrap();
    assert_eq!(a.full_size, 5);
    assert_eq!(archive.read_entry(&a).unwrap(), b"hello");

    let b = archive.lookup("b.bin").unwrap();
    assert_eq!(b.full_size, 4);
    assert_eq!(archive.read_entry(&b).unwrap(), vec![0u8, 1, 2, 3]);

    assert!(archive.lookup("c").is_none());
    assert_eq!(archive.read_entry_data("c").unwrap(), None);
}

#[test]
fn corrupted_magic_still_readable() {
    let mut builder = ArchiveBuilder::new();
    builder.append("a.txt", b"hello").unwrap();
    let mut bytes = builder.finalize().unwrap();
    bytes[0] ^= 0xff;

    let archive = Archive::open(&bytes).unwrap();
    assert_ne!(archive.header().magic, SAR_MAGIC);
    assert_eq!(archive.read_entry_data("a.txt").unwrap().unwrap(), b"hello");

    let strict = Archive::open_with(&bytes, ArchiveOptions::new().with_strict(true));
    assert!(matches!(strict, Err(ArchiveError::InvalidMagic { .. })));
}

#[test]
fn newer_version_is_advisory() {
    let mut bytes = ArchiveBuilder::new().finalize().unwrap();
    bytes[4..8].copy_from_slice(&(SAR_VERSION + 1).to_le_bytes());

    assert!(Archive::open(&bytes).is_ok());
    let strict = Archive::open_with(&bytes, ArchiveOptions::new().with_strict(true));
    assert!(matches!(strict, Err(ArchiveError::UnsupportedVersion(102))));
}

#[test]
fn truncated_buffers_are_rejected() {
    let mut builder = ArchiveBuilder::new();
    builder.append("a.txt", b"hello").unwrap();
    let bytes = builder.finalize().unwrap();

    assert!(matches!(
        Archive::open(&bytes[..HEADER_SIZE - 1]),
        Err(ArchiveError::Truncated { .. })
    ));
    // Header intact but the table runs off the end
    assert!(Archive::open(&bytes[..HEADER_SIZE + ENTRY_SIZE / 2]).is_err());
}

#[test]
fn long_name_found_only_by_truncated_form() {
    let long = format!("{}{}", "d".repeat(NAME_LEN), "-tail.txt");
    let truncated = &long[..NAME_LEN];

    let mut builder = ArchiveBuilder::new();
    builder.append(&long, b"payload").unwrap();
    let bytes = builder.finalize().unwrap();
    let archive = Archive::open(&bytes).unwrap();

    assert!(archive.lookup(&long).is_none());
    let entry = archive.lookup(truncated).unwrap();
    assert_eq!(entry.hash(), hash_name(truncated.as_bytes()));
    assert_eq!(entry.id.name(), truncated);
}

#[test]
fn reimport_and_extend() {
    let mut builder = ArchiveBuilder::new();
    builder.set_description("first build");
    builder.append("keep.txt", b"kept").unwrap();
    let first = builder.finalize().unwrap();

    let existing = Archive::open(&first).unwrap();
    let mut builder = ArchiveBuilder::from_archive(&existing).unwrap();
    builder.append("new.txt", b"added").unwrap();
    let second = builder.finalize().unwrap();

    let archive = Archive::open(&second).unwrap();
    assert!(archive.validate().is_ok());
    assert_eq!(archive.description(), b"first build");
    assert_eq!(archive.read_entry_data("keep.txt").unwrap().unwrap(), b"kept");
    assert_eq!(archive.read_entry_data("new.txt").unwrap().unwrap(), b"added");
}

#[test]
fn stored_codec_payloads_are_verbatim() {
    let options = ArchiveOptions::default();
    let mut builder = ArchiveBuilder::with_codec(Stored, options.clone());
    builder.append("raw", b"verbatim").unwrap();
    let bytes = builder.finalize().unwrap();

    let archive = Archive::with_codec(&bytes, Stored, options).unwrap();
    let entry = archive.lookup("raw").unwrap();
    assert_eq!(archive.compressed_data(&entry).unwrap(), b"verbatim");
    assert!(bytes.ends_with(b"verbatim"));
}

#[test]
fn scratch_buffer_is_reused() {
    let mut builder = ArchiveBuilder::new();
    builder.append("long", &[7u8; 300]).unwrap();
    builder.append("short", b"xy").unwrap();
    let bytes = builder.finalize().unwrap();
    let archive = Archive::open(&bytes).unwrap();

    let mut scratch = Vec::new();
    archive
        .read_entry_into(&archive.lookup("long").unwrap(), &mut scratch)
        .unwrap();
    assert_eq!(scratch.len(), 300);

    archive
        .read_entry_into(&archive.lookup("short").unwrap(), &mut scratch)
        .unwrap();
    assert_eq!(scratch, b"xy");
}

// --- Properties ---

proptest! {
    #[test]
    fn round_trip(files in files_strategy()) {
        let bytes = build(&files);
        let archive = Archive::open(&bytes).unwrap();

        prop_assert_eq!(archive.len(), files.len());
        for (name, data) in &files {
            let read = archive.read_entry_data(name).unwrap();
            prop_assert_eq!(read.as_ref(), Some(data));
        }
    }

    #[test]
    fn table_sorted_after_finalize(files in files_strategy()) {
        let bytes = build(&files);
        let archive = Archive::open(&bytes).unwrap();

        let hashes: Vec<u64> = archive.entries().map(|e| e.hash()).collect();
        prop_assert!(hashes.windows(2).all(|w| w[0] <= w[1]));
        prop_assert!(archive.validate().is_ok());
    }

    #[test]
    fn binary_search_agrees_with_scan(
        files in files_strategy(),
        probe in name_strategy(),
    ) {
        let bytes = build(&files);
        let archive = Archive::open(&bytes).unwrap();

        let hash = hash_name(probe.as_bytes());
        let scanned = archive.entries().any(|e| e.hash() == hash);
        let found = archive.index_of(hash);
        prop_assert_eq!(found.is_some(), scanned);
        if let Some(index) = found {
            prop_assert_eq!(archive.entry(index).unwrap().hash(), hash);
        }
    }

    #[test]
    fn locations_within_archive(files in files_strategy()) {
        let bytes = build(&files);
        let archive = Archive::open(&bytes).unwrap();
        let archive_size = archive.header().archive_size;

        prop_assert_eq!(archive_size, bytes.len() as u64);
        let table_end = archive.header().file_table_location.get()
            + (archive.len() * ENTRY_SIZE) as u64;
        for entry in archive.entries() {
            prop_assert!(entry.location.get() >= table_end);
            prop_assert!(entry.end().unwrap() <= archive_size);
        }
    }

    #[test]
    fn truncated_names_hash_truncated_form(
        prefix in "[a-z]{55}",
        suffix in "[a-z]{1,40}",
    ) {
        let name = format!("{prefix}{suffix}");
        let mut builder = ArchiveBuilder::new();
        builder.append(&name, b"x").unwrap();
        let bytes = builder.finalize().unwrap();
        let archive = Archive::open(&bytes).unwrap();

        let entry = archive.entry(0).unwrap();
        prop_assert_eq!(entry.id.name_bytes(), prefix.as_bytes());
        prop_assert_eq!(entry.hash(), hash_name(prefix.as_bytes()));
    }

    #[test]
    fn import_preserves_content(
        files in files_strategy(),
        extra in btree_map("#[A-Z]{1,20}", vec(any::<u8>(), 0..64), 0..6),
    ) {
        let first = build(&files);
        let existing = Archive::open(&first).unwrap();

        let mut builder = ArchiveBuilder::from_archive(&existing).unwrap();
        for (name, data) in &extra {
            builder.append(name, data).unwrap();
        }
        let second = builder.finalize().unwrap();
        let archive = Archive::open(&second).unwrap();

        prop_assert_eq!(archive.len(), files.len() + extra.len());
        for (name, data) in files.iter().chain(extra.iter()) {
            let read = archive.read_entry_data(name).unwrap();
            prop_assert_eq!(read.as_ref(), Some(data));
        }
    }
}
