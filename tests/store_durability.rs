//! Store Durability Invariant Tests
//!
//! Tests for invariants:
//! - Save never changes the sink's length
//! - Saving an unmodified store twice is byte-identical
//! - Corruption on disk is never accepted
//! - Entries that cannot be held as text fail the open instead of vanishing
//! - Import applies lines up to the first malformed one

use std::fs;
use std::path::PathBuf;

use bootenv::codec::{compute_checksum, FILL_BYTE};
use bootenv::env::{EnvErrorCode, EnvOptions, EnvStore};
use tempfile::TempDir;

// =============================================================================
// Test Utilities
// =============================================================================

fn create_temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

fn env_path(dir: &TempDir) -> PathBuf {
    dir.path().join("uboot.env")
}

fn populated_store(dir: &TempDir, size: usize) -> EnvStore {
    let mut store = EnvStore::create(env_path(dir), size).unwrap();
    store.set("bootdelay", "3").unwrap();
    store.set("bootcmd", "run distro_bootcmd").unwrap();
    store.set("ethaddr", "02:00:00:00:00:01").unwrap();
    store.save().unwrap();
    store
}

// =============================================================================
// Size
// =============================================================================

#[test]
fn test_save_keeps_sink_length() {
    let temp_dir = create_temp_dir();
    let path = env_path(&temp_dir);
    let mut store = populated_store(&temp_dir, 4096);
    assert_eq!(fs::metadata(&path).unwrap().len(), 4096);

    store.set("bootcmd", "").unwrap();
    store.save().unwrap();
    assert_eq!(fs::metadata(&path).unwrap().len(), 4096);

    for i in 0..50 {
        store.set(&format!("var{}", i), "value").unwrap();
    }
    store.save().unwrap();
    assert_eq!(fs::metadata(&path).unwrap().len(), 4096);
}

#[test]
fn test_reopen_keeps_target_size() {
    let temp_dir = create_temp_dir();
    populated_store(&temp_dir, 1024);

    let store = EnvStore::open(env_path(&temp_dir)).unwrap();
    assert_eq!(store.target_size(), 1024);
}

// =============================================================================
// Idempotence
// =============================================================================

#[test]
fn test_double_save_is_byte_identical() {
    let temp_dir = create_temp_dir();
    let path = env_path(&temp_dir);
    populated_store(&temp_dir, 512);

    let store = EnvStore::open(&path).unwrap();
    store.save().unwrap();
    let first = fs::read(&path).unwrap();
    store.save().unwrap();
    let second = fs::read(&path).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_resave_of_opened_store_matches_original() {
    let temp_dir = create_temp_dir();
    let path = env_path(&temp_dir);
    populated_store(&temp_dir, 512);
    let original = fs::read(&path).unwrap();

    EnvStore::open(&path).unwrap().save().unwrap();
    assert_eq!(fs::read(&path).unwrap(), original);
}

// =============================================================================
// Corruption
// =============================================================================

#[test]
fn test_corrupted_sink_is_rejected_in_every_mode() {
    let temp_dir = create_temp_dir();
    let path = env_path(&temp_dir);
    populated_store(&temp_dir, 256);

    let mut contents = fs::read(&path).unwrap();
    contents[100] ^= 0xFF;
    fs::write(&path, contents).unwrap();

    let err = EnvStore::open(&path).unwrap_err();
    assert_eq!(err.code(), EnvErrorCode::ChecksumMismatch);
    assert!(err.is_fatal());
    assert!(err.to_string().contains("BOOTENV_CHECKSUM_MISMATCH"));

    let err = EnvStore::open_best_effort(&path).unwrap_err();
    assert_eq!(err.code(), EnvErrorCode::ChecksumMismatch);
}

#[test]
fn test_non_utf8_entry_fails_open_and_sink_is_untouched() {
    let temp_dir = create_temp_dir();
    let path = env_path(&temp_dir);

    let mut payload = b"bootdelay=3\0label=caf\xe9\0\0".to_vec();
    payload.resize(60, FILL_BYTE);
    let mut image = compute_checksum(&payload).to_le_bytes().to_vec();
    image.extend_from_slice(&payload);
    fs::write(&path, &image).unwrap();

    let err = EnvStore::open(&path).unwrap_err();
    assert_eq!(err.code(), EnvErrorCode::InvalidEncoding);

    let err = EnvStore::open_best_effort(&path).unwrap_err();
    assert_eq!(err.code(), EnvErrorCode::InvalidEncoding);

    assert_eq!(fs::read(&path).unwrap(), image);
}

#[test]
fn test_expected_size_mismatch() {
    let temp_dir = create_temp_dir();
    let path = env_path(&temp_dir);
    populated_store(&temp_dir, 256);

    let err = EnvStore::open_with_options(&path, EnvOptions::new().expected_size(512)).unwrap_err();
    assert_eq!(err.code(), EnvErrorCode::SizeMismatch);
}

// =============================================================================
// Mutation
// =============================================================================

#[test]
fn test_delete_by_empty_value_persists() {
    let temp_dir = create_temp_dir();
    let path = env_path(&temp_dir);
    let mut store = populated_store(&temp_dir, 256);

    store.set("bootdelay", "").unwrap();
    assert_eq!(store.get("bootdelay"), "");
    store.save().unwrap();

    let reopened = EnvStore::open(&path).unwrap();
    assert!(!reopened.env().contains("bootdelay"));
    assert_eq!(reopened.get("bootcmd"), "run distro_bootcmd");
}

#[test]
fn test_empty_key_rejected_for_any_state() {
    let temp_dir = create_temp_dir();
    let mut store = EnvStore::create(env_path(&temp_dir), 64).unwrap();
    let err = store.set("", "v").unwrap_err();
    assert_eq!(err.code(), EnvErrorCode::PreconditionViolation);

    let mut store = populated_store(&temp_dir, 256);
    let err = store.set("", "v").unwrap_err();
    assert_eq!(err.code(), EnvErrorCode::PreconditionViolation);
}

#[test]
fn test_render_matches_save_order() {
    let temp_dir = create_temp_dir();
    let path = env_path(&temp_dir);
    let store = populated_store(&temp_dir, 256);

    assert_eq!(
        store.render(),
        "bootcmd=run distro_bootcmd\nbootdelay=3\nethaddr=02:00:00:00:00:01\n"
    );

    let image = fs::read(&path).unwrap();
    assert!(image[4..].starts_with(
        b"bootcmd=run distro_bootcmd\0bootdelay=3\0ethaddr=02:00:00:00:00:01\0\0"
    ));
}

// =============================================================================
// Import
// =============================================================================

#[test]
fn test_scenario_import() {
    let temp_dir = create_temp_dir();
    let mut store = EnvStore::create(env_path(&temp_dir), 256).unwrap();

    let applied = store.import("# comment\n\nkey=value\nk2=v2".as_bytes()).unwrap();
    assert_eq!(applied, 2);
    assert_eq!(store.render(), "k2=v2\nkey=value\n");
}

#[test]
fn test_scenario_import_malformed_line() {
    let temp_dir = create_temp_dir();
    let mut store = EnvStore::create(env_path(&temp_dir), 256).unwrap();

    let err = store.import("first=1\nbadline\nlast=2\n".as_bytes()).unwrap_err();
    assert_eq!(err.code(), EnvErrorCode::MalformedLine);
    assert_eq!(store.get("first"), "1");
    assert_eq!(store.get("last"), "");
}

#[test]
fn test_import_then_save_roundtrip() {
    let temp_dir = create_temp_dir();
    let path = env_path(&temp_dir);
    let mut store = EnvStore::create(&path, 256).unwrap();

    store
        .import("bootargs=console=ttyS0,115200\nbootdelay=0\n".as_bytes())
        .unwrap();
    store.save().unwrap();

    let reopened = EnvStore::open(&path).unwrap();
    assert_eq!(reopened.get("bootargs"), "console=ttyS0,115200");
    assert_eq!(reopened.get("bootdelay"), "0");
}
