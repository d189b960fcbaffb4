//! Integration tests for Chronos CLI commands.
//!
//! Uses tempfile for testing file-based operations.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use chronos::cli::{
    cmd_init, cmd_score, cmd_simulate, cmd_status, cmd_submit, cmd_validate, CliError,
};
use chronos_core::{AttachmentId, VaultDraft, VaultType};
use std::path::PathBuf;
use tempfile::TempDir;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Create a temporary directory for tests.
fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// A fragment draft that passes the submission gate.
fn ready_draft() -> VaultDraft {
    let mut draft = VaultDraft::new(VaultType::Fragment);
    for index in 0..draft.fragments.len() {
        draft
            .fragments
            .set_address(index, format!("addr-{index}"))
            .unwrap();
    }
    draft.add_beneficiary("Alice", "0xaaa", 60);
    draft.add_beneficiary("Bob", "0xbbb", 40);
    draft.add_attachment(AttachmentId(1));
    draft
}

/// Write a draft to a JSON file and return the path.
fn write_draft(dir: &TempDir, draft: &VaultDraft) -> PathBuf {
    let path = dir.path().join("draft.json");
    let content = serde_json::to_string_pretty(draft).unwrap();
    std::fs::write(&path, content).unwrap();
    path
}

// =============================================================================
// INIT COMMAND TESTS
// =============================================================================

#[test]
fn test_init_creates_database() {
    let temp = create_temp_dir();
    let db_path = temp.path().join("chronos.redb");

    let result = cmd_init(&db_path, false);
    assert!(result.is_ok());
    assert!(db_path.exists());
}

#[test]
fn test_init_fails_if_exists_without_force() {
    let temp = create_temp_dir();
    let db_path = temp.path().join("chronos.redb");

    cmd_init(&db_path, false).unwrap();

    let result = cmd_init(&db_path, false);
    assert!(matches!(result, Err(CliError::DatabaseExists(_))));
}

#[test]
fn test_init_succeeds_with_force() {
    let temp = create_temp_dir();
    let db_path = temp.path().join("chronos.redb");

    cmd_init(&db_path, false).unwrap();

    let result = cmd_init(&db_path, true);
    assert!(result.is_ok());
}

// =============================================================================
// VALIDATE COMMAND TESTS
// =============================================================================

#[test]
fn test_validate_accepts_complete_draft() {
    let temp = create_temp_dir();
    let draft_path = write_draft(&temp, &ready_draft());

    assert!(cmd_validate(&draft_path).is_ok());
}

#[test]
fn test_validate_rejects_missing_addresses() {
    let temp = create_temp_dir();
    // The default draft has no fragment addresses yet.
    let draft_path = write_draft(&temp, &VaultDraft::new(VaultType::Fragment));

    let result = cmd_validate(&draft_path);
    assert!(matches!(result, Err(CliError::Validation(_))));
}

#[test]
fn test_validate_rejects_invalid_json() {
    let temp = create_temp_dir();
    let path = temp.path().join("bad.json");
    std::fs::write(&path, "not valid json").unwrap();

    let result = cmd_validate(&path);
    assert!(matches!(result, Err(CliError::Json(_))));
}

#[test]
fn test_validate_missing_file() {
    let temp = create_temp_dir();
    let result = cmd_validate(&temp.path().join("nonexistent.json"));
    assert!(matches!(result, Err(CliError::Io(_))));
}

// =============================================================================
// SIMULATE COMMAND TESTS
// =============================================================================

#[test]
fn test_simulate_generates_prefixed_reference() {
    let reference = cmd_simulate(7, "fragment", false).unwrap();
    assert!(reference.starts_with("fragment-"));
    assert_eq!(reference.len(), "fragment-".len() + 8);
}

#[test]
fn test_simulate_is_deterministic_per_seed() {
    let first = cmd_simulate(42, "nft-powered", false).unwrap();
    let second = cmd_simulate(42, "nft-powered", false).unwrap();
    assert_eq!(first, second);
    assert!(first.starts_with("nft-"));
}

#[test]
fn test_simulate_unknown_vault_type() {
    let result = cmd_simulate(0, "wormhole", false);
    assert!(matches!(result, Err(CliError::UnknownVaultType(_))));
}

// =============================================================================
// SCORE COMMAND TESTS
// =============================================================================

#[test]
fn test_score_base_configuration() {
    let score = cmd_score("standard", false, false, false, 30).unwrap();
    assert_eq!(score, 65);
}

#[test]
fn test_score_caps_at_100() {
    let score = cmd_score("maximum", true, true, true, 400).unwrap();
    assert_eq!(score, 100);
}

#[test]
fn test_score_unknown_level() {
    let result = cmd_score("paranoid", false, false, false, 30);
    assert!(matches!(result, Err(CliError::UnknownSecurityLevel(_))));
}

// =============================================================================
// SUBMIT COMMAND TESTS
// =============================================================================

#[test]
fn test_submit_creates_vault_and_follow_ups() {
    let temp = create_temp_dir();
    let db_path = temp.path().join("chronos.redb");
    let draft_path = write_draft(&temp, &ready_draft());

    let report = cmd_submit(&draft_path, &db_path, 1, false, 1_700_000_000).unwrap();
    assert!(report.all_succeeded());
    assert_eq!(report.beneficiaries.len(), 2);
    assert_eq!(report.attachments.len(), 1);

    let counts = cmd_status(&db_path, false).unwrap();
    assert_eq!(counts.vaults, 1);
    assert_eq!(counts.beneficiaries, 2);
    assert_eq!(counts.attachments, 1);
}

#[test]
fn test_submit_rejects_gate_failures() {
    let temp = create_temp_dir();
    let db_path = temp.path().join("chronos.redb");
    let draft_path = write_draft(&temp, &VaultDraft::new(VaultType::Fragment));

    let result = cmd_submit(&draft_path, &db_path, 1, false, 0);
    assert!(matches!(result, Err(CliError::Submission(_))));
}

#[test]
fn test_submit_offline_wallet_aborts() {
    let temp = create_temp_dir();
    let db_path = temp.path().join("chronos.redb");
    let draft_path = write_draft(&temp, &ready_draft());

    let result = cmd_submit(&draft_path, &db_path, 1, true, 0);
    assert!(matches!(result, Err(CliError::Submission(_))));

    // The vault was never created.
    let counts = cmd_status(&db_path, false).unwrap();
    assert_eq!(counts.vaults, 0);
}

// =============================================================================
// STATUS COMMAND TESTS
// =============================================================================

#[test]
fn test_status_missing_database() {
    let temp = create_temp_dir();
    let result = cmd_status(&temp.path().join("nonexistent.redb"), false);
    assert!(matches!(result, Err(CliError::DatabaseMissing(_))));
}

#[test]
fn test_status_empty_database() {
    let temp = create_temp_dir();
    let db_path = temp.path().join("chronos.redb");
    cmd_init(&db_path, false).unwrap();

    let counts = cmd_status(&db_path, false).unwrap();
    assert_eq!(counts.vaults, 0);
    assert_eq!(counts.beneficiaries, 0);
    assert_eq!(counts.attachments, 0);
}

#[test]
fn test_status_json_mode() {
    let temp = create_temp_dir();
    let db_path = temp.path().join("chronos.redb");
    cmd_init(&db_path, false).unwrap();

    assert!(cmd_status(&db_path, true).is_ok());
}
