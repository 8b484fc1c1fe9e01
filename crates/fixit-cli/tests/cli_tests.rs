use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use fixit_core::models::{
    Photo, RepairAnalysis, RepairCategory, RepairStatus, RepairStep,
};
use fixit_core::store::{DocumentStore, SqliteStoreBuilder};
use fixit_core::RepairDocument;

/// Helper function to create a temporary directory for CLI tests
fn create_cli_test_environment() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Helper function to create a Command with --no-color flag for testing
fn fixit_cmd() -> Command {
    let mut cmd = Command::cargo_bin("fixit").expect("Failed to find fixit binary");
    cmd.arg("--no-color");
    cmd
}

/// Seeds one repair document directly through the core store and returns
/// its id. The analyze path needs a live backend, so tests write through
/// the library instead.
fn seed_document(db_path: &Path) -> String {
    let analysis = RepairAnalysis {
        status: RepairStatus::Ok,
        object_name: "Office chair".to_string(),
        category: RepairCategory::Furniture,
        issue_type: "Backrest wobbles".to_string(),
        safety_warning: None,
        tools_needed: true,
        ideal_view_instruction: "Chair tipped forward".to_string(),
        steps: (1..=3)
            .map(|n| RepairStep {
                step_number: n,
                instruction: format!("Step {n}"),
                visual_description: format!("View {n}"),
                generated_image_url: None,
            })
            .collect(),
    };
    let doc = RepairDocument::assemble(
        analysis,
        Photo::from_bytes(b"\xff\xd8test").to_data_url(),
    );
    let id = doc.repair_id.clone();

    let runtime = tokio::runtime::Runtime::new().expect("runtime");
    runtime.block_on(async {
        let store = SqliteStoreBuilder::new()
            .with_database_path(Some(db_path))
            .build()
            .await
            .expect("store");
        store.create(&doc).await.expect("seed");
    });
    id
}

#[test]
fn test_cli_list_empty() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    fixit_cmd()
        .args(["--database-file", db_path.to_str().unwrap(), "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No repairs found."));
}

#[test]
fn test_cli_default_command_lists() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    fixit_cmd()
        .args(["--database-file", db_path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Your Repairs"));
}

#[test]
fn test_cli_list_shows_seeded_document() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    seed_document(&db_path);

    fixit_cmd()
        .args(["--database-file", db_path.to_str().unwrap(), "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Office chair"))
        .stdout(predicate::str::contains("Backrest wobbles"));
}

#[test]
fn test_cli_show_full_document() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let id = seed_document(&db_path);

    fixit_cmd()
        .args(["--database-file", db_path.to_str().unwrap(), "show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Office chair"))
        .stdout(predicate::str::contains("Step 2"));
}

#[test]
fn test_cli_show_missing_id_fails() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    fixit_cmd()
        .args(["--database-file", db_path.to_str().unwrap(), "show", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No repair found"));
}

#[test]
fn test_cli_publish_private_and_feed_stays_empty() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap().to_string();
    let id = seed_document(&db_path);

    fixit_cmd()
        .args([
            "--database-file",
            &db_arg,
            "publish",
            &id,
            "--visibility",
            "private",
            "--outcome",
            "success",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("private"));

    fixit_cmd()
        .args(["--database-file", &db_arg, "feed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No repairs found."));
}

#[test]
fn test_cli_publish_public_fails_open_without_backend() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap().to_string();
    let id = seed_document(&db_path);

    // No backend is running: moderation cannot render a verdict, and the
    // gate's documented policy is to fail open rather than block the save.
    fixit_cmd()
        .args([
            "--database-file",
            &db_arg,
            "--api-url",
            "http://127.0.0.1:1", // nothing listens here
            "--timeout-secs",
            "5",
            "publish",
            &id,
            "--visibility",
            "public",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("public"));

    fixit_cmd()
        .args(["--database-file", &db_arg, "feed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Office chair"));
}

#[test]
fn test_cli_delete_document() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap().to_string();
    let id = seed_document(&db_path);

    fixit_cmd()
        .args(["--database-file", &db_arg, "delete", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted"));

    fixit_cmd()
        .args(["--database-file", &db_arg, "show", &id])
        .assert()
        .failure();
}

#[test]
fn test_cli_delete_missing_id_fails() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    fixit_cmd()
        .args(["--database-file", db_path.to_str().unwrap(), "delete", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No repair found"));
}

#[test]
fn test_cli_analyze_missing_photo_fails() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    fixit_cmd()
        .args([
            "--database-file",
            db_path.to_str().unwrap(),
            "analyze",
            "/no/such/photo.jpg",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read photo"));
}

#[test]
fn test_cli_rejects_unknown_subcommand() {
    fixit_cmd().arg("frobnicate").assert().failure();
}
