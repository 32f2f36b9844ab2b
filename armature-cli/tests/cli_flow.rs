use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

fn armature_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("armature"))
}

fn init_project(root: &Path) {
    armature_cmd()
        .args(["init", "demo", "--root"])
        .arg(root)
        .assert()
        .success();
}

fn generate_project(root: &Path) {
    armature_cmd()
        .args(["generate", "--root"])
        .arg(root)
        .assert()
        .success();
}

fn append_line(path: &Path, line: &str) {
    let mut contents = fs::read_to_string(path).expect("read file");
    contents.push_str(line);
    contents.push('\n');
    fs::write(path, contents).expect("write file");
}

#[test]
fn init_scaffolds_blueprint_once() {
    let root = TempDir::new().expect("root");

    armature_cmd()
        .args(["init", "demo", "--root"])
        .arg(root.path())
        .assert()
        .success()
        .stdout(contains("Created"))
        .stdout(contains("armature.yaml"));
    assert!(root.path().join("armature.yaml").exists());

    armature_cmd()
        .args(["init", "demo", "--root"])
        .arg(root.path())
        .assert()
        .success()
        .stdout(contains("already exists"));
}

#[test]
fn generate_writes_the_scaffold() {
    let root = TempDir::new().expect("root");
    init_project(root.path());

    armature_cmd()
        .args(["generate", "--root"])
        .arg(root.path())
        .assert()
        .success()
        .stdout(contains("generated (6 written"))
        .stdout(contains("src/routes.ts"));

    assert!(root.path().join("src/controllers/item_controller.ts").exists());
    assert!(root.path().join("src/api/index.ts").exists());
    assert!(root.path().join(".armature/baselines.json").exists());
}

#[test]
fn regeneration_is_idempotent() {
    let root = TempDir::new().expect("root");
    init_project(root.path());
    generate_project(root.path());

    armature_cmd()
        .args(["generate", "--root"])
        .arg(root.path())
        .assert()
        .success()
        .stdout(contains("0 written, 0 merged, 6 unchanged"));
}

#[test]
fn dry_run_touches_nothing() {
    let root = TempDir::new().expect("root");
    init_project(root.path());

    armature_cmd()
        .args(["generate", "--dry-run", "--root"])
        .arg(root.path())
        .assert()
        .success()
        .stdout(contains("[dry-run]"))
        .stdout(contains("~"));

    assert!(!root.path().join("src").exists());
    assert!(!root.path().join(".armature").exists());
}

#[test]
fn diff_reports_uncommitted_edits_and_commit_clears_them() {
    let root = TempDir::new().expect("root");
    init_project(root.path());
    generate_project(root.path());

    let store = root.path().join("src/stores/item_store.ts");
    append_line(&store, "// local note");

    let assert = armature_cmd()
        .args(["diff", "--root"])
        .arg(root.path())
        .assert()
        .success()
        .stdout(contains("src/stores/item_store.ts"));
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("stdout utf8");
    assert!(
        stdout
            .lines()
            .any(|line| line.starts_with('-') && line.contains("// local note")),
        "regenerating would remove the local edit, so it must show as a removed line"
    );

    armature_cmd()
        .args(["commit", "--root"])
        .arg(root.path())
        .assert()
        .success()
        .stdout(contains("Committed 1 file(s)"))
        .stdout(contains("item_store"));

    armature_cmd()
        .args(["diff", "--root"])
        .arg(root.path())
        .assert()
        .success()
        .stdout(contains("No differences"));
}

#[test]
fn generate_merges_blueprint_change_with_committed_edit() {
    let root = TempDir::new().expect("root");
    init_project(root.path());
    generate_project(root.path());

    let store = root.path().join("src/stores/item_store.ts");
    append_line(&store, "// local note");
    armature_cmd()
        .args(["commit", "--root"])
        .arg(root.path())
        .assert()
        .success();

    // The blueprint gains a field, so the store candidate changes shape.
    let blueprint_path = root.path().join("armature.yaml");
    let yaml = fs::read_to_string(&blueprint_path).expect("read blueprint");
    let yaml = yaml.replace(
        "- { name: created, type: datetime }",
        "- { name: created, type: datetime }\n      - { name: sku, type: string }",
    );
    fs::write(&blueprint_path, yaml).expect("update blueprint");

    armature_cmd()
        .args(["generate", "--root"])
        .arg(root.path())
        .assert()
        .success()
        .stdout(contains("⊕  src/stores/item_store.ts"));

    let merged = fs::read_to_string(&store).expect("read store");
    assert!(merged.contains("sku?: string;"), "new field present:\n{merged}");
    assert!(merged.contains("// local note"), "local edit preserved:\n{merged}");
}

#[test]
fn status_json_schema_tracks_drift() {
    let root = TempDir::new().expect("root");
    init_project(root.path());

    let assert = armature_cmd()
        .args(["status", "--json", "--root"])
        .arg(root.path())
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("stdout utf8");
    let payload: serde_json::Value = serde_json::from_str(&stdout).expect("parse status json");
    assert_eq!(payload["signal"], "never_generated");

    generate_project(root.path());
    append_line(
        &root.path().join("src/stores/item_store.ts"),
        "// local note",
    );

    let assert = armature_cmd()
        .args(["status", "--json", "--root"])
        .arg(root.path())
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("stdout utf8");
    let payload: serde_json::Value = serde_json::from_str(&stdout).expect("parse status json");

    let top_keys: BTreeSet<String> = payload
        .as_object()
        .expect("status root object")
        .keys()
        .cloned()
        .collect();
    let expected_top: BTreeSet<String> = [
        "app",
        "signal",
        "detail",
        "summary",
        "last_generated_at",
        "files",
    ]
    .into_iter()
    .map(str::to_string)
    .collect();
    assert_eq!(top_keys, expected_top, "status root schema changed");

    assert_eq!(payload["app"], "demo");
    assert_eq!(payload["signal"], "drifted");
    assert_eq!(payload["summary"]["managed"], 6);
    assert_eq!(payload["summary"]["drifted"], 1);
    let drifted = payload["files"]
        .as_array()
        .expect("files array")
        .iter()
        .find(|f| f["state"] == "drifted")
        .expect("one drifted file");
    assert_eq!(drifted["path"], "src/stores/item_store.ts");
}

#[test]
fn status_table_shows_current_after_generate() {
    let root = TempDir::new().expect("root");
    init_project(root.path());
    generate_project(root.path());

    armature_cmd()
        .args(["status", "--root"])
        .arg(root.path())
        .assert()
        .success()
        .stdout(contains("Indicators:"))
        .stdout(contains("up to date"));
}
