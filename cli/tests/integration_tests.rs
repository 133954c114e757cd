//! Integration tests for the compose, check, doc, and validate flows.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

fn debug_attributes_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_debug-attributes"))
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Copies the fixture store and manifest into a scratch directory.
fn scratch_workspace() -> (TempDir, PathBuf, PathBuf) {
    let dir = TempDir::new().expect("create scratch dir");
    let store = dir.path().join("config_base.json");
    let manifest = dir.path().join("package.json");
    fs::copy(fixture("config_base.json"), &store).unwrap();
    fs::copy(fixture("package.json"), &manifest).unwrap();
    (dir, store, manifest)
}

fn run(args: &[&str]) -> Output {
    Command::new(debug_attributes_bin())
        .args(args)
        .output()
        .expect("failed to run debug-attributes")
}

fn run_compose(store: &Path, manifest: &Path) -> Output {
    run(&[
        "compose",
        "--fragments",
        store.to_str().unwrap(),
        "--manifest",
        manifest.to_str().unwrap(),
    ])
}

fn load_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

// ---- compose ----

#[test]
fn test_compose_writes_merged_schemas() {
    let (_dir, store, manifest) = scratch_workspace();
    let output = run_compose(&store, &manifest);
    assert!(
        output.status.success(),
        "compose failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let composed = load_json(&manifest);
    let debuggers = &composed["contributes"]["debuggers"];

    let launch = &debuggers[0]["configurationAttributes"]["launch"];
    assert_eq!(
        launch["required"],
        serde_json::json!(["executable", "configFiles"])
    );
    assert!(launch["properties"]["runToEntryPoint"].is_object());
    assert!(launch["properties"].get("preAttachCommands").is_none());

    let attach = &debuggers[0]["configurationAttributes"]["attach"];
    assert!(attach["properties"]["preAttachCommands"].is_object());
    assert!(attach["properties"].get("runToEntryPoint").is_none());

    // removeProperties drops the descriptor for the external GDB server.
    let external = &debuggers[1]["configurationAttributes"]["attach"];
    assert!(external["properties"].get("cwd").is_none());
    assert_eq!(
        external["required"],
        serde_json::json!(["executable", "gdbTarget"])
    );
}

#[test]
fn test_compose_leaves_unlisted_type_and_other_content_alone() {
    let (_dir, store, manifest) = scratch_workspace();
    let output = run_compose(&store, &manifest);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("skipped debugger type 'qemu'"));

    let composed = load_json(&manifest);
    assert_eq!(composed["name"], "cortex-style-debug");
    assert_eq!(
        composed["contributes"]["commands"][0]["title"],
        "Examine memory"
    );
    assert_eq!(
        composed["contributes"]["debuggers"][2]["configurationAttributes"]["launch"]["properties"]
            ["machine"]["description"],
        "Hand-maintained, not composed"
    );
}

#[test]
fn test_compose_is_idempotent_on_disk() {
    let (_dir, store, manifest) = scratch_workspace();
    assert!(run_compose(&store, &manifest).status.success());
    let first = fs::read_to_string(&manifest).unwrap();

    assert!(run_compose(&store, &manifest).status.success());
    let second = fs::read_to_string(&manifest).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_compose_uses_four_space_indent() {
    let (_dir, store, manifest) = scratch_workspace();
    assert!(run_compose(&store, &manifest).status.success());

    let written = fs::read_to_string(&manifest).unwrap();
    assert!(written.contains("\n    \"contributes\""));
    assert!(written.ends_with('\n'));
}

#[test]
fn test_compose_output_flag_leaves_manifest_untouched() {
    let (dir, store, manifest) = scratch_workspace();
    let original = fs::read_to_string(&manifest).unwrap();
    let output_path = dir.path().join("composed.json");

    let output = run(&[
        "compose",
        "--fragments",
        store.to_str().unwrap(),
        "--manifest",
        manifest.to_str().unwrap(),
        "--output",
        output_path.to_str().unwrap(),
    ]);
    assert!(output.status.success());

    assert_eq!(fs::read_to_string(&manifest).unwrap(), original);
    assert!(output_path.exists());
}

#[test]
fn test_compose_accepts_yaml_store() {
    let (dir, _store, manifest) = scratch_workspace();
    let yaml_store = dir.path().join("config_base.yaml");
    fs::write(
        &yaml_store,
        "\
openocd:
  launch:
    required:
      - configFiles
    properties:
      configFiles:
        description: OpenOCD configuration files
",
    )
    .unwrap();

    let output = run_compose(&yaml_store, &manifest);
    assert!(
        output.status.success(),
        "yaml compose failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let composed = load_json(&manifest);
    let launch = &composed["contributes"]["debuggers"][0]["configurationAttributes"]["launch"];
    assert_eq!(launch["required"], serde_json::json!(["configFiles"]));
}

#[test]
fn test_compose_rejects_malformed_fragment() {
    let (dir, _store, manifest) = scratch_workspace();
    let broken = dir.path().join("broken.json");
    fs::write(&broken, r#"{"openocd": {"launch": {"required": []}}}"#).unwrap();
    let original = fs::read_to_string(&manifest).unwrap();

    let output = run_compose(&broken, &manifest);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("error:"));
    // Nothing was composed, nothing was written.
    assert_eq!(fs::read_to_string(&manifest).unwrap(), original);
}

// ---- check ----

#[test]
fn test_check_reports_unexpected_divergence() {
    let (_dir, store, manifest) = scratch_workspace();
    assert!(run_compose(&store, &manifest).status.success());

    let output = run(&["check", "--manifest", manifest.to_str().unwrap()]);
    assert!(output.status.success(), "check warnings must stay advisory");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("WARNING:"));
    assert!(stderr.contains("runToEntryPoint"));
    // The built-in allow-list swallows the attach-only hooks.
    assert!(!stderr.contains("preAttachCommands"));
}

#[test]
fn test_check_clean_with_extended_allow_list() {
    let (_dir, store, manifest) = scratch_workspace();
    assert!(run_compose(&store, &manifest).status.success());

    let output = run(&[
        "check",
        "--manifest",
        manifest.to_str().unwrap(),
        "--expect",
        "preAttachCommands,postAttachCommands,overrideAttachCommands,runToEntryPoint",
    ]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).trim().is_empty());
    assert!(String::from_utf8_lossy(&output.stdout).contains("consistent"));
}

// ---- doc ----

#[test]
fn test_doc_renders_reference_table() {
    let (dir, store, manifest) = scratch_workspace();
    assert!(run_compose(&store, &manifest).status.success());
    let interface = dir.path().join("common.ts");
    fs::copy(fixture("common.ts"), &interface).unwrap();
    let doc = dir.path().join("debug_attributes.md");

    let output = run(&[
        "doc",
        "--manifest",
        manifest.to_str().unwrap(),
        "--interface",
        interface.to_str().unwrap(),
        "--output",
        doc.to_str().unwrap(),
        "--expect",
        "preAttachCommands,postAttachCommands,overrideAttachCommands,runToEntryPoint",
    ]);
    assert!(
        output.status.success(),
        "doc failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let table = fs::read_to_string(&doc).unwrap();
    assert!(table.contains("| Attribute | Applies To | Description |"));
    assert!(table.contains("| executable | Common | Path of executable for debugging |"));
    assert!(table.contains("| configFiles | OpenOCD Specific | OpenOCD configuration files |"));
    // QEMU fields are documented but never composed: visible placeholders.
    assert!(table.contains("| cpu | QEMU Specific | ???? |"));
    // Internal-only names stay out of the table.
    assert!(!table.contains("extensionPath"));
    assert!(!table.contains("toolchainPath"));
}

#[test]
fn test_doc_still_writes_when_warnings_fire() {
    let (dir, store, manifest) = scratch_workspace();
    assert!(run_compose(&store, &manifest).status.success());
    let interface = dir.path().join("common.ts");
    fs::copy(fixture("common.ts"), &interface).unwrap();
    let doc = dir.path().join("debug_attributes.md");

    let output = run(&[
        "doc",
        "--manifest",
        manifest.to_str().unwrap(),
        "--interface",
        interface.to_str().unwrap(),
        "--output",
        doc.to_str().unwrap(),
    ]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("WARNING:"));
    assert!(doc.exists());
}

#[test]
fn test_doc_fails_without_interface_block() {
    let (dir, store, manifest) = scratch_workspace();
    assert!(run_compose(&store, &manifest).status.success());
    let interface = dir.path().join("common.ts");
    fs::write(&interface, "export interface SomethingElse {}\n").unwrap();
    let doc = dir.path().join("debug_attributes.md");

    let output = run(&[
        "doc",
        "--manifest",
        manifest.to_str().unwrap(),
        "--interface",
        interface.to_str().unwrap(),
        "--output",
        doc.to_str().unwrap(),
    ]);
    assert!(!output.status.success());
    assert!(!doc.exists());
}

// ---- validate ----

#[test]
fn test_validate_accepts_fixture_store() {
    let (_dir, store, _manifest) = scratch_workspace();
    let output = run(&["validate", "--fragments", store.to_str().unwrap()]);
    assert!(
        output.status.success(),
        "validate failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn test_validate_rejects_duplicate_required() {
    let (dir, _store, _manifest) = scratch_workspace();
    let broken = dir.path().join("broken.json");
    fs::write(
        &broken,
        r#"{"common": {"common": {"required": ["cwd", "cwd"], "properties": {}}}}"#,
    )
    .unwrap();

    let output = run(&["validate", "--fragments", broken.to_str().unwrap()]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("duplicate required field 'cwd'"));
}
