use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use debug_attributes_core::{FragmentStore, compose, validate_store};
use debug_attributes_docgen::consistency::{DEFAULT_EXPECTED_DIVERGENCES, check_manifest};
use debug_attributes_docgen::grouping::parse_interface_block;
use debug_attributes_docgen::render::{DEFAULT_DOC_SKIP, render_attribute_table};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Parser)]
#[command(name = "debug-attributes")]
#[command(about = "Compose and document debugger configuration schemas")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compose merged configuration schemas into the extension manifest.
    Compose(ComposeArgs),
    /// Check launch/attach schema consistency of a composed manifest.
    Check(CheckArgs),
    /// Generate the grouped attribute reference table.
    Doc(DocArgs),
    /// Validate the structural invariants of a fragment store.
    Validate(ValidateArgs),
}

#[derive(Debug, Args)]
struct ComposeArgs {
    /// Fragment store file (JSON, or YAML for .yaml/.yml).
    #[arg(long)]
    fragments: PathBuf,
    /// Extension manifest to read and update.
    #[arg(long)]
    manifest: PathBuf,
    /// Write the updated manifest here instead of in place.
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Composed extension manifest.
    #[arg(long)]
    manifest: PathBuf,
    /// Debugger type to inspect (default: the first descriptor).
    #[arg(long)]
    primary: Option<String>,
    /// Comma-separated attribute names expected to differ between launch
    /// and attach, replacing the built-in allow-list.
    #[arg(long)]
    expect: Option<String>,
}

#[derive(Debug, Args)]
struct DocArgs {
    /// Composed extension manifest.
    #[arg(long)]
    manifest: PathBuf,
    /// Source file holding the configuration arguments interface block.
    #[arg(long)]
    interface: PathBuf,
    /// Output path for the generated markdown table.
    #[arg(long)]
    output: PathBuf,
    /// Debugger type to document (default: the first descriptor).
    #[arg(long)]
    primary: Option<String>,
    /// Comma-separated attribute names expected to differ between launch
    /// and attach, replacing the built-in allow-list.
    #[arg(long)]
    expect: Option<String>,
    /// Comma-separated attribute names to omit from the table, replacing
    /// the built-in internal-only list.
    #[arg(long)]
    skip: Option<String>,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Fragment store file (JSON, or YAML for .yaml/.yml).
    #[arg(long)]
    fragments: PathBuf,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Compose(args) => run_compose(args),
        Command::Check(args) => run_check(args),
        Command::Doc(args) => run_doc(args),
        Command::Validate(args) => run_validate(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run_compose(args: ComposeArgs) -> Result<(), String> {
    let store = load_fragment_store(&args.fragments)?;
    let mut manifest = load_manifest(&args.manifest)?;

    let summary = compose(&store, &mut manifest)
        .map_err(|err| format!("Failed to compose schemas: {err}"))?;

    let output = args.output.as_deref().unwrap_or(&args.manifest);
    let rendered = to_pretty_json(&manifest)?;
    fs::write(output, rendered)
        .map_err(|err| format!("Failed to write manifest '{}': {err}", output.display()))?;

    for dtype in &summary.skipped {
        println!("skipped debugger type '{dtype}' (no fragment store entry)");
    }
    println!(
        "composed {} schema(s), wrote {}",
        summary.composed.len(),
        output.display()
    );
    Ok(())
}

fn run_check(args: CheckArgs) -> Result<(), String> {
    let manifest = load_manifest(&args.manifest)?;
    let expected = expected_list(args.expect);
    let expected: Vec<&str> = expected.iter().map(String::as_str).collect();

    let report = check_manifest(&manifest, args.primary.as_deref(), &expected)
        .map_err(|err| format!("Failed to check manifest: {err}"))?;

    for line in report.warning_lines() {
        eprintln!("WARNING: {line}");
    }
    if report.is_clean() {
        println!("launch and attach schemas are consistent");
    }
    Ok(())
}

fn run_doc(args: DocArgs) -> Result<(), String> {
    let manifest = load_manifest(&args.manifest)?;
    let expected = expected_list(args.expect);
    let expected: Vec<&str> = expected.iter().map(String::as_str).collect();

    // Warnings are advisory; the reference table is generated either way.
    let report = check_manifest(&manifest, args.primary.as_deref(), &expected)
        .map_err(|err| format!("Failed to check manifest: {err}"))?;
    for line in report.warning_lines() {
        eprintln!("WARNING: {line}");
    }

    let source = fs::read_to_string(&args.interface).map_err(|err| {
        format!(
            "Failed to read interface source '{}': {err}",
            args.interface.display()
        )
    })?;
    let groups = parse_interface_block(&source)
        .map_err(|err| format!("Failed to parse interface source: {err}"))?;

    let skip = skip_list(args.skip);
    let skip: Vec<&str> = skip.iter().map(String::as_str).collect();
    let properties =
        debug_attributes_core::manifest::request_properties(&manifest, args.primary.as_deref())
            .map_err(|err| format!("Failed to read manifest schemas: {err}"))?;

    let table = render_attribute_table(&groups, &properties.attach, &properties.launch, &skip);
    fs::write(&args.output, table).map_err(|err| {
        format!(
            "Failed to write document '{}': {err}",
            args.output.display()
        )
    })?;

    println!("wrote {}", args.output.display());
    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let store = load_fragment_store(&args.fragments)?;
    let findings = validate_store(&store);

    if findings.is_empty() {
        println!("fragment store is structurally valid");
        return Ok(());
    }
    for finding in &findings {
        eprintln!("WARNING: {finding}");
    }
    Err(format!(
        "fragment store validation failed with {} finding(s)",
        findings.len()
    ))
}

fn load_fragment_store(path: &Path) -> Result<FragmentStore, String> {
    let raw = fs::read_to_string(path)
        .map_err(|err| format!("Failed to read fragment store '{}': {err}", path.display()))?;

    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    if is_yaml {
        serde_yaml::from_str(&raw)
            .map_err(|err| format!("Invalid fragment store '{}': {err}", path.display()))
    } else {
        serde_json::from_str(&raw)
            .map_err(|err| format!("Invalid fragment store '{}': {err}", path.display()))
    }
}

fn load_manifest(path: &Path) -> Result<Value, String> {
    let raw = fs::read_to_string(path)
        .map_err(|err| format!("Failed to read manifest '{}': {err}", path.display()))?;
    serde_json::from_str(&raw)
        .map_err(|err| format!("Invalid manifest '{}': {err}", path.display()))
}

/// Serializes the manifest the way the extension repository stores it:
/// four-space indentation, keys in lexicographic order, trailing newline.
fn to_pretty_json(manifest: &Value) -> Result<String, String> {
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    manifest
        .serialize(&mut serializer)
        .map_err(|err| format!("Failed to serialize manifest: {err}"))?;
    buf.push(b'\n');
    String::from_utf8(buf).map_err(|err| format!("Manifest is not valid UTF-8: {err}"))
}

fn expected_list(raw: Option<String>) -> Vec<String> {
    match raw {
        Some(_) => parse_csv_list(raw),
        None => DEFAULT_EXPECTED_DIVERGENCES
            .iter()
            .map(|name| name.to_string())
            .collect(),
    }
}

fn skip_list(raw: Option<String>) -> Vec<String> {
    match raw {
        Some(_) => parse_csv_list(raw),
        None => DEFAULT_DOC_SKIP
            .iter()
            .map(|name| name.to_string())
            .collect(),
    }
}

fn parse_csv_list(raw: Option<String>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(String::from)
            .collect()
    })
    .unwrap_or_default()
}
