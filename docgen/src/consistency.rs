//! Attach/launch schema consistency checks.
//!
//! Launch and attach are expected to expose the same configuration fields
//! with identical descriptors, apart from a small allow-list of hooks that
//! only make sense for one request kind. Anything else that differs means
//! the fragment layering drifted: a field was added to one request kind's
//! schema without a matching intentional entry.
//!
//! All findings are advisory. Callers print them and continue; document
//! generation never aborts on a dirty report.

use std::collections::BTreeSet;

use debug_attributes_core::manifest::{ManifestError, request_properties};
use serde_json::{Map, Value};
use tracing::warn;

/// Fields expected to exist for exactly one request kind.
///
/// These hooks fire around attaching to a running target and have no
/// launch-side counterpart entry of the same name.
pub const DEFAULT_EXPECTED_DIVERGENCES: &[&str] = &[
    "overrideAttachCommands",
    "postAttachCommands",
    "preAttachCommands",
];

/// Outcome of a consistency check.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ConsistencyReport {
    /// Fields present in exactly one schema and not on the allow-list, sorted.
    pub unexpected: Vec<String>,
    /// Shared fields whose launch/attach descriptors differ, sorted.
    pub mismatched: Vec<String>,
}

impl ConsistencyReport {
    /// Returns `true` when neither check found anything.
    pub fn is_clean(&self) -> bool {
        self.unexpected.is_empty() && self.mismatched.is_empty()
    }

    /// Formats the findings as console warning lines, one per finding class.
    pub fn warning_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if !self.unexpected.is_empty() {
            lines.push(format!(
                "launch and attach attributes differ unexpectedly: {}",
                self.unexpected.join(", ")
            ));
        }
        if !self.mismatched.is_empty() {
            lines.push(format!(
                "shared attributes described differently for launch and attach: {}",
                self.mismatched.join(", ")
            ));
        }
        lines
    }
}

/// Checks two property maps against each other.
///
/// `expected` is the allow-list of names allowed to exist on one side only.
///
/// # Examples
///
/// ```
/// use debug_attributes_docgen::consistency::check_consistency;
/// use serde_json::json;
///
/// let attach = json!({"a": {}, "b": {}, "c": {}});
/// let launch = json!({"a": {}, "b": {}, "d": {}});
/// let report = check_consistency(
///     attach.as_object().unwrap(),
///     launch.as_object().unwrap(),
///     &["d"],
/// );
/// assert_eq!(report.unexpected, vec!["c"]);
/// assert!(report.mismatched.is_empty());
/// ```
pub fn check_consistency(
    attach: &Map<String, Value>,
    launch: &Map<String, Value>,
    expected: &[&str],
) -> ConsistencyReport {
    let attach_names: BTreeSet<&str> = attach.keys().map(String::as_str).collect();
    let launch_names: BTreeSet<&str> = launch.keys().map(String::as_str).collect();

    let unexpected: Vec<String> = attach_names
        .symmetric_difference(&launch_names)
        .filter(|name| !expected.contains(name))
        .map(|name| name.to_string())
        .collect();

    let mismatched: Vec<String> = attach_names
        .intersection(&launch_names)
        .filter(|name| attach.get(**name) != launch.get(**name))
        .map(|name| name.to_string())
        .collect();

    let report = ConsistencyReport {
        unexpected,
        mismatched,
    };
    if !report.unexpected.is_empty() {
        warn!(
            fields = %report.unexpected.join(", "),
            "unexpected launch/attach divergence"
        );
    }
    if !report.mismatched.is_empty() {
        warn!(
            fields = %report.mismatched.join(", "),
            "launch/attach descriptor mismatch"
        );
    }
    report
}

/// Checks the primary debugger descriptor of a composed manifest.
///
/// Convenience wrapper around [`request_properties`] and
/// [`check_consistency`] for callers that hold the whole manifest.
pub fn check_manifest(
    manifest: &Value,
    primary: Option<&str>,
    expected: &[&str],
) -> Result<ConsistencyReport, ManifestError> {
    let properties = request_properties(manifest, primary)?;
    Ok(check_consistency(
        &properties.attach,
        &properties.launch,
        expected,
    ))
}
