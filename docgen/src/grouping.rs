//! Parsing of the authoritative configuration-field grouping source.
//!
//! The runtime code declares its configuration fields in one interface-like
//! block whose line comments double as category headers. This module turns
//! that text into explicit [`AttributeGroup`] records so that consumers
//! never touch the source format:
//!
//! - a blank line is skipped,
//! - `// <label>` closes the current group and opens one named `<label>`,
//! - `/// …` lines are suppression markers and are ignored entirely,
//! - anything else is a field declaration; the field name is the text
//!   before the first `:`.
//!
//! Fields declared before the first header form the default group with an
//! empty category name.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Matches the configuration-arguments interface block and captures its body.
static INTERFACE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ms)^export interface ConfigurationArguments extends DebugProtocol\.LaunchRequestArguments \{(.*?)^\}$",
    )
    .expect("static regex must compile")
});

/// Errors raised while parsing the grouping source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GroupingError {
    /// The source contains no configuration-arguments interface block.
    #[error("no configuration arguments interface block found in grouping source")]
    InterfaceBlockNotFound,
}

/// One category of configuration fields.
///
/// The default group — fields declared before the first category header —
/// carries an empty `category` and is rendered as "Common".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeGroup {
    /// Category label, empty for the default group.
    pub category: String,
    /// Field names in declaration order.
    pub fields: Vec<String>,
}

/// Parses the grouping source into category records.
///
/// # Examples
///
/// ```
/// use debug_attributes_docgen::grouping::parse_interface_block;
///
/// let source = "\
/// export interface ConfigurationArguments extends DebugProtocol.LaunchRequestArguments {
///     executable: string;
///
///     // J-Link Specific
///     ipAddress: string;
///     /// suppressed note
///     serialNumber: string;
/// }
/// ";
///
/// let groups = parse_interface_block(source).unwrap();
/// assert_eq!(groups[0].category, "");
/// assert_eq!(groups[0].fields, vec!["executable"]);
/// assert_eq!(groups[1].category, "J-Link Specific");
/// assert_eq!(groups[1].fields, vec!["ipAddress", "serialNumber"]);
/// ```
pub fn parse_interface_block(source: &str) -> Result<Vec<AttributeGroup>, GroupingError> {
    let captures = INTERFACE_BLOCK
        .captures(source)
        .ok_or(GroupingError::InterfaceBlockNotFound)?;
    let body = captures
        .get(1)
        .map(|body| body.as_str())
        .unwrap_or_default();
    Ok(parse_grouped_fields(body))
}

/// Parses the body of an already-located interface block.
pub fn parse_grouped_fields(body: &str) -> Vec<AttributeGroup> {
    let mut groups = vec![AttributeGroup::default()];

    for line in body.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with("///") {
            continue;
        }
        if let Some(label) = line.strip_prefix("// ") {
            groups.push(AttributeGroup {
                category: label.trim().to_string(),
                fields: Vec::new(),
            });
            continue;
        }
        let name = line.split_once(':').map_or(line, |(name, _)| name).trim();
        if !name.is_empty() {
            if let Some(group) = groups.last_mut() {
                group.fields.push(name.to_string());
            }
        }
    }

    groups
}
