//! Read access to the extension manifest.
//!
//! The manifest is handled as an opaque [`serde_json::Value`] so that every
//! key outside `contributes.debuggers[i].configurationAttributes` passes
//! through a read-modify-write cycle untouched. This module provides the
//! navigation helpers shared by the composer and the consistency reporter.

use serde_json::{Map, Value};
use thiserror::Error;

/// Errors raised while navigating the manifest structure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManifestError {
    /// `contributes.debuggers` is missing or not an array.
    #[error("manifest has no contributes.debuggers array")]
    MissingDebuggers,
    /// A debugger descriptor is not a JSON object.
    #[error("debugger descriptor at index {0} is not an object")]
    DescriptorNotObject(usize),
    /// A debugger descriptor has no string `type`.
    #[error("debugger descriptor at index {0} has no string `type`")]
    MissingType(usize),
    /// No descriptor matches the requested primary type.
    #[error("manifest declares no debugger of type '{0}'")]
    UnknownPrimaryType(String),
    /// The manifest declares an empty debugger list.
    #[error("manifest declares no debugger descriptors")]
    NoDescriptors,
}

/// The launch/attach property maps of one debugger descriptor.
///
/// Read from an already-composed manifest for consistency checking and
/// documentation rendering. A missing `configurationAttributes` slot or a
/// missing request entry yields an empty map rather than an error, so a
/// manifest that was never composed can still be inspected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestProperties {
    /// Property descriptors of the merged launch schema.
    pub launch: Map<String, Value>,
    /// Property descriptors of the merged attach schema.
    pub attach: Map<String, Value>,
}

/// Returns the `contributes.debuggers` array.
pub(crate) fn debuggers(manifest: &Value) -> Result<&Vec<Value>, ManifestError> {
    manifest
        .get("contributes")
        .and_then(|contributes| contributes.get("debuggers"))
        .and_then(Value::as_array)
        .ok_or(ManifestError::MissingDebuggers)
}

/// Lists the debugger types declared by the manifest, in declaration order.
///
/// # Examples
///
/// ```
/// use serde_json::json;
///
/// let manifest = json!({"contributes": {"debuggers": [
///     {"type": "openocd"},
///     {"type": "jlink"}
/// ]}});
/// let types = debug_attributes_core::manifest::debugger_types(&manifest).unwrap();
/// assert_eq!(types, vec!["openocd", "jlink"]);
/// ```
pub fn debugger_types(manifest: &Value) -> Result<Vec<String>, ManifestError> {
    let mut types = Vec::new();
    for (index, descriptor) in debuggers(manifest)?.iter().enumerate() {
        if !descriptor.is_object() {
            return Err(ManifestError::DescriptorNotObject(index));
        }
        let dtype = descriptor
            .get("type")
            .and_then(Value::as_str)
            .ok_or(ManifestError::MissingType(index))?;
        types.push(dtype.to_string());
    }
    Ok(types)
}

/// Reads the launch/attach property maps of the primary debugger descriptor.
///
/// `primary` selects a descriptor by type name; `None` selects the first
/// descriptor, which by convention is the extension's main debugger.
///
/// # Examples
///
/// ```
/// use debug_attributes_core::manifest::request_properties;
/// use serde_json::json;
///
/// let manifest = json!({"contributes": {"debuggers": [{
///     "type": "openocd",
///     "configurationAttributes": {
///         "launch": {"required": [], "properties": {"executable": {"description": "d"}}},
///         "attach": {"required": [], "properties": {}}
///     }
/// }]}});
///
/// let properties = request_properties(&manifest, None).unwrap();
/// assert!(properties.launch.contains_key("executable"));
/// assert!(properties.attach.is_empty());
/// ```
pub fn request_properties(
    manifest: &Value,
    primary: Option<&str>,
) -> Result<RequestProperties, ManifestError> {
    let descriptors = debuggers(manifest)?;

    let descriptor = match primary {
        Some(dtype) => descriptors
            .iter()
            .find(|descriptor| descriptor.get("type").and_then(Value::as_str) == Some(dtype))
            .ok_or_else(|| ManifestError::UnknownPrimaryType(dtype.to_string()))?,
        None => descriptors.first().ok_or(ManifestError::NoDescriptors)?,
    };

    let attributes = descriptor.get("configurationAttributes");
    Ok(RequestProperties {
        launch: schema_properties(attributes, "launch"),
        attach: schema_properties(attributes, "attach"),
    })
}

fn schema_properties(attributes: Option<&Value>, request: &str) -> Map<String, Value> {
    attributes
        .and_then(|attributes| attributes.get(request))
        .and_then(|schema| schema.get("properties"))
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default()
}
