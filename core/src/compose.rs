//! Layered composition of configuration-attribute schemas.
//!
//! The composer merges the four applicable fragments of a (debugger type,
//! request kind) pair into one final schema:
//!
//! 1. `common/common` — the shared baseline,
//! 2. `common/<request>` — shared fields specific to one request kind,
//! 3. `<type>/common` — type fields shared by both request kinds,
//! 4. `<type>/<request>` — the most specific layer.
//!
//! `required` names accumulate in first-seen order with later duplicates
//! dropped; `properties` descriptors are replaced wholesale by later layers
//! (no field-level sub-merge). The type scope's `removeProperties` is
//! applied last, to `properties` only — names already collected in
//! `required` survive it.
//!
//! The merge is a pure fold over cloned snapshots of the layer sequence, so
//! composing one pair never mutates a fragment reused by another pair, and
//! composing the same store twice yields identical output.
//!
//! # Example
//!
//! ```
//! use debug_attributes_core::{FragmentStore, compose};
//! use serde_json::json;
//!
//! let store: FragmentStore = serde_json::from_value(json!({
//!     "common": {"common": {"required": ["executable"], "properties": {
//!         "executable": {"description": "Path of the program to debug"}
//!     }}},
//!     "qemu": {"launch": {"required": ["machine"], "properties": {
//!         "machine": {"description": "QEMU machine model"}
//!     }}}
//! })).unwrap();
//!
//! let mut manifest = json!({"contributes": {"debuggers": [{"type": "qemu"}]}});
//! let summary = compose(&store, &mut manifest).unwrap();
//!
//! assert_eq!(summary.composed.len(), 1);
//! let launch = &manifest["contributes"]["debuggers"][0]["configurationAttributes"]["launch"];
//! assert_eq!(launch["required"], json!(["executable", "machine"]));
//! ```

use serde_json::{Map, Value};
use thiserror::Error;

use crate::manifest::{self, ManifestError};
use crate::{Fragment, FragmentStore, RequestKind, RequestSchema, Scope};

/// Errors raised by the composer.
///
/// Any of these aborts composition before the manifest is touched, so a
/// malformed input never produces a half-composed document.
#[derive(Debug, Error)]
pub enum ComposeError {
    /// The manifest structure is not navigable.
    #[error(transparent)]
    Manifest(#[from] ManifestError),
    /// A merged schema failed to serialize.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// What one [`compose`] call did.
#[derive(Debug, Clone, Default)]
pub struct ComposeSummary {
    /// (debugger type, request kind) pairs whose schema was written.
    pub composed: Vec<(String, RequestKind)>,
    /// Debugger types declared in the manifest but absent from the store.
    pub skipped: Vec<String>,
}

/// Composes merged schemas into the manifest's debugger descriptors.
///
/// For every descriptor whose `type` is a key of `store`, the descriptor's
/// `configurationAttributes` slot is replaced with the map of merged
/// schemas keyed by request kind. A request kind is included when either
/// the common scope or the type scope declares a fragment for it. A
/// descriptor whose type has no store entry is left untouched and recorded
/// in [`ComposeSummary::skipped`].
///
/// All descriptors are validated and all schemas merged before the first
/// write to `manifest`.
pub fn compose(
    store: &FragmentStore,
    manifest: &mut Value,
) -> Result<ComposeSummary, ComposeError> {
    let types = manifest::debugger_types(manifest)?;

    let mut summary = ComposeSummary::default();
    let mut replacements: Vec<(usize, Value)> = Vec::new();
    for (index, dtype) in types.iter().enumerate() {
        let Some(scope) = store.scope(dtype) else {
            summary.skipped.push(dtype.clone());
            continue;
        };

        let mut attributes = Map::new();
        for kind in RequestKind::ALL {
            if !request_declared(store, scope, kind) {
                continue;
            }
            let schema = merge_layers(store, scope, kind);
            attributes.insert(kind.to_string(), serde_json::to_value(&schema)?);
            summary.composed.push((dtype.clone(), kind));
        }
        replacements.push((index, Value::Object(attributes)));
    }

    if let Some(descriptors) = manifest
        .get_mut("contributes")
        .and_then(|contributes| contributes.get_mut("debuggers"))
        .and_then(Value::as_array_mut)
    {
        for (index, attributes) in replacements {
            if let Some(Value::Object(descriptor)) = descriptors.get_mut(index) {
                descriptor.insert("configurationAttributes".to_string(), attributes);
            }
        }
    }

    Ok(summary)
}

/// Merges the composed schema for one (type, kind) pair of the store.
///
/// Returns `None` when the store has no scope named `dtype` or when neither
/// the common scope nor the type scope declares a fragment for `kind`.
///
/// # Examples
///
/// ```
/// use debug_attributes_core::{FragmentStore, RequestKind, composed_schema};
/// use serde_json::json;
///
/// let store: FragmentStore = serde_json::from_value(json!({
///     "jlink": {"attach": {"required": ["serialNumber"], "properties": {}}}
/// })).unwrap();
///
/// let schema = composed_schema(&store, "jlink", RequestKind::Attach).unwrap();
/// assert_eq!(schema.required, vec!["serialNumber"]);
/// assert!(composed_schema(&store, "jlink", RequestKind::Launch).is_none());
/// assert!(composed_schema(&store, "stlink", RequestKind::Attach).is_none());
/// ```
pub fn composed_schema(
    store: &FragmentStore,
    dtype: &str,
    kind: RequestKind,
) -> Option<RequestSchema> {
    let scope = store.scope(dtype)?;
    if !request_declared(store, scope, kind) {
        return None;
    }
    Some(merge_layers(store, scope, kind))
}

/// A request kind is present when any request-specific fragment declares it.
fn request_declared(store: &FragmentStore, scope: &Scope, kind: RequestKind) -> bool {
    store
        .common()
        .is_some_and(|common| common.fragment(kind).is_some())
        || scope.fragment(kind).is_some()
}

/// The fixed layer sequence for one (scope, kind) pair, least specific first.
fn layers<'a>(
    store: &'a FragmentStore,
    scope: &'a Scope,
    kind: RequestKind,
) -> [Option<&'a Fragment>; 4] {
    let common = store.common();
    [
        common.and_then(|common| common.common.as_ref()),
        common.and_then(|common| common.fragment(kind)),
        scope.common.as_ref(),
        scope.fragment(kind),
    ]
}

fn merge_layers(store: &FragmentStore, scope: &Scope, kind: RequestKind) -> RequestSchema {
    let mut merged = RequestSchema::default();

    for fragment in layers(store, scope, kind).into_iter().flatten() {
        for name in &fragment.required {
            if !merged.required.iter().any(|existing| existing == name) {
                merged.required.push(name.clone());
            }
        }
        for (name, descriptor) in &fragment.properties {
            merged.properties.insert(name.clone(), descriptor.clone());
        }
    }

    // Exclusions apply to properties only; required names survive, which can
    // leave a schema requiring a field it no longer describes.
    for name in &scope.remove_properties {
        merged.properties.remove(name);
    }

    merged
}
