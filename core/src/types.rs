//! Data model for the layered configuration-attribute fragment store.
//!
//! This module defines the types that describe partial schema contributions
//! and the merged schemas produced from them. The types are designed for
//! serialization with [`serde`] and round-trip through JSON (and YAML via
//! the CLI) without loss.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Name of the shared scope every debugger type inherits from.
pub const COMMON_SCOPE: &str = "common";

/// The two ways a debugging session can start.
///
/// Serialized lowercase, matching the request strings used in launch
/// configuration files and in the extension manifest.
///
/// # Examples
///
/// ```
/// use debug_attributes_core::RequestKind;
///
/// assert_eq!(RequestKind::Launch.as_str(), "launch");
/// let json = serde_json::to_string(&RequestKind::Attach).unwrap();
/// assert_eq!(json, "\"attach\"");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestKind {
    /// Start a fresh debug session against a newly loaded program.
    Launch,
    /// Attach to an already running target.
    Attach,
}

impl RequestKind {
    /// Both request kinds, in merge order.
    pub const ALL: [RequestKind; 2] = [RequestKind::Launch, RequestKind::Attach];

    /// Returns the lowercase request string.
    pub fn as_str(self) -> &'static str {
        match self {
            RequestKind::Launch => "launch",
            RequestKind::Attach => "attach",
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One partial schema contribution.
///
/// A fragment lists the field names that become mandatory and maps field
/// names to opaque property descriptors. A descriptor carries at least a
/// `description` string; any further metadata (type, enum, default) passes
/// through the composer uninterpreted.
///
/// Both fields are mandatory in the serialized form: a fragment missing
/// either one is rejected during deserialization rather than merged
/// partially.
///
/// # Examples
///
/// ```
/// use debug_attributes_core::Fragment;
///
/// let fragment: Fragment = serde_json::from_str(
///     r#"{"required": ["executable"], "properties": {"executable": {"description": "Path of the program"}}}"#,
/// ).unwrap();
/// assert_eq!(fragment.required, vec!["executable"]);
/// assert!(fragment.properties.contains_key("executable"));
///
/// // Missing `properties` is a fatal input error, not an empty fragment.
/// assert!(serde_json::from_str::<Fragment>(r#"{"required": []}"#).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Fragment {
    /// Field names this fragment makes mandatory, in declaration order.
    pub required: Vec<String>,
    /// Property descriptors keyed by field name.
    pub properties: Map<String, Value>,
}

/// All fragments contributed by one scope of the store.
///
/// A scope is either the shared [`COMMON_SCOPE`] or a debugger-type name.
/// Each scope may contribute a `common` fragment (applied to both request
/// kinds), a `launch` fragment, and an `attach` fragment. A debugger-type
/// scope may additionally declare `removeProperties`, field names excluded
/// from that type's final schemas regardless of which layer contributed
/// them.
///
/// # Examples
///
/// ```
/// use debug_attributes_core::{RequestKind, Scope};
///
/// let scope: Scope = serde_json::from_str(
///     r#"{"launch": {"required": [], "properties": {}}, "removeProperties": ["cwd"]}"#,
/// ).unwrap();
/// assert!(scope.fragment(RequestKind::Launch).is_some());
/// assert!(scope.fragment(RequestKind::Attach).is_none());
/// assert_eq!(scope.remove_properties, vec!["cwd"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scope {
    /// Fragment applied to both request kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub common: Option<Fragment>,
    /// Fragment applied to launch schemas only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub launch: Option<Fragment>,
    /// Fragment applied to attach schemas only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attach: Option<Fragment>,
    /// Field names excluded from this type's final schemas.
    ///
    /// Only meaningful on a debugger-type scope; validation flags it on the
    /// common scope.
    #[serde(
        default,
        rename = "removeProperties",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub remove_properties: Vec<String>,
}

impl Scope {
    /// Returns the request-specific fragment for `kind`, if declared.
    pub fn fragment(&self, kind: RequestKind) -> Option<&Fragment> {
        match kind {
            RequestKind::Launch => self.launch.as_ref(),
            RequestKind::Attach => self.attach.as_ref(),
        }
    }
}

/// The layered fragment store.
///
/// Maps scope names (the literal [`COMMON_SCOPE`] or debugger-type names)
/// to the fragments each scope contributes. The store is the single input
/// of the composer; it is never written back.
///
/// # Examples
///
/// ```
/// use debug_attributes_core::FragmentStore;
///
/// let store: FragmentStore = serde_json::from_str(r#"{
///     "common": {"common": {"required": ["executable"], "properties": {}}},
///     "openocd": {"launch": {"required": [], "properties": {}}}
/// }"#).unwrap();
///
/// assert!(store.common().is_some());
/// assert!(store.scope("openocd").is_some());
/// assert_eq!(store.type_scopes().count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FragmentStore {
    /// Scopes keyed by name.
    pub scopes: BTreeMap<String, Scope>,
}

impl FragmentStore {
    /// Returns the shared common scope, if declared.
    pub fn common(&self) -> Option<&Scope> {
        self.scopes.get(COMMON_SCOPE)
    }

    /// Returns the scope named `name`, if declared.
    pub fn scope(&self, name: &str) -> Option<&Scope> {
        self.scopes.get(name)
    }

    /// Iterates over the debugger-type scopes, excluding [`COMMON_SCOPE`].
    pub fn type_scopes(&self) -> impl Iterator<Item = (&str, &Scope)> {
        self.scopes
            .iter()
            .filter(|(name, _)| name.as_str() != COMMON_SCOPE)
            .map(|(name, scope)| (name.as_str(), scope))
    }
}

/// The merged `{required, properties}` schema for one (type, request) pair.
///
/// Invariants upheld by the composer: `required` contains every name from
/// all contributing fragments exactly once, in first-seen order across the
/// layer sequence; `properties` keys are the union of the layers' property
/// keys minus the type's `removeProperties`.
///
/// Note that a name removed via `removeProperties` is *not* pruned from
/// `required`, so a schema may require a field that has no descriptor.
/// Validation surfaces these; the composer deliberately does not.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestSchema {
    /// Mandatory field names, first-seen order.
    pub required: Vec<String>,
    /// Property descriptors keyed by field name.
    pub properties: Map<String, Value>,
}
