//! Core types and layered schema composition for debugger configuration
//! attributes.
//!
//! This crate defines the data model and merge logic behind a debugger
//! extension's declared configuration surface:
//!
//! - [`FragmentStore`] — partial schema contributions keyed by scope
//!   (`common` or a debugger-type name) and request kind.
//! - [`RequestSchema`] — the final `{required, properties}` schema for one
//!   (type, request kind) pair.
//! - [`compose`] — merges the four applicable fragments of every pair and
//!   writes the results into the extension manifest's
//!   `configurationAttributes` slots.
//! - [`validate_store`] — lints a store for duplicate required names, dead
//!   exclusions, and required-but-undescribed fields.
//! - [`manifest`] — read access to an (already composed) manifest for the
//!   documentation and consistency tooling.
//!
//! # Example
//!
//! ```
//! use debug_attributes_core::{FragmentStore, compose, validate_store};
//! use serde_json::json;
//!
//! let store: FragmentStore = serde_json::from_value(json!({
//!     "common": {
//!         "common": {"required": ["executable"], "properties": {
//!             "executable": {"description": "Path of the program to debug"}
//!         }},
//!         "launch": {"required": [], "properties": {
//!             "runToEntryPoint": {"description": "Run to this symbol after launch"}
//!         }}
//!     },
//!     "openocd": {"launch": {"required": ["configFiles"], "properties": {
//!         "configFiles": {"description": "OpenOCD configuration files"}
//!     }}}
//! })).unwrap();
//! assert!(validate_store(&store).is_empty());
//!
//! let mut manifest = json!({"contributes": {"debuggers": [{"type": "openocd"}]}});
//! compose(&store, &mut manifest).unwrap();
//!
//! let launch = &manifest["contributes"]["debuggers"][0]["configurationAttributes"]["launch"];
//! assert_eq!(launch["required"], json!(["executable", "configFiles"]));
//! assert!(launch["properties"]["runToEntryPoint"].is_object());
//! ```

mod compose;
pub mod manifest;
mod types;
mod validate;

pub use compose::{ComposeError, ComposeSummary, compose, composed_schema};
pub use manifest::{ManifestError, RequestProperties};
pub use types::{COMMON_SCOPE, Fragment, FragmentStore, RequestKind, RequestSchema, Scope};
pub use validate::{ValidationError, validate_store};
