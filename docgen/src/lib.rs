//! Consistency checking and attribute reference generation.
//!
//! This crate covers everything downstream of the composed extension
//! manifest:
//!
//! - [`grouping`] — parses the authoritative configuration-field listing
//!   into explicit `{category, fields}` records.
//! - [`consistency`] — diffs the attach/launch property sets against an
//!   allow-list of expected divergences and compares shared descriptors.
//! - [`render`] — renders the grouped attribute reference as a markdown
//!   table, keeping schema gaps visible as placeholders.
//!
//! All checks are advisory: a dirty [`ConsistencyReport`] is returned and
//! logged, never raised as an error, and the reference table is rendered
//! regardless.
//!
//! # Example
//!
//! ```
//! use debug_attributes_docgen::consistency::check_manifest;
//! use debug_attributes_docgen::grouping::parse_grouped_fields;
//! use debug_attributes_docgen::render::render_attribute_table;
//! use debug_attributes_core::manifest::request_properties;
//! use serde_json::json;
//!
//! let manifest = json!({"contributes": {"debuggers": [{
//!     "type": "openocd",
//!     "configurationAttributes": {
//!         "launch": {"required": [], "properties": {"device": {"description": "Target device"}}},
//!         "attach": {"required": [], "properties": {"device": {"description": "Target device"}}}
//!     }
//! }]}});
//!
//! let report = check_manifest(&manifest, None, &[]).unwrap();
//! assert!(report.is_clean());
//!
//! let groups = parse_grouped_fields("device: string;\n");
//! let properties = request_properties(&manifest, None).unwrap();
//! let table = render_attribute_table(&groups, &properties.attach, &properties.launch, &[]);
//! assert!(table.contains("| device | Common | Target device |"));
//! ```
//!
//! [`ConsistencyReport`]: consistency::ConsistencyReport

pub mod consistency;
pub mod grouping;
pub mod render;

pub use consistency::{ConsistencyReport, check_consistency, check_manifest};
pub use grouping::{AttributeGroup, GroupingError, parse_interface_block};
pub use render::render_attribute_table;
