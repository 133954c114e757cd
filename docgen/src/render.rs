//! Markdown rendering of the attribute reference table.

use serde_json::{Map, Value};

use crate::grouping::AttributeGroup;

/// Internal-only fields omitted from the generated reference.
pub const DEFAULT_DOC_SKIP: &[&str] = &[
    "extensionPath",
    "flattenAnonymous",
    "registerUseNaturalFormat",
    "variableUseNaturalFormat",
    "toolchainPath",
];

/// Rendered when a descriptor exists but carries no `description` string.
pub const UNKNOWN_DESCRIPTION: &str = "(unknown)";

/// Rendered when a grouped field has no descriptor in either schema.
///
/// Gaps are kept visible in the generated artifact instead of being
/// silently dropped.
pub const MISSING_PLACEHOLDER: &str = "????";

/// Fixed prose emitted ahead of the table.
const PREAMBLE: &str = "\
This file lists the configuration attributes recognized in launch.json, \
grouped by the GDB server type they apply to.

Attributes described as (unknown) carry no description in the generated \
schema; ???? marks attributes listed here that the schema does not declare \
at all.

";

/// Renders the attribute reference table.
///
/// Groups are ordered by raw category name (the default group's empty name
/// sorts first and is displayed as `Common`); fields are sorted within each
/// group and looked up in the union of the attach/launch descriptors, with
/// the launch side winning on overlap. Fields on the `skip` deny-list are
/// omitted.
///
/// # Examples
///
/// ```
/// use debug_attributes_docgen::grouping::AttributeGroup;
/// use debug_attributes_docgen::render::render_attribute_table;
/// use serde_json::json;
///
/// let groups = vec![
///     AttributeGroup { category: String::new(), fields: vec!["x".into()] },
///     AttributeGroup { category: "Cat".into(), fields: vec!["y".into()] },
/// ];
/// let properties = json!({
///     "x": {"description": "d1"},
///     "y": {"description": "d2"}
/// });
/// let empty = serde_json::Map::new();
///
/// let table = render_attribute_table(&groups, properties.as_object().unwrap(), &empty, &[]);
/// let x_row = table.find("| x | Common | d1 |").unwrap();
/// let y_row = table.find("| y | Cat | d2 |").unwrap();
/// assert!(x_row < y_row);
/// ```
pub fn render_attribute_table(
    groups: &[AttributeGroup],
    attach: &Map<String, Value>,
    launch: &Map<String, Value>,
    skip: &[&str],
) -> String {
    let mut union: Map<String, Value> = attach.clone();
    for (name, descriptor) in launch {
        union.insert(name.clone(), descriptor.clone());
    }

    let mut ordered: Vec<&AttributeGroup> = groups.iter().collect();
    ordered.sort_by(|a, b| a.category.cmp(&b.category));

    let mut out = String::from(PREAMBLE);
    out.push_str("| Attribute | Applies To | Description |\n");
    out.push_str("| --------- | ---------- | ----------- |\n");

    for group in ordered {
        let applies_to = if group.category.is_empty() {
            "Common"
        } else {
            group.category.as_str()
        };

        let mut fields: Vec<&String> = group
            .fields
            .iter()
            .filter(|field| !skip.contains(&field.as_str()))
            .collect();
        fields.sort();

        for field in fields {
            let description = match union.get(field.as_str()) {
                Some(descriptor) => descriptor
                    .get("description")
                    .and_then(Value::as_str)
                    .unwrap_or(UNKNOWN_DESCRIPTION),
                None => MISSING_PLACEHOLDER,
            };
            out.push_str(&format!("| {field} | {applies_to} | {description} |\n"));
        }
    }

    out
}
