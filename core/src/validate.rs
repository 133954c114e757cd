//! Fragment-store validation.
//!
//! Lints the structural invariants of a [`FragmentStore`] before it is used
//! for composition: duplicate `required` names, exclusions that can never
//! match, exclusions declared where they have no effect, and required names
//! left without a property descriptor in the composed output. Findings are
//! advisory for the composer (it will happily merge a store that lints
//! dirty) but the CLI treats them as a gate.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::compose::composed_schema;
use crate::{Fragment, FragmentStore, RequestKind, Scope};

/// A structural finding in a fragment store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A fragment lists the same required name twice.
    #[error("duplicate required field '{field}' in fragment {scope}/{fragment}")]
    DuplicateRequired {
        /// Scope the fragment belongs to.
        scope: String,
        /// Fragment key within the scope (`common`, `launch`, or `attach`).
        fragment: String,
        /// The duplicated field name.
        field: String,
    },
    /// `removeProperties` on the common scope is never applied.
    #[error("removeProperties entry '{0}' on the common scope has no effect")]
    RemoveOnCommonScope(String),
    /// An exclusion names a field no applicable fragment contributes.
    #[error("removeProperties entry '{field}' in scope '{scope}' never matches a contributed property")]
    DeadExclusion {
        /// The type scope declaring the exclusion.
        scope: String,
        /// The excluded field name.
        field: String,
    },
    /// A composed schema requires a field it has no descriptor for.
    ///
    /// Usually the result of `removeProperties` deleting a descriptor whose
    /// name is also listed in `required`. The composer preserves this
    /// behavior; validation only makes it visible.
    #[error("field '{field}' is required for {scope}/{kind} but has no property descriptor")]
    RequiredWithoutDescriptor {
        /// The debugger-type scope.
        scope: String,
        /// The affected request kind.
        kind: RequestKind,
        /// The undescribed required field.
        field: String,
    },
}

/// Validates a fragment store, returning every finding.
///
/// # Examples
///
/// ```
/// use debug_attributes_core::{FragmentStore, ValidationError, validate_store};
/// use serde_json::json;
///
/// let store: FragmentStore = serde_json::from_value(json!({
///     "common": {"common": {"required": ["cwd", "cwd"], "properties": {}}}
/// })).unwrap();
///
/// let findings = validate_store(&store);
/// assert!(matches!(
///     findings[0],
///     ValidationError::DuplicateRequired { ref field, .. } if field == "cwd"
/// ));
/// ```
pub fn validate_store(store: &FragmentStore) -> Vec<ValidationError> {
    let mut findings = Vec::new();

    for (name, scope) in &store.scopes {
        for (fragment_key, fragment) in named_fragments(scope) {
            findings.extend(duplicate_required(name, fragment_key, fragment));
        }
    }

    if let Some(common) = store.common() {
        for field in &common.remove_properties {
            findings.push(ValidationError::RemoveOnCommonScope(field.clone()));
        }
    }

    for (name, scope) in store.type_scopes() {
        findings.extend(dead_exclusions(store, name, scope));
        for kind in RequestKind::ALL {
            let Some(schema) = composed_schema(store, name, kind) else {
                continue;
            };
            for field in &schema.required {
                if !schema.properties.contains_key(field) {
                    findings.push(ValidationError::RequiredWithoutDescriptor {
                        scope: name.to_string(),
                        kind,
                        field: field.clone(),
                    });
                }
            }
        }
    }

    findings
}

fn named_fragments(scope: &Scope) -> impl Iterator<Item = (&'static str, &Fragment)> {
    [
        ("common", scope.common.as_ref()),
        ("launch", scope.launch.as_ref()),
        ("attach", scope.attach.as_ref()),
    ]
    .into_iter()
    .filter_map(|(key, fragment)| fragment.map(|fragment| (key, fragment)))
}

fn duplicate_required(
    scope: &str,
    fragment_key: &'static str,
    fragment: &Fragment,
) -> Vec<ValidationError> {
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    let mut findings = Vec::new();
    for field in &fragment.required {
        if !seen.insert(field) {
            findings.push(ValidationError::DuplicateRequired {
                scope: scope.to_string(),
                fragment: fragment_key.to_string(),
                field: field.clone(),
            });
        }
    }
    findings
}

fn dead_exclusions(store: &FragmentStore, name: &str, scope: &Scope) -> Vec<ValidationError> {
    let mut contributed: BTreeSet<&str> = BTreeSet::new();
    for applicable in [store.common(), Some(scope)].into_iter().flatten() {
        for (_, fragment) in named_fragments(applicable) {
            contributed.extend(fragment.properties.keys().map(String::as_str));
        }
    }

    scope
        .remove_properties
        .iter()
        .filter(|field| !contributed.contains(field.as_str()))
        .map(|field| ValidationError::DeadExclusion {
            scope: name.to_string(),
            field: field.clone(),
        })
        .collect()
}
