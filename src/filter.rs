//! Attribute filtering.

use std::collections::HashSet;

use crate::model::Attributes;

/// Keep only the attributes whose key is in `allowed_keys`.
///
/// Absent attributes behave like an empty map. Kept entries stay in source
/// order; allowed keys missing from the source are simply not present.
pub fn filter_attributes(
    attributes: Option<&Attributes>,
    allowed_keys: &HashSet<String>,
) -> Attributes {
    let Some(attributes) = attributes else {
        return Attributes::new();
    };

    if allowed_keys.is_empty() {
        return Attributes::new();
    }

    attributes
        .iter()
        .filter(|(key, _)| allowed_keys.contains(key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
