use serde::Serialize;

use crate::introspect::{EntityDescriptor, FieldType};

/// Preferred search fields, highest priority first.
pub const PREFERRED_SEARCH_FIELDS: [&str; 5] = ["name", "title", "subject", "description", "email"];

/// Field-name classifications used by index actions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldClassification {
    /// Ordered by [`PREFERRED_SEARCH_FIELDS`]
    pub searchable: Vec<String>,
    pub filterable: Vec<String>,
    pub sortable: Vec<String>,
}

impl FieldClassification {
    /// The single default search field, if any.
    pub fn default_search_field(&self) -> Option<&str> {
        self.searchable.first().map(String::as_str)
    }
}

fn push_unique(list: &mut Vec<String>, name: &str) {
    if !list.iter().any(|n| n == name) {
        list.push(name.to_string());
    }
}

/// Classify an entity's fields as searchable, filterable and sortable.
pub fn classify_fields(entity: &EntityDescriptor) -> FieldClassification {
    let mut searchable = Vec::new();
    for preferred in PREFERRED_SEARCH_FIELDS {
        if entity
            .field(preferred)
            .is_some_and(|f| f.field_type.is_textual())
        {
            searchable.push(preferred.to_string());
        }
    }
    if searchable.is_empty() {
        if let Some(first) = entity
            .fields
            .iter()
            .find(|f| f.mutable && !entity.is_reserved(&f.name))
        {
            searchable.push(first.name.clone());
        }
    }

    let filterable = entity
        .fields
        .iter()
        .filter(|f| {
            matches!(f.field_type, FieldType::Boolean | FieldType::Integer)
                || f.name.ends_with("_id")
        })
        .map(|f| f.name.clone())
        .collect();

    let mut sortable = vec![entity.primary_key_field.clone()];
    for ts in entity.timestamp_fields() {
        push_unique(&mut sortable, &ts);
    }
    for f in entity.fields.iter().filter(|f| f.field_type.is_ordered()) {
        push_unique(&mut sortable, &f.name);
    }

    FieldClassification {
        searchable,
        filterable,
        sortable,
    }
}
