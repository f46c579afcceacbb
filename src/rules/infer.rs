use super::ruleset::{RuleSet, RuleTable, NULLABLE, REQUIRED};
use crate::introspect::{EntityDescriptor, FieldDescriptor, FieldType};
use crate::naming;

/// Length applied to `string` fields that declare no maximum.
pub const DEFAULT_STRING_MAX: u32 = 255;
/// Minimum length for password-like fields.
pub const PASSWORD_MIN: u32 = 8;
/// Token for datetime columns.
pub const DATETIME_FORMAT_TOKEN: &str = "date_format:Y-m-d H:i:s";

fn type_tokens(field: &FieldDescriptor, rules: &mut RuleSet) {
    match field.field_type {
        FieldType::String => {
            rules.push("string");
            rules.push(format!(
                "max:{}",
                field.max_length.unwrap_or(DEFAULT_STRING_MAX)
            ));
        }
        FieldType::Text => {
            rules.push("string");
            if let Some(max) = field.max_length {
                rules.push(format!("max:{max}"));
            }
        }
        FieldType::Integer => rules.push("integer"),
        FieldType::Decimal => rules.push("numeric"),
        FieldType::Boolean => rules.push("boolean"),
        FieldType::Date => rules.push("date"),
        FieldType::Datetime => rules.push(DATETIME_FORMAT_TOKEN),
        FieldType::Json => rules.push("json"),
        FieldType::Uuid => rules.push("uuid"),
    }
}

/// Existence token for a `<prefix>_id` field: `exists:<plural prefix>,id`
pub fn existence_token(field_name: &str) -> Option<String> {
    let prefix = field_name.strip_suffix("_id").filter(|p| !p.is_empty())?;
    let table = naming::to_snake_case(&naming::pluralize(prefix));
    Some(format!("exists:{table},id"))
}

fn name_overlays(field: &FieldDescriptor, rules: &mut RuleSet) {
    let name = field.name.to_ascii_lowercase();
    if name.contains("email") {
        rules.push("email");
    }
    if name.contains("password") {
        rules.push(format!("min:{PASSWORD_MIN}"));
    }
    if name.contains("url") || name.contains("website") || name.contains("link") {
        rules.push("url");
    }
    if let Some(token) = existence_token(&name) {
        rules.push(token);
    }
}

/// Creation rule set for a single field.
pub fn field_rules(field: &FieldDescriptor) -> RuleSet {
    let mut rules = RuleSet::new();
    rules.push(if field.nullable { NULLABLE } else { REQUIRED });
    type_tokens(field, &mut rules);
    name_overlays(field, &mut rules);
    rules
}

/// Derive creation and mutation rules for every input field.
///
/// Reserved fields (primary key, timestamps, soft-delete marker) and fields
/// not open to mass input get no rules. Pure and deterministic.
pub fn infer_rules(entity: &EntityDescriptor) -> RuleTable {
    let mut table = RuleTable::default();
    for field in &entity.fields {
        if entity.is_reserved(&field.name) || !field.mutable {
            continue;
        }
        table.push(field.name.clone(), field_rules(field));
    }
    table
}
