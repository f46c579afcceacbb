use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::naming;

/// Column names that never receive generated input rules.
pub const TIMESTAMP_FIELDS: [&str; 2] = ["created_at", "updated_at"];
/// Soft-delete marker column.
pub const SOFT_DELETE_FIELD: &str = "deleted_at";
/// Primary key assumed when the source does not declare one.
pub const DEFAULT_PRIMARY_KEY: &str = "id";

/// Declared storage type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum FieldType {
    String,
    Text,
    Integer,
    Decimal,
    Boolean,
    Date,
    Datetime,
    Json,
    Uuid,
}

impl FieldType {
    /// Parse a type name as declared by a schema backend.
    ///
    /// Common column-type aliases are accepted (`varchar`, `bigint`, `float`,
    /// `timestamp`, ...). Returns `None` for unknown names.
    pub fn parse(s: &str) -> Option<Self> {
        let ty = match s.trim().to_ascii_lowercase().as_str() {
            "string" | "varchar" | "char" => FieldType::String,
            "text" | "mediumtext" | "longtext" => FieldType::Text,
            "integer" | "int" | "bigint" | "smallint" | "tinyint" | "unsignedbiginteger"
            | "biginteger" | "increments" => FieldType::Integer,
            "decimal" | "float" | "double" | "numeric" | "real" => FieldType::Decimal,
            "boolean" | "bool" => FieldType::Boolean,
            "date" => FieldType::Date,
            "datetime" | "timestamp" | "timestamptz" => FieldType::Datetime,
            "json" | "jsonb" => FieldType::Json,
            "uuid" => FieldType::Uuid,
            _ => return None,
        };
        Some(ty)
    }

    /// Canonical lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Text => "text",
            FieldType::Integer => "integer",
            FieldType::Decimal => "decimal",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::Datetime => "datetime",
            FieldType::Json => "json",
            FieldType::Uuid => "uuid",
        }
    }

    /// String-like types (searchable candidates)
    pub fn is_textual(&self) -> bool {
        matches!(self, FieldType::String | FieldType::Text)
    }

    /// Numeric or temporal types (sortable candidates)
    pub fn is_ordered(&self) -> bool {
        matches!(
            self,
            FieldType::Integer | FieldType::Decimal | FieldType::Date | FieldType::Datetime
        )
    }
}

impl TryFrom<String> for FieldType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        FieldType::parse(&value).ok_or_else(|| format!("unknown field type '{value}'"))
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type of the primary key column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimaryKeyType {
    #[default]
    Integer,
    Uuid,
    String,
}

impl PrimaryKeyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimaryKeyType::Integer => "integer",
            PrimaryKeyType::Uuid => "uuid",
            PrimaryKeyType::String => "string",
        }
    }
}

/// One persisted attribute of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub nullable: bool,
    /// Whether the field may be set via mass input
    pub mutable: bool,
    pub max_length: Option<u32>,
}

impl FieldDescriptor {
    /// A non-nullable, mutable field without a length limit.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        FieldDescriptor {
            name: name.into(),
            field_type,
            nullable: false,
            mutable: true,
            max_length: None,
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn immutable(mut self) -> Self {
        self.mutable = false;
        self
    }

    pub fn max_length(mut self, len: u32) -> Self {
        self.max_length = Some(len);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    One,
    Many,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// The related entity holds the reference back to this one
    Owning,
    /// This entity holds the reference to the related one
    Owned,
}

/// A relationship discovered on an entity.
///
/// Only used to decide eager-load lists and nested-resource embedding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationshipDescriptor {
    pub name: String,
    pub cardinality: Cardinality,
    pub direction: Direction,
    pub related_entity: String,
}

/// Behaviour flags detected from explicit capability markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Behavior {
    SoftDeletable,
    Timestamped,
}

impl Behavior {
    /// Map a capability marker to a behaviour.
    ///
    /// Both the normalised names (`soft-deletable`, `timestamped`) and the
    /// trait names a model would declare (`SoftDeletes`, `HasTimestamps`) are
    /// accepted. Column names are never consulted.
    pub fn from_marker(marker: &str) -> Option<Self> {
        match marker.trim() {
            "soft-deletable" | "soft_deletable" | "SoftDeletes" => Some(Behavior::SoftDeletable),
            "timestamped" | "timestamps" | "HasTimestamps" => Some(Behavior::Timestamped),
            _ => None,
        }
    }
}

/// Structural fact sheet for one entity.
///
/// Built once per generation request and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityDescriptor {
    /// Singular, canonical (studly-cased) name
    pub name: String,
    /// Table or collection identifier
    pub storage_key: String,
    pub primary_key_field: String,
    pub primary_key_type: PrimaryKeyType,
    /// Declaration order is preserved
    pub fields: Vec<FieldDescriptor>,
    pub relationships: Vec<RelationshipDescriptor>,
    pub behaviors: BTreeSet<Behavior>,
    /// True when structural data was unavailable and the descriptor is a placeholder
    pub degraded: bool,
}

impl EntityDescriptor {
    /// Descriptor with no structural data, for entities that do not exist yet.
    pub fn degraded(identifier: &str) -> Self {
        let name = entity_name_from_identifier(identifier);
        EntityDescriptor {
            storage_key: naming::to_snake_case(&naming::pluralize(&name)),
            name,
            primary_key_field: DEFAULT_PRIMARY_KEY.to_string(),
            primary_key_type: PrimaryKeyType::Integer,
            fields: Vec::new(),
            relationships: Vec::new(),
            behaviors: BTreeSet::new(),
            degraded: true,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn is_soft_deletable(&self) -> bool {
        self.behaviors.contains(&Behavior::SoftDeletable)
    }

    pub fn is_timestamped(&self) -> bool {
        self.behaviors.contains(&Behavior::Timestamped)
    }

    /// Primary key, timestamps and the soft-delete marker.
    pub fn is_reserved(&self, field: &str) -> bool {
        field == self.primary_key_field
            || field == DEFAULT_PRIMARY_KEY
            || field == SOFT_DELETE_FIELD
            || TIMESTAMP_FIELDS.contains(&field)
    }

    /// Timestamp columns the entity actually carries, in canonical order.
    ///
    /// A timestamped entity always has both columns even if the source does
    /// not list them as fields.
    pub fn timestamp_fields(&self) -> Vec<String> {
        TIMESTAMP_FIELDS
            .iter()
            .filter(|ts| self.is_timestamped() || self.field(ts).is_some())
            .map(|ts| ts.to_string())
            .collect()
    }

    /// Check the structural invariants: unique field and relationship names,
    /// and a declared primary key unless it is the synthetic default.
    pub fn check_invariants(&self) -> Result<(), String> {
        let mut seen = BTreeSet::new();
        for f in &self.fields {
            if !seen.insert(f.name.as_str()) {
                return Err(format!("duplicate field '{}'", f.name));
            }
        }
        let mut seen = BTreeSet::new();
        for r in &self.relationships {
            if !seen.insert(r.name.as_str()) {
                return Err(format!("duplicate relationship '{}'", r.name));
            }
        }
        if self.primary_key_field != DEFAULT_PRIMARY_KEY
            && self.field(&self.primary_key_field).is_none()
        {
            return Err(format!(
                "primary key '{}' is not a declared field",
                self.primary_key_field
            ));
        }
        Ok(())
    }
}

/// Canonical entity name from an identifier such as `posts`, `Admin/BlogPost`
/// or `App\Models\Post`: last path segment, singular, studly-cased.
pub fn entity_name_from_identifier(identifier: &str) -> String {
    let last = identifier
        .rsplit(['/', '\\'])
        .find(|s| !s.is_empty())
        .unwrap_or(identifier);
    naming::to_studly_case(&naming::singularize(last))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_type_aliases() {
        assert_eq!(FieldType::parse("varchar"), Some(FieldType::String));
        assert_eq!(FieldType::parse("BIGINT"), Some(FieldType::Integer));
        assert_eq!(FieldType::parse("timestamp"), Some(FieldType::Datetime));
        assert_eq!(FieldType::parse("float"), Some(FieldType::Decimal));
        assert_eq!(FieldType::parse("geometry"), None);
    }

    #[test]
    fn test_degraded_descriptor() {
        let d = EntityDescriptor::degraded("Admin/BlogPost");
        assert_eq!(d.name, "BlogPost");
        assert_eq!(d.storage_key, "blog_posts");
        assert_eq!(d.primary_key_field, "id");
        assert!(d.fields.is_empty());
        assert!(d.degraded);
        assert!(d.check_invariants().is_ok());
    }

    #[test]
    fn test_invariants() {
        let mut d = EntityDescriptor::degraded("Post");
        d.primary_key_field = "uuid".into();
        assert!(d.check_invariants().is_err());
        d.fields.push(FieldDescriptor::new("uuid", FieldType::Uuid));
        assert!(d.check_invariants().is_ok());
        d.fields.push(FieldDescriptor::new("uuid", FieldType::Uuid));
        assert!(d.check_invariants().is_err());
    }

    #[test]
    fn test_behavior_markers_are_explicit() {
        assert_eq!(
            Behavior::from_marker("SoftDeletes"),
            Some(Behavior::SoftDeletable)
        );
        assert_eq!(Behavior::from_marker("deleted_at"), None);
    }

    #[test]
    fn test_entity_name_from_identifier() {
        assert_eq!(entity_name_from_identifier("posts"), "Post");
        assert_eq!(entity_name_from_identifier("App\\Models\\Post"), "Post");
        assert_eq!(entity_name_from_identifier("blog_post"), "BlogPost");
    }
}
