//! # Schema Introspection
//!
//! Turns an entity identifier into an [`EntityDescriptor`]: ordered fields,
//! primary key, relationships and behaviour flags.
//!
//! Structural metadata comes from a [`StructuralMetadataSource`]. Two adapters
//! ship with the crate:
//!
//! - [`ManifestSource`] reads a YAML or JSON schema manifest
//! - [`InMemorySource`] holds metadata in memory
//!
//! Relationships are discovered from declared members by the conservative rule
//! in [`relations`]; behaviours come only from explicit capability markers.
//!
//! When an entity is missing or unreadable, [`SchemaIntrospector::describe_or_degraded`]
//! returns a degraded descriptor so that scaffolding can still target an
//! entity that does not exist yet.

mod introspector;
mod manifest;
pub mod relations;
mod source;
mod types;

pub use introspector::SchemaIntrospector;
pub use manifest::ManifestSource;
pub use source::{EntityMetadata, InMemorySource, MemberDecl, SourceError, StructuralMetadataSource};
pub use types::{
    entity_name_from_identifier, Behavior, Cardinality, Direction, EntityDescriptor,
    FieldDescriptor, FieldType, PrimaryKeyType, RelationshipDescriptor, DEFAULT_PRIMARY_KEY,
    SOFT_DELETE_FIELD, TIMESTAMP_FIELDS,
};
