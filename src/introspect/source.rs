use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::RwLock;
use std::time::Duration;

use super::types::{FieldDescriptor, PrimaryKeyType};

/// A member declared on an entity (method, accessor, scope, ...).
///
/// Relationship discovery inspects these; the source itself does not decide
/// which members are relationships.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MemberDecl {
    pub name: String,
    /// Number of declared parameters
    #[serde(default)]
    pub parameters: usize,
    /// Declared return capability (`BelongsTo`, `HasMany`, `string`, ...)
    #[serde(default)]
    pub returns: Option<String>,
    /// Target entity for relationship-returning members
    #[serde(default)]
    pub related: Option<String>,
}

impl MemberDecl {
    pub fn new(name: impl Into<String>, returns: impl Into<String>, related: impl Into<String>) -> Self {
        MemberDecl {
            name: name.into(),
            parameters: 0,
            returns: Some(returns.into()),
            related: Some(related.into()),
        }
    }
}

/// Raw structural metadata for one entity as exposed by a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityMetadata {
    pub name: String,
    pub storage_key: String,
    pub primary_key_field: String,
    pub primary_key_type: PrimaryKeyType,
    pub fields: Vec<FieldDescriptor>,
    pub members: Vec<MemberDecl>,
    /// Explicit capability markers (`SoftDeletes`, `timestamped`, ...)
    pub markers: Vec<String>,
}

/// Failure of a metadata source query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The identifier does not resolve to a structural source
    NotFound,
    /// The source exists but could not be read
    Unreadable(String),
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::NotFound => write!(f, "not found"),
            SourceError::Unreadable(msg) => write!(f, "unreadable: {msg}"),
        }
    }
}

impl std::error::Error for SourceError {}

/// Read-only provider of structural metadata.
///
/// One implementation exists per schema backend. The core never mutates the
/// source and never caches its answers.
pub trait StructuralMetadataSource: Send + Sync {
    /// Structural metadata for one entity.
    fn describe_entity(&self, identifier: &str) -> Result<EntityMetadata, SourceError>;

    /// Names of every entity the source knows about, in a stable order.
    fn entities(&self) -> Result<Vec<String>, SourceError>;

    /// Whether queries may block on a remote system (enables timeouts).
    fn is_remote(&self) -> bool {
        false
    }
}

/// Metadata source backed by a map, for embedding and tests.
#[derive(Default)]
pub struct InMemorySource {
    entities: RwLock<BTreeMap<String, EntityMetadata>>,
    latency: Option<Duration>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a remote backend answering after `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn insert(&self, metadata: EntityMetadata) {
        if let Ok(mut map) = self.entities.write() {
            map.insert(metadata.name.clone(), metadata);
        }
    }
}

impl StructuralMetadataSource for InMemorySource {
    fn describe_entity(&self, identifier: &str) -> Result<EntityMetadata, SourceError> {
        if let Some(latency) = self.latency {
            std::thread::sleep(latency);
        }
        let map = self
            .entities
            .read()
            .map_err(|_| SourceError::Unreadable("lock poisoned".to_string()))?;
        let name = super::types::entity_name_from_identifier(identifier);
        map.get(identifier)
            .or_else(|| map.get(&name))
            .cloned()
            .ok_or(SourceError::NotFound)
    }

    fn entities(&self) -> Result<Vec<String>, SourceError> {
        let map = self
            .entities
            .read()
            .map_err(|_| SourceError::Unreadable("lock poisoned".to_string()))?;
        Ok(map.keys().cloned().collect())
    }

    fn is_remote(&self) -> bool {
        self.latency.is_some()
    }
}
