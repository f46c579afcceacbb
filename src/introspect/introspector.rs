use std::collections::BTreeSet;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::relations::discover_relationships;
use super::source::{EntityMetadata, SourceError, StructuralMetadataSource};
use super::types::{Behavior, EntityDescriptor};
use crate::error::GenerationError;
use crate::naming;

/// Builds [`EntityDescriptor`]s from a [`StructuralMetadataSource`].
#[derive(Clone)]
pub struct SchemaIntrospector {
    source: Arc<dyn StructuralMetadataSource>,
    timeout: Option<Duration>,
}

impl SchemaIntrospector {
    pub fn new(source: Arc<dyn StructuralMetadataSource>) -> Self {
        SchemaIntrospector {
            source,
            timeout: None,
        }
    }

    /// Bound queries against remote sources. Local sources ignore the timeout.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Describe an entity.
    ///
    /// # Errors
    ///
    /// - [`GenerationError::EntityNotFound`] when the identifier does not resolve
    /// - [`GenerationError::Introspection`] when metadata cannot be read or breaks invariants
    /// - [`GenerationError::IntrospectionTimeout`] when a remote source does not answer in time
    pub fn describe(&self, identifier: &str) -> Result<EntityDescriptor, GenerationError> {
        let metadata = self.query(identifier)?;
        let descriptor = build_descriptor(metadata);
        descriptor
            .check_invariants()
            .map_err(|message| GenerationError::Introspection {
                entity: identifier.to_string(),
                message,
            })?;
        debug!(
            entity = %descriptor.name,
            fields = descriptor.fields.len(),
            relationships = descriptor.relationships.len(),
            "described entity"
        );
        Ok(descriptor)
    }

    /// Describe an entity, falling back to a degraded descriptor on
    /// recoverable failures. The recovered error is returned alongside so the
    /// caller can report it.
    pub fn describe_or_degraded(
        &self,
        identifier: &str,
    ) -> Result<(EntityDescriptor, Option<GenerationError>), GenerationError> {
        match self.describe(identifier) {
            Ok(descriptor) => Ok((descriptor, None)),
            Err(err) if err.is_recoverable() => {
                warn!(entity = identifier, error = %err, "continuing with degraded descriptor");
                Ok((EntityDescriptor::degraded(identifier), Some(err)))
            }
            Err(err) => Err(err),
        }
    }

    /// Every entity name the source exposes.
    pub fn discover(&self) -> Result<Vec<String>, GenerationError> {
        self.source
            .entities()
            .map_err(|e| GenerationError::Introspection {
                entity: "*".to_string(),
                message: e.to_string(),
            })
    }

    fn query(&self, identifier: &str) -> Result<EntityMetadata, GenerationError> {
        let result = match self.timeout {
            Some(timeout) if self.source.is_remote() => {
                let (tx, rx) = mpsc::channel();
                let source = Arc::clone(&self.source);
                let id = identifier.to_string();
                std::thread::spawn(move || {
                    if tx.send(source.describe_entity(&id)).is_err() {
                        debug!(entity = %id, "metadata answered after the timeout elapsed");
                    }
                });
                rx.recv_timeout(timeout)
                    .map_err(|_| GenerationError::IntrospectionTimeout {
                        entity: identifier.to_string(),
                        timeout,
                    })?
            }
            _ => self.source.describe_entity(identifier),
        };
        result.map_err(|e| match e {
            SourceError::NotFound => GenerationError::EntityNotFound {
                entity: identifier.to_string(),
            },
            SourceError::Unreadable(message) => GenerationError::Introspection {
                entity: identifier.to_string(),
                message,
            },
        })
    }
}

fn build_descriptor(metadata: EntityMetadata) -> EntityDescriptor {
    let mut behaviors = BTreeSet::new();
    for marker in &metadata.markers {
        match Behavior::from_marker(marker) {
            Some(b) => {
                behaviors.insert(b);
            }
            None => debug!(entity = %metadata.name, marker = %marker, "ignoring unknown capability marker"),
        }
    }
    let relationships = discover_relationships(&metadata.name, &metadata.members);
    EntityDescriptor {
        name: naming::to_studly_case(&metadata.name),
        storage_key: metadata.storage_key,
        primary_key_field: metadata.primary_key_field,
        primary_key_type: metadata.primary_key_type,
        fields: metadata.fields,
        relationships,
        behaviors,
        degraded: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::introspect::source::{InMemorySource, MemberDecl};
    use crate::introspect::types::{FieldDescriptor, FieldType, PrimaryKeyType};

    fn post_metadata() -> EntityMetadata {
        EntityMetadata {
            name: "Post".into(),
            storage_key: "posts".into(),
            primary_key_field: "id".into(),
            primary_key_type: PrimaryKeyType::Integer,
            fields: vec![
                FieldDescriptor::new("title", FieldType::String),
                FieldDescriptor::new("deleted_at", FieldType::Datetime).nullable(),
            ],
            members: vec![
                MemberDecl::new("user", "BelongsTo", "User"),
                MemberDecl::new("getSlugAttribute", "string", ""),
            ],
            markers: vec!["timestamped".into(), "Auditable".into()],
        }
    }

    #[test]
    fn test_describe_builds_descriptor() {
        let source = InMemorySource::new();
        source.insert(post_metadata());
        let introspector = SchemaIntrospector::new(Arc::new(source));
        let d = introspector.describe("Post").unwrap();
        assert_eq!(d.relationships.len(), 1);
        assert!(d.is_timestamped());
        // deleted_at column alone does not make the entity soft-deletable
        assert!(!d.is_soft_deletable());
        assert!(!d.degraded);
    }

    #[test]
    fn test_missing_entity_degrades() {
        let introspector = SchemaIntrospector::new(Arc::new(InMemorySource::new()));
        assert!(matches!(
            introspector.describe("Ghost"),
            Err(GenerationError::EntityNotFound { .. })
        ));
        let (d, err) = introspector.describe_or_degraded("Ghost").unwrap();
        assert!(d.degraded);
        assert_eq!(d.name, "Ghost");
        assert!(err.is_some());
    }

    #[test]
    fn test_invariant_violation_is_introspection_error() {
        let mut meta = post_metadata();
        meta.primary_key_field = "uuid".into();
        let source = InMemorySource::new();
        source.insert(meta);
        let introspector = SchemaIntrospector::new(Arc::new(source));
        assert!(matches!(
            introspector.describe("Post"),
            Err(GenerationError::Introspection { .. })
        ));
    }

    #[test]
    fn test_remote_source_times_out() {
        let source = InMemorySource::new().with_latency(Duration::from_millis(300));
        source.insert(post_metadata());
        let introspector =
            SchemaIntrospector::new(Arc::new(source)).with_timeout(Some(Duration::from_millis(20)));
        let err = introspector.describe("Post").unwrap_err();
        assert!(matches!(err, GenerationError::IntrospectionTimeout { .. }));
        assert!(introspector.describe_or_degraded("Post").is_err());
    }
}
