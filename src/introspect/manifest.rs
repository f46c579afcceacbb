//! Metadata source backed by a schema manifest file (YAML or JSON).
//!
//! ```yaml
//! entities:
//!   Post:
//!     table: posts
//!     primary_key: { name: id, type: integer }
//!     behaviors: [timestamped, SoftDeletes]
//!     fillable: [title, body, user_id]
//!     fields:
//!       - { name: title, type: string, max_length: 255 }
//!       - { name: body, type: text, nullable: true }
//!       - { name: user_id, type: integer }
//!     members:
//!       - { name: user, returns: BelongsTo, related: User }
//!       - { name: comments, returns: HasMany, related: Comment }
//! ```
//!
//! The file is read on every query.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::source::{EntityMetadata, MemberDecl, SourceError, StructuralMetadataSource};
use super::types::{
    entity_name_from_identifier, FieldDescriptor, FieldType, PrimaryKeyType, DEFAULT_PRIMARY_KEY,
};
use crate::naming;

#[derive(Debug, Deserialize)]
struct ManifestFile {
    #[serde(default)]
    entities: BTreeMap<String, ManifestEntity>,
}

#[derive(Debug, Deserialize)]
struct ManifestEntity {
    #[serde(default)]
    table: Option<String>,
    #[serde(default)]
    primary_key: Option<ManifestPrimaryKey>,
    #[serde(default)]
    behaviors: Vec<String>,
    #[serde(default)]
    fillable: Option<Vec<String>>,
    #[serde(default)]
    fields: Vec<ManifestField>,
    #[serde(default)]
    members: Vec<MemberDecl>,
}

#[derive(Debug, Deserialize)]
struct ManifestPrimaryKey {
    name: String,
    #[serde(rename = "type", default)]
    key_type: PrimaryKeyType,
}

#[derive(Debug, Deserialize)]
struct ManifestField {
    name: String,
    #[serde(rename = "type")]
    field_type: FieldType,
    #[serde(default)]
    nullable: bool,
    #[serde(default)]
    mutable: Option<bool>,
    #[serde(default)]
    max_length: Option<u32>,
}

/// Schema manifest on disk.
#[derive(Debug, Clone)]
pub struct ManifestSource {
    path: PathBuf,
}

impl ManifestSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ManifestSource { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<ManifestFile, SourceError> {
        if !self.path.exists() {
            return Err(SourceError::NotFound);
        }
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| SourceError::Unreadable(format!("{}: {e}", self.path.display())))?;
        let is_yaml = self
            .path
            .extension()
            .map(|s| s == "yaml" || s == "yml")
            .unwrap_or(false);
        let parsed = if is_yaml {
            serde_yaml::from_str(&content).map_err(|e| e.to_string())
        } else {
            serde_json::from_str(&content).map_err(|e| e.to_string())
        };
        parsed.map_err(|e| SourceError::Unreadable(format!("{}: {e}", self.path.display())))
    }
}

fn to_metadata(name: &str, entity: ManifestEntity) -> EntityMetadata {
    let (primary_key_field, primary_key_type) = match entity.primary_key {
        Some(pk) => (pk.name, pk.key_type),
        None => (DEFAULT_PRIMARY_KEY.to_string(), PrimaryKeyType::Integer),
    };
    let fillable = entity.fillable;
    let fields = entity
        .fields
        .into_iter()
        .map(|f| {
            let mutable = match &fillable {
                Some(list) => list.iter().any(|n| n == &f.name),
                None => f.mutable.unwrap_or(true),
            };
            FieldDescriptor {
                name: f.name,
                field_type: f.field_type,
                nullable: f.nullable,
                mutable,
                max_length: f.max_length,
            }
        })
        .collect();
    EntityMetadata {
        name: name.to_string(),
        storage_key: entity
            .table
            .unwrap_or_else(|| naming::to_snake_case(&naming::pluralize(name))),
        primary_key_field,
        primary_key_type,
        fields,
        members: entity.members,
        markers: entity.behaviors,
    }
}

impl StructuralMetadataSource for ManifestSource {
    fn describe_entity(&self, identifier: &str) -> Result<EntityMetadata, SourceError> {
        let mut manifest = self.load()?;
        if let Some(entity) = manifest.entities.remove(identifier) {
            return Ok(to_metadata(identifier, entity));
        }
        let name = entity_name_from_identifier(identifier);
        manifest
            .entities
            .remove(&name)
            .map(|entity| to_metadata(&name, entity))
            .ok_or(SourceError::NotFound)
    }

    fn entities(&self) -> Result<Vec<String>, SourceError> {
        Ok(self.load()?.entities.into_keys().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"
entities:
  Post:
    primary_key: { name: id, type: integer }
    behaviors: [timestamped]
    fillable: [title, body]
    fields:
      - { name: id, type: bigint }
      - { name: title, type: string, max_length: 120 }
      - { name: body, type: text, nullable: true }
      - { name: views, type: integer }
    members:
      - { name: user, returns: BelongsTo, related: User }
"#;

    fn write_manifest(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_yaml_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let source = ManifestSource::new(write_manifest(dir.path(), "schema.yaml", MANIFEST));
        let meta = source.describe_entity("posts").unwrap();
        assert_eq!(meta.name, "Post");
        assert_eq!(meta.storage_key, "posts");
        assert_eq!(meta.fields.len(), 4);
        assert_eq!(meta.fields[1].max_length, Some(120));
        assert!(meta.fields[1].mutable);
        assert!(!meta.fields[3].mutable, "views is not fillable");
        assert_eq!(meta.markers, vec!["timestamped".to_string()]);
        assert_eq!(source.entities().unwrap(), vec!["Post".to_string()]);
    }

    #[test]
    fn test_json_manifest_and_errors() {
        let dir = tempfile::tempdir().unwrap();
        let json = serde_json::json!({
            "entities": { "Tag": { "fields": [ { "name": "label", "type": "string" } ] } }
        });
        let path = write_manifest(dir.path(), "schema.json", &json.to_string());
        let source = ManifestSource::new(path);
        let meta = source.describe_entity("Tag").unwrap();
        assert_eq!(meta.storage_key, "tags");
        assert_eq!(meta.primary_key_field, "id");
        assert_eq!(source.describe_entity("Nope"), Err(SourceError::NotFound));

        let broken = ManifestSource::new(write_manifest(
            dir.path(),
            "broken.yaml",
            "entities: { X: { fields: [ { name: a, type: geometry } ] } }",
        ));
        assert!(matches!(
            broken.describe_entity("X"),
            Err(SourceError::Unreadable(_))
        ));

        let missing = ManifestSource::new(dir.path().join("absent.yaml"));
        assert_eq!(missing.describe_entity("X"), Err(SourceError::NotFound));
    }
}
