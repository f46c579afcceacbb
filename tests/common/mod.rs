#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crudforge::{GenerationConfiguration, GenerationOrchestrator, ManifestSource};

pub const BLOG_SCHEMA: &str = r#"
entities:
  Post:
    table: posts
    primary_key: { name: id, type: integer }
    behaviors: [timestamped, SoftDeletes]
    fillable: [title, body, user_id, published]
    fields:
      - { name: id, type: bigint }
      - { name: title, type: string }
      - { name: body, type: text, nullable: true }
      - { name: user_id, type: integer }
      - { name: published, type: boolean }
      - { name: view_count, type: integer }
      - { name: created_at, type: timestamp, nullable: true }
      - { name: updated_at, type: timestamp, nullable: true }
      - { name: deleted_at, type: timestamp, nullable: true }
    members:
      - { name: author, returns: BelongsTo, related: User }
      - { name: comments, returns: HasMany, related: Comment }
      - { name: scopePublished, parameters: 1, returns: Builder }
      - { name: getExcerptAttribute, returns: string }
  Comment:
    table: comments
    behaviors: [timestamped]
    fields:
      - { name: id, type: integer }
      - { name: post_id, type: integer }
      - { name: contact_email, type: string, nullable: true }
      - { name: body, type: text }
    members:
      - { name: post, returns: BelongsTo, related: Post }
  User:
    table: users
    primary_key: { name: uuid, type: uuid }
    fields:
      - { name: uuid, type: uuid }
      - { name: name, type: string, max_length: 120 }
      - { name: email, type: string }
      - { name: password, type: string }
      - { name: website_url, type: string, nullable: true }
"#;

/// Write the blog schema into `dir` and return its path.
pub fn write_schema(dir: &Path) -> PathBuf {
    let path = dir.join("schema.yaml");
    fs::write(&path, BLOG_SCHEMA).unwrap();
    path
}

pub fn orchestrator(schema: &Path) -> GenerationOrchestrator {
    GenerationOrchestrator::new(Arc::new(ManifestSource::new(schema)))
}

/// Defaults with output under `out`.
pub fn config(out: &Path, kind: &str) -> GenerationConfiguration {
    let mut config = GenerationConfiguration::default();
    config.generation.kind = kind.to_string();
    config.paths.base_path = out.to_path_buf();
    config
}

/// Every file below `root` with its bytes.
pub fn snapshot(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    let mut files = BTreeMap::new();
    if !root.exists() {
        return files;
    }
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        for entry in fs::read_dir(&dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                stack.push(path);
            } else {
                files.insert(path.clone(), fs::read(&path).unwrap());
            }
        }
    }
    files
}
