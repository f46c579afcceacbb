//! Unit tests for CLI commands

use crate::cli::{confirm_entities, inspect_entity, publish_templates, Cli, Commands, OnlyPart};
use crate::planner::OverwritePolicy;
use crate::render::BUNDLED_TEMPLATES;
use clap::Parser;
use std::io::Cursor;
use tempfile::tempdir;

#[test]
fn test_generate_command_with_flags() {
    let cli = Cli::try_parse_from([
        "crudforge",
        "generate",
        "Post",
        "--schema",
        "schema.yaml",
        "--kind",
        "hybrid",
        "--middleware",
        "auth,verified",
        "--no-validators",
        "--force",
        "--dry-run",
        "--only",
        "controller,transformer",
    ])
    .unwrap();

    match cli.command {
        Commands::Generate {
            entity,
            schema,
            kind,
            middleware,
            no_validators,
            no_transformers,
            force,
            dry_run,
            only,
            yes,
            ..
        } => {
            assert_eq!(entity.as_deref(), Some("Post"));
            assert_eq!(schema.to_string_lossy(), "schema.yaml");
            assert_eq!(kind.as_deref(), Some("hybrid"));
            assert_eq!(
                middleware,
                Some(vec!["auth".to_string(), "verified".to_string()])
            );
            assert!(no_validators);
            assert!(!no_transformers);
            assert!(force);
            assert!(dry_run);
            assert_eq!(only, Some(vec![OnlyPart::Controller, OnlyPart::Transformer]));
            assert!(!yes);
        }
        _ => panic!("Expected Generate command"),
    }
}

#[test]
fn test_generate_without_entity() {
    let cli = Cli::try_parse_from(["crudforge", "generate", "-s", "schema.json", "--yes"]).unwrap();
    match cli.command {
        Commands::Generate { entity, yes, .. } => {
            assert!(entity.is_none());
            assert!(yes);
        }
        _ => panic!("Expected Generate command"),
    }
}

#[test]
fn test_schema_is_required() {
    assert!(Cli::try_parse_from(["crudforge", "generate", "Post"]).is_err());
}

#[test]
fn test_unknown_only_part_rejected() {
    assert!(Cli::try_parse_from([
        "crudforge",
        "generate",
        "Post",
        "-s",
        "schema.yaml",
        "--only",
        "policy"
    ])
    .is_err());
}

#[test]
fn test_all_commands_parse() {
    let commands = vec![
        vec!["crudforge", "generate", "Post", "-s", "schema.yaml"],
        vec!["crudforge", "inspect", "Post", "--schema", "schema.yaml"],
        vec!["crudforge", "publish-templates"],
        vec!["crudforge", "publish-templates", "--dir", "stubs", "--force"],
        vec!["crudforge", "--verbose", "inspect", "Post", "-s", "schema.yaml"],
    ];
    for args in commands {
        assert!(Cli::try_parse_from(args.clone()).is_ok(), "failed: {args:?}");
    }
}

#[test]
fn test_confirm_entities() {
    let entities = vec!["Comment".to_string(), "Post".to_string(), "User".to_string()];
    let mut input = Cursor::new("y\nno\n");
    let mut output = Vec::new();
    let accepted = confirm_entities(&entities, false, &mut input, &mut output).unwrap();
    // input ends before the third prompt
    assert_eq!(accepted, vec!["Comment".to_string()]);
    let prompt = String::from_utf8(output).unwrap();
    assert!(prompt.contains("Generate Post? [y/N]"));

    let mut empty = Cursor::new("");
    let mut sink = Vec::new();
    assert_eq!(
        confirm_entities(&entities, true, &mut empty, &mut sink).unwrap(),
        entities
    );
    assert!(sink.is_empty());
}

#[test]
fn test_inspect_entity() {
    let dir = tempdir().unwrap();
    let schema = dir.path().join("schema.yaml");
    std::fs::write(
        &schema,
        r#"
entities:
  Post:
    table: posts
    behaviors: [timestamped]
    fields:
      - { name: title, type: string }
      - { name: user_id, type: integer }
"#,
    )
    .unwrap();
    let output = inspect_entity("Post", &schema).unwrap();
    assert!(output.warnings.is_empty());
    assert_eq!(
        output.rules.creation("user_id").unwrap().to_pipe_string(),
        "required|integer|exists:users,id"
    );
    let json = serde_json::to_value(&output).unwrap();
    assert_eq!(json["entity"]["storage_key"], "posts");

    let missing = inspect_entity("Invoice", &schema).unwrap();
    assert!(missing.entity.degraded);
    assert_eq!(missing.warnings.len(), 1);
}

#[test]
fn test_publish_templates_skips_existing() {
    let dir = tempdir().unwrap();
    assert_eq!(publish_templates(dir.path(), OverwritePolicy::SkipIfExists), 0);
    assert_eq!(
        std::fs::read_dir(dir.path()).unwrap().count(),
        BUNDLED_TEMPLATES.len()
    );
    let edited = dir.path().join("transformer.stub");
    std::fs::write(&edited, "customised").unwrap();
    assert_eq!(publish_templates(dir.path(), OverwritePolicy::SkipIfExists), 0);
    assert_eq!(std::fs::read_to_string(&edited).unwrap(), "customised");
    assert_eq!(publish_templates(dir.path(), OverwritePolicy::Overwrite), 0);
    assert_ne!(std::fs::read_to_string(&edited).unwrap(), "customised");
}
