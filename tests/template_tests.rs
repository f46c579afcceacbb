mod common;

use std::fs;

use crudforge::orchestrator::ArtifactStatus;
use crudforge::{DocumentKind, GenerationRequest};
use tempfile::tempdir;

use common::{config, orchestrator, write_schema};

#[test]
fn test_override_template_wins() {
    let dir = tempdir().unwrap();
    let schema = write_schema(dir.path());
    let out = dir.path().join("out");
    let stubs = dir.path().join("stubs");
    fs::create_dir_all(&stubs).unwrap();
    fs::write(
        stubs.join("transformer.stub"),
        "<?php\n// custom {{ class }} for {{ table }}\n",
    )
    .unwrap();

    let mut config = config(&out, "api");
    config.templates.override_dir = Some(stubs);
    let report = orchestrator(&schema).run(&GenerationRequest::new("Post", config));

    assert_eq!(report.count("written"), 4);
    assert_eq!(
        fs::read_to_string(out.join("app/Transformers/PostTransformer.php")).unwrap(),
        "<?php\n// custom PostTransformer for posts\n"
    );
    let controller =
        fs::read_to_string(out.join("app/Http/Controllers/Api/PostController.php")).unwrap();
    assert!(controller.contains("class PostController extends Controller"));
}

#[test]
fn test_override_with_unknown_placeholder_warns() {
    let dir = tempdir().unwrap();
    let schema = write_schema(dir.path());
    let out = dir.path().join("out");
    let stubs = dir.path().join("stubs");
    fs::create_dir_all(&stubs).unwrap();
    fs::write(stubs.join("request.create.stub"), "{{ class }} {{ mystery }}").unwrap();

    let mut config = config(&out, "api");
    config.templates.override_dir = Some(stubs);
    let report = orchestrator(&schema).run(&GenerationRequest::new("Post", config));

    assert_eq!(report.count("written"), 4);
    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].contains("mystery"));
    assert_eq!(
        fs::read_to_string(out.join("app/Http/Requests/Api/StorePostRequest.php")).unwrap(),
        "StorePostRequest {{ mystery }}"
    );
}

#[test]
fn test_missing_template_fails_only_its_artifact() {
    let dir = tempdir().unwrap();
    let schema = write_schema(dir.path());
    let out = dir.path().join("out");
    let stubs = dir.path().join("stubs");
    fs::create_dir_all(&stubs).unwrap();
    fs::write(stubs.join("controller.api.stub"), "<?php // {{ class }}\n").unwrap();

    let mut config = config(&out, "api");
    config.templates.override_dir = Some(stubs);
    config.templates.use_bundled = false;
    let report = orchestrator(&schema).run(&GenerationRequest::new("Post", config));

    assert!(!report.is_failed());
    assert_eq!(report.count("written"), 1);
    assert_eq!(report.count("failed"), 3);
    assert_eq!(report.exit_code(), 1);
    for artifact in &report.artifacts {
        match (&artifact.document, &artifact.status) {
            (DocumentKind::Controller, status) => assert_eq!(status, &ArtifactStatus::Written),
            (_, ArtifactStatus::Failed { error }) => assert_eq!(error.kind(), "TemplateNotFound"),
            (_, other) => panic!("unexpected status {other:?}"),
        }
    }
    assert!(out.join("app/Http/Controllers/Api/PostController.php").exists());
    assert!(!out.join("app/Transformers/PostTransformer.php").exists());
}
