mod common;

use std::fs;
use std::process::Command;

use tempfile::tempdir;

use common::write_schema;

fn crudforge() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_crudforge"));
    cmd.env_remove("CRUDFORGE_KIND")
        .env_remove("CRUDFORGE_FORCE")
        .env_remove("CRUDFORGE_TEMPLATES")
        .env_remove("CRUDFORGE_BASE_PATH");
    cmd
}

#[test]
fn test_cli_generate_writes_artifacts() {
    let dir = tempdir().unwrap();
    let schema = write_schema(dir.path());

    let output = crudforge()
        .current_dir(dir.path())
        .args(["generate", "Post", "--schema"])
        .arg(&schema)
        .args(["--kind", "web", "--middleware", "auth,verified"])
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("✅ Generated controller"));

    let controller =
        fs::read_to_string(dir.path().join("app/Http/Controllers/PostController.php")).unwrap();
    assert!(controller.contains("$this->middleware(['auth', 'verified']);"));
    assert!(dir
        .path()
        .join("app/Http/Requests/StorePostRequest.php")
        .exists());
}

#[test]
fn test_cli_reads_config_file() {
    let dir = tempdir().unwrap();
    let schema = write_schema(dir.path());
    fs::write(
        dir.path().join("crudforge.toml"),
        "[generation]\nkind = \"api\"\nonly = [\"controller\"]\n\n[paths]\nbase_path = \"out\"\n",
    )
    .unwrap();

    let status = crudforge()
        .current_dir(dir.path())
        .args(["generate", "Comment", "--schema"])
        .arg(&schema)
        .status()
        .expect("run cli");
    assert!(status.success());
    assert!(dir
        .path()
        .join("out/app/Http/Controllers/Api/CommentController.php")
        .exists());
    assert!(!dir.path().join("out/app/Http/Requests").exists());
}

#[test]
fn test_cli_invalid_identifier_exits_nonzero() {
    let dir = tempdir().unwrap();
    let schema = write_schema(dir.path());

    let output = crudforge()
        .current_dir(dir.path())
        .args(["generate", "9lives", "--schema"])
        .arg(&schema)
        .output()
        .expect("run cli");
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stdout).contains("failed while validating"));
    assert!(!dir.path().join("app").exists());
}

#[test]
fn test_cli_unknown_kind_in_config_exits_nonzero() {
    let dir = tempdir().unwrap();
    let schema = write_schema(dir.path());

    let status = crudforge()
        .current_dir(dir.path())
        .args(["generate", "Post", "--kind", "graphql", "--schema"])
        .arg(&schema)
        .status()
        .expect("run cli");
    assert_eq!(status.code(), Some(1));
    assert!(!dir.path().join("app").exists());
}

#[test]
fn test_cli_inspect_prints_json() {
    let dir = tempdir().unwrap();
    let schema = write_schema(dir.path());

    let output = crudforge()
        .args(["inspect", "User", "--schema"])
        .arg(&schema)
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["entity"]["name"], "User");
    assert_eq!(json["entity"]["primary_key_field"], "uuid");
}

#[test]
fn test_cli_publish_templates() {
    let dir = tempdir().unwrap();

    let status = crudforge()
        .current_dir(dir.path())
        .args(["publish-templates", "--dir", "stubs"])
        .status()
        .expect("run cli");
    assert!(status.success());
    assert!(dir.path().join("stubs/controller.api.stub").exists());
    assert!(dir.path().join("stubs/transformer.stub").exists());
}
