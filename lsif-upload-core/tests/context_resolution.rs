use std::fs;
use std::path::PathBuf;

use lsif_upload_core::context::{normalize_root, resolve, UploadOptions};
use lsif_upload_core::contract::MockWorkspace;
use lsif_upload_core::error::{Classification, UploadError};
use tempfile::{tempdir, TempDir};

const COMMIT: &str = "0123456789abcdef0123456789abcdef01234567";

/// A fake repository with `cmd/project1/dump.lsif` inside it.
fn repo_with_dump() -> (TempDir, PathBuf) {
    let repo = tempdir().unwrap();
    let dir = repo.path().join("cmd").join("project1");
    fs::create_dir_all(&dir).unwrap();
    let dump = dir.join("dump.lsif");
    fs::write(&dump, b"{\"id\":1,\"type\":\"vertex\",\"label\":\"metaData\"}\n").unwrap();
    (repo, dump)
}

fn workspace_for(repo: &TempDir) -> MockWorkspace {
    let top_level = repo.path().to_path_buf();
    let mut workspace = MockWorkspace::new();
    workspace
        .expect_origin_url()
        .returning(|| Ok("git@github.com:gorilla/mux.git".to_string()));
    workspace
        .expect_head_commit()
        .returning(|| Ok(COMMIT.to_string()));
    workspace
        .expect_top_level()
        .returning(move || Ok(top_level.clone()));
    workspace
}

#[test]
fn resolves_everything_from_the_workspace() {
    let (repo, dump) = repo_with_dump();
    let workspace = workspace_for(&repo);
    let options = UploadOptions {
        file: dump.clone(),
        ..UploadOptions::default()
    };

    let context = resolve(&options, &workspace).expect("context should resolve");

    assert_eq!(context.repository, "github.com/gorilla/mux");
    assert_eq!(context.commit, COMMIT);
    assert_eq!(context.dump_file, dump);
    assert_eq!(context.root, "cmd/project1");
    assert_eq!(context.github_token, None);
    assert_eq!(context.indexer_name, None);
}

#[test]
fn explicit_values_skip_workspace_queries() {
    let (_repo, dump) = repo_with_dump();
    let mut workspace = MockWorkspace::new();
    workspace.expect_origin_url().never();
    workspace.expect_head_commit().never();
    workspace.expect_top_level().never();

    let options = UploadOptions {
        repo: Some("example.com/foo".to_string()),
        commit: Some("bar".to_string()),
        file: dump,
        root: Some("lib/".to_string()),
        github_token: Some("gh-token".to_string()),
        indexer_name: Some("lsif-elixir".to_string()),
        ..UploadOptions::default()
    };

    let context = resolve(&options, &workspace).expect("context should resolve");

    assert_eq!(context.repository, "example.com/foo");
    assert_eq!(context.commit, "bar");
    assert_eq!(context.root, "lib");
    assert_eq!(context.github_token.as_deref(), Some("gh-token"));
    assert_eq!(context.indexer_name.as_deref(), Some("lsif-elixir"));
}

#[test]
fn empty_repo_and_commit_are_derived() {
    let (repo, dump) = repo_with_dump();
    let workspace = workspace_for(&repo);
    let options = UploadOptions {
        repo: Some(String::new()),
        commit: Some(String::new()),
        file: dump,
        root: Some(String::new()),
        ..UploadOptions::default()
    };

    let context = resolve(&options, &workspace).unwrap();

    assert_eq!(context.repository, "github.com/gorilla/mux");
    assert_eq!(context.commit, COMMIT);
    assert_eq!(context.root, "", "an explicit empty root is the repository root");
}

#[test]
fn dump_at_top_level_has_empty_root() {
    let repo = tempdir().unwrap();
    let dump = repo.path().join("dump.lsif");
    fs::write(&dump, b"\n").unwrap();
    let workspace = workspace_for(&repo);
    let options = UploadOptions {
        file: dump,
        ..UploadOptions::default()
    };

    let context = resolve(&options, &workspace).unwrap();
    assert_eq!(context.root, "");
}

#[test]
fn failing_remote_query_is_a_resolution_error() {
    let (_repo, dump) = repo_with_dump();
    let mut workspace = MockWorkspace::new();
    workspace
        .expect_origin_url()
        .returning(|| Err("fatal: not a git repository".into()));
    let options = UploadOptions {
        file: dump,
        ..UploadOptions::default()
    };

    let err = resolve(&options, &workspace).unwrap_err();

    assert_eq!(err.classification(), Classification::Resolution);
    let message = err.to_string();
    assert!(message.contains("not a git repository"), "{message}");
    assert!(message.contains("--repo"), "{message}");
}

#[test]
fn unrecognized_remote_is_a_resolution_error() {
    let (_repo, dump) = repo_with_dump();
    let mut workspace = MockWorkspace::new();
    workspace
        .expect_origin_url()
        .returning(|| Ok("/srv/git/mux.git".to_string()));
    let options = UploadOptions {
        file: dump,
        ..UploadOptions::default()
    };

    let err = resolve(&options, &workspace).unwrap_err();

    assert_eq!(err.classification(), Classification::Resolution);
    assert!(err.to_string().contains("unrecognized remote URL: /srv/git/mux.git"));
}

#[test]
fn failing_commit_query_is_a_resolution_error() {
    let (_repo, dump) = repo_with_dump();
    let mut workspace = MockWorkspace::new();
    workspace
        .expect_head_commit()
        .returning(|| Err("fatal: ambiguous argument 'HEAD'".into()));
    let options = UploadOptions {
        repo: Some("example.com/foo".to_string()),
        file: dump,
        ..UploadOptions::default()
    };

    let err = resolve(&options, &workspace).unwrap_err();
    assert_eq!(err.classification(), Classification::Resolution);
    assert!(err.to_string().contains("--commit"));
}

#[test]
fn missing_dump_file_is_not_found() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope.lsif");
    let mut workspace = MockWorkspace::new();
    workspace.expect_top_level().never();
    let options = UploadOptions {
        repo: Some("example.com/foo".to_string()),
        commit: Some("bar".to_string()),
        file: missing.clone(),
        ..UploadOptions::default()
    };

    let err = resolve(&options, &workspace).unwrap_err();

    assert_eq!(err.classification(), Classification::NotFound);
    assert!(matches!(err, UploadError::DumpNotFound(ref path) if *path == missing));
}

#[test]
fn failing_top_level_query_is_a_resolution_error() {
    let (_repo, dump) = repo_with_dump();
    let mut workspace = MockWorkspace::new();
    workspace
        .expect_top_level()
        .returning(|| Err("fatal: not a git repository".into()));
    let options = UploadOptions {
        repo: Some("example.com/foo".to_string()),
        commit: Some("bar".to_string()),
        file: dump,
        ..UploadOptions::default()
    };

    let err = resolve(&options, &workspace).unwrap_err();
    assert_eq!(err.classification(), Classification::Resolution);
    assert!(err.to_string().contains("--root"));
}

#[test]
fn dump_outside_top_level_is_rejected() {
    let (_repo, dump) = repo_with_dump();
    let elsewhere = tempdir().unwrap();
    let top_level = elsewhere.path().to_path_buf();
    let mut workspace = MockWorkspace::new();
    workspace
        .expect_top_level()
        .returning(move || Ok(top_level.clone()));
    let options = UploadOptions {
        repo: Some("example.com/foo".to_string()),
        commit: Some("bar".to_string()),
        file: dump,
        ..UploadOptions::default()
    };

    let err = resolve(&options, &workspace).unwrap_err();
    assert_eq!(err.classification(), Classification::Validation);
}

#[test]
fn explicit_root_escaping_repository_is_rejected() {
    let (_repo, dump) = repo_with_dump();
    let workspace = MockWorkspace::new();
    let options = UploadOptions {
        repo: Some("example.com/foo".to_string()),
        commit: Some("bar".to_string()),
        file: dump,
        root: Some("../sibling".to_string()),
        ..UploadOptions::default()
    };

    let err = resolve(&options, &workspace).unwrap_err();

    assert_eq!(err.classification(), Classification::Validation);
    assert_eq!(
        err.to_string(),
        "--root is outside the repository: ../sibling"
    );
}

#[test]
fn normalize_root_cases() {
    assert_eq!(normalize_root(".").unwrap(), "");
    assert_eq!(normalize_root("/").unwrap(), "");
    assert_eq!(normalize_root("").unwrap(), "");
    assert_eq!(normalize_root("./cmd/").unwrap(), "cmd");
    assert_eq!(normalize_root("cmd/../lib").unwrap(), "lib");
    assert_eq!(normalize_root("..foo").unwrap(), "..foo");
    assert!(normalize_root("..").is_err());
    assert!(normalize_root("../x").is_err());
    assert!(normalize_root("cmd/../../x").is_err());
}
