// Runs the real `git` binary against scratch repositories.

use std::path::Path;
use std::process::Command;

use lsif_upload_core::context::{resolve, UploadOptions};
use lsif_upload_core::contract::Workspace;
use lsif_upload_core::git::GitWorkspace;

fn run_git(repo_dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(repo_dir)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

fn make_git_repo() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    run_git(dir.path(), &["init"]);
    run_git(dir.path(), &["config", "user.name", "test-user"]);
    run_git(dir.path(), &["config", "user.email", "test@example.com"]);
    run_git(dir.path(), &["commit", "--allow-empty", "-m", "initial"]);
    run_git(
        dir.path(),
        &["remote", "add", "origin", "git@github.com:gorilla/mux.git"],
    );
    dir
}

#[test]
fn answers_all_three_queries() {
    let repo = make_git_repo();
    let workspace = GitWorkspace::new(repo.path());

    assert_eq!(
        workspace.origin_url().unwrap(),
        "git@github.com:gorilla/mux.git"
    );

    let sha = workspace.head_commit().unwrap();
    assert_eq!(sha.len(), 40, "SHA should be 40 hex chars, got: {sha}");
    assert!(sha.chars().all(|c| c.is_ascii_hexdigit()));

    let top_level = workspace.top_level().unwrap();
    assert_eq!(
        top_level.canonicalize().unwrap(),
        repo.path().canonicalize().unwrap()
    );
}

#[test]
fn queries_fail_outside_a_repository() {
    let dir = tempfile::tempdir().unwrap();
    let workspace = GitWorkspace::new(dir.path());

    assert!(workspace.head_commit().is_err());
    assert!(workspace.top_level().is_err());
}

#[test]
fn missing_origin_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    run_git(dir.path(), &["init"]);
    let workspace = GitWorkspace::new(dir.path());

    let err = workspace.origin_url().unwrap_err();
    assert!(err.to_string().contains("git remote get-url origin failed"));
}

#[test]
fn resolves_context_from_a_real_repository() {
    let repo = make_git_repo();
    let sub = repo.path().join("cmd").join("project1");
    std::fs::create_dir_all(&sub).unwrap();
    let dump = sub.join("dump.lsif");
    std::fs::write(&dump, b"{}\n").unwrap();

    let workspace = GitWorkspace::new(&sub);
    let options = UploadOptions {
        file: dump,
        ..UploadOptions::default()
    };

    let context = resolve(&options, &workspace).unwrap();

    assert_eq!(context.repository, "github.com/gorilla/mux");
    assert_eq!(context.commit.len(), 40);
    assert_eq!(context.root, "cmd/project1");
}
