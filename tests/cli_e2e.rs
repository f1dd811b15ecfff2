use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

struct Harness {
    /// Holds the config dir and the dev dir for one test.
    temp: TempDir,
}

impl Harness {
    fn new() -> Self {
        let harness = Self {
            temp: TempDir::new().unwrap(),
        };
        fs::create_dir_all(harness.dev_dir()).unwrap();
        harness
    }

    fn config_dir(&self) -> std::path::PathBuf {
        self.temp.path().join("config")
    }

    fn dev_dir(&self) -> std::path::PathBuf {
        self.temp.path().join("dev")
    }

    fn cmd(&self, args: &[&str]) -> Command {
        let mut cmd = Command::cargo_bin("repodirector").unwrap();
        cmd.env("REPODIRECTOR_CONFIG_DIR", self.config_dir());
        cmd.args(args);
        cmd
    }

    /// A local clone under the dev dir with a GitHub origin and staged
    /// files, enough for the registry and the matcher without a network.
    fn make_repo(&self, owner: &str, name: &str, files: &[(&str, &str)]) -> std::path::PathBuf {
        let dir = self.dev_dir().join(owner).join(name);
        fs::create_dir_all(&dir).unwrap();

        let repo = git2::Repository::init(&dir).unwrap();
        repo.remote("origin", &format!("https://github.com/{owner}/{name}.git"))
            .unwrap();

        let mut index = repo.index().unwrap();
        for (rel_path, content) in files {
            let full = dir.join(rel_path);
            if let Some(parent) = full.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&full, content).unwrap();
            index.add_path(Path::new(rel_path)).unwrap();
        }
        index.write().unwrap();

        dir
    }

    fn set_dev_dir(&self) {
        self.cmd(&["config", "set-dev-dir", self.dev_dir().to_str().unwrap()])
            .assert()
            .success();
    }

    fn scan(&self) {
        self.cmd(&["scan"]).assert().success();
    }
}

#[test]
fn test_list_with_empty_registry() {
    let harness = Harness::new();
    harness
        .cmd(&["list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No repositories known"));
}

#[test]
fn test_scan_registers_local_clones() {
    let harness = Harness::new();
    harness.make_repo("acme", "widgets", &[("readme.md", "hello\n")]);
    harness.set_dev_dir();

    harness
        .cmd(&["scan"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 new repositories"));

    harness
        .cmd(&["list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("acme.widgets"));

    // Rescanning finds the same clone, not a duplicate.
    harness
        .cmd(&["scan"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 new repositories"));
}

#[test]
fn test_select_unknown_repo_fails_gracefully() {
    let harness = Harness::new();
    harness
        .cmd(&["select", "acme.ghost"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Unknown repository"));
}

#[test]
fn test_similar_ranking_prefers_identical_files() {
    let harness = Harness::new();
    harness.make_repo("acme", "base", &[("shared.txt", "1\n2\n3\n")]);
    harness.make_repo("acme", "twin", &[("shared.txt", "1\n2\n3\n")]);
    harness.make_repo("acme", "peer", &[("shared.txt", "1\nTWO\n3\n")]);
    harness.set_dev_dir();
    harness.scan();

    harness.cmd(&["select", "acme.base"]).assert().success();

    let output = harness.cmd(&["similar"]).assert().success();
    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    let twin_at = stdout.find("acme.twin").expect("twin listed");
    let peer_at = stdout.find("acme.peer").expect("peer listed");
    assert!(twin_at < peer_at, "identical twin should rank above peer");
}

#[test]
fn test_compare_lists_changed_files_only() {
    let harness = Harness::new();
    harness.make_repo(
        "acme",
        "base",
        &[("same.txt", "x\n"), ("changed.txt", "1\n2\n3\n")],
    );
    harness.make_repo(
        "acme",
        "peer",
        &[("same.txt", "x\n"), ("changed.txt", "1\nTWO\n3\n")],
    );
    harness.set_dev_dir();
    harness.scan();
    harness.cmd(&["select", "acme.base"]).assert().success();

    harness
        .cmd(&["compare", "acme.peer"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("changed.txt")
                .and(predicate::str::contains("2 matched files, 1 identical, 1 differing")),
        );
}

#[test]
fn test_take_right_writes_compare_version_into_base() {
    let harness = Harness::new();
    let base_dir = harness.make_repo("acme", "base", &[("x.txt", "1\n2\n3\n")]);
    harness.make_repo("acme", "peer", &[("x.txt", "1\nTWO\n3\n")]);
    harness.set_dev_dir();
    harness.scan();
    harness.cmd(&["select", "acme.base"]).assert().success();
    harness.cmd(&["compare", "acme.peer"]).assert().success();

    harness
        .cmd(&["take", "right", "0", "--file", "x.txt"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Wrote x.txt to acme.base")
                .and(predicate::str::contains("identical")),
        );

    assert_eq!(
        fs::read_to_string(base_dir.join("x.txt")).unwrap(),
        "1\nTWO\n3"
    );
}

#[test]
fn test_propagate_to_named_targets() {
    let harness = Harness::new();
    harness.make_repo("acme", "base", &[("docs/readme.md", "hello\n")]);
    let t1_dir = harness.make_repo("acme", "t1", &[("docs/readme.md", "old\n")]);
    let t2_dir = harness.make_repo("acme", "t2", &[("other.txt", "x\n")]);
    harness.set_dev_dir();
    harness.scan();
    harness.cmd(&["select", "acme.base"]).assert().success();

    harness
        .cmd(&[
            "propagate",
            "docs/readme.md",
            "--to",
            "acme.t1",
            "--to",
            "acme.t2",
            "-y",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 repositories"));

    assert_eq!(
        fs::read_to_string(t1_dir.join("docs/readme.md")).unwrap(),
        "hello\n"
    );
    assert_eq!(
        fs::read_to_string(t2_dir.join("docs/readme.md")).unwrap(),
        "hello\n"
    );
}

#[test]
fn test_browse_copy_moves_one_sided_file_across() {
    let harness = Harness::new();
    let base_dir = harness.make_repo("acme", "base", &[("only_here.txt", "payload\n")]);
    let peer_dir = harness.make_repo("acme", "peer", &[("other.txt", "x\n")]);
    harness.set_dev_dir();
    harness.scan();
    harness.cmd(&["select", "acme.base"]).assert().success();
    harness.cmd(&["compare", "acme.peer"]).assert().success();

    harness
        .cmd(&["browse"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("only_here.txt").and(predicate::str::contains("base only")),
        );

    harness
        .cmd(&["copy", "only_here.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Copied only_here.txt to acme.peer"));
    assert!(peer_dir.join("only_here.txt").exists());
    assert!(base_dir.join("only_here.txt").exists());

    // Now present on both sides: no action offered.
    harness
        .cmd(&["copy", "only_here.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("present on both sides"));
}

#[test]
fn test_rm_deletes_from_the_side_that_has_it() {
    let harness = Harness::new();
    harness.make_repo("acme", "base", &[("keep.txt", "x\n")]);
    let peer_dir = harness.make_repo("acme", "peer", &[("keep.txt", "x\n"), ("extra.txt", "y\n")]);
    harness.set_dev_dir();
    harness.scan();
    harness.cmd(&["select", "acme.base"]).assert().success();
    harness.cmd(&["compare", "acme.peer"]).assert().success();

    harness
        .cmd(&["rm", "extra.txt", "-y"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted extra.txt from acme.peer"));
    assert!(!peer_dir.join("extra.txt").exists());
}

#[test]
fn test_status_reports_cloned_and_dirty() {
    let harness = Harness::new();
    harness.make_repo("acme", "widgets", &[("a.txt", "a\n")]);
    harness.set_dev_dir();
    harness.scan();

    harness
        .cmd(&["status", "acme.widgets"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dirty"));
}
