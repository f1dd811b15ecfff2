use std::fs;
use std::path::Path;

use log::warn;

use crate::error::{Error, Result};
use crate::registry::{Registry, RepoName};
use crate::similarity::SimilarityCache;

/// One candidate target for propagation. `preselected` is set when the
/// similarity cache shows the repository already tracks a file at the same
/// relative path, separators normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropagationTarget {
    pub name: RepoName,
    pub preselected: bool,
}

fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

/// Candidate targets for propagating `rel_path` out of `base`: every
/// cached pair for `base`, similar-file repositories first, then by name.
pub fn targets(cache: &SimilarityCache, base: &RepoName, rel_path: &str) -> Vec<PropagationTarget> {
    let wanted = normalize_separators(rel_path);
    let mut targets: Vec<PropagationTarget> = cache
        .pairs_for(base)
        .map(|(other, diffs)| PropagationTarget {
            name: other.clone(),
            preselected: diffs
                .keys()
                .any(|path| normalize_separators(path) == wanted),
        })
        .collect();
    targets.sort_by(|a, b| {
        b.preselected
            .cmp(&a.preselected)
            .then_with(|| a.name.cmp(&b.name))
    });
    targets
}

/// Result of one propagation run. Failures are per-target: one locked or
/// missing destination does not stop the rest, and nothing is rolled back.
#[derive(Debug, Default)]
pub struct PropagationOutcome {
    pub copied: Vec<RepoName>,
    pub failed: Vec<(RepoName, Error)>,
}

/// Copy `base`'s `rel_path` into each selected repository at the same
/// relative path, creating intermediate directories and overwriting any
/// existing file.
pub fn propagate(
    registry: &Registry,
    base: &RepoName,
    rel_path: &str,
    selected: &[RepoName],
) -> Result<PropagationOutcome> {
    let src = registry.get(base)?.local_path.join(rel_path);

    let mut outcome = PropagationOutcome::default();
    for name in selected {
        match copy_to(registry, name, &src, rel_path) {
            Ok(()) => outcome.copied.push(name.clone()),
            Err(err) => {
                warn!("propagation to {name} failed: {err}");
                outcome.failed.push((name.clone(), err));
            }
        }
    }
    Ok(outcome)
}

fn copy_to(registry: &Registry, name: &RepoName, src: &Path, rel_path: &str) -> Result<()> {
    let dst = registry.get(name)?.local_path.join(rel_path);
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent).map_err(|source| Error::FileCopy {
            src: src.to_path_buf(),
            dst: dst.clone(),
            source,
        })?;
    }
    fs::copy(src, &dst).map_err(|source| Error::FileCopy {
        src: src.to_path_buf(),
        dst,
        source,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{Provider, Repository};
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn init_repo(dir: &Path, files: &[(&str, &str)]) {
        let repo = git2::Repository::init(dir).unwrap();
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
    }

    fn repository(name: &str, dir: &Path) -> Repository {
        Repository::new(
            Provider::GitHub {
                owner: "acme".to_string(),
                repo: name.to_string(),
            },
            format!("https://github.com/acme/{name}.git"),
            PathBuf::from(dir),
        )
    }

    fn name(s: &str) -> RepoName {
        RepoName::from(s)
    }

    // T1 has the file at the same relative path, T2 does not: T1 is
    // preselected and sorts first.
    #[test]
    fn test_targets_preselects_repos_with_the_file() {
        let temp = TempDir::new().unwrap();
        let base_dir = temp.path().join("base");
        let t1_dir = temp.path().join("t1");
        let t2_dir = temp.path().join("t2");
        init_repo(&base_dir, &[("docs/readme.md", "hello\n")]);
        init_repo(&t1_dir, &[("docs/readme.md", "hi\n")]);
        init_repo(&t2_dir, &[("other.txt", "x\n")]);

        let mut registry = Registry::default();
        registry.upsert(repository("base", &base_dir));
        registry.upsert(repository("t1", &t1_dir));
        registry.upsert(repository("t2", &t2_dir));

        let mut cache = SimilarityCache::new();
        cache.refresh(&registry, &name("acme.base")).unwrap();

        let targets = targets(&cache, &name("acme.base"), "docs/readme.md");
        assert_eq!(
            targets,
            vec![
                PropagationTarget {
                    name: name("acme.t1"),
                    preselected: true,
                },
                PropagationTarget {
                    name: name("acme.t2"),
                    preselected: false,
                },
            ]
        );
    }

    #[test]
    fn test_target_matching_normalizes_separators() {
        let temp = TempDir::new().unwrap();
        let base_dir = temp.path().join("base");
        let t1_dir = temp.path().join("t1");
        init_repo(&base_dir, &[("docs/readme.md", "hello\n")]);
        init_repo(&t1_dir, &[("docs/readme.md", "hi\n")]);

        let mut registry = Registry::default();
        registry.upsert(repository("base", &base_dir));
        registry.upsert(repository("t1", &t1_dir));

        let mut cache = SimilarityCache::new();
        cache.refresh(&registry, &name("acme.base")).unwrap();

        // Windows-style input still matches the cached `/` paths.
        let targets = targets(&cache, &name("acme.base"), "docs\\readme.md");
        assert!(targets[0].preselected);
    }

    // Propagation copies to every selected target regardless of
    // preselection, and creates intermediate directories.
    #[test]
    fn test_propagate_copies_to_all_selected_targets() {
        let temp = TempDir::new().unwrap();
        let base_dir = temp.path().join("base");
        let t1_dir = temp.path().join("t1");
        let t2_dir = temp.path().join("t2");
        init_repo(&base_dir, &[("docs/readme.md", "hello\n")]);
        init_repo(&t1_dir, &[("docs/readme.md", "old\n")]);
        init_repo(&t2_dir, &[("other.txt", "x\n")]);

        let mut registry = Registry::default();
        registry.upsert(repository("base", &base_dir));
        registry.upsert(repository("t1", &t1_dir));
        registry.upsert(repository("t2", &t2_dir));

        let outcome = propagate(
            &registry,
            &name("acme.base"),
            "docs/readme.md",
            &[name("acme.t1"), name("acme.t2")],
        )
        .unwrap();

        assert_eq!(outcome.copied, vec![name("acme.t1"), name("acme.t2")]);
        assert!(outcome.failed.is_empty());
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
    fn test_propagate_failure_is_per_target() {
        let temp = TempDir::new().unwrap();
        let base_dir = temp.path().join("base");
        let t1_dir = temp.path().join("t1");
        init_repo(&base_dir, &[("readme.md", "hello\n")]);
        init_repo(&t1_dir, &[]);

        // A regular file where the target's root should be makes every
        // write into it fail.
        let blocked = temp.path().join("blocked");
        fs::write(&blocked, b"in the way").unwrap();

        let mut registry = Registry::default();
        registry.upsert(repository("base", &base_dir));
        registry.upsert(repository("t1", &t1_dir));
        registry.upsert(repository("blocked", &blocked));

        let outcome = propagate(
            &registry,
            &name("acme.base"),
            "readme.md",
            &[name("acme.blocked"), name("acme.t1")],
        )
        .unwrap();

        // The unreachable target fails; the other still receives the file.
        assert_eq!(outcome.copied, vec![name("acme.t1")]);
        assert_eq!(outcome.failed.len(), 1);
        assert_eq!(outcome.failed[0].0, name("acme.blocked"));
        assert!(t1_dir.join("readme.md").exists());
    }
}
