use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use log::warn;

use crate::diff::{diff_text, DiffResult};
use crate::error::Result;
use crate::registry::{probe, Registry, RepoName, Repository};

/// Files tracked by both repositories: the intersection of the two index
/// listings. Fails if either side is not a valid clone.
pub fn match_files(repo_a: &Repository, repo_b: &Repository) -> Result<BTreeSet<String>> {
    let files_a = probe::tracked_files(&repo_a.local_path)?;
    let files_b = probe::tracked_files(&repo_b.local_path)?;
    Ok(files_a.intersection(&files_b).cloned().collect())
}

// A tracked file can disappear from disk mid-operation; treat it as empty
// so the diff degrades to wholly added/removed instead of aborting.
fn read_tracked(root: &Path, rel_path: &str) -> String {
    fs::read_to_string(root.join(rel_path)).unwrap_or_default()
}

/// Diff every matched file between two repositories.
pub fn diff_repos(
    repo_a: &Repository,
    repo_b: &Repository,
) -> Result<BTreeMap<String, DiffResult>> {
    let mut diffs = BTreeMap::new();
    for rel_path in match_files(repo_a, repo_b)? {
        let old = read_tracked(&repo_a.local_path, &rel_path);
        let new = read_tracked(&repo_b.local_path, &rel_path);
        diffs.insert(rel_path, diff_text(&old, &new));
    }
    Ok(diffs)
}

/// Point-wise re-diff of one file, used after a mutation. Returns the
/// empty sentinel when either side is not a valid clone.
pub fn diff_single_file(repo_a: &Repository, repo_b: &Repository, rel_path: &str) -> DiffResult {
    if !probe::is_cloned(&repo_a.local_path) || !probe::is_cloned(&repo_b.local_path) {
        return DiffResult::empty();
    }
    let old = read_tracked(&repo_a.local_path, rel_path);
    let new = read_tracked(&repo_b.local_path, rel_path);
    diff_text(&old, &new)
}

/// Ranked entry in the similar-repositories view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimilarRepo {
    pub name: RepoName,
    pub score: u32,
    pub matched_files: usize,
    pub exact_duplicates: usize,
}

/// One row in the compared-files view: a file that differs between the
/// pair, with its changed-line counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedFile {
    pub path: String,
    pub deleted: usize,
    pub inserted: usize,
}

/// Cached pairwise diffs, keyed by `(base, other)`.
///
/// A derived store: populated by `refresh`, narrowed by `refresh_file`,
/// never persisted. Keeping the cache outside the repository records means
/// invalidation is explicit key removal, not entity mutation.
#[derive(Debug, Default)]
pub struct SimilarityCache {
    entries: BTreeMap<(RepoName, RepoName), BTreeMap<String, DiffResult>>,
}

impl SimilarityCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute diffs from `base` to every other registry repository.
    ///
    /// Stale pairs for `base` are pruned first, so repositories removed
    /// from the registry cannot linger in rankings. A pair that cannot be
    /// matched (either side unclonable) keeps an empty entry: it shows
    /// zero matches rather than failing the refresh.
    pub fn refresh(&mut self, registry: &Registry, base: &RepoName) -> Result<()> {
        self.refresh_with(registry, base, |_| {})
    }

    /// `refresh` with a per-pair progress callback.
    pub fn refresh_with(
        &mut self,
        registry: &Registry,
        base: &RepoName,
        mut progress: impl FnMut(&RepoName),
    ) -> Result<()> {
        let base_repo = registry.get(base)?;
        self.entries.retain(|(cached_base, _), _| cached_base != base);

        for (other_name, other_repo) in registry.iter() {
            if other_name == base {
                continue;
            }
            progress(other_name);
            let diffs = match diff_repos(base_repo, other_repo) {
                Ok(diffs) => diffs,
                Err(err) => {
                    warn!("skipping {other_name}: {err}");
                    BTreeMap::new()
                }
            };
            self.entries.insert((base.clone(), other_name.clone()), diffs);
        }

        Ok(())
    }

    /// Replace the cached entry for one pair wholesale. Scoped variant of
    /// `refresh` for when only one comparison is active.
    pub fn refresh_pair(
        &mut self,
        registry: &Registry,
        base: &RepoName,
        other: &RepoName,
    ) -> Result<()> {
        let base_repo = registry.get(base)?;
        let other_repo = registry.get(other)?;
        let diffs = match diff_repos(base_repo, other_repo) {
            Ok(diffs) => diffs,
            Err(err) => {
                warn!("skipping {other}: {err}");
                BTreeMap::new()
            }
        };
        self.entries.insert((base.clone(), other.clone()), diffs);
        Ok(())
    }

    /// Recompute one cached entry after a mutation touched `rel_path`,
    /// leaving every other entry untouched.
    pub fn refresh_file(
        &mut self,
        registry: &Registry,
        base: &RepoName,
        other: &RepoName,
        rel_path: &str,
    ) -> Result<()> {
        let diff = diff_single_file(registry.get(base)?, registry.get(other)?, rel_path);
        self.entries
            .entry((base.clone(), other.clone()))
            .or_default()
            .insert(rel_path.to_string(), diff);
        Ok(())
    }

    pub fn pair(&self, base: &RepoName, other: &RepoName) -> Option<&BTreeMap<String, DiffResult>> {
        self.entries.get(&(base.clone(), other.clone()))
    }

    pub fn file(&self, base: &RepoName, other: &RepoName, rel_path: &str) -> Option<&DiffResult> {
        self.pair(base, other).and_then(|diffs| diffs.get(rel_path))
    }

    /// All cached pairs for `base`.
    pub fn pairs_for<'a>(
        &'a self,
        base: &'a RepoName,
    ) -> impl Iterator<Item = (&'a RepoName, &'a BTreeMap<String, DiffResult>)> {
        self.entries
            .iter()
            .filter(move |((cached_base, _), _)| cached_base == base)
            .map(|((_, other), diffs)| (other, diffs))
    }

    /// Exact duplicates for a pair: cached diffs with no blocks.
    pub fn exact_duplicates(&self, base: &RepoName, other: &RepoName) -> usize {
        self.pair(base, other)
            .map(|diffs| diffs.values().filter(|d| d.is_identical()).count())
            .unwrap_or(0)
    }

    /// Score and rank every cached pair for `base`, highest first.
    /// Repositories with more exactly-identical files rank higher: an
    /// identical file contributes 70, a differing one 30. Ties rank by
    /// name.
    pub fn similar_repos(&self, base: &RepoName) -> Vec<SimilarRepo> {
        let mut ranked: Vec<SimilarRepo> = self
            .pairs_for(base)
            .map(|(other, diffs)| SimilarRepo {
                name: other.clone(),
                score: diffs
                    .values()
                    .map(|d| if d.is_identical() { 70 } else { 30 })
                    .sum(),
                matched_files: diffs.len(),
                exact_duplicates: diffs.values().filter(|d| d.is_identical()).count(),
            })
            .collect();
        ranked.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.name.cmp(&b.name)));
        ranked
    }

    /// Files that differ between `base` and `other`, least-changed first.
    /// Identical files are excluded.
    pub fn changed_files(&self, base: &RepoName, other: &RepoName) -> Vec<ChangedFile> {
        let mut files: Vec<ChangedFile> = self
            .pair(base, other)
            .map(|diffs| {
                diffs
                    .iter()
                    .filter(|(_, d)| d.changed_lines() > 0)
                    .map(|(path, d)| ChangedFile {
                        path: path.clone(),
                        deleted: d.lines_deleted(),
                        inserted: d.lines_inserted(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        files.sort_by(|a, b| {
            (a.deleted + a.inserted)
                .cmp(&(b.deleted + b.inserted))
                .then_with(|| a.path.cmp(&b.path))
        });
        files
    }
}
