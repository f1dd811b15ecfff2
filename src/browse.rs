use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Where a browse entry exists between the two sides of a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    BaseOnly,
    CompareOnly,
    Both,
}

/// Directory entries carry a trailing `/`; files do not.
pub fn is_dir_entry(entry: &str) -> bool {
    entry.ends_with('/')
}

fn entry_path(root: &Path, entry: &str) -> PathBuf {
    root.join(entry.trim_end_matches('/'))
}

/// One side's listing of `root/subdir`: entries as `/`-separated paths
/// relative to the repository root, directories marked with a trailing
/// `/`, sorted. A missing subdirectory yields an empty listing; that is
/// the expected case when a directory exists in only one repository.
pub fn list_side(root: &Path, subdir: &str) -> Vec<String> {
    let dir = root.join(subdir);
    let reader = match fs::read_dir(&dir) {
        Ok(reader) => reader,
        Err(_) => return Vec::new(),
    };

    let mut entries: Vec<String> = reader
        .flatten()
        .map(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            let rel = if subdir.is_empty() {
                name
            } else {
                format!("{subdir}/{name}")
            };
            if entry.path().is_dir() {
                format!("{rel}/")
            } else {
                rel
            }
        })
        .collect();
    entries.sort();
    entries
}

/// Listings for both repositories at the same relative subdirectory.
pub fn list_both_sides(
    base_root: &Path,
    compare_root: &Path,
    subdir: &str,
) -> (Vec<String>, Vec<String>) {
    (list_side(base_root, subdir), list_side(compare_root, subdir))
}

/// Union of both listings with presence classification, directories
/// first, each group sorted. Entries present on both sides get no
/// copy/delete action: neither side is authoritative.
pub fn classify(entries_base: &[String], entries_compare: &[String]) -> Vec<(String, Presence)> {
    let base: BTreeSet<&String> = entries_base.iter().collect();
    let compare: BTreeSet<&String> = entries_compare.iter().collect();

    let mut classified: Vec<(String, Presence)> = base
        .union(&compare)
        .map(|entry| {
            let presence = match (base.contains(*entry), compare.contains(*entry)) {
                (true, false) => Presence::BaseOnly,
                (false, true) => Presence::CompareOnly,
                _ => Presence::Both,
            };
            ((*entry).clone(), presence)
        })
        .collect();
    classified.sort_by_key(|(entry, _)| (!is_dir_entry(entry), entry.clone()));
    classified
}

/// Copy one listed entry from `src_root` to `dst_root` at the same
/// relative path.
///
/// A directory entry creates the bare directory node only, matching the
/// source side's node without copying contents. A file is overwritten
/// byte-for-byte.
pub fn copy_entry(src_root: &Path, dst_root: &Path, entry: &str) -> Result<()> {
    let src = entry_path(src_root, entry);
    let dst = entry_path(dst_root, entry);

    let outcome = if is_dir_entry(entry) {
        fs::create_dir_all(&dst)
    } else {
        fs::copy(&src, &dst).map(|_| ())
    };
    outcome.map_err(|source| Error::FileCopy { src, dst, source })
}

/// Delete one listed entry under `root`. A directory must be empty; a
/// populated one is refused by the filesystem and surfaced as the error.
pub fn delete_entry(root: &Path, entry: &str) -> Result<()> {
    let path = entry_path(root, entry);
    let outcome = if is_dir_entry(entry) {
        fs::remove_dir(&path)
    } else {
        fs::remove_file(&path)
    };
    outcome.map_err(|source| Error::FileDelete { path, source })
}
