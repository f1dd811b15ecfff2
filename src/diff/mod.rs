pub mod merge;

pub use merge::{apply_take, take_side, Side};

use similar::{capture_diff_slices, Algorithm, DiffOp};

/// One contiguous changed region between the old and new line sequences.
///
/// Either count may be zero: `delete_count == 0` is a pure insertion,
/// `insert_count == 0` a pure deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffBlock {
    /// First affected line in the old sequence.
    pub delete_start: usize,
    /// Lines removed from the old sequence.
    pub delete_count: usize,
    /// First affected line in the new sequence.
    pub insert_start: usize,
    /// Lines added in the new sequence.
    pub insert_count: usize,
}

impl DiffBlock {
    pub fn changed_lines(&self) -> usize {
        self.delete_count + self.insert_count
    }
}

/// A computed line diff between two versions of one file.
///
/// Blocks are ordered by position in both sequences and non-overlapping.
/// No blocks means the versions are line-for-line identical. Replaced
/// wholesale on re-diff, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DiffResult {
    pub old_lines: Vec<String>,
    pub new_lines: Vec<String>,
    pub blocks: Vec<DiffBlock>,
}

impl DiffResult {
    /// Sentinel for "nothing to diff": both sides empty, no blocks.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_identical(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn lines_deleted(&self) -> usize {
        self.blocks.iter().map(|b| b.delete_count).sum()
    }

    pub fn lines_inserted(&self) -> usize {
        self.blocks.iter().map(|b| b.insert_count).sum()
    }

    pub fn changed_lines(&self) -> usize {
        self.lines_deleted() + self.lines_inserted()
    }
}

/// Split file content into lines, treating `\n` and `\r\n` alike. Empty
/// content yields no lines, so a file missing on one side diffs as
/// entirely added or removed.
pub fn split_lines(content: &str) -> Vec<String> {
    content.lines().map(str::to_string).collect()
}

/// Line diff of two full texts. Whitespace and case are significant; the
/// content is compared exactly as read.
pub fn diff_text(old: &str, new: &str) -> DiffResult {
    let old_lines = split_lines(old);
    let new_lines = split_lines(new);

    let blocks = capture_diff_slices(Algorithm::Myers, &old_lines, &new_lines)
        .iter()
        .filter_map(|op| match *op {
            DiffOp::Equal { .. } => None,
            DiffOp::Delete {
                old_index,
                old_len,
                new_index,
            } => Some(DiffBlock {
                delete_start: old_index,
                delete_count: old_len,
                insert_start: new_index,
                insert_count: 0,
            }),
            DiffOp::Insert {
                old_index,
                new_index,
                new_len,
            } => Some(DiffBlock {
                delete_start: old_index,
                delete_count: 0,
                insert_start: new_index,
                insert_count: new_len,
            }),
            DiffOp::Replace {
                old_index,
                old_len,
                new_index,
                new_len,
            } => Some(DiffBlock {
                delete_start: old_index,
                delete_count: old_len,
                insert_start: new_index,
                insert_count: new_len,
            }),
        })
        .collect();

    DiffResult {
        old_lines,
        new_lines,
        blocks,
    }
}
