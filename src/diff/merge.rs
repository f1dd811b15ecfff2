use std::fs;
use std::path::Path;

use super::{DiffBlock, DiffResult};
use crate::error::{Error, Result};

/// Which side of a diff block to keep when merging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The old (base) version of the block.
    Left,
    /// The new (compare) version of the block.
    Right,
}

/// Line terminator used when a reconstructed file is written back.
pub const LINE_ENDING: &str = if cfg!(windows) { "\r\n" } else { "\n" };

/// Reconstruct the full file after taking one side of `block`.
///
/// Taking the left side yields the compare file with the base version of
/// the block spliced in; taking the right side yields the base file with
/// the compare version spliced in. Lines outside the block come from the
/// side being overwritten, untouched.
pub fn take_side(diff: &DiffResult, block: &DiffBlock, side: Side) -> Vec<String> {
    let mut lines = Vec::new();
    match side {
        Side::Left => {
            lines.extend_from_slice(&diff.new_lines[..block.insert_start]);
            lines.extend_from_slice(
                &diff.old_lines[block.delete_start..block.delete_start + block.delete_count],
            );
            lines.extend_from_slice(&diff.new_lines[block.insert_start + block.insert_count..]);
        }
        Side::Right => {
            lines.extend_from_slice(&diff.old_lines[..block.delete_start]);
            lines.extend_from_slice(
                &diff.new_lines[block.insert_start..block.insert_start + block.insert_count],
            );
            lines.extend_from_slice(&diff.old_lines[block.delete_start + block.delete_count..]);
        }
    }
    lines
}

/// Write the reconstruction of `block` over `target_root/rel_path`.
///
/// The caller re-diffs the file afterwards so the cache reflects the new
/// on-disk state; on a write failure the cached diff is left untouched.
pub fn apply_take(
    diff: &DiffResult,
    block: &DiffBlock,
    side: Side,
    target_root: &Path,
    rel_path: &str,
) -> Result<()> {
    let content = take_side(diff, block, side).join(LINE_ENDING);
    let path = target_root.join(rel_path);
    fs::write(&path, content).map_err(|source| Error::FileWrite { path, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::diff_text;
    use tempfile::TempDir;

    #[test]
    fn test_take_right_reconstructs_new_lines() {
        let diff = diff_text("1\n2\n3\n", "1\nTWO\n3\n");
        let merged = take_side(&diff, &diff.blocks[0], Side::Right);
        assert_eq!(merged, vec!["1", "TWO", "3"]);
    }

    #[test]
    fn test_take_left_reconstructs_old_lines() {
        let diff = diff_text("1\n2\n3\n", "1\nTWO\n3\n");
        let merged = take_side(&diff, &diff.blocks[0], Side::Left);
        assert_eq!(merged, vec!["1", "2", "3"]);
    }

    // Taking every block of one side, one at a time, must reproduce that
    // side's lines within the block and the other side's lines outside it.
    #[test]
    fn test_reconstruction_identity_per_block() {
        let cases = [
            ("a\nb\nc\nd\n", "a\nX\nc\nY\nd\n"),
            ("fn main() {}\n", "fn main() {\n    run();\n}\n"),
            ("one\ntwo\n", ""),
            ("", "fresh\nfile\n"),
            ("x\ny\nz\n", "z\ny\nx\n"),
        ];

        for (old, new) in cases {
            let diff = diff_text(old, new);
            for block in &diff.blocks {
                let right = take_side(&diff, block, Side::Right);
                assert_eq!(
                    &right[block.delete_start..block.delete_start + block.insert_count],
                    &diff.new_lines[block.insert_start..block.insert_start + block.insert_count],
                );
                assert_eq!(&right[..block.delete_start], &diff.old_lines[..block.delete_start]);
                assert_eq!(
                    &right[block.delete_start + block.insert_count..],
                    &diff.old_lines[block.delete_start + block.delete_count..],
                );

                let left = take_side(&diff, block, Side::Left);
                assert_eq!(
                    &left[block.insert_start..block.insert_start + block.delete_count],
                    &diff.old_lines[block.delete_start..block.delete_start + block.delete_count],
                );
                assert_eq!(&left[..block.insert_start], &diff.new_lines[..block.insert_start]);
                assert_eq!(
                    &left[block.insert_start + block.delete_count..],
                    &diff.new_lines[block.insert_start + block.insert_count..],
                );
            }
        }
    }

    // With exactly one block, taking a side makes the file equal to that
    // side in full.
    #[test]
    fn test_single_block_take_equals_side() {
        let diff = diff_text("keep\nold middle\nkeep\n", "keep\nnew middle\nkeep\n");
        assert_eq!(diff.blocks.len(), 1);
        assert_eq!(take_side(&diff, &diff.blocks[0], Side::Right), diff.new_lines);
        assert_eq!(take_side(&diff, &diff.blocks[0], Side::Left), diff.old_lines);
    }

    #[test]
    fn test_apply_take_overwrites_target_file() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("x.txt"), "1\n2\n3\n").unwrap();

        let diff = diff_text("1\n2\n3\n", "1\nTWO\n3\n");
        apply_take(&diff, &diff.blocks[0], Side::Right, temp.path(), "x.txt").unwrap();

        let written = std::fs::read_to_string(temp.path().join("x.txt")).unwrap();
        assert_eq!(written, ["1", "TWO", "3"].join(LINE_ENDING));
    }

    #[test]
    fn test_apply_take_surfaces_write_failure() {
        let temp = TempDir::new().unwrap();
        let diff = diff_text("a\n", "b\n");

        // Missing parent directory: the write fails and is reported.
        let result = apply_take(
            &diff,
            &diff.blocks[0],
            Side::Right,
            temp.path(),
            "no/such/dir/x.txt",
        );
        assert!(matches!(result, Err(crate::error::Error::FileWrite { .. })));
    }
}
