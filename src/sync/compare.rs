//! Content comparison for staleness detection and the listing view.
//!
//! Files compare line-oriented; directories compare by a recursive SHA-256
//! tree digest (relative path plus content per file), since a line diff is
//! meaningless across a tree.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use sha2::{Digest, Sha256};
use similar::TextDiff;

/// Line-oriented comparison of two files.
///
/// # Errors
///
/// Returns an error if either file cannot be read.
pub fn lines_differ(a: &Path, b: &Path) -> Result<bool> {
    let old = std::fs::read(a).with_context(|| format!("reading {}", a.display()))?;
    let new = std::fs::read(b).with_context(|| format!("reading {}", b.display()))?;
    if old == new {
        return Ok(false);
    }
    let old = String::from_utf8_lossy(&old);
    let new = String::from_utf8_lossy(&new);
    Ok(TextDiff::from_lines(old.as_ref(), new.as_ref()).ratio() < 1.0)
}

/// SHA-256 digest over a directory tree.
///
/// Hashes each entry's path relative to `root` along with file content, in
/// sorted order, so two trees with equal layout and content produce equal
/// digests regardless of traversal platform.
///
/// # Errors
///
/// Returns an error if any directory or file under `root` cannot be read.
pub fn tree_digest(root: &Path) -> Result<[u8; 32]> {
    let mut hasher = Sha256::new();
    hash_dir(&mut hasher, root, root)?;
    Ok(hasher.finalize().into())
}

fn hash_dir(hasher: &mut Sha256, root: &Path, dir: &Path) -> Result<()> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("reading directory {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<_>>()
        .with_context(|| format!("reading entry in {}", dir.display()))?;
    entries.sort();

    for path in entries {
        let rel = path
            .strip_prefix(root)
            .with_context(|| format!("stripping prefix from {}", path.display()))?;
        hasher.update(rel.to_string_lossy().as_bytes());
        if path.is_dir() {
            hasher.update([b'/']);
            hash_dir(hasher, root, &path)?;
        } else {
            hasher.update([0]);
            let content =
                std::fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
            hasher.update(&content);
            hasher.update([0]);
        }
    }
    Ok(())
}

/// Whether two tracked paths differ in content.
///
/// A file/directory kind mismatch always counts as a difference.
///
/// # Errors
///
/// Returns an error if either side cannot be read.
pub fn paths_differ(a: &Path, b: &Path) -> Result<bool> {
    match (a.is_dir(), b.is_dir()) {
        (true, true) => Ok(tree_digest(a)? != tree_digest(b)?),
        (false, false) => lines_differ(a, b),
        _ => Ok(true),
    }
}

/// Staleness check: `dest` is about to be overwritten by `src` and holds
/// unsaved edits.
///
/// True iff both paths exist, their contents differ, and `dest` was modified
/// strictly later than `src`.
///
/// # Errors
///
/// Returns an error if content or metadata cannot be read.
pub fn is_stale(dest: &Path, src: &Path) -> Result<bool> {
    if !dest.exists() || !src.exists() {
        return Ok(false);
    }
    if !paths_differ(src, dest)? {
        return Ok(false);
    }
    let dest_modified = modified_time(dest)?;
    let src_modified = modified_time(src)?;
    Ok(dest_modified > src_modified)
}

fn modified_time(path: &Path) -> Result<std::time::SystemTime> {
    std::fs::metadata(path)
        .and_then(|meta| meta.modified())
        .with_context(|| format!("reading modification time of {}", path.display()))
}
