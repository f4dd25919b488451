//! Payload file discovery
//!
//! Global invariants enforced:
//! - Deterministic file order (sorted)
//! - Symlinks are not followed

use anyhow::{Context, Result};
use std::ffi::OsStr;
use std::fs::Metadata;
use std::path::{Path, PathBuf};

/// Check if a file name looks like a JSON payload
fn is_payload_file(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Returns true for directory names that should not be traversed
fn is_skipped_dir(name: &str) -> bool {
    name.starts_with('.') || name == "node_modules" || name == "target"
}

/// Collect all payload files from a path (file or directory)
///
/// An explicit file path is always returned, whatever its extension.
pub fn collect_payload_files(path: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    if path.is_file() {
        files.push(path.to_path_buf());
    } else if path.is_dir() {
        collect_payload_files_recursive(path, &mut files)?;
    }

    files.sort();

    Ok(files)
}

/// Process one directory entry, pushing payload files or recursing into dirs
fn process_dir_entry(path: PathBuf, metadata: Metadata, files: &mut Vec<PathBuf>) -> Result<()> {
    if metadata.is_symlink() {
        return Ok(());
    }

    if metadata.is_dir() {
        if let Some(name) = path.file_name().and_then(|n: &OsStr| n.to_str()) {
            if is_skipped_dir(name) {
                return Ok(());
            }
        }
        collect_payload_files_recursive(&path, files)?;
    } else if metadata.is_file() {
        if let Some(filename) = path.file_name().and_then(|n: &OsStr| n.to_str()) {
            if is_payload_file(filename) {
                files.push(path);
            }
        }
    }

    Ok(())
}

/// Recursively collect payload files from a directory
fn collect_payload_files_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry_result in std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?
    {
        let entry = entry_result?;
        let path = entry.path();
        let metadata = std::fs::symlink_metadata(&path)
            .with_context(|| format!("Failed to read metadata: {}", path.display()))?;
        process_dir_entry(path, metadata, files)?;
    }

    Ok(())
}
