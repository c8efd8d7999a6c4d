//! Request path resolution
//!
//! Resolves caller-supplied directory and file names against a fixed root.
//! Subdirectories are joined segment by segment; anything that could leave
//! the root is rejected before the file service sees it.

use crate::error::AppError;
use std::path::{Path, PathBuf};

/// Resolve the effective directory for a request
///
/// # Arguments
/// * `root` - Fixed base directory (PDF root or image root)
/// * `subdirectory` - Optional caller-supplied relative directory
///
/// # Returns
/// * `Ok(PathBuf)` - `root` itself when no subdirectory is given, otherwise
///   `root` joined with each normal segment of `subdirectory`
/// * `Err(AppError::InvalidPath)` - If the subdirectory is absolute or
///   contains a parent-directory segment
pub fn resolve_directory(root: &Path, subdirectory: Option<&str>) -> Result<PathBuf, AppError> {
    let Some(subdirectory) = subdirectory else {
        return Ok(root.to_path_buf());
    };

    if subdirectory.contains('\0') {
        return Err(AppError::InvalidPath(
            "directory name contains a NUL byte".to_string(),
        ));
    }
    if subdirectory.starts_with(['/', '\\']) {
        return Err(AppError::InvalidPath(format!(
            "directory name must be relative: {}",
            subdirectory
        )));
    }

    let mut resolved = root.to_path_buf();
    for (index, segment) in subdirectory.split(['/', '\\']).enumerate() {
        match segment {
            "" | "." => continue,
            ".." => {
                return Err(AppError::InvalidPath(format!(
                    "directory name may not contain '..': {}",
                    subdirectory
                )))
            }
            _ if index == 0 && is_drive_prefix(segment) => {
                return Err(AppError::InvalidPath(format!(
                    "directory name must be relative: {}",
                    subdirectory
                )))
            }
            _ => resolved.push(segment),
        }
    }

    Ok(resolved)
}

/// Validate a caller-supplied filename
///
/// A filename must be exactly one normal path component: no separators,
/// no `.`/`..`, no NUL bytes.
pub fn validate_filename(filename: &str) -> Result<&str, AppError> {
    if filename.is_empty() {
        return Err(AppError::Validation("filename must not be empty".to_string()));
    }
    if filename == "." || filename == ".." {
        return Err(AppError::InvalidPath(format!("invalid filename: {}", filename)));
    }
    if filename.contains(['/', '\\', '\0']) {
        return Err(AppError::InvalidPath(format!(
            "filename may not contain path separators: {}",
            filename
        )));
    }
    Ok(filename)
}

fn is_drive_prefix(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    bytes.len() == 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}
