//! Verbatim recursive directory copy
//!
//! Names are copied unresolved; token substitution happens afterwards in the
//! instantiation walk.

use crate::error::{Error, Result};
use std::fs;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

/// Totals for one copy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyStats {
    /// Regular files copied
    pub files: usize,
    /// Directories created below the destination root
    pub directories: usize,
    /// Bytes written
    pub bytes: u64,
    /// Symlinks and other special entries left out
    pub skipped: usize,
}

/// Duplicates a directory tree
#[derive(Debug, Default, Clone, Copy)]
pub struct TreeCopier;

impl TreeCopier {
    /// Create a new copier
    pub fn new() -> Self {
        Self
    }

    /// Copy everything below `source_dir` into `destination_dir`.
    ///
    /// The destination and its ancestors are created when missing. Existing
    /// files are never overwritten: a same-named file at the destination
    /// aborts the copy.
    pub fn copy(&self, source_dir: &Path, destination_dir: &Path) -> Result<CopyStats> {
        if !source_dir.is_dir() {
            return Err(Error::NotFound(source_dir.to_path_buf()));
        }

        fs::create_dir_all(destination_dir).map_err(|e| Error::io(destination_dir, e))?;
        tracing::debug!(
            "Copying {} -> {}",
            source_dir.display(),
            destination_dir.display()
        );

        let mut stats = CopyStats::default();
        let walker = WalkDir::new(source_dir)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry.map_err(|e| walk_error(source_dir, e))?;
            let relative = entry
                .path()
                .strip_prefix(source_dir)
                .map_err(|_| {
                    Error::invalid_input(format!(
                        "{} is outside {}",
                        entry.path().display(),
                        source_dir.display()
                    ))
                })?;
            let target = destination_dir.join(relative);
            let file_type = entry.file_type();

            if file_type.is_dir() {
                fs::create_dir_all(&target).map_err(|e| Error::io(&target, e))?;
                stats.directories += 1;
            } else if file_type.is_file() {
                stats.bytes += copy_file(entry.path(), &target)?;
                stats.files += 1;
            } else {
                tracing::warn!("Skipping special entry: {}", entry.path().display());
                stats.skipped += 1;
            }
        }

        tracing::debug!(
            "Copied {} files and {} directories ({} bytes)",
            stats.files,
            stats.directories,
            stats.bytes
        );
        Ok(stats)
    }
}

fn copy_file(source: &Path, target: &Path) -> Result<u64> {
    if fs::symlink_metadata(target).is_ok() {
        return Err(Error::io(
            target,
            io::Error::new(io::ErrorKind::AlreadyExists, "destination file already exists"),
        ));
    }
    fs::copy(source, target).map_err(|e| Error::io(target, e))
}

fn walk_error(root: &Path, err: walkdir::Error) -> Error {
    let path = err.path().unwrap_or(root).to_path_buf();
    match err.into_io_error() {
        Some(io_err) => Error::io(path, io_err),
        None => Error::io(
            path,
            io::Error::new(io::ErrorKind::Other, "filesystem loop detected"),
        ),
    }
}
