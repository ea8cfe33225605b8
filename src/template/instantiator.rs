//! Template instantiation
//!
//! Copies a template tree verbatim, then walks the copy post-order renaming
//! entries and optionally rewriting the designated marker file.

use crate::error::{Error, Result};
use crate::placeholder::{Substitutor, VariableMapping};
use crate::template::copier::{CopyStats, TreeCopier};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// File whose content is rewritten when content replacement is enabled
pub const README_MARKER: &str = "README.md";

/// Moves a directory to a new path
pub trait DirectoryMover: fmt::Debug {
    /// Rename `from` to `to`
    fn move_dir(&self, from: &Path, to: &Path) -> io::Result<()>;
}

/// [`DirectoryMover`] backed by `std::fs::rename`
#[derive(Debug, Default, Clone, Copy)]
pub struct FsMover;

impl DirectoryMover for FsMover {
    fn move_dir(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }
}

/// Outcome of a successful instantiation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstantiationReport {
    /// Root of the new project
    pub destination: PathBuf,
    /// Copy totals
    pub copy: CopyStats,
    /// Files whose names changed
    pub files_renamed: usize,
    /// Directories whose names changed
    pub directories_renamed: usize,
    /// Marker files whose content was rewritten
    pub readmes_rewritten: usize,
    /// Directories left with their unresolved name because access was denied
    pub unrenamed_directories: Vec<PathBuf>,
}

/// Creates projects from template directories
#[derive(Debug)]
pub struct TemplateInstantiator {
    substitutor: Substitutor,
    replace_readme_content: bool,
    marker_file: String,
    copier: TreeCopier,
    mover: Box<dyn DirectoryMover>,
}

impl TemplateInstantiator {
    /// Create an instantiator over a fully resolved mapping
    pub fn new(mapping: VariableMapping, replace_readme_content: bool) -> Result<Self> {
        let substitutor = Substitutor::new(&mapping)?;
        Ok(Self {
            substitutor,
            replace_readme_content,
            marker_file: README_MARKER.to_string(),
            copier: TreeCopier::new(),
            mover: Box::new(FsMover),
        })
    }

    /// Use a different directory mover
    pub fn with_mover<M: DirectoryMover + 'static>(mut self, mover: M) -> Self {
        self.mover = Box::new(mover);
        self
    }

    /// Use a different marker file name for content replacement
    pub fn with_marker_file<S: Into<String>>(mut self, name: S) -> Self {
        self.marker_file = name.into();
        self
    }

    /// Substitute tokens in arbitrary text
    pub fn resolve(&self, text: &str) -> String {
        self.substitutor.apply(text)
    }

    /// Compute the project path without touching the filesystem
    pub fn destination_for(&self, source: &Path, target_base: &str) -> Result<PathBuf> {
        let (_, destination) = self.plan(source, target_base)?;
        Ok(destination)
    }

    /// Instantiate `source` below the resolved `target_base`.
    ///
    /// Validation failures leave the filesystem untouched. Once copying has
    /// started, any failure aborts and the partial tree is left in place.
    pub fn create_project(
        &self,
        source: &Path,
        target_base: &str,
    ) -> Result<InstantiationReport> {
        let (source, destination) = self.plan(source, target_base)?;

        if fs::symlink_metadata(&destination).is_ok() {
            return Err(Error::AlreadyExists(destination));
        }
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }

        tracing::info!(
            "Creating project {} from {}",
            destination.display(),
            source.display()
        );

        let copy = self.copier.copy(&source, &destination)?;
        let mut report = InstantiationReport {
            destination: destination.clone(),
            copy,
            ..Default::default()
        };

        self.process_directory(&destination, &mut report)?;

        tracing::info!(
            "Project created: {} files renamed, {} directories renamed, {} readme files rewritten",
            report.files_renamed,
            report.directories_renamed,
            report.readmes_rewritten
        );
        Ok(report)
    }

    /// Validate inputs and resolve the canonical template root and the
    /// project destination. Touches nothing on disk.
    fn plan(&self, source: &Path, target_base: &str) -> Result<(PathBuf, PathBuf)> {
        if source.as_os_str().is_empty() || source.to_string_lossy().trim().is_empty() {
            return Err(Error::invalid_input("template path is empty"));
        }
        if target_base.trim().is_empty() {
            return Err(Error::invalid_input("target base path is empty"));
        }
        if !source.is_dir() {
            return Err(Error::NotFound(source.to_path_buf()));
        }

        // `.` and `dir/..` only have a name once resolved
        let source = fs::canonicalize(source).map_err(|e| Error::io(source, e))?;
        let root_name = source
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                Error::invalid_input(format!(
                    "template path {} has no usable directory name",
                    source.display()
                ))
            })?;

        let project_name = self.resolve_name(root_name)?;
        let destination = PathBuf::from(self.resolve(target_base)).join(project_name);

        let resolved = resolve_lexically(&destination)?;
        if resolved.starts_with(&source) {
            return Err(Error::invalid_input(format!(
                "target {} lies inside the template {}",
                destination.display(),
                source.display()
            )));
        }

        Ok((source, destination))
    }

    /// Resolve a single path segment, rejecting results that are not a name
    fn resolve_name(&self, name: &str) -> Result<String> {
        let resolved = self.resolve(name);
        if resolved.trim().is_empty() || resolved == "." || resolved == ".." {
            return Err(Error::invalid_input(format!(
                "'{}' resolves to the unusable name '{}'",
                name, resolved
            )));
        }
        Ok(resolved)
    }

    /// Post-order walk: each subdirectory is fully processed and renamed
    /// before the files of `dir` are handled. `dir` itself is renamed by the
    /// caller.
    fn process_directory(&self, dir: &Path, report: &mut InstantiationReport) -> Result<()> {
        tracing::debug!("Processing directory: {}", dir.display());
        let (subdirs, files) = list_entries(dir)?;

        for subdir in &subdirs {
            self.process_directory(subdir, report)?;
            self.rename_directory(subdir, report)?;
        }

        for file in &files {
            self.process_file(file, report)?;
        }

        Ok(())
    }

    fn process_file(&self, path: &Path, report: &mut InstantiationReport) -> Result<()> {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            tracing::debug!("Skipping non UTF-8 file name: {}", path.display());
            return Ok(());
        };

        let new_name = self.resolve_name(name)?;
        let mut current = path.to_path_buf();

        if new_name != name {
            let target = path.with_file_name(&new_name);
            refuse_existing(&target)?;
            tracing::debug!("Renaming file {} -> {}", name, new_name);
            fs::rename(path, &target).map_err(|e| Error::io(path, e))?;
            report.files_renamed += 1;
            current = target;
        }

        if self.replace_readme_content && new_name.eq_ignore_ascii_case(&self.marker_file) {
            let content = fs::read_to_string(&current).map_err(|e| Error::io(&current, e))?;
            let rewritten = self.resolve(&content);
            fs::write(&current, rewritten).map_err(|e| Error::io(&current, e))?;
            report.readmes_rewritten += 1;
            tracing::debug!("Rewrote {}", current.display());
        }

        Ok(())
    }

    fn rename_directory(&self, dir: &Path, report: &mut InstantiationReport) -> Result<()> {
        let Some(name) = dir.file_name().and_then(|n| n.to_str()) else {
            tracing::debug!("Skipping non UTF-8 directory name: {}", dir.display());
            return Ok(());
        };

        let new_name = self.resolve_name(name)?;
        if new_name == name {
            return Ok(());
        }

        let target = dir.with_file_name(&new_name);
        refuse_existing(&target)?;

        match self.mover.move_dir(dir, &target) {
            Ok(()) => {
                tracing::debug!("Renamed directory {} -> {}", name, new_name);
                report.directories_renamed += 1;
                Ok(())
            }
            Err(e) => {
                let err = Error::io(dir, e);
                if err.is_access_denied() {
                    tracing::warn!("Access denied, keeping {}: {}", dir.display(), err);
                    report.unrenamed_directories.push(dir.to_path_buf());
                    Ok(())
                } else {
                    Err(err)
                }
            }
        }
    }
}

fn refuse_existing(target: &Path) -> Result<()> {
    if fs::symlink_metadata(target).is_ok() {
        return Err(Error::io(
            target,
            io::Error::new(io::ErrorKind::AlreadyExists, "rename target already exists"),
        ));
    }
    Ok(())
}

/// Canonical form of a path that may not exist yet: the deepest existing
/// ancestor is canonicalized and the remaining components applied on top.
fn resolve_lexically(path: &Path) -> Result<PathBuf> {
    for ancestor in path.ancestors() {
        let existing = if ancestor.as_os_str().is_empty() {
            Path::new(".")
        } else {
            ancestor
        };
        let Ok(mut resolved) = fs::canonicalize(existing) else {
            continue;
        };
        let Ok(rest) = path.strip_prefix(ancestor) else {
            continue;
        };

        for component in rest.components() {
            match component {
                Component::ParentDir => {
                    resolved.pop();
                }
                Component::Normal(part) => resolved.push(part),
                _ => {}
            }
        }
        return Ok(resolved);
    }

    Err(Error::NotFound(path.to_path_buf()))
}

/// Sorted subdirectories and regular files of `dir`
fn list_entries(dir: &Path) -> Result<(Vec<PathBuf>, Vec<PathBuf>)> {
    let mut subdirs = Vec::new();
    let mut files = Vec::new();

    for entry in fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let file_type = entry.file_type().map_err(|e| Error::io(entry.path(), e))?;
        if file_type.is_dir() {
            subdirs.push(entry.path());
        } else if file_type.is_file() {
            files.push(entry.path());
        }
    }

    subdirs.sort();
    files.sort();
    Ok((subdirs, files))
}
