#![forbid(unsafe_code)]

//! Path resolution for the three target modes
//!
//! Targets are joined onto the working directory by plain string
//! concatenation, never canonicalized. Recoverable problems (a missing
//! directory, a recursive target with a trailing separator) do not fail
//! resolution: they produce an empty [`ResolvedFileSet`] carrying a
//! [`Notice`] for the user.

use crate::types::{Invocation, Mode};
use ignore::WalkBuilder;
use std::cmp::Ordering;
use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Extension kept by dir mode
const SOURCE_EXTENSION: &str = ".py";

/// Name suffix kept by recursive mode. Deliberately looser than
/// [`SOURCE_EXTENSION`]: a file called `happy` matches too.
const RECURSIVE_SUFFIX: &str = "py";

/// Fatal resolution errors
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The directory exists but could not be listed
    #[error("failed to list directory {}: {source}", path.display())]
    ListDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A recoverable condition reported to the user instead of an error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Dir mode was pointed at a directory that does not exist
    PathNotFound { reason: String, path: PathBuf },
    /// Recursive mode target ended with a path separator
    TrailingSeparator { target: String },
}

impl Notice {
    /// Whether dispatch is skipped entirely after this notice
    pub fn halts_dispatch(&self) -> bool {
        matches!(self, Notice::TrailingSeparator { .. })
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::PathNotFound { reason, path } => write!(f, "{}: {}", reason, path.display()),
            Notice::TrailingSeparator { target } => write!(
                f,
                "Enter folder's name without a trailing slash: {}",
                target
            ),
        }
    }
}

/// Ordered absolute paths to dispatch, plus an optional notice
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedFileSet {
    pub files: Vec<PathBuf>,
    pub notice: Option<Notice>,
}

impl ResolvedFileSet {
    fn from_files(files: Vec<PathBuf>) -> Self {
        ResolvedFileSet {
            files,
            notice: None,
        }
    }

    fn from_notice(notice: Notice) -> Self {
        ResolvedFileSet {
            files: Vec::new(),
            notice: Some(notice),
        }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Resolves targets relative to a fixed working directory
#[derive(Debug, Clone)]
pub struct PathResolver {
    workdir: PathBuf,
}

impl PathResolver {
    /// Creates a resolver for the given working directory
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        PathResolver {
            workdir: workdir.into(),
        }
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Resolve the target of a routed invocation
    ///
    /// The clear flag plays no part in resolution.
    pub fn resolve_invocation(
        &self,
        invocation: &Invocation,
    ) -> Result<ResolvedFileSet, ResolveError> {
        self.resolve(invocation.mode, &invocation.target)
    }

    /// Resolve `target` according to `mode`
    pub fn resolve(&self, mode: Mode, target: &str) -> Result<ResolvedFileSet, ResolveError> {
        let resolved = match mode {
            Mode::File => self.resolve_file(target),
            Mode::Dir => self.resolve_dir(target)?,
            Mode::RecursiveDir => self.resolve_recursive(target),
        };

        info!(
            mode = %mode,
            fragment = target,
            files = resolved.len(),
            "resolved target"
        );
        Ok(resolved)
    }

    /// File mode: one path, no existence check
    fn resolve_file(&self, target: &str) -> ResolvedFileSet {
        ResolvedFileSet::from_files(vec![self.join(target)])
    }

    /// Dir mode: immediate regular files ending in `.py`, sorted by name
    fn resolve_dir(&self, target: &str) -> Result<ResolvedFileSet, ResolveError> {
        let directory = self.join(directory_fragment(target));

        let entries = match fs::read_dir(&directory) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Ok(ResolvedFileSet::from_notice(Notice::PathNotFound {
                    reason: describe(&e),
                    path: directory,
                }));
            }
            Err(source) => {
                return Err(ResolveError::ListDirectory {
                    path: directory,
                    source,
                });
            }
        };

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| ResolveError::ListDirectory {
                path: directory.clone(),
                source,
            })?;

            if !entry
                .file_name()
                .to_string_lossy()
                .ends_with(SOURCE_EXTENSION)
            {
                continue;
            }

            // Follows symlinks, so a link to a regular file is kept
            let path = entry.path();
            if path.is_file() {
                files.push(path);
            }
        }
        files.sort();

        Ok(ResolvedFileSet::from_files(files))
    }

    /// Recursive mode: every nested non-directory entry whose name ends in `py`
    fn resolve_recursive(&self, target: &str) -> ResolvedFileSet {
        if target.chars().last().is_some_and(std::path::is_separator) {
            return ResolvedFileSet::from_notice(Notice::TrailingSeparator {
                target: target.to_string(),
            });
        }

        let root = self.join(directory_fragment(target));
        let walker = WalkBuilder::new(&root)
            .standard_filters(false)
            .follow_links(false)
            .sort_by_file_path(files_before_directories)
            .build();

        let mut files = Vec::new();
        for result in walker {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(root = %root.display(), error = %err, "skipping unreadable entry");
                    continue;
                }
            };

            // The root itself is never a candidate, even when it is a file
            if entry.depth() == 0 {
                continue;
            }

            let Some(file_type) = entry.file_type() else {
                continue;
            };
            if file_type.is_dir() || (file_type.is_symlink() && entry.path().is_dir()) {
                continue;
            }

            if entry
                .file_name()
                .to_string_lossy()
                .ends_with(RECURSIVE_SUFFIX)
            {
                debug!(path = %entry.path().display(), "collected");
                files.push(entry.into_path());
            }
        }

        ResolvedFileSet::from_files(files)
    }

    /// `workdir + "/" + fragment`; absolute fragments are taken as they are
    fn join(&self, fragment: &str) -> PathBuf {
        if Path::new(fragment).is_absolute() {
            return PathBuf::from(fragment);
        }

        let mut joined = OsString::from(self.workdir.as_os_str());
        joined.push("/");
        joined.push(fragment);
        PathBuf::from(joined)
    }
}

/// A directory's own files are walked before any subdirectory, each group by name
fn files_before_directories(a: &Path, b: &Path) -> Ordering {
    a.is_dir()
        .cmp(&b.is_dir())
        .then_with(|| a.file_name().cmp(&b.file_name()))
}

/// `.` means the working directory itself
fn directory_fragment(target: &str) -> &str {
    if target == "." { "" } else { target }
}

/// The OS description of an error, without the `(os error N)` suffix
fn describe(error: &io::Error) -> String {
    let text = error.to_string();
    match text.find(" (os error") {
        Some(index) => text[..index].to_string(),
        None => text,
    }
}
