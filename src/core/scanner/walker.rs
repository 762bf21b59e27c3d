//! Directory walking implementation using walkdir.

use super::{filter::ImageFilter, ScanResult};
use crate::error::ScanError;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Configuration for the recursive scanner
#[derive(Debug, Clone, Default)]
pub struct ScanConfig {
    /// Whether to follow symbolic links
    pub follow_symlinks: bool,
    /// Whether to include hidden files and directories
    pub include_hidden: bool,
    /// Maximum directory depth (None = unlimited)
    pub max_depth: Option<usize>,
    /// Custom extensions to include (None = jpeg, jpg, png)
    pub extensions: Option<Vec<String>>,
}

/// Recursive scanner implementation using the walkdir crate
pub struct WalkDirScanner {
    config: ScanConfig,
    filter: ImageFilter,
}

impl WalkDirScanner {
    /// Create a new scanner with the given configuration
    pub fn new(config: ScanConfig) -> Self {
        let mut filter = ImageFilter::new().with_hidden(config.include_hidden);

        if let Some(ref extensions) = config.extensions {
            filter = filter.with_extensions(extensions.clone());
        }

        Self { config, filter }
    }

    /// Walk `root` and collect every file accepted by the extension filter.
    ///
    /// Entries are visited in file-name order within each directory.
    /// Unreadable entries below the root are recorded and skipped.
    pub fn scan(&self, root: &Path) -> Result<ScanResult, ScanError> {
        if !root.is_dir() {
            return Err(ScanError::DirectoryNotFound {
                path: root.to_path_buf(),
            });
        }

        let mut files = Vec::new();
        let mut errors = Vec::new();

        let mut walker = WalkDir::new(root)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name();

        if let Some(depth) = self.config.max_depth {
            walker = walker.max_depth(depth);
        }

        let include_hidden = self.config.include_hidden;
        let entries = walker.into_iter().filter_entry(|entry| {
            include_hidden
                || entry.depth() == 0
                || !entry.file_name().to_string_lossy().starts_with('.')
        });

        for entry_result in entries {
            match entry_result {
                Ok(entry) => {
                    if !entry.file_type().is_file() && !entry.path().is_file() {
                        continue;
                    }

                    if self.filter.should_include(entry.path()) {
                        files.push(entry.into_path());
                    }
                }
                Err(e) => {
                    let error = walk_error(e);
                    debug!("Skipping unreadable entry: {}", error);
                    errors.push(error);
                }
            }
        }

        Ok(ScanResult { files, errors })
    }
}

/// List the regular files directly inside `directory`, sorted by file name.
///
/// Subdirectories are not descended into. Any failure reading the
/// directory is returned, since a partial listing would make duplicate
/// detection silently miss files.
pub fn list_files(directory: &Path) -> Result<Vec<PathBuf>, ScanError> {
    if !directory.is_dir() {
        return Err(ScanError::DirectoryNotFound {
            path: directory.to_path_buf(),
        });
    }

    let mut files = Vec::new();

    for entry_result in WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry_result.map_err(walk_error)?;
        if entry.path().is_file() {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

fn walk_error(e: walkdir::Error) -> ScanError {
    let path = e.path().map(|p| p.to_path_buf()).unwrap_or_default();

    if e.io_error().map(|e| e.kind()) == Some(io::ErrorKind::PermissionDenied) {
        ScanError::PermissionDenied { path }
    } else {
        ScanError::ReadDirectory {
            path,
            source: io::Error::new(io::ErrorKind::Other, e.to_string()),
        }
    }
}
