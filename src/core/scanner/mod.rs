//! # Scanner Module
//!
//! Discovers files in dataset directories.
//!
//! Two shapes of listing are needed:
//! - [`list_files`] - every regular file directly inside one directory,
//!   sorted by name. Duplicate detection and validation use this so the
//!   first-seen file of a duplicate set is the same on every platform.
//! - [`WalkDirScanner`] - a recursive walk keeping only allow-listed
//!   extensions (jpeg, jpg, png by default). The batch resizer uses this.
//!
//! ## Example
//! ```rust,ignore
//! use dataset_tidy::core::scanner::{ScanConfig, WalkDirScanner};
//!
//! let scanner = WalkDirScanner::new(ScanConfig::default());
//! let result = scanner.scan(Path::new("/data/raw"))?;
//! ```

mod filter;
mod walker;

pub use filter::{ImageFilter, DATASET_EXTENSIONS};
pub use walker::{list_files, ScanConfig, WalkDirScanner};

use crate::error::ScanError;
use std::path::PathBuf;

/// Result of a recursive scan
#[derive(Debug)]
pub struct ScanResult {
    /// Accepted files, in walk order
    pub files: Vec<PathBuf>,
    /// Entries that could not be read (non-fatal)
    pub errors: Vec<ScanError>,
}
