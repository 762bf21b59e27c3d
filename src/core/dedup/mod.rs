//! # Dedup Module
//!
//! Finds duplicate images by exact average-hash equality.
//!
//! ## Operations
//! - [`find_and_remove_duplicates`] - within one directory, keep the first
//!   file of each hash and delete the rest
//! - [`filter_dataset`] - copy the files of a dataset that are *not* in a
//!   reference hash file into an output directory
//!
//! Both operations look only at files directly inside the given directory
//! and visit them sorted by file name. Every file gets a tagged outcome in
//! the returned report; per-file failures never abort the batch.

mod dataset;
mod remove;

pub use dataset::{filter_dataset, filter_dataset_with_events, is_duplicate};
pub use remove::{find_and_remove_duplicates, find_and_remove_duplicates_with_events};

use crate::core::hasher::HasherConfig;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Options for in-directory duplicate removal
#[derive(Debug, Clone, Default)]
pub struct DedupOptions {
    /// Hasher used for every file
    pub hasher: HasherConfig,
    /// Report duplicates without deleting anything
    pub dry_run: bool,
}

impl DedupOptions {
    /// Create options with the default hasher, deleting duplicates
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the hasher configuration
    pub fn hasher(mut self, hasher: HasherConfig) -> Self {
        self.hasher = hasher;
        self
    }

    /// Only report, never delete
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// What happened to one file during duplicate removal
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DedupOutcome {
    /// First file seen with this hash; kept
    Original { hash: String },
    /// Same hash as `original`; scheduled for deletion
    Duplicate { original: PathBuf, hash: String },
    /// Hash could not be computed; left alone
    Unhashed,
}

/// Result of a duplicate removal pass
#[derive(Debug, Default, Serialize)]
pub struct DedupReport {
    /// One entry per file, in scan order
    pub outcomes: Vec<(PathBuf, DedupOutcome)>,
    /// Duplicates that were deleted
    pub removed: Vec<PathBuf>,
    /// Duplicates whose deletion failed, with the reason
    pub remove_failures: Vec<(PathBuf, String)>,
}

impl DedupReport {
    /// Paths classified as duplicates, whether or not deletion succeeded
    pub fn duplicates(&self) -> impl Iterator<Item = &Path> + '_ {
        self.outcomes.iter().filter_map(|(path, outcome)| match outcome {
            DedupOutcome::Duplicate { .. } => Some(path.as_path()),
            _ => None,
        })
    }

    /// Paths kept as the representative of their hash
    pub fn originals(&self) -> impl Iterator<Item = &Path> + '_ {
        self.outcomes.iter().filter_map(|(path, outcome)| match outcome {
            DedupOutcome::Original { .. } => Some(path.as_path()),
            _ => None,
        })
    }

    /// Paths that could not be hashed
    pub fn unhashed(&self) -> impl Iterator<Item = &Path> + '_ {
        self.outcomes.iter().filter_map(|(path, outcome)| match outcome {
            DedupOutcome::Unhashed => Some(path.as_path()),
            _ => None,
        })
    }
}

/// What happened to one file during dataset filtering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FilterOutcome {
    /// Hash not in the reference set; copied
    Copied { destination: PathBuf },
    /// Hash could not be computed; copied anyway
    CopiedUnhashed { destination: PathBuf },
    /// Hash found in the reference set; left out
    FilteredOut { hash: String },
    /// Copy was attempted and failed
    CopyFailed { reason: String },
}

/// Result of filtering a dataset against a reference hash file
#[derive(Debug, Default, Serialize)]
pub struct FilterReport {
    /// Number of distinct hashes in the reference file
    pub reference_hashes: usize,
    /// One entry per file, in scan order
    pub outcomes: Vec<(PathBuf, FilterOutcome)>,
}

impl FilterReport {
    /// Number of files written to the output directory
    pub fn copied_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| {
                matches!(
                    o,
                    FilterOutcome::Copied { .. } | FilterOutcome::CopiedUnhashed { .. }
                )
            })
            .count()
    }

    /// Number of files left out as duplicates of the reference set
    pub fn filtered_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, FilterOutcome::FilteredOut { .. }))
            .count()
    }

    /// Files whose copy failed
    pub fn failures(&self) -> impl Iterator<Item = (&Path, &str)> + '_ {
        self.outcomes.iter().filter_map(|(path, outcome)| match outcome {
            FilterOutcome::CopyFailed { reason } => Some((path.as_path(), reason.as_str())),
            _ => None,
        })
    }
}
