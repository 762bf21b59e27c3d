//! Event type definitions for progress and diagnostic reporting.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted by the dataset tools
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Per-file hashing events
    Hash(HashEvent),
    /// Hash file writing events
    Store(StoreEvent),
    /// In-directory duplicate removal events
    Dedup(DedupEvent),
    /// Reference-set dataset filtering events
    Filter(FilterEvent),
    /// Batch resize events
    Resize(ResizeEvent),
    /// Corrupted image detection events
    Validate(ValidateEvent),
}

/// Events from the hasher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum HashEvent {
    /// A file was hashed
    Hashed { path: PathBuf, hash: String },
    /// A file could not be hashed and was skipped
    Skipped { path: PathBuf, reason: String },
}

/// Events while writing a hash file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StoreEvent {
    /// Writing has started
    Started { hash_file: PathBuf, total_paths: usize },
    /// A hash line was written for this path
    Stored { path: PathBuf },
    /// Writing completed
    Completed { stored: usize, skipped: usize },
}

/// Events while removing duplicates inside a directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DedupEvent {
    /// Scanning has started
    Started { directory: PathBuf, total_files: usize },
    /// A file's hash collided with an earlier file
    DuplicateFound { path: PathBuf, original: PathBuf },
    /// A duplicate was deleted
    Removed { path: PathBuf },
    /// Deleting a duplicate failed; the batch continues
    RemoveFailed { path: PathBuf, message: String },
    /// The pass completed
    Completed { duplicates: usize, removed: usize },
}

/// Events while filtering a dataset against a reference hash file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FilterEvent {
    /// Filtering has started
    Started {
        dataset_dir: PathBuf,
        reference_hashes: usize,
    },
    /// A file was copied into the output directory
    Copied { path: PathBuf, destination: PathBuf },
    /// A file matched the reference set and was left out
    FilteredOut { path: PathBuf },
    /// Copying a file failed; the batch continues
    CopyFailed { path: PathBuf, message: String },
    /// Filtering completed
    Completed { copied: usize, filtered_out: usize },
}

/// Events during a batch resize
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ResizeEvent {
    /// The batch has been submitted to the worker pool
    Started { total_images: usize, workers: usize },
    /// Progress update after each finished task
    Progress(ResizeProgress),
    /// A single task failed; other tasks are unaffected
    Failed { path: PathBuf, message: String },
    /// Every task has finished
    Completed { processed: usize, failed: usize },
}

/// Progress information during a batch resize
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResizeProgress {
    /// Number of tasks finished so far (success or failure)
    pub completed: usize,
    /// Total number of tasks
    pub total: usize,
    /// Input of the task that just finished
    pub current_path: PathBuf,
}

/// Events while checking for corrupted images
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ValidateEvent {
    /// A file failed to decode
    Corrupted { path: PathBuf },
    /// A corrupted file was deleted
    Removed { path: PathBuf },
    /// Deleting a corrupted file failed
    RemoveFailed { path: PathBuf, message: String },
    /// The pass completed
    Completed { checked: usize, removed: usize },
}
