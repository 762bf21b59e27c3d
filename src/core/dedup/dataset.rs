//! Filtering a dataset against a reference hash file.

use super::{FilterOutcome, FilterReport};
use crate::core::hasher::{compute_hash, compute_hash_with, HasherConfig};
use crate::core::scanner::list_files;
use crate::core::store::load_hashes;
use crate::error::{Result, TidyError};
use crate::events::{null_sender, Event, EventSender, FilterEvent};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Check whether `path` hashes to one of `stored`.
///
/// A file that cannot be hashed is never a duplicate.
pub fn is_duplicate(path: &Path, stored: &HashSet<String>) -> bool {
    compute_hash(path).is_some_and(|hash| stored.contains(&hash.to_hex()))
}

/// Copy every file of `dataset_dir` whose hash is not in `hash_file` into
/// `output_dir`.
///
/// Files are copied, never moved, under their original file name.
/// `output_dir` is created when missing. Files that can't be hashed are
/// copied too and reported as [`FilterOutcome::CopiedUnhashed`].
pub fn filter_dataset(dataset_dir: &Path, hash_file: &Path, output_dir: &Path) -> Result<FilterReport> {
    filter_dataset_with_events(
        dataset_dir,
        hash_file,
        output_dir,
        &HasherConfig::default(),
        &null_sender(),
    )
}

/// Like [`filter_dataset`], with an explicit hasher and event sink.
///
/// The reference file is read before anything on disk changes; a missing
/// reference file is an error. An `output_dir` resolving to `dataset_dir`
/// is rejected with [`TidyError::Config`].
pub fn filter_dataset_with_events(
    dataset_dir: &Path,
    hash_file: &Path,
    output_dir: &Path,
    hasher: &HasherConfig,
    events: &EventSender,
) -> Result<FilterReport> {
    let hasher = hasher.clone().build()?;
    let stored = load_hashes(hash_file)?;
    let files = list_files(dataset_dir)?;

    if same_directory(dataset_dir, output_dir) {
        return Err(TidyError::Config(format!(
            "output directory {} is the dataset directory",
            output_dir.display()
        )));
    }

    fs::create_dir_all(output_dir).map_err(|source| TidyError::OutputDirectory {
        path: output_dir.to_path_buf(),
        source,
    })?;

    events.send(Event::Filter(FilterEvent::Started {
        dataset_dir: dataset_dir.to_path_buf(),
        reference_hashes: stored.len(),
    }));

    let mut report = FilterReport {
        reference_hashes: stored.len(),
        outcomes: Vec::with_capacity(files.len()),
    };

    for path in files {
        let hash = compute_hash_with(hasher.as_ref(), &path, events).map(|h| h.to_hex());

        if let Some(hash) = hash.as_ref().filter(|h| stored.contains(*h)) {
            info!("Filtered out duplicate image: {}", path.display());
            events.send(Event::Filter(FilterEvent::FilteredOut { path: path.clone() }));
            report
                .outcomes
                .push((path, FilterOutcome::FilteredOut { hash: hash.clone() }));
            continue;
        }

        let outcome = match copy_into(&path, output_dir) {
            Ok(destination) => {
                info!("Copied {} to {}", path.display(), output_dir.display());
                events.send(Event::Filter(FilterEvent::Copied {
                    path: path.clone(),
                    destination: destination.clone(),
                }));
                if hash.is_some() {
                    FilterOutcome::Copied { destination }
                } else {
                    FilterOutcome::CopiedUnhashed { destination }
                }
            }
            Err(reason) => {
                warn!("Failed to copy {}: {}", path.display(), reason);
                events.send(Event::Filter(FilterEvent::CopyFailed {
                    path: path.clone(),
                    message: reason.clone(),
                }));
                FilterOutcome::CopyFailed { reason }
            }
        };
        report.outcomes.push((path, outcome));
    }

    events.send(Event::Filter(FilterEvent::Completed {
        copied: report.copied_count(),
        filtered_out: report.filtered_count(),
    }));

    Ok(report)
}

/// True when both paths exist and resolve to the same directory
fn same_directory(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Copy `path` into `output_dir` under its own file name.
///
/// Refuses to copy a file onto itself, which would truncate it.
fn copy_into(path: &Path, output_dir: &Path) -> std::result::Result<PathBuf, String> {
    let file_name = path
        .file_name()
        .ok_or_else(|| format!("{} has no file name", path.display()))?;
    let destination = output_dir.join(file_name);

    if let (Ok(source), Ok(target)) = (path.canonicalize(), destination.canonicalize()) {
        if source == target {
            return Err(format!("{} is the same file as its destination", path.display()));
        }
    }

    fs::copy(path, &destination).map_err(|e| e.to_string())?;
    Ok(destination)
}
