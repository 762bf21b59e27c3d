//! # Hash Store Module
//!
//! Persists perceptual hashes as a flat text file.
//!
//! ## Format
//! One lowercase hex hash per line, no header, no metadata. Order carries
//! no meaning and readers treat the file as a set, so a file written with
//! repeated lines loads the same as one without.

use crate::core::hasher::{compute_hash_with, AverageHasher, HashAlgorithm, ImageHashValue, DEFAULT_HASH_SIZE};
use crate::error::StoreError;
use crate::events::{null_sender, Event, EventSender, StoreEvent};
use serde::Serialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Outcome of writing a hash file
#[derive(Debug, Default, Serialize)]
pub struct StoreReport {
    /// Paths whose hash was written, with the hash
    pub stored: Vec<(PathBuf, ImageHashValue)>,
    /// Paths that could not be hashed
    pub skipped: Vec<PathBuf>,
}

/// Hash every path with the default hasher and write the hashes to `hash_file`.
///
/// The file is truncated first: each call rewrites it from scratch.
pub fn store_hashes<P: AsRef<Path>>(paths: &[P], hash_file: &Path) -> Result<StoreReport, StoreError> {
    store_hashes_with(
        &AverageHasher::new(DEFAULT_HASH_SIZE),
        paths,
        hash_file,
        &null_sender(),
    )
}

/// Like [`store_hashes`], with an explicit hasher and event sink.
///
/// Paths that fail to hash are skipped. Failing to create or write the
/// hash file itself is an error.
pub fn store_hashes_with<P: AsRef<Path>>(
    hasher: &dyn HashAlgorithm,
    paths: &[P],
    hash_file: &Path,
    events: &EventSender,
) -> Result<StoreReport, StoreError> {
    let write_error = |source| StoreError::Write {
        path: hash_file.to_path_buf(),
        source,
    };

    let mut writer = BufWriter::new(File::create(hash_file).map_err(write_error)?);
    let mut report = StoreReport::default();

    events.send(Event::Store(StoreEvent::Started {
        hash_file: hash_file.to_path_buf(),
        total_paths: paths.len(),
    }));

    for path in paths {
        let path = path.as_ref();
        match compute_hash_with(hasher, path, events) {
            Some(hash) => {
                writeln!(writer, "{}", hash).map_err(write_error)?;
                info!("Stored hash for {}", path.display());
                events.send(Event::Store(StoreEvent::Stored {
                    path: path.to_path_buf(),
                }));
                report.stored.push((path.to_path_buf(), hash));
            }
            None => report.skipped.push(path.to_path_buf()),
        }
    }

    writer.flush().map_err(write_error)?;

    events.send(Event::Store(StoreEvent::Completed {
        stored: report.stored.len(),
        skipped: report.skipped.len(),
    }));

    Ok(report)
}

/// Load the distinct hash strings from `hash_file`.
///
/// Lines are trimmed and blank lines ignored. A missing or unreadable file
/// is an error, never an empty set.
pub fn load_hashes(hash_file: &Path) -> Result<HashSet<String>, StoreError> {
    let read_error = |source| StoreError::Read {
        path: hash_file.to_path_buf(),
        source,
    };

    let reader = BufReader::new(File::open(hash_file).map_err(read_error)?);
    let mut hashes = HashSet::new();

    for line in reader.lines() {
        let line = line.map_err(read_error)?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            hashes.insert(trimmed.to_string());
        }
    }

    Ok(hashes)
}
