//! Duplicate removal inside a single directory.

use super::{DedupOptions, DedupOutcome, DedupReport};
use crate::core::hasher::{compute_hash_with, ImageHashValue};
use crate::core::scanner::list_files;
use crate::error::Result;
use crate::events::{null_sender, DedupEvent, Event, EventSender};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Delete every file in `directory` whose hash matches an earlier file.
///
/// Files are visited in file-name order, so the alphabetically first file
/// of each duplicate set survives. Files that can't be hashed are never
/// deleted. Running it again on the same directory removes nothing.
pub fn find_and_remove_duplicates(directory: &Path) -> Result<DedupReport> {
    find_and_remove_duplicates_with_events(directory, &DedupOptions::default(), &null_sender())
}

/// Like [`find_and_remove_duplicates`], with options and an event sink.
///
/// Only a missing or unreadable directory is an error. Deletion failures
/// land in [`DedupReport::remove_failures`].
pub fn find_and_remove_duplicates_with_events(
    directory: &Path,
    options: &DedupOptions,
    events: &EventSender,
) -> Result<DedupReport> {
    let hasher = options.hasher.clone().build()?;
    let files = list_files(directory)?;

    events.send(Event::Dedup(DedupEvent::Started {
        directory: directory.to_path_buf(),
        total_files: files.len(),
    }));

    let mut first_seen: HashMap<ImageHashValue, PathBuf> = HashMap::new();
    let mut report = DedupReport::default();
    let mut scheduled = Vec::new();

    for path in files {
        let outcome = match compute_hash_with(hasher.as_ref(), &path, events) {
            None => DedupOutcome::Unhashed,
            Some(hash) => match first_seen.get(&hash) {
                Some(original) => {
                    events.send(Event::Dedup(DedupEvent::DuplicateFound {
                        path: path.clone(),
                        original: original.clone(),
                    }));
                    scheduled.push(path.clone());
                    DedupOutcome::Duplicate {
                        original: original.clone(),
                        hash: hash.to_hex(),
                    }
                }
                None => {
                    let hex = hash.to_hex();
                    first_seen.insert(hash, path.clone());
                    DedupOutcome::Original { hash: hex }
                }
            },
        };
        report.outcomes.push((path, outcome));
    }

    if options.dry_run {
        for path in &scheduled {
            info!("Would remove duplicate image: {}", path.display());
        }
    } else {
        for path in scheduled {
            match fs::remove_file(&path) {
                Ok(()) => {
                    info!("Removed duplicate image: {}", path.display());
                    events.send(Event::Dedup(DedupEvent::Removed { path: path.clone() }));
                    report.removed.push(path);
                }
                Err(e) => {
                    warn!("Failed to remove {}: {}", path.display(), e);
                    events.send(Event::Dedup(DedupEvent::RemoveFailed {
                        path: path.clone(),
                        message: e.to_string(),
                    }));
                    report.remove_failures.push((path, e.to_string()));
                }
            }
        }
    }

    events.send(Event::Dedup(DedupEvent::Completed {
        duplicates: report.duplicates().count(),
        removed: report.removed.len(),
    }));

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ScanError, TidyError};
    use crate::events::EventChannel;
    use image::{ImageBuffer, Rgb};
    use tempfile::TempDir;

    fn save_pattern(path: &Path, flip: bool) {
        let image = ImageBuffer::from_fn(80, 80, |x, _| {
            if (x < 40) != flip {
                Rgb([15u8, 15, 15])
            } else {
                Rgb([240u8, 240, 240])
            }
        });
        image.save(path).unwrap();
    }

    #[test]
    fn keeps_first_of_each_hash() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.png");
        let b = dir.path().join("b.png");
        let c = dir.path().join("c.png");
        save_pattern(&a, false);
        save_pattern(&b, false);
        save_pattern(&c, true);

        let report = find_and_remove_duplicates(dir.path()).unwrap();

        assert!(a.exists());
        assert!(!b.exists());
        assert!(c.exists());
        assert_eq!(report.removed, vec![b.clone()]);
        assert_eq!(
            report.outcomes[1].1,
            DedupOutcome::Duplicate {
                original: a,
                hash: match &report.outcomes[0].1 {
                    DedupOutcome::Original { hash } => hash.clone(),
                    other => panic!("unexpected outcome {:?}", other),
                },
            }
        );
    }

    #[test]
    fn second_run_is_a_no_op() {
        let dir = TempDir::new().unwrap();
        save_pattern(&dir.path().join("one.png"), false);
        save_pattern(&dir.path().join("two.png"), false);

        let first = find_and_remove_duplicates(dir.path()).unwrap();
        let second = find_and_remove_duplicates(dir.path()).unwrap();

        assert_eq!(first.removed.len(), 1);
        assert!(second.removed.is_empty());
        assert!(second.remove_failures.is_empty());
        assert_eq!(second.duplicates().count(), 0);
    }

    #[test]
    fn unhashable_files_are_left_alone() {
        let dir = TempDir::new().unwrap();
        let notes = dir.path().join("notes.txt");
        let also_notes = dir.path().join("notes_copy.txt");
        fs::write(&notes, b"same bytes").unwrap();
        fs::write(&also_notes, b"same bytes").unwrap();

        let (sender, receiver) = EventChannel::new();
        let report =
            find_and_remove_duplicates_with_events(dir.path(), &DedupOptions::default(), &sender)
                .unwrap();

        assert!(notes.exists());
        assert!(also_notes.exists());
        assert_eq!(report.unhashed().count(), 2);

        let skipped = receiver
            .drain()
            .into_iter()
            .filter(|e| matches!(e, Event::Hash(crate::events::HashEvent::Skipped { .. })))
            .count();
        assert_eq!(skipped, 2);
    }

    #[test]
    fn dry_run_deletes_nothing() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.png");
        let b = dir.path().join("b.png");
        save_pattern(&a, true);
        save_pattern(&b, true);

        let options = DedupOptions::new().dry_run(true);
        let report =
            find_and_remove_duplicates_with_events(dir.path(), &options, &null_sender()).unwrap();

        assert!(b.exists());
        assert_eq!(report.duplicates().collect::<Vec<_>>(), vec![b.as_path()]);
        assert!(report.removed.is_empty());
    }

    #[test]
    fn subdirectories_are_not_scanned() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).unwrap();
        save_pattern(&dir.path().join("top.png"), false);
        save_pattern(&nested.join("copy.png"), false);

        let report = find_and_remove_duplicates(dir.path()).unwrap();

        assert!(report.removed.is_empty());
        assert!(nested.join("copy.png").exists());
    }

    #[test]
    fn missing_directory_is_an_error() {
        let result = find_and_remove_duplicates(Path::new("/nonexistent/dataset"));
        assert!(matches!(
            result,
            Err(TidyError::Scan(ScanError::DirectoryNotFound { .. }))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn remove_failures_are_recorded_and_the_pass_continues() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        for name in ["a.png", "b.png", "c.png"] {
            save_pattern(&locked.join(name), false);
        }
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

        // Permission bits don't bind root; nothing to check there
        if fs::write(locked.join("write_check"), b"").is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let (sender, receiver) = EventChannel::new();
        let report =
            find_and_remove_duplicates_with_events(&locked, &DedupOptions::default(), &sender)
                .unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert!(report.removed.is_empty());
        let failed: Vec<_> = report.remove_failures.iter().map(|(p, _)| p.clone()).collect();
        assert_eq!(failed, vec![locked.join("b.png"), locked.join("c.png")]);
        assert!(locked.join("b.png").exists());

        let remove_failed = receiver
            .drain()
            .into_iter()
            .filter(|e| matches!(e, Event::Dedup(DedupEvent::RemoveFailed { .. })))
            .count();
        assert_eq!(remove_failed, 2);
    }
}
