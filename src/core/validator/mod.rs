//! # Validator Module
//!
//! Finds files that do not decode as images and removes them.
//!
//! A file counts as valid only when it decodes completely; the format is
//! guessed from the content, so a PNG saved as `.jpg` is still valid and a
//! text file named `.png` is not.

use crate::core::imaging::FastDecoder;
use crate::core::scanner::list_files;
use crate::error::Result;
use crate::events::{null_sender, Event, EventSender, ValidateEvent};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Result of a corrupted-image sweep
#[derive(Debug, Default, Serialize)]
pub struct ValidationReport {
    /// Number of files examined
    pub checked: usize,
    /// Files that failed to decode
    pub corrupted: Vec<PathBuf>,
    /// Corrupted files that were deleted
    pub removed: Vec<PathBuf>,
    /// Corrupted files whose deletion failed, with the reason
    pub remove_failures: Vec<(PathBuf, String)>,
}

/// Return true when `path` fully decodes as an image.
///
/// The reason a file is rejected goes to the `warn!` log.
pub fn is_image_file(path: &Path) -> bool {
    match FastDecoder::verify(path) {
        Ok(()) => true,
        Err(e) => {
            warn!("Invalid image {}: {}", path.display(), e);
            false
        }
    }
}

/// Delete every file directly inside `directory` that is not a valid image.
pub fn remove_corrupted_images(directory: &Path) -> Result<ValidationReport> {
    remove_corrupted_images_with_events(directory, &null_sender())
}

/// Like [`remove_corrupted_images`], with an event sink.
pub fn remove_corrupted_images_with_events(
    directory: &Path,
    events: &EventSender,
) -> Result<ValidationReport> {
    let files = list_files(directory)?;
    let mut report = ValidationReport {
        checked: files.len(),
        ..Default::default()
    };

    for path in files {
        if is_image_file(&path) {
            continue;
        }

        events.send(Event::Validate(ValidateEvent::Corrupted { path: path.clone() }));
        report.corrupted.push(path.clone());

        match fs::remove_file(&path) {
            Ok(()) => {
                info!("Removed corrupted image: {}", path.display());
                events.send(Event::Validate(ValidateEvent::Removed { path: path.clone() }));
                report.removed.push(path);
            }
            Err(e) => {
                warn!("Failed to remove {}: {}", path.display(), e);
                events.send(Event::Validate(ValidateEvent::RemoveFailed {
                    path: path.clone(),
                    message: e.to_string(),
                }));
                report.remove_failures.push((path, e.to_string()));
            }
        }
    }

    events.send(Event::Validate(ValidateEvent::Completed {
        checked: report.checked,
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

    fn save_valid(path: &Path) {
        ImageBuffer::from_pixel(16, 16, Rgb([10u8, 120, 200]))
            .save_with_format(path, image::ImageFormat::Png)
            .unwrap();
    }

    #[test]
    fn valid_png_is_an_image() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ok.png");
        save_valid(&path);

        assert!(is_image_file(&path));
    }

    #[test]
    fn content_decides_not_extension() {
        let dir = TempDir::new().unwrap();
        let misnamed = dir.path().join("actually_png.jpg");
        save_valid(&misnamed);
        let fake = dir.path().join("fake.png");
        fs::write(&fake, "hello").unwrap();

        assert!(is_image_file(&misnamed));
        assert!(!is_image_file(&fake));
        assert!(!is_image_file(&dir.path().join("missing.png")));
    }

    #[test]
    fn removes_garbage_and_keeps_images() {
        let dir = TempDir::new().unwrap();
        let good = dir.path().join("good.png");
        let bad = dir.path().join("bad.jpg");
        save_valid(&good);
        fs::write(&bad, b"garbage bytes").unwrap();

        let (sender, receiver) = EventChannel::new();
        let report = remove_corrupted_images_with_events(dir.path(), &sender).unwrap();

        assert!(good.exists());
        assert!(!bad.exists());
        assert_eq!(report.checked, 2);
        assert_eq!(report.removed, vec![bad.clone()]);
        assert!(report.remove_failures.is_empty());

        let corrupted = receiver
            .drain()
            .into_iter()
            .filter(|e| matches!(e, Event::Validate(ValidateEvent::Corrupted { .. })))
            .count();
        assert_eq!(corrupted, 1);
    }

    #[test]
    fn truncated_image_is_corrupted() {
        let dir = TempDir::new().unwrap();
        let full = dir.path().join("full.png");
        save_valid(&full);
        let bytes = fs::read(&full).unwrap();
        let truncated = dir.path().join("truncated.png");
        fs::write(&truncated, &bytes[..bytes.len() / 2]).unwrap();

        let report = remove_corrupted_images(dir.path()).unwrap();

        assert_eq!(report.removed, vec![truncated]);
        assert!(full.exists());
    }

    #[test]
    fn missing_directory_is_an_error() {
        let result = remove_corrupted_images(Path::new("/nonexistent/images"));
        assert!(matches!(
            result,
            Err(TidyError::Scan(ScanError::DirectoryNotFound { .. }))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn remove_failure_is_recorded() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::write(locked.join("bad_a.jpg"), b"garbage").unwrap();
        fs::write(locked.join("bad_b.png"), b"garbage").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

        // Permission bits don't bind root; nothing to check there
        if fs::write(locked.join("write_check"), b"").is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let report = remove_corrupted_images(&locked).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(report.corrupted.len(), 2);
        assert!(report.removed.is_empty());
        assert_eq!(report.remove_failures.len(), 2);
        assert!(locked.join("bad_a.jpg").exists());
    }
}
