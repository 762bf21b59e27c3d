//! # Error Module
//!
//! Error types for the dataset housekeeping tools.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - paths, file names, what went wrong
//! - Per-file problems inside a batch are recorded in the batch report;
//!   only conditions that make the whole operation meaningless are errors

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum TidyError {
    #[error("Scanning error: {0}")]
    Scan(#[from] ScanError),

    #[error("Hashing error: {0}")]
    Hash(#[from] HashError),

    #[error("Hash store error: {0}")]
    Store(#[from] StoreError),

    #[error("Resize error: {0}")]
    Resize(#[from] ResizeError),

    #[error("Scraper error: {0}")]
    Scrape(#[from] ScrapeError),

    #[error("Failed to create output directory {path}: {source}")]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors that occur while listing or walking directories
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Permission denied accessing: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Failed to read directory {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur during image decoding and hashing
#[derive(Error, Debug)]
pub enum HashError {
    #[error("Failed to decode image {path}: {reason}")]
    DecodeError { path: PathBuf, reason: String },

    #[error("Image is empty or corrupted: {path}")]
    EmptyImage { path: PathBuf },

    #[error("Invalid hash size: {size} (must be at least 1)")]
    InvalidHashSize { size: u32 },

    #[error("Invalid hash string {value:?}: {reason}")]
    InvalidHashString { value: String, reason: String },

    #[error("Failed to open image file {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur reading or writing a hash file
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read hash file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write hash file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur while resizing a single image
#[derive(Error, Debug)]
pub enum ResizeError {
    #[error(transparent)]
    Decode(#[from] HashError),

    #[error("Invalid dimensions: target {target_size}, crop {crop_size}")]
    InvalidDimensions { target_size: u32, crop_size: u32 },

    #[error("Resize failed for {path}: {reason}")]
    ResizeFailed { path: PathBuf, reason: String },

    #[error("Failed to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to build worker pool: {0}")]
    WorkerPool(String),
}

/// Errors from the external image downloader
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("Invalid scrape request: {0}")]
    InvalidRequest(String),

    #[error("Failed to launch downloader {program}: {source}")]
    Launch {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Downloader exited with status {status}: {stderr}")]
    Failed { status: String, stderr: String },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, TidyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_error_includes_path() {
        let error = ScanError::DirectoryNotFound {
            path: PathBuf::from("/datasets/cats"),
        };
        let message = error.to_string();
        assert!(message.contains("/datasets/cats"));
    }

    #[test]
    fn hash_error_includes_path() {
        let error = HashError::DecodeError {
            path: PathBuf::from("/datasets/broken.jpg"),
            reason: "invalid JPEG".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("/datasets/broken.jpg"));
        assert!(message.contains("invalid JPEG"));
    }

    #[test]
    fn store_error_converts_to_top_level() {
        let error: TidyError = StoreError::Read {
            path: PathBuf::from("hashes.txt"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        }
        .into();
        assert!(matches!(error, TidyError::Store(_)));
        assert!(error.to_string().contains("hashes.txt"));
    }

    #[test]
    fn resize_decode_error_is_transparent() {
        let error = ResizeError::from(HashError::EmptyImage {
            path: PathBuf::from("empty.png"),
        });
        assert_eq!(error.to_string(), "Image is empty or corrupted: empty.png");
    }
}
