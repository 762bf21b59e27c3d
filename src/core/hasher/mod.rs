//! # Hasher Module
//!
//! Computes perceptual fingerprints for single image files.
//!
//! ## How It Works
//! 1. Decode the file (zune-jpeg for JPEGs, image crate otherwise)
//! 2. Convert to grayscale and shrink to an 8x8 grid
//! 3. Set one bit per cell brighter than the grid's mean
//!
//! Two files are duplicates when their hashes are exactly equal. There is
//! no distance threshold: near-duplicates only match when the averaging
//! already collapses them to the same bits.
//!
//! ## Failure policy
//! [`compute_hash`] never fails. A file that cannot be read or decoded
//! yields `None`, a `warn!` line, and a [`HashEvent::Skipped`] event, so a
//! batch over a messy dataset keeps going.
//!
//! ## Example
//! ```rust,ignore
//! use dataset_tidy::core::hasher::HasherConfig;
//!
//! let hasher = HasherConfig::new().hash_size(8).build()?;
//! let hash = hasher.hash_file(&path)?;
//! println!("{hash}");
//! ```

mod algorithms;
mod traits;

pub use algorithms::AverageHasher;
pub use traits::{HashAlgorithm, ImageHashValue};

use crate::error::HashError;
use crate::events::{null_sender, Event, EventSender, HashEvent};
use std::path::Path;
use tracing::{debug, warn};

/// Default side length of the sampling grid (64-bit hashes)
pub const DEFAULT_HASH_SIZE: u32 = 8;

/// Configuration builder for hashers
#[derive(Debug, Clone)]
pub struct HasherConfig {
    /// Grid side length
    hash_size: u32,
}

impl HasherConfig {
    /// Create a new hasher configuration with defaults
    pub fn new() -> Self {
        Self {
            hash_size: DEFAULT_HASH_SIZE,
        }
    }

    /// Set the hash size.
    ///
    /// - 8: 64 bits, the usual choice for dataset deduplication
    /// - 16: 256 bits, fewer accidental collisions on simple images
    pub fn hash_size(mut self, size: u32) -> Self {
        self.hash_size = size;
        self
    }

    /// Build the hasher
    pub fn build(self) -> Result<Box<dyn HashAlgorithm>, HashError> {
        if self.hash_size == 0 {
            return Err(HashError::InvalidHashSize {
                size: self.hash_size,
            });
        }
        Ok(Box::new(AverageHasher::new(self.hash_size)))
    }
}

impl Default for HasherConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Hash a file with the default 8x8 average hash.
///
/// Returns `None` when the file can't be read or decoded.
pub fn compute_hash(path: &Path) -> Option<ImageHashValue> {
    compute_hash_with(&AverageHasher::new(DEFAULT_HASH_SIZE), path, &null_sender())
}

/// Hash a file with the given hasher, reporting the outcome on `events`.
pub fn compute_hash_with(
    hasher: &dyn HashAlgorithm,
    path: &Path,
    events: &EventSender,
) -> Option<ImageHashValue> {
    match hasher.hash_file(path) {
        Ok(hash) => {
            debug!(path = %path.display(), %hash, "computed hash");
            events.send(Event::Hash(HashEvent::Hashed {
                path: path.to_path_buf(),
                hash: hash.to_hex(),
            }));
            Some(hash)
        }
        Err(e) => {
            warn!("Failed to compute hash for {}: {}", path.display(), e);
            events.send(Event::Hash(HashEvent::Skipped {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventChannel;
    use image::{ImageBuffer, Rgb};
    use std::fs;
    use tempfile::TempDir;

    /// Bright top-left and bottom-right quadrants, dark elsewhere
    fn quadrant_image() -> ImageBuffer<Rgb<u8>, Vec<u8>> {
        ImageBuffer::from_fn(200, 200, |x, y| {
            if (x < 100) == (y < 100) {
                Rgb([235, 225, 230])
            } else {
                Rgb([20, 30, 25])
            }
        })
    }

    #[test]
    fn config_defaults_to_eight() {
        let config = HasherConfig::new();
        assert_eq!(config.hash_size, DEFAULT_HASH_SIZE);
        assert_eq!(config.build().unwrap().hash_size(), 8);
    }

    #[test]
    fn zero_hash_size_is_rejected() {
        let result = HasherConfig::new().hash_size(0).build();
        assert!(matches!(result, Err(HashError::InvalidHashSize { size: 0 })));
    }

    #[test]
    fn compute_hash_returns_sixteen_hex_chars() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("quadrants.png");
        quadrant_image().save(&path).unwrap();

        let hash = compute_hash(&path).unwrap();
        assert_eq!(hash.to_string().len(), 16);
        assert_eq!(hash.to_string(), "f0f0f0f00f0f0f0f");
    }

    #[test]
    fn png_and_jpeg_of_same_picture_hash_equal() {
        let dir = TempDir::new().unwrap();
        let png = dir.path().join("pic.png");
        let jpeg = dir.path().join("pic.jpg");
        let image = quadrant_image();
        image.save(&png).unwrap();
        image.save(&jpeg).unwrap();

        let png_hash = compute_hash(&png);
        assert!(png_hash.is_some());
        assert_eq!(png_hash, compute_hash(&jpeg));
    }

    #[test]
    fn corrupt_file_yields_none_and_skip_event() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("corrupt.jpg");
        fs::write(&path, b"definitely not a jpeg").unwrap();

        let (sender, receiver) = EventChannel::new();
        let hash = compute_hash_with(&AverageHasher::new(8), &path, &sender);

        assert!(hash.is_none());
        match receiver.try_recv() {
            Some(Event::Hash(HashEvent::Skipped { path: skipped, .. })) => {
                assert_eq!(skipped, path)
            }
            other => panic!("expected skip event, got {:?}", other),
        }
    }

    #[test]
    fn missing_file_yields_none() {
        assert!(compute_hash(Path::new("/nonexistent/dir/image.png")).is_none());
    }
}
