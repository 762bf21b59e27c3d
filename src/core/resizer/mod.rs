//! # Resizer Module
//!
//! Prepares images for training: resize to a square, then center-crop.
//!
//! The default 256 → 224 pipeline matches the usual ImageNet-style input
//! preparation. Output is always JPEG at the encoder's default quality;
//! alpha channels are dropped.
//!
//! ## Example
//! ```rust,ignore
//! use dataset_tidy::core::resizer::{process_image_directory, resize_and_crop_image};
//!
//! resize_and_crop_image(Path::new("cat.png"), Path::new("cat.jpeg"), 256, 224)?;
//! let report = process_image_directory(Path::new("raw"), Path::new("prepared"), 12)?;
//! ```

mod batch;

pub use batch::{process_image_directory, process_image_directory_with_events};

use crate::core::imaging::{FastDecoder, FastResizer};
use crate::error::ResizeError;
use image::codecs::jpeg::JpegEncoder;
use image::imageops;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Side of the intermediate square
pub const DEFAULT_TARGET_SIZE: u32 = 256;
/// Side of the final center crop
pub const DEFAULT_CROP_SIZE: u32 = 224;
/// Worker threads for batch processing
pub const DEFAULT_MAX_WORKERS: usize = 12;
/// Extension given to every output file
pub const OUTPUT_EXTENSION: &str = "jpeg";

/// Configuration for resize batches
#[derive(Debug, Clone)]
pub struct ResizeConfig {
    /// Side of the square the image is first resized to
    pub target_size: u32,
    /// Side of the centered square kept afterwards
    pub crop_size: u32,
    /// Number of worker threads
    pub max_workers: usize,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            target_size: DEFAULT_TARGET_SIZE,
            crop_size: DEFAULT_CROP_SIZE,
            max_workers: DEFAULT_MAX_WORKERS,
        }
    }
}

impl ResizeConfig {
    /// Create a configuration with the defaults (256, 224, 12 workers)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the intermediate square size
    pub fn target_size(mut self, size: u32) -> Self {
        self.target_size = size;
        self
    }

    /// Set the crop size
    pub fn crop_size(mut self, size: u32) -> Self {
        self.crop_size = size;
        self
    }

    /// Set the worker pool width
    pub fn max_workers(mut self, workers: usize) -> Self {
        self.max_workers = workers;
        self
    }

    /// Check the sizes and worker count
    pub fn validate(&self) -> Result<(), ResizeError> {
        check_dimensions(self.target_size, self.crop_size)?;
        if self.max_workers == 0 {
            return Err(ResizeError::WorkerPool(
                "max_workers must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// What happened to one input of a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ResizeOutcome {
    /// The resized image was written here
    Written { output: PathBuf },
    /// The task failed; nothing useful was written
    Failed { reason: String },
}

/// Result of a batch resize
#[derive(Debug, Default, Serialize)]
pub struct ResizeReport {
    /// One entry per matching input file, in walk order
    pub outcomes: Vec<(PathBuf, ResizeOutcome)>,
    /// Directory entries that could not be read during the walk
    pub scan_errors: Vec<String>,
}

impl ResizeReport {
    /// Output files written
    pub fn written(&self) -> impl Iterator<Item = &Path> + '_ {
        self.outcomes.iter().filter_map(|(_, outcome)| match outcome {
            ResizeOutcome::Written { output } => Some(output.as_path()),
            ResizeOutcome::Failed { .. } => None,
        })
    }

    /// Inputs whose task failed, with the reason
    pub fn failures(&self) -> impl Iterator<Item = (&Path, &str)> + '_ {
        self.outcomes.iter().filter_map(|(input, outcome)| match outcome {
            ResizeOutcome::Failed { reason } => Some((input.as_path(), reason.as_str())),
            ResizeOutcome::Written { .. } => None,
        })
    }

    /// True when every task succeeded
    pub fn is_complete(&self) -> bool {
        self.failures().next().is_none()
    }
}

fn check_dimensions(target_size: u32, crop_size: u32) -> Result<(), ResizeError> {
    if target_size == 0 || crop_size == 0 || crop_size > target_size {
        return Err(ResizeError::InvalidDimensions {
            target_size,
            crop_size,
        });
    }
    Ok(())
}

/// Resize `input` to `target_size` squared, keep the centered `crop_size`
/// square, and write it to `output` as JPEG.
///
/// The aspect ratio is not preserved. Every failure is returned to the
/// caller.
pub fn resize_and_crop_image(
    input: &Path,
    output: &Path,
    target_size: u32,
    crop_size: u32,
) -> Result<(), ResizeError> {
    check_dimensions(target_size, crop_size)?;

    let image = FastDecoder::decode(input)?;

    let resized = FastResizer::new()
        .resize_rgb(&image, target_size, target_size)
        .map_err(|reason| ResizeError::ResizeFailed {
            path: input.to_path_buf(),
            reason,
        })?;

    let offset = (target_size - crop_size) / 2;
    let cropped = imageops::crop_imm(&resized, offset, offset, crop_size, crop_size).to_image();

    let write_error = |source| ResizeError::Write {
        path: output.to_path_buf(),
        source,
    };

    let mut writer = BufWriter::new(File::create(output).map_err(write_error)?);
    JpegEncoder::new(&mut writer)
        .encode_image(&cropped)
        .map_err(|source| ResizeError::Encode {
            path: output.to_path_buf(),
            source,
        })?;
    writer.flush().map_err(write_error)?;

    Ok(())
}

/// Output path for `input`: same stem, `.jpeg` extension, inside `output_dir`
pub fn output_path_for(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_default();
    let mut name = stem;
    name.push(".");
    name.push(OUTPUT_EXTENSION);
    output_dir.join(name)
}
