//! # Scraper Module
//!
//! Hands image downloads to an external program.
//!
//! Nothing here talks to the network. [`ScrapeRequest`] describes what to
//! fetch and [`ImageScraper`] is the seam. [`CommandScraper`] runs a
//! downloader executable and counts what it left in the output directory.
//!
//! ## Downloader contract
//! The program is called as
//! ```text
//! <program> --query <text> --limit <n> --output-dir <dir> --timeout <seconds>
//!           [--force-replace] [--verbose]
//! ```
//! where `<seconds>` may be fractional (`0.5`). It must write images under
//! `<dir>` and exit non-zero on failure. A small wrapper script around a
//! Bing image downloader library satisfies this.

use crate::core::scanner::{ScanConfig, WalkDirScanner};
use crate::error::ScrapeError;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;
use tracing::{debug, info};

/// Program run by [`CommandScraper::default`]; looked up on `PATH`
pub const DEFAULT_DOWNLOADER: &str = "bing-image-downloader";

/// A download request
#[derive(Debug, Clone)]
pub struct ScrapeRequest {
    /// Search term
    pub query: String,
    /// Maximum number of images to fetch
    pub limit: usize,
    /// Where the downloader writes
    pub output_dir: PathBuf,
    /// Replace an existing output directory
    pub force_replace: bool,
    /// Per-request network timeout
    pub timeout: Duration,
    /// Ask the downloader to report each image
    pub verbose: bool,
}

impl Default for ScrapeRequest {
    fn default() -> Self {
        Self {
            query: String::new(),
            limit: 100,
            output_dir: PathBuf::from("output"),
            force_replace: false,
            timeout: Duration::from_secs(2),
            verbose: true,
        }
    }
}

impl ScrapeRequest {
    /// Request `query` with the default limit, directory and timeout
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    /// Set the maximum number of images
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Set the download directory
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Replace an existing download directory
    pub fn force_replace(mut self, force: bool) -> Self {
        self.force_replace = force;
        self
    }

    /// Set the per-request network timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Ask the downloader to report each image
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Reject requests that could never produce images
    pub fn validate(&self) -> Result<(), ScrapeError> {
        if self.query.trim().is_empty() {
            return Err(ScrapeError::InvalidRequest("query is empty".to_string()));
        }
        if self.limit == 0 {
            return Err(ScrapeError::InvalidRequest(
                "limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// What a finished download left behind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeSummary {
    /// Directory the downloader wrote to
    pub output_dir: PathBuf,
    /// Image files found under `output_dir` after the download
    pub images: usize,
}

/// Something that can fulfil a [`ScrapeRequest`]
pub trait ImageScraper {
    /// Fetch the images described by `request`
    fn download(&self, request: &ScrapeRequest) -> Result<ScrapeSummary, ScrapeError>;
}

/// Runs an external downloader executable following the contract in the
/// module docs
#[derive(Debug, Clone)]
pub struct CommandScraper {
    program: PathBuf,
}

impl Default for CommandScraper {
    fn default() -> Self {
        Self::new(DEFAULT_DOWNLOADER)
    }
}

impl CommandScraper {
    /// Use `program` as the downloader
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// The downloader executable
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Command-line arguments passed to the downloader for `request`
    pub fn args(request: &ScrapeRequest) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "--query".into(),
            request.query.clone().into(),
            "--limit".into(),
            request.limit.to_string().into(),
            "--output-dir".into(),
            request.output_dir.clone().into_os_string(),
            "--timeout".into(),
            request.timeout.as_secs_f64().to_string().into(),
        ];
        if request.force_replace {
            args.push("--force-replace".into());
        }
        if request.verbose {
            args.push("--verbose".into());
        }
        args
    }
}

impl ImageScraper for CommandScraper {
    fn download(&self, request: &ScrapeRequest) -> Result<ScrapeSummary, ScrapeError> {
        request.validate()?;

        info!(
            "Downloading up to {} images for {:?} into {}",
            request.limit,
            request.query,
            request.output_dir.display()
        );

        let output = Command::new(&self.program)
            .args(Self::args(request))
            .output()
            .map_err(|source| ScrapeError::Launch {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ScrapeError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        debug!("{}", String::from_utf8_lossy(&output.stdout));

        Ok(ScrapeSummary {
            output_dir: request.output_dir.clone(),
            images: count_images(&request.output_dir),
        })
    }
}

/// Count allow-listed image files anywhere under `dir`; missing dir counts 0
fn count_images(dir: &Path) -> usize {
    WalkDirScanner::new(ScanConfig::default())
        .scan(dir)
        .map(|result| result.files.len())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_match_downloader_defaults() {
        let request = ScrapeRequest::new("red bicycle");
        assert_eq!(request.limit, 100);
        assert_eq!(request.output_dir, PathBuf::from("output"));
        assert!(!request.force_replace);
        assert_eq!(request.timeout, Duration::from_secs(2));
        assert!(request.verbose);
    }

    #[test]
    fn args_follow_request() {
        let request = ScrapeRequest::new("cats")
            .limit(5)
            .output_dir("/tmp/cats")
            .force_replace(true)
            .verbose(false)
            .timeout(Duration::from_secs(10));

        let args: Vec<String> = CommandScraper::args(&request)
            .into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();

        assert_eq!(
            args,
            vec![
                "--query",
                "cats",
                "--limit",
                "5",
                "--output-dir",
                "/tmp/cats",
                "--timeout",
                "10",
                "--force-replace"
            ]
        );
    }

    #[test]
    fn sub_second_timeout_is_not_truncated() {
        let request = ScrapeRequest::new("cats").timeout(Duration::from_millis(500));
        let args = CommandScraper::args(&request);

        let position = args.iter().position(|a| a == "--timeout").unwrap();
        assert_eq!(args[position + 1], "0.5");
    }

    #[test]
    fn invalid_requests_are_rejected_before_launch() {
        let scraper = CommandScraper::new("/nonexistent/downloader");

        let empty = scraper.download(&ScrapeRequest::new("  "));
        assert!(matches!(empty, Err(ScrapeError::InvalidRequest(_))));

        let zero = scraper.download(&ScrapeRequest::new("dogs").limit(0));
        assert!(matches!(zero, Err(ScrapeError::InvalidRequest(_))));
    }

    #[test]
    fn missing_program_is_a_launch_error() {
        let scraper = CommandScraper::new("/nonexistent/downloader");
        let result = scraper.download(&ScrapeRequest::new("dogs"));
        assert!(matches!(result, Err(ScrapeError::Launch { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn failing_program_is_reported() {
        let scraper = CommandScraper::new("false");
        let result = scraper.download(&ScrapeRequest::new("dogs"));
        assert!(matches!(result, Err(ScrapeError::Failed { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn successful_run_counts_images() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("dogs");
        std::fs::create_dir(&nested).unwrap();
        std::fs::write(nested.join("Image_1.jpg"), b"x").unwrap();
        std::fs::write(nested.join("Image_2.png"), b"x").unwrap();
        std::fs::write(nested.join("log.txt"), b"x").unwrap();

        let scraper = CommandScraper::new("true");
        let summary = scraper
            .download(&ScrapeRequest::new("dogs").output_dir(dir.path()))
            .unwrap();

        assert_eq!(summary.images, 2);
        assert_eq!(summary.output_dir, dir.path());
    }
}
