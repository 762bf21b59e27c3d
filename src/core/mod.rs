//! # Core Module
//!
//! The dataset housekeeping engine, free of any terminal concerns.
//!
//! ## Modules
//! - `imaging` - Decodes files and resizes pixel grids
//! - `scanner` - Lists dataset directories
//! - `hasher` - Computes average hashes
//! - `store` - Reads and writes hash files
//! - `dedup` - Removes or filters duplicate images
//! - `resizer` - Resizes and center-crops images in parallel
//! - `validator` - Removes files that do not decode
//! - `scraper` - Hands downloads to an external program

pub mod dedup;
pub mod hasher;
pub mod imaging;
pub mod resizer;
pub mod scanner;
pub mod scraper;
pub mod store;
pub mod validator;

// Re-export commonly used types
pub use dedup::{DedupOptions, DedupReport, FilterReport};
pub use hasher::{compute_hash, HasherConfig, ImageHashValue};
pub use resizer::{ResizeConfig, ResizeReport};
pub use scraper::{CommandScraper, ImageScraper, ScrapeRequest};
pub use store::{load_hashes, store_hashes};
pub use validator::{is_image_file, ValidationReport};
