//! # Dataset Tidy
//!
//! Housekeeping for image datasets before training.
//!
//! ## What it does
//! - **Deduplicate** - drop images whose average hash matches an earlier one
//! - **Filter** - copy only the images missing from a reference hash file
//! - **Resize** - resize and center-crop whole trees in parallel
//! - **Clean** - delete files that do not decode
//!
//! ## Architecture
//! - `core` - The engine (hashing, hash files, dedup, resize, validation)
//! - `events` - Structured diagnostics sent over a channel
//! - `error` - Error types
//!
//! The library never prints. Diagnostics go to `tracing` and to the
//! event channel handed to each `*_with_events` operation.

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{Result, TidyError};

/// Initialize tracing for the binary
///
/// Reads the level from `RUST_LOG`. Fails if a global subscriber is
/// already installed.
pub fn init_tracing() -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| TidyError::Config(format!("Failed to set tracing subscriber: {e}")))
}
