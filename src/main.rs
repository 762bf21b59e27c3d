//! # dataset-tidy CLI
//!
//! Command-line interface for the dataset housekeeping tools.
//!
//! ## Usage
//! ```bash
//! dataset-tidy dedupe data/train
//! dataset-tidy resize data/raw data/prepared --workers 8
//! ```

mod cli;

use dataset_tidy::Result;

fn main() -> Result<()> {
    dataset_tidy::init_tracing()?;
    cli::run()
}
