//! # CLI Module
//!
//! Command-line interface for the dataset housekeeping tools.
//!
//! ## Usage
//! ```bash
//! # Remove duplicates inside one directory
//! dataset-tidy dedupe data/train
//!
//! # Record the hashes of a reference set, then filter a new batch against it
//! dataset-tidy store-hashes hashes.txt data/test
//! dataset-tidy filter data/scraped hashes.txt data/scraped_clean
//!
//! # Resize and crop a whole tree with 8 workers
//! dataset-tidy resize data/raw data/prepared --workers 8
//!
//! # JSON output
//! dataset-tidy clean data/raw --output json
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use dataset_tidy::core::dedup::{
    filter_dataset_with_events, find_and_remove_duplicates_with_events, DedupOptions,
    DedupReport, FilterOutcome, FilterReport,
};
use dataset_tidy::core::hasher::HasherConfig;
use dataset_tidy::core::resizer::{process_image_directory_with_events, ResizeConfig, ResizeReport};
use dataset_tidy::core::scanner::list_files;
use dataset_tidy::core::scraper::{CommandScraper, ImageScraper, ScrapeRequest, DEFAULT_DOWNLOADER};
use dataset_tidy::core::store::{store_hashes_with, StoreReport};
use dataset_tidy::core::validator::{remove_corrupted_images_with_events, ValidationReport};
use dataset_tidy::error::Result;
use dataset_tidy::events::{null_sender, Event, EventChannel, ResizeEvent};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

/// Dataset Tidy - keep image datasets clean before training
#[derive(Parser, Debug)]
#[command(name = "dataset-tidy")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, global = true, default_value = "pretty")]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Delete images whose hash matches an earlier file in the same directory
    Dedupe {
        /// Directory to deduplicate (not recursive)
        directory: PathBuf,

        /// Report duplicates without deleting them
        #[arg(long)]
        dry_run: bool,

        /// Hash grid side length
        #[arg(long, default_value = "8")]
        hash_size: u32,
    },

    /// Write the hashes of images to a hash file (overwrites it)
    StoreHashes {
        /// Hash file to write
        hash_file: PathBuf,

        /// Image files, or directories whose files are all hashed
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Hash grid side length
        #[arg(long, default_value = "8")]
        hash_size: u32,
    },

    /// Copy the images of a dataset whose hash is not in a hash file
    Filter {
        /// Directory to filter (not recursive)
        dataset_dir: PathBuf,

        /// Reference hash file
        hash_file: PathBuf,

        /// Where kept images are copied
        output_dir: PathBuf,

        /// Hash grid side length (must match the hash file)
        #[arg(long, default_value = "8")]
        hash_size: u32,
    },

    /// Resize and center-crop every jpeg/jpg/png under a directory
    Resize {
        /// Directory walked recursively
        input_dir: PathBuf,

        /// Flat output directory
        output_dir: PathBuf,

        /// Worker threads
        #[arg(short, long, default_value = "12")]
        workers: usize,

        /// Side of the intermediate square
        #[arg(long, default_value = "256")]
        target_size: u32,

        /// Side of the final crop
        #[arg(long, default_value = "224")]
        crop_size: u32,
    },

    /// Delete files that do not decode as images
    Clean {
        /// Directory to clean (not recursive)
        directory: PathBuf,
    },

    /// Download images with an external downloader
    Scrape {
        /// Search term
        query: String,

        /// Maximum number of images
        #[arg(short, long, default_value = "100")]
        limit: usize,

        /// Download directory
        #[arg(long, default_value = "output")]
        output_dir: PathBuf,

        /// Replace the download directory if it exists
        #[arg(long)]
        force_replace: bool,

        /// Network timeout in seconds
        #[arg(long, default_value = "2")]
        timeout: u64,

        /// Silence the downloader's own output
        #[arg(short, long)]
        quiet: bool,

        /// Downloader executable
        #[arg(long, default_value = DEFAULT_DOWNLOADER)]
        program: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let term = Term::stderr();

    match cli.command {
        Commands::Dedupe {
            directory,
            dry_run,
            hash_size,
        } => {
            let options = DedupOptions::new()
                .hasher(HasherConfig::new().hash_size(hash_size))
                .dry_run(dry_run);
            let report = find_and_remove_duplicates_with_events(&directory, &options, &null_sender())?;
            match cli.output {
                OutputFormat::Pretty => print_dedup(&term, &report, dry_run),
                OutputFormat::Json => print_json(&report),
            }
        }
        Commands::StoreHashes {
            hash_file,
            paths,
            hash_size,
        } => {
            let hasher = HasherConfig::new().hash_size(hash_size).build()?;
            let files = expand_paths(paths)?;
            let report = store_hashes_with(hasher.as_ref(), &files, &hash_file, &null_sender())?;
            match cli.output {
                OutputFormat::Pretty => print_store(&term, &report, &hash_file),
                OutputFormat::Json => print_json(&report),
            }
        }
        Commands::Filter {
            dataset_dir,
            hash_file,
            output_dir,
            hash_size,
        } => {
            let report = filter_dataset_with_events(
                &dataset_dir,
                &hash_file,
                &output_dir,
                &HasherConfig::new().hash_size(hash_size),
                &null_sender(),
            )?;
            match cli.output {
                OutputFormat::Pretty => print_filter(&term, &report),
                OutputFormat::Json => print_json(&report),
            }
        }
        Commands::Resize {
            input_dir,
            output_dir,
            workers,
            target_size,
            crop_size,
        } => {
            let config = ResizeConfig::new()
                .target_size(target_size)
                .crop_size(crop_size)
                .max_workers(workers);
            let show_progress = matches!(cli.output, OutputFormat::Pretty);
            let report = run_resize(&input_dir, &output_dir, &config, show_progress)?;
            match cli.output {
                OutputFormat::Pretty => print_resize(&term, &report),
                OutputFormat::Json => print_json(&report),
            }
        }
        Commands::Clean { directory } => {
            let report = remove_corrupted_images_with_events(&directory, &null_sender())?;
            match cli.output {
                OutputFormat::Pretty => print_clean(&term, &report),
                OutputFormat::Json => print_json(&report),
            }
        }
        Commands::Scrape {
            query,
            limit,
            output_dir,
            force_replace,
            timeout,
            quiet,
            program,
        } => {
            let request = ScrapeRequest::new(query)
                .limit(limit)
                .output_dir(output_dir)
                .force_replace(force_replace)
                .timeout(Duration::from_secs(timeout))
                .verbose(!quiet);
            let summary = CommandScraper::new(program).download(&request)?;
            match cli.output {
                OutputFormat::Pretty => {
                    term.write_line(&format!(
                        "{} {} images in {}",
                        style("✓").green().bold(),
                        style(summary.images).cyan(),
                        summary.output_dir.display()
                    ))
                    .ok();
                }
                OutputFormat::Json => print_json(&serde_json::json!({
                    "output_dir": summary.output_dir,
                    "images": summary.images,
                })),
            }
        }
    }

    Ok(())
}

/// Files are kept as given; directories contribute their direct files.
fn expand_paths(paths: Vec<PathBuf>) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            files.extend(list_files(&path)?);
        } else {
            files.push(path);
        }
    }
    Ok(files)
}

fn run_resize(
    input_dir: &Path,
    output_dir: &Path,
    config: &ResizeConfig,
    show_progress: bool,
) -> Result<ResizeReport> {
    let (sender, receiver) = EventChannel::new();

    let progress = if show_progress {
        let pb = ProgressBar::new(0);
        let bar_style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .map(|s| s.progress_chars("█▓░"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        pb.set_style(bar_style);
        Some(pb)
    } else {
        None
    };

    let progress_clone = progress.clone();

    // Handle events in a separate thread
    let event_thread = thread::spawn(move || {
        for event in receiver.iter() {
            let Some(ref pb) = progress_clone else {
                continue;
            };
            match event {
                Event::Resize(ResizeEvent::Started { total_images, .. }) => {
                    pb.set_length(total_images as u64);
                }
                Event::Resize(ResizeEvent::Progress(p)) => {
                    pb.set_position(p.completed as u64);
                    pb.set_message(
                        p.current_path
                            .file_name()
                            .unwrap_or_default()
                            .to_string_lossy()
                            .into_owned(),
                    );
                }
                Event::Resize(ResizeEvent::Completed { .. }) => pb.finish_and_clear(),
                _ => {}
            }
        }
    });

    let result = process_image_directory_with_events(input_dir, output_dir, config, &sender);

    // Drop sender to signal event thread to finish
    drop(sender);
    event_thread.join().ok();
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    result
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize output: {}", e),
    }
}

fn print_dedup(term: &Term, report: &DedupReport, dry_run: bool) {
    let duplicates: Vec<_> = report.duplicates().collect();
    term.write_line(&format!(
        "{} {} files checked, {} duplicates",
        style("✓").green().bold(),
        style(report.outcomes.len()).cyan(),
        style(duplicates.len()).cyan()
    ))
    .ok();

    let verb = if dry_run { "would remove" } else { "removed" };
    let listed: Vec<_> = if dry_run {
        duplicates
    } else {
        report.removed.iter().map(PathBuf::as_path).collect()
    };
    for path in listed {
        term.write_line(&format!("  {} {}", style(verb).dim(), path.display()))
            .ok();
    }

    for (path, reason) in &report.remove_failures {
        term.write_line(&format!(
            "  {} {}: {}",
            style("failed").red(),
            path.display(),
            reason
        ))
        .ok();
    }

    let unhashed = report.unhashed().count();
    if unhashed > 0 {
        term.write_line(&format!(
            "  {} files could not be hashed and were left alone",
            style(unhashed).yellow()
        ))
        .ok();
    }
}

fn print_store(term: &Term, report: &StoreReport, hash_file: &Path) {
    term.write_line(&format!(
        "{} {} hashes written to {}",
        style("✓").green().bold(),
        style(report.stored.len()).cyan(),
        hash_file.display()
    ))
    .ok();

    for path in &report.skipped {
        term.write_line(&format!("  {} {}", style("skipped").yellow(), path.display()))
            .ok();
    }
}

fn print_filter(term: &Term, report: &FilterReport) {
    term.write_line(&format!(
        "{} {} copied, {} filtered out ({} reference hashes)",
        style("✓").green().bold(),
        style(report.copied_count()).cyan(),
        style(report.filtered_count()).cyan(),
        report.reference_hashes
    ))
    .ok();

    for (path, outcome) in &report.outcomes {
        if let FilterOutcome::CopiedUnhashed { .. } = outcome {
            term.write_line(&format!(
                "  {} {} (could not be hashed)",
                style("copied").yellow(),
                path.display()
            ))
            .ok();
        }
    }

    for (path, reason) in report.failures() {
        term.write_line(&format!(
            "  {} {}: {}",
            style("failed").red(),
            path.display(),
            reason
        ))
        .ok();
    }
}

fn print_resize(term: &Term, report: &ResizeReport) {
    term.write_line(&format!(
        "{} {} images written",
        style("✓").green().bold(),
        style(report.written().count()).cyan()
    ))
    .ok();

    for (path, reason) in report.failures() {
        term.write_line(&format!(
            "  {} {}: {}",
            style("failed").red(),
            path.display(),
            reason
        ))
        .ok();
    }

    for error in &report.scan_errors {
        term.write_line(&format!("  {} {}", style("unreadable").yellow(), error))
            .ok();
    }
}

fn print_clean(term: &Term, report: &ValidationReport) {
    term.write_line(&format!(
        "{} {} files checked, {} corrupted removed",
        style("✓").green().bold(),
        style(report.checked).cyan(),
        style(report.removed.len()).cyan()
    ))
    .ok();

    for path in &report.removed {
        term.write_line(&format!("  {} {}", style("removed").dim(), path.display()))
            .ok();
    }

    for (path, reason) in &report.remove_failures {
        term.write_line(&format!(
            "  {} {}: {}",
            style("failed").red(),
            path.display(),
            reason
        ))
        .ok();
    }
}
