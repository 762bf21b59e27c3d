//! Parallel batch resizing over a directory tree.

use super::{output_path_for, resize_and_crop_image, ResizeConfig, ResizeOutcome, ResizeReport};
use crate::core::scanner::{ScanConfig, WalkDirScanner};
use crate::error::{ResizeError, Result, TidyError};
use crate::events::{null_sender, Event, EventSender, ResizeEvent, ResizeProgress};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{info, warn};

/// Resize and crop every jpeg/jpg/png under `input_dir` into `output_dir`
/// using `max_workers` threads and the default 256/224 sizes.
///
/// Blocks until every task has finished. A task that fails is recorded in
/// the report and does not stop the others.
pub fn process_image_directory(
    input_dir: &Path,
    output_dir: &Path,
    max_workers: usize,
) -> Result<ResizeReport> {
    process_image_directory_with_events(
        input_dir,
        output_dir,
        &ResizeConfig::new().max_workers(max_workers),
        &null_sender(),
    )
}

/// Like [`process_image_directory`], with explicit sizes and an event sink.
///
/// Outputs are written flat into `output_dir` as `<stem>.jpeg`; inputs
/// sharing a stem overwrite each other.
pub fn process_image_directory_with_events(
    input_dir: &Path,
    output_dir: &Path,
    config: &ResizeConfig,
    events: &EventSender,
) -> Result<ResizeReport> {
    config.validate()?;

    let scanner = WalkDirScanner::new(ScanConfig {
        include_hidden: true,
        ..ScanConfig::default()
    });
    let scan = scanner.scan(input_dir)?;

    fs::create_dir_all(output_dir).map_err(|source| TidyError::OutputDirectory {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let tasks: Vec<(PathBuf, PathBuf)> = scan
        .files
        .into_iter()
        .map(|input| {
            let output = output_path_for(&input, output_dir);
            (input, output)
        })
        .collect();
    let total = tasks.len();

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.max_workers)
        .thread_name(|index| format!("resize-worker-{index}"))
        .build()
        .map_err(|e| ResizeError::WorkerPool(e.to_string()))?;

    events.send(Event::Resize(ResizeEvent::Started {
        total_images: total,
        workers: config.max_workers,
    }));

    let completed = AtomicUsize::new(0);

    let outcomes: Vec<(PathBuf, ResizeOutcome)> = pool.install(|| {
        tasks
            .into_par_iter()
            .map(|(input, output)| {
                let outcome =
                    match resize_and_crop_image(&input, &output, config.target_size, config.crop_size) {
                        Ok(()) => {
                            info!("Processed {} to {}", input.display(), output.display());
                            ResizeOutcome::Written { output }
                        }
                        Err(e) => {
                            warn!("Failed to process {}: {}", input.display(), e);
                            events.send(Event::Resize(ResizeEvent::Failed {
                                path: input.clone(),
                                message: e.to_string(),
                            }));
                            ResizeOutcome::Failed {
                                reason: e.to_string(),
                            }
                        }
                    };

                let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                events.send(Event::Resize(ResizeEvent::Progress(ResizeProgress {
                    completed: done,
                    total,
                    current_path: input.clone(),
                })));

                (input, outcome)
            })
            .collect()
    });

    let report = ResizeReport {
        outcomes,
        scan_errors: scan.errors.iter().map(ToString::to_string).collect(),
    };

    let failed = report.failures().count();
    events.send(Event::Resize(ResizeEvent::Completed {
        processed: total - failed,
        failed,
    }));

    Ok(report)
}
