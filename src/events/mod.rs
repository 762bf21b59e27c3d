//! # Events Module
//!
//! Structured reporting for batch operations.
//!
//! ## Design
//! The library never prints. Every batch operation takes an `EventSender`
//! and emits one event per item it touches, alongside `tracing` log lines.
//! A CLI can drive progress bars from the receiver, and tests can assert on
//! the exact diagnostics a run produced.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! let report = find_and_remove_duplicates_with_events(&dir, &DedupOptions::default(), &sender)?;
//! drop(sender);
//!
//! for event in receiver.iter() {
//!     if let Event::Dedup(DedupEvent::Removed { path }) = event {
//!         println!("removed {}", path.display());
//!     }
//! }
//! ```

mod channel;
mod types;

pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use types::*;
