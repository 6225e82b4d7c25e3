//! Run statistics
//!
//! Counters are updated concurrently by every fetch task and read once at the
//! end of the run.

use crate::state::TargetState;
use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters for a mirror run
#[derive(Debug, Default)]
pub struct CrawlStatistics {
    saved: AtomicU64,
    rejected: AtomicU64,
    failed: AtomicU64,
    duplicates: AtomicU64,
    checked: AtomicU64,
    bytes_written: AtomicU64,
}

/// Point-in-time copy of [`CrawlStatistics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Resources written to disk
    pub saved: u64,

    /// Targets dropped before fetching (invalid, foreign or failed HEAD check)
    pub rejected: u64,

    /// Targets whose download or persistence failed
    pub failed: u64,

    /// Discovered links that were already claimed
    pub duplicates: u64,

    /// HEAD checks that succeeded
    pub checked: u64,

    /// Total body bytes written
    pub bytes_written: u64,
}

impl StatsSnapshot {
    /// Returns the number of targets that reached a terminal state
    pub fn total(&self) -> u64 {
        self.saved + self.rejected + self.failed
    }
}

impl CrawlStatistics {
    /// Creates zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts a target that reached `state`
    ///
    /// Only terminal states are counted; intermediate states are ignored.
    pub fn record(&self, state: TargetState) {
        let counter = match state {
            TargetState::Saved => &self.saved,
            TargetState::Rejected => &self.rejected,
            TargetState::Failed => &self.failed,
            _ => return,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts a discovered link dropped because it was already claimed
    pub fn record_duplicate(&self) {
        self.duplicates.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts a successful HEAD check
    pub fn record_checked(&self) {
        self.checked.fetch_add(1, Ordering::Relaxed);
    }

    /// Adds to the written byte total
    pub fn record_bytes(&self, bytes: usize) {
        self.bytes_written.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    /// Reads every counter
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            saved: self.saved.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            duplicates: self.duplicates.load(Ordering::Relaxed),
            checked: self.checked.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
        }
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to print
pub fn print_statistics(stats: &StatsSnapshot) {
    println!("=== Mirror Statistics ===\n");

    println!("Targets by State:");
    let total = stats.total();
    for (state, count) in [
        (TargetState::Saved, stats.saved),
        (TargetState::Rejected, stats.rejected),
        (TargetState::Failed, stats.failed),
    ] {
        let percentage = if total > 0 {
            (count as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        println!("  {}: {} ({:.1}%)", state, count, percentage);
    }
    println!();

    println!("Other:");
    println!("  HEAD checks passed: {}", stats.checked);
    println!("  Duplicate links dropped: {}", stats.duplicates);
    println!("  Bytes written: {}", stats.bytes_written);
    println!();

    let success_rate = if total > 0 {
        (stats.saved as f64 / total as f64) * 100.0
    } else {
        0.0
    };

    println!(
        "Success Rate: {:.1}% ({} / {} targets saved)",
        success_rate, stats.saved, total
    );
}
