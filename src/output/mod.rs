//! Output module for writing the mirrored tree
//!
//! This module handles:
//! - Deriving a safe on-disk location for every fetched URL
//! - Writing resource bodies under the output root
//! - Recording run statistics

mod paths;
pub mod stats;

pub use paths::{extension_for, write_resource, OutputLocation, PathMapper};
pub use stats::{print_statistics, CrawlStatistics, StatsSnapshot};
