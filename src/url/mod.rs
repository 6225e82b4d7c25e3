//! URL handling module for Sumi-Mirror
//!
//! This module resolves URLs discovered in fetched content into absolute,
//! fragment-free crawl targets and keeps the crawl confined to the mirrored origin.

mod origin;
mod resolve;

// Re-export main types
pub use origin::Origin;
pub use resolve::{resolve, CrawlTarget};
