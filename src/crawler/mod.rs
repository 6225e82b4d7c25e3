//! Crawler module for fetching and processing the mirrored site
//!
//! This module contains the core mirroring logic, including:
//! - HTTP fetching with optional HEAD checks
//! - Link extraction from HTML and CSS
//! - At-most-once scheduling through the visited cache
//! - Rewriting absolute origin references
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod parser;
mod rewriter;
mod scheduler;
mod visited;

pub use coordinator::{run_mirror, Coordinator, Pipeline};
pub use fetcher::{build_http_client, fetch, FetchedResource};
pub use parser::{extract_css_urls, extract_links, parse_srcset, ContentKind};
pub use rewriter::{rewrite, RewriteRule};
pub use scheduler::{ResponseHandler, Scheduler};
pub use visited::VisitedCache;
