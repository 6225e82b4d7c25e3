//! Crawler coordinator - main mirror orchestration logic
//!
//! This module ties the crawl together:
//! - Scheduling bootstrap probes, the origin seed and extra pages
//! - Claiming discovered links through the visited cache
//! - Rewriting, mapping and saving every fetched resource
//! - Reporting run statistics

use crate::config::Config;
use crate::crawler::fetcher::{build_http_client, FetchedResource};
use crate::crawler::parser::{extract_links, ContentKind};
use crate::crawler::rewriter::{rewrite, RewriteRule};
use crate::crawler::scheduler::{ResponseHandler, Scheduler};
use crate::crawler::visited::VisitedCache;
use crate::output::{write_resource, CrawlStatistics, OutputLocation, PathMapper, StatsSnapshot};
use crate::state::TargetState;
use crate::url::{CrawlTarget, Origin};
use crate::{MirrorError, UrlError};
use reqwest::Method;
use std::sync::Arc;
use url::Url;

/// Per-response processing shared by every fetch task
///
/// Everything here is either immutable after construction or internally
/// synchronized, so responses can be processed concurrently.
pub struct Pipeline {
    origin: Origin,
    visited: VisitedCache,
    rules: Vec<RewriteRule>,
    mapper: PathMapper,
    stats: CrawlStatistics,
}

impl Pipeline {
    /// Builds the pipeline for a configuration
    ///
    /// Fails if the configured site URL is not a valid origin.
    pub fn new(config: &Config) -> Result<Self, MirrorError> {
        let origin = Origin::parse(&config.mirror.url)?;
        let rules = if config.mirror.replace {
            RewriteRule::for_origin(&origin, config.mirror.replacement())?
        } else {
            Vec::new()
        };

        Ok(Self {
            origin,
            visited: VisitedCache::new(),
            rules,
            mapper: PathMapper::new(&config.mirror.dir),
            stats: CrawlStatistics::new(),
        })
    }

    /// Returns the mirrored origin
    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    /// Returns the visited cache
    pub fn visited(&self) -> &VisitedCache {
        &self.visited
    }

    /// Returns the live run statistics
    pub fn stats(&self) -> &CrawlStatistics {
        &self.stats
    }

    /// Resolves a discovered link and claims it
    ///
    /// Returns the target only if this call won the claim. Invalid and foreign
    /// links are counted as rejected; already-claimed links as duplicates.
    pub fn claim(&self, base: &Url, candidate: &str) -> Option<CrawlTarget> {
        let target = match self.origin.scope(base, candidate) {
            Ok(target) => target,
            Err(UrlError::ForeignDomain(url)) => {
                tracing::trace!("Skipping foreign URL {}", url);
                self.stats.record(TargetState::Rejected);
                return None;
            }
            Err(e) => {
                tracing::debug!("Skipping '{}': {}", candidate, e);
                self.stats.record(TargetState::Rejected);
                return None;
            }
        };

        self.claim_target(target)
    }

    /// Claims an already-resolved target
    pub fn claim_target(&self, target: CrawlTarget) -> Option<CrawlTarget> {
        if self.visited.try_claim(target.as_str()) {
            Some(target)
        } else {
            self.stats.record_duplicate();
            None
        }
    }

    /// Processes one downloaded resource
    ///
    /// Links are extracted from the original body and claimed before the
    /// rewrite, so a failed save never stops discovery.
    fn process(&self, resource: FetchedResource) -> Vec<CrawlTarget> {
        if !self.origin.is_same_host(&resource.final_url) {
            tracing::debug!(
                "{} redirected off-site to {}, not saving",
                resource.target,
                resource.final_url
            );
            self.stats.record(TargetState::Rejected);
            return Vec::new();
        }

        // Avoid refetching the redirect destination if it is linked later
        if resource.final_url.as_str() != resource.target.as_str() {
            self.visited.try_claim(resource.final_url.as_str());
        }

        let kind = ContentKind::detect(&resource.content_type, &resource.final_url);
        let discovered: Vec<CrawlTarget> = extract_links(&resource.body, kind)
            .iter()
            .filter_map(|candidate| self.claim(&resource.final_url, candidate))
            .collect();

        tracing::debug!(
            "{} links newly claimed from {}",
            discovered.len(),
            resource.final_url
        );

        let body = if self.rules.is_empty() {
            resource.body
        } else {
            rewrite(&resource.body, &self.rules)
        };

        match self.save(&resource.final_url, &resource.content_type, &body) {
            Ok(location) => {
                tracing::debug!("Saved {} to {}", resource.final_url, location.path().display());
                self.stats.record(TargetState::Saved);
                self.stats.record_bytes(body.len());
            }
            Err(e) => {
                tracing::error!("Failed to save {}: {}", resource.final_url, e);
                self.stats.record(TargetState::Failed);
            }
        }

        discovered
    }

    fn save(&self, url: &Url, content_type: &str, body: &[u8]) -> Result<OutputLocation, MirrorError> {
        let location = self.mapper.map_path(url, content_type)?;
        write_resource(&location, body)?;
        Ok(location)
    }
}

impl ResponseHandler for Pipeline {
    fn on_response(&self, resource: FetchedResource) -> Vec<CrawlTarget> {
        if resource.is_head() {
            self.stats.record_checked();
            return Vec::new();
        }

        self.process(resource)
    }

    fn on_error(&self, target: &CrawlTarget, method: &Method, error: MirrorError) {
        if *method == Method::HEAD {
            tracing::warn!("Check failed for {}: {}", target, error);
            self.stats.record(TargetState::Rejected);
        } else {
            tracing::warn!("Failed to fetch {}: {}", target, error);
            self.stats.record(TargetState::Failed);
        }
    }
}

/// Main mirror coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    pipeline: Arc<Pipeline>,
    scheduler: Scheduler<Pipeline>,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The validated configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(MirrorError)` - The site URL is invalid or the HTTP client failed to build
    pub fn new(config: Config) -> Result<Self, MirrorError> {
        let pipeline = Arc::new(Pipeline::new(&config)?);
        let client = build_http_client(&config.http)?;
        let scheduler = Scheduler::new(
            client,
            Arc::clone(&pipeline),
            config.mirror.concurrency(),
            config.mirror.check_head,
        );

        Ok(Self {
            config: Arc::new(config),
            pipeline,
            scheduler,
        })
    }

    /// Returns the shared pipeline
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Runs the mirror to completion
    ///
    /// 1. Schedules every bootstrap probe (not recorded in the visited cache)
    /// 2. Claims and schedules the origin seed
    /// 3. Claims and schedules each extra page; unusable entries are skipped
    /// 4. Waits until no fetch is pending
    pub async fn run(&mut self) -> Result<StatsSnapshot, MirrorError> {
        let origin = self.pipeline.origin().clone();
        tracing::info!(
            "Mirroring {} into {} (concurrency {}, rewrite {})",
            origin.url(),
            self.config.mirror.dir.display(),
            self.config.mirror.concurrency(),
            if self.config.mirror.replace {
                self.config.mirror.replacement().unwrap_or("relative")
            } else {
                "off"
            }
        );

        for probe in &self.config.mirror.bootstrap_probes {
            match origin.join(&format!("/{}", probe.trim().trim_start_matches('/'))) {
                Ok(target) => self.scheduler.visit(target),
                Err(e) => tracing::warn!("Skipping bootstrap probe '{}': {}", probe, e),
            }
        }

        if let Some(seed) = self.pipeline.claim_target(origin.seed().clone()) {
            self.scheduler.visit(seed);
        }

        for page in &self.config.mirror.extra_pages {
            match origin.scope(origin.url(), page) {
                Ok(target) => {
                    if let Some(target) = self.pipeline.claim_target(target) {
                        self.scheduler.visit(target);
                    }
                }
                Err(e) => tracing::warn!("Skipping extra page '{}': {}", page, e),
            }
        }

        self.scheduler.wait().await;

        let snapshot = self.pipeline.stats().snapshot();
        tracing::info!(
            "Mirror complete: {} saved, {} rejected, {} failed, {} bytes written",
            snapshot.saved,
            snapshot.rejected,
            snapshot.failed,
            snapshot.bytes_written
        );

        Ok(snapshot)
    }
}

/// Runs a complete mirror operation
///
/// # Arguments
///
/// * `config` - The validated configuration
///
/// # Returns
///
/// * `Ok(StatsSnapshot)` - Final counters for the run
/// * `Err(MirrorError)` - The run could not start
pub async fn run_mirror(config: Config) -> Result<StatsSnapshot, MirrorError> {
    let mut coordinator = Coordinator::new(config)?;
    coordinator.run().await
}
