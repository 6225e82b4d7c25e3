//! Scheduler for running fetches on a bounded worker pool
//!
//! This module handles:
//! - Global concurrency limiting via a semaphore
//! - Optional HEAD checks before every download
//! - Handing completed responses to a [`ResponseHandler`]
//! - Following up on the targets a handler discovers until the frontier drains

use crate::crawler::fetcher::{fetch, FetchedResource};
use crate::url::CrawlTarget;
use crate::MirrorError;
use reqwest::{Client, Method};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Receives the outcome of every fetch
///
/// Handlers run on the blocking thread pool and may be invoked concurrently
/// from several fetches at once.
pub trait ResponseHandler: Send + Sync + 'static {
    /// Processes a successful response and returns the targets to fetch next
    fn on_response(&self, resource: FetchedResource) -> Vec<CrawlTarget>;

    /// Records a failed request; `method` tells a failed HEAD check from a failed download
    fn on_error(&self, target: &CrawlTarget, method: &Method, error: MirrorError);
}

/// Scheduler runs fetches and feeds their results to a handler
///
/// `visit` never blocks: the request is spawned immediately and waits for a
/// semaphore permit inside its task. `wait` drives the pool until every
/// scheduled fetch, including the ones scheduled while waiting, has completed.
pub struct Scheduler<H: ResponseHandler> {
    /// Shared HTTP client
    client: Client,

    /// Response handler shared with every task
    handler: Arc<H>,

    /// Global semaphore for limiting concurrent fetches
    semaphore: Arc<Semaphore>,

    /// Issue a HEAD request before each GET
    check_head: bool,

    /// In-flight fetch tasks, each yielding newly discovered targets
    tasks: JoinSet<Vec<CrawlTarget>>,
}

impl<H: ResponseHandler> Scheduler<H> {
    /// Creates a new scheduler
    ///
    /// # Arguments
    ///
    /// * `client` - The HTTP client shared by all fetches
    /// * `handler` - Receives every response and error
    /// * `concurrency` - Maximum number of fetches in flight (at least 1)
    /// * `check_head` - Whether each target gets a HEAD request before its GET
    pub fn new(client: Client, handler: Arc<H>, concurrency: usize, check_head: bool) -> Self {
        Self {
            client,
            handler,
            semaphore: Arc::new(Semaphore::new(concurrency.max(1))),
            check_head,
            tasks: JoinSet::new(),
        }
    }

    /// Schedules a fetch of `target`
    ///
    /// No de-duplication happens here; callers claim targets first.
    pub fn visit(&mut self, target: CrawlTarget) {
        let client = self.client.clone();
        let handler = Arc::clone(&self.handler);
        let semaphore = Arc::clone(&self.semaphore);
        let check_head = self.check_head;

        self.tasks.spawn(async move {
            let Ok(_permit) = semaphore.acquire_owned().await else {
                return Vec::new();
            };

            if check_head {
                match fetch(&client, &target, Method::HEAD).await {
                    Ok(resource) => {
                        let handler = Arc::clone(&handler);
                        if let Err(e) =
                            tokio::task::spawn_blocking(move || handler.on_response(resource)).await
                        {
                            tracing::error!("Response handler panicked for HEAD {}: {}", target, e);
                        }
                    }
                    Err(e) => {
                        handler.on_error(&target, &Method::HEAD, e);
                        return Vec::new();
                    }
                }
            }

            match fetch(&client, &target, Method::GET).await {
                Ok(resource) => {
                    let handler = Arc::clone(&handler);
                    match tokio::task::spawn_blocking(move || handler.on_response(resource)).await {
                        Ok(discovered) => discovered,
                        Err(e) => {
                            tracing::error!("Response handler panicked for {}: {}", target, e);
                            Vec::new()
                        }
                    }
                }
                Err(e) => {
                    handler.on_error(&target, &Method::GET, e);
                    Vec::new()
                }
            }
        });
    }

    /// Returns the number of fetches scheduled but not yet collected
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Waits until every scheduled fetch has completed
    ///
    /// Targets returned by the handler are scheduled as they arrive, so this
    /// only returns once the crawl frontier is empty.
    pub async fn wait(&mut self) {
        while let Some(joined) = self.tasks.join_next().await {
            match joined {
                Ok(discovered) => {
                    for target in discovered {
                        self.visit(target);
                    }
                }
                Err(e) => tracing::error!("Fetch task failed: {}", e),
            }
        }
    }
}
