//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the mirror:
//! - Building the HTTP client from `[http]` configuration
//! - HEAD requests to check a target exists before downloading it
//! - GET requests returning the raw body bytes
//! - Mapping transport failures and non-success statuses to `MirrorError`

use crate::config::HttpConfig;
use crate::url::CrawlTarget;
use crate::MirrorError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{redirect::Policy, Client, Method};
use std::time::Duration;
use url::Url;

/// Maximum redirect hops followed for a single request
const MAX_REDIRECTS: usize = 10;

/// One completed fetch
#[derive(Debug, Clone)]
pub struct FetchedResource {
    /// The target that was requested
    pub target: CrawlTarget,

    /// URL of the final response after redirects
    pub final_url: Url,

    /// GET for content, HEAD for existence checks
    pub method: Method,

    /// HTTP status code
    pub status: u16,

    /// Content-Type header value (empty when absent)
    pub content_type: String,

    /// Raw body bytes (always empty for HEAD)
    pub body: Vec<u8>,
}

impl FetchedResource {
    /// Returns true if this was a HEAD probe
    pub fn is_head(&self) -> bool {
        self.method == Method::HEAD
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The `[http]` configuration section
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(MirrorError)` - A configured header is invalid or the client failed to build
///
/// # Example
///
/// ```no_run
/// use sumi_mirror::config::HttpConfig;
/// use sumi_mirror::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, MirrorError> {
    let mut headers = HeaderMap::new();
    for (name, value) in &config.headers {
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
            crate::ConfigError::Validation(format!("Invalid header name '{}': {}", name, e))
        })?;
        let value = HeaderValue::from_str(value).map_err(|e| {
            crate::ConfigError::Validation(format!("Invalid value for header '{}': {}", name, e))
        })?;
        headers.insert(name, value);
    }

    let client = Client::builder()
        .user_agent(config.user_agent.as_str())
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()?;

    Ok(client)
}

/// Fetches a target with the given method
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `target` - The URL to fetch
/// * `method` - `GET` to download, `HEAD` to check existence
///
/// # Returns
///
/// * `Ok(FetchedResource)` - A 2xx response (redirects already followed)
/// * `Err(MirrorError::Status)` - The server answered with a non-success status
/// * `Err(MirrorError::Http)` - Connection, timeout, redirect or body read failure
pub async fn fetch(
    client: &Client,
    target: &CrawlTarget,
    method: Method,
) -> Result<FetchedResource, MirrorError> {
    if method == Method::HEAD {
        tracing::info!("Checking: {}", target);
    } else {
        tracing::info!("Visiting: {}", target);
    }

    let response = client
        .request(method.clone(), target.as_url().clone())
        .send()
        .await
        .map_err(|source| MirrorError::Http {
            url: target.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(MirrorError::Status {
            url: target.to_string(),
            status: status.as_u16(),
        });
    }

    let final_url = response.url().clone();
    if final_url.as_str() != target.as_str() {
        tracing::debug!("{} redirected to {}", target, final_url);
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let body = if method == Method::HEAD {
        Vec::new()
    } else {
        response
            .bytes()
            .await
            .map_err(|source| MirrorError::Http {
                url: target.to_string(),
                source,
            })?
            .to_vec()
    };

    Ok(FetchedResource {
        target: target.clone(),
        final_url,
        method,
        status: status.as_u16(),
        content_type,
        body,
    })
}
