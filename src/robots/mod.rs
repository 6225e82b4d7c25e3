//! robots.txt mirroring
//!
//! The mirror never interprets robots.txt directives. This module only fetches
//! the site's robots.txt, points its absolute URLs (sitemaps, mostly) at the
//! replacement origin and saves it next to the mirrored tree.

use crate::config::Config;
use crate::crawler::{build_http_client, fetch, RewriteRule};
use crate::url::Origin;
use crate::{ConfigResult, MirrorError};
use reqwest::Method;
use std::fs;
use std::path::PathBuf;

/// A rewritten robots.txt and where it was saved
#[derive(Debug, Clone)]
pub struct MirroredRobots {
    /// File written under the output directory
    pub path: PathBuf,

    /// Rewritten content
    pub content: String,
}

/// Rewrites a robots.txt body for the replacement origin
///
/// Without a replacement the body is returned unchanged. Otherwise the full
/// configured site URL is replaced first, then every absolute form of the
/// origin host.
///
/// # Example
///
/// ```
/// use sumi_mirror::robots::rewrite_robots;
/// use sumi_mirror::url::Origin;
///
/// let origin = Origin::parse("https://example.com").unwrap();
/// let body = b"Sitemap: https://example.com/sitemap.xml\n";
/// let rewritten = rewrite_robots(body, &origin, "https://example.com", Some("https://static.example.org")).unwrap();
/// assert_eq!(rewritten, b"Sitemap: https://static.example.org/sitemap.xml\n".to_vec());
/// ```
pub fn rewrite_robots(
    body: &[u8],
    origin: &Origin,
    configured_url: &str,
    replacement: Option<&str>,
) -> ConfigResult<Vec<u8>> {
    let Some(replacement) = replacement else {
        return Ok(body.to_vec());
    };

    let mut rules = Vec::new();
    let configured_url = configured_url.trim().trim_end_matches('/');
    if !configured_url.is_empty() {
        rules.push(RewriteRule::new(configured_url, replacement)?);
    }
    rules.extend(RewriteRule::for_origin(origin, Some(replacement))?);

    Ok(crate::crawler::rewrite(body, &rules))
}

/// Fetches, rewrites and saves the site's robots.txt
///
/// # Returns
///
/// * `Ok(MirroredRobots)` - The saved file and its content
/// * `Err(MirrorError)` - The fetch failed, returned a non-success status, or the file could not be written
pub async fn mirror_robots(config: &Config) -> Result<MirroredRobots, MirrorError> {
    let origin = Origin::parse(&config.mirror.url)?;
    let target = origin.join("/robots.txt")?;
    let client = build_http_client(&config.http)?;

    let resource = fetch(&client, &target, Method::GET).await?;
    let body = rewrite_robots(
        &resource.body,
        &origin,
        &config.mirror.url,
        config.mirror.replacement(),
    )?;

    fs::create_dir_all(&config.mirror.dir).map_err(|source| MirrorError::DirectoryCreate {
        path: config.mirror.dir.clone(),
        source,
    })?;

    let path = config.mirror.dir.join(&config.robots.file);
    fs::write(&path, &body).map_err(|source| MirrorError::Write {
        path: path.clone(),
        source,
    })?;

    tracing::info!("Saved robots.txt to {}", path.display());

    Ok(MirroredRobots {
        path,
        content: String::from_utf8_lossy(&body).into_owned(),
    })
}
