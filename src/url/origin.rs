use crate::url::resolve::{resolve, CrawlTarget};
use crate::UrlError;
use url::Url;

/// The site being mirrored: scheme, host and (optional) port
///
/// Every discovered URL is checked against the origin before it is claimed, so the
/// crawl never leaves the site it was started on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    seed: CrawlTarget,
    host: String,
}

impl Origin {
    /// Parses the configured site URL into an origin
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_mirror::url::Origin;
    ///
    /// let origin = Origin::parse("https://Example.com:8443/blog/").unwrap();
    /// assert_eq!(origin.host(), "example.com");
    /// assert_eq!(origin.authority(), "example.com:8443");
    /// ```
    pub fn parse(site_url: &str) -> Result<Self, UrlError> {
        let candidate = site_url.trim();
        let url = Url::parse(candidate).map_err(|source| UrlError::Parse {
            url: candidate.to_string(),
            source,
        })?;
        let target = resolve(&url, candidate)?;
        let host = target
            .as_url()
            .host_str()
            .map(str::to_lowercase)
            .ok_or_else(|| UrlError::MissingHost(candidate.to_string()))?;

        Ok(Self { seed: target, host })
    }

    /// Returns the full configured URL (the crawl seed)
    pub fn url(&self) -> &Url {
        self.seed.as_url()
    }

    /// Returns the lowercase host without port
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns `host` or `host:port` when the origin uses a non-default port
    ///
    /// This is the form that appears after `scheme://` in absolute links to the site.
    pub fn authority(&self) -> String {
        match self.url().port() {
            Some(port) => format!("{}:{}", self.host, port),
            None => self.host.clone(),
        }
    }

    /// Returns the origin as a crawl target
    pub fn seed(&self) -> &CrawlTarget {
        &self.seed
    }

    /// Resolves a candidate against the origin
    pub fn join(&self, candidate: &str) -> Result<CrawlTarget, UrlError> {
        resolve(self.url(), candidate)
    }

    /// Returns true if the target belongs to the mirrored site
    pub fn contains(&self, target: &CrawlTarget) -> bool {
        self.is_same_host(target.as_url())
    }

    /// Returns true if `url` is on the origin host (scheme and port are not compared)
    pub fn is_same_host(&self, url: &Url) -> bool {
        url.host_str()
            .is_some_and(|host| host.eq_ignore_ascii_case(&self.host))
    }

    /// Resolves a candidate and rejects it if it leaves the site
    pub fn scope(&self, base: &Url, candidate: &str) -> Result<CrawlTarget, UrlError> {
        let target = resolve(base, candidate)?;
        if self.contains(&target) {
            Ok(target)
        } else {
            Err(UrlError::ForeignDomain(target.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lowercases_host() {
        let origin = Origin::parse("https://EXAMPLE.COM/").unwrap();
        assert_eq!(origin.host(), "example.com");
    }

    #[test]
    fn test_authority_without_default_port() {
        let origin = Origin::parse("https://example.com:443/").unwrap();
        assert_eq!(origin.authority(), "example.com");
    }

    #[test]
    fn test_authority_with_port() {
        let origin = Origin::parse("http://127.0.0.1:8080").unwrap();
        assert_eq!(origin.authority(), "127.0.0.1:8080");
    }

    #[test]
    fn test_seed_strips_fragment() {
        let origin = Origin::parse("https://example.com/#top").unwrap();
        assert_eq!(origin.seed().as_str(), "https://example.com/");
    }

    #[test]
    fn test_parse_rejects_relative() {
        assert!(Origin::parse("/just/a/path").is_err());
        assert!(Origin::parse("").is_err());
    }

    #[test]
    fn test_parse_rejects_non_http() {
        assert!(matches!(
            Origin::parse("ftp://example.com"),
            Err(UrlError::InvalidScheme(_))
        ));
    }

    #[test]
    fn test_contains_same_host() {
        let origin = Origin::parse("https://example.com").unwrap();
        let target = origin.join("/page").unwrap();
        assert!(origin.contains(&target));

        let other_scheme = origin.join("http://example.com/page").unwrap();
        assert!(origin.contains(&other_scheme));
    }

    #[test]
    fn test_scope_rejects_foreign_domain() {
        let origin = Origin::parse("https://example.com").unwrap();
        let result = origin.scope(origin.url(), "https://cdn.other.com/lib.js");
        assert!(matches!(result, Err(UrlError::ForeignDomain(_))));
    }

    #[test]
    fn test_scope_rejects_subdomain() {
        let origin = Origin::parse("https://example.com").unwrap();
        let result = origin.scope(origin.url(), "https://blog.example.com/");
        assert!(matches!(result, Err(UrlError::ForeignDomain(_))));
    }
}
