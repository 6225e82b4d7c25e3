use crate::UrlError;
use std::fmt;
use url::{ParseError, Url};

/// An absolute, fragment-free URL scheduled (or about to be scheduled) for fetching
///
/// A `CrawlTarget` can only be built through [`resolve`], so it always carries an
/// `http`/`https` scheme and a non-empty host and never has a `#fragment`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CrawlTarget(Url);

impl CrawlTarget {
    /// Returns the underlying URL
    pub fn as_url(&self) -> &Url {
        &self.0
    }

    /// Returns the URL string used as the visited-cache key
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Consumes the target, returning the underlying URL
    pub fn into_url(self) -> Url {
        self.0
    }
}

impl fmt::Display for CrawlTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

/// Resolves a URL found in markup into an absolute crawl target
///
/// # Resolution Steps
///
/// 1. Trim whitespace; reject empty and fragment-only candidates
/// 2. If the candidate is already absolute, use it as-is
/// 3. Otherwise join it onto `base` (scheme-relative, root-relative,
///    path-relative and query-only references are all supported)
/// 4. Reject anything that is not `http`/`https` or has no host
/// 5. Remove the fragment
///
/// # Arguments
///
/// * `base` - The origin (or a page on it) that relative candidates are resolved against
/// * `candidate` - The raw URL string as it appeared in the content
///
/// # Returns
///
/// * `Ok(CrawlTarget)` - The resolved target
/// * `Err(UrlError)` - The candidate is not a fetchable URL
///
/// # Examples
///
/// ```
/// use sumi_mirror::url::resolve;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/blog/").unwrap();
/// let target = resolve(&base, "../about/#team").unwrap();
/// assert_eq!(target.as_str(), "https://example.com/about/");
/// ```
pub fn resolve(base: &Url, candidate: &str) -> Result<CrawlTarget, UrlError> {
    let candidate = candidate.trim();
    if candidate.is_empty() || candidate.starts_with('#') {
        return Err(UrlError::Empty);
    }

    let mut url = match Url::parse(candidate) {
        Ok(url) => url,
        Err(ParseError::RelativeUrlWithoutBase) => {
            base.join(candidate).map_err(|source| UrlError::Parse {
                url: candidate.to_string(),
                source,
            })?
        }
        Err(source) => {
            return Err(UrlError::Parse {
                url: candidate.to_string(),
                source,
            })
        }
    };

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost(candidate.to_string()));
    }

    url.set_fragment(None);

    Ok(CrawlTarget(url))
}
