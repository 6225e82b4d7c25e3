//! Body rewriting
//!
//! Absolute references to the mirrored origin are replaced textually so the
//! saved tree works from any host. The match is a plain substring match on
//! raw bytes: `https://example.com` also matches inside
//! `https://example.com.evil.net`. Markup is never parsed here.

use crate::url::Origin;
use crate::{ConfigError, ConfigResult};
use regex::bytes::{NoExpand, Regex};

/// One textual substitution applied to fetched bodies
#[derive(Debug, Clone)]
pub struct RewriteRule {
    pattern: String,
    replacement: String,
    matcher: Regex,
}

impl RewriteRule {
    /// Creates a rule replacing every literal occurrence of `pattern`
    pub fn new(pattern: &str, replacement: &str) -> ConfigResult<Self> {
        let matcher = Regex::new(&regex::escape(pattern)).map_err(|e| {
            ConfigError::Validation(format!("Invalid rewrite pattern '{}': {}", pattern, e))
        })?;

        Ok(Self {
            pattern: pattern.to_string(),
            replacement: replacement.to_string(),
            matcher,
        })
    }

    /// Builds the rules for an origin
    ///
    /// Four forms of the origin are matched, in this order: `http://host`,
    /// `http:\/\/host`, `https://host` and `https:\/\/host`. The escaped forms
    /// cover URLs embedded in JSON. `host` carries the port when the origin
    /// uses a non-default one.
    ///
    /// With no replacement the references become root-relative.
    ///
    /// # Example
    ///
    /// ```
    /// use sumi_mirror::crawler::{rewrite, RewriteRule};
    /// use sumi_mirror::url::Origin;
    ///
    /// let origin = Origin::parse("https://example.com").unwrap();
    /// let rules = RewriteRule::for_origin(&origin, None).unwrap();
    /// let body = rewrite(br#"<a href="https://example.com/x">"#, &rules);
    /// assert_eq!(body, br#"<a href="/x">"#.to_vec());
    /// ```
    pub fn for_origin(origin: &Origin, replacement: Option<&str>) -> ConfigResult<Vec<Self>> {
        let authority = origin.authority();
        let replacement = replacement.unwrap_or("");

        ["http://", "http:\\/\\/", "https://", "https:\\/\\/"]
            .iter()
            .map(|scheme| Self::new(&format!("{}{}", scheme, authority), replacement))
            .collect()
    }

    /// Returns the literal text this rule matches
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns the text inserted in place of each match
    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// Applies this rule to a body
    pub fn apply(&self, body: &[u8]) -> Vec<u8> {
        self.matcher
            .replace_all(body, NoExpand(self.replacement.as_bytes()))
            .into_owned()
    }
}

/// Applies every rule in sequence, each one to the output of the previous
///
/// A body containing none of the patterns is returned unchanged.
pub fn rewrite(body: &[u8], rules: &[RewriteRule]) -> Vec<u8> {
    let mut current = body.to_vec();
    for rule in rules {
        current = rule.apply(&current);
    }
    current
}
