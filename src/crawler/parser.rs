//! Link extraction from fetched content
//!
//! This module finds every URL a fetched resource references:
//! - `href` on `<a>` and `<link>`, `src` on `<script>` and `<img>`
//! - every candidate in `srcset` lists (`<img>` and `<picture><source>`)
//! - `url(...)` references in `<style>` blocks, `style` attributes and CSS files
//! - absolute `url(http...)` references anywhere else in the text, such as
//!   inline scripts or `data-*` attributes
//!
//! URLs are returned exactly as written (possibly relative, possibly duplicated).
//! Resolution and de-duplication happen later in the pipeline.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

/// Elements and the attribute holding their URL
const URL_ATTRIBUTES: &[(&str, &str)] = &[
    ("a[href]", "href"),
    ("link[href]", "href"),
    ("script[src]", "src"),
    ("img[src]", "src"),
];

/// `url(...)` with an unquoted, single-quoted or double-quoted argument
static CSS_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)url\(\s*(?:"([^"]*)"|'([^']*)'|([^)"'\s]*))\s*\)"#)
        .expect("CSS url() pattern is valid")
});

/// Absolute `url(http...)` references anywhere in a body
static ABSOLUTE_CSS_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)url\(\s*["']?(https?://[^\s"')]+)"#)
        .expect("absolute url() pattern is valid")
});

/// How a fetched body is scanned for links
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Html,
    Css,
    Other,
}

impl ContentKind {
    /// Classifies a response by its Content-Type, falling back to the URL's extension
    ///
    /// # Example
    ///
    /// ```
    /// use sumi_mirror::crawler::ContentKind;
    /// use url::Url;
    ///
    /// let url = Url::parse("https://example.com/style.css").unwrap();
    /// assert_eq!(ContentKind::detect("text/html; charset=UTF-8", &url), ContentKind::Html);
    /// assert_eq!(ContentKind::detect("", &url), ContentKind::Css);
    /// ```
    pub fn detect(content_type: &str, url: &Url) -> Self {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase();

        if essence.is_empty() {
            return mime_guess::from_path(url.path())
                .first()
                .map(|mime| Self::from_essence(mime.essence_str()))
                .unwrap_or(Self::Other);
        }

        Self::from_essence(&essence)
    }

    fn from_essence(essence: &str) -> Self {
        match essence {
            "text/html" | "application/xhtml+xml" => Self::Html,
            "text/css" => Self::Css,
            _ => Self::Other,
        }
    }
}

/// Extracts every referenced URL from a fetched body
///
/// Malformed markup never fails: the HTML parser recovers the way browsers do,
/// and anything it cannot make sense of simply yields no links.
///
/// # Example
///
/// ```
/// use sumi_mirror::crawler::{extract_links, ContentKind};
///
/// let html = br#"<img src="/a.png" srcset="a.jpg 1x, /b.jpg 2x">"#;
/// let links = extract_links(html, ContentKind::Html);
/// assert_eq!(links, vec!["/a.png", "a.jpg", "/b.jpg"]);
/// ```
pub fn extract_links(content: &[u8], kind: ContentKind) -> Vec<String> {
    let text = String::from_utf8_lossy(content);

    match kind {
        ContentKind::Html => {
            let mut links = extract_html_links(&text);
            links.extend(extract_absolute_css_urls(&text));
            links
        }
        ContentKind::Css => extract_css_urls(&text),
        ContentKind::Other => extract_absolute_css_urls(&text),
    }
}

/// Extracts links from an HTML document
fn extract_html_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    for (selector, attribute) in URL_ATTRIBUTES {
        let Ok(selector) = Selector::parse(selector) else {
            continue;
        };
        for element in document.select(&selector) {
            if let Some(value) = element.value().attr(attribute) {
                push_candidate(&mut links, value);
            }
        }
    }

    if let Ok(srcset_selector) = Selector::parse("img[srcset], source[srcset]") {
        for element in document.select(&srcset_selector) {
            if let Some(srcset) = element.value().attr("srcset") {
                links.extend(parse_srcset(srcset));
            }
        }
    }

    if let Ok(style_selector) = Selector::parse("style") {
        for element in document.select(&style_selector) {
            let css: String = element.text().collect();
            links.extend(extract_css_urls(&css));
        }
    }

    if let Ok(inline_selector) = Selector::parse("[style]") {
        for element in document.select(&inline_selector) {
            if let Some(style) = element.value().attr("style") {
                links.extend(extract_css_urls(style));
            }
        }
    }

    links
}

/// Splits a `srcset` attribute into its URLs
///
/// Each comma-separated entry is `URL [descriptor]`; only the URL token is kept.
///
/// # Example
///
/// ```
/// use sumi_mirror::crawler::parse_srcset;
///
/// assert_eq!(parse_srcset("a.jpg 1x, /b.jpg 2x"), vec!["a.jpg", "/b.jpg"]);
/// ```
pub fn parse_srcset(srcset: &str) -> Vec<String> {
    srcset
        .split(',')
        .filter_map(|entry| entry.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

/// Extracts every `url(...)` reference from CSS text
///
/// Quotes are stripped; empty references such as `url()` or `url("")` are skipped.
pub fn extract_css_urls(css: &str) -> Vec<String> {
    CSS_URL
        .captures_iter(css)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)))
        .map(|m| m.as_str().trim())
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .collect()
}

/// Extracts absolute `url(http...)` references from arbitrary text
fn extract_absolute_css_urls(text: &str) -> Vec<String> {
    ABSOLUTE_CSS_URL
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

fn push_candidate(links: &mut Vec<String>, value: &str) {
    let value = value.trim();
    if !value.is_empty() {
        links.push(value.to_string());
    }
}
