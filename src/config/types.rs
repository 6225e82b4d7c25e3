use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

/// Main configuration structure for Sumi-Mirror
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub mirror: MirrorConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub robots: RobotsConfig,
}

/// Mirror behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MirrorConfig {
    /// URL of the site to mirror (the crawl origin and first seed)
    #[serde(default)]
    pub url: String,

    /// Output root directory
    #[serde(default = "default_dir")]
    pub dir: PathBuf,

    /// Whether absolute references to the origin are rewritten
    #[serde(default = "default_true")]
    pub replace: bool,

    /// Replacement origin; references are made root-relative when unset
    #[serde(rename = "replace-url", default)]
    pub replace_url: Option<String>,

    /// Fetch several resources at once
    #[serde(default)]
    pub parallel: bool,

    /// Upper bound on in-flight fetches when `parallel` is enabled
    #[serde(rename = "max-concurrent-fetches", default = "default_max_concurrent")]
    pub max_concurrent_fetches: usize,

    /// Issue a HEAD request before every GET and skip targets that fail it
    #[serde(rename = "check-head", default = "default_true")]
    pub check_head: bool,

    /// Additional pages crawled unconditionally (absolute or origin-relative)
    #[serde(rename = "extra-pages", default)]
    pub extra_pages: Vec<String>,

    /// Well-known paths fetched once per run regardless of discovery
    #[serde(rename = "bootstrap-probes", default = "default_probes")]
    pub bootstrap_probes: Vec<String>,
}

impl MirrorConfig {
    /// Returns the replacement origin, treating an empty string as unset
    pub fn replacement(&self) -> Option<&str> {
        self.replace_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Returns the number of fetches allowed in flight
    pub fn concurrency(&self) -> usize {
        if self.parallel {
            self.max_concurrent_fetches
        } else {
            1
        }
    }
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            dir: default_dir(),
            replace: true,
            replace_url: None,
            parallel: false,
            max_concurrent_fetches: default_max_concurrent(),
            check_head: true,
            extra_pages: Vec::new(),
            bootstrap_probes: default_probes(),
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Whole-request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout")]
    pub timeout_secs: u64,

    /// Connection timeout (seconds)
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Extra headers sent with every request
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            headers: HashMap::new(),
        }
    }
}

/// robots.txt mirroring configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RobotsConfig {
    /// File name written under the output directory
    #[serde(default = "default_robots_file")]
    pub file: String,
}

impl Default for RobotsConfig {
    fn default() -> Self {
        Self {
            file: default_robots_file(),
        }
    }
}

fn default_dir() -> PathBuf {
    PathBuf::from("dump")
}

fn default_true() -> bool {
    true
}

fn default_max_concurrent() -> usize {
    8
}

fn default_probes() -> Vec<String> {
    vec!["robots.txt".to_string(), "favicon.ico".to_string()]
}

fn default_user_agent() -> String {
    format!("sumi-mirror/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_robots_file() -> String {
    "robots.txt".to_string()
}
