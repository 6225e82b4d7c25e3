use crate::config::types::{Config, HttpConfig, MirrorConfig, RobotsConfig};
use crate::ConfigError;
use reqwest::header::{HeaderName, HeaderValue};
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_mirror_config(&config.mirror)?;
    validate_http_config(&config.http)?;
    validate_robots_config(&config.robots)?;
    Ok(())
}

/// Validates mirror configuration
fn validate_mirror_config(config: &MirrorConfig) -> Result<(), ConfigError> {
    if config.url.trim().is_empty() {
        return Err(ConfigError::Validation(
            "mirror url is required (set [mirror] url or pass --url)".to_string(),
        ));
    }

    validate_site_url("url", &config.url)?;

    if let Some(replacement) = config.replacement() {
        validate_site_url("replace-url", replacement)?;
    }

    if config.dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation("dir cannot be empty".to_string()));
    }

    if config.max_concurrent_fetches < 1 || config.max_concurrent_fetches > 100 {
        return Err(ConfigError::Validation(format!(
            "max-concurrent-fetches must be between 1 and 100, got {}",
            config.max_concurrent_fetches
        )));
    }

    if config.extra_pages.iter().any(|page| page.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "extra-pages cannot contain empty entries".to_string(),
        ));
    }

    if config
        .bootstrap_probes
        .iter()
        .any(|probe| probe.trim().is_empty())
    {
        return Err(ConfigError::Validation(
            "bootstrap-probes cannot contain empty entries".to_string(),
        ));
    }

    Ok(())
}

/// Validates an absolute http(s) URL with a host
fn validate_site_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value.trim())
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            field, value
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' has no host",
            field, value
        )));
    }

    Ok(())
}

/// Validates HTTP client configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeout-secs must be >= 1".to_string(),
        ));
    }

    if config.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "connect-timeout-secs must be >= 1".to_string(),
        ));
    }

    for (name, value) in &config.headers {
        HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
            ConfigError::Validation(format!("Invalid header name '{}': {}", name, e))
        })?;
        HeaderValue::from_str(value).map_err(|e| {
            ConfigError::Validation(format!("Invalid value for header '{}': {}", name, e))
        })?;
    }

    Ok(())
}

/// Validates robots.txt mirroring configuration
fn validate_robots_config(config: &RobotsConfig) -> Result<(), ConfigError> {
    if config.file.is_empty() {
        return Err(ConfigError::Validation(
            "robots file cannot be empty".to_string(),
        ));
    }

    if config.file.contains('/') || config.file.contains('\\') || config.file == ".." {
        return Err(ConfigError::Validation(format!(
            "robots file must be a plain file name, got '{}'",
            config.file
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        let mut config = Config::default();
        config.mirror.url = "https://example.com".to_string();
        config
    }

    #[test]
    fn test_valid_config() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_missing_url() {
        let config = Config::default();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_site_url() {
        assert!(validate_site_url("url", "https://example.com").is_ok());
        assert!(validate_site_url("url", "http://127.0.0.1:8080/").is_ok());

        assert!(validate_site_url("url", "example.com").is_err());
        assert!(validate_site_url("url", "ftp://example.com").is_err());
        assert!(validate_site_url("url", "mailto:admin@example.com").is_err());
    }

    #[test]
    fn test_invalid_replace_url() {
        let mut config = valid_config();
        config.mirror.replace_url = Some("not a url".to_string());
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));

        config.mirror.replace_url = Some("   ".to_string());
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_concurrency_bounds() {
        let mut config = valid_config();
        config.mirror.max_concurrent_fetches = 0;
        assert!(validate(&config).is_err());

        config.mirror.max_concurrent_fetches = 101;
        assert!(validate(&config).is_err());

        config.mirror.max_concurrent_fetches = 100;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_invalid_headers() {
        let mut config = valid_config();
        config
            .http
            .headers
            .insert("Bad Header".to_string(), "value".to_string());
        assert!(validate(&config).is_err());

        let mut config = valid_config();
        config
            .http
            .headers
            .insert("X-Ok".to_string(), "line\nbreak".to_string());
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_timeout() {
        let mut config = valid_config();
        config.http.timeout_secs = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_robots_file_must_be_plain_name() {
        let mut config = valid_config();
        config.robots.file = "../robots.txt".to_string();
        assert!(validate(&config).is_err());

        config.robots.file = String::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_extra_page() {
        let mut config = valid_config();
        config.mirror.extra_pages = vec!["/ok/".to_string(), " ".to_string()];
        assert!(validate(&config).is_err());
    }
}
