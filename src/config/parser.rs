use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Reads and parses a configuration file without validating it
///
/// Command-line flags are layered on top of the file before validation, so the
/// binary reads the file first and validates the merged result.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully parsed configuration
/// * `Err(ConfigError)` - Failed to read or parse the file
pub fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

/// Loads and validates a configuration file from the given path
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use sumi_mirror::config::load_config;
///
/// let config = load_config(Path::new("mirror.toml")).unwrap();
/// println!("Mirroring {} into {}", config.mirror.url, config.mirror.dir.display());
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let config = read_config(path)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so two runs can be matched to the exact configuration they used.
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Reads a configuration and returns both the config and its hash
pub fn read_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = read_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[mirror]
url = "https://example.com"
dir = "./site"
replace-url = "https://static.example.org"
parallel = true
max-concurrent-fetches = 4
check-head = false
extra-pages = ["/hidden/", "https://example.com/landing/"]

[http]
user-agent = "TestMirror/1.0"
timeout-secs = 5

[http.headers]
X-Mirror = "yes"

[robots]
file = "robots-static.txt"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.mirror.url, "https://example.com");
        assert_eq!(config.mirror.dir, PathBuf::from("./site"));
        assert_eq!(
            config.mirror.replacement(),
            Some("https://static.example.org")
        );
        assert_eq!(config.mirror.concurrency(), 4);
        assert!(!config.mirror.check_head);
        assert_eq!(config.mirror.extra_pages.len(), 2);
        assert_eq!(config.http.user_agent, "TestMirror/1.0");
        assert_eq!(config.http.timeout_secs, 5);
        assert_eq!(config.http.connect_timeout_secs, 10);
        assert_eq!(config.http.headers.get("X-Mirror").map(String::as_str), Some("yes"));
        assert_eq!(config.robots.file, "robots-static.txt");
    }

    #[test]
    fn test_defaults_applied() {
        let file = create_temp_config("[mirror]\nurl = \"https://example.com\"\n");
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.mirror.dir, PathBuf::from("dump"));
        assert!(config.mirror.replace);
        assert!(config.mirror.check_head);
        assert!(!config.mirror.parallel);
        assert_eq!(config.mirror.concurrency(), 1);
        assert_eq!(
            config.mirror.bootstrap_probes,
            vec!["robots.txt".to_string(), "favicon.ico".to_string()]
        );
        assert_eq!(config.robots.file, "robots.txt");
    }

    #[test]
    fn test_empty_replace_url_is_unset() {
        let file = create_temp_config(
            "[mirror]\nurl = \"https://example.com\"\nreplace-url = \"\"\n",
        );
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.mirror.replacement(), None);
    }

    #[test]
    fn test_read_config_skips_validation() {
        // The URL may still come from the command line
        let file = create_temp_config("[mirror]\nparallel = true\n");
        let config = read_config(file.path()).unwrap();
        assert!(config.mirror.url.is_empty());
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/mirror.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = r#"
[mirror]
url = "https://example.com"
parallel = true
max-concurrent-fetches = 0
"#;
        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("[mirror]\nurl = \"https://a.example.com\"\n");
        let file2 = create_temp_config("[mirror]\nurl = \"https://b.example.com\"\n");

        let (config1, hash1) = read_config_with_hash(file1.path()).unwrap();
        let (config2, hash2) = read_config_with_hash(file2.path()).unwrap();

        assert_eq!(config1.mirror.url, "https://a.example.com");
        assert_eq!(config2.mirror.url, "https://b.example.com");
        assert_ne!(hash1, hash2);
    }
}
