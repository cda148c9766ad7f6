use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Feed document holding the `posts` array.
pub const POSTS_PATH: &str = "data/posts.json";
/// Feed document holding the `personas` mapping.
pub const PERSONAS_PATH: &str = "data/personas.json";

/// Environment variable naming a config file when `--config` is not given.
pub const CONFIG_ENV: &str = "AGENTIC_FEED_CONFIG";

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct FeedConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the static feed lives: `{host}/{repo}/{branch}/{path}`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SourceConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_repo")]
    pub repo: String,
    #[serde(default = "default_branch")]
    pub branch: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CacheConfig {
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct FetchConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            repo: default_repo(),
            branch: default_branch(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "https://raw.githubusercontent.com".to_string()
}

fn default_repo() -> String {
    "fredzannarbor/agentic-social-feed".to_string()
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_ttl_secs() -> u64 {
    3600
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl SourceConfig {
    /// Full URL of a feed document.
    pub fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            self.host.trim_end_matches('/'),
            self.repo.trim_matches('/'),
            self.branch,
            path.trim_start_matches('/')
        )
    }

    /// Human-facing source label, e.g. `github.com/owner/repo`.
    pub fn display_name(&self) -> String {
        if self.host.contains("githubusercontent.com") {
            format!("github.com/{}", self.repo)
        } else {
            format!("{}/{}", self.host.trim_end_matches('/'), self.repo)
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl FeedConfig {
    pub fn load_from_file(path: &str) -> Result<Self> {
        let expanded_path = shellexpand::tilde(path);
        let content = fs::read_to_string(expanded_path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path))?;

        toml::from_str(&content).with_context(|| "Failed to parse TOML config")
    }

    /// Resolve the config in order: explicit path, `AGENTIC_FEED_CONFIG`,
    /// the per-user config file if present, then built-in defaults.
    pub fn resolve(explicit: Option<&str>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from_file(path);
        }

        if let Ok(path) = std::env::var(CONFIG_ENV) {
            if !path.trim().is_empty() {
                return Self::load_from_file(&path);
            }
        }

        if let Some(path) = default_config_path().filter(|p| p.exists()) {
            tracing::debug!("Using config file {}", path.display());
            return Self::load_from_file(&path.to_string_lossy());
        }

        Ok(Self::default())
    }

    pub fn validate(&self) -> Result<()> {
        let host = &self.source.host;
        if !host.starts_with("http://") && !host.starts_with("https://") {
            anyhow::bail!("Source host must start with http:// or https://");
        }

        if self.source.repo.trim().is_empty() {
            anyhow::bail!("Source repo must not be empty");
        }

        if self.source.branch.trim().is_empty() {
            anyhow::bail!("Source branch must not be empty");
        }

        if self.fetch.timeout_secs == 0 {
            anyhow::bail!("Fetch timeout must be greater than zero");
        }

        Ok(())
    }
}

/// `<config dir>/agentic-feed/config.toml` for the current user.
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "agentic-feed")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_public_feed() {
        let config = FeedConfig::default();
        assert_eq!(config.source.repo, "fredzannarbor/agentic-social-feed");
        assert_eq!(config.source.branch, "main");
        assert_eq!(config.cache.ttl(), Duration::from_secs(3600));
        assert_eq!(config.fetch.timeout(), Duration::from_secs(10));
        config.validate().unwrap();
    }

    #[test]
    fn url_template() {
        let source = SourceConfig::default();
        assert_eq!(
            source.url_for(POSTS_PATH),
            "https://raw.githubusercontent.com/fredzannarbor/agentic-social-feed/main/data/posts.json"
        );

        let source = SourceConfig {
            host: "http://localhost:8080/".to_string(),
            repo: "me/feed".to_string(),
            branch: "dev".to_string(),
        };
        assert_eq!(
            source.url_for(PERSONAS_PATH),
            "http://localhost:8080/me/feed/dev/data/personas.json"
        );
    }

    #[test]
    fn display_name_for_github() {
        assert_eq!(
            SourceConfig::default().display_name(),
            "github.com/fredzannarbor/agentic-social-feed"
        );
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[source]
branch = "staging"

[cache]
ttl_secs = 60
"#
        )
        .unwrap();

        let path = file.path().to_string_lossy().to_string();
        let config = FeedConfig::load_from_file(&path).unwrap();
        assert_eq!(config.source.branch, "staging");
        assert_eq!(config.source.repo, "fredzannarbor/agentic-social-feed");
        assert_eq!(config.cache.ttl_secs, 60);
        assert_eq!(config.fetch.timeout_secs, 10);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn explicit_path_wins() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[fetch]\ntimeout_secs = 3").unwrap();
        let path = file.path().to_string_lossy().to_string();

        let config = FeedConfig::resolve(Some(&path)).unwrap();
        assert_eq!(config.fetch.timeout_secs, 3);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(FeedConfig::load_from_file("/nonexistent/agentic-feed.toml").is_err());
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = FeedConfig::default();
        config.source.host = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        let mut config = FeedConfig::default();
        config.fetch.timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = FeedConfig::default();
        config.source.branch = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn toml_roundtrip() {
        let config = FeedConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let recovered: FeedConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(recovered, config);
    }
}
