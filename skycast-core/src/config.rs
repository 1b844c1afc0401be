use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::geocode::Coordinate;

pub const DEFAULT_QUERY: &str = "Sydney";
pub const DEFAULT_GEOCODING_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com";
pub const DEFAULT_USER_AGENT: &str = concat!("skycast/", env!("CARGO_PKG_VERSION"));

/// Which completed searches are allowed to write to the render target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderPolicy {
    /// Only the most recently started search renders.
    #[default]
    LatestRequest,
    /// Every search renders when it completes; the last one to finish wins.
    LastCompleted,
}

impl RenderPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderPolicy::LatestRequest => "latest-request",
            RenderPolicy::LastCompleted => "last-completed",
        }
    }

    pub const fn all() -> &'static [RenderPolicy] {
        &[RenderPolicy::LatestRequest, RenderPolicy::LastCompleted]
    }
}

impl std::fmt::Display for RenderPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// default_query = "Sydney"
/// render_policy = "latest-request"
/// timeout_secs = 10
///
/// [fallback]
/// latitude = "27"
/// longitude = "85"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Query searched on startup.
    pub default_query: String,
    pub geocoding_url: String,
    pub forecast_url: String,
    pub user_agent: String,
    /// No timeout when absent.
    pub timeout_secs: Option<u64>,
    pub render_policy: RenderPolicy,
    /// Coordinate used when the geocoder finds nothing.
    pub fallback: Coordinate,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_query: DEFAULT_QUERY.to_string(),
            geocoding_url: DEFAULT_GEOCODING_URL.to_string(),
            forecast_url: DEFAULT_FORECAST_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: None,
            render_policy: RenderPolicy::default(),
            fallback: Coordinate::fallback(),
        }
    }
}

impl Config {
    /// Load config from disk, or return the defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skycast", "skycast")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// HTTP client shared by the geocoder and the forecast client.
    pub fn http_client(&self) -> Result<Client> {
        let mut builder = Client::builder().user_agent(self.user_agent.as_str());
        if let Some(secs) = self.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        builder.build().context("Failed to build HTTP client")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_public_services() {
        let cfg = Config::default();

        assert_eq!(cfg.default_query, "Sydney");
        assert_eq!(cfg.geocoding_url, DEFAULT_GEOCODING_URL);
        assert_eq!(cfg.forecast_url, DEFAULT_FORECAST_URL);
        assert_eq!(cfg.render_policy, RenderPolicy::LatestRequest);
        assert_eq!(cfg.fallback.latitude, "27");
        assert_eq!(cfg.fallback.longitude, "85");
        assert!(cfg.timeout_secs.is_none());
    }

    #[test]
    fn render_policy_names_match_serde() {
        for policy in RenderPolicy::all() {
            let json = serde_json::to_string(policy).unwrap();
            assert_eq!(json, format!("\"{policy}\""));
        }
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(cfg.default_query, DEFAULT_QUERY);
    }

    #[test]
    fn save_then_load_keeps_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.default_query = "Kathmandu".into();
        cfg.timeout_secs = Some(5);
        cfg.render_policy = RenderPolicy::LastCompleted;
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.default_query, "Kathmandu");
        assert_eq!(loaded.timeout_secs, Some(5));
        assert_eq!(loaded.render_policy, RenderPolicy::LastCompleted);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "render_policy = \"last-completed\"\n").unwrap();

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.render_policy, RenderPolicy::LastCompleted);
        assert_eq!(cfg.default_query, DEFAULT_QUERY);
        assert_eq!(cfg.fallback, Coordinate::fallback());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "render_policy = [").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
