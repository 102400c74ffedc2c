//! Configuration types for the waymark agent.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration for the sampling agent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackConfig {
    /// Geolocation acquisition settings.
    pub sampler: SamplerConfig,
    /// Remote store settings.
    pub store: StoreConfig,
    /// Sampling schedule settings.
    pub schedule: ScheduleConfig,
    /// Offline asset cache settings.
    pub cache: AssetCacheConfig,
}

/// Geolocation acquisition configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// External locator command producing one JSON position reading on stdout
    /// (e.g. `CoreLocationCLI -json`, `termux-location`).
    ///
    /// When unset the host is treated as having no positioning capability and
    /// every tick produces an unavailable sample.
    pub command: Option<String>,
    /// Per-acquisition timeout in milliseconds.
    pub timeout_ms: u64,
    /// Prefer a high-accuracy fix when the locator supports it.
    pub high_accuracy: bool,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            command: None,
            timeout_ms: 5_000,
            high_accuracy: true,
        }
    }
}

/// Remote store (Supabase-style PostgREST) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Base URL of the store, without the `/rest/v1` suffix.
    pub base_url: String,
    /// API key sent as both `apikey` and bearer token.
    pub api_key: String,
    /// Table holding the samples.
    pub table: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: String::new(),
            table: "locations".to_owned(),
        }
    }
}

/// Sampling schedule configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Fixed period between ticks in seconds.
    ///
    /// The first tick is aligned to the next wall-clock minute boundary
    /// regardless of this value; the period applies from the first tick on.
    pub period_secs: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self { period_secs: 60 }
    }
}

/// Offline asset cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetCacheConfig {
    /// Whether the asset cache is installed at startup.
    pub enabled: bool,
    /// Cache name carrying the version tag. Bumping the version means
    /// renaming the cache; old caches are left in place.
    pub name: String,
    /// Origin the preload list is fetched from.
    pub origin: String,
    /// Fixed allow-list of asset paths pre-populated at install.
    pub preload: Vec<String>,
    /// Root directory holding the named caches.
    pub root_dir: PathBuf,
}

impl Default for AssetCacheConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            name: "waymark-assets-v1".to_owned(),
            origin: String::new(),
            preload: vec![
                "/".to_owned(),
                "/index.html".to_owned(),
                "/manifest.json".to_owned(),
            ],
            root_dir: default_cache_root(),
        }
    }
}

/// Returns the default asset cache root directory.
fn default_cache_root() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("waymark")
}

impl TrackConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| crate::error::TrackError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &std::path::Path) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::TrackError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `~/.config/waymark/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(config).join("waymark").join("config.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("waymark")
                .join("config.toml")
        } else {
            PathBuf::from("/tmp/waymark-config/config.toml")
        }
    }
}
