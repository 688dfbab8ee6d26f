use crate::domain::ResourceKind;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub providers: ProvidersConfig,

    pub cache: CacheConfig,

    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    #[serde(default)]
    pub suppress_connection_errors: bool,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    pub max_db_connections: u32,

    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/city-explorer.db".to_string(),
            log_level: "info".to_string(),
            suppress_connection_errors: false,
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,

    /// `"*"` allows any origin.
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            cors_allowed_origins: vec!["*".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProviderConfig {
    pub base_url: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_key: String,
}

impl ProviderConfig {
    fn with_base(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            api_key: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// Request timeout in seconds shared by every provider (default: 30)
    pub request_timeout_seconds: u64,

    pub geocode: ProviderConfig,

    pub weather: ProviderConfig,

    pub yelp: ProviderConfig,

    pub movies: ProviderConfig,

    pub meetups: ProviderConfig,

    pub trails: ProviderConfig,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            request_timeout_seconds: 30,
            geocode: ProviderConfig::with_base("https://maps.googleapis.com/maps/api/geocode/json"),
            weather: ProviderConfig::with_base("https://api.darksky.net"),
            yelp: ProviderConfig::with_base("https://api.yelp.com/v3/businesses/search"),
            movies: ProviderConfig::with_base("https://api.themoviedb.org/3/search/movie"),
            meetups: ProviderConfig::with_base("https://api.meetup.com/find/groups"),
            trails: ProviderConfig::with_base("https://www.hikingproject.com/data/get-trails"),
        }
    }
}

/// Freshness thresholds in seconds, one per resource kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub weather_ttl_seconds: i64,

    pub business_ttl_seconds: i64,

    pub movie_ttl_seconds: i64,

    pub meetup_ttl_seconds: i64,

    pub trail_ttl_seconds: i64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        let secs = |kind: ResourceKind| kind.default_ttl().num_seconds();
        Self {
            weather_ttl_seconds: secs(ResourceKind::Weather),
            business_ttl_seconds: secs(ResourceKind::BusinessListing),
            movie_ttl_seconds: secs(ResourceKind::MovieSummary),
            meetup_ttl_seconds: secs(ResourceKind::MeetupGroup),
            trail_ttl_seconds: secs(ResourceKind::Trail),
        }
    }
}

impl CacheConfig {
    #[must_use]
    pub fn ttl_for(&self, kind: ResourceKind) -> chrono::Duration {
        let secs = match kind {
            ResourceKind::Weather => self.weather_ttl_seconds,
            ResourceKind::BusinessListing => self.business_ttl_seconds,
            ResourceKind::MovieSummary => self.movie_ttl_seconds,
            ResourceKind::MeetupGroup => self.meetup_ttl_seconds,
            ResourceKind::Trail => self.trail_ttl_seconds,
        };
        chrono::Duration::seconds(secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,

    pub loki_enabled: bool,

    pub loki_url: String,

    pub loki_labels: std::collections::HashMap<String, String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        let mut labels = std::collections::HashMap::new();
        labels.insert("app".to_string(), "city-explorer".to_string());

        Self {
            metrics_enabled: true,
            loki_enabled: false,
            loki_url: "http://localhost:3100".to_string(),
            loki_labels: labels,
        }
    }
}

impl Config {
    /// Loads the first config file found, then applies environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_file()?;
        config.apply_env_overrides();
        Ok(config)
    }

    fn load_file() -> Result<Self> {
        for path in &Self::config_paths() {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("city-explorer").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".city-explorer").join("config.toml"));
        }

        paths
    }

    /// Environment variables (usually from `.env`) take precedence over the file.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(port) = lookup("PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }

        if let Some(url) = lookup("DATABASE_URL") {
            self.general.database_path = url;
        }

        let keys = [
            ("GEOCODE_API_KEY", &mut self.providers.geocode),
            ("WEATHER_API_KEY", &mut self.providers.weather),
            ("YELP_API_KEY", &mut self.providers.yelp),
            ("MOVIE_API_KEY", &mut self.providers.movies),
            ("MEETUP_API_KEY", &mut self.providers.meetups),
            ("TRAIL_API_KEY", &mut self.providers.trails),
        ];

        for (var, provider) in keys {
            if let Some(key) = lookup(var) {
                provider.api_key = key;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Server port must be > 0");
        }

        if let Some(kind) = ResourceKind::ALL
            .into_iter()
            .find(|k| self.cache.ttl_for(*k) <= chrono::Duration::zero())
        {
            anyhow::bail!("Cache TTL for {kind} must be > 0 seconds");
        }

        Ok(())
    }
}
