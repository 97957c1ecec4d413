//! Cache configuration.
//!
//! Loaded from an optional `agora.toml` (section `[cache]`), an optional
//! explicit file, then `AGORA_CACHE__*` environment variables, later sources
//! overriding earlier ones.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::backend::{CacheBackend, MemoryBackend};
use crate::error::{CacheError, Result};

/// TTL por defecto: una hora.
pub const DEFAULT_TTL_SECONDS: u64 = 3600;

/// TTL maximo aceptado: un año.
pub const MAX_TTL_SECONDS: u64 = 365 * 24 * 3600;

const CONFIG_BASENAME: &str = "agora";
const ENV_PREFIX: &str = "AGORA";

/// Which cache backend to run against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Memory,
    Redis,
}

/// Configuracion del cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// TTL en segundos (default: 3600 = 1 hora)
    pub default_ttl_seconds: u64,
    /// Backend a usar (default: memory)
    pub backend: BackendKind,
    /// URL de Redis, requerida si `backend = "redis"`
    pub redis_url: Option<String>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl_seconds: DEFAULT_TTL_SECONDS,
            backend: BackendKind::Memory,
            redis_url: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Settings {
    cache: CacheConfig,
}

impl CacheConfig {
    /// Loads and validates the configuration.
    ///
    /// `path`, when given, must exist; the default `agora.toml` is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with(path, Environment::with_prefix(ENV_PREFIX))
    }

    fn load_with(path: Option<&Path>, env: Environment) -> Result<Self> {
        let mut builder =
            Config::builder().add_source(File::with_name(CONFIG_BASENAME).required(false));

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            env.prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.cache.validate()?;
        Ok(settings.cache)
    }

    /// Checks the TTL is positive and at most a year, and a Redis URL is present when needed.
    pub fn validate(&self) -> Result<()> {
        if self.default_ttl_seconds == 0 {
            return Err(CacheError::InvalidConfig(
                "default_ttl_seconds must be greater than zero".to_string(),
            ));
        }
        if self.default_ttl_seconds > MAX_TTL_SECONDS {
            return Err(CacheError::InvalidConfig(format!(
                "default_ttl_seconds cannot exceed {MAX_TTL_SECONDS}"
            )));
        }
        if self.backend == BackendKind::Redis
            && self.redis_url.as_deref().is_none_or(|url| url.trim().is_empty())
        {
            return Err(CacheError::InvalidConfig(
                "redis_url is required when backend = \"redis\"".to_string(),
            ));
        }
        Ok(())
    }

    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_seconds)
    }

    /// Builds the configured backend, connecting to Redis if selected.
    pub async fn build_backend(&self) -> Result<Arc<dyn CacheBackend>> {
        self.validate()?;
        match self.backend {
            BackendKind::Memory => Ok(Arc::new(MemoryBackend::new())),
            BackendKind::Redis => self.connect_redis().await,
        }
    }

    #[cfg(feature = "redis")]
    async fn connect_redis(&self) -> Result<Arc<dyn CacheBackend>> {
        let url = self
            .redis_url
            .as_deref()
            .ok_or_else(|| CacheError::InvalidConfig("redis_url is missing".to_string()))?;
        let backend = crate::backend::RedisBackend::connect(url).await?;
        Ok(Arc::new(backend))
    }

    #[cfg(not(feature = "redis"))]
    async fn connect_redis(&self) -> Result<Arc<dyn CacheBackend>> {
        Err(CacheError::InvalidConfig(
            "backend \"redis\" requires the `redis` feature".to_string(),
        ))
    }
}
