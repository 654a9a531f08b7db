//! Configuration for the planner caches.

use std::path::PathBuf;
use std::time::Duration;

use crate::domain::TransportModes;
use crate::persist::RecordCodec;

/// Directory for persisted caches. Unset or empty disables persistence.
pub const ENV_CACHE_DIR: &str = "PLANNER_CACHE_DIR";

/// Record codec for persisted caches: `json` or `csv`.
pub const ENV_CACHE_CODEC: &str = "PLANNER_CACHE_CODEC";

/// Maximum entries per visit-cache family.
pub const ENV_VISIT_CACHE_CAPACITY: &str = "PLANNER_VISIT_CACHE_CAPACITY";

/// Mode filters for scoped interchange costs, e.g. `t;tb`.
pub const ENV_INTERCHANGE_MODES: &str = "PLANNER_INTERCHANGE_MODES";

/// Errors reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var}: unknown cache codec {value:?}")]
    InvalidCodec { var: &'static str, value: String },

    #[error("{var}: invalid capacity {value:?}")]
    InvalidCapacity { var: &'static str, value: String },

    #[error("{var}: unknown transport mode code {code:?} in {value:?}")]
    InvalidModeCode {
        var: &'static str,
        value: String,
        code: char,
    },
}

/// Sizing for the search visit cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitCacheConfig {
    /// Maximum number of entries in each outcome family.
    pub max_capacity: u64,

    /// Evict entries not read or written for this long.
    pub time_to_idle: Option<Duration>,
}

impl VisitCacheConfig {
    pub fn new(max_capacity: u64) -> Self {
        Self {
            max_capacity,
            time_to_idle: None,
        }
    }

    pub fn with_time_to_idle(mut self, idle: Duration) -> Self {
        self.time_to_idle = Some(idle);
        self
    }
}

impl Default for VisitCacheConfig {
    fn default() -> Self {
        Self::new(1_000_000)
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CoreConfig {
    /// Where persisted caches live. `None` builds everything in memory.
    pub cache_dir: Option<PathBuf>,

    /// Encoding of persisted caches.
    pub codec: RecordCodec,

    pub visit_cache: VisitCacheConfig,

    /// Mode filters that get their own interchange-cost matrix.
    pub interchange_filters: Vec<TransportModes>,
}

impl CoreConfig {
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    pub fn with_codec(mut self, codec: RecordCodec) -> Self {
        self.codec = codec;
        self
    }

    pub fn with_visit_cache(mut self, visit_cache: VisitCacheConfig) -> Self {
        self.visit_cache = visit_cache;
        self
    }

    pub fn with_interchange_filters(mut self, filters: Vec<TransportModes>) -> Self {
        self.interchange_filters = filters;
        self
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`. Unset variables keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = CoreConfig::default();

        if let Some(dir) = lookup(ENV_CACHE_DIR) {
            let dir = dir.trim();
            if !dir.is_empty() {
                config.cache_dir = Some(PathBuf::from(dir));
            }
        }

        if let Some(value) = lookup(ENV_CACHE_CODEC) {
            config.codec = value
                .parse()
                .map_err(|_| ConfigError::InvalidCodec {
                    var: ENV_CACHE_CODEC,
                    value,
                })?;
        }

        if let Some(value) = lookup(ENV_VISIT_CACHE_CAPACITY) {
            config.visit_cache.max_capacity = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidCapacity {
                    var: ENV_VISIT_CACHE_CAPACITY,
                    value,
                })?;
        }

        if let Some(value) = lookup(ENV_INTERCHANGE_MODES) {
            config.interchange_filters = parse_filters(&value)?;
        }

        Ok(config)
    }
}

fn parse_filters(value: &str) -> Result<Vec<TransportModes>, ConfigError> {
    value
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|codes| {
            TransportModes::parse_codes(codes).map_err(|code| ConfigError::InvalidModeCode {
                var: ENV_INTERCHANGE_MODES,
                value: value.to_string(),
                code,
            })
        })
        .collect()
}
