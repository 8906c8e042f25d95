//! Command-line and environment configuration.
//!
//! | Option | Environment | Default |
//! |--------|-------------|---------|
//! | `--host` | `TICKDASH_HOST` | `127.0.0.1` |
//! | `--port` | `TICKDASH_PORT` | `8501` |
//! | `--default-symbol` | `TICKDASH_DEFAULT_SYMBOL` | `AAPL` |
//! | `--cache-ttl-secs` | `TICKDASH_CACHE_TTL_SECS` | none (cache for the whole session) |
//! | `--cache-capacity` | `TICKDASH_CACHE_CAPACITY` | none (unbounded) |
//! | `--timeout-ms` | `TICKDASH_TIMEOUT_MS` | `10000` |
//! | `--offline` | `TICKDASH_OFFLINE` | `false` |

use std::time::Duration;

use clap::Parser;
use tickdash_core::CacheConfig;

/// Single-page stock dashboard server.
#[derive(Debug, Clone, Parser)]
#[command(name = "tickdash", version, about = "Single-page stock dashboard server")]
pub struct Config {
    /// Address to bind to.
    #[arg(long, env = "TICKDASH_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on.
    #[arg(long, env = "TICKDASH_PORT", default_value_t = 8501)]
    pub port: u16,

    /// Symbol shown when none is requested.
    #[arg(long, env = "TICKDASH_DEFAULT_SYMBOL", default_value = "AAPL")]
    pub default_symbol: String,

    /// Expire memoized results after this many seconds.
    #[arg(long, env = "TICKDASH_CACHE_TTL_SECS")]
    pub cache_ttl_secs: Option<u64>,

    /// Keep at most this many symbols per operation.
    #[arg(
        long,
        env = "TICKDASH_CACHE_CAPACITY",
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub cache_capacity: Option<usize>,

    /// Upstream request timeout in milliseconds.
    #[arg(long, env = "TICKDASH_TIMEOUT_MS", default_value_t = 10_000)]
    pub timeout_ms: u64,

    /// Serve deterministic fixture data instead of calling Yahoo Finance.
    #[arg(long, env = "TICKDASH_OFFLINE")]
    pub offline: bool,
}

impl Config {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn cache_config(&self) -> CacheConfig {
        let mut config = CacheConfig::unbounded();
        if let Some(secs) = self.cache_ttl_secs {
            config = config.with_ttl(Duration::from_secs(secs));
        }
        if let Some(capacity) = self.cache_capacity {
            config = config.with_capacity(capacity);
        }
        config
    }
}
