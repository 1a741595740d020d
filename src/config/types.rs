use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::catalog::Track;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub upstream: UpstreamConfig,

    #[serde(default)]
    pub relay: RelayConfig,

    /// Tracks seeded into the catalog at startup.
    #[serde(default)]
    pub tracks: Vec<Track>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Settings for the shared upstream HTTP client.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    /// Hard timeout for establishing a connection to the store.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Abort a body transfer once no bytes arrive for this long. There is no
    /// total-duration cap; large files legitimately take longer than small
    /// ones.
    #[serde(default = "default_idle_read_timeout")]
    pub idle_read_timeout_secs: u64,
}

fn default_connect_timeout() -> u64 {
    5
}
fn default_idle_read_timeout() -> u64 {
    30
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout(),
            idle_read_timeout_secs: default_idle_read_timeout(),
        }
    }
}

impl UpstreamConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn idle_read_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_read_timeout_secs)
    }
}

/// Settings for client-facing partial responses.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RelayConfig {
    /// Bounded public-cache window for partial responses, in seconds.
    #[serde(default = "default_cache_max_age")]
    pub cache_max_age_secs: u64,

    /// Content-Type used when neither the upstream response nor the track's
    /// stored format yields one.
    #[serde(default = "default_content_type")]
    pub default_content_type: String,
}

fn default_cache_max_age() -> u64 {
    3600
}
fn default_content_type() -> String {
    "audio/mpeg".to_string()
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            cache_max_age_secs: default_cache_max_age(),
            default_content_type: default_content_type(),
        }
    }
}
