mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = [
        "./config.toml",
        "./tunerelay.toml",
        "~/.config/tunerelay/config.toml",
        "/etc/tunerelay/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
fn validate_config(config: &Config) -> Result<()> {
    if config.server.port == 0 {
        anyhow::bail!("Server port cannot be 0");
    }

    if config.upstream.connect_timeout_secs == 0 {
        anyhow::bail!("Upstream connect timeout cannot be 0");
    }
    if config.upstream.idle_read_timeout_secs == 0 {
        anyhow::bail!("Upstream idle read timeout cannot be 0");
    }

    if !config.relay.default_content_type.contains('/') {
        anyhow::bail!(
            "Default content type '{}' is not a MIME type",
            config.relay.default_content_type
        );
    }

    let mut seen = std::collections::HashSet::new();
    for track in &config.tracks {
        if track.id.trim().is_empty() {
            anyhow::bail!("Track with source '{}' has an empty id", track.source_url);
        }
        if !track.source_url.starts_with("http://") && !track.source_url.starts_with("https://") {
            anyhow::bail!(
                "Track '{}' has a non-HTTP source URL: {}",
                track.id,
                track.source_url
            );
        }
        if !seen.insert(track.id.as_str()) {
            tracing::warn!("Duplicate track id '{}' in config; last entry wins", track.id);
        }
    }

    Ok(())
}
