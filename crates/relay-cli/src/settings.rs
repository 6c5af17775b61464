//! Config-file loading.

use relay_agent::ClientConfig;
use relay_core::{RelayError, RelayResult};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Config file looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "relay.toml";

/// Load the client config.
///
/// An explicit path must exist. Without one, `relay.toml` is read if present
/// and built-in defaults are used otherwise.
pub async fn load_config(explicit: Option<&Path>) -> RelayResult<ClientConfig> {
    let (path, required) = match explicit {
        Some(p) => (p.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };

    let text = match tokio::fs::read_to_string(&path).await {
        Ok(text) => text,
        Err(e) if !required && e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(ClientConfig::default());
        }
        Err(e) => {
            return Err(RelayError::Config(format!(
                "Failed to read config file '{}': {e}",
                path.display()
            )))
        }
    };

    let config: ClientConfig = toml::from_str(&text).map_err(|e| {
        RelayError::Config(format!("Invalid config file '{}': {e}", path.display()))
    })?;
    debug!(path = %path.display(), model = %config.model, "Config loaded");
    Ok(config)
}
