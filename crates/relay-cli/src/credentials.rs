//! API-key resolution and storage.
//!
//! Resolution order: `--api-key` flag, then the `OPENROUTER_API_KEY`
//! environment variable, then `~/.openrouter/api_key`.

use relay_agent::{ApiClient, ClientConfig};
use relay_core::{RelayError, RelayResult};
use relay_security::mask_api_key;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Default location of the stored key: `~/.openrouter/api_key`.
pub fn key_file_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".openrouter").join("api_key"))
}

/// Resolve the API key from the flag, the environment, or the key file.
pub fn resolve_api_key(flag: Option<&str>) -> RelayResult<String> {
    let env = std::env::var(API_KEY_ENV).ok();
    resolve_from(flag, env, key_file_path().as_deref())
}

/// Resolution with every source passed in explicitly. Blank values count as absent.
pub fn resolve_from(
    flag: Option<&str>,
    env: Option<String>,
    file: Option<&Path>,
) -> RelayResult<String> {
    if let Some(key) = flag.filter(|k| !k.trim().is_empty()) {
        debug!("API key taken from command line");
        return Ok(key.to_string());
    }

    if let Some(key) = env.filter(|k| !k.trim().is_empty()) {
        debug!(var = API_KEY_ENV, "API key taken from environment");
        return Ok(key);
    }

    if let Some(path) = file {
        if let Some(key) = read_key_file(path)? {
            debug!(path = %path.display(), "API key taken from key file");
            return Ok(key);
        }
    }

    Err(RelayError::Config(format!(
        "API key not found. Pass --api-key, set {API_KEY_ENV}, or run `relay save-key`"
    )))
}

/// Read a stored key. A missing or blank file yields `None`.
pub fn read_key_file(path: &Path) -> RelayResult<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(contents) => {
            let key = contents.trim();
            Ok((!key.is_empty()).then(|| key.to_string()))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Store `key` at `path`, creating parent directories. The file is
/// readable and writable by the owner only on Unix.
pub fn save_api_key(path: &Path, key: &str) -> RelayResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, key.trim())?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    }

    info!(path = %path.display(), key = %mask_api_key(key.trim(), 4), "API key saved");
    Ok(())
}

/// Build a client for `key` and reject keys that fail the local syntax check.
pub fn connect(key: &str, config: &ClientConfig) -> RelayResult<ApiClient> {
    let client = ApiClient::new(key, config.clone())?;
    if !client.validate_api_key() {
        return Err(RelayError::InvalidCredentials(
            "API key invalid or unauthorized".to_string(),
        ));
    }
    debug!(key = %mask_api_key(key, 4), model = client.model(), "Client ready");
    Ok(client)
}
