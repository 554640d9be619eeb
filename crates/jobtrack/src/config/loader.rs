use std::path::{Path, PathBuf};

use crate::config::schema::Config;
use crate::error::ConfigError;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    let config: Config = serde_json::from_str(content)?;

    validate_config(&config)?;

    Ok(config)
}

/// Returns `~/.jobtrack/config.json`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".jobtrack").join("config.json"))
}

/// Loads the explicit path if given, otherwise the default config file if
/// it exists, otherwise built-in defaults. Environment overrides are
/// applied last and the result is validated again.
pub fn load_or_default(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => load_config(p)?,
        None => match default_config_path() {
            Some(p) if p.exists() => load_config(&p)?,
            _ => Config::default(),
        },
    };

    apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;
    validate_config(&config)?;

    Ok(config)
}

/// Applies `JOBTRACK_*` overrides using the given variable lookup.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(host) = lookup("JOBTRACK_HOST") {
        config.server.host = host;
    }
    if let Some(port) = lookup("JOBTRACK_PORT") {
        config.server.port = port.parse().map_err(|_| ConfigError::InvalidEnv {
            name: "JOBTRACK_PORT".to_string(),
            value: port.clone(),
        })?;
    }
    if let Some(db) = lookup("JOBTRACK_DB") {
        config.database.path = Some(PathBuf::from(db));
    }
    if let Some(level) = lookup("JOBTRACK_LOG") {
        config.logging.level = level;
    }
    if let Some(url) = lookup("JOBTRACK_API_URL") {
        config.client.api_url = url;
    }
    Ok(())
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.host.trim().is_empty() {
        return Err(ConfigError::Validation {
            message: "server.host must not be empty".to_string(),
        });
    }

    let level = config.logging.level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        return Err(ConfigError::Validation {
            message: format!(
                "Unsupported log level '{}' (expected one of {})",
                config.logging.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    let url = config.client.api_url.as_str();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::Validation {
            message: format!("client.apiUrl must be an http(s) URL, got '{}'", url),
        });
    }

    Ok(())
}
