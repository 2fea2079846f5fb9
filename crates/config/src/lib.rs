pub mod schema;

pub use schema::{CpuSettings, EndpointConfig, MemorySettings, MonitorConfig};

use sysmon_core::{MonitorError, Result};
use std::path::{Path, PathBuf};

/// Load configuration from a TOML file.  Returns `MonitorConfig::default()` if
/// the file doesn't exist so the monitor always has sensible defaults.
///
/// The parsed config is validated before it is returned.
pub fn load(path: impl AsRef<Path>) -> Result<MonitorConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::warn!(
            "Config file not found at '{}'; using defaults.",
            path.display()
        );
        return Ok(MonitorConfig::default());
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| MonitorError::Config(format!("cannot read '{}': {e}", path.display())))?;

    from_toml(&raw)
}

/// Parse and validate configuration from a TOML string.
pub fn from_toml(raw: &str) -> Result<MonitorConfig> {
    let config: MonitorConfig =
        toml::from_str(raw).map_err(|e| MonitorError::Config(format!("TOML parse error: {e}")))?;
    config.validate()?;
    Ok(config)
}

/// Return the default config path, honouring `$XDG_CONFIG_HOME`.
pub fn default_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("sysmon").join("sysmon.toml")
}
