//! Service config loader (strict parsing).

pub mod schema;

use std::fs;
use std::path::Path;

use fakesvc_core::error::{FakeSvcError, Result};

pub use schema::{ServerSection, ServiceConfig, SimulationSection, SuccessRates};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "FAKESVC_CONFIG";
/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "fakesvc.yaml";

pub fn load_from_file(path: &str) -> Result<ServiceConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| FakeSvcError::Configuration(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ServiceConfig> {
    let cfg: ServiceConfig = serde_yaml::from_str(s)
        .map_err(|e| FakeSvcError::Configuration(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// `$FAKESVC_CONFIG` if set, else `fakesvc.yaml` if it exists, else defaults.
pub fn load_default() -> Result<ServiceConfig> {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        return load_from_file(&path);
    }
    if Path::new(DEFAULT_CONFIG_FILE).exists() {
        return load_from_file(DEFAULT_CONFIG_FILE);
    }
    Ok(ServiceConfig::default())
}
