use anyhow::{Context, Result};
use bonsai_game::EngineConfig;
use std::{fs, path::Path};

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Load an engine configuration from a JSON file. Missing keys keep their
/// defaults and out-of-range values are coerced by the engine.
pub fn read_config_file(path: &Path) -> Result<EngineConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    EngineConfig::from_json(&raw).with_context(|| format!("parsing config file {}", path.display()))
}
