//! Player-tunable engine configuration.
//!
//! All four values are positive integers. Anything else handed to the engine
//! is coerced to the minimum of 1 rather than rejected, so the scheduler never
//! sees a zero modulus and the thresholds are never trivially satisfied.
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::constants::{
    DEFAULT_BAD_INTERVAL_SECS, DEFAULT_HEALTHY_INTERVAL_SECS, DEFAULT_LOSE_THRESHOLD,
    DEFAULT_WIN_THRESHOLD,
};
use crate::numbers::{clamp_setting_f64, clamp_setting_i64, parse_setting};

/// Errors raised at the configuration boundary.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown configuration field `{0}`")]
    UnknownField(String),
    #[error("failed to parse engine configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Selector for one of the four configuration values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConfigField {
    HealthyIntervalSeconds,
    BadIntervalSeconds,
    WinThreshold,
    LoseThreshold,
}

impl ConfigField {
    pub const ALL: [Self; 4] = [
        Self::HealthyIntervalSeconds,
        Self::BadIntervalSeconds,
        Self::WinThreshold,
        Self::LoseThreshold,
    ];

    /// Canonical camelCase name.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::HealthyIntervalSeconds => "healthyIntervalSeconds",
            Self::BadIntervalSeconds => "badIntervalSeconds",
            Self::WinThreshold => "winThreshold",
            Self::LoseThreshold => "loseThreshold",
        }
    }
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ConfigField {
    type Err = ConfigError;

    /// Accepts camelCase, `snake_case` and kebab-case spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "healthyintervalseconds" | "healthyinterval" => Ok(Self::HealthyIntervalSeconds),
            "badintervalseconds" | "badinterval" => Ok(Self::BadIntervalSeconds),
            "winthreshold" | "wincount" => Ok(Self::WinThreshold),
            "losethreshold" | "losecount" => Ok(Self::LoseThreshold),
            _ => Err(ConfigError::UnknownField(s.to_string())),
        }
    }
}

/// Raw input for a configuration write, before coercion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SettingValue<'a> {
    Int(i64),
    Float(f64),
    Text(&'a str),
}

impl SettingValue<'_> {
    /// Coerce to a valid setting (minimum 1).
    #[must_use]
    pub fn coerce(self) -> u32 {
        match self {
            Self::Int(value) => clamp_setting_i64(value),
            Self::Float(value) => clamp_setting_f64(value),
            Self::Text(raw) => parse_setting(raw),
        }
    }
}

impl From<i64> for SettingValue<'_> {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for SettingValue<'_> {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for SettingValue<'_> {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for SettingValue<'_> {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl<'a> From<&'a str> for SettingValue<'a> {
    fn from(value: &'a str) -> Self {
        Self::Text(value)
    }
}

/// Spawn/decay periods and win/lose thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    #[serde(deserialize_with = "deserialize_setting")]
    healthy_interval_seconds: u32,
    #[serde(deserialize_with = "deserialize_setting")]
    bad_interval_seconds: u32,
    #[serde(deserialize_with = "deserialize_setting")]
    win_threshold: u32,
    #[serde(deserialize_with = "deserialize_setting")]
    lose_threshold: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            healthy_interval_seconds: DEFAULT_HEALTHY_INTERVAL_SECS,
            bad_interval_seconds: DEFAULT_BAD_INTERVAL_SECS,
            win_threshold: DEFAULT_WIN_THRESHOLD,
            lose_threshold: DEFAULT_LOSE_THRESHOLD,
        }
    }
}

impl EngineConfig {
    /// Build a configuration, coercing every value to at least 1.
    #[must_use]
    pub fn new(healthy_interval: u32, bad_interval: u32, win: u32, lose: u32) -> Self {
        Self::default()
            .with(ConfigField::HealthyIntervalSeconds, healthy_interval)
            .with(ConfigField::BadIntervalSeconds, bad_interval)
            .with(ConfigField::WinThreshold, win)
            .with(ConfigField::LoseThreshold, lose)
    }

    /// Load a (possibly partial) configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the input is not a valid JSON object
    /// of configuration fields.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub const fn healthy_interval_seconds(&self) -> u32 {
        self.healthy_interval_seconds
    }

    #[must_use]
    pub const fn bad_interval_seconds(&self) -> u32 {
        self.bad_interval_seconds
    }

    #[must_use]
    pub const fn win_threshold(&self) -> u32 {
        self.win_threshold
    }

    #[must_use]
    pub const fn lose_threshold(&self) -> u32 {
        self.lose_threshold
    }

    #[must_use]
    pub const fn get(&self, field: ConfigField) -> u32 {
        match field {
            ConfigField::HealthyIntervalSeconds => self.healthy_interval_seconds,
            ConfigField::BadIntervalSeconds => self.bad_interval_seconds,
            ConfigField::WinThreshold => self.win_threshold,
            ConfigField::LoseThreshold => self.lose_threshold,
        }
    }

    /// Write a field, returning the value actually stored.
    pub fn set<'a>(&mut self, field: ConfigField, value: impl Into<SettingValue<'a>>) -> u32 {
        let coerced = value.into().coerce();
        let slot = match field {
            ConfigField::HealthyIntervalSeconds => &mut self.healthy_interval_seconds,
            ConfigField::BadIntervalSeconds => &mut self.bad_interval_seconds,
            ConfigField::WinThreshold => &mut self.win_threshold,
            ConfigField::LoseThreshold => &mut self.lose_threshold,
        };
        *slot = coerced;
        coerced
    }

    #[must_use]
    pub fn with<'a>(mut self, field: ConfigField, value: impl Into<SettingValue<'a>>) -> Self {
        self.set(field, value);
        self
    }
}

fn deserialize_setting<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    let coerced = match &raw {
        serde_json::Value::Number(number) => number.as_i64().map_or_else(
            || SettingValue::Float(number.as_f64().unwrap_or(0.0)).coerce(),
            |value| SettingValue::Int(value).coerce(),
        ),
        serde_json::Value::String(text) => SettingValue::Text(text).coerce(),
        _ => SettingValue::Int(0).coerce(),
    };
    Ok(coerced)
}
