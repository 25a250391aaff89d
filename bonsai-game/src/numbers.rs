//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

use crate::constants::CONFIG_MIN_VALUE;

/// Clamp an integer setting to the configuration floor and the `u32` range.
#[must_use]
pub fn clamp_setting_i64(value: i64) -> u32 {
    if value < i64::from(CONFIG_MIN_VALUE) {
        return CONFIG_MIN_VALUE;
    }
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// Truncate a float setting toward zero, flooring at the configuration minimum.
///
/// Non-finite and sub-one inputs collapse to the minimum; oversized inputs
/// saturate at `u32::MAX`.
#[must_use]
pub fn clamp_setting_f64(value: f64) -> u32 {
    if !value.is_finite() || value < f64::from(CONFIG_MIN_VALUE) {
        return CONFIG_MIN_VALUE;
    }
    let max = cast::<u32, f64>(u32::MAX).unwrap_or(f64::MAX);
    cast::<f64, u32>(value.min(max).trunc()).unwrap_or(CONFIG_MIN_VALUE)
}

/// Parse free-form form input, falling back to the configuration minimum.
#[must_use]
pub fn parse_setting(raw: &str) -> u32 {
    raw.trim()
        .parse::<f64>()
        .map_or(CONFIG_MIN_VALUE, clamp_setting_f64)
}

/// Convert a count to f64 for reporting ratios.
#[must_use]
pub fn usize_to_f64(value: usize) -> f64 {
    cast::<usize, f64>(value).unwrap_or(0.0)
}
