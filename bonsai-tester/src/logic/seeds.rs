use anyhow::{Result, bail};
use std::collections::HashSet;

pub const DEFAULT_SEED: u64 = 1337;
const MAX_RANGE_SEEDS: u64 = 10_000;

/// Resolve CLI seed arguments into a deduplicated list.
///
/// Accepts literal integers (negative values use their magnitude) and
/// inclusive ranges such as `10..20`. Order of first appearance is kept.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<u64>> {
    let mut pending: Vec<u64> = Vec::new();

    for token in tokens {
        if token.is_empty() {
            continue;
        }

        if let Some((start, end)) = token.split_once("..") {
            let (Some(start), Some(end)) = (parse_seed(start), parse_seed(end)) else {
                bail!("Unrecognized seed range: {token}");
            };
            if end < start {
                bail!("Seed range runs backwards: {token}");
            }
            if end - start >= MAX_RANGE_SEEDS {
                bail!("Seed range {token} exceeds {MAX_RANGE_SEEDS} seeds");
            }
            pending.extend(start..=end);
            continue;
        }

        let Some(seed) = parse_seed(token) else {
            bail!("Unrecognized seed token: {token}");
        };
        pending.push(seed);
    }

    let mut seen = HashSet::new();
    let mut deduped: Vec<u64> = pending.into_iter().filter(|s| seen.insert(*s)).collect();

    if deduped.is_empty() {
        deduped.push(DEFAULT_SEED);
    }

    Ok(deduped)
}

fn parse_seed(token: &str) -> Option<u64> {
    let token = token.trim();
    if let Ok(value) = token.parse::<i64>() {
        return Some(value.unsigned_abs());
    }
    token.parse::<u64>().ok()
}
