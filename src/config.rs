//! Tunable constants for unification and aggregation.
//!
//! Defaults match the catalogs this pipeline was built for. The binary calls
//! [`PipelineConfig::from_env`] after loading `.env`, so each value can be
//! overridden without recompiling:
//!
//! | Variable                   | Default |
//! |----------------------------|---------|
//! | `SHOPLENS_USD_TO_INR`      | 83.0    |
//! | `SHOPLENS_LOCATION_LIMIT`  | 10      |
//! | `SHOPLENS_SLUG_MAX_LEN`    | 20      |

use std::str::FromStr;

use tracing::warn;

pub const DEFAULT_USD_TO_INR: f64 = 83.0;
pub const DEFAULT_LOCATION_LIMIT: usize = 10;
pub const DEFAULT_SLUG_MAX_LEN: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Multiplier applied to USD-denominated trend prices.
    pub usd_to_inr: f64,
    /// How many location buckets survive truncation.
    pub location_limit: usize,
    /// Character cap on the name slug inside synthetic ids.
    pub slug_max_len: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            usd_to_inr: DEFAULT_USD_TO_INR,
            location_limit: DEFAULT_LOCATION_LIMIT,
            slug_max_len: DEFAULT_SLUG_MAX_LEN,
        }
    }
}

impl PipelineConfig {
    /// Builds a config from `SHOPLENS_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup. Unparseable values keep the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            usd_to_inr: read(&lookup, "SHOPLENS_USD_TO_INR", defaults.usd_to_inr),
            location_limit: read(&lookup, "SHOPLENS_LOCATION_LIMIT", defaults.location_limit),
            slug_max_len: read(&lookup, "SHOPLENS_SLUG_MAX_LEN", defaults.slug_max_len),
        }
    }
}

fn read<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Copy + std::fmt::Debug,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, ?default, "Ignoring unparseable config value");
            default
        }),
    }
}
