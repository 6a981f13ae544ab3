use crate::error::{CardinalError, Result};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Number of time buckets the rolling window is sliced into by default.
pub const DEFAULT_BUCKET_COUNT: usize = 10;

/// Per-bucket tester capacity used when no sizing hint is given.
pub const DEFAULT_BUCKET_CAPACITY: usize = 4096;

/// Lower bound applied to the per-bucket capacity derived from a hint, so
/// tiny hints do not produce degenerate testers.
pub const MIN_BUCKET_CAPACITY: usize = 1000;

/// Configuration for a [`Cardinal`](crate::Cardinal) window.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(pattern = "owned")]
pub struct CardinalConfig {
    /// Total rolling duration covered by the bucket ring.
    #[builder(default = "Duration::from_secs(60)")]
    pub window: Duration,

    /// Number of time buckets the window is sliced into. Each bucket covers
    /// `window / buckets` of wall-clock time.
    #[builder(default = "DEFAULT_BUCKET_COUNT")]
    pub buckets: usize,

    /// Expected number of distinct tokens across the whole window. Each
    /// bucket's membership tester is sized for roughly `hint / buckets`
    /// elements; without a hint every bucket gets
    /// [`DEFAULT_BUCKET_CAPACITY`].
    #[builder(default = "None")]
    pub capacity_hint: Option<usize>,
}

impl CardinalConfig {
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.window.is_zero() {
            return Err("Window duration must be greater than 0".to_string());
        }
        if self.buckets == 0 {
            return Err("Bucket count must be greater than 0".to_string());
        }
        if self.window.as_nanos() < self.buckets as u128 {
            return Err(format!(
                "Window of {:?} is too short to slice into {} buckets",
                self.window, self.buckets
            ));
        }
        if self.capacity_hint == Some(0) {
            return Err("Capacity hint must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Per-bucket tester capacity derived from the sizing hint.
    pub fn bucket_capacity(&self) -> usize {
        match self.capacity_hint {
            Some(hint) => (hint / self.buckets).max(MIN_BUCKET_CAPACITY),
            None => DEFAULT_BUCKET_CAPACITY,
        }
    }

    /// Loads configuration from `CARDINAL_*` environment variables (reading
    /// a `.env` file when present), falling back to the builder defaults for
    /// anything unset.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            window: Duration::from_secs(parse_env_or(
                "CARDINAL_WINDOW_SECS",
                60,
            )?),
            buckets: parse_env_or("CARDINAL_BUCKETS", DEFAULT_BUCKET_COUNT)?,
            capacity_hint: parse_env_opt("CARDINAL_CAPACITY_HINT")?,
        })
    }
}

fn parse_env_or<T>(var_name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(var_name) {
        Ok(value) => {
            value
                .parse::<T>()
                .map_err(|e| CardinalError::EnvParseError {
                    var_name: var_name.to_string(),
                    value: value.clone(),
                    error: e.to_string(),
                })
        }
        Err(_) => Ok(default),
    }
}

fn parse_env_opt<T>(var_name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(var_name) {
        Ok(value) => value.parse::<T>().map(Some).map_err(|e| {
            CardinalError::EnvParseError {
                var_name: var_name.to_string(),
                value: value.clone(),
                error: e.to_string(),
            }
        }),
        Err(_) => Ok(None),
    }
}
