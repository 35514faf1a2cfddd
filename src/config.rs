//! Configuration Module
//!
//! Handles loading and managing store configuration from environment variables.

use std::env;

use crate::store::{CACHED_LIMITS, MAX_RETAINED};

/// Store and server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of records retained per location
    pub max_retained: usize,
    /// Recent-N limits kept precomputed in the read cache
    pub cached_limits: Vec<usize>,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_RETAINED` - Records kept per location (default: 100)
    /// - `CACHED_LIMITS` - Comma-separated recent-N limits to cache (default: 5,10)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        Self {
            max_retained: env::var("MAX_RETAINED")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|v: &usize| *v > 0)
                .unwrap_or(MAX_RETAINED),
            cached_limits: env::var("CACHED_LIMITS")
                .ok()
                .map(|v| parse_limits(&v))
                .unwrap_or_else(|| CACHED_LIMITS.to_vec()),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_retained: MAX_RETAINED,
            cached_limits: CACHED_LIMITS.to_vec(),
            server_port: 3000,
        }
    }
}

/// Parses a comma-separated limit list, always keeping the built-in limits.
fn parse_limits(raw: &str) -> Vec<usize> {
    let mut limits: Vec<usize> = raw
        .split(',')
        .filter_map(|part| part.trim().parse().ok())
        .filter(|n| *n > 0)
        .chain(CACHED_LIMITS)
        .collect();
    limits.sort_unstable();
    limits.dedup();
    limits
}
