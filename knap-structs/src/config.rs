use anyhow::{anyhow, Result};
use knap_challenges::Track;
use knap_utils::{dejsonify, load_json_arg};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct PlaybackConfig {
    pub tick_interval_ms: u64,
    pub transition_ticks: u32,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 400,
            transition_ticks: 1,
        }
    }
}

impl PlaybackConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(default)]
pub struct RuntimeConfig {
    pub playback: PlaybackConfig,
    pub generator: Track,
}

impl RuntimeConfig {
    /// Loads from an inline json string, a `*.json` path or `-` for stdin.
    /// Missing fields take their defaults.
    pub fn load(arg: &str) -> Result<Self> {
        let json = load_json_arg(arg)?;
        dejsonify::<RuntimeConfig>(&json).map_err(|e| anyhow!("Failed to parse config: {}", e))
    }
}
