use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Construction-time draw probabilities for the report generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratorConfig {
    /// Chance that `next()` returns a phantom area instead of advancing the lap
    pub phantom_probability: f64,

    /// Chance of a compound force ("4 to 5") instead of a single value
    pub compound_force_probability: f64,

    /// Independent attachment draws, not mutually exclusive
    pub behavior_probability: f64,
    pub modifier_probability: f64,
    pub timing_probability: f64,

    pub icing_probability: f64,
    pub visibility_becoming_probability: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            phantom_probability: 0.02,
            compound_force_probability: 0.15,
            behavior_probability: 0.2,
            modifier_probability: 0.15,
            timing_probability: 0.12,
            icing_probability: 0.1,
            visibility_becoming_probability: 0.1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BufferConfig {
    /// Refill kicks in below this
    pub min_size: usize,
    /// Hard capacity
    pub max_size: usize,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            min_size: 3,
            max_size: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FocusConfig {
    /// Quiet period a restore must survive before it commits
    pub debounce_ms: i64,
    /// Bookkeeping tick; correctness comes from wall-clock comparisons,
    /// so a late tick only delays the commit
    pub tick_interval_ms: u64,
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 1_000,
            tick_interval_ms: 1_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WarningConfig {
    /// Unfocused time that must be strictly exceeded before a warning fires
    pub threshold_ms: i64,
}

impl Default for WarningConfig {
    fn default() -> Self {
        Self {
            threshold_ms: 60_000,
        }
    }
}

/// Top-level tunables for a broadcast session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BroadcastConfig {
    pub generator: GeneratorConfig,
    pub buffer: BufferConfig,
    pub focus: FocusConfig,
    pub warning: WarningConfig,
}

impl BroadcastConfig {
    /// Load from a JSON file, falling back to defaults when the file does not
    /// exist or fails to parse.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        Ok(serde_json::from_str(&contents).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_observed_constants() {
        let config = BroadcastConfig::default();
        assert_eq!(config.generator.phantom_probability, 0.02);
        assert_eq!(config.buffer.min_size, 3);
        assert_eq!(config.buffer.max_size, 5);
        assert_eq!(config.focus.debounce_ms, 1_000);
        assert_eq!(config.warning.threshold_ms, 60_000);
    }

    #[test]
    fn load_missing_file_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = BroadcastConfig::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config.warning.threshold_ms, 60_000);
    }

    #[test]
    fn load_round_trips_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = BroadcastConfig::default();
        config.generator.phantom_probability = 0.5;
        config.buffer.max_size = 8;
        std::fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

        let loaded = BroadcastConfig::load(&path).unwrap();
        assert_eq!(loaded.generator.phantom_probability, 0.5);
        assert_eq!(loaded.buffer.max_size, 8);
        // Untouched sections keep their defaults
        assert_eq!(loaded.focus.debounce_ms, 1_000);
    }
}
