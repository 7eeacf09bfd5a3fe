//! Store configuration.

use serde::{Deserialize, Serialize};

use crate::error::{MetadataError, Result};

/// How the store turns (subject, key) pairs into storage keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisambiguationMode {
    /// Remember each disambiguated key per live subject.
    #[default]
    Cached,
    /// Ask the disambiguator on every operation.
    Uncached,
}

/// Configuration for a [`MetadataStore`](crate::MetadataStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Disambiguation strategy.
    pub disambiguation: DisambiguationMode,

    /// Minimum number of cached subjects before dead ones are swept.
    pub sweep_threshold: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            disambiguation: DisambiguationMode::Cached,
            sweep_threshold: 64,
        }
    }
}

impl StoreConfig {
    /// Create a new config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the disambiguation strategy.
    pub fn with_disambiguation(mut self, mode: DisambiguationMode) -> Self {
        self.disambiguation = mode;
        self
    }

    /// Set the sweep threshold.
    pub fn with_sweep_threshold(mut self, threshold: usize) -> Self {
        self.sweep_threshold = threshold;
        self
    }

    /// Check that the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        if self.sweep_threshold == 0 {
            return Err(MetadataError::Config(
                "sweep_threshold must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StoreConfig::new();
        assert_eq!(config.disambiguation, DisambiguationMode::Cached);
        assert_eq!(config.sweep_threshold, 64);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = StoreConfig::new()
            .with_disambiguation(DisambiguationMode::Uncached)
            .with_sweep_threshold(8);
        assert_eq!(config.disambiguation, DisambiguationMode::Uncached);
        assert_eq!(config.sweep_threshold, 8);
    }

    #[test]
    fn test_zero_threshold_rejected() {
        let config = StoreConfig::new().with_sweep_threshold(0);
        assert!(matches!(config.validate(), Err(MetadataError::Config(_))));
    }

    #[test]
    fn test_deserialize_partial() {
        let config: StoreConfig =
            serde_json::from_str(r#"{"disambiguation": "uncached"}"#).unwrap();
        assert_eq!(config.disambiguation, DisambiguationMode::Uncached);
        assert_eq!(config.sweep_threshold, 64);
    }
}
