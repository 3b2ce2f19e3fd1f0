//! # Configuration Module
//!
//! Clustering parameters shared between the library defaults and the CLI
//! surface. The defaults mirror the dashboard this engine was extracted
//! from: four clusters, a fixed seed for reproducible labels, and the nine
//! standard audio feature columns.
//!
//! ## Future Configuration
//!
//! This module is designed to be extended with additional options:
//! - Per-feature normalization settings
//! - Iteration budget and convergence tolerance overrides
//! - Alternative ranking fields for recommendations

use serde::{Deserialize, Serialize};

/// Audio feature columns used for clustering when none are configured.
pub const DEFAULT_FEATURE_COLUMNS: [&str; 9] = [
    "danceability",
    "energy",
    "loudness",
    "speechiness",
    "acousticness",
    "instrumentalness",
    "liveness",
    "valence",
    "tempo",
];

/// Default number of clusters.
pub const DEFAULT_CLUSTERS: usize = 4;

/// Default seed, fixed so repeated runs label clusters identically.
pub const DEFAULT_SEED: u64 = 42;

/// Clustering configuration for a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Feature columns fed to the clustering engine, in order.
    pub feature_columns: Vec<String>,
    /// Number of target clusters.
    pub clusters: usize,
    /// Seed for deterministic initialization.
    pub seed: u64,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            feature_columns: default_feature_columns(),
            clusters: DEFAULT_CLUSTERS,
            seed: DEFAULT_SEED,
        }
    }
}

impl ClusterConfig {
    /// Configuration with explicit cluster count and seed, default columns.
    #[must_use]
    pub fn new(clusters: usize, seed: u64) -> Self {
        Self {
            clusters,
            seed,
            ..Self::default()
        }
    }

    /// Replace the feature column list.
    #[must_use]
    pub fn with_feature_columns(mut self, feature_columns: Vec<String>) -> Self {
        self.feature_columns = feature_columns;
        self
    }
}

/// The default audio feature columns as owned strings.
#[must_use]
pub fn default_feature_columns() -> Vec<String> {
    DEFAULT_FEATURE_COLUMNS
        .iter()
        .map(|s| (*s).to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_dashboard_defaults() {
        let config = ClusterConfig::default();

        assert_eq!(config.clusters, 4);
        assert_eq!(config.seed, 42);
        assert_eq!(config.feature_columns.len(), 9);
        assert_eq!(config.feature_columns[0], "danceability");
        assert_eq!(config.feature_columns[8], "tempo");
    }

    #[test]
    fn test_with_feature_columns_replaces_list() {
        let config = ClusterConfig::new(3, 0)
            .with_feature_columns(vec!["tempo".to_string(), "energy".to_string()]);

        assert_eq!(config.clusters, 3);
        assert_eq!(config.feature_columns, vec!["tempo", "energy"]);
    }

    #[test]
    fn test_config_serde_round_trip() {
        let config = ClusterConfig::new(5, 7);
        let json = serde_json::to_string(&config).expect("config should serialize");
        let back: ClusterConfig = serde_json::from_str(&json).expect("config should parse");

        assert_eq!(back.clusters, 5);
        assert_eq!(back.seed, 7);
        assert_eq!(back.feature_columns, config.feature_columns);
    }
}
