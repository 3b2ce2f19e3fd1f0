//! # Command-Line Interface Module
//!
//! This module defines the command-line interface for Cadence using Clap
//! derive macros. The binary is the stand-in for a dashboard: it loads a
//! dataset file, runs the clustering pipeline, and renders the result of
//! one browsing or recommendation operation.
//!
//! ## Commands
//!
//! - `summary`: Cluster-wise feature mean table
//! - `overview`: Descriptive statistics for one cluster
//! - `top`: Most popular tracks in one cluster
//! - `recommend`: Ranked recommendations for a chosen song
//! - `annotate`: Emit the cluster-annotated dataset as JSON
//!
//! ## Examples
//!
//! ```bash
//! cadence summary songs.json
//! cadence top songs.json --cluster 2
//! cadence recommend songs.json "So What" --count 5
//! ```

use crate::config::{self, ClusterConfig};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Shell types supported for completion generation
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

/// Main application arguments structure.
///
/// Uses Clap derive macros to automatically generate argument parsing,
/// help text, and validation. The main structure contains only a
/// subcommand since all functionality is accessed through specific
/// commands.
#[derive(Parser)]
#[command(name = "cadence")]
#[command(about = "Cadence: audio-feature song clustering & in-cluster recommendations")]
#[command(version)]
pub struct Args {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Clustering parameters shared by every dataset command.
///
/// Defaults match the library configuration: four clusters, seed 42, the
/// nine standard audio feature columns.
#[derive(clap::Args, Debug)]
pub struct ClusterArgs {
    /// Number of clusters to form
    #[arg(long = "clusters", short = 'k', default_value_t = config::DEFAULT_CLUSTERS)]
    pub clusters: usize,

    /// Seed for deterministic cluster labels
    #[arg(long, default_value_t = config::DEFAULT_SEED)]
    pub seed: u64,

    /// Comma-separated feature columns to cluster on
    ///
    /// Defaults to the nine standard audio features (danceability, energy,
    /// loudness, speechiness, acousticness, instrumentalness, liveness,
    /// valence, tempo).
    #[arg(long, value_delimiter = ',')]
    pub features: Option<Vec<String>>,
}

impl ClusterArgs {
    /// Resolve CLI flags into a library configuration.
    #[must_use]
    pub fn to_config(&self) -> ClusterConfig {
        let mut cfg = ClusterConfig::new(self.clusters, self.seed);
        if let Some(features) = &self.features {
            cfg = cfg.with_feature_columns(features.clone());
        }
        cfg
    }
}

/// Enumeration of all available subcommands.
///
/// Each variant corresponds to one view of the clustered catalog. Command
/// arguments are embedded directly in the enum variants for type safety
/// and automatic validation.
#[derive(Subcommand)]
pub enum Command {
    /// Show the cluster-wise feature mean table
    ///
    /// Clusters the dataset, then prints the mean of every configured
    /// feature per cluster. This is the birds-eye view of what separates
    /// the clusters from each other.
    Summary {
        /// Path to the dataset file (JSON array of track objects)
        dataset: PathBuf,

        #[command(flatten)]
        params: ClusterArgs,
    },

    /// Show descriptive statistics for one cluster
    ///
    /// Prints count, mean, standard deviation, minimum, and maximum of
    /// every configured feature over the chosen cluster's members.
    Overview {
        /// Path to the dataset file (JSON array of track objects)
        dataset: PathBuf,

        /// Cluster id to describe
        #[arg(long)]
        cluster: u32,

        #[command(flatten)]
        params: ClusterArgs,
    },

    /// List the most popular tracks in one cluster
    Top {
        /// Path to the dataset file (JSON array of track objects)
        dataset: PathBuf,

        /// Cluster id to list
        #[arg(long)]
        cluster: u32,

        /// How many tracks to show
        #[arg(long, short = 'n', default_value_t = 10)]
        count: usize,

        #[command(flatten)]
        params: ClusterArgs,
    },

    /// Recommend songs similar to a chosen one
    ///
    /// Clusters the dataset, finds the first track with this exact name,
    /// and prints the most popular tracks of its cluster. The chosen song
    /// itself appears in the list when it ranks high enough.
    Recommend {
        /// Path to the dataset file (JSON array of track objects)
        dataset: PathBuf,

        /// Exact song name to recommend from
        #[arg(value_hint = clap::ValueHint::Other)]
        song: String,

        /// How many recommendations to return
        #[arg(long, short = 'n', default_value_t = 5)]
        count: usize,

        /// Emit the recommendations as JSON instead of a table
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        params: ClusterArgs,
    },

    /// Emit the cluster-annotated dataset as JSON on stdout
    ///
    /// The output is the input dataset with a `cluster_id` field added to
    /// every track, suitable for feeding to downstream tooling.
    Annotate {
        /// Path to the dataset file (JSON array of track objects)
        dataset: PathBuf,

        #[command(flatten)]
        params: ClusterArgs,
    },

    /// Generate shell completions
    ///
    /// Usage: cadence completion bash > ~/.local/share/bash-completion/completions/cadence
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cluster_args_defaults_match_config() {
        let args = Args::parse_from(["cadence", "summary", "songs.json"]);
        let Command::Summary { params, .. } = args.command else {
            panic!("expected summary command");
        };

        let cfg = params.to_config();
        assert_eq!(cfg.clusters, config::DEFAULT_CLUSTERS);
        assert_eq!(cfg.seed, config::DEFAULT_SEED);
        assert_eq!(cfg.feature_columns, config::default_feature_columns());
    }

    #[test]
    fn test_feature_list_is_comma_separated() {
        let args = Args::parse_from([
            "cadence",
            "recommend",
            "songs.json",
            "So What",
            "--features",
            "energy,tempo",
        ]);
        let Command::Recommend { params, song, count, .. } = args.command else {
            panic!("expected recommend command");
        };

        assert_eq!(song, "So What");
        assert_eq!(count, 5, "default recommendation count");
        assert_eq!(
            params.to_config().feature_columns,
            vec!["energy".to_string(), "tempo".to_string()]
        );
    }
}
