//! # Cadence - Song Clustering & Recommendations
//!
//! Cadence groups a song catalog into clusters by audio features and
//! recommends popular tracks from the cluster of a chosen song. The
//! binary is the presentation layer: it loads a JSON dataset, drives the
//! library pipeline, and prints one view of the result.
//!
//! ## Architecture
//!
//! - `cli`: Command-line interface definitions
//! - `dataset`: Track records and dataset snapshots
//! - `cluster`: Seeded k-means clustering engine
//! - `recommend`: In-cluster recommendation engine
//! - `summary`: Cluster statistics and top-track views
//! - `config`: Clustering defaults
//!
//! ## Usage
//!
//! ```bash
//! # Cluster-wise feature means
//! cadence summary songs.json
//!
//! # Describe one cluster
//! cadence overview songs.json --cluster 1
//!
//! # Most popular tracks of a cluster
//! cadence top songs.json --cluster 1 --count 10
//!
//! # Recommendations for a song
//! cadence recommend songs.json "So What" --count 5
//! ```

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use log::{debug, info};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use cadence::cli::{self, Args, ClusterArgs};
use cadence::dataset::{Dataset, Track};
use cadence::{cluster, completion, recommend, summary};

/// Load a dataset file: a JSON array of track row objects.
fn load_dataset(path: &Path) -> Result<Dataset> {
    debug!("Loading dataset from {}", path.display());

    let file = File::open(path)
        .with_context(|| format!("Failed to open dataset file {}", path.display()))?;
    let tracks: Vec<Track> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse dataset file {}", path.display()))?;

    info!("Loaded {} tracks from {}", tracks.len(), path.display());
    Ok(Dataset::new(tracks))
}

/// Load and cluster a dataset with the resolved CLI parameters.
fn load_annotated(path: &Path, params: &ClusterArgs) -> Result<(Dataset, Vec<String>)> {
    let dataset = load_dataset(path)?;
    let config = params.to_config();

    let annotated = cluster::cluster(
        &dataset,
        &config.feature_columns,
        config.clusters,
        config.seed,
    )
    .with_context(|| format!("Failed to cluster dataset {}", path.display()))?;

    Ok((annotated, config.feature_columns))
}

fn print_track_table(tracks: &[Track]) {
    println!("{:<4} {:<32} {:<24} {:>10}", "#", "Song", "Artist", "Popularity");
    for (rank, track) in tracks.iter().enumerate() {
        println!(
            "{:<4} {:<32} {:<24} {:>10.1}",
            rank + 1,
            track.song_name,
            track.artist_name,
            track.popularity
        );
    }
}

/// Main entry point for the Cadence application.
///
/// Initializes logging, parses command-line arguments, and routes commands
/// to the appropriate module functions. All operations return Results for
/// consistent error handling throughout the application.
///
/// # Logging
///
/// Initializes environment logger which can be controlled via `RUST_LOG`:
/// - `RUST_LOG=debug cadence summary songs.json` - Enable debug logging
/// - `RUST_LOG=cadence::cluster=trace cadence top songs.json --cluster 0`
fn main() -> Result<()> {
    // Initialize environment logger for debugging and monitoring
    env_logger::init();

    // Parse command-line arguments using Clap derive macros
    let args = Args::parse();

    // Route commands to appropriate module functions
    match args.command {
        cli::Command::Summary { dataset, params } => {
            info!("Building cluster-wise feature summary for {}", dataset.display());
            let (annotated, columns) = load_annotated(&dataset, &params)?;
            let table = summary::cluster_means(&annotated, &columns)?;

            for (cluster_id, row) in &table {
                println!("Cluster {cluster_id}");
                for (column, mean) in row {
                    println!("  {column:<18} {mean:>10.2}");
                }
            }
        }
        cli::Command::Overview { dataset, cluster, params } => {
            info!("Describing cluster {cluster} of {}", dataset.display());
            let (annotated, columns) = load_annotated(&dataset, &params)?;
            let overview = summary::cluster_overview(&annotated, &columns, cluster)?;

            println!(
                "{:<18} {:>8} {:>10} {:>10} {:>10} {:>10}",
                "Feature", "Count", "Mean", "Std", "Min", "Max"
            );
            for (column, stats) in &overview {
                println!(
                    "{:<18} {:>8} {:>10.2} {:>10.2} {:>10.2} {:>10.2}",
                    column, stats.count, stats.mean, stats.std_dev, stats.min, stats.max
                );
            }
        }
        cli::Command::Top { dataset, cluster, count, params } => {
            info!("Listing top {count} tracks of cluster {cluster}");
            let (annotated, _) = load_annotated(&dataset, &params)?;
            let top = summary::top_tracks(&annotated, cluster, count)?;
            print_track_table(&top);
        }
        cli::Command::Recommend { dataset, song, count, json, params } => {
            info!("Generating {count} recommendations for: {song}");
            let (annotated, _) = load_annotated(&dataset, &params)?;
            let recs = recommend::recommend(&annotated, &song, count)
                .with_context(|| format!("Failed to recommend from '{song}'"))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&recs)?);
            } else {
                print_track_table(&recs);
            }
        }
        cli::Command::Annotate { dataset, params } => {
            info!("Annotating {} with cluster labels", dataset.display());
            let (annotated, _) = load_annotated(&dataset, &params)?;
            println!("{}", serde_json::to_string_pretty(&annotated)?);
        }
        cli::Command::Completion { shell } => {
            let mut cmd = Args::command();
            completion::generate_completions(completion::shell_to_completion_shell(&shell), &mut cmd);
        }
    }

    Ok(())
}
