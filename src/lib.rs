//! Song clustering and in-cluster recommendations over audio features.
//!
//! Core modules:
//! - [`cluster`] - Seeded k-means over feature vectors
//! - [`recommend`] - Popularity-ranked recommendations within a cluster
//! - [`summary`] - Cluster statistics, top tracks, feature mean tables
//! - [`dataset`] - Track records and immutable dataset snapshots
//!
//! ### Supporting Modules
//!
//! - [`config`] - Clustering defaults and session configuration
//! - [`error`] - The error taxonomy shared by every engine
//! - [`cli`] - Command-line interface definitions with clap integration
//! - [`completion`] - Shell completion generation
//!
//! ## Quick Start Example
//!
//! ```
//! use cadence::dataset::{Dataset, Track};
//!
//! // A dataset is an ordered collection of track rows; files on disk are
//! // JSON arrays with this row shape.
//! let tracks: Vec<Track> = serde_json::from_str(
//!     r#"[
//!       {"song_name": "So What",  "artist_name": "Miles Davis",    "popularity": 71.0,
//!        "energy": 0.23, "tempo": 136.0},
//!       {"song_name": "Freddie",  "artist_name": "Miles Davis",    "popularity": 64.0,
//!        "energy": 0.25, "tempo": 132.0},
//!       {"song_name": "Hey Ya!",  "artist_name": "OutKast",        "popularity": 86.0,
//!        "energy": 0.97, "tempo": 160.0},
//!       {"song_name": "Roses",    "artist_name": "OutKast",        "popularity": 78.0,
//!        "energy": 0.92, "tempo": 158.0}
//!     ]"#,
//! )?;
//! let dataset = Dataset::new(tracks);
//!
//! // Group by audio features; the input snapshot stays untouched.
//! let columns = vec!["energy".to_string(), "tempo".to_string()];
//! let annotated = cadence::cluster::cluster(&dataset, &columns, 2, 42)?;
//!
//! // Recommend from the cluster of a chosen song, most popular first.
//! let recs = cadence::recommend::recommend(&annotated, "So What", 5)?;
//! assert!(recs.iter().all(|t| t.artist_name == "Miles Davis"));
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Determinism
//!
//! Clustering is deterministic for a fixed `(dataset, feature columns, k,
//! seed)` tuple, and results are memoized by content fingerprint, so a
//! dashboard re-running the pipeline on every interaction pays for the
//! clustering once. Repeated calls are equivalent whether the cache
//! answers them or not.
//!
//! ## Error Handling
//!
//! Library functions return [`Result`] with the [`Error`] taxonomy:
//! schema violations, out-of-range parameters, non-finite data, missing
//! cluster annotations, and unknown song names are distinct variants, so
//! a presentation layer can render each its own way.

pub mod cli;
pub mod cluster;
pub mod completion;
pub mod config;
pub mod dataset;
pub mod error;
pub mod recommend;
pub mod summary;

pub use dataset::{Dataset, Track};
pub use error::{Error, Result};
