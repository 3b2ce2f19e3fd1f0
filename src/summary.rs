//! Read-only views over an annotated dataset.
//!
//! Everything a browsing surface renders about clusters lives here:
//! per-cluster descriptive statistics, the most popular tracks of a
//! cluster, and the cluster-wise feature mean table. All functions take
//! the annotated dataset produced by [`crate::cluster`] and never mutate
//! it.

use crate::dataset::{Dataset, Track};
use crate::error::{Error, Result};
use log::trace;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Descriptive statistics for one feature column over one cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureStats {
    /// Number of member tracks.
    pub count: usize,
    /// Arithmetic mean.
    pub mean: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    /// Smallest value.
    pub min: f64,
    /// Largest value.
    pub max: f64,
}

impl FeatureStats {
    fn from_values(values: &[f64]) -> Self {
        let count = values.len();
        #[allow(clippy::cast_precision_loss)]
        let mean = values.iter().sum::<f64>() / count as f64;
        #[allow(clippy::cast_precision_loss)]
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;

        Self {
            count,
            mean,
            std_dev: variance.sqrt(),
            min: values.iter().fold(f64::INFINITY, |a, &b| a.min(b)),
            max: values.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b)),
        }
    }
}

/// Distinct cluster ids present in the dataset, ascending.
///
/// # Errors
///
/// [`Error::Precondition`] if any track lacks a cluster assignment.
pub fn cluster_ids(dataset: &Dataset) -> Result<Vec<u32>> {
    if !dataset.is_annotated() {
        return Err(Error::unclustered());
    }

    let mut ids: Vec<u32> = dataset
        .tracks()
        .iter()
        .filter_map(|t| t.cluster_id)
        .collect();
    ids.sort_unstable();
    ids.dedup();
    Ok(ids)
}

/// Per-feature descriptive statistics over one cluster's members.
///
/// # Errors
///
/// - [`Error::Precondition`] if the dataset is not annotated.
/// - [`Error::InvalidParameter`] if `cluster_id` names no track. An empty
///   cluster cannot exist after clustering, so an unknown id is a caller
///   mistake rather than an empty table.
/// - [`Error::Schema`] if a column is absent from a member track.
pub fn cluster_overview(
    dataset: &Dataset,
    feature_columns: &[String],
    cluster_id: u32,
) -> Result<BTreeMap<String, FeatureStats>> {
    if feature_columns.is_empty() {
        return Err(Error::no_features());
    }
    let members = members_of(dataset, cluster_id)?;

    let mut overview = BTreeMap::new();
    for column in feature_columns {
        let values = column_values(&members, column)?;
        overview.insert(column.clone(), FeatureStats::from_values(&values));
    }

    trace!(
        "overview of cluster {cluster_id}: {} members, {} features",
        members.len(),
        overview.len()
    );
    Ok(overview)
}

/// The `n` most popular tracks of a cluster, popularity descending, ties
/// keeping dataset order.
///
/// # Errors
///
/// - [`Error::InvalidParameter`] if `n` is zero or `cluster_id` names no
///   track.
/// - [`Error::Precondition`] if the dataset is not annotated.
pub fn top_tracks(dataset: &Dataset, cluster_id: u32, n: usize) -> Result<Vec<Track>> {
    if n == 0 {
        return Err(Error::InvalidParameter {
            name: "n",
            message: "track count must be positive".to_string(),
        });
    }

    let mut members: Vec<Track> = members_of(dataset, cluster_id)?
        .into_iter()
        .cloned()
        .collect();
    members.sort_by(|a, b| {
        b.popularity
            .partial_cmp(&a.popularity)
            .unwrap_or(Ordering::Equal)
    });
    members.truncate(n);
    Ok(members)
}

/// Mean of every configured feature, per cluster: the cluster-wise feature
/// summary table.
///
/// # Errors
///
/// - [`Error::Precondition`] if the dataset is not annotated.
/// - [`Error::Schema`] if `feature_columns` is empty or a column is absent
///   from any track.
pub fn cluster_means(
    dataset: &Dataset,
    feature_columns: &[String],
) -> Result<BTreeMap<u32, BTreeMap<String, f64>>> {
    if feature_columns.is_empty() {
        return Err(Error::no_features());
    }

    let mut table = BTreeMap::new();
    for cluster_id in cluster_ids(dataset)? {
        let members = members_of(dataset, cluster_id)?;
        let mut row = BTreeMap::new();
        for column in feature_columns {
            let values = column_values(&members, column)?;
            #[allow(clippy::cast_precision_loss)]
            let mean = values.iter().sum::<f64>() / values.len() as f64;
            row.insert(column.clone(), mean);
        }
        table.insert(cluster_id, row);
    }
    Ok(table)
}

/// Members of one cluster, or the errors shared by every summary view.
fn members_of(dataset: &Dataset, cluster_id: u32) -> Result<Vec<&Track>> {
    if !dataset.is_annotated() {
        return Err(Error::unclustered());
    }

    let members: Vec<&Track> = dataset.cluster_members(cluster_id).collect();
    if members.is_empty() {
        return Err(Error::InvalidParameter {
            name: "cluster_id",
            message: format!("no cluster {cluster_id} in the dataset"),
        });
    }
    Ok(members)
}

fn column_values(members: &[&Track], column: &str) -> Result<Vec<f64>> {
    members
        .iter()
        .map(|t| t.feature(column).ok_or_else(|| Error::missing_column(column)))
        .collect()
}
