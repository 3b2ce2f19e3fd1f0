//! K-means clustering over audio feature vectors.
//!
//! Partitions a dataset into `k` groups by iteratively minimizing
//! within-cluster variance under squared Euclidean distance (Lloyd's
//! algorithm with k-means++ initialization). Everything is deterministic
//! for a fixed seed: repeated calls on identical input yield identical
//! labels, whether or not the memoization cache answers them.
//!
//! Cluster labels are an arbitrary but stable permutation for a given
//! seed. Callers must not read meaning into a specific label across runs
//! with different seeds or `k`.

use crate::dataset::Dataset;
use crate::error::{Error, Result};
use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex};

/// Memoized assignments keyed by input fingerprint
type AssignmentCache = Arc<Mutex<HashMap<u64, Arc<Vec<u32>>>>>;

/// Entries are whole label vectors; once the map grows past this the whole
/// cache is dropped rather than tracking per-entry age.
const CACHE_CAPACITY: usize = 64;

lazy_static::lazy_static! {
    /// Global memoization cache for cluster assignments
    static ref ASSIGNMENT_CACHE: AssignmentCache = Arc::new(Mutex::new(HashMap::new()));
}

/// K-means parameters with builder-style configuration.
#[derive(Debug, Clone)]
pub struct KmeansParams {
    /// Number of clusters.
    k: usize,
    /// Maximum Lloyd iterations.
    max_iter: usize,
    /// Convergence tolerance on total centroid shift.
    tol: f64,
    /// Seed for centroid initialization.
    seed: u64,
}

impl KmeansParams {
    /// Parameters for `k` clusters with default iteration budget,
    /// tolerance, and seed 0.
    #[must_use]
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iter: 100,
            tol: 1e-4,
            seed: 0,
        }
    }

    /// Set the maximum iteration count.
    #[must_use]
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the convergence tolerance.
    #[must_use]
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Set the seed controlling deterministic initialization.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Number of target clusters.
    #[must_use]
    pub fn k(&self) -> usize {
        self.k
    }

    /// Cluster `dataset` on `feature_columns` and return a new annotated
    /// dataset. The input is never mutated.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidParameter`] if `k` is zero or exceeds the number
    ///   of tracks (an empty dataset always fails here).
    /// - [`Error::Schema`] if `feature_columns` is empty or names a column
    ///   absent from any track.
    /// - [`Error::InvalidData`] if any feature value is NaN or infinite.
    pub fn cluster(&self, dataset: &Dataset, feature_columns: &[String]) -> Result<Dataset> {
        if self.k == 0 {
            return Err(Error::InvalidParameter {
                name: "k",
                message: "cluster count must be positive".to_string(),
            });
        }

        let matrix = dataset.feature_matrix(feature_columns)?;
        let n = matrix.len();
        if self.k > n {
            return Err(Error::InvalidParameter {
                name: "k",
                message: format!("cannot form {} clusters from {n} tracks", self.k),
            });
        }

        let key = fingerprint(&matrix, feature_columns, self.k, self.seed);

        if let Ok(cache) = ASSIGNMENT_CACHE.lock() {
            if let Some(labels) = cache.get(&key) {
                trace!("assignment cache hit for fingerprint {key:#018x}");
                return Ok(dataset.with_assignments(labels));
            }
        }

        let labels = Arc::new(self.fit(&matrix));

        if let Ok(mut cache) = ASSIGNMENT_CACHE.lock() {
            if cache.len() >= CACHE_CAPACITY {
                cache.clear();
            }
            cache.insert(key, Arc::clone(&labels));
        }

        Ok(dataset.with_assignments(&labels))
    }

    /// Run seeded k-means++ and Lloyd iterations over a validated matrix.
    fn fit(&self, matrix: &[Vec<f64>]) -> Vec<u32> {
        let n = matrix.len();
        let dim = matrix[0].len();
        let mut rng = StdRng::seed_from_u64(self.seed);

        let mut centroids = init_centroids(matrix, self.k, &mut rng);
        let mut labels = vec![0u32; n];

        for iter in 0..self.max_iter {
            // Assignment step: each point to its nearest centroid.
            labels = matrix
                .par_iter()
                .map(|point| nearest_centroid(point, &centroids) as u32)
                .collect();

            // Update step: each centroid to the mean of its members.
            let mut sums = vec![vec![0.0; dim]; self.k];
            let mut counts = vec![0usize; self.k];
            for (point, &label) in matrix.iter().zip(&labels) {
                let label = label as usize;
                for (s, v) in sums[label].iter_mut().zip(point) {
                    *s += v;
                }
                counts[label] += 1;
            }

            let mut shift = 0.0;
            for (cluster, sum) in sums.into_iter().enumerate() {
                if counts[cluster] == 0 {
                    // Empty cluster: reseed from a random point and keep going.
                    let idx = rng.gen_range(0..n);
                    shift += squared_distance(&centroids[cluster], &matrix[idx]);
                    centroids[cluster] = matrix[idx].clone();
                    continue;
                }

                let mean: Vec<f64> = sum
                    .into_iter()
                    .map(|s| s / counts[cluster] as f64)
                    .collect();
                shift += squared_distance(&centroids[cluster], &mean);
                centroids[cluster] = mean;
            }

            if shift < self.tol {
                debug!("k-means converged after {} iterations", iter + 1);
                break;
            }
        }

        repair_empty_clusters(matrix, &centroids, &mut labels, self.k);
        labels
    }
}

/// Cluster `dataset` into `k` groups on `feature_columns`, deterministically
/// for `seed`, returning a new annotated dataset.
///
/// Convenience wrapper over [`KmeansParams`] with default iteration budget
/// and tolerance. See [`KmeansParams::cluster`] for the error conditions.
pub fn cluster(dataset: &Dataset, feature_columns: &[String], k: usize, seed: u64) -> Result<Dataset> {
    KmeansParams::new(k).with_seed(seed).cluster(dataset, feature_columns)
}

/// k-means++ initialization: first centroid uniform, the rest sampled
/// proportional to squared distance from the nearest chosen centroid.
fn init_centroids(matrix: &[Vec<f64>], k: usize, rng: &mut StdRng) -> Vec<Vec<f64>> {
    let n = matrix.len();
    let mut centroids = Vec::with_capacity(k);
    centroids.push(matrix[rng.gen_range(0..n)].clone());

    while centroids.len() < k {
        let distances: Vec<f64> = matrix
            .iter()
            .map(|point| {
                centroids
                    .iter()
                    .map(|c| squared_distance(point, c))
                    .fold(f64::MAX, f64::min)
            })
            .collect();

        let total: f64 = distances.iter().sum();
        if total == 0.0 {
            // All remaining points coincide with chosen centroids.
            centroids.push(matrix[rng.gen_range(0..n)].clone());
            continue;
        }

        let threshold = rng.gen::<f64>() * total;
        let mut cumsum = 0.0;
        let mut selected = n - 1;
        for (i, d) in distances.iter().enumerate() {
            cumsum += d;
            if cumsum >= threshold {
                selected = i;
                break;
            }
        }
        centroids.push(matrix[selected].clone());
    }

    centroids
}

/// Index of the centroid nearest to `point`.
fn nearest_centroid(point: &[f64], centroids: &[Vec<f64>]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::MAX;
    for (i, centroid) in centroids.iter().enumerate() {
        let dist = squared_distance(point, centroid);
        if dist < best_dist {
            best_dist = dist;
            best = i;
        }
    }
    best
}

/// Squared Euclidean distance.
fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum()
}

/// Guarantee every label in `[0, k)` is used.
///
/// Lloyd can converge with an unused label when a reseeded centroid loses
/// every point again. Each unused label steals the member farthest from its
/// centroid out of the currently largest cluster; ties resolve to the
/// lowest row, so the repair is deterministic.
fn repair_empty_clusters(matrix: &[Vec<f64>], centroids: &[Vec<f64>], labels: &mut [u32], k: usize) {
    let mut counts = vec![0usize; k];
    for &label in labels.iter() {
        counts[label as usize] += 1;
    }

    for empty in 0..k {
        if counts[empty] > 0 {
            continue;
        }

        let mut donor_row = None;
        let mut donor_dist = f64::MIN;
        for (row, (point, &label)) in matrix.iter().zip(labels.iter()).enumerate() {
            if counts[label as usize] <= 1 {
                continue;
            }
            let dist = squared_distance(point, &centroids[label as usize]);
            if dist > donor_dist {
                donor_dist = dist;
                donor_row = Some(row);
            }
        }

        // k <= n guarantees a donor exists.
        if let Some(row) = donor_row {
            counts[labels[row] as usize] -= 1;
            counts[empty] += 1;
            labels[row] = empty as u32;
        }
    }
}

/// Content fingerprint of (feature matrix, columns, k, seed).
///
/// Floats hash by bit pattern; the matrix is already validated finite, so
/// no NaN ever reaches this point.
fn fingerprint(matrix: &[Vec<f64>], columns: &[String], k: usize, seed: u64) -> u64 {
    let mut hasher = DefaultHasher::new();
    columns.hash(&mut hasher);
    k.hash(&mut hasher);
    seed.hash(&mut hasher);
    matrix.len().hash(&mut hasher);
    for point in matrix {
        for value in point {
            value.to_bits().hash(&mut hasher);
        }
    }
    hasher.finish()
}
