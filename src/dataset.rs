//! Track records and dataset snapshots.
//!
//! A [`Dataset`] is an ordered, immutable collection of [`Track`]s sharing
//! one feature schema. Engines never mutate a dataset in place; clustering
//! hands back a new annotated copy so the same base snapshot can be reused
//! across sessions without aliasing surprises.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One song entry with metadata and audio feature values.
///
/// Named columns beyond the fixed metadata fields are collected into the
/// flattened `features` map, so a JSON track object reads like a
/// spreadsheet row:
///
/// ```json
/// {"song_name": "So What", "artist_name": "Miles Davis", "popularity": 71.0,
///  "danceability": 0.41, "energy": 0.23, "tempo": 136.0}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Song title. Not guaranteed unique within a dataset.
    pub song_name: String,
    /// Performing artist.
    pub artist_name: String,
    /// Ranking score. Only used for ordering, never for cluster assignment.
    pub popularity: f64,
    /// Cluster label in `[0, k)`. Absent until clustering has run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster_id: Option<u32>,
    /// Named numeric audio attributes (danceability, energy, tempo, ...).
    #[serde(flatten)]
    pub features: BTreeMap<String, f64>,
}

impl Track {
    /// Look up a feature value by column name.
    #[must_use]
    pub fn feature(&self, column: &str) -> Option<f64> {
        self.features.get(column).copied()
    }
}

/// Ordered collection of tracks sharing a feature schema.
///
/// Row position is the record identity: it is stable, survives annotation,
/// and is what ranking ties fall back to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    tracks: Vec<Track>,
}

impl Dataset {
    /// Wrap a track collection as a dataset snapshot.
    #[must_use]
    pub fn new(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }

    /// Number of tracks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// True when the dataset holds no tracks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// All tracks in dataset order.
    #[must_use]
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// True when every track carries a cluster assignment.
    #[must_use]
    pub fn is_annotated(&self) -> bool {
        self.tracks.iter().all(|t| t.cluster_id.is_some())
    }

    /// Row position of the first track with this exact name.
    ///
    /// Duplicate names resolve to the first occurrence in dataset order.
    #[must_use]
    pub fn position_of(&self, song_name: &str) -> Option<usize> {
        self.tracks.iter().position(|t| t.song_name == song_name)
    }

    /// Extract the numeric feature matrix for the given columns, in
    /// dataset order.
    ///
    /// # Errors
    ///
    /// - [`Error::Schema`] if `columns` is empty or any column is absent
    ///   from any track.
    /// - [`Error::InvalidData`] if any requested value is NaN or infinite.
    pub fn feature_matrix(&self, columns: &[String]) -> Result<Vec<Vec<f64>>> {
        if columns.is_empty() {
            return Err(Error::no_features());
        }

        let mut matrix = Vec::with_capacity(self.tracks.len());
        for (row, track) in self.tracks.iter().enumerate() {
            let mut point = Vec::with_capacity(columns.len());
            for column in columns {
                let value = track
                    .feature(column)
                    .ok_or_else(|| Error::missing_column(column))?;
                if !value.is_finite() {
                    return Err(Error::InvalidData {
                        column: column.clone(),
                        row,
                    });
                }
                point.push(value);
            }
            matrix.push(point);
        }

        Ok(matrix)
    }

    /// Produce a new dataset with the given labels attached, leaving `self`
    /// untouched.
    ///
    /// Label count must equal track count; callers uphold this.
    #[must_use]
    pub(crate) fn with_assignments(&self, labels: &[u32]) -> Self {
        debug_assert_eq!(labels.len(), self.tracks.len());

        let tracks = self
            .tracks
            .iter()
            .zip(labels)
            .map(|(track, &label)| Track {
                cluster_id: Some(label),
                ..track.clone()
            })
            .collect();

        Self { tracks }
    }

    /// Tracks belonging to one cluster, paired with their row position.
    pub(crate) fn cluster_members(&self, cluster_id: u32) -> impl Iterator<Item = &Track> {
        self.tracks
            .iter()
            .filter(move |t| t.cluster_id == Some(cluster_id))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn track(name: &str, popularity: f64, features: &[(&str, f64)]) -> Track {
        Track {
            song_name: name.to_string(),
            artist_name: format!("{name} Artist"),
            popularity,
            cluster_id: None,
            features: features
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect(),
        }
    }

    #[test]
    fn test_feature_matrix_follows_column_order() {
        let ds = Dataset::new(vec![
            track("A", 10.0, &[("energy", 0.9), ("tempo", 120.0)]),
            track("B", 20.0, &[("energy", 0.1), ("tempo", 60.0)]),
        ]);

        let columns = vec!["tempo".to_string(), "energy".to_string()];
        let matrix = ds.feature_matrix(&columns).unwrap();

        assert_eq!(matrix, vec![vec![120.0, 0.9], vec![60.0, 0.1]]);
    }

    #[test]
    fn test_feature_matrix_rejects_missing_column() {
        let ds = Dataset::new(vec![track("A", 10.0, &[("energy", 0.9)])]);

        let result = ds.feature_matrix(&["nonexistent_column".to_string()]);
        assert!(matches!(result, Err(Error::Schema { .. })));
    }

    #[test]
    fn test_feature_matrix_rejects_empty_column_list() {
        let ds = Dataset::new(vec![track("A", 10.0, &[("energy", 0.9)])]);

        let result = ds.feature_matrix(&[]);
        assert!(matches!(result, Err(Error::Schema { .. })));
    }

    #[test]
    fn test_feature_matrix_rejects_non_finite_values() {
        let ds = Dataset::new(vec![
            track("A", 10.0, &[("energy", 0.9)]),
            track("B", 20.0, &[("energy", f64::NAN)]),
        ]);

        let result = ds.feature_matrix(&["energy".to_string()]);
        assert_eq!(
            result,
            Err(Error::InvalidData {
                column: "energy".to_string(),
                row: 1,
            })
        );
    }

    #[test]
    fn test_position_of_takes_first_occurrence() {
        let ds = Dataset::new(vec![
            track("Unique", 1.0, &[("energy", 0.1)]),
            track("Dup", 2.0, &[("energy", 0.2)]),
            track("Dup", 3.0, &[("energy", 0.3)]),
        ]);

        assert_eq!(ds.position_of("Dup"), Some(1));
        assert_eq!(ds.position_of("Missing"), None);
    }

    #[test]
    fn test_with_assignments_leaves_input_untouched() {
        let ds = Dataset::new(vec![
            track("A", 10.0, &[("energy", 0.9)]),
            track("B", 20.0, &[("energy", 0.1)]),
        ]);

        let annotated = ds.with_assignments(&[1, 0]);

        assert!(!ds.is_annotated(), "source snapshot must stay unannotated");
        assert!(annotated.is_annotated());
        assert_eq!(annotated.tracks()[0].cluster_id, Some(1));
        assert_eq!(annotated.tracks()[1].cluster_id, Some(0));
        assert_eq!(annotated.tracks()[0].song_name, "A");
    }

    #[test]
    fn test_track_json_row_shape() {
        let json = r#"{
            "song_name": "So What",
            "artist_name": "Miles Davis",
            "popularity": 71.0,
            "danceability": 0.41,
            "tempo": 136.0
        }"#;

        let track: Track = serde_json::from_str(json).unwrap();
        assert_eq!(track.song_name, "So What");
        assert_eq!(track.feature("tempo"), Some(136.0));
        assert_eq!(track.cluster_id, None);
    }
}
