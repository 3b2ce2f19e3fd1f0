//! Cluster-based song recommendations.
//!
//! Given a song name and a dataset already annotated with cluster labels,
//! returns the most popular tracks from the matched song's cluster. The
//! similarity notion lives entirely in the clustering; this module only
//! looks up, filters, and ranks.

use crate::dataset::{Dataset, Track};
use crate::error::{Error, Result};
use log::debug;
use std::cmp::Ordering;

/// Recommend up to `top_n` tracks from the cluster of the track named
/// `song_name`, ranked by popularity descending.
///
/// Ties in popularity keep dataset order (the sort is stable), so results
/// are fully deterministic. A cluster smaller than `top_n` returns all of
/// its members.
///
/// Two deliberate policies, carried over from the dashboard this engine
/// was extracted from:
///
/// - Duplicate names resolve to the **first occurrence** in dataset order.
/// - The queried track itself **is included** when it ranks within the
///   top-n of its own cluster. Callers wanting it excluded filter the
///   result afterwards.
///
/// # Errors
///
/// - [`Error::InvalidParameter`] if `top_n` is zero.
/// - [`Error::Precondition`] if any track lacks a cluster assignment.
/// - [`Error::NotFound`] if no track has this exact name. Never returns an
///   empty sequence for an unknown song; an empty result always means an
///   empty cluster bound, not a failed lookup.
pub fn recommend(dataset: &Dataset, song_name: &str, top_n: usize) -> Result<Vec<Track>> {
    if top_n == 0 {
        return Err(Error::InvalidParameter {
            name: "top_n",
            message: "recommendation count must be positive".to_string(),
        });
    }

    if !dataset.is_annotated() {
        return Err(Error::unclustered());
    }

    let position = dataset
        .position_of(song_name)
        .ok_or_else(|| Error::NotFound(song_name.to_string()))?;

    // Annotation was checked above, every track carries a label here.
    let cluster_id = dataset.tracks()[position]
        .cluster_id
        .ok_or_else(Error::unclustered)?;

    let mut members: Vec<Track> = dataset.cluster_members(cluster_id).cloned().collect();
    debug!(
        "'{song_name}' matched row {position}, cluster {cluster_id} with {} members",
        members.len()
    );

    members.sort_by(|a, b| {
        b.popularity
            .partial_cmp(&a.popularity)
            .unwrap_or(Ordering::Equal)
    });
    members.truncate(top_n);

    Ok(members)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster;
    use crate::dataset::tests::track;

    /// Two clusters on energy: four quiet tracks, two loud ones.
    fn annotated_dataset() -> Dataset {
        let ds = Dataset::new(vec![
            track("Quiet Low", 10.0, &[("energy", 0.10)]),
            track("Quiet Mid", 55.0, &[("energy", 0.12)]),
            track("Quiet High", 90.0, &[("energy", 0.14)]),
            track("Quiet Tie", 55.0, &[("energy", 0.11)]),
            track("Loud A", 40.0, &[("energy", 0.90)]),
            track("Loud B", 70.0, &[("energy", 0.95)]),
        ]);
        cluster::cluster(&ds, &["energy".to_string()], 2, 42).unwrap()
    }

    #[test]
    fn test_results_are_popularity_descending() {
        let ds = annotated_dataset();
        let recs = recommend(&ds, "Quiet Low", 4).unwrap();

        for pair in recs.windows(2) {
            assert!(
                pair[0].popularity >= pair[1].popularity,
                "ranking must be non-increasing"
            );
        }
    }

    #[test]
    fn test_result_size_is_min_of_top_n_and_cluster_size() {
        let ds = annotated_dataset();

        assert_eq!(recommend(&ds, "Quiet Low", 2).unwrap().len(), 2);
        // The quiet cluster has 4 members, a larger bound returns them all.
        assert_eq!(recommend(&ds, "Quiet Low", 10).unwrap().len(), 4);
    }

    #[test]
    fn test_results_stay_in_the_matched_cluster() {
        let ds = annotated_dataset();
        let want = ds.tracks()[ds.position_of("Loud A").unwrap()].cluster_id;

        let recs = recommend(&ds, "Loud A", 10).unwrap();
        assert_eq!(recs.len(), 2);
        for rec in &recs {
            assert_eq!(rec.cluster_id, want, "recommendation left the cluster");
        }
    }

    #[test]
    fn test_popularity_ties_keep_dataset_order() {
        let ds = annotated_dataset();
        let recs = recommend(&ds, "Quiet Low", 4).unwrap();

        let names: Vec<&str> = recs.iter().map(|t| t.song_name.as_str()).collect();
        // Quiet Mid (row 1) and Quiet Tie (row 3) share popularity 55.
        assert_eq!(names, vec!["Quiet High", "Quiet Mid", "Quiet Tie", "Quiet Low"]);
    }

    #[test]
    fn test_query_track_is_included_when_it_ranks() {
        let ds = annotated_dataset();
        let recs = recommend(&ds, "Quiet High", 2).unwrap();

        assert!(
            recs.iter().any(|t| t.song_name == "Quiet High"),
            "the most popular track of a cluster recommends itself"
        );
    }

    #[test]
    fn test_unknown_song_is_not_found() {
        let ds = annotated_dataset();
        let result = recommend(&ds, "Unknown Song XYZ", 5);
        assert_eq!(result, Err(Error::NotFound("Unknown Song XYZ".to_string())));
    }

    #[test]
    fn test_zero_top_n_is_rejected() {
        let ds = annotated_dataset();
        let result = recommend(&ds, "Loud A", 0);
        assert!(matches!(
            result,
            Err(Error::InvalidParameter { name: "top_n", .. })
        ));
    }

    #[test]
    fn test_unclustered_dataset_fails_precondition() {
        let ds = Dataset::new(vec![track("A", 1.0, &[("energy", 0.2)])]);
        let result = recommend(&ds, "A", 5);
        assert!(matches!(result, Err(Error::Precondition(_))));
    }

    #[test]
    fn test_duplicate_names_match_first_occurrence() {
        // Same name in two different clusters; the first row wins.
        let ds = Dataset::new(vec![
            track("Twin", 5.0, &[("energy", 0.10)]),
            track("Quiet Friend", 80.0, &[("energy", 0.12)]),
            track("Twin", 99.0, &[("energy", 0.90)]),
            track("Loud Friend", 60.0, &[("energy", 0.92)]),
        ]);
        let ds = cluster::cluster(&ds, &["energy".to_string()], 2, 42).unwrap();

        let recs = recommend(&ds, "Twin", 5).unwrap();
        assert!(
            recs.iter().any(|t| t.song_name == "Quiet Friend"),
            "lookup should land in the first Twin's cluster"
        );
        assert!(
            recs.iter().all(|t| t.song_name != "Loud Friend"),
            "lookup must not land in the second Twin's cluster"
        );
    }
}
