//! Error types used across `cadence`.
//!
//! Every failure mode surfaces as a distinct variant so the caller (a CLI,
//! a dashboard, a test) can decide how to render it. Nothing in the library
//! retries internally: these conditions are caller misuse or genuinely
//! absent data, not transient faults.

use thiserror::Error;

/// Result alias for `cadence`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the clustering, recommendation, and summary engines.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Dataset is missing a required column, or no feature columns were
    /// configured at all.
    #[error("schema violation: {reason}")]
    Schema {
        /// What about the schema was wrong.
        reason: String,
    },

    /// A parameter was out of range (`k`, `top_n`, `cluster_id`).
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Why the value was rejected.
        message: String,
    },

    /// A feature value was NaN or infinite. Values are never coerced.
    #[error("non-finite value in column '{column}' at row {row}")]
    InvalidData {
        /// Offending column.
        column: String,
        /// Row position in dataset order.
        row: usize,
    },

    /// An operation that needs cluster assignments ran before clustering.
    #[error("precondition failed: {0}")]
    Precondition(String),

    /// No track with the requested name exists in the dataset.
    #[error("no track named '{0}' in the dataset")]
    NotFound(String),
}

impl Error {
    /// Schema error for a column absent from the dataset.
    pub(crate) fn missing_column(column: &str) -> Self {
        Error::Schema {
            reason: format!("missing required column '{column}'"),
        }
    }

    /// Schema error for an empty feature list.
    pub(crate) fn no_features() -> Self {
        Error::Schema {
            reason: "no feature columns configured".to_string(),
        }
    }

    /// Precondition error for a dataset without cluster assignments.
    pub(crate) fn unclustered() -> Self {
        Error::Precondition("dataset has no cluster assignments; run clustering first".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variants_are_discriminable() {
        let schema = Error::missing_column("tempo");
        let param = Error::InvalidParameter {
            name: "k",
            message: "must be positive".to_string(),
        };

        assert!(matches!(schema, Error::Schema { .. }));
        assert!(matches!(param, Error::InvalidParameter { .. }));
        assert_ne!(schema, param);
    }

    #[test]
    fn test_display_names_the_offender() {
        let err = Error::InvalidData {
            column: "loudness".to_string(),
            row: 7,
        };
        let text = err.to_string();
        assert!(text.contains("loudness"), "message should name the column");
        assert!(text.contains('7'), "message should name the row");
    }
}
