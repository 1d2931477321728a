use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("target_id ({ids}) and target ({paths}) are different in size")]
    LengthMismatch { paths: usize, ids: usize },

    #[error("No targets provided")]
    NoTargets,

    #[error("Worker count must be at least 1")]
    ZeroWorkers,
}

/// Helper function to convert usize count to f64 with explicit precision loss allowance
#[inline]
fn count_to_f64(count: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        count as f64
    }
}

/// One candidate puck/tile to scan against the query set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSpec {
    /// Barcode file for this target
    pub path: PathBuf,
    /// Identifier used in the summary table and the adjacency graph
    pub id: String,
}

impl TargetSpec {
    pub fn new(path: impl Into<PathBuf>, id: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            id: id.into(),
        }
    }

    /// Pair target paths with target ids by position.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::LengthMismatch` if the lists differ in length, or
    /// `ConfigError::NoTargets` if both are empty.
    pub fn zip(paths: Vec<PathBuf>, ids: Vec<String>) -> Result<Vec<Self>, ConfigError> {
        if paths.len() != ids.len() {
            return Err(ConfigError::LengthMismatch {
                paths: paths.len(),
                ids: ids.len(),
            });
        }
        if paths.is_empty() {
            return Err(ConfigError::NoTargets);
        }

        Ok(paths
            .into_iter()
            .zip(ids)
            .map(|(path, id)| Self { path, id })
            .collect())
    }
}

/// One row of the summary table
#[derive(Debug, Clone, PartialEq)]
pub struct TargetRecord {
    /// Barcode file the target was loaded from
    pub path: PathBuf,

    /// Target identifier
    pub id: String,

    /// Number of distinct barcodes in the target
    pub n_barcodes: usize,

    /// Number of target barcodes also present in the query set
    pub n_matching: usize,

    /// `n_matching / n_barcodes`, or 0 for an empty target
    pub matching_ratio: f64,

    /// Whether `matching_ratio` exceeds the cutoff
    pub pass_threshold: bool,

    /// Whether the target lies in the dilated best community.
    /// `None` until adjacency refinement runs.
    pub pass_adjacency: Option<bool>,
}

impl TargetRecord {
    /// Build a record from scan counts. Thresholding happens separately.
    #[must_use]
    pub fn from_counts(spec: &TargetSpec, n_barcodes: usize, n_matching: usize) -> Self {
        Self {
            path: spec.path.clone(),
            id: spec.id.clone(),
            n_barcodes,
            n_matching,
            matching_ratio: matching_ratio(n_matching, n_barcodes),
            pass_threshold: false,
            pass_adjacency: None,
        }
    }
}

/// Fraction of a target's barcodes found in the query set.
///
/// An empty target has a ratio of 0.
#[must_use]
pub fn matching_ratio(n_matching: usize, n_barcodes: usize) -> f64 {
    if n_barcodes == 0 {
        return 0.0;
    }
    count_to_f64(n_matching) / count_to_f64(n_barcodes)
}
