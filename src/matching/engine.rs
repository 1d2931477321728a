use rayon::prelude::*;
use rustc_hash::FxHashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info};

use crate::core::{ConfigError, QuerySet, TargetRecord, TargetSpec};
use crate::parsing::{SequenceSource, SourceConfig, SourceError};
use crate::utils::validation::bounded_workers;

/// A target whose barcodes could not be loaded
#[derive(Debug)]
pub struct TargetFailure {
    /// Position of the target in the input list
    pub index: usize,
    pub id: String,
    pub path: PathBuf,
    pub error: SourceError,
}

impl fmt::Display for TargetFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "target '{}' ({}): {}",
            self.id,
            self.path.display(),
            self.error
        )
    }
}

fn describe_failures(failures: &[TargetFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Error, Debug)]
pub enum ScanError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to read query '{}': {}", .path.display(), .error)]
    Query {
        path: PathBuf,
        #[source]
        error: SourceError,
    },

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(String),

    #[error("{} target(s) failed to scan: {}", .0.len(), describe_failures(.0))]
    Targets(Vec<TargetFailure>),
}

/// Configuration for the scan
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Number of parallel workers, at least 1
    pub workers: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self { workers: 1 }
    }
}

impl ScanConfig {
    /// Build a configuration for `workers` workers, clamped to the available
    /// parallelism.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ZeroWorkers` if `workers` is 0.
    pub fn new(workers: usize) -> Result<Self, ConfigError> {
        Ok(Self {
            workers: bounded_workers(workers)?,
        })
    }
}

/// Load the shared query set from `path`
///
/// # Errors
///
/// Returns `ScanError::Query` wrapping the first error raised by the source.
pub fn load_query(
    source: &dyn SequenceSource,
    path: &Path,
    config: &SourceConfig,
) -> Result<QuerySet, ScanError> {
    let start = Instant::now();
    let query = QuerySet::from_source(source, path, config).map_err(|error| ScanError::Query {
        path: path.to_path_buf(),
        error,
    })?;

    info!(
        "Loaded {} unique query barcodes from {} in {:.2} s",
        query.len(),
        path.display(),
        start.elapsed().as_secs_f64()
    );
    Ok(query)
}

/// Scans targets against one shared, read-only query set
pub struct IntersectionEngine<'a> {
    query: &'a QuerySet,
    source: &'a dyn SequenceSource,
    config: ScanConfig,
}

impl<'a> IntersectionEngine<'a> {
    /// Create a new engine with default configuration
    pub fn new(query: &'a QuerySet, source: &'a dyn SequenceSource) -> Self {
        Self {
            query,
            source,
            config: ScanConfig::default(),
        }
    }

    /// Create a new engine with custom configuration
    pub fn with_config(
        query: &'a QuerySet,
        source: &'a dyn SequenceSource,
        config: ScanConfig,
    ) -> Self {
        Self {
            query,
            source,
            config,
        }
    }

    /// Scan every target and return one record per target, in input order.
    ///
    /// Targets are independent units of work. A target that fails to load
    /// does not stop the others; all failures are reported together once
    /// every target has been processed.
    ///
    /// # Errors
    ///
    /// Returns `ScanError::Config` for a zero worker count,
    /// `ScanError::ThreadPool` if the pool cannot be built, or
    /// `ScanError::Targets` listing every target that failed.
    pub fn scan(
        &self,
        targets: &[TargetSpec],
        target_config: &SourceConfig,
    ) -> Result<Vec<TargetRecord>, ScanError> {
        let workers = self.config.workers;
        if workers == 0 {
            return Err(ConfigError::ZeroWorkers.into());
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .map_err(|e| ScanError::ThreadPool(e.to_string()))?;

        info!(
            targets = targets.len(),
            workers,
            query_size = self.query.len(),
            "Querying targets"
        );

        // Indexed collect keeps results aligned with `targets` regardless of
        // completion order
        let results: Vec<Result<TargetRecord, SourceError>> = pool.install(|| {
            targets
                .par_iter()
                .map(|spec| self.scan_target(spec, target_config))
                .collect()
        });

        let mut records = Vec::with_capacity(targets.len());
        let mut failures = Vec::new();

        for (index, (spec, result)) in targets.iter().zip(results).enumerate() {
            match result {
                Ok(record) => records.push(record),
                Err(error) => failures.push(TargetFailure {
                    index,
                    id: spec.id.clone(),
                    path: spec.path.clone(),
                    error,
                }),
            }
        }

        if !failures.is_empty() {
            return Err(ScanError::Targets(failures));
        }

        Ok(records)
    }

    /// Load one target's barcodes and count those present in the query set
    ///
    /// # Errors
    ///
    /// Returns the `SourceError` raised while reading the target.
    pub fn scan_target(
        &self,
        spec: &TargetSpec,
        config: &SourceConfig,
    ) -> Result<TargetRecord, SourceError> {
        let start = Instant::now();

        let barcodes = self
            .source
            .open(&spec.path, config)?
            .collect::<Result<FxHashSet<String>, SourceError>>()?;
        let n_matching = self.query.intersection_size(&barcodes);

        debug!(
            target = %spec.id,
            n_barcodes = barcodes.len(),
            n_matching,
            "queried {} in {:.2} s",
            spec.path.display(),
            start.elapsed().as_secs_f64()
        );

        Ok(TargetRecord::from_counts(spec, barcodes.len(), n_matching))
    }
}
