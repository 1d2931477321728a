//! Target scanning and threshold classification.
//!
//! This module provides the core matching functionality:
//!
//! - [`IntersectionEngine`]: Scans every target against the shared query set
//!   on a bounded worker pool
//! - [`apply_threshold`]: Marks targets whose matching ratio exceeds a cutoff
//!
//! ## Matching
//!
//! Matching is exact set membership. For each target:
//!
//! - `n_barcodes` is the number of distinct barcodes in the target
//! - `n_matching` is the size of its intersection with the query set
//! - `matching_ratio = n_matching / n_barcodes` (0 for an empty target)
//!
//! ## Example
//!
//! ```rust,no_run
//! use puck_matcher::core::{QuerySet, TargetSpec};
//! use puck_matcher::matching::{apply_threshold, IntersectionEngine, ScanConfig};
//! use puck_matcher::parsing::{FileSequenceSource, SourceConfig};
//! use std::path::Path;
//!
//! let source = FileSequenceSource;
//! let config = SourceConfig::default();
//! let query = QuerySet::from_source(&source, Path::new("sample.bam"), &config).unwrap();
//!
//! let targets = vec![TargetSpec::new("tile_1.txt", "tile_1")];
//! let engine = IntersectionEngine::with_config(&query, &source, ScanConfig { workers: 4 });
//! let mut records = engine.scan(&targets, &config).unwrap();
//! apply_threshold(&mut records, 0.1);
//! ```

pub mod engine;
pub mod threshold;

pub use engine::{load_query, IntersectionEngine, ScanConfig, ScanError, TargetFailure};
pub use threshold::{apply_threshold, passes_threshold};
