//! Core data types for barcode set matching.
//!
//! This module provides the fundamental types used throughout the library:
//!
//! - [`QuerySet`]: The deduplicated barcodes observed in the sample being evaluated
//! - [`TargetSpec`]: One candidate puck/tile, identified by its barcode file and id
//! - [`TargetRecord`]: The per-target row of the summary table
//!
//! ## Ordering
//!
//! Targets are always kept in the order of the input target-id list. Every
//! stage (scanning, thresholding, adjacency refinement, reporting) relies on
//! `target_id[i]` describing `target[i]`, so nothing in this crate reorders a
//! target slice.

pub mod query;
pub mod target;

pub use query::QuerySet;
pub use target::{ConfigError, TargetRecord, TargetSpec};
