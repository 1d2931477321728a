//! # puck-matcher
//!
//! A library for finding which spatial pucks or flow cell tiles a sample was
//! captured on.
//!
//! Spatial transcriptomics sequencing barcodes each read with the position it
//! was captured at. Every puck (or flow cell tile) has a known barcode set, so
//! the pucks used by a sample are those whose barcodes show up in the sample.
//!
//! `puck-matcher` intersects the sample's barcodes with every candidate's
//! barcode set, calls the candidates whose matching ratio clears a cutoff, and
//! can refine those calls using which tiles are physically adjacent.
//!
//! ## Features
//!
//! - **Parallel scan**: Candidates are scanned on a worker pool against one shared query set
//! - **Several inputs**: BAM (tag or read sequence), FASTQ and delimited text, optionally gzipped
//! - **Adjacency refinement**: Keeps the strongest community of adjacent passing tiles
//! - **Flow cell layout**: Generates the global coordinates of NovaSeq S4 tiles
//!
//! ## Example
//!
//! ```rust,no_run
//! use puck_matcher::{FileSequenceSource, IntersectionEngine, QuerySet, SourceConfig, TargetSpec};
//! use puck_matcher::matching::apply_threshold;
//! use std::path::Path;
//!
//! let source = FileSequenceSource;
//! let query = QuerySet::from_source(&source, Path::new("sample.bam"), &SourceConfig::default()).unwrap();
//!
//! let targets = vec![
//!     TargetSpec::new("tile_1.txt", "tile_1"),
//!     TargetSpec::new("tile_2.txt", "tile_2"),
//! ];
//! let engine = IntersectionEngine::new(&query, &source);
//! let mut records = engine.scan(&targets, &SourceConfig::default()).unwrap();
//! apply_threshold(&mut records, 0.1);
//!
//! for r in &records {
//!     println!("{}: {}/{} ({:.3})", r.id, r.n_matching, r.n_barcodes, r.matching_ratio);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Query set and per-target records
//! - [`parsing`]: Barcode sources (BAM, FASTQ, delimited) and edge lists
//! - [`matching`]: Parallel intersection engine and threshold rule
//! - [`adjacency`]: Adjacency graph, community detection and refinement
//! - [`report`]: Summary table and run statistics
//! - [`flowcell`]: Flow cell coordinate system
//! - [`cli`]: Command-line interface implementation

pub mod adjacency;
pub mod cli;
pub mod core;
pub mod flowcell;
pub mod matching;
pub mod parsing;
pub mod report;
pub mod utils;

// Re-export commonly used types for convenience
pub use adjacency::{AdjacencyGraph, AdjacencyRefiner, RefinerConfig};
pub use core::{QuerySet, TargetRecord, TargetSpec};
pub use matching::{IntersectionEngine, ScanConfig};
pub use parsing::{FileSequenceSource, SequenceSource, SourceConfig};
