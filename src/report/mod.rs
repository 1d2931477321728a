//! Summary table output and run statistics.
//!
//! The summary table is the only artifact a run persists. It has one row
//! per target, in input order:
//!
//! | Column | Description |
//! |--------|-------------|
//! | `puck_barcode_file` | Target barcode file |
//! | `n_barcodes` | Distinct barcodes in the target |
//! | `n_matching` | Target barcodes present in the query |
//! | `matching_ratio` | `n_matching / n_barcodes` |
//! | `puck_barcode_file_id` | Target id |
//! | `pass_threshold` | `1` if the ratio exceeds the cutoff, else `0` |
//! | `pass_adjacency` | Only after adjacency refinement; `1` if accepted |
//!
//! Tables are written atomically: a failed write never leaves a truncated
//! file at the destination.

pub mod stats;
pub mod summary;

pub use stats::RunStats;
pub use summary::{read_summary, write_summary, write_summary_to, ReportError};
