//! Command-line interface for puck-matcher.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **intersect**: Count the sample's barcodes found in each puck/tile and
//!   optionally refine the calls using tile adjacency
//! - **coordinate-system**: Write the global tile coordinates of a flow cell
//!
//! ## Usage
//!
//! ```text
//! # Match a sample against two tiles
//! puck-matcher intersect \
//!     --query sample.bam --query-tag CB \
//!     --target tile_1.txt tile_2.txt --target-id tile_1 tile_2 \
//!     --min-threshold 0.1 --n-jobs 4 \
//!     --summary-output summary.csv
//!
//! # Refine with the physical adjacency of the tiles
//! puck-matcher intersect ... --target-adjacency-file tiles.edgelist
//!
//! # NovaSeq S4 coordinate system
//! puck-matcher coordinate-system --output novaseq_S4_coordinate_system.csv
//! ```

use clap::{Parser, Subcommand};

pub mod coordinates;
pub mod intersect;

#[derive(Parser)]
#[command(name = "puck-matcher")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Match a sample's spatial barcodes against puck/tile barcode sets")]
#[command(
    long_about = "puck-matcher finds which pucks or flow cell tiles a spatial sample was captured on.\n\nIt intersects the sample's barcodes with each candidate's barcode set and provides:\n- Per-target matching counts and ratios\n- A pass/fail call against a matching-ratio cutoff\n- Optional refinement of the calls using the physical adjacency of tiles"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format for run statistics
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Intersect a query barcode file with target puck/tile barcode files
    Intersect(intersect::IntersectArgs),

    /// Write the global coordinate system of a NovaSeq S4 flow cell
    CoordinateSystem(coordinates::CoordinateArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}
