use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::info;

use crate::flowcell::{coordinate_system, write_coordinates, FlowcellLayout, NameTemplate};

#[derive(Args)]
pub struct CoordinateArgs {
    /// Where to write the puck names and global (x, y, z) coordinates
    #[arg(long, required = true)]
    pub output: PathBuf,

    /// Puck name format. Fields: {lane}, {column}, {row}, {side_letter}, {side_number};
    /// integer fields accept a width such as {row:02d}.
    /// This name must be used, as is, when creating a new sample.
    #[arg(
        long,
        default_value = "L{lane}{side_letter}_tile_{side_number}{column}{row:02d}"
    )]
    pub format_string: String,

    /// Offset between columns along the x axis
    #[arg(long, default_value = "33809", allow_hyphen_values = true)]
    pub x_offset: i64,

    /// Offset between rows along the y axis
    #[arg(long, default_value = "36342", allow_hyphen_values = true)]
    pub y_offset: i64,

    /// Swath offset for odd columns
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub swath_offset_odd: i64,

    /// Swath offset for even columns
    #[arg(long, default_value = "6201", allow_hyphen_values = true)]
    pub swath_offset_even: i64,

    /// Number of rows
    #[arg(long, default_value = "78")]
    pub rows: u32,

    /// Number of columns
    #[arg(long, default_value = "6")]
    pub columns: u32,

    /// Number of lanes
    #[arg(long, default_value = "4")]
    pub n_lanes: u32,

    /// Start row and column indices at 0 instead of 1
    #[arg(long)]
    pub zero_coded: bool,
}

/// Execute the coordinate-system command
///
/// # Errors
///
/// Returns an error if the name template is invalid or the output cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: CoordinateArgs) -> anyhow::Result<()> {
    let template = NameTemplate::parse(&args.format_string)
        .with_context(|| format!("Invalid --format-string '{}'", args.format_string))?;

    let layout = FlowcellLayout {
        n_lanes: args.n_lanes,
        columns: args.columns,
        rows: args.rows,
        x_offset: args.x_offset,
        y_offset: args.y_offset,
        swath_offset_odd: args.swath_offset_odd,
        swath_offset_even: args.swath_offset_even,
        zero_coded: args.zero_coded,
    };

    let pucks = coordinate_system(&layout, &template);
    write_coordinates(&args.output, &pucks)
        .with_context(|| format!("Failed to write '{}'", args.output.display()))?;

    info!(pucks = pucks.len(), output = %args.output.display(), "Wrote coordinate system");
    Ok(())
}
