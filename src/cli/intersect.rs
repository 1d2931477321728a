use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use tracing::{debug, info};

use crate::adjacency::{AdjacencyRefiner, RefinerConfig};
use crate::cli::OutputFormat;
use crate::core::{TargetRecord, TargetSpec};
use crate::matching::{apply_threshold, load_query, IntersectionEngine, ScanConfig};
use crate::parsing::edgelist::parse_edge_list_file;
use crate::parsing::{parse_tag, FileSequenceSource, InputFormat, Separator, SourceConfig};
use crate::report::{write_summary, RunStats};

#[derive(Args)]
pub struct IntersectArgs {
    /// Sample barcode file (BAM, FASTQ, or delimited text; optionally gzipped).
    /// Use '-' for a FASTQ or text file on stdin
    #[arg(long, required = true)]
    pub query: PathBuf,

    /// BAM tag holding the sample barcode
    #[arg(long, default_value = "CB", value_parser = parse_tag)]
    pub query_tag: [u8; 2],

    /// Use the read sequence of each BAM record instead of a tag
    #[arg(long, conflicts_with = "query_tag")]
    pub query_use_sequence: bool,

    /// Lines to skip before the header of a delimited query file
    #[arg(long, default_value = "0")]
    pub query_plain_skip: usize,

    /// 0-based column holding the barcode in a delimited query file
    #[arg(long, default_value = "0")]
    pub query_plain_column: usize,

    /// Separator of a delimited query file
    #[arg(long, value_enum, default_value = "tab")]
    pub query_separator: Separator,

    /// Query format (auto-detected from the extension by default)
    #[arg(long, value_enum)]
    pub query_format: Option<InputFormat>,

    /// Puck/tile barcode files, one per target
    #[arg(long, required = true, num_args = 1..)]
    pub target: Vec<PathBuf>,

    /// Target identifiers, in the same order as --target
    #[arg(long, required = true, num_args = 1..)]
    pub target_id: Vec<String>,

    /// BAM tag holding the target barcodes
    #[arg(long, default_value = "CB", value_parser = parse_tag)]
    pub target_tag: [u8; 2],

    /// Use the read sequence of each BAM record instead of a tag
    #[arg(long, conflicts_with = "target_tag")]
    pub target_use_sequence: bool,

    /// Lines to skip before the header of delimited target files
    #[arg(long, default_value = "0")]
    pub target_plain_skip: usize,

    /// 0-based column holding the barcode in delimited target files
    #[arg(long, default_value = "0")]
    pub target_plain_column: usize,

    /// Separator of delimited target files
    #[arg(long, value_enum, default_value = "tab")]
    pub target_separator: Separator,

    /// Target format (auto-detected from the extension by default)
    #[arg(long, value_enum)]
    pub target_format: Option<InputFormat>,

    /// Edge list of physically adjacent targets, used to refine the calls
    #[arg(long)]
    pub target_adjacency_file: Option<PathBuf>,

    /// Where to write the per-target summary CSV
    #[arg(long, required = true)]
    pub summary_output: PathBuf,

    /// A target passes when its matching ratio is strictly above this value
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub min_threshold: f64,

    /// Number of targets processed in parallel
    #[arg(long, default_value = "1")]
    pub n_jobs: usize,

    /// Seed for community detection on the adjacency graph
    #[arg(long, default_value = "0")]
    pub seed: u64,
}

impl IntersectArgs {
    fn query_config(&self) -> SourceConfig {
        SourceConfig {
            format: self.query_format,
            tag: (!self.query_use_sequence).then_some(self.query_tag),
            skip: self.query_plain_skip,
            column: self.query_plain_column,
            separator: self.query_separator,
        }
    }

    fn target_config(&self) -> SourceConfig {
        SourceConfig {
            format: self.target_format,
            tag: (!self.target_use_sequence).then_some(self.target_tag),
            skip: self.target_plain_skip,
            column: self.target_plain_column,
            separator: self.target_separator,
        }
    }
}

/// Execute the intersect command
///
/// The threshold-only summary is always written before adjacency refinement
/// starts, then rewritten with the `pass_adjacency` column when refinement
/// succeeds.
///
/// # Errors
///
/// Returns an error if the arguments are inconsistent, an input cannot be
/// read, adjacency refinement fails, or the summary cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: IntersectArgs, format: OutputFormat) -> anyhow::Result<()> {
    let targets = TargetSpec::zip(args.target.clone(), args.target_id.clone())?;
    let scan_config = ScanConfig::new(args.n_jobs)?;

    let source = FileSequenceSource;
    let query = load_query(&source, &args.query, &args.query_config())?;

    let engine = IntersectionEngine::with_config(&query, &source, scan_config);
    let mut records = engine.scan(&targets, &args.target_config())?;

    apply_threshold(&mut records, args.min_threshold);
    save(&args.summary_output, &records)?;

    if let Some(path) = &args.target_adjacency_file {
        let graph = parse_edge_list_file(path)
            .with_context(|| format!("Failed to read adjacency graph '{}'", path.display()))?;
        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "Loaded adjacency graph"
        );

        let config = RefinerConfig {
            seed: args.seed,
            ..RefinerConfig::default()
        };
        let refinement = AdjacencyRefiner::new(&graph, config).refine(&mut records)?;
        debug!(members = ?refinement.best_community().members, "Best community");

        save(&args.summary_output, &records)?;
    }

    let stats = RunStats::from_records(&records);
    info!(
        total = stats.total,
        passed = stats.passed_threshold,
        mean_matching_ratio = ?stats.mean_matching_ratio,
        passed_adjacency = ?stats.passed_adjacency,
        "Finished intersecting targets"
    );

    match format {
        OutputFormat::Text => print!("{stats}"),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
        OutputFormat::Tsv => {
            println!("{}", RunStats::tsv_header());
            println!("{}", stats.to_tsv_row());
        }
    }

    Ok(())
}

fn save(path: &Path, records: &[TargetRecord]) -> anyhow::Result<()> {
    write_summary(path, records)
        .with_context(|| format!("Failed to write summary '{}'", path.display()))?;
    info!("Wrote summary for {} targets to {}", records.len(), path.display());
    Ok(())
}
