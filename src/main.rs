use clap::Parser;
use tracing_subscriber::EnvFilter;

use puck_matcher::cli;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("puck_matcher=debug,info")
    } else {
        EnvFilter::new("puck_matcher=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        cli::Commands::Intersect(args) => {
            cli::intersect::run(args, cli.format)?;
        }
        cli::Commands::CoordinateSystem(args) => {
            cli::coordinates::run(args)?;
        }
    }

    Ok(())
}
