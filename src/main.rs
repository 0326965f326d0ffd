use std::collections::HashSet;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use geoshrink::{ReductionPolicy, SizeReport, WriteOptions, parse_geojson, reduce, serialize};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "geoshrink")]
#[command(about = "Shrink GeoJSON by dropping attributes and rounding coordinates", long_about = None)]
struct Cli {
    /// Input file (use - for stdin)
    #[arg(default_value = "-")]
    input: PathBuf,

    /// Output file (use - for stdout)
    #[arg(short, long, default_value = "-")]
    output: PathBuf,

    /// Precision for coordinates (decimal places)
    #[arg(short, long, default_value = "6", env = "GEOSHRINK_PRECISION", allow_negative_numbers = true)]
    precision: i32,

    /// Attribute key to keep (repeatable, or comma-separated)
    #[arg(short, long = "keep", value_name = "KEY", value_delimiter = ',')]
    keep: Vec<String>,

    /// Keep every attribute
    #[arg(long, conflicts_with = "keep")]
    keep_all: bool,

    /// Maximum components per position (2 drops elevation)
    #[arg(long, default_value = "3", env = "GEOSHRINK_DIMENSIONS")]
    dimensions: usize,

    /// List attribute keys with their feature counts, then exit
    #[arg(long)]
    list_keys: bool,

    /// Indent the output
    #[arg(long)]
    pretty: bool,

    /// Print size comparison
    #[arg(short, long)]
    stats: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    // Read input
    let input = if cli.input.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        buf
    } else {
        fs::read_to_string(&cli.input)
            .with_context(|| format!("Failed to read {}", cli.input.display()))?
    };

    let collection = parse_geojson(&input).context("Failed to parse input")?;

    if cli.list_keys {
        let mut stdout = io::stdout().lock();
        for (key, count) in collection.attribute_keys() {
            writeln!(stdout, "{}\t{}", key, count)?;
        }
        return Ok(());
    }

    // Build policy
    let allowed_keys: HashSet<String> = if cli.keep_all {
        collection.attribute_keys().into_iter().map(|(k, _)| k).collect()
    } else {
        cli.keep.into_iter().collect()
    };
    let policy = ReductionPolicy {
        precision: cli.precision,
        allowed_keys,
        dimensions: cli.dimensions,
    };
    tracing::debug!(?policy, "built reduction policy");

    // Reduce
    let reduced = reduce(&collection, &policy)?;
    let output = serialize(&reduced, &WriteOptions { pretty: cli.pretty })?;

    // Write output
    if cli.output.as_os_str() == "-" {
        io::stdout().write_all(output.as_bytes())?;
    } else {
        fs::write(&cli.output, &output)
            .with_context(|| format!("Failed to write {}", cli.output.display()))?;
    }

    // Print stats if requested
    if cli.stats {
        eprintln!("{}", SizeReport::new(input.len(), output.len()));
    }

    Ok(())
}

fn setup_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .init();
}
