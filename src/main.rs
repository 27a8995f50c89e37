use anyhow::Result;
use clap::Parser;
use name_lexicon::cache::{self, DatasetCache};
use name_lexicon::config::{DEFAULT_DATASET_DIR, DEFAULT_OUTPUT_DIR, DEFAULT_TOP_N};
use name_lexicon::extract::{self, validate_top_n};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "name-lexicon")]
#[command(about = "Extract names from a name-frequency dataset into a compromise NLP lexicon")]
#[command(after_help = "Examples:\n  \
    name-lexicon --top-n 500 --output output\n  \
    name-lexicon -n 1000 -o ./lexicon -d ./name-dataset --cache ./rankings.bin")]
struct Cli {
    /// Number of top names per country and category
    #[arg(short = 'n', long, default_value_t = DEFAULT_TOP_N, allow_negative_numbers = true)]
    top_n: i64,

    /// Output directory for generated files
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    output: PathBuf,

    /// Directory holding per-country dataset files (US.csv, DE.csv.bz2, ...)
    #[arg(short, long, default_value = DEFAULT_DATASET_DIR)]
    dataset: PathBuf,

    /// Reuse ranked country tables from this file, rebuilding it when the
    /// country files' names, sizes or modification times change. Must lie
    /// outside the output directory. Off unless given
    #[arg(long, value_name = "PATH")]
    cache: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn run(cli: Cli, top_n: usize) -> Result<()> {
    let start = Instant::now();

    let cache = match &cli.cache {
        Some(path) => {
            cache::ensure_outside_output(path, &cli.output)?;
            Some(DatasetCache::new(path))
        }
        None => None,
    };

    let dataset = extract::load_dataset(&cli.dataset, cache.as_ref())?;
    info!(
        duration_secs = start.elapsed().as_secs_f64(),
        "Dataset ready"
    );

    let report = extract::run_extraction(&dataset, top_n, &cli.output)?;

    println!();
    println!("{}", report.stats);
    info!(
        duration_secs = start.elapsed().as_secs_f64(),
        files = report.written.len(),
        "Extraction complete"
    );

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    let top_n = match validate_top_n(cli.top_n) {
        Ok(n) => n,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(cli, top_n) {
        Ok(()) => {
            info!("Completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Error: {:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
