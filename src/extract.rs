use crate::aggregate::{extract_first_names, extract_last_names};
use crate::cache::DatasetCache;
use crate::dataset::{FrequencyDataset, NameDataset};
use crate::emit;
use crate::lexicon::Lexicon;
use crate::stats::ExtractionStats;
use anyhow::{bail, Result};
use indicatif::HumanCount;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Result of a completed run.
pub struct ExtractionReport {
    pub lexicon: Lexicon,
    pub stats: ExtractionStats,
    pub written: Vec<PathBuf>,
}

/// Rejects non-positive extraction sizes before any work starts.
pub fn validate_top_n(top_n: i64) -> Result<usize> {
    if top_n <= 0 {
        bail!("--top-n must be a positive integer");
    }
    Ok(usize::try_from(top_n)?)
}

/// Loads the dataset, reusing `cache` when it matches the current country
/// files. Without a cache every run reads the source files. Cache write
/// failures are only logged.
pub fn load_dataset(dataset_dir: &Path, cache: Option<&DatasetCache>) -> Result<FrequencyDataset> {
    println!("Loading name dataset from {} ...", dataset_dir.display());

    let dataset = match cache {
        None => FrequencyDataset::load(dataset_dir)?,
        Some(cache) => match cache.load(dataset_dir)? {
            Some(ds) => ds,
            None => {
                let ds = FrequencyDataset::load(dataset_dir)?;
                if let Err(e) = cache.store(&ds, dataset_dir) {
                    warn!(error = %e, path = ?cache.path(), "Could not write ranking cache");
                }
                ds
            }
        },
    };

    println!("Dataset loaded.");
    Ok(dataset)
}

/// Aggregates names from every country, builds the lexicon and writes all
/// artifacts into `output_dir`.
pub fn run_extraction<D: NameDataset + ?Sized>(
    dataset: &D,
    top_n: usize,
    output_dir: &Path,
) -> Result<ExtractionReport> {
    let country_codes = dataset.country_codes();
    println!("Processing {} countries...", country_codes.len());

    println!("\nExtracting first names...");
    let (first_names, first_lookups) = extract_first_names(dataset, &country_codes, top_n);
    println!("  Found {} unique first names", HumanCount(first_names.len() as u64));

    println!("\nExtracting last names...");
    let (last_names, last_lookups) = extract_last_names(dataset, &country_codes, top_n);
    println!("  Found {} unique last names", HumanCount(last_names.len() as u64));

    println!("\nBuilding lexicon...");
    let lexicon = Lexicon::build(&first_names, &last_names);
    println!("  Created lexicon with {} entries", HumanCount(lexicon.len() as u64));

    println!("\nGenerating output files...");
    let written = emit::write_all(&lexicon, output_dir)?;

    let stats = ExtractionStats::collect(
        &first_names,
        &last_names,
        &lexicon,
        country_codes.len(),
        top_n,
        first_lookups + last_lookups,
    );

    Ok(ExtractionReport {
        lexicon,
        stats,
        written,
    })
}
