use crate::config::PROGRESS_INTERVAL;
use crate::models::Gender;
use crate::parser::{self, CountryFileReader};
use anyhow::{bail, Context, Result};
use indicatif::ProgressBar;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Which ranked list a lookup targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameCategory {
    FirstName(Gender),
    LastName,
}

impl fmt::Display for NameCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameCategory::FirstName(gender) => write!(f, "{gender} first"),
            NameCategory::LastName => f.write_str("last"),
        }
    }
}

/// Failure of a single country/category lookup. These are recoverable: the
/// aggregator logs them and moves on to the next unit.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("country {country} is not in the dataset")]
    UnknownCountry { country: String },

    #[error("no {category} names for {country}")]
    NoNames {
        country: String,
        category: NameCategory,
    },
}

/// Source of ranked name-frequency data.
pub trait NameDataset {
    /// Alpha-2 codes of every country the dataset covers, ascending.
    fn country_codes(&self) -> Vec<String>;

    /// The `n` most frequent first names for a country and gender.
    fn top_first_names(
        &self,
        country: &str,
        gender: Gender,
        n: usize,
    ) -> Result<Vec<String>, LookupError>;

    /// The `n` most frequent last names for a country.
    fn top_last_names(&self, country: &str, n: usize) -> Result<Vec<String>, LookupError>;
}

/// Names of one country, each list ordered most frequent first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryRanking {
    pub male: Vec<String>,
    pub female: Vec<String>,
    pub last: Vec<String>,
}

/// A country file found in the dataset directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryFile {
    pub code: String,
    pub path: PathBuf,
}

/// Lists the country files in `dir`, sorted by file name.
pub fn country_files(dir: &Path) -> Result<Vec<CountryFile>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read dataset directory: {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry
            .with_context(|| format!("Failed to read dataset directory: {}", dir.display()))?;
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        if let Some(code) = parser::country_code_for(name) {
            files.push(CountryFile {
                code: code.to_string(),
                path: entry.path(),
            });
        }
    }

    if files.is_empty() {
        bail!("No country files found in dataset directory: {}", dir.display());
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}

/// In-memory dataset built from raw per-country files. Rankings are
/// computed once at load time so lookups are slices.
#[derive(Debug, Default)]
pub struct FrequencyDataset {
    countries: BTreeMap<String, CountryRanking>,
}

#[derive(Default)]
struct CountryCounts {
    male: FxHashMap<String, u64>,
    female: FxHashMap<String, u64>,
    last: FxHashMap<String, u64>,
}

impl CountryCounts {
    fn into_ranking(self) -> CountryRanking {
        CountryRanking {
            male: rank(self.male),
            female: rank(self.female),
            last: rank(self.last),
        }
    }
}

/// Orders by count descending, ties by name ascending.
fn rank(counts: FxHashMap<String, u64>) -> Vec<String> {
    let mut entries: Vec<(String, u64)> = counts.into_iter().collect();
    entries.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries.into_iter().map(|(name, _)| name).collect()
}

impl FrequencyDataset {
    pub fn load(dir: &Path) -> Result<Self> {
        let files = country_files(dir)?;
        info!(files = files.len(), "Loading dataset from: {}", dir.display());

        let pb = ProgressBar::new_spinner();
        let mut counts: BTreeMap<String, CountryCounts> = BTreeMap::new();
        let mut records_read = 0u64;

        for file in &files {
            pb.set_message(file.code.clone());
            let country = counts.entry(file.code.clone()).or_default();
            let reader = CountryFileReader::open(&file.path)?;

            for record in reader {
                let record = record
                    .with_context(|| format!("Failed to parse {}", file.path.display()))?;

                if !record.first_name.is_empty() {
                    let bucket = match record.gender {
                        Some(Gender::Male) => Some(&mut country.male),
                        Some(Gender::Female) => Some(&mut country.female),
                        None => None,
                    };
                    if let Some(bucket) = bucket {
                        *bucket.entry(record.first_name).or_insert(0) += 1;
                    }
                }
                if !record.last_name.is_empty() {
                    *country.last.entry(record.last_name).or_insert(0) += 1;
                }

                records_read += 1;
                if records_read % PROGRESS_INTERVAL == 0 {
                    pb.tick();
                }
            }
            debug!(country = %file.code, path = ?file.path, "Country file loaded");
        }

        pb.finish_and_clear();

        let countries: BTreeMap<String, CountryRanking> = counts
            .into_iter()
            .map(|(code, c)| (code, c.into_ranking()))
            .collect();

        info!(
            countries = countries.len(),
            records = records_read,
            "Dataset loaded successfully"
        );

        Ok(Self { countries })
    }

    pub fn from_rankings(countries: BTreeMap<String, CountryRanking>) -> Self {
        Self { countries }
    }

    pub fn rankings(&self) -> &BTreeMap<String, CountryRanking> {
        &self.countries
    }

    fn country(&self, country: &str) -> Result<&CountryRanking, LookupError> {
        self.countries
            .get(country)
            .ok_or_else(|| LookupError::UnknownCountry {
                country: country.to_string(),
            })
    }
}

fn take_top(
    names: &[String],
    n: usize,
    country: &str,
    category: NameCategory,
) -> Result<Vec<String>, LookupError> {
    if names.is_empty() {
        return Err(LookupError::NoNames {
            country: country.to_string(),
            category,
        });
    }
    Ok(names.iter().take(n).cloned().collect())
}

impl NameDataset for FrequencyDataset {
    fn country_codes(&self) -> Vec<String> {
        self.countries.keys().cloned().collect()
    }

    fn top_first_names(
        &self,
        country: &str,
        gender: Gender,
        n: usize,
    ) -> Result<Vec<String>, LookupError> {
        let ranking = self.country(country)?;
        let names = match gender {
            Gender::Male => &ranking.male,
            Gender::Female => &ranking.female,
        };
        take_top(names, n, country, NameCategory::FirstName(gender))
    }

    fn top_last_names(&self, country: &str, n: usize) -> Result<Vec<String>, LookupError> {
        let ranking = self.country(country)?;
        take_top(&ranking.last, n, country, NameCategory::LastName)
    }
}
