//! Opt-in store for ranked dataset tables. Nothing is cached unless the user
//! passes `--cache <path>`, and that path may not sit inside the output
//! directory, so a default run leaves only the lexicon artifacts behind.

use crate::config::CACHE_VERSION;
use crate::dataset::{self, CountryRanking, FrequencyDataset};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{self, Path, PathBuf};
use std::time::SystemTime;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Identity of one country file. Modification times keep full precision so
/// rewrites within the same second still invalidate the cache.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FileStamp {
    pub name: String,
    pub size: u64,
    pub modified_nanos: u128,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
struct CacheHeader {
    version: u32,
    dataset_dir: PathBuf,
    files: Vec<FileStamp>,
}

#[derive(Deserialize)]
struct StoredRankings {
    header: CacheHeader,
    countries: BTreeMap<String, CountryRanking>,
}

#[derive(Serialize)]
struct RankingsRef<'a> {
    header: CacheHeader,
    countries: &'a BTreeMap<String, CountryRanking>,
}

/// Stamps every country file in the dataset directory, in file-name order.
pub fn fingerprint(dataset_dir: &Path) -> Result<Vec<FileStamp>> {
    let mut stamps = Vec::new();
    for file in dataset::country_files(dataset_dir)? {
        let metadata = fs::metadata(&file.path)
            .with_context(|| format!("Cannot stat country file {}", file.path.display()))?;
        let modified_nanos = metadata
            .modified()
            .ok()
            .and_then(|t| t.duration_since(SystemTime::UNIX_EPOCH).ok())
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        stamps.push(FileStamp {
            name: file
                .path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            size: metadata.len(),
            modified_nanos,
        });
    }
    Ok(stamps)
}

/// Rejects a cache location inside `output_dir`; the output directory only
/// ever holds the generated lexicon files.
pub fn ensure_outside_output(cache_path: &Path, output_dir: &Path) -> Result<()> {
    let cache_abs = path::absolute(cache_path)
        .with_context(|| format!("Invalid cache path: {}", cache_path.display()))?;
    let output_abs = path::absolute(output_dir)
        .with_context(|| format!("Invalid output directory: {}", output_dir.display()))?;
    if cache_abs.starts_with(&output_abs) {
        bail!(
            "--cache must not point inside the output directory ({})",
            output_dir.display()
        );
    }
    Ok(())
}

pub struct DatasetCache {
    path: PathBuf,
}

impl DatasetCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the cached rankings when they were built from exactly the
    /// current country files of `dataset_dir`; `Ok(None)` otherwise.
    pub fn load(&self, dataset_dir: &Path) -> Result<Option<FrequencyDataset>> {
        let bytes = match fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = ?self.path, "No ranking cache yet");
                return Ok(None);
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Cannot read ranking cache {}", self.path.display()))
            }
        };

        let stored: StoredRankings = match bincode::deserialize(&bytes) {
            Ok(s) => s,
            Err(e) => {
                info!(path = ?self.path, error = %e, "Ignoring unreadable ranking cache");
                return Ok(None);
            }
        };

        if let Some(reason) = stale_reason(&stored.header, dataset_dir)? {
            info!(path = ?self.path, reason, "Ignoring stale ranking cache");
            return Ok(None);
        }

        info!(
            countries = stored.countries.len(),
            path = ?self.path,
            "Reusing cached country rankings"
        );
        Ok(Some(FrequencyDataset::from_rankings(stored.countries)))
    }

    /// Writes the rankings next to the final location and swaps them in, so
    /// an interrupted run never leaves a truncated cache.
    pub fn store(&self, dataset: &FrequencyDataset, dataset_dir: &Path) -> Result<()> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create cache directory {}", parent.display()))?;

        let record = RankingsRef {
            header: CacheHeader {
                version: CACHE_VERSION,
                dataset_dir: dataset_dir.to_path_buf(),
                files: fingerprint(dataset_dir)?,
            },
            countries: dataset.rankings(),
        };

        let staged = NamedTempFile::new_in(parent)
            .with_context(|| format!("Cannot stage ranking cache in {}", parent.display()))?;
        {
            let mut writer = BufWriter::new(staged.as_file());
            bincode::serialize_into(&mut writer, &record)
                .context("Cannot encode country rankings")?;
            writer.flush().context("Cannot flush ranking cache")?;
        }
        staged
            .persist(&self.path)
            .with_context(|| format!("Cannot move ranking cache into {}", self.path.display()))?;

        info!(
            countries = record.countries.len(),
            path = ?self.path,
            "Country rankings cached"
        );
        Ok(())
    }
}

fn stale_reason(header: &CacheHeader, dataset_dir: &Path) -> Result<Option<&'static str>> {
    if header.version != CACHE_VERSION {
        return Ok(Some("format version changed"));
    }
    if header.dataset_dir != dataset_dir {
        return Ok(Some("built from another dataset directory"));
    }
    if header.files != fingerprint(dataset_dir)? {
        return Ok(Some("country files changed"));
    }
    Ok(None)
}
