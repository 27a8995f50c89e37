use crate::dataset::{LookupError, NameDataset};
use crate::models::Gender;
use rustc_hash::FxHashSet;
use tracing::{debug, warn};

/// Lookup outcomes, reported in the summary.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LookupCounts {
    pub succeeded: u64,
    pub failed: u64,
}

impl LookupCounts {
    fn record<T>(&mut self, result: &Result<T, LookupError>) {
        match result {
            Ok(_) => self.succeeded += 1,
            Err(_) => self.failed += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.succeeded + self.failed
    }
}

impl std::ops::Add for LookupCounts {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            succeeded: self.succeeded + other.succeeded,
            failed: self.failed + other.failed,
        }
    }
}

/// Unions the top `top_n` male and female first names of every country.
/// A failed lookup is logged and skipped.
pub fn extract_first_names<D: NameDataset + ?Sized>(
    dataset: &D,
    country_codes: &[String],
    top_n: usize,
) -> (FxHashSet<String>, LookupCounts) {
    let mut first_names = FxHashSet::default();
    let mut counts = LookupCounts::default();

    for country in country_codes {
        for gender in Gender::ALL {
            let result = dataset.top_first_names(country, gender, top_n);
            counts.record(&result);
            match result {
                Ok(names) => {
                    debug!(country = %country, %gender, names = names.len(), "First names fetched");
                    first_names.extend(names);
                }
                Err(e) => {
                    warn!(country = %country, %gender, error = %e, "Could not get first names");
                }
            }
        }
    }

    (first_names, counts)
}

/// Unions the top `top_n` last names of every country.
/// A failed lookup is logged and skipped.
pub fn extract_last_names<D: NameDataset + ?Sized>(
    dataset: &D,
    country_codes: &[String],
    top_n: usize,
) -> (FxHashSet<String>, LookupCounts) {
    let mut last_names = FxHashSet::default();
    let mut counts = LookupCounts::default();

    for country in country_codes {
        let result = dataset.top_last_names(country, top_n);
        counts.record(&result);
        match result {
            Ok(names) => {
                debug!(country = %country, names = names.len(), "Last names fetched");
                last_names.extend(names);
            }
            Err(e) => {
                warn!(country = %country, error = %e, "Could not get last names");
            }
        }
    }

    (last_names, counts)
}
