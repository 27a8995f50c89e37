//! name-lexicon: name-frequency dataset to NLP lexicon extraction
//!
//! This crate turns a per-country name-frequency dataset into a lexicon of
//! first and last names for the compromise NLP tagger. A run is a single,
//! sequential batch pipeline:
//!
//! 1. **Load** -- Read every country file of the dataset into memory and rank
//!    names by frequency (or reuse the ranking cache)
//! 2. **Aggregate** -- For each country take the top N male and female first
//!    names and the top N last names, unioned into two global sets. A failed
//!    lookup is logged and skipped
//! 3. **Build** -- Merge both sets into one map from lower-cased name to
//!    `FirstName` / `LastName`; first names win on collision
//! 4. **Emit** -- Write the map as JSON plus TypeScript, ESM and CommonJS
//!    modules sharing a byte-identical payload, then print a summary
//!
//! # Dataset layout
//!
//! The dataset directory holds one file per country, `<CC>.csv` or
//! `<CC>.csv.bz2`, with header-less `first_name,last_name,gender,country`
//! records.
//!
//! # Key Modules
//!
//! - [`dataset`] -- `NameDataset` trait and the in-memory `FrequencyDataset`
//! - [`parser`] -- Country file reader with BZ2 decompression
//! - [`cache`] -- Ranked dataset persistence with staleness checks
//! - [`aggregate`] -- Per-country first/last name aggregation
//! - [`lexicon`] -- Set merge with first-name priority
//! - [`emit`] -- Canonical JSON plus module wrappers
//! - [`stats`] -- Run summary
//! - [`extract`] -- Pipeline orchestration
//! - [`models`] -- Core data types (Gender, NameTag, NameRecord)
//! - [`config`] -- Defaults and constants
//!
//! # Example Usage
//!
//! ```bash
//! name-lexicon --dataset data/ --top-n 500 --output output
//! name-lexicon -n 1000 -o ./lexicon --cache ./rankings.bin
//! ```

pub mod aggregate;
pub mod cache;
pub mod config;
pub mod dataset;
pub mod emit;
pub mod extract;
pub mod lexicon;
pub mod models;
pub mod parser;
pub mod stats;
