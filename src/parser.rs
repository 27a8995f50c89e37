use crate::models::{Gender, NameRecord};
use anyhow::{Context, Result};
use bzip2::read::BzDecoder;
use csv::{ByteRecord, ByteRecordsIntoIter, ReaderBuilder, Trim};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

static COUNTRY_FILE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Z]{2})\.csv(\.bz2)?$").unwrap());

/// Returns the alpha-2 country code if `file_name` names a country file
/// (`US.csv` or `US.csv.bz2`).
pub fn country_code_for(file_name: &str) -> Option<&str> {
    COUNTRY_FILE_REGEX
        .captures(file_name)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Streams `first_name,last_name,gender,country` records out of one country
/// file, transparently decompressing `.bz2` files. Fields that are not valid
/// UTF-8 are decoded lossily rather than rejected.
pub struct CountryFileReader {
    records: ByteRecordsIntoIter<Box<dyn Read>>,
}

fn field(record: &ByteRecord, index: usize) -> String {
    record
        .get(index)
        .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
        .unwrap_or_default()
}

impl CountryFileReader {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open country file: {}", path.display()))?;
        let buffered = BufReader::with_capacity(128 * 1024, file);

        let source: Box<dyn Read> = if path.extension().is_some_and(|ext| ext == "bz2") {
            Box::new(BzDecoder::new(buffered))
        } else {
            Box::new(buffered)
        };

        let records = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(source)
            .into_byte_records();

        Ok(Self { records })
    }
}

impl Iterator for CountryFileReader {
    type Item = Result<NameRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(r) => r,
            Err(e) => {
                return Some(Err(
                    anyhow::Error::new(e).context("Malformed country file record")
                ))
            }
        };

        Some(Ok(NameRecord {
            first_name: field(&record, 0),
            last_name: field(&record, 1),
            gender: Gender::from_code(&field(&record, 2)),
        }))
    }
}
