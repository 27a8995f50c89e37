//! Lexicon serialization. One canonical JSON payload is rendered once and
//! wrapped by thin per-format templates, so every artifact carries the same
//! bytes between its header and export statement.

use crate::config::{DATASET_SOURCE_URL, EXPORT_NAME, LEXICON_BASENAME};
use crate::lexicon::Lexicon;
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Output artifacts, in the order they are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    TypeScript,
    Esm,
    CommonJs,
}

impl Format {
    pub const ALL: [Format; 4] = [
        Format::Json,
        Format::TypeScript,
        Format::Esm,
        Format::CommonJs,
    ];

    pub fn extension(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::TypeScript => "ts",
            Format::Esm => "mjs",
            Format::CommonJs => "cjs",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Format::Json => "JSON lexicon",
            Format::TypeScript => "TypeScript module",
            Format::Esm => "ESM module",
            Format::CommonJs => "CommonJS module",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.{}", LEXICON_BASENAME, self.extension())
    }

    /// Wraps an already-rendered payload.
    pub fn render(&self, payload: &str) -> String {
        match self {
            Format::Json => format!("{payload}\n"),
            Format::TypeScript => format!(
                "{}export const {EXPORT_NAME}: Record<string, string> = {payload};\n",
                header()
            ),
            Format::Esm => format!("{}export const {EXPORT_NAME} = {payload};\n", header()),
            Format::CommonJs => format!(
                "{}const {EXPORT_NAME} = {payload};\n\nmodule.exports = {{ {EXPORT_NAME} }};\n",
                header()
            ),
        }
    }
}

fn header() -> String {
    format!(
        "// Auto-generated name lexicon for compromise NLP\n\
         // Source: {DATASET_SOURCE_URL}\n\
         // Do not edit manually - regenerate using name-lexicon\n\n"
    )
}

/// Renders the lexicon as a two-space indented JSON object with keys in
/// ascending order. Non-ASCII characters are written verbatim.
pub fn canonical_json(lexicon: &Lexicon) -> Result<String> {
    let mut buf = Vec::with_capacity(lexicon.len() * 24 + 2);
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"  "));
    lexicon
        .serialize(&mut ser)
        .context("Failed to serialize lexicon")?;
    String::from_utf8(buf).context("Lexicon JSON is not valid UTF-8")
}

/// Creates `output_dir` and writes every format into it. Files written before
/// a failure are left in place.
pub fn write_all(lexicon: &Lexicon, output_dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir).with_context(|| {
        format!("Failed to create output directory: {}", output_dir.display())
    })?;

    let payload = canonical_json(lexicon)?;
    let mut written = Vec::with_capacity(Format::ALL.len());

    for format in Format::ALL {
        let path = output_dir.join(format.file_name());
        fs::write(&path, format.render(&payload))
            .with_context(|| format!("Failed to write {}", path.display()))?;
        debug!(path = ?path, bytes = payload.len(), "Artifact written");
        println!("  Saved {} to {}", format.description(), path.display());
        written.push(path);
    }

    Ok(written)
}
