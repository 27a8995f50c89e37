use crate::aggregate::LookupCounts;
use crate::lexicon::Lexicon;
use crate::models::NameTag;
use indicatif::HumanCount;
use rustc_hash::FxHashSet;
use std::fmt;

/// Summary of one extraction run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionStats {
    pub countries: usize,
    pub top_n: usize,
    pub first_names: usize,
    pub last_names: usize,
    pub ambiguous: usize,
    pub lexicon_entries: usize,
    pub tagged_first: usize,
    pub tagged_last: usize,
    pub lookups: LookupCounts,
}

impl ExtractionStats {
    pub fn collect(
        first_names: &FxHashSet<String>,
        last_names: &FxHashSet<String>,
        lexicon: &Lexicon,
        countries: usize,
        top_n: usize,
        lookups: LookupCounts,
    ) -> Self {
        Self {
            countries,
            top_n,
            first_names: first_names.len(),
            last_names: last_names.len(),
            ambiguous: first_names.intersection(last_names).count(),
            lexicon_entries: lexicon.len(),
            tagged_first: lexicon.count_tagged(NameTag::FirstName),
            tagged_last: lexicon.count_tagged(NameTag::LastName),
            lookups,
        }
    }
}

impl fmt::Display for ExtractionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(50);
        writeln!(f, "{rule}")?;
        writeln!(f, "EXTRACTION SUMMARY")?;
        writeln!(f, "{rule}")?;
        writeln!(f, "Parameters:")?;
        writeln!(f, "  - Countries processed: {}", self.countries)?;
        writeln!(f, "  - Top N per country: {}", self.top_n)?;
        writeln!(
            f,
            "  - Failed lookups: {} of {}",
            HumanCount(self.lookups.failed),
            HumanCount(self.lookups.total())
        )?;
        writeln!(f)?;
        writeln!(f, "Extracted names:")?;
        writeln!(f, "  - Unique first names: {}", HumanCount(self.first_names as u64))?;
        writeln!(f, "  - Unique last names: {}", HumanCount(self.last_names as u64))?;
        writeln!(f, "  - Ambiguous (both): {}", HumanCount(self.ambiguous as u64))?;
        writeln!(f)?;
        writeln!(f, "Final lexicon:")?;
        writeln!(f, "  - Total entries: {}", HumanCount(self.lexicon_entries as u64))?;
        writeln!(f, "  - Tagged as FirstName: {}", HumanCount(self.tagged_first as u64))?;
        writeln!(f, "  - Tagged as LastName: {}", HumanCount(self.tagged_last as u64))?;
        write!(f, "{rule}")
    }
}
