use crate::models::NameTag;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Lower-cased name to tag. Backed by a `BTreeMap` so serialization is
/// ordered and byte-stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Lexicon {
    entries: BTreeMap<String, NameTag>,
}

impl Lexicon {
    /// Merges the two name sets. First names always win: a last name is only
    /// added when its lower-cased key is not already present.
    pub fn build<'a, F, L>(first_names: F, last_names: L) -> Self
    where
        F: IntoIterator<Item = &'a String>,
        L: IntoIterator<Item = &'a String>,
    {
        let mut entries = BTreeMap::new();

        for name in first_names {
            entries.insert(name.to_lowercase(), NameTag::FirstName);
        }

        for name in last_names {
            entries
                .entry(name.to_lowercase())
                .or_insert(NameTag::LastName);
        }

        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<NameTag> {
        self.entries.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count_tagged(&self, tag: NameTag) -> usize {
        self.entries.values().filter(|t| **t == tag).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, NameTag)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }
}
