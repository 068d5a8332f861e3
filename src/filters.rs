use crate::record::Record;
use std::collections::BTreeSet;

/// Selector value of the implicit "all" option.
pub const ALL: &str = "";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub years: BTreeSet<String>,
    pub formats: BTreeSet<String>,
    pub search: String,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        !restricts(&self.years) && !restricts(&self.formats) && self.search.is_empty()
    }

    fn passes(&self, record: &Record, needle: &str) -> bool {
        if restricts(&self.years) && !self.years.contains(&record.year_key()) {
            return false;
        }

        if restricts(&self.formats) && !self.formats.contains(&record.format) {
            return false;
        }

        if !needle.is_empty() && !record.matches_search(needle) {
            return false;
        }

        true
    }
}

/// An empty selection, or one containing the "all" option, lets everything through.
fn restricts(selection: &BTreeSet<String>) -> bool {
    !selection.is_empty() && !selection.contains(ALL)
}

/// Indices of the records passing `criteria`, in dataset order.
pub fn apply_filters(records: &[Record], criteria: &FilterCriteria) -> Vec<usize> {
    if criteria.is_empty() {
        return (0..records.len()).collect();
    }

    let needle = criteria.search.to_lowercase();
    records
        .iter()
        .enumerate()
        .filter(|(_, record)| criteria.passes(record, &needle))
        .map(|(idx, _)| idx)
        .collect()
}

/// Values offered by the year and format selectors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    /// Newest first.
    pub years: Vec<String>,
    pub formats: Vec<String>,
}

impl FilterOptions {
    pub fn derive(records: &[Record]) -> Self {
        let years: BTreeSet<i64> = records.iter().map(|r| r.year).collect();
        let formats: BTreeSet<&str> = records.iter().map(|r| r.format.as_str()).collect();

        Self {
            years: years.into_iter().rev().map(|y| y.to_string()).collect(),
            formats: formats.into_iter().map(str::to_string).collect(),
        }
    }
}
