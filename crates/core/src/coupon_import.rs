//! Bulk coupon import: input parsing and per-code outcome reporting.
//!
//! Input is free text with one or more codes per line, separated by commas.
//! Codes are trimmed, blanks dropped, and duplicates removed case-sensitively
//! (first occurrence wins) before anything touches the store.

use std::collections::HashSet;

use serde::Serialize;

/// Split raw import text into unique codes, preserving first-seen order.
pub fn parse_codes(raw: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.lines()
        .flat_map(|line| line.split(','))
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .filter(|code| seen.insert(*code))
        .map(str::to_owned)
        .collect()
}

/// Outcome of one import request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// Number of unique codes after input-side deduplication.
    pub total: usize,
    /// Codes inserted by this request.
    pub created: usize,
    /// Codes that already existed in the store, in input order.
    pub duplicates: Vec<String>,
}

impl ImportReport {
    /// Build a report from the unique input codes and the subset the store
    /// actually inserted.
    pub fn tally(unique_codes: &[String], inserted: &[String]) -> Self {
        let inserted: HashSet<&str> = inserted.iter().map(String::as_str).collect();
        let duplicates: Vec<String> = unique_codes
            .iter()
            .filter(|code| !inserted.contains(code.as_str()))
            .cloned()
            .collect();

        Self {
            total: unique_codes.len(),
            created: unique_codes.len() - duplicates.len(),
            duplicates,
        }
    }
}
