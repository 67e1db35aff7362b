//! Baseline filtering of search candidates
//!
//! Product titles encode the processing baseline as a two-character token:
//! `..._BA01A.ZIP` carries baseline `BA`, version `01`, revision `A`. A
//! candidate is retained iff the extracted token equals the configured
//! baseline exactly. Titles that do not match the pattern at all carry no
//! baseline and are dropped silently; that includes orbit-data products,
//! whose filenames never end in the versioned `.ZIP` suffix.

use crate::catalog::Baseline;
use crate::search::CandidateProduct;
use once_cell::sync::Lazy;
use regex::Regex;

/// Underscore, two-character baseline, four-digit version, optional
/// revision letter, literal `.ZIP` (case-sensitive extension)
static BASELINE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"_(\w{2})\d{4}[A-Z]?\.ZIP").expect("baseline pattern is valid"));

/// Extract the two-character baseline token from a product title
pub fn extract_baseline(title: &str) -> Option<&str> {
    BASELINE_PATTERN
        .captures(title)
        .and_then(|captures| captures.get(1))
        .map(|token| token.as_str())
}

/// Retain only candidates whose title carries the configured baseline
pub fn retain_baseline(candidates: Vec<CandidateProduct>, baseline: Baseline) -> Vec<CandidateProduct> {
    candidates
        .into_iter()
        .filter(|candidate| extract_baseline(&candidate.title) == Some(baseline.as_str()))
        .collect()
}
