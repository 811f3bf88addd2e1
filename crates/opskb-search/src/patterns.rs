//! Error-pattern extraction from raw queries.
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static EXCEPTION_NAMES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Z][a-zA-Z]*Exception|Error|Failure|Timeout").expect("exception regex"));

static ERROR_CODES: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Z]{2,}_?\d{3,}|[A-Z]+-\d+").expect("error code regex"));

static LICENSE_WORDS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)license|许可证|授权|过期|到期").expect("license regex"));

/// Terms whose presence in a query enables the license-category boost.
pub const LICENSE_QUERY_TERMS: &[&str] = &["license", "许可证", "授权", "过期"];

/// Exception names, error codes and license words found in `query`.
///
/// Matching runs on the original casing; results are lowercased and
/// deduplicated in first-seen order so they compare against lowercased text.
pub fn extract_error_patterns(query: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    [&*EXCEPTION_NAMES, &*ERROR_CODES, &*LICENSE_WORDS]
        .into_iter()
        .flat_map(|re| re.find_iter(query).map(|m| m.as_str().to_lowercase()))
        .filter(|p| seen.insert(p.clone()))
        .collect()
}

pub fn mentions_license(query_lc: &str) -> bool {
    LICENSE_QUERY_TERMS.iter().any(|t| query_lc.contains(t))
}
