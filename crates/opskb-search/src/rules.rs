//! Ranking signals.
//!
//! Each rule scores one (query, record) pair independently; the engine sums
//! them in order. Rules are stateless apart from their weights.
use opskb_core::config::ScoringWeights;
use opskb_core::{Category, QaRecord};

use crate::patterns::mentions_license;

/// A query after normalization, shared by every rule.
#[derive(Debug, Clone)]
pub struct QueryContext {
    pub raw: String,
    pub lowered: String,
    pub keywords: Vec<String>,
    pub error_patterns: Vec<String>,
}

/// A record with the lowercase views the rules match against.
#[derive(Debug, Clone)]
pub struct IndexedRecord {
    pub id: String,
    pub record: QaRecord,
    pub question_lc: String,
    pub answer_lc: String,
    pub keywords_lc: String,
    pub answer_chars: usize,
}

impl IndexedRecord {
    pub fn new(id: String, record: QaRecord) -> Self {
        Self {
            id,
            question_lc: record.question.to_lowercase(),
            answer_lc: record.answer.to_lowercase(),
            keywords_lc: record.keywords.to_lowercase(),
            answer_chars: record.answer.chars().count(),
            record,
        }
    }
}

pub trait ScoringRule: Send + Sync {
    fn name(&self) -> &'static str;
    fn score(&self, query: &QueryContext, doc: &IndexedRecord) -> f64;
}

/// The full query appearing verbatim in the question and/or answer.
pub struct SubstringContainment {
    pub question_weight: f64,
    pub answer_weight: f64,
}

impl ScoringRule for SubstringContainment {
    fn name(&self) -> &'static str { "substring" }

    fn score(&self, query: &QueryContext, doc: &IndexedRecord) -> f64 {
        let mut score = 0.0;
        if doc.question_lc.contains(&query.lowered) { score += self.question_weight; }
        if doc.answer_lc.contains(&query.lowered) { score += self.answer_weight; }
        score
    }
}

/// Query keywords found in question, answer or stored keywords; once per keyword.
pub struct KeywordOverlap {
    pub weight: f64,
}

impl ScoringRule for KeywordOverlap {
    fn name(&self) -> &'static str { "keywords" }

    fn score(&self, query: &QueryContext, doc: &IndexedRecord) -> f64 {
        let hits = query
            .keywords
            .iter()
            .filter(|kw| {
                doc.question_lc.contains(kw.as_str()) || doc.answer_lc.contains(kw.as_str()) || doc.keywords_lc.contains(kw.as_str())
            })
            .count();
        hits as f64 * self.weight
    }
}

pub struct ErrorPatternOverlap {
    pub weight: f64,
}

impl ScoringRule for ErrorPatternOverlap {
    fn name(&self) -> &'static str { "error_patterns" }

    fn score(&self, query: &QueryContext, doc: &IndexedRecord) -> f64 {
        let hits = query
            .error_patterns
            .iter()
            .filter(|p| doc.question_lc.contains(p.as_str()) || doc.answer_lc.contains(p.as_str()))
            .count();
        hits as f64 * self.weight
    }
}

pub struct LicenseCategoryBoost {
    pub weight: f64,
}

impl ScoringRule for LicenseCategoryBoost {
    fn name(&self) -> &'static str { "license_category" }

    fn score(&self, query: &QueryContext, doc: &IndexedRecord) -> f64 {
        if doc.record.category_or_default() == Category::License && mentions_license(&query.lowered) {
            self.weight
        } else {
            0.0
        }
    }
}

/// Detailed answers rank higher.
pub struct AnswerLengthBoost {
    pub long_weight: f64,
    pub medium_weight: f64,
    pub long_chars: usize,
    pub medium_chars: usize,
}

impl ScoringRule for AnswerLengthBoost {
    fn name(&self) -> &'static str { "answer_length" }

    fn score(&self, _query: &QueryContext, doc: &IndexedRecord) -> f64 {
        if doc.answer_chars > self.long_chars {
            self.long_weight
        } else if doc.answer_chars > self.medium_chars {
            self.medium_weight
        } else {
            0.0
        }
    }
}

pub fn default_rules(w: &ScoringWeights) -> Vec<Box<dyn ScoringRule>> {
    vec![
        Box::new(SubstringContainment { question_weight: w.question_contains_query, answer_weight: w.answer_contains_query }),
        Box::new(KeywordOverlap { weight: w.keyword_hit }),
        Box::new(ErrorPatternOverlap { weight: w.error_pattern_hit }),
        Box::new(LicenseCategoryBoost { weight: w.license_category }),
        Box::new(AnswerLengthBoost {
            long_weight: w.long_answer,
            medium_weight: w.medium_answer,
            long_chars: w.long_answer_chars,
            medium_chars: w.medium_answer_chars,
        }),
    ]
}
