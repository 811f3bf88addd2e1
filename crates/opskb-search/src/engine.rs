use std::cmp::Ordering;

use opskb_core::config::{HighlightSettings, Settings};
use opskb_core::types::synthesize_id;
use opskb_core::{QaRecord, SearchResult};
use opskb_text::TextNormalizer;

use crate::highlight::excerpt;
use crate::patterns::extract_error_patterns;
use crate::rules::{default_rules, IndexedRecord, QueryContext, ScoringRule};

pub const DEFAULT_TOP_K: usize = 10;
pub const DEFAULT_MIN_SCORE: f64 = 0.1;

/// In-memory ranked search over an immutable corpus.
///
/// Every query scans the whole corpus; only the lowercase views of each
/// record are precomputed.
pub struct SearchEngine {
    records: Vec<IndexedRecord>,
    normalizer: TextNormalizer,
    rules: Vec<Box<dyn ScoringRule>>,
    keyword_top_n: usize,
    highlight: HighlightSettings,
}

impl SearchEngine {
    pub fn new(records: Vec<QaRecord>) -> Self {
        Self::with_settings(records, &Settings::default())
    }

    pub fn with_settings(records: Vec<QaRecord>, settings: &Settings) -> Self {
        let mut indexed = Vec::with_capacity(records.len());
        for (position, record) in records.into_iter().enumerate() {
            let id = record.id.clone().unwrap_or_else(|| synthesize_id(position));
            if !record.is_searchable() {
                tracing::warn!(id = %id, "record has empty question or answer, excluded from search");
                continue;
            }
            indexed.push(IndexedRecord::new(id, record));
        }
        Self {
            records: indexed,
            normalizer: TextNormalizer::for_kind(settings.text.segmenter),
            rules: default_rules(&settings.scoring),
            keyword_top_n: settings.text.keyword_top_n,
            highlight: settings.highlight.clone(),
        }
    }

    pub fn with_normalizer(mut self, normalizer: TextNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn with_rules(mut self, rules: Vec<Box<dyn ScoringRule>>) -> Self {
        self.rules = rules;
        self
    }

    pub fn len(&self) -> usize { self.records.len() }

    pub fn is_empty(&self) -> bool { self.records.is_empty() }

    pub fn normalizer(&self) -> &TextNormalizer { &self.normalizer }

    pub fn get(&self, id: &str) -> Option<&QaRecord> {
        self.records.iter().find(|r| r.id == id).map(|r| &r.record)
    }

    pub fn query_context(&self, query: &str) -> QueryContext {
        QueryContext {
            raw: query.to_string(),
            lowered: query.to_lowercase(),
            keywords: self.normalizer.extract_keywords(query, self.keyword_top_n),
            error_patterns: extract_error_patterns(query),
        }
    }

    /// Up to `top_k` records scoring strictly above `min_score`, best first.
    /// Scores are rounded before filtering and ordering; equal scores keep corpus order.
    pub fn search(&self, query: &str, top_k: usize, min_score: f64) -> Vec<SearchResult> {
        if self.records.is_empty() || query.trim().is_empty() {
            return Vec::new();
        }
        let ctx = self.query_context(query);
        let mut scored: Vec<(usize, f64)> = self
            .records
            .iter()
            .enumerate()
            .map(|(row, doc)| (row, round_score(self.score(&ctx, doc))))
            .filter(|(_, score)| *score > min_score)
            .collect();
        // sort_by is stable
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        tracing::debug!(query, keywords = ?ctx.keywords, patterns = ?ctx.error_patterns, matched = scored.len(), "search");
        scored.truncate(top_k);
        scored.into_iter().map(|(row, score)| self.materialize(&ctx, &self.records[row], score)).collect()
    }

    /// Per-rule contributions for one record, in rule order.
    pub fn explain(&self, query: &str, id: &str) -> Option<Vec<(&'static str, f64)>> {
        let doc = self.records.iter().find(|r| r.id == id)?;
        let ctx = self.query_context(query);
        Some(self.rules.iter().map(|rule| (rule.name(), rule.score(&ctx, doc))).collect())
    }

    fn score(&self, ctx: &QueryContext, doc: &IndexedRecord) -> f64 {
        self.rules.iter().map(|rule| rule.score(ctx, doc)).sum()
    }

    fn materialize(&self, ctx: &QueryContext, doc: &IndexedRecord, score: f64) -> SearchResult {
        let record = &doc.record;
        SearchResult {
            id: doc.id.clone(),
            question: record.question.clone(),
            answer: record.answer.clone(),
            category: record.category_or_default(),
            score,
            keywords: record.keywords.clone(),
            source: record.source.clone(),
            highlight: excerpt(&ctx.raw, &ctx.keywords, &record.answer, &self.highlight),
        }
    }
}

/// Three decimal places.
fn round_score(score: f64) -> f64 {
    (score * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use opskb_core::config::SegmenterKind;
    use opskb_core::Category;

    fn char_engine(records: Vec<QaRecord>) -> SearchEngine {
        SearchEngine::new(records).with_normalizer(TextNormalizer::for_kind(SegmenterKind::Char))
    }

    #[test]
    fn empty_corpus_returns_nothing() {
        assert!(char_engine(Vec::new()).search("重启", DEFAULT_TOP_K, DEFAULT_MIN_SCORE).is_empty());
    }

    #[test]
    fn blank_query_returns_nothing() {
        let engine = char_engine(vec![QaRecord::new("q", "a".repeat(600))]);
        assert!(engine.search("", 10, 0.0).is_empty());
        assert!(engine.search("   ", 10, 0.0).is_empty());
    }

    #[test]
    fn ids_are_synthesized_from_position() {
        let engine = char_engine(vec![QaRecord::new("", "dropped"), QaRecord::new("nginx 502", "检查 upstream")]);
        assert_eq!(engine.len(), 1);
        let hits = engine.search("nginx", 10, 0.1);
        assert_eq!(hits[0].id, "QA00002");
        assert!(engine.get("QA00002").is_some());
    }

    #[test]
    fn scores_are_rounded_to_three_places() {
        let engine = char_engine(vec![QaRecord::new("tomcat", "tomcat")]);
        let hits = engine.search("tomcat", 10, 0.1);
        // 0.5 + 0.3 + keyword 0.2
        assert_eq!(hits[0].score, 1.0);
        assert_eq!(hits[0].category, Category::Other);
    }

    #[test]
    fn single_rule_engine_scores_only_that_signal() {
        use crate::rules::AnswerLengthBoost;
        let records = vec![
            QaRecord::new("nginx", "short").with_id("short"),
            QaRecord::new("redis", "x".repeat(600)).with_id("long"),
        ];
        let rule = AnswerLengthBoost { long_weight: 0.2, medium_weight: 0.1, long_chars: 500, medium_chars: 200 };
        let engine = char_engine(records).with_rules(vec![Box::new(rule)]);
        // the query matches "short" textually, but only answer length is scored
        let hits = engine.search("nginx", 10, 0.1);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "long");
        assert_eq!(hits[0].score, 0.2);
        assert_eq!(engine.normalizer().segmenter_name(), "char");
    }

    #[test]
    fn explain_lists_each_rule() {
        let engine = char_engine(vec![QaRecord::new("tomcat", "tomcat").with_id("T")]);
        let parts = engine.explain("tomcat", "T").unwrap();
        assert_eq!(parts.len(), 5);
        assert_eq!(parts[0], ("substring", 0.8));
        assert!(engine.explain("tomcat", "missing").is_none());
    }
}
