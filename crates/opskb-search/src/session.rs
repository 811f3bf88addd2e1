//! Knowledge-base session: a loaded engine, or the reason data is unavailable.
use std::path::{Path, PathBuf};

use opskb_core::config::{SearchSettings, Settings};
use opskb_core::loader::CorpusLoader;
use opskb_core::{Error, QaRecord, Result, SearchResult};
use opskb_text::Classifier;

use crate::engine::SearchEngine;

pub enum State {
    Ready { engine: SearchEngine, source: PathBuf, skipped: usize },
    Unavailable { path: PathBuf, reason: String },
}

pub struct KnowledgeBase {
    state: State,
    search: SearchSettings,
}

impl KnowledgeBase {
    /// Load the corpus relative to the working directory. Never fails; a load
    /// error leaves the session in the unavailable state.
    pub fn open(settings: &Settings) -> Self {
        let base = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::open_in(&base, settings)
    }

    pub fn open_in(base: &Path, settings: &Settings) -> Self {
        let candidates = settings.data.candidates(base);
        match CorpusLoader::new().load_first_available(&candidates) {
            Ok(report) => {
                let records = label_records(report.records, settings.data.auto_classify);
                let engine = SearchEngine::with_settings(records, settings);
                tracing::info!(source = %report.path.display(), records = engine.len(), "knowledge base ready");
                Self { state: State::Ready { engine, source: report.path, skipped: report.skipped }, search: settings.search.clone() }
            }
            Err(e) => {
                tracing::warn!(error = %e, "knowledge base unavailable, search disabled");
                let path = match &e {
                    Error::Unavailable { path, .. } => path.clone(),
                    _ => candidates.first().cloned().unwrap_or_default(),
                };
                Self { state: State::Unavailable { path, reason: e.to_string() }, search: settings.search.clone() }
            }
        }
    }

    pub fn from_records(records: Vec<QaRecord>, settings: &Settings) -> Self {
        let records = label_records(records, settings.data.auto_classify);
        let engine = SearchEngine::with_settings(records, settings);
        Self { state: State::Ready { engine, source: PathBuf::new(), skipped: 0 }, search: settings.search.clone() }
    }

    pub fn state(&self) -> &State { &self.state }

    pub fn is_ready(&self) -> bool { matches!(self.state, State::Ready { .. }) }

    pub fn len(&self) -> usize {
        match &self.state {
            State::Ready { engine, .. } => engine.len(),
            State::Unavailable { .. } => 0,
        }
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    pub fn engine(&self) -> Result<&SearchEngine> {
        match &self.state {
            State::Ready { engine, .. } => Ok(engine),
            State::Unavailable { path, reason } => Err(Error::Unavailable { path: path.clone(), reason: reason.clone() }),
        }
    }

    /// Search with the configured defaults.
    pub fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        self.search_with(query, self.search.top_k, self.search.min_score)
    }

    pub fn search_with(&self, query: &str, top_k: usize, min_score: f64) -> Result<Vec<SearchResult>> {
        Ok(self.engine()?.search(query, top_k, min_score))
    }

    /// Full record for drill-down.
    pub fn get(&self, id: &str) -> Result<&QaRecord> {
        self.engine()?.get(id).ok_or_else(|| Error::NotFound(format!("record '{}'", id)))
    }
}

/// Fill missing categories with the classifier when `auto_classify` is set.
pub fn label_records(mut records: Vec<QaRecord>, auto_classify: bool) -> Vec<QaRecord> {
    if auto_classify {
        let classifier = Classifier::new();
        for record in records.iter_mut().filter(|r| r.category.is_none()) {
            record.category = Some(classifier.classify_record(record));
        }
    }
    records
}
