//! Layered configuration and path helpers.
//!
//! Uses Figment to merge built-in defaults + `config.toml` + `config.<env>.toml`
//! + `OPSKB_*` env vars (`__` separates nested keys, e.g. `OPSKB_SEARCH__TOP_K`).
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub const ENV_PREFIX: &str = "OPSKB_";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub data: DataSettings,
    pub search: SearchSettings,
    pub text: TextSettings,
    pub scoring: ScoringWeights,
    pub highlight: HighlightSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub qa_file: String,
    pub fallback_files: Vec<String>,
    pub auto_classify: bool,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self { qa_file: "data/qa_pairs.json".to_string(), fallback_files: Vec::new(), auto_classify: false }
    }
}

impl DataSettings {
    /// Candidate corpus locations in the order they should be tried.
    pub fn candidates(&self, base: &Path) -> Vec<PathBuf> {
        std::iter::once(&self.qa_file)
            .chain(self.fallback_files.iter())
            .map(|p| resolve_with_base(base, p))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub top_k: usize,
    pub min_score: f64,
    pub ui_top_k: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self { top_k: 10, min_score: 0.1, ui_top_k: 15 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmenterKind {
    #[default]
    Jieba,
    Char,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextSettings {
    pub segmenter: SegmenterKind,
    pub keyword_top_n: usize,
}

impl Default for TextSettings {
    fn default() -> Self {
        Self { segmenter: SegmenterKind::default(), keyword_top_n: 10 }
    }
}

/// Weights of the additive ranking signals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub question_contains_query: f64,
    pub answer_contains_query: f64,
    pub keyword_hit: f64,
    pub error_pattern_hit: f64,
    pub license_category: f64,
    pub long_answer: f64,
    pub medium_answer: f64,
    pub long_answer_chars: usize,
    pub medium_answer_chars: usize,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            question_contains_query: 0.5,
            answer_contains_query: 0.3,
            keyword_hit: 0.2,
            error_pattern_hit: 0.4,
            license_category: 0.6,
            long_answer: 0.2,
            medium_answer: 0.1,
            long_answer_chars: 500,
            medium_answer_chars: 200,
        }
    }
}

impl ScoringWeights {
    fn weights(&self) -> [(&'static str, f64); 7] {
        [
            ("question_contains_query", self.question_contains_query),
            ("answer_contains_query", self.answer_contains_query),
            ("keyword_hit", self.keyword_hit),
            ("error_pattern_hit", self.error_pattern_hit),
            ("license_category", self.license_category),
            ("long_answer", self.long_answer),
            ("medium_answer", self.medium_answer),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightSettings {
    pub window: usize,
    pub fallback_len: usize,
}

impl Default for HighlightSettings {
    fn default() -> Self {
        Self { window: 50, fallback_len: 100 }
    }
}

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::from(Serialized::defaults(Settings::default())).merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config = Self { figment };
        config.settings()?;
        Ok(config)
    }

    /// Build from an explicit provider stack; defaults are always merged underneath.
    pub fn from_figment(figment: Figment) -> Self {
        Self { figment: Figment::from(Serialized::defaults(Settings::default())).merge(figment) }
    }

    pub fn get<T>(&self, key: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| Error::InvalidConfig(format!("Failed to get '{}': {}", key, e)))
    }

    pub fn settings(&self) -> Result<Settings> {
        let settings: Settings = self.figment.extract().map_err(|e| Error::InvalidConfig(e.to_string()))?;
        validate(&settings)?;
        Ok(settings)
    }
}

fn validate(settings: &Settings) -> Result<()> {
    if settings.search.top_k == 0 || settings.search.ui_top_k == 0 {
        return Err(Error::InvalidConfig("search.top_k and search.ui_top_k must be positive".into()));
    }
    if !settings.search.min_score.is_finite() {
        return Err(Error::InvalidConfig("search.min_score must be finite".into()));
    }
    if settings.text.keyword_top_n == 0 {
        return Err(Error::InvalidConfig("text.keyword_top_n must be positive".into()));
    }
    for (name, w) in settings.scoring.weights() {
        if !(w.is_finite() && w >= 0.0) {
            return Err(Error::InvalidConfig(format!("scoring.{} must be a non-negative number, got {}", name, w)));
        }
    }
    if settings.scoring.medium_answer_chars > settings.scoring.long_answer_chars {
        return Err(Error::InvalidConfig("scoring.medium_answer_chars exceeds scoring.long_answer_chars".into()));
    }
    Ok(())
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_engine_constants() {
        let s = Config::from_figment(Figment::new()).settings().unwrap();
        assert_eq!(s.search.top_k, 10);
        assert!((s.search.min_score - 0.1).abs() < 1e-12);
        assert_eq!(s.search.ui_top_k, 15);
        assert_eq!(s.text.segmenter, SegmenterKind::Jieba);
        assert_eq!(s.highlight.window, 50);
    }

    #[test]
    fn toml_overrides_nested_keys() {
        let toml = r#"
            [search]
            top_k = 3

            [text]
            segmenter = "char"
        "#;
        let s = Config::from_figment(Figment::from(Toml::string(toml))).settings().unwrap();
        assert_eq!(s.search.top_k, 3);
        assert_eq!(s.text.segmenter, SegmenterKind::Char);
        assert!((s.search.min_score - 0.1).abs() < 1e-12, "untouched keys keep defaults");
    }

    #[test]
    fn load_layers_files_then_env() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[search]\ntop_k = 7\nmin_score = 0.3\n")?;
            jail.create_file("config.test.toml", "[search]\nmin_score = 0.4\n")?;
            jail.set_env("RUST_ENV", "test");
            jail.set_env("OPSKB_SEARCH__TOP_K", "3");
            jail.set_env("OPSKB_TEXT__SEGMENTER", "char");

            let s = Config::load().map_err(|e| e.to_string())?.settings().map_err(|e| e.to_string())?;
            assert_eq!(s.search.top_k, 3, "env beats config.toml");
            assert!((s.search.min_score - 0.4).abs() < 1e-12, "env file beats config.toml");
            assert_eq!(s.text.segmenter, SegmenterKind::Char);
            assert_eq!(s.search.ui_top_k, 15, "defaults fill the rest");
            Ok(())
        });
    }

    #[test]
    fn load_rejects_invalid_env_override() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("OPSKB_SEARCH__TOP_K", "0");
            assert!(matches!(Config::load(), Err(Error::InvalidConfig(_))));
            Ok(())
        });
    }

    #[test]
    fn rejects_negative_weight() {
        let toml = "[scoring]\nkeyword_hit = -0.2\n";
        let err = Config::from_figment(Figment::from(Toml::string(toml))).settings().unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn rejects_unknown_segmenter() {
        let toml = "[text]\nsegmenter = \"icu\"\n";
        assert!(Config::from_figment(Figment::from(Toml::string(toml))).settings().is_err());
    }

    #[test]
    fn get_reads_single_key() {
        let cfg = Config::from_figment(Figment::new());
        let path: String = cfg.get("data.qa_file").unwrap();
        assert_eq!(path, "data/qa_pairs.json");
    }

    #[test]
    fn relative_paths_resolve_against_base() {
        let base = Path::new("/srv/kb");
        assert_eq!(resolve_with_base(base, "data/qa.json"), PathBuf::from("/srv/kb/data/qa.json"));
        assert_eq!(resolve_with_base(base, "/abs/qa.json"), PathBuf::from("/abs/qa.json"));
    }
}
