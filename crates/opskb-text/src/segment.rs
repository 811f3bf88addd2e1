//! Segmenter implementations.
//!
//! `JiebaSegmenter` uses the jieba dictionary (cargo feature `jieba`).
//! `CharClassSegmenter` is the deterministic fallback: alphanumeric runs become
//! one token, each CJK ideograph becomes its own token, everything else separates.
use opskb_core::traits::Segmenter;
use opskb_core::Result;

/// Basic CJK Unified Ideographs block, as used by the fallback splitter.
pub fn is_ideograph(c: char) -> bool {
    matches!(c, '\u{4e00}'..='\u{9fa5}')
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CharClassSegmenter;

impl CharClassSegmenter {
    pub fn split(text: &str) -> Vec<String> {
        let mut words = Vec::new();
        let mut cur = String::new();
        for ch in text.chars() {
            if is_ideograph(ch) {
                if !cur.is_empty() { words.push(std::mem::take(&mut cur)); }
                words.push(ch.to_string());
            } else if ch.is_alphanumeric() {
                cur.push(ch);
            } else if !cur.is_empty() {
                words.push(std::mem::take(&mut cur));
            }
        }
        if !cur.is_empty() { words.push(cur); }
        words
    }
}

impl Segmenter for CharClassSegmenter {
    fn name(&self) -> &'static str { "char" }

    fn segment(&self, text: &str) -> Result<Vec<String>> {
        Ok(Self::split(text))
    }
}

#[cfg(feature = "jieba")]
pub use self::dictionary::JiebaSegmenter;

#[cfg(feature = "jieba")]
mod dictionary {
    use jieba_rs::Jieba;
    use once_cell::sync::Lazy;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    use opskb_core::traits::Segmenter;
    use opskb_core::{Error, Result};

    static JIEBA: Lazy<Jieba> = Lazy::new(Jieba::new);

    /// Dictionary-based segmentation with HMM for unknown words.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct JiebaSegmenter;

    impl Segmenter for JiebaSegmenter {
        fn name(&self) -> &'static str { "jieba" }

        fn segment(&self, text: &str) -> Result<Vec<String>> {
            if text.is_empty() {
                return Ok(Vec::new());
            }
            let words = catch_unwind(AssertUnwindSafe(|| {
                JIEBA.cut(text, true).into_iter().map(str::to_string).collect::<Vec<_>>()
            }))
            .map_err(|_| Error::Segmentation("jieba panicked while cutting text".into()))?;
            // Pieces without any word character are separators, not tokens.
            Ok(words
                .into_iter()
                .filter(|w| w.chars().any(char::is_alphanumeric))
                .map(|w| w.trim().to_string())
                .collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_splits_runs_and_ideographs() {
        let tokens = CharClassSegmenter::split("数据库timeout 500错误!");
        assert_eq!(tokens, vec!["数", "据", "库", "timeout", "500", "错", "误"]);
    }

    #[test]
    fn fallback_empty_and_punctuation_only() {
        assert!(CharClassSegmenter::split("").is_empty());
        assert!(CharClassSegmenter::split("，。!?  ---").is_empty());
    }

    #[test]
    fn fallback_keeps_mixed_case_runs_intact() {
        assert_eq!(CharClassSegmenter::split("ClassNotFound-ORA_12541"), vec!["ClassNotFound", "ORA", "12541"]);
    }

    #[cfg(feature = "jieba")]
    #[test]
    fn jieba_drops_whitespace_and_punctuation() {
        let tokens = JiebaSegmenter.segment("重启 服务，查看日志！").unwrap();
        assert!(!tokens.is_empty());
        assert!(tokens.iter().all(|t| t.chars().any(char::is_alphanumeric)));
        assert!(tokens.iter().any(|t| t == "日志"));
    }

    #[cfg(feature = "jieba")]
    #[test]
    fn jieba_empty_input() {
        assert!(JiebaSegmenter.segment("").unwrap().is_empty());
    }
}
