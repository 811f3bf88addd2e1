//! Text normalization: segmentation with fallback and keyword extraction.
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

use opskb_core::config::SegmenterKind;
use opskb_core::traits::Segmenter;

use crate::segment::CharClassSegmenter;

pub const STOP_WORDS: &[&str] = &[
    "的", "了", "在", "是", "和", "有", "为", "这个", "一个", "问题", "如何", "解决",
    "怎么", "什么", "为什么", "怎样", "哪个", "哪里", "何时", "多少", "是否",
    "可以", "能够", "可能", "需要", "要求", "必须", "应该", "会", "要",
    "不能", "不会", "没有", "不", "没", "无", "非", "未", "否", "别", "莫", "勿",
];

/// Domain terms whose frequency counts double during keyword extraction.
pub const TECH_TERMS: &[&str] = &[
    "部署", "安装", "配置", "启动", "停止", "重启", "卸载", "升级", "降级",
    "异常", "错误", "报错", "故障", "失败", "内存", "CPU", "磁盘", "网络",
    "端口", "连接", "超时", "日志", "数据库", "连接池", "证书", "SSL",
    "许可证", "license", "授权", "过期", "到期", "中间件", "集群", "负载均衡",
    "兼容", "冲突", "依赖", "jar", "war", "类冲突", "ClassNotFound",
];

static STOP_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| STOP_WORDS.iter().copied().collect());

// Compared case-insensitively: candidates are lowercased before lookup.
static TECH_SET: Lazy<HashSet<String>> = Lazy::new(|| TECH_TERMS.iter().map(|t| t.to_lowercase()).collect());

pub fn is_stop_word(token: &str) -> bool {
    STOP_SET.contains(token)
}

pub fn is_tech_term(token: &str) -> bool {
    TECH_SET.contains(&token.to_lowercase())
}

/// Segments text with a primary segmenter, recovering with the char-class splitter.
pub struct TextNormalizer {
    primary: Box<dyn Segmenter>,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::for_kind(SegmenterKind::default())
    }
}

impl TextNormalizer {
    pub fn new(primary: Box<dyn Segmenter>) -> Self {
        Self { primary }
    }

    pub fn for_kind(kind: SegmenterKind) -> Self {
        match kind {
            #[cfg(feature = "jieba")]
            SegmenterKind::Jieba => Self::new(Box::new(crate::segment::JiebaSegmenter)),
            #[cfg(not(feature = "jieba"))]
            SegmenterKind::Jieba => {
                tracing::warn!("built without the `jieba` feature, using char segmenter");
                Self::new(Box::new(CharClassSegmenter))
            }
            SegmenterKind::Char => Self::new(Box::new(CharClassSegmenter)),
        }
    }

    pub fn segmenter_name(&self) -> &'static str {
        self.primary.name()
    }

    /// Never fails: any segmenter error falls back to the char-class splitter.
    pub fn segment(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }
        match self.primary.segment(text) {
            Ok(tokens) => tokens,
            Err(e) => {
                tracing::warn!(segmenter = self.primary.name(), error = %e, "segmentation failed, falling back");
                CharClassSegmenter::split(text)
            }
        }
    }

    /// Up to `top_n` keywords ordered by weighted frequency, ties by first occurrence.
    pub fn extract_keywords(&self, text: &str, top_n: usize) -> Vec<String> {
        if text.is_empty() || top_n == 0 {
            return Vec::new();
        }
        let mut counts: Vec<(String, usize)> = Vec::new();
        let mut slots: HashMap<String, usize> = HashMap::new();
        for token in self.segment(&text.to_lowercase()) {
            if token.chars().count() <= 1 || is_stop_word(&token) {
                continue;
            }
            match slots.get(&token) {
                Some(&slot) => counts[slot].1 += 1,
                None => {
                    slots.insert(token.clone(), counts.len());
                    counts.push((token, 1));
                }
            }
        }
        for (token, count) in &mut counts {
            if is_tech_term(token) {
                *count *= 2;
            }
        }
        // Stable: equal weights keep first-encountered order.
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts.into_iter().take(top_n).map(|(token, _)| token).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opskb_core::{Error, Result};

    struct Broken;

    impl Segmenter for Broken {
        fn name(&self) -> &'static str { "broken" }
        fn segment(&self, _text: &str) -> Result<Vec<String>> {
            Err(Error::Segmentation("dictionary missing".into()))
        }
    }

    fn char_normalizer() -> TextNormalizer {
        TextNormalizer::for_kind(SegmenterKind::Char)
    }

    #[test]
    fn empty_text_has_no_keywords() {
        assert!(char_normalizer().extract_keywords("", 10).is_empty());
    }

    #[test]
    fn stop_words_only_has_no_keywords() {
        let n = TextNormalizer::new(Box::new(Split));
        assert!(n.extract_keywords("如何 解决 这个 问题 为什么", 10).is_empty());
    }

    #[test]
    fn single_char_tokens_are_dropped() {
        assert!(char_normalizer().extract_keywords("重启 a b", 10).is_empty());
    }

    #[test]
    fn frequency_orders_keywords_with_stable_ties() {
        let kws = char_normalizer().extract_keywords("nginx tomcat nginx redis tomcat nginx", 10);
        assert_eq!(kws, vec!["nginx", "tomcat", "redis"]);
    }

    #[test]
    fn tech_terms_double_case_insensitively() {
        // "cpu" appears once but is doubled past "load" which appears once.
        let kws = char_normalizer().extract_keywords("load CPU", 10);
        assert_eq!(kws, vec!["cpu", "load"]);
        // doubled 1 == 2 ties with a plain count of 2; first seen wins
        let kws = char_normalizer().extract_keywords("heap heap jar", 10);
        assert_eq!(kws, vec!["heap", "jar"]);
    }

    #[test]
    fn top_n_truncates() {
        let kws = char_normalizer().extract_keywords("alpha beta gamma delta", 2);
        assert_eq!(kws, vec!["alpha", "beta"]);
    }

    #[test]
    fn segmentation_errors_fall_back_to_char_splitter() {
        let n = TextNormalizer::new(Box::new(Broken));
        assert_eq!(n.segment("重启tomcat"), vec!["重", "启", "tomcat"]);
        assert_eq!(n.extract_keywords("重启tomcat", 10), vec!["tomcat"]);
    }

    /// Whitespace segmenter so multi-character Chinese words survive in tests.
    struct Split;

    impl Segmenter for Split {
        fn name(&self) -> &'static str { "split" }
        fn segment(&self, text: &str) -> Result<Vec<String>> {
            Ok(text.split_whitespace().map(str::to_string).collect())
        }
    }

    #[test]
    fn chinese_tech_terms_rank_first() {
        let n = TextNormalizer::new(Box::new(Split));
        let kws = n.extract_keywords("服务 超时 服务", 10);
        // 超时: 1 * 2 = 2 ties 服务: 2, first seen wins
        assert_eq!(kws, vec!["服务", "超时"]);
        let kws = n.extract_keywords("服务 超时 超时 服务", 10);
        assert_eq!(kws, vec!["超时", "服务"]);
    }
}
