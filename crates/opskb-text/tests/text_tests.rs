use opskb_core::config::SegmenterKind;
use opskb_core::Category;
use opskb_text::{similarity, Classifier, TextNormalizer};

#[test]
fn default_normalizer_extracts_no_keywords_from_empty_or_stop_words() {
    let n = TextNormalizer::default();
    assert!(n.extract_keywords("", 10).is_empty());
    assert!(n.extract_keywords("如何", 10).is_empty());
    assert!(n.extract_keywords("的 了 是", 10).is_empty());
}

#[test]
fn both_segmenters_find_ascii_terms() {
    for kind in [SegmenterKind::Jieba, SegmenterKind::Char] {
        let n = TextNormalizer::for_kind(kind);
        let kws = n.extract_keywords("Tomcat 报错 ClassNotFound", 10);
        assert!(kws.contains(&"tomcat".to_string()), "{:?}: {:?}", kind, kws);
        assert!(kws.contains(&"classnotfound".to_string()), "{:?}: {:?}", kind, kws);
        // tech term doubled ahead of plain term
        let cnf = kws.iter().position(|k| k == "classnotfound").unwrap();
        let tomcat = kws.iter().position(|k| k == "tomcat").unwrap();
        assert!(cnf < tomcat);
    }
}

#[test]
fn segment_never_fails_on_odd_input() {
    let n = TextNormalizer::default();
    for text in ["\u{0}\u{1}", "🙂🙂", "   ", "﻿BOM", "a\u{301}"] {
        let _ = n.segment(text);
    }
    assert!(n.segment("").is_empty());
}

#[test]
fn classifier_examples() {
    let c = Classifier::new();
    assert_eq!(c.classify("数据库 连接池 超时", ""), Category::Database);
    assert_eq!(c.classify("hello world", ""), Category::Other);
    assert_eq!(c.classify("集群节点主从同步失败", ""), Category::Cluster);
}

#[test]
fn similarity_is_a_utility_ratio() {
    assert_eq!(similarity("重启服务", "重启服务"), 1.0);
    let s = similarity("tomcat 启动失败", "tomcat 启动很慢");
    assert!(s > 0.5 && s < 1.0);
}
