//! Domain types shared by the normalizer, classifier and search engine.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Fixed, closed set of knowledge-base categories.
///
/// Declaration order is the classifier's tie-break order and must not change.
/// Serialized as the Chinese label used by the data files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Category {
    Deployment,
    StartStop,
    Configuration,
    Performance,
    Network,
    Database,
    Security,
    Logging,
    Cluster,
    License,
    Compatibility,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 12] = [
        Category::Deployment,
        Category::StartStop,
        Category::Configuration,
        Category::Performance,
        Category::Network,
        Category::Database,
        Category::Security,
        Category::Logging,
        Category::Cluster,
        Category::License,
        Category::Compatibility,
        Category::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Deployment => "部署安装",
            Category::StartStop => "启动停止",
            Category::Configuration => "配置管理",
            Category::Performance => "性能调优",
            Category::Network => "网络连接",
            Category::Database => "数据库",
            Category::Security => "安全认证",
            Category::Logging => "日志监控",
            Category::Cluster => "集群高可用",
            Category::License => "许可证授权",
            Category::Compatibility => "兼容性",
            Category::Other => "其他问题",
        }
    }

    /// Exact label lookup. Returns `None` for labels outside the closed set.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|c| c.label() == label)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<Category> for String {
    fn from(c: Category) -> Self {
        c.label().to_string()
    }
}

impl From<String> for Category {
    fn from(label: String) -> Self {
        Category::from_label(&label).unwrap_or_else(|| {
            tracing::warn!(label = %label, "unknown category label, using default");
            Category::Other
        })
    }
}

/// One question/answer entry of the knowledge base.
///
/// `id` is optional on disk; the engine synthesizes `QA{n:05}` for records without one.
/// `category` is `None` only when the source omitted it; see [`QaRecord::category_or_default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaRecord {
    #[serde(default, deserialize_with = "scalar_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub question: String,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub keywords: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub source: String,
}

/// `null` reads as an empty string.
fn null_as_empty<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}

/// Ids may be strings or numbers on disk; `null` means absent.
fn scalar_id<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<String>, D::Error> {
    match Value::deserialize(d)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(D::Error::custom(format!("id must be a string or number, got {}", other))),
    }
}

impl QaRecord {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            id: None,
            question: question.into(),
            answer: answer.into(),
            category: None,
            keywords: String::new(),
            source: String::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_keywords(mut self, keywords: impl Into<String>) -> Self {
        self.keywords = keywords.into();
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn category_or_default(&self) -> Category {
        self.category.unwrap_or_default()
    }

    /// A record takes part in scoring only when both texts are non-blank.
    pub fn is_searchable(&self) -> bool {
        !self.question.trim().is_empty() && !self.answer.trim().is_empty()
    }
}

/// Synthesized identifier for the record at zero-based `position`.
pub fn synthesize_id(position: usize) -> String {
    format!("QA{:05}", position + 1)
}

/// A ranked hit, materialized for display. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub category: Category,
    /// Rounded to three decimal places.
    pub score: f64,
    pub keywords: String,
    pub source: String,
    pub highlight: String,
}
