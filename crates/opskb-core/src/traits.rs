use crate::error::Result;

/// Splits text into tokens. Implementations may fail; callers decide how to recover.
pub trait Segmenter: Send + Sync {
    fn name(&self) -> &'static str;
    fn segment(&self, text: &str) -> Result<Vec<String>>;
}
