//! opskb-text
//!
//! Text normalizer (segmentation, keyword extraction, similarity) and the
//! category classifier.
pub mod classifier;
pub mod normalizer;
pub mod segment;
pub mod similarity;

pub use classifier::Classifier;
pub use normalizer::TextNormalizer;
pub use similarity::similarity;
