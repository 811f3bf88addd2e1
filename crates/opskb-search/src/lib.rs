//! opskb-search
//!
//! Ranked search over an in-memory question/answer corpus. Scoring is a sum
//! of independent rules (see `rules`); highlights come from `highlight`.
pub mod engine;
pub mod highlight;
pub mod patterns;
pub mod rules;
pub mod session;

pub use engine::{SearchEngine, DEFAULT_MIN_SCORE, DEFAULT_TOP_K};
pub use session::KnowledgeBase;
