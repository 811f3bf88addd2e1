//! opskb-core
//!
//! Shared data model, error type, configuration and corpus loading for the
//! offline operations knowledge base.
pub mod config;
pub mod error;
pub mod loader;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use types::{Category, QaRecord, SearchResult};
