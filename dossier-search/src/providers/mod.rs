//! Search provider implementations.
//!
//! Each module provides a struct implementing [`crate::backend::SearchBackend`]
//! for one external search API.

pub mod google_cse;
pub mod jina;
pub mod scrapingant;

pub use google_cse::GoogleCseBackend;
pub use jina::JinaBackend;
pub use scrapingant::ScrapingAntBackend;
