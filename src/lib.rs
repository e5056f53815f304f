//! # company-intel - Company Website Profiling with an LLM
//!
//! This crate collects the public website text of a list of companies and asks
//! a large language model a fixed set of business-profile questions about each
//! one, producing a spreadsheet with one row per company.
//!
//! ## Features
//!
//! - Depth-bounded, same-host crawling with per-company text aggregation
//! - Corpus files on disk, so crawling and answering can run separately
//! - A small Gemini REST client with typed failure classification
//! - Rate pacing for page fetches, questions and corpus files
//! - Excel (`.xlsx`) or CSV output
//! - Async API with Tokio
//!
//! ## Example
//!
//! ```rust,no_run
//! use company_intel::answer::{default_questions, GeminiModel, QuestionAnswerer};
//! use company_intel::crawler::{CorpusStore, Crawler, CrawlerConfig};
//! use company_intel::gemini::Client;
//! use company_intel::pacer::GovernorPacer;
//! use company_intel::pipeline::{answer_corpora, crawl_and_persist, export_answers};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let crawler = Crawler::from_config(CrawlerConfig::default())?;
//!     let store = CorpusStore::new("website_contents");
//!
//!     let seeds = vec!["https://www.gm.com".to_string()];
//!     crawl_and_persist(&crawler, &seeds, &store).await;
//!
//!     let model = GeminiModel::new(Client::from_env("GEMINI_API_KEY")?, "gemini-2.0-flash");
//!     let answerer = QuestionAnswerer::new(model, GovernorPacer::from_millis(4000));
//!     let questions = default_questions();
//!     let rows = answer_corpora(&store, &answerer, &questions, &GovernorPacer::from_millis(5000), None).await;
//!
//!     export_answers(&rows, &questions, Path::new("company_info.xlsx"))?;
//!     Ok(())
//! }
//! ```

mod error;

pub mod answer;
pub mod config;
pub mod crawler;
pub mod gemini;
pub mod pacer;
pub mod pipeline;
pub mod table;

pub use error::{Error, Result};

/// Commonly used types
pub mod prelude {
    pub use crate::answer::{AnswerError, AnswerRow, LanguageModel, QuestionAnswerer};
    pub use crate::config::AppConfig;
    pub use crate::crawler::{CompanyId, CorpusStore, Crawler, CrawlerConfig, PageSource};
    pub use crate::error::Error;
    pub use crate::error::Result;
    pub use crate::pacer::Pacer;
}
