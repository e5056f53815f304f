//! # End-to-end Pipeline
//!
//! Two passes glue the components together:
//!
//! 1. `crawl_and_persist`: crawl the seeds and write one corpus file per company.
//! 2. `answer_corpora` + `export_answers`: ask the question set of every corpus
//!    file and write the answers as a table.
//!
//! Nothing in here aborts a run: a unit of work that fails is logged and
//! skipped, and an empty result ends the pass without writing anything.

use std::path::{Path, PathBuf};

use tokio::sync::mpsc;
use tracing::{info, instrument, warn};

use crate::answer::{AnswerRow, LanguageModel, QuestionAnswerer};
use crate::crawler::{CorpusStore, CrawlStats, Crawler, PageSource};
use crate::pacer::Pacer;
use crate::error::Result;
use crate::table::write_table;

/// What the crawl pass produced.
#[derive(Debug, Default)]
pub struct CrawlSummary {
    pub stats: CrawlStats,
    /// Corpus files written
    pub files: Vec<PathBuf>,
}

/// Crawl `seeds` and persist each company's corpus in `store`.
#[instrument(skip_all, fields(seeds = seeds.len(), content_dir = %store.base_path().display()))]
pub async fn crawl_and_persist<S, P>(
    crawler: &Crawler<S, P>,
    seeds: &[String],
    store: &CorpusStore,
) -> CrawlSummary
where
    S: PageSource,
    P: Pacer,
{
    let outcome = crawler.crawl(seeds).await;

    if outcome.corpora.is_empty() {
        warn!("No content was collected; no corpus files written");
        return CrawlSummary {
            stats: outcome.stats,
            files: Vec::new(),
        };
    }

    let mut companies: Vec<_> = outcome.corpora.iter().collect();
    companies.sort_by(|a, b| a.0.cmp(b.0));

    let mut files = Vec::with_capacity(companies.len());
    for (company, corpus) in companies {
        match store.persist(company, corpus).await {
            Ok(path) => files.push(path),
            Err(e) => warn!("Failed to save content for {}: {}", company, e),
        }
    }

    CrawlSummary {
        stats: outcome.stats,
        files,
    }
}

/// Ask every question of every corpus file in `store`.
///
/// Files that are missing, unreadable or empty contribute no row. `file_pacer`
/// is awaited before each corpus is answered; `progress` receives the name of
/// each file once it has been handled.
#[instrument(skip_all, fields(content_dir = %store.base_path().display(), questions = questions.len()))]
pub async fn answer_corpora<M, P, F>(
    store: &CorpusStore,
    answerer: &QuestionAnswerer<M, P>,
    questions: &[String],
    file_pacer: &F,
    progress: Option<mpsc::Sender<String>>,
) -> Vec<AnswerRow>
where
    M: LanguageModel,
    P: Pacer,
    F: Pacer,
{
    let files = match store.list().await {
        Ok(files) => files,
        Err(e) => {
            warn!("Cannot list corpus files: {}", e);
            return Vec::new();
        }
    };

    let mut rows = Vec::new();
    for path in files {
        let name = file_name(&path);

        match store.load(&path).await {
            Err(e) => warn!("Skipping {}: {}", name, e),
            Ok(content) if content.trim().is_empty() => {
                info!("Skipping {} due to empty content.", name);
            }
            Ok(content) => {
                file_pacer.ready().await;
                let row = answerer.answer_all(&content, questions).await;
                rows.push(row);
                info!("Processed {}", name);
            }
        }

        if let Some(sender) = &progress {
            // The receiver going away only stops progress reporting.
            let _ = sender.send(name).await;
        }
    }

    rows
}

/// Write `rows` as a table under the question headers.
///
/// Returns `false`, without touching `destination`, when there is nothing to write.
pub fn export_answers(
    rows: &[AnswerRow],
    questions: &[String],
    destination: &Path,
) -> Result<bool> {
    if rows.is_empty() {
        info!("No valid content to save.");
        return Ok(false);
    }

    let cells: Vec<Vec<String>> = rows.iter().map(AnswerRow::cells).collect();
    write_table(&cells, questions, destination)?;
    Ok(true)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
