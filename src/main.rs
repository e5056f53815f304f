//! # company-intel CLI
//!
//! Command-line front end for the crawl and answer passes.
//!
//! ## Subcommands
//!
//! - `crawl`: fetch the seed websites and write one corpus file per company
//! - `answer`: ask the question set of every corpus file and write the table
//! - `run`: `crawl` followed by `answer`
//!
//! Settings come from `company-intel.toml` (or `--config`), with command-line
//! flags taking precedence. The Gemini API key is read from the environment
//! variable named by `answer.api_key_env` (`GEMINI_API_KEY` by default).

mod telemetry;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use company_intel::answer::{GeminiModel, QuestionAnswerer};
use company_intel::config::AppConfig;
use company_intel::crawler::{CorpusStore, Crawler};
use company_intel::gemini::Client;
use company_intel::pacer::GovernorPacer;
use company_intel::pipeline::{answer_corpora, crawl_and_persist, export_answers};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::mpsc;
use tracing::{info, instrument, warn};

#[derive(Parser)]
#[command(author, version, about = "Crawl company websites and profile them with an LLM", long_about = None)]
struct Cli {
    /// Configuration file (default: ./company-intel.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Also write logs to company-intel.log in this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Crawl the seed websites and save one corpus file per company
    Crawl(CrawlArgs),

    /// Answer the question set for every saved corpus and write the table
    Answer(AnswerArgs),

    /// Crawl, then answer
    Run(RunArgs),
}

#[derive(Args, Debug)]
struct CrawlArgs {
    /// Seed URLs (default: the configured seeds)
    seeds: Vec<String>,

    /// Crawl depth; 1 fetches only the seed pages
    #[arg(short, long)]
    depth: Option<u32>,

    /// Directory for corpus files
    #[arg(long)]
    content_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct AnswerArgs {
    /// Directory holding corpus files
    #[arg(long)]
    content_dir: Option<PathBuf>,

    /// Table destination (.xlsx or .csv)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Gemini model to use
    #[arg(short, long)]
    model: Option<String>,
}

#[derive(Args, Debug)]
struct RunArgs {
    #[command(flatten)]
    crawl: CrawlArgs,

    /// Table destination (.xlsx or .csv)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Gemini model to use
    #[arg(short, long)]
    model: Option<String>,
}

impl CrawlArgs {
    fn apply(&self, config: &mut AppConfig) {
        if !self.seeds.is_empty() {
            config.seeds = self.seeds.clone();
        }
        if let Some(depth) = self.depth {
            config.crawl.max_depth = depth;
        }
        if let Some(dir) = &self.content_dir {
            config.crawl.content_dir = dir.clone();
        }
    }
}

impl AnswerArgs {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(dir) = &self.content_dir {
            config.crawl.content_dir = dir.clone();
        }
        if let Some(output) = &self.output {
            config.answer.output = output.clone();
        }
        if let Some(model) = &self.model {
            config.answer.model = model.clone();
        }
    }
}

impl RunArgs {
    fn apply(&self, config: &mut AppConfig) {
        self.crawl.apply(config);
        if let Some(output) = &self.output {
            config.answer.output = output.clone();
        }
        if let Some(model) = &self.model {
            config.answer.model = model.clone();
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _telemetry = telemetry::init_tracing_subscriber(cli.log_dir.as_deref())?;

    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    execute(&cli.command, config).await
}

async fn execute(command: &Commands, mut config: AppConfig) -> anyhow::Result<()> {
    match command {
        Commands::Crawl(args) => {
            args.apply(&mut config);
            crawl_command(&config).await?;
        }
        Commands::Answer(args) => {
            args.apply(&mut config);
            let model = gemini_model(&config)?;
            answer_command(&config, model).await?;
        }
        Commands::Run(args) => {
            args.apply(&mut config);
            // Fail on a missing key before the crawl replaces any corpus files.
            let model = gemini_model(&config)?;
            crawl_command(&config).await?;
            answer_command(&config, model).await?;
        }
    }

    Ok(())
}

/// Gemini model for the configured name, keyed from the configured env var
fn gemini_model(config: &AppConfig) -> anyhow::Result<GeminiModel> {
    let settings = &config.answer;
    let client = Client::from_env(&settings.api_key_env)
        .with_context(|| format!("Set {} to your Gemini API key", settings.api_key_env))?;
    Ok(GeminiModel::new(client, settings.model.clone()).with_generation_config(settings.generation_config()))
}

#[instrument(skip_all)]
async fn crawl_command(config: &AppConfig) -> anyhow::Result<()> {
    let crawler = Crawler::from_config(config.crawl.crawler_config()).context("Failed to build HTTP client")?;
    let store = CorpusStore::new(&config.crawl.content_dir);

    let start_time = std::time::Instant::now();
    let summary = crawl_and_persist(&crawler, &config.seeds, &store).await;

    println!(
        "Crawled {} pages ({} without content) from {} seeds in {:.2?}",
        summary.stats.pages_fetched(),
        summary.stats.pages_empty,
        config.seeds.len(),
        start_time.elapsed()
    );
    if summary.stats.seeds_failed > 0 {
        println!("{} seeds could not be crawled", summary.stats.seeds_failed);
    }
    for file in &summary.files {
        println!("Saved {}", file.display());
    }

    Ok(())
}

#[instrument(skip_all)]
async fn answer_command(config: &AppConfig, model: GeminiModel) -> anyhow::Result<()> {
    let settings = &config.answer;
    let answerer = QuestionAnswerer::new(model, GovernorPacer::from_millis(settings.question_delay_ms));
    let file_pacer = GovernorPacer::from_millis(settings.file_delay_ms);
    let store = CorpusStore::new(&config.crawl.content_dir);

    let total_files = match store.list().await {
        Ok(files) => files.len(),
        Err(e) => {
            warn!("{}", e);
            0
        }
    };
    info!(
        "Answering {} questions for {} corpus files with {}",
        settings.questions.len(),
        total_files,
        settings.model
    );

    // Create a channel for progress updates
    let (progress_sender, mut progress_receiver) = mpsc::channel(100);

    let progress_bar = ProgressBar::new(total_files as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} ({eta}) {msg}")?
            .progress_chars("##-"),
    );
    progress_bar.set_message("Answering questions...");

    let progress_handle = tokio::spawn({
        let progress_bar = progress_bar.clone();
        async move {
            while let Some(file) = progress_receiver.recv().await {
                progress_bar.inc(1);
                progress_bar.set_message(format!("Processed {}", file));
            }
            progress_bar.finish_with_message("Answering completed");
        }
    });

    let rows = answer_corpora(
        &store,
        &answerer,
        &settings.questions,
        &file_pacer,
        Some(progress_sender),
    )
    .await;

    // Ends once the sender moved into answer_corpora is dropped
    let _ = progress_handle.await;

    let failures: usize = rows.iter().map(|row| row.failures()).sum();
    if export_answers(&rows, &settings.questions, &settings.output)? {
        println!(
            "Saved answers for {} companies to {} ({} unanswered questions)",
            rows.len(),
            settings.output.display(),
            failures
        );
    } else {
        println!("No corpus content to answer; nothing written");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    /// Env var no test environment sets
    const UNSET_KEY_VAR: &str = "COMPANY_INTEL_TEST_UNSET_API_KEY";

    fn config_without_key(content_dir: &std::path::Path) -> AppConfig {
        let mut config = AppConfig::default();
        config.answer.api_key_env = UNSET_KEY_VAR.to_string();
        config.crawl.content_dir = content_dir.to_path_buf();
        config
    }

    #[tokio::test]
    async fn test_run_without_api_key_fails_before_crawling() {
        let mut server = Server::new_async().await;
        let site = server
            .mock("GET", mockito::Matcher::Any)
            .with_status(200)
            .with_body("<body><p>fresh</p></body>")
            .expect(0)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let previous = dir.path().join("0.txt");
        std::fs::write(&previous, "Company: 0\n\nearlier crawl").unwrap();

        let seed = format!("{}/", server.url());
        let cli = Cli::parse_from(["company-intel", "run", seed.as_str()]);
        let result = execute(&cli.command, config_without_key(dir.path())).await;

        let err = result.unwrap_err();
        assert!(format!("{:#}", err).contains(UNSET_KEY_VAR));
        site.assert_async().await;
        assert_eq!(std::fs::read_to_string(&previous).unwrap(), "Company: 0\n\nearlier crawl");
    }

    #[tokio::test]
    async fn test_crawl_does_not_need_api_key() {
        let mut server = Server::new_async().await;
        let _site = server
            .mock("GET", "/")
            .with_status(200)
            .with_body("<body><p>fresh</p></body>")
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let seed = format!("{}/", server.url());
        let cli = Cli::parse_from([
            "company-intel",
            "crawl",
            seed.as_str(),
            "--depth",
            "1",
        ]);
        execute(&cli.command, config_without_key(dir.path())).await.unwrap();

        let written = std::fs::read_to_string(dir.path().join("0.txt")).unwrap();
        assert!(written.contains("fresh"));
    }

    #[test]
    fn test_run_flags_override_config() {
        let cli = Cli::parse_from([
            "company-intel",
            "run",
            "https://www.basf.com",
            "--depth",
            "1",
            "--output",
            "answers.csv",
            "--model",
            "gemini-2.0-flash-lite",
        ]);
        let Commands::Run(args) = &cli.command else {
            panic!("Expected run command");
        };

        let mut config = AppConfig::default();
        args.apply(&mut config);
        assert_eq!(config.seeds, vec!["https://www.basf.com"]);
        assert_eq!(config.crawl.max_depth, 1);
        assert_eq!(config.answer.output, PathBuf::from("answers.csv"));
        assert_eq!(config.answer.model, "gemini-2.0-flash-lite");
    }
}
