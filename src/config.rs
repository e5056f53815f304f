//! # Application Configuration
//!
//! Settings live in a TOML file (`company-intel.toml` in the working directory
//! unless another path is given). Every key is optional; missing keys fall back
//! to the defaults below, and CLI flags override the file.
//!
//! The LLM credential is never part of the file: `answer.api_key_env` names the
//! environment variable that holds it.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::answer::{default_questions, DEFAULT_MODEL};
use crate::crawler::storage::DEFAULT_CONTENT_DIR;
use crate::crawler::{CrawlerConfig, DedupPolicy, DEFAULT_USER_AGENT};
use crate::error::{Error, Result};
use crate::gemini::prelude::GenerationConfig;
use crate::table::DEFAULT_OUTPUT;

/// Configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "company-intel.toml";

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Sites to crawl, in order
    #[serde(default = "default_seeds")]
    pub seeds: Vec<String>,

    /// `[crawl]` section
    #[serde(default)]
    pub crawl: CrawlSettings,

    /// `[answer]` section
    #[serde(default)]
    pub answer: AnswerSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            seeds: default_seeds(),
            crawl: CrawlSettings::default(),
            answer: AnswerSettings::default(),
        }
    }
}

fn default_seeds() -> Vec<String> {
    [
        "https://www.gm.com",
        "https://www.mobility.siemens.com",
        "https://www.alibaba.com",
        "https://www.morganstanley.com",
        "https://www.basf.com",
        "https://www.linkedin.com",
        "https://www.salesforce.com",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// `[crawl]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlSettings {
    /// Levels to fetch per seed; 1 fetches only the seed page
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,

    /// Directory receiving `<company>.txt` corpus files
    #[serde(default = "default_content_dir")]
    pub content_dir: PathBuf,

    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Elements stripped before text extraction
    #[serde(default = "default_exclude_tags")]
    pub exclude_tags: Vec<String>,

    /// Minimum spacing between page fetches (0 = none)
    #[serde(default)]
    pub rate_limit_ms: u64,

    /// `global` or `per-seed`
    #[serde(default)]
    pub dedup: DedupPolicy,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            content_dir: default_content_dir(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            exclude_tags: default_exclude_tags(),
            rate_limit_ms: 0,
            dedup: DedupPolicy::default(),
        }
    }
}

fn default_max_depth() -> u32 {
    2
}
fn default_content_dir() -> PathBuf {
    PathBuf::from(DEFAULT_CONTENT_DIR)
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}
fn default_exclude_tags() -> Vec<String> {
    CrawlerConfig::default().exclude_tags
}

impl CrawlSettings {
    /// Crawler configuration described by this section
    pub fn crawler_config(&self) -> CrawlerConfig {
        CrawlerConfig::builder()
            .max_depth(self.max_depth)
            .timeout(Duration::from_secs(self.timeout_secs))
            .user_agent(self.user_agent.clone())
            .exclude_tags(self.exclude_tags.clone())
            .rate_limit_ms(self.rate_limit_ms)
            .dedup(self.dedup)
            .build()
    }
}

/// `[answer]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerSettings {
    /// Gemini model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Name of the env var holding the API key (never store the key itself)
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Minimum spacing between questions
    #[serde(default = "default_question_delay_ms")]
    pub question_delay_ms: u64,

    /// Minimum spacing between corpus files
    #[serde(default = "default_file_delay_ms")]
    pub file_delay_ms: u64,

    /// Table destination; `.xlsx` or `.csv`
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Questions asked of every corpus; also the table's column headers
    #[serde(default = "default_questions")]
    pub questions: Vec<String>,

    /// Sampling temperature; the model default when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Answer length cap in tokens; the model default when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<i32>,
}

impl Default for AnswerSettings {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key_env: default_api_key_env(),
            question_delay_ms: default_question_delay_ms(),
            file_delay_ms: default_file_delay_ms(),
            output: default_output(),
            questions: default_questions(),
            temperature: None,
            max_output_tokens: None,
        }
    }
}

impl AnswerSettings {
    /// Generation settings to send, or `None` to use the model defaults
    pub fn generation_config(&self) -> Option<GenerationConfig> {
        if self.temperature.is_none() && self.max_output_tokens.is_none() {
            return None;
        }
        Some(GenerationConfig {
            temperature: self.temperature,
            max_output_tokens: self.max_output_tokens,
        })
    }
}

fn default_model() -> String {
    DEFAULT_MODEL.into()
}
fn default_api_key_env() -> String {
    "GEMINI_API_KEY".into()
}
fn default_question_delay_ms() -> u64 {
    4000
}
fn default_file_delay_ms() -> u64 {
    5000
}
fn default_output() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT)
}

impl AppConfig {
    /// Parse a config from TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| Error::Config(format!("invalid TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load the config from `path`, from `company-intel.toml` in the working
    /// directory if no path is given and that file exists, or use defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let local = PathBuf::from(CONFIG_FILE_NAME);
                if !local.exists() {
                    debug!("No {} found, using defaults", CONFIG_FILE_NAME);
                    return Ok(Self::default());
                }
                local
            }
        };

        let text = std::fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        debug!("Loaded configuration from {}", path.display());
        Self::from_toml(&text)
    }

    fn validate(&self) -> Result<()> {
        if self.answer.questions.is_empty() {
            return Err(Error::Config("answer.questions must not be empty".into()));
        }
        if self.answer.api_key_env.trim().is_empty() {
            return Err(Error::Config("answer.api_key_env must name a variable".into()));
        }
        if self.answer.max_output_tokens.is_some_and(|tokens| tokens <= 0) {
            return Err(Error::Config("answer.max_output_tokens must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.seeds.len(), 7);
        assert_eq!(config.seeds[0], "https://www.gm.com");
        assert_eq!(config.crawl.max_depth, 2);
        assert_eq!(config.crawl.content_dir, PathBuf::from("website_contents"));
        assert_eq!(config.answer.model, "gemini-2.0-flash");
        assert_eq!(config.answer.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.answer.questions.len(), 6);
        assert_eq!(config.answer.output, PathBuf::from("company_info.xlsx"));
    }

    #[test]
    fn test_empty_file_is_all_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config.seeds, AppConfig::default().seeds);
        assert_eq!(config.answer.question_delay_ms, 4000);
        assert_eq!(config.answer.file_delay_ms, 5000);
    }

    #[test]
    fn test_partial_overrides() {
        let config = AppConfig::from_toml(
            r#"
            seeds = ["https://www.basf.com"]

            [crawl]
            max_depth = 1
            dedup = "per-seed"

            [answer]
            output = "answers.csv"
            questions = ["Where is HQ?"]
            "#,
        )
        .unwrap();

        assert_eq!(config.seeds, vec!["https://www.basf.com"]);
        assert_eq!(config.crawl.max_depth, 1);
        assert_eq!(config.crawl.dedup, DedupPolicy::PerSeed);
        assert_eq!(config.crawl.timeout_secs, 10);
        assert_eq!(config.answer.output, PathBuf::from("answers.csv"));
        assert_eq!(config.answer.questions, vec!["Where is HQ?"]);
        assert_eq!(config.answer.model, "gemini-2.0-flash");
    }

    #[test]
    fn test_crawler_config_from_settings() {
        let settings = CrawlSettings {
            timeout_secs: 3,
            rate_limit_ms: 100,
            ..CrawlSettings::default()
        };
        let crawler = settings.crawler_config();
        assert_eq!(crawler.timeout, Duration::from_secs(3));
        assert_eq!(crawler.rate_limit_ms, 100);
        assert_eq!(crawler.max_depth, 2);
    }

    #[test]
    fn test_generation_settings() {
        assert!(AppConfig::default().answer.generation_config().is_none());

        let config = AppConfig::from_toml("[answer]\ntemperature = 0.2\nmax_output_tokens = 1024").unwrap();
        let generation = config.answer.generation_config().unwrap();
        assert_eq!(generation.temperature, Some(0.2));
        assert_eq!(generation.max_output_tokens, Some(1024));

        assert!(matches!(
            AppConfig::from_toml("[answer]\nmax_output_tokens = 0"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_invalid_configs() {
        assert!(matches!(AppConfig::from_toml("seeds = 3"), Err(Error::Config(_))));
        assert!(matches!(
            AppConfig::from_toml("[answer]\nquestions = []"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            AppConfig::from_toml("[crawl]\ndedup = \"sometimes\""),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[crawl]\nmax_depth = 3").unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.crawl.max_depth, 3);

        let missing = AppConfig::load(Some(Path::new("/definitely/not/here.toml")));
        assert!(matches!(missing, Err(Error::Config(_))));
    }
}
