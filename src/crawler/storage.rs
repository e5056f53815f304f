//! Corpus files on disk.
//!
//! One text file per company, `<content_dir>/<company>.txt`, starting with a
//! `Company: <company>` header followed by the accumulated page blocks.
//! Writing a corpus always replaces the previous file.

use std::{io, path::Path, path::PathBuf};

use tokio::fs;
use tracing::{debug, info};

use super::{CompanyId, Corpus};

/// Default directory for corpus files
pub const DEFAULT_CONTENT_DIR: &str = "website_contents";

/// Error type for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Not found: {0}")]
    NotFound(String),
}

type Result<T> = std::result::Result<T, StorageError>;

/// Storage manager for company corpora
#[derive(Debug, Clone)]
pub struct CorpusStore {
    base_path: PathBuf,
}

impl Default for CorpusStore {
    fn default() -> Self {
        Self::new(DEFAULT_CONTENT_DIR)
    }
}

impl CorpusStore {
    /// Create a store rooted at `base_path`
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Path of the corpus file for `company`
    pub fn path_for(&self, company: &CompanyId) -> PathBuf {
        self.base_path.join(format!("{}.txt", company))
    }

    /// Write the corpus of `company`, replacing any earlier file
    pub async fn persist(&self, company: &CompanyId, corpus: &Corpus) -> Result<PathBuf> {
        fs::create_dir_all(&self.base_path).await?;

        let path = self.path_for(company);
        let contents = format!("Company: {}\n\n{}", company, corpus.text());
        fs::write(&path, contents).await?;

        info!("Saved content for {} to {}", company, path.display());
        Ok(path)
    }

    /// All corpus files in the store, sorted by file name
    pub async fn list(&self) -> Result<Vec<PathBuf>> {
        if !fs::try_exists(&self.base_path).await? {
            return Err(StorageError::NotFound(format!(
                "Content directory {} does not exist",
                self.base_path.display()
            )));
        }

        let mut files = Vec::new();
        let mut dir_entries = fs::read_dir(&self.base_path).await?;
        while let Some(entry) = dir_entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "txt") && entry.file_type().await?.is_file() {
                files.push(path);
            }
        }
        files.sort();

        debug!("Found {} corpus files in {}", files.len(), self.base_path.display());
        Ok(files)
    }

    /// Read one corpus file
    pub async fn load(&self, path: &Path) -> Result<String> {
        match fs::read_to_string(path).await {
            Ok(contents) => Ok(contents),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(StorageError::NotFound(format!(
                "File '{}' not found",
                path.display()
            ))),
            Err(e) => Err(StorageError::Io(e)),
        }
    }
}
