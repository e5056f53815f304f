//! # Mock Language Model for Testing
//!
//! Provides a `MockModel` that implements `LanguageModel` without network
//! access. Responses are queued up front and handed out in order; every prompt
//! received is recorded for later inspection.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::answer::backend::LanguageModel;
use crate::answer::error::AnswerError;

/// A scripted model for tests.
#[derive(Debug, Clone, Default)]
pub struct MockModel {
    responses: Arc<Mutex<VecDeque<Result<String, AnswerError>>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one response; calls beyond the queue get an empty response error.
    pub fn push(&self, response: Result<String, AnswerError>) -> &Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    /// Queue a successful text answer.
    pub fn push_text(&self, text: &str) -> &Self {
        self.push(Ok(text.to_string()))
    }

    /// Every prompt received so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl LanguageModel for MockModel {
    async fn generate(&self, prompt: &str) -> Result<String, AnswerError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(AnswerError::EmptyResponse))
    }
}
