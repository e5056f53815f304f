//! # Question Answering over Company Corpora
//!
//! Asks a fixed list of business-profile questions about one company corpus,
//! one model call per question. A failing question never fails the batch: its
//! slot in the row holds a typed [`AnswerError`] that renders as a fixed
//! placeholder in the exported table.
//!
//! Calls are paced by an injected [`Pacer`], so quota handling is a
//! dependency rather than sleeps sprinkled through the loop.

mod backend;
mod error;
#[cfg(test)]
pub(crate) mod mock_model;

use tracing::{debug, info, instrument, warn};

pub use backend::{classify_response, GeminiModel, LanguageModel, DEFAULT_MODEL};
pub use error::AnswerError;

use crate::pacer::Pacer;

/// The business-profile questions asked when none are configured.
pub const DEFAULT_QUESTIONS: [&str; 6] = [
    "What is the company's mission statement or core values?",
    "What products or services does the company offer?",
    "When was the company founded, and who were the founders?",
    "Where is the company's headquarters located?",
    "Who are the key executives or leadership team members?",
    "Has the company received any notable awards or recognitions?",
];

/// The default question set as owned strings.
pub fn default_questions() -> Vec<String> {
    DEFAULT_QUESTIONS.iter().map(|q| q.to_string()).collect()
}

/// Build the prompt sent for one question about one corpus.
pub fn build_prompt(corpus: &str, question: &str) -> String {
    format!(
        "Given the following company information:\n{}\n\nAnswer the following question: {}",
        corpus, question
    )
}

/// Answers for one corpus, positionally aligned with the question set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerRow {
    answers: Vec<Result<String, AnswerError>>,
}

impl AnswerRow {
    pub fn new(answers: Vec<Result<String, AnswerError>>) -> Self {
        Self { answers }
    }

    pub fn answers(&self) -> &[Result<String, AnswerError>] {
        &self.answers
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// Number of questions that did not get an answer
    pub fn failures(&self) -> usize {
        self.answers.iter().filter(|a| a.is_err()).count()
    }

    /// Table cells: the answer text, or the failure's placeholder.
    pub fn cells(&self) -> Vec<String> {
        self.answers
            .iter()
            .map(|answer| match answer {
                Ok(text) => text.clone(),
                Err(e) => e.placeholder(),
            })
            .collect()
    }
}

/// Asks every question of a corpus through a `LanguageModel`.
pub struct QuestionAnswerer<M, P> {
    model: M,
    pacer: P,
}

impl<M: LanguageModel, P: Pacer> QuestionAnswerer<M, P> {
    /// `pacer` is awaited before every model call.
    pub fn new(model: M, pacer: P) -> Self {
        Self { model, pacer }
    }

    /// Ask every question about `corpus`, in order.
    ///
    /// Always returns exactly one entry per question.
    #[instrument(skip_all, fields(corpus_len = corpus.len(), questions = questions.len()))]
    pub async fn answer_all(&self, corpus: &str, questions: &[String]) -> AnswerRow {
        let mut answers = Vec::with_capacity(questions.len());

        for (index, question) in questions.iter().enumerate() {
            self.pacer.ready().await;

            let prompt = build_prompt(corpus, question);
            let answer = self.model.generate(&prompt).await;
            match &answer {
                Ok(text) => debug!(question = index + 1, "Answered with {} bytes", text.len()),
                Err(e) => warn!(question = index + 1, "No answer: {}", e),
            }
            answers.push(answer);
        }

        let row = AnswerRow::new(answers);
        info!(
            answered = row.len() - row.failures(),
            failed = row.failures(),
            "Finished question set"
        );
        row
    }
}
