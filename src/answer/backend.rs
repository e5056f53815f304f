//! Language model backends for the answer module

use std::future::Future;

use tracing::{debug, instrument, warn};

use crate::answer::error::AnswerError;
use crate::gemini::prelude::{Content, GenerateContentResponse, GenerationConfig};
use crate::gemini::Client;

/// Default Gemini model used for answering
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// A model that turns one prompt into one answer.
pub trait LanguageModel {
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, AnswerError>> + Send;
}

impl<M: LanguageModel + Sync> LanguageModel for &M {
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, AnswerError>> + Send {
        (**self).generate(prompt)
    }
}

/// `LanguageModel` backed by the Gemini API.
#[derive(Debug, Clone)]
pub struct GeminiModel {
    client: Client,
    model: String,
    generation_config: Option<GenerationConfig>,
}

impl GeminiModel {
    pub fn new(client: Client, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            generation_config: None,
        }
    }

    /// Send `config` with every request instead of the API defaults.
    pub fn with_generation_config(mut self, config: Option<GenerationConfig>) -> Self {
        self.generation_config = config;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl LanguageModel for GeminiModel {
    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
    async fn generate(&self, prompt: &str) -> Result<String, AnswerError> {
        let content = Content::new().with_role("user").with_text(prompt);
        let response = self
            .client
            .models()
            .generate_content(&self.model, self.generation_config.clone(), vec![content])
            .await
            .map_err(|e| {
                warn!("Model request failed: {}", e);
                AnswerError::from(e)
            })?;

        classify_response(&response)
    }
}

/// Turn a raw Gemini response into an answer or a typed failure.
pub fn classify_response(response: &GenerateContentResponse) -> Result<String, AnswerError> {
    if let Some(reason) = response.block_reason() {
        debug!("Prompt blocked: {}", reason);
        return Err(AnswerError::Blocked {
            reason: reason.to_string(),
        });
    }

    let candidate = response.candidates.first().ok_or(AnswerError::NoCandidates)?;
    let text = candidate.text();
    let text = text.trim();

    if text.is_empty() {
        if let Some(reason) = candidate.finish_reason.as_ref().filter(|r| r.is_policy_block()) {
            debug!("Candidate withheld: {:?}", reason);
            return Err(AnswerError::Blocked {
                reason: format!("{:?}", reason),
            });
        }
        return Err(AnswerError::EmptyResponse);
    }

    Ok(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn parse(json: &str) -> GenerateContentResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_answer_is_trimmed() {
        let response = parse(
            r#"{"candidates": [{"content": {"parts": [{"text": "  Detroit, Michigan.\n"}]}, "finishReason": "STOP"}]}"#,
        );
        assert_eq!(classify_response(&response).unwrap(), "Detroit, Michigan.");
    }

    #[test]
    fn test_recitation_is_blocked() {
        let response = parse(r#"{"candidates": [{"finishReason": "RECITATION"}]}"#);
        assert!(matches!(
            classify_response(&response),
            Err(AnswerError::Blocked { reason }) if reason == "Recitation"
        ));
    }

    #[test]
    fn test_prompt_block_is_blocked() {
        let response = parse(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#);
        assert!(matches!(classify_response(&response), Err(AnswerError::Blocked { .. })));
    }

    #[test]
    fn test_no_candidates() {
        let response = parse(r#"{"candidates": []}"#);
        assert_eq!(classify_response(&response), Err(AnswerError::NoCandidates));
    }

    #[test]
    fn test_empty_text() {
        let response = parse(
            r#"{"candidates": [{"content": {"parts": [{"text": "   "}]}, "finishReason": "STOP"}]}"#,
        );
        assert_eq!(classify_response(&response), Err(AnswerError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_gemini_model_round_trip() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/gemini-2.0-flash:generateContent")
            .match_query(mockito::Matcher::UrlEncoded("key".into(), "test-key".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"candidates": [{"content": {"parts": [{"text": "Mary Barra"}]}}]}"#)
            .expect(1)
            .create_async()
            .await;

        let client = Client::with_api_key("test-key").unwrap().with_base_url(server.url());
        let model = GeminiModel::new(client, DEFAULT_MODEL);

        assert_eq!(model.generate("Who leads GM?").await.unwrap(), "Mary Barra");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_gemini_model_sends_generation_config() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/gemini-2.0-flash:generateContent")
            .match_query(mockito::Matcher::Any)
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "generationConfig": {"maxOutputTokens": 512}
            })))
            .with_status(200)
            .with_body(r#"{"candidates": [{"content": {"parts": [{"text": "Detroit"}]}}]}"#)
            .expect(1)
            .create_async()
            .await;

        let client = Client::with_api_key("test-key").unwrap().with_base_url(server.url());
        let model = GeminiModel::new(client, DEFAULT_MODEL).with_generation_config(Some(GenerationConfig {
            temperature: None,
            max_output_tokens: Some(512),
        }));

        assert_eq!(model.generate("Where is HQ?").await.unwrap(), "Detroit");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_gemini_model_server_error_is_transport() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1beta/models/gemini-2.0-flash:generateContent")
            .match_query(mockito::Matcher::Any)
            .with_status(503)
            .with_body("overloaded")
            .create_async()
            .await;

        let client = Client::with_api_key("test-key").unwrap().with_base_url(server.url());
        let model = GeminiModel::new(client, DEFAULT_MODEL);

        let err = model.generate("anything").await.unwrap_err();
        assert!(matches!(err, AnswerError::Transport(_)));
        assert!(err.placeholder().starts_with("Error: "));
    }
}
