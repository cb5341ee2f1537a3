//! The text-completion seam.
//!
//! The board only ever needs "prompt in, text out". Anything that can do
//! that implements [`CompletionBackend`]; the Claude client is the
//! production implementation and [`crate::testing::MockBackend`] the
//! scripted one.

use async_trait::async_trait;
use claude::{Claude, Request};
use std::time::Duration;
use thiserror::Error;

/// Failure of a single completion call.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion service error: {0}")]
    Client(#[from] claude::Error),

    #[error("completion timed out after {0:?}")]
    Timeout(Duration),

    #[error("completion backend unavailable: {0}")]
    Unavailable(String),
}

/// Sampling knobs forwarded with every call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionParams {
    pub max_tokens: usize,
    pub temperature: Option<f32>,
}

impl Default for CompletionParams {
    fn default() -> Self {
        Self {
            max_tokens: 2048,
            temperature: Some(0.7),
        }
    }
}

/// A service that turns a prompt into generated text.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Run one completion with `model` and return the full text.
    async fn complete(
        &self,
        model: &str,
        prompt: &str,
        params: CompletionParams,
    ) -> Result<String, CompletionError>;
}

#[async_trait]
impl CompletionBackend for Claude {
    async fn complete(
        &self,
        model: &str,
        prompt: &str,
        params: CompletionParams,
    ) -> Result<String, CompletionError> {
        let mut request = Request::prompt(prompt)
            .with_model(model)
            .with_max_tokens(params.max_tokens);
        if let Some(temp) = params.temperature {
            request = request.with_temperature(temp);
        }

        let response = Claude::complete(self, request).await?;
        tracing::debug!(
            model = %response.model,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "completion finished"
        );
        Ok(response.text())
    }
}

#[async_trait]
impl<B: CompletionBackend + ?Sized> CompletionBackend for std::sync::Arc<B> {
    async fn complete(
        &self,
        model: &str,
        prompt: &str,
        params: CompletionParams,
    ) -> Result<String, CompletionError> {
        (**self).complete(model, prompt, params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params() {
        let params = CompletionParams::default();
        assert_eq!(params.max_tokens, 2048);
        assert_eq!(params.temperature, Some(0.7));
    }

    #[test]
    fn test_error_messages() {
        let err = CompletionError::Timeout(Duration::from_secs(5));
        assert_eq!(err.to_string(), "completion timed out after 5s");

        let err: CompletionError = claude::Error::NoApiKey.into();
        assert!(err.to_string().contains("API key not configured"));
    }
}
