//! Asynchronous text-prompt collaborator
//!
//! Free-text overlays need content from the user. The prompt is injected
//! and replaceable; implementations must never block — the engine awaits
//! the returned future, and a cancelled response is not an error.

use futures::future::BoxFuture;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptResponse {
    Text(String),
    Cancelled,
}

pub trait TextPrompt {
    fn request_text(&self, message: &str, default_value: &str) -> BoxFuture<'static, PromptResponse>;
}

/// Prompt that always answers with a fixed response. Useful for tests and
/// headless hosts.
pub struct StaticPrompt {
    response: PromptResponse,
}

impl StaticPrompt {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            response: PromptResponse::Text(text.into()),
        }
    }

    pub fn cancelled() -> Self {
        Self {
            response: PromptResponse::Cancelled,
        }
    }
}

impl TextPrompt for StaticPrompt {
    fn request_text(&self, _message: &str, _default_value: &str) -> BoxFuture<'static, PromptResponse> {
        let response = self.response.clone();
        Box::pin(async move { response })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_prompt_resolves() {
        let prompt = StaticPrompt::text("note");
        let response = futures::executor::block_on(prompt.request_text("Annotation text", ""));
        assert_eq!(response, PromptResponse::Text("note".to_string()));
    }
}
