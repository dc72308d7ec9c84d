//! Model client abstraction for the chain steps.
//!
//! Each step sends exactly one prompt and reads back one reply, so the seam
//! is a single `generate` call. Implementations: [`GeminiClient`] (real API)
//! and [`MockModel`] (scripted replies for tests).

mod gemini;
mod mock;

pub use gemini::GeminiClient;
pub use mock::MockModel;

use async_trait::async_trait;

use crate::error::ChainError;

/// Token usage for one model call, when the endpoint reports it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Reply from one model call: the text plus optional token accounting.
#[derive(Clone, Debug, Default)]
pub struct ModelReply {
    pub text: String,
    pub usage: Option<TokenUsage>,
}

/// A text-generation backend: one prompt in, one reply out.
///
/// The chain drives seven of these calls per run, each with its own
/// temperature. Replies are expected to be JSON; parsing and recovery happen
/// in the chain, not here.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Sends one prompt at the given sampling temperature.
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<ModelReply, ChainError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct StubModel {
        text: String,
    }

    #[async_trait]
    impl ModelClient for StubModel {
        async fn generate(
            &self,
            _prompt: &str,
            _temperature: f32,
        ) -> Result<ModelReply, ChainError> {
            Ok(ModelReply {
                text: self.text.clone(),
                usage: None,
            })
        }
    }

    #[tokio::test]
    async fn trait_object_dispatch_works() {
        let model: Arc<dyn ModelClient> = Arc::new(StubModel {
            text: "{}".to_string(),
        });
        let reply = model.generate("hello", 0.4).await.unwrap();
        assert_eq!(reply.text, "{}");
        assert!(reply.usage.is_none());
    }
}
