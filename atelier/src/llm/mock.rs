//! Mock model for tests: scripted replies, recorded prompts.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::ChainError;
use crate::llm::{ModelClient, ModelReply};

/// One recorded `generate` call.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub prompt: String,
    pub temperature: f32,
}

/// Mock model: returns scripted replies in order and records every call.
///
/// Chain tests script seven replies (one per model step) and then assert on
/// the recorded prompts and temperatures. When the script runs out, the last
/// reply repeats.
pub struct MockModel {
    replies: Vec<String>,
    cursor: AtomicUsize,
    calls: Mutex<Vec<RecordedCall>>,
    fail: bool,
}

impl MockModel {
    /// Scripted replies, one per expected call.
    pub fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: replies.into_iter().map(Into::into).collect(),
            cursor: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    /// A single reply repeated for every call.
    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self::with_replies([reply.into()])
    }

    /// A mock that fails every call with a transport error.
    pub fn failing() -> Self {
        Self {
            replies: Vec::new(),
            cursor: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// Prompts and temperatures seen so far, in call order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ModelClient for MockModel {
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<ModelReply, ChainError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                prompt: prompt.to_string(),
                temperature,
            });
        }
        if self.fail {
            return Err(ChainError::Http("mock transport failure".to_string()));
        }
        let n = self.cursor.fetch_add(1, Ordering::SeqCst);
        let idx = n.min(self.replies.len().saturating_sub(1));
        match self.replies.get(idx) {
            Some(text) => Ok(ModelReply {
                text: text.clone(),
                usage: None,
            }),
            None => Err(ChainError::EmptyReply),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replies_come_back_in_script_order_then_repeat() {
        let mock = MockModel::with_replies(["first", "second"]);
        assert_eq!(mock.generate("a", 0.1).await.unwrap().text, "first");
        assert_eq!(mock.generate("b", 0.2).await.unwrap().text, "second");
        assert_eq!(mock.generate("c", 0.3).await.unwrap().text, "second");
    }

    #[tokio::test]
    async fn calls_are_recorded_with_temperature() {
        let mock = MockModel::with_reply("{}");
        mock.generate("hello", 0.85).await.unwrap();
        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].prompt, "hello");
        assert!((calls[0].temperature - 0.85).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn failing_mock_returns_transport_error() {
        let mock = MockModel::failing();
        let err = mock.generate("x", 0.5).await.unwrap_err();
        assert!(matches!(err, ChainError::Http(_)));
        assert_eq!(mock.calls().len(), 1);
    }

    #[tokio::test]
    async fn empty_script_returns_empty_reply_error() {
        let mock = MockModel::with_replies(Vec::<String>::new());
        let err = mock.generate("x", 0.5).await.unwrap_err();
        assert!(matches!(err, ChainError::EmptyReply));
    }
}
