use async_trait::async_trait;
use crate::types::{LLMError, LLMRequest, LLMResponse};

/// A model backend able to answer a single structured completion request.
#[async_trait]
pub trait LLMAdapter: Send + Sync {
    async fn create_chat_completion(&self, request: &LLMRequest) -> Result<LLMResponse, LLMError>;

    /// Host and port the adapter talks to, used for reachability probing
    fn endpoint(&self) -> Option<(String, u16)> {
        None
    }
}
