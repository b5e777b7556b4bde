//! Trait abstractions for runtime I/O
//!
//! The gateway trait enables testing the executor with mock
//! implementations.

use crate::api::{ApiClient, ApiError, Conversation, ConversationDetail, Document};
use async_trait::async_trait;
use std::sync::Arc;

/// The remote operations the store runtime depends on.
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn list_conversations(&self) -> Result<Vec<Conversation>, ApiError>;

    async fn get_conversation(
        &self,
        conversation_id: &str,
    ) -> Result<ConversationDetail, ApiError>;

    async fn create_conversation(&self) -> Result<Conversation, ApiError>;

    /// Fire and forget; callers refetch the detail to observe the reply.
    async fn post_message(&self, conversation_id: &str, prompt: &str) -> Result<(), ApiError>;

    async fn list_documents(&self) -> Result<Vec<Document>, ApiError>;
}

#[async_trait]
impl<T: Gateway + ?Sized> Gateway for Arc<T> {
    async fn list_conversations(&self) -> Result<Vec<Conversation>, ApiError> {
        (**self).list_conversations().await
    }

    async fn get_conversation(
        &self,
        conversation_id: &str,
    ) -> Result<ConversationDetail, ApiError> {
        (**self).get_conversation(conversation_id).await
    }

    async fn create_conversation(&self) -> Result<Conversation, ApiError> {
        (**self).create_conversation().await
    }

    async fn post_message(&self, conversation_id: &str, prompt: &str) -> Result<(), ApiError> {
        (**self).post_message(conversation_id, prompt).await
    }

    async fn list_documents(&self) -> Result<Vec<Document>, ApiError> {
        (**self).list_documents().await
    }
}

// ============================================================================
// Production adapter
// ============================================================================

#[async_trait]
impl Gateway for ApiClient {
    async fn list_conversations(&self) -> Result<Vec<Conversation>, ApiError> {
        ApiClient::list_conversations(self).await
    }

    async fn get_conversation(
        &self,
        conversation_id: &str,
    ) -> Result<ConversationDetail, ApiError> {
        ApiClient::get_conversation(self, conversation_id).await
    }

    async fn create_conversation(&self) -> Result<Conversation, ApiError> {
        ApiClient::create_conversation(self).await
    }

    async fn post_message(&self, conversation_id: &str, prompt: &str) -> Result<(), ApiError> {
        ApiClient::post_message(self, conversation_id, prompt).await
    }

    async fn list_documents(&self) -> Result<Vec<Document>, ApiError> {
        ApiClient::list_documents(self).await
    }
}
