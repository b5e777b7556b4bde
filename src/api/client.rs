//! HTTP client for the document-chat service

use super::error::ApiError;
use super::types::{
    Conversation, ConversationDetail, ConversationEnvelope, Document, PostMessageRequest,
};
use crate::auth::TokenProvider;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Authenticated client for the remote API.
///
/// Every call carries a bearer token from the [`TokenProvider`]. No
/// operation retries; retry policy, if any, belongs to the caller.
pub struct ApiClient {
    http: Client,
    base_url: String,
    tokens: Arc<dyn TokenProvider>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, tokens: Arc<dyn TokenProvider>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: Client::new(),
            base_url,
            tokens,
        }
    }

    pub async fn list_conversations(&self) -> Result<Vec<Conversation>, ApiError> {
        self.get_json("conversations").await
    }

    pub async fn get_conversation(
        &self,
        conversation_id: &str,
    ) -> Result<ConversationDetail, ApiError> {
        let envelope: ConversationEnvelope = self
            .get_json(&format!("conversations/{conversation_id}"))
            .await?;
        Ok(envelope.conversation)
    }

    pub async fn create_conversation(&self) -> Result<Conversation, ApiError> {
        let body = self.post("conversations", None).await?;
        serde_json::from_str(&body)
            .map_err(|e| ApiError::unknown(format!("Failed to parse create response: {e}")))
    }

    pub async fn post_message(&self, conversation_id: &str, prompt: &str) -> Result<(), ApiError> {
        // Fire and forget: the response body (the assistant's reply text)
        // is not consumed; callers refetch the detail to observe it.
        let payload = serde_json::to_value(PostMessageRequest { prompt })
            .map_err(|e| ApiError::unknown(format!("Failed to encode prompt: {e}")))?;
        self.post(&format!("conversations/{conversation_id}"), Some(payload))
            .await?;
        Ok(())
    }

    pub async fn list_documents(&self) -> Result<Vec<Document>, ApiError> {
        self.get_json("documents").await
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let token = self.tokens.bearer_token().await?;
        let response = self
            .http
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(ApiError::from_status(status.as_u16(), &body));
        }

        serde_json::from_str(&body)
            .map_err(|e| ApiError::unknown(format!("Failed to parse response: {e} - body: {body}")))
    }

    async fn post(
        &self,
        path: &str,
        payload: Option<serde_json::Value>,
    ) -> Result<String, ApiError> {
        let token = self.tokens.bearer_token().await?;
        let mut request = self.http.post(self.url(path)).bearer_auth(token);
        if let Some(payload) = payload {
            request = request.json(&payload);
        }

        let response = request.send().await.map_err(transport_error)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(ApiError::from_status(status.as_u16(), &body));
        }

        Ok(body)
    }
}

fn transport_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::network(format!("Request timeout: {e}"))
    } else if e.is_connect() {
        ApiError::network(format!("Connection failed: {e}"))
    } else {
        ApiError::unknown(format!("Request failed: {e}"))
    }
}
