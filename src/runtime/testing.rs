//! Mock gateway implementations for testing
//!
//! These mocks enable integration testing of the runtime without real I/O.

use super::traits::Gateway;
use super::{StoreHandle, StoreRuntime, StoreUpdate};
use crate::api::{ApiError, Conversation, ConversationDetail, Document};
use crate::store::{Event, StoreState};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::sync::Notify;

// ============================================================================
// Mock Gateway
// ============================================================================

/// Mock gateway that returns queued responses. Detail responses are queued
/// per conversation id so interleaved fetches stay unambiguous.
#[derive(Default)]
pub struct MockGateway {
    conversations: Mutex<VecDeque<Result<Vec<Conversation>, ApiError>>>,
    details: Mutex<HashMap<String, VecDeque<Result<ConversationDetail, ApiError>>>>,
    created: Mutex<VecDeque<Result<Conversation, ApiError>>>,
    posts: Mutex<VecDeque<Result<(), ApiError>>>,
    documents: Mutex<VecDeque<Result<Vec<Document>, ApiError>>>,
    /// Record of all operations performed, e.g. `"get_conversation c-1"`.
    pub calls: Mutex<Vec<String>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_conversations(&self, result: Result<Vec<Conversation>, ApiError>) {
        self.conversations.lock().unwrap().push_back(result);
    }

    pub fn queue_detail(&self, conversation_id: &str, result: Result<ConversationDetail, ApiError>) {
        self.details
            .lock()
            .unwrap()
            .entry(conversation_id.to_string())
            .or_default()
            .push_back(result);
    }

    pub fn queue_created(&self, result: Result<Conversation, ApiError>) {
        self.created.lock().unwrap().push_back(result);
    }

    pub fn queue_post(&self, result: Result<(), ApiError>) {
        self.posts.lock().unwrap().push_back(result);
    }

    pub fn queue_documents(&self, result: Result<Vec<Document>, ApiError>) {
        self.documents.lock().unwrap().push_back(result);
    }

    pub fn recorded_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

#[async_trait]
impl Gateway for MockGateway {
    async fn list_conversations(&self) -> Result<Vec<Conversation>, ApiError> {
        self.record("list_conversations");
        self.conversations
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::network("No mock response queued")))
    }

    async fn get_conversation(
        &self,
        conversation_id: &str,
    ) -> Result<ConversationDetail, ApiError> {
        self.record(format!("get_conversation {conversation_id}"));
        self.details
            .lock()
            .unwrap()
            .get_mut(conversation_id)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Err(ApiError::not_found(format!("No mock detail: {conversation_id}"))))
    }

    async fn create_conversation(&self) -> Result<Conversation, ApiError> {
        self.record("create_conversation");
        self.created
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::network("No mock response queued")))
    }

    async fn post_message(&self, conversation_id: &str, prompt: &str) -> Result<(), ApiError> {
        self.record(format!("post_message {conversation_id} {prompt}"));
        self.posts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::network("No mock response queued")))
    }

    async fn list_documents(&self) -> Result<Vec<Document>, ApiError> {
        self.record("list_documents");
        self.documents
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::network("No mock response queued")))
    }
}

// ============================================================================
// Delayed Mock Gateway (for race orchestration)
// ============================================================================

/// Mock gateway whose detail fetches take a queued per-call delay. Used to
/// reproduce the stale-fetch interleaving deterministically.
pub struct DelayedMockGateway {
    inner: MockGateway,
    detail_delays: Mutex<VecDeque<Duration>>,
    /// Signalled when a detail fetch starts (stores a permit, so awaiting
    /// after the fetch already started does not hang).
    pub detail_started: Arc<Notify>,
}

impl DelayedMockGateway {
    pub fn new(inner: MockGateway) -> Self {
        Self {
            inner,
            detail_delays: Mutex::new(VecDeque::new()),
            detail_started: Arc::new(Notify::new()),
        }
    }

    pub fn queue_detail_delay(&self, delay: Duration) {
        self.detail_delays.lock().unwrap().push_back(delay);
    }
}

#[async_trait]
impl Gateway for DelayedMockGateway {
    async fn list_conversations(&self) -> Result<Vec<Conversation>, ApiError> {
        self.inner.list_conversations().await
    }

    async fn get_conversation(
        &self,
        conversation_id: &str,
    ) -> Result<ConversationDetail, ApiError> {
        let delay = self
            .detail_delays
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Duration::ZERO);
        self.detail_started.notify_one();
        tokio::time::sleep(delay).await;
        self.inner.get_conversation(conversation_id).await
    }

    async fn create_conversation(&self) -> Result<Conversation, ApiError> {
        self.inner.create_conversation().await
    }

    async fn post_message(&self, conversation_id: &str, prompt: &str) -> Result<(), ApiError> {
        self.inner.post_message(conversation_id, prompt).await
    }

    async fn list_documents(&self) -> Result<Vec<Document>, ApiError> {
        self.inner.list_documents().await
    }
}

// ============================================================================
// Test Harness
// ============================================================================

/// Wraps a spawned runtime with subscription helpers.
pub struct TestHarness {
    pub handle: StoreHandle,
    pub update_rx: broadcast::Receiver<StoreUpdate>,
}

impl TestHarness {
    pub fn start<G: Gateway + 'static>(gateway: G) -> Self {
        let handle = StoreRuntime::spawn(gateway);
        let update_rx = handle.subscribe();
        Self { handle, update_rx }
    }

    pub async fn send(&self, event: Event) {
        self.handle.send(event).await;
    }

    /// Wait until a broadcast snapshot satisfies the predicate.
    pub async fn wait_for_state<F>(&mut self, timeout: Duration, pred: F) -> Option<StoreState>
    where
        F: Fn(&StoreState) -> bool,
    {
        let deadline = tokio::time::Instant::now() + timeout;
        while tokio::time::Instant::now() < deadline {
            match tokio::time::timeout(Duration::from_millis(50), self.update_rx.recv()).await {
                Ok(Ok(StoreUpdate::State(state))) if pred(&state) => return Some(state),
                Ok(Ok(_)) => continue,
                Ok(Err(broadcast::error::RecvError::Lagged(_))) => continue,
                Ok(Err(broadcast::error::RecvError::Closed)) => return None,
                Err(_) => continue,
            }
        }
        None
    }

    pub async fn wait_for_navigation(&mut self, timeout: Duration) -> Option<String> {
        let deadline = tokio::time::Instant::now() + timeout;
        while tokio::time::Instant::now() < deadline {
            match tokio::time::timeout(Duration::from_millis(50), self.update_rx.recv()).await {
                Ok(Ok(StoreUpdate::NavigationRequested { conversation_id })) => {
                    return Some(conversation_id)
                }
                Ok(Ok(_)) => continue,
                Ok(Err(broadcast::error::RecvError::Lagged(_))) => continue,
                Ok(Err(broadcast::error::RecvError::Closed)) => return None,
                Err(_) => continue,
            }
        }
        None
    }

    pub async fn wait_for_error(&mut self, timeout: Duration) -> Option<String> {
        let deadline = tokio::time::Instant::now() + timeout;
        while tokio::time::Instant::now() < deadline {
            match tokio::time::timeout(Duration::from_millis(50), self.update_rx.recv()).await {
                Ok(Ok(StoreUpdate::Error { message })) => return Some(message),
                Ok(Ok(_)) => continue,
                Ok(Err(broadcast::error::RecvError::Lagged(_))) => continue,
                Ok(Err(broadcast::error::RecvError::Closed)) => return None,
                Err(_) => continue,
            }
        }
        None
    }

    /// Drain snapshots already in the channel without waiting.
    pub fn drain_states(&mut self) -> Vec<StoreState> {
        let mut states = Vec::new();
        loop {
            match self.update_rx.try_recv() {
                Ok(StoreUpdate::State(state)) => states.push(state),
                Ok(_) => continue,
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(_) => break,
            }
        }
        states
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Message;
    use crate::store::LoadStatus;

    fn conversation(id: &str) -> Conversation {
        Conversation {
            owner_id: "u-1".to_string(),
            conversation_id: id.to_string(),
            created_at: "2024-03-01T10:00:00.000000Z".to_string(),
        }
    }

    fn message(kind: &str, content: &str) -> Message {
        Message {
            kind: kind.to_string(),
            content: content.to_string(),
            is_example: false,
        }
    }

    fn detail(id: &str, messages: Vec<Message>) -> ConversationDetail {
        ConversationDetail {
            owner_id: "u-1".to_string(),
            conversation_id: id.to_string(),
            created_at: "2024-03-01T10:00:00.000000Z".to_string(),
            messages,
        }
    }

    #[tokio::test]
    async fn test_mock_gateway_pops_in_order() {
        let mock = MockGateway::new();
        mock.queue_conversations(Ok(vec![conversation("c-1")]));

        let first = mock.list_conversations().await.unwrap();
        assert_eq!(first[0].conversation_id, "c-1");

        // Second call has nothing queued
        assert!(mock.list_conversations().await.is_err());
        assert_eq!(
            mock.recorded_calls(),
            vec!["list_conversations", "list_conversations"]
        );
    }

    #[tokio::test]
    async fn test_initial_load_selects_first_conversation() {
        let gateway = Arc::new(MockGateway::new());
        gateway.queue_conversations(Ok(vec![conversation("c-1"), conversation("c-2")]));
        gateway.queue_detail("c-1", Ok(detail("c-1", vec![message("ai", "welcome")])));

        let mut harness = TestHarness::start(gateway.clone());
        harness.send(Event::LoadConversations).await;

        // idle -> loading -> idle is observable in the snapshots
        let loading = harness
            .wait_for_state(Duration::from_secs(2), |s| s.list_status.is_loading())
            .await;
        assert!(loading.is_some());

        let loaded = harness
            .wait_for_state(Duration::from_secs(2), |s| {
                s.list_status == LoadStatus::Idle && s.detail_conversation_id() == Some("c-1")
            })
            .await
            .expect("detail of the first conversation should load");
        assert_eq!(loaded.selection(), Some("c-1".to_string()));
    }

    #[tokio::test]
    async fn test_empty_first_load_makes_no_detail_fetch() {
        let gateway = Arc::new(MockGateway::new());
        gateway.queue_conversations(Ok(vec![]));

        let mut harness = TestHarness::start(gateway.clone());
        harness.send(Event::LoadConversations).await;

        let state = harness
            .wait_for_state(Duration::from_secs(2), |s| {
                s.list_status == LoadStatus::Idle && s.conversations.is_some()
            })
            .await
            .expect("list load should complete");
        assert_eq!(state.selection(), None);
        assert!(state.detail.is_none());

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!gateway
            .recorded_calls()
            .iter()
            .any(|call| call.starts_with("get_conversation")));
    }

    #[tokio::test]
    async fn test_stale_fetch_is_suppressed() {
        let inner = MockGateway::new();
        inner.queue_conversations(Ok(vec![conversation("c-a"), conversation("c-b")]));
        inner.queue_detail("c-a", Ok(detail("c-a", vec![message("ai", "stale")])));
        inner.queue_detail("c-b", Ok(detail("c-b", vec![message("ai", "fresh")])));

        let gateway = Arc::new(DelayedMockGateway::new(inner));
        // First detail fetch (c-a) is slow; the one after the switch (c-b)
        // returns immediately.
        gateway.queue_detail_delay(Duration::from_millis(300));
        let started = gateway.detail_started.clone();

        let mut harness = TestHarness::start(gateway.clone());
        harness.send(Event::LoadConversations).await;

        tokio::time::timeout(Duration::from_secs(1), started.notified())
            .await
            .expect("detail fetch for c-a should start");

        // Switch away before c-a resolves
        harness
            .send(Event::RouteChanged {
                conversation_id: Some("c-b".to_string()),
            })
            .await;

        let state = harness
            .wait_for_state(Duration::from_secs(2), |s| {
                s.detail_conversation_id() == Some("c-b")
            })
            .await
            .expect("c-b's detail should be displayed");
        assert_eq!(state.detail.unwrap().messages[0].content, "fresh");

        // Let the stale c-a response arrive and be discarded
        tokio::time::sleep(Duration::from_millis(400)).await;
        for state in harness.drain_states() {
            assert_ne!(state.detail_conversation_id(), Some("c-a"));
        }
    }

    #[tokio::test]
    async fn test_optimistic_preview_then_reconcile() {
        let gateway = Arc::new(MockGateway::new());
        gateway.queue_conversations(Ok(vec![conversation("c-1")]));
        gateway.queue_detail("c-1", Ok(detail("c-1", vec![message("human", "m0")])));

        let mut harness = TestHarness::start(gateway.clone());
        harness.send(Event::LoadConversations).await;
        harness
            .wait_for_state(Duration::from_secs(2), |s| {
                s.detail_conversation_id() == Some("c-1")
            })
            .await
            .expect("initial detail should load");

        // The reconciling fetch returns the authoritative sequence
        let server_sequence = vec![
            message("human", "m0"),
            message("human", "hello"),
            message("ai", "answer"),
        ];
        gateway.queue_post(Ok(()));
        gateway.queue_detail("c-1", Ok(detail("c-1", server_sequence.clone())));

        harness
            .send(Event::SubmitMessage {
                prompt: "hello".to_string(),
            })
            .await;

        // The optimistic preview is visible before any round trip completes
        let optimistic = harness
            .wait_for_state(Duration::from_secs(2), |s| {
                s.message_status.is_loading()
            })
            .await
            .expect("submission snapshot should broadcast");
        let held = optimistic.detail.unwrap();
        assert_eq!(
            held.messages,
            vec![message("human", "m0"), Message::preview("hello")]
        );

        // ...and is fully replaced by the server's sequence, not merged
        let reconciled = harness
            .wait_for_state(Duration::from_secs(2), |s| {
                s.message_status == LoadStatus::Idle
                    && s.detail
                        .as_ref()
                        .is_some_and(|d| d.messages.len() == server_sequence.len())
            })
            .await
            .expect("reconciling fetch should complete");
        assert_eq!(reconciled.detail.unwrap().messages, server_sequence);
    }

    #[tokio::test]
    async fn test_create_round_trip() {
        let gateway = Arc::new(MockGateway::new());
        gateway.queue_created(Ok(conversation("c-new")));
        gateway.queue_conversations(Ok(vec![conversation("c-new")]));
        gateway.queue_detail("c-new", Ok(detail("c-new", vec![])));

        let mut harness = TestHarness::start(gateway.clone());
        harness.send(Event::CreateConversation).await;

        let target = harness
            .wait_for_navigation(Duration::from_secs(2))
            .await
            .expect("creation should request navigation");
        assert_eq!(target, "c-new");

        // The router echo that the view performs on navigation
        harness
            .send(Event::RouteChanged {
                conversation_id: Some(target),
            })
            .await;

        let state = harness
            .wait_for_state(Duration::from_secs(2), |s| {
                s.detail_conversation_id() == Some("c-new")
                    && s.conversations
                        .as_ref()
                        .is_some_and(|list| list.iter().any(|c| c.conversation_id == "c-new"))
            })
            .await
            .expect("new conversation should become the selection");
        assert_eq!(state.selection(), Some("c-new".to_string()));
        assert_eq!(state.creation_status, LoadStatus::Idle);
    }

    #[tokio::test]
    async fn test_empty_prompt_rejected_without_state_change() {
        let gateway = Arc::new(MockGateway::new());
        gateway.queue_conversations(Ok(vec![conversation("c-1")]));
        gateway.queue_detail("c-1", Ok(detail("c-1", vec![message("human", "m0")])));

        let mut harness = TestHarness::start(gateway.clone());
        harness.send(Event::LoadConversations).await;
        harness
            .wait_for_state(Duration::from_secs(2), |s| {
                s.detail_conversation_id() == Some("c-1")
            })
            .await
            .expect("initial detail should load");

        harness
            .send(Event::SubmitMessage {
                prompt: "   ".to_string(),
            })
            .await;

        let error = harness
            .wait_for_error(Duration::from_secs(2))
            .await
            .expect("rejection should surface");
        assert!(error.to_lowercase().contains("empty"));

        // No snapshot with an appended message or a loading flag followed
        for state in harness.drain_states() {
            assert_eq!(state.message_status, LoadStatus::Idle);
            assert_eq!(state.detail.as_ref().unwrap().messages.len(), 1);
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!gateway
            .recorded_calls()
            .iter()
            .any(|call| call.starts_with("post_message")));
    }

    #[tokio::test]
    async fn test_list_failure_surfaces_and_flags() {
        let gateway = Arc::new(MockGateway::new());
        gateway.queue_conversations(Err(ApiError::network("connection refused")));

        let mut harness = TestHarness::start(gateway.clone());
        harness.send(Event::LoadConversations).await;

        let error = harness
            .wait_for_error(Duration::from_secs(2))
            .await
            .expect("failure should broadcast");
        assert!(error.contains("connection refused"));

        let state = harness
            .wait_for_state(Duration::from_secs(2), |s| {
                s.list_status == LoadStatus::Error
            })
            .await
            .expect("status flag should leave loading");
        assert!(state.conversations.is_none());
        assert!(state.detail.is_none());
    }

    #[tokio::test]
    async fn test_documents_load() {
        let gateway = Arc::new(MockGateway::new());
        gateway.queue_documents(Ok(vec![Document {
            document_id: uuid::Uuid::new_v4().to_string(),
            owner_id: "u-1".to_string(),
            filename: "report.pdf".to_string(),
            size_bytes: 482_113,
            created_at: "2024-03-01T10:00:00.000000Z".to_string(),
            page_count: 12,
        }]));

        let mut harness = TestHarness::start(gateway.clone());
        harness.send(Event::LoadDocuments).await;

        let state = harness
            .wait_for_state(Duration::from_secs(2), |s| {
                s.document_status == LoadStatus::Idle && s.documents.is_some()
            })
            .await
            .expect("documents should load");
        assert_eq!(state.documents.unwrap()[0].filename, "report.pdf");
    }
}
