//! Store runtime executor

use super::traits::Gateway;
use super::{StoreHandle, StoreUpdate};
use crate::store::{transition, Effect, Event, StoreState};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};

/// Owns the store state and drives it from an event loop.
///
/// All mutation happens here, single file of control: receive an event,
/// run the pure transition, broadcast the snapshot, execute effects.
/// Gateway calls run as background tasks whose completions come back as
/// events, so user actions can interleave with them freely.
pub struct StoreRuntime<G: Gateway + 'static> {
    state: StoreState,
    gateway: Arc<G>,
    event_rx: mpsc::Receiver<Event>,
    event_tx: mpsc::Sender<Event>,
    update_tx: broadcast::Sender<StoreUpdate>,
}

impl<G: Gateway + 'static> StoreRuntime<G> {
    pub fn new(
        gateway: G,
        event_rx: mpsc::Receiver<Event>,
        event_tx: mpsc::Sender<Event>,
        update_tx: broadcast::Sender<StoreUpdate>,
    ) -> Self {
        Self {
            state: StoreState::default(),
            gateway: Arc::new(gateway),
            event_rx,
            event_tx,
            update_tx,
        }
    }

    /// Start a runtime on a fresh pair of channels and return its handle.
    pub fn spawn(gateway: G) -> StoreHandle {
        let (event_tx, event_rx) = mpsc::channel(32);
        let (update_tx, _) = broadcast::channel(128);

        let runtime = Self::new(gateway, event_rx, event_tx.clone(), update_tx.clone());
        tokio::spawn(runtime.run());

        StoreHandle {
            event_tx,
            update_tx,
        }
    }

    pub async fn run(mut self) {
        tracing::info!("Starting store runtime");

        while let Some(event) = self.event_rx.recv().await {
            self.process_event(event);
        }

        tracing::info!("Store runtime stopped");
    }

    fn process_event(&mut self, event: Event) {
        tracing::debug!(?event, "Processing store event");

        // Remote failures are surfaced, not swallowed; the transition
        // still records them in the status flags.
        if let Some(message) = event.failure_message() {
            tracing::warn!(%message, "Remote operation failed");
            let _ = self.update_tx.send(StoreUpdate::Error { message });
        }

        let result = match transition(&self.state, event) {
            Ok(result) => result,
            Err(rejection) => {
                // Local rejections (e.g. empty prompt) leave state alone.
                let _ = self.update_tx.send(StoreUpdate::Error {
                    message: rejection.to_string(),
                });
                return;
            }
        };

        self.state = result.new_state;
        let _ = self.update_tx.send(StoreUpdate::State(self.state.clone()));

        for effect in result.effects {
            self.execute_effect(effect);
        }
    }

    fn execute_effect(&self, effect: Effect) {
        match effect {
            Effect::FetchConversations => {
                let gateway = self.gateway.clone();
                let event_tx = self.event_tx.clone();
                tokio::spawn(async move {
                    let result = gateway.list_conversations().await;
                    let _ = event_tx.send(Event::ConversationsLoaded { result }).await;
                });
            }

            Effect::FetchDetail { conversation_id } => {
                let gateway = self.gateway.clone();
                let event_tx = self.event_tx.clone();
                tokio::spawn(async move {
                    let result = gateway.get_conversation(&conversation_id).await;
                    let _ = event_tx
                        .send(Event::DetailLoaded {
                            conversation_id,
                            result,
                        })
                        .await;
                });
            }

            Effect::CreateConversation => {
                let gateway = self.gateway.clone();
                let event_tx = self.event_tx.clone();
                tokio::spawn(async move {
                    let result = gateway.create_conversation().await;
                    let _ = event_tx.send(Event::ConversationCreated { result }).await;
                });
            }

            Effect::PostMessage {
                conversation_id,
                prompt,
            } => {
                let gateway = self.gateway.clone();
                let event_tx = self.event_tx.clone();
                tokio::spawn(async move {
                    let result = gateway.post_message(&conversation_id, &prompt).await;
                    let _ = event_tx
                        .send(Event::MessagePosted {
                            conversation_id,
                            result,
                        })
                        .await;
                });
            }

            Effect::FetchDocuments => {
                let gateway = self.gateway.clone();
                let event_tx = self.event_tx.clone();
                tokio::spawn(async move {
                    let result = gateway.list_documents().await;
                    let _ = event_tx.send(Event::DocumentsLoaded { result }).await;
                });
            }

            Effect::Navigate { conversation_id } => {
                let _ = self
                    .update_tx
                    .send(StoreUpdate::NavigationRequested { conversation_id });
            }
        }
    }
}
