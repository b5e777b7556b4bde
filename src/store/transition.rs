//! Pure state transition function

use super::effect::Effect;
use super::event::Event;
use super::state::{LoadStatus, StoreState};
use crate::api::Message;
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: StoreState,
    pub effects: Vec<Effect>,
}

/// Local rejections, surfaced to the user without touching state.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Cannot send an empty message")]
    EmptyPrompt,
    #[error("No conversation is loaded")]
    NoConversation,
}

/// Pure transition function.
///
/// Given the same state and event it always produces the same next state
/// and effects, with no I/O. The runtime owns effect execution.
pub fn transition(state: &StoreState, event: Event) -> Result<TransitionResult, TransitionError> {
    let mut next = state.clone();
    let mut effects = Vec::new();

    match event {
        // ============================================================
        // Conversation list
        // ============================================================
        Event::LoadConversations => {
            next.list_status = LoadStatus::Loading;
            effects.push(Effect::FetchConversations);
        }

        Event::ConversationsLoaded { result } => {
            match result {
                Ok(list) => {
                    // Replaced wholesale; ordering authority stays with
                    // the server.
                    next.conversations = Some(list);
                    next.list_status = LoadStatus::Idle;
                }
                Err(_) => {
                    // Error state, never stale data.
                    next.conversations = None;
                    next.list_status = LoadStatus::Error;
                }
            }
            sync_selection(&mut next, &mut effects);
        }

        // ============================================================
        // Navigation-driven selection
        // ============================================================
        Event::RouteChanged { conversation_id } => {
            next.route_conversation_id = conversation_id;
            sync_selection(&mut next, &mut effects);
        }

        Event::DetailLoaded {
            conversation_id,
            result,
        } => {
            // Completion-time check: a fetch for a conversation that is no
            // longer the selection must not overwrite the displayed detail.
            if next.selection().as_deref() == Some(conversation_id.as_str()) {
                match result {
                    Ok(detail) => next.detail = Some(detail),
                    Err(_) => next.detail = None,
                }
            }
            // A reconciling fetch after a post ends the submission round
            // trip whether it applied or was discarded as stale.
            if next.message_status.is_loading() {
                next.message_status = LoadStatus::Idle;
            }
        }

        // ============================================================
        // Creation
        // ============================================================
        Event::CreateConversation => {
            next.creation_status = LoadStatus::Loading;
            effects.push(Effect::CreateConversation);
        }

        Event::ConversationCreated { result } => match result {
            Ok(conversation) => {
                next.creation_status = LoadStatus::Idle;
                next.list_status = LoadStatus::Loading;
                effects.push(Effect::FetchConversations);
                // Navigation loops back through the router as
                // RouteChanged, which triggers the detail fetch.
                effects.push(Effect::Navigate {
                    conversation_id: conversation.conversation_id,
                });
            }
            Err(_) => next.creation_status = LoadStatus::Error,
        },

        // ============================================================
        // Message submission with optimistic preview
        // ============================================================
        Event::SubmitMessage { prompt } => {
            if prompt.trim().is_empty() {
                return Err(TransitionError::EmptyPrompt);
            }
            let Some(detail) = next.detail.as_mut() else {
                return Err(TransitionError::NoConversation);
            };

            detail.messages.push(Message::preview(prompt.as_str()));
            let conversation_id = detail.conversation_id.clone();
            next.message_status = LoadStatus::Loading;
            effects.push(Effect::PostMessage {
                conversation_id,
                prompt,
            });
        }

        Event::MessagePosted {
            conversation_id,
            result: _,
        } => {
            // Success or failure, reconcile with the server's sequence. A
            // failed post self-corrects when the refresh replaces the whole
            // message list; the optimistic entry may simply vanish.
            effects.push(Effect::FetchDetail { conversation_id });
        }

        // ============================================================
        // Documents (peripheral, read-only)
        // ============================================================
        Event::LoadDocuments => {
            next.document_status = LoadStatus::Loading;
            effects.push(Effect::FetchDocuments);
        }

        Event::DocumentsLoaded { result } => match result {
            Ok(documents) => {
                next.documents = Some(documents);
                next.document_status = LoadStatus::Idle;
            }
            Err(_) => {
                next.documents = None;
                next.document_status = LoadStatus::Error;
            }
        },
    }

    Ok(TransitionResult {
        new_state: next,
        effects,
    })
}

/// Recompute the selection after the route or the list changed, keeping
/// the held detail consistent with it: detail for a different conversation
/// is dropped, and a missing detail for an existing selection is fetched.
fn sync_selection(next: &mut StoreState, effects: &mut Vec<Effect>) {
    match next.selection() {
        None => next.detail = None,
        Some(selected) => {
            if next.detail_conversation_id() != Some(selected.as_str()) {
                next.detail = None;
                effects.push(Effect::FetchDetail {
                    conversation_id: selected,
                });
            }
        }
    }
}
