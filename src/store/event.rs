//! Events that drive the store

use crate::api::{ApiError, Conversation, ConversationDetail, Document};

/// Events that trigger state transitions.
///
/// View commands come from the terminal UI; completion events come back
/// from gateway calls the runtime spawned.
#[derive(Debug, Clone)]
pub enum Event {
    // View commands
    LoadConversations,
    LoadDocuments,
    CreateConversation,
    SubmitMessage {
        prompt: String,
    },
    /// The router's conversation id changed (navigation, startup argument).
    RouteChanged {
        conversation_id: Option<String>,
    },

    // Async completions
    ConversationsLoaded {
        result: Result<Vec<Conversation>, ApiError>,
    },
    DetailLoaded {
        conversation_id: String,
        result: Result<ConversationDetail, ApiError>,
    },
    ConversationCreated {
        result: Result<Conversation, ApiError>,
    },
    MessagePosted {
        conversation_id: String,
        result: Result<(), ApiError>,
    },
    DocumentsLoaded {
        result: Result<Vec<Document>, ApiError>,
    },
}

impl Event {
    /// The failure message of a completion event, if it carries one.
    /// Used by the runtime to surface errors without hiding them in state.
    pub fn failure_message(&self) -> Option<String> {
        let err = match self {
            Event::ConversationsLoaded { result: Err(e) }
            | Event::ConversationCreated { result: Err(e) }
            | Event::DocumentsLoaded { result: Err(e) }
            | Event::DetailLoaded { result: Err(e), .. }
            | Event::MessagePosted { result: Err(e), .. } => e,
            _ => return None,
        };
        Some(err.to_string())
    }
}
