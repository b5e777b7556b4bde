//! Store state types

use crate::api::{Conversation, ConversationDetail, Document};
use crate::store::selection::resolve;
use serde::Serialize;

/// Status of one asynchronous operation family.
///
/// Three-valued so the UI can distinguish "nothing happening" from
/// "in flight" from "failed" - never a boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Error,
}

impl LoadStatus {
    pub fn is_loading(self) -> bool {
        matches!(self, LoadStatus::Loading)
    }
}

/// The single shared store state.
///
/// All mutation happens through [`transition`](crate::store::transition);
/// the runtime broadcasts a snapshot after every applied event.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct StoreState {
    /// Conversation list; `None` until the first load completes.
    pub conversations: Option<Vec<Conversation>>,
    /// Detail of the selected conversation, if fetched.
    pub detail: Option<ConversationDetail>,
    /// Uploaded documents, read-only.
    pub documents: Option<Vec<Document>>,
    /// Conversation id supplied by the router, if any.
    pub route_conversation_id: Option<String>,
    pub list_status: LoadStatus,
    pub message_status: LoadStatus,
    pub creation_status: LoadStatus,
    pub document_status: LoadStatus,
}

impl StoreState {
    /// The currently selected conversation id, derived from the route and
    /// the list (route wins, else first in list order).
    pub fn selection(&self) -> Option<String> {
        resolve(
            self.route_conversation_id.as_deref(),
            self.conversations.as_deref(),
        )
    }

    pub fn detail_conversation_id(&self) -> Option<&str> {
        self.detail.as_ref().map(|d| d.conversation_id.as_str())
    }
}
