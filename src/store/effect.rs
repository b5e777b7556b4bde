//! Effects produced by state transitions

/// Side-effect requests for the runtime to execute after a transition.
///
/// Fetch/post effects become spawned gateway calls whose completions are
/// fed back as events; `Navigate` is handed to the router (the view).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchConversations,
    FetchDetail { conversation_id: String },
    CreateConversation,
    PostMessage { conversation_id: String, prompt: String },
    FetchDocuments,
    /// Request navigation to a conversation. The router echoes it back as
    /// `Event::RouteChanged`, which drives the detail fetch.
    Navigate { conversation_id: String },
}
