//! Selection resolution
//!
//! Pure derivation of "which conversation is active" from the router's id
//! and the conversation list. No hidden state; recomputed by transitions
//! whenever either input changes.

use crate::api::Conversation;

/// Resolve the active conversation id.
///
/// A route-supplied id wins unconditionally, even if it is not present in
/// the list (the store will then attempt the fetch and may surface a
/// not-found state). Otherwise the first conversation in list order is
/// selected. Returns `None` when there is no route id and the list is
/// absent or empty.
pub fn resolve(
    route_conversation_id: Option<&str>,
    conversations: Option<&[Conversation]>,
) -> Option<String> {
    if let Some(id) = route_conversation_id {
        return Some(id.to_string());
    }
    conversations?.first().map(|c| c.conversation_id.clone())
}
