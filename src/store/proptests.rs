//! Property-based tests for the store
//!
//! These verify the selection and race-safety invariants across arbitrary
//! inputs rather than hand-picked cases.

use super::selection::resolve;
use super::state::StoreState;
use super::transition::transition;
use super::Event;
use crate::api::{Conversation, ConversationDetail};
use proptest::prelude::*;

fn arb_id() -> impl Strategy<Value = String> {
    "[a-z0-9]{4,10}".prop_map(|s| format!("c-{s}"))
}

fn arb_conversation() -> impl Strategy<Value = Conversation> {
    arb_id().prop_map(|conversation_id| Conversation {
        owner_id: "u-1".to_string(),
        conversation_id,
        created_at: String::new(),
    })
}

fn arb_conversations() -> impl Strategy<Value = Option<Vec<Conversation>>> {
    proptest::option::of(proptest::collection::vec(arb_conversation(), 0..6))
}

fn detail_for(conversation_id: &str) -> ConversationDetail {
    ConversationDetail {
        owner_id: "u-1".to_string(),
        conversation_id: conversation_id.to_string(),
        created_at: String::new(),
        messages: vec![],
    }
}

proptest! {
    /// A route-supplied id wins over anything the list contains.
    #[test]
    fn route_id_always_wins(route in arb_id(), conversations in arb_conversations()) {
        let resolved = resolve(Some(&route), conversations.as_deref());
        prop_assert_eq!(resolved, Some(route));
    }

    /// Without a route id the head of the list is selected.
    #[test]
    fn head_of_list_selected_without_route(
        conversations in proptest::collection::vec(arb_conversation(), 1..6)
    ) {
        let resolved = resolve(None, Some(&conversations));
        prop_assert_eq!(resolved, Some(conversations[0].conversation_id.clone()));
    }

    /// Nothing to select yields no selection.
    #[test]
    fn empty_inputs_yield_none(empty_list in any::<bool>()) {
        let conversations: Option<Vec<Conversation>> =
            if empty_list { Some(vec![]) } else { None };
        prop_assert_eq!(resolve(None, conversations.as_deref()), None);
    }

    /// Whatever conversation a detail completion names, the held detail
    /// afterwards always matches the resolved selection (or is unset):
    /// stale responses can never leak into view.
    #[test]
    fn detail_never_disagrees_with_selection(
        route in proptest::option::of(arb_id()),
        conversations in arb_conversations(),
        loaded_id in arb_id(),
    ) {
        let mut state = StoreState::default();
        state.route_conversation_id = route;
        state.conversations = conversations;

        let result = transition(&state, Event::DetailLoaded {
            conversation_id: loaded_id.clone(),
            result: Ok(detail_for(&loaded_id)),
        }).unwrap();

        let next = result.new_state;
        match next.detail_conversation_id() {
            Some(held) => prop_assert_eq!(Some(held.to_string()), next.selection()),
            None => {}
        }
    }
}
