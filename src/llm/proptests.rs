//! Property-based tests for the provider translation layers
//!
//! These verify that translating a turn history into either provider's
//! message shape preserves key invariants:
//! - Turn order and content survive translation verbatim
//! - The role remapping is total (no turn is dropped or invented)
//! - The system instruction never appears as a conversation turn on the
//!   primary side, and always leads on the secondary side

use super::gemini;
use super::openai;
use super::types::{Role, Turn};
use proptest::prelude::*;

fn arb_role() -> impl Strategy<Value = Role> {
    prop_oneof![Just(Role::User), Just(Role::Assistant)]
}

fn arb_turn() -> impl Strategy<Value = Turn> {
    (arb_role(), "[a-zA-Z0-9 _.!?,']{0,120}").prop_map(|(role, content)| Turn { role, content })
}

fn arb_history() -> impl Strategy<Value = Vec<Turn>> {
    prop::collection::vec(arb_turn(), 0..12)
}

proptest! {
    #[test]
    fn gemini_translation_preserves_order_and_content(history in arb_history()) {
        let contents = gemini::to_contents(&history);
        prop_assert_eq!(contents.len(), history.len());
        for (turn, content) in history.iter().zip(&contents) {
            prop_assert_eq!(content.parts.len(), 1);
            prop_assert_eq!(&content.parts[0].text, &turn.content);
            let expected = match turn.role {
                Role::User => "user",
                Role::Assistant => "model",
            };
            prop_assert_eq!(content.role.as_deref(), Some(expected));
        }
    }

    #[test]
    fn openai_translation_prepends_system_and_preserves_history(
        system in "[a-zA-Z0-9 ]{1,60}",
        history in arb_history(),
    ) {
        let messages = openai::to_messages(&system, &history);
        prop_assert_eq!(messages.len(), history.len() + 1);
        prop_assert_eq!(&messages[0].role, "system");
        prop_assert_eq!(&messages[0].content, &system);
        for (turn, message) in history.iter().zip(&messages[1..]) {
            prop_assert_eq!(&message.content, &turn.content);
            let expected = match turn.role {
                Role::User => "user",
                Role::Assistant => "assistant",
            };
            prop_assert_eq!(&message.role, expected);
        }
    }

    #[test]
    fn no_translation_produces_system_role_turns_from_history(history in arb_history()) {
        // The system instruction travels out-of-band on the primary side.
        let contents = gemini::to_contents(&history);
        for content in &contents {
            prop_assert_ne!(content.role.as_deref(), Some("system"));
        }
    }
}
