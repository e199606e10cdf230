//! Property-based tests: error classification consistency.

use deltastream_types::*;
use proptest::prelude::*;

fn arb_chat_error() -> impl Strategy<Value = ChatError> {
    prop_oneof![
        Just(()).prop_map(|()| ChatError::RateLimited),
        Just(()).prop_map(|()| ChatError::CreditsRequired),
        any::<String>().prop_map(ChatError::Authentication),
        any::<String>().prop_map(ChatError::ServiceUnavailable),
        (100u16..600, any::<String>())
            .prop_map(|(status, body)| ChatError::RequestFailed { status, body }),
        any::<String>().prop_map(ChatError::Stream),
        any::<String>().prop_map(ChatError::Config),
    ]
}

proptest! {
    #[test]
    fn chat_error_retryable_classification(err in arb_chat_error()) {
        let retryable = err.is_retryable();
        match &err {
            ChatError::RateLimited => prop_assert!(retryable),
            ChatError::ServiceUnavailable(_) => prop_assert!(retryable),
            ChatError::CreditsRequired => prop_assert!(!retryable),
            ChatError::Authentication(_) => prop_assert!(!retryable),
            ChatError::RequestFailed { .. } => prop_assert!(!retryable),
            ChatError::Stream(_) => prop_assert!(!retryable),
            ChatError::Config(_) => prop_assert!(!retryable),
            _ => {}
        }
    }

    #[test]
    fn chat_error_display_never_empty(err in arb_chat_error()) {
        prop_assert!(!err.to_string().is_empty());
    }
}
