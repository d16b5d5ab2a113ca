use super::*;
use crate::llm::types::Role;
use crate::state::test_helpers::MockLlm;
use crate::transcript::Sender;

// =============================================================================
// accept
// =============================================================================

#[test]
fn accept_blank_input_is_noop() {
    let mut transcript = Transcript::new();
    for raw in ["", " ", "\t\n  "] {
        assert!(accept(&mut transcript, raw).is_none(), "expected no-op for {raw:?}");
    }
    assert!(transcript.is_empty());
}

#[test]
fn accept_appends_untrimmed_user_turn() {
    let mut transcript = Transcript::new();
    let (index, turn) = accept(&mut transcript, "  Hello  ").expect("accepted");

    assert_eq!(index, 0);
    assert_eq!(turn, ChatTurn::user("  Hello  "));
    assert_eq!(transcript.turns(), &[ChatTurn::user("  Hello  ")]);
}

#[test]
fn accept_indexes_follow_transcript_length() {
    let mut transcript = Transcript::new();
    transcript.append(ChatTurn::user("first"));
    transcript.append(ChatTurn::assistant("reply"));

    let (index, _) = accept(&mut transcript, "second").expect("accepted");
    assert_eq!(index, 2);
    assert_eq!(transcript.len(), 3);
}

// =============================================================================
// complete
// =============================================================================

#[tokio::test]
async fn complete_success_yields_reply_turn() {
    let llm = MockLlm::replying(&["Hi there!"]);
    let turn = complete(&llm, "Hello").await;

    assert_eq!(turn.sender(), Sender::Assistant);
    assert_eq!(turn.text(), "Hi there!");
}

#[tokio::test]
async fn complete_empty_reply_is_kept() {
    let llm = MockLlm::replying(&[""]);
    let turn = complete(&llm, "Hello").await;
    assert_eq!(turn, ChatTurn::assistant(""));
}

#[tokio::test]
async fn complete_sends_system_and_single_user_message() {
    let llm = MockLlm::echo();
    complete(&llm, "Hello").await;

    let calls = llm.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].system, SYSTEM_PROMPT);
    assert_eq!(calls[0].messages, vec![Message::user("Hello")]);
}

#[tokio::test]
async fn complete_never_sends_prior_turns() {
    let llm = MockLlm::echo();
    let mut transcript = Transcript::new();
    for text in ["one", "two", "three"] {
        let (_, turn) = accept(&mut transcript, text).expect("accepted");
        transcript.append(complete(&llm, turn.text()).await);
    }

    for (call, expected) in llm.calls().iter().zip(["one", "two", "three"]) {
        assert_eq!(call.messages.len(), 1);
        assert_eq!(call.messages[0].role, Role::User);
        assert_eq!(call.messages[0].content, expected);
    }
}

#[tokio::test]
async fn complete_failures_collapse_to_fallback() {
    let errors = [
        LlmError::ApiRequest("connection refused".into()),
        LlmError::ApiResponse { status: 401, body: "No auth credentials found".into() },
        LlmError::ApiParse("chat_completions: missing choices[0]".into()),
    ];
    for err in errors {
        let llm = MockLlm::failing(err);
        let turn = complete(&llm, "Hello").await;
        assert_eq!(turn, ChatTurn::assistant(FALLBACK_TEXT));
    }
}

#[tokio::test]
async fn reply_propagates_error() {
    let llm = MockLlm::failing(LlmError::ApiParse("bad".into()));
    let err = reply(&llm, "Hello").await.unwrap_err();
    assert!(matches!(err, LlmError::ApiParse(_)));
}

// =============================================================================
// full pipeline
// =============================================================================

#[tokio::test]
async fn hello_scenario_success() {
    let llm = MockLlm::replying(&["Hi there!"]);
    let mut transcript = Transcript::new();

    let (_, user) = accept(&mut transcript, "Hello").expect("accepted");
    assert_eq!(transcript.turns(), &[ChatTurn::user("Hello")]);

    transcript.append(complete(&llm, user.text()).await);
    assert_eq!(transcript.turns(), &[ChatTurn::user("Hello"), ChatTurn::assistant("Hi there!")]);
}

#[tokio::test]
async fn hello_scenario_network_error() {
    let llm = MockLlm::failing(LlmError::ApiRequest("dns error".into()));
    let mut transcript = Transcript::new();

    let (_, user) = accept(&mut transcript, "Hello").expect("accepted");
    transcript.append(complete(&llm, user.text()).await);

    assert_eq!(
        transcript.turns(),
        &[ChatTurn::user("Hello"), ChatTurn::assistant("Sorry, something went wrong.")]
    );
}

#[tokio::test]
async fn blank_input_issues_no_request() {
    let llm = MockLlm::echo();
    let mut transcript = Transcript::new();

    if let Some((_, turn)) = accept(&mut transcript, "   ") {
        complete(&llm, turn.text()).await;
    }

    assert!(llm.calls().is_empty());
    assert!(transcript.is_empty());
}
