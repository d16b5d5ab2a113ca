use super::*;

#[test]
fn new_transcript_is_empty() {
    let t = Transcript::new();
    assert!(t.is_empty());
    assert_eq!(t.len(), 0);
    assert!(t.last().is_none());
}

#[test]
fn append_preserves_insertion_order() {
    let mut t = Transcript::new();
    assert_eq!(t.append(ChatTurn::user("Hello")), 0);
    assert_eq!(t.append(ChatTurn::assistant("Hi there!")), 1);
    assert_eq!(t.append(ChatTurn::user("Bye")), 2);

    let texts: Vec<&str> = t.turns().iter().map(ChatTurn::text).collect();
    assert_eq!(texts, ["Hello", "Hi there!", "Bye"]);
    assert_eq!(t.last(), Some(&ChatTurn::user("Bye")));
}

#[test]
fn duplicate_turns_are_kept() {
    let mut t = Transcript::new();
    t.append(ChatTurn::user("again"));
    t.append(ChatTurn::user("again"));
    assert_eq!(t.len(), 2);
}

#[test]
fn turn_constructors_tag_sender() {
    assert_eq!(ChatTurn::user("a").sender(), Sender::User);
    assert_eq!(ChatTurn::assistant("b").sender(), Sender::Assistant);
}

#[test]
fn turn_serializes_sender_lowercase() {
    let json = serde_json::to_value(ChatTurn::assistant("Hi")).unwrap();
    assert_eq!(json, serde_json::json!({ "sender": "assistant", "text": "Hi" }));
}

#[test]
fn to_data_carries_index_sender_text() {
    let data = ChatTurn::user("  Hello ").to_data(3);
    assert_eq!(data.get("index"), Some(&serde_json::json!(3)));
    assert_eq!(data.get("sender"), Some(&serde_json::json!("user")));
    assert_eq!(data.get("text"), Some(&serde_json::json!("  Hello ")));
}
