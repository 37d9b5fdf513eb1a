use futures::stream;
use r3ason::api::{CompletionTransport, FragmentStream, RequestBody};
use r3ason::error::{R3asonError, Result};
use r3ason::models::Role;
use r3ason::session::{DeliveryMode, ReasoningSession};
use serde_json::json;
use std::cell::RefCell;
use std::collections::VecDeque;

enum Reply {
    Buffered(String),
    Fragments(Vec<String>),
    FragmentsThenFailure(Vec<String>),
    Failure,
}

/// In-memory transport that plays back a scripted sequence of replies.
struct ScriptedTransport {
    replies: RefCell<VecDeque<Reply>>,
}

impl ScriptedTransport {
    fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: RefCell::new(replies.into()),
        }
    }

    fn next_reply(&self) -> Reply {
        self.replies
            .borrow_mut()
            .pop_front()
            .expect("no scripted reply left")
    }
}

impl CompletionTransport for ScriptedTransport {
    async fn complete(&self, _request: &RequestBody) -> Result<String> {
        match self.next_reply() {
            Reply::Buffered(text) => Ok(text),
            Reply::Failure => Err(R3asonError::ApiError {
                status: 500,
                message: "upstream failure".to_string(),
            }),
            _ => panic!("scripted reply is not a buffered reply"),
        }
    }

    async fn open_stream(&self, _request: &RequestBody) -> Result<FragmentStream> {
        match self.next_reply() {
            Reply::Fragments(fragments) => {
                let items: Vec<Result<String>> = fragments.into_iter().map(Ok).collect();
                Ok(Box::pin(stream::iter(items)))
            }
            Reply::FragmentsThenFailure(fragments) => {
                let mut items: Vec<Result<String>> = fragments.into_iter().map(Ok).collect();
                items.push(Err(R3asonError::Timeout));
                Ok(Box::pin(stream::iter(items)))
            }
            Reply::Failure => Err(R3asonError::ApiError {
                status: 429,
                message: "rate limited".to_string(),
            }),
            _ => panic!("scripted reply is not a streaming reply"),
        }
    }
}

fn payload(final_answer: &str) -> String {
    json!({
        "interpretation": "x",
        "steps": [{"header": "Thinking about x", "details": "d", "number": 1}],
        "revisions": [],
        "final_answer": final_answer
    })
    .to_string()
}

#[tokio::test]
async fn test_successful_turns_grow_history_by_two_each() {
    let transport = ScriptedTransport::new(vec![
        Reply::Buffered(payload("first answer")),
        Reply::Buffered(payload("second answer")),
    ]);
    let mut session = ReasoningSession::new(transport, "test-model");

    let output = session
        .submit_turn("question one", DeliveryMode::Buffered, None)
        .await
        .unwrap();
    assert_eq!(output.final_answer, "first answer");
    assert_eq!(session.history().len(), 2);

    session
        .submit_turn("question two", DeliveryMode::Buffered, None)
        .await
        .unwrap();

    let history = session.history();
    assert_eq!(history.len(), 4);
    assert_eq!(history[0].role, Role::User);
    assert_eq!(history[0].content, "question one");
    assert_eq!(history[1].role, Role::Assistant);
    assert_eq!(history[1].content, "first answer");
    assert_eq!(history[2].role, Role::User);
    assert_eq!(history[3].role, Role::Assistant);
    assert_eq!(history[3].content, "second answer");
}

#[tokio::test]
async fn test_schema_violation_keeps_user_message() {
    let transport =
        ScriptedTransport::new(vec![Reply::Buffered(r#"{"interpretation":"x"}"#.to_string())]);
    let mut session = ReasoningSession::new(transport, "test-model");

    let err = session
        .submit_turn("question", DeliveryMode::Buffered, None)
        .await
        .unwrap_err();
    assert!(matches!(err, R3asonError::SchemaViolation(_)));

    // The failed turn still consumed conversation context
    let history = session.history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].role, Role::User);
    assert_eq!(history[0].content, "question");
}

#[tokio::test]
async fn test_transport_error_rolls_back_user_message() {
    let transport = ScriptedTransport::new(vec![Reply::Failure]);
    let mut session = ReasoningSession::new(transport, "test-model");

    let err = session
        .submit_turn("question", DeliveryMode::Buffered, None)
        .await
        .unwrap_err();
    assert!(matches!(err, R3asonError::ApiError { status: 500, .. }));
    assert!(session.history().is_empty());
}

#[tokio::test]
async fn test_incremental_accumulates_fragments_before_parsing() {
    // The payload is split mid-token; only the final accumulation parses
    let full = payload("streamed answer");
    let fragments: Vec<String> = vec![
        full[..10].to_string(),
        full[10..25].to_string(),
        full[25..].to_string(),
    ];

    let transport = ScriptedTransport::new(vec![Reply::Fragments(fragments)]);
    let mut session = ReasoningSession::new(transport, "test-model");

    let output = session
        .submit_turn("question", DeliveryMode::Incremental, None)
        .await
        .unwrap();

    assert_eq!(output.final_answer, "streamed answer");
    assert!(output.timing.starts_with("Time taken: "));

    let history = session.history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].role, Role::Assistant);
    assert_eq!(history[1].content, "streamed answer");
}

#[tokio::test]
async fn test_incremental_forwards_fragments_to_observer() {
    let full = payload("observed");
    let fragments: Vec<String> = full
        .as_bytes()
        .chunks(7)
        .map(|c| String::from_utf8(c.to_vec()).unwrap())
        .collect();

    let transport = ScriptedTransport::new(vec![Reply::Fragments(fragments)]);
    let mut session = ReasoningSession::new(transport, "test-model");

    let seen = RefCell::new(String::new());
    let observer: &dyn Fn(&str) = &|delta| seen.borrow_mut().push_str(delta);

    session
        .submit_turn("question", DeliveryMode::Incremental, Some(observer))
        .await
        .unwrap();

    assert_eq!(*seen.borrow(), full);
}

#[tokio::test]
async fn test_empty_stream_rolls_back_user_message() {
    let transport = ScriptedTransport::new(vec![Reply::Fragments(vec![])]);
    let mut session = ReasoningSession::new(transport, "test-model");

    let err = session
        .submit_turn("question", DeliveryMode::Incremental, None)
        .await
        .unwrap_err();
    assert!(matches!(err, R3asonError::EmptyStream));
    assert!(session.history().is_empty());
}

#[tokio::test]
async fn test_mid_stream_failure_rolls_back_user_message() {
    let transport = ScriptedTransport::new(vec![Reply::FragmentsThenFailure(vec![
        "{\"interp".to_string(),
    ])]);
    let mut session = ReasoningSession::new(transport, "test-model");

    let err = session
        .submit_turn("question", DeliveryMode::Incremental, None)
        .await
        .unwrap_err();
    assert!(matches!(err, R3asonError::Timeout));
    assert!(session.history().is_empty());
}

#[tokio::test]
async fn test_session_recovers_after_schema_violation() {
    let transport = ScriptedTransport::new(vec![
        Reply::Buffered("garbage".to_string()),
        Reply::Buffered(payload("recovered")),
    ]);
    let mut session = ReasoningSession::new(transport, "test-model");

    let err = session
        .submit_turn("first", DeliveryMode::Buffered, None)
        .await
        .unwrap_err();
    assert!(matches!(err, R3asonError::SchemaViolation(_)));

    let output = session
        .submit_turn("second", DeliveryMode::Buffered, None)
        .await
        .unwrap();
    assert_eq!(output.final_answer, "recovered");

    // One entry from the failed turn, two from the successful one
    assert_eq!(session.history().len(), 3);
}
