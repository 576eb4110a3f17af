//! Integration tests for a multi-turn chat session with a scripted client

use async_trait::async_trait;
use orientador::conversation::Role;
use orientador::error::Result;
use orientador::llm::{CompletionClient, CompletionRequest, EventReceiver, LlmEvent};
use orientador::prompts::WELCOME_MESSAGE_ID;
use orientador::streaming::{RejectReason, SendOutcome, StreamController};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Answers every message with "respuesta N" and keeps the requests
#[derive(Default)]
struct NumberingClient {
    requests: Mutex<Vec<CompletionRequest>>,
}

#[async_trait]
impl CompletionClient for NumberingClient {
    async fn stream_response(&self, request: CompletionRequest) -> Result<EventReceiver> {
        let n = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request);
            requests.len()
        };
        let (tx, rx) = mpsc::channel(4);
        tokio::spawn(async move {
            let _ = tx.send(LlmEvent::TextDelta("respuesta ".to_string())).await;
            let _ = tx.send(LlmEvent::TextDelta(n.to_string())).await;
            let _ = tx.send(LlmEvent::StreamComplete).await;
        });
        Ok(rx)
    }
}

fn session() -> (StreamController, Arc<NumberingClient>) {
    let client = Arc::new(NumberingClient::default());
    let controller = StreamController::new(Some(client.clone() as Arc<dyn CompletionClient>));
    (controller, client)
}

#[tokio::test]
async fn test_session_starts_with_welcome() {
    let (controller, _) = session();
    let state = controller.state();
    assert_eq!(state.conversation().len(), 1);
    let welcome = state.conversation().last().unwrap();
    assert_eq!(welcome.id, WELCOME_MESSAGE_ID);
    assert_eq!(welcome.role, Role::Model);
    assert!(state.suggestions_visible());
    assert!(!state.is_busy());
}

#[tokio::test]
async fn test_history_window_slides() {
    let (controller, client) = session();
    let mut controller = controller.with_history_window(4);

    for i in 1..=4 {
        assert_eq!(controller.send(&format!("pregunta {i}")).await, SendOutcome::Completed);
    }

    let requests = client.requests.lock().unwrap();
    assert_eq!(requests.len(), 4);
    assert_eq!(requests[0].history.len(), 1);
    assert_eq!(requests[1].history.len(), 3);

    let last = &requests[3];
    assert_eq!(last.message, "pregunta 4");
    assert_eq!(last.history.len(), 4);
    assert_eq!(last.history[0].text, "pregunta 2");
    assert_eq!(last.history[3].role, Role::Model);
    assert_eq!(last.history[3].text, "respuesta 3");
    assert!(last.history.iter().all(|turn| turn.text != "pregunta 4"));
}

#[tokio::test]
async fn test_suggestions_hide_after_first_exchange() {
    let (mut controller, _) = session();
    assert_eq!(controller.send("Hola").await, SendOutcome::Completed);
    assert!(!controller.state().suggestions_visible());
}

#[tokio::test]
async fn test_split_send_and_finish() {
    let (mut controller, _) = session();
    controller.set_input("Hola");

    assert_eq!(controller.begin_send("Hola").await, SendOutcome::Streaming);
    assert!(controller.state().is_busy());
    assert!(controller.is_streaming());
    assert!(controller.state().input().is_empty());
    assert_eq!(
        controller.begin_send("otra").await,
        SendOutcome::Rejected(RejectReason::Busy)
    );

    assert_eq!(controller.finish_stream().await, SendOutcome::Completed);
    assert!(!controller.is_streaming());
    assert!(controller.streaming_message_id().is_none());

    let messages = controller.state().conversation().messages();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[2].text, "respuesta 1");
}

#[tokio::test]
async fn test_rejections_leave_state_alone() {
    let (mut controller, client) = session();
    assert_eq!(
        controller.send("   ").await,
        SendOutcome::Rejected(RejectReason::EmptyInput)
    );
    assert!(client.requests.lock().unwrap().is_empty());

    let mut offline = StreamController::new(None);
    offline.set_input("Hola");
    assert_eq!(
        offline.send("Hola").await,
        SendOutcome::Rejected(RejectReason::NoClient)
    );
    assert_eq!(offline.state().input(), "Hola");
    assert_eq!(offline.state().conversation().len(), 1);
    assert!(!offline.state().is_busy());
}
