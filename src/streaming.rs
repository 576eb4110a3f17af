use crate::conversation::Message;
use crate::error::ChatError;
use crate::llm::{CompletionClient, CompletionRequest, EventReceiver, LlmEvent};
use crate::prompts::{APOLOGY_MESSAGE, SYSTEM_INSTRUCTION};
use crate::session::ChatState;
use crate::config::DEFAULT_HISTORY_WINDOW;
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc::error::TryRecvError;

/// Why a send was not started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Input was empty or whitespace only
    EmptyInput,
    /// No completion client is configured
    NoClient,
    /// A response is still streaming
    Busy,
}

/// Result of a send, or of one of its phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Rejected(RejectReason),
    /// Stream opened; events still pending
    Streaming,
    Completed,
    /// The apology was appended
    Failed,
}

/// The stream currently writing into an assistant message
struct ActiveStream {
    message_id: String,
    buffer: String,
    events: EventReceiver,
}

/// Drives a single conversation: appends turns, streams replies into it
pub struct StreamController {
    state: ChatState,
    client: Option<Arc<dyn CompletionClient>>,
    system_instruction: String,
    history_window: usize,
    active: Option<ActiveStream>,
}

impl StreamController {
    /// A controller for a fresh session. Without a client every send is rejected.
    pub fn new(client: Option<Arc<dyn CompletionClient>>) -> Self {
        Self {
            state: ChatState::with_welcome(),
            client,
            system_instruction: SYSTEM_INSTRUCTION.clone(),
            history_window: DEFAULT_HISTORY_WINDOW,
            active: None,
        }
    }

    pub fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = window;
        self
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = instruction.into();
        self
    }

    pub fn state(&self) -> &ChatState {
        &self.state
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.state.set_input(input);
    }

    pub fn can_send(&self) -> bool {
        self.client.is_some()
    }

    pub fn is_streaming(&self) -> bool {
        self.active.is_some()
    }

    /// Id of the assistant message currently being written
    pub fn streaming_message_id(&self) -> Option<&str> {
        self.active.as_ref().map(|active| active.message_id.as_str())
    }

    /// Send `text` and wait for the whole reply
    pub async fn send(&mut self, text: &str) -> SendOutcome {
        self.send_with(text, |_| {}).await
    }

    /// Like [`send`](Self::send), calling `observer` after every state change
    pub async fn send_with<F>(&mut self, text: &str, mut observer: F) -> SendOutcome
    where
        F: FnMut(&ChatState),
    {
        match self.begin(text, &mut observer).await {
            SendOutcome::Streaming => self.finish_stream_with(&mut observer).await,
            outcome => outcome,
        }
    }

    /// Append the user turn and open the response stream without waiting on it.
    /// Events are then applied by [`poll_stream`](Self::poll_stream) or
    /// [`finish_stream`](Self::finish_stream).
    pub async fn begin_send(&mut self, text: &str) -> SendOutcome {
        self.begin(text, &mut |_| {}).await
    }

    async fn begin(&mut self, text: &str, observer: &mut dyn FnMut(&ChatState)) -> SendOutcome {
        if text.trim().is_empty() {
            return SendOutcome::Rejected(RejectReason::EmptyInput);
        }
        let Some(client) = self.client.clone() else {
            tracing::warn!("Send ignored: no completion client configured");
            return SendOutcome::Rejected(RejectReason::NoClient);
        };
        if self.active.is_some() {
            tracing::warn!("Send ignored: a response is still streaming");
            return SendOutcome::Rejected(RejectReason::Busy);
        }

        // prior turns only; the new text travels as the request message
        let history = self.state.conversation().recent_history(self.history_window);

        if let Err(e) = self.state.append(Message::user(text)) {
            return self.fail(e, observer);
        }
        self.state.clear_input();
        self.state.set_busy(true);
        observer(&self.state);

        tracing::info!(chars = text.len(), history = history.len(), "Sending message");
        let request = CompletionRequest::new(self.system_instruction.clone(), history, text);

        let events = match client.stream_response(request).await {
            Ok(events) => events,
            Err(e) => return self.fail(e, observer),
        };

        let reply = Message::model("");
        let message_id = reply.id.clone();
        if let Err(e) = self.state.append(reply) {
            return self.fail(e, observer);
        }
        self.active = Some(ActiveStream {
            message_id,
            buffer: String::new(),
            events,
        });
        observer(&self.state);

        SendOutcome::Streaming
    }

    /// Apply every event already received, without waiting.
    /// Returns true when the state changed.
    pub fn poll_stream(&mut self) -> bool {
        let mut changed = false;
        loop {
            let Some(active) = self.active.as_mut() else {
                return changed;
            };
            match active.events.try_recv() {
                Ok(event) => {
                    self.apply_event(event);
                    changed = true;
                }
                Err(TryRecvError::Empty) => return changed,
                Err(TryRecvError::Disconnected) => {
                    self.apply_event(LlmEvent::Error(ChatError::StreamClosed.to_string()));
                    return true;
                }
            }
        }
    }

    /// Wait for the in-flight stream to end
    pub async fn finish_stream(&mut self) -> SendOutcome {
        self.finish_stream_with(&mut |_| {}).await
    }

    async fn finish_stream_with(&mut self, observer: &mut dyn FnMut(&ChatState)) -> SendOutcome {
        loop {
            let Some(active) = self.active.as_mut() else {
                return SendOutcome::Completed;
            };
            let event = active
                .events
                .recv()
                .await
                .unwrap_or_else(|| LlmEvent::Error(ChatError::StreamClosed.to_string()));
            let outcome = self.apply_event(event);
            observer(&self.state);
            if let Some(outcome) = outcome {
                return outcome;
            }
        }
    }

    /// Returns the final outcome once the stream is over
    fn apply_event(&mut self, event: LlmEvent) -> Option<SendOutcome> {
        match event {
            LlmEvent::TextDelta(delta) => {
                let active = self.active.as_mut()?;
                active.buffer.push_str(&delta);
                // whole response so far, not just the delta
                self.state.update_text(&active.message_id, active.buffer.clone());
                None
            }
            LlmEvent::StreamComplete => {
                if let Some(active) = self.active.take() {
                    tracing::info!(chars = active.buffer.len(), "Response complete");
                }
                self.state.set_busy(false);
                Some(SendOutcome::Completed)
            }
            LlmEvent::Error(error) => Some(self.fail(error, &mut |_| {})),
        }
    }

    /// Partial text already written stays in place; only the buffer is dropped
    fn fail(&mut self, error: impl fmt::Display, observer: &mut dyn FnMut(&ChatState)) -> SendOutcome {
        tracing::error!("Error generating response: {}", error);
        self.active = None;
        if let Err(e) = self.state.append(Message::model(APOLOGY_MESSAGE)) {
            tracing::error!("Could not record apology: {}", e);
        }
        self.state.set_busy(false);
        observer(&self.state);
        SendOutcome::Failed
    }
}
