use crate::config::Config;
use crate::conversation::{HistoryTurn, Role};
use crate::error::{ChatError, Result};
use async_trait::async_trait;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::time::Duration;

/// Events emitted during LLM streaming
#[derive(Debug, Clone, PartialEq)]
pub enum LlmEvent {
    /// Text fragment from the streaming response
    TextDelta(String),
    /// Stream completed normally
    StreamComplete,
    /// Error occurred; no further events follow
    Error(String),
}

/// Receiving end of a response stream
pub type EventReceiver = mpsc::Receiver<LlmEvent>;

/// Request to send to the completion service
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system_instruction: String,
    pub history: Vec<HistoryTurn>,
    pub message: String,
}

impl CompletionRequest {
    pub fn new(
        system_instruction: impl Into<String>,
        history: Vec<HistoryTurn>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            system_instruction: system_instruction.into(),
            history,
            message: message.into(),
        }
    }
}

/// A hosted chat completion service that streams its answer
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Open a streaming completion. Fragments arrive on the returned channel,
    /// terminated by `StreamComplete` or `Error`.
    async fn stream_response(&self, request: CompletionRequest) -> Result<EventReceiver>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    system_instruction: Content,
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

impl Content {
    fn text(role: Option<Role>, text: impl Into<String>) -> Self {
        Self {
            role: role.map(|r| r.as_str()),
            parts: vec![Part { text: text.into() }],
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentChunk {
    #[serde(default)]
    candidates: Vec<Candidate>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: u16,
    #[serde(default)]
    message: String,
}

/// Streaming client for the Gemini `streamGenerateContent` endpoint
#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self> {
        // connect timeout only: the stream itself runs until the service ends it
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(15))
            .build()
            .map_err(ChatError::from)?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Build a client from configuration; `None` when no credential is available
    pub fn from_config(config: &Config) -> Result<Option<Self>> {
        Self::with_credential(config, config.credential())
    }

    /// Like [`from_config`](Self::from_config) with an already resolved credential
    pub fn with_credential(config: &Config, credential: Option<String>) -> Result<Option<Self>> {
        credential
            .map(|key| Self::new(key, &config.model, &config.base_url))
            .transpose()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:streamGenerateContent?alt=sse",
            self.base_url, self.model
        )
    }

    fn request_body(request: &CompletionRequest) -> GenerateContentRequest {
        let mut contents: Vec<Content> = request
            .history
            .iter()
            .map(|turn| Content::text(Some(turn.role), turn.text.clone()))
            .collect();
        contents.push(Content::text(Some(Role::User), request.message.clone()));

        GenerateContentRequest {
            system_instruction: Content::text(None, request.system_instruction.clone()),
            contents,
        }
    }

    async fn stream_from_provider(
        client: reqwest::Client,
        url: String,
        api_key: String,
        body: GenerateContentRequest,
        tx: mpsc::Sender<LlmEvent>,
    ) -> Result<()> {
        let response = client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(ChatError::from)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Provider {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        Self::process_sse_stream(response, tx).await
    }

    /// Process the server-sent events body, forwarding one fragment per chunk
    async fn process_sse_stream(
        response: reqwest::Response,
        tx: mpsc::Sender<LlmEvent>,
    ) -> Result<()> {
        let mut stream = response.bytes_stream();
        let mut lines = SseLineBuffer::default();
        let mut fragments = 0usize;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(ChatError::from)?;
            for line in lines.push(&chunk) {
                match parse_sse_line(&line)? {
                    SseLine::Fragment(text) => {
                        fragments += 1;
                        let _ = tx.send(LlmEvent::TextDelta(text)).await;
                    }
                    SseLine::Done => {
                        let _ = tx.send(LlmEvent::StreamComplete).await;
                        return Ok(());
                    }
                    SseLine::Skip => {}
                }
            }
        }

        // Flush any remaining buffer line (without newline)
        if let Some(line) = lines.finish() {
            if let SseLine::Fragment(text) = parse_sse_line(&line)? {
                fragments += 1;
                let _ = tx.send(LlmEvent::TextDelta(text)).await;
            }
        }

        tracing::debug!("Stream finished after {} fragments", fragments);
        let _ = tx.send(LlmEvent::StreamComplete).await;
        Ok(())
    }
}

#[async_trait]
impl CompletionClient for GeminiClient {
    async fn stream_response(&self, request: CompletionRequest) -> Result<EventReceiver> {
        let (tx, rx) = mpsc::channel(1000);

        let client = self.client.clone();
        let url = self.endpoint();
        let api_key = self.api_key.clone();
        let body = Self::request_body(&request);

        tracing::info!(
            model = %self.model,
            history = request.history.len(),
            "Opening completion stream"
        );

        let tx_clone = tx.clone();
        tokio::spawn(async move {
            if let Err(e) = Self::stream_from_provider(client, url, api_key, body, tx).await {
                let _ = tx_clone.send(LlmEvent::Error(e.to_string())).await;
            }
        });

        Ok(rx)
    }
}

/// Splits a byte stream into lines; multi-byte characters may straddle chunks
#[derive(Debug, Default)]
pub struct SseLineBuffer {
    pending: Vec<u8>,
}

impl SseLineBuffer {
    /// Append bytes and return every line completed by them
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(bytes);

        let mut lines = Vec::new();
        while let Some(newline_pos) = self.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=newline_pos).collect();
            lines.push(String::from_utf8_lossy(&line).trim().to_string());
        }
        lines
    }

    /// Whatever is left once the body ends
    pub fn finish(&mut self) -> Option<String> {
        let rest = String::from_utf8_lossy(&self.pending).trim().to_string();
        self.pending.clear();
        (!rest.is_empty()).then_some(rest)
    }
}

/// Meaning of a single server-sent events line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseLine {
    Fragment(String),
    Done,
    Skip,
}

/// Interpret one line of the SSE body
pub fn parse_sse_line(line: &str) -> Result<SseLine> {
    let Some(data) = line.strip_prefix("data:") else {
        return Ok(SseLine::Skip);
    };
    let data = data.trim();
    if data.is_empty() {
        return Ok(SseLine::Skip);
    }
    if data == "[DONE]" {
        return Ok(SseLine::Done);
    }

    let chunk: GenerateContentChunk = serde_json::from_str(data)
        .map_err(|e| ChatError::MalformedStream(format!("{e}: {data}")))?;

    if let Some(error) = chunk.error {
        return Err(ChatError::Provider {
            status: error.code,
            body: error.message,
        }
        .into());
    }

    let text: String = chunk
        .candidates
        .first()
        .and_then(|candidate| candidate.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|part| part.text.as_deref())
                .collect()
        })
        .unwrap_or_default();

    if text.is_empty() {
        Ok(SseLine::Skip)
    } else {
        Ok(SseLine::Fragment(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_text_parts() {
        let line = r#"data: {"candidates":[{"content":{"role":"model","parts":[{"text":"Hola"},{"text":" mundo"}]}}]}"#;
        assert_eq!(
            parse_sse_line(line).unwrap(),
            SseLine::Fragment("Hola mundo".to_string())
        );
    }

    #[test]
    fn skips_chunks_without_text() {
        let line = r#"data: {"candidates":[{"finishReason":"STOP"}],"usageMetadata":{"totalTokenCount":12}}"#;
        assert_eq!(parse_sse_line(line).unwrap(), SseLine::Skip);
        assert_eq!(parse_sse_line("").unwrap(), SseLine::Skip);
        assert_eq!(parse_sse_line(": keep-alive").unwrap(), SseLine::Skip);
    }

    #[test]
    fn done_marker() {
        assert_eq!(parse_sse_line("data: [DONE]").unwrap(), SseLine::Done);
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = parse_sse_line("data: {not json").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ChatError>(),
            Some(ChatError::MalformedStream(_))
        ));
    }

    #[test]
    fn error_chunk_is_provider_error() {
        let line = r#"data: {"error":{"code":503,"message":"overloaded"}}"#;
        let err = parse_sse_line(line).unwrap_err();
        match err.downcast_ref::<ChatError>() {
            Some(ChatError::Provider { status, body }) => {
                assert_eq!(*status, 503);
                assert_eq!(body, "overloaded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn line_buffer_handles_split_multibyte_chars() {
        let mut buffer = SseLineBuffer::default();
        let text = "data: á\n".as_bytes();
        // split inside the two-byte 'á'
        assert!(buffer.push(&text[..7]).is_empty());
        assert_eq!(buffer.push(&text[7..]), vec!["data: á".to_string()]);
        assert!(buffer.finish().is_none());
    }

    #[test]
    fn line_buffer_flushes_tail() {
        let mut buffer = SseLineBuffer::default();
        let lines = buffer.push(b"data: a\r\n\r\ndata: b");
        assert_eq!(lines, vec!["data: a".to_string(), String::new()]);
        assert_eq!(buffer.finish().as_deref(), Some("data: b"));
    }

    #[test]
    fn request_body_keeps_roles_and_appends_message() {
        let request = CompletionRequest::new(
            "sistema",
            vec![
                HistoryTurn { role: Role::Model, text: "bienvenida".to_string() },
                HistoryTurn { role: Role::User, text: "hola".to_string() },
            ],
            "¿y ahora?",
        );
        let body = serde_json::to_value(GeminiClient::request_body(&request)).unwrap();
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "sistema");
        assert!(body["systemInstruction"].get("role").is_none());
        let contents = body["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0]["role"], "model");
        assert_eq!(contents[1]["role"], "user");
        assert_eq!(contents[2]["role"], "user");
        assert_eq!(contents[2]["parts"][0]["text"], "¿y ahora?");
    }

    #[test]
    fn endpoint_uses_model_and_sse() {
        let client = GeminiClient::new("k", "gemini-2.5-flash", "http://localhost:1/v1beta/").unwrap();
        assert_eq!(
            client.endpoint(),
            "http://localhost:1/v1beta/models/gemini-2.5-flash:streamGenerateContent?alt=sse"
        );
    }

    #[test]
    fn no_credential_means_no_client() {
        let config = Config {
            api_key: None,
            ..Config::default()
        };
        let credential = config.credential_from(|_| None);
        assert!(GeminiClient::with_credential(&config, credential).unwrap().is_none());
    }

    #[test]
    fn credential_from_environment_builds_client() {
        let config = Config {
            model: "gemini-2.5-pro".to_string(),
            ..Config::default()
        };
        let credential = config.credential_from(|name| (name == "GEMINI_API_KEY").then(|| "k".to_string()));
        let client = GeminiClient::with_credential(&config, credential).unwrap().unwrap();
        assert_eq!(client.model(), "gemini-2.5-pro");
        assert_eq!(client.api_key, "k");
    }
}
