use anyhow::Result;
use std::io::{self, Write};
use std::sync::Arc;

use crate::config::Config;
use crate::content::{RESOURCES, SUGGESTIONS};
use crate::conversation::Role;
use crate::error::ChatError;
use crate::llm::{CompletionClient, GeminiClient};
use crate::streaming::{SendOutcome, StreamController};

/// Build the controller for a session, with a client only when a credential exists
pub fn build_controller(config: &Config) -> Result<StreamController> {
    Ok(controller_for(config, GeminiClient::from_config(config)?))
}

fn controller_for(config: &Config, client: Option<GeminiClient>) -> StreamController {
    let client = match client {
        Some(client) => {
            tracing::info!(model = client.model(), "Completion client ready");
            Some(Arc::new(client) as Arc<dyn CompletionClient>)
        }
        None => {
            tracing::warn!("API key is missing; set api_key in the config file or GEMINI_API_KEY. Sending is disabled");
            None
        }
    };
    StreamController::new(client).with_history_window(config.history_window)
}

/// Ask one question and stream the answer to stdout
pub async fn ask(config: &Config, question: &str) -> Result<()> {
    let mut controller = build_controller(config)?;
    if !controller.can_send() {
        return Err(ChatError::MissingCredential.into());
    }

    let mut current: Option<String> = None;
    let mut printed = 0usize;
    let mut stdout = io::stdout();
    let outcome = controller
        .send_with(question, |state| {
            let Some(last) = state.conversation().last() else {
                return;
            };
            if last.role != Role::Model {
                return;
            }
            if current.as_deref() != Some(last.id.as_str()) {
                if printed > 0 {
                    let _ = writeln!(stdout);
                }
                current = Some(last.id.clone());
                printed = 0;
            }
            // the message holds the full text so far; print only what is new
            if let Some(fresh) = last.text.get(printed..) {
                let _ = write!(stdout, "{}", fresh);
                let _ = stdout.flush();
                printed = last.text.len();
            }
        })
        .await;
    println!();

    match outcome {
        SendOutcome::Completed => Ok(()),
        SendOutcome::Failed => Err(anyhow::anyhow!("The assistant could not answer")),
        SendOutcome::Rejected(reason) => Err(anyhow::anyhow!("Question not sent: {:?}", reason)),
        SendOutcome::Streaming => Ok(()),
    }
}

pub fn list_suggestions() {
    println!("💡 Temas sugeridos:\n");
    for (index, suggestion) in SUGGESTIONS.iter().enumerate() {
        println!("  {}. {}", index + 1, suggestion.label);
        println!("     {}", suggestion.query);
    }
}

pub fn list_resources() {
    println!("📚 Recursos rápidos:\n");
    for resource in RESOURCES {
        println!("  {} {}", resource.icon, resource.title);
        println!("     {}", resource.description);
        println!("     {}", resource.url);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    /// Counts warnings and errors
    #[derive(Clone, Default)]
    struct WarningCounter(Arc<AtomicUsize>);

    impl<S: Subscriber> Layer<S> for WarningCounter {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let level = *event.metadata().level();
            if level == Level::WARN || level == Level::ERROR {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    fn count_warnings<T>(f: impl FnOnce() -> T) -> (T, usize) {
        let counter = WarningCounter::default();
        let subscriber = tracing_subscriber::registry().with(counter.clone());
        let value = tracing::subscriber::with_default(subscriber, f);
        (value, counter.0.load(Ordering::SeqCst))
    }

    #[test]
    fn missing_key_warns_once() {
        let config = Config::default();
        let client = GeminiClient::with_credential(&config, config.credential_from(|_| None)).unwrap();
        let (controller, warnings) = count_warnings(|| controller_for(&config, client));
        assert!(!controller.can_send());
        assert_eq!(warnings, 1);
    }

    #[test]
    fn configured_key_enables_sending() {
        let config = Config {
            history_window: 4,
            ..Config::default()
        };
        let client = GeminiClient::with_credential(&config, Some("k".to_string())).unwrap();
        let (controller, warnings) = count_warnings(|| controller_for(&config, client));
        assert!(controller.can_send());
        assert_eq!(warnings, 0);
    }
}
