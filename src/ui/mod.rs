//! Full-screen chat interface

pub mod conversation;
pub mod sidebar;
pub mod text;

use crate::commands::build_controller;
use crate::config::Config;
use anyhow::{Context, Result};
use conversation::{ConversationAction, ConversationManager};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Run the chat screen until the user exits
pub async fn run(config: Config) -> Result<()> {
    let controller = build_controller(&config)?;
    let mut manager = ConversationManager::new(controller, config.ui.show_sidebar);
    let tick_rate = Duration::from_millis(config.ui.tick_rate_ms);

    let mut terminal = init_terminal()?;
    install_panic_hook();

    let result = event_loop(&mut terminal, &mut manager, tick_rate).await;

    restore_terminal()?;
    terminal.show_cursor()?;
    if let Err(e) = &result {
        tracing::error!("Chat UI stopped: {:#}", e);
    }
    result
}

async fn event_loop(terminal: &mut Tui, manager: &mut ConversationManager, tick_rate: Duration) -> Result<()> {
    loop {
        manager.tick();
        terminal.draw(|frame| {
            let area = frame.size();
            manager.render(area, frame.buffer_mut());
        })?;

        // crossterm polling blocks; keep the runtime's other tasks moving
        if !tokio::task::block_in_place(|| event::poll(tick_rate))? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if manager.handle_key(key).await? == ConversationAction::Exit {
                tracing::info!("Exiting chat UI");
                return Ok(());
            }
        }
    }
}

fn init_terminal() -> Result<Tui> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    Terminal::new(CrosstermBackend::new(stdout)).context("Failed to create terminal")
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

fn install_panic_hook() {
    let original = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        original(info);
    }));
}
