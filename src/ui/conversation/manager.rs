use crate::content::{self, RESOURCES, SUGGESTIONS};
use crate::streaming::{SendOutcome, StreamController};
use crate::ui::conversation::{
    get_help_text, ComposerResult, ConversationComposer, ConversationHistory, ParsedCommand, SlashCommand,
    TypingIndicator,
};
use crate::ui::sidebar::{ResourcesPanel, SuggestionStrip};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        block::{Position, Title},
        Block, Borders, Clear, Paragraph, Widget, Wrap,
    },
};

const PLACEHOLDER: &str = "Preguntá sobre la guía, actividades o dinámicas...";
const TITLE: &str = "Asistente de Formación — Guía del Orientador";
const FOOTER: &str = "Este asistente es una herramienta de apoyo para orientadores.";
const SIDEBAR_WIDTH: u16 = 34;
const SCROLL_STEP: usize = 5;

/// Actions that can be requested by the conversation manager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationAction {
    None,
    Exit,
}

/// Owns the chat screen: routes keys, drives the stream, lays out widgets
pub struct ConversationManager {
    controller: StreamController,
    composer: ConversationComposer,
    sidebar_open: bool,
    scroll: usize,
    notice: Option<String>,
}

impl ConversationManager {
    pub fn new(controller: StreamController, sidebar_open: bool) -> Self {
        Self {
            controller,
            composer: ConversationComposer::new(PLACEHOLDER),
            sidebar_open,
            scroll: 0,
            notice: None,
        }
    }

    pub fn controller(&self) -> &StreamController {
        &self.controller
    }

    pub fn composer(&self) -> &ConversationComposer {
        &self.composer
    }

    pub fn sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Apply stream events received since the last tick
    pub fn tick(&mut self) -> bool {
        let changed = self.controller.poll_stream();
        self.sync_composer();
        changed
    }

    fn sync_composer(&mut self) {
        self.composer.set_enabled(!self.controller.state().is_busy());
    }

    /// Handle key input
    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<ConversationAction> {
        if key.kind != KeyEventKind::Press {
            return Ok(ConversationAction::None);
        }

        if self.notice.take().is_some() {
            return Ok(ConversationAction::None);
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => return Ok(ConversationAction::Exit),
            KeyCode::Esc if !self.composer.palette_open() => return Ok(ConversationAction::Exit),
            KeyCode::Char('b') if ctrl => {
                self.sidebar_open = !self.sidebar_open;
                return Ok(ConversationAction::None);
            }
            KeyCode::PageUp => {
                self.scroll += SCROLL_STEP;
                return Ok(ConversationAction::None);
            }
            KeyCode::PageDown => {
                self.scroll = self.scroll.saturating_sub(SCROLL_STEP);
                return Ok(ConversationAction::None);
            }
            KeyCode::F(number) => {
                self.send_suggestion(number as usize).await;
                return Ok(ConversationAction::None);
            }
            _ => {}
        }

        if self.controller.state().is_busy() {
            return Ok(ConversationAction::None);
        }

        match self.composer.handle_key(key) {
            ComposerResult::Submitted(input) => {
                self.submit(&input).await;
                Ok(ConversationAction::None)
            }
            ComposerResult::Command(command) => Ok(self.handle_slash_command(command).await),
            ComposerResult::None => {
                self.controller.set_input(self.composer.content());
                Ok(ConversationAction::None)
            }
        }
    }

    async fn submit(&mut self, text: &str) -> SendOutcome {
        let outcome = self.controller.begin_send(text).await;
        // cleared on an accepted send, untouched on a rejected one
        self.composer.set_content(self.controller.state().input());
        self.sync_composer();
        self.scroll = 0;
        outcome
    }

    async fn send_suggestion(&mut self, number: usize) {
        let state = self.controller.state();
        if state.is_busy() || !state.suggestions_visible() {
            return;
        }
        if let Some(suggestion) = content::suggestion(number) {
            self.submit(suggestion.query).await;
        }
    }

    /// Handle slash commands
    async fn handle_slash_command(&mut self, command: ParsedCommand) -> ConversationAction {
        match command.command {
            SlashCommand::Ayuda => {
                self.notice = Some(get_help_text());
            }
            SlashCommand::Recursos => {
                self.sidebar_open = !self.sidebar_open;
            }
            SlashCommand::Sugerencia => match command.suggestion_number().and_then(content::suggestion) {
                Some(suggestion) => {
                    self.submit(suggestion.query).await;
                }
                None => {
                    self.notice = Some(format!("Usá /sugerencia seguido de un número entre 1 y {}.", SUGGESTIONS.len()));
                }
            },
            SlashCommand::Salir => return ConversationAction::Exit,
        }
        self.controller.set_input(self.composer.content());
        ConversationAction::None
    }

    /// Render the whole chat screen
    pub fn render(&mut self, area: Rect, buf: &mut Buffer) {
        let state = self.controller.state();
        let status_height = u16::from(state.is_busy() || state.suggestions_visible());

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),             // Header
                Constraint::Min(5),                // Body
                Constraint::Length(status_height), // Typing indicator or suggestions
                Constraint::Length(3),             // Composer
                Constraint::Length(1),             // Footer
            ])
            .split(area);

        render_header(chunks[0], buf);

        let history_area = if self.sidebar_open {
            let body = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
                .split(chunks[1]);
            ResourcesPanel::new(RESOURCES).render(body[0], buf);
            body[1]
        } else {
            chunks[1]
        };

        let history = ConversationHistory::new(state.conversation().messages())
            .streaming(self.controller.streaming_message_id());
        // never scroll past the first line
        let total = history.lines(history_area.width.saturating_sub(2)).len();
        let visible = history_area.height.saturating_sub(2) as usize;
        self.scroll = self.scroll.min(total.saturating_sub(visible));
        history.scroll(self.scroll).render(history_area, buf);

        if state.is_busy() {
            TypingIndicator::new(true).render(chunks[2], buf);
        } else if state.suggestions_visible() {
            SuggestionStrip::new(SUGGESTIONS).render(chunks[2], buf);
        }

        (&self.composer).render(chunks[3], buf);

        Paragraph::new(Line::from(Span::styled(FOOTER, Style::default().fg(Color::DarkGray))))
            .alignment(Alignment::Center)
            .render(chunks[4], buf);

        if let Some(notice) = &self.notice {
            render_notice(notice, area, buf);
        }
    }
}

fn render_header(area: Rect, buf: &mut Buffer) {
    let block = Block::default()
        .borders(Borders::ALL)
        .style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    block.render(area, buf);

    let line = Line::from(vec![
        Span::raw("📘 "),
        Span::styled(TITLE, Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
        Span::styled("  ·  Cuentas Sanas sin esfuerzo", Style::default().fg(Color::DarkGray)),
    ]);
    buf.set_line(inner.x, inner.y, &line, inner.width);
}

fn render_notice(notice: &str, area: Rect, buf: &mut Buffer) {
    let width = area.width.saturating_sub(8).min(64);
    let height = (notice.lines().count() as u16 + 4).min(area.height);
    let popup = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    };
    Clear.render(popup, buf);

    Paragraph::new(notice)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Ayuda ")
                .title(Title::from(" Presioná una tecla para cerrar ").position(Position::Bottom))
                .style(Style::default().fg(Color::Yellow)),
        )
        .render(popup, buf);
}
