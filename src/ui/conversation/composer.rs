use crate::ui::conversation::commands::{command_entries, parse_slash_command, CommandEntry, ParsedCommand};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Widget},
};

/// Result returned when the user interacts with the conversation composer
#[derive(Debug, PartialEq)]
pub enum ComposerResult {
    Submitted(String),
    Command(ParsedCommand),
    None,
}

/// Single-line input with a slash-command palette.
/// The cursor is a char index into `content`.
#[derive(Debug, Clone)]
pub struct ConversationComposer {
    content: String,
    cursor: usize,
    placeholder: String,
    enabled: bool,
    command_entries: Vec<CommandEntry>,
    filtered_commands: Vec<CommandEntry>,
    show_command_palette: bool,
    selected_command: Option<usize>,
}

impl ConversationComposer {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            content: String::new(),
            cursor: 0,
            placeholder: placeholder.into(),
            enabled: true,
            command_entries: command_entries(),
            filtered_commands: Vec::new(),
            show_command_palette: false,
            selected_command: None,
        }
    }

    /// Handle key input
    pub fn handle_key(&mut self, key: KeyEvent) -> ComposerResult {
        if key.kind != KeyEventKind::Press {
            return ComposerResult::None;
        }

        match key.code {
            KeyCode::Enter => {
                if self.show_command_palette && self.apply_selected_command() {
                    return ComposerResult::None;
                }
                if self.content.trim().is_empty() {
                    return ComposerResult::None;
                }
                if let Some(command) = parse_slash_command(&self.content) {
                    self.set_content("");
                    return ComposerResult::Command(command);
                }
                self.close_command_palette();
                return ComposerResult::Submitted(self.content.clone());
            }
            KeyCode::Up if self.show_command_palette => self.move_command_selection(-1),
            KeyCode::Down if self.show_command_palette => self.move_command_selection(1),
            KeyCode::Esc if self.show_command_palette => self.close_command_palette(),
            KeyCode::Tab if self.show_command_palette => {
                self.apply_selected_command();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.insert_char(c);
                self.sync_command_palette();
            }
            KeyCode::Backspace => {
                if self.backspace() {
                    self.sync_command_palette();
                }
            }
            KeyCode::Delete => {
                if self.delete() {
                    self.sync_command_palette();
                }
            }
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.char_len()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.char_len(),
            _ => {}
        }

        ComposerResult::None
    }

    fn char_len(&self) -> usize {
        self.content.chars().count()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.content
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.content.len())
    }

    /// Insert a character at the cursor position
    fn insert_char(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.content.insert(at, c);
        self.cursor += 1;
    }

    /// Delete character before cursor
    fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.content.remove(at);
        true
    }

    /// Delete character at cursor
    fn delete(&mut self) -> bool {
        if self.cursor >= self.char_len() {
            return false;
        }
        let at = self.byte_index(self.cursor);
        self.content.remove(at);
        true
    }

    fn sync_command_palette(&mut self) {
        let typing_command = self.content.starts_with('/') && !self.content.contains(char::is_whitespace);
        if typing_command {
            if !self.show_command_palette {
                self.show_command_palette = true;
                self.selected_command = Some(0);
            }
            self.refresh_command_palette();
        } else {
            self.close_command_palette();
        }
    }

    fn close_command_palette(&mut self) {
        self.show_command_palette = false;
        self.filtered_commands.clear();
        self.selected_command = None;
    }

    fn refresh_command_palette(&mut self) {
        let query = self.content.trim_start_matches('/').to_lowercase();
        self.filtered_commands = self
            .command_entries
            .iter()
            .filter(|entry| query.is_empty() || entry.keyword.starts_with(&query))
            .copied()
            .collect();

        if self.filtered_commands.is_empty() {
            self.selected_command = None;
        } else {
            let index = self.selected_command.unwrap_or(0);
            self.selected_command = Some(index.min(self.filtered_commands.len() - 1));
        }
    }

    fn move_command_selection(&mut self, delta: isize) {
        if self.filtered_commands.is_empty() {
            self.selected_command = None;
            return;
        }

        let len = self.filtered_commands.len() as isize;
        let current = self.selected_command.unwrap_or(0) as isize;
        self.selected_command = Some((current + delta).rem_euclid(len) as usize);
    }

    fn apply_selected_command(&mut self) -> bool {
        let Some(entry) = self
            .selected_command
            .and_then(|index| self.filtered_commands.get(index))
            .copied()
        else {
            return false;
        };

        self.set_content(format!("/{} ", entry.keyword));
        true
    }

    /// Replace the content and move the cursor to its end
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.cursor = self.char_len();
        self.close_command_palette();
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn palette_open(&self) -> bool {
        self.show_command_palette
    }
}

impl Widget for &ConversationComposer {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(if self.enabled { " Tu pregunta " } else { " Esperando respuesta… " })
            .style(if self.enabled {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::DarkGray)
            });

        let inner_area = block.inner(area);
        block.render(area, buf);

        if self.content.is_empty() {
            let placeholder_line = Line::from(vec![Span::styled(
                self.placeholder.as_str(),
                Style::default().fg(Color::DarkGray),
            )]);
            buf.set_line(inner_area.x, inner_area.y, &placeholder_line, inner_area.width);
        } else {
            // keep the cursor in view on long input
            let visible = inner_area.width.saturating_sub(1) as usize;
            let skip = self.cursor.saturating_sub(visible);
            let mut shown: String = self.content.chars().skip(skip).collect();
            if self.enabled {
                let at = shown
                    .char_indices()
                    .nth(self.cursor - skip)
                    .map(|(i, _)| i)
                    .unwrap_or(shown.len());
                shown.insert(at, '▌');
            }
            let line = Line::from(vec![Span::raw(shown)]);
            buf.set_line(inner_area.x, inner_area.y, &line, inner_area.width);
        }

        if self.show_command_palette && !self.filtered_commands.is_empty() {
            let palette_height = (self.filtered_commands.len().min(5) + 2) as u16;
            let palette_area = Rect {
                x: inner_area.x,
                y: area.y.saturating_sub(palette_height),
                width: inner_area.width,
                height: palette_height.min(area.y),
            };
            Clear.render(palette_area, buf);

            let block = Block::default()
                .borders(Borders::ALL)
                .title("Comandos")
                .style(Style::default().fg(Color::Blue));
            let inner = block.inner(palette_area);
            block.render(palette_area, buf);

            for (index, entry) in self.filtered_commands.iter().enumerate() {
                if index >= inner.height as usize {
                    break;
                }

                let style = if self.selected_command == Some(index) {
                    Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };

                let line = Line::from(vec![
                    Span::styled(format!("/{}", entry.keyword), style),
                    Span::styled(" - ", Style::default().fg(Color::DarkGray)),
                    Span::styled(entry.description, Style::default().fg(Color::Gray)),
                ]);

                buf.set_line(inner.x, inner.y + index as u16, &line, inner.width);
            }
        }
    }
}
