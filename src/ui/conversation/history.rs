//! Conversation history display component

use crate::conversation::{Message, Role};
use crate::ui::text::{styled_line, wrap_text};
use chrono::{DateTime, Local, TimeZone, Utc};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};
use std::fmt;

/// Renders the message list, pinned to the bottom unless scrolled back
pub struct ConversationHistory<'a> {
    messages: &'a [Message],
    streaming_id: Option<&'a str>,
    scroll: usize,
}

impl<'a> ConversationHistory<'a> {
    pub fn new(messages: &'a [Message]) -> Self {
        Self {
            messages,
            streaming_id: None,
            scroll: 0,
        }
    }

    /// Mark the message still receiving text; it gets a trailing cursor
    pub fn streaming(mut self, id: Option<&'a str>) -> Self {
        self.streaming_id = id;
        self
    }

    /// Lines scrolled back from the bottom
    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }

    /// All lines for the given content width
    pub fn lines(&self, width: u16) -> Vec<Line<'static>> {
        let mut all_lines = Vec::new();
        for message in self.messages {
            all_lines.extend(self.render_message(message, width));
            // spacing between messages
            all_lines.push(Line::default());
        }
        all_lines.pop();
        all_lines
    }

    fn render_message(&self, message: &Message, width: u16) -> Vec<Line<'static>> {
        let mut lines = Vec::new();

        let (icon, name) = match message.role {
            Role::User => ("👤", "Vos"),
            Role::Model => ("🤖", "Asistente"),
        };
        let timestamp = local_time(&message.timestamp);
        lines.push(Line::from(vec![
            Span::styled(format!("{icon} {name} "), header_style(message.role)),
            Span::styled(timestamp, Style::default().fg(Color::DarkGray)),
        ]));

        let base = content_style(message.role);
        let mut bold = false;
        let mut content: Vec<Line<'static>> = wrap_text(&message.text, width.saturating_sub(2) as usize)
            .iter()
            .map(|text| {
                let mut line = styled_line(text, &mut bold, base);
                line.spans.insert(0, Span::raw("  "));
                line
            })
            .collect();

        if self.streaming_id == Some(message.id.as_str()) {
            if let Some(last) = content.last_mut() {
                last.spans.push(Span::styled("▋", Style::default().fg(Color::Yellow)));
            }
        }

        lines.append(&mut content);
        lines
    }
}

/// `HH:MM` on the user's own clock
fn local_time(timestamp: &DateTime<Utc>) -> String {
    clock_time(timestamp, &Local)
}

fn clock_time<Tz: TimeZone>(timestamp: &DateTime<Utc>, zone: &Tz) -> String
where
    Tz::Offset: fmt::Display,
{
    timestamp.with_timezone(zone).format("%H:%M").to_string()
}

fn header_style(role: Role) -> Style {
    match role {
        Role::User => Style::default().fg(Color::Cyan),
        Role::Model => Style::default().fg(Color::Green),
    }
}

fn content_style(role: Role) -> Style {
    match role {
        Role::User => Style::default().fg(Color::White),
        Role::Model => Style::default().fg(Color::Gray),
    }
}

impl Widget for ConversationHistory<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" 💬 Conversación ");

        let inner_area = block.inner(area);
        block.render(area, buf);

        let all_lines = self.lines(inner_area.width);

        // Determine the range of lines to display from the bottom
        let height = inner_area.height as usize;
        let end = all_lines.len().saturating_sub(self.scroll).max(height.min(all_lines.len()));
        let start = end.saturating_sub(height);

        for (i, line) in all_lines[start..end].iter().enumerate() {
            buf.set_line(inner_area.x, inner_area.y + i as u16, line, inner_area.width);
        }
    }
}
