use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Widget,
};
use std::time::{SystemTime, UNIX_EPOCH};

/// "Assistant is typing" line shown while a response streams in
#[derive(Debug, Clone, Copy, Default)]
pub struct TypingIndicator {
    active: bool,
}

impl TypingIndicator {
    pub fn new(active: bool) -> Self {
        Self { active }
    }

    /// Dots for a given moment, cycling every 1.2s
    pub fn dots(millis: u128) -> &'static str {
        match (millis / 300) % 4 {
            0 => ".",
            1 => "..",
            2 => "...",
            _ => "   ",
        }
    }
}

impl Widget for TypingIndicator {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.active || area.height == 0 {
            return;
        }

        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();

        let indicator = Line::from(vec![
            Span::styled("🤖 ", Style::default().fg(Color::Green)),
            Span::styled("Escribiendo", Style::default().fg(Color::Green)),
            Span::styled(Self::dots(millis), Style::default().fg(Color::Yellow)),
        ]);
        buf.set_line(area.x, area.y, &indicator, area.width);
    }
}
