//! Line wrapping and `**bold**` highlighting for message text

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

/// Wrap text to fit within the given width, keeping explicit line breaks
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current_line = String::new();
        let mut current_width = 0;

        for word in paragraph.split_whitespace() {
            let word_width = word.chars().count();
            if current_width > 0 && current_width + 1 + word_width > width {
                lines.push(std::mem::take(&mut current_line));
                current_width = 0;
            }
            if current_width > 0 {
                current_line.push(' ');
                current_width += 1;
            }
            current_line.push_str(word);
            current_width += word_width;
        }

        lines.push(current_line);
    }

    lines
}

/// Turn one wrapped line into spans, toggling bold at each `**`.
/// `bold` carries the open/closed state across lines.
pub fn styled_line(text: &str, bold: &mut bool, base: Style) -> Line<'static> {
    let mut spans = Vec::new();
    for (index, segment) in text.split("**").enumerate() {
        if index > 0 {
            *bold = !*bold;
        }
        if segment.is_empty() {
            continue;
        }
        let style = if *bold {
            base.add_modifier(Modifier::BOLD)
        } else {
            base
        };
        spans.push(Span::styled(segment.to_string(), style));
    }
    Line::from(spans)
}
