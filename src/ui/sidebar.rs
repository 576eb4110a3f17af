//! Suggested-topic strip and quick-resources panel

use crate::content::{Resource, Suggestion};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

/// One line listing the suggested topics and their function keys
pub struct SuggestionStrip<'a> {
    suggestions: &'a [Suggestion],
}

impl<'a> SuggestionStrip<'a> {
    pub fn new(suggestions: &'a [Suggestion]) -> Self {
        Self { suggestions }
    }

    pub fn line(&self) -> Line<'static> {
        let mut spans = vec![Span::styled(
            "Temas sugeridos: ",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )];
        for (index, suggestion) in self.suggestions.iter().enumerate() {
            if index > 0 {
                spans.push(Span::raw("  "));
            }
            spans.push(Span::styled(
                format!("F{}", index + 1),
                Style::default().fg(Color::Black).bg(Color::Yellow),
            ));
            spans.push(Span::styled(
                format!(" {}", suggestion.label),
                Style::default().fg(Color::White),
            ));
        }
        Line::from(spans)
    }
}

impl Widget for SuggestionStrip<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        buf.set_line(area.x, area.y, &self.line(), area.width);
    }
}

const TIP_TITLE: &str = "💡 Tip de Facilitación";
const TIP_LINES: &[&str] = &[
    "Recordá que los talleres son",
    "participativos. Usá las",
    "preguntas disparadoras de la",
    "guía para generar debate.",
];
const PROGRAM_FOOTER: &[&str] = &["Programa de Economía Personal", "y Familiar"];

/// Side panel with the quick-resource links
pub struct ResourcesPanel<'a> {
    resources: &'a [Resource],
}

impl<'a> ResourcesPanel<'a> {
    pub fn new(resources: &'a [Resource]) -> Self {
        Self { resources }
    }

    pub fn lines(&self) -> Vec<Line<'static>> {
        let mut lines = vec![
            Line::from(Span::styled(
                "Material para el orientador",
                Style::default().fg(Color::DarkGray),
            )),
            Line::default(),
        ];
        for resource in self.resources {
            lines.push(Line::from(vec![
                Span::raw(format!("{} ", resource.icon)),
                Span::styled(
                    resource.title,
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ),
            ]));
            lines.push(Line::from(Span::styled(
                format!("   {}", resource.description),
                Style::default().fg(Color::Gray),
            )));
            lines.push(Line::from(Span::styled(
                format!("   {}", resource.url),
                Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
            )));
            lines.push(Line::default());
        }

        lines.push(Line::from(Span::styled(
            TIP_TITLE,
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        lines.extend(
            TIP_LINES
                .iter()
                .map(|text| Line::from(Span::styled(*text, Style::default().fg(Color::Gray)))),
        );
        lines.push(Line::default());
        lines.extend(PROGRAM_FOOTER.iter().map(|text| {
            Line::from(Span::styled(*text, Style::default().fg(Color::DarkGray)))
        }));
        lines
    }
}

impl Widget for ResourcesPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Recursos rápidos ")
            .style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        block.render(area, buf);

        for (i, line) in self.lines().iter().take(inner.height as usize).enumerate() {
            buf.set_line(inner.x, inner.y + i as u16, line, inner.width);
        }
    }
}
