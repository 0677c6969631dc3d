use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget, Wrap};

use crate::ui::theme::Theme;

/// A titled message box with a row of key-labelled buttons.
pub struct Popup<'a> {
    title: &'a str,
    body: Vec<Line<'a>>,
    buttons: Vec<(&'a str, &'a str)>,
    accent: Option<Color>,
    theme: &'a Theme,
}

impl<'a> Popup<'a> {
    pub fn new(title: &'a str, theme: &'a Theme) -> Self {
        Self {
            title,
            body: Vec::new(),
            buttons: Vec::new(),
            accent: None,
            theme,
        }
    }

    pub fn text(mut self, text: &'a str) -> Self {
        self.body.extend(text.lines().map(Line::from));
        self
    }

    pub fn line(mut self, line: Line<'a>) -> Self {
        self.body.push(line);
        self
    }

    /// `key` is shown in brackets before `label`.
    pub fn button(mut self, key: &'a str, label: &'a str) -> Self {
        self.buttons.push((key, label));
        self
    }

    pub fn accent(mut self, color: Color) -> Self {
        self.accent = Some(color);
        self
    }
}

impl Widget for Popup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let accent = self.accent.unwrap_or_else(|| colors.accent());

        Clear.render(area, buf);
        let block = Block::bordered()
            .title(Span::styled(
                format!(" {} ", self.title),
                Style::default().fg(accent).add_modifier(Modifier::BOLD),
            ))
            .border_style(Style::default().fg(accent))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(inner);

        Paragraph::new(self.body)
            .style(Style::default().fg(colors.fg()))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false })
            .render(rows[0], buf);

        let mut spans = Vec::new();
        for (i, (key, label)) in self.buttons.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("   "));
            }
            spans.push(Span::styled(
                format!("[{key}] {label}"),
                Style::default().fg(accent).add_modifier(Modifier::BOLD),
            ));
        }
        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .render(rows[1], buf);
    }
}
