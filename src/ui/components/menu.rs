use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::app::LessonId;
use crate::ui::theme::Theme;

pub struct MenuItem {
    pub key: String,
    pub lesson: LessonId,
    pub label: String,
    pub description: String,
    pub available: bool,
}

pub struct Menu<'a> {
    pub items: Vec<MenuItem>,
    pub selected: usize,
    pub theme: &'a Theme,
}

impl<'a> Menu<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        let items = LessonId::ALL
            .iter()
            .map(|&lesson| MenuItem {
                key: lesson.number().to_string(),
                lesson,
                label: format!("{}차시  {}", lesson.number(), lesson.title()),
                description: lesson.description().to_string(),
                available: lesson.screen().is_some(),
            })
            .collect();
        Self {
            items,
            selected: 0,
            theme,
        }
    }

    pub fn next(&mut self) {
        self.selected = (self.selected + 1) % self.items.len();
    }

    pub fn prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        } else {
            self.selected = self.items.len() - 1;
        }
    }

    pub fn select_lesson(&mut self, lesson: LessonId) {
        if let Some(i) = self.items.iter().position(|item| item.lesson == lesson) {
            self.selected = i;
        }
    }

    pub fn selected_lesson(&self) -> Option<LessonId> {
        self.items.get(self.selected).map(|item| item.lesson)
    }
}

impl Widget for &Menu<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        let title_lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "kidlessons",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "차시를 선택하세요",
                Style::default().fg(colors.fg()),
            )),
        ];

        let title = Paragraph::new(title_lines).alignment(Alignment::Center);
        title.render(layout[0], buf);

        let menu_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                self.items
                    .iter()
                    .map(|_| Constraint::Length(2))
                    .collect::<Vec<_>>(),
            )
            .split(layout[2]);

        for (i, item) in self.items.iter().enumerate() {
            let is_selected = i == self.selected;
            let indicator = if is_selected { ">" } else { " " };

            let label_text = format!(" {indicator} [{key}] {label}", key = item.key, label = item.label);
            let desc_text = format!("       {}", item.description);

            let label_color = match (is_selected, item.available) {
                (true, _) => colors.accent(),
                (false, true) => colors.fg(),
                (false, false) => colors.text_muted(),
            };

            let lines = vec![
                Line::from(Span::styled(
                    &*label_text,
                    Style::default()
                        .fg(label_color)
                        .add_modifier(if is_selected {
                            Modifier::BOLD
                        } else {
                            Modifier::empty()
                        }),
                )),
                Line::from(Span::styled(
                    &*desc_text,
                    Style::default().fg(colors.text_muted()),
                )),
            ];

            let p = Paragraph::new(lines);
            if i < menu_layout.len() {
                p.render(menu_layout[i], buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_lists_all_lessons_in_order() {
        let theme = Theme::default();
        let menu = Menu::new(&theme);
        assert_eq!(menu.items.len(), 7);
        assert_eq!(menu.items[1].label, "2차시  4비트 윷놀이");
        let available: Vec<_> = menu
            .items
            .iter()
            .filter(|i| i.available)
            .map(|i| i.key.as_str())
            .collect();
        assert_eq!(available, vec!["2", "6", "7"]);
    }

    #[test]
    fn test_menu_wraps_selection() {
        let theme = Theme::default();
        let mut menu = Menu::new(&theme);
        menu.prev();
        assert_eq!(menu.selected_lesson(), Some(LessonId::DayReader));
        menu.next();
        assert_eq!(menu.selected_lesson(), Some(LessonId::Thief));
        menu.select_lesson(LessonId::LabelingQuiz);
        assert_eq!(menu.selected, 5);
    }
}
