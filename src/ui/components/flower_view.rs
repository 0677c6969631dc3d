use std::time::Instant;

use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::app::FlowerScreen;
use crate::lesson::flow::Phase;
use crate::lesson::step::StepCounter;
use crate::ui::components::popup::Popup;
use crate::ui::components::progress_bar::ProgressBar;
use crate::ui::layout::centered_rect;
use crate::ui::theme::Theme;

pub struct FlowerView<'a> {
    screen: &'a FlowerScreen,
    theme: &'a Theme,
    now: Instant,
}

impl<'a> FlowerView<'a> {
    pub fn new(screen: &'a FlowerScreen, theme: &'a Theme, now: Instant) -> Self {
        Self { screen, theme, now }
    }

    fn training_ratio(&self) -> f64 {
        let total = self.screen.flow.timings().training.as_secs_f64();
        if total <= 0.0 {
            return 1.0;
        }
        match self.screen.training_remaining(self.now) {
            Some(left) => 1.0 - left.as_secs_f64() / total,
            None => 1.0,
        }
    }

    fn render_steps(
        &self,
        area: Rect,
        buf: &mut Buffer,
        title: &str,
        texts: &[&str],
        step: &StepCounter,
    ) {
        let colors = &self.theme.colors;
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(4),
                Constraint::Length(1),
            ])
            .split(area);

        let label = format!("{title} {}/{}", step.current(), step.total());
        ProgressBar::new(&label, step.current() as f64 / step.total() as f64, self.theme)
            .render(rows[0], buf);

        let text = texts.get(step.index()).copied().unwrap_or("");
        Paragraph::new(text)
            .style(Style::default().fg(colors.fg()))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false })
            .block(Block::bordered().border_style(Style::default().fg(colors.border())))
            .render(rows[1], buf);

        let button = if step.is_last() { "완료" } else { "확인" };
        Paragraph::new(Span::styled(
            format!("[Enter] {button}"),
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .render(rows[2], buf);
    }

    fn render_selection(&self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let flow = &self.screen.flow;
        let script = flow.script();
        let Phase::Selection {
            quiz_index,
            selected,
            feedback,
        } = flow.phase()
        else {
            return;
        };
        let Some(item) = flow.current_item() else {
            return;
        };

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(2),
                Constraint::Length(1),
            ])
            .split(area);

        let label = format!("문제 {}/{}", quiz_index + 1, script.quiz.len());
        ProgressBar::new(&label, (*quiz_index + 1) as f64 / script.quiz.len() as f64, self.theme)
            .render(rows[0], buf);

        let card = vec![
            Line::from(Span::styled(
                item.display_name,
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!("[이미지: {}]", item.image_ref),
                Style::default().fg(colors.text_muted()),
            )),
            Line::from(""),
            Line::from(script.selection_prompt),
        ];
        Paragraph::new(card)
            .style(Style::default().fg(colors.fg()))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false })
            .block(Block::bordered().border_style(Style::default().fg(colors.border())))
            .render(rows[1], buf);

        let mut spans = Vec::new();
        for (i, choice) in script.choices.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("   "));
            }
            let style = if *selected == Some(*choice) {
                Style::default()
                    .fg(colors.bg())
                    .bg(colors.accent())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.fg())
            };
            spans.push(Span::styled(format!(" {} ", choice.label()), style));
        }
        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .render(rows[2], buf);

        Paragraph::new(Span::styled(
            "[←/→] 고르기  [Enter] 선택",
            Style::default().fg(colors.text_muted()),
        ))
        .alignment(Alignment::Center)
        .render(rows[3], buf);

        if let Some(attempt) = feedback {
            let popup_area = centered_rect(60, 40, 44, 9, area);
            let popup = if attempt.is_correct {
                Popup::new(script.correct_title, self.theme)
                    .text(item.explanation)
                    .button("Enter", "다음")
                    .accent(colors.success())
            } else {
                Popup::new(script.retry_title, self.theme)
                    .text(script.retry_text)
                    .button("Enter", "확인")
                    .accent(colors.warning())
            };
            popup.render(popup_area, buf);
        }
    }

    fn render_training(&self, area: Rect, buf: &mut Buffer, loading: bool) {
        let colors = &self.theme.colors;
        let script = self.screen.flow.script();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),
                Constraint::Length(3),
                Constraint::Min(1),
            ])
            .split(area);

        Paragraph::new(script.training_text)
            .style(Style::default().fg(colors.fg()))
            .alignment(Alignment::Center)
            .render(rows[0], buf);
        ProgressBar::new("학습 중", self.training_ratio(), self.theme).render(rows[1], buf);

        if !loading {
            let popup_area = centered_rect(60, 40, 44, 8, area);
            Popup::new(script.trained_title, self.theme)
                .text(script.trained_text)
                .button("Enter", "확인")
                .accent(colors.success())
                .render(popup_area, buf);
        }
    }

    fn render_test(&self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let flow = &self.screen.flow;
        let script = flow.script();
        let Phase::Test {
            trick_pending,
            error_overlay,
            ..
        } = flow.phase()
        else {
            return;
        };

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Min(5),
                Constraint::Length(1),
            ])
            .split(area);

        Paragraph::new(script.test_prompt)
            .style(Style::default().fg(colors.fg()))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false })
            .render(rows[0], buf);

        let panels = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(rows[1]);

        let items: Vec<Line> = self
            .screen
            .test_order()
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let focused = i == self.screen.test_cursor;
                let marker = if focused { ">" } else { " " };
                let style = if focused {
                    Style::default()
                        .fg(colors.accent())
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(colors.fg())
                };
                Line::from(Span::styled(
                    format!(" {marker} [{}] {}", i + 1, item.name),
                    style,
                ))
            })
            .collect();
        Paragraph::new(items)
            .block(
                Block::bordered()
                    .title(" 꽃 사진 ")
                    .border_style(Style::default().fg(colors.border())),
            )
            .render(panels[0], buf);

        let mut model = vec![Line::from("")];
        match flow.shown_item() {
            Some(item) => {
                model.push(Line::from(Span::styled(
                    item.name,
                    Style::default().add_modifier(Modifier::BOLD),
                )));
                model.push(Line::from(format!(
                    "이 꽃은 {} 방식으로 씨를 퍼트립니다.",
                    item.result.label()
                )));
            }
            None => model.push(Line::from(Span::styled(
                "여기에 꽃 사진을 놓아 주세요.",
                Style::default().fg(colors.text_muted()),
            ))),
        }
        Paragraph::new(model)
            .style(Style::default().fg(colors.fg()))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false })
            .block(
                Block::bordered()
                    .title(" 인공지능 ")
                    .border_style(Style::default().fg(if *trick_pending {
                        colors.warning()
                    } else {
                        colors.border_focused()
                    })),
            )
            .render(panels[1], buf);

        Paragraph::new(Span::styled(
            "[↑/↓] 고르기  [Space] 놓기",
            Style::default().fg(colors.text_muted()),
        ))
        .alignment(Alignment::Center)
        .render(rows[2], buf);

        if *error_overlay {
            let popup_area = centered_rect(60, 40, 48, 9, area);
            Popup::new(script.error_title, self.theme)
                .text(script.error_text)
                .button("Enter", "계속하기")
                .button("n", "다음으로")
                .accent(colors.error())
                .render(popup_area, buf);
        }
    }
}

impl Widget for FlowerView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let script = self.screen.flow.script();
        match self.screen.flow.phase() {
            Phase::Intro { step } => {
                self.render_steps(area, buf, script.intro_title, script.intro, step)
            }
            Phase::Selection { .. } => self.render_selection(area, buf),
            Phase::Training { loading } => self.render_training(area, buf, *loading),
            Phase::Test { .. } => self.render_test(area, buf),
            Phase::Summary { step } => {
                self.render_steps(area, buf, script.summary_title, script.summary, step)
            }
        }
    }
}
