use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::app::ScheduleScreen;
use crate::schedule::analysis::{self, format_duration, share_of_day};
use crate::schedule::entry::Category;
use crate::schedule::planner::{ChartTab, EntryTab, FormField, SchedulePlanner};
use crate::ui::components::progress_bar::ProgressBar;
use crate::ui::theme::Theme;

pub struct ScheduleView<'a> {
    screen: &'a ScheduleScreen,
    theme: &'a Theme,
    side_by_side: bool,
}

impl<'a> ScheduleView<'a> {
    pub fn new(screen: &'a ScheduleScreen, theme: &'a Theme, side_by_side: bool) -> Self {
        Self {
            screen,
            theme,
            side_by_side,
        }
    }

    fn tab_title(&self, labels: [&str; 2], active: usize) -> Line<'static> {
        let colors = &self.theme.colors;
        let mut spans = Vec::new();
        for (i, label) in labels.iter().enumerate() {
            let style = if i == active {
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else {
                Style::default().fg(colors.text_muted())
            };
            spans.push(Span::styled(format!(" {label} "), style));
        }
        Line::from(spans)
    }

    fn render_form(&self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let planner = &self.screen.planner;
        let form = &planner.form;

        let row = |field: FormField, label: &str, value: String| {
            let focused = form.focus == field;
            let style = if focused {
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.fg())
            };
            Line::from(vec![
                Span::styled(if focused { " > " } else { "   " }, style),
                Span::styled(format!("{label:<6}"), Style::default().fg(colors.text_muted())),
                Span::styled(value, style),
            ])
        };

        let time_value = |field: FormField, text: &str, meridiem: &str| {
            if form.focus == field {
                if let Some(input) = &self.screen.input {
                    return format!("{meridiem} {}_", input.value());
                }
            }
            if text.is_empty() {
                format!("{meridiem} --:--")
            } else {
                format!("{meridiem} {text}")
            }
        };

        let lines = vec![
            row(
                FormField::Category,
                "분류",
                format!(
                    "◀ {} ▶",
                    form.category.map(Category::display_name).unwrap_or("선택")
                ),
            ),
            row(
                FormField::Item,
                "활동",
                format!("◀ {} ▶", form.item.unwrap_or("선택")),
            ),
            row(
                FormField::Start,
                "시작",
                time_value(
                    FormField::Start,
                    &form.start_text,
                    form.start_meridiem.label(),
                ),
            ),
            row(
                FormField::End,
                "종료",
                time_value(FormField::End, &form.end_text, form.end_meridiem.label()),
            ),
            Line::from(""),
            row(FormField::Submit, "", "[ 추가하기 ]".to_string()),
        ];
        Paragraph::new(lines).render(area, buf);
    }

    fn render_list(&self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let planner = &self.screen.planner;
        if planner.plan().is_empty() {
            Paragraph::new(Span::styled(
                "추가된 일정이 없습니다.",
                Style::default().fg(colors.text_muted()),
            ))
            .alignment(Alignment::Center)
            .render(area, buf);
            return;
        }

        let lines: Vec<Line> = planner
            .plan()
            .entries()
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let selected = i == planner.list_selected;
                let style = if selected {
                    Style::default()
                        .fg(colors.accent())
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(colors.fg())
                };
                Line::from(vec![
                    Span::styled(if selected { " > " } else { "   " }, style),
                    Span::styled("■ ", Style::default().fg(colors.category(entry.category))),
                    Span::styled(
                        format!(
                            "{} - {}  {} ({})",
                            entry.start.display_12h(),
                            entry.end.display_12h(),
                            entry.label,
                            entry.category.display_name()
                        ),
                        style,
                    ),
                ])
            })
            .collect();
        Paragraph::new(lines).render(area, buf);
    }

    fn render_clock(&self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let slots = analysis::hourly_slots(self.screen.planner.plan().entries());

        let mut lines = Vec::new();
        for half in [0usize, 12] {
            let mut spans = Vec::new();
            for (hour, slot) in slots.iter().enumerate().skip(half).take(12) {
                let label = match hour % 12 {
                    0 => 12,
                    h => h,
                };
                let style = match slot {
                    Some(category) => Style::default().fg(colors.bg()).bg(colors.category(*category)),
                    None => Style::default().fg(colors.text_muted()).bg(colors.bar_empty()),
                };
                spans.push(Span::styled(format!("{label:>3}"), style));
            }
            let prefix = if half == 0 { "오전 " } else { "오후 " };
            let mut line = vec![Span::styled(prefix, Style::default().fg(colors.fg()))];
            line.extend(spans);
            lines.push(Line::from(line));
            lines.push(Line::from(""));
        }

        let mut legend = Vec::new();
        for category in Category::ALL {
            legend.push(Span::styled("■ ", Style::default().fg(colors.category(category))));
            legend.push(Span::styled(
                format!("{}  ", category.display_name()),
                Style::default().fg(colors.fg()),
            ));
        }
        lines.push(Line::from(legend));

        Paragraph::new(lines).render(area, buf);
    }

    fn render_chart(&self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let planner = &self.screen.planner;
        if planner.plan().is_empty() {
            Paragraph::new(Span::styled(
                "추가된 일정이 없습니다.",
                Style::default().fg(colors.text_muted()),
            ))
            .alignment(Alignment::Center)
            .render(area, buf);
            return;
        }

        let totals = analysis::aggregate(planner.plan().entries());
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3); 4])
            .split(area);
        for (row, (category, minutes)) in rows.iter().zip(totals.iter()) {
            let pct = share_of_day(minutes);
            ProgressBar::new(category.display_name(), pct / 100.0, self.theme)
                .with_text(format!("{} ({pct:.1}%)", format_duration(minutes)))
                .with_fill(colors.category(category))
                .render(*row, buf);
        }
    }

    fn render_result(&self, planner: &SchedulePlanner, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let text = if planner.is_analyzing() {
            "분석 중...".to_string()
        } else {
            planner.result_text().to_string()
        };
        Paragraph::new(text)
            .style(Style::default().fg(colors.fg()))
            .wrap(Wrap { trim: false })
            .block(
                Block::bordered()
                    .title(" AI 분석 결과 ")
                    .border_style(Style::default().fg(colors.border_focused())),
            )
            .render(area, buf);
    }
}

impl Widget for ScheduleView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let planner = &self.screen.planner;

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(10),
                Constraint::Length(6),
                Constraint::Length(1),
            ])
            .split(area);

        let direction = if self.side_by_side {
            Direction::Horizontal
        } else {
            Direction::Vertical
        };
        let panels = Layout::default()
            .direction(direction)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[0]);

        let entry_active = match planner.entry_tab {
            EntryTab::Form => 0,
            EntryTab::List => 1,
        };
        let entry_block = Block::bordered()
            .title(self.tab_title(["일과 추가하기", "일과 목록 보기"], entry_active))
            .border_style(Style::default().fg(colors.border()));
        let entry_inner = entry_block.inner(panels[0]);
        entry_block.render(panels[0], buf);
        match planner.entry_tab {
            EntryTab::Form => self.render_form(entry_inner, buf),
            EntryTab::List => self.render_list(entry_inner, buf),
        }

        let chart_active = match planner.chart_tab {
            ChartTab::Clock => 0,
            ChartTab::Chart => 1,
        };
        let chart_block = Block::bordered()
            .title(self.tab_title(["시계로 보기", "막대그래프로 보기"], chart_active))
            .border_style(Style::default().fg(colors.border()));
        let chart_inner = chart_block.inner(panels[1]);
        chart_block.render(panels[1], buf);
        match planner.chart_tab {
            ChartTab::Clock => self.render_clock(chart_inner, buf),
            ChartTab::Chart => self.render_chart(chart_inner, buf),
        }

        self.render_result(planner, rows[1], buf);

        if let Some(notice) = planner.notice() {
            Paragraph::new(Span::styled(
                notice.to_string(),
                Style::default().fg(colors.error()),
            ))
            .alignment(Alignment::Center)
            .render(rows[2], buf);
        }
    }
}
