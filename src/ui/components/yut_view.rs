use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::app::{YutFocus, YutScreen};
use crate::ui::components::popup::Popup;
use crate::ui::layout::centered_rect;
use crate::ui::line_input::LineInput;
use crate::ui::theme::{Theme, ThemeColors};
use crate::yut::YutStage;
use crate::yut::board::{self, BOARD_COLS, BOARD_ROWS, SpecialKind};
use crate::yut::game::YutGame;
use crate::yut::setup::{GameSetup, SetupRow};

/// Rows a stick can rise above the ground line in the throw area.
const TOSS_HEIGHT: u16 = 6;

pub struct YutView<'a> {
    screen: &'a YutScreen,
    theme: &'a Theme,
}

impl<'a> YutView<'a> {
    pub fn new(screen: &'a YutScreen, theme: &'a Theme) -> Self {
        Self { screen, theme }
    }
}

impl Widget for YutView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.screen.lesson.stage() {
            YutStage::Setup(setup) => render_setup(setup, &self.screen.input, self.theme, area, buf),
            YutStage::Playing(game) => render_game(self.screen, game, self.theme, area, buf),
        }
    }
}

fn input_spans<'a>(input: &'a LineInput, colors: &ThemeColors) -> Vec<Span<'a>> {
    let (before, cursor, after) = input.render_parts();
    let cursor_style = Style::default().fg(colors.bg()).bg(colors.fg());
    let cursor_text = match cursor {
        Some(ch) => ch.to_string(),
        None => " ".to_string(),
    };
    vec![
        Span::raw(before),
        Span::styled(cursor_text, cursor_style),
        Span::raw(after),
    ]
}

fn render_setup(setup: &GameSetup, input: &LineInput, theme: &Theme, area: Rect, buf: &mut Buffer) {
    let colors = &theme.colors;
    let dialog = centered_rect(50, 60, 44, 12, area);
    let block = Block::bordered()
        .title(" 플레이어 설정 ")
        .border_style(Style::default().fg(colors.border_focused()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(dialog);
    block.render(dialog, buf);

    let focused = |row: SetupRow| setup.row == row;
    let row_style = |on: bool| {
        if on {
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors.fg())
        }
    };

    let mut lines = vec![
        Line::from(Span::styled(
            format!(" 플레이어 수:  ◀ {} ▶", setup.count()),
            row_style(focused(SetupRow::Count)),
        )),
        Line::from(""),
    ];
    for (i, seat) in setup.seats().iter().take(setup.count()).enumerate() {
        let on = focused(SetupRow::Player(i));
        let mut spans = vec![
            Span::styled(if on { " > " } else { "   " }, row_style(on)),
            Span::styled("●", Style::default().fg(ThemeColors::player(seat.color))),
            Span::styled(format!(" {} ", seat.color.name()), row_style(on)),
        ];
        if on {
            spans.extend(input_spans(input, colors));
        } else {
            spans.push(Span::styled(seat.name.clone(), row_style(on)));
        }
        lines.push(Line::from(spans));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " [ 게임 시작 ]",
        row_style(focused(SetupRow::Start)),
    )));

    Paragraph::new(lines).render(inner, buf);
}

fn render_game(screen: &YutScreen, game: &YutGame, theme: &Theme, area: Rect, buf: &mut Buffer) {
    let colors = &theme.colors;
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(area);

    render_board(screen, game, theme, cols[0], buf);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(TOSS_HEIGHT + 3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(cols[1]);

    if let Some(player) = game.current_player() {
        Paragraph::new(Line::from(vec![
            Span::styled("● ", Style::default().fg(ThemeColors::player(player.color))),
            Span::styled(
                format!("{} 차례", player.name),
                Style::default()
                    .fg(colors.fg())
                    .add_modifier(Modifier::BOLD),
            ),
        ]))
        .alignment(Alignment::Center)
        .render(side[0], buf);
    }

    render_toss(game, theme, side[1], buf);

    let result = match game.shown_outcome() {
        Some(outcome) if game.toss().is_none() => outcome.to_string(),
        _ => "----".to_string(),
    };
    Paragraph::new(Span::styled(
        result,
        Style::default()
            .fg(colors.accent())
            .add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .block(
        Block::bordered()
            .title(" 이진수 결과 ")
            .border_style(Style::default().fg(colors.border())),
    )
    .render(side[2], buf);

    let guess_focused = screen.focus == YutFocus::Guess;
    Paragraph::new(Line::from(if guess_focused {
        input_spans(&screen.input, colors)
    } else {
        vec![Span::raw(screen.input.value())]
    }))
    .style(Style::default().fg(colors.fg()))
    .block(
        Block::bordered()
            .title(" 십진수로 얼마일까요? ")
            .border_style(Style::default().fg(if guess_focused {
                colors.border_focused()
            } else {
                colors.border()
            })),
    )
    .render(side[3], buf);

    if let Some(feedback) = game.feedback() {
        let color = if feedback.is_positive() {
            colors.success()
        } else {
            colors.error()
        };
        Paragraph::new(Span::styled(feedback.text(), Style::default().fg(color)))
            .alignment(Alignment::Center)
            .render(side[4], buf);
    }

    let button = if game.toss().is_some() {
        "던지는 중..."
    } else {
        "[Space] 윷 던지기"
    };
    let button_style = if game.can_throw() {
        Style::default()
            .fg(colors.accent())
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(colors.text_muted())
    };
    Paragraph::new(vec![
        Line::from(Span::styled(button, button_style)),
        Line::from(Span::styled(
            "[r] 게임 다시 시작하기",
            Style::default().fg(colors.text_muted()),
        )),
    ])
    .alignment(Alignment::Center)
    .render(side[6].union(side[5]), buf);

    if let Some(popup) = game.popup() {
        let popup_area = centered_rect(40, 30, 36, 7, area);
        Popup::new(popup.kind.title(), theme)
            .text(popup.message)
            .button("Enter", "확인")
            .accent(match popup.kind {
                SpecialKind::Benefit => colors.success(),
                SpecialKind::Penalty => colors.error(),
            })
            .render(popup_area, buf);
    }

    if let Some(special) = game.tooltip() {
        let tip_area = Rect::new(
            cols[0].x + 1,
            cols[0].bottom().saturating_sub(6),
            cols[0].width.saturating_sub(2).min(40),
            5,
        );
        Popup::new(special.kind.title(), theme)
            .text(special.message)
            .accent(colors.warning())
            .render(tip_area.intersection(area), buf);
    }
}

fn render_board(screen: &YutScreen, game: &YutGame, theme: &Theme, area: Rect, buf: &mut Buffer) {
    let colors = &theme.colors;
    let block = Block::bordered()
        .title(" 윷판 ")
        .border_style(Style::default().fg(colors.border()));
    let inner = block.inner(area);
    block.render(area, buf);

    let cell_w = inner.width / BOARD_COLS as u16;
    let cell_h = inner.height / BOARD_ROWS as u16;
    if cell_w < 3 || cell_h < 1 {
        return;
    }

    for row in 0..BOARD_ROWS {
        for col in 0..BOARD_COLS {
            let cell = board::cell_at(row, col);
            let rect = Rect::new(
                inner.x + col as u16 * cell_w,
                inner.y + row as u16 * cell_h,
                cell_w,
                cell_h,
            );

            let bg = if board::is_prime(cell) {
                colors.board_prime()
            } else {
                colors.board_cell()
            };
            let cursor = screen.focus == YutFocus::Board && screen.board_cursor == cell;
            let mut label_style = Style::default().fg(colors.fg()).bg(bg);
            if cursor {
                label_style = label_style.add_modifier(Modifier::REVERSED);
            }
            if board::special_cell(cell).is_some() {
                label_style = label_style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
            }

            let mut lines = vec![Line::from(Span::styled(board::cell_label(cell), label_style))];
            if cell_h > 1 {
                let mut pieces = Vec::new();
                for (i, player) in game.players().iter().enumerate() {
                    if game.display_position(i) == Some(cell) {
                        pieces.push(Span::styled(
                            "●",
                            Style::default().fg(ThemeColors::player(player.color)).bg(bg),
                        ));
                    }
                }
                lines.push(Line::from(pieces));
            }

            Paragraph::new(lines)
                .style(Style::default().bg(bg))
                .render(Rect::new(rect.x, rect.y, rect.width.saturating_sub(1), rect.height), buf);
        }
    }
}

fn render_toss(game: &YutGame, theme: &Theme, area: Rect, buf: &mut Buffer) {
    let colors = &theme.colors;
    let block = Block::bordered()
        .title(" 윷 ")
        .border_style(Style::default().fg(colors.border()));
    let inner = block.inner(area);
    block.render(area, buf);
    if inner.height == 0 || inner.width < 8 {
        return;
    }

    let ground = inner.bottom() - 1;
    let spacing = inner.width / 4;
    let faces = match (game.toss(), game.shown_outcome()) {
        (Some(toss), _) => {
            let sticks = *toss.sticks();
            sticks.map(|s| (s.face_up, s.y, s.airborne))
        }
        (None, Some(outcome)) => outcome.bits().map(|b| (b, 0.0, false)),
        (None, None) => [(true, 0.0, false); 4],
    };

    for (i, (face_up, y, airborne)) in faces.iter().enumerate() {
        let lift = ((-y / 40.0).max(0.0) as u16).min(inner.height.saturating_sub(1));
        let x = inner.x + i as u16 * spacing + spacing / 2;
        let symbol = if *airborne {
            "╱"
        } else if *face_up {
            "▮"
        } else {
            "▯"
        };
        let style = if *face_up {
            Style::default().fg(colors.accent())
        } else {
            Style::default().fg(colors.text_muted())
        };
        buf.set_string(x, ground - lift, symbol, style);
    }
}
