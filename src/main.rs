mod app;
mod config;
mod event;
mod lesson;
mod schedule;
mod ui;
mod yut;

use std::fs::{self, OpenOptions};
use std::io;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::{Parser, ValueEnum};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use app::{App, AppScreen, LessonId, YutFocus};
use config::{Config, MAX_PLAYERS, MIN_PLAYERS};
use event::{AppEvent, EventHandler};
use lesson::flow::{Intent, Phase};
use schedule::planner::{EntryTab, FormField};
use ui::components::flower_view::FlowerView;
use ui::components::schedule_view::ScheduleView;
use ui::components::yut_view::YutView;
use ui::layout::{AppLayout, pack_hint_lines};
use ui::line_input::InputResult;
use ui::theme::Theme;
use yut::YutStage;
use yut::setup::SetupRow;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LessonArg {
    Yut,
    Flower,
    Schedule,
}

impl LessonArg {
    fn lesson(self) -> LessonId {
        match self {
            LessonArg::Yut => LessonId::BinaryYut,
            LessonArg::Flower => LessonId::LabelingQuiz,
            LessonArg::Schedule => LessonId::DayReader,
        }
    }
}

#[derive(Parser)]
#[command(name = "kidlessons", version, about = "Terminal mini-lessons for kids")]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, value_enum, help = "Open a lesson directly")]
    lesson: Option<LessonArg>,

    #[arg(short, long, help = "Default number of yut players (2-4)")]
    players: Option<usize>,
}

/// Log to a file under the data dir; the terminal belongs to the UI.
fn init_tracing() {
    let Some(dir) = dirs::data_dir().map(|d| d.join("kidlessons")) else {
        return;
    };
    if fs::create_dir_all(&dir).is_err() {
        return;
    }
    let Ok(file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("kidlessons.log"))
    else {
        return;
    };
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(
            EnvFilter::try_from_env("KIDLESSONS_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = Config::load().unwrap_or_else(|err| {
        warn!(%err, "config unreadable, using defaults");
        Config::default()
    });
    if let Some(players) = cli.players {
        config.default_player_count = players.clamp(MIN_PLAYERS, MAX_PLAYERS);
    }
    let theme_name = cli.theme.unwrap_or_else(|| config.theme.clone());
    let theme = Theme::load(&theme_name).unwrap_or_else(|| {
        warn!(theme = %theme_name, "unknown theme, using default");
        Theme::default()
    });
    let theme: &'static Theme = Box::leak(Box::new(theme));
    let tick_rate = Duration::from_millis(config.tick_rate_ms);

    let mut app = App::new(config, theme);
    if let Some(lesson) = cli.lesson {
        app.menu.select_lesson(lesson.lesson());
        app.open_lesson(lesson.lesson());
    }
    info!(theme = %theme.name, "starting");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(tick_rate);

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Tick => app.tick(Instant::now()),
            AppEvent::Resize(_, _) => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Menu => handle_menu_key(app, key),
        AppScreen::Flower => handle_flower_key(app, key),
        AppScreen::Yut => handle_yut_key(app, key),
        AppScreen::Schedule => handle_schedule_key(app, key),
    }
}

fn handle_menu_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char(ch @ '1'..='7') => {
            let index = ch as usize - '1' as usize;
            if let Some(&lesson) = LessonId::ALL.get(index) {
                app.menu.select_lesson(lesson);
                app.open_lesson(lesson);
            }
        }
        KeyCode::Up | KeyCode::Char('k') => app.menu.prev(),
        KeyCode::Down | KeyCode::Char('j') => app.menu.next(),
        KeyCode::Enter => app.open_selected(),
        _ => {}
    }
}

fn handle_flower_key(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Esc {
        app.go_to_menu();
        return;
    }
    let Some(flower) = app.flower.as_mut() else {
        return;
    };
    let now = Instant::now();

    let in_selection = matches!(flower.flow.phase(), Phase::Selection { .. });
    let in_test = matches!(flower.flow.phase(), Phase::Test { .. });

    let finished = if in_selection {
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => {
                flower.move_choice(false, now);
                false
            }
            KeyCode::Right | KeyCode::Char('l') => {
                flower.move_choice(true, now);
                false
            }
            KeyCode::Enter => flower.press_enter(now),
            _ => false,
        }
    } else if in_test {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                flower.move_test_cursor(false);
                false
            }
            KeyCode::Down | KeyCode::Char('j') => {
                flower.move_test_cursor(true);
                false
            }
            KeyCode::Char(ch @ '1'..='9') => {
                let index = ch as usize - '1' as usize;
                if index < flower.test_order().len() {
                    flower.test_cursor = index;
                }
                false
            }
            KeyCode::Char(' ') | KeyCode::Char('d') => {
                flower.drop_selected(now);
                false
            }
            KeyCode::Char('n') => flower.dispatch(Intent::Next, now),
            KeyCode::Enter => flower.press_enter(now),
            _ => false,
        }
    } else {
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => flower.press_enter(now),
            _ => false,
        }
    };

    if finished {
        app.finish_lesson();
    }
}

fn handle_yut_key(app: &mut App, key: KeyEvent) {
    let Some(yut) = app.yut.as_mut() else {
        return;
    };

    if let YutStage::Setup(setup) = yut.lesson.stage_mut() {
        match (setup.row, key.code) {
            (_, KeyCode::Esc) => app.go_to_menu(),
            (SetupRow::Count, KeyCode::Left) => {
                let count = setup.count().saturating_sub(1);
                setup.set_count(count);
            }
            (SetupRow::Count, KeyCode::Right) => {
                let count = setup.count() + 1;
                setup.set_count(count);
            }
            (SetupRow::Count, KeyCode::Down | KeyCode::Tab | KeyCode::Enter)
            | (SetupRow::Start, KeyCode::Down | KeyCode::Tab) => {
                setup.next_row();
                yut.bind_setup_input();
            }
            (SetupRow::Count | SetupRow::Start, KeyCode::Up | KeyCode::BackTab) => {
                setup.prev_row();
                yut.bind_setup_input();
            }
            (SetupRow::Start, KeyCode::Enter) => yut.start_game(),
            (SetupRow::Player(i), KeyCode::Tab) => setup.cycle_color(i),
            (SetupRow::Player(_), _) => match yut.input.handle(key) {
                InputResult::Submit | InputResult::FocusNext => {
                    yut.sync_setup_name();
                    if let YutStage::Setup(setup) = yut.lesson.stage_mut() {
                        setup.next_row();
                    }
                    yut.bind_setup_input();
                }
                InputResult::FocusPrev => {
                    yut.sync_setup_name();
                    if let YutStage::Setup(setup) = yut.lesson.stage_mut() {
                        setup.prev_row();
                    }
                    yut.bind_setup_input();
                }
                InputResult::Cancel => app.go_to_menu(),
                InputResult::Continue => yut.sync_setup_name(),
            },
            _ => {}
        }
        return;
    }

    let popup_open = yut.lesson.game().is_some_and(|g| g.popup().is_some());
    if popup_open {
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(game) = yut.lesson.game_mut() {
                    game.close_popup();
                }
            }
            KeyCode::Esc => app.go_to_menu(),
            _ => {}
        }
        return;
    }

    if yut.focus == YutFocus::Board {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => yut.move_board_cursor(-1, 0),
            KeyCode::Down | KeyCode::Char('j') => yut.move_board_cursor(1, 0),
            KeyCode::Left | KeyCode::Char('h') => yut.move_board_cursor(0, -1),
            KeyCode::Right | KeyCode::Char('l') => yut.move_board_cursor(0, 1),
            KeyCode::Enter => yut.inspect_cursor(Instant::now()),
            KeyCode::Char('b') | KeyCode::Esc | KeyCode::Tab => yut.focus = YutFocus::Guess,
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Esc => app.go_to_menu(),
        KeyCode::Char(' ') | KeyCode::Char('t') => {
            yut.throw();
        }
        KeyCode::Char('b') | KeyCode::Tab => yut.focus = YutFocus::Board,
        KeyCode::Char('r') => yut.restart(),
        KeyCode::Enter => {
            yut.submit_guess();
        }
        _ => {
            yut.input.handle(key);
        }
    }
}

fn handle_schedule_key(app: &mut App, key: KeyEvent) {
    let Some(schedule) = app.schedule.as_mut() else {
        return;
    };

    match key.code {
        KeyCode::Esc => {
            if schedule.planner.notice().is_some() {
                schedule.planner.dismiss_notice();
            } else {
                app.go_to_menu();
            }
            return;
        }
        KeyCode::Char('a') => {
            schedule.request_analysis(Instant::now());
            return;
        }
        KeyCode::Char('v') => {
            schedule.planner.toggle_chart_tab();
            return;
        }
        KeyCode::Char('l') => {
            schedule.sync_input();
            schedule.planner.toggle_entry_tab();
            let focus = schedule.planner.form.focus;
            schedule.focus(focus);
            return;
        }
        _ => {}
    }

    if schedule.planner.entry_tab == EntryTab::List {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => schedule.planner.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => schedule.planner.select_next(),
            KeyCode::Char('d') | KeyCode::Delete | KeyCode::Backspace => {
                schedule.planner.delete_selected();
            }
            _ => {}
        }
        return;
    }

    let field = schedule.planner.form.focus;
    if key.code == KeyCode::Char('m') {
        schedule.planner.form.toggle_meridiem();
        return;
    }

    if schedule.input.is_some() {
        let result = match schedule.input.as_mut() {
            Some(input) => input.handle(key),
            None => InputResult::Continue,
        };
        match result {
            InputResult::Submit => schedule.submit(),
            InputResult::FocusNext => {
                schedule.sync_input();
                schedule.focus(field.next());
            }
            InputResult::FocusPrev => {
                schedule.sync_input();
                schedule.focus(field.prev());
            }
            InputResult::Cancel | InputResult::Continue => schedule.sync_input(),
        }
        return;
    }

    match key.code {
        KeyCode::Left | KeyCode::Char('h') => match field {
            FormField::Category => schedule.planner.form.cycle_category(false),
            FormField::Item => schedule.planner.form.cycle_item(false),
            _ => {}
        },
        KeyCode::Right => match field {
            FormField::Category => schedule.planner.form.cycle_category(true),
            FormField::Item => schedule.planner.form.cycle_item(true),
            _ => {}
        },
        KeyCode::Down | KeyCode::Tab => schedule.focus(field.next()),
        KeyCode::Up | KeyCode::BackTab => schedule.focus(field.prev()),
        KeyCode::Enter => {
            if field == FormField::Submit {
                schedule.submit();
            } else {
                schedule.focus(field.next());
            }
        }
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Menu => render_menu(frame, app),
        AppScreen::Flower => render_flower(frame, app),
        AppScreen::Yut => render_yut(frame, app),
        AppScreen::Schedule => render_schedule(frame, app),
    }
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect, title: &str) {
    let colors = &app.theme.colors;
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " kidlessons ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("| {title}"),
            Style::default()
                .fg(colors.text_muted())
                .bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, area);
}

fn render_footer(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect, hints: &[&str]) {
    let colors = &app.theme.colors;
    let lines: Vec<Line> = pack_hint_lines(hints, area.width as usize)
        .into_iter()
        .map(|l| Line::from(Span::styled(l, Style::default().fg(colors.text_muted()))))
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_menu(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(frame, app, layout[0], "차시 선택");

    let menu_area = ui::layout::centered_rect(60, 90, 50, 20, layout[1]);
    frame.render_widget(&app.menu, menu_area);

    if let Some(notice) = &app.notice {
        let line = Paragraph::new(Span::styled(
            notice.as_str(),
            Style::default().fg(colors.warning()),
        ))
        .alignment(ratatui::layout::Alignment::Center);
        frame.render_widget(line, layout[2]);
    }

    render_footer(
        frame,
        app,
        layout[3],
        &["[1-7] 차시 열기", "[↑/↓] 이동", "[Enter] 시작", "[q] 종료"],
    );
}

fn render_flower(frame: &mut ratatui::Frame, app: &App) {
    let Some(flower) = &app.flower else {
        return;
    };
    let layout = AppLayout::new(frame.area());
    render_header(frame, app, layout.header, flower.flow.script().title);
    frame.render_widget(
        FlowerView::new(flower, app.theme, Instant::now()),
        layout.main,
    );
    let hints: &[&str] = match flower.flow.phase() {
        Phase::Selection { .. } => &["[←/→] 고르기", "[Enter] 선택", "[Esc] 메뉴"],
        Phase::Test { .. } => &[
            "[↑/↓] 꽃 고르기",
            "[Space] 인공지능에게 보여주기",
            "[n] 다음으로",
            "[Esc] 메뉴",
        ],
        _ => &["[Enter] 확인", "[Esc] 메뉴"],
    };
    render_footer(frame, app, layout.footer, hints);
}

fn render_yut(frame: &mut ratatui::Frame, app: &App) {
    let Some(yut) = &app.yut else {
        return;
    };
    let layout = AppLayout::new(frame.area());
    render_header(frame, app, layout.header, LessonId::BinaryYut.title());
    frame.render_widget(YutView::new(yut, app.theme), layout.main);
    let hints: &[&str] = match (yut.lesson.stage(), yut.focus) {
        (YutStage::Setup(_), _) => &[
            "[↑/↓] 이동",
            "[←/→] 인원",
            "[Tab] 색상",
            "[Enter] 게임 시작",
            "[Esc] 메뉴",
        ],
        (YutStage::Playing(_), YutFocus::Board) => {
            &["[방향키] 칸 이동", "[Enter] 칸 보기", "[b] 돌아가기"]
        }
        (YutStage::Playing(_), YutFocus::Guess) => &[
            "[Space] 윷 던지기",
            "[숫자+Enter] 정답 입력",
            "[b] 윷판 보기",
            "[r] 다시 시작",
            "[Esc] 메뉴",
        ],
    };
    render_footer(frame, app, layout.footer, hints);
}

fn render_schedule(frame: &mut ratatui::Frame, app: &App) {
    let Some(schedule) = &app.schedule else {
        return;
    };
    let layout = AppLayout::new(frame.area());
    render_header(frame, app, layout.header, LessonId::DayReader.title());
    frame.render_widget(
        ScheduleView::new(schedule, app.theme, layout.tier.side_by_side()),
        layout.main,
    );
    let hints: &[&str] = match schedule.planner.entry_tab {
        EntryTab::Form => &[
            "[↑/↓] 항목",
            "[←/→] 선택",
            "[m] 오전/오후",
            "[Enter] 추가",
            "[l] 목록",
            "[v] 그래프",
            "[a] 분석",
            "[Esc] 메뉴",
        ],
        EntryTab::List => &["[↑/↓] 이동", "[d] 삭제", "[l] 추가하기", "[v] 그래프", "[a] 분석"],
    };
    render_footer(frame, app, layout.footer, hints);
}
