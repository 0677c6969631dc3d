use std::time::Instant;

use rand::{RngCore, SeedableRng};
use rand::rngs::SmallRng;
use tracing::info;

use crate::config::Config;
use crate::lesson::Effect;
use crate::lesson::flow::{FlowTimer, FlowTimings, Intent, LessonFlow, Phase};
use crate::lesson::script::{FLOWER_LESSON, Pollination, TestItem};
use crate::lesson::timer::Timers;
use crate::schedule::planner::{FormField, PlannerTimer, PlannerTimings, SchedulePlanner};
use crate::ui::components::menu::Menu;
use crate::ui::line_input::{InputField, LineInput};
use crate::ui::theme::Theme;
use crate::yut::board::{self, END};
use crate::yut::game::{GuessError, GuessVerdict, YutTimer};
use crate::yut::setup::SetupRow;
use crate::yut::{YutLesson, YutStage};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Menu,
    Flower,
    Yut,
    Schedule,
}

/// Every lesson of the course. Only some are built.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LessonId {
    Thief,
    BinaryYut,
    WhoAreYou,
    PolarBear,
    Signal,
    LabelingQuiz,
    DayReader,
}

impl LessonId {
    pub const ALL: [LessonId; 7] = [
        LessonId::Thief,
        LessonId::BinaryYut,
        LessonId::WhoAreYou,
        LessonId::PolarBear,
        LessonId::Signal,
        LessonId::LabelingQuiz,
        LessonId::DayReader,
    ];

    pub fn number(self) -> usize {
        Self::ALL.iter().position(|l| *l == self).unwrap_or(0) + 1
    }

    pub fn title(self) -> &'static str {
        match self {
            LessonId::Thief => "고을에 도둑이 들었소",
            LessonId::BinaryYut => "4비트 윷놀이",
            LessonId::WhoAreYou => "Who are U?",
            LessonId::PolarBear => "북극곰을 도와줘!",
            LessonId::Signal => "시그널 원해",
            LessonId::LabelingQuiz => "배운 것만 말해요",
            LessonId::DayReader => "하루를 읽어주는 AI",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            LessonId::BinaryYut => "윷놀이를 통해 이진수를 배워봅시다.",
            LessonId::LabelingQuiz => {
                "인공지능이 학습하는 방법과 학습 데이터의 중요성을 배워봅시다."
            }
            LessonId::DayReader => "AI가 하루 일과를 분석하고 효율적인 시간 관리를 도와줍니다.",
            _ => "준비 중인 차시입니다.",
        }
    }

    pub fn screen(self) -> Option<AppScreen> {
        match self {
            LessonId::BinaryYut => Some(AppScreen::Yut),
            LessonId::LabelingQuiz => Some(AppScreen::Flower),
            LessonId::DayReader => Some(AppScreen::Schedule),
            _ => None,
        }
    }
}

/// Queue scheduled timers and report whether the lesson asked to exit.
fn apply_effects<T: Copy + PartialEq>(
    timers: &mut Timers<T>,
    effects: Vec<Effect<T>>,
    now: Instant,
) -> bool {
    let mut exit = false;
    for effect in effects {
        match effect {
            Effect::Schedule { timer, after } => timers.schedule(timer, after, now),
            Effect::Exit => exit = true,
        }
    }
    exit
}

pub struct FlowerScreen {
    pub flow: LessonFlow<Pollination>,
    timers: Timers<FlowTimer>,
    pub choice_cursor: usize,
    pub test_cursor: usize,
}

impl FlowerScreen {
    fn new(timings: FlowTimings) -> Self {
        Self {
            flow: LessonFlow::new(&FLOWER_LESSON, timings),
            timers: Timers::new(),
            choice_cursor: 0,
            test_cursor: 0,
        }
    }

    /// Returns true when the lesson is over.
    pub fn dispatch(&mut self, intent: Intent<Pollination>, now: Instant) -> bool {
        let effects = self.flow.dispatch(intent);
        apply_effects(&mut self.timers, effects, now)
    }

    pub fn press_enter(&mut self, now: Instant) -> bool {
        let effects = self.flow.press_enter();
        apply_effects(&mut self.timers, effects, now)
    }

    pub fn tick(&mut self, now: Instant) -> bool {
        let mut exit = false;
        for timer in self.timers.take_due(now) {
            exit |= self.dispatch(Intent::TimerFired(timer), now);
        }
        exit
    }

    /// Move the keyboard highlight across the answer buttons.
    pub fn move_choice(&mut self, forward: bool, now: Instant) {
        let choices = self.flow.script().choices;
        if choices.is_empty() {
            return;
        }
        let len = choices.len();
        self.choice_cursor = if forward {
            (self.choice_cursor + 1) % len
        } else {
            (self.choice_cursor + len - 1) % len
        };
        self.dispatch(Intent::Highlight(choices[self.choice_cursor]), now);
    }

    /// Test items in on-screen order.
    pub fn test_order(&self) -> Vec<&'static TestItem<Pollination>> {
        self.flow.script().test_items.iter().rev().collect()
    }

    pub fn move_test_cursor(&mut self, forward: bool) {
        let len = self.test_order().len().max(1);
        self.test_cursor = if forward {
            (self.test_cursor + 1) % len
        } else {
            (self.test_cursor + len - 1) % len
        };
    }

    /// Pick up the item under the cursor and drop it on the model.
    pub fn drop_selected(&mut self, now: Instant) {
        let Some(item) = self.test_order().get(self.test_cursor).copied() else {
            return;
        };
        self.dispatch(Intent::DragStart(item.id), now);
        self.dispatch(Intent::Drop, now);
    }

    pub fn training_remaining(&self, now: Instant) -> Option<std::time::Duration> {
        self.timers.remaining(FlowTimer::TrainingDone, now)
    }

    pub fn trick_pending(&self) -> bool {
        matches!(
            self.flow.phase(),
            Phase::Test {
                trick_pending: true,
                ..
            }
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum YutFocus {
    Guess,
    Board,
}

pub struct YutScreen {
    pub lesson: YutLesson,
    timers: Timers<YutTimer>,
    pub input: LineInput,
    pub focus: YutFocus,
    pub board_cursor: u8,
}

impl YutScreen {
    fn new(default_players: usize, rng: SmallRng) -> Self {
        let mut screen = Self {
            lesson: YutLesson::new(default_players, rng),
            timers: Timers::new(),
            input: LineInput::new(InputField::Guess, ""),
            focus: YutFocus::Guess,
            board_cursor: 0,
        };
        screen.bind_setup_input();
        screen
    }

    pub fn tick(&mut self, now: Instant) {
        let due = self.timers.take_due(now);
        if let Some(game) = self.lesson.game_mut() {
            game.tick();
            for timer in due {
                game.timer_fired(timer);
            }
        }
    }

    /// Rebind the text input to the setup row under focus.
    pub fn bind_setup_input(&mut self) {
        if let YutStage::Setup(setup) = self.lesson.stage() {
            if let SetupRow::Player(i) = setup.row {
                let name = setup.seats().get(i).map(|p| p.name.as_str()).unwrap_or("");
                self.input = LineInput::new(InputField::PlayerName(i), name);
            }
        }
    }

    /// Copy the input text back into the setup seat it edits.
    pub fn sync_setup_name(&mut self) {
        if let InputField::PlayerName(i) = self.input.field() {
            let name = self.input.value().to_string();
            if let YutStage::Setup(setup) = self.lesson.stage_mut() {
                setup.rename(i, &name);
            }
        }
    }

    pub fn start_game(&mut self) {
        self.sync_setup_name();
        self.lesson.start();
        self.timers.clear();
        self.input = LineInput::new(InputField::Guess, "");
        self.focus = YutFocus::Guess;
        self.board_cursor = 0;
    }

    pub fn restart(&mut self) {
        self.lesson.restart();
        self.timers.clear();
        self.focus = YutFocus::Guess;
        self.bind_setup_input();
    }

    pub fn throw(&mut self) -> bool {
        let thrown = match self.lesson.game_mut() {
            Some(game) => game.throw(),
            None => false,
        };
        if thrown {
            self.input.clear();
        }
        thrown
    }

    pub fn submit_guess(&mut self) -> Option<Result<GuessVerdict, GuessError>> {
        let game = self.lesson.game_mut()?;
        let result = game.submit_guess(self.input.value());
        if let Ok(GuessVerdict::Correct { .. }) = result {
            self.input.clear();
        }
        Some(result)
    }

    pub fn move_board_cursor(&mut self, d_row: i8, d_col: i8) {
        let (row, col) = board::slot_of(self.board_cursor);
        let row = (row as i8 + d_row).clamp(0, board::BOARD_ROWS as i8 - 1) as u8;
        let col = (col as i8 + d_col).clamp(0, board::BOARD_COLS as i8 - 1) as u8;
        self.board_cursor = board::cell_at(row, col).min(END);
    }

    pub fn inspect_cursor(&mut self, now: Instant) {
        let cell = self.board_cursor;
        if let Some(game) = self.lesson.game_mut() {
            let effects = game.inspect_cell(cell);
            apply_effects(&mut self.timers, effects, now);
        }
    }
}

pub struct ScheduleScreen {
    pub planner: SchedulePlanner,
    timers: Timers<PlannerTimer>,
    /// Bound while a time field has focus.
    pub input: Option<LineInput>,
}

impl ScheduleScreen {
    fn new(timings: PlannerTimings) -> Self {
        Self {
            planner: SchedulePlanner::new(timings),
            timers: Timers::new(),
            input: None,
        }
    }

    pub fn tick(&mut self, now: Instant) {
        for timer in self.timers.take_due(now) {
            self.planner.timer_fired(timer);
        }
    }

    pub fn request_analysis(&mut self, now: Instant) {
        let effects = self.planner.request_analysis();
        apply_effects(&mut self.timers, effects, now);
    }

    pub fn focus(&mut self, field: FormField) {
        self.planner.form.focus = field;
        self.input = match field {
            FormField::Start => Some(LineInput::new(
                InputField::StartTime,
                &self.planner.form.start_text,
            )),
            FormField::End => Some(LineInput::new(
                InputField::EndTime,
                &self.planner.form.end_text,
            )),
            _ => None,
        };
    }

    /// Copy the bound input back into the form field it edits.
    pub fn sync_input(&mut self) {
        let Some(input) = &self.input else {
            return;
        };
        let text = input.value().to_string();
        match input.field() {
            InputField::StartTime => self.planner.form.start_text = text,
            InputField::EndTime => self.planner.form.end_text = text,
            _ => {}
        }
    }

    pub fn submit(&mut self) {
        self.sync_input();
        if self.planner.submit_form().is_ok() {
            let focus = self.planner.form.focus;
            self.focus(focus);
        }
    }
}

pub struct App {
    pub screen: AppScreen,
    pub menu: Menu<'static>,
    pub theme: &'static Theme,
    pub config: Config,
    pub flower: Option<FlowerScreen>,
    pub yut: Option<YutScreen>,
    pub schedule: Option<ScheduleScreen>,
    /// One-line message on the menu screen.
    pub notice: Option<String>,
    pub should_quit: bool,
    rng: SmallRng,
}

impl App {
    pub fn new(config: Config, theme: &'static Theme) -> Self {
        Self {
            screen: AppScreen::Menu,
            menu: Menu::new(theme),
            theme,
            config,
            flower: None,
            yut: None,
            schedule: None,
            notice: None,
            should_quit: false,
            rng: SmallRng::from_entropy(),
        }
    }

    /// Leave whatever lesson is running. Its timers go with it.
    pub fn go_to_menu(&mut self) {
        if self.screen != AppScreen::Menu {
            info!(screen = ?self.screen, "lesson left");
        }
        self.flower = None;
        self.yut = None;
        self.schedule = None;
        self.screen = AppScreen::Menu;
    }

    pub fn open_lesson(&mut self, lesson: LessonId) {
        self.notice = None;
        match lesson.screen() {
            Some(AppScreen::Flower) => self.start_flower(),
            Some(AppScreen::Yut) => self.start_yut(),
            Some(AppScreen::Schedule) => self.start_schedule(),
            Some(AppScreen::Menu) | None => {
                self.notice = Some(format!(
                    "{}차시 \"{}\"는 아직 준비 중입니다.",
                    lesson.number(),
                    lesson.title()
                ));
            }
        }
    }

    pub fn open_selected(&mut self) {
        if let Some(lesson) = self.menu.selected_lesson() {
            self.open_lesson(lesson);
        }
    }

    fn start_flower(&mut self) {
        self.go_to_menu();
        info!(lesson = FLOWER_LESSON.title, "lesson entered");
        self.flower = Some(FlowerScreen::new(FlowTimings::from_config(&self.config)));
        self.screen = AppScreen::Flower;
    }

    fn start_yut(&mut self) {
        self.go_to_menu();
        info!(lesson = LessonId::BinaryYut.title(), "lesson entered");
        let rng = SmallRng::seed_from_u64(self.rng.next_u64());
        self.yut = Some(YutScreen::new(self.config.default_player_count, rng));
        self.screen = AppScreen::Yut;
    }

    fn start_schedule(&mut self) {
        self.go_to_menu();
        info!(lesson = LessonId::DayReader.title(), "lesson entered");
        self.schedule = Some(ScheduleScreen::new(PlannerTimings::from_config(
            &self.config,
        )));
        self.screen = AppScreen::Schedule;
    }

    /// Drive timers and animations of the running lesson.
    pub fn tick(&mut self, now: Instant) {
        let mut finished = false;
        match self.screen {
            AppScreen::Menu => {}
            AppScreen::Flower => {
                if let Some(flower) = &mut self.flower {
                    finished = flower.tick(now);
                }
            }
            AppScreen::Yut => {
                if let Some(yut) = &mut self.yut {
                    yut.tick(now);
                }
            }
            AppScreen::Schedule => {
                if let Some(schedule) = &mut self.schedule {
                    schedule.tick(now);
                }
            }
        }
        if finished {
            self.finish_lesson();
        }
    }

    /// A lesson reached its end on its own.
    pub fn finish_lesson(&mut self) {
        info!(screen = ?self.screen, "lesson finished");
        self.go_to_menu();
    }
}
