use std::fmt::Debug;
use std::time::Duration;

use tracing::debug;

use crate::config::Config;
use crate::lesson::Effect;
use crate::lesson::script::{LessonScript, QuizItem, TestItem};
use crate::lesson::step::{StepAdvance, StepCounter};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlowTimer {
    TrainingDone,
    TrickReveal,
}

/// Everything the view can ask the controller to do. Key presses and button
/// presses both end up here.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent<L> {
    Confirm,
    /// Move the keyboard selection onto a label without validating it.
    Highlight(L),
    ChooseAnswer(L),
    ClosePopup,
    DragStart(u32),
    Drop,
    Continue,
    Next,
    TimerFired(FlowTimer),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Attempt<L> {
    pub selected: L,
    pub is_correct: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Phase<L> {
    Intro {
        step: StepCounter,
    },
    Selection {
        quiz_index: usize,
        selected: Option<L>,
        /// The feedback popup, open while `Some`.
        feedback: Option<Attempt<L>>,
    },
    Training {
        loading: bool,
    },
    Test {
        dragging: Option<u32>,
        shown: Option<u32>,
        trick_pending: bool,
        error_overlay: bool,
    },
    Summary {
        step: StepCounter,
    },
}

impl<L> Phase<L> {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Intro { .. } => "intro",
            Phase::Selection { .. } => "selection",
            Phase::Training { .. } => "training",
            Phase::Test { .. } => "test",
            Phase::Summary { .. } => "summary",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FlowTimings {
    pub training: Duration,
    pub trick_reveal: Duration,
}

impl FlowTimings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            training: Duration::from_millis(config.training_delay_ms),
            trick_reveal: Duration::from_millis(config.trick_reveal_delay_ms),
        }
    }
}

impl Default for FlowTimings {
    fn default() -> Self {
        Self {
            training: Duration::from_millis(4000),
            trick_reveal: Duration::from_millis(1000),
        }
    }
}

pub struct LessonFlow<L: 'static> {
    script: &'static LessonScript<L>,
    timings: FlowTimings,
    phase: Phase<L>,
}

impl<L> LessonFlow<L>
where
    L: Copy + Eq + Debug + 'static,
{
    pub fn new(script: &'static LessonScript<L>, timings: FlowTimings) -> Self {
        Self {
            script,
            timings,
            phase: Phase::Intro {
                step: StepCounter::new(script.intro.len()),
            },
        }
    }

    pub fn script(&self) -> &'static LessonScript<L> {
        self.script
    }

    pub fn timings(&self) -> FlowTimings {
        self.timings
    }

    pub fn phase(&self) -> &Phase<L> {
        &self.phase
    }

    pub fn current_item(&self) -> Option<&'static QuizItem<L>> {
        match self.phase {
            Phase::Selection { quiz_index, .. } => self.script.quiz.get(quiz_index),
            _ => None,
        }
    }

    pub fn shown_item(&self) -> Option<&'static TestItem<L>> {
        match self.phase {
            Phase::Test { shown: Some(id), .. } => self.script.test_item(id),
            _ => None,
        }
    }

    /// Resolve the Enter key against the current state. Arm order is the
    /// precedence: whichever overlay owns focus wins.
    pub fn enter_intent(&self) -> Option<Intent<L>> {
        match &self.phase {
            Phase::Intro { .. } => Some(Intent::Confirm),
            Phase::Training { loading: false } => Some(Intent::Confirm),
            Phase::Training { loading: true } => None,
            Phase::Summary { .. } => Some(Intent::Confirm),
            Phase::Selection {
                feedback: Some(_), ..
            } => Some(Intent::ClosePopup),
            Phase::Test {
                error_overlay: true,
                ..
            } => Some(Intent::Continue),
            Phase::Selection {
                selected: Some(label),
                feedback: None,
                ..
            } => Some(Intent::ChooseAnswer(*label)),
            _ => None,
        }
    }

    pub fn press_enter(&mut self) -> Vec<Effect<FlowTimer>> {
        match self.enter_intent() {
            Some(intent) => self.dispatch(intent),
            None => Vec::new(),
        }
    }

    pub fn dispatch(&mut self, intent: Intent<L>) -> Vec<Effect<FlowTimer>> {
        let mut effects = Vec::new();
        match intent {
            Intent::Confirm => self.confirm(&mut effects),
            Intent::Highlight(label) => self.highlight(label),
            Intent::ChooseAnswer(label) => self.choose_answer(label),
            Intent::ClosePopup => self.close_popup(&mut effects),
            Intent::DragStart(id) => self.drag_start(id),
            Intent::Drop => self.drop_item(&mut effects),
            Intent::Continue => self.continue_testing(),
            Intent::Next => self.finish_testing(),
            Intent::TimerFired(timer) => self.timer_fired(timer),
        }
        effects
    }

    fn set_phase(&mut self, next: Phase<L>) {
        debug!(from = self.phase.name(), to = next.name(), "lesson phase changed");
        self.phase = next;
    }

    fn confirm(&mut self, effects: &mut Vec<Effect<FlowTimer>>) {
        match &mut self.phase {
            Phase::Intro { step } => {
                if step.advance() == StepAdvance::Finished {
                    self.set_phase(Phase::Selection {
                        quiz_index: 0,
                        selected: None,
                        feedback: None,
                    });
                }
            }
            Phase::Training { loading: false } => {
                self.set_phase(Phase::Test {
                    dragging: None,
                    shown: None,
                    trick_pending: false,
                    error_overlay: false,
                });
            }
            Phase::Summary { step } => {
                if step.advance() == StepAdvance::Finished {
                    effects.push(Effect::Exit);
                }
            }
            _ => {}
        }
    }

    fn highlight(&mut self, label: L) {
        if let Phase::Selection {
            selected,
            feedback: None,
            ..
        } = &mut self.phase
        {
            *selected = Some(label);
        }
    }

    fn choose_answer(&mut self, label: L) {
        let Phase::Selection {
            quiz_index,
            selected,
            feedback,
        } = &mut self.phase
        else {
            return;
        };
        // Choices are locked while a correct answer is being celebrated.
        if matches!(feedback, Some(attempt) if attempt.is_correct) {
            return;
        }
        let Some(item) = self.script.quiz.get(*quiz_index) else {
            return;
        };
        let is_correct = item.expected == label;
        debug!(item = item.name, ?label, is_correct, "answer chosen");
        *selected = Some(label);
        *feedback = Some(Attempt {
            selected: label,
            is_correct,
        });
    }

    fn close_popup(&mut self, effects: &mut Vec<Effect<FlowTimer>>) {
        let Phase::Selection {
            quiz_index,
            selected,
            feedback,
        } = &mut self.phase
        else {
            return;
        };
        let Some(attempt) = feedback.take() else {
            return;
        };
        *selected = None;
        if !attempt.is_correct {
            return;
        }
        if *quiz_index + 1 < self.script.quiz.len() {
            *quiz_index += 1;
        } else {
            self.set_phase(Phase::Training { loading: true });
            effects.push(Effect::Schedule {
                timer: FlowTimer::TrainingDone,
                after: self.timings.training,
            });
        }
    }

    fn drag_start(&mut self, id: u32) {
        if self.script.test_item(id).is_none() {
            return;
        }
        if let Phase::Test {
            dragging,
            error_overlay: false,
            ..
        } = &mut self.phase
        {
            *dragging = Some(id);
        }
    }

    fn drop_item(&mut self, effects: &mut Vec<Effect<FlowTimer>>) {
        let Phase::Test {
            dragging: Some(id),
            shown,
            trick_pending,
            error_overlay,
        } = &mut self.phase
        else {
            return;
        };
        if *trick_pending || *error_overlay {
            return;
        }
        let Some(item) = self.script.test_item(*id) else {
            return;
        };
        debug!(item = item.name, result = ?item.result, "test item dropped");
        *shown = Some(item.id);
        if item.is_trick {
            *trick_pending = true;
            effects.push(Effect::Schedule {
                timer: FlowTimer::TrickReveal,
                after: self.timings.trick_reveal,
            });
        }
    }

    fn continue_testing(&mut self) {
        if let Phase::Test {
            dragging,
            shown,
            error_overlay,
            ..
        } = &mut self.phase
        {
            if *error_overlay {
                *error_overlay = false;
                *shown = None;
                *dragging = None;
            }
        }
    }

    fn finish_testing(&mut self) {
        if let Phase::Test {
            error_overlay: true,
            ..
        } = self.phase
        {
            self.set_phase(Phase::Summary {
                step: StepCounter::new(self.script.summary.len()),
            });
        }
    }

    fn timer_fired(&mut self, timer: FlowTimer) {
        match (timer, &mut self.phase) {
            (FlowTimer::TrainingDone, Phase::Training { loading }) => {
                *loading = false;
            }
            (
                FlowTimer::TrickReveal,
                Phase::Test {
                    trick_pending,
                    error_overlay,
                    ..
                },
            ) if *trick_pending => {
                *trick_pending = false;
                *error_overlay = true;
            }
            // A timer that outlived its phase is stale.
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lesson::script::{FLOWER_LESSON, Pollination};

    fn flower() -> LessonFlow<Pollination> {
        LessonFlow::new(&FLOWER_LESSON, FlowTimings::default())
    }

    fn at_selection() -> LessonFlow<Pollination> {
        let mut flow = flower();
        for _ in 0..5 {
            flow.dispatch(Intent::Confirm);
        }
        flow
    }

    fn at_training_done() -> LessonFlow<Pollination> {
        let mut flow = at_selection();
        for answer in [Pollination::Water, Pollination::Insect, Pollination::Bird] {
            flow.dispatch(Intent::ChooseAnswer(answer));
            flow.dispatch(Intent::ClosePopup);
        }
        flow.dispatch(Intent::TimerFired(FlowTimer::TrainingDone));
        flow
    }

    fn at_test() -> LessonFlow<Pollination> {
        let mut flow = at_training_done();
        flow.dispatch(Intent::Confirm);
        flow
    }

    fn quiz_index(flow: &LessonFlow<Pollination>) -> usize {
        match flow.phase() {
            Phase::Selection { quiz_index, .. } => *quiz_index,
            other => panic!("not in selection: {other:?}"),
        }
    }

    #[test]
    fn test_intro_steps_advance_by_one() {
        let mut flow = flower();
        for expected in 2..=5 {
            flow.dispatch(Intent::Confirm);
            match flow.phase() {
                Phase::Intro { step } => assert_eq!(step.current(), expected),
                other => panic!("left intro early: {other:?}"),
            }
        }
    }

    #[test]
    fn test_last_intro_step_enters_selection() {
        let flow = at_selection();
        assert_eq!(quiz_index(&flow), 0);
        assert_eq!(flow.current_item().map(|i| i.name), Some("lotus"));
    }

    #[test]
    fn test_correct_answer_advances_after_popup() {
        let mut flow = at_selection();
        flow.dispatch(Intent::ChooseAnswer(Pollination::Water));
        match flow.phase() {
            Phase::Selection { feedback, .. } => assert_eq!(
                *feedback,
                Some(Attempt {
                    selected: Pollination::Water,
                    is_correct: true
                })
            ),
            other => panic!("{other:?}"),
        }
        flow.dispatch(Intent::ClosePopup);
        assert_eq!(quiz_index(&flow), 1);
    }

    #[test]
    fn test_wrong_answer_retries_same_item() {
        let mut flow = at_selection();
        flow.dispatch(Intent::ChooseAnswer(Pollination::Bird));
        flow.dispatch(Intent::ClosePopup);
        match flow.phase() {
            Phase::Selection {
                quiz_index,
                selected,
                feedback,
            } => {
                assert_eq!(*quiz_index, 0);
                assert_eq!(*selected, None);
                assert_eq!(*feedback, None);
            }
            other => panic!("{other:?}"),
        }
    }

    #[test]
    fn test_choices_locked_while_correct_popup_open() {
        let mut flow = at_selection();
        flow.dispatch(Intent::ChooseAnswer(Pollination::Water));
        flow.dispatch(Intent::ChooseAnswer(Pollination::Bird));
        match flow.phase() {
            Phase::Selection { feedback, .. } => {
                assert!(feedback.is_some_and(|a| a.is_correct));
            }
            other => panic!("{other:?}"),
        }
    }

    #[test]
    fn test_wrong_popup_allows_rechoosing() {
        let mut flow = at_selection();
        flow.dispatch(Intent::ChooseAnswer(Pollination::Bird));
        flow.dispatch(Intent::ChooseAnswer(Pollination::Water));
        match flow.phase() {
            Phase::Selection { feedback, .. } => {
                assert!(feedback.is_some_and(|a| a.is_correct));
            }
            other => panic!("{other:?}"),
        }
    }

    #[test]
    fn test_last_correct_answer_starts_training_timer() {
        let mut flow = at_selection();
        flow.dispatch(Intent::ChooseAnswer(Pollination::Water));
        flow.dispatch(Intent::ClosePopup);
        flow.dispatch(Intent::ChooseAnswer(Pollination::Insect));
        flow.dispatch(Intent::ClosePopup);
        flow.dispatch(Intent::ChooseAnswer(Pollination::Bird));
        let effects = flow.dispatch(Intent::ClosePopup);
        assert_eq!(*flow.phase(), Phase::Training { loading: true });
        assert_eq!(
            effects,
            vec![Effect::Schedule {
                timer: FlowTimer::TrainingDone,
                after: Duration::from_millis(4000),
            }]
        );
    }

    #[test]
    fn test_confirm_ignored_while_loading() {
        let mut flow = at_training_done();
        assert_eq!(*flow.phase(), Phase::Training { loading: false });

        let mut loading = at_selection();
        for answer in [Pollination::Water, Pollination::Insect, Pollination::Bird] {
            loading.dispatch(Intent::ChooseAnswer(answer));
            loading.dispatch(Intent::ClosePopup);
        }
        assert_eq!(loading.enter_intent(), None);
        loading.dispatch(Intent::Confirm);
        assert_eq!(*loading.phase(), Phase::Training { loading: true });

        flow.dispatch(Intent::Confirm);
        assert_eq!(flow.phase().name(), "test");
    }

    #[test]
    fn test_plain_drop_shows_result_without_overlay() {
        let mut flow = at_test();
        flow.dispatch(Intent::DragStart(2));
        let effects = flow.dispatch(Intent::Drop);
        assert!(effects.is_empty());
        assert_eq!(flow.shown_item().map(|i| i.result), Some(Pollination::Insect));
    }

    #[test]
    fn test_trick_drop_reveals_error_after_timer() {
        let mut flow = at_test();
        flow.dispatch(Intent::DragStart(1));
        let effects = flow.dispatch(Intent::Drop);
        assert_eq!(
            effects,
            vec![Effect::Schedule {
                timer: FlowTimer::TrickReveal,
                after: Duration::from_millis(1000),
            }]
        );
        assert_eq!(flow.shown_item().map(|i| i.result), Some(Pollination::Water));

        // Another drop while the reveal is pending changes nothing.
        flow.dispatch(Intent::DragStart(2));
        flow.dispatch(Intent::Drop);
        assert_eq!(flow.shown_item().map(|i| i.id), Some(1));

        flow.dispatch(Intent::TimerFired(FlowTimer::TrickReveal));
        assert!(matches!(
            flow.phase(),
            Phase::Test {
                error_overlay: true,
                ..
            }
        ));
    }

    #[test]
    fn test_continue_clears_result_and_stays_in_test() {
        let mut flow = at_test();
        flow.dispatch(Intent::DragStart(1));
        flow.dispatch(Intent::Drop);
        flow.dispatch(Intent::TimerFired(FlowTimer::TrickReveal));
        flow.dispatch(Intent::Continue);
        assert_eq!(
            *flow.phase(),
            Phase::Test {
                dragging: None,
                shown: None,
                trick_pending: false,
                error_overlay: false,
            }
        );
    }

    #[test]
    fn test_next_enters_summary_and_last_step_exits() {
        let mut flow = at_test();
        flow.dispatch(Intent::DragStart(1));
        flow.dispatch(Intent::Drop);
        flow.dispatch(Intent::TimerFired(FlowTimer::TrickReveal));
        flow.dispatch(Intent::Next);
        assert_eq!(flow.phase().name(), "summary");

        for _ in 0..4 {
            assert!(flow.dispatch(Intent::Confirm).is_empty());
        }
        assert_eq!(flow.dispatch(Intent::Confirm), vec![Effect::Exit]);
    }

    #[test]
    fn test_stale_timer_is_ignored() {
        let mut flow = at_selection();
        flow.dispatch(Intent::TimerFired(FlowTimer::TrainingDone));
        flow.dispatch(Intent::TimerFired(FlowTimer::TrickReveal));
        assert_eq!(quiz_index(&flow), 0);
    }

    #[test]
    fn test_enter_validates_highlighted_answer() {
        let mut flow = at_selection();
        assert_eq!(flow.enter_intent(), None);
        flow.dispatch(Intent::Highlight(Pollination::Water));
        assert_eq!(
            flow.enter_intent(),
            Some(Intent::ChooseAnswer(Pollination::Water))
        );
        flow.press_enter();
        assert_eq!(flow.enter_intent(), Some(Intent::ClosePopup));
    }

    #[test]
    fn test_enter_prefers_popup_over_pending_selection() {
        let mut flow = at_selection();
        flow.dispatch(Intent::ChooseAnswer(Pollination::Bird));
        // Popup open and an answer selected at the same time.
        match flow.phase() {
            Phase::Selection {
                selected, feedback, ..
            } => {
                assert!(selected.is_some());
                assert!(feedback.is_some());
            }
            other => panic!("{other:?}"),
        }
        assert_eq!(flow.enter_intent(), Some(Intent::ClosePopup));
        flow.press_enter();
        assert_eq!(quiz_index(&flow), 0);
    }

    #[test]
    fn test_enter_continues_error_overlay() {
        let mut flow = at_test();
        assert_eq!(flow.enter_intent(), None);
        flow.dispatch(Intent::DragStart(1));
        flow.dispatch(Intent::Drop);
        assert_eq!(flow.enter_intent(), None);
        flow.dispatch(Intent::TimerFired(FlowTimer::TrickReveal));
        assert_eq!(flow.enter_intent(), Some(Intent::Continue));
    }
}
