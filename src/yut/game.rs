use std::fmt;
use std::time::Duration;

use rand::Rng;
use rand::rngs::SmallRng;
use thiserror::Error;
use tracing::{debug, info};

use crate::lesson::Effect;
use crate::yut::board::{self, END, SpecialCell, SpecialKind};
use crate::yut::setup::Player;
use crate::yut::toss::StickToss;

/// Four stick faces read as a binary number, most significant first.
/// A face-up stick is a 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Outcome([bool; 4]);

impl Outcome {
    pub const fn new(bits: [bool; 4]) -> Self {
        Self(bits)
    }

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self([
            rng.gen_bool(0.5),
            rng.gen_bool(0.5),
            rng.gen_bool(0.5),
            rng.gen_bool(0.5),
        ])
    }

    pub fn bits(self) -> [bool; 4] {
        self.0
    }

    pub fn value(self) -> u8 {
        self.0.iter().fold(0, |acc, &bit| (acc << 1) | u8::from(bit))
    }

    pub fn face_up_count(self) -> usize {
        self.0.iter().filter(|b| **b).count()
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.0 {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Outcomes of the first throws of every game, in order. Later throws
/// are random.
pub const SCRIPTED_THROWS: [Outcome; 2] = [
    Outcome::new([false, true, false, true]),
    Outcome::new([true, false, false, true]),
];

pub const FIRST_THROW_BONUS: &str = "혜택! 옆사람이 노래하기";
pub const TOOLTIP_LIFETIME: Duration = Duration::from_secs(5);
/// Ticks a moving piece spends on each cell it passes.
pub const FRAMES_PER_CELL: u32 = 3;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GuessError {
    #[error("유효한 숫자를 입력해주세요.")]
    NotANumber,
    #[error("윷을 먼저 던져주세요.")]
    NoThrow,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuessVerdict {
    Correct { value: u8 },
    Incorrect,
}

/// Message line under the guess input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Feedback {
    Correct,
    Incorrect,
    Rejected(GuessError),
}

impl Feedback {
    pub fn text(self) -> String {
        match self {
            Feedback::Correct => "정답입니다! 말을 이동합니다.".to_string(),
            Feedback::Incorrect => "틀렸습니다. 다시 시도해보세요.".to_string(),
            Feedback::Rejected(err) => err.to_string(),
        }
    }

    pub fn is_positive(self) -> bool {
        matches!(self, Feedback::Correct)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Popup {
    pub kind: SpecialKind,
    pub message: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum YutTimer {
    /// Carries the generation of the tooltip it was scheduled for.
    TooltipClose(u32),
}

/// A piece walking cell by cell. The logical position is already final;
/// this only says what to draw.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PieceMove {
    pub player: usize,
    path: Vec<u8>,
    frame: u32,
}

impl PieceMove {
    pub fn new(player: usize, from: u8, to: u8) -> Self {
        let path = if to >= from {
            (from..=to).collect()
        } else {
            vec![from, to]
        };
        Self {
            player,
            path,
            frame: 0,
        }
    }

    pub fn cell(&self) -> u8 {
        let index = (self.frame / FRAMES_PER_CELL) as usize;
        self.path
            .get(index)
            .or_else(|| self.path.last())
            .copied()
            .unwrap_or(0)
    }

    pub fn is_done(&self) -> bool {
        self.frame as usize >= self.path.len().saturating_sub(1) * FRAMES_PER_CELL as usize
    }

    pub fn step(&mut self) {
        if !self.is_done() {
            self.frame += 1;
        }
    }
}

pub struct YutGame {
    players: Vec<Player>,
    current: usize,
    throw_count: u32,
    /// The revealed throw still waiting for a correct guess.
    outcome: Option<Outcome>,
    /// The most recent revealed throw, kept for display once resolved.
    shown: Option<Outcome>,
    toss: Option<StickToss>,
    piece_move: Option<PieceMove>,
    popup: Option<Popup>,
    /// Opens once the running piece move finishes.
    queued_popup: Option<Popup>,
    feedback: Option<Feedback>,
    tooltip: Option<(&'static SpecialCell, u32)>,
    tooltip_generation: u32,
    rng: SmallRng,
}

impl YutGame {
    pub fn new(players: Vec<Player>, rng: SmallRng) -> Self {
        info!(players = players.len(), "yut game started");
        Self {
            players,
            current: 0,
            throw_count: 0,
            outcome: None,
            shown: None,
            toss: None,
            piece_move: None,
            popup: None,
            queued_popup: None,
            feedback: None,
            tooltip: None,
            tooltip_generation: 0,
            rng,
        }
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_player(&self) -> Option<&Player> {
        self.players.get(self.current)
    }

    pub fn throw_count(&self) -> u32 {
        self.throw_count
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn shown_outcome(&self) -> Option<Outcome> {
        self.shown
    }

    pub fn toss(&self) -> Option<&StickToss> {
        self.toss.as_ref()
    }

    pub fn piece_move(&self) -> Option<&PieceMove> {
        self.piece_move.as_ref()
    }

    pub fn popup(&self) -> Option<Popup> {
        self.popup
    }

    pub fn feedback(&self) -> Option<Feedback> {
        self.feedback
    }

    pub fn tooltip(&self) -> Option<&'static SpecialCell> {
        self.tooltip.map(|(cell, _)| cell)
    }

    /// Cell to draw a player's piece on, following a running move.
    pub fn display_position(&self, index: usize) -> Option<u8> {
        if let Some(mv) = &self.piece_move {
            if mv.player == index {
                return Some(mv.cell());
            }
        }
        self.players.get(index).map(|p| p.position)
    }

    pub fn is_busy(&self) -> bool {
        self.toss.is_some() || self.piece_move.is_some() || self.popup.is_some()
    }

    pub fn can_throw(&self) -> bool {
        !self.is_busy() && !self.players.is_empty()
    }

    fn next_outcome(&mut self) -> Outcome {
        match SCRIPTED_THROWS.get(self.throw_count as usize) {
            Some(outcome) => *outcome,
            None => Outcome::random(&mut self.rng),
        }
    }

    /// Launch the sticks. The result is revealed when they settle.
    pub fn throw(&mut self) -> bool {
        if !self.can_throw() {
            return false;
        }
        let outcome = self.next_outcome();
        debug!(throw = self.throw_count, %outcome, "sticks thrown");
        self.outcome = None;
        self.feedback = None;
        self.toss = Some(StickToss::launch(outcome, &mut self.rng));
        true
    }

    /// Advance running animations by one frame.
    pub fn tick(&mut self) {
        if let Some(toss) = &mut self.toss {
            toss.step();
            if toss.is_settled() {
                let outcome = toss.outcome();
                self.outcome = Some(outcome);
                self.shown = Some(outcome);
                self.toss = None;
            }
        }
        if let Some(mv) = &mut self.piece_move {
            mv.step();
            if mv.is_done() {
                self.piece_move = None;
                if let Some(popup) = self.queued_popup.take() {
                    self.popup = Some(popup);
                }
            }
        }
    }

    /// Skip straight to the end of every running animation.
    pub fn finish_animations(&mut self) {
        for _ in 0..10_000 {
            if self.toss.is_none() && self.piece_move.is_none() {
                break;
            }
            self.tick();
        }
    }

    pub fn submit_guess(&mut self, text: &str) -> Result<GuessVerdict, GuessError> {
        let result = self.check_guess(text);
        self.feedback = Some(match result {
            Ok(GuessVerdict::Correct { .. }) => Feedback::Correct,
            Ok(GuessVerdict::Incorrect) => Feedback::Incorrect,
            Err(err) => Feedback::Rejected(err),
        });
        result
    }

    fn check_guess(&mut self, text: &str) -> Result<GuessVerdict, GuessError> {
        let outcome = self.outcome.ok_or(GuessError::NoThrow)?;
        let guess: i64 = text.trim().parse().map_err(|_| GuessError::NotANumber)?;
        let value = outcome.value();
        if guess != i64::from(value) {
            debug!(guess, expected = value, "wrong guess");
            return Ok(GuessVerdict::Incorrect);
        }
        self.outcome = None;
        self.move_current(value);
        Ok(GuessVerdict::Correct { value })
    }

    fn move_current(&mut self, value: u8) {
        let index = self.current;
        let Some(player) = self.players.get_mut(index) else {
            return;
        };
        let from = player.position;
        let landing = from.saturating_add(value).min(END);

        match self.throw_count {
            0 => {
                player.position = landing;
                self.piece_move = Some(PieceMove::new(index, from, landing));
                self.queued_popup = Some(Popup {
                    kind: SpecialKind::Benefit,
                    message: FIRST_THROW_BONUS,
                });
            }
            1 => {
                player.position = landing;
                self.piece_move = Some(PieceMove::new(index, from, landing));
                self.advance_turn();
            }
            _ => {
                player.position = board::resolve_landing(landing);
                self.piece_move = Some(PieceMove::new(index, from, landing));
                self.advance_turn();
            }
        }
        info!(player = index + 1, from, landing, "piece moved");
    }

    fn advance_turn(&mut self) {
        if self.players.is_empty() {
            return;
        }
        self.current = (self.current + 1) % self.players.len();
        self.throw_count += 1;
    }

    pub fn close_popup(&mut self) {
        if self.popup.take().is_some() {
            self.advance_turn();
        }
    }

    pub fn inspect_cell(&mut self, cell: u8) -> Vec<Effect<YutTimer>> {
        let Some(special) = board::special_cell(cell) else {
            return Vec::new();
        };
        self.tooltip_generation += 1;
        self.tooltip = Some((special, self.tooltip_generation));
        vec![Effect::Schedule {
            timer: YutTimer::TooltipClose(self.tooltip_generation),
            after: TOOLTIP_LIFETIME,
        }]
    }

    pub fn close_tooltip(&mut self) {
        self.tooltip = None;
    }

    pub fn timer_fired(&mut self, timer: YutTimer) {
        match timer {
            YutTimer::TooltipClose(generation) => {
                if matches!(self.tooltip, Some((_, g)) if g == generation) {
                    self.tooltip = None;
                }
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn place(&mut self, index: usize, cell: u8) {
        if let Some(player) = self.players.get_mut(index) {
            player.position = cell;
        }
    }

    #[cfg(test)]
    pub(crate) fn reveal(&mut self, outcome: Outcome, throw_count: u32) {
        self.outcome = Some(outcome);
        self.shown = Some(outcome);
        self.throw_count = throw_count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::yut::setup::GameSetup;
    use rand::SeedableRng;

    fn game(count: usize) -> YutGame {
        YutGame::new(GameSetup::new(count).players(), SmallRng::seed_from_u64(42))
    }

    fn throw_and_settle(game: &mut YutGame) -> Outcome {
        assert!(game.throw());
        game.finish_animations();
        game.outcome().unwrap()
    }

    #[test]
    fn test_outcome_value_is_msb_first() {
        assert_eq!(Outcome::new([false, true, false, true]).value(), 5);
        assert_eq!(Outcome::new([true, false, false, true]).value(), 9);
        assert_eq!(Outcome::new([true; 4]).value(), 15);
        assert_eq!(Outcome::new([false; 4]).value(), 0);
        assert_eq!(Outcome::new([false, true, false, true]).to_string(), "0101");
    }

    #[test]
    fn test_outcome_hidden_until_sticks_settle() {
        let mut g = game(2);
        assert!(g.throw());
        assert!(g.outcome().is_none());
        assert!(!g.throw());
        g.finish_animations();
        assert_eq!(g.outcome(), Some(SCRIPTED_THROWS[0]));
    }

    #[test]
    fn test_first_throw_correct_guess_moves_then_pops_up() {
        let mut g = game(2);
        throw_and_settle(&mut g);
        assert_eq!(g.submit_guess("5"), Ok(GuessVerdict::Correct { value: 5 }));
        assert_eq!(g.players()[0].position, 5);
        assert_eq!(g.feedback(), Some(Feedback::Correct));
        // The popup waits for the piece to arrive
        assert!(g.popup().is_none());
        assert_eq!(g.display_position(0), Some(0));
        g.finish_animations();
        assert_eq!(g.popup().map(|p| p.message), Some(FIRST_THROW_BONUS));
        assert_eq!(g.current_index(), 0);

        g.close_popup();
        assert_eq!(g.current_index(), 1);
        assert_eq!(g.throw_count(), 1);
    }

    #[test]
    fn test_wrong_guess_keeps_everything() {
        let mut g = game(2);
        throw_and_settle(&mut g);
        assert_eq!(g.submit_guess("4"), Ok(GuessVerdict::Incorrect));
        assert_eq!(g.players()[0].position, 0);
        assert_eq!(g.current_index(), 0);
        assert_eq!(g.feedback().map(Feedback::text).as_deref(), Some("틀렸습니다. 다시 시도해보세요."));
        // Same throw can still be answered
        assert!(matches!(g.submit_guess("5"), Ok(GuessVerdict::Correct { .. })));
    }

    #[test]
    fn test_non_numeric_guess_is_rejected() {
        let mut g = game(2);
        throw_and_settle(&mut g);
        assert_eq!(g.submit_guess("다섯"), Err(GuessError::NotANumber));
        assert_eq!(
            g.feedback().map(Feedback::text).as_deref(),
            Some("유효한 숫자를 입력해주세요.")
        );
        assert_eq!(g.outcome(), Some(SCRIPTED_THROWS[0]));
        assert_eq!(g.players()[0].position, 0);
    }

    #[test]
    fn test_guess_before_throw() {
        let mut g = game(2);
        assert_eq!(g.submit_guess("5"), Err(GuessError::NoThrow));
    }

    #[test]
    fn test_resolved_throw_cannot_be_resubmitted() {
        let mut g = game(2);
        throw_and_settle(&mut g);
        g.submit_guess("5").unwrap();
        assert_eq!(g.submit_guess("5"), Err(GuessError::NoThrow));
        assert_eq!(g.players()[0].position, 5);
        assert_eq!(g.shown_outcome(), Some(SCRIPTED_THROWS[0]));
    }

    #[test]
    fn test_second_throw_advances_turn_without_popup() {
        let mut g = game(2);
        throw_and_settle(&mut g);
        g.submit_guess("5").unwrap();
        g.finish_animations();
        g.close_popup();

        assert_eq!(throw_and_settle(&mut g), SCRIPTED_THROWS[1]);
        g.submit_guess("9").unwrap();
        assert_eq!(g.players()[1].position, 9);
        assert_eq!(g.current_index(), 0);
        assert_eq!(g.throw_count(), 2);
        g.finish_animations();
        assert!(g.popup().is_none());
    }

    #[test]
    fn test_later_throws_apply_special_cells_silently() {
        let mut g = game(2);
        g.place(0, 14);
        g.reveal(Outcome::new([false, true, false, true]), 2);
        g.submit_guess("5").unwrap();
        assert_eq!(g.players()[0].position, 22);

        g.place(1, 18);
        g.reveal(Outcome::new([false, true, false, true]), 3);
        g.submit_guess("5").unwrap();
        assert_eq!(g.players()[1].position, 0);
        g.finish_animations();
        assert!(g.popup().is_none());
    }

    #[test]
    fn test_first_two_throws_ignore_special_cells() {
        let mut g = game(2);
        g.place(0, 14);
        g.reveal(Outcome::new([false, true, false, true]), 1);
        g.submit_guess("5").unwrap();
        assert_eq!(g.players()[0].position, 19);
    }

    #[test]
    fn test_position_clamps_to_end() {
        let mut g = game(3);
        g.reveal(Outcome::new([true; 4]), 5);
        g.submit_guess("15").unwrap();
        assert_eq!(g.players()[0].position, 15);
        g.place(1, 45);
        g.reveal(Outcome::new([true; 4]), 6);
        g.submit_guess("15").unwrap();
        assert_eq!(g.players()[1].position, END);
    }

    #[test]
    fn test_turn_wraps_around_players() {
        let mut g = game(3);
        for expected in [1, 2, 0, 1] {
            g.reveal(Outcome::new([false; 4]), 2);
            g.submit_guess("0").unwrap();
            g.finish_animations();
            assert_eq!(g.current_index(), expected);
        }
    }

    #[test]
    fn test_random_throws_after_script() {
        let mut g = game(2);
        g.reveal(Outcome::new([false; 4]), 2);
        g.submit_guess("0").unwrap();
        g.finish_animations();
        let outcome = throw_and_settle(&mut g);
        assert!(outcome.value() <= 15);
    }

    #[test]
    fn test_piece_move_walks_each_cell() {
        let mut mv = PieceMove::new(0, 3, 5);
        assert_eq!(mv.cell(), 3);
        for _ in 0..FRAMES_PER_CELL {
            mv.step();
        }
        assert_eq!(mv.cell(), 4);
        while !mv.is_done() {
            mv.step();
        }
        assert_eq!(mv.cell(), 5);
        assert!(PieceMove::new(0, 7, 7).is_done());
    }

    #[test]
    fn test_tooltip_closes_on_its_own_timer_only() {
        let mut g = game(2);
        assert!(g.inspect_cell(20).is_empty());
        let first = g.inspect_cell(19);
        let second = g.inspect_cell(23);
        assert_eq!(g.tooltip().map(|s| s.cell), Some(23));

        let Effect::Schedule { timer: stale, .. } = first[0] else {
            panic!("expected a schedule");
        };
        g.timer_fired(stale);
        assert!(g.tooltip().is_some());

        let Effect::Schedule { timer, after } = second[0] else {
            panic!("expected a schedule");
        };
        assert_eq!(after, TOOLTIP_LIFETIME);
        g.timer_fired(timer);
        assert!(g.tooltip().is_none());
    }
}
