pub mod board;
pub mod game;
pub mod setup;
pub mod toss;

use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
use tracing::info;

use game::YutGame;
use setup::GameSetup;

pub enum YutStage {
    Setup(GameSetup),
    Playing(YutGame),
}

/// The binary yut lesson: a setup dialog, then the game, and back to the
/// dialog on restart.
pub struct YutLesson {
    stage: YutStage,
    default_players: usize,
    rng: SmallRng,
}

impl YutLesson {
    pub fn new(default_players: usize, rng: SmallRng) -> Self {
        Self {
            stage: YutStage::Setup(GameSetup::new(default_players)),
            default_players,
            rng,
        }
    }

    pub fn stage(&self) -> &YutStage {
        &self.stage
    }

    pub fn stage_mut(&mut self) -> &mut YutStage {
        &mut self.stage
    }

    pub fn game(&self) -> Option<&YutGame> {
        match &self.stage {
            YutStage::Playing(game) => Some(game),
            YutStage::Setup(_) => None,
        }
    }

    pub fn game_mut(&mut self) -> Option<&mut YutGame> {
        match &mut self.stage {
            YutStage::Playing(game) => Some(game),
            YutStage::Setup(_) => None,
        }
    }

    pub fn start(&mut self) {
        let YutStage::Setup(setup) = &self.stage else {
            return;
        };
        let players = setup.players();
        let rng = SmallRng::seed_from_u64(self.rng.next_u64());
        self.stage = YutStage::Playing(YutGame::new(players, rng));
    }

    /// Drop the running game and reopen setup with fresh defaults.
    pub fn restart(&mut self) {
        info!("yut game restarted");
        self.stage = YutStage::Setup(GameSetup::new(self.default_players));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lesson() -> YutLesson {
        YutLesson::new(3, SmallRng::seed_from_u64(5))
    }

    #[test]
    fn test_start_uses_setup_players() {
        let mut lesson = lesson();
        if let YutStage::Setup(setup) = lesson.stage_mut() {
            setup.rename(0, "민수");
        }
        lesson.start();
        let game = lesson.game().unwrap();
        assert_eq!(game.players().len(), 3);
        assert_eq!(game.players()[0].name, "민수");
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut lesson = lesson();
        lesson.start();
        {
            let game = lesson.game_mut().unwrap();
            game.throw();
            game.finish_animations();
            game.submit_guess("5").unwrap();
        }
        lesson.restart();
        let YutStage::Setup(setup) = lesson.stage() else {
            panic!("expected setup after restart");
        };
        assert_eq!(setup.count(), 3);

        lesson.start();
        let game = lesson.game().unwrap();
        assert_eq!(game.throw_count(), 0);
        assert!(game.players().iter().all(|p| p.position == 0));
        assert!(game.outcome().is_none());
    }

    #[test]
    fn test_start_is_noop_while_playing() {
        let mut lesson = lesson();
        lesson.start();
        lesson.game_mut().unwrap().throw();
        lesson.start();
        assert!(lesson.game().unwrap().toss().is_some());
    }
}
