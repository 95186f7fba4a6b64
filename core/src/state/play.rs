use super::{GameState, Over};
use crate::game::Game;
use crate::platform::Platform;

/// Frames survived before play moves on to the level's successor (60 s).
pub const LEVEL_ADVANCE_FRAMES: f32 = 60.0 * 60.0;

/// A session in progress.
///
/// `level` is the level on screen, `selected` the one picked from the menu.
/// They differ once the session has advanced to a following level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Play {
    level: usize,
    selected: usize,
    score: f32,
}

impl Play {
    pub fn new(level: usize, selected: usize) -> Self {
        Self {
            level,
            selected,
            score: 0.0,
        }
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Frames survived so far.
    pub fn score(&self) -> f32 {
        self.score
    }

    /// Finish the session, as when the player hits a wall.
    pub fn end_session(&self) -> GameState {
        GameState::Over(Over::new(self.level, self.selected, self.score))
    }

    pub(super) fn update<P: Platform>(
        &mut self,
        game: &mut Game<P>,
        dilation: f32,
    ) -> Option<GameState> {
        let press = game.platform_mut().pressed();
        if press.quit {
            return Some(GameState::Quit);
        }
        if press.back {
            return Some(self.end_session());
        }

        let before = self.score;
        self.score += dilation;

        if before < LEVEL_ADVANCE_FRAMES
            && self.score >= LEVEL_ADVANCE_FRAMES
            && let Some(next) = game.levels().next_of(self.level)
        {
            tracing::info!(from = self.level, to = next, "advancing to next level");
            let current_music = game.levels().get(self.level).map(|l| l.music().to_string());
            let next_music = game.levels().get(next).map(|l| l.music().to_string());
            self.level = next;
            if next_music != current_music {
                game.play_level_music(next);
            }
        }

        None
    }
}
