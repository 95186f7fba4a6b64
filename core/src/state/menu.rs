use super::{GameState, Play};
use crate::game::Game;
use crate::platform::Platform;

/// Level select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Menu {
    selected: usize,
}

impl Menu {
    pub fn new(selected: usize) -> Self {
        Self { selected }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub(super) fn update<P: Platform>(&mut self, game: &mut Game<P>) -> Option<GameState> {
        let press = game.platform_mut().pressed();
        if press.quit || press.back {
            return Some(GameState::Quit);
        }

        let count = game.levels().len();
        if count == 0 {
            return Some(GameState::Quit);
        }

        if press.right {
            self.selected = (self.selected + 1) % count;
        } else if press.left {
            self.selected = (self.selected + count - 1) % count;
        }

        if press.select {
            game.play_level_music(self.selected);
            return Some(GameState::Play(Play::new(self.selected, self.selected)));
        }

        None
    }
}
