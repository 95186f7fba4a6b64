//! Game states
//!
//! Each state is entered once, then updated once per frame until its update
//! returns the state that replaces it.

mod load;
mod menu;
mod over;
mod play;

pub use load::{Load, LoadSummary, ROM_LEVELS, load_game, load_scores};
pub use menu::Menu;
pub use over::{Over, commit_scores};
pub use play::{LEVEL_ADVANCE_FRAMES, Play};

use crate::game::Game;
use crate::platform::Platform;

#[derive(Debug, Clone, PartialEq)]
pub enum GameState {
    Load(Load),
    Menu(Menu),
    Play(Play),
    Over(Over),
    Quit,
}

impl GameState {
    pub fn name(&self) -> &'static str {
        match self {
            GameState::Load(_) => "load",
            GameState::Menu(_) => "menu",
            GameState::Play(_) => "play",
            GameState::Over(_) => "over",
            GameState::Quit => "quit",
        }
    }

    pub fn enter<P: Platform>(&mut self, game: &mut Game<P>) {
        match self {
            GameState::Load(state) => state.enter(game),
            GameState::Over(state) => state.enter(game),
            GameState::Menu(_) | GameState::Play(_) | GameState::Quit => {}
        }
    }

    /// Advance one frame. `dilation` is the frame time relative to 60 fps.
    pub fn update<P: Platform>(&mut self, game: &mut Game<P>, dilation: f32) -> Option<GameState> {
        match self {
            GameState::Load(state) => state.update(),
            GameState::Menu(state) => state.update(game),
            GameState::Play(state) => state.update(game, dilation),
            GameState::Over(state) => state.update(game, dilation),
            GameState::Quit => None,
        }
    }
}
