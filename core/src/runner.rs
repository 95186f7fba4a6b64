//! Frame-stepped driver for the state machine
//!
//! The host calls [`Runner::step`] once per rendered frame. Everything runs
//! on the calling thread; a state's I/O completes before `step` returns.

use crate::game::Game;
use crate::platform::Platform;
use crate::state::{GameState, Load};

pub struct Runner<P: Platform> {
    game: Game<P>,
    state: GameState,
    entered: bool,
}

impl<P: Platform> Runner<P> {
    /// A runner that starts in the load state.
    pub fn new(game: Game<P>) -> Self {
        Self {
            game,
            state: GameState::Load(Load::new()),
            entered: false,
        }
    }

    pub fn game(&self) -> &Game<P> {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut Game<P> {
        &mut self.game
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        !matches!(self.state, GameState::Quit)
    }

    /// Advance one frame.
    pub fn step(&mut self, dilation: f32) {
        if !self.entered {
            self.state.enter(&mut self.game);
            self.entered = true;
        }
        if let Some(next) = self.state.update(&mut self.game, dilation) {
            self.transition(next);
        }
    }

    /// Replace the current state and enter the new one immediately.
    pub fn transition(&mut self, next: GameState) {
        tracing::debug!(from = self.state.name(), to = next.name(), "state transition");
        self.state = next;
        self.state.enter(&mut self.game);
        self.entered = true;
    }

    /// End the session in progress, if any. Returns whether one was running.
    pub fn end_session(&mut self) -> bool {
        let GameState::Play(play) = &self.state else {
            return false;
        };
        let over = play.end_session();
        self.transition(over);
        true
    }

    /// Step until the state machine quits or `max_frames` have run.
    pub fn run(&mut self, dilation: f32, max_frames: usize) -> usize {
        let mut frames = 0;
        while self.is_running() && frames < max_frames {
            self.step(dilation);
            frames += 1;
        }
        frames
    }

    pub fn into_game(self) -> Game<P> {
        self.game
    }
}
