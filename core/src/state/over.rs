use haxagon_shared::formats::{ScoreEncodeReport, encode_scores};

use super::{GameState, Menu, Play};
use crate::game::Game;
use crate::platform::{Platform, Severity};

/// Game over screen.
///
/// Entering records the session score against the selected level and commits
/// the whole score database. The commit result never blocks leaving.
#[derive(Debug, Clone, PartialEq)]
pub struct Over {
    level: usize,
    selected: usize,
    score: f32,
    high: bool,
    frames: f32,
    committed: Option<ScoreEncodeReport>,
}

impl Over {
    pub fn new(level: usize, selected: usize, score: f32) -> Self {
        Self {
            level,
            selected,
            score,
            high: false,
            frames: 0.0,
            committed: None,
        }
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn score(&self) -> f32 {
        self.score
    }

    /// Whether the session set a new record.
    pub fn is_high_score(&self) -> bool {
        self.high
    }

    /// Report of the score commit, if it reached the storage medium.
    pub fn committed(&self) -> Option<&ScoreEncodeReport> {
        self.committed.as_ref()
    }

    pub(super) fn enter<P: Platform>(&mut self, game: &mut Game<P>) {
        // Truncation toward zero, as the display does
        let score = self.score as i32;
        self.high = game
            .levels_mut()
            .get_mut(self.selected)
            .is_some_and(|level| level.set_high_score(score));
        if self.high {
            tracing::info!(level = self.selected, score, "new high score");
        }

        self.committed = commit_scores(game);
    }

    pub(super) fn update<P: Platform>(
        &mut self,
        game: &mut Game<P>,
        dilation: f32,
    ) -> Option<GameState> {
        self.frames += dilation;

        let press = game.platform_mut().pressed();
        if press.quit {
            return Some(GameState::Quit);
        }

        if self.frames < game.config().over.min_display_frames {
            return None;
        }

        if press.select {
            let selected_music = game.levels().get(self.selected).map(|l| l.music());
            let played_music = game.levels().get(self.level).map(|l| l.music());
            if selected_music != played_music {
                game.play_level_music(self.selected);
            }
            return Some(GameState::Play(Play::new(self.selected, self.selected)));
        }

        if press.back {
            return Some(GameState::Menu(Menu::new(self.selected)));
        }

        None
    }
}

/// Encode every level's score and write the blob.
///
/// Failures go to the diagnostic sink only.
pub fn commit_scores<P: Platform>(game: &mut Game<P>) -> Option<ScoreEncodeReport> {
    let capacity = game.config().scores.capacity;
    let key = game.config().scores.key.clone();

    let (blob, report) = match encode_scores(game.levels(), capacity) {
        Ok(encoded) => encoded,
        Err(e) => {
            game.platform()
                .message(Severity::Warn, "scores", &format!("cannot encode scores: {e}"));
            return None;
        }
    };

    if report.dropped > 0 {
        game.platform().message(
            Severity::Warn,
            "scores",
            &format!(
                "score database full: {} of {} levels not saved",
                report.dropped,
                report.written + report.dropped
            ),
        );
    }

    match game.platform_mut().write_blob(&key, blob.as_bytes()) {
        Ok(()) => {
            tracing::debug!(key, written = report.written, bytes = report.bytes_used, "scores saved");
            Some(report)
        }
        Err(e) => {
            game.platform()
                .message(Severity::Warn, "scores", &format!("writing scores failed: {e}"));
            None
        }
    }
}
