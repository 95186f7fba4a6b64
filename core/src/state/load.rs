use std::io::Read;

use haxagon_shared::Location;
use haxagon_shared::formats::{ScoreBlob, ScoreDecodeOutcome, decode_scores, load_levels};
use haxagon_shared::fs::MAX_PACK_BYTES;

use super::{GameState, Menu};
use crate::error::GameError;
use crate::game::Game;
use crate::platform::{Platform, Severity};

/// Built-in level pack, always loaded first
pub const ROM_LEVELS: &str = "/levels.haxagon";

/// What the load sequence found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    pub sources_loaded: usize,
    /// Sources that opened but were rejected
    pub sources_failed: usize,
    pub levels: usize,
    pub scores: ScoreDecodeOutcome,
}

/// Loads every level source, then the score database.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Load {
    result: Option<Result<LoadSummary, GameError>>,
}

enum SourceOutcome {
    Missing,
    Rejected,
    Loaded,
}

impl Load {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` until the state has been entered.
    pub fn result(&self) -> Option<&Result<LoadSummary, GameError>> {
        self.result.as_ref()
    }

    pub(super) fn enter<P: Platform>(&mut self, game: &mut Game<P>) {
        self.result = Some(load_game(game));
    }

    pub(super) fn update(&mut self) -> Option<GameState> {
        match self.result {
            Some(Ok(_)) => Some(GameState::Menu(Menu::new(0))),
            _ => Some(GameState::Quit),
        }
    }
}

/// Sources in load order: the built-in pack, then user packs.
fn sources<P: Platform>(platform: &P) -> Vec<(Location, String)> {
    let mut sources = vec![(Location::Rom, ROM_LEVELS.to_string())];
    sources.extend(platform.user_levels());
    sources
}

/// Load every source into `game`, then apply the score database.
///
/// Sources that are missing or fail to parse are skipped. Fails only when no
/// level at all was loaded.
pub fn load_game<P: Platform>(game: &mut Game<P>) -> Result<LoadSummary, GameError> {
    let mut sources_loaded = 0;
    let mut sources_failed = 0;

    for (location, path) in sources(game.platform()) {
        match load_source(game, &path, location) {
            SourceOutcome::Missing => {}
            SourceOutcome::Rejected => sources_failed += 1,
            SourceOutcome::Loaded => sources_loaded += 1,
        }
    }

    for (index, next) in game.levels().dangling_next() {
        game.platform().message(
            Severity::Warn,
            "levels",
            &format!("level {index} names next level {next}, which was not loaded"),
        );
    }

    if game.levels().is_empty() {
        game.platform()
            .message(Severity::Fatal, "levels", "no levels loaded");
        return Err(GameError::NoLevelsLoaded);
    }

    let scores = load_scores(game);
    Ok(LoadSummary {
        sources_loaded,
        sources_failed,
        levels: game.levels().len(),
        scores,
    })
}

/// Load one pack and append its levels. The pack contributes nothing unless
/// it decodes completely.
fn load_source<P: Platform>(game: &mut Game<P>, path: &str, location: Location) -> SourceOutcome {
    let Some(stream) = game.platform().open_file(path, location) else {
        tracing::debug!(path, %location, "level source not present, skipping");
        return SourceOutcome::Missing;
    };

    let mut data = Vec::new();
    if let Err(e) = stream.take(MAX_PACK_BYTES + 1).read_to_end(&mut data) {
        game.platform()
            .message(Severity::Warn, "file", &format!("{path}: read failed: {e}"));
        return SourceOutcome::Rejected;
    }
    if data.len() as u64 > MAX_PACK_BYTES {
        game.platform().message(
            Severity::Warn,
            "file",
            &format!("{path}: larger than {MAX_PACK_BYTES} bytes"),
        );
        return SourceOutcome::Rejected;
    }

    let ctx = game.levels().context();
    let pack = match load_levels(&data, location, ctx) {
        Ok(pack) => pack,
        Err(e) => {
            game.platform()
                .message(Severity::Warn, "file", &format!("{path}: {e}"));
            return SourceOutcome::Rejected;
        }
    };

    let patterns = pack.patterns.len();
    let levels = pack.levels.len();
    let duplicates = game.levels_mut().append(pack.levels);
    for dup in duplicates {
        if let Some(level) = game.levels().get(dup.index) {
            game.platform().message(
                Severity::Warn,
                "levels",
                &format!(
                    "level {} shares its score key with level {} ({}); scores go to the first",
                    dup.index,
                    dup.existing,
                    level.key()
                ),
            );
        }
    }

    tracing::info!(
        path,
        %location,
        patterns,
        levels,
        offset = ctx.level_offset(),
        "loaded level pack"
    );
    SourceOutcome::Loaded
}

/// Read the score blob and merge it into the loaded levels.
///
/// Never fails: a missing or damaged database leaves the affected scores at
/// zero.
pub fn load_scores<P: Platform>(game: &mut Game<P>) -> ScoreDecodeOutcome {
    let capacity = game.config().scores.capacity;
    let key = game.config().scores.key.clone();

    let bytes = match game.platform().read_blob(&key, capacity) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::debug!(key, "score blob unreadable: {e}");
            game.platform()
                .message(Severity::Info, "scores", "no score database");
            return ScoreDecodeOutcome::Absent;
        }
    };

    let blob = ScoreBlob::from_bytes(bytes, capacity);
    let outcome = decode_scores(blob.as_bytes(), game.levels_mut());

    match &outcome {
        ScoreDecodeOutcome::Absent => {}
        ScoreDecodeOutcome::HeaderInvalid => game.platform().message(
            Severity::Warn,
            "scores",
            "score header invalid, skipping scores",
        ),
        ScoreDecodeOutcome::Applied { records, matched } => {
            tracing::info!(records, matched, "scores loaded");
        }
        ScoreDecodeOutcome::Corrupt {
            records,
            matched,
            error,
        } => game.platform().message(
            Severity::Warn,
            "scores",
            &format!("score database damaged ({error}); applied {matched} of {records} readable records"),
        ),
    }
    outcome
}
