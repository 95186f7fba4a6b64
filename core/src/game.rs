//! Top-level game object
//!
//! Owns the platform, the configuration and the level collection for the
//! lifetime of the process. States borrow it mutably one at a time.

use haxagon_shared::LevelCollection;

use crate::config::Config;
use crate::platform::Platform;

pub struct Game<P: Platform> {
    platform: P,
    config: Config,
    levels: LevelCollection,
    /// Music path currently requested from the platform
    music: Option<String>,
}

impl<P: Platform> Game<P> {
    pub fn new(platform: P, config: Config) -> Self {
        Self {
            platform,
            config,
            levels: LevelCollection::new(),
            music: None,
        }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn levels(&self) -> &LevelCollection {
        &self.levels
    }

    pub fn levels_mut(&mut self) -> &mut LevelCollection {
        &mut self.levels
    }

    pub fn current_music(&self) -> Option<&str> {
        self.music.as_deref()
    }

    /// Start the music of the level at `index`.
    pub fn play_level_music(&mut self, index: usize) {
        let Some(level) = self.levels.get(index) else {
            return;
        };
        let path = level.music().to_string();
        let location = level.location();
        self.platform.play_music(&path, location);
        self.music = Some(path);
    }
}
