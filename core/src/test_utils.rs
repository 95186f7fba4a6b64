//! Shared test utilities for state machine tests

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::io::{self, Read};

use haxagon_shared::Location;

use crate::config::Config;
use crate::game::Game;
use crate::platform::{Buttons, Platform, Severity};
use crate::save_store::{BlobStore, MemoryBlobStore};

/// In-memory platform with scripted input.
#[derive(Default)]
pub struct TestPlatform {
    files: HashMap<(Location, String), Vec<u8>>,
    user_levels: Vec<(Location, String)>,
    pub blobs: MemoryBlobStore,
    buttons: VecDeque<Buttons>,
    messages: RefCell<Vec<(Severity, String, String)>>,
    pub music: Vec<(String, Location)>,
}

impl TestPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `data` as the built-in level pack.
    pub fn with_rom_levels(mut self, data: Vec<u8>) -> Self {
        self.files
            .insert((Location::Rom, "/levels.haxagon".to_string()), data);
        self
    }

    /// Add a user level pack at `path`.
    pub fn with_user_levels(mut self, path: &str, data: Vec<u8>) -> Self {
        self.files.insert((Location::User, path.to_string()), data);
        self.user_levels.push((Location::User, path.to_string()));
        self
    }

    /// List a user level pack that cannot be opened.
    pub fn with_missing_user_levels(mut self, path: &str) -> Self {
        self.user_levels.push((Location::User, path.to_string()));
        self
    }

    pub fn with_blob(mut self, key: &str, bytes: Vec<u8>) -> Self {
        self.blobs = self.blobs.with_blob(key, bytes);
        self
    }

    /// Queue presses for upcoming frames, one entry per frame.
    pub fn press(&mut self, buttons: Buttons) {
        self.buttons.push_back(buttons);
    }

    pub fn messages(&self) -> Vec<(Severity, String, String)> {
        self.messages.borrow().clone()
    }

    pub fn has_message(&self, severity: Severity, component: &str) -> bool {
        self.messages
            .borrow()
            .iter()
            .any(|(s, c, _)| *s == severity && c == component)
    }
}

impl Platform for TestPlatform {
    fn open_file(&self, path: &str, location: Location) -> Option<Box<dyn Read>> {
        let data = self.files.get(&(location, path.to_string()))?.clone();
        Some(Box::new(io::Cursor::new(data)))
    }

    fn user_levels(&self) -> Vec<(Location, String)> {
        self.user_levels.clone()
    }

    fn read_blob(&self, key: &str, capacity: usize) -> io::Result<Vec<u8>> {
        self.blobs.read(key, capacity)
    }

    fn write_blob(&mut self, key: &str, bytes: &[u8]) -> io::Result<()> {
        self.blobs.write(key, bytes)
    }

    fn message(&self, severity: Severity, component: &str, text: &str) {
        self.messages
            .borrow_mut()
            .push((severity, component.to_string(), text.to_string()));
    }

    fn pressed(&mut self) -> Buttons {
        self.buttons.pop_front().unwrap_or_default()
    }

    fn play_music(&mut self, path: &str, location: Location) {
        self.music.push((path.to_string(), location));
    }
}

pub fn select() -> Buttons {
    Buttons {
        select: true,
        ..Buttons::default()
    }
}

pub fn back() -> Buttons {
    Buttons {
        back: true,
        ..Buttons::default()
    }
}

pub fn quit() -> Buttons {
    Buttons {
        quit: true,
        ..Buttons::default()
    }
}

pub fn left() -> Buttons {
    Buttons {
        left: true,
        ..Buttons::default()
    }
}

pub fn right() -> Buttons {
    Buttons {
        right: true,
        ..Buttons::default()
    }
}

pub fn game(platform: TestPlatform) -> Game<TestPlatform> {
    Game::new(platform, Config::default())
}
