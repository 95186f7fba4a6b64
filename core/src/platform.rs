//! Platform collaborator
//!
//! Everything the game states need from the outside world: level files, the
//! non-volatile blob medium, input, music and a diagnostic sink. Rendering
//! and audio mixing stay behind this trait.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use haxagon_shared::formats::PACK_EXTENSION;
use haxagon_shared::Location;

use crate::config::Config;
use crate::save_store::{BlobStore, FileBlobStore};

/// Severity of a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warn,
    /// The game cannot continue
    Fatal,
}

/// Buttons pressed since the previous frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Buttons {
    pub select: bool,
    pub back: bool,
    pub quit: bool,
    pub left: bool,
    pub right: bool,
}

pub trait Platform {
    /// Open a file for reading, or `None` if it does not exist.
    fn open_file(&self, path: &str, location: Location) -> Option<Box<dyn Read>>;

    /// User-supplied level packs, in load order.
    fn user_levels(&self) -> Vec<(Location, String)>;

    fn read_blob(&self, key: &str, capacity: usize) -> io::Result<Vec<u8>>;

    fn write_blob(&mut self, key: &str, bytes: &[u8]) -> io::Result<()>;

    /// Diagnostic sink.
    fn message(&self, severity: Severity, component: &str, text: &str) {
        match severity {
            Severity::Info => tracing::info!(component = component, "{text}"),
            Severity::Warn => tracing::warn!(component = component, "{text}"),
            Severity::Fatal => tracing::error!(component = component, "{text}"),
        }
    }

    fn pressed(&mut self) -> Buttons;

    fn play_music(&mut self, path: &str, location: Location);
}

/// Desktop host: directories from configuration, no input device.
#[derive(Debug, Clone)]
pub struct DesktopPlatform {
    rom_dir: PathBuf,
    user_dir: PathBuf,
    blobs: FileBlobStore,
}

impl DesktopPlatform {
    pub fn new(config: &Config) -> Self {
        Self {
            rom_dir: config.storage.rom_dir.clone(),
            user_dir: config.storage.user_dir.clone(),
            blobs: FileBlobStore::new(
                config.storage.save_dir.clone(),
                config.storage.eeprom_bytes,
            ),
        }
    }

    /// Filesystem path for a platform path such as `/levels.haxagon`.
    pub fn resolve(&self, path: &str, location: Location) -> PathBuf {
        let base = match location {
            Location::Rom => &self.rom_dir,
            Location::User => &self.user_dir,
        };
        base.join(path.trim_start_matches('/'))
    }
}

fn is_level_pack(path: &Path) -> bool {
    path.is_file() && path.extension().is_some_and(|ext| ext == PACK_EXTENSION)
}

impl Platform for DesktopPlatform {
    fn open_file(&self, path: &str, location: Location) -> Option<Box<dyn Read>> {
        let full = self.resolve(path, location);
        match fs::File::open(&full) {
            Ok(file) => Some(Box::new(io::BufReader::new(file))),
            Err(e) => {
                tracing::debug!(path = %full.display(), "cannot open: {e}");
                None
            }
        }
    }

    fn user_levels(&self) -> Vec<(Location, String)> {
        let entries = match fs::read_dir(&self.user_dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!(dir = %self.user_dir.display(), "no user levels: {e}");
                return Vec::new();
            }
        };

        let mut names: Vec<String> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| is_level_pack(path))
            .filter_map(|path| path.file_name()?.to_str().map(str::to_string))
            .collect();
        names.sort();

        names
            .into_iter()
            .map(|name| (Location::User, format!("/{name}")))
            .collect()
    }

    fn read_blob(&self, key: &str, capacity: usize) -> io::Result<Vec<u8>> {
        self.blobs.read(key, capacity)
    }

    fn write_blob(&mut self, key: &str, bytes: &[u8]) -> io::Result<()> {
        self.blobs.write(key, bytes)
    }

    fn pressed(&mut self) -> Buttons {
        Buttons::default()
    }

    fn play_music(&mut self, path: &str, location: Location) {
        tracing::info!(path, %location, "play music");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn platform(root: &Path) -> DesktopPlatform {
        let mut config = Config::default();
        config.storage.rom_dir = root.join("romfs");
        config.storage.user_dir = root.join("levels");
        config.storage.save_dir = root.join("saves");
        DesktopPlatform::new(&config)
    }

    #[test]
    fn user_levels_are_sorted_packs_only() {
        let dir = tempfile::tempdir().unwrap();
        let levels = dir.path().join("levels");
        fs::create_dir_all(levels.join("nested.haxagon")).unwrap();
        fs::write(levels.join("b.haxagon"), b"").unwrap();
        fs::write(levels.join("a.haxagon"), b"").unwrap();
        fs::write(levels.join("notes.txt"), b"").unwrap();

        let platform = platform(dir.path());
        assert_eq!(
            platform.user_levels(),
            vec![
                (Location::User, "/a.haxagon".to_string()),
                (Location::User, "/b.haxagon".to_string()),
            ]
        );
    }

    #[test]
    fn missing_user_dir_yields_no_levels() {
        let dir = tempfile::tempdir().unwrap();
        assert!(platform(dir.path()).user_levels().is_empty());
    }

    #[test]
    fn open_file_resolves_by_location() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("romfs")).unwrap();
        fs::write(dir.path().join("romfs/levels.haxagon"), b"HAX1.1").unwrap();

        let platform = platform(dir.path());
        let mut data = Vec::new();
        platform
            .open_file("/levels.haxagon", Location::Rom)
            .unwrap()
            .read_to_end(&mut data)
            .unwrap();
        assert_eq!(data, b"HAX1.1");
        assert!(platform.open_file("/levels.haxagon", Location::User).is_none());
    }

    #[test]
    fn blobs_persist_under_save_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut platform = platform(dir.path());
        platform.write_blob("/scores.db", b"SCDB1.0").unwrap();
        assert!(dir.path().join("saves/scores.db").exists());
        assert_eq!(&platform.read_blob("/scores.db", 7).unwrap(), b"SCDB1.0");
    }
}
