//! Haxagon Core - runtime for level loading and score persistence
//!
//! # Architecture
//!
//! - [`Platform`] - Collaborator trait for files, blob storage, input and music
//! - [`Game`] - Owns the platform, configuration and level collection
//! - [`GameState`] - Load / Menu / Play / Over / Quit state machine
//! - [`Runner`] - Steps the state machine once per frame

pub mod config;
pub mod error;
pub mod game;
pub mod platform;
pub mod runner;
pub mod save_store;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use config::Config;
pub use error::{ConfigError, GameError};
pub use game::Game;
pub use platform::{Buttons, DesktopPlatform, Platform, Severity};
pub use runner::Runner;
pub use save_store::{BlobStore, FileBlobStore, MemoryBlobStore};
pub use state::{GameState, Load, LoadSummary, Menu, Over, Play};
