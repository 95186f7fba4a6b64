//! Level content and score persistence for Haxagon.
//!
//! Formats decode from byte slices and encode into caller buffers. The only
//! file access is the size-capped reader in [`fs`]; storage lives in
//! `haxagon-core`.

pub mod collection;
pub mod cursor;
pub mod error;
pub mod formats;
pub mod fs;

#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;

pub use collection::{DuplicateKey, LevelCollection};
pub use error::{DecodeError, EncodeError, LoadError, ScoreDbError};
pub use formats::{
    Level, LevelPack, LevelRecord, Location, Pattern, ResolutionContext, ScoreBlob,
    ScoreDecodeOutcome, ScoreKey, load_levels,
};
