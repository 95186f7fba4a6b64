//! Level packs (`.haxagon`)
//!
//! A pack is one source of level content: the built-in pack in ROM or a user
//! supplied file. Packs are loaded all-or-nothing; a single bad record
//! rejects the whole pack.
//!
//! # Layout
//! ```text
//! "HAX1.1"
//! pattern_count   i32   (1..=300)
//! pattern_count × pattern record
//! level_count     i32   (1..=300)
//! level_count × level record
//! "ENDHAX"
//! ```
//!
//! Pattern references inside a pack index that pack's own pattern table. Level
//! references (the "next level" pointer) are pack-local too and are turned
//! into absolute collection indices using the [`ResolutionContext`] of the
//! load call.

use std::io::{self, Write};
use std::sync::Arc;

use byteorder::{LittleEndian, WriteBytesExt};

use crate::cursor::ByteReader;
use crate::error::LoadError;
use crate::formats::level::{Level, LevelRecord, Location};
use crate::formats::pattern::Pattern;

pub const PACK_HEADER: &[u8; 6] = b"HAX1.1";
pub const PACK_FOOTER: &[u8; 6] = b"ENDHAX";

/// File extension for level packs
pub const PACK_EXTENSION: &str = "haxagon";

pub const MIN_PACK_ENTRIES: i32 = 1;
pub const MAX_PACK_ENTRIES: i32 = 300;

/// Position of a pack in the overall level collection.
///
/// Carries the number of levels loaded from every earlier source. Each load
/// call receives it by value; the caller derives the next context with
/// [`advance`](Self::advance) once a pack has been committed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolutionContext {
    level_offset: usize,
}

impl ResolutionContext {
    pub fn new(level_offset: usize) -> Self {
        Self { level_offset }
    }

    pub fn level_offset(&self) -> usize {
        self.level_offset
    }

    /// Translate a pack-local level index into a collection index.
    pub fn absolute(&self, local: usize) -> usize {
        self.level_offset + local
    }

    /// Context for the source that follows one contributing `loaded` levels.
    #[must_use]
    pub fn advance(self, loaded: usize) -> Self {
        Self {
            level_offset: self.level_offset + loaded,
        }
    }
}

/// Everything decoded from one pack.
#[derive(Debug, Clone)]
pub struct LevelPack {
    pub patterns: Vec<Arc<Pattern>>,
    pub levels: Vec<Level>,
}

fn read_count(reader: &mut ByteReader<'_>, what: &'static str) -> Result<usize, LoadError> {
    let value = reader
        .read_i32()
        .map_err(|source| LoadError::Truncated { what, source })?;
    if !(MIN_PACK_ENTRIES..=MAX_PACK_ENTRIES).contains(&value) {
        return Err(LoadError::CountOutOfRange {
            what,
            value,
            min: MIN_PACK_ENTRIES,
            max: MAX_PACK_ENTRIES,
        });
    }
    Ok(value as usize)
}

/// Decode the pattern table: a count followed by that many pattern records.
///
/// Table order defines the index space that levels reference.
pub fn load_patterns(reader: &mut ByteReader<'_>) -> Result<Vec<Arc<Pattern>>, LoadError> {
    let count = read_count(reader, "patterns")?;
    let mut patterns = Vec::with_capacity(count);
    for index in 0..count {
        let pattern = Pattern::decode(reader)
            .map_err(|source| LoadError::PatternDecodeFailed { index, source })?;
        patterns.push(Arc::new(pattern));
    }
    Ok(patterns)
}

/// Decode the level table, linking every level against `patterns`.
pub fn load_level_table(
    reader: &mut ByteReader<'_>,
    patterns: &[Arc<Pattern>],
    location: Location,
    ctx: ResolutionContext,
) -> Result<Vec<Level>, LoadError> {
    let count = read_count(reader, "levels")?;
    let mut levels = Vec::with_capacity(count);
    for index in 0..count {
        let level = LevelRecord::decode(reader)
            .and_then(|record| record.resolve(patterns, location, ctx, index))
            .map_err(|source| LoadError::LevelDecodeFailed { index, source })?;
        levels.push(level);
    }
    Ok(levels)
}

/// Load one complete pack.
///
/// Levels are indexed starting at `ctx.level_offset()`. Nothing is returned
/// unless the whole pack, footer included, decodes cleanly.
pub fn load_levels(
    data: &[u8],
    location: Location,
    ctx: ResolutionContext,
) -> Result<LevelPack, LoadError> {
    let mut reader = ByteReader::new(data);

    if !reader.read_magic(PACK_HEADER) {
        return Err(LoadError::HeaderInvalid);
    }

    let patterns = load_patterns(&mut reader)?;
    let levels = load_level_table(&mut reader, &patterns, location, ctx)?;

    if !reader.read_magic(PACK_FOOTER) {
        return Err(LoadError::FooterInvalid);
    }

    if !reader.is_empty() {
        tracing::debug!(
            trailing = reader.remaining(),
            "ignoring trailing bytes after pack footer"
        );
    }

    Ok(LevelPack { patterns, levels })
}

/// Write a pack from its pattern table and level records.
pub fn encode_pack<W: Write>(
    w: &mut W,
    patterns: &[Pattern],
    levels: &[LevelRecord],
) -> io::Result<()> {
    let pattern_count = i32::try_from(patterns.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "too many patterns"))?;
    let level_count = i32::try_from(levels.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "too many levels"))?;

    w.write_all(PACK_HEADER)?;
    w.write_i32::<LittleEndian>(pattern_count)?;
    for pattern in patterns {
        pattern.encode(w)?;
    }
    w.write_i32::<LittleEndian>(level_count)?;
    for level in levels {
        level.encode(w)?;
    }
    w.write_all(PACK_FOOTER)?;
    Ok(())
}
