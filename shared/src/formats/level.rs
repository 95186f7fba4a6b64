//! Level records
//!
//! [`LevelRecord`] is the on-disk shape: every cross reference is local to the
//! pack it came from. [`Level`] is the resolved, in-memory shape produced by
//! [`LevelRecord::resolve`]: pattern references point into the pack's pattern
//! table and the level knows its absolute position in the level collection.
//!
//! # Layout
//! ```text
//! "LVL"
//! name, difficulty, mode, creator, music     strings
//! 3 × palette { count u16 (1..=512), count × rgba u8 }
//! next_index      i32   (-1..=299, local to the pack)
//! speed_wall, speed_rotation, speed_cursor, speed_pulse    f32
//! pattern_count   u16   (1..=300)
//! pattern_count × u16 pattern index
//! "ENDLVL"
//! ```

use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

use byteorder::{LittleEndian, WriteBytesExt};
use serde::{Deserialize, Serialize};

use crate::cursor::{ByteReader, WriteRecordExt, check_range};
use crate::error::DecodeError;
use crate::formats::pack::ResolutionContext;
use crate::formats::pattern::Pattern;

pub const LEVEL_HEADER: &[u8; 3] = b"LVL";
pub const LEVEL_FOOTER: &[u8; 6] = b"ENDLVL";

pub const MIN_PALETTE_COLORS: u16 = 1;
pub const MAX_PALETTE_COLORS: u16 = 512;
pub const MIN_LEVEL_PATTERNS: u16 = 1;
pub const MAX_LEVEL_PATTERNS: u16 = 300;

/// `next_index` value meaning "this level has no successor"
pub const NO_NEXT_LEVEL: i32 = -1;
pub const MAX_NEXT_LEVEL: i32 = 299;

/// Where a level pack was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    /// Built-in assets shipped with the game
    Rom,
    /// User-provided storage
    User,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Rom => write!(f, "rom"),
            Location::User => write!(f, "user"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Colors and speeds that shape how a level plays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelStyle {
    pub background_1: Vec<Color>,
    pub background_2: Vec<Color>,
    pub foreground: Vec<Color>,
    pub speed_wall: f32,
    pub speed_rotation: f32,
    pub speed_cursor: f32,
    pub speed_pulse: f32,
}

/// Identity under which a level's high score is persisted.
///
/// Not unique by construction; lookups take the first match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScoreKey {
    pub name: String,
    pub difficulty: String,
    pub mode: String,
    pub creator: String,
}

impl fmt::Display for ScoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{} / {}] by {}",
            self.name, self.difficulty, self.mode, self.creator
        )
    }
}

/// A level exactly as stored in a pack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelRecord {
    #[serde(flatten)]
    pub key: ScoreKey,
    /// Music reference without the leading `/`
    pub music: String,
    #[serde(flatten)]
    pub style: LevelStyle,
    /// Pack-local index of the following level, or [`NO_NEXT_LEVEL`]
    #[serde(default = "default_next_index")]
    pub next_index: i32,
    /// Indices into the pack's pattern table
    pub patterns: Vec<u16>,
}

fn default_next_index() -> i32 {
    NO_NEXT_LEVEL
}

fn read_palette(reader: &mut ByteReader<'_>) -> Result<Vec<Color>, DecodeError> {
    let count = reader.read_u16()?;
    check_range(
        "palette colors",
        count.into(),
        MIN_PALETTE_COLORS.into(),
        MAX_PALETTE_COLORS.into(),
    )?;
    let mut colors = Vec::with_capacity(count as usize);
    for _ in 0..count {
        colors.push(Color {
            r: reader.read_u8()?,
            g: reader.read_u8()?,
            b: reader.read_u8()?,
            a: reader.read_u8()?,
        });
    }
    Ok(colors)
}

fn write_palette<W: Write>(w: &mut W, colors: &[Color]) -> io::Result<()> {
    let count = u16::try_from(colors.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "too many colors"))?;
    w.write_u16::<LittleEndian>(count)?;
    for c in colors {
        w.write_all(&[c.r, c.g, c.b, c.a])?;
    }
    Ok(())
}

impl LevelRecord {
    /// Decode one level record. Pattern indices are range-checked later by
    /// [`resolve`](Self::resolve), which knows the pattern table.
    pub fn decode(reader: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        reader.expect_magic(LEVEL_HEADER, "level header")?;

        let key = ScoreKey {
            name: reader.read_string()?,
            difficulty: reader.read_string()?,
            mode: reader.read_string()?,
            creator: reader.read_string()?,
        };
        let music = reader.read_string()?;

        let background_1 = read_palette(reader)?;
        let background_2 = read_palette(reader)?;
        let foreground = read_palette(reader)?;

        let next_index = reader.read_i32()?;
        check_range(
            "next level",
            next_index.into(),
            NO_NEXT_LEVEL.into(),
            MAX_NEXT_LEVEL.into(),
        )?;

        let style = LevelStyle {
            background_1,
            background_2,
            foreground,
            speed_wall: reader.read_f32()?,
            speed_rotation: reader.read_f32()?,
            speed_cursor: reader.read_f32()?,
            speed_pulse: reader.read_f32()?,
        };

        let pattern_count = reader.read_u16()?;
        check_range(
            "level patterns",
            pattern_count.into(),
            MIN_LEVEL_PATTERNS.into(),
            MAX_LEVEL_PATTERNS.into(),
        )?;
        let mut patterns = Vec::with_capacity(pattern_count as usize);
        for _ in 0..pattern_count {
            patterns.push(reader.read_u16()?);
        }

        reader.expect_magic(LEVEL_FOOTER, "level footer")?;

        Ok(Self {
            key,
            music,
            style,
            next_index,
            patterns,
        })
    }

    pub fn encode<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let pattern_count = u16::try_from(self.patterns.len())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "too many patterns"))?;

        w.write_all(LEVEL_HEADER)?;
        w.write_string(&self.key.name)?;
        w.write_string(&self.key.difficulty)?;
        w.write_string(&self.key.mode)?;
        w.write_string(&self.key.creator)?;
        w.write_string(&self.music)?;
        write_palette(w, &self.style.background_1)?;
        write_palette(w, &self.style.background_2)?;
        write_palette(w, &self.style.foreground)?;
        w.write_i32::<LittleEndian>(self.next_index)?;
        w.write_f32::<LittleEndian>(self.style.speed_wall)?;
        w.write_f32::<LittleEndian>(self.style.speed_rotation)?;
        w.write_f32::<LittleEndian>(self.style.speed_cursor)?;
        w.write_f32::<LittleEndian>(self.style.speed_pulse)?;
        w.write_u16::<LittleEndian>(pattern_count)?;
        for &index in &self.patterns {
            w.write_u16::<LittleEndian>(index)?;
        }
        w.write_all(LEVEL_FOOTER)?;
        Ok(())
    }

    /// Link this record against its pack's pattern table.
    ///
    /// `position` is the record's position within its pack; the absolute
    /// level index and the successor index are both offset by the context.
    pub fn resolve(
        self,
        table: &[Arc<Pattern>],
        location: Location,
        ctx: ResolutionContext,
        position: usize,
    ) -> Result<Level, DecodeError> {
        let patterns = self
            .patterns
            .iter()
            .map(|&index| {
                table
                    .get(index as usize)
                    .cloned()
                    .ok_or(DecodeError::PatternIndexOutOfRange {
                        index: index as usize,
                        len: table.len(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let next_index = usize::try_from(self.next_index)
            .ok()
            .map(|next| ctx.absolute(next));

        Ok(Level {
            key: self.key,
            music: format!("/{}", self.music),
            style: self.style,
            location,
            index: ctx.absolute(position),
            next_index,
            patterns,
            high_score: 0,
        })
    }
}

/// A playable level held in the level collection.
///
/// Everything but the high score is fixed once the level is loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    key: ScoreKey,
    music: String,
    style: LevelStyle,
    location: Location,
    index: usize,
    next_index: Option<usize>,
    patterns: Vec<Arc<Pattern>>,
    high_score: i32,
}

impl Level {
    pub fn name(&self) -> &str {
        &self.key.name
    }

    pub fn difficulty(&self) -> &str {
        &self.key.difficulty
    }

    pub fn mode(&self) -> &str {
        &self.key.mode
    }

    pub fn creator(&self) -> &str {
        &self.key.creator
    }

    pub fn key(&self) -> &ScoreKey {
        &self.key
    }

    /// Music path, always starting with `/`
    pub fn music(&self) -> &str {
        &self.music
    }

    pub fn style(&self) -> &LevelStyle {
        &self.style
    }

    pub fn location(&self) -> Location {
        self.location
    }

    /// Absolute position in the level collection
    pub fn index(&self) -> usize {
        self.index
    }

    /// Absolute index of the following level, if the pack named one.
    ///
    /// The index is not guaranteed to exist; see
    /// [`LevelCollection::next_of`](crate::LevelCollection::next_of).
    pub fn next_index(&self) -> Option<usize> {
        self.next_index
    }

    pub fn patterns(&self) -> &[Arc<Pattern>] {
        &self.patterns
    }

    pub fn high_score(&self) -> i32 {
        self.high_score
    }

    /// Record `score` if it strictly beats the stored high score.
    ///
    /// Returns `true` when the score is a new record. Ties are not records.
    pub fn set_high_score(&mut self, score: i32) -> bool {
        if score > self.high_score {
            self.high_score = score;
            return true;
        }
        false
    }

    /// Overwrite the high score with a persisted value.
    pub(crate) fn restore_high_score(&mut self, score: i32) {
        self.high_score = score;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::pattern::Wall;

    fn table(len: usize) -> Vec<Arc<Pattern>> {
        (0..len)
            .map(|i| {
                Arc::new(Pattern {
                    name: format!("p{i}"),
                    sides: 6,
                    walls: vec![Wall {
                        distance: 0,
                        height: 10,
                        side: 0,
                    }],
                })
            })
            .collect()
    }

    fn record(patterns: Vec<u16>, next_index: i32) -> LevelRecord {
        let color = Color {
            r: 255,
            g: 0,
            b: 0,
            a: 255,
        };
        LevelRecord {
            key: ScoreKey {
                name: "Hexagon".to_string(),
                difficulty: "Hard".to_string(),
                mode: "Normal".to_string(),
                creator: "Dev".to_string(),
            },
            music: "hexagon".to_string(),
            style: LevelStyle {
                background_1: vec![color],
                background_2: vec![color, color],
                foreground: vec![color],
                speed_wall: 2.0,
                speed_rotation: 0.5,
                speed_cursor: 1.25,
                speed_pulse: 0.0,
            },
            next_index,
            patterns,
        }
    }

    #[test]
    fn test_decode_encoded_record() {
        let original = record(vec![0, 2, 1], 1);
        let mut bytes = Vec::new();
        original.encode(&mut bytes).unwrap();

        let mut reader = ByteReader::new(&bytes);
        assert_eq!(LevelRecord::decode(&mut reader).unwrap(), original);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_next_index_out_of_range() {
        let mut bytes = Vec::new();
        record(vec![0], -2).encode(&mut bytes).unwrap();
        let err = LevelRecord::decode(&mut ByteReader::new(&bytes)).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::OutOfRange {
                what: "next level",
                value: -2,
                ..
            }
        ));
    }

    #[test]
    fn test_resolve_shares_patterns_and_offsets_indices() {
        let table = table(3);
        let ctx = ResolutionContext::new(4);
        let level = record(vec![2, 0], 1)
            .resolve(&table, Location::User, ctx, 1)
            .unwrap();

        assert_eq!(level.index(), 5);
        assert_eq!(level.next_index(), Some(5));
        assert_eq!(level.music(), "/hexagon");
        assert_eq!(level.location(), Location::User);
        assert_eq!(level.patterns().len(), 2);
        assert!(Arc::ptr_eq(&level.patterns()[0], &table[2]));
        assert_eq!(level.high_score(), 0);
    }

    #[test]
    fn test_resolve_without_next_level() {
        let level = record(vec![0], NO_NEXT_LEVEL)
            .resolve(&table(1), Location::Rom, ResolutionContext::default(), 0)
            .unwrap();
        assert_eq!(level.next_index(), None);
    }

    #[test]
    fn test_resolve_rejects_unknown_pattern() {
        let err = record(vec![0, 3], NO_NEXT_LEVEL)
            .resolve(&table(3), Location::Rom, ResolutionContext::default(), 0)
            .unwrap_err();
        assert_eq!(err, DecodeError::PatternIndexOutOfRange { index: 3, len: 3 });
    }

    #[test]
    fn test_high_score_is_strictly_greater() {
        let mut level = record(vec![0], NO_NEXT_LEVEL)
            .resolve(&table(1), Location::Rom, ResolutionContext::default(), 0)
            .unwrap();
        assert!(level.set_high_score(1200));
        assert!(!level.set_high_score(1200));
        assert!(!level.set_high_score(900));
        assert!(level.set_high_score(1500));
        assert_eq!(level.high_score(), 1500);
    }
}
