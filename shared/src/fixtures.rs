//! Synthetic level pack builders for tests

use crate::formats::level::{Color, LevelRecord, LevelStyle, NO_NEXT_LEVEL, ScoreKey};
use crate::formats::pack::encode_pack;
use crate::formats::pattern::{Pattern, Wall};

/// A six-sided pattern with a single wall.
pub fn pattern(name: &str) -> Pattern {
    Pattern {
        name: name.to_string(),
        sides: 6,
        walls: vec![Wall {
            distance: 0,
            height: 16,
            side: 0,
        }],
    }
}

/// A level keyed `(name, "Hard", "Normal", "Dev")` using `patterns`.
pub fn level_record(name: &str, patterns: &[u16]) -> LevelRecord {
    keyed_record(name, "Hard", "Normal", "Dev", patterns)
}

pub fn keyed_record(
    name: &str,
    difficulty: &str,
    mode: &str,
    creator: &str,
    patterns: &[u16],
) -> LevelRecord {
    let white = Color {
        r: 255,
        g: 255,
        b: 255,
        a: 255,
    };
    LevelRecord {
        key: ScoreKey {
            name: name.to_string(),
            difficulty: difficulty.to_string(),
            mode: mode.to_string(),
            creator: creator.to_string(),
        },
        music: format!("music/{}", name.to_lowercase()),
        style: LevelStyle {
            background_1: vec![white],
            background_2: vec![white],
            foreground: vec![white],
            speed_wall: 1.0,
            speed_rotation: 1.0,
            speed_cursor: 1.0,
            speed_pulse: 1.0,
        },
        next_index: NO_NEXT_LEVEL,
        patterns: patterns.to_vec(),
    }
}

/// Encode a pack in memory.
pub fn pack_bytes(patterns: &[Pattern], levels: &[LevelRecord]) -> Vec<u8> {
    let mut out = Vec::new();
    encode_pack(&mut out, patterns, levels).expect("writing to a Vec cannot fail");
    out
}

/// A pack with `pattern_count` patterns and one level per name, each
/// referencing pattern 0.
pub fn simple_pack(pattern_count: usize, names: &[&str]) -> Vec<u8> {
    let patterns: Vec<_> = (0..pattern_count).map(|i| pattern(&format!("p{i}"))).collect();
    let levels: Vec<_> = names.iter().map(|name| level_record(name, &[0])).collect();
    pack_bytes(&patterns, &levels)
}
