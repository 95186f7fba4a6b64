//! Pattern records
//!
//! A pattern is a reusable arrangement of walls. Patterns have no identity of
//! their own beyond their position in the pattern table of the pack they were
//! loaded from.
//!
//! # Layout
//! ```text
//! "PTN"
//! name            string
//! sides           u32   (3..=256)
//! wall_count      u16   (1..=1000)
//! wall_count × { distance u16, height u16, side u16 }
//! "ENDPTN"
//! ```

use std::io::{self, Write};

use byteorder::{LittleEndian, WriteBytesExt};
use serde::{Deserialize, Serialize};

use crate::cursor::{ByteReader, WriteRecordExt, check_range};
use crate::error::DecodeError;

pub const PATTERN_HEADER: &[u8; 3] = b"PTN";
pub const PATTERN_FOOTER: &[u8; 6] = b"ENDPTN";

pub const MIN_PATTERN_SIDES: u32 = 3;
pub const MAX_PATTERN_SIDES: u32 = 256;
pub const MIN_PATTERN_WALLS: u16 = 1;
pub const MAX_PATTERN_WALLS: u16 = 1000;

/// A single wall segment of a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wall {
    /// Distance from the center at spawn time
    pub distance: u16,
    /// Radial thickness
    pub height: u16,
    /// Which side of the polygon the wall sits on
    pub side: u16,
}

/// Immutable wall template referenced by levels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    pub name: String,
    pub sides: u32,
    pub walls: Vec<Wall>,
}

impl Pattern {
    /// Decode one pattern record.
    ///
    /// Walls that name a side beyond the pattern's side count are clamped to
    /// the last side.
    pub fn decode(reader: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        reader.expect_magic(PATTERN_HEADER, "pattern header")?;

        let name = reader.read_string()?;

        let sides = reader.read_u32()?;
        check_range(
            "pattern sides",
            sides.into(),
            MIN_PATTERN_SIDES.into(),
            MAX_PATTERN_SIDES.into(),
        )?;

        let wall_count = reader.read_u16()?;
        check_range(
            "pattern walls",
            wall_count.into(),
            MIN_PATTERN_WALLS.into(),
            MAX_PATTERN_WALLS.into(),
        )?;

        let mut walls = Vec::with_capacity(wall_count as usize);
        for _ in 0..wall_count {
            let distance = reader.read_u16()?;
            let height = reader.read_u16()?;
            let mut side = reader.read_u16()?;
            if u32::from(side) >= sides {
                tracing::debug!(pattern = %name, side, sides, "wall side clamped");
                side = (sides - 1) as u16;
            }
            walls.push(Wall {
                distance,
                height,
                side,
            });
        }

        reader.expect_magic(PATTERN_FOOTER, "pattern footer")?;

        Ok(Self { name, sides, walls })
    }

    /// Encode this pattern as a record.
    pub fn encode<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let wall_count = u16::try_from(self.walls.len())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "too many walls"))?;

        w.write_all(PATTERN_HEADER)?;
        w.write_string(&self.name)?;
        w.write_u32::<LittleEndian>(self.sides)?;
        w.write_u16::<LittleEndian>(wall_count)?;
        for wall in &self.walls {
            w.write_u16::<LittleEndian>(wall.distance)?;
            w.write_u16::<LittleEndian>(wall.height)?;
            w.write_u16::<LittleEndian>(wall.side)?;
        }
        w.write_all(PATTERN_FOOTER)?;
        Ok(())
    }
}
