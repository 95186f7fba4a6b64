//! Score database blob
//!
//! High scores live in a fixed-size region of non-volatile storage (an EEPROM
//! file on cartridge hardware). The blob is always exactly `capacity` bytes;
//! unused bytes after the footer are zero.
//!
//! # Layout
//! ```text
//! "SCDB1.0"
//! record_count    u32
//! record_count × { name, difficulty, mode, creator strings, score i32 }
//! "ENDSCDB"
//! ```
//!
//! Decoding never fails the caller. A blob without the header is treated as
//! an empty database (first run). Damage after the header is reported along
//! with every record that decoded before it.

use std::collections::HashSet;

use crate::collection::LevelCollection;
use crate::cursor::{ByteReader, FixedWriter, string_size};
use crate::error::{DecodeError, EncodeError, ScoreDbError};
use crate::formats::level::ScoreKey;

pub const SCORE_HEADER: &[u8; 7] = b"SCDB1.0";
pub const SCORE_FOOTER: &[u8; 7] = b"ENDSCDB";

/// Byte budget of the score region on the reference hardware
pub const DEFAULT_SCORE_CAPACITY: usize = 500;

/// Smallest possible record: four empty strings and a score
pub const MIN_RECORD_BYTES: usize = 4 * 4 + 4;

/// Header, record count and footer
pub const SCORE_OVERHEAD: usize = SCORE_HEADER.len() + 4 + SCORE_FOOTER.len();

/// Upper bound on how many records a blob of `capacity` bytes can hold.
pub fn max_records(capacity: usize) -> usize {
    capacity.saturating_sub(SCORE_OVERHEAD) / MIN_RECORD_BYTES
}

/// One persisted high score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreRecord {
    pub key: ScoreKey,
    pub score: i32,
}

impl ScoreRecord {
    fn decode(reader: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        let key = ScoreKey {
            name: reader.read_string()?,
            difficulty: reader.read_string()?,
            mode: reader.read_string()?,
            creator: reader.read_string()?,
        };
        let score = reader.read_i32()?;
        Ok(Self { key, score })
    }
}

fn record_size(key: &ScoreKey) -> usize {
    string_size(&key.name)
        + string_size(&key.difficulty)
        + string_size(&key.mode)
        + string_size(&key.creator)
        + 4
}

fn write_record(w: &mut FixedWriter<'_>, key: &ScoreKey, score: i32) -> Result<(), EncodeError> {
    w.write_string(&key.name)?;
    w.write_string(&key.difficulty)?;
    w.write_string(&key.mode)?;
    w.write_string(&key.creator)?;
    w.write_i32(score)
}

/// What a blob holds, before it is matched against any levels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreDbContents {
    /// No header; nothing has been saved yet or the region holds other data
    Missing,
    Intact(Vec<ScoreRecord>),
    Damaged {
        salvaged: Vec<ScoreRecord>,
        error: ScoreDbError,
    },
}

/// Read every record out of `blob`.
///
/// Iteration is bounded by the blob length: a record count larger than the
/// number of records that could physically fit is rejected up front, and each
/// record read is bounds-checked.
pub fn parse_scores(blob: &[u8]) -> ScoreDbContents {
    let mut reader = ByteReader::new(blob);
    if !reader.read_magic(SCORE_HEADER) {
        return ScoreDbContents::Missing;
    }

    let count = match reader.read_u32() {
        Ok(count) => count,
        Err(source) => {
            return ScoreDbContents::Damaged {
                salvaged: Vec::new(),
                error: ScoreDbError::CountTruncated(source),
            };
        }
    };

    let max = max_records(blob.len());
    if count as usize > max {
        return ScoreDbContents::Damaged {
            salvaged: Vec::new(),
            error: ScoreDbError::CountOutOfRange {
                count,
                max: max as u32,
            },
        };
    }

    let mut records = Vec::with_capacity(count as usize);
    for index in 0..count as usize {
        match ScoreRecord::decode(&mut reader) {
            Ok(record) => records.push(record),
            Err(source) => {
                return ScoreDbContents::Damaged {
                    salvaged: records,
                    error: ScoreDbError::RecordDamaged { index, source },
                };
            }
        }
    }

    if !reader.read_magic(SCORE_FOOTER) {
        return ScoreDbContents::Damaged {
            salvaged: records,
            error: ScoreDbError::FooterInvalid,
        };
    }

    ScoreDbContents::Intact(records)
}

/// Result of merging a blob into the level collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreDecodeOutcome {
    /// The storage region could not be read at all
    Absent,
    /// The region holds no score database
    HeaderInvalid,
    Applied {
        records: usize,
        matched: usize,
    },
    /// Some records were applied before damage was found
    Corrupt {
        records: usize,
        matched: usize,
        error: ScoreDbError,
    },
}

/// Set each matching level's high score from `records`.
///
/// Each record goes to the first level with the same key, and only the first
/// record for a key is applied: later ones belong to levels that share the
/// key and lose the lookup. Records matching no level are dropped. Returns how
/// many records were applied.
pub fn apply_scores(records: &[ScoreRecord], levels: &mut LevelCollection) -> usize {
    let mut applied = HashSet::new();
    for record in records {
        let Some(index) = levels.position_by_key(&record.key) else {
            tracing::debug!(key = %record.key, "dropping score for unknown level");
            continue;
        };
        if !applied.insert(index) {
            tracing::debug!(key = %record.key, index, "ignoring score for shadowed level");
            continue;
        }
        if let Some(level) = levels.get_mut(index) {
            level.restore_high_score(record.score);
        }
    }
    applied.len()
}

/// Decode `blob` and merge its scores into `levels`.
pub fn decode_scores(blob: &[u8], levels: &mut LevelCollection) -> ScoreDecodeOutcome {
    match parse_scores(blob) {
        ScoreDbContents::Missing => ScoreDecodeOutcome::HeaderInvalid,
        ScoreDbContents::Intact(records) => ScoreDecodeOutcome::Applied {
            records: records.len(),
            matched: apply_scores(&records, levels),
        },
        ScoreDbContents::Damaged { salvaged, error } => ScoreDecodeOutcome::Corrupt {
            records: salvaged.len(),
            matched: apply_scores(&salvaged, levels),
            error,
        },
    }
}

/// Fixed-capacity buffer holding one score blob.
///
/// Released on drop, so every exit path of a load or commit frees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreBlob {
    bytes: Box<[u8]>,
}

impl ScoreBlob {
    /// A zero-filled blob.
    pub fn new(capacity: usize) -> Self {
        Self {
            bytes: vec![0u8; capacity].into_boxed_slice(),
        }
    }

    /// Fit raw storage contents to `capacity`, zero-padding or cutting.
    pub fn from_bytes(mut bytes: Vec<u8>, capacity: usize) -> Self {
        bytes.resize(capacity, 0);
        Self {
            bytes: bytes.into_boxed_slice(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Outcome of encoding the collection into a blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreEncodeReport {
    pub written: usize,
    /// Levels that did not fit and were left out
    pub dropped: usize,
    /// Bytes used including header and footer
    pub bytes_used: usize,
}

/// Encode every level's current score into a blob of `capacity` bytes.
///
/// Levels are written in collection order while they fit; the rest are
/// dropped and counted in the report. The record count always matches the
/// records actually written, so the result decodes cleanly. Fails only when
/// `capacity` cannot hold even an empty database.
pub fn encode_scores(
    levels: &LevelCollection,
    capacity: usize,
) -> Result<(ScoreBlob, ScoreEncodeReport), EncodeError> {
    if capacity < SCORE_OVERHEAD {
        return Err(EncodeError::CapacityExceeded {
            offset: 0,
            needed: SCORE_OVERHEAD,
            remaining: capacity,
        });
    }

    let mut blob = ScoreBlob::new(capacity);
    let mut w = FixedWriter::new(&mut blob.bytes);
    w.write_bytes(SCORE_HEADER)?;
    let count_at = w.position();
    w.write_u32(0)?;

    let mut written = 0usize;
    for level in levels {
        if record_size(level.key()) + SCORE_FOOTER.len() > w.remaining() {
            break;
        }
        write_record(&mut w, level.key(), level.high_score())?;
        written += 1;
    }

    w.write_bytes(SCORE_FOOTER)?;
    w.patch_u32(count_at, written as u32)?;

    let report = ScoreEncodeReport {
        written,
        dropped: levels.len() - written,
        bytes_used: w.position(),
    };
    Ok((blob, report))
}
