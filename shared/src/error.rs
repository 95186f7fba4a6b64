//! Error types for level pack and score database decoding

use thiserror::Error;

/// Low-level fault raised by the byte cursors.
///
/// Every read path in the formats returns one of these instead of reading
/// past the end of the buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("unexpected end of data at offset {offset}: needed {needed} bytes, {remaining} remaining")]
    Truncated {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    #[error("invalid {what} magic at offset {offset}")]
    BadMagic { what: &'static str, offset: usize },

    #[error("{what} out of range: {value} (expected {min}..={max})")]
    OutOfRange {
        what: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("pattern reference {index} out of range (table has {len} patterns)")]
    PatternIndexOutOfRange { index: usize, len: usize },
}

/// Fault raised when writing into a fixed-capacity buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("capacity exceeded at offset {offset}: needed {needed} bytes, {remaining} remaining")]
    CapacityExceeded {
        offset: usize,
        needed: usize,
        remaining: usize,
    },
}

/// Failure to load one level pack source.
///
/// Any of these aborts the whole source; nothing decoded from it is kept.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadError {
    #[error("file header invalid")]
    HeaderInvalid,

    #[error("file footer invalid")]
    FooterInvalid,

    #[error("number of {what} out of range: {value} (expected {min}..={max})")]
    CountOutOfRange {
        what: &'static str,
        value: i32,
        min: i32,
        max: i32,
    },

    #[error("pattern {index} failed to load: {source}")]
    PatternDecodeFailed {
        index: usize,
        #[source]
        source: DecodeError,
    },

    #[error("level {index} failed to load: {source}")]
    LevelDecodeFailed {
        index: usize,
        #[source]
        source: DecodeError,
    },

    #[error("truncated before {what}: {source}")]
    Truncated {
        what: &'static str,
        #[source]
        source: DecodeError,
    },
}

/// Damage found in a score blob after a valid header.
///
/// Never fatal; the score database reports these alongside whatever records
/// it managed to salvage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreDbError {
    #[error("record count missing: {0}")]
    CountTruncated(#[source] DecodeError),

    #[error("record count {count} exceeds the {max} records that fit in the blob")]
    CountOutOfRange { count: u32, max: u32 },

    #[error("score record {index} is damaged: {source}")]
    RecordDamaged {
        index: usize,
        #[source]
        source: DecodeError,
    },

    #[error("score database footer invalid")]
    FooterInvalid,
}
