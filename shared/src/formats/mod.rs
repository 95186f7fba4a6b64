//! Haxagon binary formats
//!
//! Level packs (`.haxagon`) carry patterns and levels; the score database is
//! a fixed-size blob in non-volatile storage. All integers are little-endian
//! and every block is framed by ASCII magic strings.

pub mod level;
pub mod pack;
pub mod pattern;
pub mod score_db;

pub use level::*;
pub use pack::*;
pub use pattern::*;
pub use score_db::*;
