//! Filesystem helpers shared by the runtime and tools.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

/// Maximum allowed level pack size for reading into memory.
///
/// 300 patterns of 1000 walls plus 300 levels stays far below this.
pub const MAX_PACK_BYTES: u64 = 16 * 1024 * 1024; // 16 MiB

/// Read a whole file, refusing anything larger than `max_bytes`.
///
/// The cap is enforced on the bytes actually read, so a file that grows
/// between open and read is still rejected.
pub fn read_file_with_limit(path: &Path, max_bytes: u64) -> Result<Vec<u8>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;

    let mut data = Vec::new();
    file.take(max_bytes.saturating_add(1))
        .read_to_end(&mut data)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    if data.len() as u64 > max_bytes {
        anyhow::bail!(
            "File too large: {} (over the {max_bytes}-byte limit)",
            path.display()
        );
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_file_with_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("levels.haxagon");
        std::fs::write(&path, b"HAX1.1").unwrap();

        assert_eq!(read_file_with_limit(&path, 6).unwrap(), b"HAX1.1");
        let err = read_file_with_limit(&path, 5).unwrap_err();
        assert!(err.to_string().contains("File too large"));
        assert!(read_file_with_limit(&dir.path().join("missing"), 6).is_err());
    }
}
