//! Pack command - build a .haxagon level pack from a TOML manifest
//!
//! ```toml
//! [[patterns]]
//! name = "Spiral"
//! sides = 6
//! walls = [{ distance = 0, height = 16, side = 0 }]
//!
//! [[levels]]
//! name = "Hexagon"
//! difficulty = "Hard"
//! mode = "Normal"
//! creator = "Dev"
//! music = "music/hexagon"
//! background_1 = [{ r = 0, g = 0, b = 0, a = 255 }]
//! background_2 = [{ r = 16, g = 16, b = 16, a = 255 }]
//! foreground = [{ r = 255, g = 255, b = 255, a = 255 }]
//! speed_wall = 1.5
//! speed_rotation = 1.0
//! speed_cursor = 1.0
//! speed_pulse = 1.0
//! next_index = -1
//! patterns = [0]
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use haxagon_shared::formats::{
    LevelRecord, MAX_PACK_ENTRIES, PACK_EXTENSION, Pattern, encode_pack, load_levels,
};
use haxagon_shared::{Location, ResolutionContext};
use serde::Deserialize;

/// Arguments for the pack command
#[derive(Args)]
pub struct PackArgs {
    /// Path to the pack manifest
    #[arg(short, long, default_value = "levels.toml")]
    pub manifest: PathBuf,

    /// Output .haxagon file path (defaults to the manifest name)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Patterns and levels of one pack, in table order.
#[derive(Debug, Deserialize)]
pub struct PackManifest {
    pub patterns: Vec<Pattern>,
    pub levels: Vec<LevelRecord>,
}

impl PackManifest {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse manifest: {}", path.display()))
    }
}

/// Encode `manifest` and check that the result loads.
pub fn build(manifest: &PackManifest) -> Result<Vec<u8>> {
    let max = MAX_PACK_ENTRIES as usize;
    if manifest.patterns.is_empty() || manifest.patterns.len() > max {
        anyhow::bail!(
            "Pack needs 1 to {max} patterns, manifest has {}",
            manifest.patterns.len()
        );
    }
    if manifest.levels.is_empty() || manifest.levels.len() > max {
        anyhow::bail!(
            "Pack needs 1 to {max} levels, manifest has {}",
            manifest.levels.len()
        );
    }

    let mut data = Vec::new();
    encode_pack(&mut data, &manifest.patterns, &manifest.levels)
        .context("Failed to encode pack")?;

    // The loader enforces every record-level limit
    load_levels(&data, Location::User, ResolutionContext::default())
        .context("Manifest produced an invalid pack")?;
    Ok(data)
}

/// Execute the pack command
pub fn execute(args: PackArgs) -> Result<()> {
    let manifest = PackManifest::load(&args.manifest)?;
    let output = args
        .output
        .unwrap_or_else(|| args.manifest.with_extension(PACK_EXTENSION));

    let data = build(&manifest)?;
    std::fs::write(&output, &data)
        .with_context(|| format!("Failed to write pack: {}", output.display()))?;

    println!(
        "Packed {} patterns and {} levels into {} ({} bytes)",
        manifest.patterns.len(),
        manifest.levels.len(),
        output.display(),
        data.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"
[[patterns]]
name = "Spiral"
sides = 6
walls = [{ distance = 0, height = 16, side = 0 }]

[[levels]]
name = "Hexagon"
difficulty = "Hard"
mode = "Normal"
creator = "Dev"
music = "music/hexagon"
background_1 = [{ r = 0, g = 0, b = 0, a = 255 }]
background_2 = [{ r = 16, g = 16, b = 16, a = 255 }]
foreground = [{ r = 255, g = 255, b = 255, a = 255 }]
speed_wall = 1.5
speed_rotation = 1.0
speed_cursor = 1.0
speed_pulse = 1.0
patterns = [PATTERN]
"#;

    fn manifest(pattern: &str) -> PackManifest {
        toml::from_str(&MANIFEST.replace("PATTERN", pattern)).unwrap()
    }

    #[test]
    fn build_produces_loadable_pack() {
        let manifest = manifest("0");
        assert_eq!(manifest.levels[0].next_index, -1);

        let data = build(&manifest).unwrap();
        let pack = load_levels(&data, Location::Rom, ResolutionContext::default()).unwrap();
        assert_eq!(pack.levels[0].name(), "Hexagon");
        assert_eq!(pack.levels[0].music(), "/music/hexagon");
        assert!((pack.levels[0].style().speed_wall - 1.5).abs() < f32::EPSILON);
    }

    #[test]
    fn build_rejects_unknown_pattern() {
        let err = build(&manifest("1")).unwrap_err();
        assert!(format!("{err:#}").contains("pattern reference 1 out of range"));
    }

    #[test]
    fn execute_writes_next_to_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mine.toml");
        std::fs::write(&path, MANIFEST.replace("PATTERN", "0")).unwrap();

        execute(PackArgs {
            manifest: path,
            output: None,
        })
        .unwrap();
        let data = std::fs::read(dir.path().join("mine.haxagon")).unwrap();
        assert!(data.starts_with(b"HAX1.1"));
    }
}
