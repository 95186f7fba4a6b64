//! Inspect command - parse a level pack and list its contents

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use haxagon_shared::fs::{MAX_PACK_BYTES, read_file_with_limit};
use haxagon_shared::{LevelPack, Location, ResolutionContext, load_levels};

/// Arguments for the inspect command
#[derive(Args)]
pub struct InspectArgs {
    /// Level pack (.haxagon)
    pub file: PathBuf,

    /// Also list every wall of every pattern
    #[arg(long)]
    pub walls: bool,
}

/// Execute the inspect command
pub fn execute(args: InspectArgs) -> Result<()> {
    let data = read_file_with_limit(&args.file, MAX_PACK_BYTES)?;
    let pack = load_levels(&data, Location::User, ResolutionContext::default())
        .with_context(|| format!("Failed to load level pack: {}", args.file.display()))?;

    println!("{}", args.file.display());
    print!("{}", describe(&pack, args.walls));
    Ok(())
}

/// Human-readable listing of a loaded pack.
pub fn describe(pack: &LevelPack, walls: bool) -> String {
    let mut out = String::new();

    out.push_str(&format!("Patterns ({}):\n", pack.patterns.len()));
    for (index, pattern) in pack.patterns.iter().enumerate() {
        out.push_str(&format!(
            "  [{index:3}] {:<24} sides={} walls={}\n",
            pattern.name,
            pattern.sides,
            pattern.walls.len()
        ));
        if walls {
            for wall in &pattern.walls {
                out.push_str(&format!(
                    "        distance={} height={} side={}\n",
                    wall.distance, wall.height, wall.side
                ));
            }
        }
    }

    out.push_str(&format!("Levels ({}):\n", pack.levels.len()));
    for level in &pack.levels {
        let next = level
            .next_index()
            .map_or_else(|| "-".to_string(), |next| next.to_string());
        let patterns: Vec<_> = level.patterns().iter().map(|p| p.name.as_str()).collect();
        out.push_str(&format!(
            "  [{:3}] {}\n        music={} next={} patterns=[{}]\n",
            level.index(),
            level.key(),
            level.music(),
            next,
            patterns.join(", ")
        ));
    }
    out
}
