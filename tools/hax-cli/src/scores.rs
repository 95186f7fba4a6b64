//! Scores command - decode a score database blob

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use haxagon_shared::formats::{
    DEFAULT_SCORE_CAPACITY, ScoreBlob, ScoreDbContents, ScoreDecodeOutcome, ScoreRecord,
    decode_scores, parse_scores,
};
use haxagon_shared::fs::{MAX_PACK_BYTES, read_file_with_limit};
use haxagon_shared::{LevelCollection, Location, load_levels};

/// Arguments for the scores command
#[derive(Args)]
pub struct ScoresArgs {
    /// Score database blob (e.g. saves/scores.db)
    pub blob: PathBuf,

    /// Level packs to match the records against, in load order
    #[arg(short, long)]
    pub pack: Vec<PathBuf>,

    /// Blob capacity in bytes
    #[arg(long, default_value_t = DEFAULT_SCORE_CAPACITY)]
    pub capacity: usize,
}

/// Execute the scores command
pub fn execute(args: ScoresArgs) -> Result<()> {
    let bytes = read_file_with_limit(&args.blob, args.capacity as u64)?;
    let blob = ScoreBlob::from_bytes(bytes, args.capacity);

    println!("{}", args.blob.display());
    print!("{}", describe(&parse_scores(blob.as_bytes())));

    if args.pack.is_empty() {
        return Ok(());
    }

    let mut levels = LevelCollection::new();
    for path in &args.pack {
        let data = read_file_with_limit(path, MAX_PACK_BYTES)?;
        let pack = load_levels(&data, Location::User, levels.context())
            .with_context(|| format!("Failed to load level pack: {}", path.display()))?;
        tracing::debug!(path = %path.display(), levels = pack.levels.len(), "loaded pack");
        levels.append(pack.levels);
    }

    let outcome = decode_scores(blob.as_bytes(), &mut levels);
    println!("{}", summarize(&outcome));
    for level in &levels {
        println!("  [{:3}] {}  best={}", level.index(), level.key(), level.high_score());
    }
    Ok(())
}

fn list(out: &mut String, records: &[ScoreRecord]) {
    for record in records {
        out.push_str(&format!("  {:>8}  {}\n", record.score, record.key));
    }
}

/// Human-readable listing of a parsed blob.
pub fn describe(contents: &ScoreDbContents) -> String {
    let mut out = String::new();
    match contents {
        ScoreDbContents::Missing => out.push_str("No score database (header missing)\n"),
        ScoreDbContents::Intact(records) => {
            out.push_str(&format!("Records ({}):\n", records.len()));
            list(&mut out, records);
        }
        ScoreDbContents::Damaged { salvaged, error } => {
            out.push_str(&format!("Damaged: {error}\n"));
            out.push_str(&format!("Salvaged records ({}):\n", salvaged.len()));
            list(&mut out, salvaged);
        }
    }
    out
}

fn summarize(outcome: &ScoreDecodeOutcome) -> String {
    match outcome {
        ScoreDecodeOutcome::Absent => "Score database absent".to_string(),
        ScoreDecodeOutcome::HeaderInvalid => "Score header invalid, nothing applied".to_string(),
        ScoreDecodeOutcome::Applied { records, matched } => {
            format!("Applied {matched} of {records} records")
        }
        ScoreDecodeOutcome::Corrupt {
            records,
            matched,
            error,
        } => format!("Applied {matched} of {records} readable records before damage: {error}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pack::{PackManifest, build};
    use haxagon_shared::ResolutionContext;
    use haxagon_shared::formats::encode_scores;

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
patterns = [0]
"#;

    fn pack_data() -> Vec<u8> {
        let manifest: PackManifest = toml::from_str(MANIFEST).unwrap();
        build(&manifest).unwrap()
    }

    fn scored_blob(score: i32) -> ScoreBlob {
        let mut levels = LevelCollection::new();
        let pack = load_levels(&pack_data(), Location::Rom, ResolutionContext::default()).unwrap();
        levels.append(pack.levels);
        levels.get_mut(0).unwrap().set_high_score(score);
        let (blob, report) = encode_scores(&levels, DEFAULT_SCORE_CAPACITY).unwrap();
        assert_eq!(report.written, 1);
        blob
    }

    #[test]
    fn describe_lists_records() {
        let blob = scored_blob(1234);
        let text = describe(&parse_scores(blob.as_bytes()));
        assert!(text.contains("Records (1):"));
        assert!(text.contains("1234  Hexagon [Hard / Normal] by Dev"));
    }

    #[test]
    fn describe_reports_missing_header() {
        let text = describe(&parse_scores(&[0u8; DEFAULT_SCORE_CAPACITY]));
        assert!(text.contains("header missing"));
    }

    #[test]
    fn execute_matches_against_packs() {
        let dir = tempfile::tempdir().unwrap();
        let blob_path = dir.path().join("scores.db");
        let pack_path = dir.path().join("mine.haxagon");
        std::fs::write(&blob_path, scored_blob(99).as_bytes()).unwrap();
        std::fs::write(&pack_path, pack_data()).unwrap();

        execute(ScoresArgs {
            blob: blob_path,
            pack: vec![pack_path],
            capacity: DEFAULT_SCORE_CAPACITY,
        })
        .unwrap();
    }

    #[test]
    fn summarize_counts_matches() {
        let text = summarize(&ScoreDecodeOutcome::Applied {
            records: 3,
            matched: 2,
        });
        assert_eq!(text, "Applied 2 of 3 records");
    }
}
