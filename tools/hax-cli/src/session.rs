//! Load and record commands - drive the game state machine headlessly

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use haxagon_core::state::load_game;
use haxagon_core::{
    Config, DesktopPlatform, Game, GameState, LoadSummary, Menu, Over, Runner, config,
};

/// Arguments for the load command
#[derive(Args)]
pub struct LoadArgs {
    /// Config file (defaults to the platform config directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Arguments for the record command
#[derive(Args)]
pub struct RecordArgs {
    /// Index of the level the session was started from
    #[arg(short, long)]
    pub level: usize,

    /// Frames survived
    #[arg(short, long)]
    pub score: f32,

    /// Config file (defaults to the platform config directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    let config = match path {
        Some(path) => config::load_from(path)?,
        None => config::load(),
    };
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Run the load sequence and position the runner at the menu.
fn start(config: Config) -> Result<(Runner<DesktopPlatform>, LoadSummary)> {
    let platform = DesktopPlatform::new(&config);
    let mut runner = Runner::new(Game::new(platform, config));
    let summary = load_game(runner.game_mut()).context("Load failed")?;
    runner.transition(GameState::Menu(Menu::new(0)));
    Ok((runner, summary))
}

fn print_levels(runner: &Runner<DesktopPlatform>) {
    for level in runner.game().levels() {
        println!(
            "  [{:3}] {:<5} {}  best={}",
            level.index(),
            level.location(),
            level.key(),
            level.high_score()
        );
    }
}

/// Execute the load command
pub fn load(args: LoadArgs) -> Result<()> {
    let config = load_config(args.config.as_ref())?;
    let (runner, summary) = start(config)?;

    println!(
        "Loaded {} levels from {} sources ({} rejected)",
        summary.levels, summary.sources_loaded, summary.sources_failed
    );
    println!("Scores: {:?}", summary.scores);
    print_levels(&runner);
    Ok(())
}

/// Execute the record command
pub fn record(args: RecordArgs) -> Result<()> {
    let config = load_config(args.config.as_ref())?;
    let (mut runner, _) = start(config)?;

    let count = runner.game().levels().len();
    if args.level >= count {
        anyhow::bail!("Level {} out of range ({} levels loaded)", args.level, count);
    }

    runner.transition(GameState::Over(Over::new(args.level, args.level, args.score)));
    let GameState::Over(over) = runner.state() else {
        anyhow::bail!("Over state was not entered");
    };

    let best = runner
        .game()
        .levels()
        .get(args.level)
        .map_or(0, |level| level.high_score());
    if over.is_high_score() {
        println!("New record: {best}");
    } else {
        println!("Best remains {best}");
    }
    match over.committed() {
        Some(report) => println!(
            "Saved {} scores ({} bytes, {} dropped)",
            report.written, report.bytes_used, report.dropped
        ),
        None => anyhow::bail!("Score database was not saved"),
    }
    Ok(())
}
