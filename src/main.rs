//! Stackpop — stack-matching puzzle game in the terminal.

mod app;
mod color;
mod game;
mod growth;
mod input;
mod matching;
mod progression;
mod stack;
mod theme;
mod transfer;
mod ui;

use anyhow::{Context, Result};
use app::App;
use clap::{Parser, ValueEnum};
use game::HoldingMode;
use growth::GrowthPolicy;
use matching::ScoringPolicy;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Options derived from CLI that affect game behaviour (speeds, growth and scoring rules, seed).
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub base_speed: f32,
    pub empty_boost: f32,
    pub growth: GrowthPolicy,
    pub holding: HoldingMode,
    pub scoring: ScoringPolicy,
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            base_speed: growth::BASE_SPEED,
            empty_boost: growth::EMPTY_BOOST,
            growth: GrowthPolicy::default(),
            holding: HoldingMode::default(),
            scoring: ScoringPolicy::default(),
            seed: None,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(path) = args.log_file.as_deref() {
        init_tracing(path)?;
    }
    let theme = theme::Theme::load(args.theme.as_deref(), args.palette).unwrap_or_else(|e| {
        warn!(error = %e, "theme file unusable, falling back to One Dark");
        theme::Theme::default()
    });
    let config = GameConfig {
        base_speed: args.speed,
        empty_boost: args.boost,
        growth: args.growth,
        holding: args.holding,
        scoring: args.scoring,
        seed: args.seed,
    };
    let mut app = App::new(args, config, theme);
    app.run()?;
    Ok(())
}

/// Logs go to a file so they don't tear the terminal UI; filter with RUST_LOG.
fn init_tracing(path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating log file {}", path.display()))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

/// Stack-matching puzzle game in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "stackpop",
    version,
    about = "Stack-matching puzzle in the terminal. Columns grow from the ground; shuffle blocks and pop runs of three.",
    long_about = "Stackpop is a terminal puzzle game.\n\n\
        Three columns keep growing from the ground up. Pick blocks off the top of a column \
        into the holding stack and drop them onto another column. Press Space to pop every \
        run of three or more same-coloured blocks. Reach the score goal to level up; \
        each level grows faster. A column reaching the top ends the game.\n\n\
        CONTROLS:\n  s d f       Pick up from column 1 / 2 / 3\n  j k l       Place onto column 1 / 2 / 3\n\
        \x20\x20Space       Pop runs    P  Pause    Q / Esc  Quit    R  Restart (after game over)\n\
        \x20\x20Left/Right  Move cursor Up Pick up  Enter    Place at cursor"
)]
pub struct Args {
    /// Grow speed at level 1, in blocks per second.
    #[arg(long, default_value_t = growth::BASE_SPEED, value_name = "BLOCKS_PER_SEC")]
    pub speed: f32,

    /// Extra growth multiplier for empty columns (they grow at speed × (1 + boost)).
    /// Independent growth only; synchronized columns share one clock.
    #[arg(long, default_value_t = growth::EMPTY_BOOST, value_name = "FACTOR")]
    pub boost: f32,

    /// Growth timing: independent (each column on its own clock) or synchronized (all columns together).
    #[arg(short, long, default_value = "independent")]
    pub growth: GrowthPolicy,

    /// Holding buffer: stack (up to a full column) or single (one block).
    #[arg(long, default_value = "stack")]
    pub holding: HoldingMode,

    /// Scoring: per-block (compounding per popped block) or per-run (one award per run).
    #[arg(long, default_value = "per-block")]
    pub scoring: ScoringPolicy,

    /// Seed for block colours (random if not set).
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Target render frames per second; growth advances by the real elapsed time.
    #[arg(long, default_value = "60.0", value_name = "RATE")]
    pub frame_rate: f64,

    /// Path to theme file (btop-style theme[key]=\"value\"). Uses One Dark if not set.
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<PathBuf>,

    /// Colour palette: normal (theme), high-contrast, or colorblind.
    #[arg(long, default_value = "normal")]
    pub palette: Palette,

    /// Disable the game-over fade.
    #[arg(long)]
    pub no_animation: bool,

    /// Write logs to this file (level via RUST_LOG, e.g. RUST_LOG=debug).
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Palette {
    #[default]
    Normal,

    #[value(alias = "highcontrast", alias = "contrast")]
    HighContrast,

    #[value(alias = "colourblind")]
    Colorblind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args_match_default_config() {
        let args = Args::try_parse_from(["stackpop"]).unwrap();
        let config = GameConfig::default();
        assert_eq!(args.speed, config.base_speed);
        assert_eq!(args.boost, config.empty_boost);
        assert_eq!(args.growth, config.growth);
        assert_eq!(args.holding, config.holding);
        assert_eq!(args.scoring, config.scoring);
        assert_eq!(args.seed, None);
    }

    #[test]
    fn test_parse_policies() {
        let args = Args::try_parse_from([
            "stackpop",
            "--growth",
            "synchronized",
            "--holding",
            "single",
            "--scoring",
            "per-run",
            "--seed",
            "9",
        ])
        .unwrap();
        assert_eq!(args.growth, GrowthPolicy::Synchronized);
        assert_eq!(args.holding, HoldingMode::Single);
        assert_eq!(args.scoring, ScoringPolicy::PerRun);
        assert_eq!(args.seed, Some(9));
    }

    #[test]
    fn test_cli_is_consistent() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
