//! Lucky Wheel simulator
//!
//! Usage:
//!   lw-sim distribution --draws 1000000 --seed 42   - Weighted draw statistics
//!   lw-sim spin --count 3 --force-label ZONK        - Play spins on a simulated clock
//!   lw-sim targets --rotation 5740                  - Landing table per segment
//!   lw-sim config --yaml                            - Print the default wheel document
//!   lw-sim daily G109 --ledger ledger.json          - Cooldown-gated spin for one player

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};

use lw_ledger::SpinLedger;
use lw_sim::{
    DailyResult, DistributionConfig, PlaybackConfig, SpinMode, daily_spin, format_table,
    jitter_limit, play_spins, simulate_distribution, target_table,
};
use lw_wheel::angle::normalize360;
use lw_wheel::{SpinConfig, SpinProfile, WheelConfig, epoch_ms};

#[derive(Parser)]
#[command(name = "lw-sim", about = "Lucky Wheel simulator", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Batch weighted draws: expected vs observed per segment
    Distribution {
        /// Number of draws
        #[arg(short, long, default_value_t = 1_000_000)]
        draws: u64,
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
        /// Wheel document (JSON or YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Worker threads (default: one per CPU)
        #[arg(short, long)]
        threads: Option<usize>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run full controller spins on a simulated clock
    Spin {
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
        /// RNG seed (default: OS entropy)
        #[arg(short, long)]
        seed: Option<u64>,
        /// Land on this segment index
        #[arg(long, conflicts_with = "force_label")]
        force: Option<usize>,
        /// Land on the segment with this label (case-insensitive)
        #[arg(long)]
        force_label: Option<String>,
        /// Simulated frame interval
        #[arg(long, default_value_t = 16)]
        frame_ms: u64,
        /// Override the profile's extra full turns
        #[arg(long)]
        turns: Option<u32>,
        /// Override the profile's spin duration
        #[arg(long)]
        duration_ms: Option<u64>,
        /// Print a progress line every n frames (0 = outcomes only)
        #[arg(long, default_value_t = 60)]
        sample_every: usize,
        #[arg(short, long, value_enum)]
        profile: Option<Profile>,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Where each segment lands from a given rotation
    Targets {
        /// Current cumulative rotation in degrees
        #[arg(short, long, default_value_t = 0.0, allow_hyphen_values = true)]
        rotation: f64,
        #[arg(short, long, value_enum)]
        profile: Option<Profile>,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print the default wheel document
    Config {
        /// YAML instead of JSON
        #[arg(long)]
        yaml: bool,
    },
    /// Spin once for a player unless their cooldown is still running
    Daily {
        /// Player id from the roster
        player: String,
        /// Ledger snapshot (JSON), created on first use
        #[arg(short, long, default_value = "lw-ledger.json")]
        ledger: PathBuf,
        #[arg(short, long)]
        seed: Option<u64>,
        #[arg(short, long, value_enum)]
        profile: Option<Profile>,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Profile {
    Dramatic,
    Quick,
    Studio,
}

impl From<Profile> for SpinProfile {
    fn from(p: Profile) -> Self {
        match p {
            Profile::Dramatic => SpinProfile::Dramatic,
            Profile::Quick => SpinProfile::Quick,
            Profile::Studio => SpinProfile::Studio,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Distribution {
            draws,
            seed,
            config,
            threads,
            json,
        } => run_distribution(draws, seed, config.as_deref(), threads, json),
        Commands::Spin {
            count,
            seed,
            force,
            force_label,
            frame_ms,
            turns,
            duration_ms,
            sample_every,
            profile,
            config,
            json,
        } => {
            let wheel = load_wheel(config.as_deref())?;
            let catalog = wheel.catalog()?;
            let mode = match (force, force_label) {
                (Some(index), _) => SpinMode::Forced(index),
                (None, Some(label)) => match catalog.find_by_label(&label) {
                    Some(index) => SpinMode::Forced(index),
                    None => bail!("No segment labelled '{}'", label),
                },
                (None, None) => SpinMode::Weighted,
            };
            let playback = PlaybackConfig {
                count,
                seed,
                mode,
                frame_ms,
                sample_every,
            };
            let mut spin = spin_config(&wheel, profile);
            if let Some(turns) = turns {
                spin = spin.with_extra_full_turns(turns);
            }
            if let Some(duration_ms) = duration_ms {
                spin = spin.with_duration_ms(duration_ms);
            }
            run_spins(wheel, spin, &playback, json)
        }
        Commands::Targets {
            rotation,
            profile,
            config,
        } => run_targets(rotation, profile, config.as_deref()),
        Commands::Config { yaml } => {
            let wheel = WheelConfig::lucky_spin();
            let text = if yaml { wheel.to_yaml()? } else { wheel.to_json()? };
            println!("{text}");
            Ok(())
        }
        Commands::Daily {
            player,
            ledger,
            seed,
            profile,
            config,
        } => run_daily(&player, &ledger, seed, profile, config.as_deref()),
    }
}

fn load_wheel(path: Option<&Path>) -> Result<WheelConfig> {
    let Some(path) = path else {
        return Ok(WheelConfig::lucky_spin());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
    let wheel = WheelConfig::from_str_with_extension(&text, extension)
        .with_context(|| format!("Invalid wheel document {}", path.display()))?;
    log::info!(
        "Loaded {} segments from {}",
        wheel.segments.len(),
        path.display()
    );
    Ok(wheel)
}

fn spin_config(wheel: &WheelConfig, profile: Option<Profile>) -> SpinConfig {
    match profile {
        Some(p) => SpinConfig::from_profile(p.into()),
        None => wheel.spin.clone(),
    }
}

fn run_distribution(
    draws: u64,
    seed: u64,
    config: Option<&Path>,
    threads: Option<usize>,
    json: bool,
) -> Result<()> {
    let wheel = load_wheel(config)?;
    let catalog = wheel.catalog()?;
    let mut sim = DistributionConfig::new(draws, seed);
    sim.threads = threads;

    let report = simulate_distribution(&catalog, &sim).context("Simulation failed")?;
    if json {
        println!("{}", report.to_json());
    } else {
        print!("{}", report.to_text());
    }
    Ok(())
}

fn run_spins(
    wheel: WheelConfig,
    spin: SpinConfig,
    playback: &PlaybackConfig,
    json: bool,
) -> Result<()> {
    let runs = play_spins(wheel.catalog()?, spin, playback).context("Spin playback failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&runs)?);
        return Ok(());
    }

    for (i, run) in runs.iter().enumerate() {
        println!(
            "Spin {} (token {}): {:.2}° → {:.2}° over {} ms{}",
            i + 1,
            run.ticket.token,
            run.ticket.start_rotation,
            run.ticket.final_rotation,
            run.ticket.duration_ms,
            if run.ticket.forced { " [forced]" } else { "" }
        );
        for sample in &run.samples {
            println!(
                "  t={:>6} ms  {:>5.1}%  rot {:>10.2}°  v {:>8.1}°/s",
                sample.elapsed_ms,
                sample.eased_fraction * 100.0,
                sample.rotation,
                sample.angular_velocity
            );
        }
        println!(
            "  → '{}' (id {}) at {:.2}° [{:.2}° on the dial], {} frames{}",
            run.outcome.segment.label,
            run.outcome.segment.id,
            run.outcome.final_rotation,
            normalize360(run.outcome.final_rotation),
            run.frames,
            if run.outcome.is_failure() { ", no prize" } else { "" }
        );
    }
    Ok(())
}

fn run_targets(rotation: f64, profile: Option<Profile>, config: Option<&Path>) -> Result<()> {
    let wheel = load_wheel(config)?;
    let catalog = wheel.catalog()?;
    let spin = spin_config(&wheel, profile);
    let rows = target_table(&catalog, &spin, rotation)?;
    print!("{}", format_table(&rows, rotation, jitter_limit(&catalog, &spin)));
    Ok(())
}

fn run_daily(
    player: &str,
    ledger_path: &Path,
    seed: Option<u64>,
    profile: Option<Profile>,
    config: Option<&Path>,
) -> Result<()> {
    let wheel = load_wheel(config)?;
    let ledger = SpinLedger::from_config(&wheel);
    if ledger_path.exists() {
        let text = fs::read_to_string(ledger_path)
            .with_context(|| format!("Failed to read {}", ledger_path.display()))?;
        ledger
            .restore_json(&text)
            .with_context(|| format!("Invalid ledger {}", ledger_path.display()))?;
    }

    let spin = spin_config(&wheel, profile);
    match daily_spin(&ledger, wheel.catalog()?, spin, player, epoch_ms(), seed)? {
        DailyResult::CoolingDown(countdown) => {
            println!("{player} already spun, next spin in {countdown}");
        }
        DailyResult::Spun { run, entry } => {
            println!(
                "{player} → '{}' (id {}) at {:.2}°{}",
                entry.label,
                entry.segment_id,
                run.outcome.final_rotation,
                if entry.is_failure { ", no prize" } else { "" }
            );
        }
    }

    fs::write(ledger_path, ledger.to_json()?)
        .with_context(|| format!("Failed to write {}", ledger_path.display()))?;

    let history = ledger.history(player)?;
    println!("Last {} spins for {player}:", history.len());
    for entry in history {
        println!(
            "  {:<18} id {:>2}{}",
            entry.label,
            entry.segment_id,
            if entry.forced { " [forced]" } else { "" }
        );
    }
    Ok(())
}
