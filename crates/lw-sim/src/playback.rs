//! Spin playback on a simulated clock
//!
//! Runs real controller spins frame by frame so the eased motion and the
//! outcome can be inspected without a renderer.

use serde::{Deserialize, Serialize};

use lw_wheel::{
    ChaChaSource, ManualClock, RngSource, SegmentCatalog, SpinConfig, SpinController, SpinOutcome,
    SpinProgress, SpinTick, SpinTicket,
};

use crate::error::{SimError, SimResult};

/// How spins are chosen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpinMode {
    Weighted,
    /// Always land on this index
    Forced(usize),
}

/// Playback parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    pub count: usize,
    pub seed: Option<u64>,
    pub mode: SpinMode,
    /// Simulated frame interval
    pub frame_ms: u64,
    /// Keep every n-th frame in the recorded samples (0 = none)
    pub sample_every: usize,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            count: 1,
            seed: None,
            mode: SpinMode::Weighted,
            frame_ms: 16,
            sample_every: 60,
        }
    }
}

/// One played spin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinRun {
    pub ticket: SpinTicket,
    pub frames: usize,
    pub samples: Vec<SpinProgress>,
    pub outcome: SpinOutcome,
}

/// Play `config.count` sequential spins on one wheel
pub fn play_spins(
    catalog: SegmentCatalog,
    spin: SpinConfig,
    config: &PlaybackConfig,
) -> SimResult<Vec<SpinRun>> {
    if config.frame_ms == 0 {
        return Err(SimError::InvalidArgument("frame interval must be positive".into()));
    }

    let clock = ManualClock::new();
    let mut controller: SpinController<ChaChaSource, ManualClock> = SpinController::new(
        catalog,
        spin,
        RngSource::from_seed_opt(config.seed),
        clock.clone(),
    )?;

    let mut runs = Vec::with_capacity(config.count);
    for _ in 0..config.count {
        let ticket = match config.mode {
            SpinMode::Weighted => controller.request_spin()?,
            SpinMode::Forced(index) => controller.request_spin_forced(index)?,
        };
        runs.push(play_one(&mut controller, &clock, ticket, config)?);
    }
    Ok(runs)
}

fn play_one(
    controller: &mut SpinController<ChaChaSource, ManualClock>,
    clock: &ManualClock,
    ticket: SpinTicket,
    config: &PlaybackConfig,
) -> SimResult<SpinRun> {
    let mut frames = 0usize;
    let mut samples = Vec::new();

    loop {
        clock.advance(config.frame_ms);
        frames += 1;

        match controller.tick() {
            SpinTick::Animating(progress) => {
                if config.sample_every > 0 && frames % config.sample_every == 0 {
                    samples.push(progress);
                }
            }
            SpinTick::Completed(outcome) => {
                return Ok(SpinRun {
                    ticket,
                    frames,
                    samples,
                    outcome,
                });
            }
            SpinTick::Idle => {
                return Err(SimError::Playback(format!(
                    "spin {} went idle without an outcome",
                    ticket.token
                )));
            }
        }
    }
}
