//! Daily spin: cooldown check, one spin, ledger update

use lw_ledger::{HistoryEntry, SpinLedger};
use lw_wheel::{Countdown, SegmentCatalog, SpinConfig};

use crate::error::{SimError, SimResult};
use crate::playback::{PlaybackConfig, SpinMode, SpinRun, play_spins};

/// What a daily spin attempt did
#[derive(Debug, Clone, PartialEq)]
pub enum DailyResult {
    /// Player is still cooling down; nothing was recorded
    CoolingDown(Countdown),
    Spun { run: SpinRun, entry: HistoryEntry },
}

/// Spin once for `player` at `now_ms` if the ledger allows it.
///
/// Expired cooldowns are swept first and the player becomes the active
/// selection either way.
pub fn daily_spin(
    ledger: &SpinLedger,
    catalog: SegmentCatalog,
    spin: SpinConfig,
    player: &str,
    now_ms: i64,
    seed: Option<u64>,
) -> SimResult<DailyResult> {
    ledger.clear_expired(now_ms);
    let player = ledger.select_player(player)?;

    if let Some(countdown) = ledger.countdown(player.as_str(), now_ms)? {
        log::info!("{} is cooling down for {}", player, countdown);
        return Ok(DailyResult::CoolingDown(countdown));
    }

    let playback = PlaybackConfig {
        count: 1,
        seed,
        mode: SpinMode::Weighted,
        sample_every: 0,
        ..Default::default()
    };
    let run = play_spins(catalog, spin, &playback)?
        .into_iter()
        .next()
        .ok_or_else(|| SimError::Playback("no spin was played".into()))?;

    let entry = ledger.record_outcome(player.as_str(), &run.outcome, now_ms)?;
    Ok(DailyResult::Spun { run, entry })
}
