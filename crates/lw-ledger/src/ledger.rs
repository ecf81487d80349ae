//! Spin Ledger: per-player cooldown and history records
//!
//! The wheel engine never looks at any of this. A host checks
//! [`SpinLedger::is_eligible`] before requesting a spin and calls
//! [`SpinLedger::record_outcome`] when the controller reports one.
//!
//! One ledger can be shared across threads; every method takes `&self`.

use std::collections::{BTreeMap, HashMap};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use lw_wheel::{Countdown, EligibilityGate, SpinOutcome, WheelConfig};

use crate::error::LedgerResult;
use crate::history::{DEFAULT_HISTORY_LEN, HistoryEntry, SpinHistory};
use crate::roster::{PlayerId, Roster};

// ═══════════════════════════════════════════════════════════════════════════════
// RECORDS
// ═══════════════════════════════════════════════════════════════════════════════

/// Everything the ledger knows about one player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// Epoch ms of the last recorded spin; cleared once the cooldown expires
    pub last_spin_ms: Option<i64>,
    pub history: SpinHistory,
    pub total_spins: u64,
}

impl PlayerRecord {
    fn new(history_len: usize) -> Self {
        Self {
            last_spin_ms: None,
            history: SpinHistory::with_capacity(history_len),
            total_spins: 0,
        }
    }
}

/// Serializable ledger state
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    #[serde(default)]
    pub active: Option<PlayerId>,
    #[serde(default)]
    pub players: BTreeMap<PlayerId, PlayerRecord>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// LEDGER
// ═══════════════════════════════════════════════════════════════════════════════

pub struct SpinLedger {
    gate: EligibilityGate,
    history_len: usize,
    roster: RwLock<Roster>,
    records: RwLock<HashMap<PlayerId, PlayerRecord>>,
}

impl SpinLedger {
    pub fn new(roster: Roster, gate: EligibilityGate) -> Self {
        Self {
            gate,
            history_len: DEFAULT_HISTORY_LEN,
            roster: RwLock::new(roster),
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Default roster with the cooldown from a wheel document
    pub fn from_config(config: &WheelConfig) -> Self {
        Self::new(Roster::default(), config.gate())
    }

    /// Entries kept per player for records created from now on
    pub fn with_history_len(mut self, history_len: usize) -> Self {
        self.history_len = history_len.max(1);
        self
    }

    pub fn gate(&self) -> EligibilityGate {
        self.gate
    }

    fn resolve(&self, id: &str) -> LedgerResult<PlayerId> {
        self.roster.read().lookup(id).cloned()
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // ROSTER
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn players(&self) -> Vec<PlayerId> {
        self.roster.read().players().to_vec()
    }

    pub fn active_player(&self) -> Option<PlayerId> {
        self.roster.read().active().cloned()
    }

    pub fn select_player(&self, id: &str) -> LedgerResult<PlayerId> {
        let player = self.roster.write().select(id)?.clone();
        log::debug!("Player {} selected", player);
        Ok(player)
    }

    pub fn clear_player(&self) -> Option<PlayerId> {
        let cleared = self.roster.write().clear();
        if let Some(player) = &cleared {
            log::debug!("Player {} cleared", player);
        }
        cleared
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // ELIGIBILITY
    // ═══════════════════════════════════════════════════════════════════════════

    /// Last recorded spin, `None` if never spun or the cooldown was swept
    pub fn last_spin(&self, id: &str) -> LedgerResult<Option<i64>> {
        let player = self.resolve(id)?;
        Ok(self
            .records
            .read()
            .get(&player)
            .and_then(|r| r.last_spin_ms))
    }

    pub fn is_eligible(&self, id: &str, now_ms: i64) -> LedgerResult<bool> {
        let last = self.last_spin(id)?;
        Ok(self.gate.is_eligible(last, now_ms))
    }

    pub fn remaining_ms(&self, id: &str, now_ms: i64) -> LedgerResult<u64> {
        let last = self.last_spin(id)?;
        Ok(self.gate.remaining_ms(last, now_ms))
    }

    /// Time left before the next spin, `None` when eligible
    pub fn countdown(&self, id: &str, now_ms: i64) -> LedgerResult<Option<Countdown>> {
        let last = self.last_spin(id)?;
        Ok(self.gate.countdown(last, now_ms))
    }

    /// Forget last-spin times whose cooldown has elapsed; returns affected players
    pub fn clear_expired(&self, now_ms: i64) -> Vec<PlayerId> {
        let mut records = self.records.write();
        let mut expired = Vec::new();
        for (player, record) in records.iter_mut() {
            if record.last_spin_ms.is_some() && self.gate.is_eligible(record.last_spin_ms, now_ms) {
                record.last_spin_ms = None;
                log::debug!("Cooldown expired for {}", player);
                expired.push(player.clone());
            }
        }
        expired.sort();
        expired
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // RECORDING
    // ═══════════════════════════════════════════════════════════════════════════

    /// Store a completed spin for `id` at `now_ms`
    pub fn record_outcome(
        &self,
        id: &str,
        outcome: &SpinOutcome,
        now_ms: i64,
    ) -> LedgerResult<HistoryEntry> {
        let player = self.resolve(id)?;
        let entry = HistoryEntry::from_outcome(outcome, now_ms);

        let mut records = self.records.write();
        let record = records
            .entry(player.clone())
            .or_insert_with(|| PlayerRecord::new(self.history_len));
        record.last_spin_ms = Some(now_ms);
        record.total_spins += 1;
        record.history.push(entry.clone());

        log::debug!(
            "Recorded '{}' for {} (spin #{})",
            entry.label,
            player,
            record.total_spins
        );
        Ok(entry)
    }

    /// Newest first
    pub fn history(&self, id: &str) -> LedgerResult<Vec<HistoryEntry>> {
        let player = self.resolve(id)?;
        Ok(self
            .records
            .read()
            .get(&player)
            .map(|r| r.history.to_vec())
            .unwrap_or_default())
    }

    pub fn record(&self, id: &str) -> LedgerResult<Option<PlayerRecord>> {
        let player = self.resolve(id)?;
        Ok(self.records.read().get(&player).cloned())
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SNAPSHOT
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            active: self.active_player(),
            players: self
                .records
                .read()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }

    pub fn to_json(&self) -> LedgerResult<String> {
        Ok(serde_json::to_string_pretty(&self.snapshot())?)
    }

    /// Replace all records and the active player.
    ///
    /// Fails without touching state if the snapshot names a player outside
    /// the roster.
    pub fn restore(&self, snapshot: LedgerSnapshot) -> LedgerResult<()> {
        {
            let roster = self.roster.read();
            for player in snapshot.players.keys().chain(snapshot.active.iter()) {
                roster.lookup(player.as_str())?;
            }
        }

        *self.records.write() = snapshot.players.into_iter().collect();

        let mut roster = self.roster.write();
        match &snapshot.active {
            Some(player) => {
                roster.select(player.as_str())?;
            }
            None => {
                roster.clear();
            }
        }
        Ok(())
    }

    pub fn restore_json(&self, json: &str) -> LedgerResult<()> {
        let snapshot: LedgerSnapshot = serde_json::from_str(json)?;
        self.restore(snapshot)
    }
}

impl Default for SpinLedger {
    fn default() -> Self {
        Self::new(Roster::default(), EligibilityGate::default())
    }
}

impl std::fmt::Debug for SpinLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpinLedger")
            .field("gate", &self.gate)
            .field("history_len", &self.history_len)
            .field("players", &self.records.read().len())
            .finish()
    }
}
