//! Player roster
//!
//! A fixed list of player ids plus the currently selected one.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};

/// Player ids shipped with the product wheel
pub const DEFAULT_PLAYERS: &[&str] = &["G109", "G71", "G17", "G70", "M07", "G31"];

/// Opaque player identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Known players and the active selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    players: Vec<PlayerId>,
    active: Option<PlayerId>,
}

impl Roster {
    /// Roster over `players`; duplicates are dropped, order kept
    pub fn new(players: impl IntoIterator<Item = PlayerId>) -> Self {
        let mut unique: Vec<PlayerId> = Vec::new();
        for player in players {
            if !unique.contains(&player) {
                unique.push(player);
            }
        }
        Self {
            players: unique,
            active: None,
        }
    }

    pub fn players(&self) -> &[PlayerId] {
        &self.players
    }

    pub fn contains(&self, id: &str) -> bool {
        self.players.iter().any(|p| p.as_str() == id)
    }

    /// Resolve an id against the roster
    pub fn lookup(&self, id: &str) -> LedgerResult<&PlayerId> {
        self.players
            .iter()
            .find(|p| p.as_str() == id)
            .ok_or_else(|| LedgerError::UnknownPlayer(id.to_string()))
    }

    pub fn active(&self) -> Option<&PlayerId> {
        self.active.as_ref()
    }

    /// Make `id` the active player
    pub fn select(&mut self, id: &str) -> LedgerResult<&PlayerId> {
        let player = self.lookup(id)?.clone();
        Ok(self.active.insert(player))
    }

    /// Log the active player out
    pub fn clear(&mut self) -> Option<PlayerId> {
        self.active.take()
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::new(DEFAULT_PLAYERS.iter().map(|&id| PlayerId::new(id)))
    }
}
