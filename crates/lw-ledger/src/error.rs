//! Ledger errors

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    /// Player id not in the roster
    #[error("Unknown player: {0}")]
    UnknownPlayer(String),

    /// Snapshot could not be written or read back
    #[error("Snapshot error: {0}")]
    Snapshot(String),
}

impl From<serde_json::Error> for LedgerError {
    fn from(e: serde_json::Error) -> Self {
        LedgerError::Snapshot(e.to_string())
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;
