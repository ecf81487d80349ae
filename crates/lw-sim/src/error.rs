//! Simulator errors

use lw_ledger::LedgerError;
use lw_wheel::WheelError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error(transparent)]
    Wheel(#[from] WheelError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Playback error: {0}")]
    Playback(String),

    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type SimResult<T> = Result<T, SimError>;
