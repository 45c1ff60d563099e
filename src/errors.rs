use thiserror::Error;
use uuid::Uuid;

/// Error type shared by the engine's mutation entry points and configuration layer.
///
/// The projection and allocation functions are total and never produce these;
/// only strict input handling, configuration IO, and the rollover watcher do.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Ticket not found: {0}")]
    TicketNotFound(Uuid),
    #[error("Day {day} is outside the current month (1..={days_in_month})")]
    DayOutOfRange { day: u32, days_in_month: u32 },
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Month watcher requires a running tokio runtime")]
    NoRuntime,
    #[error("Month watcher is not active")]
    WatcherInactive,
    #[error("Month watcher stopped unexpectedly")]
    WatcherStopped,
}

pub type Result<T> = std::result::Result<T, EngineError>;
