//! Error types for runtime operations that are not configuration parsing
//! (see [`crate::config::ConfigError`] for that).

use thiserror::Error;

/// Failure modes for [`crate::engine::Engine::insert_task`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InsertError {
    #[error("task id '{0}' already exists in the workload")]
    DuplicateId(String),
    #[error("dynamic task must arrive at the current tick ({current}), got {requested}")]
    ArrivalMismatch { current: u64, requested: u64 },
    #[error("task duration must be at least 1")]
    ZeroDuration,
    #[error("action trigger {trigger} is not strictly less than duration {duration}")]
    ActionTriggerOutOfRange { trigger: u64, duration: u64 },
    #[error("I/O action duration must be at least 1")]
    ZeroIoDuration,
}
