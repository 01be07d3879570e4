//! Error types for sleep-core.

use thiserror::Error;

use crate::types::EntryType;

/// Result type alias using the crate [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Malformed time, date or month input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("invalid time {value:?}, expected HH:MM")]
    InvalidTime { value: String },

    #[error("invalid date {value:?}, expected YYYY-MM-DD")]
    InvalidDate { value: String },

    #[error("invalid month {value:?}, expected YYYY-MM")]
    InvalidMonth { value: String },

    #[error("invalid entry type {value:?}, expected woke-up or fell-asleep")]
    InvalidEntryType { value: String },
}

/// A new entry would break the per-date ordering rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("cannot add two consecutive {entry_type} entries; entries must alternate between wake and sleep")]
    Alternation { entry_type: EntryType },

    #[error("entry time {time} is earlier than the previous entry at {last_time}")]
    OutOfOrder { time: String, last_time: String },
}

/// A settings update carries values outside the accepted ranges.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("requiredSleepMinutes must not be zero")]
    ZeroTarget,

    #[error("requiredSleepMinutes must be between {min} and {max}, got {value}")]
    TargetOutOfRange { value: i32, min: i32, max: i32 },

    #[error(transparent)]
    Time(#[from] FormatError),
}

/// Errors produced by sleep-core operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Settings(#[from] SettingsError),
}
