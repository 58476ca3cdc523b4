//! Error types for the scheduler crate.

use std::fmt;

use thiserror::Error;

/// Invalid scheduler configuration. Raised before the loop starts.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{field} must be greater than zero, got {value}")]
    NonPositivePeriod { field: &'static str, value: i64 },

    #[error("{field} must not be zero")]
    ZeroPeriod { field: &'static str },

    #[error("{field} of {value}h exceeds the maximum of {max}h")]
    PeriodTooLong {
        field: &'static str,
        value: i64,
        max: i64,
    },

    #[error("invalid time of day '{value}': expected HH:MM")]
    InvalidTimeOfDay {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Which of the two scheduled workflows a tick belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CycleKind {
    Train,
    Recommend,
}

impl fmt::Display for CycleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleKind::Train => write!(f, "train"),
            CycleKind::Recommend => write!(f, "recommend"),
        }
    }
}

/// A collaborator failure caught at the scheduler boundary.
///
/// Only the tick that raised it is aborted.
#[derive(Error, Debug)]
#[error("{kind} cycle failed")]
pub struct CycleError {
    pub kind: CycleKind,
    #[source]
    pub source: anyhow::Error,
}

impl CycleError {
    pub fn new(kind: CycleKind, source: anyhow::Error) -> Self {
        Self { kind, source }
    }
}
