//! Scheduler crate for the recommendation service.
//!
//! This crate contains the periodic run loop that fires train and recommend
//! cycles of a recommendation pipeline, together with its configuration and
//! the wall-clock alignment of the first tick.

pub mod cycles;
pub mod error;
pub mod options;
pub mod periodic;
pub mod time_aligner;

pub use cycles::Cycles;
pub use error::{ConfigError, CycleError, CycleKind};
pub use options::{SchedulerConfig, SchedulerOptions};
pub use periodic::{CycleStats, PeriodicScheduler, shutdown_channel};
pub use time_aligner::{Clock, LocalClock, delay_until, next_run};
