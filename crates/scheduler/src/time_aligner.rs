//! Alignment of the first tick to a wall-clock time of day.
//!
//! Times are local and naive: the scheduler compares the configured time of
//! day against the local clock reading, with no time zone arithmetic.
//!
//! Known limitation: the delay is the naive difference between the two
//! readings, so a daylight-saving transition between now and the target
//! shifts the first tick by the transition's offset. It fires late after a
//! spring-forward and early after a fall-back. Later ticks follow fixed
//! periods and are unaffected.

use std::time::Duration;

use chrono::{Local, NaiveDateTime, NaiveTime, TimeDelta};

/// Source of the current local wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Reads the system's local clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// The next instant at which the local clock reads `time_of_day`.
///
/// Today at `time_of_day` unless `now` is strictly after it, in which case
/// tomorrow at `time_of_day`. `now` exactly at the boundary yields `now`.
pub fn next_run(time_of_day: NaiveTime, now: NaiveDateTime) -> NaiveDateTime {
    let candidate = now.date().and_time(time_of_day);
    if now > candidate {
        candidate + TimeDelta::days(1)
    } else {
        candidate
    }
}

/// How long to wait from `now` until `target`, never negative.
pub fn delay_until(target: NaiveDateTime, now: NaiveDateTime) -> Duration {
    (target - now).to_std().unwrap_or(Duration::ZERO)
}
