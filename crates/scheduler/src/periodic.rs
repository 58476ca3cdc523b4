//! # Periodic Scheduler
//!
//! Owns the run loop that fires train and recommend cycles:
//! 1. Optionally wait until the configured local time of day
//! 2. Start two fixed-interval triggers, each counting down from that moment
//! 3. Dispatch whichever trigger is due, one cycle at a time
//! 4. Contain cycle failures and keep going until shutdown is requested
//!
//! Both triggers are polled from a single `tokio::select!`, so a long train
//! cycle delays the next recommend tick instead of overlapping with it.
//! Shutdown is observed while aligning and between cycles, never mid-cycle.

use std::time::Instant as StdInstant;

use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{error, info};

use crate::cycles::Cycles;
use crate::error::{CycleError, CycleKind};
use crate::options::SchedulerOptions;
use crate::time_aligner::{Clock, LocalClock, delay_until, next_run};

/// Run and failure counters, returned when the loop stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleStats {
    pub train_runs: u64,
    pub train_failures: u64,
    pub recommend_runs: u64,
    pub recommend_failures: u64,
}

/// Create the channel used to stop a running scheduler.
///
/// Send `true` to request shutdown.
pub fn shutdown_channel() -> (watch::Sender<bool>, watch::Receiver<bool>) {
    watch::channel(false)
}

/// Fires train and recommend cycles at independent fixed intervals.
pub struct PeriodicScheduler<C> {
    cycles: C,
    options: SchedulerOptions,
    clock: Box<dyn Clock>,
    stats: CycleStats,
}

impl<C: Cycles> PeriodicScheduler<C> {
    /// Create a scheduler reading the local system clock for alignment.
    pub fn new(cycles: C, options: SchedulerOptions) -> Self {
        Self {
            cycles,
            options,
            clock: Box::new(LocalClock),
            stats: CycleStats::default(),
        }
    }

    /// Replace the wall clock used to compute the alignment delay.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn stats(&self) -> CycleStats {
        self.stats
    }

    /// Run until `true` is sent on `shutdown`.
    ///
    /// Dropping the sender without sending `true` leaves the loop running.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) -> CycleStats {
        let training_period = self.options.training_period();
        let recommending_period = self.options.recommending_period();

        if let Some(time_of_day) = self.options.first_run_time_of_day() {
            let now = self.clock.now();
            let target = next_run(time_of_day, now);
            let delay = delay_until(target, now);
            info!(
                "Aligning first run to {} (waiting {:.0?})",
                target, delay
            );

            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = shutdown_requested(&mut shutdown) => {
                    info!("Scheduler shut down while aligning");
                    return self.stats;
                }
            }
        }

        info!(
            "Starting scheduler loop (training every {:?}, recommending every {:?})",
            training_period, recommending_period
        );

        let start = Instant::now();
        let mut train_interval = interval_at(start + training_period, training_period);
        train_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut recommend_interval = interval_at(start + recommending_period, recommending_period);
        recommend_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            // Polled in order: when both triggers are due, training runs
            // before recommending.
            tokio::select! {
                biased;
                _ = shutdown_requested(&mut shutdown) => {
                    info!("Scheduler shutting down");
                    break;
                }
                _ = train_interval.tick() => {
                    self.run_train();
                }
                _ = recommend_interval.tick() => {
                    self.run_recommend();
                }
            }
        }

        self.stats
    }

    fn run_train(&mut self) {
        let start = StdInstant::now();
        self.stats.train_runs += 1;

        match self.cycles.train() {
            Ok(()) => info!("Train cycle finished in {:.2?}", start.elapsed()),
            Err(source) => {
                self.stats.train_failures += 1;
                report(CycleError::new(CycleKind::Train, source));
            }
        }
    }

    fn run_recommend(&mut self) {
        let start = StdInstant::now();
        self.stats.recommend_runs += 1;

        match self.cycles.recommend() {
            Ok(delivered) => info!(
                "Recommend cycle delivered {} records in {:.2?}",
                delivered,
                start.elapsed()
            ),
            Err(source) => {
                self.stats.recommend_failures += 1;
                report(CycleError::new(CycleKind::Recommend, source));
            }
        }
    }
}

fn report(err: CycleError) {
    error!(
        cycle = %err.kind,
        "{}: {:#}; waiting for next tick",
        err, err.source
    );
}

/// Resolves once `true` has been sent; pends forever if the sender is gone.
async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow_and_update() {
            return;
        }
        if shutdown.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
