//! Scheduler driver
//!
//! Computes fire times from the configured cron schedule and launches one
//! tick per fire, with a random commit count in [1, 8]. Ticks never overlap:
//! a fire that arrives while the previous tick is still running is skipped,
//! and fire times that passed while a tick overran are dropped because the
//! next one is always computed from the current time.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use cron::Schedule;
use rand::Rng;
use tracing::{error, info, warn};

use crate::publisher::Publisher;
use crate::service::{ContentSource, GitData};

/// Most commits one tick may publish
pub const MAX_COMMITS_PER_TICK: u32 = 8;

/// Drives the publisher from a cron schedule
pub struct Scheduler<H, C> {
    schedule: Schedule,
    publisher: Arc<Publisher<H, C>>,
    tick_running: Arc<AtomicBool>,
}

impl<H, C> Scheduler<H, C>
where
    H: GitData + 'static,
    C: ContentSource + 'static,
{
    pub fn new(schedule: Schedule, publisher: Publisher<H, C>) -> Self {
        Self {
            schedule,
            publisher: Arc::new(publisher),
            tick_running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Run until the schedule yields no further fire times
    pub async fn run(&self) {
        info!(schedule = %self.schedule, "scheduler started");
        loop {
            let Some(next) = self.schedule.upcoming(Utc).next() else {
                warn!("schedule has no upcoming fire times, stopping");
                return;
            };
            match (next - Utc::now()).to_std() {
                Ok(wait) => tokio::time::sleep(wait).await,
                // Fire time already passed while computing; take the next one
                Err(_) => continue,
            }
            self.fire();
        }
    }

    /// Launch one tick unless the previous one is still running
    fn fire(&self) {
        if self.tick_running.swap(true, Ordering::SeqCst) {
            warn!("previous tick still running, skipping this fire");
            return;
        }
        let publisher = Arc::clone(&self.publisher);
        let tick_running = Arc::clone(&self.tick_running);
        tokio::spawn(async move {
            let count = rand::thread_rng().gen_range(1..=MAX_COMMITS_PER_TICK);
            info!(commits = count, "tick started");
            match publisher.run_tick(count).await {
                Ok(report) => info!(created = report.commits.len(), "tick complete"),
                Err(e) => error!(error = %e, "tick aborted"),
            }
            tick_running.store(false, Ordering::SeqCst);
        });
    }
}
