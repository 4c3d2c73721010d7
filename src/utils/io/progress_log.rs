// Copyright 2019-2025 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::time::{Duration, Instant};

use humantime::format_duration;
use tracing::info;

const UPDATE_FREQUENCY: Duration = Duration::from_secs(8);

/// Snapshot emitted whenever a [`ProgressLog`] reports.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    pub completed_items: u64,
    pub elapsed: Duration,
    /// Items per second since the previous report.
    pub rate: f64,
}

/// Periodically logs how many items a long running loop has processed.
#[derive(Debug, Clone)]
pub struct ProgressLog {
    completed_items: u64,
    last_completed_items: u64,
    frequency: Duration,
    start: Instant,
    last_logged: Instant,
    message: String,
}

impl ProgressLog {
    pub fn new(message: &str) -> Self {
        Self::with_frequency(message, UPDATE_FREQUENCY)
    }

    pub fn with_frequency(message: &str, frequency: Duration) -> Self {
        let now = Instant::now();
        Self {
            completed_items: 0,
            last_completed_items: 0,
            frequency,
            start: now,
            last_logged: now,
            message: message.into(),
        }
    }

    pub fn completed_items(&self) -> u64 {
        self.completed_items
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Bumps the counter, logging if the update interval has passed.
    pub fn inc(&mut self, value: u64) -> Option<Progress> {
        self.completed_items += value;
        self.emit_log_if_required(Instant::now())
    }

    fn emit_log_if_required(&mut self, now: Instant) -> Option<Progress> {
        let since_logged = now - self.last_logged;
        if since_logged <= self.frequency {
            return None;
        }
        let progress = Progress {
            completed_items: self.completed_items,
            elapsed: now - self.start,
            rate: (self.completed_items - self.last_completed_items) as f64
                / since_logged.as_secs_f64(),
        };
        info!(
            processed = progress.completed_items,
            elapsed = %format_duration(Duration::from_secs(progress.elapsed.as_secs())),
            per_second = progress.rate,
            "{} in progress",
            self.message,
        );
        self.last_logged = now;
        self.last_completed_items = self.completed_items;
        Some(progress)
    }
}
