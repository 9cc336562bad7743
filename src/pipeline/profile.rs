//! Per-request stage timing.

use std::time::{Duration, Instant};

use tracing::debug;

/// Elapsed time between consecutive marks.
#[derive(Debug)]
pub struct Profiler {
    started: Instant,
    last: Instant,
    marks: Vec<(&'static str, Duration)>,
}

impl Profiler {
    pub fn start() -> Self {
        let now = Instant::now();
        Self {
            started: now,
            last: now,
            marks: Vec::new(),
        }
    }

    /// Record the time spent since the previous mark under `name`.
    pub fn mark(&mut self, name: &'static str) {
        let now = Instant::now();
        self.marks.push((name, now - self.last));
        self.last = now;
    }

    pub fn marks(&self) -> &[(&'static str, Duration)] {
        &self.marks
    }

    pub fn total(&self) -> Duration {
        self.last - self.started
    }

    pub fn log(&self, route: &str) {
        for (i, (name, elapsed)) in self.marks.iter().enumerate() {
            debug!(
                route,
                stage = *name,
                step = i + 1,
                elapsed_us = elapsed.as_micros() as u64,
                "stage timing"
            );
        }
        debug!(route, total_us = self.total().as_micros() as u64, "request timing");
    }
}
