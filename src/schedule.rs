use std::time::{Duration, Instant};

/// The feed poll as one scheduled task. `trigger_now` makes the next check
/// due immediately; `mark_fetched` pushes the next periodic tick one full
/// interval past the fetch that just ran.
#[derive(Debug, Clone)]
pub struct PollSchedule {
    interval: Duration,
    next_due: Option<Instant>,
}

impl PollSchedule {
    /// A new schedule is due right away so the first poll happens on start.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn trigger_now(&mut self) {
        self.next_due = None;
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.next_due.is_none_or(|due| now >= due)
    }

    pub fn mark_fetched(&mut self, now: Instant) {
        self.next_due = Some(now + self.interval);
    }

    pub fn time_until_due(&self, now: Instant) -> Duration {
        self.next_due
            .map(|due| due.saturating_duration_since(now))
            .unwrap_or(Duration::ZERO)
    }
}
