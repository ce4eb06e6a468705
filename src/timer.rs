use crate::clock::{Clock, SystemClock};
use crate::error::{Result, TimerError};

/// One run of a timer. The stop instant is `None` only while the run is in
/// progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    start_ms: u64,
    stop_ms: Option<u64>,
}

impl Interval {
    pub fn start_ms(&self) -> u64 {
        self.start_ms
    }

    pub fn stop_ms(&self) -> Option<u64> {
        self.stop_ms
    }

    pub fn is_open(&self) -> bool {
        self.stop_ms.is_none()
    }

    /// Length of a closed interval, `None` while it is still open.
    pub fn duration_ms(&self) -> Option<u64> {
        self.stop_ms.map(|stop| stop - self.start_ms)
    }
}

/// A named stopwatch that keeps every start/stop pair it has seen.
#[derive(Debug, Clone)]
pub struct Timer<C: Clock = SystemClock> {
    /// Display name
    label: String,

    /// Run history, oldest first. Only the last entry may be open.
    intervals: Vec<Interval>,

    /// Sum of all closed interval durations
    accumulated_ms: u64,

    /// True iff the last interval is open
    running: bool,

    clock: C,
}

impl Timer<SystemClock> {
    /// Create a stopped timer reading the system wall clock.
    pub fn new(label: impl Into<String>) -> Self {
        Self::with_clock(label, SystemClock)
    }
}

impl<C: Clock> Timer<C> {
    /// Create a stopped timer with zero accumulated time reading `clock`.
    pub fn with_clock(label: impl Into<String>, clock: C) -> Self {
        Timer {
            label: label.into(),
            intervals: Vec::new(),
            accumulated_ms: 0,
            running: false,
            clock,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Replace the display name. History and timing are unaffected.
    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Total of all completed runs, excluding any run in progress.
    pub fn accumulated_ms(&self) -> u64 {
        self.accumulated_ms
    }

    /// Open a new interval at the current instant.
    ///
    /// Fails with [`TimerError::AlreadyRunning`] if the timer is running, in
    /// which case nothing is modified.
    pub fn start(&mut self) -> Result<&mut Self> {
        if self.running {
            return Err(TimerError::AlreadyRunning {
                label: self.label.clone(),
            });
        }

        let mut now = self.clock.now_ms();
        if let Some(last_stop) = self.intervals.last().and_then(Interval::stop_ms) {
            if now < last_stop {
                log::warn!(
                    "Clock moved backwards for timer '{}' ({} < {}), starting at {}",
                    self.label,
                    now,
                    last_stop,
                    last_stop
                );
                now = last_stop;
            }
        }

        self.intervals.push(Interval {
            start_ms: now,
            stop_ms: None,
        });
        self.running = true;
        log::debug!("Timer '{}' started at {}", self.label, now);
        Ok(self)
    }

    /// Close the open interval at the current instant and add its length to
    /// the accumulated total.
    ///
    /// Fails with [`TimerError::NotRunning`] if the timer is stopped, in which
    /// case nothing is modified.
    pub fn stop(&mut self) -> Result<&mut Self> {
        let open_start = match self.intervals.last() {
            Some(open) if self.running && open.is_open() => open.start_ms,
            _ => {
                return Err(TimerError::NotRunning {
                    label: self.label.clone(),
                })
            }
        };

        let mut now = self.clock.now_ms();
        if now < open_start {
            log::warn!(
                "Clock moved backwards for timer '{}' ({} < {}), stopping at {}",
                self.label,
                now,
                open_start,
                open_start
            );
            now = open_start;
        }

        if let Some(open) = self.intervals.last_mut() {
            open.stop_ms = Some(now);
        }
        self.accumulated_ms += now - open_start;
        self.running = false;
        log::debug!(
            "Timer '{}' stopped at {} after {} ms (total {} ms)",
            self.label,
            now,
            now - open_start,
            self.accumulated_ms
        );
        Ok(self)
    }

    /// Accumulated time plus the length of the run in progress, if any.
    ///
    /// Read-only; cheap enough to call on every display refresh.
    pub fn elapsed_ms(&self) -> u64 {
        let running_ms = match self.intervals.last() {
            Some(open) if self.running => self.clock.now_ms().saturating_sub(open.start_ms),
            _ => 0,
        };
        self.accumulated_ms + running_ms
    }

    /// Owned copy of the run history. Later starts and stops do not show up
    /// in a snapshot already taken.
    pub fn history(&self) -> Vec<Interval> {
        self.intervals.clone()
    }
}
