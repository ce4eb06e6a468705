use crate::clock::{Clock, SystemClock};
use crate::error::{Result, TimerError};
use crate::timer::Timer;

/// Fixed, ordered set of timers of which at most one runs at a time.
#[derive(Debug, Clone)]
pub struct TimerSet<C: Clock = SystemClock> {
    timers: Vec<Timer<C>>,

    /// Index of the running timer, `None` when every timer is stopped
    active: Option<usize>,
}

impl TimerSet<SystemClock> {
    /// Create one stopped timer per label, all reading the system clock.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_clock(labels, SystemClock)
    }
}

impl<C: Clock + Clone> TimerSet<C> {
    /// Create one stopped timer per label, each holding a clone of `clock`.
    pub fn with_clock<I, S>(labels: I, clock: C) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let timers = labels
            .into_iter()
            .map(|label| Timer::with_clock(label, clock.clone()))
            .collect();
        TimerSet {
            timers,
            active: None,
        }
    }
}

impl<C: Clock> TimerSet<C> {
    /// Make timer `index` the running one.
    ///
    /// The currently active timer, if any, is stopped before `index` is
    /// started, so no observer ever sees two running timers. Activating the
    /// timer that is already active stops it and starts a fresh interval.
    ///
    /// Returns the previously active index. On [`TimerError::IndexOutOfRange`]
    /// no timer is touched.
    pub fn activate(&mut self, index: usize) -> Result<Option<usize>> {
        self.check_index(index)?;

        let previous = self.active;
        if let Some(current) = previous {
            self.timers[current].stop()?;
            self.active = None;
        }
        self.timers[index].start()?;
        self.active = Some(index);

        log::debug!(
            "Activated timer {} ('{}'), previously {:?}",
            index,
            self.timers[index].label(),
            previous
        );
        Ok(previous)
    }

    /// Stop the running timer, if any, and return its index.
    pub fn deactivate(&mut self) -> Result<Option<usize>> {
        match self.active {
            Some(current) => {
                self.timers[current].stop()?;
                self.active = None;
                log::debug!("Deactivated timer {}", current);
                Ok(Some(current))
            }
            None => Ok(None),
        }
    }

    /// Replace the label of timer `index`.
    pub fn rename(&mut self, index: usize, label: impl Into<String>) -> Result<()> {
        self.check_index(index)?;
        self.timers[index].set_label(label);
        Ok(())
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active(&self) -> Option<&Timer<C>> {
        self.active.map(|index| &self.timers[index])
    }

    pub fn get(&self, index: usize) -> Option<&Timer<C>> {
        self.timers.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Timer<C>> {
        self.timers.iter()
    }

    pub fn labels(&self) -> Vec<String> {
        self.timers.iter().map(|t| t.label().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.timers.len() {
            Ok(())
        } else {
            Err(TimerError::IndexOutOfRange {
                index,
                len: self.timers.len(),
            })
        }
    }
}
