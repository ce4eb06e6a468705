use thiserror::Error;

/// Contract violations raised by timers and the timer set.
///
/// None of these are expected at runtime; a correctly wired board never
/// produces them. State is left untouched whenever one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
    #[error("timer '{label}' is already running; stop it before starting it again")]
    AlreadyRunning { label: String },

    #[error("timer '{label}' is not running; start it before stopping it")]
    NotRunning { label: String },

    #[error("timer index {index} is out of range for a set of {len} timer(s)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("cannot format negative duration of {0} ms")]
    NegativeDuration(i64),
}

pub type Result<T> = std::result::Result<T, TimerError>;
