//! # Activity Timers
//!
//! Track time spent across a fixed set of named activities, with exactly one
//! activity's timer running at a time.
//!
//! ## Features
//!
//! - **Interval History**: Every start/stop pair is kept and handed out as an owned snapshot
//! - **Single Active Timer**: Selecting a timer stops the previous one before starting the new one
//! - **Contract Errors**: Starting a running timer, stopping a stopped one, or selecting an
//!   unknown index fails without touching any state
//! - **Display Driver**: A Tokio task that turns selection commands into render events and
//!   repaints the running timer on a fixed cadence
//! - **Pluggable Clock**: System wall clock by default, manual clock for tests
//!
//! ## Quick Start
//!
//! ```rust
//! use activity_timers::{format_duration, ManualClock, TimerSet};
//!
//! let clock = ManualClock::new(0);
//! let mut timers = TimerSet::with_clock(["Work", "Play", "Sleep"], clock.clone());
//!
//! timers.activate(0)?;
//! clock.advance(61_000);
//! timers.activate(1)?;
//!
//! let work = timers.get(0).unwrap();
//! assert!(!work.is_running());
//! assert_eq!(format_duration(work.elapsed_ms()), "0:01:01");
//! assert_eq!(timers.active_index(), Some(1));
//! # Ok::<(), activity_timers::TimerError>(())
//! ```
//!
//! Driving the same set from an async UI:
//!
//! ```rust
//! use activity_timers::{BoardConfig, BoardEvent, CancellationToken, TimerBoard};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (board, mut handle) =
//!         TimerBoard::from_config(BoardConfig::default(), CancellationToken::new());
//!     let board_task = tokio::spawn(board.run());
//!
//!     // A click on the second row
//!     handle.activate(1).await?;
//!     while let Some(event) = handle.recv_event().await {
//!         if let BoardEvent::Activated { index, .. } = event {
//!             println!("Row {} is now running", index);
//!             break;
//!         }
//!     }
//!
//!     handle.shutdown().await?;
//!     let timers = board_task.await?;
//!     assert!(timers.active_index().is_none());
//!     Ok(())
//! }
//! ```

mod board;
mod clock;
mod error;
pub mod format;
mod set;
mod timer;

pub use board::{BoardCommand, BoardConfig, BoardEvent, BoardHandle, TimerBoard};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{Result, TimerError};
pub use format::{format_duration, format_signed_duration};
pub use set::TimerSet;
pub use timer::{Interval, Timer};

// Re-export commonly used types for convenience
pub use std::time::Duration;
pub use tokio_util::sync::CancellationToken;
