use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::clock::{Clock, SystemClock};
use crate::error::TimerError;
use crate::format::format_duration;
use crate::set::TimerSet;

/// Settings for a [`TimerBoard`]
#[derive(Debug, Clone)]
pub struct BoardConfig {
    /// Instance name for logging
    pub name: String,

    /// One timer is created per label, in order
    pub labels: Vec<String>,

    /// How often the active timer's display is refreshed
    pub refresh_interval: Duration,

    pub command_buffer_size: usize,
    pub event_buffer_size: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            name: "timer_board".to_string(),
            labels: ["Work", "Play", "Sleep"]
                .into_iter()
                .map(String::from)
                .collect(),
            refresh_interval: Duration::from_millis(16),
            command_buffer_size: 100,
            event_buffer_size: 100,
        }
    }
}

/// Drives a [`TimerSet`] from selection commands and repaints the running
/// timer on a fixed cadence.
pub struct TimerBoard<C: Clock = SystemClock> {
    /// Instance name for logging
    name: String,

    /// Channel for receiving board commands
    command_rx: mpsc::Receiver<BoardCommand>,

    /// Channel for sending render events
    event_tx: mpsc::Sender<BoardEvent>,

    timers: TimerSet<C>,

    /// Display refresh cadence
    refresh_interval: Duration,

    /// Cancellation token for graceful shutdown
    cancel_token: CancellationToken,
}

/// Handle for controlling the board
pub struct BoardHandle {
    /// Channel for sending commands to the board
    command_tx: mpsc::Sender<BoardCommand>,

    /// Channel for receiving render events
    event_rx: mpsc::Receiver<BoardEvent>,
}

/// Board command enum
#[derive(Debug, Clone)]
pub enum BoardCommand {
    Activate { index: usize },
    Rename { index: usize, label: String },
    Shutdown,
}

/// Render event enum
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    /// Timer `index` is now the running one
    Activated {
        index: usize,
        previous: Option<usize>,
    },
    /// Final reading of a timer that was just stopped
    Stopped {
        index: usize,
        elapsed_ms: u64,
        display: String,
    },
    /// Periodic reading of the running timer
    Frame {
        index: usize,
        elapsed_ms: u64,
        display: String,
    },
    Renamed {
        index: usize,
        label: String,
    },
    /// A command broke a contract; nothing was changed
    Rejected { error: TimerError },
}

impl TimerBoard<SystemClock> {
    /// Build a board on the system clock from `config`.
    pub fn from_config(
        config: BoardConfig,
        cancel_token: CancellationToken,
    ) -> (Self, BoardHandle) {
        let timers = TimerSet::new(config.labels);
        Self::new(
            config.name,
            timers,
            config.refresh_interval,
            config.command_buffer_size,
            config.event_buffer_size,
            cancel_token,
        )
    }
}

impl<C: Clock> TimerBoard<C> {
    /// Create a new TimerBoard with bounded channels
    ///
    /// # Arguments
    /// * `name` - Board instance name
    /// * `timers` - The timer set to drive; its active timer, if any, keeps running
    /// * `refresh_interval` - How often to emit a frame for the running timer
    /// * `command_buffer_size` - Size of command channel buffer
    /// * `event_buffer_size` - Size of event channel buffer
    ///
    /// Returns (TimerBoard, BoardHandle)
    pub fn new(
        name: String,
        timers: TimerSet<C>,
        refresh_interval: Duration,
        command_buffer_size: usize,
        event_buffer_size: usize,
        cancel_token: CancellationToken,
    ) -> (Self, BoardHandle) {
        let (command_tx, command_rx) = mpsc::channel(command_buffer_size);
        let (event_tx, event_rx) = mpsc::channel(event_buffer_size);

        let board = TimerBoard {
            name,
            command_rx,
            event_tx,
            timers,
            refresh_interval,
            cancel_token,
        };

        let handle = BoardHandle {
            command_tx,
            event_rx,
        };

        (board, handle)
    }

    /// Run the board until shutdown, cancellation, or all handles are gone.
    ///
    /// Returns the timer set, with no timer running.
    pub async fn run(mut self) -> TimerSet<C> {
        let mut refresh = interval(self.refresh_interval);
        refresh.set_missed_tick_behavior(MissedTickBehavior::Skip);

        log::info!(
            "Timer board '{}' started with {} timer(s)",
            self.name,
            self.timers.len()
        );

        loop {
            tokio::select! {
                // Handle incoming commands
                command = self.command_rx.recv() => {
                    match command {
                        _ if self.cancel_token.is_cancelled() => {
                            log::info!("Timer board '{}' cancelled", self.name);
                            break;
                        }
                        Some(command) => {
                            let shutdown = self.handle_command(command);
                            if shutdown {
                                break;
                            }
                        }
                        // All senders dropped
                        None => {
                            log::info!(
                                "Timer board '{}' shutting down - all senders dropped",
                                self.name
                            );
                            break;
                        }
                    }
                },

                // Repaint the running timer
                _ = refresh.tick() => {
                    self.emit_frame();
                },

                // Handle cancellation token
                _ = self.cancel_token.cancelled() => {
                    log::info!("Timer board '{}' cancelled via token", self.name);
                    break;
                },
            }
        }

        self.settle();
        log::info!("Timer board '{}' stopped", self.name);
        self.timers
    }

    /// Handle board commands
    fn handle_command(&mut self, command: BoardCommand) -> bool {
        let mut shutdown = false;
        match command {
            BoardCommand::Activate { index } => match self.timers.activate(index) {
                Ok(previous) => {
                    if let Some(stopped) = previous {
                        self.emit_stopped(stopped);
                    }
                    self.send(BoardEvent::Activated { index, previous });
                    self.emit_frame();
                }
                Err(error) => self.reject(error),
            },
            BoardCommand::Rename { index, label } => {
                match self.timers.rename(index, label.clone()) {
                    Ok(()) => self.send(BoardEvent::Renamed { index, label }),
                    Err(error) => self.reject(error),
                }
            }
            BoardCommand::Shutdown => {
                log::info!("Timer board '{}' shutting down", self.name);
                shutdown = true;
            }
        }
        shutdown
    }

    /// Stop whatever is running so the last reading is final.
    fn settle(&mut self) {
        match self.timers.deactivate() {
            Ok(Some(index)) => self.emit_stopped(index),
            Ok(None) => {}
            Err(error) => {
                log::error!(
                    "Timer board '{}' failed to stop active timer: {}",
                    self.name,
                    error
                )
            }
        }
    }

    fn emit_frame(&self) {
        let Some(index) = self.timers.active_index() else {
            return;
        };
        let Some(timer) = self.timers.get(index) else {
            return;
        };
        let elapsed_ms = timer.elapsed_ms();
        self.send(BoardEvent::Frame {
            index,
            elapsed_ms,
            display: format_duration(elapsed_ms),
        });
    }

    fn emit_stopped(&self, index: usize) {
        let Some(timer) = self.timers.get(index) else {
            return;
        };
        let elapsed_ms = timer.elapsed_ms();
        self.send(BoardEvent::Stopped {
            index,
            elapsed_ms,
            display: format_duration(elapsed_ms),
        });
    }

    fn reject(&self, error: TimerError) {
        log::warn!("Timer board '{}' rejected command: {}", self.name, error);
        self.send(BoardEvent::Rejected { error });
    }

    fn send(&self, event: BoardEvent) {
        // Use try_send so a slow renderer never stalls the board
        if let Err(e) = self.event_tx.try_send(event) {
            match e {
                mpsc::error::TrySendError::Full(event) => {
                    log::warn!(
                        "Event channel full in board '{}', dropping {:?}",
                        self.name,
                        event
                    );
                }
                mpsc::error::TrySendError::Closed(event) => {
                    log::debug!(
                        "Event channel closed in board '{}', cannot send {:?}",
                        self.name,
                        event
                    );
                }
            }
        }
    }
}

impl BoardHandle {
    /// Select timer `index`
    pub async fn activate(
        &self,
        index: usize,
    ) -> Result<(), mpsc::error::SendError<BoardCommand>> {
        self.command_tx.send(BoardCommand::Activate { index }).await
    }

    /// Select timer `index` (non-blocking)
    pub fn try_activate(
        &self,
        index: usize,
    ) -> Result<(), mpsc::error::TrySendError<BoardCommand>> {
        self.command_tx.try_send(BoardCommand::Activate { index })
    }

    /// Relabel timer `index`
    pub async fn rename(
        &self,
        index: usize,
        label: String,
    ) -> Result<(), mpsc::error::SendError<BoardCommand>> {
        self.command_tx
            .send(BoardCommand::Rename { index, label })
            .await
    }

    /// Relabel timer `index` (non-blocking)
    pub fn try_rename(
        &self,
        index: usize,
        label: String,
    ) -> Result<(), mpsc::error::TrySendError<BoardCommand>> {
        self.command_tx.try_send(BoardCommand::Rename { index, label })
    }

    /// Shutdown the board
    pub async fn shutdown(&self) -> Result<(), mpsc::error::SendError<BoardCommand>> {
        self.command_tx.send(BoardCommand::Shutdown).await
    }

    /// Shutdown the board (non-blocking)
    pub fn try_shutdown(&self) -> Result<(), mpsc::error::TrySendError<BoardCommand>> {
        self.command_tx.try_send(BoardCommand::Shutdown)
    }

    /// Receive the next render event (blocking)
    pub async fn recv_event(&mut self) -> Option<BoardEvent> {
        self.event_rx.recv().await
    }

    /// Try to receive a render event (non-blocking)
    pub fn try_recv_event(&mut self) -> Result<BoardEvent, mpsc::error::TryRecvError> {
        self.event_rx.try_recv()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use tokio::time::{sleep, timeout};
    use tokio_test::assert_ok;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn board(
        refresh_interval: Duration,
        event_buffer_size: usize,
        cancel_token: CancellationToken,
    ) -> (TimerBoard<ManualClock>, BoardHandle, ManualClock) {
        init_logger();
        let clock = ManualClock::new(0);
        let timers = TimerSet::with_clock(["Work", "Play", "Sleep"], clock.clone());
        let (board, handle) = TimerBoard::new(
            "test".to_string(),
            timers,
            refresh_interval,
            10,
            event_buffer_size,
            cancel_token,
        );
        (board, handle, clock)
    }

    /// Skip frames until a non-frame event arrives.
    async fn next_non_frame(handle: &mut BoardHandle) -> BoardEvent {
        loop {
            let event = timeout(Duration::from_secs(1), handle.recv_event())
                .await
                .expect("timed out waiting for event")
                .expect("event channel closed");
            if !matches!(event, BoardEvent::Frame { .. }) {
                return event;
            }
        }
    }

    #[test]
    fn test_default_config() {
        let config = BoardConfig::default();
        assert_eq!(config.labels, vec!["Work", "Play", "Sleep"]);
        assert_eq!(config.refresh_interval, Duration::from_millis(16));
        assert_eq!(config.command_buffer_size, 100);
        assert_eq!(config.event_buffer_size, 100);
    }

    #[tokio::test]
    async fn test_activate_switches_and_reports() {
        let (board, mut handle, clock) =
            board(Duration::from_secs(3600), 32, CancellationToken::new());
        let board_task = tokio::spawn(board.run());

        assert_ok!(handle.activate(0).await);
        assert_eq!(
            next_non_frame(&mut handle).await,
            BoardEvent::Activated {
                index: 0,
                previous: None
            }
        );

        clock.advance(61_000);
        handle.activate(1).await.unwrap();
        assert_eq!(
            next_non_frame(&mut handle).await,
            BoardEvent::Stopped {
                index: 0,
                elapsed_ms: 61_000,
                display: "0:01:01".to_string(),
            }
        );
        assert_eq!(
            next_non_frame(&mut handle).await,
            BoardEvent::Activated {
                index: 1,
                previous: Some(0)
            }
        );

        clock.advance(500);
        handle.shutdown().await.unwrap();
        assert_eq!(
            next_non_frame(&mut handle).await,
            BoardEvent::Stopped {
                index: 1,
                elapsed_ms: 500,
                display: "0:00:00".to_string(),
            }
        );

        let timers = board_task.await.unwrap();
        assert_eq!(timers.active_index(), None);
        assert_eq!(timers.get(0).unwrap().accumulated_ms(), 61_000);
        assert_eq!(timers.get(1).unwrap().accumulated_ms(), 500);
        assert!(timers.iter().all(|t| !t.is_running()));
    }

    #[tokio::test]
    async fn test_frames_follow_running_timer() {
        let (board, mut handle, clock) =
            board(Duration::from_millis(10), 64, CancellationToken::new());
        clock.set(3_661_000);
        let board_task = tokio::spawn(board.run());

        // Nothing running yet, so no frames
        sleep(Duration::from_millis(50)).await;
        assert!(handle.try_recv_event().is_err());

        handle.activate(2).await.unwrap();
        assert!(matches!(
            next_non_frame(&mut handle).await,
            BoardEvent::Activated { index: 2, .. }
        ));

        clock.advance(3_661_000);
        let frame = loop {
            let event = timeout(Duration::from_secs(1), handle.recv_event())
                .await
                .unwrap()
                .unwrap();
            if let BoardEvent::Frame { elapsed_ms, .. } = &event {
                if *elapsed_ms == 3_661_000 {
                    break event;
                }
            }
        };
        assert_eq!(
            frame,
            BoardEvent::Frame {
                index: 2,
                elapsed_ms: 3_661_000,
                display: "1:01:01".to_string(),
            }
        );

        handle.shutdown().await.unwrap();
        let _ = board_task.await;
    }

    #[tokio::test]
    async fn test_out_of_range_is_rejected() {
        let (board, mut handle, clock) =
            board(Duration::from_secs(3600), 32, CancellationToken::new());
        let board_task = tokio::spawn(board.run());

        handle.activate(1).await.unwrap();
        next_non_frame(&mut handle).await;
        clock.advance(40);

        handle.activate(7).await.unwrap();
        assert_eq!(
            next_non_frame(&mut handle).await,
            BoardEvent::Rejected {
                error: TimerError::IndexOutOfRange { index: 7, len: 3 }
            }
        );

        handle.shutdown().await.unwrap();
        let timers = board_task.await.unwrap();
        assert_eq!(timers.get(1).unwrap().accumulated_ms(), 40);
        assert_eq!(timers.get(1).unwrap().history().len(), 1);
    }

    #[tokio::test]
    async fn test_rename() {
        let (board, mut handle, _clock) =
            board(Duration::from_secs(3600), 32, CancellationToken::new());
        let board_task = tokio::spawn(board.run());

        handle.rename(0, "Deep work".to_string()).await.unwrap();
        assert_eq!(
            next_non_frame(&mut handle).await,
            BoardEvent::Renamed {
                index: 0,
                label: "Deep work".to_string()
            }
        );

        handle.rename(3, "Nope".to_string()).await.unwrap();
        assert!(matches!(
            next_non_frame(&mut handle).await,
            BoardEvent::Rejected { .. }
        ));

        handle.shutdown().await.unwrap();
        let timers = board_task.await.unwrap();
        assert_eq!(timers.labels(), vec!["Deep work", "Play", "Sleep"]);
    }

    #[tokio::test]
    async fn test_cancellation_token() {
        let cancel_token = CancellationToken::new();
        let (board, mut handle, clock) =
            board(Duration::from_millis(10), 32, cancel_token.clone());
        let board_task = tokio::spawn(board.run());

        handle.activate(0).await.unwrap();
        next_non_frame(&mut handle).await;
        clock.advance(250);

        cancel_token.cancel();
        let timers = board_task.await.unwrap();

        // The running timer is settled on the way out
        assert_eq!(timers.active_index(), None);
        assert_eq!(timers.get(0).unwrap().accumulated_ms(), 250);

        // Commands after cancellation fail
        let result = handle.try_activate(1);
        assert!(
            result.is_err(),
            "Activating after cancellation should fail"
        );
    }

    #[tokio::test]
    async fn test_dropped_handle_stops_board() {
        let (board, handle, _clock) =
            board(Duration::from_millis(10), 32, CancellationToken::new());
        let board_task = tokio::spawn(board.run());

        handle.try_activate(0).unwrap();
        drop(handle);

        let timers = timeout(Duration::from_secs(1), board_task)
            .await
            .expect("board did not stop after handle was dropped")
            .unwrap();
        assert!(timers.iter().all(|t| !t.is_running()));
    }

    #[tokio::test]
    async fn test_full_event_channel_does_not_block() {
        let (board, mut handle, _clock) =
            board(Duration::from_millis(1), 1, CancellationToken::new());
        let board_task = tokio::spawn(board.run());

        handle.activate(0).await.unwrap();
        handle.activate(1).await.unwrap();
        handle.activate(2).await.unwrap();
        sleep(Duration::from_millis(20)).await;

        // Only one event fits; the rest were dropped
        assert!(handle.try_recv_event().is_ok());

        handle.shutdown().await.unwrap();
        let timers = timeout(Duration::from_secs(1), board_task)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(timers.get(2).unwrap().history().len(), 1);
        assert_eq!(timers.get(0).unwrap().history().len(), 1);
    }
}
