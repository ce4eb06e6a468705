//! Basic usage example for the activity timers board

use activity_timers::{BoardConfig, BoardEvent, CancellationToken, Duration, TimerBoard};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::init();

    let cancel_token = CancellationToken::new();

    // Create the board with the default Work / Play / Sleep rows
    let config = BoardConfig {
        name: "example_board".to_string(),
        refresh_interval: Duration::from_millis(250),
        ..BoardConfig::default()
    };
    let labels = config.labels.clone();
    let (board, mut handle) = TimerBoard::from_config(config, cancel_token.clone());

    // Spawn the board task
    let board_task = tokio::spawn(board.run());

    // Simulate clicks: Work for a second, Play for two, then Work again
    let clicks = [(0, 1000), (1, 2000), (0, 1000)];
    for (index, hold_ms) in clicks {
        handle.activate(index).await?;
        let until = tokio::time::Instant::now() + Duration::from_millis(hold_ms);
        while let Ok(Some(event)) = tokio::time::timeout_at(until, handle.recv_event()).await {
            render(&labels, &event);
        }
    }

    // An invalid click is reported, not applied
    handle.activate(7).await?;

    // Rename a row the way the label field would
    handle.rename(2, "Nap".to_string()).await?;

    // Shutdown gracefully
    handle.shutdown().await?;
    while let Some(event) = handle.recv_event().await {
        render(&labels, &event);
    }
    let timers = board_task.await?;

    println!("Final totals:");
    for timer in timers.iter() {
        println!(
            "  {:<8} {}",
            timer.label(),
            activity_timers::format_duration(timer.elapsed_ms())
        );
    }
    Ok(())
}

fn render(labels: &[String], event: &BoardEvent) {
    match event {
        BoardEvent::Frame { index, display, .. } => {
            println!("{:<8} {} (running)", labels[*index], display);
        }
        BoardEvent::Stopped { index, display, .. } => {
            println!("{:<8} {} (stopped)", labels[*index], display);
        }
        BoardEvent::Activated { index, previous } => {
            println!("Switched to row {} from {:?}", index, previous);
        }
        BoardEvent::Renamed { index, label } => {
            println!("Row {} renamed to '{}'", index, label);
        }
        BoardEvent::Rejected { error } => {
            println!("Ignored click: {}", error);
        }
    }
}
