//! Watch mode execution

use super::WatchSession;
use crate::events::ControllerEvent;
use crate::print_cmd_info;
use log::{debug, warn};
use std::error::Error;
use std::io::BufRead;
use tokio::sync::{broadcast, mpsc};

/// A line typed on stdin
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum WatchCommand {
    Event(ControllerEvent),
    Quit,
}

pub fn parse_command(line: &str) -> Option<WatchCommand> {
    match line.trim().to_lowercase().as_str() {
        "r" | "refresh" => Some(WatchCommand::Event(ControllerEvent::Refresh)),
        "online" => Some(WatchCommand::Event(ControllerEvent::Online)),
        "offline" => Some(WatchCommand::Event(ControllerEvent::Offline)),
        "q" | "quit" | "exit" => Some(WatchCommand::Quit),
        _ => None,
    }
}

/// Forwards commands read from `input` into the controller's event channel.
///
/// Runs on a detached OS thread: a blocking read cannot be cancelled, and the
/// process must be able to exit while one is outstanding.
fn spawn_command_reader<R: BufRead + Send + 'static>(
    input: R,
    events: mpsc::Sender<ControllerEvent>,
    shutdown: broadcast::Sender<()>,
) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        for line in input.lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    warn!("Failed to read stdin: {}", e);
                    return;
                }
            };
            match parse_command(&line) {
                Some(WatchCommand::Event(event)) => {
                    if events.blocking_send(event).is_err() {
                        return;
                    }
                }
                Some(WatchCommand::Quit) => {
                    let _ = shutdown.send(());
                    return;
                }
                None if line.trim().is_empty() => {}
                None => warn!("Unknown command: {}", line.trim()),
            }
        }
        // stdin closed: keep watching until Ctrl+C
    })
}

/// Runs the controller until the user quits or presses Ctrl+C
///
/// This function handles:
/// 1. Initial dashboard initialization and the page-ready watchdog
/// 2. Stdin commands (refresh, online, offline, quit)
/// 3. Retry and cleanup timers scheduled by the controller
pub async fn run_watch_mode(session: WatchSession) -> Result<(), Box<dyn Error>> {
    let WatchSession {
        mut controller,
        event_sender,
        mut event_receiver,
        dashboard_id,
    } = session;

    print_cmd_info!("Watching dashboard", "{}", dashboard_id);
    print_cmd_info!("Commands", "r (refresh), online, offline, q (quit)");

    let (shutdown_sender, mut shutdown_receiver) = broadcast::channel::<()>(1);
    let ctrl_c_sender = shutdown_sender.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = ctrl_c_sender.send(());
        }
    });
    // Detached; a pending read must not keep the process alive after shutdown.
    let _ = spawn_command_reader(
        std::io::BufReader::new(std::io::stdin()),
        event_sender.clone(),
        shutdown_sender,
    );

    controller.on_page_ready();
    controller.handle(ControllerEvent::Initialize).await;

    loop {
        tokio::select! {
            Some(event) = event_receiver.recv() => {
                debug!("Handling {:?}", event);
                if let Some(line) = event.status_line().filter(|l| l.should_display()) {
                    println!("{}", line);
                }
                controller.handle(event).await;
            }
            _ = shutdown_receiver.recv() => {
                break;
            }
        }
    }

    print_cmd_info!("Shutting down", "");
    debug!(
        "Final phase {} after {} retries (widget mounted: {}, region: {:?})",
        controller.state().phase,
        controller.state().retry_count,
        controller.has_widget(),
        controller.region().current()
    );
    print_cmd_info!("Watch session ended", "");

    Ok(())
}
