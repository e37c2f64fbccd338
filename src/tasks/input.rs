//! Line-based keyboard control read from stdin.

use std::io::{self, BufRead};

use anyhow::Result;
use tokio::select;
use tokio::sync::mpsc::{self, Receiver};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::events::{Command, SlideshowHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Command(Command),
    Quit,
}

/// Map one typed line to an action.
#[must_use]
pub fn parse_input(line: &str) -> Option<Input> {
    let input = match line.trim().to_ascii_lowercase().as_str() {
        "n" | "next" => Input::Command(Command::Next),
        "p" | "prev" | "previous" => Input::Command(Command::Previous),
        "s" | "play" | "pause" => Input::Command(Command::TogglePlay),
        "i" | "info" => Input::Command(Command::ToggleInfo),
        "r" | "retry" => Input::Command(Command::Retry),
        "q" | "quit" | "exit" => Input::Quit,
        _ => return None,
    };
    Some(input)
}

/// Read stdin on a dedicated thread so a pending read never holds up shutdown.
pub fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = mpsc::channel::<String>(16);
    std::thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.blocking_send(line).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    warn!("stdin read failed: {err}");
                    break;
                }
            }
        }
    });
    rx
}

/// Forward typed commands to the controller. Quit or end of input cancels
/// the whole pipeline.
pub async fn run(
    mut lines: Receiver<String>,
    handle: SlideshowHandle,
    cancel: CancellationToken,
) -> Result<()> {
    loop {
        select! {
            _ = cancel.cancelled() => break,
            maybe_line = lines.recv() => {
                let Some(line) = maybe_line else {
                    info!("stdin closed; initiating shutdown");
                    cancel.cancel();
                    break;
                };
                match parse_input(&line) {
                    Some(Input::Command(cmd)) => {
                        if handle.send(cmd).await.is_err() {
                            warn!("slideshow controller gone; input exiting");
                            break;
                        }
                    }
                    Some(Input::Quit) => {
                        info!("quit requested; initiating shutdown");
                        cancel.cancel();
                        break;
                    }
                    None => debug!(input = %line.trim(), "ignoring unrecognized input"),
                }
            }
        }
    }
    Ok(())
}
