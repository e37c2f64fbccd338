use std::sync::Arc;

use tokio::sync::mpsc::Sender;
use tokio::sync::mpsc::error::SendError;
use tokio::sync::watch;

use crate::catalog::Artwork;

/// Requests from the presentation layer to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Next,
    Previous,
    TogglePlay,
    ToggleInfo,
    Retry,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    Failed(String),
}

/// Read-only view published after every controller mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub current: Option<Arc<Artwork>>,
    pub index: usize,
    pub len: usize,
    pub load_state: LoadState,
    pub playing: bool,
    pub info_visible: bool,
}

impl Snapshot {
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.load_state == LoadState::Loading
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.load_state {
            LoadState::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            current: None,
            index: 0,
            len: 0,
            load_state: LoadState::Loading,
            playing: true,
            info_visible: false,
        }
    }
}

/// Command surface handed to the presentation layer.
#[derive(Debug, Clone)]
pub struct SlideshowHandle {
    commands: Sender<Command>,
    snapshots: watch::Receiver<Snapshot>,
}

impl SlideshowHandle {
    pub fn new(commands: Sender<Command>, snapshots: watch::Receiver<Snapshot>) -> Self {
        Self {
            commands,
            snapshots,
        }
    }

    /// Queue a command; fails only once the controller has exited.
    pub async fn send(&self, cmd: Command) -> Result<(), SendError<Command>> {
        self.commands.send(cmd).await
    }

    pub async fn next(&self) -> Result<(), SendError<Command>> {
        self.send(Command::Next).await
    }

    pub async fn previous(&self) -> Result<(), SendError<Command>> {
        self.send(Command::Previous).await
    }

    pub async fn toggle_play(&self) -> Result<(), SendError<Command>> {
        self.send(Command::TogglePlay).await
    }

    pub async fn toggle_info(&self) -> Result<(), SendError<Command>> {
        self.send(Command::ToggleInfo).await
    }

    pub async fn retry(&self) -> Result<(), SendError<Command>> {
        self.send(Command::Retry).await
    }

    /// Latest published state.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    /// Wait for the next published state; `None` once the controller is gone.
    pub async fn changed(&mut self) -> Option<Snapshot> {
        self.snapshots.changed().await.ok()?;
        Some(self.snapshots.borrow_and_update().clone())
    }

    /// Wait until a published state satisfies `pred`.
    pub async fn wait_for(&mut self, pred: impl FnMut(&Snapshot) -> bool) -> Option<Snapshot> {
        self.snapshots.wait_for(pred).await.ok().map(|s| s.clone())
    }
}
