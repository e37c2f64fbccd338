pub mod state;

use std::collections::HashSet;
use std::future::pending;
use std::pin::Pin;
use std::sync::Arc;

use anyhow::Result;
use humantime::format_duration;
use tokio::select;
use tokio::sync::mpsc::{self, Receiver};
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{Instant, Interval, MissedTickBehavior, Sleep, interval_at, sleep};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::catalog::{Catalog, Page};
use crate::config::SlideshowOptions;
use crate::error::FetchError;
use crate::events::{Command, LoadState, SlideshowHandle, Snapshot};
use state::{GrowthRequest, Slideshow};

const COMMAND_CHANNEL_CAPACITY: usize = 16;

enum FetchOutcome {
    Initial {
        ticket: u64,
        result: Result<Page, FetchError>,
    },
    Growth {
        request: GrowthRequest,
        result: Result<Page, FetchError>,
    },
}

/// Spawn the controller and return its command surface.
pub fn spawn<C: Catalog>(
    catalog: Arc<C>,
    options: SlideshowOptions,
    cancel: CancellationToken,
) -> (SlideshowHandle, JoinHandle<Result<()>>) {
    let (cmd_tx, cmd_rx) = mpsc::channel::<Command>(COMMAND_CHANNEL_CAPACITY);
    let (state_tx, state_rx) = watch::channel(Snapshot::default());
    let task = tokio::spawn(run(catalog, options, cmd_rx, state_tx, cancel));
    (SlideshowHandle::new(cmd_tx, state_rx), task)
}

/// Owns the slideshow state and drives it from commands, fetch results and timers.
///
/// Rules:
/// - Start with an initial load; `Retry` starts another one and the older
///   result is ignored.
/// - Fetches run as tasks in a `JoinSet`; their results come back to this
///   loop, which is the only place state changes.
/// - Background growth failures are logged and dropped.
/// - Auto-advance runs while playing and ready; it is rebuilt when playback
///   toggles or the buffer is replaced.
/// - Showing the info overlay arms a one-shot hide; hiding disarms it.
/// - A snapshot is published after every change.
pub async fn run<C: Catalog>(
    catalog: Arc<C>,
    options: SlideshowOptions,
    mut commands: Receiver<Command>,
    state_tx: watch::Sender<Snapshot>,
    cancel: CancellationToken,
) -> Result<()> {
    let mut show = Slideshow::new(&options);
    let mut fetches: JoinSet<FetchOutcome> = JoinSet::new();
    let mut growth_in_flight: HashSet<GrowthRequest> = HashSet::new();
    let mut advance: Option<Interval> = None;
    let mut advance_generation: Option<u64> = None;
    let mut info_hide: Option<Pin<Box<Sleep>>> = None;

    info!(
        interval = %format_duration(options.advance_interval),
        info_hide = %format_duration(options.info_hide_delay),
        "slideshow controller started"
    );
    start_load(&mut show, &catalog, &mut fetches);
    publish(&show, &state_tx);

    loop {
        select! {
            _ = cancel.cancelled() => {
                info!("cancel received; exiting slideshow controller");
                break;
            }

            Some(cmd) = commands.recv() => {
                debug!(?cmd, "command");
                match cmd {
                    Command::Next => {
                        if let Some(request) = show.next() {
                            spawn_growth(&catalog, request, &mut fetches, &mut growth_in_flight);
                        }
                    }
                    Command::Previous => show.previous(),
                    Command::TogglePlay => {
                        let playing = show.toggle_play();
                        info!(playing, "playback toggled");
                    }
                    Command::ToggleInfo => {
                        info_hide = if show.toggle_info() {
                            Some(Box::pin(sleep(options.info_hide_delay)))
                        } else {
                            None
                        };
                    }
                    Command::Retry => {
                        info!("retry requested; reloading artworks");
                        start_load(&mut show, &catalog, &mut fetches);
                    }
                }
            }

            Some(joined) = fetches.join_next(), if !fetches.is_empty() => {
                match joined {
                    Ok(outcome) => on_fetch_outcome(&mut show, outcome, &mut growth_in_flight),
                    Err(err) if err.is_cancelled() => {}
                    Err(err) => warn!("fetch task failed: {err}"),
                }
            }

            _ = tick(&mut advance) => {
                debug!("auto-advance");
                if let Some(request) = show.next() {
                    spawn_growth(&catalog, request, &mut fetches, &mut growth_in_flight);
                }
            }

            _ = expire(&mut info_hide) => {
                info_hide = None;
                show.hide_info();
                debug!("info overlay auto-hidden");
            }
        }

        let wanted = show
            .auto_advance_enabled()
            .then(|| show.buffer().generation());
        if wanted != advance_generation {
            advance = wanted.map(|_| {
                let period = options.advance_interval;
                let mut timer = interval_at(Instant::now() + period, period);
                timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
                timer
            });
            advance_generation = wanted;
            debug!(enabled = advance.is_some(), "auto-advance timer rebuilt");
        }

        publish(&show, &state_tx);
    }

    Ok(())
}

fn start_load<C: Catalog>(
    show: &mut Slideshow,
    catalog: &Arc<C>,
    fetches: &mut JoinSet<FetchOutcome>,
) {
    let request = show.begin_load();
    debug!(page = request.page, size = request.size, "loading artworks");
    let catalog = Arc::clone(catalog);
    fetches.spawn(async move {
        let result = catalog.fetch_page(request.page, request.size).await;
        FetchOutcome::Initial {
            ticket: request.ticket,
            result,
        }
    });
}

fn spawn_growth<C: Catalog>(
    catalog: &Arc<C>,
    request: GrowthRequest,
    fetches: &mut JoinSet<FetchOutcome>,
    in_flight: &mut HashSet<GrowthRequest>,
) {
    if !in_flight.insert(request) {
        debug!(page = request.page, "growth already in flight");
        return;
    }
    debug!(page = request.page, size = request.size, "requesting more artworks");
    let catalog = Arc::clone(catalog);
    fetches.spawn(async move {
        let result = catalog.fetch_page(request.page, request.size).await;
        FetchOutcome::Growth { request, result }
    });
}

fn on_fetch_outcome(
    show: &mut Slideshow,
    outcome: FetchOutcome,
    in_flight: &mut HashSet<GrowthRequest>,
) {
    match outcome {
        FetchOutcome::Initial { ticket, result } => {
            if !show.finish_load(ticket, result) {
                debug!(ticket, "discarding superseded load result");
                return;
            }
            match show.load_state() {
                LoadState::Failed(reason) => warn!(%reason, "initial load failed"),
                _ => info!(count = show.buffer().len(), "artworks loaded"),
            }
        }
        FetchOutcome::Growth { request, result } => {
            in_flight.remove(&request);
            match result {
                Ok(page) => match show.apply_growth(&request, page) {
                    Some(appended) => info!(
                        page = request.page,
                        appended,
                        total = show.buffer().len(),
                        "buffer grew"
                    ),
                    None => debug!(page = request.page, "discarding growth for replaced buffer"),
                },
                Err(err) => warn!(page = request.page, error = %err, "background growth failed"),
            }
        }
    }
}

fn publish(show: &Slideshow, state_tx: &watch::Sender<Snapshot>) {
    let next = show.snapshot();
    state_tx.send_if_modified(|current| {
        if *current == next {
            false
        } else {
            *current = next;
            true
        }
    });
}

async fn tick(timer: &mut Option<Interval>) {
    match timer {
        Some(timer) => {
            timer.tick().await;
        }
        None => pending().await,
    }
}

async fn expire(deadline: &mut Option<Pin<Box<Sleep>>>) {
    match deadline {
        Some(sleep) => sleep.as_mut().await,
        None => pending().await,
    }
}
