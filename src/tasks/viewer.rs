//! Terminal rendering of slideshow snapshots.

use anyhow::Result;
use tokio::select;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::catalog::Artwork;
use crate::catalog::types::non_empty;
use crate::events::{SlideshowHandle, Snapshot};

/// Print a frame for every published snapshot until cancelled or until the
/// controller goes away.
pub async fn run(mut handle: SlideshowHandle, cancel: CancellationToken) -> Result<()> {
    let mut last: Vec<String> = Vec::new();
    let mut snapshot = handle.snapshot();
    loop {
        let frame = render(&snapshot);
        if frame != last {
            println!("{}", frame.join("\n"));
            println!();
            last = frame;
        } else {
            debug!("snapshot unchanged on screen; skipping redraw");
        }

        select! {
            _ = cancel.cancelled() => break,
            changed = handle.changed() => match changed {
                Some(next) => snapshot = next,
                None => {
                    info!("slideshow controller gone; viewer exiting");
                    break;
                }
            },
        }
    }
    Ok(())
}

/// Lines shown for one snapshot.
#[must_use]
pub fn render(snapshot: &Snapshot) -> Vec<String> {
    if snapshot.is_loading() {
        return vec!["Loading artworks...".to_string()];
    }
    if let Some(reason) = snapshot.error() {
        return error_screen(reason);
    }
    let Some(artwork) = &snapshot.current else {
        return error_screen("No artwork available");
    };

    let status = if snapshot.playing { "playing" } else { "paused" };
    let mut lines = vec![
        format!("[{}/{}] {status}", snapshot.index + 1, snapshot.len),
        artwork.title.clone(),
        artwork.creator().to_string(),
    ];
    let image = artwork.image_url();
    if image.is_empty() {
        lines.push("Image unavailable".to_string());
    } else {
        lines.push(format!("image: {image}"));
    }
    if snapshot.info_visible {
        lines.extend(caption_lines(artwork));
    }
    lines
}

/// Info overlay text: badges, then labelled details. Absent fields are left
/// out.
#[must_use]
pub fn caption_lines(artwork: &Artwork) -> Vec<String> {
    let mut lines = Vec::new();

    let badges: Vec<String> = [&artwork.dated, &artwork.culture, &artwork.classification]
        .into_iter()
        .filter_map(non_empty)
        .map(|b| format!("[{b}]"))
        .collect();
    if !badges.is_empty() {
        lines.push(badges.join(" "));
    }

    let details = [
        ("Medium", &artwork.medium),
        ("Dimensions", &artwork.dimensions),
        ("Department", &artwork.department),
        ("Credit", &artwork.creditline),
    ];
    for (label, value) in details {
        if let Some(value) = non_empty(value) {
            lines.push(format!("{label}: {value}"));
        }
    }
    lines
}

fn error_screen(reason: &str) -> Vec<String> {
    vec![
        "Unable to Load Gallery".to_string(),
        reason.to_string(),
        "Type r and press Enter to try again.".to_string(),
    ]
}
