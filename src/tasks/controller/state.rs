use crate::buffer::ArtworkBuffer;
use crate::catalog::Page;
use crate::config::SlideshowOptions;
use crate::error::FetchError;
use crate::events::{LoadState, Snapshot};

/// An initial load the driver should perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadRequest {
    /// Only the result carrying the latest ticket is applied.
    pub ticket: u64,
    pub page: u32,
    pub size: u32,
}

/// A background page fetch that would extend the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GrowthRequest {
    /// Buffer generation the page number was computed against.
    pub generation: u64,
    pub page: u32,
    pub size: u32,
}

/// Slideshow state without any I/O or timers.
///
/// Operations return what the driver has to do next (a load or a growth
/// fetch) instead of doing it themselves.
#[derive(Debug)]
pub struct Slideshow {
    buffer: ArtworkBuffer,
    load_state: LoadState,
    playing: bool,
    info_visible: bool,
    load_ticket: u64,
    initial_page_size: u32,
    growth_page_size: u32,
    trailing_window: usize,
}

impl Slideshow {
    pub fn new(options: &SlideshowOptions) -> Self {
        Self {
            buffer: ArtworkBuffer::new(),
            load_state: LoadState::Loading,
            playing: true,
            info_visible: false,
            load_ticket: 0,
            initial_page_size: options.initial_page_size.max(1),
            growth_page_size: options.growth_page_size.max(1),
            trailing_window: options.trailing_window,
        }
    }

    /// Enter `Loading` and describe the first-page fetch. Also used by retry.
    pub fn begin_load(&mut self) -> LoadRequest {
        self.load_state = LoadState::Loading;
        self.load_ticket += 1;
        LoadRequest {
            ticket: self.load_ticket,
            page: 1,
            size: self.initial_page_size,
        }
    }

    /// Apply an initial-load result. Returns `false` if a newer load superseded it.
    pub fn finish_load(&mut self, ticket: u64, result: Result<Page, FetchError>) -> bool {
        if ticket != self.load_ticket {
            return false;
        }
        self.load_state = match result {
            Ok(page) if !page.records.is_empty() => {
                self.buffer.replace(page.records);
                LoadState::Ready
            }
            Ok(_) => LoadState::Failed(FetchError::EmptyResult.to_string()),
            Err(err) => LoadState::Failed(err.to_string()),
        };
        true
    }

    /// Advance with wraparound. Near the end of the buffer, also asks for
    /// one growth fetch.
    pub fn next(&mut self) -> Option<GrowthRequest> {
        let before = self.buffer.position();
        self.buffer.advance()?;
        if self.buffer.len().saturating_sub(self.trailing_window) <= before {
            Some(self.growth_request())
        } else {
            None
        }
    }

    /// Step back with wraparound. Never grows the buffer.
    pub fn previous(&mut self) {
        self.buffer.retreat();
    }

    /// Flip auto-play; returns the new value.
    pub fn toggle_play(&mut self) -> bool {
        self.playing = !self.playing;
        self.playing
    }

    /// Flip the info overlay; returns the new value.
    pub fn toggle_info(&mut self) -> bool {
        self.info_visible = !self.info_visible;
        self.info_visible
    }

    pub fn hide_info(&mut self) {
        self.info_visible = false;
    }

    /// Next page to request, derived from how much is already buffered.
    #[must_use]
    pub fn growth_request(&self) -> GrowthRequest {
        let len = u32::try_from(self.buffer.len()).unwrap_or(u32::MAX);
        GrowthRequest {
            generation: self.buffer.generation(),
            page: len / self.growth_page_size + 1,
            size: self.growth_page_size,
        }
    }

    /// Append a grown page. Returns `None` when the buffer was replaced after
    /// the request was made.
    pub fn apply_growth(&mut self, request: &GrowthRequest, page: Page) -> Option<usize> {
        if request.generation != self.buffer.generation() {
            return None;
        }
        let appended = page.records.len();
        self.buffer.extend(page.records);
        Some(appended)
    }

    /// Whether the auto-advance timer should be running.
    #[must_use]
    pub fn auto_advance_enabled(&self) -> bool {
        self.playing && self.load_state == LoadState::Ready && !self.buffer.is_empty()
    }

    #[must_use]
    pub fn buffer(&self) -> &ArtworkBuffer {
        &self.buffer
    }

    #[must_use]
    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    #[must_use]
    pub fn playing(&self) -> bool {
        self.playing
    }

    #[must_use]
    pub fn info_visible(&self) -> bool {
        self.info_visible
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            current: self.buffer.current().cloned(),
            index: self.buffer.position(),
            len: self.buffer.len(),
            load_state: self.load_state.clone(),
            playing: self.playing,
            info_visible: self.info_visible,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Artwork;

    fn options() -> SlideshowOptions {
        SlideshowOptions::default()
    }

    fn page(ids: std::ops::Range<u64>) -> Page {
        Page {
            records: ids
                .map(|id| Artwork {
                    id,
                    title: format!("Artwork {id}"),
                    primaryimageurl: format!("https://img/{id}.jpg"),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        }
    }

    fn ready(len: u64) -> Slideshow {
        let mut show = Slideshow::new(&options());
        let req = show.begin_load();
        assert!(show.finish_load(req.ticket, Ok(page(0..len))));
        show
    }

    #[test]
    fn starts_loading_and_playing() {
        let show = Slideshow::new(&options());
        assert_eq!(show.load_state(), &LoadState::Loading);
        assert!(show.playing());
        assert!(!show.info_visible());
        assert!(show.buffer().is_empty());
    }

    #[test]
    fn initial_load_of_fifty_is_ready_at_zero() {
        let mut show = Slideshow::new(&options());
        let req = show.begin_load();
        assert_eq!((req.page, req.size), (1, 50));
        show.finish_load(req.ticket, Ok(page(0..50)));
        assert_eq!(show.load_state(), &LoadState::Ready);
        assert_eq!(show.buffer().position(), 0);
        assert_eq!(show.buffer().len(), 50);
    }

    #[test]
    fn empty_initial_load_fails() {
        let mut show = Slideshow::new(&options());
        let req = show.begin_load();
        show.finish_load(req.ticket, Ok(Page::default()));
        assert_eq!(
            show.load_state(),
            &LoadState::Failed("No artworks found".into())
        );
    }

    #[test]
    fn fetch_error_message_becomes_failure_reason() {
        let mut show = Slideshow::new(&options());
        let req = show.begin_load();
        let err = FetchError::Http {
            status: 503,
            reason: "Service Unavailable".into(),
        };
        show.finish_load(req.ticket, Err(err));
        assert_eq!(
            show.load_state(),
            &LoadState::Failed("HTTP 503: Service Unavailable".into())
        );
    }

    #[test]
    fn superseded_load_is_ignored() {
        let mut show = Slideshow::new(&options());
        let stale = show.begin_load();
        let fresh = show.begin_load();
        assert!(!show.finish_load(stale.ticket, Ok(page(0..3))));
        assert_eq!(show.load_state(), &LoadState::Loading);
        assert!(show.finish_load(fresh.ticket, Ok(page(0..5))));
        assert_eq!(show.buffer().len(), 5);
    }

    #[test]
    fn retry_while_ready_replaces_buffer() {
        let mut show = ready(30);
        show.next();
        let req = show.begin_load();
        assert_eq!(show.load_state(), &LoadState::Loading);
        show.finish_load(req.ticket, Ok(page(100..104)));
        assert_eq!(show.load_state(), &LoadState::Ready);
        assert_eq!(show.buffer().len(), 4);
        assert_eq!(show.buffer().position(), 0);
        assert_eq!(show.snapshot().current.map(|a| a.id), Some(100));
    }

    #[test]
    fn failed_retry_keeps_previous_entries() {
        let mut show = ready(5);
        let req = show.begin_load();
        show.finish_load(req.ticket, Err(FetchError::EmptyResult));
        assert!(matches!(show.load_state(), LoadState::Failed(_)));
        assert_eq!(show.buffer().len(), 5);
        assert!(!show.auto_advance_enabled());
    }

    #[test]
    fn next_sequence_wraps_on_five() {
        let mut show = ready(5);
        let mut seen = Vec::new();
        for _ in 0..5 {
            show.next();
            seen.push(show.buffer().position());
        }
        assert_eq!(seen, vec![1, 2, 3, 4, 0]);
    }

    #[test]
    fn n_nexts_return_to_start() {
        for n in 1..=25u64 {
            let mut show = ready(n);
            for start in 0..n {
                while show.buffer().position() as u64 != start {
                    show.next();
                }
                for _ in 0..n {
                    show.next();
                }
                assert_eq!(show.buffer().position() as u64, start, "n={n}");
            }
        }
    }

    #[test]
    fn previous_undoes_next() {
        for n in 1..=15u64 {
            let mut show = ready(n);
            for _ in 0..n {
                let p = show.buffer().position();
                show.next();
                show.previous();
                assert_eq!(show.buffer().position(), p, "n={n}");
                show.next();
            }
        }
    }

    #[test]
    fn growth_requested_only_inside_trailing_window() {
        let n = 30;
        let mut show = ready(n);
        for p in 0..n as usize {
            assert_eq!(show.buffer().position(), p);
            let grow = show.next();
            if p >= n as usize - 10 {
                assert!(grow.is_some(), "expected growth at position {p}");
            } else {
                assert!(grow.is_none(), "unexpected growth at position {p}");
            }
        }
    }

    #[test]
    fn small_buffers_always_request_growth() {
        let mut show = ready(4);
        for _ in 0..8 {
            assert!(show.next().is_some());
        }
    }

    #[test]
    fn huge_trailing_window_always_grows() {
        let opts = SlideshowOptions {
            trailing_window: usize::MAX,
            ..options()
        };
        let mut show = Slideshow::new(&opts);
        let req = show.begin_load();
        show.finish_load(req.ticket, Ok(page(0..30)));
        for _ in 0..60 {
            assert!(show.next().is_some());
        }
    }

    #[test]
    fn previous_never_requests_growth_and_empty_is_noop() {
        let mut show = Slideshow::new(&options());
        assert!(show.next().is_none());
        show.previous();
        assert_eq!(show.buffer().position(), 0);
    }

    #[test]
    fn growth_page_follows_buffer_length() {
        let show = ready(50);
        let req = show.growth_request();
        assert_eq!((req.page, req.size), (3, 20));

        let show = ready(19);
        assert_eq!(show.growth_request().page, 1);
    }

    #[test]
    fn growth_appends_and_keeps_prefix() {
        let mut show = ready(12);
        let before: Vec<u64> = show.buffer().as_slice().iter().map(|a| a.id).collect();
        let req = show.growth_request();
        assert_eq!(show.apply_growth(&req, page(500..520)), Some(20));
        let after: Vec<u64> = show.buffer().as_slice().iter().map(|a| a.id).collect();
        assert_eq!(&after[..before.len()], before.as_slice());
        assert_eq!(after.len(), 32);
    }

    #[test]
    fn growth_for_replaced_buffer_is_discarded() {
        let mut show = ready(12);
        let req = show.growth_request();
        let reload = show.begin_load();
        show.finish_load(reload.ticket, Ok(page(0..3)));
        assert_eq!(show.apply_growth(&req, page(500..520)), None);
        assert_eq!(show.buffer().len(), 3);
    }

    #[test]
    fn toggles_flip_flags_without_moving() {
        let mut show = ready(5);
        show.next();
        assert!(!show.toggle_play());
        assert!(!show.auto_advance_enabled());
        assert!(show.toggle_play());
        assert!(show.auto_advance_enabled());
        assert!(show.toggle_info());
        show.hide_info();
        assert!(!show.info_visible());
        assert_eq!(show.buffer().position(), 1);
        assert_eq!(show.buffer().len(), 5);
    }
}
